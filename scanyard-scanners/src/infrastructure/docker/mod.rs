//! Docker CLI container runtime

pub mod runtime;

pub use runtime::DockerCliRuntime;
