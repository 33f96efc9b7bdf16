//! Container image domain: references, credentials, scanner output and the
//! capabilities the scan pipeline consumes.

pub mod entities;
pub mod traits;
pub mod value_objects;

pub use entities::*;
pub use traits::*;
pub use value_objects::*;
