//! Core domain models

pub mod image;

pub use image::*;
