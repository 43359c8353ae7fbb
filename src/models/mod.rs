// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod place;
pub mod place_image;
pub mod response;

pub use place::*;
pub use place_image::*;
pub use response::*;
