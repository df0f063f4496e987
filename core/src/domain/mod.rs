//! Domain layer
//!
//! - `entities`: articles and card-local states
//! - `ports`: traits for Wikipedia, image loading and platform capabilities

pub mod entities;
pub mod ports;
