//! Delivery-quality selection and the per-view playback controller.

pub mod controller;
pub mod engine;
pub mod quality;

pub use controller::*;
pub use engine::*;
pub use quality::*;
