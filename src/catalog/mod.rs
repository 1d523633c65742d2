//! Video catalog: backend calls, observable state and the home page rows.

pub mod sections;
pub mod service;

pub use sections::*;
pub use service::*;
