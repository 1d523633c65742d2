pub mod api;
pub mod base;
pub mod flows;
pub mod http;
pub mod logging;
pub mod player;

pub use api::*;
pub use base::*;
pub use flows::*;
pub use http::*;
pub use logging::*;
pub use player::*;
