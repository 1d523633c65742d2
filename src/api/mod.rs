//! Backend access: endpoint resolution, transport, the authorization layer
//! and the wire models.

pub mod endpoints;
pub mod layer;
pub mod media;
pub mod models;
pub mod transport;

pub use endpoints::*;
pub use layer::*;
pub use media::*;
pub use models::*;
pub use transport::*;
