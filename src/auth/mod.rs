//! Session state, the session protocol and route admission.

pub mod guard;
pub mod session;
pub mod store;

pub use guard::*;
pub use session::*;
pub use store::*;
