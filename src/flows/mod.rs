//! View-state machines behind the account pages.

pub mod activation;
pub mod forms;
pub mod login;
pub mod password;
pub mod redirect;
pub mod signup;

pub use activation::*;
pub use forms::*;
pub use login::*;
pub use password::*;
pub use redirect::*;
pub use signup::*;
