pub mod api;
pub mod auth;
pub mod catalog;
pub mod client;
pub mod common;
pub mod configs;
pub mod flows;
pub mod playback;
pub mod routes;

#[cfg(test)]
pub(crate) mod testing;

pub use client::Videoflix;
