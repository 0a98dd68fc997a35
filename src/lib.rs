pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod session;
pub mod user;

#[cfg(feature = "player")]
pub mod player;
