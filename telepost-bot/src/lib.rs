//! TelePost application crate.
//!
//! ## Modules
//!
//! - [`config`] – AppConfig (environment)
//! - [`state`] – shared handler state
//! - [`commands`] – chat command parsing
//! - [`chat`] – chat adapter over the lifecycle engine
//! - [`handlers`] – HTTP routes (wizard, webhook, groups, media, health)
//! - [`poster_store`] – filesystem PosterStore
//! - [`error`] – HTTP error mapping
//! - [`runner`] – wiring and server startup

pub mod chat;
pub mod commands;
pub mod config;
pub mod error;
pub mod handlers;
pub mod poster_store;
pub mod runner;
pub mod state;

pub use config::AppConfig;
pub use state::AppState;
