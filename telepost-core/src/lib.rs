//! Core crate: post lifecycle state machine and its service ports.
//!
//! ## Modules
//!
//! - [`error`] – TelepostError taxonomy and Result alias
//! - [`status`] – PostStatus closed enum
//! - [`post`] – Post entity
//! - [`ports`] – PostStore, Generator, PosterStore, Publisher traits
//! - [`engine`] – LifecycleEngine (the state machine)
//! - [`logger`] – tracing initialization

mod engine;
mod error;
mod logger;
mod ports;
mod post;
mod status;

#[cfg(test)]
mod engine_test;

pub use engine::LifecycleEngine;
pub use error::{Result, TelepostError};
pub use logger::init_tracing;
pub use ports::{Generator, PostStore, PosterStore, Publisher};
pub use post::Post;
pub use status::{PostStatus, APPROVED_STATUSES};
