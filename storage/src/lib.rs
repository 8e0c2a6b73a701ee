//! Storage crate: post persistence over SQLite.
//!
//! ## Modules
//!
//! - [`models`] – PostRecord
//! - [`post_repo`] – PostRepository (SQLite)
//! - [`store_impl`] – telepost-core PostStore implementation
//! - [`sqlite_pool`] – SqlitePoolManager

mod models;
mod post_repo;
mod sqlite_pool;
mod store_impl;

#[cfg(test)]
mod post_repo_test;

pub use models::PostRecord;
pub use post_repo::PostRepository;
pub use sqlite_pool::SqlitePoolManager;
