//! Error taxonomy shared by the engine, the clients and both adapters.
//!
//! Every upstream failure is converted to one of these variants at the
//! client boundary; the engine never mutates a post record after an error.

use thiserror::Error;

/// Errors surfaced by lifecycle operations and the service clients.
#[derive(Error, Debug)]
pub enum TelepostError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited by the AI gateway, try again later")]
    RateLimited,

    #[error("AI gateway credits exhausted")]
    QuotaExhausted,

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Delivery error: {0}")]
    Delivery(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, TelepostError>;
