//! Post status: a closed enum over the four lifecycle states.
//!
//! Statuses are stored as strings (`draft`, `post_approved`,
//! `poster_approved`, `posted`); parsing rejects anything else so an
//! unexpected row can never enter the state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TelepostError;

/// Lifecycle state of a post. All transitions are forward-only except
/// revision, which keeps a post at `Draft`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Draft,
    PostApproved,
    PosterApproved,
    Posted,
}

/// Statuses from which poster generation and publishing are legal.
/// Re-rolling a poster does not regress an already poster-approved post.
pub const APPROVED_STATUSES: &[PostStatus] = &[PostStatus::PostApproved, PostStatus::PosterApproved];

impl PostStatus {
    /// The wire/database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::PostApproved => "post_approved",
            PostStatus::PosterApproved => "poster_approved",
            PostStatus::Posted => "posted",
        }
    }

    /// Parses a stored status string; unknown values are a storage error.
    pub fn parse(s: &str) -> Result<Self, TelepostError> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "post_approved" => Ok(PostStatus::PostApproved),
            "poster_approved" => Ok(PostStatus::PosterApproved),
            "posted" => Ok(PostStatus::Posted),
            other => Err(TelepostError::Storage(format!(
                "unknown post status: {}",
                other
            ))),
        }
    }

    /// A posted row is terminal and immutable.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PostStatus::Posted)
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
