//! Storage models.

mod post_record;

pub use post_record::PostRecord;
