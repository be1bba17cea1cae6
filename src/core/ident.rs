//! Row identifier generation
//!
//! Time-ordered unique string identifiers for use as primary keys:
//! a 15-digit zero-padded millisecond timestamp, 32 hex characters of
//! random UUID, and a `"000"` suffix — 50 characters total, sortable by
//! creation time.

use chrono::Utc;
use uuid::Uuid;

/// Length of a generated identifier
pub const ID_LEN: usize = 50;

/// Generate an identifier for the current instant
pub fn next_id() -> String {
    next_id_at(Utc::now().timestamp_millis())
}

/// Generate an identifier for the given Unix-millisecond timestamp
pub fn next_id_at(millis: i64) -> String {
    format!("{:015}{}000", millis, Uuid::new_v4().simple())
}
