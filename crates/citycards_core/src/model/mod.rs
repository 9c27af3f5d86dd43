//! Domain models shared by repositories and services.

pub mod card;
pub mod user;

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in Unix epoch milliseconds.
///
/// Persistence writes `created_at` from this value so ordering stays
/// comparable across connections and processes.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
