//! Wall-clock helper shared by handlers that stamp a block or transaction.

use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the Unix epoch, as a floating-point value matching the
/// wire's timestamp representation.
pub fn unix_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}
