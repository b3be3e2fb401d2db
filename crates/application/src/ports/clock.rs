//! Clock port for report timestamps

use chrono::{DateTime, Utc};

/// Port for getting the current time.
///
/// Only wall-clock timestamps for reports go through this port; durations
/// are measured with a monotonic `Instant`.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;
}
