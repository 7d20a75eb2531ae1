//! crates/logging/src/timestamp.rs
//! Local wall-clock timestamps in `YYYY-MM-DD HH:MM:SS` form.

use std::fmt;
use std::sync::OnceLock;

use time::{OffsetDateTime, UtcOffset};

/// Width of a rendered timestamp, excluding the trailing separator.
pub const TIMESTAMP_WIDTH: usize = 19;

/// A second-resolution wall-clock instant in the process's local offset.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Timestamp(OffsetDateTime);

impl Timestamp {
    /// Captures the current local time.
    ///
    /// The local offset is determined once per process; when it cannot be
    /// determined the timestamp is rendered in UTC.
    #[must_use]
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc().to_offset(local_offset()))
    }

    /// Returns the underlying date-time.
    #[must_use]
    pub const fn as_offset_date_time(&self) -> OffsetDateTime {
        self.0
    }
}

impl From<OffsetDateTime> for Timestamp {
    fn from(value: OffsetDateTime) -> Self {
        Self(value)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let at = self.0;
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            at.year(),
            u8::from(at.month()),
            at.day(),
            at.hour(),
            at.minute(),
            at.second()
        )
    }
}

fn local_offset() -> UtcOffset {
    static OFFSET: OnceLock<UtcOffset> = OnceLock::new();
    *OFFSET.get_or_init(|| UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC))
}
