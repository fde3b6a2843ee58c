//! Time provider abstraction
//!
//! Every response timestamp in chainpad is a capture time, taken when the
//! reply is shaped. The [`Clock`] trait lets the server use wall-clock time
//! while tests pin it to a known instant.
//!
//! # Example
//!
//! ```
//! use chainpad::{Clock, SystemClock};
//!
//! let clock = SystemClock;
//! let stamp = clock.timestamp();
//! assert!(stamp.ends_with('Z'));
//! ```

use std::fmt::Debug;

use chrono::{DateTime, SecondsFormat, Utc};

#[cfg(any(test, feature = "testing"))]
use std::sync::Mutex;

/// A time provider for capture timestamps.
pub trait Clock: Send + Sync + Debug {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Current time as an ISO-8601 string with millisecond precision and a
    /// `Z` suffix, e.g. `2024-01-01T00:00:00.000Z`.
    fn timestamp(&self) -> String {
        format_timestamp(self.now())
    }
}

/// Formats an instant the way all wire timestamps are formatted.
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Production clock using real system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Test clock that only moves when told to.
///
/// ```
/// use chainpad::{Clock, FixedClock};
///
/// let clock = FixedClock::new(1_704_067_200_000);
/// assert_eq!(clock.timestamp(), "2024-01-01T00:00:00.000Z");
/// clock.advance(1500);
/// assert_eq!(clock.timestamp(), "2024-01-01T00:00:01.500Z");
/// ```
#[cfg(any(test, feature = "testing"))]
pub struct FixedClock {
    millis: Mutex<i64>,
}

#[cfg(any(test, feature = "testing"))]
impl FixedClock {
    /// Create a clock frozen at the given Unix time in milliseconds.
    pub fn new(millis: i64) -> Self {
        Self {
            millis: Mutex::new(millis),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, ms: i64) {
        *self.millis.lock().unwrap() += ms;
    }

    /// Current value in milliseconds.
    pub fn get(&self) -> i64 {
        *self.millis.lock().unwrap()
    }
}

#[cfg(any(test, feature = "testing"))]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.get()).unwrap_or_default()
    }
}

#[cfg(any(test, feature = "testing"))]
impl Default for FixedClock {
    fn default() -> Self {
        // 2024-01-01 00:00:00 UTC
        Self::new(1_704_067_200_000)
    }
}

#[cfg(any(test, feature = "testing"))]
impl Debug for FixedClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedClock")
            .field("millis", &self.get())
            .finish()
    }
}
