//! Event clock timestamps

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};
use std::time::Duration;

/// Timestamp on the input event clock, in nanoseconds.
///
/// Platform adapters stamp every event with the time it was produced by the
/// input driver. All deadline arithmetic in the gesture core happens on this
/// clock, never on wall time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    pub fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    pub fn from_micros(micros: u64) -> Self {
        Self(micros.saturating_mul(1_000))
    }

    pub fn from_millis(millis: u64) -> Self {
        Self(millis.saturating_mul(1_000_000))
    }

    pub fn as_nanos(&self) -> u64 {
        self.0
    }

    pub fn as_millis(&self) -> u64 {
        self.0 / 1_000_000
    }

    /// Milliseconds elapsed since `earlier`, saturating at zero.
    pub fn millis_since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0) / 1_000_000
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Self::Output {
        Timestamp(self.0.saturating_add(rhs.as_nanos() as u64))
    }
}

impl Sub for Timestamp {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Self::Output {
        Duration::from_nanos(self.0.saturating_sub(rhs.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_roundtrip() {
        let t = Timestamp::from_millis(1500);
        assert_eq!(t.as_millis(), 1500);
        assert_eq!(t.as_nanos(), 1_500_000_000);
    }

    #[test]
    fn test_sub_saturates() {
        let a = Timestamp::from_millis(10);
        let b = Timestamp::from_millis(30);
        assert_eq!(b - a, Duration::from_millis(20));
        assert_eq!(a - b, Duration::ZERO);
        assert_eq!(a.millis_since(b), 0);
    }

    #[test]
    fn test_add_duration() {
        let t = Timestamp::from_millis(100) + Duration::from_millis(400);
        assert_eq!(t, Timestamp::from_millis(500));
    }
}
