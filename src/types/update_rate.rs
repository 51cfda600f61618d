//! Subscriber rate control

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How often a subscriber wants to see snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum UpdateRate {
    /// Every snapshot the provider produces
    Native,

    /// At most this many snapshots per second; the newest one wins.
    /// `Max(0)` and rates at or above the provider's are treated as `Native`.
    Max(u32),
}

impl UpdateRate {
    /// Effective rate against a provider polling at `source_hz`.
    pub fn normalize(self, source_hz: f64) -> Self {
        match self {
            UpdateRate::Max(hz) if hz > 0 && (hz as f64) < source_hz => UpdateRate::Max(hz),
            _ => UpdateRate::Native,
        }
    }

    /// Interval between delivered snapshots, `None` when no throttling applies.
    pub fn throttle_interval(self, source_hz: f64) -> Option<Duration> {
        match self.normalize(source_hz) {
            UpdateRate::Native => None,
            UpdateRate::Max(hz) => Some(Duration::from_secs_f64(1.0 / hz as f64)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rates_above_source_are_native() {
        assert_eq!(UpdateRate::Max(60).normalize(10.0), UpdateRate::Native);
        assert_eq!(UpdateRate::Max(10).normalize(10.0), UpdateRate::Native);
        assert_eq!(UpdateRate::Max(0).normalize(10.0), UpdateRate::Native);
        assert_eq!(UpdateRate::Max(4).normalize(10.0), UpdateRate::Max(4));
    }

    #[test]
    fn interval_for_throttled_rates() {
        assert_eq!(UpdateRate::Native.throttle_interval(10.0), None);
        assert_eq!(UpdateRate::Max(2).throttle_interval(10.0), Some(Duration::from_millis(500)));
    }
}
