//! Interpretation of "no data" sentinel values.
//!
//! The producer marks missing values in-band: `-1` / `-1.0` for most fields,
//! `-2` for the gear (where `-1` is reverse). The decoder hands these values
//! through untouched; the helpers here are for presentation code that wants
//! an `Option` instead.
//!
//! ```rust
//! use r3e_telemetry::sentinel::{Gear, Sentinel, interpret_f32};
//!
//! assert_eq!(interpret_f32(-1.0, Sentinel::NotApplicable), None);
//! assert_eq!(interpret_f32(87.5, Sentinel::NotApplicable), Some(87.5));
//! assert_eq!(Gear::from_raw(-1), Gear::Reverse);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A value the producer writes when a field has no meaningful content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum Sentinel {
    /// `-1` / `-1.0`
    NotApplicable,
    /// `-2`, used where `-1` is a valid value
    NoData,
}

impl Sentinel {
    pub const fn as_i32(self) -> i32 {
        match self {
            Sentinel::NotApplicable => -1,
            Sentinel::NoData => -2,
        }
    }

    pub const fn as_f32(self) -> f32 {
        self.as_i32() as f32
    }
}

/// `None` when `raw` equals the sentinel.
pub fn interpret_i32(raw: i32, sentinel: Sentinel) -> Option<i32> {
    (raw != sentinel.as_i32()).then_some(raw)
}

/// `None` when `raw` equals the sentinel or is NaN.
pub fn interpret_f32(raw: f32, sentinel: Sentinel) -> Option<f32> {
    (!raw.is_nan() && raw != sentinel.as_f32()).then_some(raw)
}

/// Selected gear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum Gear {
    NoData,
    Reverse,
    Neutral,
    Forward(u8),
    /// Any other negative value
    Unknown(i32),
}

impl Gear {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            -2 => Gear::NoData,
            -1 => Gear::Reverse,
            0 => Gear::Neutral,
            1..=255 => Gear::Forward(raw as u8),
            other => Gear::Unknown(other),
        }
    }
}

impl fmt::Display for Gear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gear::NoData => f.write_str("-"),
            Gear::Reverse => f.write_str("R"),
            Gear::Neutral => f.write_str("N"),
            Gear::Forward(n) => write!(f, "{}", n),
            Gear::Unknown(raw) => write!(f, "?{}", raw),
        }
    }
}
