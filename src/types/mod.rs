//! Value types produced by the decoder.
//!
//! - [`FieldData`] / [`Scalar`] extract typed values from a resolved field
//! - [`Value`] holds any field when the type is not known at compile time
//! - Composite structs ([`PlayerData`], [`Flags`], [`TireTemps`], ...) group
//!   related fields
//! - [`FramePacket`] is the owned, validated snapshot that flows through
//!   streams
//!
//! ## Usage Example
//!
//! ```rust
//! use r3e_telemetry::{FramePacket, SchemaVersion, TireLocation, TreadLocation};
//!
//! let mut data = vec![0u8; 400];
//! data[88..92].copy_from_slice(&3i32.to_le_bytes()); // gear
//! data[92..96].copy_from_slice(&350.0f32.to_le_bytes()); // front left, left tread
//!
//! let packet = FramePacket::new(data, SchemaVersion::LegacyV1, 0)?;
//! let record = packet.record();
//! assert_eq!(record.gear()?, 3);
//! assert_eq!(record.tire_temperature(TireLocation::FrontLeft, TreadLocation::Left)?, 350.0);
//! # Ok::<(), r3e_telemetry::DecodeError>(())
//! ```

mod composite;
mod field_data;
mod frame;
mod update_rate;
mod value;

pub use composite::{
    CarDamage, DriverInfo, DrsState, Flags, Orientation, PenaltyCounts, PlayerData, PushToPass,
    TireLocation, TireTemps, TreadLocation, Vec3,
};
pub use field_data::{FieldData, FieldLocation, Scalar, read_scalar};
pub use frame::FramePacket;
pub use update_rate::UpdateRate;
pub use value::Value;
