//! Versioned, ABI-stable decoder for RaceRoom Racing Experience telemetry.
//!
//! RaceRoom publishes a packed binary record in the shared memory segment
//! `$Race$`. Its layout changed several times; this crate binds a byte buffer
//! to one revision of that layout and reads typed fields out of it without
//! copying, failing with a [`DecodeError`] instead of reading garbage when a
//! buffer is short or a field does not exist in the revision.
//!
//! # Features
//!
//! - **Schema table**: legacy v1, legacy v2, 1.6 and 1.7, with bit-exact offsets
//! - **Zero-copy decoding**: [`decode`] checks the size once, accessors are O(1)
//! - **Live telemetry**: polling provider with process detection on Windows
//! - **Replay**: raw snapshot dumps on any platform
//! - **Streaming**: adapters, latest-wins throttling and per-revision validation
//!
//! # Decoding a snapshot
//!
//! ```rust
//! use r3e_telemetry::sentinel::Gear;
//! use r3e_telemetry::{SchemaSelection, SchemaVersion, decode_with};
//!
//! let mut snapshot = vec![0u8; 400];
//! snapshot[88..92].copy_from_slice(&(-1i32).to_le_bytes());
//!
//! let record = decode_with(&snapshot, &SchemaSelection::Pinned(SchemaVersion::LegacyV2))?;
//! assert_eq!(Gear::from_raw(record.gear()?), Gear::Reverse);
//! # Ok::<(), r3e_telemetry::DecodeError>(())
//! ```
//!
//! # Streaming a replay
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use r3e_telemetry::{DynamicRecord, R3e, SchemaVersion, UpdateRate};
//! use r3e_telemetry::schema::Field;
//!
//! #[tokio::main]
//! async fn main() -> r3e_telemetry::Result<()> {
//!     let connection = R3e::open("session.r3e", SchemaVersion::V1_7).await?;
//!     let mut stream = Box::pin(connection.subscribe::<DynamicRecord>(UpdateRate::Max(5)));
//!
//!     while let Some(record) = stream.next().await {
//!         println!("speed: {:?}", record.f32(Field::CarSpeed));
//!     }
//!     Ok(())
//! }
//! ```

// Decoding
mod decoder;
mod dynamic_record;
mod error;
pub mod record;
pub mod schema;
pub mod sentinel;
pub mod types;
pub mod units;

#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;

// Sources and streaming
pub mod adapters;
pub mod config;
pub mod connection;
pub mod driver;
pub mod provider;
pub mod providers;
pub mod source;
pub mod stream;

// Platform-specific modules
#[cfg(windows)]
pub mod windows;

// Core exports
pub use decoder::{SchemaSelection, decode, decode_with, identify_schema, resolve_schema};
pub use dynamic_record::DynamicRecord;
pub use error::*;
pub use record::{DriverRecord, TelemetryRecord};
pub use schema::{Field, SchemaEntry, SchemaVersion};
pub use types::*;

// Main API exports
pub use adapters::{AdapterValidation, FieldExtraction, FrameAdapter};
pub use config::ConnectionConfig;
pub use connection::TelemetryConnection;

/// Unified entry point for telemetry connections.
///
/// # Examples
///
/// ## Live Telemetry (Windows)
/// ```rust,no_run
/// use r3e_telemetry::R3e;
///
/// #[tokio::main]
/// async fn main() -> r3e_telemetry::Result<()> {
///     let connection = R3e::connect().await?;
///     // Use connection...
///     Ok(())
/// }
/// ```
///
/// ## Snapshot Replay (Cross-platform)
/// ```rust,no_run
/// use r3e_telemetry::{R3e, SchemaVersion};
///
/// #[tokio::main]
/// async fn main() -> r3e_telemetry::Result<()> {
///     let connection = R3e::open("session.r3e", SchemaVersion::LegacyV2).await?;
///     // Use connection...
///     Ok(())
/// }
/// ```
pub struct R3e;

impl R3e {
    /// Connect to live RaceRoom telemetry with the default configuration.
    ///
    /// # Platform
    ///
    /// Only available on Windows where RaceRoom runs. On other platforms this
    /// returns an `UnsupportedPlatform` error.
    pub async fn connect() -> Result<TelemetryConnection> {
        TelemetryConnection::connect(ConnectionConfig::default()).await
    }

    /// Connect to live telemetry with an explicit configuration.
    pub async fn connect_with(config: ConnectionConfig) -> Result<TelemetryConnection> {
        TelemetryConnection::connect(config).await
    }

    /// Replay a snapshot dump of `version` at the default rate.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the version is unknown,
    /// or the file length is not a whole number of snapshots.
    pub async fn open<P: AsRef<std::path::Path>>(
        path: P,
        version: SchemaVersion,
    ) -> Result<TelemetryConnection> {
        TelemetryConnection::replay(path, version, providers::DEFAULT_REPLAY_HZ).await
    }
}
