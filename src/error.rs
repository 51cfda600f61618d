//! Error types for telemetry decoding and streaming.
//!
//! Two layers of errors exist:
//!
//! - [`DecodeError`] is returned by the pure decoder ([`crate::decode`],
//!   [`crate::identify_schema`] and every record accessor). It never involves
//!   I/O and every variant describes a property of the bytes or of the bound
//!   schema revision.
//! - [`TelemetryError`] is the crate-level error used by sources, providers,
//!   connections and configuration loading. Decode errors convert into it.
//!
//! ## Recovery and Retry
//!
//! ```rust
//! use r3e_telemetry::{DecodeError, TelemetryError};
//!
//! let error = TelemetryError::from(DecodeError::BufferTooSmall { required: 400, actual: 12 });
//! if error.is_retryable() {
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::schema::{Field, FieldType, SchemaVersion};

#[cfg(windows)]
use windows_core as core;

/// Result type alias for telemetry operations.
pub type Result<T, E = TelemetryError> = std::result::Result<T, E>;

/// Result type alias for decoder operations.
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// Errors produced while interpreting a shared memory snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// The buffer is shorter than the layout it is being decoded as.
    #[error("Buffer too small: {actual} bytes, at least {required} required")]
    BufferTooSmall { required: usize, actual: usize },

    /// The version identifier matches none of the supported revisions.
    #[error("Unknown schema version {version}")]
    UnknownSchema { version: SchemaVersion },

    /// The field does not exist in the bound record's schema revision.
    #[error("Field '{field}' is not part of schema {version}")]
    FieldNotSupported { field: Field, version: SchemaVersion },

    /// An array element or driver slot beyond the fixed maximum was requested.
    #[error("Index {index} out of range for '{field}' (length {len})")]
    IndexOutOfRange { field: Field, index: usize, len: usize },

    /// The field exists but cannot be read as the requested Rust type.
    #[error("Field '{field}' is {found:?} x{found_count}, cannot read as {expected}")]
    TypeMismatch { field: Field, expected: &'static str, found: FieldType, found_count: usize },
}

impl DecodeError {
    /// Returns whether the caller can reasonably continue after this error.
    ///
    /// Only an unknown schema is a hard incompatibility; everything else is an
    /// ordinary condition (producer still starting, field absent in an older
    /// revision, slot beyond the maximum).
    pub fn is_recoverable(&self) -> bool {
        match self {
            DecodeError::BufferTooSmall { .. } => true,
            DecodeError::UnknownSchema { .. } => false,
            DecodeError::FieldNotSupported { .. } => true,
            DecodeError::IndexOutOfRange { .. } => true,
            DecodeError::TypeMismatch { .. } => false,
        }
    }

    /// Short machine-friendly name of the error kind, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeError::BufferTooSmall { .. } => "buffer_too_small",
            DecodeError::UnknownSchema { .. } => "unknown_schema",
            DecodeError::FieldNotSupported { .. } => "field_not_supported",
            DecodeError::IndexOutOfRange { .. } => "index_out_of_range",
            DecodeError::TypeMismatch { .. } => "type_mismatch",
        }
    }
}

/// Main error type for telemetry operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TelemetryError {
    #[error("Failed to connect to RaceRoom: {reason}")]
    Connection {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("File error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    #[error("{feature} is only available on {required_platform}")]
    UnsupportedPlatform { feature: String, required_platform: String },

    #[error("Windows API error: {operation}")]
    #[cfg(windows)]
    WindowsApi {
        operation: String,
        #[source]
        source: core::Error,
    },

    #[error("Schema validation failed: {reason}")]
    SchemaValidation { reason: String, version: Option<SchemaVersion> },

    #[error("Invalid configuration: {reason}")]
    Config {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Buffer operation failed: {context}")]
    Buffer {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl TelemetryError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            TelemetryError::Connection { .. } => true,
            TelemetryError::Timeout { .. } => true,
            TelemetryError::Buffer { .. } => true,
            TelemetryError::Decode(err) => err.is_recoverable(),
            TelemetryError::File { .. } => false,
            TelemetryError::UnsupportedPlatform { .. } => false,
            #[cfg(windows)]
            TelemetryError::WindowsApi { .. } => true,
            TelemetryError::SchemaValidation { .. } => false,
            TelemetryError::Config { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            TelemetryError::Connection { .. } => vec![
                "Ensure RaceRoom (RRRE.exe or RRRE64.exe) is running",
                "Check permissions for shared memory access",
                "Wait for the game to finish loading and retry",
            ],
            TelemetryError::File { .. } => vec![
                "Check file exists and is readable",
                "Verify the dump was recorded from the same schema revision",
                "Check file permissions",
            ],
            TelemetryError::Decode(DecodeError::BufferTooSmall { .. }) => vec![
                "Wait for the producer to publish a complete record and poll again",
                "Check the pinned schema revision matches the producer",
            ],
            TelemetryError::Decode(DecodeError::UnknownSchema { .. }) => vec![
                "Update the library to a version that knows this revision",
                "Pin a legacy revision explicitly for producers without a version field",
            ],
            TelemetryError::Decode(DecodeError::FieldNotSupported { .. }) => vec![
                "Treat the field as optional for older revisions",
                "Check the schema table for the revision that introduced the field",
            ],
            TelemetryError::Decode(DecodeError::IndexOutOfRange { .. }) => vec![
                "Clamp indices to the revision's maximum driver count",
                "Use the number of cars reported by the record as the upper bound",
            ],
            TelemetryError::Decode(DecodeError::TypeMismatch { .. }) => vec![
                "Read the field with the Rust type matching its declared type",
                "Use Value-based access when the type is not known in advance",
            ],
            TelemetryError::Timeout { .. } => vec![
                "Increase timeout duration",
                "Verify RaceRoom is responding",
            ],
            TelemetryError::UnsupportedPlatform { .. } => vec![
                "Use platform-appropriate features",
                "Consider dump replay for cross-platform testing",
            ],
            #[cfg(windows)]
            TelemetryError::WindowsApi { .. } => vec![
                "Check Windows API permissions",
                "Verify system resources availability",
            ],
            TelemetryError::SchemaValidation { .. } => vec![
                "Check schema version compatibility",
                "Verify the layout table entries are contiguous and sized correctly",
            ],
            TelemetryError::Config { .. } => vec![
                "Check the configuration file syntax",
                "Remove unknown keys from the configuration",
            ],
            TelemetryError::Buffer { .. } => vec![
                "Check snapshot consistency",
                "Restart the connection",
            ],
        }
    }

    /// Helper constructor for file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        TelemetryError::File { path, source }
    }

    /// Helper constructor for connection errors.
    pub fn connection_failed(reason: impl Into<String>) -> Self {
        TelemetryError::Connection { reason: reason.into(), source: None }
    }

    /// Helper constructor for Windows API errors.
    #[cfg(windows)]
    pub fn windows_api_error(operation: impl Into<String>, source: core::Error) -> Self {
        TelemetryError::WindowsApi { operation: operation.into(), source }
    }

    /// Helper constructor for schema validation errors.
    pub fn schema_validation_error(
        reason: impl Into<String>,
        version: Option<SchemaVersion>,
    ) -> Self {
        TelemetryError::SchemaValidation { reason: reason.into(), version }
    }

    /// Helper constructor for configuration errors.
    pub fn config_error(
        reason: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        TelemetryError::Config { reason: reason.into(), source }
    }

    /// Helper constructor for buffer operation errors.
    pub fn buffer_operation_error(context: impl Into<String>) -> Self {
        TelemetryError::Buffer { context: context.into(), source: None }
    }

    /// Helper constructor for unsupported platform errors.
    pub fn unsupported_platform(
        feature: impl Into<String>,
        required_platform: impl Into<String>,
    ) -> Self {
        TelemetryError::UnsupportedPlatform {
            feature: feature.into(),
            required_platform: required_platform.into(),
        }
    }
}

impl From<std::io::Error> for TelemetryError {
    fn from(err: std::io::Error) -> Self {
        TelemetryError::File { path: PathBuf::from("<unknown>"), source: err }
    }
}

#[cfg(windows)]
impl From<core::Error> for TelemetryError {
    fn from(err: core::Error) -> Self {
        TelemetryError::WindowsApi {
            operation: "Unknown Windows operation".to_string(),
            source: err,
        }
    }
}
