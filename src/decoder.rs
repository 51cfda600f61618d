//! Schema identification and record decoding

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DecodeError, DecodeResult};
use crate::record::TelemetryRecord;
use crate::schema::{self, ParseSchemaVersionError, SchemaVersion};
use crate::types::read_scalar;

/// Identify the revision of a snapshot from its embedded version header.
///
/// Only tagged revisions can be identified; the legacy layouts carry no
/// version field and must be pinned with [`SchemaSelection::Pinned`].
///
/// ```rust
/// use r3e_telemetry::{DecodeError, SchemaVersion, identify_schema};
///
/// let mut buffer = vec![0u8; 29320];
/// buffer[0..4].copy_from_slice(&1i32.to_le_bytes());
/// buffer[4..8].copy_from_slice(&7i32.to_le_bytes());
/// assert_eq!(identify_schema(&buffer).unwrap(), SchemaVersion::V1_7);
///
/// assert!(matches!(identify_schema(&[0u8; 12]), Err(DecodeError::BufferTooSmall { .. })));
/// ```
pub fn identify_schema(buffer: &[u8]) -> DecodeResult<SchemaVersion> {
    let required = schema::min_size();
    if buffer.len() < required {
        return Err(DecodeError::BufferTooSmall { required, actual: buffer.len() });
    }
    let major = read_scalar::<i32>(buffer, 0)?;
    let minor = read_scalar::<i32>(buffer, 4)?;
    schema::lookup(SchemaVersion::Tagged { major, minor }).map(|entry| entry.version)
}

/// How the revision of incoming snapshots is determined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SchemaSelection {
    /// Read the version header of every snapshot.
    #[default]
    Auto,
    /// Always decode as this revision.
    Pinned(SchemaVersion),
}

impl fmt::Display for SchemaSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaSelection::Auto => f.write_str("auto"),
            SchemaSelection::Pinned(version) => fmt::Display::fmt(version, f),
        }
    }
}

impl FromStr for SchemaSelection {
    type Err = ParseSchemaVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(SchemaSelection::Auto);
        }
        s.parse().map(SchemaSelection::Pinned)
    }
}

impl TryFrom<String> for SchemaSelection {
    type Error = ParseSchemaVersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SchemaSelection> for String {
    fn from(selection: SchemaSelection) -> Self {
        selection.to_string()
    }
}

/// Determine the revision of `buffer` according to `selection`.
pub fn resolve_schema(buffer: &[u8], selection: &SchemaSelection) -> DecodeResult<SchemaVersion> {
    match *selection {
        SchemaSelection::Auto => identify_schema(buffer),
        SchemaSelection::Pinned(version) => schema::lookup(version).map(|entry| entry.version),
    }
}

/// Bind `buffer` to `version` without copying.
///
/// Fails with [`DecodeError::UnknownSchema`] for revisions missing from the
/// table and [`DecodeError::BufferTooSmall`] when the buffer is shorter than
/// the revision's fixed size. Longer buffers are accepted; trailing bytes are
/// ignored.
pub fn decode(buffer: &[u8], version: SchemaVersion) -> DecodeResult<TelemetryRecord<'_>> {
    let entry = schema::lookup(version)?;
    TelemetryRecord::from_entry(buffer, entry)
}

/// [`resolve_schema`] followed by [`decode`].
pub fn decode_with<'a>(
    buffer: &'a [u8],
    selection: &SchemaSelection,
) -> DecodeResult<TelemetryRecord<'a>> {
    let version = resolve_schema(buffer, selection)?;
    decode(buffer, version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Field;
    use crate::test_utils::RecordBuilder;
    use proptest::prelude::*;

    fn header(major: i32, minor: i32, len: usize) -> Vec<u8> {
        let mut buffer = vec![0u8; len];
        buffer[0..4].copy_from_slice(&major.to_le_bytes());
        buffer[4..8].copy_from_slice(&minor.to_le_bytes());
        buffer
    }

    #[test]
    fn identifies_tagged_revisions() {
        assert_eq!(identify_schema(&header(1, 6, 14672)).unwrap(), SchemaVersion::V1_6);
        assert_eq!(identify_schema(&header(1, 7, 29320)).unwrap(), SchemaVersion::V1_7);
    }

    #[test]
    fn identification_does_not_require_full_size() {
        // The header alone is enough; decode() performs the size check.
        let buffer = header(1, 7, 400);
        assert_eq!(identify_schema(&buffer).unwrap(), SchemaVersion::V1_7);
        assert_eq!(
            decode(&buffer, SchemaVersion::V1_7).unwrap_err(),
            DecodeError::BufferTooSmall { required: 29320, actual: 400 }
        );
    }

    #[test]
    fn unknown_versions_are_not_guessed() {
        let err = identify_schema(&header(2, 0, 400)).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnknownSchema { version: SchemaVersion::Tagged { major: 2, minor: 0 } }
        );
        // A zeroed legacy snapshot reads as version 0.0.
        assert!(matches!(identify_schema(&[0u8; 400]), Err(DecodeError::UnknownSchema { .. })));
    }

    #[test]
    fn pinned_selection_skips_header() {
        let buffer = vec![0u8; 400];
        let selection = SchemaSelection::Pinned(SchemaVersion::LegacyV2);
        assert_eq!(resolve_schema(&buffer, &selection).unwrap(), SchemaVersion::LegacyV2);

        let unknown = SchemaSelection::Pinned(SchemaVersion::Tagged { major: 0, minor: 9 });
        assert!(matches!(resolve_schema(&buffer, &unknown), Err(DecodeError::UnknownSchema { .. })));
    }

    #[test]
    fn decode_with_auto_detection() {
        let buffer = RecordBuilder::new(SchemaVersion::V1_6).i32(Field::Gear, 3).build();
        let record = decode_with(&buffer, &SchemaSelection::Auto).unwrap();
        assert_eq!(record.version(), SchemaVersion::V1_6);
        assert_eq!(record.gear().unwrap(), 3);
    }

    #[test]
    fn record_outlives_the_selection() {
        let buffer = RecordBuilder::new(SchemaVersion::LegacyV1).i32(Field::Gear, 2).build();
        let record = {
            let selection = SchemaSelection::Pinned(SchemaVersion::LegacyV1);
            decode_with(&buffer, &selection).unwrap()
        };
        assert_eq!(record.version(), SchemaVersion::LegacyV1);
        assert_eq!(record.gear().unwrap(), 2);
    }

    #[test]
    fn selection_text_forms() {
        assert_eq!("auto".parse::<SchemaSelection>().unwrap(), SchemaSelection::Auto);
        assert_eq!(
            "legacy-v1".parse::<SchemaSelection>().unwrap(),
            SchemaSelection::Pinned(SchemaVersion::LegacyV1)
        );
        assert_eq!(SchemaSelection::Pinned(SchemaVersion::V1_7).to_string(), "1.7");
        assert!("latest".parse::<SchemaSelection>().is_err());
    }

    proptest! {
        #[test]
        fn short_buffers_are_rejected(len in 0usize..400) {
            let buffer = vec![0u8; len];
            prop_assert_eq!(
                identify_schema(&buffer).unwrap_err(),
                DecodeError::BufferTooSmall { required: 400, actual: len }
            );
        }

        #[test]
        fn decode_requires_fixed_size(len in 0usize..14672) {
            let buffer = vec![0u8; len];
            let err = decode(&buffer, SchemaVersion::V1_6).unwrap_err();
            prop_assert_eq!(err, DecodeError::BufferTooSmall { required: 14672, actual: len });
        }

        #[test]
        fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..1024)) {
            let _ = identify_schema(&bytes);
            if let Ok(record) = decode(&bytes, SchemaVersion::LegacyV1) {
                let _ = record.engine_rps();
                let _ = record.player();
                let _ = record.tire_temps();
            }
        }
    }
}
