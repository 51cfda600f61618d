//! Schema revision identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies which field layout a byte buffer conforms to.
///
/// The two oldest revisions carry no embedded version field, so they are
/// identified by an opaque tag and must be selected by the caller. Newer
/// revisions start with `(version_major, version_minor)` as two `i32`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SchemaVersion {
    /// Original layout: camelCase names, natural C alignment.
    LegacyV1,
    /// Same bytes as v1, explicitly packed with reserved filler fields.
    LegacyV2,
    /// A revision carrying its own version header.
    Tagged { major: i32, minor: i32 },
}

impl SchemaVersion {
    /// First revision with a version header and per-driver data.
    pub const V1_6: SchemaVersion = SchemaVersion::Tagged { major: 1, minor: 6 };
    /// Latest known revision.
    pub const V1_7: SchemaVersion = SchemaVersion::Tagged { major: 1, minor: 7 };

    /// Whether buffers of this revision embed their own version fields.
    pub fn is_tagged(&self) -> bool {
        matches!(self, SchemaVersion::Tagged { .. })
    }

    /// `(major, minor)` for tagged revisions.
    pub fn major_minor(&self) -> Option<(i32, i32)> {
        match *self {
            SchemaVersion::Tagged { major, minor } => Some((major, minor)),
            _ => None,
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaVersion::LegacyV1 => f.write_str("legacy-v1"),
            SchemaVersion::LegacyV2 => f.write_str("legacy-v2"),
            SchemaVersion::Tagged { major, minor } => write!(f, "{}.{}", major, minor),
        }
    }
}

/// Error returned when a schema version string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid schema version '{0}' (expected legacy-v1, legacy-v2 or MAJOR.MINOR)")]
pub struct ParseSchemaVersionError(pub String);

impl FromStr for SchemaVersion {
    type Err = ParseSchemaVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "legacy-v1" | "legacy_v1" | "v1" => return Ok(SchemaVersion::LegacyV1),
            "legacy-v2" | "legacy_v2" | "v2" => return Ok(SchemaVersion::LegacyV2),
            _ => {}
        }

        let (major, minor) =
            trimmed.split_once('.').ok_or_else(|| ParseSchemaVersionError(s.to_string()))?;
        let major = major.parse().map_err(|_| ParseSchemaVersionError(s.to_string()))?;
        let minor = minor.parse().map_err(|_| ParseSchemaVersionError(s.to_string()))?;
        Ok(SchemaVersion::Tagged { major, minor })
    }
}

impl TryFrom<String> for SchemaVersion {
    type Error = ParseSchemaVersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SchemaVersion> for String {
    fn from(version: SchemaVersion) -> Self {
        version.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_legacy_tags() {
        assert_eq!("legacy-v1".parse::<SchemaVersion>().unwrap(), SchemaVersion::LegacyV1);
        assert_eq!("LEGACY_V2".parse::<SchemaVersion>().unwrap(), SchemaVersion::LegacyV2);
    }

    #[test]
    fn parses_tagged_versions() {
        assert_eq!("1.7".parse::<SchemaVersion>().unwrap(), SchemaVersion::V1_7);
        assert_eq!(" 1.6 ".parse::<SchemaVersion>().unwrap(), SchemaVersion::V1_6);
    }

    #[test]
    fn rejects_garbage() {
        assert!("seven".parse::<SchemaVersion>().is_err());
        assert!("1.".parse::<SchemaVersion>().is_err());
        assert!("1.x".parse::<SchemaVersion>().is_err());
    }

    proptest! {
        #[test]
        fn display_parses_back(major in any::<i32>(), minor in any::<i32>()) {
            let version = SchemaVersion::Tagged { major, minor };
            prop_assert_eq!(version.to_string().parse::<SchemaVersion>().unwrap(), version);
        }
    }
}
