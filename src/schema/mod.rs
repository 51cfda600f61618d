//! Schema evolution table
//!
//! Every revision of the `$Race$` record is described by one static
//! [`Layout`]. The table maps a [`SchemaVersion`] to that layout; supporting a
//! new revision means adding one entry here and its layout in `tables`.
//!
//! # Revisions
//!
//! | version   | size   | drivers | notes                                      |
//! |-----------|--------|---------|--------------------------------------------|
//! | legacy-v1 | 400    | -       | camelCase, natural C alignment             |
//! | legacy-v2 | 400    | -       | snake_case, explicit `_padding1` fields     |
//! | 1.6       | 14 672 | 64      | version header, session info, driver slots |
//! | 1.7       | 29 320 | 128     | replay flag, push to pass, wider flags     |

mod field;
pub mod layout;
pub mod tables;
mod version;

pub use field::{Field, FieldType};
pub use layout::{FieldSpec, Layout};
pub use version::{ParseSchemaVersionError, SchemaVersion};

use crate::error::{DecodeError, DecodeResult};

/// One row of the schema evolution table.
#[derive(Debug)]
pub struct SchemaEntry {
    pub version: SchemaVersion,
    pub layout: &'static Layout,
    pub description: &'static str,
}

impl SchemaEntry {
    /// Fixed byte size of records of this revision.
    pub fn size(&self) -> usize {
        self.layout.size
    }

    /// Whether the revision declares `field` anywhere in its top-level scope.
    pub fn supports(&self, field: Field) -> bool {
        self.layout.resolve(field).is_some()
    }

    /// Maximum number of driver slots, 0 for revisions without driver data.
    pub fn num_drivers_max(&self) -> usize {
        self.layout.resolve(Field::Drivers).map(|(_, spec)| spec.count).unwrap_or(0)
    }

    /// Layout of one driver slot.
    pub fn driver_layout(&self) -> Option<&'static Layout> {
        self.layout.resolve(Field::Drivers).and_then(|(_, spec)| spec.nested)
    }
}

/// The schema evolution table, oldest revision first.
pub static SCHEMA_TABLE: [SchemaEntry; 4] = [
    SchemaEntry {
        version: SchemaVersion::LegacyV1,
        layout: &tables::LEGACY_V1,
        description: "Original layout (camelCase, natural alignment)",
    },
    SchemaEntry {
        version: SchemaVersion::LegacyV2,
        layout: &tables::LEGACY_V2,
        description: "Packed layout with explicit padding fields",
    },
    SchemaEntry {
        version: SchemaVersion::V1_6,
        layout: &tables::R3E_1_6,
        description: "Versioned layout with session data and 64 driver slots",
    },
    SchemaEntry {
        version: SchemaVersion::V1_7,
        layout: &tables::R3E_1_7,
        description: "Replay flag, push to pass, extended flags, 128 driver slots",
    },
];

/// Look up the table entry for `version`.
pub fn lookup(version: SchemaVersion) -> DecodeResult<&'static SchemaEntry> {
    SCHEMA_TABLE
        .iter()
        .find(|entry| entry.version == version)
        .ok_or(DecodeError::UnknownSchema { version })
}

/// Fixed record size of a known revision.
pub fn fixed_size_for(version: SchemaVersion) -> DecodeResult<usize> {
    lookup(version).map(SchemaEntry::size)
}

/// Size of the smallest known record; shorter buffers cannot be identified.
pub fn min_size() -> usize {
    SCHEMA_TABLE.iter().map(SchemaEntry::size).min().unwrap_or(0)
}

/// Every supported revision, oldest first.
pub fn supported_versions() -> impl Iterator<Item = SchemaVersion> {
    SCHEMA_TABLE.iter().map(|entry| entry.version)
}

/// Validate every layout in the table.
pub fn validate_table() -> crate::Result<()> {
    for entry in &SCHEMA_TABLE {
        entry.layout.validate(Some(entry.version))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_layout_validates() {
        validate_table().unwrap();
    }

    #[test]
    fn fixed_sizes_match_the_abi() {
        assert_eq!(fixed_size_for(SchemaVersion::LegacyV1).unwrap(), 400);
        assert_eq!(fixed_size_for(SchemaVersion::LegacyV2).unwrap(), 400);
        assert_eq!(fixed_size_for(SchemaVersion::V1_6).unwrap(), 14672);
        assert_eq!(fixed_size_for(SchemaVersion::V1_7).unwrap(), 29320);
        assert_eq!(min_size(), 400);
    }

    #[test]
    fn unknown_versions_are_rejected() {
        let version = SchemaVersion::Tagged { major: 2, minor: 0 };
        assert_eq!(lookup(version).unwrap_err(), DecodeError::UnknownSchema { version });
    }

    #[test]
    fn driver_slots_per_revision() {
        assert_eq!(lookup(SchemaVersion::LegacyV1).unwrap().num_drivers_max(), 0);
        assert_eq!(lookup(SchemaVersion::V1_6).unwrap().num_drivers_max(), 64);
        assert_eq!(lookup(SchemaVersion::V1_7).unwrap().num_drivers_max(), 128);
        assert_eq!(lookup(SchemaVersion::V1_7).unwrap().driver_layout().unwrap().size, 224);
    }

    #[test]
    fn legacy_revisions_share_offsets() {
        let v1 = lookup(SchemaVersion::LegacyV1).unwrap().layout;
        let v2 = lookup(SchemaVersion::LegacyV2).unwrap().layout;
        for (offset, spec) in v1.flatten() {
            let field = spec.field.unwrap();
            let (other, _) = v2.resolve(field).unwrap();
            assert_eq!(offset, other, "{field} moved between legacy revisions");
        }
    }

    #[test]
    fn revision_specific_fields() {
        let v1_6 = lookup(SchemaVersion::V1_6).unwrap();
        let v1_7 = lookup(SchemaVersion::V1_7).unwrap();
        assert!(v1_6.supports(Field::FuelPressure));
        assert!(!v1_7.supports(Field::FuelPressure));
        assert!(!v1_6.supports(Field::GameInReplay));
        assert!(v1_7.supports(Field::PtpAmountLeft));
        assert!(!lookup(SchemaVersion::LegacyV2).unwrap().supports(Field::TrackName));
    }

    #[test]
    fn declared_names_follow_the_revision() {
        let v1 = lookup(SchemaVersion::LegacyV1).unwrap().layout;
        assert_eq!(v1.field_by_name("engineRps").unwrap().0, 24);
        assert!(v1.field_by_name("engine_rps").is_none());
        let v2 = lookup(SchemaVersion::LegacyV2).unwrap().layout;
        assert_eq!(v2.field_by_name("game_simulation_time").unwrap().0, 200);
    }
}
