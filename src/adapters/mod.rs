//! Type-safe frame adapters for converting raw snapshots to application structures.
//!
//! This module provides a dual-phase adapter system:
//! - **Validation**: once per schema revision, checks field availability and
//!   resolves every field to its offset
//! - **Extraction**: per frame, reads through the resolved offsets
//!
//! # Example Usage
//!
//! ```rust
//! use r3e_telemetry::adapters::{AdapterValidation, FrameAdapter};
//! use r3e_telemetry::schema::{Field, SchemaEntry};
//! use r3e_telemetry::{Result, TelemetryRecord};
//!
//! struct Dash {
//!     speed: f32,
//!     gear: i32,
//!     drs_engaged: Option<i32>,
//! }
//!
//! impl FrameAdapter for Dash {
//!     fn validate(entry: &'static SchemaEntry) -> Result<AdapterValidation> {
//!         Ok(AdapterValidation::new(entry)
//!             .require(Field::CarSpeed)?
//!             .require(Field::Gear)?
//!             .optional(Field::DrsEngaged))
//!     }
//!
//!     fn adapt(record: &TelemetryRecord<'_>, validation: &AdapterValidation) -> Self {
//!         Self {
//!             speed: validation.fetch_or_default(record, Field::CarSpeed),
//!             gear: validation.fetch_or_default(record, Field::Gear),
//!             drs_engaged: validation.fetch(record, Field::DrsEngaged),
//!         }
//!     }
//! }
//! ```

mod frame_adapter;
mod validation;

pub use frame_adapter::FrameAdapter;
pub use validation::{AdapterValidation, FieldExtraction};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::TelemetryRecord;
    use crate::schema::{self, Field, SchemaEntry, SchemaVersion};
    use crate::test_utils::RecordBuilder;
    use crate::{Result, TelemetryError, decode};

    #[derive(Debug, PartialEq)]
    struct Flags17 {
        green: i32,
        checkered: i32,
    }

    impl FrameAdapter for Flags17 {
        fn validate(entry: &'static SchemaEntry) -> Result<AdapterValidation> {
            AdapterValidation::new(entry).require(Field::FlagGreen)?.require(Field::FlagCheckered)
        }

        fn adapt(record: &TelemetryRecord<'_>, validation: &AdapterValidation) -> Self {
            Self {
                green: validation.fetch_or_default(record, Field::FlagGreen),
                checkered: validation.fetch_or_default(record, Field::FlagCheckered),
            }
        }
    }

    #[test]
    fn required_fields_are_checked_per_revision() {
        let v17 = schema::lookup(SchemaVersion::V1_7).unwrap();
        let validation = Flags17::validate(v17).unwrap();
        assert_eq!(validation.field_count(), 2);
        assert!(validation.has_required_fields());
        assert_eq!(validation.index_of(Field::FlagCheckered), Some(1));
        assert_eq!(validation.index_of(Field::Gear), None);
        assert_eq!(validation.version(), SchemaVersion::V1_7);

        let v16 = schema::lookup(SchemaVersion::V1_6).unwrap();
        let err = Flags17::validate(v16).unwrap_err();
        assert!(matches!(err, TelemetryError::SchemaValidation { version: Some(SchemaVersion::V1_6), .. }));
        assert!(err.to_string().contains("green"), "{err}");
    }

    #[test]
    fn adapt_reads_through_the_plan() {
        let entry = schema::lookup(SchemaVersion::V1_7).unwrap();
        let validation = Flags17::validate(entry).unwrap();
        let buffer = RecordBuilder::new(SchemaVersion::V1_7)
            .i32(Field::FlagGreen, 1)
            .i32(Field::FlagCheckered, 0)
            .build();
        let record = decode(&buffer, SchemaVersion::V1_7).unwrap();
        assert_eq!(Flags17::adapt(&record, &validation), Flags17 { green: 1, checkered: 0 });
    }

    #[test]
    fn optional_fields_resolve_to_none_when_absent() {
        let entry = schema::lookup(SchemaVersion::LegacyV2).unwrap();
        let validation = AdapterValidation::new(entry).optional(Field::FlagGreen).optional(Field::Gear);
        assert!(!validation.has_required_fields());
        assert!(validation.location(Field::FlagGreen).is_none());
        assert!(validation.location(Field::Gear).is_some());

        let buffer = RecordBuilder::new(SchemaVersion::LegacyV2).i32(Field::Gear, 4).build();
        let record = decode(&buffer, SchemaVersion::LegacyV2).unwrap();
        assert_eq!(validation.fetch::<i32>(&record, Field::FlagGreen), None);
        assert_eq!(validation.fetch::<i32>(&record, Field::Gear), Some(4));
        assert_eq!(validation.fetch_or_default::<i32>(&record, Field::FlagGreen), 0);
    }

    #[test]
    fn type_mismatch_is_not_fetched() {
        let entry = schema::lookup(SchemaVersion::V1_6).unwrap();
        let validation = AdapterValidation::new(entry).require(Field::CarSpeed).unwrap();
        let buffer = RecordBuilder::new(SchemaVersion::V1_6).f32(Field::CarSpeed, 12.5).build();
        let record = decode(&buffer, SchemaVersion::V1_6).unwrap();
        assert_eq!(validation.fetch::<f32>(&record, Field::CarSpeed), Some(12.5));
        assert_eq!(validation.fetch::<i32>(&record, Field::CarSpeed), None);
    }

    #[test]
    fn nested_fields_resolve_to_absolute_offsets() {
        let entry = schema::lookup(SchemaVersion::V1_7).unwrap();
        let validation = AdapterValidation::new(entry).require(Field::SimulationTime).unwrap();
        let location = validation.location(Field::SimulationTime).unwrap();
        // player block at 28, simulation time 8 bytes in
        assert_eq!(location.offset, 36);
    }
}
