//! Dynamic key-value adapter over a telemetry snapshot.
//!
//! This adapter provides by-field and by-name lookups without a bespoke typed
//! struct. It is intended for exploration, tooling and diagnostics. For hot
//! paths, prefer a typed [`FrameAdapter`] which reads through a validated
//! plan instead of copying the snapshot.

use std::sync::Arc;

use crate::Result;
use crate::adapters::{AdapterValidation, FrameAdapter};
use crate::record::TelemetryRecord;
use crate::schema::{Field, SchemaEntry, SchemaVersion};
use crate::types::{FieldData, Value};

/// An owned copy of one snapshot supporting lookups by field or declared name.
#[derive(Debug, Clone)]
pub struct DynamicRecord {
    data: Arc<[u8]>,
    entry: &'static SchemaEntry,
}

impl DynamicRecord {
    /// Borrowed typed view over the copy.
    pub fn record(&self) -> TelemetryRecord<'_> {
        TelemetryRecord::from_validated(&self.data, self.entry)
    }

    pub fn version(&self) -> SchemaVersion {
        self.entry.version
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Generic typed lookup. `None` if the field is absent or not readable as `T`.
    pub fn get<T: FieldData>(&self, field: Field) -> Option<T> {
        self.record().get(field).ok()
    }

    pub fn value(&self, field: Field) -> Option<Value> {
        self.record().value(field).ok()
    }

    /// Lookup by the name the revision declares, e.g. `engineRps` in legacy v1.
    pub fn value_by_name(&self, name: &str) -> Option<Value> {
        self.record().value_by_name(name).ok().flatten()
    }

    /// Convenience typed helpers
    pub fn f32(&self, field: Field) -> Option<f32> {
        self.get(field)
    }
    pub fn i32(&self, field: Field) -> Option<i32> {
        self.get(field)
    }
    pub fn f64(&self, field: Field) -> Option<f64> {
        self.get(field)
    }
}

impl From<&TelemetryRecord<'_>> for DynamicRecord {
    fn from(record: &TelemetryRecord<'_>) -> Self {
        Self { data: Arc::from(record.as_bytes()), entry: record.entry() }
    }
}

impl FrameAdapter for DynamicRecord {
    fn validate(entry: &'static SchemaEntry) -> Result<AdapterValidation> {
        // Lookups are resolved per call
        Ok(AdapterValidation::new(entry))
    }

    fn adapt(record: &TelemetryRecord<'_>, _validation: &AdapterValidation) -> Self {
        Self::from(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode;
    use crate::test_utils::RecordBuilder;

    #[test]
    fn dynamic_record_basic_lookup() {
        let buffer = RecordBuilder::new(SchemaVersion::LegacyV1)
            .f32(Field::EngineRps, 700.0)
            .i32(Field::Gear, 2)
            .f64(Field::SimulationTime, 12.5)
            .build();
        let record = decode(&buffer, SchemaVersion::LegacyV1).unwrap();
        let validation = DynamicRecord::validate(record.entry()).unwrap();
        let dynamic = DynamicRecord::adapt(&record, &validation);
        drop(buffer);

        assert_eq!(dynamic.version(), SchemaVersion::LegacyV1);
        assert_eq!(dynamic.f32(Field::EngineRps), Some(700.0));
        assert_eq!(dynamic.i32(Field::Gear), Some(2));
        assert_eq!(dynamic.f64(Field::SimulationTime), Some(12.5));
        assert_eq!(dynamic.i32(Field::EngineRps), None);
        assert_eq!(dynamic.value_by_name("engineRps"), Some(Value::Float32(700.0)));
        assert_eq!(dynamic.value_by_name("engine_rps"), None);
        assert_eq!(dynamic.value(Field::Gear), Some(Value::Int32(2)));
    }

    #[test]
    fn absent_fields_are_none() {
        let buffer = RecordBuilder::new(SchemaVersion::LegacyV2).build();
        let dynamic = DynamicRecord::from(&decode(&buffer, SchemaVersion::LegacyV2).unwrap());
        assert_eq!(dynamic.i32(Field::FlagGreen), None);
        assert_eq!(dynamic.value(Field::TrackName), None);
        assert_eq!(dynamic.as_bytes().len(), 400);
    }
}
