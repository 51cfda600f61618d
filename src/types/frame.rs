//! Owned telemetry snapshots for the streaming layer

use std::sync::Arc;

use crate::decoder::decode;
use crate::error::DecodeResult;
use crate::record::TelemetryRecord;
use crate::schema::{SchemaEntry, SchemaVersion};

/// One snapshot of the shared memory segment, validated against its revision.
///
/// This is the unit that flows from providers to subscribers. The bytes are
/// shared via `Arc`, so cloning a packet never copies the record.
#[derive(Debug, Clone)]
pub struct FramePacket {
    data: Arc<[u8]>,
    entry: &'static SchemaEntry,
    sequence: u64,
}

impl FramePacket {
    /// Validate `data` as `version` and wrap it.
    pub fn new(data: impl Into<Arc<[u8]>>, version: SchemaVersion, sequence: u64) -> DecodeResult<Self> {
        let data = data.into();
        let entry = decode(&data, version)?.entry();
        Ok(Self { data, entry, sequence })
    }

    /// Typed view over the snapshot.
    pub fn record(&self) -> TelemetryRecord<'_> {
        TelemetryRecord::from_validated(&self.data, self.entry)
    }

    pub fn version(&self) -> SchemaVersion {
        self.entry.version
    }

    pub fn entry(&self) -> &'static SchemaEntry {
        self.entry
    }

    /// Monotonic counter assigned by the provider.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn data(&self) -> &Arc<[u8]> {
        &self.data
    }
}
