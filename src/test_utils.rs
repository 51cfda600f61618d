//! Test utilities for building telemetry snapshots
//!
//! [`RecordBuilder`] produces byte buffers laid out exactly like a producer
//! would write them, so tests and benchmarks can exercise every revision
//! without the game running.

#![cfg(any(test, feature = "benchmark"))]

use std::path::{Path, PathBuf};

use crate::schema::{self, Field, FieldType, Layout, SchemaEntry, SchemaVersion};

/// Builds a zero-filled snapshot of one revision and writes fields into it.
///
/// Tagged revisions get a valid version header (major, minor, driver array
/// offset and slot size) on construction. Panics on misuse, which in a test
/// means the test itself is wrong.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    entry: &'static SchemaEntry,
    data: Vec<u8>,
}

impl RecordBuilder {
    pub fn new(version: SchemaVersion) -> Self {
        let entry = schema::lookup(version).expect("unknown schema version");
        let mut builder = Self { entry, data: vec![0; entry.size()] };
        if let Some((major, minor)) = version.major_minor() {
            let (offset, spec) =
                entry.layout.resolve(Field::Drivers).expect("tagged revision without drivers");
            builder = builder
                .i32(Field::VersionMajor, major)
                .i32(Field::VersionMinor, minor)
                .i32(Field::AllDriversOffset, offset as i32)
                .i32(Field::DriverDataSize, spec.width as i32);
        }
        builder
    }

    fn locate(layout: &'static Layout, field: Field, ty: FieldType) -> (usize, usize) {
        let (offset, spec) = layout
            .resolve(field)
            .unwrap_or_else(|| panic!("{field} not in layout '{}'", layout.name));
        assert_eq!(spec.ty, ty, "{field} is {:?}", spec.ty);
        (offset, spec.width)
    }

    fn driver_base(&self, slot: usize) -> (usize, &'static Layout) {
        let (offset, spec) = self.entry.layout.resolve(Field::Drivers).expect("no driver array");
        assert!(slot < spec.count, "slot {slot} beyond {}", spec.count);
        (offset + slot * spec.width, spec.nested.expect("driver layout"))
    }

    fn put(&mut self, offset: usize, bytes: &[u8]) {
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    pub fn i32(mut self, field: Field, value: i32) -> Self {
        let (offset, _) = Self::locate(self.entry.layout, field, FieldType::Int32);
        self.put(offset, &value.to_le_bytes());
        self
    }

    pub fn f32(mut self, field: Field, value: f32) -> Self {
        let (offset, _) = Self::locate(self.entry.layout, field, FieldType::Float32);
        self.put(offset, &value.to_le_bytes());
        self
    }

    pub fn f64(mut self, field: Field, value: f64) -> Self {
        let (offset, _) = Self::locate(self.entry.layout, field, FieldType::Float64);
        self.put(offset, &value.to_le_bytes());
        self
    }

    pub fn f32s(mut self, field: Field, values: &[f32]) -> Self {
        let (offset, width) = Self::locate(self.entry.layout, field, FieldType::Float32);
        for (i, v) in values.iter().enumerate() {
            self.put(offset + i * width, &v.to_le_bytes());
        }
        self
    }

    pub fn f64s(mut self, field: Field, values: &[f64]) -> Self {
        let (offset, width) = Self::locate(self.entry.layout, field, FieldType::Float64);
        for (i, v) in values.iter().enumerate() {
            self.put(offset + i * width, &v.to_le_bytes());
        }
        self
    }

    pub fn text(mut self, field: Field, value: &str) -> Self {
        let (offset, width) = Self::locate(self.entry.layout, field, FieldType::Utf8);
        assert!(value.len() < width, "'{value}' does not fit {width} bytes");
        self.put(offset, value.as_bytes());
        self
    }

    pub fn driver_i32(mut self, slot: usize, field: Field, value: i32) -> Self {
        let (base, layout) = self.driver_base(slot);
        let (offset, _) = Self::locate(layout, field, FieldType::Int32);
        self.put(base + offset, &value.to_le_bytes());
        self
    }

    pub fn driver_f32(mut self, slot: usize, field: Field, value: f32) -> Self {
        let (base, layout) = self.driver_base(slot);
        let (offset, _) = Self::locate(layout, field, FieldType::Float32);
        self.put(base + offset, &value.to_le_bytes());
        self
    }

    pub fn driver_text(mut self, slot: usize, field: Field, value: &str) -> Self {
        let (base, layout) = self.driver_base(slot);
        let (offset, width) = Self::locate(layout, field, FieldType::Utf8);
        assert!(value.len() < width, "'{value}' does not fit {width} bytes");
        self.put(base + offset, value.as_bytes());
        self
    }

    /// Write raw bytes at an absolute offset.
    pub fn raw(mut self, offset: usize, bytes: &[u8]) -> Self {
        self.put(offset, bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }
}

/// Write snapshots back to back into a dump file under the system temp dir.
pub fn write_dump(name: &str, snapshots: &[Vec<u8>]) -> std::io::Result<PathBuf> {
    let path = std::env::temp_dir().join(format!("r3e-telemetry-{}-{}.bin", name, std::process::id()));
    let bytes: Vec<u8> = snapshots.concat();
    std::fs::write(&path, bytes)?;
    Ok(path)
}

/// Remove a dump created by [`write_dump`], ignoring errors.
pub fn remove_dump(path: &Path) {
    let _ = std::fs::remove_file(path);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_header_is_written() {
        let data = RecordBuilder::new(SchemaVersion::V1_7).build();
        assert_eq!(data.len(), 29320);
        assert_eq!(&data[0..4], &1i32.to_le_bytes());
        assert_eq!(&data[4..8], &7i32.to_le_bytes());
        assert_eq!(&data[8..12], &648i32.to_le_bytes());
        assert_eq!(&data[12..16], &224i32.to_le_bytes());
    }

    #[test]
    fn legacy_buffers_stay_zeroed() {
        let data = RecordBuilder::new(SchemaVersion::LegacyV1).build();
        assert_eq!(data.len(), 400);
        assert!(data.iter().all(|b| *b == 0));
    }
}
