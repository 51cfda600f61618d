//! Where snapshot bytes come from.
//!
//! The decoder only ever sees byte slices. Acquiring and releasing the OS
//! mapping, and deciding whether the producer is running at all, happens
//! behind the traits in this module: Windows implementations live in
//! [`crate::windows`], in-memory ones here for tests and tooling.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::Result;

/// A mapped view of a shared memory segment. Dropping it releases the mapping.
///
/// The producer may be writing while we read, so the region only hands out
/// copies, never a borrowed slice.
pub trait MappedRegion: Send {
    /// Mapped length in bytes
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy `dest.len()` bytes starting at `offset`. Returns `false`, leaving
    /// `dest` untouched, when the range lies outside the region.
    fn copy_to(&self, offset: usize, dest: &mut [u8]) -> bool;

    /// Little-endian `i32` at `offset`.
    fn read_i32(&self, offset: usize) -> Option<i32> {
        let mut word = [0u8; 4];
        self.copy_to(offset, &mut word).then(|| i32::from_le_bytes(word))
    }
}

/// Opens named shared memory segments.
pub trait SharedMemory: Send + 'static {
    type Region: MappedRegion;

    /// `Ok(None)` when no segment with that name exists (yet).
    fn open(&self, name: &str) -> Result<Option<Self::Region>>;
}

/// Reports whether a producer process is alive.
pub trait ProcessProbe: Send + 'static {
    fn is_producer_running(&self) -> bool;
}

/// Named segments held in memory.
///
/// Opening a segment maps its bytes as published at that moment; publish
/// again and reopen to observe new content.
#[derive(Debug, Clone, Default)]
pub struct InMemorySegments {
    segments: Arc<Mutex<HashMap<String, Arc<[u8]>>>>,
}

impl InMemorySegments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace a segment.
    pub fn publish(&self, name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) {
        if let Ok(mut segments) = self.segments.lock() {
            segments.insert(name.into(), bytes.into());
        }
    }

    /// Remove a segment, as when the producer exits.
    pub fn remove(&self, name: &str) {
        if let Ok(mut segments) = self.segments.lock() {
            segments.remove(name);
        }
    }
}

/// Region returned by [`InMemorySegments`].
#[derive(Debug, Clone)]
pub struct InMemoryRegion {
    bytes: Arc<[u8]>,
}

impl MappedRegion for InMemoryRegion {
    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn copy_to(&self, offset: usize, dest: &mut [u8]) -> bool {
        let Some(src) = offset.checked_add(dest.len()).and_then(|end| self.bytes.get(offset..end)) else {
            return false;
        };
        dest.copy_from_slice(src);
        true
    }
}

impl SharedMemory for InMemorySegments {
    type Region = InMemoryRegion;

    fn open(&self, name: &str) -> Result<Option<Self::Region>> {
        let segments = self
            .segments
            .lock()
            .map_err(|_| crate::TelemetryError::buffer_operation_error("segment table poisoned"))?;
        Ok(segments.get(name).map(|bytes| InMemoryRegion { bytes: Arc::clone(bytes) }))
    }
}

/// A probe whose answer is controlled by a shared flag.
#[derive(Debug, Clone, Default)]
pub struct FlagProbe {
    running: Arc<AtomicBool>,
}

impl FlagProbe {
    pub fn new(running: bool) -> Self {
        Self { running: Arc::new(AtomicBool::new(running)) }
    }

    pub fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::SeqCst);
    }
}

impl ProcessProbe for FlagProbe {
    fn is_producer_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(region: &impl MappedRegion) -> Vec<u8> {
        let mut bytes = vec![0u8; region.len()];
        assert!(region.copy_to(0, &mut bytes));
        bytes
    }

    #[test]
    fn segments_open_by_name() {
        let segments = InMemorySegments::new();
        assert!(segments.open("$Race$").unwrap().is_none());

        segments.publish("$Race$", vec![1u8, 2, 3]);
        let region = segments.open("$Race$").unwrap().unwrap();
        assert_eq!(contents(&region), [1, 2, 3]);

        segments.publish("$Race$", vec![4u8]);
        assert_eq!(contents(&region), [1, 2, 3]);
        assert_eq!(contents(&segments.open("$Race$").unwrap().unwrap()), [4]);

        segments.remove("$Race$");
        assert!(segments.open("$Race$").unwrap().is_none());
    }

    #[test]
    fn copies_are_bounds_checked() {
        let segments = InMemorySegments::new();
        segments.publish("$Race$", 7i32.to_le_bytes().iter().chain(&[9u8, 9]).copied().collect::<Vec<_>>());
        let region = segments.open("$Race$").unwrap().unwrap();

        assert_eq!(region.len(), 6);
        assert_eq!(region.read_i32(0), Some(7));
        assert_eq!(region.read_i32(3), None);
        assert_eq!(region.read_i32(usize::MAX), None);

        let mut dest = [1u8; 4];
        assert!(!region.copy_to(4, &mut dest));
        assert_eq!(dest, [1; 4]);
    }

    #[test]
    fn flag_probe_is_shared() {
        let probe = FlagProbe::new(false);
        let handle = probe.clone();
        handle.set_running(true);
        assert!(probe.is_producer_running());
    }
}
