//! Read-only mapping of the `$Race$` shared memory segment

use crate::source::{MappedRegion, SharedMemory};
use crate::{Result, TelemetryError};
use std::ptr::NonNull;
use tracing::{debug, trace};
use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::System::Memory::{
    FILE_MAP_READ, MEMORY_BASIC_INFORMATION, MEMORY_MAPPED_VIEW_ADDRESS, MapViewOfFile,
    OpenFileMappingW, UnmapViewOfFile, VirtualQuery,
};
use windows::core::PCWSTR;

/// Name of the segment RaceRoom publishes its telemetry in
pub const SHARED_MEMORY_NAME: &str = crate::config::DEFAULT_SHARED_MEMORY_NAME;

/// Opens segments with `OpenFileMappingW` + `MapViewOfFile`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SharedMemoryMapper;

impl SharedMemory for SharedMemoryMapper {
    type Region = MappedSegment;

    fn open(&self, name: &str) -> Result<Option<MappedSegment>> {
        MappedSegment::open(name)
    }
}

/// A mapped view of a named segment. Unmapped and closed on drop.
pub struct MappedSegment {
    mapping: HANDLE,
    base: NonNull<u8>,
    len: usize,
}

impl MappedSegment {
    /// Map `name` read-only. `Ok(None)` when the segment does not exist.
    pub fn open(name: &str) -> Result<Option<Self>> {
        trace!(name, "Opening shared memory segment");

        let wide_name = wide_string(name);
        let mapping = match unsafe {
            OpenFileMappingW(FILE_MAP_READ.0, false, PCWSTR::from_raw(wide_name.as_ptr()))
        } {
            Ok(handle) => handle,
            Err(err) => {
                trace!(name, error = %err, "Segment not available");
                return Ok(None);
            }
        };

        let view = unsafe { MapViewOfFile(mapping, FILE_MAP_READ, 0, 0, 0) };
        let Some(base) = NonNull::new(view.Value as *mut u8) else {
            let win_err = windows::core::Error::from_thread();
            unsafe {
                let _ = CloseHandle(mapping);
            }
            return Err(TelemetryError::windows_api_error("MapViewOfFile", win_err));
        };

        // The view covers whole pages; VirtualQuery reports how many.
        let mut info = MEMORY_BASIC_INFORMATION::default();
        let written = unsafe {
            VirtualQuery(
                Some(base.as_ptr() as *const _),
                &mut info,
                std::mem::size_of::<MEMORY_BASIC_INFORMATION>(),
            )
        };
        let segment = Self { mapping, base, len: info.RegionSize };
        if written == 0 {
            let win_err = windows::core::Error::from_thread();
            return Err(TelemetryError::windows_api_error("VirtualQuery", win_err));
        }

        debug!(name, len = segment.len, "Mapped shared memory segment");
        Ok(Some(segment))
    }
}

impl MappedSegment {
    fn in_bounds(&self, offset: usize, count: usize) -> bool {
        offset.checked_add(count).is_some_and(|end| end <= self.len)
    }
}

impl MappedRegion for MappedSegment {
    fn len(&self) -> usize {
        self.len
    }

    fn copy_to(&self, offset: usize, dest: &mut [u8]) -> bool {
        if !self.in_bounds(offset, dest.len()) {
            return false;
        }
        // SAFETY: the range lies inside the view, which stays mapped until
        // drop. No reference to the shared bytes is formed; the producer may
        // be writing them.
        unsafe {
            std::ptr::copy_nonoverlapping(self.base.as_ptr().add(offset), dest.as_mut_ptr(), dest.len());
        }
        true
    }

    fn read_i32(&self, offset: usize) -> Option<i32> {
        if !self.in_bounds(offset, 4) {
            return None;
        }
        // SAFETY: in bounds as above; `[u8; 4]` has no alignment requirement.
        let word =
            unsafe { std::ptr::read_volatile(self.base.as_ptr().add(offset) as *const [u8; 4]) };
        Some(i32::from_le_bytes(word))
    }
}

impl Drop for MappedSegment {
    fn drop(&mut self) {
        trace!(len = self.len, "Unmapping shared memory segment");
        unsafe {
            let addr = MEMORY_MAPPED_VIEW_ADDRESS { Value: self.base.as_ptr() as *mut _ };
            let _ = UnmapViewOfFile(addr);
            let _ = CloseHandle(self.mapping);
        }
    }
}

// SAFETY: the segment holds a kernel handle and a pointer to a read-only
// view; both may be used from any thread.
unsafe impl Send for MappedSegment {}

/// Convert string to null-terminated wide string for Windows APIs
pub(crate) fn wide_string(s: &str) -> Vec<u16> {
    use std::ffi::OsStr;
    use std::os::windows::ffi::OsStrExt;
    OsStr::new(s).encode_wide().chain(std::iter::once(0)).collect()
}

#[cfg(all(test, windows))]
mod tests {
    use super::*;

    #[test]
    fn wide_strings_are_nul_terminated() {
        let wide = wide_string(SHARED_MEMORY_NAME);
        assert_eq!(wide.len(), SHARED_MEMORY_NAME.len() + 1);
        assert_eq!(wide.last(), Some(&0));
    }

    #[test]
    fn missing_segment_is_not_an_error() {
        let segment = MappedSegment::open("r3e-telemetry-test-missing-segment").unwrap();
        assert!(segment.is_none());
    }

    #[test]
    #[ignore = "raceroom_required"]
    fn maps_live_segment() {
        let segment = MappedSegment::open(SHARED_MEMORY_NAME)
            .expect("Failed to open segment")
            .expect("RaceRoom is not running");
        assert!(segment.len() >= crate::schema::min_size());
        assert!(segment.read_i32(0).is_some());
    }
}
