//! RaceRoom shared memory access on Windows
//!
//! RaceRoom publishes one packed record in the named file mapping `$Race$`.
//! There is no change notification; readers map the segment and poll it.
//!
//! # Usage
//!
//! ```rust,ignore
//! use r3e_telemetry::source::{MappedRegion, ProcessProbe, SharedMemory};
//! use r3e_telemetry::windows::{ProcessList, SharedMemoryMapper, SHARED_MEMORY_NAME};
//!
//! if ProcessList::default().is_producer_running() {
//!     if let Some(region) = SharedMemoryMapper.open(SHARED_MEMORY_NAME)? {
//!         let mut bytes = vec![0u8; region.len()];
//!         region.copy_to(0, &mut bytes);
//!         let record = r3e_telemetry::decode_with(&bytes, &Default::default())?;
//!         println!("gear {}", record.gear()?);
//!     }
//! }
//! ```

mod connection;
mod process;

pub use connection::{MappedSegment, SHARED_MEMORY_NAME, SharedMemoryMapper};
pub use process::{PRODUCER_PROCESS_NAMES, ProcessList};
