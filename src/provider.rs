//! Provider trait for snapshot sources

use super::types::FramePacket;
use crate::Result;

/// A source of validated telemetry snapshots.
///
/// Providers own their pacing: the live provider polls the shared memory
/// segment on an interval, the replay provider paces recorded snapshots.
#[async_trait::async_trait]
pub trait Provider: Send + 'static {
    /// Get the next snapshot
    ///
    /// Returns:
    /// - `Ok(Some(packet))` - New snapshot available
    /// - `Ok(None)` - Source ended (replay finished, producer never appeared)
    /// - `Err(e)` - Error occurred; the caller may retry
    async fn next_frame(&mut self) -> Result<Option<FramePacket>>;

    /// Rate at which this provider produces snapshots, in Hz
    fn poll_hz(&self) -> f64;
}
