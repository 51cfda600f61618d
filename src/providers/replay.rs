//! Replay provider for recorded snapshots
//!
//! A dump file is the raw bytes of consecutive snapshots of one revision,
//! each exactly that revision's fixed size, with no framing in between.

use std::io;
use std::path::Path;
use std::sync::Arc;
use tokio::time::{Duration, Interval, MissedTickBehavior, interval};
use tracing::{debug, info, trace};

use crate::provider::Provider;
use crate::schema::{self, SchemaVersion};
use crate::types::FramePacket;
use crate::{Result, TelemetryError};

/// Default playback rate, matching the live poll interval
pub const DEFAULT_REPLAY_HZ: f64 = 10.0;

const MIN_PERIOD: Duration = Duration::from_nanos(1);
const MAX_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

/// Frame period for `rate_hz`, kept within what a timer can express.
fn frame_period(rate_hz: f64) -> Duration {
    let rate_hz = if rate_hz.is_finite() && rate_hz > 0.0 { rate_hz } else { DEFAULT_REPLAY_HZ };
    Duration::try_from_secs_f64(1.0 / rate_hz).unwrap_or(MAX_PERIOD).clamp(MIN_PERIOD, MAX_PERIOD)
}

/// Replays snapshots at a fixed rate, then ends.
pub struct ReplayProvider {
    snapshots: Vec<Arc<[u8]>>,
    version: SchemaVersion,
    position: usize,
    period: Duration,
    interval: Option<Interval>,
}

impl ReplayProvider {
    /// Read a dump file of `version` snapshots.
    pub async fn open(path: impl AsRef<Path>, version: SchemaVersion, rate_hz: f64) -> Result<Self> {
        let path = path.as_ref();
        let size = schema::fixed_size_for(version)?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| TelemetryError::file_error(path.to_path_buf(), e))?;

        if bytes.is_empty() || bytes.len() % size != 0 {
            let reason = format!(
                "{} bytes is not a whole number of {version} snapshots ({size} bytes each)",
                bytes.len()
            );
            return Err(TelemetryError::file_error(
                path.to_path_buf(),
                io::Error::new(io::ErrorKind::InvalidData, reason),
            ));
        }

        let snapshots = bytes.chunks_exact(size).map(Arc::<[u8]>::from).collect::<Vec<_>>();
        info!(path = %path.display(), frames = snapshots.len(), %version, "Opened telemetry dump");
        Self::from_snapshots(snapshots, version, rate_hz)
    }

    /// Replay in-memory snapshots. Each must be at least `version`'s size.
    pub fn from_snapshots<I, B>(snapshots: I, version: SchemaVersion, rate_hz: f64) -> Result<Self>
    where
        I: IntoIterator<Item = B>,
        B: Into<Arc<[u8]>>,
    {
        let snapshots: Vec<Arc<[u8]>> = snapshots.into_iter().map(Into::into).collect();
        for snapshot in &snapshots {
            crate::decode(snapshot, version)?;
        }
        Ok(Self { snapshots, version, position: 0, period: frame_period(rate_hz), interval: None })
    }

    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    pub fn total_frames(&self) -> usize {
        self.snapshots.len()
    }

    pub fn current_frame(&self) -> usize {
        self.position
    }

    /// Total playback time in seconds
    pub fn duration(&self) -> f64 {
        self.snapshots.len() as f64 * self.period.as_secs_f64()
    }
}

#[async_trait::async_trait]
impl Provider for ReplayProvider {
    async fn next_frame(&mut self) -> Result<Option<FramePacket>> {
        let Some(data) = self.snapshots.get(self.position).cloned() else {
            debug!(frames = self.snapshots.len(), "Reached end of replay");
            return Ok(None);
        };

        let period = self.period;
        self.interval
            .get_or_insert_with(|| {
                let mut ticker = interval(period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                ticker
            })
            .tick()
            .await;

        let sequence = self.position as u64;
        self.position += 1;
        trace!(frame = self.position, total = self.snapshots.len(), "Replay frame");
        Ok(Some(FramePacket::new(data, self.version, sequence)?))
    }

    fn poll_hz(&self) -> f64 {
        1.0 / self.period.as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Field;
    use crate::test_utils::{RecordBuilder, remove_dump, write_dump};
    use tokio::time::Instant;

    fn snapshots(version: SchemaVersion, count: i32) -> Vec<Vec<u8>> {
        (0..count)
            .map(|i| RecordBuilder::new(version).i32(Field::SimulationTicks, i).i32(Field::Gear, i).build())
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn replays_every_snapshot_then_ends() {
        let mut provider =
            ReplayProvider::from_snapshots(snapshots(SchemaVersion::V1_6, 3), SchemaVersion::V1_6, 20.0)
                .unwrap();
        assert_eq!(provider.total_frames(), 3);
        assert_eq!(provider.poll_hz(), 20.0);

        for expected in 0..3 {
            let packet = provider.next_frame().await.unwrap().expect("frame");
            assert_eq!(packet.sequence(), expected as u64);
            assert_eq!(packet.record().gear().unwrap(), expected);
        }
        assert!(provider.next_frame().await.unwrap().is_none());
        assert!(provider.next_frame().await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn frames_are_paced() {
        let mut provider =
            ReplayProvider::from_snapshots(snapshots(SchemaVersion::LegacyV1, 3), SchemaVersion::LegacyV1, 4.0)
                .unwrap();
        let start = Instant::now();
        while provider.next_frame().await.unwrap().is_some() {}
        assert!(start.elapsed() >= Duration::from_millis(500));
    }

    #[test]
    fn rejects_short_snapshots() {
        let err = ReplayProvider::from_snapshots(vec![vec![0u8; 10]], SchemaVersion::LegacyV2, 10.0)
            .err()
            .unwrap();
        assert!(matches!(err, TelemetryError::Decode(_)));
    }

    #[test]
    fn invalid_rate_falls_back_to_default() {
        let provider =
            ReplayProvider::from_snapshots(Vec::<Vec<u8>>::new(), SchemaVersion::V1_7, 0.0).unwrap();
        assert_eq!(provider.poll_hz(), DEFAULT_REPLAY_HZ);
        assert_eq!(provider.duration(), 0.0);

        let provider =
            ReplayProvider::from_snapshots(Vec::<Vec<u8>>::new(), SchemaVersion::V1_7, f64::NAN).unwrap();
        assert_eq!(provider.poll_hz(), DEFAULT_REPLAY_HZ);
    }

    #[tokio::test(start_paused = true)]
    async fn extreme_rates_still_replay() {
        for rate_hz in [1e10, f64::MAX, 1e-30] {
            let version = SchemaVersion::LegacyV1;
            let mut provider = ReplayProvider::from_snapshots(snapshots(version, 2), version, rate_hz).unwrap();
            assert!(provider.poll_hz().is_finite() && provider.poll_hz() > 0.0, "{rate_hz}");
            let first = provider.next_frame().await.unwrap().expect("first frame is immediate");
            assert_eq!(first.sequence(), 0);
        }
    }

    #[test]
    fn frame_period_is_bounded() {
        assert_eq!(frame_period(1e10), MIN_PERIOD);
        assert_eq!(frame_period(1e-30), MAX_PERIOD);
        assert_eq!(frame_period(4.0), Duration::from_millis(250));
        assert_eq!(frame_period(-3.0), Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn dump_files_are_split_into_snapshots() {
        let path = write_dump("replay-split", &snapshots(SchemaVersion::V1_7, 4)).unwrap();
        let mut provider = ReplayProvider::open(&path, SchemaVersion::V1_7, 50.0).await.unwrap();
        remove_dump(&path);

        assert_eq!(provider.total_frames(), 4);
        let mut gears = Vec::new();
        while let Some(packet) = provider.next_frame().await.unwrap() {
            gears.push(packet.record().gear().unwrap());
        }
        assert_eq!(gears, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn truncated_dump_is_rejected() {
        let mut records = snapshots(SchemaVersion::LegacyV2, 2);
        records[1].truncate(100);
        let path = write_dump("replay-truncated", &records).unwrap();
        let err = ReplayProvider::open(&path, SchemaVersion::LegacyV2, 10.0).await.err().unwrap();
        remove_dump(&path);
        assert!(matches!(err, TelemetryError::File { .. }));
    }

    #[tokio::test]
    async fn unknown_version_is_rejected_before_reading() {
        let version = SchemaVersion::Tagged { major: 9, minor: 9 };
        let err = ReplayProvider::open("/nonexistent.bin", version, 10.0).await.err().unwrap();
        assert!(matches!(err, TelemetryError::Decode(_)));
    }
}
