//! Live telemetry provider polling the RaceRoom shared memory segment

use std::collections::HashSet;
use std::sync::Arc;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval};
use tracing::{debug, info, trace, warn};

use crate::config::ConnectionConfig;
use crate::decoder::{SchemaSelection, decode, resolve_schema};
use crate::error::{DecodeError, DecodeResult};
use crate::provider::Provider;
use crate::schema::{self, Field, SchemaVersion};
use crate::source::{MappedRegion, ProcessProbe, SharedMemory};
use crate::types::FramePacket;
use crate::Result;

#[cfg(windows)]
use crate::windows::{ProcessList, SharedMemoryMapper};

/// Copies per poll before a torn snapshot is dropped
const READ_ATTEMPTS: usize = 2;

/// Live provider that polls a shared memory segment.
///
/// The producer gives no change notification and no write barrier, so every
/// poll copies the record once and compares `game_simulation_ticks` in the
/// copy against a re-read of the live segment. Snapshots whose tick counter
/// did not move since the last published one are not republished.
pub struct LiveProvider<M: SharedMemory, P: ProcessProbe> {
    config: ConnectionConfig,
    memory: M,
    probe: P,
    region: Option<M::Region>,
    interval: Option<Interval>,
    sequence: u64,
    last_ticks: Option<i32>,
    header_checked: bool,
    /// Error kinds already logged at `warn` for the current mapping
    reported: HashSet<&'static str>,
}

#[cfg(windows)]
impl LiveProvider<SharedMemoryMapper, ProcessList> {
    /// Provider over the real `$Race$` segment.
    pub fn windows(config: ConnectionConfig) -> Self {
        let probe = ProcessList::new(config.process_names.clone());
        Self::new(config, SharedMemoryMapper, probe)
    }
}

impl<M: SharedMemory, P: ProcessProbe> LiveProvider<M, P> {
    pub fn new(config: ConnectionConfig, memory: M, probe: P) -> Self {
        Self {
            config,
            memory,
            probe,
            region: None,
            interval: None,
            sequence: 0,
            last_ticks: None,
            header_checked: false,
            reported: HashSet::new(),
        }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Whether the segment is currently mapped
    pub fn is_mapped(&self) -> bool {
        self.region.is_some()
    }

    fn try_map(&mut self) -> Result<bool> {
        if !self.probe.is_producer_running() {
            return Ok(false);
        }
        let Some(region) = self.memory.open(&self.config.shared_memory_name)? else {
            trace!(name = %self.config.shared_memory_name, "Producer running but segment not created yet");
            return Ok(false);
        };

        info!(
            name = %self.config.shared_memory_name,
            len = region.len(),
            "Mapped telemetry segment"
        );
        self.region = Some(region);
        self.last_ticks = None;
        self.header_checked = false;
        self.reported.clear();
        Ok(true)
    }

    fn release(&mut self) {
        if self.region.take().is_some() {
            info!("Producer exited, released telemetry segment");
        }
    }

    fn report(&mut self, err: &DecodeError) {
        if self.reported.insert(err.kind()) {
            warn!(error = %err, "Failed to decode telemetry snapshot");
        } else {
            trace!(error = %err, "Failed to decode telemetry snapshot");
        }
    }

    /// One poll of the mapped segment.
    fn poll_snapshot(&mut self) -> Option<FramePacket> {
        let region = self.region.as_ref()?;
        let snapshot = match capture(region, &self.config.schema) {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                debug!("Snapshot torn on every attempt, skipping poll");
                return None;
            }
            Err(err) => {
                self.report(&err);
                return None;
            }
        };

        if self.last_ticks == Some(snapshot.ticks) {
            trace!(ticks = snapshot.ticks, "Simulation has not advanced");
            return None;
        }

        let packet = match FramePacket::new(snapshot.data, snapshot.version, self.sequence) {
            Ok(packet) => packet,
            Err(err) => {
                self.report(&err);
                return None;
            }
        };

        if !self.header_checked {
            packet.record().header_matches_table();
            self.header_checked = true;
        }

        trace!(sequence = self.sequence, ticks = snapshot.ticks, version = %snapshot.version, "Frame");
        self.last_ticks = Some(snapshot.ticks);
        self.sequence += 1;
        Some(packet)
    }
}

#[async_trait::async_trait]
impl<M: SharedMemory, P: ProcessProbe> Provider for LiveProvider<M, P> {
    async fn next_frame(&mut self) -> Result<Option<FramePacket>> {
        let mut waiting_since: Option<Instant> = None;
        let period = self.config.poll_interval();

        loop {
            self.interval
                .get_or_insert_with(|| {
                    let mut ticker = interval(period);
                    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    ticker
                })
                .tick()
                .await;

            if self.region.is_none() && !self.try_map()? {
                let since = *waiting_since.get_or_insert_with(|| {
                    info!("Waiting for RaceRoom to start...");
                    Instant::now()
                });
                if since.elapsed() >= self.config.wait_timeout() {
                    warn!(timeout = ?self.config.wait_timeout(), "Giving up waiting for RaceRoom");
                    return Ok(None);
                }
                continue;
            }

            if waiting_since.take().is_some() {
                info!("RaceRoom detected, resuming telemetry");
            }

            if !self.probe.is_producer_running() {
                self.release();
                continue;
            }

            if let Some(packet) = self.poll_snapshot() {
                return Ok(Some(packet));
            }
        }
    }

    fn poll_hz(&self) -> f64 {
        self.config.poll_hz()
    }
}

struct Snapshot {
    data: Arc<[u8]>,
    version: SchemaVersion,
    ticks: i32,
}

fn copy_prefix<R: MappedRegion>(region: &R, len: usize) -> DecodeResult<Vec<u8>> {
    let mut bytes = vec![0u8; len];
    if region.copy_to(0, &mut bytes) {
        Ok(bytes)
    } else {
        Err(DecodeError::BufferTooSmall { required: len, actual: region.len() })
    }
}

/// Copy the record out of `region`, retrying once if the tick counter moved
/// during the copy. `Ok(None)` when every attempt was torn.
fn capture<R: MappedRegion>(region: &R, selection: &SchemaSelection) -> DecodeResult<Option<Snapshot>> {
    let header = copy_prefix(region, schema::min_size().min(region.len()))?;
    let version = resolve_schema(&header, selection)?;
    let entry = schema::lookup(version)?;
    let (ticks_at, _) = entry
        .layout
        .resolve(Field::SimulationTicks)
        .ok_or(DecodeError::FieldNotSupported { field: Field::SimulationTicks, version })?;

    for attempt in 1..=READ_ATTEMPTS {
        let data: Arc<[u8]> = copy_prefix(region, entry.size())?.into();
        let ticks = decode(&data, version)?.simulation_ticks()?;
        let current = region
            .read_i32(ticks_at)
            .ok_or(DecodeError::BufferTooSmall { required: ticks_at + 4, actual: region.len() })?;
        if ticks == current {
            return Ok(Some(Snapshot { data, version, ticks }));
        }
        trace!(attempt, ticks, current, "Tick counter moved during copy");
    }
    Ok(None)
}
