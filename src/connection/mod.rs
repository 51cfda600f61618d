//! Telemetry connections
//!
//! A [`TelemetryConnection`] owns a frame reader task (see [`Driver`]) and
//! hands out adapted, optionally throttled streams of its frames.

use futures::{Stream, StreamExt};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::adapters::{AdapterValidation, FrameAdapter};
use crate::config::ConnectionConfig;
use crate::driver::Driver;
use crate::provider::Provider;
use crate::providers::ReplayProvider;
use crate::schema::SchemaVersion;
use crate::stream::ThrottleExt;
use crate::types::{FramePacket, UpdateRate};
use crate::Result;

#[cfg(test)]
mod tests;

/// How long `replay` waits for the first frame before returning anyway
const FIRST_FRAME_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection to a stream of telemetry snapshots, live or replayed.
pub struct TelemetryConnection {
    frames: watch::Receiver<Option<Arc<FramePacket>>>,
    source_hz: f64,
    cancel: CancellationToken,
}

impl TelemetryConnection {
    /// Connect to the live RaceRoom segment.
    ///
    /// Returns immediately; frames start flowing once RaceRoom runs. The
    /// subscription streams end if no producer shows up within the
    /// configured `wait_timeout`.
    ///
    /// # Platform
    ///
    /// Only available on Windows. Elsewhere this returns
    /// [`TelemetryError::UnsupportedPlatform`](crate::TelemetryError::UnsupportedPlatform).
    pub async fn connect(config: ConnectionConfig) -> Result<Self> {
        config.validate()?;

        #[cfg(windows)]
        {
            info!(name = %config.shared_memory_name, schema = %config.schema, "Connecting to RaceRoom telemetry");
            let provider = crate::providers::LiveProvider::windows(config);
            let connection = Self::from_provider(provider);
            info!("Live connection established ({}Hz) - waiting for RaceRoom", connection.source_hz);
            Ok(connection)
        }

        #[cfg(not(windows))]
        {
            debug!(?config, "Live telemetry requested on unsupported platform");
            Err(crate::TelemetryError::unsupported_platform("Live telemetry", "Windows"))
        }
    }

    /// Replay a dump file of `version` snapshots at `rate_hz`.
    ///
    /// Waits for the first frame before returning so that subscriptions start
    /// with data.
    pub async fn replay(path: impl AsRef<Path>, version: SchemaVersion, rate_hz: f64) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening telemetry dump: {}", path.display());

        let provider = ReplayProvider::open(path, version, rate_hz).await?;
        let connection = Self::from_provider(provider);

        let mut frame_rx = connection.frames.clone();
        let first = tokio::time::timeout(FIRST_FRAME_TIMEOUT, frame_rx.wait_for(Option::is_some))
            .await
            .is_ok_and(|frame| frame.is_ok());
        if !first {
            warn!("No frame from replay file within {:?}", FIRST_FRAME_TIMEOUT);
        }

        info!("Replay connection opened ({}Hz)", connection.source_hz);
        Ok(connection)
    }

    /// Drive any provider. Must be called within a tokio runtime.
    pub fn from_provider<P: Provider>(provider: P) -> Self {
        let source_hz = provider.poll_hz();
        let channels = Driver::spawn(provider);
        Self { frames: channels.frames, source_hz, cancel: channels.cancel }
    }

    /// Subscribe to adapted frames.
    ///
    /// The adapter is validated once per schema revision seen on this stream;
    /// frames of revisions it rejects are skipped. The stream ends when the
    /// provider does.
    pub fn subscribe<T>(&self, rate: UpdateRate) -> impl Stream<Item = T> + Send + 'static
    where
        T: FrameAdapter + Send + 'static,
    {
        // WatchStream yields the current value first. Leading `None`s mean
        // no frame yet; a `None` after a frame means the provider ended.
        let frames = WatchStream::new(self.frames.clone())
            .skip_while(|opt| {
                let is_none = opt.is_none();
                async move { is_none }
            })
            .take_while(|opt| {
                let is_some = opt.is_some();
                async move { is_some }
            })
            .filter_map(|opt| async move { opt });

        let frames = match rate.throttle_interval(self.source_hz) {
            None => frames.boxed(),
            Some(interval) => frames.throttle(interval).boxed(),
        };

        let mut plans = AdapterPlans::<T>::default();
        frames.filter_map(move |packet| {
            let adapted = plans.adapt(&packet);
            async move { adapted }
        })
    }

    /// Most recent frame, if any.
    pub fn latest(&self) -> Option<Arc<FramePacket>> {
        self.frames.borrow().clone()
    }

    /// Rate at which the provider produces frames, in Hz
    pub fn poll_hz(&self) -> f64 {
        self.source_hz
    }
}

impl Drop for TelemetryConnection {
    fn drop(&mut self) {
        debug!("Dropping telemetry connection");
        self.cancel.cancel();
    }
}

/// Validation plans of one adapter, per schema revision.
struct AdapterPlans<T> {
    plans: HashMap<SchemaVersion, Option<AdapterValidation>>,
    _adapter: PhantomData<fn() -> T>,
}

impl<T> Default for AdapterPlans<T> {
    fn default() -> Self {
        Self { plans: HashMap::new(), _adapter: PhantomData }
    }
}

impl<T: FrameAdapter> AdapterPlans<T> {
    fn adapt(&mut self, packet: &FramePacket) -> Option<T> {
        let plan = self.plans.entry(packet.version()).or_insert_with(|| match T::validate(packet.entry()) {
            Ok(validation) => {
                debug!(version = %packet.version(), fields = validation.field_count(), "Adapter validated");
                Some(validation)
            }
            Err(e) => {
                warn!(version = %packet.version(), error = %e, "Adapter rejects schema revision, skipping its frames");
                None
            }
        });
        plan.as_ref().map(|validation| T::adapt(&packet.record(), validation))
    }
}
