//! Driver spawns and manages the frame reader task

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

use super::provider::Provider;
use super::types::FramePacket;

/// Consecutive provider errors before the reader gives up
pub const MAX_ERRORS: u32 = 10;

/// Result of spawning the driver
pub struct DriverChannels {
    /// Latest frame; `None` before the first frame and after the provider ends
    pub frames: watch::Receiver<Option<Arc<FramePacket>>>,
    /// Cancellation token for graceful shutdown
    pub cancel: CancellationToken,
}

/// Driver spawns the frame reader task that owns a [`Provider`].
pub struct Driver;

impl Driver {
    /// Spawn the frame reader for `provider`.
    pub fn spawn<P>(provider: P) -> DriverChannels
    where
        P: Provider,
    {
        let (frame_tx, frame_rx) = watch::channel(None);
        let cancel = CancellationToken::new();
        let cancel_frame = cancel.clone();

        tokio::spawn(async move {
            Self::frame_reader_task(provider, frame_tx, cancel_frame).await;
        });

        DriverChannels { frames: frame_rx, cancel }
    }

    async fn frame_reader_task<P>(
        mut provider: P,
        frame_tx: watch::Sender<Option<Arc<FramePacket>>>,
        cancel: CancellationToken,
    ) where
        P: Provider,
    {
        info!(poll_hz = provider.poll_hz(), "Frame reader task started");
        let mut frame_count = 0u64;
        let mut error_count = 0u32;

        loop {
            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Frame reader cancelled");
                    break;
                }
                result = provider.next_frame() => result,
            };

            match result {
                Ok(Some(packet)) => {
                    frame_count += 1;
                    error_count = 0;
                    trace!(sequence = packet.sequence(), version = %packet.version(), "Frame {}", frame_count);

                    if frame_tx.send(Some(Arc::new(packet))).is_err() {
                        debug!("Frame receivers dropped, shutting down");
                        break;
                    }
                }
                Ok(None) => {
                    info!("Provider stream ended after {} frames", frame_count);
                    let _ = frame_tx.send(None);
                    break;
                }
                Err(e) => {
                    error_count += 1;
                    error!("Provider error ({}/{}): {}", error_count, MAX_ERRORS, e);

                    if error_count >= MAX_ERRORS {
                        error!("Too many provider errors, shutting down");
                        let _ = frame_tx.send(None);
                        break;
                    }

                    // 100ms, 200ms, 400ms, ... capped at 1.6s
                    let backoff = Duration::from_millis(50 * (1 << error_count.min(5)));
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(backoff) => {}
                    }
                }
            }
        }

        info!("Frame reader task ended (processed {} frames)", frame_count);
    }
}
