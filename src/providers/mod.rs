//! Snapshot providers
//!
//! [`LiveProvider`] polls a shared memory segment; [`ReplayProvider`] plays
//! back recorded snapshots. Both hand out [`FramePacket`](crate::types::FramePacket)s
//! through the [`Provider`](crate::provider::Provider) trait.

pub mod live;
pub mod replay;

pub use live::LiveProvider;
pub use replay::{DEFAULT_REPLAY_HZ, ReplayProvider};
