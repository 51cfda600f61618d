//! Frame adapter trait for type-safe telemetry extraction

use crate::record::TelemetryRecord;
use crate::schema::SchemaEntry;

use super::AdapterValidation;

/// Dual-phase frame adapter: validation once per schema revision, extraction per frame.
///
/// `validate()` runs the first time a revision is seen on a connection and its
/// plan is cached; `adapt()` runs for every delivered frame of that revision.
/// A revision that fails validation is skipped by the subscription rather than
/// ending it, so an adapter that needs a 1.7-only field simply receives nothing
/// from a 1.6 producer.
pub trait FrameAdapter: Sized {
    /// Check that `entry` provides what the adapter needs and build the
    /// extraction plan.
    ///
    /// # Performance
    /// Called once per revision per subscription, not per frame.
    fn validate(entry: &'static SchemaEntry) -> crate::Result<AdapterValidation>;

    /// Build `Self` from one frame using the pre-validated plan.
    ///
    /// `record` is always of the revision `validation` was built for.
    fn adapt(record: &TelemetryRecord<'_>, validation: &AdapterValidation) -> Self;
}
