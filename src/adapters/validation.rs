//! Validation types and field extraction strategies for adapters

use std::collections::HashMap;

use crate::schema::{Field, SchemaEntry, SchemaVersion};
use crate::types::{FieldData, FieldLocation};
use crate::record::TelemetryRecord;
use crate::{Result, TelemetryError};

/// Pre-computed extraction plan for one schema revision.
///
/// Built with [`require`](Self::require) and [`optional`](Self::optional)
/// while validating, then consulted on every frame. Lookups go through the
/// resolved [`FieldLocation`]s, never through the layout tables.
#[derive(Debug, Clone)]
pub struct AdapterValidation {
    entry: &'static SchemaEntry,
    /// Ordered list of field extraction operations
    pub extraction_plan: Vec<FieldExtraction>,
    index_map: HashMap<Field, usize>,
}

impl AdapterValidation {
    /// An empty plan for `entry`.
    pub fn new(entry: &'static SchemaEntry) -> Self {
        Self { entry, extraction_plan: Vec::new(), index_map: HashMap::new() }
    }

    /// Add a field the adapter cannot work without.
    ///
    /// Fails with [`TelemetryError::SchemaValidation`] when the revision does
    /// not provide it.
    pub fn require(mut self, field: Field) -> Result<Self> {
        let Some(location) = self.resolve(field) else {
            return Err(TelemetryError::schema_validation_error(
                format!("required field '{field}' is not provided by revision {}", self.entry.version),
                Some(self.entry.version),
            ));
        };
        self.push(FieldExtraction::Required { field, location });
        Ok(self)
    }

    /// Add a field the adapter reads when present.
    pub fn optional(mut self, field: Field) -> Self {
        let location = self.resolve(field);
        self.push(FieldExtraction::Optional { field, location });
        self
    }

    fn resolve(&self, field: Field) -> Option<FieldLocation> {
        self.entry.layout.resolve(field).map(|(offset, spec)| FieldLocation { field, offset, spec })
    }

    fn push(&mut self, extraction: FieldExtraction) {
        self.index_map.insert(extraction.field(), self.extraction_plan.len());
        self.extraction_plan.push(extraction);
    }

    /// Revision this plan was built for
    pub fn version(&self) -> SchemaVersion {
        self.entry.version
    }

    pub fn entry(&self) -> &'static SchemaEntry {
        self.entry
    }

    /// Get the number of fields that will be extracted.
    pub fn field_count(&self) -> usize {
        self.extraction_plan.len()
    }

    /// Check if the validation plan contains any required fields.
    pub fn has_required_fields(&self) -> bool {
        self.extraction_plan.iter().any(FieldExtraction::is_required)
    }

    /// Lookup the extraction index for a field.
    pub fn index_of(&self, field: Field) -> Option<usize> {
        self.index_map.get(&field).copied()
    }

    /// Resolved location of a planned field, `None` when unplanned or absent.
    pub fn location(&self, field: Field) -> Option<&FieldLocation> {
        self.index_of(field)
            .and_then(|index| self.extraction_plan.get(index))
            .and_then(FieldExtraction::location)
    }

    /// Read a planned field. `None` when it is absent from the revision, not
    /// part of the plan, or not readable as `T`.
    pub fn fetch<T: FieldData>(&self, record: &TelemetryRecord<'_>, field: Field) -> Option<T> {
        let location = self.location(field)?;
        T::from_field(record.as_bytes(), location).ok()
    }

    /// [`fetch`](Self::fetch), falling back to `T::default()`.
    pub fn fetch_or_default<T>(&self, record: &TelemetryRecord<'_>, field: Field) -> T
    where
        T: FieldData + Default,
    {
        self.fetch(record, field).unwrap_or_default()
    }
}

/// Extraction strategy for a single adapter field.
#[derive(Debug, Clone)]
pub enum FieldExtraction {
    /// Field that must exist; validation fails otherwise.
    Required {
        field: Field,
        location: FieldLocation,
    },

    /// Field that may be missing from the revision.
    Optional {
        field: Field,
        /// Resolved location if the revision has the field
        location: Option<FieldLocation>,
    },
}

impl FieldExtraction {
    pub fn field(&self) -> Field {
        match self {
            FieldExtraction::Required { field, .. } | FieldExtraction::Optional { field, .. } => *field,
        }
    }

    /// Check if this field extraction requires the field to exist in the schema.
    pub fn is_required(&self) -> bool {
        matches!(self, FieldExtraction::Required { .. })
    }

    pub fn location(&self) -> Option<&FieldLocation> {
        match self {
            FieldExtraction::Required { location, .. } => Some(location),
            FieldExtraction::Optional { location, .. } => location.as_ref(),
        }
    }
}
