//! Fixed byte layouts and field descriptors

use std::collections::HashMap;

use super::{Field, FieldType, SchemaVersion};
use crate::TelemetryError;

/// One field of a fixed layout.
///
/// `offset` is relative to the start of the enclosing layout. Arrays are
/// described by `count > 1`; `width` is the byte size of a single element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Name as declared by the revision (`engineRps`, `engine_rps`, ...)
    pub name: &'static str,
    /// Semantic identifier, `None` for padding and reserved filler
    pub field: Option<Field>,
    pub ty: FieldType,
    pub offset: usize,
    pub width: usize,
    pub count: usize,
    /// Layout of a composite element
    pub nested: Option<&'static Layout>,
}

impl FieldSpec {
    const fn scalar(
        name: &'static str,
        field: Field,
        ty: FieldType,
        offset: usize,
        width: usize,
        count: usize,
    ) -> Self {
        Self { name, field: Some(field), ty, offset, width, count, nested: None }
    }

    pub const fn i32(name: &'static str, field: Field, offset: usize) -> Self {
        Self::scalar(name, field, FieldType::Int32, offset, 4, 1)
    }

    pub const fn f32(name: &'static str, field: Field, offset: usize) -> Self {
        Self::scalar(name, field, FieldType::Float32, offset, 4, 1)
    }

    pub const fn f64(name: &'static str, field: Field, offset: usize) -> Self {
        Self::scalar(name, field, FieldType::Float64, offset, 8, 1)
    }

    pub const fn f32_array(name: &'static str, field: Field, offset: usize, count: usize) -> Self {
        Self::scalar(name, field, FieldType::Float32, offset, 4, count)
    }

    pub const fn f64_array(name: &'static str, field: Field, offset: usize, count: usize) -> Self {
        Self::scalar(name, field, FieldType::Float64, offset, 8, count)
    }

    /// Fixed-size UTF-8 string of `len` bytes.
    pub const fn utf8(name: &'static str, field: Field, offset: usize, len: usize) -> Self {
        Self::scalar(name, field, FieldType::Utf8, offset, len, 1)
    }

    pub const fn reserved(name: &'static str, offset: usize, len: usize) -> Self {
        Self { name, field: None, ty: FieldType::Reserved, offset, width: len, count: 1, nested: None }
    }

    pub const fn padding(offset: usize, len: usize) -> Self {
        Self {
            name: "",
            field: None,
            ty: FieldType::Padding,
            offset,
            width: len,
            count: 1,
            nested: None,
        }
    }

    pub const fn composite(
        name: &'static str,
        field: Field,
        offset: usize,
        layout: &'static Layout,
    ) -> Self {
        Self::composite_array(name, field, offset, layout, 1)
    }

    pub const fn composite_array(
        name: &'static str,
        field: Field,
        offset: usize,
        layout: &'static Layout,
        count: usize,
    ) -> Self {
        Self {
            name,
            field: Some(field),
            ty: FieldType::Composite,
            offset,
            width: layout.size,
            count,
            nested: Some(layout),
        }
    }

    /// Total byte size (`width * count`).
    pub const fn size(&self) -> usize {
        self.width * self.count
    }

    /// Byte offset of element `index`, relative to the enclosing layout.
    pub const fn element_offset(&self, index: usize) -> usize {
        self.offset + index * self.width
    }

    /// Whether lookups descend into this field without an index.
    fn is_transparent(&self) -> bool {
        self.count == 1 && self.nested.is_some()
    }
}

/// A packed, fixed-size byte layout.
#[derive(Debug, PartialEq, Eq)]
pub struct Layout {
    pub name: &'static str,
    pub size: usize,
    pub fields: &'static [FieldSpec],
}

impl Layout {
    /// Locate a field in this layout's resolution scope.
    ///
    /// Returns the field's absolute offset from the start of this layout.
    /// Composites with a single element are searched recursively; arrays of
    /// composites (the driver slots) are a scope of their own.
    pub fn resolve(&'static self, field: Field) -> Option<(usize, &'static FieldSpec)> {
        self.find(|spec| spec.field == Some(field))
    }

    /// Locate a field by the name the revision declares for it.
    pub fn field_by_name(&'static self, name: &str) -> Option<(usize, &'static FieldSpec)> {
        self.find(|spec| spec.field.is_some() && spec.name == name)
    }

    fn find(
        &'static self,
        pred: impl Fn(&FieldSpec) -> bool + Copy,
    ) -> Option<(usize, &'static FieldSpec)> {
        for spec in self.fields {
            if pred(spec) {
                return Some((spec.offset, spec));
            }
            if spec.is_transparent()
                && let Some(nested) = spec.nested
                && let Some((offset, found)) = nested.find(pred)
            {
                return Some((spec.offset + offset, found));
            }
        }
        None
    }

    /// Every data field of the resolution scope with its absolute offset,
    /// in layout order. Composites are listed before their members.
    pub fn flatten(&'static self) -> Vec<(usize, &'static FieldSpec)> {
        let mut out = Vec::new();
        self.flatten_into(0, &mut out);
        out
    }

    fn flatten_into(&'static self, base: usize, out: &mut Vec<(usize, &'static FieldSpec)>) {
        for spec in self.fields {
            if spec.field.is_none() {
                continue;
            }
            out.push((base + spec.offset, spec));
            if spec.is_transparent()
                && let Some(nested) = spec.nested
            {
                nested.flatten_into(base + spec.offset, out);
            }
        }
    }

    /// Check the structural invariants of this layout and everything nested
    /// in it: contiguous fields from 0 to `size`, correct scalar widths,
    /// composite widths matching their nested layout, and unique field
    /// identifiers per resolution scope.
    pub fn validate(&'static self, version: Option<SchemaVersion>) -> crate::Result<()> {
        let fail = |reason: String| {
            Err(TelemetryError::schema_validation_error(
                format!("layout '{}': {}", self.name, reason),
                version,
            ))
        };

        if self.fields.is_empty() {
            return fail("no fields".to_string());
        }

        let mut expected = 0usize;
        for spec in self.fields {
            if spec.offset != expected {
                return fail(format!(
                    "field '{}' starts at {} but previous field ends at {}",
                    spec.name, spec.offset, expected
                ));
            }
            if spec.width == 0 || spec.count == 0 {
                return fail(format!("field '{}' has zero size", spec.name));
            }
            if let Some(size) = spec.ty.scalar_size()
                && size != spec.width
            {
                return fail(format!(
                    "field '{}' is {:?} but declares width {}",
                    spec.name, spec.ty, spec.width
                ));
            }
            match (spec.ty, spec.nested) {
                (FieldType::Composite, Some(nested)) => {
                    if nested.size != spec.width {
                        return fail(format!(
                            "composite '{}' width {} does not match layout '{}' size {}",
                            spec.name, spec.width, nested.name, nested.size
                        ));
                    }
                    nested.validate(version)?;
                }
                (FieldType::Composite, None) => {
                    return fail(format!("composite '{}' has no nested layout", spec.name));
                }
                (_, Some(_)) => {
                    return fail(format!("scalar '{}' carries a nested layout", spec.name));
                }
                _ => {}
            }
            if spec.ty.is_data() != spec.field.is_some() {
                return fail(format!("field '{}' has inconsistent identifier", spec.name));
            }
            expected += spec.size();
        }

        if expected != self.size {
            return fail(format!("fields cover {} bytes, layout declares {}", expected, self.size));
        }

        let mut seen: HashMap<Field, &'static str> = HashMap::new();
        for (_, spec) in self.flatten() {
            if let Some(field) = spec.field
                && let Some(previous) = seen.insert(field, spec.name)
            {
                return fail(format!(
                    "field {} declared twice ('{}' and '{}')",
                    field, previous, spec.name
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static INNER: Layout = Layout {
        name: "inner",
        size: 8,
        fields: &[FieldSpec::i32("a", Field::FlagYellow, 0), FieldSpec::f32("b", Field::FlagBlue, 4)],
    };

    static OUTER: Layout = Layout {
        name: "outer",
        size: 20,
        fields: &[
            FieldSpec::i32("gear", Field::Gear, 0),
            FieldSpec::reserved("_padding1", 4, 4),
            FieldSpec::composite("flags", Field::Flags, 8, &INNER),
            FieldSpec::f32("rps", Field::EngineRps, 16),
        ],
    };

    static ARRAY: Layout = Layout {
        name: "array",
        size: 20,
        fields: &[
            FieldSpec::i32("gear", Field::Gear, 0),
            FieldSpec::composite_array("slots", Field::Drivers, 4, &INNER, 2),
        ],
    };

    static GAP: Layout = Layout {
        name: "gap",
        size: 12,
        fields: &[FieldSpec::i32("gear", Field::Gear, 0), FieldSpec::f32("rps", Field::EngineRps, 8)],
    };

    static SHORT: Layout = Layout {
        name: "short",
        size: 12,
        fields: &[FieldSpec::i32("gear", Field::Gear, 0), FieldSpec::f32("rps", Field::EngineRps, 4)],
    };

    static DUPLICATE: Layout = Layout {
        name: "duplicate",
        size: 12,
        fields: &[
            FieldSpec::i32("a", Field::FlagYellow, 0),
            FieldSpec::composite("flags", Field::Flags, 4, &INNER),
        ],
    };

    #[test]
    fn resolves_nested_fields_with_absolute_offsets() {
        let (offset, spec) = OUTER.resolve(Field::FlagBlue).unwrap();
        assert_eq!(offset, 12);
        assert_eq!(spec.ty, FieldType::Float32);

        let (offset, _) = OUTER.resolve(Field::EngineRps).unwrap();
        assert_eq!(offset, 16);
        assert!(OUTER.resolve(Field::TrackName).is_none());
    }

    #[test]
    fn arrays_of_composites_are_separate_scopes() {
        assert!(ARRAY.resolve(Field::FlagYellow).is_none());
        let (offset, spec) = ARRAY.resolve(Field::Drivers).unwrap();
        assert_eq!(offset, 4);
        assert_eq!(spec.element_offset(1), 12);
    }

    #[test]
    fn finds_fields_by_declared_name() {
        let (offset, spec) = OUTER.field_by_name("b").unwrap();
        assert_eq!(offset, 12);
        assert_eq!(spec.field, Some(Field::FlagBlue));
        assert!(OUTER.field_by_name("_padding1").is_none());
    }

    #[test]
    fn flatten_lists_composite_before_members() {
        let fields: Vec<_> = OUTER.flatten().iter().filter_map(|(_, s)| s.field).collect();
        assert_eq!(
            fields,
            vec![Field::Gear, Field::Flags, Field::FlagYellow, Field::FlagBlue, Field::EngineRps]
        );
    }

    #[test]
    fn valid_layouts_pass() {
        OUTER.validate(None).unwrap();
        ARRAY.validate(None).unwrap();
    }

    #[test]
    fn rejects_gaps_short_layouts_and_duplicates() {
        let err = GAP.validate(None).unwrap_err().to_string();
        assert!(err.contains("starts at 8"), "{err}");

        let err = SHORT.validate(None).unwrap_err().to_string();
        assert!(err.contains("cover 8 bytes"), "{err}");

        let err = DUPLICATE.validate(None).unwrap_err().to_string();
        assert!(err.contains("declared twice"), "{err}");
    }
}
