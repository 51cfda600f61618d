//! Runtime field values for dynamic access

use serde::{Deserialize, Serialize};

use super::field_data::{FieldData, FieldLocation, read_scalar};
use crate::error::DecodeResult;
use crate::schema::FieldType;

/// Any decoded field value, for callers that do not know the type upfront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum Value {
    Int32(i32),
    Float32(f32),
    Float64(f64),
    Text(String),
    Array(Vec<Value>),
    /// Members of a nested group, in layout order
    Composite(Vec<(crate::schema::Field, Value)>),
}

impl Value {
    /// Decode a resolved field into a [`Value`], recursing into composites.
    pub fn from_field(data: &[u8], loc: &FieldLocation) -> DecodeResult<Value> {
        if loc.spec.count > 1 {
            return (0..loc.spec.count)
                .map(|i| {
                    let element = loc.element(i)?;
                    Self::single(data, &element)
                })
                .collect::<DecodeResult<Vec<_>>>()
                .map(Value::Array);
        }
        Self::single(data, loc)
    }

    fn single(data: &[u8], loc: &FieldLocation) -> DecodeResult<Value> {
        Ok(match loc.spec.ty {
            FieldType::Int32 => Value::Int32(read_scalar(data, loc.offset)?),
            FieldType::Float32 => Value::Float32(read_scalar(data, loc.offset)?),
            FieldType::Float64 => Value::Float64(read_scalar(data, loc.offset)?),
            FieldType::Utf8 => Value::Text(String::from_field(data, loc)?),
            FieldType::Composite => {
                let mut members = Vec::new();
                if let Some(layout) = loc.spec.nested {
                    for spec in layout.fields {
                        if let Some(field) = spec.field {
                            let member =
                                FieldLocation { field, offset: loc.offset + spec.offset, spec };
                            members.push((field, Self::from_field(data, &member)?));
                        }
                    }
                }
                Value::Composite(members)
            }
            FieldType::Reserved | FieldType::Padding => Value::Array(Vec::new()),
        })
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int32(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric value widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int32(v) => Some(*v as f64),
            Value::Float32(v) => Some(*v as f64),
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Member of a composite value.
    pub fn member(&self, field: crate::schema::Field) -> Option<&Value> {
        match self {
            Value::Composite(members) => {
                members.iter().find(|(f, _)| *f == field).map(|(_, value)| value)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, tables};

    #[test]
    fn composite_members_in_layout_order() {
        let mut data = vec![0u8; 20];
        for (i, chunk) in data.chunks_mut(4).enumerate() {
            chunk.copy_from_slice(&(i as i32 + 1).to_le_bytes());
        }
        let spec = &tables::R3E_1_7.fields[25];
        assert_eq!(spec.field, Some(Field::Penalties));

        let loc = FieldLocation { field: Field::Penalties, offset: 0, spec };
        let value = Value::from_field(&data, &loc).unwrap();
        assert_eq!(value.member(Field::PenaltyDriveThrough), Some(&Value::Int32(1)));
        assert_eq!(value.member(Field::PenaltySlowDown), Some(&Value::Int32(5)));
        assert_eq!(value.member(Field::Gear), None);
    }

    #[test]
    fn arrays_become_value_arrays() {
        let data: Vec<u8> = [1.0f32, 2.0, 3.0].iter().flat_map(|v| v.to_le_bytes()).collect();
        let spec = &tables::LEGACY_V2.fields[20];
        assert_eq!(spec.field, Some(Field::CarCgLocation));

        let loc = FieldLocation { field: Field::CarCgLocation, offset: 0, spec };
        let value = Value::from_field(&data, &loc).unwrap();
        assert_eq!(
            value,
            Value::Array(vec![Value::Float32(1.0), Value::Float32(2.0), Value::Float32(3.0)])
        );
    }

    #[test]
    fn numeric_widening() {
        assert_eq!(Value::Int32(-1).as_f64(), Some(-1.0));
        assert_eq!(Value::Text("x".into()).as_f64(), None);
        assert_eq!(Value::Text("Spa".into()).as_str(), Some("Spa"));
    }
}
