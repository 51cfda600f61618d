//! Typed extraction of field values from record bytes

use super::{Orientation, TireTemps, Vec3};
use crate::error::{DecodeError, DecodeResult};
use crate::schema::{Field, FieldSpec, FieldType};

/// A resolved field: where it lives in the buffer and how it is declared.
#[derive(Debug, Clone, Copy)]
pub struct FieldLocation {
    pub field: Field,
    /// Absolute byte offset in the record
    pub offset: usize,
    pub spec: &'static FieldSpec,
}

impl FieldLocation {
    pub(crate) fn mismatch<T>(&self) -> DecodeError {
        DecodeError::TypeMismatch {
            field: self.field,
            expected: std::any::type_name::<T>(),
            found: self.spec.ty,
            found_count: self.spec.count,
        }
    }

    /// Location of element `index` of an array field.
    pub fn element(&self, index: usize) -> DecodeResult<FieldLocation> {
        if index >= self.spec.count {
            return Err(DecodeError::IndexOutOfRange {
                field: self.field,
                index,
                len: self.spec.count,
            });
        }
        Ok(FieldLocation { offset: self.offset + index * self.spec.width, ..*self })
    }
}

/// A little-endian primitive stored in a record.
pub trait Scalar: Copy + Sized {
    const TYPE: FieldType;
    const SIZE: usize;

    fn read_le(bytes: &[u8]) -> Option<Self>;
}

impl Scalar for i32 {
    const TYPE: FieldType = FieldType::Int32;
    const SIZE: usize = 4;

    fn read_le(bytes: &[u8]) -> Option<Self> {
        Some(i32::from_le_bytes(bytes.get(..4)?.try_into().ok()?))
    }
}

impl Scalar for f32 {
    const TYPE: FieldType = FieldType::Float32;
    const SIZE: usize = 4;

    fn read_le(bytes: &[u8]) -> Option<Self> {
        Some(f32::from_le_bytes(bytes.get(..4)?.try_into().ok()?))
    }
}

impl Scalar for f64 {
    const TYPE: FieldType = FieldType::Float64;
    const SIZE: usize = 8;

    fn read_le(bytes: &[u8]) -> Option<Self> {
        Some(f64::from_le_bytes(bytes.get(..8)?.try_into().ok()?))
    }
}

/// Read a scalar at an absolute offset.
pub fn read_scalar<T: Scalar>(data: &[u8], offset: usize) -> DecodeResult<T> {
    data.get(offset..)
        .and_then(T::read_le)
        .ok_or(DecodeError::BufferTooSmall { required: offset + T::SIZE, actual: data.len() })
}

fn read_elements<T: Scalar>(data: &[u8], loc: &FieldLocation) -> DecodeResult<Vec<T>> {
    (0..loc.spec.count).map(|i| read_scalar(data, loc.offset + i * loc.spec.width)).collect()
}

fn read_fixed<T: Scalar, const N: usize>(data: &[u8], loc: &FieldLocation) -> DecodeResult<[T; N]> {
    if loc.spec.ty != T::TYPE || loc.spec.count != N {
        return Err(loc.mismatch::<[T; N]>());
    }
    let values = read_elements::<T>(data, loc)?;
    values.try_into().map_err(|_| loc.mismatch::<[T; N]>())
}

/// Types that can be extracted from a resolved field.
pub trait FieldData: Sized {
    fn from_field(data: &[u8], loc: &FieldLocation) -> DecodeResult<Self>;
}

macro_rules! impl_scalar_field_data {
    ($($ty:ty),*) => {
        $(
            impl FieldData for $ty {
                fn from_field(data: &[u8], loc: &FieldLocation) -> DecodeResult<Self> {
                    if loc.spec.ty != <$ty as Scalar>::TYPE || loc.spec.count != 1 {
                        return Err(loc.mismatch::<$ty>());
                    }
                    read_scalar(data, loc.offset)
                }
            }
        )*
    };
}

impl_scalar_field_data!(i32, f32, f64);

impl<T: Scalar, const N: usize> FieldData for [T; N] {
    fn from_field(data: &[u8], loc: &FieldLocation) -> DecodeResult<Self> {
        read_fixed(data, loc)
    }
}

impl<T: Scalar> FieldData for Vec<T> {
    fn from_field(data: &[u8], loc: &FieldLocation) -> DecodeResult<Self> {
        if loc.spec.ty != T::TYPE {
            return Err(loc.mismatch::<Vec<T>>());
        }
        read_elements(data, loc)
    }
}

impl<T: Scalar> FieldData for Vec3<T> {
    fn from_field(data: &[u8], loc: &FieldLocation) -> DecodeResult<Self> {
        read_fixed::<T, 3>(data, loc).map(Vec3::from_array)
    }
}

impl<T: Scalar> FieldData for Orientation<T> {
    fn from_field(data: &[u8], loc: &FieldLocation) -> DecodeResult<Self> {
        read_fixed::<T, 3>(data, loc).map(Orientation::from_array)
    }
}

impl FieldData for TireTemps {
    fn from_field(data: &[u8], loc: &FieldLocation) -> DecodeResult<Self> {
        read_fixed::<f32, 12>(data, loc).map(|values| TireTemps { values })
    }
}

/// NUL-terminated UTF-8; invalid sequences are replaced.
impl FieldData for String {
    fn from_field(data: &[u8], loc: &FieldLocation) -> DecodeResult<Self> {
        if loc.spec.ty != FieldType::Utf8 {
            return Err(loc.mismatch::<String>());
        }
        let bytes = data.get(loc.offset..loc.offset + loc.spec.width).ok_or(
            DecodeError::BufferTooSmall { required: loc.offset + loc.spec.width, actual: data.len() },
        )?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    static I32: FieldSpec = FieldSpec::i32("gear", Field::Gear, 0);
    static F32X3: FieldSpec = FieldSpec::f32_array("carCgLoc", Field::CarCgLocation, 0, 3);
    static NAME: FieldSpec = FieldSpec::utf8("name", Field::DriverName, 0, 8);

    fn loc(spec: &'static FieldSpec, offset: usize) -> FieldLocation {
        FieldLocation { field: spec.field.unwrap(), offset, spec }
    }

    proptest! {
        #[test]
        fn reads_i32_at_any_offset(value in any::<i32>(), offset in 0..64usize) {
            let mut data = vec![0u8; offset + 4];
            data[offset..].copy_from_slice(&value.to_le_bytes());
            prop_assert_eq!(i32::from_field(&data, &loc(&I32, offset)).unwrap(), value);
        }
    }

    #[test]
    fn reads_vectors_and_arrays() {
        let mut data = Vec::new();
        for v in [1.5f32, -2.0, 3.25] {
            data.extend_from_slice(&v.to_le_bytes());
        }
        let l = loc(&F32X3, 0);
        assert_eq!(Vec3::<f32>::from_field(&data, &l).unwrap(), Vec3 { x: 1.5, y: -2.0, z: 3.25 });
        assert_eq!(<[f32; 3]>::from_field(&data, &l).unwrap(), [1.5, -2.0, 3.25]);
        assert_eq!(Vec::<f32>::from_field(&data, &l).unwrap().len(), 3);
    }

    #[test]
    fn wrong_type_is_a_mismatch() {
        let data = [0u8; 16];
        let err = f32::from_field(&data, &loc(&I32, 0)).unwrap_err();
        assert!(matches!(err, DecodeError::TypeMismatch { found: FieldType::Int32, .. }));

        let err = <[f32; 4]>::from_field(&data, &loc(&F32X3, 0)).unwrap_err();
        assert!(matches!(err, DecodeError::TypeMismatch { found_count: 3, .. }));

        assert!(f64::from_field(&data, &loc(&F32X3, 0)).is_err());
    }

    #[test]
    fn strings_stop_at_nul() {
        let data = *b"Zolder\0\xff";
        assert_eq!(String::from_field(&data, &loc(&NAME, 0)).unwrap(), "Zolder");

        let data = *b"Nordschl";
        assert_eq!(String::from_field(&data, &loc(&NAME, 0)).unwrap(), "Nordschl");
    }

    #[test]
    fn short_buffers_never_panic() {
        let data = [0u8; 2];
        let err = i32::from_field(&data, &loc(&I32, 0)).unwrap_err();
        assert_eq!(err, DecodeError::BufferTooSmall { required: 4, actual: 2 });
    }

    #[test]
    fn element_bounds() {
        let l = loc(&F32X3, 8);
        assert_eq!(l.element(2).unwrap().offset, 16);
        assert_eq!(
            l.element(3).unwrap_err(),
            DecodeError::IndexOutOfRange { field: Field::CarCgLocation, index: 3, len: 3 }
        );
    }
}
