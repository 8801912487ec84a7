//! Dynamically typed scalar values

use super::DType;
use std::cmp::Ordering;
use std::fmt;

/// A single value of any supported dtype.
///
/// Used for the per-operand init values of a reduction and for the tuples handed
/// to a [`Comparator`](crate::ops::Comparator): position `i` of a tuple holds the
/// value of operand `i`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Scalar {
    /// 64-bit floating point
    F64(f64),
    /// 32-bit floating point
    F32(f32),
    /// 16-bit floating point
    #[cfg(feature = "f16")]
    F16(half::f16),
    /// 16-bit brain floating point
    #[cfg(feature = "f16")]
    BF16(half::bf16),
    /// 64-bit signed integer
    I64(i64),
    /// 32-bit signed integer
    I32(i32),
    /// 16-bit signed integer
    I16(i16),
    /// 8-bit signed integer
    I8(i8),
    /// 64-bit unsigned integer
    U64(u64),
    /// 32-bit unsigned integer
    U32(u32),
    /// 16-bit unsigned integer
    U16(u16),
    /// 8-bit unsigned integer
    U8(u8),
}

impl Scalar {
    /// The dtype of the wrapped value
    pub const fn dtype(&self) -> DType {
        match self {
            Self::F64(_) => DType::F64,
            Self::F32(_) => DType::F32,
            #[cfg(feature = "f16")]
            Self::F16(_) => DType::F16,
            #[cfg(feature = "f16")]
            Self::BF16(_) => DType::BF16,
            Self::I64(_) => DType::I64,
            Self::I32(_) => DType::I32,
            Self::I16(_) => DType::I16,
            Self::I8(_) => DType::I8,
            Self::U64(_) => DType::U64,
            Self::U32(_) => DType::U32,
            Self::U16(_) => DType::U16,
            Self::U8(_) => DType::U8,
        }
    }

    /// Convert to f64 (lossy for 64-bit integers beyond 2^53)
    pub fn to_f64(self) -> f64 {
        match self {
            Self::F64(v) => v,
            Self::F32(v) => v as f64,
            #[cfg(feature = "f16")]
            Self::F16(v) => v.to_f64(),
            #[cfg(feature = "f16")]
            Self::BF16(v) => v.to_f64(),
            Self::I64(v) => v as f64,
            Self::I32(v) => v as f64,
            Self::I16(v) => v as f64,
            Self::I8(v) => v as f64,
            Self::U64(v) => v as f64,
            Self::U32(v) => v as f64,
            Self::U16(v) => v as f64,
            Self::U8(v) => v as f64,
        }
    }

    /// Lowest value of `dtype`: negative infinity for floats, `MIN` for integers.
    ///
    /// This is the identity of a "largest" top-1 reduction.
    pub fn lowest(dtype: DType) -> Self {
        match dtype {
            DType::F64 => Self::F64(f64::NEG_INFINITY),
            DType::F32 => Self::F32(f32::NEG_INFINITY),
            #[cfg(feature = "f16")]
            DType::F16 => Self::F16(half::f16::NEG_INFINITY),
            #[cfg(feature = "f16")]
            DType::BF16 => Self::BF16(half::bf16::NEG_INFINITY),
            DType::I64 => Self::I64(i64::MIN),
            DType::I32 => Self::I32(i32::MIN),
            DType::I16 => Self::I16(i16::MIN),
            DType::I8 => Self::I8(i8::MIN),
            DType::U64 => Self::U64(u64::MIN),
            DType::U32 => Self::U32(u32::MIN),
            DType::U16 => Self::U16(u16::MIN),
            DType::U8 => Self::U8(u8::MIN),
        }
    }

    /// Highest value of `dtype`: positive infinity for floats, `MAX` for integers.
    ///
    /// This is the identity of a "smallest" top-1 reduction.
    pub fn highest(dtype: DType) -> Self {
        match dtype {
            DType::F64 => Self::F64(f64::INFINITY),
            DType::F32 => Self::F32(f32::INFINITY),
            #[cfg(feature = "f16")]
            DType::F16 => Self::F16(half::f16::INFINITY),
            #[cfg(feature = "f16")]
            DType::BF16 => Self::BF16(half::bf16::INFINITY),
            DType::I64 => Self::I64(i64::MAX),
            DType::I32 => Self::I32(i32::MAX),
            DType::I16 => Self::I16(i16::MAX),
            DType::I8 => Self::I8(i8::MAX),
            DType::U64 => Self::U64(u64::MAX),
            DType::U32 => Self::U32(u32::MAX),
            DType::U16 => Self::U16(u16::MAX),
            DType::U8 => Self::U8(u8::MAX),
        }
    }

    /// Compare two scalars by value.
    ///
    /// Same-dtype pairs compare natively, so 64-bit integers keep full precision.
    /// Mixed dtypes compare through f64. `None` when either side is NaN.
    pub fn compare(&self, other: &Scalar) -> Option<Ordering> {
        match (self, other) {
            (Self::F64(a), Self::F64(b)) => a.partial_cmp(b),
            (Self::F32(a), Self::F32(b)) => a.partial_cmp(b),
            #[cfg(feature = "f16")]
            (Self::F16(a), Self::F16(b)) => a.partial_cmp(b),
            #[cfg(feature = "f16")]
            (Self::BF16(a), Self::BF16(b)) => a.partial_cmp(b),
            (Self::I64(a), Self::I64(b)) => a.partial_cmp(b),
            (Self::I32(a), Self::I32(b)) => a.partial_cmp(b),
            (Self::I16(a), Self::I16(b)) => a.partial_cmp(b),
            (Self::I8(a), Self::I8(b)) => a.partial_cmp(b),
            (Self::U64(a), Self::U64(b)) => a.partial_cmp(b),
            (Self::U32(a), Self::U32(b)) => a.partial_cmp(b),
            (Self::U16(a), Self::U16(b)) => a.partial_cmp(b),
            (Self::U8(a), Self::U8(b)) => a.partial_cmp(b),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::F64(v) => write!(f, "{v}"),
            Self::F32(v) => write!(f, "{v}"),
            #[cfg(feature = "f16")]
            Self::F16(v) => write!(f, "{v}"),
            #[cfg(feature = "f16")]
            Self::BF16(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::I8(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::U16(v) => write!(f, "{v}"),
            Self::U8(v) => write!(f, "{v}"),
        }
    }
}
