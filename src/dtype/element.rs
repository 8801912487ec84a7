//! Element trait for mapping Rust types to DType

use super::{DType, Scalar};
use bytemuck::Pod;
use std::fmt::Debug;

/// Trait for types that can be elements of an operand tensor
///
/// # Bounds
/// - `Copy + Send + Sync + 'static` - values cross rayon worker boundaries
/// - `Pod` - storage is a word buffer viewed through `bytemuck`
/// - `PartialOrd` - built-in comparators order values natively
pub trait Element: Copy + Send + Sync + Pod + PartialOrd + Debug + 'static {
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Unwrap a [`Scalar`] of exactly this type, `None` for any other dtype
    fn from_scalar(value: Scalar) -> Option<Self>;
}

macro_rules! impl_element {
    ($ty:ty, $variant:ident) => {
        impl Element for $ty {
            const DTYPE: DType = DType::$variant;

            #[inline]
            fn from_scalar(value: Scalar) -> Option<Self> {
                match value {
                    Scalar::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }

        impl From<$ty> for Scalar {
            #[inline]
            fn from(value: $ty) -> Self {
                Scalar::$variant(value)
            }
        }
    };
}

impl_element!(f64, F64);
impl_element!(f32, F32);
impl_element!(i64, I64);
impl_element!(i32, I32);
impl_element!(i16, I16);
impl_element!(i8, I8);
impl_element!(u64, U64);
impl_element!(u32, U32);
impl_element!(u16, U16);
impl_element!(u8, U8);

// ============================================================================
// Half-precision floating point types (requires "f16" feature)
// ============================================================================

#[cfg(feature = "f16")]
macro_rules! impl_half_element {
    ($ty:ty, $variant:ident) => {
        impl Element for $ty {
            const DTYPE: DType = DType::$variant;

            #[inline]
            fn from_scalar(value: Scalar) -> Option<Self> {
                match value {
                    Scalar::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }

        impl From<$ty> for Scalar {
            #[inline]
            fn from(value: $ty) -> Self {
                Scalar::$variant(value)
            }
        }
    };
}

#[cfg(feature = "f16")]
impl_half_element!(half::f16, F16);
#[cfg(feature = "f16")]
impl_half_element!(half::bf16, BF16);
