//! Core Tensor type

use super::{Shape, Storage};
use crate::dtype::{DType, Element, Scalar, dispatch_dtype};
use crate::error::{Error, Result};
use std::fmt;

/// N-dimensional, contiguous, row-major host array
///
/// Cloning is cheap: the underlying storage is shared.
#[derive(Clone)]
pub struct Tensor {
    shape: Shape,
    storage: Storage,
}

impl Tensor {
    // ===== Tensor Creation =====

    /// Create a tensor from a slice of data
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` does not equal the product of the `shape` dimensions.
    /// For a fallible alternative, use [`Self::try_from_slice`].
    ///
    /// # Example
    ///
    /// ```
    /// # use numr_approx_topk::tensor::Tensor;
    /// let tensor = Tensor::from_slice(&[1.0f32, 2.0, 3.0, 4.0], &[2, 2]);
    /// assert_eq!(tensor.shape(), &[2, 2]);
    /// ```
    pub fn from_slice<T: Element>(data: &[T], shape: &[usize]) -> Self {
        Self::try_from_slice(data, shape).expect("Tensor::from_slice failed")
    }

    /// Create a tensor from a slice of data (fallible version)
    ///
    /// Returns an error if `data.len()` does not equal the product of the `shape` dimensions.
    pub fn try_from_slice<T: Element>(data: &[T], shape: &[usize]) -> Result<Self> {
        Self::try_from_vec(data.to_vec(), shape)
    }

    /// Create a tensor that takes ownership of `data`
    pub fn try_from_vec<T: Element>(data: Vec<T>, shape: &[usize]) -> Result<Self> {
        let expected_len: usize = shape.iter().product();
        if data.len() != expected_len {
            return Err(Error::shape_mismatch(shape, &[data.len()]));
        }
        Ok(Self {
            shape: Shape::from(shape),
            storage: Storage::from_vec(data),
        })
    }

    /// Create a tensor from raw native-endian bytes of `dtype` elements
    pub fn from_bytes(bytes: &[u8], shape: &[usize], dtype: DType) -> Result<Self> {
        let storage = Storage::from_bytes(bytes, dtype)?;
        let expected_len: usize = shape.iter().product();
        if storage.len() != expected_len {
            return Err(Error::shape_mismatch(shape, &[storage.len()]));
        }
        Ok(Self {
            shape: Shape::from(shape),
            storage,
        })
    }

    // ===== Accessors =====

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.shape.as_slice()
    }

    /// Number of dimensions
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.ndim()
    }

    /// Total number of elements
    #[inline]
    pub fn numel(&self) -> usize {
        self.storage.len()
    }

    /// Get the element type
    #[inline]
    pub fn dtype(&self) -> DType {
        self.storage.dtype()
    }

    // ===== Data Access =====

    /// Borrow the elements as `T` in row-major order
    pub fn as_slice<T: Element>(&self) -> Result<&[T]> {
        self.storage.as_slice()
    }

    /// Copy tensor data to a Vec
    ///
    /// # Panics
    ///
    /// Panics if `T` is not the tensor's dtype. Use [`Self::as_slice`] for a
    /// fallible view.
    pub fn to_vec<T: Element>(&self) -> Vec<T> {
        match self.as_slice::<T>() {
            Ok(data) => data.to_vec(),
            Err(e) => panic!("Tensor::to_vec failed: {e}"),
        }
    }

    /// Raw native-endian bytes of the elements
    pub fn as_bytes(&self) -> &[u8] {
        self.storage.as_bytes()
    }

    /// Element at a row-major flat index, `None` when out of range
    pub fn get_scalar(&self, index: usize) -> Option<Scalar> {
        if index >= self.numel() {
            return None;
        }
        Some(self.scalar_view().get(index))
    }

    /// Dynamically typed read-only view used by the kernels
    pub(crate) fn scalar_view(&self) -> ScalarView<'_> {
        dispatch_dtype!(self.dtype(), T => {
            match self.storage.as_slice::<T>() {
                Ok(data) => ScalarView::from(data),
                Err(_) => unreachable!("tensor dtype drives the dispatch"),
            }
        })
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape())
            .field("dtype", &self.dtype())
            .finish()
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tensor({:?}, dtype={})", self.shape(), self.dtype())
    }
}

// ============================================================================
// Scalar view
// ============================================================================

/// Borrowed typed slice that reads elements as [`Scalar`]s
#[derive(Copy, Clone)]
pub(crate) enum ScalarView<'a> {
    F64(&'a [f64]),
    F32(&'a [f32]),
    #[cfg(feature = "f16")]
    F16(&'a [half::f16]),
    #[cfg(feature = "f16")]
    BF16(&'a [half::bf16]),
    I64(&'a [i64]),
    I32(&'a [i32]),
    I16(&'a [i16]),
    I8(&'a [i8]),
    U64(&'a [u64]),
    U32(&'a [u32]),
    U16(&'a [u16]),
    U8(&'a [u8]),
}

impl ScalarView<'_> {
    #[inline]
    pub(crate) fn get(&self, index: usize) -> Scalar {
        match self {
            Self::F64(s) => Scalar::F64(s[index]),
            Self::F32(s) => Scalar::F32(s[index]),
            #[cfg(feature = "f16")]
            Self::F16(s) => Scalar::F16(s[index]),
            #[cfg(feature = "f16")]
            Self::BF16(s) => Scalar::BF16(s[index]),
            Self::I64(s) => Scalar::I64(s[index]),
            Self::I32(s) => Scalar::I32(s[index]),
            Self::I16(s) => Scalar::I16(s[index]),
            Self::I8(s) => Scalar::I8(s[index]),
            Self::U64(s) => Scalar::U64(s[index]),
            Self::U32(s) => Scalar::U32(s[index]),
            Self::U16(s) => Scalar::U16(s[index]),
            Self::U8(s) => Scalar::U8(s[index]),
        }
    }
}

macro_rules! impl_view_from {
    ($ty:ty, $variant:ident) => {
        impl<'a> From<&'a [$ty]> for ScalarView<'a> {
            #[inline]
            fn from(data: &'a [$ty]) -> Self {
                Self::$variant(data)
            }
        }
    };
}

impl_view_from!(f64, F64);
impl_view_from!(f32, F32);
#[cfg(feature = "f16")]
impl_view_from!(half::f16, F16);
#[cfg(feature = "f16")]
impl_view_from!(half::bf16, BF16);
impl_view_from!(i64, I64);
impl_view_from!(i32, I32);
impl_view_from!(i16, I16);
impl_view_from!(i8, I8);
impl_view_from!(u64, U64);
impl_view_from!(u32, U32);
impl_view_from!(u16, U16);
impl_view_from!(u8, U8);
