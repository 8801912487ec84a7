//! Storage: host memory with Arc-based sharing

use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use std::sync::Arc;

/// Host storage for tensor data
///
/// Backed by a `u64` word buffer so that every supported element type is
/// correctly aligned when viewed through `bytemuck`. Cloning shares the buffer.
#[derive(Clone)]
pub struct Storage {
    inner: Arc<StorageInner>,
}

struct StorageInner {
    words: Vec<u64>,
    /// Number of elements (not bytes)
    len: usize,
    dtype: DType,
}

#[inline]
fn words_for(len: usize, dtype: DType) -> usize {
    (len * dtype.size_in_bytes()).div_ceil(8)
}

impl Storage {
    /// Create storage from existing data with inferred dtype
    pub fn from_slice<T: Element>(data: &[T]) -> Self {
        Self::from_vec(data.to_vec())
    }

    /// Create storage that takes its elements from `data`
    pub fn from_vec<T: Element>(data: Vec<T>) -> Self {
        let len = data.len();
        let mut words = vec![0u64; words_for(len, T::DTYPE)];
        bytemuck::cast_slice_mut::<u64, T>(&mut words)[..len].copy_from_slice(&data);
        Self {
            inner: Arc::new(StorageInner {
                words,
                len,
                dtype: T::DTYPE,
            }),
        }
    }

    /// Create storage from raw little-endian-native bytes
    ///
    /// `bytes.len()` must be a whole number of `dtype` elements.
    pub fn from_bytes(bytes: &[u8], dtype: DType) -> Result<Self> {
        let elem_size = dtype.size_in_bytes();
        if bytes.len() % elem_size != 0 {
            return Err(Error::invalid_argument(
                "bytes",
                format!(
                    "{} bytes is not a whole number of {} elements",
                    bytes.len(),
                    dtype
                ),
            ));
        }
        let len = bytes.len() / elem_size;
        let mut words = vec![0u64; words_for(len, dtype)];
        bytemuck::cast_slice_mut::<u64, u8>(&mut words)[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            inner: Arc::new(StorageInner { words, len, dtype }),
        })
    }

    /// Number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len
    }

    /// Whether the storage holds no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.len == 0
    }

    /// Element type
    #[inline]
    pub fn dtype(&self) -> DType {
        self.inner.dtype
    }

    /// View the elements as `T`, failing if `T` is not the storage dtype
    pub fn as_slice<T: Element>(&self) -> Result<&[T]> {
        if T::DTYPE != self.inner.dtype {
            return Err(Error::DTypeMismatch {
                lhs: self.inner.dtype,
                rhs: T::DTYPE,
            });
        }
        Ok(&bytemuck::cast_slice::<u64, T>(&self.inner.words)[..self.inner.len])
    }

    /// View the raw bytes of the elements
    pub fn as_bytes(&self) -> &[u8] {
        let n = self.inner.len * self.inner.dtype.size_in_bytes();
        &bytemuck::cast_slice::<u64, u8>(&self.inner.words)[..n]
    }
}
