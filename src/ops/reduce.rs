//! Reduction axis helpers
//!
//! Every kernel in this crate walks a contiguous tensor as
//! `[outer, axis, inner]`: the product of the dimensions before the reduction
//! axis, the axis itself, and the product of the dimensions after it.

/// Normalize a dimension index, supporting negative indexing.
///
/// Returns `None` if the dimension is out of bounds.
#[inline]
pub fn normalize_dim(dim: isize, ndim: usize) -> Option<usize> {
    if ndim == 0 {
        return None;
    }
    let idx = if dim < 0 {
        let adjusted = ndim as isize + dim;
        if adjusted < 0 {
            return None;
        }
        adjusted as usize
    } else {
        dim as usize
    };
    if idx < ndim { Some(idx) } else { None }
}

/// Split `shape` around `dim` into `(outer_size, dim_size, inner_size)`.
#[inline]
pub fn compute_reduce_strides(shape: &[usize], dim: usize) -> (usize, usize, usize) {
    let outer_size: usize = shape[..dim].iter().product();
    let dim_size = shape[dim];
    let inner_size: usize = shape[dim + 1..].iter().product();
    (outer_size, dim_size, inner_size)
}

/// Flat row-major offset of `(outer, pos, inner)` in an `[outer, dim_size, inner_size]` block.
#[inline]
pub(crate) fn flat_index(
    outer: usize,
    pos: usize,
    inner: usize,
    dim_size: usize,
    inner_size: usize,
) -> usize {
    (outer * dim_size + pos) * inner_size + inner
}

/// Output shape of a top-k style reduction: `dim` is replaced by `out_size`.
pub fn topk_output_shape(input_shape: &[usize], dim: usize, out_size: usize) -> Vec<usize> {
    let mut out = input_shape.to_vec();
    out[dim] = out_size;
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_dim() {
        assert_eq!(normalize_dim(0, 3), Some(0));
        assert_eq!(normalize_dim(2, 3), Some(2));
        assert_eq!(normalize_dim(-1, 3), Some(2));
        assert_eq!(normalize_dim(-3, 3), Some(0));

        // Out of range
        assert_eq!(normalize_dim(3, 3), None);
        assert_eq!(normalize_dim(-4, 3), None);
        assert_eq!(normalize_dim(0, 0), None);
    }

    #[test]
    fn test_compute_reduce_strides() {
        assert_eq!(compute_reduce_strides(&[2, 3, 4], 0), (1, 2, 12));
        assert_eq!(compute_reduce_strides(&[2, 3, 4], 1), (2, 3, 4));
        assert_eq!(compute_reduce_strides(&[2, 3, 4], 2), (6, 4, 1));
        assert_eq!(compute_reduce_strides(&[7], 0), (1, 7, 1));
    }

    #[test]
    fn test_flat_index() {
        // [2, 3, 4] tensor, element (1, 2, 3) is the last one
        assert_eq!(flat_index(1, 2, 3, 3, 4), 23);
        assert_eq!(flat_index(0, 1, 0, 3, 4), 4);
    }

    #[test]
    fn test_topk_output_shape() {
        assert_eq!(topk_output_shape(&[8, 1000, 3], 1, 10), vec![8, 10, 3]);
        assert_eq!(topk_output_shape(&[1000], 0, 1), vec![1]);
    }
}
