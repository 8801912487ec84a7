//! Gather along the reduction dimension

use crate::dtype::{Element, Scalar, dispatch_dtype};
use crate::error::{Error, Result};
use crate::ops::flat_index;
use crate::tensor::Tensor;

/// Layout of a gather: source `[outer, src_dim, inner]` to output `[outer, out_dim, inner]`
#[derive(Copy, Clone, Debug)]
pub(crate) struct GatherLayout {
    pub outer_size: usize,
    pub src_dim: usize,
    pub out_dim: usize,
    pub inner_size: usize,
}

/// Build `out[o, j, i] = src[o, indices[o, j, i], i]`.
///
/// Negative indices take `fill`; they are an error when no fill is given.
pub(crate) fn gather_along_dim(
    src: &Tensor,
    indices: &[i64],
    fill: Option<Scalar>,
    layout: GatherLayout,
    out_shape: &[usize],
) -> Result<Tensor> {
    dispatch_dtype!(src.dtype(), T => {
        let data = src.as_slice::<T>()?;
        let fill = fill.map(|s| {
            T::from_scalar(s).ok_or(Error::DTypeMismatch {
                lhs: src.dtype(),
                rhs: s.dtype(),
            })
        }).transpose()?;
        gather_typed(data, indices, fill, layout)
            .and_then(|out| Tensor::try_from_vec(out, out_shape))
    })
}

fn gather_typed<T: Element>(
    data: &[T],
    indices: &[i64],
    fill: Option<T>,
    layout: GatherLayout,
) -> Result<Vec<T>> {
    let GatherLayout {
        outer_size,
        src_dim,
        out_dim,
        inner_size,
    } = layout;
    let mut out = Vec::with_capacity(outer_size * out_dim * inner_size);
    for outer in 0..outer_size {
        for j in 0..out_dim {
            for inner in 0..inner_size {
                let idx = indices[flat_index(outer, j, inner, out_dim, inner_size)];
                let value = match usize::try_from(idx) {
                    Ok(pos) if pos < src_dim => data[flat_index(outer, pos, inner, src_dim, inner_size)],
                    Ok(pos) => {
                        return Err(Error::Internal(format!(
                            "gather index {pos} out of range for dimension of size {src_dim}"
                        )));
                    }
                    Err(_) => fill.ok_or_else(|| {
                        Error::Internal("negative gather index without a fill value".to_string())
                    })?,
                };
                out.push(value);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gather_middle_dim() {
        // [2, 3, 1] -> pick positions per outer row
        let src = Tensor::from_slice(&[1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3, 1]);
        let layout = GatherLayout {
            outer_size: 2,
            src_dim: 3,
            out_dim: 2,
            inner_size: 1,
        };
        let out = gather_along_dim(&src, &[2, 0, 1, 1], None, layout, &[2, 2, 1]).unwrap();
        assert_eq!(out.to_vec::<f32>(), vec![3.0, 1.0, 5.0, 5.0]);
    }

    #[test]
    fn test_gather_fill() {
        let src = Tensor::from_slice(&[10i32, 20], &[2]);
        let layout = GatherLayout {
            outer_size: 1,
            src_dim: 2,
            out_dim: 2,
            inner_size: 1,
        };
        let out = gather_along_dim(&src, &[-1, 1], Some(Scalar::I32(-7)), layout, &[2]).unwrap();
        assert_eq!(out.to_vec::<i32>(), vec![-7, 20]);
    }

    #[test]
    fn test_gather_negative_without_fill_fails() {
        let src = Tensor::from_slice(&[1u8], &[1]);
        let layout = GatherLayout {
            outer_size: 1,
            src_dim: 1,
            out_dim: 1,
            inner_size: 1,
        };
        assert!(gather_along_dim(&src, &[-1], None, layout, &[1]).is_err());
    }

    #[test]
    fn test_gather_fill_dtype_mismatch() {
        let src = Tensor::from_slice(&[1u8], &[1]);
        let layout = GatherLayout {
            outer_size: 1,
            src_dim: 1,
            out_dim: 1,
            inner_size: 1,
        };
        let err = gather_along_dim(&src, &[0], Some(Scalar::F32(0.0)), layout, &[1]).unwrap_err();
        assert!(matches!(err, Error::DTypeMismatch { .. }));
    }
}
