//! Window partitioning of the reduction dimension

use crate::error::{Error, Result};
use std::ops::Range;

/// Half-open range `[start, end)` along the reduction dimension
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Window {
    /// First position in the window
    pub start: usize,
    /// One past the last position in the window
    pub end: usize,
}

impl Window {
    /// Number of positions in the window
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the window covers no positions
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// Positions covered by the window
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Number of windows of `window_size` needed to cover `input_size` positions.
#[inline]
pub fn num_windows(input_size: usize, window_size: usize) -> usize {
    input_size.div_ceil(window_size)
}

/// Tile `[0, input_size)` with windows of `window_size`.
///
/// All windows but the last have exactly `window_size` positions; the last one
/// holds the remainder and is never empty.
///
/// # Errors
///
/// `InvalidArgument` if `window_size` is zero.
///
/// # Example
///
/// ```
/// # use numr_approx_topk::algorithm::window::partition_windows;
/// let windows = partition_windows(6, 4)?;
/// assert_eq!(windows.len(), 2);
/// assert_eq!((windows[1].start, windows[1].end), (4, 6));
/// # Ok::<(), numr_approx_topk::error::Error>(())
/// ```
pub fn partition_windows(input_size: usize, window_size: usize) -> Result<Vec<Window>> {
    if window_size == 0 {
        return Err(Error::invalid_argument(
            "window_size",
            "must be at least 1",
        ));
    }
    Ok((0..num_windows(input_size, window_size))
        .map(|w| {
            let start = w * window_size;
            Window {
                start,
                end: (start + window_size).min(input_size),
            }
        })
        .collect())
}
