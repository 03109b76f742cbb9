//! Pure shape and stride arithmetic.
//!
//! Everything here is allocation-light and side-effect free; views, tensors,
//! and the transform engine all build on these functions. The layout
//! convention is row-major: the last dimension is the fastest and carries
//! unit stride by default.

use smallvec::SmallVec;

use crate::error::{Result, TensorError};

/// Dimension and stride storage; inline up to rank 4.
pub type Dims = SmallVec<[usize; 4]>;

/// Number of elements implied by a shape.
///
/// An empty shape reports zero, the convention for an uninitialized view —
/// rank-0 scalar views still address one element through the empty index,
/// but contribute no flattened length.
pub fn flat_len(dims: &[usize]) -> usize {
    if dims.is_empty() {
        return 0;
    }
    dims.iter().product()
}

/// Row-major strides for a shape: unit stride on the last dimension, each
/// preceding dimension stepping over the product of the faster lengths.
pub fn contiguous_strides(dims: &[usize]) -> Dims {
    let mut strides = Dims::from_elem(0, dims.len());
    let mut acc = 1usize;
    for (i, dim) in dims.iter().enumerate().rev() {
        strides[i] = acc;
        acc *= *dim;
    }
    strides
}

/// Flat offset of a multi-index: the dot product with the strides.
pub fn flat_index(strides: &[usize], indices: &[usize]) -> Result<usize> {
    if indices.len() != strides.len() {
        return Err(TensorError::ShapeMismatch(format!(
            "{} indices supplied for rank {}",
            indices.len(),
            strides.len()
        )));
    }
    Ok(strides.iter().zip(indices).map(|(s, i)| s * i).sum())
}

/// Whether a shape/stride pair matches the row-major formula exactly.
///
/// Rank 0 is vacuously contiguous.
pub fn is_contiguous(dims: &[usize], strides: &[usize]) -> bool {
    if dims.len() != strides.len() {
        return false;
    }
    let mut acc = 1usize;
    for (dim, stride) in dims.iter().zip(strides).rev() {
        if *stride != acc {
            return false;
        }
        acc *= *dim;
    }
    true
}

/// Smallest backing capacity that covers every reachable offset:
/// `sum((dims[i] - 1) * strides[i]) + 1`, or zero when the shape is empty
/// or any dimension is zero.
///
/// Unlike a visit-order walk over the dimensions, this bound is exact for
/// arbitrary non-negative strides, including permuted and overlapping
/// layouts. For row-major strides it equals [`flat_len`].
pub fn required_span(dims: &[usize], strides: &[usize]) -> usize {
    if dims.is_empty() || dims.iter().any(|&d| d == 0) {
        return 0;
    }
    dims.iter()
        .zip(strides)
        .map(|(&d, &s)| (d - 1) * s)
        .sum::<usize>()
        + 1
}

/// Inverse of flat indexing under row-major strides, written into `out`.
///
/// Callers guarantee `flat < flat_len(dims)`, so every dimension is
/// non-zero.
pub fn unravel_index_into(mut flat: usize, dims: &[usize], out: &mut Dims) {
    out.clear();
    out.resize(dims.len(), 0);
    for (i, dim) in dims.iter().enumerate().rev() {
        out[i] = flat % *dim;
        flat /= *dim;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_len_of_empty_shape_is_zero() {
        assert_eq!(flat_len(&[]), 0);
        assert_eq!(flat_len(&[2, 3, 4]), 24);
        assert_eq!(flat_len(&[2, 0, 4]), 0);
    }

    #[test]
    fn contiguous_strides_are_right_to_left_products() {
        assert_eq!(contiguous_strides(&[2, 3, 4]).as_slice(), &[12, 4, 1]);
        assert_eq!(contiguous_strides(&[5]).as_slice(), &[1]);
        assert!(contiguous_strides(&[]).is_empty());
    }

    #[test]
    fn flat_index_is_a_dot_product() {
        let strides = [12, 4, 1];
        assert_eq!(flat_index(&strides, &[0, 0, 0]).unwrap(), 0);
        assert_eq!(flat_index(&strides, &[1, 2, 3]).unwrap(), 23);
    }

    #[test]
    fn flat_index_requires_matching_rank() {
        assert!(matches!(
            flat_index(&[4, 1], &[1]),
            Err(TensorError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn flat_index_is_injective_over_the_index_space() {
        let dims = [2usize, 3, 4];
        let strides = contiguous_strides(&dims);
        let mut seen = vec![false; flat_len(&dims)];
        for i in 0..dims[0] {
            for j in 0..dims[1] {
                for k in 0..dims[2] {
                    let flat = flat_index(&strides, &[i, j, k]).unwrap();
                    assert!(!seen[flat]);
                    seen[flat] = true;
                }
            }
        }
        assert!(seen.iter().all(|&v| v));
    }

    #[test]
    fn row_major_strides_are_contiguous() {
        for dims in [&[1usize][..], &[2, 3][..], &[2, 3, 4][..], &[1, 1, 7][..]] {
            assert!(is_contiguous(dims, &contiguous_strides(dims)));
        }
        assert!(is_contiguous(&[], &[]));
        assert!(!is_contiguous(&[2, 3], &[1, 2]));
        assert!(!is_contiguous(&[2, 3], &[3]));
    }

    #[test]
    fn required_span_matches_flat_len_for_row_major() {
        for dims in [&[1usize][..], &[4][..], &[2, 3][..], &[2, 3, 4][..]] {
            assert_eq!(required_span(dims, &contiguous_strides(dims)), flat_len(dims));
        }
    }

    #[test]
    fn required_span_is_order_independent() {
        // Transposed [3, 4]: same reachable window either way.
        assert_eq!(required_span(&[4, 3], &[1, 4]), 12);
        assert_eq!(required_span(&[3, 4], &[4, 1]), 12);
        // Overlapping layout: every step lands on the same element.
        assert_eq!(required_span(&[5], &[0]), 1);
        assert_eq!(required_span(&[], &[]), 0);
        assert_eq!(required_span(&[2, 0], &[1, 1]), 0);
    }

    #[test]
    fn unravel_inverts_flat_indexing() {
        let dims = [2usize, 3, 4];
        let strides = contiguous_strides(&dims);
        let mut coord = Dims::new();
        for flat in 0..flat_len(&dims) {
            unravel_index_into(flat, &dims, &mut coord);
            assert_eq!(flat_index(&strides, &coord).unwrap(), flat);
        }
    }
}
