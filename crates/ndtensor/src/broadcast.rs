//! Broadcasting: shape union, the directional check, and materializing
//! wrap-rule copies.
//!
//! Shapes align at their trailing dimensions; a missing leading dimension
//! counts as size 1. Two aligned sizes are compatible when they are equal
//! or either is 1, and the result takes the larger size.

use crate::error::{Result, TensorError};
use crate::layout::Dims;
use crate::tensor::Tensor;
use crate::transform;
use crate::view::TensorView;

fn aligned(dims: &[usize], rank: usize, dimension: usize) -> usize {
    let pad = rank - dims.len();
    if dimension < pad {
        1
    } else {
        dims[dimension - pad]
    }
}

/// Common shape of two operands under the broadcasting rules.
///
/// Fails with the offending result-space dimension and both conflicting
/// sizes.
pub fn broadcast_dims(a: &[usize], b: &[usize]) -> Result<Dims> {
    let rank = a.len().max(b.len());
    let mut out = Dims::with_capacity(rank);
    for dimension in 0..rank {
        let left = aligned(a, rank, dimension);
        let right = aligned(b, rank, dimension);
        if left == right || left == 1 || right == 1 {
            out.push(left.max(right));
        } else {
            return Err(TensorError::Broadcast {
                dimension,
                left,
                right,
            });
        }
    }
    Ok(out)
}

/// One-directional check used before broadcasting into a destination.
///
/// Stricter than the two-shape union: the source rank must not exceed the
/// target's, and every right-aligned source dimension must equal its target
/// dimension or be 1. The target never grows a dimension the source does
/// not accommodate.
pub fn can_broadcast_to(src: &[usize], dst: &[usize]) -> bool {
    if src.len() > dst.len() {
        return false;
    }
    let pad = dst.len() - src.len();
    src.iter()
        .enumerate()
        .all(|(i, &d)| d == dst[pad + i] || d == 1)
}

fn check_directional(src_dims: &[usize], dst_dims: &[usize]) -> Result<usize> {
    if src_dims.len() > dst_dims.len() {
        return Err(TensorError::ShapeMismatch(format!(
            "cannot broadcast rank {} into rank {}",
            src_dims.len(),
            dst_dims.len()
        )));
    }
    let pad = dst_dims.len() - src_dims.len();
    for (i, &d) in src_dims.iter().enumerate() {
        if d != dst_dims[pad + i] && d != 1 {
            return Err(TensorError::Broadcast {
                dimension: pad + i,
                left: d,
                right: dst_dims[pad + i],
            });
        }
    }
    Ok(pad)
}

/// Materializes a broadcast copy of `src` with the target shape.
///
/// Every destination multi-index maps back to a source index by
/// substituting 0 wherever the source dimension is 1 (the wrap rule) and
/// dropping the leading alignment padding.
pub fn broadcast_to<E: Copy>(src: &TensorView<'_, E>, dims: &[usize]) -> Result<Tensor<E>> {
    let pad = check_directional(src.dims(), dims)?;
    let src_dims = Dims::from_slice(src.dims());
    transform::remap_new(src, dims, move |dst_coord, src_coord| {
        src_coord.clear();
        for (j, &d) in src_dims.iter().enumerate() {
            src_coord.push(if d == 1 { 0 } else { dst_coord[pad + j] });
        }
    })
}

/// Broadcast copy into an existing destination view.
///
/// The destination shape drives the copy; validation happens before any
/// element is written.
pub fn broadcast_into<E: Copy>(
    src: &TensorView<'_, E>,
    dst: &mut crate::view::TensorViewMut<'_, E>,
) -> Result<()> {
    let pad = check_directional(src.dims(), dst.dims())?;
    let dims = Dims::from_slice(dst.dims());
    let src_dims = Dims::from_slice(src.dims());
    let len = crate::layout::flat_len(&dims);
    let mut dst_coord = Dims::new();
    let mut src_coord = Dims::new();
    for flat in 0..len {
        crate::layout::unravel_index_into(flat, &dims, &mut dst_coord);
        src_coord.clear();
        for (j, &d) in src_dims.iter().enumerate() {
            src_coord.push(if d == 1 { 0 } else { dst_coord[pad + j] });
        }
        *dst.get_mut(&dst_coord)? = *src.get(&src_coord)?;
    }
    Ok(())
}

impl<E: Copy> Tensor<E> {
    /// Broadcast copy of this tensor with the target shape.
    pub fn broadcast_to(&self, dims: &[usize]) -> Result<Tensor<E>> {
        broadcast_to(&self.view(), dims)
    }
}
