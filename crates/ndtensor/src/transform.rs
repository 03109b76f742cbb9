//! Shape transforms: reinterpretations (reshape, squeeze, unsqueeze) and
//! index-remapped copies (permute, reverse, concatenate, stack, split).
//!
//! Every copy-based transform runs the same inner loop: walk destination
//! flat indices, unravel to a multi-index, map it to a source multi-index,
//! and read through the source strides. O(rank × flat length).

use std::sync::Arc;

use crate::error::{Result, TensorError};
use crate::layout::{self, Dims};
use crate::tensor::Tensor;
use crate::view::TensorView;

/// Shared remap loop behind permute/reverse/split/broadcast/densify.
pub(crate) fn remap_new<E: Copy>(
    src: &TensorView<'_, E>,
    dst_dims: &[usize],
    mut map: impl FnMut(&[usize], &mut Dims),
) -> Result<Tensor<E>> {
    let len = layout::flat_len(dst_dims);
    let mut out = Vec::with_capacity(len);
    let mut dst_coord = Dims::new();
    let mut src_coord = Dims::new();
    for flat in 0..len {
        layout::unravel_index_into(flat, dst_dims, &mut dst_coord);
        map(&dst_coord, &mut src_coord);
        out.push(*src.get(&src_coord)?);
    }
    Tensor::from_vec(out, dst_dims)
}

fn squeeze_parts(dims: &[usize], strides: &[usize]) -> (Dims, Dims) {
    let mut out_dims = Dims::new();
    let mut out_strides = Dims::new();
    for (&d, &s) in dims.iter().zip(strides) {
        if d != 1 {
            out_dims.push(d);
            out_strides.push(s);
        }
    }
    // Removing every dimension would leave a shapeless tensor; keep one
    // unit dimension instead.
    if out_dims.is_empty() && !dims.is_empty() {
        out_dims.push(1);
        out_strides.push(1);
    }
    (out_dims, out_strides)
}

fn squeeze_dim_parts(dims: &[usize], strides: &[usize], dim: usize) -> Result<(Dims, Dims)> {
    if dim >= dims.len() {
        return Err(TensorError::ShapeMismatch(format!(
            "dimension {} is out of range for rank {}",
            dim,
            dims.len()
        )));
    }
    if dims[dim] != 1 {
        return Err(TensorError::ShapeMismatch(format!(
            "cannot squeeze dimension {} of size {}",
            dim, dims[dim]
        )));
    }
    let mut out_dims = Dims::from_slice(dims);
    let mut out_strides = Dims::from_slice(strides);
    out_dims.remove(dim);
    out_strides.remove(dim);
    if out_dims.is_empty() {
        out_dims.push(1);
        out_strides.push(1);
    }
    Ok((out_dims, out_strides))
}

fn unsqueeze_parts(dims: &[usize], strides: &[usize], dim: usize) -> Result<(Dims, Dims)> {
    if dim > dims.len() {
        return Err(TensorError::ShapeMismatch(format!(
            "insert position {} is out of range for rank {}",
            dim,
            dims.len()
        )));
    }
    let mut out_dims = Dims::from_slice(dims);
    let mut out_strides = Dims::from_slice(strides);
    // The new dimension is never stepped along; pick the stride that keeps
    // row-major layouts row-major.
    let stride = if dim == dims.len() {
        1
    } else {
        dims[dim] * strides[dim]
    };
    out_dims.insert(dim, 1);
    out_strides.insert(dim, stride);
    Ok((out_dims, out_strides))
}

fn check_permutation(order: &[usize], rank: usize) -> Result<()> {
    if order.len() != rank {
        return Err(TensorError::ShapeMismatch(format!(
            "permutation of length {} supplied for rank {}",
            order.len(),
            rank
        )));
    }
    let mut seen = vec![false; rank];
    for &axis in order {
        if axis >= rank {
            return Err(TensorError::ShapeMismatch(format!(
                "permutation axis {axis} is out of range for rank {rank}"
            )));
        }
        if seen[axis] {
            return Err(TensorError::ShapeMismatch(format!(
                "permutation contains duplicate axis {axis}"
            )));
        }
        seen[axis] = true;
    }
    Ok(())
}

impl<'a, E> TensorView<'a, E> {
    /// Drops every dimension of size 1 without copying.
    pub fn squeeze(&self) -> TensorView<'a, E> {
        let (dims, strides) = squeeze_parts(self.dims(), self.strides());
        TensorView::from_parts_unchecked(self.backing(), dims, strides)
    }

    /// Drops one dimension, which must have size 1.
    pub fn squeeze_dim(&self, dim: usize) -> Result<TensorView<'a, E>> {
        let (dims, strides) = squeeze_dim_parts(self.dims(), self.strides(), dim)?;
        Ok(TensorView::from_parts_unchecked(self.backing(), dims, strides))
    }

    /// Inserts a dimension of size 1 at `0 <= dim <= rank`.
    pub fn unsqueeze(&self, dim: usize) -> Result<TensorView<'a, E>> {
        let (dims, strides) = unsqueeze_parts(self.dims(), self.strides(), dim)?;
        Ok(TensorView::from_parts_unchecked(self.backing(), dims, strides))
    }
}

impl<'a, E: Copy> TensorView<'a, E> {
    /// Copying axis permutation: destination index `d` reads source axis
    /// `order[d]`.
    pub fn permute(&self, order: &[usize]) -> Result<Tensor<E>> {
        check_permutation(order, self.rank())?;
        let dst_dims: Dims = order.iter().map(|&axis| self.dims()[axis]).collect();
        let order = Dims::from_slice(order);
        let rank = self.rank();
        remap_new(self, &dst_dims, move |dst_coord, src_coord| {
            src_coord.clear();
            src_coord.resize(rank, 0);
            for (d, &axis) in order.iter().enumerate() {
                src_coord[axis] = dst_coord[d];
            }
        })
    }

    /// Copying reflection of every dimension.
    pub fn reverse(&self) -> Result<Tensor<E>> {
        let dims = Dims::from_slice(self.dims());
        let mirror = dims.clone();
        remap_new(self, &dims, move |dst_coord, src_coord| {
            src_coord.clear();
            for (d, &size) in mirror.iter().enumerate() {
                src_coord.push(size - 1 - dst_coord[d]);
            }
        })
    }

    /// Copying reflection of a single dimension.
    pub fn reverse_dim(&self, dim: usize) -> Result<Tensor<E>> {
        if dim >= self.rank() {
            return Err(TensorError::ShapeMismatch(format!(
                "dimension {} is out of range for rank {}",
                dim,
                self.rank()
            )));
        }
        let dims = Dims::from_slice(self.dims());
        let size = dims[dim];
        remap_new(self, &dims, move |dst_coord, src_coord| {
            src_coord.clear();
            src_coord.extend_from_slice(dst_coord);
            src_coord[dim] = size - 1 - dst_coord[dim];
        })
    }
}

impl<E> Tensor<E> {
    /// Aliasing squeeze: drops every size-1 dimension.
    pub fn squeeze(&self) -> Tensor<E> {
        let (dims, strides) = squeeze_parts(self.dims(), self.strides());
        Tensor::from_arc_parts(Arc::clone(self.buf()), self.offset(), dims, strides)
    }

    /// Aliasing squeeze of one dimension, which must have size 1.
    pub fn squeeze_dim(&self, dim: usize) -> Result<Tensor<E>> {
        let (dims, strides) = squeeze_dim_parts(self.dims(), self.strides(), dim)?;
        Ok(Tensor::from_arc_parts(
            Arc::clone(self.buf()),
            self.offset(),
            dims,
            strides,
        ))
    }

    /// Aliasing insert of a size-1 dimension at `0 <= dim <= rank`.
    pub fn unsqueeze(&self, dim: usize) -> Result<Tensor<E>> {
        let (dims, strides) = unsqueeze_parts(self.dims(), self.strides(), dim)?;
        Ok(Tensor::from_arc_parts(
            Arc::clone(self.buf()),
            self.offset(),
            dims,
            strides,
        ))
    }
}

impl<E: Copy> Tensor<E> {
    /// Reinterprets under a new shape with the same flattened length.
    ///
    /// Contiguous tensors alias their buffer; non-contiguous tensors are
    /// densified first, so the result is always row-major.
    pub fn reshape(&self, dims: &[usize]) -> Result<Tensor<E>> {
        let out_len = layout::flat_len(dims);
        if out_len != self.flat_len() {
            return Err(TensorError::ShapeMismatch(format!(
                "reshape element count mismatch: {} vs {}",
                self.flat_len(),
                out_len
            )));
        }
        let base = if self.is_contiguous() {
            self.clone()
        } else {
            self.to_contiguous()?
        };
        Ok(Tensor::from_arc_parts(
            Arc::clone(base.buf()),
            base.offset(),
            Dims::from_slice(dims),
            layout::contiguous_strides(dims),
        ))
    }

    /// Copying axis permutation.
    pub fn permute(&self, order: &[usize]) -> Result<Tensor<E>> {
        self.view().permute(order)
    }

    /// Full axis reversal permutation (the rank-2 case is the matrix
    /// transpose).
    pub fn transpose(&self) -> Result<Tensor<E>> {
        let order: Vec<usize> = (0..self.rank()).rev().collect();
        self.permute(&order)
    }

    /// Copying reflection of every dimension.
    pub fn reverse(&self) -> Result<Tensor<E>> {
        self.view().reverse()
    }

    /// Copying reflection of one dimension.
    pub fn reverse_dim(&self, dim: usize) -> Result<Tensor<E>> {
        self.view().reverse_dim(dim)
    }
}

/// Concatenates tensors along an existing dimension.
///
/// Inputs must share rank and agree on every dimension except `dim`; the
/// result's size along `dim` is the sum of the inputs' sizes.
pub fn concat<E: Copy>(parts: &[Tensor<E>], dim: usize) -> Result<Tensor<E>> {
    let first = parts.first().ok_or_else(|| {
        TensorError::InvalidOperation("concat requires at least one input".into())
    })?;
    let rank = first.rank();
    if dim >= rank {
        return Err(TensorError::ShapeMismatch(format!(
            "dimension {dim} is out of range for rank {rank}"
        )));
    }
    let mut dst_dims = Dims::from_slice(first.dims());
    for part in &parts[1..] {
        if part.rank() != rank {
            return Err(TensorError::ShapeMismatch(format!(
                "concat inputs disagree on rank: {} vs {}",
                rank,
                part.rank()
            )));
        }
        for (d, (&a, &b)) in first.dims().iter().zip(part.dims()).enumerate() {
            if d != dim && a != b {
                return Err(TensorError::ShapeMismatch(format!(
                    "concat inputs disagree at dimension {d}: {a} vs {b}"
                )));
            }
        }
        dst_dims[dim] += part.dims()[dim];
    }
    let views: Vec<TensorView<'_, E>> = parts.iter().map(|p| p.view()).collect();
    let len = layout::flat_len(&dst_dims);
    let mut out = Vec::with_capacity(len);
    let mut coord = Dims::new();
    let mut src_coord = Dims::new();
    for flat in 0..len {
        layout::unravel_index_into(flat, &dst_dims, &mut coord);
        let mut local = coord[dim];
        let mut part_index = 0;
        while local >= views[part_index].dims()[dim] {
            local -= views[part_index].dims()[dim];
            part_index += 1;
        }
        src_coord.clear();
        src_coord.extend_from_slice(&coord);
        src_coord[dim] = local;
        out.push(*views[part_index].get(&src_coord)?);
    }
    Tensor::from_vec(out, &dst_dims)
}

/// Stacks identically-shaped tensors along a new dimension at `dim`.
pub fn stack<E: Copy>(parts: &[Tensor<E>], dim: usize) -> Result<Tensor<E>> {
    let first = parts.first().ok_or_else(|| {
        TensorError::InvalidOperation("stack requires at least one input".into())
    })?;
    if dim > first.rank() {
        return Err(TensorError::ShapeMismatch(format!(
            "insert position {} is out of range for rank {}",
            dim,
            first.rank()
        )));
    }
    for part in &parts[1..] {
        if part.dims() != first.dims() {
            return Err(TensorError::ShapeMismatch(format!(
                "stack inputs disagree on shape: {:?} vs {:?}",
                first.dims(),
                part.dims()
            )));
        }
    }
    let mut dst_dims = Dims::from_slice(first.dims());
    dst_dims.insert(dim, parts.len());
    let views: Vec<TensorView<'_, E>> = parts.iter().map(|p| p.view()).collect();
    let len = layout::flat_len(&dst_dims);
    let mut out = Vec::with_capacity(len);
    let mut coord = Dims::new();
    let mut src_coord = Dims::new();
    for flat in 0..len {
        layout::unravel_index_into(flat, &dst_dims, &mut coord);
        let part_index = coord[dim];
        src_coord.clear();
        src_coord.extend_from_slice(&coord);
        src_coord.remove(dim);
        out.push(*views[part_index].get(&src_coord)?);
    }
    Tensor::from_vec(out, &dst_dims)
}

/// Splits a tensor into `count` equal parts along one dimension.
///
/// The inverse of [`concat`]; the chosen dimension must divide evenly.
pub fn split<E: Copy>(tensor: &Tensor<E>, count: usize, dim: usize) -> Result<Vec<Tensor<E>>> {
    if count == 0 {
        return Err(TensorError::InvalidOperation(
            "split count must be positive".into(),
        ));
    }
    if dim >= tensor.rank() {
        return Err(TensorError::ShapeMismatch(format!(
            "dimension {} is out of range for rank {}",
            dim,
            tensor.rank()
        )));
    }
    let size = tensor.dims()[dim];
    if size % count != 0 {
        return Err(TensorError::ShapeMismatch(format!(
            "dimension {dim} of size {size} does not divide into {count} parts"
        )));
    }
    let chunk = size / count;
    let mut chunk_dims = Dims::from_slice(tensor.dims());
    chunk_dims[dim] = chunk;
    let view = tensor.view();
    (0..count)
        .map(|i| {
            remap_new(&view, &chunk_dims, |dst_coord, src_coord| {
                src_coord.clear();
                src_coord.extend_from_slice(dst_coord);
                src_coord[dim] += i * chunk;
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tensor_2x3() -> Tensor<i32> {
        Tensor::from_vec(vec![1, 2, 3, 4, 5, 6], &[2, 3]).unwrap()
    }

    #[test]
    fn permute_swaps_axes_of_a_matrix() {
        let t = tensor_2x3();
        let p = t.permute(&[1, 0]).unwrap();
        assert_eq!(p.dims(), &[3, 2]);
        assert_eq!(p.view().as_slice().unwrap(), &[1, 4, 2, 5, 3, 6]);
        let back = p.permute(&[1, 0]).unwrap();
        assert!(back.item_eq(&t));
    }

    #[test]
    fn transpose_is_reversed_axis_order() {
        let t = tensor_2x3();
        let a = t.transpose().unwrap();
        let b = t.permute(&[1, 0]).unwrap();
        assert!(a.item_eq(&b));
    }

    #[test]
    fn permute_rejects_bad_orders() {
        let t = tensor_2x3();
        assert!(matches!(
            t.permute(&[0]),
            Err(TensorError::ShapeMismatch(_))
        ));
        assert!(matches!(
            t.permute(&[0, 2]),
            Err(TensorError::ShapeMismatch(_))
        ));
        assert!(matches!(
            t.permute(&[1, 1]),
            Err(TensorError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn reshape_reinterprets_contiguous_data() {
        let t = tensor_2x3();
        let r = t.reshape(&[3, 2]).unwrap();
        assert_eq!(r.view().as_slice().unwrap(), &[1, 2, 3, 4, 5, 6]);
        // Aliases rather than copies.
        assert!(matches!(
            r.clone().fill(0),
            Err(TensorError::InvalidOperation(_))
        ));
        let back = r.reshape(&[2, 3]).unwrap();
        assert!(back.item_eq(&t));
    }

    #[test]
    fn reshape_validates_element_count() {
        assert!(matches!(
            tensor_2x3().reshape(&[7]),
            Err(TensorError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn reshape_densifies_non_contiguous_sources() {
        let t = Tensor::from_vec((0..16).collect(), &[4, 4]).unwrap();
        let window = t.slice_ranges(&[1..3, 1..3]).unwrap();
        let flat = window.reshape(&[4]).unwrap();
        assert_eq!(flat.view().as_slice().unwrap(), &[5, 6, 9, 10]);
    }

    #[test]
    fn squeeze_drops_unit_dimensions() {
        let t = Tensor::from_vec(vec![1, 2, 3], &[1, 3, 1]).unwrap();
        let s = t.squeeze();
        assert_eq!(s.dims(), &[3]);
        assert_eq!(*s.get(&[1]).unwrap(), 2);
    }

    #[test]
    fn squeeze_never_produces_rank_zero() {
        let t = Tensor::from_vec(vec![42], &[1, 1, 1]).unwrap();
        let s = t.squeeze();
        assert_eq!(s.dims(), &[1]);
        assert_eq!(*s.get(&[0]).unwrap(), 42);
    }

    #[test]
    fn squeeze_dim_requires_unit_size() {
        let t = Tensor::from_vec(vec![1, 2, 3], &[1, 3]).unwrap();
        assert_eq!(t.squeeze_dim(0).unwrap().dims(), &[3]);
        assert!(matches!(
            t.squeeze_dim(1),
            Err(TensorError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn unsqueeze_inserts_unit_dimensions() {
        let t = tensor_2x3();
        assert_eq!(t.unsqueeze(0).unwrap().dims(), &[1, 2, 3]);
        assert_eq!(t.unsqueeze(1).unwrap().dims(), &[2, 1, 3]);
        assert_eq!(t.unsqueeze(2).unwrap().dims(), &[2, 3, 1]);
        assert!(t.unsqueeze(3).is_err());
        // Round-trips with squeeze_dim without copying.
        let u = t.unsqueeze(1).unwrap();
        assert!(u.is_contiguous());
        assert!(u.squeeze_dim(1).unwrap().item_eq(&t));
    }

    #[test]
    fn reverse_reflects_all_dimensions() {
        let t = tensor_2x3();
        let r = t.reverse().unwrap();
        assert_eq!(r.view().as_slice().unwrap(), &[6, 5, 4, 3, 2, 1]);
        assert!(r.reverse().unwrap().item_eq(&t));
    }

    #[test]
    fn reverse_dim_reflects_one_dimension() {
        let t = tensor_2x3();
        let r = t.reverse_dim(1).unwrap();
        assert_eq!(r.view().as_slice().unwrap(), &[3, 2, 1, 6, 5, 4]);
        let r = t.reverse_dim(0).unwrap();
        assert_eq!(r.view().as_slice().unwrap(), &[4, 5, 6, 1, 2, 3]);
    }

    #[test]
    fn concat_along_each_dimension() {
        let a = tensor_2x3();
        let b = tensor_2x3();
        let rows = concat(&[a.clone(), b.clone()], 0).unwrap();
        assert_eq!(rows.dims(), &[4, 3]);
        assert_eq!(
            rows.view().as_slice().unwrap(),
            &[1, 2, 3, 4, 5, 6, 1, 2, 3, 4, 5, 6]
        );
        let cols = concat(&[a, b], 1).unwrap();
        assert_eq!(cols.dims(), &[2, 6]);
        assert_eq!(
            cols.view().as_slice().unwrap(),
            &[1, 2, 3, 1, 2, 3, 4, 5, 6, 4, 5, 6]
        );
    }

    #[test]
    fn concat_validates_shapes() {
        let a = tensor_2x3();
        let b = Tensor::from_vec(vec![1, 2], &[2, 1]).unwrap();
        assert!(concat(&[a.clone(), b], 0).is_err());
        assert!(matches!(
            concat::<i32>(&[], 0),
            Err(TensorError::InvalidOperation(_))
        ));
    }

    #[test]
    fn stack_inserts_a_new_dimension() {
        let a = tensor_2x3();
        let b = tensor_2x3();
        let s = stack(&[a.clone(), b.clone()], 0).unwrap();
        assert_eq!(s.dims(), &[2, 2, 3]);
        let s = stack(&[a, b], 2).unwrap();
        assert_eq!(s.dims(), &[2, 3, 2]);
        assert_eq!(
            s.view().as_slice().unwrap(),
            &[1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6]
        );
    }

    #[test]
    fn split_then_concat_roundtrips() {
        let t = Tensor::from_vec((0..12).collect(), &[4, 3]).unwrap();
        let parts = split(&t, 2, 0).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].dims(), &[2, 3]);
        let back = concat(&parts, 0).unwrap();
        assert!(back.item_eq(&t));

        let parts = split(&t, 3, 1).unwrap();
        assert_eq!(parts[0].dims(), &[4, 1]);
        let back = concat(&parts, 1).unwrap();
        assert!(back.item_eq(&t));
    }

    #[test]
    fn split_requires_even_division() {
        let t = Tensor::from_vec((0..12).collect(), &[4, 3]).unwrap();
        assert!(matches!(
            split(&t, 3, 0),
            Err(TensorError::ShapeMismatch(_))
        ));
        assert!(matches!(
            split(&t, 0, 0),
            Err(TensorError::InvalidOperation(_))
        ));
    }

    #[test]
    fn view_level_squeeze_is_zero_copy() {
        let data = [1, 2, 3];
        let view = TensorView::new(&data, &[1, 3]).unwrap();
        let squeezed = view.squeeze();
        assert_eq!(squeezed.dims(), &[3]);
        assert_eq!(*squeezed.get(&[2]).unwrap(), 3);
    }
}
