//! Read-only and mutable strided views over borrowed memory.
//!
//! A view is a (backing slice, dims, strides) triple. It never owns storage;
//! the borrow checker ties each view's lifetime to the region it was carved
//! from. Slicing and dimension removal produce new views over subranges of
//! the same region without copying.

use std::fmt;
use std::ops::{Index, IndexMut, Range};

use smallvec::smallvec;

use crate::error::{Result, TensorError};
use crate::layout::{self, Dims};

/// Read-only shape-aware window over a borrowed contiguous region.
pub struct TensorView<'a, E> {
    data: &'a [E],
    dims: Dims,
    strides: Dims,
}

impl<E> Clone for TensorView<'_, E> {
    fn clone(&self) -> Self {
        Self {
            data: self.data,
            dims: self.dims.clone(),
            strides: self.strides.clone(),
        }
    }
}

/// Mutable shape-aware window over a borrowed contiguous region.
pub struct TensorViewMut<'a, E> {
    data: &'a mut [E],
    dims: Dims,
    strides: Dims,
}

pub(crate) fn check_rank(dims: &[usize], strides: &[usize]) -> Result<()> {
    if dims.len() != strides.len() {
        return Err(TensorError::ShapeMismatch(format!(
            "{} strides supplied for {} dimensions",
            strides.len(),
            dims.len()
        )));
    }
    Ok(())
}

pub(crate) fn check_capacity(actual: usize, dims: &[usize], strides: &[usize]) -> Result<()> {
    let required = layout::required_span(dims, strides);
    if actual < required {
        return Err(TensorError::Capacity { required, actual });
    }
    Ok(())
}

/// Offset and reduced dims for a per-dimension start-index slice.
pub(crate) fn slice_parts(
    dims: &[usize],
    strides: &[usize],
    starts: &[usize],
) -> Result<(usize, Dims)> {
    if starts.len() != dims.len() {
        return Err(TensorError::ShapeMismatch(format!(
            "{} start indices supplied for rank {}",
            starts.len(),
            dims.len()
        )));
    }
    for (dimension, (&index, &size)) in starts.iter().zip(dims).enumerate() {
        if index > size {
            return Err(TensorError::IndexOutOfRange {
                dimension,
                index,
                size,
            });
        }
    }
    let offset = layout::flat_index(strides, starts)?;
    let reduced = dims.iter().zip(starts).map(|(d, s)| d - s).collect();
    Ok((offset, reduced))
}

/// Offset and dims for one half-open range per dimension.
pub(crate) fn range_parts(
    dims: &[usize],
    strides: &[usize],
    ranges: &[Range<usize>],
) -> Result<(usize, Dims)> {
    if ranges.len() != dims.len() {
        return Err(TensorError::ShapeMismatch(format!(
            "{} ranges supplied for rank {}",
            ranges.len(),
            dims.len()
        )));
    }
    let mut starts = Dims::with_capacity(dims.len());
    let mut reduced = Dims::with_capacity(dims.len());
    for (dimension, (range, &size)) in ranges.iter().zip(dims).enumerate() {
        if range.start > range.end || range.end > size {
            return Err(TensorError::IndexOutOfRange {
                dimension,
                index: range.end,
                size,
            });
        }
        starts.push(range.start);
        reduced.push(range.end - range.start);
    }
    let offset = layout::flat_index(strides, &starts)?;
    Ok((offset, reduced))
}

/// Offset, reduced dims/strides, and retained span for dimension removal.
pub(crate) fn dim_removal_parts(
    dims: &[usize],
    strides: &[usize],
    dim: usize,
    index: usize,
) -> Result<(usize, Dims, Dims, usize)> {
    if dim >= dims.len() {
        return Err(TensorError::ShapeMismatch(format!(
            "dimension {} is out of range for rank {}",
            dim,
            dims.len()
        )));
    }
    if index >= dims[dim] {
        return Err(TensorError::IndexOutOfRange {
            dimension: dim,
            index,
            size: dims[dim],
        });
    }
    let offset = index * strides[dim];
    let mut reduced_dims = Dims::from_slice(dims);
    let mut reduced_strides = Dims::from_slice(strides);
    reduced_dims.remove(dim);
    reduced_strides.remove(dim);
    // A rank-0 result wraps exactly one element; required_span would report
    // the empty-view convention of zero.
    let span = if reduced_dims.is_empty() {
        1
    } else {
        layout::required_span(&reduced_dims, &reduced_strides)
    };
    Ok((offset, reduced_dims, reduced_strides, span))
}

pub(crate) fn checked_offset(
    dims: &[usize],
    strides: &[usize],
    data_len: usize,
    indices: &[usize],
) -> Result<usize> {
    if indices.len() != dims.len() {
        return Err(TensorError::ShapeMismatch(format!(
            "{} indices supplied for rank {}",
            indices.len(),
            dims.len()
        )));
    }
    for (dimension, (&index, &size)) in indices.iter().zip(dims).enumerate() {
        if index >= size {
            return Err(TensorError::IndexOutOfRange {
                dimension,
                index,
                size,
            });
        }
    }
    let flat = layout::flat_index(strides, indices)?;
    if flat >= data_len {
        return Err(TensorError::Capacity {
            required: flat + 1,
            actual: data_len,
        });
    }
    Ok(flat)
}

impl<'a, E> TensorView<'a, E> {
    /// Wraps a borrowed slice under row-major strides for `dims`.
    pub fn new(data: &'a [E], dims: &[usize]) -> Result<Self> {
        let strides = layout::contiguous_strides(dims);
        Self::with_strides(data, dims, &strides)
    }

    /// Wraps a borrowed slice under explicit strides.
    pub fn with_strides(data: &'a [E], dims: &[usize], strides: &[usize]) -> Result<Self> {
        check_rank(dims, strides)?;
        check_capacity(data.len(), dims, strides)?;
        Ok(Self {
            data,
            dims: Dims::from_slice(dims),
            strides: Dims::from_slice(strides),
        })
    }

    /// Interop constructor over a raw pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must point to `len` initialized elements that outlive the view,
    /// with no concurrent mutation for the view's lifetime.
    pub unsafe fn from_raw_parts(ptr: *const E, len: usize, dims: &[usize]) -> Result<Self> {
        Self::new(std::slice::from_raw_parts(ptr, len), dims)
    }

    pub(crate) fn from_parts_unchecked(data: &'a [E], dims: Dims, strides: Dims) -> Self {
        Self {
            data,
            dims,
            strides,
        }
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    pub fn flat_len(&self) -> usize {
        layout::flat_len(&self.dims)
    }

    pub fn is_contiguous(&self) -> bool {
        layout::is_contiguous(&self.dims, &self.strides)
    }

    pub(crate) fn backing(&self) -> &'a [E] {
        self.data
    }

    /// Checked multi-index access.
    pub fn get(&self, indices: &[usize]) -> Result<&'a E> {
        let data = self.data;
        let flat = checked_offset(&self.dims, &self.strides, data.len(), indices)?;
        Ok(&data[flat])
    }

    /// Flat row-major contents; fails unless the view is contiguous.
    pub fn as_slice(&self) -> Result<&'a [E]> {
        if !self.is_contiguous() {
            return Err(TensorError::InvalidOperation(
                "flat access requires a contiguous view".into(),
            ));
        }
        let data = self.data;
        Ok(&data[..self.flat_len()])
    }

    /// Shrinks every dimension from the given start indices, keeping strides.
    pub fn slice(&self, starts: &[usize]) -> Result<TensorView<'a, E>> {
        let data = self.data;
        let (offset, dims) = slice_parts(&self.dims, &self.strides, starts)?;
        let data = if layout::flat_len(&dims) == 0 {
            &data[0..0]
        } else {
            &data[offset..]
        };
        Ok(TensorView {
            data,
            dims,
            strides: self.strides.clone(),
        })
    }

    /// Restricts each dimension to a half-open range.
    pub fn slice_ranges(&self, ranges: &[Range<usize>]) -> Result<TensorView<'a, E>> {
        let data = self.data;
        let (offset, dims) = range_parts(&self.dims, &self.strides, ranges)?;
        let data = if layout::flat_len(&dims) == 0 {
            &data[0..0]
        } else {
            &data[offset..]
        };
        Ok(TensorView {
            data,
            dims,
            strides: self.strides.clone(),
        })
    }

    /// Drops one dimension at a fixed index, producing a rank − 1 view.
    ///
    /// A rank-1 input yields a rank-0 scalar view wrapping exactly one
    /// element. The retained backing span covers the maximum reachable
    /// offset across the remaining dimensions, which holds for permuted
    /// and otherwise non-canonical strides.
    pub fn slice_dim(&self, dim: usize, index: usize) -> Result<TensorView<'a, E>> {
        let data = self.data;
        let (offset, dims, strides, span) =
            dim_removal_parts(&self.dims, &self.strides, dim, index)?;
        let data = if span == 0 {
            &data[0..0]
        } else {
            &data[offset..offset + span]
        };
        Ok(TensorView {
            data,
            dims,
            strides,
        })
    }

    /// Lazily walks sub-views along one dimension.
    ///
    /// The iterator is finite and restartable from scratch by calling
    /// `axis_iter` again.
    pub fn axis_iter(&self, dim: usize) -> Result<AxisIter<'a, E>> {
        if dim >= self.rank() {
            return Err(TensorError::ShapeMismatch(format!(
                "dimension {} is out of range for rank {}",
                dim,
                self.rank()
            )));
        }
        Ok(AxisIter {
            view: self.clone(),
            dim,
            next: 0,
        })
    }

    /// Elementwise content comparison in multi-index order.
    pub fn item_eq(&self, other: &TensorView<'_, E>) -> bool
    where
        E: PartialEq,
    {
        if self.dims != other.dims {
            return false;
        }
        let len = self.flat_len();
        if len == 0 {
            return true;
        }
        let mut coord = Dims::new();
        for flat in 0..len {
            layout::unravel_index_into(flat, &self.dims, &mut coord);
            match (self.get(&coord), other.get(&coord)) {
                (Ok(a), Ok(b)) if a == b => {}
                _ => return false,
            }
        }
        true
    }
}

/// Views compare by backing identity and shape, not element contents.
impl<E> PartialEq for TensorView<'_, E> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.data.as_ptr(), other.data.as_ptr()) && self.dims == other.dims
    }
}

impl<'a, E> From<&'a [E]> for TensorView<'a, E> {
    fn from(data: &'a [E]) -> Self {
        let len = data.len();
        TensorView {
            data,
            dims: smallvec![len],
            strides: smallvec![1],
        }
    }
}

impl<E> Index<&[usize]> for TensorView<'_, E> {
    type Output = E;

    fn index(&self, indices: &[usize]) -> &E {
        self.get(indices).expect("tensor index out of bounds")
    }
}

impl<E> fmt::Debug for TensorView<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TensorView")
            .field("dims", &self.dims)
            .field("strides", &self.strides)
            .field("backing_len", &self.data.len())
            .finish()
    }
}

/// Iterator of rank − 1 sub-views along one dimension.
pub struct AxisIter<'a, E> {
    view: TensorView<'a, E>,
    dim: usize,
    next: usize,
}

impl<'a, E> Iterator for AxisIter<'a, E> {
    type Item = TensorView<'a, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.view.dims[self.dim] {
            return None;
        }
        let item = self.view.slice_dim(self.dim, self.next).ok();
        self.next += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.view.dims[self.dim] - self.next;
        (remaining, Some(remaining))
    }
}

impl<E> ExactSizeIterator for AxisIter<'_, E> {}

impl<'a, E> TensorViewMut<'a, E> {
    /// Wraps a mutable slice under row-major strides for `dims`.
    pub fn new(data: &'a mut [E], dims: &[usize]) -> Result<Self> {
        let strides = layout::contiguous_strides(dims);
        Self::with_strides(data, dims, &strides)
    }

    /// Wraps a mutable slice under explicit strides.
    pub fn with_strides(data: &'a mut [E], dims: &[usize], strides: &[usize]) -> Result<Self> {
        check_rank(dims, strides)?;
        check_capacity(data.len(), dims, strides)?;
        Ok(Self {
            data,
            dims: Dims::from_slice(dims),
            strides: Dims::from_slice(strides),
        })
    }

    /// Interop constructor over a raw pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must point to `len` initialized elements that outlive the view,
    /// with no other access for the view's lifetime.
    pub unsafe fn from_raw_parts(ptr: *mut E, len: usize, dims: &[usize]) -> Result<Self> {
        Self::new(std::slice::from_raw_parts_mut(ptr, len), dims)
    }

    pub(crate) fn from_parts_unchecked(data: &'a mut [E], dims: Dims, strides: Dims) -> Self {
        Self {
            data,
            dims,
            strides,
        }
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    pub fn flat_len(&self) -> usize {
        layout::flat_len(&self.dims)
    }

    pub fn is_contiguous(&self) -> bool {
        layout::is_contiguous(&self.dims, &self.strides)
    }

    /// Reborrows as a read-only view.
    pub fn as_view(&self) -> TensorView<'_, E> {
        TensorView {
            data: self.data,
            dims: self.dims.clone(),
            strides: self.strides.clone(),
        }
    }

    /// Checked multi-index access.
    pub fn get(&self, indices: &[usize]) -> Result<&E> {
        let flat = checked_offset(&self.dims, &self.strides, self.data.len(), indices)?;
        Ok(&self.data[flat])
    }

    /// Checked mutable multi-index access.
    pub fn get_mut(&mut self, indices: &[usize]) -> Result<&mut E> {
        let flat = checked_offset(&self.dims, &self.strides, self.data.len(), indices)?;
        Ok(&mut self.data[flat])
    }

    /// Flat row-major contents; fails unless the view is contiguous.
    pub fn as_slice(&self) -> Result<&[E]> {
        if !self.is_contiguous() {
            return Err(TensorError::InvalidOperation(
                "flat access requires a contiguous view".into(),
            ));
        }
        let len = self.flat_len();
        Ok(&self.data[..len])
    }

    /// Mutable flat contents; fails rather than aliasing a strided,
    /// non-contiguous region.
    pub fn as_slice_mut(&mut self) -> Result<&mut [E]> {
        if !self.is_contiguous() {
            return Err(TensorError::InvalidOperation(
                "mutable flat access requires a contiguous view".into(),
            ));
        }
        let len = self.flat_len();
        Ok(&mut self.data[..len])
    }

    /// Mutable sub-window from per-dimension start indices.
    pub fn slice_mut(&mut self, starts: &[usize]) -> Result<TensorViewMut<'_, E>> {
        let (offset, dims) = slice_parts(&self.dims, &self.strides, starts)?;
        let data = if layout::flat_len(&dims) == 0 {
            &mut self.data[0..0]
        } else {
            &mut self.data[offset..]
        };
        Ok(TensorViewMut {
            data,
            dims,
            strides: self.strides.clone(),
        })
    }

    /// Mutable rank − 1 sub-view at a fixed index of one dimension.
    pub fn slice_dim_mut(&mut self, dim: usize, index: usize) -> Result<TensorViewMut<'_, E>> {
        let (offset, dims, strides, span) =
            dim_removal_parts(&self.dims, &self.strides, dim, index)?;
        let data = if span == 0 {
            &mut self.data[0..0]
        } else {
            &mut self.data[offset..offset + span]
        };
        Ok(TensorViewMut {
            data,
            dims,
            strides,
        })
    }

    /// Writes `value` over every addressable element.
    pub fn fill(&mut self, value: E)
    where
        E: Copy,
    {
        if self.is_contiguous() {
            let len = self.flat_len();
            self.data[..len].fill(value);
            return;
        }
        if self.flat_len() == 0 {
            return;
        }
        let mut coord = Dims::from_elem(0, self.rank());
        loop {
            let flat: usize = coord.iter().zip(&self.strides).map(|(c, s)| c * s).sum();
            self.data[flat] = value;
            let mut dim = self.rank();
            loop {
                if dim == 0 {
                    return;
                }
                dim -= 1;
                coord[dim] += 1;
                if coord[dim] < self.dims[dim] {
                    break;
                }
                coord[dim] = 0;
            }
        }
    }
}

/// Mutable views compare by backing identity and shape.
impl<E> PartialEq for TensorViewMut<'_, E> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.data.as_ptr(), other.data.as_ptr()) && self.dims == other.dims
    }
}

impl<'a, E> From<&'a mut [E]> for TensorViewMut<'a, E> {
    fn from(data: &'a mut [E]) -> Self {
        let len = data.len();
        TensorViewMut {
            data,
            dims: smallvec![len],
            strides: smallvec![1],
        }
    }
}

impl<E> Index<&[usize]> for TensorViewMut<'_, E> {
    type Output = E;

    fn index(&self, indices: &[usize]) -> &E {
        self.get(indices).expect("tensor index out of bounds")
    }
}

impl<E> IndexMut<&[usize]> for TensorViewMut<'_, E> {
    fn index_mut(&mut self, indices: &[usize]) -> &mut E {
        self.get_mut(indices).expect("tensor index out of bounds")
    }
}

impl<E> fmt::Debug for TensorViewMut<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TensorViewMut")
            .field("dims", &self.dims)
            .field("strides", &self.strides)
            .field("backing_len", &self.data.len())
            .finish()
    }
}
