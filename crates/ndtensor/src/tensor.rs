//! Heap-owning tensor handle.
//!
//! A `Tensor` owns one flat buffer behind an `Arc` and carves views out of
//! it. Slicing produces further `Tensor` handles that alias the same buffer
//! (shared ownership); mutation requires the handle to be the unique owner
//! of the backing allocation, which is the borrow-checked rendition of
//! "callers serialize concurrent writes". There is no copy-on-write and no
//! locking.

use std::fmt;
use std::ops::{Index, IndexMut, Range};
use std::sync::Arc;

use ndtensor_kernels::{Numeric, Real};
use num_traits::NumCast;
use rand::Rng;

use crate::error::{Result, TensorError};
use crate::layout::{self, Dims};
use crate::transform;
use crate::view::{self, TensorView, TensorViewMut};

/// Owning tensor over reference-counted flat storage.
pub struct Tensor<E> {
    buf: Arc<Vec<E>>,
    offset: usize,
    dims: Dims,
    strides: Dims,
}

/// Aliasing clone: the new handle shares the same backing buffer.
impl<E> Clone for Tensor<E> {
    fn clone(&self) -> Self {
        Self {
            buf: Arc::clone(&self.buf),
            offset: self.offset,
            dims: self.dims.clone(),
            strides: self.strides.clone(),
        }
    }
}

fn aliased() -> TensorError {
    TensorError::InvalidOperation(
        "backing buffer is shared by another handle or pin; mutation requires unique ownership"
            .into(),
    )
}

impl<E> Tensor<E> {
    /// Takes ownership of row-major data for the given shape.
    pub fn from_vec(data: Vec<E>, dims: &[usize]) -> Result<Self> {
        let required = layout::flat_len(dims);
        if data.len() != required {
            return Err(TensorError::ShapeMismatch(format!(
                "data length {} does not match shape {:?}",
                data.len(),
                dims
            )));
        }
        Ok(Self {
            buf: Arc::new(data),
            offset: 0,
            dims: Dims::from_slice(dims),
            strides: layout::contiguous_strides(dims),
        })
    }

    /// Takes ownership of a buffer under explicit strides.
    ///
    /// Deliberately overlapping or otherwise non-canonical layouts are
    /// allowed as long as the buffer covers every reachable offset.
    pub fn from_parts(data: Vec<E>, dims: &[usize], strides: &[usize]) -> Result<Self> {
        view::check_rank(dims, strides)?;
        view::check_capacity(data.len(), dims, strides)?;
        Ok(Self {
            buf: Arc::new(data),
            offset: 0,
            dims: Dims::from_slice(dims),
            strides: Dims::from_slice(strides),
        })
    }

    pub(crate) fn from_arc_parts(buf: Arc<Vec<E>>, offset: usize, dims: Dims, strides: Dims) -> Self {
        Self {
            buf,
            offset,
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

    pub(crate) fn buf(&self) -> &Arc<Vec<E>> {
        &self.buf
    }

    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    /// Backing elements addressable by this handle, starting at its offset.
    ///
    /// Clamped to what the buffer actually holds so degenerate empty
    /// handles surface capacity errors instead of panicking.
    fn span(&self) -> usize {
        let available = self.buf.len().saturating_sub(self.offset);
        if self.dims.is_empty() {
            // A rank-0 handle wraps one element when its offset has one.
            usize::min(1, available)
        } else {
            usize::min(layout::required_span(&self.dims, &self.strides), available)
        }
    }

    /// Borrowed read-only view over the whole tensor.
    pub fn view(&self) -> TensorView<'_, E> {
        let span = self.span();
        let data = if span == 0 {
            &self.buf[0..0]
        } else {
            &self.buf[self.offset..self.offset + span]
        };
        TensorView::from_parts_unchecked(data, self.dims.clone(), self.strides.clone())
    }

    /// Borrowed mutable view; fails while any other handle or pin aliases
    /// the backing buffer.
    pub fn view_mut(&mut self) -> Result<TensorViewMut<'_, E>> {
        let span = self.span();
        let offset = self.offset;
        let dims = self.dims.clone();
        let strides = self.strides.clone();
        let buf = Arc::get_mut(&mut self.buf).ok_or_else(aliased)?;
        let data = if span == 0 {
            &mut buf[0..0]
        } else {
            &mut buf[offset..offset + span]
        };
        Ok(TensorViewMut::from_parts_unchecked(data, dims, strides))
    }

    /// Aliasing sub-tensor from per-dimension start indices.
    pub fn slice(&self, starts: &[usize]) -> Result<Tensor<E>> {
        let (delta, dims) = view::slice_parts(&self.dims, &self.strides, starts)?;
        Ok(Self {
            buf: Arc::clone(&self.buf),
            offset: self.offset + delta,
            dims,
            strides: self.strides.clone(),
        })
    }

    /// Aliasing sub-tensor from one half-open range per dimension.
    pub fn slice_ranges(&self, ranges: &[Range<usize>]) -> Result<Tensor<E>> {
        let (delta, dims) = view::range_parts(&self.dims, &self.strides, ranges)?;
        Ok(Self {
            buf: Arc::clone(&self.buf),
            offset: self.offset + delta,
            dims,
            strides: self.strides.clone(),
        })
    }

    /// Aliasing rank − 1 sub-tensor at a fixed index of one dimension.
    pub fn slice_dim(&self, dim: usize, index: usize) -> Result<Tensor<E>> {
        let (delta, dims, strides, _span) =
            view::dim_removal_parts(&self.dims, &self.strides, dim, index)?;
        Ok(Self {
            buf: Arc::clone(&self.buf),
            offset: self.offset + delta,
            dims,
            strides,
        })
    }

    /// Checked multi-index access.
    pub fn get(&self, indices: &[usize]) -> Result<&E> {
        self.view().get(indices)
    }

    /// Checked mutable multi-index access; requires unique ownership.
    pub fn get_mut(&mut self, indices: &[usize]) -> Result<&mut E> {
        let flat = view::checked_offset(&self.dims, &self.strides, self.span(), indices)?;
        let offset = self.offset;
        let buf = Arc::get_mut(&mut self.buf).ok_or_else(aliased)?;
        Ok(&mut buf[offset + flat])
    }

    /// Pins the backing buffer, yielding a stable base address for interop.
    ///
    /// The guard holds the allocation alive and non-relocatable for its own
    /// lifetime; while any guard lives, the unique-owner rule also blocks
    /// mutation through tensor handles. Repeated calls hand out further
    /// guards over the same buffer, and each guard releases exactly once
    /// when dropped.
    pub fn pin(&self) -> PinGuard<E> {
        PinGuard {
            buf: Arc::clone(&self.buf),
            offset: self.offset,
            len: self.span(),
        }
    }

    /// Elementwise content comparison in multi-index order.
    pub fn item_eq(&self, other: &Tensor<E>) -> bool
    where
        E: PartialEq,
    {
        self.view().item_eq(&other.view())
    }
}

impl<E: Copy> Tensor<E> {
    /// Copies a borrowed row-major slice into a new tensor.
    pub fn from_slice(data: &[E], dims: &[usize]) -> Result<Self> {
        Self::from_vec(data.to_vec(), dims)
    }

    /// Tensor of the given shape with every element set to `value`.
    pub fn from_elem(dims: &[usize], value: E) -> Self {
        let len = layout::flat_len(dims);
        Self {
            buf: Arc::new(vec![value; len]),
            offset: 0,
            dims: Dims::from_slice(dims),
            strides: layout::contiguous_strides(dims),
        }
    }

    /// Row-major copy of this tensor, or an aliasing handle when the layout
    /// is already contiguous.
    pub fn to_contiguous(&self) -> Result<Tensor<E>> {
        if self.is_contiguous() {
            return Ok(self.clone());
        }
        let dims = self.dims.clone();
        transform::remap_new(&self.view(), &dims, |dst, src| {
            src.clear();
            src.extend_from_slice(dst);
        })
    }

    /// Writes `value` over every addressable element of this handle.
    pub fn fill(&mut self, value: E) -> Result<()> {
        self.view_mut()?.fill(value);
        Ok(())
    }
}

impl<E: Copy + Default> Tensor<E> {
    /// Resets every addressable element to the element type's default.
    pub fn clear(&mut self) -> Result<()> {
        self.fill(E::default())
    }
}

impl<E: Numeric> Tensor<E> {
    /// Zero-initialized tensor of the given shape.
    pub fn zeros(dims: &[usize]) -> Self {
        Self::from_elem(dims, E::zero())
    }

    /// Rank-1 tensor counting `0, 1, .., len - 1` in the element type.
    pub fn arange(len: usize) -> Result<Self> {
        let data = (0..len)
            .map(|i| {
                <E as NumCast>::from(i).ok_or_else(|| {
                    TensorError::InvalidOperation(format!(
                        "value {i} is not representable in the element type"
                    ))
                })
            })
            .collect::<Result<Vec<E>>>()?;
        Self::from_vec(data, &[len])
    }
}

impl<E: Real> Tensor<E> {
    /// Rank-1 tensor of `count` evenly spaced values from `start` through
    /// `end` inclusive.
    pub fn linspace(start: E, end: E, count: usize) -> Result<Self> {
        if count < 2 {
            let data = if count == 0 { Vec::new() } else { vec![start] };
            return Self::from_vec(data, &[count]);
        }
        let denom = <E as NumCast>::from(count - 1).unwrap_or_else(E::nan);
        let step = (end - start) / denom;
        let data = (0..count)
            .map(|i| start + step * <E as NumCast>::from(i).unwrap_or_else(E::nan))
            .collect();
        Self::from_vec(data, &[count])
    }

    /// Tensor of samples drawn uniformly from `[lo, hi)`.
    pub fn uniform<R: Rng>(dims: &[usize], lo: E, hi: E, rng: &mut R) -> Self {
        let len = layout::flat_len(dims);
        let data = (0..len)
            .map(|_| {
                let r = <E as NumCast>::from(rng.gen::<f64>()).unwrap_or_else(E::nan);
                lo + (hi - lo) * r
            })
            .collect();
        Self {
            buf: Arc::new(data),
            offset: 0,
            dims: Dims::from_slice(dims),
            strides: layout::contiguous_strides(dims),
        }
    }

    /// Tensor of `N(0, std^2)` samples via the Box-Muller transform.
    pub fn randn<R: Rng>(dims: &[usize], std: E, rng: &mut R) -> Self {
        let len = layout::flat_len(dims);
        let mut values = Vec::with_capacity(len);
        while values.len() < len {
            let u1 = rng.gen::<f64>().max(f64::MIN_POSITIVE);
            let u2 = rng.gen::<f64>();
            let r = (-2.0 * u1.ln()).sqrt();
            let theta = 2.0 * std::f64::consts::PI * u2;
            let z0 = <E as NumCast>::from(r * theta.cos()).unwrap_or_else(E::nan);
            values.push(z0 * std);
            if values.len() < len {
                let z1 = <E as NumCast>::from(r * theta.sin()).unwrap_or_else(E::nan);
                values.push(z1 * std);
            }
        }
        Self {
            buf: Arc::new(values),
            offset: 0,
            dims: Dims::from_slice(dims),
            strides: layout::contiguous_strides(dims),
        }
    }
}

/// Tensors compare by backing identity, start offset, and shape.
impl<E> PartialEq for Tensor<E> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.buf, &other.buf)
            && self.offset == other.offset
            && self.dims == other.dims
    }
}

impl<E> Index<&[usize]> for Tensor<E> {
    type Output = E;

    fn index(&self, indices: &[usize]) -> &E {
        self.get(indices).expect("tensor index out of bounds")
    }
}

impl<E> IndexMut<&[usize]> for Tensor<E> {
    fn index_mut(&mut self, indices: &[usize]) -> &mut E {
        self.get_mut(indices).expect("tensor index out of bounds")
    }
}

impl<E> fmt::Debug for Tensor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("dims", &self.dims)
            .field("strides", &self.strides)
            .field("offset", &self.offset)
            .field("shared", &(Arc::strong_count(&self.buf) > 1))
            .finish()
    }
}

/// Scoped pin over a tensor's backing buffer.
///
/// Holding a guard keeps the allocation at a stable address; dropping it
/// releases the pin exactly once.
pub struct PinGuard<E> {
    buf: Arc<Vec<E>>,
    offset: usize,
    len: usize,
}

impl<E> PinGuard<E> {
    /// Stable base address of the pinned region.
    pub fn as_ptr(&self) -> *const E {
        self.buf.as_ptr().wrapping_add(self.offset)
    }

    /// Number of addressable elements behind the pointer.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<E> fmt::Debug for PinGuard<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinGuard")
            .field("offset", &self.offset)
            .field("len", &self.len)
            .finish()
    }
}
