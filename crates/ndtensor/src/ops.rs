//! Tensor-level numeric API.
//!
//! These methods compose the broadcast engine with the flat-sequence
//! kernels: operands are broadcast to a common shape, densified to
//! row-major order, and handed to the kernel crate. Enumeration is always
//! multi-index order, never raw backing order, so strided inputs behave
//! identically to their dense copies.

use ndtensor_kernels::{activation, elementwise, extrema, math, reduce, Numeric, Real};

use crate::broadcast;
use crate::error::{Result, TensorError};
use crate::layout;
use crate::tensor::Tensor;

impl<E: Numeric> Tensor<E> {
    fn prepared(&self, dims: &[usize]) -> Result<Tensor<E>> {
        if self.dims() == dims {
            self.to_contiguous()
        } else {
            broadcast::broadcast_to(&self.view(), dims)
        }
    }

    fn binary_kernel(
        &self,
        other: &Tensor<E>,
        kernel: impl Fn(&[E], &[E], &mut [E]) -> ndtensor_kernels::Result<()>,
    ) -> Result<Tensor<E>> {
        let dims = broadcast::broadcast_dims(self.dims(), other.dims())?;
        let lhs = self.prepared(&dims)?;
        let rhs = other.prepared(&dims)?;
        let mut out = vec![E::zero(); layout::flat_len(&dims)];
        kernel(
            lhs.view().as_slice()?,
            rhs.view().as_slice()?,
            &mut out,
        )?;
        Tensor::from_vec(out, &dims)
    }

    fn unary_kernel(
        &self,
        kernel: impl Fn(&[E], &mut [E]) -> ndtensor_kernels::Result<()>,
    ) -> Result<Tensor<E>> {
        let base = self.to_contiguous()?;
        let mut out = vec![E::zero(); self.flat_len()];
        kernel(base.view().as_slice()?, &mut out)?;
        Tensor::from_vec(out, self.dims())
    }

    /// Broadcasting elementwise sum.
    pub fn add(&self, other: &Tensor<E>) -> Result<Tensor<E>> {
        self.binary_kernel(other, elementwise::add)
    }

    /// Broadcasting elementwise difference.
    pub fn sub(&self, other: &Tensor<E>) -> Result<Tensor<E>> {
        self.binary_kernel(other, elementwise::sub)
    }

    /// Broadcasting elementwise product.
    pub fn mul(&self, other: &Tensor<E>) -> Result<Tensor<E>> {
        self.binary_kernel(other, elementwise::mul)
    }

    /// Broadcasting elementwise quotient.
    pub fn div(&self, other: &Tensor<E>) -> Result<Tensor<E>> {
        self.binary_kernel(other, elementwise::div)
    }

    /// Adds a scalar to every element.
    pub fn add_scalar(&self, scalar: E) -> Result<Tensor<E>> {
        self.unary_kernel(|src, dst| elementwise::add_scalar(src, scalar, dst))
    }

    /// Subtracts a scalar from every element.
    pub fn sub_scalar(&self, scalar: E) -> Result<Tensor<E>> {
        self.unary_kernel(|src, dst| elementwise::sub_scalar(src, scalar, dst))
    }

    /// Multiplies every element by a scalar.
    pub fn mul_scalar(&self, scalar: E) -> Result<Tensor<E>> {
        self.unary_kernel(|src, dst| elementwise::mul_scalar(src, scalar, dst))
    }

    /// Divides every element by a scalar.
    pub fn div_scalar(&self, scalar: E) -> Result<Tensor<E>> {
        self.unary_kernel(|src, dst| elementwise::div_scalar(src, scalar, dst))
    }

    /// Elementwise additive inverse.
    pub fn neg(&self) -> Result<Tensor<E>> {
        self.unary_kernel(elementwise::neg)
    }

    /// Elementwise magnitude.
    pub fn abs(&self) -> Result<Tensor<E>> {
        self.unary_kernel(elementwise::abs)
    }

    /// Sum of every element.
    pub fn sum(&self) -> Result<E> {
        Ok(reduce::sum(self.to_contiguous()?.view().as_slice()?))
    }

    /// Product of every element.
    pub fn product(&self) -> Result<E> {
        Ok(reduce::product(self.to_contiguous()?.view().as_slice()?))
    }

    /// Smallest element (NaN-propagating).
    pub fn min(&self) -> Result<E> {
        Ok(extrema::min(self.to_contiguous()?.view().as_slice()?)?)
    }

    /// Largest element (NaN-propagating).
    pub fn max(&self) -> Result<E> {
        Ok(extrema::max(self.to_contiguous()?.view().as_slice()?)?)
    }

    /// Dot product over the flattened elements of two same-shape tensors.
    pub fn dot(&self, other: &Tensor<E>) -> Result<E> {
        if self.dims() != other.dims() {
            return Err(TensorError::ShapeMismatch(format!(
                "dot requires identical shapes: {:?} vs {:?}",
                self.dims(),
                other.dims()
            )));
        }
        Ok(reduce::dot(
            self.to_contiguous()?.view().as_slice()?,
            other.to_contiguous()?.view().as_slice()?,
        )?)
    }
}

impl<E: Real> Tensor<E> {
    /// Arithmetic mean of every element.
    pub fn mean(&self) -> Result<E> {
        Ok(reduce::mean(self.to_contiguous()?.view().as_slice()?)?)
    }

    /// Euclidean norm of the flattened elements.
    pub fn norm(&self) -> Result<E> {
        Ok(reduce::norm(self.to_contiguous()?.view().as_slice()?))
    }

    /// Elementwise natural exponential.
    pub fn exp(&self) -> Result<Tensor<E>> {
        self.unary_kernel(math::exp)
    }

    /// Elementwise natural logarithm.
    pub fn ln(&self) -> Result<Tensor<E>> {
        self.unary_kernel(math::ln)
    }

    /// Elementwise square root.
    pub fn sqrt(&self) -> Result<Tensor<E>> {
        self.unary_kernel(math::sqrt)
    }

    /// Elementwise hyperbolic tangent.
    pub fn tanh(&self) -> Result<Tensor<E>> {
        self.unary_kernel(math::tanh)
    }

    /// Elementwise logistic sigmoid.
    pub fn sigmoid(&self) -> Result<Tensor<E>> {
        self.unary_kernel(activation::sigmoid)
    }

    /// Max-shifted softmax over the flattened elements.
    pub fn softmax(&self) -> Result<Tensor<E>> {
        self.unary_kernel(activation::softmax)
    }
}
