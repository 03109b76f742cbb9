//! Activation kernels.

use num_traits::Float;

use crate::element::Real;
use crate::elementwise::unary_op;
use crate::error::{check_dst, KernelError, Result};
use crate::extrema;

/// Elementwise logistic sigmoid `1 / (1 + e^-x)`.
pub fn sigmoid<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, |v| (E::one() + (-v).exp()).recip())
}

/// Elementwise hyperbolic tangent.
pub fn tanh<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Float::tanh)
}

/// Softmax over the whole slice.
///
/// Shifts by the maximum before exponentiating so large inputs cannot
/// overflow, then normalizes by the sum.
pub fn softmax<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    if x.is_empty() {
        return Err(KernelError::EmptyInput { op: "softmax" });
    }
    check_dst(x.len(), dst.len())?;
    let shift = extrema::max(x)?;
    let mut total = E::zero();
    for (d, &v) in dst.iter_mut().zip(x) {
        let e = (v - shift).exp();
        *d = e;
        total = total + e;
    }
    for d in dst.iter_mut().take(x.len()) {
        *d = *d / total;
    }
    Ok(())
}
