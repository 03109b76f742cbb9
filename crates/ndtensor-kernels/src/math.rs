//! Transcendental and rounding kernels for real element types.

use num_traits::Float;

use crate::element::Real;
use crate::elementwise::{binary_op, unary_op};
use crate::error::Result;

/// Elementwise natural exponential.
pub fn exp<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Float::exp)
}

/// Elementwise base-2 exponential.
pub fn exp2<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Float::exp2)
}

/// Elementwise base-10 exponential.
pub fn exp10<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Real::exp10)
}

/// Elementwise `e^x - 1`, accurate near zero.
pub fn exp_m1<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Float::exp_m1)
}

/// Elementwise `2^x - 1`.
pub fn exp2_m1<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Real::exp2_m1)
}

/// Elementwise `10^x - 1`.
pub fn exp10_m1<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Real::exp10_m1)
}

/// Elementwise natural logarithm.
pub fn ln<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Float::ln)
}

/// Elementwise `ln(1 + x)`, accurate near zero.
pub fn ln_1p<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Float::ln_1p)
}

/// Elementwise base-2 logarithm.
pub fn log2<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Float::log2)
}

/// Elementwise `log2(1 + x)`.
pub fn log2_p1<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Real::log2_p1)
}

/// Elementwise base-10 logarithm.
pub fn log10<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Float::log10)
}

/// Elementwise `log10(1 + x)`.
pub fn log10_p1<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Real::log10_p1)
}

/// Elementwise `base^exponent` over two slices.
pub fn pow<E: Real>(base: &[E], exponent: &[E], dst: &mut [E]) -> Result<()> {
    binary_op(base, exponent, dst, Float::powf)
}

/// Elementwise `base^exponent` with a scalar exponent.
pub fn pow_scalar<E: Real>(base: &[E], exponent: E, dst: &mut [E]) -> Result<()> {
    unary_op(base, dst, |v| v.powf(exponent))
}

/// Elementwise square root.
pub fn sqrt<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Float::sqrt)
}

/// Elementwise cube root.
pub fn cbrt<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Float::cbrt)
}

/// Elementwise principal n-th root.
pub fn root_n<E: Real>(x: &[E], n: u32, dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, |v| Real::root_n(v, n))
}

/// Elementwise multiplicative inverse.
pub fn reciprocal<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Float::recip)
}

/// Elementwise sine.
pub fn sin<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Float::sin)
}

/// Elementwise cosine.
pub fn cos<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Float::cos)
}

/// Elementwise tangent.
pub fn tan<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Float::tan)
}

/// Elementwise arcsine.
pub fn asin<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Float::asin)
}

/// Elementwise arccosine.
pub fn acos<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Float::acos)
}

/// Elementwise arctangent.
pub fn atan<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Float::atan)
}

/// Elementwise `sin(pi * x)`.
pub fn sin_pi<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Real::sin_pi)
}

/// Elementwise `cos(pi * x)`.
pub fn cos_pi<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Real::cos_pi)
}

/// Elementwise `tan(pi * x)`.
pub fn tan_pi<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Real::tan_pi)
}

/// Elementwise `asin(x) / pi`.
pub fn asin_pi<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Real::asin_pi)
}

/// Elementwise `acos(x) / pi`.
pub fn acos_pi<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Real::acos_pi)
}

/// Elementwise `atan(x) / pi`.
pub fn atan_pi<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Real::atan_pi)
}

/// Elementwise hyperbolic sine.
pub fn sinh<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Float::sinh)
}

/// Elementwise hyperbolic cosine.
pub fn cosh<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Float::cosh)
}

/// Elementwise hyperbolic tangent.
pub fn tanh<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Float::tanh)
}

/// Elementwise inverse hyperbolic sine.
pub fn asinh<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Float::asinh)
}

/// Elementwise inverse hyperbolic cosine.
pub fn acosh<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Float::acosh)
}

/// Elementwise inverse hyperbolic tangent.
pub fn atanh<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Float::atanh)
}

/// Elementwise floor.
pub fn floor<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Float::floor)
}

/// Elementwise ceiling.
pub fn ceil<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Float::ceil)
}

/// Elementwise rounding to the nearest integer, ties away from zero.
pub fn round<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Float::round)
}

/// Elementwise truncation toward zero.
pub fn trunc<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Float::trunc)
}

/// Converts radians to degrees elementwise.
pub fn degrees<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Float::to_degrees)
}

/// Converts degrees to radians elementwise.
pub fn radians<E: Real>(x: &[E], dst: &mut [E]) -> Result<()> {
    unary_op(x, dst, Float::to_radians)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{a} vs {e}");
        }
    }

    #[test]
    fn exp_ln_roundtrip() {
        let x = [0.5f64, 1.0, 2.0];
        let mut up = [0.0f64; 3];
        let mut back = [0.0f64; 3];
        exp(&x, &mut up).unwrap();
        ln(&up, &mut back).unwrap();
        assert_close(&back, &x);
    }

    #[test]
    fn exp10_powers() {
        let mut dst = [0.0f64; 3];
        exp10(&[0.0, 1.0, 2.0], &mut dst).unwrap();
        assert_close(&dst, &[1.0, 10.0, 100.0]);
    }

    #[test]
    fn pow_scalar_squares() {
        let mut dst = [0.0f64; 3];
        pow_scalar(&[1.0, 2.0, 3.0], 2.0, &mut dst).unwrap();
        assert_close(&dst, &[1.0, 4.0, 9.0]);
    }

    #[test]
    fn root_n_is_inverse_of_pow() {
        let mut dst = [0.0f64; 2];
        root_n(&[27.0, -27.0], 3, &mut dst).unwrap();
        assert_close(&dst, &[3.0, -3.0]);
    }

    #[test]
    fn rounding_family() {
        let x = [1.5f64, -1.5, 2.3];
        let mut dst = [0.0f64; 3];
        floor(&x, &mut dst).unwrap();
        assert_close(&dst, &[1.0, -2.0, 2.0]);
        ceil(&x, &mut dst).unwrap();
        assert_close(&dst, &[2.0, -1.0, 3.0]);
        round(&x, &mut dst).unwrap();
        assert_close(&dst, &[2.0, -2.0, 2.0]);
        trunc(&x, &mut dst).unwrap();
        assert_close(&dst, &[1.0, -1.0, 2.0]);
    }

    #[test]
    fn degree_radian_roundtrip() {
        let x = [0.0f64, std::f64::consts::FRAC_PI_2, std::f64::consts::PI];
        let mut deg = [0.0f64; 3];
        let mut rad = [0.0f64; 3];
        degrees(&x, &mut deg).unwrap();
        assert_close(&deg, &[0.0, 90.0, 180.0]);
        radians(&deg, &mut rad).unwrap();
        assert_close(&rad, &x);
    }
}
