//! Reductions and vector-to-scalar kernels.
//!
//! Empty-input policy: `sum` and `product` return their identity, everything
//! that has no meaningful identity reports `EmptyInput`.

use num_traits::NumCast;

use crate::element::{Numeric, Real};
use crate::error::{check_same_len, KernelError, Result};

/// Sum of all elements; zero for an empty slice.
pub fn sum<E: Numeric>(x: &[E]) -> E {
    x.iter().fold(E::zero(), |acc, &v| acc + v)
}

/// Product of all elements; one for an empty slice.
pub fn product<E: Numeric>(x: &[E]) -> E {
    x.iter().fold(E::one(), |acc, &v| acc * v)
}

/// Sum of element magnitudes.
pub fn sum_of_magnitudes<E: Numeric>(x: &[E]) -> E {
    x.iter().fold(E::zero(), |acc, &v| acc + Numeric::abs(v))
}

/// Sum of squared elements.
pub fn sum_of_squares<E: Numeric>(x: &[E]) -> E {
    x.iter().fold(E::zero(), |acc, &v| acc + v * v)
}

/// Euclidean (L2) norm.
pub fn norm<E: Real>(x: &[E]) -> E {
    sum_of_squares(x).sqrt()
}

/// Arithmetic mean.
pub fn mean<E: Real>(x: &[E]) -> Result<E> {
    if x.is_empty() {
        return Err(KernelError::EmptyInput { op: "mean" });
    }
    let count = <E as NumCast>::from(x.len()).unwrap_or_else(E::nan);
    Ok(sum(x) / count)
}

/// Dot product of two equal-length slices.
pub fn dot<E: Numeric>(lhs: &[E], rhs: &[E]) -> Result<E> {
    check_same_len(lhs.len(), rhs.len())?;
    let mut acc = E::zero();
    for (&a, &b) in lhs.iter().zip(rhs) {
        acc = a.mul_add(b, acc);
    }
    Ok(acc)
}

/// Squared Euclidean distance between two equal-length slices.
pub fn distance_squared<E: Real>(lhs: &[E], rhs: &[E]) -> Result<E> {
    check_same_len(lhs.len(), rhs.len())?;
    let mut acc = E::zero();
    for (&a, &b) in lhs.iter().zip(rhs) {
        let d = a - b;
        acc = Numeric::mul_add(d, d, acc);
    }
    Ok(acc)
}

/// Euclidean distance between two equal-length slices.
pub fn distance<E: Real>(lhs: &[E], rhs: &[E]) -> Result<E> {
    Ok(distance_squared(lhs, rhs)?.sqrt())
}

/// Cosine similarity `dot(a, b) / (|a| * |b|)`.
///
/// Returns NaN when either operand has zero norm; fails on empty input.
pub fn cosine_similarity<E: Real>(lhs: &[E], rhs: &[E]) -> Result<E> {
    check_same_len(lhs.len(), rhs.len())?;
    if lhs.is_empty() {
        return Err(KernelError::EmptyInput {
            op: "cosine_similarity",
        });
    }
    let d = dot(lhs, rhs)?;
    Ok(d / (norm(lhs) * norm(rhs)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_of_row_major_grid() {
        assert_eq!(sum(&[1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0]), 21.0);
        assert_eq!(sum::<i32>(&[]), 0);
    }

    #[test]
    fn product_identity_on_empty() {
        assert_eq!(product::<i32>(&[]), 1);
        assert_eq!(product(&[2i32, 3, 4]), 24);
    }

    #[test]
    fn magnitudes_and_squares() {
        assert_eq!(sum_of_magnitudes(&[-1i32, 2, -3]), 6);
        assert_eq!(sum_of_squares(&[1i32, 2, 3]), 14);
    }

    #[test]
    fn norm_of_three_four() {
        assert!((norm(&[3.0f64, 4.0]) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn mean_rejects_empty() {
        assert!(matches!(
            mean::<f64>(&[]),
            Err(KernelError::EmptyInput { op: "mean" })
        ));
        assert_eq!(mean(&[1.0f64, 2.0, 3.0]).unwrap(), 2.0);
    }

    #[test]
    fn dot_and_distance() {
        assert_eq!(dot(&[1.0f64, 2.0], &[3.0, 4.0]).unwrap(), 11.0);
        assert_eq!(distance_squared(&[0.0f64, 0.0], &[3.0, 4.0]).unwrap(), 25.0);
        assert!((distance(&[0.0f64, 0.0], &[3.0, 4.0]).unwrap() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn dot_requires_equal_lengths() {
        assert!(matches!(
            dot(&[1.0f64], &[1.0, 2.0]),
            Err(KernelError::LengthMismatch { left: 1, right: 2 })
        ));
    }

    #[test]
    fn cosine_of_parallel_vectors_is_one() {
        let sim = cosine_similarity(&[1.0f64, 2.0], &[2.0, 4.0]).unwrap();
        assert!((sim - 1.0).abs() < 1e-12);
    }
}
