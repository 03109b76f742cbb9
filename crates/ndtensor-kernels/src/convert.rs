//! Element-wise numeric conversion between two element types.
//!
//! The three variants have genuinely distinct overflow semantics:
//! `convert_checked` fails on the first unrepresentable value,
//! `convert_saturating` clamps into the target range (NaN becomes zero),
//! and `convert_truncating` wraps like an `as` cast.

use num_traits::{AsPrimitive, NumCast};

use crate::element::Numeric;
use crate::error::{check_dst, KernelError, Result};

/// Converts each element, failing if any value is out of the target range.
///
/// Fractional values truncate toward zero when the target is an integer
/// type; only range overflow (or NaN into an integer) is an error. The
/// destination is untouched on failure.
pub fn convert_checked<S: Numeric, D: Numeric>(src: &[S], dst: &mut [D]) -> Result<()> {
    check_dst(src.len(), dst.len())?;
    for (index, &v) in src.iter().enumerate() {
        if <D as NumCast>::from(v).is_none() {
            return Err(KernelError::NarrowingOverflow { index });
        }
    }
    for (d, &v) in dst.iter_mut().zip(src) {
        *d = <D as NumCast>::from(v).unwrap_or_else(D::zero);
    }
    Ok(())
}

/// Converts each element, clamping out-of-range values to the target bounds.
///
/// NaN converts to zero, matching saturating float-to-integer semantics.
pub fn convert_saturating<S: Numeric, D: Numeric>(src: &[S], dst: &mut [D]) -> Result<()> {
    check_dst(src.len(), dst.len())?;
    for (d, &v) in dst.iter_mut().zip(src) {
        *d = match <D as NumCast>::from(v) {
            Some(converted) => converted,
            None if v.is_nan() => D::zero(),
            None if v < S::zero() => D::min_value(),
            None => D::max_value(),
        };
    }
    Ok(())
}

/// Converts each element with `as`-cast semantics (wrap-around on overflow).
pub fn convert_truncating<S, D>(src: &[S], dst: &mut [D]) -> Result<()>
where
    S: Numeric + AsPrimitive<D>,
    D: Numeric,
{
    check_dst(src.len(), dst.len())?;
    for (d, &v) in dst.iter_mut().zip(src) {
        *d = v.as_();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_passes_representable_values() {
        let mut dst = [0u8; 3];
        convert_checked(&[1i32, 2, 255], &mut dst).unwrap();
        assert_eq!(dst, [1, 2, 255]);
    }

    #[test]
    fn checked_reports_offending_index_atomically() {
        let mut dst = [7u8; 3];
        let err = convert_checked(&[1i32, 300, 2], &mut dst).unwrap_err();
        assert_eq!(err, KernelError::NarrowingOverflow { index: 1 });
        assert_eq!(dst, [7, 7, 7]);
    }

    #[test]
    fn checked_truncates_fractions() {
        let mut dst = [0i32; 2];
        convert_checked(&[2.7f64, -2.7], &mut dst).unwrap();
        assert_eq!(dst, [2, -2]);
    }

    #[test]
    fn saturating_clamps_both_sides() {
        let mut dst = [0u8; 3];
        convert_saturating(&[-5i32, 300, 42], &mut dst).unwrap();
        assert_eq!(dst, [0, 255, 42]);
    }

    #[test]
    fn saturating_maps_nan_to_zero() {
        let mut dst = [9i32; 2];
        convert_saturating(&[f32::NAN, 1e10], &mut dst).unwrap();
        assert_eq!(dst, [0, i32::MAX]);
    }

    #[test]
    fn truncating_wraps() {
        let mut dst = [0u8; 2];
        convert_truncating(&[300i32, -1], &mut dst).unwrap();
        assert_eq!(dst, [44, 255]);
    }

    #[test]
    fn widening_is_lossless_in_all_variants() {
        let src = [1u8, 128, 255];
        let mut a = [0u32; 3];
        let mut b = [0u32; 3];
        let mut c = [0u32; 3];
        convert_checked(&src, &mut a).unwrap();
        convert_saturating(&src, &mut b).unwrap();
        convert_truncating(&src, &mut c).unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(c, [1, 128, 255]);
    }
}
