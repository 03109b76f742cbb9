//! Scalar capability traits implemented once per concrete element type.
//!
//! Every kernel in this crate is generic over one of three traits: [`Element`]
//! for anything storable in a flat buffer, [`Numeric`] for arithmetic, and
//! [`Real`] for the transcendental surface. The set of implementing types is
//! closed; dispatch is monomorphized, never dynamic.

use std::fmt::Debug;

use bytemuck::Pod;
use num_traits::{Bounded, Float, FloatConst, Num, NumCast, ToPrimitive};

/// Marker for types that can live in a tensor buffer.
///
/// `Pod` is required so the bitwise kernels can reinterpret storage as
/// fixed-width lanes without pointer punning.
pub trait Element: Copy + Default + PartialOrd + Debug + Send + Sync + Pod + 'static {}

/// Arithmetic capabilities shared by every supported integer and float type.
pub trait Numeric: Element + Num + NumCast + Bounded + ToPrimitive {
    /// Magnitude of the value; identity on unsigned types.
    fn abs(self) -> Self;
    /// Additive inverse; wraps on unsigned types.
    fn neg(self) -> Self;
    /// True only for floating-point NaN payloads.
    fn is_nan(self) -> bool {
        false
    }
    /// `self * mul + add`, fused where the type supports it.
    fn mul_add(self, mul: Self, add: Self) -> Self {
        self * mul + add
    }
}

/// Transcendental capabilities; implemented by `f32` and `f64` only.
///
/// Defaults are built from `num_traits::Float`, so the concrete impls are
/// empty. The pi-scaled family follows the convention `sin_pi(x) = sin(pi*x)`
/// and `asin_pi(x) = asin(x) / pi`.
pub trait Real: Numeric + Float + FloatConst {
    fn exp10(self) -> Self {
        (self * Self::LN_10()).exp()
    }
    fn exp2_m1(self) -> Self {
        self.exp2() - Self::one()
    }
    fn exp10_m1(self) -> Self {
        Real::exp10(self) - Self::one()
    }
    fn log2_p1(self) -> Self {
        (self + Self::one()).log2()
    }
    fn log10_p1(self) -> Self {
        (self + Self::one()).log10()
    }
    fn sin_pi(self) -> Self {
        (self * Self::PI()).sin()
    }
    fn cos_pi(self) -> Self {
        (self * Self::PI()).cos()
    }
    fn tan_pi(self) -> Self {
        (self * Self::PI()).tan()
    }
    fn asin_pi(self) -> Self {
        self.asin() / Self::PI()
    }
    fn acos_pi(self) -> Self {
        self.acos() / Self::PI()
    }
    fn atan_pi(self) -> Self {
        self.atan() / Self::PI()
    }
    /// Principal n-th root; odd roots of negative values are defined.
    fn root_n(self, n: u32) -> Self {
        if n == 0 {
            return Self::nan();
        }
        let inv = Self::one() / <Self as NumCast>::from(n).unwrap_or_else(Self::nan);
        if self < Self::zero() && n % 2 == 1 {
            -(-self).powf(inv)
        } else {
            self.powf(inv)
        }
    }
}

macro_rules! impl_element {
    ($($ty:ty),*) => {
        $(impl Element for $ty {})*
    };
}

impl_element!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

macro_rules! impl_numeric_unsigned {
    ($($ty:ty),*) => {
        $(impl Numeric for $ty {
            fn abs(self) -> Self {
                self
            }
            fn neg(self) -> Self {
                self.wrapping_neg()
            }
        })*
    };
}

macro_rules! impl_numeric_signed {
    ($($ty:ty),*) => {
        $(impl Numeric for $ty {
            fn abs(self) -> Self {
                <$ty>::wrapping_abs(self)
            }
            fn neg(self) -> Self {
                self.wrapping_neg()
            }
        })*
    };
}

macro_rules! impl_numeric_float {
    ($($ty:ty),*) => {
        $(impl Numeric for $ty {
            fn abs(self) -> Self {
                <$ty>::abs(self)
            }
            fn neg(self) -> Self {
                -self
            }
            fn is_nan(self) -> bool {
                <$ty>::is_nan(self)
            }
            fn mul_add(self, mul: Self, add: Self) -> Self {
                <$ty>::mul_add(self, mul, add)
            }
        })*
    };
}

impl_numeric_unsigned!(u8, u16, u32, u64);
impl_numeric_signed!(i8, i16, i32, i64);
impl_numeric_float!(f32, f64);

impl Real for f32 {}
impl Real for f64 {}
