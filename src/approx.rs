//! Utilities to approximate equality of floating point values.

use crate::matrix::Matrix;

/// The max epsilon accepted on `f64`s.
pub const F64_MAX_ERROR: f64 = 1e-3;

/// The expected minimum epsilon accepted on `f64`s.
pub const F64_AVG_ERROR: f64 = 1e-6;

/// The best expected epsilon accepted on `f64`s.
pub const F64_MIN_ERROR: f64 = 1e-13;

/// Checks the relative distance based off epsilon.
pub trait RelativeEq<Rhs: ?Sized> {
    /// Enumerates the equality of `self`
    fn approx_eq(&self, rhs: &Rhs) -> ApproxEquality;
}

impl RelativeEq<Self> for f64 {
    fn approx_eq(&self, rhs: &Self) -> ApproxEquality {
        let dif = (self - rhs).abs();

        if dif < F64_MIN_ERROR {
            ApproxEquality::Precise
        } else if dif < F64_AVG_ERROR {
            ApproxEquality::Partial
        } else if dif < F64_MAX_ERROR {
            ApproxEquality::Relative
        } else {
            ApproxEquality::Scarce
        }
    }
}

impl RelativeEq<[f64]> for [f64] {
    fn approx_eq(&self, rhs: &[f64]) -> ApproxEquality {
        if self.len() != rhs.len() {
            return ApproxEquality::Scarce;
        }
        let mut eq = ApproxEquality::Precise;
        for (a, b) in self.iter().zip(rhs.iter()) {
            let eq_rating = a.approx_eq(b);
            match eq_rating {
                ApproxEquality::Precise => {
                    // already the best, can't change equality for the worse; leave it as-is
                }
                ApproxEquality::Partial => {
                    if eq != ApproxEquality::Relative {
                        eq = eq_rating;
                    }
                }
                ApproxEquality::Relative => {
                    eq = eq_rating;
                }
                ApproxEquality::Scarce => {
                    return ApproxEquality::Scarce;
                }
            }
        }
        eq
    }
}

impl RelativeEq<Self> for Matrix {
    fn approx_eq(&self, rhs: &Self) -> ApproxEquality {
        if self.rows() != rhs.rows() || self.cols() != rhs.cols() {
            return ApproxEquality::Scarce;
        }
        self.as_slice().approx_eq(rhs.as_slice())
    }
}

/// The approximated equality enumerated.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq)]
pub enum ApproxEquality {
    /// Very strong epsilon.
    Precise = 0,

    /// Good epsilon.
    Partial = 1,

    /// Acceptable epsilon
    Relative = 2,

    /// No relative equality.
    Scarce = 3,
}

/// Approximates equality based off the relative difference.
///
/// Accepts the `Precise` and `Partial` ratings, so values agreeing to within
/// `1e-6` compare equal.
pub fn approx_eq<A: RelativeEq<B> + ?Sized, B: ?Sized>(a: &A, b: &B) -> bool {
    let eq = a.approx_eq(b);
    eq == ApproxEquality::Precise || eq == ApproxEquality::Partial
}
