use crate::DfError;

/// Scalar used for every duct quantity.
pub type Real = f64;

/// Absolute and relative slack for float comparisons.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

/// `a` and `b` agree within `tol.abs`, or within `tol.rel` of the larger
/// magnitude.
pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    diff <= tol.abs || diff <= tol.rel * a.abs().max(b.abs())
}

/// Pass `v` through, or name the quantity that went NaN or infinite.
pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, DfError> {
    match v.is_finite() {
        true => Ok(v),
        false => Err(DfError::NonFinite { what, value: v }),
    }
}

/// Relative error of `calc` against a nonzero `target`.
pub fn relative_error(calc: Real, target: Real) -> Real {
    (calc - target) / target
}
