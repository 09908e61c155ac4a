//! A quantity held in two unit systems at once.
//!
//! One representation is authoritative and the other is derived on read
//! through the conversion factor. Only [`DualValue::set_both`] stores the two
//! sides independently, for values whose metric side comes from its own
//! physics rather than a unit ratio.

use crate::{DfError, DfResult, Real, UnitSystem};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
enum Stored {
    Primary(Real),
    Secondary(Real),
    Both { primary: Real, secondary: Real },
}

/// Imperial (primary) and metric (secondary) representation of one value.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DualValue {
    stored: Stored,
    factor: Real,
    locked: bool,
    read_only: bool,
}

impl DualValue {
    /// Zero-valued quantity with the given imperial-to-metric factor.
    pub fn new(factor: Real) -> Self {
        Self {
            stored: Stored::Both {
                primary: 0.0,
                secondary: 0.0,
            },
            factor,
            locked: false,
            read_only: false,
        }
    }

    /// Quantity seeded verbatim with both representations.
    pub fn with_values(factor: Real, primary: Real, secondary: Real) -> Self {
        let mut value = Self::new(factor);
        value.set_both(primary, secondary);
        value
    }

    /// Builder: mark as read-only (never written by user edits).
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn factor(&self) -> Real {
        self.factor
    }

    pub fn primary(&self) -> Real {
        match self.stored {
            Stored::Primary(p) => p,
            Stored::Secondary(s) => s / self.factor,
            Stored::Both { primary, .. } => primary,
        }
    }

    pub fn secondary(&self) -> Real {
        match self.stored {
            Stored::Primary(p) => p * self.factor,
            Stored::Secondary(s) => s,
            Stored::Both { secondary, .. } => secondary,
        }
    }

    /// Set the imperial side; the metric side follows the factor.
    ///
    /// With a zero factor the metric side keeps its previous value.
    pub fn set_primary(&mut self, v: Real) {
        self.stored = if self.factor != 0.0 {
            Stored::Primary(v)
        } else {
            Stored::Both {
                primary: v,
                secondary: self.secondary(),
            }
        };
    }

    /// Set the metric side; the imperial side follows the factor.
    pub fn set_secondary(&mut self, v: Real) {
        self.stored = if self.factor != 0.0 {
            Stored::Secondary(v)
        } else {
            Stored::Both {
                primary: self.primary(),
                secondary: v,
            }
        };
    }

    /// Store both sides verbatim, without deriving one from the other.
    pub fn set_both(&mut self, primary: Real, secondary: Real) {
        self.stored = Stored::Both { primary, secondary };
    }

    pub fn value_in(&self, unit: UnitSystem) -> Real {
        match unit {
            UnitSystem::Imperial => self.primary(),
            UnitSystem::Metric => self.secondary(),
        }
    }

    pub fn set_in(&mut self, unit: UnitSystem, v: Real) {
        match unit {
            UnitSystem::Imperial => self.set_primary(v),
            UnitSystem::Metric => self.set_secondary(v),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Read-only or locked: the value must not be recomputed.
    pub fn is_effectively_read_only(&self) -> bool {
        self.read_only || self.locked
    }

    pub fn primary_text(&self) -> String {
        format_value(self.primary())
    }

    pub fn secondary_text(&self) -> String {
        format_value(self.secondary())
    }

    /// Parse and apply imperial text. Invalid text leaves the value unchanged.
    pub fn set_primary_text(&mut self, text: &str) -> DfResult<Real> {
        let v = parse_value(text)?;
        self.set_primary(v);
        Ok(v)
    }

    /// Parse and apply metric text. Invalid text leaves the value unchanged.
    pub fn set_secondary_text(&mut self, text: &str) -> DfResult<Real> {
        let v = parse_value(text)?;
        self.set_secondary(v);
        Ok(v)
    }

    pub fn set_text_in(&mut self, unit: UnitSystem, text: &str) -> DfResult<Real> {
        match unit {
            UnitSystem::Imperial => self.set_primary_text(text),
            UnitSystem::Metric => self.set_secondary_text(text),
        }
    }
}

/// Display form: fixed 4 decimal places.
pub fn format_value(v: Real) -> String {
    format!("{v:.4}")
}

/// Parse a user-entered number.
///
/// Accepts an optional sign, digits, at most one decimal point and an
/// exponent. Surrounding whitespace is ignored; infinities and NaN are
/// rejected.
pub fn parse_value(text: &str) -> DfResult<Real> {
    let trimmed = text.trim();
    let invalid = || DfError::InvalidNumber {
        text: text.to_string(),
    };

    if trimmed.matches('.').count() > 1 {
        return Err(invalid());
    }

    let v: Real = trimmed.parse().map_err(|_| invalid())?;
    if !v.is_finite() {
        return Err(invalid());
    }
    Ok(v)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::{Tolerances, nearly_equal};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn primary_round_trip(v in -1.0e6_f64..1.0e6, factor in 1.0e-4_f64..1.0e3) {
            let mut value = DualValue::new(factor);
            value.set_primary(v);
            let tol = Tolerances { abs: 1e-9, rel: 1e-12 };
            prop_assert!(nearly_equal(value.secondary(), v * factor, tol));
            prop_assert_eq!(value.primary(), v);
        }

        #[test]
        fn secondary_round_trip(v in -1.0e6_f64..1.0e6, factor in 1.0e-4_f64..1.0e3) {
            let mut value = DualValue::new(factor);
            value.set_secondary(v);
            let tol = Tolerances { abs: 1e-9, rel: 1e-12 };
            prop_assert!(nearly_equal(value.primary(), v / factor, tol));
            prop_assert_eq!(value.secondary(), v);
        }
    }
}
