//! Conversion engine.
//!
//! Pure functions mapping a base-unit [`Quantity`] onto every unit of its
//! [`Family`]. Division by a scale factor is a scale shift, so results are
//! exact.

use serde::{Deserialize, Serialize};

use crate::family::{Family, Unit};
use crate::quantity::Quantity;

/// A base quantity expressed in every unit of one family, in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversion {
    family: Family,
    values: Vec<(Unit, Quantity)>,
}

impl Conversion {
    /// Returns the family these values belong to.
    #[must_use]
    pub const fn family(&self) -> Family {
        self.family
    }

    /// Returns the value for `unit`, or `None` if the unit is from another family.
    #[must_use]
    pub fn get(&self, unit: Unit) -> Option<&Quantity> {
        self.values
            .iter()
            .find_map(|(u, value)| (*u == unit).then_some(value))
    }

    /// Iterates over `(unit, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &(Unit, Quantity)> {
        self.values.iter()
    }

    /// Returns the values alone, in canonical order.
    #[must_use]
    pub fn values(&self) -> Vec<Quantity> {
        self.values.iter().map(|(_, value)| *value).collect()
    }

    /// Consumes the conversion, returning the values in canonical order.
    #[must_use]
    pub fn into_values(self) -> Vec<Quantity> {
        self.values.into_iter().map(|(_, value)| value).collect()
    }
}

/// Expresses `base` (in the family's base unit) in every unit of `family`.
///
/// # Examples
///
/// ```
/// use unitquiz_core::{convert, Family, Quantity, Unit};
///
/// let conversion = convert(&Quantity::from_integer(85_000), Family::Length);
/// assert_eq!(conversion.get(Unit::Centimeter).unwrap().to_string(), "8500");
/// assert_eq!(conversion.get(Unit::Meter).unwrap().to_string(), "85");
/// assert_eq!(conversion.get(Unit::Kilometer).unwrap().to_string(), "0.085");
/// ```
#[must_use]
pub fn convert(base: &Quantity, family: Family) -> Conversion {
    let values = family
        .units()
        .iter()
        .map(|unit| (*unit, convert_to(base, *unit)))
        .collect();
    Conversion { family, values }
}

/// Expresses `base` (in `unit`'s base unit) in `unit`.
#[must_use]
pub const fn convert_to(base: &Quantity, unit: Unit) -> Quantity {
    base.div_pow10(unit.scale_exponent())
}

/// Expresses `value` (in `unit`) in the family's base unit.
///
/// Returns `None` only if the result does not fit the decimal range.
#[must_use]
pub fn to_base(value: &Quantity, unit: Unit) -> Option<Quantity> {
    value.checked_mul_pow10(unit.scale_exponent())
}
