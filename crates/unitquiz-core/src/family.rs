//! Units and unit families.
//!
//! Each [`Family`] is a closed, ordered set of [`Unit`]s sharing one base
//! unit. Every unit's scale factor relative to the base is a power of ten,
//! stored as its exponent so conversions stay exact.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QuizError;

// ============================================================================
// Unit
// ============================================================================

/// A unit of measure covered by the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Unit {
    /// Millimeter, the length base unit.
    Millimeter,
    /// Centimeter (10 mm).
    Centimeter,
    /// Meter (1000 mm).
    Meter,
    /// Kilometer (1 000 000 mm).
    Kilometer,
    /// Milliliter, the capacity base unit.
    Milliliter,
    /// Liter (1000 mL).
    Liter,
    /// Gram, the weight base unit.
    Gram,
    /// Kilogram (1000 g).
    Kilogram,
    /// Metric ton (1 000 000 g).
    Tonne,
}

impl Unit {
    /// Every unit, grouped by family in canonical order.
    pub const ALL: [Self; 9] = [
        Self::Millimeter,
        Self::Centimeter,
        Self::Meter,
        Self::Kilometer,
        Self::Milliliter,
        Self::Liter,
        Self::Gram,
        Self::Kilogram,
        Self::Tonne,
    ];

    /// Returns the conventional symbol, e.g. `"mL"`.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Millimeter => "mm",
            Self::Centimeter => "cm",
            Self::Meter => "m",
            Self::Kilometer => "km",
            Self::Milliliter => "mL",
            Self::Liter => "L",
            Self::Gram => "g",
            Self::Kilogram => "kg",
            Self::Tonne => "t",
        }
    }

    /// Returns the family this unit belongs to.
    #[must_use]
    pub const fn family(&self) -> Family {
        match self {
            Self::Millimeter | Self::Centimeter | Self::Meter | Self::Kilometer => Family::Length,
            Self::Milliliter | Self::Liter => Family::Capacity,
            Self::Gram | Self::Kilogram | Self::Tonne => Family::Weight,
        }
    }

    /// Returns `e` such that one of this unit equals `10^e` base units.
    #[must_use]
    pub const fn scale_exponent(&self) -> u32 {
        match self {
            Self::Millimeter | Self::Milliliter | Self::Gram => 0,
            Self::Centimeter => 1,
            Self::Meter | Self::Liter | Self::Kilogram => 3,
            Self::Kilometer | Self::Tonne => 6,
        }
    }

    /// Returns the integer scale factor relative to the family's base unit.
    ///
    /// # Examples
    ///
    /// ```
    /// use unitquiz_core::Unit;
    ///
    /// assert_eq!(Unit::Centimeter.scale_factor(), 10);
    /// assert_eq!(Unit::Kilometer.scale_factor(), 1_000_000);
    /// ```
    #[must_use]
    pub const fn scale_factor(&self) -> u64 {
        10_u64.pow(self.scale_exponent())
    }

    /// Looks up a unit by symbol, ignoring case (`"ml"` and `"mL"` both work).
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let symbol = symbol.trim();
        Self::ALL
            .into_iter()
            .find(|unit| unit.symbol().eq_ignore_ascii_case(symbol))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Unit {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_symbol(s).ok_or_else(|| QuizError::unknown_unit(s))
    }
}

impl<'de> Deserialize<'de> for Unit {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_symbol(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid unit '{s}'")))
    }
}

impl Serialize for Unit {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.symbol())
    }
}

// ============================================================================
// Family
// ============================================================================

const LENGTH_UNITS: [Unit; 4] = [Unit::Millimeter, Unit::Centimeter, Unit::Meter, Unit::Kilometer];
const CAPACITY_UNITS: [Unit; 2] = [Unit::Milliliter, Unit::Liter];
const WEIGHT_UNITS: [Unit; 3] = [Unit::Gram, Unit::Kilogram, Unit::Tonne];

/// A closed set of units sharing one base unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// mm, cm, m, km.
    Length,
    /// mL, L.
    Capacity,
    /// g, kg, t.
    Weight,
}

impl Family {
    /// Every family, in menu order.
    pub const ALL: [Self; 3] = [Self::Length, Self::Capacity, Self::Weight];

    /// Returns the identifier used at the front-end boundary.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Length => "length",
            Self::Capacity => "capacity",
            Self::Weight => "weight",
        }
    }

    /// Returns the family's units in canonical (ascending scale) order.
    ///
    /// # Examples
    ///
    /// ```
    /// use unitquiz_core::{Family, Unit};
    ///
    /// assert_eq!(Family::Capacity.units(), &[Unit::Milliliter, Unit::Liter]);
    /// ```
    #[must_use]
    pub const fn units(&self) -> &'static [Unit] {
        match self {
            Self::Length => &LENGTH_UNITS,
            Self::Capacity => &CAPACITY_UNITS,
            Self::Weight => &WEIGHT_UNITS,
        }
    }

    /// Returns the number of units in the family.
    #[must_use]
    pub const fn arity(&self) -> usize {
        self.units().len()
    }

    /// Returns the base unit (scale factor 1).
    #[must_use]
    pub const fn base_unit(&self) -> Unit {
        match self {
            Self::Length => Unit::Millimeter,
            Self::Capacity => Unit::Milliliter,
            Self::Weight => Unit::Gram,
        }
    }

    /// Returns the scale factors in canonical order.
    #[must_use]
    pub fn scale_factors(&self) -> Vec<u64> {
        self.units().iter().map(Unit::scale_factor).collect()
    }

    /// Returns the default inclusive range, in base units, for random draws.
    #[must_use]
    pub const fn default_draw_range(&self) -> RangeInclusive<u64> {
        match self {
            Self::Length => 100..=100_000,
            Self::Capacity => 10..=100_000,
            Self::Weight => 10_000..=1_000_000,
        }
    }

    /// Returns the position of `unit` in the canonical order, if it belongs here.
    #[must_use]
    pub fn position(&self, unit: Unit) -> Option<usize> {
        self.units().iter().position(|u| *u == unit)
    }

    /// Returns a comma-separated list of unit symbols, e.g. `"mL, L"`.
    #[must_use]
    pub fn unit_list(&self) -> String {
        self.units()
            .iter()
            .map(Unit::symbol)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Family {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim();
        Self::ALL
            .into_iter()
            .find(|family| family.id().eq_ignore_ascii_case(id))
            .ok_or_else(|| QuizError::unknown_family(s))
    }
}
