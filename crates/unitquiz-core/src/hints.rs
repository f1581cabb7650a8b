//! Per-unit feedback messages shown when an answer is wrong.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::family::{Family, Unit};

/// Built-in message for a unit.
const fn builtin_hint(unit: Unit) -> &'static str {
    match unit {
        Unit::Millimeter => "mm is the base unit: 1 cm = 10 mm, 1 m = 1000 mm and 1 km = 1000000 mm.",
        Unit::Centimeter => "1 cm = 10 mm, so divide the millimeters by 10.",
        Unit::Meter => "1 m = 100 cm = 1000 mm, so divide the millimeters by 1000.",
        Unit::Kilometer => "1 km = 1000 m, so divide the meters by 1000.",
        Unit::Milliliter => "mL is the base unit: 1 L = 1000 mL.",
        Unit::Liter => "1 L = 1000 mL, so divide the milliliters by 1000.",
        Unit::Gram => "g is the base unit: 1 kg = 1000 g and 1 t = 1000000 g.",
        Unit::Kilogram => "1 kg = 1000 g, so divide the grams by 1000.",
        Unit::Tonne => "1 t = 1000 kg, so divide the kilograms by 1000.",
    }
}

/// Maps units to the message shown when that unit's answer is wrong.
///
/// Units without an entry get no message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintTable {
    entries: BTreeMap<Unit, String>,
}

impl HintTable {
    /// Creates a table with no entries.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates the built-in table for one family, one entry per unit.
    ///
    /// # Examples
    ///
    /// ```
    /// use unitquiz_core::{Family, HintTable, Unit};
    ///
    /// let hints = HintTable::builtin(Family::Capacity);
    /// assert!(hints.get(Unit::Liter).unwrap().contains("1000 mL"));
    /// assert!(hints.get(Unit::Gram).is_none());
    /// ```
    #[must_use]
    pub fn builtin(family: Family) -> Self {
        let entries = family
            .units()
            .iter()
            .map(|unit| (*unit, builtin_hint(*unit).to_string()))
            .collect();
        Self { entries }
    }

    /// Adds or replaces the entry for `unit`.
    #[must_use]
    pub fn with(mut self, unit: Unit, message: impl Into<String>) -> Self {
        self.insert(unit, message);
        self
    }

    /// Adds or replaces the entry for `unit` in place.
    pub fn insert(&mut self, unit: Unit, message: impl Into<String>) {
        self.entries.insert(unit, message.into());
    }

    /// Removes the entry for `unit`.
    #[must_use]
    pub fn without(mut self, unit: Unit) -> Self {
        self.entries.remove(&unit);
        self
    }

    /// Overlays every entry of `overrides` onto this table.
    #[must_use]
    pub fn merged(mut self, overrides: &Self) -> Self {
        for (unit, message) in &overrides.entries {
            self.entries.insert(*unit, message.clone());
        }
        self
    }

    /// Returns the message for `unit`, if there is one.
    #[must_use]
    pub fn get(&self, unit: Unit) -> Option<&str> {
        self.entries.get(&unit).map(String::as_str)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
