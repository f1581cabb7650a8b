//! Problem generation.
//!
//! A [`Problem`] is drawn once per round: a whole-number base quantity from
//! the family's draw range, a display unit chosen uniformly, and the exact
//! answer for every unit. Each [`ProblemGenerator`] owns its random source,
//! so sessions never share one.

use std::ops::RangeInclusive;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::convert::convert;
use crate::error::{QuizError, Result};
use crate::family::{Family, Unit};
use crate::quantity::Quantity;

// ============================================================================
// Draw ranges
// ============================================================================

/// Inclusive range of base-unit integers to draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRange {
    /// Smallest value that can be drawn.
    pub min: u64,
    /// Largest value that can be drawn.
    pub max: u64,
}

impl DrawRange {
    /// Creates a range from its bounds.
    #[must_use]
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// Returns the bounds as a `RangeInclusive`, lower bound first.
    #[must_use]
    pub fn bounds(&self) -> RangeInclusive<u64> {
        self.min.min(self.max)..=self.min.max(self.max)
    }
}

impl From<RangeInclusive<u64>> for DrawRange {
    fn from(range: RangeInclusive<u64>) -> Self {
        Self::new(*range.start(), *range.end())
    }
}

/// Draw ranges for every family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRanges {
    /// Range for length problems, in millimeters.
    #[serde(default = "default_length_range")]
    pub length: DrawRange,
    /// Range for capacity problems, in milliliters.
    #[serde(default = "default_capacity_range")]
    pub capacity: DrawRange,
    /// Range for weight problems, in grams.
    #[serde(default = "default_weight_range")]
    pub weight: DrawRange,
}

fn default_length_range() -> DrawRange {
    Family::Length.default_draw_range().into()
}

fn default_capacity_range() -> DrawRange {
    Family::Capacity.default_draw_range().into()
}

fn default_weight_range() -> DrawRange {
    Family::Weight.default_draw_range().into()
}

impl Default for DrawRanges {
    fn default() -> Self {
        Self {
            length: default_length_range(),
            capacity: default_capacity_range(),
            weight: default_weight_range(),
        }
    }
}

impl DrawRanges {
    /// Returns the range for `family`.
    #[must_use]
    pub const fn get(&self, family: Family) -> DrawRange {
        match family {
            Family::Length => self.length,
            Family::Capacity => self.capacity,
            Family::Weight => self.weight,
        }
    }
}

// ============================================================================
// Problem
// ============================================================================

/// One round's problem. Immutable once created.
///
/// Serializes as `{family, baseValue, displayUnit, displayValue, answerVector}`
/// with decimals as strings. Deserializing re-derives the display value and
/// answer vector from `baseValue` and rejects records that disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ProblemRecord")]
pub struct Problem {
    family: Family,
    base_value: Quantity,
    display_unit: Unit,
    display_value: Quantity,
    answer_vector: Vec<Quantity>,
}

impl Problem {
    /// Builds a problem from a chosen base value and display unit.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InconsistentProblem` if `display_unit` is not part
    /// of `family`.
    ///
    /// # Examples
    ///
    /// ```
    /// use unitquiz_core::{Family, Problem, Quantity, Unit};
    ///
    /// let problem =
    ///     Problem::from_base(Family::Length, Quantity::from_integer(85_000), Unit::Meter).unwrap();
    /// assert_eq!(problem.display_value().to_string(), "85");
    /// assert_eq!(problem.display_text(1), "85.0 m");
    /// ```
    pub fn from_base(family: Family, base_value: Quantity, display_unit: Unit) -> Result<Self> {
        if display_unit.family() != family {
            return Err(QuizError::inconsistent_problem(format!(
                "display unit {display_unit} is not a {family} unit"
            )));
        }
        Ok(Self::build(family, base_value, display_unit))
    }

    /// Builds a problem whose display unit is known to belong to `family`.
    fn build(family: Family, base_value: Quantity, display_unit: Unit) -> Self {
        let answer_vector = convert(&base_value, family).into_values();
        let display_value = family
            .position(display_unit)
            .and_then(|i| answer_vector.get(i).copied())
            .unwrap_or(base_value);
        Self {
            family,
            base_value,
            display_unit,
            display_value,
            answer_vector,
        }
    }

    /// Returns the problem's unit family.
    #[must_use]
    pub const fn family(&self) -> Family {
        self.family
    }

    /// Returns the quantity in the family's base unit.
    #[must_use]
    pub const fn base_value(&self) -> &Quantity {
        &self.base_value
    }

    /// Returns the unit the problem is shown in.
    #[must_use]
    pub const fn display_unit(&self) -> Unit {
        self.display_unit
    }

    /// Returns the exact value shown to the learner.
    #[must_use]
    pub const fn display_value(&self) -> &Quantity {
        &self.display_value
    }

    /// Returns the exact answer for every unit, in canonical order.
    #[must_use]
    pub fn answer_vector(&self) -> &[Quantity] {
        &self.answer_vector
    }

    /// Returns the units to answer in, in canonical order.
    #[must_use]
    pub const fn units(&self) -> &'static [Unit] {
        self.family.units()
    }

    /// Returns the exact answer for `unit`.
    #[must_use]
    pub fn answer_for(&self, unit: Unit) -> Option<&Quantity> {
        self.family
            .position(unit)
            .and_then(|i| self.answer_vector.get(i))
    }

    /// Renders the display value rounded to `decimals` places with its unit.
    #[must_use]
    pub fn display_text(&self, decimals: u32) -> String {
        format!(
            "{} {}",
            self.display_value.format_fixed(decimals),
            self.display_unit
        )
    }
}

/// Wire form of a [`Problem`] before its invariants are checked.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProblemRecord {
    family: Family,
    base_value: Quantity,
    display_unit: Unit,
    #[serde(default)]
    display_value: Option<Quantity>,
    #[serde(default)]
    answer_vector: Option<Vec<Quantity>>,
}

impl TryFrom<ProblemRecord> for Problem {
    type Error = QuizError;

    fn try_from(record: ProblemRecord) -> Result<Self> {
        let problem = Self::from_base(record.family, record.base_value, record.display_unit)?;
        if record
            .display_value
            .is_some_and(|value| value != problem.display_value)
        {
            return Err(QuizError::inconsistent_problem(
                "displayValue does not match baseValue",
            ));
        }
        if record
            .answer_vector
            .as_ref()
            .is_some_and(|answers| answers.as_slice() != problem.answer_vector())
        {
            return Err(QuizError::inconsistent_problem(
                "answerVector does not match baseValue",
            ));
        }
        Ok(problem)
    }
}

// ============================================================================
// ProblemGenerator
// ============================================================================

/// Draws problems from a random source it owns.
#[derive(Debug, Clone)]
pub struct ProblemGenerator<R = ChaCha8Rng> {
    rng: R,
    ranges: DrawRanges,
}

impl ProblemGenerator<ChaCha8Rng> {
    /// Creates a deterministic generator from a seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Creates a generator seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> ProblemGenerator<R> {
    /// Creates a generator with the default draw ranges.
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            ranges: DrawRanges::default(),
        }
    }

    /// Replaces the draw ranges.
    #[must_use]
    pub fn with_ranges(mut self, ranges: DrawRanges) -> Self {
        self.ranges = ranges;
        self
    }

    /// Returns the draw ranges in use.
    pub fn ranges(&self) -> &DrawRanges {
        &self.ranges
    }

    /// Draws a fresh, independent problem for `family`.
    pub fn generate(&mut self, family: Family) -> Problem {
        draw(family, self.ranges.get(family), &mut self.rng)
    }
}

/// Draws a problem for `family` from the default range using `rng`.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use unitquiz_core::{generate_problem, Family};
///
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// let problem = generate_problem(Family::Weight, &mut rng);
/// assert_eq!(problem.answer_vector().len(), 3);
/// ```
pub fn generate_problem<R: Rng + ?Sized>(family: Family, rng: &mut R) -> Problem {
    draw(family, family.default_draw_range().into(), rng)
}

fn draw<R: Rng + ?Sized>(family: Family, range: DrawRange, rng: &mut R) -> Problem {
    let n = rng.gen_range(range.bounds());
    let display_unit = family
        .units()
        .choose(rng)
        .copied()
        .unwrap_or_else(|| family.base_unit());
    let problem = Problem::build(family, Quantity::from(n), display_unit);
    tracing::debug!(
        family = %family,
        base = %problem.base_value,
        display = %problem.display_text(1),
        "Generated problem"
    );
    problem
}
