//! Answer validation.
//!
//! Judges a learner's per-unit answers against a problem's exact answer
//! vector. Each unit is compared independently with an absolute tolerance;
//! wrong units collect their hint. A field that fails to parse counts as wrong
//! without aborting the rest of the comparison.

use serde::{Deserialize, Serialize};

use crate::error::{QuizError, Result};
use crate::family::Unit;
use crate::generator::Problem;
use crate::hints::HintTable;
use crate::quantity::{Numeral, ParseQuantityError, Quantity};

/// Default maximum absolute difference accepted between answer and truth.
pub const DEFAULT_TOLERANCE: Quantity = Quantity::from_parts(1, 4);

// ============================================================================
// AnswerAttempt
// ============================================================================

/// The raw strings a learner submitted, one per unit in canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerAttempt {
    inputs: Vec<String>,
}

impl AnswerAttempt {
    /// Creates an attempt from raw inputs.
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates an attempt that writes each answer back out as a decimal string.
    #[must_use]
    pub fn from_answers(answers: &[Quantity]) -> Self {
        Self::new(answers.iter().map(ToString::to_string))
    }

    /// Returns the raw inputs.
    #[must_use]
    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    /// Returns the number of inputs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Returns `true` if there are no inputs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Parses every input as an exact decimal numeral of any length.
    pub fn parsed(&self) -> Vec<std::result::Result<Numeral, ParseQuantityError>> {
        self.inputs.iter().map(|raw| raw.parse()).collect()
    }
}

// ============================================================================
// Verdict
// ============================================================================

/// How one unit's answer was judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckOutcome {
    /// Within tolerance of the true value.
    Correct,
    /// Parsed, but off by more than the tolerance.
    Incorrect,
    /// Not a decimal numeral.
    Unparseable,
}

/// The judgement for one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitCheck {
    /// The unit being checked.
    pub unit: Unit,
    /// The exact answer.
    pub expected: Quantity,
    /// The learner's parsed answer, if it parsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted: Option<Numeral>,
    /// The outcome.
    pub outcome: CheckOutcome,
}

impl UnitCheck {
    /// Returns `true` if the answer was accepted.
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.outcome == CheckOutcome::Correct
    }
}

/// Result of validating one attempt against one problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    /// `true` only if every unit was accepted.
    pub all_correct: bool,
    /// Hints for the wrong units, in canonical order.
    pub hints: Vec<String>,
    /// Per-unit judgements, in canonical order.
    pub checks: Vec<UnitCheck>,
}

impl Verdict {
    /// Returns the units that were not accepted.
    #[must_use]
    pub fn wrong_units(&self) -> Vec<Unit> {
        self.checks
            .iter()
            .filter(|check| !check.is_correct())
            .map(|check| check.unit)
            .collect()
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Compares `attempt` to `answers` unit by unit.
///
/// `attempt`, `answers` and `units` must line up one-to-one in canonical
/// order. A unit is correct when `|parsed - expected| <= tolerance`, judged
/// on every digit the learner typed. Each wrong unit appends its entry from `hints`, if it has one. Unparseable
/// inputs count as wrong and get no hint.
///
/// # Errors
///
/// Returns `QuizError::MalformedInput` if the lengths disagree. That is a
/// caller bug, not a learner mistake.
///
/// # Examples
///
/// ```
/// use unitquiz_core::{validate_attempt, AnswerAttempt, Family, HintTable, Quantity};
/// use unitquiz_core::validator::DEFAULT_TOLERANCE;
///
/// let answers = [Quantity::from_integer(1300), "1.3".parse().unwrap()];
/// let attempt = AnswerAttempt::new(["1300", "13"]);
/// let verdict = validate_attempt(
///     &attempt,
///     &answers,
///     Family::Capacity.units(),
///     &HintTable::builtin(Family::Capacity),
///     &DEFAULT_TOLERANCE,
/// )
/// .unwrap();
/// assert!(!verdict.all_correct);
/// assert_eq!(verdict.hints.len(), 1);
/// ```
pub fn validate_attempt(
    attempt: &AnswerAttempt,
    answers: &[Quantity],
    units: &[Unit],
    hints: &HintTable,
    tolerance: &Quantity,
) -> Result<Verdict> {
    ensure_arity("answers", units.len(), answers.len())?;
    ensure_arity("inputs", units.len(), attempt.len())?;

    let mut checks = Vec::with_capacity(units.len());
    let mut messages = Vec::new();

    let inputs = attempt.inputs().iter().zip(attempt.parsed());
    for (((raw, parsed), expected), unit) in inputs.zip(answers).zip(units) {
        let check = match parsed {
            Ok(submitted) => {
                let outcome = if submitted.within(expected, tolerance) {
                    CheckOutcome::Correct
                } else {
                    if let Some(hint) = hints.get(*unit) {
                        messages.push(hint.to_string());
                    }
                    CheckOutcome::Incorrect
                };
                UnitCheck {
                    unit: *unit,
                    expected: *expected,
                    submitted: Some(submitted),
                    outcome,
                }
            }
            Err(error) => {
                tracing::warn!(unit = %unit, input = %raw, %error, "Unparseable answer reached the validator");
                UnitCheck {
                    unit: *unit,
                    expected: *expected,
                    submitted: None,
                    outcome: CheckOutcome::Unparseable,
                }
            }
        };
        checks.push(check);
    }

    let all_correct = checks.iter().all(UnitCheck::is_correct);
    tracing::debug!(
        all_correct,
        wrong = checks.iter().filter(|c| !c.is_correct()).count(),
        "Validated attempt"
    );

    Ok(Verdict {
        all_correct,
        hints: messages,
        checks,
    })
}

/// Checks the raw fields the way a front end should before submitting.
///
/// Returns the parsed values when every field is filled in and numeric. Any
/// well-formed numeral is accepted, however many digits it has.
/// Blank fields are reported before unparseable ones, each naming the first
/// offending unit.
///
/// # Errors
///
/// - `QuizError::MalformedInput` if `inputs` and `units` differ in length.
/// - `QuizError::EmptyField` for the first blank field.
/// - `QuizError::UnparseableNumber` for the first non-numeric field.
pub fn check_fields<S: AsRef<str>>(inputs: &[S], units: &[Unit]) -> Result<Vec<Numeral>> {
    ensure_arity("inputs", units.len(), inputs.len())?;

    if let Some((_, unit)) = inputs
        .iter()
        .zip(units)
        .find(|(raw, _)| raw.as_ref().trim().is_empty())
    {
        return Err(QuizError::empty_field(unit.symbol()));
    }

    inputs
        .iter()
        .zip(units)
        .map(|(raw, unit)| {
            let raw = raw.as_ref();
            raw.parse::<Numeral>()
                .map_err(|reason| QuizError::unparseable(unit.symbol(), raw.trim(), reason))
        })
        .collect()
}

fn ensure_arity(what: &str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        return Ok(());
    }
    tracing::error!(what, expected, actual, "Validator called with mismatched lengths");
    Err(QuizError::malformed(what, expected, actual))
}

// ============================================================================
// Validator
// ============================================================================

/// Validation policy: the tolerance and any hint overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validator {
    tolerance: Quantity,
    hint_overrides: HintTable,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl Validator {
    /// Creates a validator with the given absolute tolerance.
    #[must_use]
    pub fn new(tolerance: Quantity) -> Self {
        Self {
            tolerance,
            hint_overrides: HintTable::empty(),
        }
    }

    /// Overlays `overrides` on the built-in hint tables.
    #[must_use]
    pub fn with_hints(mut self, overrides: HintTable) -> Self {
        self.hint_overrides = overrides;
        self
    }

    /// Returns the tolerance.
    #[must_use]
    pub const fn tolerance(&self) -> &Quantity {
        &self.tolerance
    }

    /// Returns the hint table used for `family`.
    #[must_use]
    pub fn hints_for(&self, family: crate::family::Family) -> HintTable {
        HintTable::builtin(family).merged(&self.hint_overrides)
    }

    /// Validates raw inputs against `problem`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::MalformedInput` if there is not exactly one input
    /// per unit of the problem's family.
    pub fn validate<S: AsRef<str>>(&self, inputs: &[S], problem: &Problem) -> Result<Verdict> {
        let attempt = AnswerAttempt::new(inputs.iter().map(|s| s.as_ref().to_string()));
        validate_attempt(
            &attempt,
            problem.answer_vector(),
            problem.units(),
            &self.hints_for(problem.family()),
            &self.tolerance,
        )
    }
}

/// Validates raw inputs against `problem` with the default policy.
///
/// # Examples
///
/// ```
/// use unitquiz_core::{validate, Family, Problem, Quantity, Unit};
///
/// let problem =
///     Problem::from_base(Family::Length, Quantity::from_integer(85_000), Unit::Meter).unwrap();
/// let verdict = validate(&["85000", "8500", "85", "0.085"], &problem).unwrap();
/// assert!(verdict.all_correct);
/// assert!(verdict.hints.is_empty());
/// ```
pub fn validate<S: AsRef<str>>(inputs: &[S], problem: &Problem) -> Result<Verdict> {
    Validator::default().validate(inputs, problem)
}
