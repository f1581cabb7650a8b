//! Error types for the unitquiz core.
//!
//! Errors fall into three groups: learner input mistakes that the front end
//! recovers from inline, contract violations between the front end and the
//! core, and configuration or I/O failures.

use std::path::PathBuf;

use crate::quantity::ParseQuantityError;

/// A specialized `Result` type for unitquiz core operations.
pub type Result<T> = std::result::Result<T, QuizError>;

/// Errors that can occur while generating or checking problems.
#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    // ========================================================================
    // Learner Input Errors
    // ========================================================================
    /// A unit field was left blank at submission time.
    #[error("No value entered for {unit}\n\nSuggestion: Fill in every unit before submitting")]
    EmptyField {
        /// Symbol of the unit whose field is blank.
        unit: String,
    },

    /// A submitted value is not a decimal numeral.
    #[error("'{input}' is not a number for {unit}: {reason}\n\nSuggestion: Enter digits with an optional decimal point, e.g. 8.5")]
    UnparseableNumber {
        /// Symbol of the unit whose field failed to parse.
        unit: String,
        /// The raw text the learner entered.
        input: String,
        /// Why the text was rejected.
        reason: ParseQuantityError,
    },

    // ========================================================================
    // Contract Violations
    // ========================================================================
    /// The attempt, answer vector and unit list do not line up.
    #[error("Malformed input: expected {expected} {what}, got {actual}")]
    MalformedInput {
        /// Which collection had the wrong length.
        what: String,
        /// Number of entries the problem's family requires.
        expected: usize,
        /// Number of entries actually supplied.
        actual: usize,
    },

    /// An identifier did not name a known unit family.
    #[error("Unknown unit family '{id}'\n\nSuggestion: Use one of 'length', 'capacity', 'weight'")]
    UnknownFamily {
        /// The identifier that was supplied.
        id: String,
    },

    /// A symbol did not name a known unit.
    #[error("Unknown unit '{symbol}'\n\nSuggestion: Use one of mm, cm, m, km, mL, L, g, kg, t")]
    UnknownUnit {
        /// The symbol that was supplied.
        symbol: String,
    },

    /// A serialized problem does not agree with its own base value.
    #[error("Inconsistent problem: {message}")]
    InconsistentProblem {
        /// Description of the mismatch.
        message: String,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid JSON syntax in the configuration file.
    #[error("Invalid JSON in config file '{path}': {message}\n\nSuggestion: Validate your unitquiz.json with a JSON linter")]
    ConfigParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidationError {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    // ========================================================================
    // Session Errors
    // ========================================================================
    /// Invalid session state transition attempted.
    #[error("Invalid state transition: cannot go from {from} to {to}")]
    InvalidStateTransition {
        /// The current state.
        from: String,
        /// The attempted target state.
        to: String,
    },

    // ========================================================================
    // General I/O Errors
    // ========================================================================
    /// General I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl QuizError {
    /// Creates a new `EmptyField` error for the given unit symbol.
    #[must_use]
    pub fn empty_field(unit: impl Into<String>) -> Self {
        Self::EmptyField { unit: unit.into() }
    }

    /// Creates a new `UnparseableNumber` error.
    #[must_use]
    pub fn unparseable(
        unit: impl Into<String>,
        input: impl Into<String>,
        reason: ParseQuantityError,
    ) -> Self {
        Self::UnparseableNumber {
            unit: unit.into(),
            input: input.into(),
            reason,
        }
    }

    /// Creates a new `MalformedInput` error.
    #[must_use]
    pub fn malformed(what: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::MalformedInput {
            what: what.into(),
            expected,
            actual,
        }
    }

    /// Creates a new `UnknownFamily` error.
    #[must_use]
    pub fn unknown_family(id: impl Into<String>) -> Self {
        Self::UnknownFamily { id: id.into() }
    }

    /// Creates a new `UnknownUnit` error.
    #[must_use]
    pub fn unknown_unit(symbol: impl Into<String>) -> Self {
        Self::UnknownUnit {
            symbol: symbol.into(),
        }
    }

    /// Creates a new `InconsistentProblem` error.
    #[must_use]
    pub fn inconsistent_problem(message: impl Into<String>) -> Self {
        Self::InconsistentProblem {
            message: message.into(),
        }
    }

    /// Creates a new `ConfigParseError` with the given path and message.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ConfigValidationError` with the given message and suggestion.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidationError {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Creates a new `InvalidStateTransition` error.
    #[must_use]
    pub fn invalid_transition(from: impl std::fmt::Display, to: impl std::fmt::Display) -> Self {
        Self::InvalidStateTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Returns `true` if this error is a learner mistake the front end should
    /// report inline and then keep accepting input.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyField { .. } | Self::UnparseableNumber { .. }
        )
    }

    /// Returns `true` if this error indicates caller misuse or a broken setup
    /// and should stop the program.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::MalformedInput { .. }
                | Self::InconsistentProblem { .. }
                | Self::ConfigParseError { .. }
                | Self::ConfigValidationError { .. }
        )
    }
}
