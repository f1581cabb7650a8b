//! Configuration for unitquiz.
//!
//! Settings live in an optional `unitquiz.json`. Every key has a default, so
//! a missing file or an empty object gives the standard quiz.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{QuizError, Result};
use crate::family::{Family, Unit};
use crate::generator::{DrawRanges, ProblemGenerator};
use crate::hints::HintTable;
use crate::quantity::Quantity;
use crate::validator::{Validator, DEFAULT_TOLERANCE};

/// The default config file name.
const CONFIG_FILE_NAME: &str = "unitquiz.json";

/// Largest base value a draw range may reach.
pub const MAX_DRAW_VALUE: u64 = 1_000_000_000_000;

/// Largest number of decimals the display value may be rounded to.
pub const MAX_DISPLAY_DECIMALS: u32 = 6;

/// Default tolerance for answer comparison.
const fn default_tolerance() -> Quantity {
    DEFAULT_TOLERANCE
}

/// Default number of decimals for the display value.
const fn default_display_decimals() -> u32 {
    1
}

/// Main configuration for a quiz session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizConfig {
    /// Maximum absolute difference accepted for every unit.
    #[serde(default = "default_tolerance")]
    pub tolerance: Quantity,

    /// Seed for reproducible problem sequences; `None` seeds from the OS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Decimals used when showing the problem's value.
    #[serde(default = "default_display_decimals")]
    pub display_decimals: u32,

    /// Base-unit draw ranges per family.
    #[serde(default)]
    pub ranges: DrawRanges,

    /// Hint message overrides keyed by unit symbol.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hints: BTreeMap<String, String>,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            seed: None,
            display_decimals: default_display_decimals(),
            ranges: DrawRanges::default(),
            hints: BTreeMap::new(),
        }
    }
}

impl QuizConfig {
    /// Loads configuration from the current working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is not valid configuration.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            QuizError::config_parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_dir(&current_dir)
    }

    /// Loads `unitquiz.json` from a specific directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is not valid configuration.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load_from_file(&dir.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from a specific file path.
    ///
    /// If the file does not exist, returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::ConfigParseError` for unreadable files or invalid
    /// JSON, and `QuizError::ConfigValidationError` for out-of-range values.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(QuizError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| QuizError::config_parse(path, e.to_string()))?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// - `tolerance` must not be negative
    /// - `displayDecimals` must be at most 6
    /// - every range needs `min <= max <= 10^12`
    /// - every hint key must be a known unit symbol
    ///
    /// # Errors
    ///
    /// Returns `QuizError::ConfigValidationError` if any check fails.
    pub fn validate(&self) -> Result<()> {
        if self.tolerance.is_negative() {
            return Err(QuizError::config_validation(
                "tolerance must not be negative",
                "Set tolerance to a decimal string such as \"0.0001\" in your unitquiz.json",
            ));
        }

        if self.display_decimals > MAX_DISPLAY_DECIMALS {
            return Err(QuizError::config_validation(
                format!("displayDecimals must be at most {MAX_DISPLAY_DECIMALS}"),
                "Lower displayDecimals in your unitquiz.json",
            ));
        }

        for family in Family::ALL {
            let range = self.ranges.get(family);
            if range.min > range.max {
                return Err(QuizError::config_validation(
                    format!("ranges.{family}.min must not exceed ranges.{family}.max"),
                    format!("Swap the bounds of ranges.{family} in your unitquiz.json"),
                ));
            }
            if range.max > MAX_DRAW_VALUE {
                return Err(QuizError::config_validation(
                    format!("ranges.{family}.max must be at most {MAX_DRAW_VALUE}"),
                    format!("Lower ranges.{family}.max in your unitquiz.json"),
                ));
            }
        }

        if let Some(symbol) = self.hints.keys().find(|s| Unit::from_symbol(s).is_none()) {
            return Err(QuizError::config_validation(
                format!("hints has unknown unit '{symbol}'"),
                "Use unit symbols such as mm, cm, m, km, mL, L, g, kg, t as hint keys",
            ));
        }

        Ok(())
    }

    /// Returns the hint overrides as a table.
    #[must_use]
    pub fn hint_overrides(&self) -> HintTable {
        let mut table = HintTable::empty();
        for (symbol, message) in &self.hints {
            if let Some(unit) = Unit::from_symbol(symbol) {
                table.insert(unit, message.clone());
            }
        }
        table
    }

    /// Builds the validator this configuration describes.
    #[must_use]
    pub fn validator(&self) -> Validator {
        Validator::new(self.tolerance).with_hints(self.hint_overrides())
    }

    /// Builds a generator seeded from `seed`, or from the OS if unset.
    #[must_use]
    pub fn generator(&self) -> ProblemGenerator {
        let generator = self
            .seed
            .map_or_else(ProblemGenerator::from_entropy, ProblemGenerator::from_seed);
        generator.with_ranges(self.ranges)
    }
}
