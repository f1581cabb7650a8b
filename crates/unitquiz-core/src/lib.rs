//! Unitquiz Core
//!
//! Exact-decimal unit conversion, random problem generation and answer
//! validation with per-unit hints for metric length, capacity and weight.
//!
//! # Example
//!
//! ```rust
//! use unitquiz_core::{convert, Family, Quantity, Unit};
//!
//! let values = convert(&Quantity::from_integer(1300), Family::Capacity);
//! assert_eq!(values.get(Unit::Liter).unwrap().to_string(), "1.3");
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod family;
pub mod generator;
pub mod hints;
pub mod quantity;
pub mod session;
pub mod validator;

pub use config::{QuizConfig, MAX_DISPLAY_DECIMALS, MAX_DRAW_VALUE};
pub use convert::{convert, convert_to, to_base, Conversion};
pub use error::{QuizError, Result};
pub use family::{Family, Unit};
pub use generator::{generate_problem, DrawRange, DrawRanges, Problem, ProblemGenerator};
pub use hints::HintTable;
pub use quantity::{Numeral, ParseQuantityError, Quantity};
pub use session::{Feedback, QuizSession, RoundRecord, SessionState, SessionStatus, Submission};
pub use validator::{
    check_fields, validate, validate_attempt, AnswerAttempt, CheckOutcome, UnitCheck, Validator,
    Verdict, DEFAULT_TOLERANCE,
};
