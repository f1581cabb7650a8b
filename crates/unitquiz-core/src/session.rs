//! Session state for a learner working through problems.
//!
//! A [`QuizSession`] owns everything one learner needs: its own random
//! source, the validation policy and a serializable [`SessionState`]. The
//! core keeps no global state; front ends hold one session per learner.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::QuizConfig;
use crate::error::{QuizError, Result};
use crate::family::{Family, Unit};
use crate::generator::{Problem, ProblemGenerator};
use crate::validator::{check_fields, Validator, Verdict};

// ============================================================================
// SessionStatus
// ============================================================================

/// Where the learner is in the session.
///
/// - `Idle` -> `InRound` via [`QuizSession::start`]
/// - `InRound` stays `InRound` across submissions and skips
/// - any status -> `Idle` via [`QuizSession::restart`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// No family chosen yet.
    #[default]
    Idle,
    /// A problem is on screen awaiting answers.
    InRound,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::InRound => write!(f, "in_round"),
        }
    }
}

// ============================================================================
// Feedback
// ============================================================================

/// Feedback from the most recent submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Feedback {
    /// Every unit was right; a new problem has been drawn.
    Correct,
    /// At least one unit was wrong.
    Incorrect {
        /// Units that were not accepted.
        wrong_units: Vec<Unit>,
        /// Hints for those units.
        hints: Vec<String>,
    },
}

impl Feedback {
    /// Returns `true` for [`Feedback::Correct`].
    #[must_use]
    pub const fn is_correct(&self) -> bool {
        matches!(self, Self::Correct)
    }
}

// ============================================================================
// RoundRecord
// ============================================================================

/// Record of one finished round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// The round number (1-indexed).
    pub round: u32,

    /// The problem that was shown.
    pub problem: Problem,

    /// Number of graded submissions.
    pub attempts: u32,

    /// Units answered wrongly, one entry per miss, in submission order.
    #[serde(default)]
    pub missed_units: Vec<Unit>,

    /// `true` if the round ended with a correct answer.
    pub solved: bool,

    /// When the problem was shown.
    pub started_at: DateTime<Utc>,

    /// When the round ended.
    pub ended_at: DateTime<Utc>,
}

impl RoundRecord {
    /// Returns `true` if the round was solved on the first graded submission.
    #[must_use]
    pub const fn solved_first_try(&self) -> bool {
        self.solved && self.attempts == 1
    }

    /// Returns how long the round took.
    #[must_use]
    pub fn duration(&self) -> chrono::Duration {
        self.ended_at - self.started_at
    }
}

// ============================================================================
// SessionState
// ============================================================================

/// Serializable state of one learner's session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Current status.
    pub status: SessionStatus,

    /// Family being practised, if a round is in progress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<Family>,

    /// Problem currently shown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<Problem>,

    /// Graded submissions made against the current problem.
    pub attempts: u32,

    /// Units missed on the current problem so far.
    #[serde(default)]
    pub missed_units: Vec<Unit>,

    /// Feedback from the most recent submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,

    /// Problems solved since the last restart.
    pub solved: u32,

    /// Rounds finished since the last restart.
    pub history: Vec<RoundRecord>,

    /// When the current problem was shown.
    pub round_started_at: DateTime<Utc>,

    /// When the session started or was last restarted.
    pub started_at: DateTime<Utc>,

    /// When the state was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Creates an idle state.
    ///
    /// # Examples
    ///
    /// ```
    /// use unitquiz_core::{SessionState, SessionStatus};
    ///
    /// let state = SessionState::new();
    /// assert_eq!(state.status, SessionStatus::Idle);
    /// assert_eq!(state.solved, 0);
    /// assert!(state.problem.is_none());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            status: SessionStatus::Idle,
            family: None,
            problem: None,
            attempts: 0,
            missed_units: Vec::new(),
            feedback: None,
            solved: 0,
            history: Vec::new(),
            round_started_at: now,
            started_at: now,
            updated_at: now,
        }
    }

    /// Returns `true` while a problem is awaiting answers.
    #[must_use]
    pub const fn is_in_round(&self) -> bool {
        matches!(self.status, SessionStatus::InRound)
    }

    /// Updates the `updated_at` timestamp to the current time.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Total graded submissions across finished rounds and the current one.
    #[must_use]
    pub fn total_attempts(&self) -> u32 {
        self.history.iter().map(|r| r.attempts).sum::<u32>() + self.attempts
    }

    /// Time from the start of the session to its last update.
    #[must_use]
    pub fn elapsed(&self) -> chrono::Duration {
        self.updated_at - self.started_at
    }

    /// Shows `problem` as a fresh round.
    fn begin_round(&mut self, problem: Problem) {
        self.problem = Some(problem);
        self.attempts = 0;
        self.missed_units.clear();
        self.round_started_at = Utc::now();
        self.touch();
    }

    /// Moves the current problem into the history.
    fn finish_round(&mut self, solved: bool) {
        let Some(problem) = self.problem.take() else {
            return;
        };
        let round = u32::try_from(self.history.len()).unwrap_or(u32::MAX).saturating_add(1);
        self.history.push(RoundRecord {
            round,
            problem,
            attempts: self.attempts,
            missed_units: std::mem::take(&mut self.missed_units),
            solved,
            started_at: self.round_started_at,
            ended_at: Utc::now(),
        });
        if solved {
            self.solved += 1;
        }
        self.attempts = 0;
    }
}

// ============================================================================
// QuizSession
// ============================================================================

/// Outcome of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// The full verdict.
    pub verdict: Verdict,
    /// The problem now shown: a fresh one after a correct answer, otherwise
    /// the same one.
    pub next_problem: Problem,
}

/// One learner's quiz session.
#[derive(Debug, Clone)]
pub struct QuizSession<R = ChaCha8Rng> {
    generator: ProblemGenerator<R>,
    validator: Validator,
    state: SessionState,
}

impl QuizSession<ChaCha8Rng> {
    /// Creates a session from configuration.
    #[must_use]
    pub fn from_config(config: &QuizConfig) -> Self {
        Self::new(config.generator(), config.validator())
    }
}

impl<R: Rng> QuizSession<R> {
    /// Creates an idle session.
    pub fn new(generator: ProblemGenerator<R>, validator: Validator) -> Self {
        Self {
            generator,
            validator,
            state: SessionState::new(),
        }
    }

    /// Returns the session state.
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Returns the validation policy.
    pub const fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Returns the problem currently shown.
    pub const fn current_problem(&self) -> Option<&Problem> {
        self.state.problem.as_ref()
    }

    /// Chooses a family and shows its first problem.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidStateTransition` unless the session is idle.
    pub fn start(&mut self, family: Family) -> Result<&Problem> {
        if self.state.status != SessionStatus::Idle {
            return Err(QuizError::invalid_transition(
                self.state.status,
                SessionStatus::InRound,
            ));
        }
        let problem = self.generator.generate(family);
        self.state.status = SessionStatus::InRound;
        self.state.family = Some(family);
        self.state.feedback = None;
        self.state.begin_round(problem);
        tracing::info!(family = %family, "Session started");
        self.current_problem_or_err()
    }

    /// Submits one raw answer per unit for the current problem.
    ///
    /// Blank or non-numeric fields are rejected with a user error before
    /// grading and do not count as an attempt. A correct answer finishes the
    /// round and draws the next problem; a wrong one keeps the problem and
    /// records hints.
    ///
    /// # Errors
    ///
    /// - `QuizError::InvalidStateTransition` if no round is in progress.
    /// - `QuizError::EmptyField` / `QuizError::UnparseableNumber` for bad fields.
    /// - `QuizError::MalformedInput` if the number of fields is wrong.
    pub fn submit<S: AsRef<str>>(&mut self, inputs: &[S]) -> Result<Submission> {
        let (family, problem) = self.round()?;
        check_fields(inputs, problem.units())?;
        let verdict = self.validator.validate(inputs, problem)?;

        self.state.attempts += 1;
        if verdict.all_correct {
            self.state.finish_round(true);
            self.state.feedback = Some(Feedback::Correct);
            tracing::info!(solved = self.state.solved, "Problem solved");
            let next = self.generator.generate(family);
            self.state.begin_round(next);
        } else {
            let wrong_units = verdict.wrong_units();
            self.state.missed_units.extend(wrong_units.iter().copied());
            self.state.feedback = Some(Feedback::Incorrect {
                wrong_units,
                hints: verdict.hints.clone(),
            });
            self.state.touch();
            tracing::info!(attempts = self.state.attempts, "Answer not accepted");
        }

        Ok(Submission {
            verdict,
            next_problem: self.current_problem_or_err()?.clone(),
        })
    }

    /// Abandons the current problem and shows a new one of the same family.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidStateTransition` if no round is in progress.
    pub fn skip(&mut self) -> Result<&Problem> {
        let (family, _) = self.round()?;
        self.state.finish_round(false);
        self.state.feedback = None;
        let next = self.generator.generate(family);
        self.state.begin_round(next);
        tracing::info!(family = %family, "Problem skipped");
        self.current_problem_or_err()
    }

    /// Returns to family selection and clears all counters and history.
    pub fn restart(&mut self) {
        tracing::info!(solved = self.state.solved, "Session restarted");
        self.state = SessionState::new();
    }

    /// Returns the family and problem of the round in progress.
    fn round(&self) -> Result<(Family, &Problem)> {
        match (self.state.status, self.state.family, self.state.problem.as_ref()) {
            (SessionStatus::InRound, Some(family), Some(problem)) => Ok((family, problem)),
            (status, _, _) => Err(QuizError::invalid_transition(status, "submitted")),
        }
    }

    fn current_problem_or_err(&self) -> Result<&Problem> {
        self.state
            .problem
            .as_ref()
            .ok_or_else(|| QuizError::invalid_transition(self.state.status, "no_problem"))
    }
}
