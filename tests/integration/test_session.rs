//! End-to-end integration tests for a learner session
//!
//! Loads the sample configuration, plays a seeded session through solved,
//! missed and skipped rounds, then checks the resulting reports.

use std::path::PathBuf;

use unitquiz_core::{
    Family, Feedback, Quantity, QuizConfig, QuizError, QuizSession, SessionState, SessionStatus,
    Unit,
};
use unitquiz_report::{json::JsonGenerator, MarkdownGenerator, SessionReport};

/// Path to the sample configuration fixture.
fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

fn sample_config() -> QuizConfig {
    QuizConfig::load_from_dir(&fixture_path()).expect("Failed to load config fixture")
}

fn correct_inputs(session: &QuizSession) -> Vec<String> {
    session
        .current_problem()
        .expect("a problem is shown")
        .answer_vector()
        .iter()
        .map(Quantity::to_string)
        .collect()
}

/// Tests that the sample config loads with its overrides applied.
#[test]
fn test_sample_config_loads() {
    let config = sample_config();

    assert_eq!(config.seed, Some(31));
    assert_eq!(config.display_decimals, 2);
    assert_eq!(config.tolerance, "0.001".parse().expect("decimal"));
    assert_eq!(config.ranges.weight.min, 1000);
    assert_eq!(config.ranges.weight.max, 5000);
    assert_eq!(
        config.validator().hints_for(Family::Weight).get(Unit::Kilogram),
        Some("Move the decimal point three places left.")
    );
}

/// Tests that two sessions from the same seeded config see the same problems.
#[test]
fn test_seeded_sessions_are_reproducible() {
    let config = sample_config();
    let mut first = QuizSession::from_config(&config);
    let mut second = QuizSession::from_config(&config);

    first.start(Family::Weight).expect("idle session starts");
    second.start(Family::Weight).expect("idle session starts");

    for _ in 0..5 {
        assert_eq!(first.current_problem(), second.current_problem());
        let inputs = correct_inputs(&first);
        first.submit(&inputs).expect("valid submission");
        second.submit(&inputs).expect("valid submission");
    }
}

/// Tests the configured draw range and hint override flow through a session.
#[test]
fn test_session_uses_config() {
    let mut session = QuizSession::from_config(&sample_config());
    session.start(Family::Weight).expect("idle session starts");

    for _ in 0..20 {
        let problem = session.current_problem().expect("a problem is shown").clone();
        assert!(problem.base_value() >= &Quantity::from(1000_u64));
        assert!(problem.base_value() <= &Quantity::from(5000_u64));

        let mut inputs = correct_inputs(&session);
        inputs[1] = "0".to_string();
        let submission = session.submit(&inputs).expect("valid submission");

        assert!(!submission.verdict.all_correct);
        assert_eq!(submission.next_problem, problem);
        assert!(submission
            .verdict
            .hints
            .contains(&"Move the decimal point three places left.".to_string()));

        session.skip().expect("skip during a round");
    }
}

/// Plays a full session and checks the state, reports and their files.
#[test]
fn test_full_session_and_reports() {
    let mut session = QuizSession::from_config(&sample_config());
    session.start(Family::Length).expect("idle session starts");

    // Round 1: solved first try
    let inputs = correct_inputs(&session);
    assert!(session.submit(&inputs).expect("valid").verdict.all_correct);

    // Round 2: one miss on km, then solved
    let mut wrong = correct_inputs(&session);
    wrong[3] = "12345".to_string();
    let submission = session.submit(&wrong).expect("valid");
    assert_eq!(submission.verdict.wrong_units(), vec![Unit::Kilometer]);
    assert!(matches!(
        session.state().feedback,
        Some(Feedback::Incorrect { .. })
    ));
    let inputs = correct_inputs(&session);
    assert!(session.submit(&inputs).expect("valid").verdict.all_correct);

    // Round 3: skipped
    session.skip().expect("skip during a round");

    // A blank field is rejected without counting
    let blank = vec![String::new(); 4];
    let err = session.submit(&blank).expect_err("blank fields");
    assert!(matches!(err, QuizError::EmptyField { .. }));

    let state = session.state();
    assert_eq!(state.status, SessionStatus::InRound);
    assert_eq!(state.solved, 2);
    assert_eq!(state.history.len(), 3);
    assert_eq!(state.total_attempts(), 3);

    let report = SessionReport::from_state(state);
    assert_eq!(report.summary.rounds_played, 3);
    assert_eq!(report.summary.problems_solved, 2);
    assert_eq!(report.summary.skipped, 1);
    assert_eq!(report.summary.first_try_solves, 1);
    assert_eq!(report.misses.len(), 1);
    assert_eq!(report.misses[0].unit, Unit::Kilometer);

    let markdown = MarkdownGenerator::new(&report).generate();
    assert!(markdown.contains("# Unitquiz Session Report: length"));
    assert!(markdown.contains("| km | 1 |"));
    assert!(markdown.contains("| 3 |"));
    assert!(markdown.contains("Skipped"));

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("unitquiz-report.json");
    JsonGenerator::new(&report)
        .write_to_file(&path, false)
        .expect("report written");
    let saved: SessionReport =
        serde_json::from_str(&std::fs::read_to_string(&path).expect("report read"))
            .expect("report parses");
    assert_eq!(saved, report);
}

/// Tests that session state survives a save and reload.
#[test]
fn test_session_state_persists() {
    let mut session = QuizSession::from_config(&sample_config());
    session.start(Family::Capacity).expect("idle session starts");
    let inputs = correct_inputs(&session);
    session.submit(&inputs).expect("valid");

    let json = serde_json::to_string_pretty(session.state()).expect("serializes");
    let restored: SessionState = serde_json::from_str(&json).expect("deserializes");

    assert_eq!(&restored, session.state());
    assert!(restored.updated_at >= restored.started_at);
    assert!(restored.elapsed() >= chrono::Duration::zero());
}

/// Tests that restart clears progress and illegal calls are rejected.
#[test]
fn test_restart_and_illegal_transitions() {
    let mut session = QuizSession::from_config(&sample_config());

    assert!(matches!(
        session.skip(),
        Err(QuizError::InvalidStateTransition { .. })
    ));

    session.start(Family::Weight).expect("idle session starts");
    assert!(session.start(Family::Weight).is_err());

    session.restart();
    assert_eq!(session.state().status, SessionStatus::Idle);
    assert!(session.state().history.is_empty());

    let report = SessionReport::from_state(session.state());
    assert_eq!(report.summary.rounds_played, 0);
    assert!(MarkdownGenerator::new(&report)
        .generate()
        .contains("*No rounds finished.*"));
}
