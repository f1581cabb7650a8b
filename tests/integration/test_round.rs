//! Integration tests for a single problem round
//!
//! Exercises the public surface a front end uses: draw a problem, show it,
//! collect one answer per unit, validate.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use unitquiz_core::{
    convert, generate_problem, validate, validate_attempt, AnswerAttempt, Family, HintTable,
    Problem, ProblemGenerator, Quantity, QuizError, Unit, Validator, DEFAULT_TOLERANCE,
};

fn q(text: &str) -> Quantity {
    text.parse().expect("valid decimal literal")
}

fn length_problem() -> Problem {
    Problem::from_base(Family::Length, Quantity::from_integer(85_000), Unit::Meter)
        .expect("meter belongs to length")
}

fn capacity_problem() -> Problem {
    Problem::from_base(Family::Capacity, Quantity::from_integer(1300), Unit::Milliliter)
        .expect("milliliter belongs to capacity")
}

fn stringify(answers: &[Quantity]) -> Vec<String> {
    answers.iter().map(Quantity::to_string).collect()
}

/// Tests the worked length example end to end.
#[test]
fn test_length_worked_example() {
    let problem = length_problem();

    assert_eq!(problem.display_unit(), Unit::Meter);
    assert_eq!(problem.display_value(), &q("85"));
    assert_eq!(
        problem.answer_vector(),
        &[q("85000"), q("8500"), q("85"), q("0.085")]
    );

    let verdict = validate(&["85000", "8500", "85", "0.085"], &problem).expect("arity matches");
    assert!(verdict.all_correct);
    assert!(verdict.hints.is_empty());

    let verdict = validate(&["85000", "850", "85", "0.085"], &problem).expect("arity matches");
    assert!(!verdict.all_correct);
    assert_eq!(verdict.hints.len(), 1);
    assert_eq!(
        Some(verdict.hints[0].as_str()),
        HintTable::builtin(Family::Length).get(Unit::Centimeter)
    );
    assert_eq!(verdict.wrong_units(), vec![Unit::Centimeter]);
}

/// Tests the worked capacity example.
#[test]
fn test_capacity_worked_example() {
    let problem = capacity_problem();
    assert_eq!(problem.answer_vector(), &[q("1300"), q("1.3")]);

    assert!(validate(&["1300", "1.3"], &problem).expect("arity matches").all_correct);

    let verdict = validate(&["1300", "13"], &problem).expect("arity matches");
    assert!(!verdict.all_correct);
    assert_eq!(verdict.hints.len(), 1);
    assert!(verdict.hints[0].contains("1 L = 1000 mL"));
}

/// Every conversion multiplies back to the base value exactly.
#[test]
fn test_conversion_exactness_across_ranges() {
    for family in Family::ALL {
        let range = family.default_draw_range();
        let samples = [*range.start(), *range.start() + 1, 12_345, *range.end()];
        for n in samples {
            let base = Quantity::from(n);
            for (unit, value) in convert(&base, family).iter() {
                let back = value
                    .checked_mul_pow10(unit.scale_exponent())
                    .expect("scale back fits");
                assert_eq!(back, base, "{family} {n} via {unit}");
            }
        }
    }
}

/// Generated answers, formatted back to strings, always pass.
#[test]
fn test_generated_problems_round_trip() {
    let mut generator = ProblemGenerator::from_seed(2024);
    for family in Family::ALL {
        for _ in 0..200 {
            let problem = generator.generate(family);
            let inputs = stringify(problem.answer_vector());
            let verdict = validate(&inputs, &problem).expect("arity matches");
            assert!(verdict.all_correct, "failed for {problem:?}");
        }
    }
}

/// The free function and the seeded generator agree on a shared seed.
#[test]
fn test_generate_problem_with_caller_rng() {
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let problem = generate_problem(Family::Weight, &mut rng);
    let range = Family::Weight.default_draw_range();

    assert_eq!(problem.family(), Family::Weight);
    assert!(Family::Weight.units().contains(&problem.display_unit()));
    assert!(problem.base_value() >= &Quantity::from(*range.start()));
    assert!(problem.base_value() <= &Quantity::from(*range.end()));
}

/// Swapping two answers is wrong and hints both slots.
#[test]
fn test_order_matters() {
    let problem = length_problem();
    let verdict = validate(&["8500", "85000", "85", "0.085"], &problem).expect("arity matches");

    assert!(!verdict.all_correct);
    assert_eq!(
        verdict.wrong_units(),
        vec![Unit::Millimeter, Unit::Centimeter]
    );
    assert_eq!(verdict.hints.len(), 2);
}

/// Exactly the tolerance is accepted; anything beyond is one hint.
#[test]
fn test_tolerance_boundary() {
    let problem = length_problem();

    let at_boundary = validate(&["85000", "8500", "85", "0.0851"], &problem).expect("arity");
    assert!(at_boundary.all_correct);

    let beyond = validate(&["85000", "8500", "85", "0.085100000000000001"], &problem)
        .expect("arity");
    assert!(!beyond.all_correct);
    assert_eq!(beyond.hints.len(), 1);
    assert_eq!(beyond.wrong_units(), vec![Unit::Kilometer]);
}

/// Answers with more digits than fit in 128 bits are still graded exactly.
#[test]
fn test_long_answers_are_graded() {
    let problem = length_problem();

    let close = validate(&["85000", "8500", "85", "0.0850000000000000000001"], &problem)
        .expect("arity");
    assert!(close.all_correct);

    let wrong = validate(&["85000", "8500", "85", "12345678901234567890"], &problem)
        .expect("arity");
    assert_eq!(wrong.hints.len(), 1);
    assert_eq!(wrong.wrong_units(), vec![Unit::Kilometer]);

    let edge = format!("0.0851{}", "0".repeat(80));
    let at_edge = validate(&["85000", "8500", "85", edge.as_str()], &problem).expect("arity");
    assert!(at_edge.all_correct);
}

/// A fully wrong attempt gets one hint per unit with a table entry.
#[test]
fn test_hint_completeness() {
    let problem = length_problem();
    let wrong = ["1", "1", "1", "1"];

    let verdict = validate(&wrong, &problem).expect("arity matches");
    assert_eq!(verdict.hints.len(), 4);

    let partial = HintTable::builtin(Family::Length).without(Unit::Meter);
    let attempt = AnswerAttempt::new(wrong);
    let verdict = validate_attempt(
        &attempt,
        problem.answer_vector(),
        problem.units(),
        &partial,
        &DEFAULT_TOLERANCE,
    )
    .expect("arity matches");
    assert!(!verdict.all_correct);
    assert_eq!(verdict.hints.len(), partial.len());
}

/// A looser validator accepts answers a strict one rejects.
#[test]
fn test_configured_tolerance() {
    let problem = capacity_problem();
    let answers = ["1300.4", "1.3"];

    assert!(!validate(&answers, &problem).expect("arity").all_correct);
    assert!(
        Validator::new(q("0.5"))
            .validate(&answers, &problem)
            .expect("arity")
            .all_correct
    );
}

/// Unparseable text reaching the validator marks only that unit wrong.
#[test]
fn test_unparseable_field_is_wrong_not_fatal() {
    let problem = capacity_problem();
    let verdict = validate(&["1300", "one point three"], &problem).expect("arity matches");

    assert!(!verdict.all_correct);
    assert_eq!(verdict.wrong_units(), vec![Unit::Liter]);
}

/// Wrong field counts are a contract violation.
#[test]
fn test_malformed_input_is_fatal() {
    let problem = length_problem();
    let err = validate(&["85000", "8500", "85"], &problem).expect_err("arity mismatch");

    assert!(matches!(
        err,
        QuizError::MalformedInput {
            expected: 4,
            actual: 3,
            ..
        }
    ));
    assert!(err.is_fatal());
    assert!(!err.is_user_error());
}

/// The wire form matches what a front end renders.
#[test]
fn test_problem_wire_format() {
    let problem = capacity_problem();
    let json = serde_json::to_value(&problem).expect("serializes");

    assert_eq!(json["family"], "capacity");
    assert_eq!(json["displayUnit"], "mL");
    assert_eq!(json["displayValue"], "1300");
    assert_eq!(json["answerVector"], serde_json::json!(["1300", "1.3"]));
    assert_eq!(problem.display_text(1), "1300.0 mL");

    let back: Problem = serde_json::from_value(json).expect("deserializes");
    assert_eq!(back, problem);
}
