//! Unitquiz CLI
//!
//! Interactive terminal practice for metric unit conversions.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use unitquiz_core::{check_fields, Family, QuizConfig, QuizSession, SessionStatus, Unit, Verdict};
use unitquiz_report::{json::JsonGenerator, MarkdownGenerator, SessionReport};

/// Unitquiz - Metric Conversion Practice
///
/// Shows a measurement in one unit and asks for its value in every unit of
/// the same family. Type `:skip` for a new problem, `:restart` to pick a
/// different family, or `:quit` to stop.
#[derive(Parser, Debug)]
#[command(name = "unitquiz")]
#[command(version, about, long_about = None)]
struct Args {
    /// Unit family to practise: length, capacity or weight
    #[arg(value_name = "FAMILY")]
    family: Option<Family>,

    /// Path to configuration file (default: unitquiz.json in current directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seed for a reproducible problem sequence (overrides the config file)
    #[arg(short, long, value_name = "N")]
    seed: Option<u64>,

    /// Stop after this many problems are solved
    #[arg(short, long, value_name = "N")]
    rounds: Option<u32>,

    /// Write a JSON session report to this file on exit
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,
}

/// What the learner asked for at an answer prompt.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Answers(Vec<String>),
    Skip,
    Restart,
    Quit,
}

/// Settings that shape the interactive loop.
#[derive(Debug, Clone, Copy)]
struct PlayOptions {
    display_decimals: u32,
    rounds: Option<u32>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (warn)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // Logs go to stderr; stdout carries the prompts
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    tracing::debug!(config = ?args.config, seed = ?args.seed, "Unitquiz starting");

    let stdin = io::stdin();
    let stdout = io::stdout();
    match run(&args, &mut stdin.lock(), &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Loads configuration, plays until the learner stops, then reports.
fn run(args: &Args, input: &mut impl BufRead, out: &mut impl Write) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    config.validate()?;

    let options = PlayOptions {
        display_decimals: config.display_decimals,
        rounds: args.rounds,
    };
    let mut session = QuizSession::from_config(&config);
    play(&mut session, args.family, options, input, out)?;

    let report = SessionReport::from_state(session.state());
    writeln!(out)?;
    write!(out, "{}", MarkdownGenerator::new(&report).generate())?;

    if let Some(path) = &args.report {
        JsonGenerator::new(&report).write_to_file(path, true)?;
        writeln!(out, "Report written to {}", path.display())?;
        tracing::info!(path = %path.display(), "Report written");
    }

    Ok(())
}

/// Loads configuration from the specified path or default location.
fn load_config(config_path: Option<&Path>) -> anyhow::Result<QuizConfig> {
    match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!(
                    "Config file not found: '{}'\n\nSuggestion: Check the path or remove the --config flag to use defaults",
                    path.display()
                );
            }
            Ok(QuizConfig::load_from_file(path)?)
        }
        None => Ok(QuizConfig::load()?),
    }
}

/// Runs the question-and-answer loop until `:quit`, end of input, or the
/// requested number of solved problems.
fn play<I: BufRead, O: Write>(
    session: &mut QuizSession,
    mut family: Option<Family>,
    options: PlayOptions,
    input: &mut I,
    out: &mut O,
) -> anyhow::Result<()> {
    loop {
        if session.state().status == SessionStatus::Idle {
            let chosen = match family.take() {
                Some(chosen) => chosen,
                None => match choose_family(input, out)? {
                    Some(chosen) => chosen,
                    None => return Ok(()),
                },
            };
            session.start(chosen)?;
        }

        let Some(problem) = session.current_problem().cloned() else {
            return Ok(());
        };
        writeln!(out)?;
        writeln!(
            out,
            "Problem {}: {}",
            session.state().history.len() + 1,
            problem.display_text(options.display_decimals)
        )?;
        writeln!(out, "Convert to {}.", problem.family().unit_list())?;

        let answers = match read_answers(problem.units(), input, out)? {
            Command::Answers(answers) => answers,
            Command::Skip => {
                session.skip()?;
                writeln!(out, "Skipped.")?;
                continue;
            }
            Command::Restart => {
                session.restart();
                writeln!(out, "Starting over.")?;
                continue;
            }
            Command::Quit => return Ok(()),
        };

        match session.submit(&answers) {
            Ok(submission) => {
                print_verdict(&submission.verdict, out)?;
                let done = options
                    .rounds
                    .is_some_and(|target| session.state().solved >= target);
                if submission.verdict.all_correct && done {
                    return Ok(());
                }
            }
            Err(e) if e.is_user_error() => writeln!(out, "{}", first_line(&e.to_string()))?,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Asks for a family until a valid one is given. Returns `None` on quit.
fn choose_family<I: BufRead, O: Write>(input: &mut I, out: &mut O) -> io::Result<Option<Family>> {
    loop {
        write!(out, "Choose a family (length, capacity, weight): ")?;
        out.flush()?;

        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        if line == ":quit" {
            return Ok(None);
        }
        match line.parse::<Family>() {
            Ok(family) => return Ok(Some(family)),
            Err(e) => writeln!(out, "{}", first_line(&e.to_string()))?,
        }
    }
}

/// Reads one value per unit, re-prompting blank or non-numeric fields.
fn read_answers<I: BufRead, O: Write>(
    units: &[Unit],
    input: &mut I,
    out: &mut O,
) -> io::Result<Command> {
    let mut answers = Vec::with_capacity(units.len());

    for unit in units {
        loop {
            write!(out, "  {unit}: ")?;
            out.flush()?;

            let Some(line) = read_line(input)? else {
                return Ok(Command::Quit);
            };
            match line.as_str() {
                ":skip" => return Ok(Command::Skip),
                ":restart" => return Ok(Command::Restart),
                ":quit" => return Ok(Command::Quit),
                _ => {}
            }

            match check_fields(&[line.as_str()], &[*unit]) {
                Ok(_) => {
                    answers.push(line);
                    break;
                }
                Err(e) => writeln!(out, "  {}", first_line(&e.to_string()))?,
            }
        }
    }

    Ok(Command::Answers(answers))
}

/// Prints which units were right and any hints.
fn print_verdict<O: Write>(verdict: &Verdict, out: &mut O) -> io::Result<()> {
    if verdict.all_correct {
        return writeln!(out, "Correct!");
    }

    writeln!(out, "Not quite.")?;
    for check in &verdict.checks {
        let mark = if check.is_correct() { "ok" } else { "wrong" };
        writeln!(out, "  {:>3} {mark}", check.unit.symbol())?;
    }
    for hint in &verdict.hints {
        writeln!(out, "  Hint: {hint}")?;
    }
    Ok(())
}

/// Reads a trimmed line, or `None` at end of input.
fn read_line<I: BufRead>(input: &mut I) -> io::Result<Option<String>> {
    let mut buf = String::new();
    if input.read_line(&mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(buf.trim().to_string()))
}

fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or(message)
}
