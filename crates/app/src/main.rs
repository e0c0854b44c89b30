use std::fmt;
use std::io::Write;
use std::sync::Arc;

use services::{
    FEEDBACK_PACING, FeedbackKind, HttpScoringClient, QuizSession, REFILL_PACING, ScoringConfig,
    SessionController, SessionError,
};
use storage::{JsonFileMirror, ProgressMirror};
use trainer_core::Clock;
use trainer_core::model::{Confidence, Direction};

const DEFAULT_MIRROR_PATH: &str = "trainer_progress.json";
const DEFAULT_EXPORT_PATH: &str = "vocab_progress.csv";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDirection { raw: String },
    InvalidBatchSize { raw: String },
    InvalidConfidence { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDirection { raw } => {
                write!(f, "invalid --direction value: {raw} (use fr2nl or nl2fr)")
            }
            ArgsError::InvalidBatchSize { raw } => write!(f, "invalid --batch-size value: {raw}"),
            ArgsError::InvalidConfidence { raw } => {
                write!(f, "invalid --confidence value: {raw} (use 1-5)")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- practice   [options]   # adaptive quiz loop");
    eprintln!("  cargo run -p app -- diagnostic [options]   # baseline batch first");
    eprintln!("  cargo run -p app -- init                   # load vocab server-side");
    eprintln!("  cargo run -p app -- progress               # server scoreboard");
    eprintln!("  cargo run -p app -- snapshot               # local last-seen mirror");
    eprintln!("  cargo run -p app -- export [--out <path>]  # download CSV");
    eprintln!("  cargo run -p app -- reset                  # clear the local mirror");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --api <url>          scoring service address");
    eprintln!("  --mirror <path>      local progress file (default {DEFAULT_MIRROR_PATH})");
    eprintln!("  --direction <d>      fr2nl (default) or nl2fr");
    eprintln!("  --batch-size <n>     adaptive batch size (default 10)");
    eprintln!("  --confidence <1-5>   confidence sent with answers (default 3)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TRAINER_API_URL, TRAINER_MIRROR_PATH");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Practice,
    Diagnostic,
    Init,
    Progress,
    Snapshot,
    Export,
    Reset,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "practice" => Some(Self::Practice),
            "diagnostic" => Some(Self::Diagnostic),
            "init" => Some(Self::Init),
            "progress" => Some(Self::Progress),
            "snapshot" => Some(Self::Snapshot),
            "export" => Some(Self::Export),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }
}

struct Args {
    api_url: Option<String>,
    mirror_path: String,
    direction: Direction,
    batch_size: usize,
    confidence: Confidence,
    export_path: String,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self {
            api_url: None,
            mirror_path: std::env::var("TRAINER_MIRROR_PATH")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MIRROR_PATH.into()),
            direction: Direction::Fr2Nl,
            batch_size: 10,
            confidence: Confidence::default(),
            export_path: DEFAULT_EXPORT_PATH.into(),
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api" => parsed.api_url = Some(require_value(args, "--api")?),
                "--mirror" => parsed.mirror_path = require_value(args, "--mirror")?,
                "--direction" => {
                    let value = require_value(args, "--direction")?;
                    parsed.direction = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidDirection { raw: value.clone() })?;
                }
                "--batch-size" => {
                    let value = require_value(args, "--batch-size")?;
                    parsed.batch_size = value
                        .parse::<usize>()
                        .ok()
                        .filter(|n| *n > 0)
                        .ok_or(ArgsError::InvalidBatchSize { raw: value.clone() })?;
                }
                "--confidence" => {
                    let value = require_value(args, "--confidence")?;
                    parsed.confidence = value
                        .parse::<u8>()
                        .ok()
                        .and_then(|n| Confidence::new(n).ok())
                        .ok_or(ArgsError::InvalidConfidence { raw: value.clone() })?;
                }
                "--out" => parsed.export_path = require_value(args, "--out")?,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }

    fn scoring_config(&self) -> ScoringConfig {
        match &self.api_url {
            Some(url) => ScoringConfig::new(url.clone()),
            None => ScoringConfig::from_env(),
        }
    }
}

fn build_controller(args: &Args) -> SessionController {
    let config = args.scoring_config();
    log::debug!(
        "scoring service at {}, mirror at {}",
        config.base_url,
        args.mirror_path
    );
    let scoring = Arc::new(HttpScoringClient::new(config));
    let mirror: Arc<dyn ProgressMirror> = Arc::new(JsonFileMirror::new(&args.mirror_path));
    SessionController::new(Clock::default_clock(), scoring, mirror)
        .with_refill_size(args.batch_size)
}

fn read_line(prompt: &str) -> Result<String, std::io::Error> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Drive the interactive question loop until the student quits or the
/// service runs out of items.
///
/// The session transitions themselves are atomic inside the controller; the
/// two sleeps here are the cosmetic pacing around them.
async fn run_quiz(
    ctl: &SessionController,
    mut session: QuizSession,
    confidence: Confidence,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Type your answer, '?' for a hint, '!' to skip, 'q' to quit.");

    loop {
        let presented = match ctl.present_current(&mut session).await {
            Ok(presented) => presented,
            Err(SessionError::OutOfItems { .. }) => {
                println!("The service has no more words to practice right now.");
                return Ok(());
            }
            Err(err) => {
                eprintln!("Could not fetch the next batch: {err}");
                return Ok(());
            }
        };

        if presented.refilled {
            println!("Fetched a new set of words.");
            tokio::time::sleep(REFILL_PACING).await;
        }

        println!();
        println!(
            "Question {} / {}: {}",
            presented.prompt.position, presented.prompt.total, presented.prompt.text
        );

        // Stay on this question until it advances or the student quits.
        loop {
            let input = read_line("> ")?;
            match input.as_str() {
                "q" => {
                    session.stop();
                    println!("Practice stopped. You can start again anytime.");
                    return Ok(());
                }
                "?" => match ctl.request_hint(&session) {
                    Some(letter) => println!("Hint: starts with {letter:?}"),
                    None => println!("No hint available."),
                },
                answer => {
                    let result = if answer == "!" {
                        ctl.skip(&mut session).await
                    } else {
                        ctl.submit_answer(&mut session, answer, confidence).await
                    };

                    match result {
                        Ok(feedback) => {
                            println!("{feedback}");
                            if feedback.kind == FeedbackKind::Rejected {
                                // The question stays current; let them retry.
                                continue;
                            }
                            tokio::time::sleep(FEEDBACK_PACING).await;
                            break;
                        }
                        Err(SessionError::Exhausted) => break,
                        Err(err) => {
                            eprintln!("The scoring service is unreachable: {err}");
                            eprintln!("Your answer was not recorded; try again.");
                        }
                    }
                }
            }
        }
    }
}

async fn show_scoreboard(ctl: &SessionController) -> Result<(), Box<dyn std::error::Error>> {
    let rows = ctl.scoreboard().await?;
    if rows.is_empty() {
        println!("No progress recorded on the server yet.");
        return Ok(());
    }
    println!("{:<20} {:<20} {:<10} score", "french", "dutch", "status");
    for row in rows {
        println!(
            "{:<20} {:<20} {:<10} {}/{}",
            row.fr, row.nl, row.bucket, row.correct_count, row.total_tests
        );
    }
    Ok(())
}

async fn show_snapshot(ctl: &SessionController) -> Result<(), Box<dyn std::error::Error>> {
    let records = ctl.local_snapshot().await?;
    if records.is_empty() {
        println!("No local progress yet.");
        return Ok(());
    }
    println!(
        "{:<20} {:<20} {:<10} {:<8} last seen",
        "word", "translation", "status", "correct"
    );
    for rec in records {
        println!(
            "{:<20} {:<20} {:<10} {:<8} {}",
            rec.source_word,
            rec.target_word,
            rec.bucket,
            if rec.last_correct { "yes" } else { "no" },
            rec.updated_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);

    let cmd = match argv.next() {
        None => {
            print_usage();
            return Ok(());
        }
        Some(first) if first == "--help" || first == "-h" => {
            print_usage();
            return Ok(());
        }
        Some(first) => Command::from_arg(&first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let ctl = build_controller(&args);

    match cmd {
        Command::Practice => {
            let session = ctl
                .start_adaptive(args.direction, Some(args.batch_size))
                .await?;
            run_quiz(&ctl, session, args.confidence).await
        }
        Command::Diagnostic => {
            let session = ctl.start_diagnostic(args.direction).await?;
            run_quiz(&ctl, session, args.confidence).await
        }
        Command::Init => {
            ctl.initialize().await?;
            println!("Vocabulary database initialized.");
            Ok(())
        }
        Command::Progress => show_scoreboard(&ctl).await,
        Command::Snapshot => show_snapshot(&ctl).await,
        Command::Export => {
            let csv = ctl.export_csv().await?;
            std::fs::write(&args.export_path, csv)?;
            println!("Export written to {}", args.export_path);
            Ok(())
        }
        Command::Reset => {
            let answer =
                read_line("This clears your local progress snapshot. Type 'yes' to confirm: ")?;
            if answer.eq_ignore_ascii_case("yes") {
                ctl.local_reset().await?;
                println!("Local progress cleared.");
            } else {
                println!("Reset cancelled.");
            }
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
