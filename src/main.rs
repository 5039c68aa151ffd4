//! cursor-verify CLI
//!
//! Human-vs-bot pointer movement check.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use cursor_verify::{
    collector::{check_available, PositionSource, ReplaySource, SystemSource},
    config::{validate_threshold, Config},
    core::{
        CancellationToken, Classifier, Clock, DetectionError, DetectionOutcome, ManualClock,
        RetryController, SystemClock,
    },
    report::{console::write_breakdown, ConsoleReporter, JsonLinesReporter, Reporter},
    transparency::create_shared_log,
    HEURISTIC_NOTICE, VERSION,
};
use serde::Deserialize;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Exit status when the attempt bound is reached, or `analyze` finds a
/// bot-like path.
const EXIT_NOT_HUMAN: u8 = 2;

#[derive(Parser)]
#[command(name = "cursor-verify")]
#[command(version = VERSION)]
#[command(about = "Tell human pointer movement from synthetic movement", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample the cursor until a human-like trajectory is observed
    Run(RunArgs),

    /// Classify a recorded list of points
    Analyze {
        /// JSON file with [{"x": .., "y": ..}, ...], or - for stdin
        file: PathBuf,

        /// Sharp-angle threshold in degrees
        #[arg(long)]
        threshold: Option<f64>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        save: bool,
    },

    /// Explain what the check does
    About,
}

#[derive(Args)]
struct RunArgs {
    /// Samples per attempt
    #[arg(long)]
    samples: Option<usize>,

    /// Minimum milliseconds between samples
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Sharp-angle threshold in degrees
    #[arg(long)]
    threshold: Option<f64>,

    /// Pause between attempts in milliseconds
    #[arg(long)]
    cooldown_ms: Option<u64>,

    /// Stop after this many attempts
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Abort a capture that takes longer than this many milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Replay positions from a JSON file instead of reading the cursor
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Show the vector and angle breakdown for bot-like attempts too
    #[arg(long, short)]
    verbose: bool,

    /// Wait for Enter before exiting
    #[arg(long)]
    pause_on_exit: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => cmd_run(args),
        Commands::Analyze {
            file,
            threshold,
            format,
        } => cmd_analyze(&file, threshold, format),
        Commands::Config { save } => cmd_config(save),
        Commands::About => {
            println!("{HEURISTIC_NOTICE}");
            Ok(ExitCode::SUCCESS)
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr so stdout stays clean for reports. `RUST_LOG` overrides the
/// default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn cmd_run(args: RunArgs) -> Result<ExitCode> {
    let mut config = Config::load().context("loading configuration")?;
    apply_overrides(&mut config, &args);
    config.validate()?;
    debug!(?config, "effective configuration");

    let token = CancellationToken::new();
    let handler_token = token.clone();
    ctrlc::set_handler(move || handler_token.cancel()).context("setting Ctrl+C handler")?;

    let log = create_shared_log();
    let mut output: Box<dyn Reporter> = match args.format {
        OutputFormat::Text => {
            let mut console = ConsoleReporter::stdout().verbose(args.verbose);
            console.banner()?;
            Box::new(console)
        }
        OutputFormat::Json => Box::new(JsonLinesReporter::stdout()),
    };
    let mut reporter = (&mut output, log.clone());

    let outcome = match &args.replay {
        Some(path) => {
            let source = ReplaySource::from_json_file(path, config.polls_per_sample())
                .with_context(|| format!("loading replay file {}", path.display()))?;
            detect(source, ManualClock::new(), &config, token, &mut reporter)
        }
        None => {
            if !check_available() {
                warn!("cursor position is not readable on this system");
            }
            detect(
                SystemSource::new(),
                SystemClock::new(),
                &config,
                token,
                &mut reporter,
            )
        }
    };

    let code = match outcome {
        Ok(DetectionOutcome::Human { attempts, .. }) => {
            if args.format == OutputFormat::Text {
                println!("Human verification successful after {attempts} attempt(s).");
            }
            ExitCode::SUCCESS
        }
        Ok(DetectionOutcome::Exhausted { attempts }) => {
            if args.format == OutputFormat::Text {
                println!("No human-like movement observed in {attempts} attempt(s).");
            }
            ExitCode::from(EXIT_NOT_HUMAN)
        }
        Err(e) => {
            let status = match &e {
                DetectionError::SourceUnavailable { .. } => "source unavailable",
                DetectionError::Cancelled { .. } => "cancelled",
                DetectionError::TimedOut { .. } => "timed out",
            };
            eprintln!("Detection stopped ({status}): {e}");
            ExitCode::FAILURE
        }
    };

    eprintln!();
    eprintln!("{}", log.summary());

    if args.pause_on_exit {
        print!("\nPress Enter to exit...");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
    }

    Ok(code)
}

fn detect<S, C, R>(
    source: S,
    clock: C,
    config: &Config,
    token: CancellationToken,
    reporter: &mut R,
) -> Result<DetectionOutcome, DetectionError>
where
    S: PositionSource,
    C: Clock,
    R: Reporter + ?Sized,
{
    RetryController::new(source, clock, config.settings())
        .with_cancellation(token)
        .run(reporter)
}

fn apply_overrides(config: &mut Config, args: &RunArgs) {
    if let Some(n) = args.samples {
        config.sample_count = n;
    }
    if let Some(ms) = args.interval_ms {
        config.sample_interval = Duration::from_millis(ms);
    }
    if let Some(t) = args.threshold {
        config.threshold_degrees = t;
    }
    if let Some(ms) = args.cooldown_ms {
        config.cooldown = Duration::from_millis(ms);
    }
    if let Some(n) = args.max_attempts {
        config.max_attempts = Some(n);
    }
    if let Some(ms) = args.timeout_ms {
        config.capture_timeout = Some(Duration::from_millis(ms));
    }
}

/// Point as written in an analysis file. Extra fields such as timestamps are
/// ignored.
#[derive(Deserialize)]
struct RecordedPoint {
    x: f64,
    y: f64,
}

fn cmd_analyze(file: &Path, threshold: Option<f64>, format: OutputFormat) -> Result<ExitCode> {
    let content = if file.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?
    };

    let points: Vec<RecordedPoint> =
        serde_json::from_str(&content).context("parsing points (expected [{\"x\":..,\"y\":..}])")?;
    if points.len() < 3 {
        bail!("need at least 3 points to measure an angle, got {}", points.len());
    }

    let threshold = match threshold {
        Some(t) => t,
        None => {
            Config::load()
                .unwrap_or_else(|e| {
                    warn!(error = %e, "could not load configuration, using default threshold");
                    Config::default()
                })
                .threshold_degrees
        }
    };
    validate_threshold(threshold)?;
    let coords: Vec<(f64, f64)> = points.iter().map(|p| (p.x, p.y)).collect();
    let result = Classifier::new(threshold).classify_points(&coords);

    match format {
        OutputFormat::Text => {
            let stdout = io::stdout();
            write_breakdown(&mut stdout.lock(), &result)?;
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(if result.is_human {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_NOT_HUMAN)
    })
}

fn cmd_config(save: bool) -> Result<ExitCode> {
    let config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "could not load configuration, showing defaults");
        Config::default()
    });

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!("{}", serde_json::to_string_pretty(&config)?);

    if save {
        config.save()?;
        println!();
        println!("Saved to {:?}", Config::config_path());
    }
    Ok(ExitCode::SUCCESS)
}
