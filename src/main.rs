//! RepCoach CLI
//!
//! Usage:
//!   repcoach --frames session.jsonl             # Replay recorded frames
//!   repcoach --interactive                      # Read frames from stdin
//!   repcoach --serve                            # HTTP API server
//!   repcoach --frames f.jsonl --exercise pushup # Pick the rule set
//!   repcoach --print-rules                      # Dump the rule table
//!
//! Frame input is JSON Lines. Each line is either an array of landmarks,
//! an object `{"landmarks": [...]}`, or `{"say": "..."}` for a voice
//! transcript.

use clap::Parser;
use log::{error, warn, LevelFilter};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

use repcoach::core::{replay, run_server, ReplayOptions, RuleTable};
use repcoach::logging::init_stderr_logger;
use repcoach::{CoachError, DEFAULT_EXERCISE, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "repcoach",
    version = VERSION,
    about = "RepCoach - Count exercise reps from pose landmarks",
    long_about = "RepCoach turns a stream of body landmarks into joint angles\n\
                  and counts repetitions with per-exercise threshold rules.\n\n\
                  Modes:\n  \
                  --frames FILE  Replay a JSON Lines recording\n  \
                  --interactive  Read JSON Lines from stdin\n  \
                  --serve        HTTP API server mode\n\n\
                  Phases:\n  \
                  UP    - Extended, waiting for the DOWN threshold\n  \
                  DOWN  - Flexed, rep counts on the way back UP"
)]
struct Args {
    /// JSON Lines file of frames to replay
    #[arg(short, long)]
    frames: Option<String>,

    /// Read frames from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address (default: 127.0.0.1:3000)
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// Exercise rule set to apply
    #[arg(short, long, default_value = DEFAULT_EXERCISE)]
    exercise: String,

    /// JSON file with a custom rule table
    #[arg(long)]
    rules: Option<String>,

    /// Print the rule table as JSON and exit
    #[arg(long)]
    print_rules: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Print every frame, not only phase changes
    #[arg(long)]
    verbose: bool,

    /// Log level (error, warn, info, debug, trace, off)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let level = match args.log_level.as_deref().map(str::parse::<LevelFilter>) {
        Some(Ok(level)) => Some(level),
        Some(Err(_)) => {
            eprintln!("Invalid log level: {}", args.log_level.as_deref().unwrap_or_default());
            std::process::exit(1);
        }
        None => None,
    };
    init_stderr_logger(level);

    if args.no_color {
        colored::control::set_override(false);
    }

    let rules = match load_rules(&args) {
        Ok(rules) => rules,
        Err(e) => {
            eprintln!("Failed to load rules: {}", e);
            std::process::exit(1);
        }
    };

    if args.print_rules {
        match rules.to_json_pretty() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    if args.serve {
        run_serve(&args, rules).await;
        return;
    }

    if !rules.supports(&args.exercise) {
        warn!(
            "no rule set for '{}' - frames will not change the count (known: {})",
            args.exercise,
            rules.exercises().join(", ")
        );
    }

    let result = match &args.frames {
        Some(path) => File::open(path)
            .map_err(CoachError::from)
            .and_then(|file| run_frames(BufReader::new(file), &args, rules)),
        None => run_frames(io::stdin().lock(), &args, rules),
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn load_rules(args: &Args) -> repcoach::Result<RuleTable> {
    match &args.rules {
        Some(path) => RuleTable::from_json_file(path),
        None => Ok(RuleTable::default()),
    }
}

/// Replay frames from any line source to stdout
fn run_frames(reader: impl BufRead, args: &Args, rules: RuleTable) -> repcoach::Result<()> {
    let options = ReplayOptions {
        exercise: args.exercise.clone(),
        json: args.json,
        no_color: args.no_color,
        verbose: args.verbose,
        interactive: args.interactive,
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();
    replay(reader, &mut out, &options, rules)?;
    out.flush()?;
    Ok(())
}

/// Run HTTP API server
async fn run_serve(args: &Args, rules: RuleTable) {
    println!();
    println!("RepCoach API Server v{}", VERSION);
    println!("Exercises: {}", rules.exercises().join(", "));
    println!();

    if let Err(e) = run_server(&args.addr, rules).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
