//! expense-splitter CLI
//!
//! Compute balances and settlements for a shared expense group.
//!
//! # Usage
//!
//! ```bash
//! # Show each participant's balance
//! expense-splitter balances --input group.json
//!
//! # Suggest settlements
//! expense-splitter settle --input group.json
//!
//! # Output as JSON
//! expense-splitter settle --input group.json --format json
//!
//! # Generate a random group for testing
//! expense-splitter generate --participants 6 --expenses 25
//! ```
//!
//! Set `RUST_LOG=debug` to see what the engine is doing.

use expense_splitter::core::group::{Group, GroupError, GroupSnapshot};
use expense_splitter::optimization::simplification::{SettlementConfig, MAX_SCALE};
use expense_splitter::simulation::random_group::{generate_random_group, GroupConfig};
use log::debug;
use std::fs;
use std::process;
use thiserror::Error;

fn print_usage() {
    eprintln!(
        r#"expense-splitter: shared expense balances and settlements

USAGE:
    expense-splitter <COMMAND> [OPTIONS]

COMMANDS:
    balances    Show each participant's net balance
    settle      Suggest the payments that settle the group
    generate    Generate a random group (for testing)
    help        Show this message

OPTIONS (balances, settle):
    --input <FILE>      Path to JSON group file
    --format <FORMAT>   Output format: text (default) or json

OPTIONS (settle):
    --scale <N>         Fractional digits for rounded amounts (default: 2)

OPTIONS (generate):
    --participants <N>  Number of participants (default: 5)
    --expenses <N>      Number of expenses (default: 20)
    --output <FILE>     Write to file instead of stdout

EXAMPLES:
    expense-splitter balances --input trip.json
    expense-splitter settle --input trip.json --format json
    expense-splitter generate --participants 4 --expenses 10 --output trip.json"#
    );
}

#[derive(Debug, Error)]
enum CliError {
    #[error("reading '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("writing '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Group(#[from] GroupError),
    #[error("{0}")]
    Usage(String),
}

type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

/// Options shared by `balances` and `settle`.
struct ReportOptions {
    input: String,
    format: Format,
    config: SettlementConfig,
}

fn usage(message: impl Into<String>) -> CliError {
    CliError::Usage(message.into())
}

fn value_of(args: &[String], i: usize, flag: &str, expected: &str) -> Result<String> {
    args.get(i)
        .cloned()
        .ok_or_else(|| usage(format!("{} requires {}", flag, expected)))
}

fn parse_report_options(args: &[String], allow_scale: bool) -> Result<ReportOptions> {
    let mut input = None;
    let mut format = Format::Text;
    let mut config = SettlementConfig::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input = Some(value_of(args, i, "--input", "a file path")?);
            }
            "--format" => {
                i += 1;
                format = match value_of(args, i, "--format", "'text' or 'json'")?.as_str() {
                    "text" => Format::Text,
                    "json" => Format::Json,
                    other => return Err(usage(format!("unknown format '{}'", other))),
                };
            }
            "--scale" if allow_scale => {
                i += 1;
                let scale: u32 = value_of(args, i, "--scale", "a number")?
                    .parse()
                    .map_err(|_| usage("--scale requires a number"))?;
                if scale > MAX_SCALE {
                    return Err(usage(format!("--scale must be at most {}", MAX_SCALE)));
                }
                config = SettlementConfig::new(scale);
            }
            other => return Err(usage(format!("unknown option: {}", other))),
        }
        i += 1;
    }

    let input = input.ok_or_else(|| usage("--input <FILE> is required"))?;
    Ok(ReportOptions {
        input,
        format,
        config,
    })
}

fn load_group(path: &str) -> Result<Group> {
    let content = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_string(),
        source,
    })?;
    let snapshot: GroupSnapshot = serde_json::from_str(&content)?;
    debug!(
        "loaded {} participants and {} expenses from {}",
        snapshot.participants.len(),
        snapshot.expenses.len(),
        path
    );
    Ok(Group::from_snapshot(snapshot)?)
}

fn cmd_balances(args: &[String]) -> Result<()> {
    let options = parse_report_options(args, false)?;
    let group = load_group(&options.input)?;
    let balances = group.balances();

    match options.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&balances)?),
        Format::Text => {
            for (participant, balance) in balances.iter() {
                println!(
                    "{:<20} {:>12}",
                    participant.as_str(),
                    options.config.round(balance).to_string()
                );
            }
        }
    }
    Ok(())
}

fn cmd_settle(args: &[String]) -> Result<()> {
    let options = parse_report_options(args, true)?;
    let group = load_group(&options.input)?;
    let summary = group.summary_with(&options.config);

    match options.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        Format::Text => print!("{}", summary),
    }
    Ok(())
}

fn cmd_generate(args: &[String]) -> Result<()> {
    let mut config = GroupConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--participants" => {
                i += 1;
                config.participant_count = value_of(args, i, "--participants", "a number")?
                    .parse()
                    .map_err(|_| usage("--participants requires a number"))?;
            }
            "--expenses" => {
                i += 1;
                config.expense_count = value_of(args, i, "--expenses", "a number")?
                    .parse()
                    .map_err(|_| usage("--expenses requires a number"))?;
            }
            "--output" => {
                i += 1;
                output_path = Some(value_of(args, i, "--output", "a file path")?);
            }
            other => return Err(usage(format!("unknown option: {}", other))),
        }
        i += 1;
    }

    let group = generate_random_group(&config)?;
    let json = serde_json::to_string_pretty(&group.snapshot())?;

    if let Some(path) = output_path {
        fs::write(&path, &json).map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        })?;
        eprintln!(
            "Generated {} expenses across {} participants → {}",
            group.expenses().len(),
            group.participants().len(),
            path
        );
    } else {
        println!("{}", json);
    }
    Ok(())
}

fn run(args: &[String]) -> Result<()> {
    let Some(command) = args.get(1) else {
        return Err(usage("missing command"));
    };
    let rest = &args[2..];

    match command.as_str() {
        "balances" => cmd_balances(rest),
        "settle" => cmd_settle(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => Err(usage(format!("unknown command: {}", other))),
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        if matches!(e, CliError::Usage(_)) {
            eprintln!();
            print_usage();
        }
        process::exit(1);
    }
}
