//! CLI that loads .env files and runs a command with them, or prints them.

use std::env;
use std::path::PathBuf;
use std::process::{Command, ExitCode};

use clap::{Parser, ValueEnum};
use nvi_rs::{Encoding, EnvMap, Options, load_config, load_process_env};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// When set to `test`, fatal errors are logged but the exit status is 0.
const TEST_MODE_VAR: &str = "NVI_ENV";

#[derive(Parser)]
#[command(name = "nvi")]
#[command(author, version, about = "Load .env files into the environment and run a command")]
struct Cli {
    /// Load options for this environment from env.config.json
    #[arg(short, long, value_name = "ENVIRONMENT")]
    config: Option<String>,

    /// Directory containing the .env files (and env.config.json)
    #[arg(short, long)]
    directory: Option<PathBuf>,

    /// Files to parse, in order
    #[arg(short, long, num_args = 1..)]
    files: Vec<String>,

    /// Replace keys that are already set in the environment
    #[arg(short, long = "override")]
    override_existing: bool,

    /// Text encoding of the files (utf-8, utf-16le, latin1)
    #[arg(short, long)]
    encoding: Option<Encoding>,

    /// Keys that must end up with a non-empty value
    #[arg(short, long, num_args = 1..)]
    required: Vec<String>,

    /// Log every assignment and per-file totals
    #[arg(long)]
    debug: bool,

    /// Print the parsed keys and values
    #[arg(short, long)]
    print: bool,

    /// Output format for --print
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Command to run with the parsed environment
    #[arg(last = true)]
    command: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Dotenv,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            report(e.as_ref());
            fatal_exit()
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let options = build_options(cli)?;
    let envs = load_process_env(&options)?;

    if let Some((program, args)) = cli.command.split_first() {
        return execute(program, args, &envs);
    }

    if cli.print {
        let output = match cli.format {
            OutputFormat::Json => nvi_rs::to_json(&envs)?,
            OutputFormat::Dotenv => nvi_rs::format(&envs),
        };
        println!("{}", output.trim_end());
        return Ok(ExitCode::SUCCESS);
    }

    Err("nothing to do: pass a command after '--' or use --print (see --help)".into())
}

fn build_options(cli: &Cli) -> Result<Options, nvi_rs::Error> {
    let mut options = match &cli.config {
        Some(environment) => {
            info!(environment = %environment, "loading options from env.config.json");
            load_config(environment, cli.directory.as_deref())?
        }
        None => Options::new(),
    };

    // With --config, --directory locates env.config.json and only
    // applies to the files when the environment sets no directory.
    if let Some(directory) = cli
        .directory
        .as_ref()
        .filter(|_| cli.config.is_none() || options.directory.is_none())
    {
        options.directory = Some(directory.clone());
    }
    if !cli.files.is_empty() {
        options.files.clone_from(&cli.files);
    }
    if cli.override_existing {
        options.override_existing = true;
    }
    if let Some(encoding) = cli.encoding {
        options.encoding = encoding;
    }
    if !cli.required.is_empty() {
        options.required.clone_from(&cli.required);
    }
    if cli.debug {
        options.debug = true;
    }

    Ok(options)
}

fn execute(
    program: &str,
    args: &[String],
    envs: &EnvMap,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let status = Command::new(program)
        .args(args)
        .envs(envs.iter())
        .status()
        .map_err(|e| format!("unable to run '{program}': {e}"))?;

    Ok(status
        .code()
        .and_then(|code| u8::try_from(code).ok())
        .map_or(ExitCode::FAILURE, ExitCode::from))
}

// One log line per failed file, then the required-key result.
fn report(e: &(dyn std::error::Error + 'static)) {
    match e.downcast_ref::<nvi_rs::Error>() {
        Some(nvi_rs::Error::Files { errors, missing }) => {
            for file_error in errors {
                error!("{file_error}");
            }
            if let Some(missing) = missing {
                error!("{missing}");
            }
        }
        _ => error!("{e}"),
    }
}

fn fatal_exit() -> ExitCode {
    if env::var(TEST_MODE_VAR).is_ok_and(|v| v == "test") {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
