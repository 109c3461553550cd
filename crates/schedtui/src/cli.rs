#![forbid(unsafe_code)]

//! Command-line argument parsing.
//!
//! Parses args manually (no external dependencies) to keep the binary
//! lean. Every flag has a `SCHEDTUI_*` environment override; flags win
//! over the environment.

use std::env;
use std::path::PathBuf;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
schedtui - terminal controller for a remote MLQ scheduling engine

USAGE:
    schedtui [OPTIONS]

OPTIONS:
    --engine-url=URL     Engine base URL (default: http://127.0.0.1:5000)
    --tick-ms=N          UI tick interval in milliseconds (default: 200)
    --timeout-secs=N     Transport timeout for engine calls (default: 5)
    --log-file=PATH      Write tracing output to PATH instead of stderr
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    a               Focus the add-process form
    s               Start the simulation
    n / space       Execute one scheduling step
    v               Save the current run's results
    r               Reset the simulation
    h               Load saved history
    q / Ctrl+C      Quit

ENVIRONMENT VARIABLES:
    SCHEDTUI_ENGINE_URL      Override --engine-url
    SCHEDTUI_TICK_MS         Override --tick-ms
    SCHEDTUI_TIMEOUT_SECS    Override --timeout-secs
    SCHEDTUI_LOG_FILE        Override --log-file
    RUST_LOG                 Tracing filter (default: warn)
";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    pub engine_url: String,
    pub tick_ms: u64,
    pub timeout_secs: u64,
    pub log_file: Option<PathBuf>,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            engine_url: "http://127.0.0.1:5000".to_owned(),
            tick_ms: 200,
            timeout_secs: 5,
            log_file: None,
        }
    }
}

/// What an argument list resolves to.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Run(Opts),
    Help,
    Version,
}

impl Opts {
    /// Parse process arguments, exiting on `--help`, `--version`, or a
    /// usage error.
    pub fn parse() -> Self {
        let args: Vec<String> = env::args().skip(1).collect();
        match from_args(&args, Self::from_env()) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                print!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("schedtui {VERSION}");
                process::exit(0);
            }
            Err(message) => {
                eprintln!("schedtui: {message}");
                eprintln!("Try 'schedtui --help' for usage.");
                process::exit(2);
            }
        }
    }

    /// Defaults with environment overrides applied.
    fn from_env() -> Self {
        let mut opts = Self::default();
        if let Ok(url) = env::var("SCHEDTUI_ENGINE_URL") {
            opts.engine_url = url;
        }
        if let Some(n) = env_u64("SCHEDTUI_TICK_MS") {
            opts.tick_ms = n;
        }
        if let Some(n) = env_u64("SCHEDTUI_TIMEOUT_SECS") {
            opts.timeout_secs = n;
        }
        if let Ok(path) = env::var("SCHEDTUI_LOG_FILE") {
            opts.log_file = Some(PathBuf::from(path));
        }
        opts
    }
}

fn env_u64(name: &str) -> Option<u64> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

fn from_args(args: &[String], base: Opts) -> Result<Command, String> {
    let mut opts = base;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--version" | "-V" => return Ok(Command::Version),
            _ => {}
        }
        let (flag, inline_value) = match arg.split_once('=') {
            Some((flag, value)) => (flag, Some(value.to_owned())),
            None => (arg.as_str(), None),
        };
        let mut value = |name: &str| -> Result<String, String> {
            match &inline_value {
                Some(v) => Ok(v.clone()),
                None => iter
                    .next()
                    .cloned()
                    .ok_or_else(|| format!("{name} requires a value")),
            }
        };
        match flag {
            "--engine-url" => opts.engine_url = value("--engine-url")?,
            "--tick-ms" => {
                opts.tick_ms = parse_u64("--tick-ms", &value("--tick-ms")?)?;
            }
            "--timeout-secs" => {
                opts.timeout_secs = parse_u64("--timeout-secs", &value("--timeout-secs")?)?;
            }
            "--log-file" => opts.log_file = Some(PathBuf::from(value("--log-file")?)),
            other => return Err(format!("unrecognized argument '{other}'")),
        }
    }
    if opts.tick_ms == 0 {
        return Err("--tick-ms must be at least 1".to_owned());
    }
    Ok(Command::Run(opts))
}

fn parse_u64(flag: &str, text: &str) -> Result<u64, String> {
    text.parse()
        .map_err(|_| format!("{flag} expects a non-negative integer, got '{text}'"))
}
