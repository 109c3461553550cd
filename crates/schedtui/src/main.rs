#![forbid(unsafe_code)]

//! schedtui binary entry point.

use std::fs::File;
use std::io;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use schedtui::cli::Opts;
use schedtui::runtime::Program;
use schedtui::session::Session;
use schedtui_client::EngineClient;

fn main() {
    let opts = Opts::parse();

    if let Err(e) = init_tracing(&opts) {
        eprintln!("Failed to initialize logging: {e}");
        process::exit(1);
    }

    let client = match EngineClient::new(&opts.engine_url, Duration::from_secs(opts.timeout_secs)) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to initialize: {e}");
            process::exit(1);
        }
    };

    let session = Session::new(client);
    let mut program = Program::new(session, Duration::from_millis(opts.tick_ms));
    if let Err(e) = program.run() {
        eprintln!("Runtime error: {e}");
        process::exit(1);
    }
}

fn init_tracing(opts: &Opts) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    match &opts.log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}
