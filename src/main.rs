//! SOAP test server (standalone)
//!
//! Serves one canned response to whoever connects, one connection at a
//! time, until a request for `/terminateThread` arrives.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request    ┌─────────┐    ┌──────────┐    ┌────────┐    ┌──────────┐
//!     ─────────────────▶│   net   │───▶│   http   │───▶│  soap  │───▶│ security │
//!                       │listener │    │ request/ │    │ action │    │  basic   │
//!                       │ + tls   │    │ headers  │    │ check  │    │  auth    │
//!                       └─────────┘    └──────────┘    └────────┘    └────┬─────┘
//!     Client Response                                                     │
//!     ◀───────────────────────── canned bytes or 401 challenge ◀──────────┘
//! ```

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use soap_test_server::config::{load_config, ServerConfig};
use soap_test_server::observability::init_logging;
use soap_test_server::{make_http_response, LoopExit, ServerThread};

#[derive(Debug, Parser)]
#[command(name = "soap-test-server", version, about)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// File holding the SOAP envelope to serve.
    #[arg(short, long)]
    response: PathBuf,

    /// Override `listener.bind_address`.
    #[arg(long)]
    bind: Option<String>,

    /// Serve HTTPS with the configured certificate.
    #[arg(long)]
    tls: bool,

    /// Log every request, response and state transition.
    #[arg(long)]
    debug: bool,

    /// Send the response file verbatim instead of wrapping it in a 200.
    #[arg(long)]
    raw: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(exit) => {
            tracing::info!(
                requests = exit.requests,
                connections = exit.connections,
                "Shutdown complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "soap-test-server failed");
            eprintln!("soap-test-server: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<LoopExit, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    config.listener.use_tls |= cli.tls;
    config.observability.diagnostics |= cli.debug;

    init_logging(&config.observability.log_level);

    let payload = fs::read(&cli.response)?;
    let response = if cli.raw {
        payload
    } else {
        make_http_response(&payload)
    };

    let server = ServerThread::spawn(config, response)?;
    tracing::info!(endpoint = %server.endpoint(), "soap-test-server listening");
    println!("{}", server.endpoint());

    Ok(server.join()?)
}
