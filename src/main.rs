use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, span, Level};

use crate::model::sync::{SyncError, SyncReport};

mod adapters;
mod cli;
mod config;
mod model;
mod sync;
mod util;

const EXIT_SUCCESS: u8 = 0;
const EXIT_PARTIAL: u8 = 1;
const EXIT_FATAL: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt().json().init();

    let span = span!(Level::INFO, "main", context = "main");
    let _e = span.enter();
    info!("called");

    let cli = cli::Cli::parse();
    let config = cli.sync_config();
    info!(config = ?config, "args");

    let client = match sync::SyncClient::new(&config) {
        Err(err) => {
            error!(error_message=%err, error_group="build_client");
            return ExitCode::from(EXIT_FATAL);
        }
        Ok(client) => client,
    };

    let res = match &cli.command {
        cli::Command::Pull {
            bucket,
            remote_prefix,
            local_root,
        } => client.pull(bucket, remote_prefix, local_root),
        cli::Command::Push {
            bucket,
            local_path,
            remote_prefix,
        } => client.push(bucket, local_path, remote_prefix),
    };

    ExitCode::from(exit_code(&res))
}

/// `0` on success, `1` when some items failed, `2` when the operation failed.
fn exit_code(res: &Result<SyncReport, SyncError>) -> u8 {
    match res {
        Err(err) => {
            error!(error_message=%err, error_group="sync");
            if err.is_fatal() {
                EXIT_FATAL
            } else {
                EXIT_PARTIAL
            }
        }
        Ok(report) if report.is_success() => EXIT_SUCCESS,
        Ok(_) => EXIT_PARTIAL,
    }
}
