#![warn(clippy::pedantic)]
mod cli;
mod controller;
mod error;
mod input;
mod render;

use crate::cli::Cli;
use crate::controller::Controller;
use crate::error::AppError;
use cell_query::{CellService, PgCellStore};
use clap::Parser;
use shared::{init_tracing, initialize_db, load_config, shutdown_listener};
use std::process::ExitCode;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<ExitCode, AppError> {
    let cli = Cli::parse();
    init_tracing()?;

    let config = load_config()?;
    debug!(postgres = ?config.postgres, "configuration loaded");

    let pool = initialize_db(&config.postgres).await?;
    let controller = Controller::new(CellService::new(PgCellStore::new(pool)), config.export);

    let outcome = tokio::select! {
        outcome = controller.run(cli.cmd) => outcome,
        () = shutdown_listener() => {
            info!("interrupted before the action finished");
            return Ok(ExitCode::from(130));
        }
    };

    print!("{}", render::render(&outcome));
    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
