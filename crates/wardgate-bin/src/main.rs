// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! wardgate - stateless authentication gateway for the hospital service.
//!
//! Main binary entry point.

use clap::Parser;

use wardgate_bin::cli::{Cli, Commands};
use wardgate_bin::{commands, logging};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init_logging(&cli.log_level, cli.log_format);

    let result = match cli.command.clone().unwrap_or_default() {
        Commands::Run => commands::run(&cli).await,
        Commands::Validate => commands::validate(&cli),
        Commands::Version => commands::version(),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "fatal error");
        std::process::exit(1);
    }
}
