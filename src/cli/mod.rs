// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::NodeConfig;

/// Fabstir Vision Node CLI
#[derive(Parser, Debug)]
#[command(name = "fabstir-vision-cli")]
#[command(version = crate::version::VERSION_NUMBER)]
#[command(about = "CLI tools for the Fabstir vision detection node", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP detection API
    Serve(commands::ServeArgs),

    /// Run detection on a local image and print the result
    Detect(commands::DetectArgs),

    /// Print the stored detection history
    History(commands::HistoryArgs),
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let mut config = NodeConfig::from_env();
    match cli.command {
        Commands::Serve(args) => {
            args.apply(&mut config);
            commands::serve(config).await
        }
        Commands::Detect(args) => commands::detect(args, config).await,
        Commands::History(args) => commands::history(args, config).await,
    }
}
