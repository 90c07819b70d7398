// ABOUTME: Entry point for the tagdeploy CLI application.
// ABOUTME: Parses arguments and dispatches to the subcommand handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::PostCommit { repos, rev } => {
            commands::post_commit(&cli.config, cli.verbose, &repos, rev).await
        }
        Commands::BuildTag { tag } => commands::build_tag(&cli.config, cli.verbose, tag).await,
    }
}
