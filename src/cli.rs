// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines the post-commit hook and build-tag executor subcommands.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tagdeploy::config::DEFAULT_CONFIG_PATH;
use tagdeploy::types::{TagName, TagNameError};

#[derive(Parser)]
#[command(name = "tagdeploy")]
#[command(about = "Deploy tagged configuration trees from a Subversion post-commit hook")]
#[command(version)]
pub struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Handle a post-commit hook call and dispatch tag deployments
    PostCommit {
        /// Repository URL or path, as passed to the hook
        repos: String,

        /// Committed revision
        rev: u64,
    },

    /// Deploy one tag: lock, switch the working copy, run the build
    BuildTag {
        /// Tag name relative to the tags branch (e.g. 1.2.3)
        #[arg(value_parser = parse_tag)]
        tag: TagName,
    },
}

fn parse_tag(value: &str) -> Result<TagName, TagNameError> {
    TagName::new(value)
}
