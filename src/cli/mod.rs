//! Command line interface

pub mod serve;

use clap::{Parser, Subcommand};

/// Flowdesk - workflow authoring API
#[derive(Parser)]
#[command(name = "flowdesk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve(serve::ServeArgs),
}
