use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ricecast",
    version,
    about = "Rice planting window predictor based on Rabi harvest rainfall"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Predict the planting window for one year and print a report
    Predict {
        /// Year to predict (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Print the prediction as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a config file interactively
    Init,
    /// Validate config and test the archive connection
    Check,
}
