//! Command-line interface for bingoal.

use clap::{Parser, Subcommand};

/// Bingoal - yearly-goal bingo board server
#[derive(Parser, Debug)]
#[command(name = "bingoal")]
#[command(about = "Yearly-goal bingo board server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Path to the database file (created if it doesn't exist)
        #[arg(long, default_value = "bingoal.db")]
        db_path: String,
    },

    /// Apply pending database migrations and exit
    Migrate {
        /// Path to the database file
        #[arg(long, default_value = "bingoal.db")]
        db_path: String,
    },
}
