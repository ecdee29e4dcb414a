use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "timeflow-tui")]
#[command(about = "Terminal client for the TimeFlow timesheet backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the timesheet UI
    Run,
    /// Authenticate with username and password
    Login,
    /// Remove the local session
    Logout,
    /// Print config path and create default file if missing
    ConfigPath,
}
