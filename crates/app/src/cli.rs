//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Taskboard client
#[derive(Parser, Debug)]
#[command(name = "taskboard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Backend base URL (overrides `TASKBOARD_API_URL`)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Session file (overrides `TASKBOARD_SESSION_FILE`)
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,

    /// Default log filter when `RUST_LOG` is unset
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Client commands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Sign in and store the issued session
    SignIn {
        /// Login email
        #[arg(short, long)]
        username: String,

        /// Password
        #[arg(short, long, env = "TASKBOARD_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account and store the issued session
    SignUp {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email, also the login name
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long, env = "TASKBOARD_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the state of the stored session
    Status,

    /// Exchange the refresh token for a new access token
    Refresh,

    /// Enter the board: refresh, load the profile, create a missing board
    Home,

    /// Print the signed-in user's board
    Board,

    /// Send an authenticated request to the backend
    Request {
        /// HTTP method
        method: String,

        /// Path below the backend base URL
        path: String,

        /// JSON body
        #[arg(long)]
        body: Option<String>,
    },
}
