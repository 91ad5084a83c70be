//! Crescent CLI - account and session management for the Crescent client.

mod commands;

use clap::{Parser, Subcommand};

/// Crescent CLI - Manage your account and session.
#[derive(Parser)]
#[command(name = "crescent")]
#[command(about = "Crescent client for account and session management")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Login with email and password
    Login,

    /// Register a new account
    Register,

    /// Verify the email code sent after registration
    Verify {
        /// Email the code was sent to
        #[arg(short, long)]
        email: String,
        /// The numeric verification code
        #[arg(short, long)]
        otp: String,
    },

    /// Logout and clear the session
    Logout,

    /// Show session status
    Status,

    /// Mark onboarding as completed
    Onboard,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    crescent_core::init_logging(&cli.log_level);

    match cli.command {
        Commands::Login => commands::auth::login().await,
        Commands::Register => commands::auth::register().await,
        Commands::Verify { email, otp } => commands::auth::verify(&email, &otp).await,
        Commands::Logout => commands::auth::logout().await,
        Commands::Status => commands::auth::status().await,
        Commands::Onboard => commands::auth::onboard().await,
    }
}
