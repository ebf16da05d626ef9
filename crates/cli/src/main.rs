//! Back-office CLI - database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! backoffice-cli migrate
//!
//! # Seed reference data and a demo catalog
//! backoffice-cli seed
//!
//! # Create an operator user
//! backoffice-cli admin create -e ops@example.com -n "Operator" -p <password> -r 2 --active
//!
//! # Approve a pending account
//! backoffice-cli admin activate -e ops@example.com
//!
//! # Change a user's role
//! backoffice-cli admin set-role -e ops@example.com -r 1
//! ```
//!
//! # Environment Variables
//!
//! - `BACKOFFICE_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection
//!   string

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "backoffice-cli")]
#[command(author, version, about = "Back-office CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed reference data and a demo catalog (idempotent)
    Seed,
    /// Manage back-office users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a user
    Create {
        /// Email address (login identifier)
        #[arg(short, long)]
        email: String,
        /// Display name
        #[arg(short, long)]
        name: String,
        /// Password (min 8 characters)
        #[arg(short, long)]
        password: String,
        /// Role id (1 = super_admin, 2 = admin, 3 = staff)
        #[arg(short, long)]
        role: Option<i32>,
        /// Activate the account immediately
        #[arg(long)]
        active: bool,
    },
    /// Approve a pending account
    Activate {
        /// Email address
        #[arg(short, long)]
        email: String,
    },
    /// Change a user's role
    SetRole {
        /// Email address
        #[arg(short, long)]
        email: String,
        /// Role id (1 = super_admin, 2 = admin, 3 = staff)
        #[arg(short, long)]
        role: i32,
    },
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backoffice_cli=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Migrate => commands::migrate::run().await,
        Commands::Seed => commands::seed::run().await,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                name,
                password,
                role,
                active,
            } => commands::admin::create(&email, &name, &password, role, active).await,
            AdminAction::Activate { email } => commands::admin::activate(&email).await,
            AdminAction::SetRole { email, role } => commands::admin::set_role(&email, role).await,
        },
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            std::process::ExitCode::FAILURE
        }
    }
}
