//! JulieCraft CLI - database migrations and staff management.
//!
//! # Usage
//!
//! ```bash
//! # Apply pending migrations
//! jc-cli migrate
//!
//! # Give an existing account admin access
//! jc-cli admin grant -e julie@juliecraft.shop -r super_admin
//!
//! # Take it away again
//! jc-cli admin revoke -e julie@juliecraft.shop
//!
//! # Show everyone with admin access
//! jc-cli admin list
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "jc-cli")]
#[command(author, version, about = "JulieCraft CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage staff access
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Grant an admin role to an existing profile
    Grant {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Role (`admin`, `manager`, `super_admin`)
        #[arg(short, long, default_value = "admin")]
        role: String,
    },
    /// Demote a profile back to customer
    Revoke {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
    /// List profiles with admin access
    List,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Grant { email, role } => {
                commands::admin::grant(&email, &role).await?;
            }
            AdminAction::Revoke { email } => commands::admin::revoke(&email).await?,
            AdminAction::List => commands::admin::list().await?,
        },
    }
    Ok(())
}
