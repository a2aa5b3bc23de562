//! Ignite Certificates CLI - Database migrations and one-off issuing.
//!
//! # Usage
//!
//! ```bash
//! # Create or update the users_certificates table
//! ignite-cli migrate
//!
//! # Issue a certificate without going through the HTTP service
//! ignite-cli issue --id u1 --name "Ana" --grade A
//! ```
//!
//! Both commands read the same environment as the issuer service.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ignite-cli")]
#[command(author, version, about = "Ignite Certificates CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Issue (or re-issue) a certificate and print its URL
    Issue {
        /// Holder id, also the object key stem
        #[arg(short, long)]
        id: String,

        /// Holder's display name
        #[arg(short, long)]
        name: String,

        /// Grade printed on the certificate
        #[arg(short, long)]
        grade: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Issue { id, name, grade } => {
            commands::issue::run(id, name, grade).await?;
        }
    }
    Ok(())
}
