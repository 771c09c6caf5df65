//! fms - report street problems to FixMyStreet
//!
//! CLI binary wrapping the fms-report library.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use url::Url;

mod cli;

use cli::LocationArgs;

#[derive(Parser)]
#[command(name = "fms")]
#[command(about = "Report street problems to FixMyStreet")]
#[command(version)]
#[command(allow_negative_numbers = true)]
struct Cli {
    /// Report submission endpoint (defaults to the FixMyStreet import URL)
    #[arg(long, global = true)]
    endpoint: Option<Url>,

    #[command(flatten)]
    location: LocationArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a report: details, photo, GPS fix, upload
    Report {
        /// Photo of the problem (JPEG)
        #[arg(long)]
        photo: PathBuf,

        /// Short description of the problem (prompted for if omitted)
        #[arg(long)]
        subject: Option<String>,

        /// Your name (prompted for if omitted, remembered between runs)
        #[arg(long)]
        name: Option<String>,

        /// Your email (prompted for if omitted, remembered between runs)
        #[arg(long)]
        email: Option<String>,

        /// How long to wait for an accurate GPS fix, in seconds
        #[arg(long, default_value_t = 60)]
        max_wait_secs: u64,
    },

    /// Show which submission preconditions currently hold
    Check {
        /// Photo of the problem, if already taken
        #[arg(long)]
        photo: Option<PathBuf>,

        /// Short description of the problem
        #[arg(long)]
        subject: Option<String>,
    },

    /// Manage the saved contact details
    Contact {
        #[command(subcommand)]
        action: ContactAction,
    },
}

#[derive(Subcommand)]
enum ContactAction {
    /// Show the saved name and email
    Show,
    /// Update the saved name and/or email
    Set {
        /// Reporter's name
        #[arg(long)]
        name: Option<String>,
        /// Reporter's email address
        #[arg(long)]
        email: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            photo,
            subject,
            name,
            email,
            max_wait_secs,
        } => {
            cli::run_report(
                photo,
                subject,
                name,
                email,
                &cli.location,
                cli.endpoint,
                max_wait_secs,
            )
            .await?;
        }
        Commands::Check { photo, subject } => {
            cli::run_check(photo, subject, &cli.location).await?;
        }
        Commands::Contact { action } => match action {
            ContactAction::Show => cli::run_contact_show()?,
            ContactAction::Set { name, email } => cli::run_contact_set(name, email)?,
        },
    }

    Ok(())
}
