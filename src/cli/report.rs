//! Report command - run the full reporting flow

use crate::cli::{CliProgress, LocationArgs};
use anyhow::{Context, Result, bail};
use dialoguer::Input;
use fms_report::gate::{email_is_valid, field_is_valid};
use fms_report::prefs::ContactPrefs;
use fms_report::session::{DEFAULT_POLL_INTERVAL, ReportSession};
use fms_report::upload::Uploader;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use url::Url;
use std::sync::Arc;
use std::time::Duration;

/// Prompt for a required field, prepopulated from `initial`
fn prompt(label: &str, initial: &str) -> Result<String> {
    let value: String = Input::new()
        .with_prompt(label)
        .with_initial_text(initial)
        .allow_empty(false)
        .interact_text()
        .context("details prompt aborted")?;
    Ok(value)
}

/// Resolve a details field: flag value wins, otherwise prompt
fn resolve_field(flag: Option<String>, label: &str, initial: &str) -> Result<String> {
    match flag {
        Some(value) => Ok(value),
        None => prompt(label, initial),
    }
}

/// Run the report command
#[allow(clippy::too_many_arguments)]
pub async fn run_report(
    photo: PathBuf,
    subject: Option<String>,
    name: Option<String>,
    email: Option<String>,
    location: &LocationArgs,
    endpoint: Option<Url>,
    max_wait_secs: u64,
) -> Result<()> {
    let source = location.build_source()?;

    // Details step, prepopulated from saved preferences.
    let prefs = ContactPrefs::load().unwrap_or_default();
    let subject = resolve_field(subject, "Subject", "")?;
    let name = resolve_field(name, "Your name", &prefs.name)?;
    let email = resolve_field(email, "Your email", &prefs.email)?;

    if !field_is_valid(&subject) {
        bail!("Please enter a subject!");
    }
    if !field_is_valid(&name) {
        bail!("Please enter your name. We'll remember it for next time.");
    }
    if !email_is_valid(&email) {
        bail!("Please enter a valid email address. We'll remember it for next time.");
    }

    // Remember contact details for next time.
    let new_prefs = ContactPrefs {
        name: name.clone(),
        email: email.clone(),
    };
    if let Err(e) = new_prefs.save() {
        eprintln!("{}", format!("Could not save contact details: {e}").yellow());
    }

    let mut session = ReportSession::new(source);
    session.set_details(&subject, &name, &email);
    session.set_photo(Some(photo));

    // Acquire a fix of sufficient quality, showing live gate status.
    let progress = CliProgress::new();
    let accepted = session
        .wait_for_fix(
            DEFAULT_POLL_INTERVAL,
            Duration::from_secs(max_wait_secs),
            &progress,
        )
        .await?;
    if !accepted {
        progress.finish();
        eprintln!(
            "{}",
            "Sorry, your GPS location is not accurate enough. Can you see the sky?".red()
        );
        bail!("no usable GPS fix within {max_wait_secs}s");
    }

    let uploader = endpoint.map_or_else(Uploader::new, Uploader::with_endpoint);
    let outcome = session.submit(Arc::new(uploader), &progress).await?;
    progress.finish();

    if outcome.is_success() {
        println!("{}", outcome.notice().green());
        println!("Thanks for reporting your problem!");
        Ok(())
    } else {
        eprintln!("{}", outcome.notice().red());
        bail!("report not submitted")
    }
}
