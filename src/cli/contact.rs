//! Contact command - manage the saved reporter name and email

use anyhow::{Result, bail};
use fms_report::gate::email_is_valid;
use fms_report::prefs::ContactPrefs;
use owo_colors::OwoColorize;

/// Print the saved contact details
pub fn run_contact_show() -> Result<()> {
    let prefs = ContactPrefs::load()?;
    let unset = "(unset)".to_string();
    println!(
        "name:  {}",
        if prefs.name.is_empty() { &unset } else { &prefs.name }
    );
    println!(
        "email: {}",
        if prefs.email.is_empty() { &unset } else { &prefs.email }
    );
    Ok(())
}

/// Update the saved contact details; omitted fields keep their value
pub fn run_contact_set(name: Option<String>, email: Option<String>) -> Result<()> {
    let mut prefs = ContactPrefs::load().unwrap_or_default();

    if let Some(name) = name {
        if name.trim().is_empty() {
            bail!("Please enter your name.");
        }
        prefs.name = name;
    }
    if let Some(email) = email {
        if !email_is_valid(&email) {
            bail!("Please enter a valid email address.");
        }
        prefs.email = email;
    }

    prefs.save()?;
    println!("{}", "Saved.".green());
    Ok(())
}
