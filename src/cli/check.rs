//! Check command - show which submission preconditions hold

use crate::cli::LocationArgs;
use anyhow::Result;
use fms_report::location::{LocationSource, NullSource};
use fms_report::prefs::ContactPrefs;
use fms_report::session::ReportSession;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::sync::Arc;

fn mark(ok: bool) -> String {
    if ok {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}

/// Run the check command
pub async fn run_check(
    photo: Option<PathBuf>,
    subject: Option<String>,
    location: &LocationArgs,
) -> Result<()> {
    let prefs = ContactPrefs::load().unwrap_or_default();
    let subject = subject.unwrap_or_default();

    let source: Arc<dyn LocationSource> = match location.build_source() {
        Ok(source) => source,
        Err(_) => {
            println!("GPS: no location source configured");
            Arc::new(NullSource)
        }
    };
    let mut session = ReportSession::new(source);

    // One reading is enough for a status line; a stalled or inaccurate
    // source simply shows up as a rejection message.
    if let Some(decision) = session.poll_location().await? {
        println!("GPS: {}", decision.message());
    } else {
        println!("GPS: no reading yet");
    }

    let photo_on_disk = photo
        .as_deref()
        .is_some_and(|p| p.metadata().map(|m| m.len() > 0).unwrap_or(false));
    session.set_details(&subject, &prefs.name, &prefs.email);
    session.set_photo(photo.filter(|_| photo_on_disk));

    println!();
    println!(
        "{} details (subject: {:?}, name: {:?}, email: {:?})",
        mark(!session
            .missing()
            .contains(&"details (subject, name, valid email)")),
        subject,
        prefs.name,
        prefs.email
    );
    println!("{} photo on disk", mark(photo_on_disk));
    println!(
        "{} accurate GPS fix",
        mark(!session.missing().contains(&"accurate GPS fix"))
    );
    println!();

    if session.is_ready() {
        println!("{}", "Ready to submit.".green());
    } else {
        println!("Not ready: missing {}.", session.missing().join(", "));
    }
    Ok(())
}
