//! Terminal output for stepman commands.
//!
//! Status lines go to stderr so stdout stays parseable (`--format json`,
//! the activation summary). Labels are right-aligned to twelve columns:
//!
//! ```text
//!       Set up file:///srv/steplib (42 steps)
//!        Fresh file:///srv/steplib is already set up
//!   Deprecated legacy-deploy: Use deploy instead
//!    Activated script@1.2.0 at ./steps/script
//! ```

use std::io::Write;
use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

const LABEL_WIDTH: usize = 12;

fn write_status(style: &Style, label: &str, message: &str) {
    let _ = writeln!(
        std::io::stderr(),
        "{:>width$} {message}",
        style.apply_to(label),
        width = LABEL_WIDTH
    );
}

/// A finished action, such as a library set up or a step activated (green).
pub fn status(label: &str, message: &str) {
    write_status(&Style::new().green().bold(), label, message);
}

/// Nothing to do, or the user declined (cyan).
pub fn status_info(label: &str, message: &str) {
    write_status(&Style::new().cyan().bold(), label, message);
}

/// Something the user should look at, such as a deprecated step (yellow).
pub fn status_warn(label: &str, message: &str) {
    write_status(&Style::new().yellow().bold(), label, message);
}

/// Spinner for a library fetch or step download of unknown length.
///
/// indicatif hides it when stderr is not a terminal.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Byte progress for a step archive of known size; advance it per chunk.
pub fn download_bar(total: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) =
        ProgressStyle::with_template("{msg:>12} {bar:30.cyan/dim} {bytes}/{total_bytes}")
    {
        pb.set_style(style.progress_chars("=> "));
    }
    pb.set_message(label.to_string());
    pb
}
