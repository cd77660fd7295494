//! Cargo-style status output on stderr.

use std::io::Write;
use std::time::Duration;

use console::{Style, Term};
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Debug, Clone, Copy)]
enum Tone {
    Action,
    Info,
    Warn,
}

impl Tone {
    fn style(self) -> Style {
        let base = Style::new().for_stderr().bold();
        match self {
            Tone::Action => base.green(),
            Tone::Info => base.cyan(),
            Tone::Warn => base.yellow(),
        }
    }
}

fn emit(tone: Tone, label: &str, message: &str) {
    let mut term = Term::stderr();
    let _ = writeln!(term, "{:>12} {message}", tone.style().apply_to(label));
}

/// `  Installing github.com/pkg/errors`, with the label right-aligned in bold green.
pub fn status(label: &str, message: &str) {
    emit(Tone::Action, label, message);
}

/// Same layout as [`status`], cyan label, for lines that report rather than act.
pub fn status_info(label: &str, message: &str) {
    emit(Tone::Info, label, message);
}

pub fn status_warn(label: &str, message: &str) {
    emit(Tone::Warn, label, message);
}

/// Spinner for work of unknown length. Finish it with
/// [`ProgressBar::finish_and_clear`] before printing status lines.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
