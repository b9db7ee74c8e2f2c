use std::io::IsTerminal;

use orgsync_client::{Level, Notification, NotificationSink};

/// Prints notifications to stderr so stdout stays machine-readable.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleSink {
    quiet: bool,
    color: bool,
}

impl ConsoleSink {
    pub fn new(quiet: bool) -> Self {
        let color = std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        Self { quiet, color }
    }

    fn format(&self, notification: &Notification) -> String {
        let (label, ansi) = match notification.level {
            Level::Success => ("success", "32"),
            Level::Info => ("info", "36"),
            Level::Warning => ("warning", "33"),
            Level::Error => ("error", "31"),
        };
        let label = if self.color {
            format!("\x1b[{ansi}m{label}\x1b[0m")
        } else {
            label.to_string()
        };
        if notification.message.is_empty() {
            format!("[{label}] {}", notification.title)
        } else {
            format!("[{label}] {}: {}", notification.title, notification.message)
        }
    }
}

impl NotificationSink for ConsoleSink {
    fn notify(&self, notification: Notification) {
        if self.quiet && notification.level != Level::Error {
            return;
        }
        eprintln!("{}", self.format(&notification));
    }
}
