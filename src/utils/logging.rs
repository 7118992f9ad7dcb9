use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::core::message::ChatMessage;

/// Install the global tracing subscriber. Diagnostics go to stderr and are
/// filtered through `RUST_LOG` (silent by default so the TUI stays clean).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Optional transcript logging, enabled with `--log <file>`. Appends each
/// exchanged message as plain text.
pub struct TranscriptLog {
    file_path: Option<String>,
    is_active: bool,
}

impl TranscriptLog {
    pub fn new(log_file: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        if let Some(path) = &log_file {
            test_file_access(path)?;
        }
        let is_active = log_file.is_some();
        Ok(TranscriptLog {
            file_path: log_file,
            is_active,
        })
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn record(&self, message: &ChatMessage) -> Result<(), Box<dyn std::error::Error>> {
        if !self.is_active {
            return Ok(());
        }
        let prefix = if message.is_user() { "You" } else { "Bot" };
        let mut line = format!("{prefix}: {}", message.text);
        if let Some(note) = message.sentiment_note() {
            line.push_str(&format!("  [{note}]"));
        }
        self.write_line(&line)
    }

    fn write_line(&self, content: &str) -> Result<(), Box<dyn std::error::Error>> {
        let Some(file_path) = self.file_path.as_ref() else {
            return Ok(());
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        for line in content.lines() {
            writeln!(file, "{line}")?;
        }
        file.flush()?;
        Ok(())
    }

    pub fn status_string(&self) -> String {
        match (&self.file_path, self.is_active) {
            (None, _) => "off".to_string(),
            (Some(path), true) => format!(
                "on ({})",
                Path::new(path)
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
            ),
            (Some(path), false) => format!(
                "paused ({})",
                Path::new(path)
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
            ),
        }
    }
}

fn test_file_access(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.flush()?;
    Ok(())
}
