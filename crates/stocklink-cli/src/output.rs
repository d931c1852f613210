//! CLI output formatting
//!
//! Human output prints checkmarked lines; JSON output prints machine-
//! readable documents and suppresses decorative text.

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Formats CLI output for one of the two modes
pub struct Reporter {
    format: OutputFormat,
}

impl Reporter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// A successful final status line.
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("\u{2713} {message}"),
            OutputFormat::Json => {}
        }
    }

    /// A failure line, always on stderr.
    pub fn error(&self, message: &str) {
        match self.format {
            OutputFormat::Human => eprintln!("\u{2717} {message}"),
            OutputFormat::Json => eprintln!(
                "{}",
                serde_json::json!({ "success": false, "error": message })
            ),
        }
    }

    /// An indented detail line; suppressed in JSON mode.
    pub fn detail(&self, message: &str) {
        if self.format == OutputFormat::Human {
            println!("  {message}");
        }
    }

    /// A JSON document; suppressed in human mode.
    pub fn json(&self, value: &serde_json::Value) {
        if self.format == OutputFormat::Json {
            println!(
                "{}",
                serde_json::to_string_pretty(value).unwrap_or_default()
            );
        }
    }
}
