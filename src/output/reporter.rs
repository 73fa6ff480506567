use std::path::Path;

use crate::error::FuzzError;
use crate::filter::Finding;
use crate::output::report_sink::ReportSink;
use crate::output::writer_text::LABEL_WIDTH;

const MARKER: &str = "[+]";
const GREEN: &str = "\x1b[1;92m";
const RESET: &str = "\x1b[0m";

/// Receives every finding as soon as it is classified.
pub trait FindingSink: Send + Sync + 'static {
    fn report(&self, finding: &Finding) -> Result<(), FuzzError>;
}

pub fn console_line(finding: &Finding, color: bool) -> String {
    let marker = if color {
        format!("{}{}{}", GREEN, MARKER, RESET)
    } else {
        MARKER.to_string()
    };
    format!(
        "{} {:<width$} [Code: {}] [Size: {}]",
        marker,
        finding.label,
        finding.status,
        finding.size,
        width = LABEL_WIDTH
    )
}

/// Console output plus the optional report file.
#[derive(Debug)]
pub struct Reporter {
    color: bool,
    sink: Option<ReportSink>,
}

impl Reporter {
    pub fn new(color: bool, sink: Option<ReportSink>) -> Self {
        Self { color, sink }
    }

    pub fn report_path(&self) -> Option<&Path> {
        self.sink.as_ref().map(|s| s.path())
    }
}

impl FindingSink for Reporter {
    fn report(&self, finding: &Finding) -> Result<(), FuzzError> {
        println!("{}", console_line(finding, self.color));
        if let Some(sink) = &self.sink {
            sink.append(finding)?;
        }
        Ok(())
    }
}
