use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::FuzzError;
use crate::filter::Finding;
use crate::output::writer_csv::{csv_header, csv_record};
use crate::output::writer_jsonl::jsonl_record;
use crate::output::writer_text::text_record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Jsonl,
    Csv,
}

/// Append-only report file. Each finding is encoded up front and written
/// with a single locked `write_all` + `flush`, so records never interleave
/// and an interrupted run leaves only whole lines behind.
#[derive(Debug)]
pub struct ReportSink {
    path: PathBuf,
    format: ReportFormat,
    file: Mutex<File>,
}

impl ReportSink {
    pub fn open(path: impl AsRef<Path>, format: ReportFormat) -> Result<Self, FuzzError> {
        let path = path.as_ref().to_path_buf();
        let sink_err = |source: std::io::Error| FuzzError::Sink { path: path.clone(), source };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(sink_err)?;

        if format == ReportFormat::Csv && file.metadata().map_err(sink_err)?.len() == 0 {
            file.write_all(&csv_header()?).map_err(sink_err)?;
            file.flush().map_err(sink_err)?;
        }

        Ok(Self { path, format, file: Mutex::new(file) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, finding: &Finding) -> Result<(), FuzzError> {
        let record = match self.format {
            ReportFormat::Text => text_record(finding).into_bytes(),
            ReportFormat::Jsonl => jsonl_record(finding)?.into_bytes(),
            ReportFormat::Csv => csv_record(finding)?,
        };
        let mut file = self.file.lock();
        file.write_all(&record)
            .and_then(|_| file.flush())
            .map_err(|source| FuzzError::Sink { path: self.path.clone(), source })
    }
}
