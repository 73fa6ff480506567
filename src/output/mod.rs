pub mod report_sink;
pub mod reporter;
pub mod writer_csv;
pub mod writer_jsonl;
pub mod writer_text;

pub use report_sink::{ReportFormat, ReportSink};
pub use reporter::{console_line, FindingSink, Reporter};
