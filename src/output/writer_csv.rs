use csv::Writer;

use crate::error::FuzzError;
use crate::filter::Finding;

const HEADER: [&str; 4] = ["label", "url", "status", "size"];

fn encode<I, T>(fields: I) -> Result<Vec<u8>, FuzzError>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut w = Writer::from_writer(Vec::new());
    w.write_record(fields).map_err(|e| FuzzError::Record(e.to_string()))?;
    w.into_inner().map_err(|e| FuzzError::Record(e.to_string()))
}

pub fn csv_header() -> Result<Vec<u8>, FuzzError> {
    encode(HEADER)
}

pub fn csv_record(finding: &Finding) -> Result<Vec<u8>, FuzzError> {
    encode([
        finding.label.clone(),
        finding.url.clone(),
        finding.status.to_string(),
        finding.size.to_string(),
    ])
}
