use crate::error::FuzzError;
use crate::filter::Finding;

/// One JSON object per line: `{"label","url","status","size"}`.
pub fn jsonl_record(finding: &Finding) -> Result<String, FuzzError> {
    let mut line = serde_json::to_string(finding).map_err(|e| FuzzError::Record(e.to_string()))?;
    // serde_json::to_string doesn't include newline; add it
    line.push('\n');
    Ok(line)
}
