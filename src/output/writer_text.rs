use crate::filter::Finding;

/// Width the label column is padded to, on screen and in text reports.
pub const LABEL_WIDTH: usize = 40;

pub fn text_record(finding: &Finding) -> String {
    format!(
        "{:<width$} [Code: {}] || [Size: {}]\n",
        finding.label,
        finding.status,
        finding.size,
        width = LABEL_WIDTH
    )
}
