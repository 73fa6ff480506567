use std::collections::HashSet;

/// Allow-set of file suffixes. A line qualifies only when the text after
/// its last `.` is in the set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    allowed: HashSet<String>,
}

impl ExtensionFilter {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: extensions.into_iter().map(Into::into).collect(),
        }
    }

    /// Suffix after the last dot, or `None` when the line has no dot.
    pub fn suffix(line: &str) -> Option<&str> {
        line.rsplit_once('.').map(|(_, ext)| ext)
    }

    pub fn accepts(&self, line: &str) -> bool {
        // No dot means an empty suffix, matching a split on `.`.
        let ext = Self::suffix(line).unwrap_or("");
        self.allowed.contains(ext)
    }
}
