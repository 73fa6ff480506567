use std::collections::BTreeSet;

/// Status codes reported when no exclusions are given.
pub const DEFAULT_ALLOWED: [u16; 7] = [200, 204, 301, 302, 307, 401, 500];

/// Effective allow-set: the default codes minus the user's exclusions.
/// Built once from configuration and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPolicy {
    allowed: BTreeSet<u16>,
}

impl Default for StatusPolicy {
    fn default() -> Self {
        Self {
            allowed: DEFAULT_ALLOWED.into_iter().collect(),
        }
    }
}

impl StatusPolicy {
    pub fn with_exclusions(excluded: &BTreeSet<u16>) -> Self {
        let mut policy = Self::default();
        policy.allowed.retain(|code| !excluded.contains(code));
        policy
    }

    pub fn allows(&self, status: u16) -> bool {
        self.allowed.contains(&status)
    }

    pub fn allowed(&self) -> impl Iterator<Item = u16> + '_ {
        self.allowed.iter().copied()
    }
}
