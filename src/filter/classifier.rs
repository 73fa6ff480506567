use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::compose::Candidate;
use crate::filter::status_policy::StatusPolicy;
use crate::probe::ProbeResult;

/// A candidate whose response matched the interest policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub label: String,
    pub url: String,
    pub status: u16,
    pub size: u64,
}

/// Decides whether a probe result is worth reporting.
#[derive(Debug, Clone)]
pub struct Classifier {
    policy: Arc<StatusPolicy>,
    exclude_length: Option<u64>,
}

impl Classifier {
    /// `exclude_length` of `Some(0)` is treated as unset.
    pub fn new(policy: Arc<StatusPolicy>, exclude_length: Option<u64>) -> Self {
        Self {
            policy,
            exclude_length: exclude_length.filter(|len| *len != 0),
        }
    }

    pub fn classify(&self, candidate: &Candidate, result: &ProbeResult) -> Option<Finding> {
        if !self.policy.allows(result.status) {
            return None;
        }
        // Unmeasured bodies count as empty.
        let size = result.body_length.unwrap_or(0);
        if self.exclude_length == Some(size) {
            return None;
        }
        Some(Finding {
            label: candidate.label.clone(),
            url: candidate.url.clone(),
            status: result.status,
            size,
        })
    }
}
