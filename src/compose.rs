use url::Url;

use crate::config::Mode;
use crate::error::FuzzError;
use crate::filter::extension::ExtensionFilter;

/// One URL to probe, derived from a single wordlist line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub word: String,
    pub url: String,
    /// What gets printed. Always the raw line, whatever the mode.
    pub label: String,
}

/// Parsed base target. Bare hostnames get an `http://` scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseTarget {
    url: Url,
}

impl BaseTarget {
    pub fn parse(target: &str) -> Result<Self, FuzzError> {
        let trimmed = target.trim();
        if trimmed.is_empty() {
            return Err(FuzzError::InvalidTarget {
                target: target.to_string(),
                reason: "empty target".into(),
            });
        }
        let with_scheme = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("http://{}", trimmed)
        };
        let url = Url::parse(&with_scheme).map_err(|e| FuzzError::InvalidTarget {
            target: target.to_string(),
            reason: e.to_string(),
        })?;
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(FuzzError::InvalidTarget {
                target: target.to_string(),
                reason: "target has no host".into(),
            });
        }
        // Words are joined onto the end of the URL text.
        if url.query().is_some() || url.fragment().is_some() {
            return Err(FuzzError::InvalidTarget {
                target: target.to_string(),
                reason: "target must not carry a query or fragment".into(),
            });
        }
        Ok(Self { url })
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// DNS name of the target, `None` for IP literals.
    pub fn domain(&self) -> Option<&str> {
        self.url.domain()
    }
}

/// Maps wordlist lines to candidates for one base target.
#[derive(Debug, Clone)]
pub struct Composer {
    base: BaseTarget,
    mode: Mode,
    extensions: Option<ExtensionFilter>,
}

impl Composer {
    pub fn new(base: BaseTarget, mode: Mode, extensions: Option<ExtensionFilter>) -> Self {
        Self { base, mode, extensions }
    }

    /// `None` when the line is filtered out or cannot form a valid URL.
    pub fn compose(&self, line: &str) -> Option<Candidate> {
        if let Some(filter) = &self.extensions {
            if !filter.accepts(line) {
                return None;
            }
        }
        let url = match self.mode {
            Mode::AppendPath => self.append_path(line),
            Mode::SubdomainSubstitute => self.substitute_subdomain(line)?,
        };
        Some(Candidate {
            word: line.to_string(),
            url,
            label: line.to_string(),
        })
    }

    fn append_path(&self, line: &str) -> String {
        let word = line.strip_prefix('/').unwrap_or(line);
        let base = self.base.as_str();
        if base.ends_with('/') {
            format!("{}{}", base, word)
        } else {
            format!("{}/{}", base, word)
        }
    }

    fn substitute_subdomain(&self, line: &str) -> Option<String> {
        let host = self.base.domain()?;
        let mut labels: Vec<&str> = host.split('.').collect();
        let new_host = if labels.len() > 2 {
            labels[0] = line;
            labels.join(".")
        } else {
            format!("{}.{}", line, host)
        };
        if new_host.split('.').any(str::is_empty) {
            tracing::debug!(word = %line, "word leaves an empty host label");
            return None;
        }
        let mut url = self.base.url.clone();
        if let Err(e) = url.set_host(Some(&new_host)) {
            tracing::debug!(word = %line, error = %e, "word does not form a valid host");
            return None;
        }
        Some(url.to_string())
    }
}
