use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::compose::BaseTarget;
use crate::error::FuzzError;
use crate::filter::extension::ExtensionFilter;
use crate::filter::status_policy::StatusPolicy;
use crate::lifecycle::ShutdownPolicy;
use crate::output::ReportFormat;

/// How a wordlist line turns into a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// `http://host/base/` + `word`
    #[default]
    AppendPath,
    /// `word.host` (or replace the existing leftmost label)
    SubdomainSubstitute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

/// Immutable settings for one run. Built once by the CLI layer and shared
/// read-only by every component.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub target: String,
    pub wordlist: PathBuf,
    pub concurrency: usize,
    pub delay: Duration,
    /// `None` means the run is not time-boxed.
    pub deadline: Option<Duration>,
    pub mode: Mode,
    /// Case-sensitive suffixes without the leading dot.
    pub extensions: Option<BTreeSet<String>>,
    pub excluded_status: BTreeSet<u16>,
    /// Body length that marks a placeholder page. `None` disables the check.
    pub exclude_length: Option<u64>,
    pub output: Option<PathBuf>,
    pub format: ReportFormat,
    pub method: HttpMethod,
    pub follow_redirects: bool,
    pub timeout: Duration,
    pub shutdown: ShutdownPolicy,
    pub color: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            target: String::new(),
            wordlist: PathBuf::new(),
            concurrency: 10,
            delay: Duration::ZERO,
            deadline: None,
            mode: Mode::AppendPath,
            extensions: None,
            excluded_status: BTreeSet::new(),
            exclude_length: None,
            output: None,
            format: ReportFormat::Text,
            method: HttpMethod::Get,
            follow_redirects: false,
            timeout: Duration::from_secs(10),
            shutdown: ShutdownPolicy::Abort,
            color: true,
        }
    }
}

impl RunConfig {
    /// Check everything that can be checked before the first probe.
    /// Returns the parsed base target so callers don't parse it twice.
    pub fn validate(&self) -> Result<BaseTarget, FuzzError> {
        if self.concurrency == 0 {
            return Err(FuzzError::InvalidConfig("concurrency must be at least 1".into()));
        }
        if self.timeout.is_zero() {
            return Err(FuzzError::InvalidConfig("request timeout must be positive".into()));
        }
        if let Some(exts) = &self.extensions {
            if exts.is_empty() {
                return Err(FuzzError::InvalidConfig("extension list is empty".into()));
            }
        }
        let base = BaseTarget::parse(&self.target)?;
        if self.mode == Mode::SubdomainSubstitute && base.domain().is_none() {
            return Err(FuzzError::NoSubdomainHost(self.target.clone()));
        }
        Ok(base)
    }

    pub fn status_policy(&self) -> StatusPolicy {
        StatusPolicy::with_exclusions(&self.excluded_status)
    }

    pub fn extension_filter(&self) -> Option<ExtensionFilter> {
        self.extensions
            .as_ref()
            .map(|exts| ExtensionFilter::new(exts.iter().cloned()))
    }
}
