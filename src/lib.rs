pub mod compose;
pub mod config;
pub mod error;
pub mod filter;
pub mod http_client;
pub mod lifecycle;
pub mod output;
pub mod probe;
pub mod scheduler;
pub mod wordlist;

pub use crate::compose::{BaseTarget, Candidate, Composer};
pub use crate::config::{HttpMethod, Mode, RunConfig};
pub use crate::error::{FuzzError, ProbeError};
pub use crate::filter::{Classifier, Finding, StatusPolicy};
pub use crate::scheduler::{RunSummary, Scheduler};
