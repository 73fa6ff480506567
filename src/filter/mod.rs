pub mod classifier;
pub mod extension;
pub mod status_policy;

pub use classifier::{Classifier, Finding};
pub use extension::ExtensionFilter;
pub use status_policy::StatusPolicy;
