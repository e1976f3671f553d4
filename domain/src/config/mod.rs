//! Configuration value objects for the domain layer
//!
//! These are domain concepts related to configuration that are
//! used across multiple layers.

mod commit_policy;
pub mod validation;

pub use commit_policy::CommitPolicy;
pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
