//! Error handling for crashguard.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.
//!
//! Containment itself is infallible toward wrapped callers: a contained call
//! yields `None`, never an error, and sink failures are swallowed.

pub mod config_error;
pub mod policy_error;

pub use config_error::ConfigError;
pub use policy_error::PolicyError;
