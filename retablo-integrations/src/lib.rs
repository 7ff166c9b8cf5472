//! Integrations with external services and storage for Retablo
//!
//! Each integration sits behind a feature flag; both are enabled by default.

#[cfg(feature = "csv")]
pub mod csv;
#[cfg(feature = "openai")]
pub mod openai;
