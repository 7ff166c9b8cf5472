#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core types and traits for Retablo
//!
//! Integrations (language models, record stores) implement the traits defined here, the
//! `retablo` crate wires them together.

pub mod errors;
pub mod prompt;
mod record;
pub mod template;
mod traits;

pub use crate::record::*;
/// All traits are available from the root
pub use crate::traits::*;

pub mod util;
