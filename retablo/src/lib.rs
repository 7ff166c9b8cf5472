//! # Retablo
//!
//! Retablo asks a large language model for a short description of an image, given nothing but a
//! title. Every description it produces is saved, and the saved history is sent along with every
//! next prompt as examples, so descriptions converge on a consistent voice over time.
//!
//! The pieces, leaves first:
//!
//! - [`ExampleStore`] holds the saved records and appends new ones through a
//!   [`RecordStore`][retablo_core::RecordStore]
//! - [`describer`] composes the prompt from a directive, the examples and the title, and asks a
//!   [`SimplePrompt`][retablo_core::SimplePrompt] for the description
//! - [`controller`] is the state machine behind the interactive session
//! - [`terminal`] drives the controller from stdin
//!
//! ## Example
//!
//! ```no_run
//! # use retablo::{ExampleStore, describer::Describer};
//! # use retablo_integrations::{csv::CsvStore, openai::OpenAI};
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let store = ExampleStore::load(CsvStore::new("imagenes/nuevas_descripciones.csv")).await?;
//! let openai = OpenAI::builder()
//!     .default_prompt_model("gpt-4-turbo")
//!     .build()?;
//!
//! let describer = Describer::new(openai);
//! let description = describer
//!     .describe(&store.combined_examples(), "Danza de los Saqras")
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod describer;
pub mod errors;
mod examples;
pub mod image;
pub mod persist;
pub mod questions;
pub mod terminal;

pub use examples::ExampleStore;

