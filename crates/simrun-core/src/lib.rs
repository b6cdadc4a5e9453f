//! Core of simrun: a code runner whose "execution" is simulated by a
//! language model.
//!
//! Nothing here compiles or executes source code. The
//! [`ExecutionOrchestrator`](execution::ExecutionOrchestrator) drives a
//! [`SimulationClient`](execution::SimulationClient) through a multi-turn
//! dialogue, decodes its lifecycle markers and keeps the resulting terminal
//! transcript.

pub mod config;
pub mod editor;
pub mod error;
pub mod execution;
pub mod language;
pub mod secret;

pub use error::{Result, SimrunError, SimulationError};
pub use language::{LANGUAGES, Language, LanguageId};
