//! Simulation service clients for simrun.
//!
//! - `gemini_client`: [`GeminiSimulationClient`], the Gemini REST implementation
//!   of [`SimulationClient`](simrun_core::execution::SimulationClient)
//! - `prompts`: system instructions defining the marker protocol

pub mod gemini_client;
pub mod prompts;

pub use gemini_client::{GeminiChat, GeminiSimulationClient};
