//! Execution domain module.
//!
//! Everything needed to "run" code through a simulation service lives here.
//!
//! # Module Structure
//!
//! - `mode`: execution mode and the per-run request (`ExecutionMode`, `RunRequest`)
//! - `transcript`: the simulated terminal record (`Transcript`, `TranscriptEntry`)
//! - `decoder`: control-marker decoding of raw responses (`ResponseDecoder`, `MarkerDecoder`)
//! - `client`: the simulation service boundary (`SimulationClient`)
//! - `state`: UI flags and snapshots (`ExecutionFlags`, `InteractiveState`, `ExecutionSnapshot`)
//! - `orchestrator`: the state machine that ties it together (`ExecutionOrchestrator`)

mod client;
mod decoder;
mod mode;
mod orchestrator;
mod state;
mod transcript;


pub use client::{SimulationClient, StartedSession};
pub use decoder::{
    DecodedResponse, EXECUTION_COMPLETE_MARKER, EXECUTION_ERROR_MARKER, MarkerDecoder,
    NEEDS_INPUT_MARKER, PROGRAM_FINISHED_ANNOTATION, ResponseDecoder,
};
pub use mode::{ExecutionMode, RunRequest};
pub use orchestrator::{BLANK_CODE_MESSAGE, ExecutionOrchestrator};
pub use state::{ExecutionFlags, ExecutionSnapshot, InteractiveState};
pub use transcript::{EntryKind, Transcript, TranscriptEntry};
