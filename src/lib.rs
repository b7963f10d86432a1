//! callsight — client-side orchestration for dual-engine call analysis.
//!
//! Submits a customer-service call (transcript or audio) to a remote
//! backend, drives the asynchronous job protocol (submit → poll
//! transcription → trigger → poll analysis → fetch), and normalizes the
//! two engines' loosely-typed payloads into one canonical comparison.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod job;
pub mod normalize;
pub mod orchestrator;
pub mod poller;
pub mod ui;

pub use api::{AnalysisClient, ApiError};
pub use config::CallsightConfig;
pub use error::OrchestrationError;
pub use job::{JobId, JobStatus, Phase, StatusSnapshot};
pub use normalize::{ComparisonResult, EngineError, EngineResult, EngineSlot};
pub use orchestrator::{CallReport, Orchestrator};
pub use poller::{CancelToken, PollConfig, StatusPoller};
