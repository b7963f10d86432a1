pub mod client;
pub mod error;
pub mod types;

pub use client::AnalysisClient;
pub use error::ApiError;
pub use types::{SubmitResponse, SyncResponse, TextRequest, TriggerResponse};
