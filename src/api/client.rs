use std::time::Duration;

use reqwest::{Client, Response, StatusCode, multipart};
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::types::{ErrorBody, SubmitResponse, SyncResponse, TextRequest, TriggerResponse};
use crate::job::{JobId, StatusSnapshot};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// HTTP client for the unified call-analysis backend.
///
/// One method per backend operation; no retries here — bounded retry is
/// the poller's job, and submissions are not idempotent-safe.
pub struct AnalysisClient {
    client: Client,
    base_url: String,
}

impl AnalysisClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string())
    }

    /// Create a client pointing at a custom base URL (useful for testing).
    pub fn with_base_url(base_url: String) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /text` — create a job from a transcript. Text jobs enter the
    /// lifecycle already TRANSCRIBED.
    pub async fn submit_text(&self, text: &str) -> Result<SubmitResponse, ApiError> {
        let response = self
            .client
            .post(format!("{}/text", self.base_url))
            .json(&TextRequest { text })
            .send()
            .await?;
        Self::decode(response).await
    }

    /// `POST /upload` — create a job from an audio recording. The file is
    /// sent as the `file` part of a multipart form.
    pub async fn submit_audio(
        &self,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<SubmitResponse, ApiError> {
        let part = multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// `GET /status/{id}` — fetch the current snapshot of a job.
    pub async fn get_status(&self, id: &JobId) -> Result<StatusSnapshot, ApiError> {
        let response = self
            .client
            .get(format!("{}/status/{}", self.base_url, id))
            .send()
            .await?;
        Self::decode(response).await
    }

    /// `POST /process/{id}` — ask the backend to start analysis on a
    /// transcribed job.
    pub async fn trigger(&self, id: &JobId) -> Result<TriggerResponse, ApiError> {
        let response = self
            .client
            .post(format!("{}/process/{}", self.base_url, id))
            .send()
            .await?;
        Self::decode(response).await
    }

    /// `POST /analyze/text` — synchronous flow: submit and receive a
    /// terminal snapshot in one call.
    pub async fn analyze_text_sync(&self, text: &str) -> Result<SyncResponse, ApiError> {
        let response = self
            .client
            .post(format!("{}/analyze/text", self.base_url))
            .json(&TextRequest { text })
            .send()
            .await?;
        Self::decode(response).await
    }

    /// `POST /analyze/audio` — synchronous flow for an audio recording.
    pub async fn analyze_audio_sync(
        &self,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<SyncResponse, ApiError> {
        let part = multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/analyze/audio", self.base_url))
            .multipart(form)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Shared response handling: 404 becomes [`ApiError::NotFound`], other
    /// error statuses become [`ApiError::Status`] carrying the body's
    /// `detail` field when present, success bodies are decoded as JSON.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            let detail = Self::read_detail(response).await;
            return Err(ApiError::NotFound(detail));
        }

        if !status.is_success() {
            let message = Self::read_detail(response).await;
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }

    async fn read_detail(response: Response) -> String {
        let text = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorBody>(&text) {
            Ok(ErrorBody { detail: Some(detail) }) => detail,
            _ if !text.is_empty() => text,
            _ => "unknown error".to_string(),
        }
    }
}

impl Default for AnalysisClient {
    fn default() -> Self {
        Self::new()
    }
}
