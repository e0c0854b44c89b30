use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use trainer_core::model::VocabItem;

use crate::error::ScoringError;
use crate::scoring::{AnswerRequest, ScoreboardRow, ScoringService, Verdict};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug)]
pub struct ScoringConfig {
    pub base_url: String,
}

impl ScoringConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Read the service address from `TRAINER_API_URL`, falling back to the
    /// local development default.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var("TRAINER_API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        Self { base_url }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

//
// ─── HTTP CLIENT ───────────────────────────────────────────────────────────────
//

/// `ScoringService` implementation over the service's JSON/HTTP endpoints.
///
/// Requests are never retried here; transport failures propagate so the
/// caller can surface a recoverable error state.
#[derive(Clone)]
pub struct HttpScoringClient {
    client: Client,
    config: ScoringConfig,
}

impl HttpScoringClient {
    #[must_use]
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ScoringConfig::from_env())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn fetch_items(&self, url: String) -> Result<Vec<VocabItem>, ScoringError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ScoringError::HttpStatus(response.status()));
        }
        let body: ItemsResponse = response.json().await?;
        Ok(body.items)
    }
}

#[async_trait]
impl ScoringService for HttpScoringClient {
    async fn init(&self) -> Result<(), ScoringError> {
        let response = self.client.post(self.url("/api/init")).send().await?;
        if !response.status().is_success() {
            return Err(ScoringError::HttpStatus(response.status()));
        }
        // The ack body is opaque; only the status matters.
        Ok(())
    }

    async fn diagnostic_batch(&self) -> Result<Vec<VocabItem>, ScoringError> {
        self.fetch_items(self.url("/api/diagnostic")).await
    }

    async fn adaptive_batch(&self, n: usize) -> Result<Vec<VocabItem>, ScoringError> {
        self.fetch_items(format!("{}?n={n}", self.url("/api/adaptive")))
            .await
    }

    async fn judge(&self, request: AnswerRequest) -> Result<Verdict, ScoringError> {
        let response = self
            .client
            .post(self.url("/api/answer"))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body: JudgedWire = response.json().await?;
            return Ok(Verdict::Judged(body.into_judgment()?));
        }

        // The service reports semantic errors as 4xx with an `error` body;
        // anything else is a protocol failure.
        if status.is_client_error() {
            let raw = response.text().await?;
            if let Ok(body) = serde_json::from_str::<ErrorWire>(&raw) {
                return Ok(Verdict::Rejected(body.error));
            }
        }
        Err(ScoringError::HttpStatus(status))
    }

    async fn scoreboard(&self) -> Result<Vec<ScoreboardRow>, ScoringError> {
        let response = self.client.get(self.url("/api/progress")).send().await?;
        if !response.status().is_success() {
            return Err(ScoringError::HttpStatus(response.status()));
        }
        let body: ProgressResponse = response.json().await?;
        Ok(body.rows)
    }

    async fn export_csv(&self) -> Result<String, ScoringError> {
        let response = self.client.get(self.url("/api/export")).send().await?;
        if !response.status().is_success() {
            return Err(ScoringError::HttpStatus(response.status()));
        }
        Ok(response.text().await?)
    }
}

//
// ─── WIRE TYPES ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
struct ItemsResponse {
    items: Vec<VocabItem>,
}

#[derive(Debug, Deserialize)]
struct JudgedWire {
    correct: bool,
    correct_text: String,
    new_bucket: String,
}

impl JudgedWire {
    fn into_judgment(self) -> Result<trainer_core::model::Judgment, ScoringError> {
        let bucket = self
            .new_bucket
            .parse()
            .map_err(|_| ScoringError::MalformedResponse(format!("bucket {:?}", self.new_bucket)))?;
        Ok(trainer_core::model::Judgment::new(
            self.correct,
            self.correct_text,
            bucket,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct ErrorWire {
    error: String,
}

#[derive(Debug, Deserialize)]
struct ProgressResponse {
    rows: Vec<ScoreboardRow>,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
