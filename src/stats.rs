//! Ranked-ladder stats provider client.

use std::collections::BTreeSet;

use async_trait::async_trait;
use derive_more::{Display, Error};
use lineup_core::{CharacterIdentity, PerformanceSummary};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument};

use crate::StatsConfig;

/// Batch reads against the stats provider.
///
/// Implementations return an empty list for an empty id set without
/// contacting the provider, and fail as a whole rather than returning
/// partial results.
#[async_trait]
pub trait StatsProvider: Send + Sync {
    /// Per-race 1v1 summaries of the given characters over the last `depth` days.
    async fn summaries(
        &self,
        depth: i32,
        ids: &BTreeSet<i64>,
    ) -> Result<Vec<PerformanceSummary>, StatsError>;

    /// Identities of the given characters.
    async fn characters(&self, ids: &BTreeSet<i64>) -> Result<Vec<CharacterIdentity>, StatsError>;
}

/// HTTP client for the nephest ladder API.
#[derive(Debug, Clone)]
pub struct PulseClient {
    base_url: String,
    client: reqwest::Client,
}

impl PulseClient {
    /// Builds a client with the configured base URL and timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError`] if the HTTP client cannot be built.
    #[instrument(skip(config), fields(base_url = %config.base_url()))]
    pub fn new(config: &StatsConfig) -> Result<Self, StatsError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.read_timeout())
            .build()
            .map_err(|e| StatsError::new(format!("Failed to build HTTP client: {}", e)))?;

        info!("Stats client ready");
        Ok(Self {
            base_url: config.base_url().trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, StatsError> {
        debug!(url = %url, "Sending stats request");
        let response = self.client.get(url).send().await.map_err(|e| {
            error!(error = ?e, url = %url, "Stats request failed");
            StatsError::new(format!("Stats request failed: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, url = %url, "Stats provider error");
            return Err(StatsError::new(format!("Stats provider returned {}", status)));
        }

        response.json::<T>().await.map_err(|e| {
            error!(error = ?e, url = %url, "Failed to parse stats response");
            StatsError::new(format!("Failed to parse stats response: {}", e))
        })
    }
}

fn join_ids(ids: &BTreeSet<i64>) -> String {
    ids.iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[async_trait]
impl StatsProvider for PulseClient {
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn summaries(
        &self,
        depth: i32,
        ids: &BTreeSet<i64>,
    ) -> Result<Vec<PerformanceSummary>, StatsError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let url = format!(
            "{}/character/{}/summary/1v1/{}",
            self.base_url,
            join_ids(ids),
            depth
        );
        let summaries: Vec<PerformanceSummary> = self.get_json(&url).await?;
        info!(received = summaries.len(), "Summaries fetched");
        Ok(summaries)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn characters(&self, ids: &BTreeSet<i64>) -> Result<Vec<CharacterIdentity>, StatsError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let url = format!("{}/character/{}", self.base_url, join_ids(ids));
        let characters: Vec<CharacterIdentity> = self.get_json(&url).await?;
        info!(received = characters.len(), "Characters fetched");
        Ok(characters)
    }
}

/// Stats provider failure: transport, timeout, status or body.
#[derive(Debug, Clone, Display, Error)]
#[display("Stats error: {} at {}:{}", message, file, line)]
pub struct StatsError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StatsError {
    /// Creates a new stats error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
