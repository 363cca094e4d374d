use crate::core::snapshot::SnapshotLayout;
use crate::domain::model::LeaderboardRow;
use crate::domain::ports::SnapshotPublisher;
use crate::utils::error::{LeaderboardError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com";
pub const DEFAULT_RANGE: &str = "Sheet1";

#[derive(Debug, Clone)]
pub struct SheetTarget {
    pub api_base: String,
    pub spreadsheet_id: String,
    pub range: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange<'a> {
    range: &'a str,
    major_dimension: &'static str,
    values: Vec<Vec<Value>>,
}

/// Spreadsheet sink speaking the Sheets `values` REST API.
///
/// Publishing clears the range and then writes the full grid, so the sheet
/// always holds exactly one snapshot.
pub struct SheetsPublisher {
    client: Client,
    target: SheetTarget,
    access_token: String,
    layout: SnapshotLayout,
}

impl SheetsPublisher {
    pub fn new(
        client: Client,
        target: SheetTarget,
        access_token: impl Into<String>,
        layout: SnapshotLayout,
    ) -> Self {
        Self {
            client,
            target,
            access_token: access_token.into(),
            layout,
        }
    }

    fn values_url(&self, suffix: &str) -> Result<Url> {
        let mut url = Url::parse(&self.target.api_base).map_err(|e| {
            LeaderboardError::config(format!("invalid sheets api base {}: {}", self.target.api_base, e))
        })?;
        let range = format!("{}{}", self.target.range, suffix);
        url.path_segments_mut()
            .map_err(|_| LeaderboardError::config("sheets api base cannot be a base URL"))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.target.spreadsheet_id.as_str(),
                "values",
                range.as_str(),
            ]);
        Ok(url)
    }

    /// Counts go out as numbers so the sheet can sort on them.
    fn cell(text: String) -> Value {
        match text.parse::<u64>() {
            Ok(n) => Value::from(n),
            Err(_) => Value::String(text),
        }
    }

    async fn check(step: &str, response: std::result::Result<Response, reqwest::Error>) -> Result<()> {
        let response = response
            .map_err(|e| LeaderboardError::publish_failure(format!("{} request failed: {}", step, e)))?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        let body: String = body.chars().take(200).collect();
        Err(LeaderboardError::publish_failure(format!(
            "{} rejected with {}: {}",
            step, status, body
        )))
    }
}

#[async_trait]
impl SnapshotPublisher for SheetsPublisher {
    async fn publish(&self, header: &str, rows: &[LeaderboardRow]) -> Result<()> {
        let values: Vec<Vec<Value>> = self
            .layout
            .grid(header, rows)
            .into_iter()
            .map(|line| line.into_iter().map(Self::cell).collect())
            .collect();
        let body = ValueRange {
            range: &self.target.range,
            major_dimension: "ROWS",
            values,
        };

        let clear_url = self.values_url(":clear")?;
        tracing::debug!("Clearing sheet range: {}", clear_url);
        let response = self
            .client
            .post(clear_url)
            .bearer_auth(&self.access_token)
            .json(&serde_json::json!({}))
            .send()
            .await;
        Self::check("clear", response).await?;

        let mut update_url = self.values_url("")?;
        update_url
            .query_pairs_mut()
            .append_pair("valueInputOption", "RAW");
        tracing::debug!("Writing {} sheet rows: {}", body.values.len(), update_url);
        let response = self
            .client
            .put(update_url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await;
        Self::check("update", response).await
    }

    fn destination(&self) -> String {
        format!(
            "spreadsheet {} ({})",
            self.target.spreadsheet_id, self.target.range
        )
    }
}
