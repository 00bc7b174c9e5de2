//! Google Sheets logbook.
//!
//! Appends each row with the Sheets v4 `values:append` endpoint:
//!
//! ```text
//! POST {base}/spreadsheets/{id}/values/{range}:append
//!      ?valueInputOption=USER_ENTERED&insertDataOption=INSERT_ROWS
//! Authorization: Bearer {access_token}
//! {"values": [[timestamp, name, role, text]]}
//! ```

use async_trait::async_trait;
use mathrelax_config::SheetsConfig;
use mathrelax_core::error::LogbookError;
use mathrelax_core::logbook::{LogRow, Logbook};
use tracing::debug;

/// Appends rows to one range of one spreadsheet.
pub struct SheetsLogbook {
    append_url: reqwest::Url,
    access_token: String,
    client: reqwest::Client,
}

impl SheetsLogbook {
    /// Create a logbook for `spreadsheet_id`, appending below `range`.
    ///
    /// The range is percent-encoded as one path segment, so sheet names
    /// with spaces, `#`, `?` or `/` address the right tab.
    pub fn new(
        base_url: &str,
        spreadsheet_id: &str,
        range: &str,
        access_token: impl Into<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, LogbookError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LogbookError::NotConfigured(format!("HTTP client: {e}")))?;

        let mut append_url = reqwest::Url::parse(base_url)
            .map_err(|e| LogbookError::NotConfigured(format!("sheets.api_url {base_url}: {e}")))?;
        let range_segment = format!("{range}:append");
        append_url
            .path_segments_mut()
            .map_err(|()| LogbookError::NotConfigured(format!("sheets.api_url {base_url} cannot take a path")))?
            .pop_if_empty()
            .extend(["spreadsheets", spreadsheet_id, "values", range_segment.as_str()]);
        append_url
            .query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED")
            .append_pair("insertDataOption", "INSERT_ROWS");

        Ok(Self {
            append_url,
            access_token: access_token.into(),
            client,
        })
    }

    /// Create a logbook from the `[sheets]` config section.
    pub fn from_config(config: &SheetsConfig) -> Result<Self, LogbookError> {
        let token = config
            .access_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| LogbookError::NotConfigured("sheets.access_token is not set".into()))?;

        Self::new(
            &config.api_url,
            &config.spreadsheet_id,
            &config.range,
            token,
            std::time::Duration::from_secs(config.timeout_secs),
        )
    }
}

#[async_trait]
impl Logbook for SheetsLogbook {
    fn name(&self) -> &str {
        "sheets"
    }

    async fn append(&self, row: LogRow) -> Result<(), LogbookError> {
        let body = serde_json::json!({ "values": [row.cells()] });

        let response = self
            .client
            .post(self.append_url.clone())
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| LogbookError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LogbookError::Rejected {
                status_code: status.as_u16(),
                message,
            });
        }

        debug!(speaker = %row.speaker, "Row appended to spreadsheet");
        Ok(())
    }
}
