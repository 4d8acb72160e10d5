use crate::core::error::StoreError;
use crate::models::student::{Student, StudentId, StudentInput};
use crate::stores::StudentStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Client for the hosted database's REST interface (`/rest/v1/<table>`)
pub struct RestStore {
    client: reqwest::Client,
    table_url: String,
    api_key: String,
}

/// Error body returned by the REST interface
#[derive(Debug, Deserialize)]
struct RestErrorBody {
    message: String,
    #[serde(default)]
    details: Option<String>,
}

impl RestStore {
    pub fn new(base_url: &str, table: &str, api_key: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            table_url: format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), table),
            api_key,
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    fn id_filter(id: StudentId) -> [(&'static str, String); 1] {
        [("id", format!("eq.{}", id))]
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        check_status(response).await
    }

    /// Read rows. A body that is not a JSON array is a decode error; single
    /// rows that don't fit `Student` are skipped.
    async fn fetch(&self, request: RequestBuilder) -> Result<Vec<Student>, StoreError> {
        let rows = self
            .send(request)
            .await?
            .json::<Vec<Value>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        Ok(decode_rows(rows))
    }

    /// Write rows. A 2xx status means the write happened, so an unreadable
    /// body only shrinks the ack.
    async fn write(&self, request: RequestBuilder, action: &'static str) -> Result<Vec<Student>, StoreError> {
        let response = self.send(request).await?;

        match response.json::<Vec<Value>>().await {
            Ok(rows) => Ok(decode_rows(rows)),
            Err(e) => {
                warn!(action, error = %e, "Store accepted write but its response could not be read");
                Ok(Vec::new())
            }
        }
    }
}

fn decode_rows(rows: Vec<Value>) -> Vec<Student> {
    rows.into_iter()
        .filter_map(|row| {
            let row_id = row.get("id").cloned();
            match serde_json::from_value::<Student>(row) {
                Ok(student) => Some(student),
                Err(e) => {
                    warn!(row_id = ?row_id, error = %e, "Skipping undecodable student row");
                    None
                }
            }
        })
        .collect()
}

/// Turn an error status into `StoreError::Rejected`, keeping the store's own
/// message.
async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<RestErrorBody>(&text) {
        Ok(body) => match body.details {
            Some(details) if !details.is_empty() => format!("{} ({})", body.message, details),
            _ => body.message,
        },
        Err(_) if !text.is_empty() => text,
        Err(_) => format!("Store returned error status: {}", status),
    };

    Err(StoreError::Rejected {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl StudentStore for RestStore {
    async fn list(&self) -> Result<Vec<Student>, StoreError> {
        debug!(url = %self.table_url, "Listing students");
        self.fetch(self.client.get(&self.table_url).query(&[("select", "*")]))
            .await
    }

    async fn get(&self, id: StudentId) -> Result<Option<Student>, StoreError> {
        let rows = self
            .fetch(
                self.client
                    .get(&self.table_url)
                    .query(&[("select", "*")])
                    .query(&Self::id_filter(id)),
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn insert(&self, input: &StudentInput) -> Result<Vec<Student>, StoreError> {
        self.write(
            self.client
                .post(&self.table_url)
                .header("Prefer", "return=representation")
                .json(&[input]),
            "insert",
        )
        .await
    }

    async fn update(&self, id: StudentId, input: &StudentInput) -> Result<Vec<Student>, StoreError> {
        self.write(
            self.client
                .patch(&self.table_url)
                .query(&Self::id_filter(id))
                .header("Prefer", "return=representation")
                .json(input),
            "update",
        )
        .await
    }

    async fn delete(&self, id: StudentId) -> Result<Vec<Student>, StoreError> {
        self.write(
            self.client
                .delete(&self.table_url)
                .query(&Self::id_filter(id))
                .header("Prefer", "return=representation"),
            "delete",
        )
        .await
    }
}
