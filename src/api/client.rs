use crate::core::error::ClientError;
use crate::models::api::{ErrorResponse, IdQuery};
use crate::models::student::{Student, StudentId, StudentInput};
use anyhow::{Context, Result};
use reqwest::Response;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

/// Client for the roster API (`/api/students`)
#[derive(Clone)]
pub struct RosterClient {
    client: reqwest::Client,
    endpoint: String,
}

/// Update body: the identifier plus every data field
#[derive(Serialize)]
struct UpdateBody<'a> {
    id: StudentId,
    #[serde(flatten)]
    fields: &'a StudentInput,
}

impl RosterClient {
    /// `base_url` is the service root, e.g. `http://localhost:3000`.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/students", base_url.trim_end_matches('/')),
        })
    }

    fn with_id(&self, id: StudentId) -> Result<String, ClientError> {
        let query = serde_urlencoded::to_string(IdQuery {
            id: Some(id.to_string()),
        })
        .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(format!("{}?{}", self.endpoint, query))
    }

    pub async fn list(&self) -> Result<Vec<Student>, ClientError> {
        let response = self.client.get(&self.endpoint).send().await;
        decode(response).await
    }

    pub async fn get(&self, id: StudentId) -> Result<Student, ClientError> {
        let response = self.client.get(self.with_id(id)?).send().await;
        decode(response).await
    }

    pub async fn create(&self, fields: &StudentInput) -> Result<Vec<Student>, ClientError> {
        let response = self.client.post(&self.endpoint).json(fields).send().await;
        decode(response).await
    }

    pub async fn update(
        &self,
        id: StudentId,
        fields: &StudentInput,
    ) -> Result<Vec<Student>, ClientError> {
        let response = self
            .client
            .put(&self.endpoint)
            .json(&UpdateBody { id, fields })
            .send()
            .await;
        decode(response).await
    }

    pub async fn delete(&self, id: StudentId) -> Result<Vec<Student>, ClientError> {
        let response = self.client.delete(self.with_id(id)?).send().await;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(
    response: reqwest::Result<Response>,
) -> Result<T, ClientError> {
    let response = response.map_err(|e| ClientError::Transport(e.to_string()))?;
    let status = response.status();

    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&text)
            .map(|body| body.error)
            .unwrap_or(text);
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::config::{Config, LoggingConfig, ServerConfig, StoreBackend, StoreConfig};
    use crate::core::routes::build_router;
    use crate::core::state::AppState;
    use crate::models::student::fixtures::input;
    use crate::models::student::{Cohort, Course};
    use crate::stores::memory::MemoryStore;
    use std::sync::Arc;
    use tokio::net::TcpListener;

    /// Serve the full router over a MemoryStore on an ephemeral port.
    pub(crate) async fn spawn_roster_server() -> (Arc<MemoryStore>, RosterClient) {
        let store = Arc::new(MemoryStore::new());
        let config = Config {
            server: ServerConfig {
                port: Some(1),
                unix_socket: None,
                num_threads: 1,
            },
            store: StoreConfig {
                backend: StoreBackend::Memory,
                url: String::new(),
                api_key: String::new(),
                table: "students".to_string(),
                timeout_secs: 5,
            },
            logging: LoggingConfig::default(),
        };
        let app = build_router(Arc::new(AppState::with_store(config, store.clone())));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = RosterClient::new(&format!("http://{}/", addr)).unwrap();
        (store, client)
    }

    #[test]
    fn test_roster_client_creation() {
        let client = RosterClient::new("http://localhost:3000/").unwrap();
        assert_eq!(client.endpoint, "http://localhost:3000/api/students");
        assert_eq!(
            client.with_id(StudentId(3)).unwrap(),
            "http://localhost:3000/api/students?id=3"
        );
    }

    #[test]
    fn test_update_body_serialization() {
        let fields = input("Asha", Cohort::Ay2023_2024, Course::Math);
        let value = serde_json::to_value(UpdateBody {
            id: StudentId(4),
            fields: &fields,
        })
        .unwrap();

        assert_eq!(value["id"], 4);
        assert_eq!(value["name"], "Asha");
        assert_eq!(value["dateJoined"], "2023-09-01");
    }

    #[tokio::test]
    async fn test_created_record_round_trips_through_list() {
        let (_, client) = spawn_roster_server().await;
        let before = client.list().await.unwrap();

        let fields = input("Asha", Cohort::Ay2023_2024, Course::Math);
        let ack = client.create(&fields).await.unwrap();

        let after = client.list().await.unwrap();
        assert_eq!(after.len(), before.len() + 1);

        let created = after.iter().find(|s| s.id == ack[0].id).unwrap();
        assert_eq!(created.fields, fields);
        assert_eq!(client.get(ack[0].id).await.unwrap(), *created);
    }

    #[tokio::test]
    async fn test_delete_removes_only_that_record() {
        let (_, client) = spawn_roster_server().await;
        let a = client.create(&input("A", Cohort::Ay2022_2023, Course::Math)).await.unwrap()[0].id;
        let b = client.create(&input("B", Cohort::Ay2022_2023, Course::Math)).await.unwrap()[0].id;

        client.delete(a).await.unwrap();
        let remaining: Vec<StudentId> = client.list().await.unwrap().iter().map(|s| s.id).collect();
        assert_eq!(remaining, vec![b]);

        // Unknown id: no-op, nothing unrelated removed
        let ack = client.delete(StudentId(9_999)).await.unwrap();
        assert!(ack.is_empty());
        assert_eq!(client.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_twice_is_idempotent() {
        let (_, client) = spawn_roster_server().await;
        let id = client.create(&input("A", Cohort::Ay2022_2023, Course::Math)).await.unwrap()[0].id;

        let mut fields = input("B", Cohort::Ay2024_2025, Course::English);
        fields.status = false;
        client.update(id, &fields).await.unwrap();
        let first = client.list().await.unwrap();
        client.update(id, &fields).await.unwrap();
        let second = client.list().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first[0].fields, fields);
    }

    #[tokio::test]
    async fn test_api_errors_carry_server_message() {
        let (_, client) = spawn_roster_server().await;

        match client.get(StudentId(1)).await {
            Err(ClientError::Api { status, message }) => {
                assert_eq!(status, 404);
                assert!(message.contains("not found"));
            }
            other => panic!("expected api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_id_over_http_is_bad_request() {
        let (store, client) = spawn_roster_server().await;
        client.create(&input("A", Cohort::Ay2022_2023, Course::Math)).await.unwrap();

        let response = client.client.delete(&client.endpoint).send().await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

        let body: ErrorResponse = response.json().await.unwrap();
        assert_eq!(body.error, "Missing required parameter: id");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (store, client) = spawn_roster_server().await;

        let response = client
            .client
            .post(&client.endpoint)
            .header("Content-Type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        assert!(store.is_empty());
    }
}
