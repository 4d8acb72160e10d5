use tracing::{error, info};

use crate::core::state::AppState;

/// Probe the store once at boot and log what it holds.
///
/// A failing store does not stop the server; every request reports store
/// faults on its own.
pub async fn probe_store(state: &AppState) -> Option<usize> {
    match state.repository.list_all().await {
        Ok(students) => {
            info!(students = students.len(), "Store reachable");
            Some(students.len())
        }
        Err(e) => {
            error!(
                error = %e,
                backend = ?state.config.store.backend,
                "Store probe failed, continuing"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::models::student::fixtures::input;
    use crate::models::student::{Cohort, Course};
    use crate::stores::{memory::MemoryStore, rest::RestStore, StudentStore};
    use std::sync::Arc;
    use std::time::Duration;

    fn config() -> Config {
        Config::from_toml("[server]\nport = 3000\n[store]\nbackend = \"memory\"\n").unwrap()
    }

    #[tokio::test]
    async fn test_probe_counts_students() {
        let store = Arc::new(MemoryStore::new());
        store.insert(&input("A", Cohort::Ay2022_2023, Course::Math)).await.unwrap();
        let state = AppState::with_store(config(), store);

        assert_eq!(probe_store(&state).await, Some(1));
    }

    #[tokio::test]
    async fn test_probe_failure_is_not_fatal() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let store = RestStore::new(
            &format!("http://{}", addr),
            "students",
            "key".to_string(),
            Duration::from_secs(2),
        )
        .unwrap();
        let state = AppState::with_store(config(), Arc::new(store));

        assert_eq!(probe_store(&state).await, None);
    }
}
