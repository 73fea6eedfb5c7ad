use crate::core::constants::DEFAULT_APP_LOG_CAPACITY;
use crate::core::errors::FairshareError;
use crate::core::models::AppLog;
use crate::infrastructure::logging::LoggingService;
use async_trait::async_trait;
use log::debug;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Ring buffer of application log entries. Once `capacity` is reached the
/// oldest entry is dropped for every new one.
#[derive(Clone)]
pub struct InMemoryLogging {
    logs: Arc<RwLock<VecDeque<AppLog>>>,
    capacity: usize,
}

impl Default for InMemoryLogging {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_APP_LOG_CAPACITY)
    }
}

impl InMemoryLogging {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        InMemoryLogging {
            logs: Arc::new(RwLock::new(VecDeque::with_capacity(capacity.min(1024)))),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[async_trait]
impl LoggingService for InMemoryLogging {
    async fn log_action(
        &self,
        action: &str,
        details: serde_json::Value,
        user_id: Option<&str>,
    ) -> Result<(), FairshareError> {
        let details = serde_json::from_value(details)
            .map_err(|e| FairshareError::LoggingError(format!("Failed to serialize log details: {}", e)))?;
        let entry = AppLog {
            id: Uuid::new_v4(),
            action: action.to_string(),
            user_id: user_id.map(String::from),
            details,
            timestamp: chrono::Utc::now(),
        };

        let mut logs = self.logs.write().await;
        while logs.len() >= self.capacity {
            if let Some(dropped) = logs.pop_front() {
                debug!("App log full, dropping {} entry {}", dropped.action, dropped.id);
            }
        }
        logs.push_back(entry);
        Ok(())
    }

    async fn get_logs(&self) -> Result<Vec<AppLog>, FairshareError> {
        Ok(self.logs.read().await.iter().cloned().collect())
    }

    async fn get_user_logs(&self, user_id: &str) -> Result<Vec<AppLog>, FairshareError> {
        Ok(self
            .logs
            .read()
            .await
            .iter()
            .filter(|entry| entry.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect())
    }
}
