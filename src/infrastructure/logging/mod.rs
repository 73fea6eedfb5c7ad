pub mod in_memory;

use crate::core::errors::FairshareError;
use crate::core::models::AppLog;
use async_trait::async_trait;

/// Application action log, separate from per-group activity.
#[async_trait]
pub trait LoggingService: Send + Sync {
    async fn log_action(
        &self,
        action: &str,
        details: serde_json::Value,
        user_id: Option<&str>,
    ) -> Result<(), FairshareError>;
    /// Retained entries, oldest first.
    async fn get_logs(&self) -> Result<Vec<AppLog>, FairshareError>;
    async fn get_user_logs(&self, user_id: &str) -> Result<Vec<AppLog>, FairshareError>;
}
