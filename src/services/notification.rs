use async_trait::async_trait;

use crate::error::AppResult;

#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send_admin_alert(&self, title: &str, assigned_to: &str) -> AppResult<()>;
}
