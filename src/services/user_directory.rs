use async_trait::async_trait;

use crate::domain::user::User;
use crate::error::AppResult;

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_user(&self, username: &str) -> AppResult<Option<User>>;
    async fn get_account_manager(&self) -> AppResult<User>;
}
