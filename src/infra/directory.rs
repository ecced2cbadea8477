use std::fs;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::user::User;
use crate::error::{AppError, AppResult};
use crate::services::UserDirectory;

#[derive(Debug, Default, Deserialize)]
struct DirectoryFile {
    #[serde(default)]
    users: Vec<User>,
    account_manager: Option<String>,
}

/// User directory read once from a JSON file of known users.
pub struct FileUserDirectory {
    users: Vec<User>,
    account_manager: Option<String>,
}

impl FileUserDirectory {
    pub fn load(path: &Path, account_manager: Option<String>) -> AppResult<Self> {
        let file = match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str::<DirectoryFile>(&contents).map_err(|err| {
                AppError::Configuration(format!("invalid users file {}: {err}", path.display()))
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "users file not found, directory is empty");
                DirectoryFile::default()
            }
            Err(err) => return Err(AppError::Io(err)),
        };

        Ok(Self {
            users: file.users,
            account_manager: account_manager.or(file.account_manager),
        })
    }

    fn find(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|user| user.username == username)
    }
}

#[async_trait]
impl UserDirectory for FileUserDirectory {
    async fn get_user(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self.find(username).cloned())
    }

    async fn get_account_manager(&self) -> AppResult<User> {
        let username = self
            .account_manager
            .as_deref()
            .ok_or_else(|| AppError::Configuration("account manager not configured".to_string()))?;
        self.find(username).cloned().ok_or_else(|| {
            AppError::Configuration(format!(
                "account manager {username} is not in the users file"
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const USERS: &str = r#"{
        "users": [
            { "username": "alee", "first_name": "Ann", "last_name": "Lee" },
            { "username": "mgr", "first_name": "Max", "last_name": "Grant" }
        ],
        "account_manager": "mgr"
    }"#;

    fn write_users(contents: &str) -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.json");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn resolves_known_users() {
        let (_dir, path) = write_users(USERS);
        let directory = FileUserDirectory::load(&path, None).unwrap();

        let user = directory.get_user("alee").await.unwrap().unwrap();
        assert_eq!(user.display_name(), "Ann Lee");
        assert!(directory.get_user("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn returns_file_account_manager() {
        let (_dir, path) = write_users(USERS);
        let directory = FileUserDirectory::load(&path, None).unwrap();
        let manager = directory.get_account_manager().await.unwrap();
        assert_eq!(manager.username, "mgr");
    }

    #[tokio::test]
    async fn configured_account_manager_wins() {
        let (_dir, path) = write_users(USERS);
        let directory = FileUserDirectory::load(&path, Some("alee".to_string())).unwrap();
        let manager = directory.get_account_manager().await.unwrap();
        assert_eq!(manager.username, "alee");
    }

    #[tokio::test]
    async fn missing_file_is_an_empty_directory() {
        let dir = TempDir::new().unwrap();
        let directory = FileUserDirectory::load(&dir.path().join("absent.json"), None).unwrap();
        assert!(directory.get_user("alee").await.unwrap().is_none());
        let err = directory.get_account_manager().await.unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[tokio::test]
    async fn account_manager_outside_users_file_is_a_configuration_error() {
        let (_dir, path) = write_users(USERS);
        let directory = FileUserDirectory::load(&path, Some("ghost".to_string())).unwrap();
        let err = directory.get_account_manager().await.unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn rejects_malformed_file() {
        let (_dir, path) = write_users("{ users: }");
        assert!(matches!(
            FileUserDirectory::load(&path, None),
            Err(AppError::Configuration(_))
        ));
    }
}
