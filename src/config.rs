use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

const APP_DIR_NAME: &str = "ticket-desk";
const CONFIG_FILE_NAME: &str = "config.json";
const DEFAULT_TICKETS_FILE: &str = "tickets.json";
const DEFAULT_USERS_FILE: &str = "users.json";

const CONFIG_DIR_ENV: &str = "TICKET_DESK_CONFIG_DIR";
const TICKETS_PATH_ENV: &str = "TICKET_DESK_TICKETS_PATH";
const USERS_PATH_ENV: &str = "TICKET_DESK_USERS_PATH";
const ACCOUNT_MANAGER_ENV: &str = "TICKET_DESK_ACCOUNT_MANAGER";
const ADMIN_WEBHOOK_ENV: &str = "TICKET_DESK_ADMIN_WEBHOOK";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub tickets_path: PathBuf,
    pub users_path: PathBuf,
    pub account_manager: Option<String>,
    pub admin_webhook_url: Option<String>,
}

/// Values persisted by `config init`. Every field may be left unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredConfig {
    pub tickets_path: Option<String>,
    pub users_path: Option<String>,
    pub account_manager: Option<String>,
    pub admin_webhook_url: Option<String>,
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        let dir = config_directory()?;
        let stored = StoredConfig::load()?;
        Ok(Self::resolve(stored, &dir, |key| env::var(key).ok()))
    }

    /// Environment wins over the stored file, which wins over defaults.
    fn resolve(
        stored: StoredConfig,
        dir: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let pick = |key: &str, stored: Option<String>| {
            lookup(key)
                .or(stored)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let tickets_path = pick(TICKETS_PATH_ENV, stored.tickets_path)
            .map(PathBuf::from)
            .unwrap_or_else(|| dir.join(DEFAULT_TICKETS_FILE));
        let users_path = pick(USERS_PATH_ENV, stored.users_path)
            .map(PathBuf::from)
            .unwrap_or_else(|| dir.join(DEFAULT_USERS_FILE));

        Self {
            tickets_path,
            users_path,
            account_manager: pick(ACCOUNT_MANAGER_ENV, stored.account_manager),
            admin_webhook_url: pick(ADMIN_WEBHOOK_ENV, stored.admin_webhook_url),
        }
    }
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&config_file_path()?)
    }

    fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|err| AppError::Configuration(format!("invalid config file: {err}"))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    if let Some(dir) = env::var_os(CONFIG_DIR_ENV).filter(|dir| !dir.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| {
            AppError::Configuration(format!(
                "could not determine a config directory; set {CONFIG_DIR_ENV}"
            ))
        })
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}
