use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::infra::directory::FileUserDirectory;
use crate::infra::notifier::{LogNotifier, WebhookNotifier};
use crate::infra::store::JsonTicketStore;
use crate::services::NotificationSender;
use crate::workflow::ticket::TicketService;

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub tickets: TicketService,
}

impl AppContext {
    pub fn new(config: AppConfig, tickets: TicketService) -> Self {
        Self { config, tickets }
    }

    /// Wires the file-backed collaborators described by `config`.
    pub fn from_config(config: AppConfig) -> AppResult<Self> {
        debug!(
            tickets = %config.tickets_path.display(),
            users = %config.users_path.display(),
            "loading ticket desk context"
        );

        let users = Arc::new(FileUserDirectory::load(
            &config.users_path,
            config.account_manager.clone(),
        )?);

        let notifier: Arc<dyn NotificationSender> = match &config.admin_webhook_url {
            Some(url) => Arc::new(WebhookNotifier::new(url.clone())),
            None => {
                warn!("admin webhook not configured; high priority alerts go to the log only");
                Arc::new(LogNotifier)
            }
        };

        let store = Arc::new(JsonTicketStore::new(config.tickets_path.clone()));

        let tickets = TicketService::new(users, notifier, store);
        Ok(Self::new(config, tickets))
    }
}
