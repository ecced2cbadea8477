use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::domain::ticket::{Priority, Ticket, TicketId, TicketRequest};
use crate::domain::user::User;
use crate::error::{AppError, AppResult};
use crate::services::{NotificationSender, TicketStore, UserDirectory};

const MAGIC_WORDS: [&str; 3] = ["Crash", "Important", "Failure"];
const PAYING_PRICE_HIGH: u32 = 100;
const PAYING_PRICE_STANDARD: u32 = 50;

#[derive(Clone)]
pub struct TicketService {
    users: Arc<dyn UserDirectory>,
    notifier: Arc<dyn NotificationSender>,
    tickets: Arc<dyn TicketStore>,
}

impl TicketService {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        notifier: Arc<dyn NotificationSender>,
        tickets: Arc<dyn TicketStore>,
    ) -> Self {
        Self {
            users,
            notifier,
            tickets,
        }
    }

    pub async fn create_ticket(&self, request: TicketRequest) -> AppResult<TicketId> {
        let (title, description) =
            validate_text(request.title.as_deref(), request.description.as_deref())?;
        let user = self.resolve_user(request.assigned_to.as_deref()).await?;

        let priority = escalate_priority(request.priority, title, request.created_at, Utc::now());
        if priority != request.priority {
            debug!(
                from = request.priority.as_str(),
                to = priority.as_str(),
                "escalated ticket priority"
            );
        }

        if priority == Priority::High {
            self.notifier
                .send_admin_alert(title, &user.username)
                .await?;
        }

        let (price_dollars, account_manager) = if request.paying_customer {
            let manager = self.users.get_account_manager().await?;
            (price_for(priority), Some(manager))
        } else {
            (0, None)
        };

        let ticket = Ticket {
            id: 0,
            title: title.to_string(),
            description: description.to_string(),
            assigned_user: user,
            priority,
            created_at: request.created_at,
            price_dollars,
            account_manager,
        };

        let id = self.tickets.create(ticket).await?;
        info!(ticket_id = id, priority = priority.as_str(), "ticket created");
        Ok(id)
    }

    pub async fn assign_ticket(&self, id: TicketId, username: &str) -> AppResult<User> {
        let user = self.resolve_user(Some(username)).await?;
        let mut ticket = self.get_ticket(id).await?;

        ticket.assigned_user = user.clone();
        self.tickets.update(ticket).await?;

        info!(ticket_id = id, username = %user.username, "ticket assigned");
        Ok(user)
    }

    pub async fn get_ticket(&self, id: TicketId) -> AppResult<Ticket> {
        self.tickets
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::Application(format!("No ticket found for id {id}")))
    }

    async fn resolve_user(&self, username: Option<&str>) -> AppResult<User> {
        let user = match username {
            Some(name) => self.users.get_user(name).await?,
            None => None,
        };
        user.ok_or_else(|| {
            AppError::UnknownUser(format!("User {} not found", username.unwrap_or_default()))
        })
    }
}

fn validate_text<'a>(
    title: Option<&'a str>,
    description: Option<&'a str>,
) -> AppResult<(&'a str, &'a str)> {
    match (title, description) {
        (Some(title), Some(description)) if !title.is_empty() && !description.is_empty() => {
            Ok((title, description))
        }
        _ => Err(AppError::InvalidTicket(
            "title or description were empty".to_string(),
        )),
    }
}

/// Raises `priority` by at most one level when the ticket is older than an
/// hour at `now` or its title carries a magic word.
pub fn escalate_priority(
    priority: Priority,
    title: &str,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Priority {
    let stale = created_at < now - Duration::hours(1);
    let flagged = MAGIC_WORDS.iter().any(|word| title.contains(word));
    if stale || flagged {
        priority.escalated()
    } else {
        priority
    }
}

fn price_for(priority: Priority) -> u32 {
    match priority {
        Priority::High => PAYING_PRICE_HIGH,
        Priority::Low | Priority::Medium => PAYING_PRICE_STANDARD,
    }
}
