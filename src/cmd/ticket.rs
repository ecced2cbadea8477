use chrono::{DateTime, Utc};
use clap::Args;

use crate::context::AppContext;
use crate::domain::ticket::{Priority, Ticket, TicketId, TicketRequest};
use crate::domain::user::User;
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// Short summary of the problem.
    #[arg(short, long)]
    pub title: Option<String>,
    /// Full description of the problem.
    #[arg(short, long)]
    pub description: Option<String>,
    /// Username the ticket is assigned to.
    #[arg(short, long = "assign-to")]
    pub assign_to: Option<String>,
    /// Requested priority (low, medium, high).
    #[arg(short, long, default_value = "low", value_parser = parse_priority)]
    pub priority: Priority,
    /// When the problem was reported, as RFC 3339. Defaults to now.
    #[arg(long, value_parser = parse_timestamp)]
    pub created_at: Option<DateTime<Utc>>,
    /// Bill the ticket and attach an account manager.
    #[arg(long)]
    pub paying: bool,
}

#[derive(Args, Debug, Clone)]
pub struct AssignArgs {
    /// Id of the ticket to reassign.
    pub id: TicketId,
    /// Username of the new assignee.
    pub username: String,
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Id of the ticket to print.
    pub id: TicketId,
}

pub async fn create(ctx: &AppContext, args: CreateArgs) -> AppResult<TicketId> {
    let request = TicketRequest {
        title: args.title,
        description: args.description,
        priority: args.priority,
        assigned_to: args.assign_to,
        created_at: args.created_at.unwrap_or_else(Utc::now),
        paying_customer: args.paying,
    };
    ctx.tickets.create_ticket(request).await
}

pub async fn assign(ctx: &AppContext, args: AssignArgs) -> AppResult<User> {
    ctx.tickets.assign_ticket(args.id, &args.username).await
}

pub async fn show(ctx: &AppContext, args: ShowArgs) -> AppResult<Ticket> {
    ctx.tickets.get_ticket(args.id).await
}

fn parse_priority(value: &str) -> Result<Priority, String> {
    Priority::from_str(value)
        .ok_or_else(|| format!("unknown priority '{value}' (expected low, medium or high)"))
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|err| format!("invalid RFC 3339 timestamp '{value}': {err}"))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn parses_priority_argument() {
        assert_eq!(parse_priority("Medium"), Ok(Priority::Medium));
        assert!(parse_priority("p1").is_err());
    }

    #[test]
    fn parses_offset_timestamps_as_utc() {
        let parsed = parse_timestamp("2024-03-01T10:00:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap());
        assert!(parse_timestamp("yesterday").is_err());
    }
}
