use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::User;

pub type TicketId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }

    /// One level up; `High` stays `High`.
    pub fn escalated(self) -> Self {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium | Priority::High => Priority::High,
        }
    }
}

/// Caller input for ticket creation. Missing text fields are rejected by the
/// workflow rather than by the type.
#[derive(Debug, Clone)]
pub struct TicketRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Priority,
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub paying_customer: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub title: String,
    pub description: String,
    pub assigned_user: User,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub price_dollars: u32,
    pub account_manager: Option<User>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escalates_one_level_and_caps_at_high() {
        assert_eq!(Priority::Low.escalated(), Priority::Medium);
        assert_eq!(Priority::Medium.escalated(), Priority::High);
        assert_eq!(Priority::High.escalated(), Priority::High);
    }

    #[test]
    fn parses_priority() {
        assert_eq!(Priority::from_str("low"), Some(Priority::Low));
        assert_eq!(Priority::from_str(" HIGH "), Some(Priority::High));
        assert_eq!(Priority::from_str("urgent"), None);
    }

    #[test]
    fn serializes_priority_lowercase() {
        let json = serde_json::to_string(&Priority::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
    }
}
