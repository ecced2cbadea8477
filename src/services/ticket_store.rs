use async_trait::async_trait;

use crate::domain::ticket::{Ticket, TicketId};
use crate::error::AppResult;

/// Persistence for tickets. `create` ignores the incoming `id` and returns
/// the one the store assigned.
#[async_trait]
pub trait TicketStore: Send + Sync {
    async fn create(&self, ticket: Ticket) -> AppResult<TicketId>;
    async fn get_by_id(&self, id: TicketId) -> AppResult<Option<Ticket>>;
    async fn update(&self, ticket: Ticket) -> AppResult<()>;
}
