use async_trait::async_trait;

use super::EventAggregate;
use crate::shared::{DomainError, EventId};

/// Read side of the per-event aggregate cache.
#[async_trait]
pub trait EventAggregateRepository: Send + Sync {
    async fn find_by_event(&self, event_id: &EventId)
        -> Result<Option<EventAggregate>, DomainError>;
}
