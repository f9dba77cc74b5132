use async_trait::async_trait;
use std::fmt::Display;

use super::DomainError;

/// A record with a stable identity that can be stored through [`Repository`].
pub trait Entity: Clone + Send + Sync {
    type Id: Clone + Display + Send + Sync;

    /// Human-readable kind used in error messages ("user", "event", ...).
    const KIND: &'static str;

    fn id(&self) -> &Self::Id;
}

/// Plain create/get/update/delete over one record type.
///
/// Users and events share this capability set; anything with real rules
/// (check-ins, freezes) has its own repository trait instead.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Insert a new record. Fails if the id or a unique field already exists.
    async fn create(&self, record: &T) -> Result<(), DomainError>;

    async fn get(&self, id: &T::Id) -> Result<Option<T>, DomainError>;

    /// Overwrite an existing record. Fails with `NotFound` when nothing matched.
    async fn update(&self, record: &T) -> Result<(), DomainError>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: &T::Id) -> Result<bool, DomainError>;

    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<T>, DomainError>;

    /// Like [`Repository::get`] but an absent record is an error.
    async fn require(&self, id: &T::Id) -> Result<T, DomainError> {
        self.get(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("{} {}", T::KIND, id)))
    }
}
