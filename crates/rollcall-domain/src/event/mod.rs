use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::check_in::normalize_text;
use crate::shared::{DomainError, Entity, EventId, UserId};

const TITLE_MIN: usize = 3;
const TITLE_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 500;
const CATEGORY_MAX: usize = 50;

mod repository;

pub use repository::EventDirectoryRepository;

/// Fields to change on an existing event; `None` leaves a field as is.
/// A blank description or category clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub is_public: Option<bool>,
}

impl EventChanges {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// A habit people check in to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    id: EventId,
    title: String,
    description: Option<String>,
    creator_id: UserId,
    category: Option<String>,
    is_public: bool,
    created_at: DateTime<Utc>,
}

impl Event {
    pub fn new(
        title: String,
        description: Option<String>,
        creator_id: UserId,
        category: Option<String>,
        is_public: bool,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id: EventId::new(),
            title: clean_title(title)?,
            description: normalize_text("description", description, DESCRIPTION_MAX)?,
            creator_id,
            category: normalize_text("category", category, CATEGORY_MAX)?,
            is_public,
            created_at: now,
        })
    }

    pub fn restore(
        id: EventId,
        title: String,
        description: Option<String>,
        creator_id: UserId,
        category: Option<String>,
        is_public: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            creator_id,
            category,
            is_public,
            created_at,
        }
    }

    /// Apply `changes` all or nothing.
    pub fn revise(&mut self, changes: EventChanges) -> Result<(), DomainError> {
        let title = changes.title.map(clean_title).transpose()?;
        let description = changes
            .description
            .map(|text| normalize_text("description", Some(text), DESCRIPTION_MAX))
            .transpose()?;
        let category = changes
            .category
            .map(|text| normalize_text("category", Some(text), CATEGORY_MAX))
            .transpose()?;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(is_public) = changes.is_public {
            self.is_public = is_public;
        }
        Ok(())
    }

    /// Only the creator may change or remove an event.
    pub fn ensure_creator(&self, user_id: &UserId) -> Result<(), DomainError> {
        if &self.creator_id == user_id {
            Ok(())
        } else {
            Err(DomainError::Validation(format!(
                "Only the creator can modify event {}",
                self.id
            )))
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn creator_id(&self) -> &UserId {
        &self.creator_id
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn is_public(&self) -> bool {
        self.is_public
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

fn clean_title(title: String) -> Result<String, DomainError> {
    let title = title.trim().to_string();
    let len = title.chars().count();
    if !(TITLE_MIN..=TITLE_MAX).contains(&len) {
        return Err(DomainError::Validation(format!(
            "Event title must be between {TITLE_MIN} and {TITLE_MAX} characters"
        )));
    }
    Ok(title)
}

impl Entity for Event {
    type Id = EventId;
    const KIND: &'static str = "event";

    fn id(&self) -> &EventId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_bounds() {
        let creator = UserId::new();
        assert!(Event::new("Go".into(), None, creator.clone(), None, true, Utc::now()).is_err());
        assert!(Event::new("Run".into(), None, creator.clone(), None, true, Utc::now()).is_ok());
        assert!(Event::new("x".repeat(101), None, creator, None, true, Utc::now()).is_err());
    }

    #[test]
    fn test_description_limit_and_blank() {
        let creator = UserId::new();
        let event = Event::new(
            "Read daily".into(),
            Some("  ".into()),
            creator.clone(),
            Some("learning".into()),
            false,
            Utc::now(),
        )
        .unwrap();
        assert!(event.description().is_none());
        assert_eq!(event.category(), Some("learning"));
        assert!(!event.is_public());

        let err = Event::new(
            "Read daily".into(),
            Some("d".repeat(501)),
            creator,
            None,
            true,
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_revise_is_all_or_nothing() {
        let creator = UserId::new();
        let mut event = Event::new(
            "Read daily".into(),
            Some("One chapter".into()),
            creator,
            Some("learning".into()),
            true,
            Utc::now(),
        )
        .unwrap();

        let err = event
            .revise(EventChanges {
                title: Some("  Read more  ".into()),
                category: Some("c".repeat(51)),
                ..EventChanges::default()
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(event.title(), "Read daily");

        event
            .revise(EventChanges {
                title: Some("  Read more  ".into()),
                description: Some(" ".into()),
                is_public: Some(false),
                ..EventChanges::default()
            })
            .unwrap();
        assert_eq!(event.title(), "Read more");
        assert!(event.description().is_none());
        assert_eq!(event.category(), Some("learning"));
        assert!(!event.is_public());
    }

    #[test]
    fn test_only_creator_may_modify() {
        let creator = UserId::new();
        let event =
            Event::new("Stretch".into(), None, creator.clone(), None, true, Utc::now()).unwrap();
        assert!(event.ensure_creator(&creator).is_ok());
        let err = event.ensure_creator(&UserId::new()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
