use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rollcall_domain::event::{Event, EventDirectoryRepository};
use rollcall_domain::shared::{DomainError, Entity, EventId, UserId};
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use sqlx::{FromRow, Sqlite};

use super::{SqliteRecord, SqliteRecordRepository};

#[derive(FromRow)]
pub struct EventRow {
    id: String,
    title: String,
    description: Option<String>,
    creator_id: String,
    category: Option<String>,
    is_public: bool,
    created_at: DateTime<Utc>,
}

impl SqliteRecord for Event {
    const TABLE: &'static str = "events";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "title",
        "description",
        "creator_id",
        "category",
        "is_public",
        "created_at",
    ];

    type Row = EventRow;

    fn bind_columns<'q>(
        &'q self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        query
            .bind(self.id().as_str())
            .bind(self.title())
            .bind(self.description())
            .bind(self.creator_id().as_str())
            .bind(self.category())
            .bind(self.is_public())
            .bind(self.created_at())
    }

    fn from_row(row: EventRow) -> Result<Self, DomainError> {
        Ok(Event::restore(
            EventId::from_string(&row.id),
            row.title,
            row.description,
            UserId::from_string(&row.creator_id),
            row.category,
            row.is_public,
            row.created_at,
        ))
    }
}

#[async_trait]
impl EventDirectoryRepository for SqliteRecordRepository<Event> {
    async fn list_public(&self, skip: u32, limit: u32) -> Result<Vec<Event>, DomainError> {
        let sql = Self::select_sql(&format!(
            "WHERE is_public = 1 ORDER BY {} LIMIT ?1 OFFSET ?2",
            Event::ORDER_BY
        ));

        let rows: Vec<EventRow> = self
            .base()
            .fetch_all(
                sqlx::query_as(&sql)
                    .bind(i64::from(limit))
                    .bind(i64::from(skip)),
                "List public events",
            )
            .await?;

        rows.into_iter().map(Event::from_row).collect()
    }

    async fn list_by_creator(
        &self,
        creator_id: &UserId,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<Event>, DomainError> {
        let sql = Self::select_sql(&format!(
            "WHERE creator_id = ?1 ORDER BY {} LIMIT ?2 OFFSET ?3",
            Event::ORDER_BY
        ));

        let rows: Vec<EventRow> = self
            .base()
            .fetch_all(
                sqlx::query_as(&sql)
                    .bind(creator_id.as_str())
                    .bind(i64::from(limit))
                    .bind(i64::from(skip)),
                "List events by creator",
            )
            .await?;

        rows.into_iter().map(Event::from_row).collect()
    }
}
