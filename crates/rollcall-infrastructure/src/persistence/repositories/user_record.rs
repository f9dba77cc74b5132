use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rollcall_domain::shared::{DomainError, Entity, UserId};
use rollcall_domain::user::{User, UserRankingRepository};
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use sqlx::{FromRow, Sqlite};

use super::{SqliteRecord, SqliteRecordRepository};
use crate::persistence::rows::to_count;

#[derive(FromRow)]
pub struct UserRow {
    id: String,
    username: String,
    display_name: Option<String>,
    created_at: DateTime<Utc>,
    total_checkins: i64,
    longest_streak: i64,
}

impl SqliteRecord for User {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "username",
        "display_name",
        "created_at",
        "total_checkins",
        "longest_streak",
    ];

    type Row = UserRow;

    fn bind_columns<'q>(
        &'q self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        query
            .bind(self.id().as_str())
            .bind(self.username())
            .bind(self.display_name())
            .bind(self.created_at())
            .bind(i64::from(self.total_checkins()))
            .bind(i64::from(self.longest_streak()))
    }

    fn from_row(row: UserRow) -> Result<Self, DomainError> {
        Ok(User::restore(
            UserId::from_string(&row.id),
            row.username,
            row.display_name,
            row.created_at,
            to_count(row.total_checkins, "total_checkins")?,
            to_count(row.longest_streak, "longest_streak")?,
        ))
    }
}

#[async_trait]
impl UserRankingRepository for SqliteRecordRepository<User> {
    async fn top_by_longest_streak(&self, limit: u32) -> Result<Vec<User>, DomainError> {
        let sql = Self::select_sql(
            "ORDER BY longest_streak DESC, total_checkins DESC, created_at ASC, id ASC LIMIT ?1",
        );

        let rows: Vec<UserRow> = self
            .base()
            .fetch_all(
                sqlx::query_as(&sql).bind(i64::from(limit)),
                "Rank users by longest streak",
            )
            .await?;

        rows.into_iter().map(User::from_row).collect()
    }
}
