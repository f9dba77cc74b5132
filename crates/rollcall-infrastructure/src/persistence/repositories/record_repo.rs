use async_trait::async_trait;
use rollcall_domain::shared::{DomainError, Entity, Repository};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{FromRow, Sqlite, SqlitePool};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::persistence::SqliteRepositoryBase;

/// How a plain record maps onto one table.
///
/// `COLUMNS[0]` is the primary key; `bind_columns` must bind values in the
/// same order as `COLUMNS`.
pub trait SqliteRecord: Entity + 'static {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];
    const ORDER_BY: &'static str = "created_at ASC, id ASC";

    type Row: for<'r> FromRow<'r, SqliteRow> + Send + Unpin;

    fn bind_columns<'q>(
        &'q self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>>;

    fn from_row(row: Self::Row) -> Result<Self, DomainError>;
}

/// The single SQLite implementation of [`Repository`] for plain records.
pub struct SqliteRecordRepository<T> {
    base: SqliteRepositoryBase,
    _record: PhantomData<fn() -> T>,
}

impl<T: SqliteRecord> SqliteRecordRepository<T> {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self {
            base: SqliteRepositoryBase::new(pool),
            _record: PhantomData,
        }
    }

    pub(super) fn base(&self) -> &SqliteRepositoryBase {
        &self.base
    }

    fn column_list() -> String {
        T::COLUMNS.join(", ")
    }

    /// `SELECT <all columns> FROM <table> <tail>`
    pub(super) fn select_sql(tail: &str) -> String {
        format!("SELECT {} FROM {} {}", Self::column_list(), T::TABLE, tail)
    }

    fn insert_sql() -> String {
        let placeholders: Vec<String> = (1..=T::COLUMNS.len()).map(|i| format!("?{i}")).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            T::TABLE,
            Self::column_list(),
            placeholders.join(", ")
        )
    }

    fn update_sql() -> String {
        let assignments: Vec<String> = T::COLUMNS
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, column)| format!("{} = ?{}", column, i + 1))
            .collect();
        format!(
            "UPDATE {} SET {} WHERE {} = ?1",
            T::TABLE,
            assignments.join(", "),
            T::COLUMNS[0]
        )
    }
}

#[async_trait]
impl<T: SqliteRecord> Repository<T> for SqliteRecordRepository<T> {
    async fn create(&self, record: &T) -> Result<(), DomainError> {
        let sql = Self::insert_sql();
        let context = format!("Create {}", T::KIND);
        self.base
            .execute(record.bind_columns(sqlx::query(&sql)), &context)
            .await?;
        Ok(())
    }

    async fn get(&self, id: &T::Id) -> Result<Option<T>, DomainError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?1",
            Self::column_list(),
            T::TABLE,
            T::COLUMNS[0]
        );
        let context = format!("Find {}", T::KIND);

        let row: Option<T::Row> = self
            .base
            .fetch_optional(sqlx::query_as(&sql).bind(id.to_string()), &context)
            .await?;

        row.map(T::from_row).transpose()
    }

    async fn update(&self, record: &T) -> Result<(), DomainError> {
        let sql = Self::update_sql();
        let context = format!("Update {}", T::KIND);

        let result = self
            .base
            .execute(record.bind_columns(sqlx::query(&sql)), &context)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("{} {}", T::KIND, record.id())));
        }
        Ok(())
    }

    async fn delete(&self, id: &T::Id) -> Result<bool, DomainError> {
        let sql = format!("DELETE FROM {} WHERE {} = ?1", T::TABLE, T::COLUMNS[0]);
        let context = format!("Delete {}", T::KIND);

        let result = self
            .base
            .execute(sqlx::query(&sql).bind(id.to_string()), &context)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<T>, DomainError> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY {} LIMIT ?1 OFFSET ?2",
            Self::column_list(),
            T::TABLE,
            T::ORDER_BY
        );
        let context = format!("List {}", T::KIND);

        let rows: Vec<T::Row> = self
            .base
            .fetch_all(
                sqlx::query_as(&sql)
                    .bind(i64::from(limit))
                    .bind(i64::from(skip)),
                &context,
            )
            .await?;

        rows.into_iter().map(T::from_row).collect()
    }
}
