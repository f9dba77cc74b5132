#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use rollcall_domain::check_in::CheckIn;
use rollcall_domain::event::Event;
use rollcall_domain::shared::{CheckInTransaction, CheckInUnitOfWork, Repository};
use rollcall_domain::user::User;
use rollcall_infrastructure::persistence::repositories::{
    SqliteEventRepository, SqliteUserRepository,
};
use rollcall_infrastructure::persistence::{Database, SqliteCheckInUnitOfWork};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Single-connection in-memory database with migrations applied.
///
/// One connection keeps every query on the same in-memory database, so a
/// test must not touch the pool while it holds an open transaction.
pub async fn setup_in_memory_db() -> Arc<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory database");

    let db = Database::from_pool(pool);
    db.run_migrations().await.expect("run migrations");
    db.pool()
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub async fn seed_user(pool: &Arc<SqlitePool>, username: &str) -> User {
    let user = User::new(username.to_string(), None, Utc::now()).expect("valid user");
    SqliteUserRepository::new(pool.clone())
        .create(&user)
        .await
        .expect("insert user");
    user
}

pub async fn seed_event(pool: &Arc<SqlitePool>, creator: &User, title: &str) -> Event {
    use rollcall_domain::shared::Entity;

    let event = Event::new(
        title.to_string(),
        None,
        creator.id().clone(),
        None,
        true,
        Utc::now(),
    )
    .expect("valid event");
    SqliteEventRepository::new(pool.clone())
        .create(&event)
        .await
        .expect("insert event");
    event
}

/// Store a check-in at noon UTC on `on` with a given streak, committed.
pub async fn seed_check_in(
    pool: &Arc<SqlitePool>,
    user: &User,
    event: &Event,
    on: NaiveDate,
    streak: u32,
) -> CheckIn {
    use rollcall_domain::shared::Entity;

    let at = Utc.from_utc_datetime(&on.and_time(NaiveTime::from_hms_opt(12, 0, 0).expect("noon")));
    let check_in = CheckIn::record(user.id().clone(), event.id().clone(), at, None, None, streak)
        .expect("valid check-in");

    let uow = SqliteCheckInUnitOfWork::new(pool.clone());
    let mut tx = uow.begin().await.expect("begin");
    tx.insert_check_in(&check_in).await.expect("insert check-in");
    tx.commit().await.expect("commit");
    check_in
}
