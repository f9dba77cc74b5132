use chrono::{NaiveTime, TimeZone, Utc};

use rollcall_domain::freeze::{FreezeStatus, FreezeToken, StreakFreezeRepository};
use rollcall_domain::shared::Entity;
use rollcall_infrastructure::persistence::repositories::SqliteStreakFreezeRepository;

mod test_helpers;
use test_helpers::day;

fn at_noon(d: chrono::NaiveDate) -> chrono::DateTime<Utc> {
    Utc.from_utc_datetime(&d.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap()))
}

#[tokio::test]
async fn available_excludes_used_and_expired_integration() {
    let pool = test_helpers::setup_in_memory_db().await;
    let user = test_helpers::seed_user(&pool, "freezer").await;
    let event = test_helpers::seed_event(&pool, &user, "Floss").await;
    let repo = SqliteStreakFreezeRepository::new(pool.clone());

    let granted_on = day(2024, 7, 1);
    let open = FreezeToken::grant(user.id().clone(), event.id().clone(), None, at_noon(granted_on))
        .expect("grant open");
    let short = FreezeToken::grant(
        user.id().clone(),
        event.id().clone(),
        Some(day(2024, 7, 3)),
        at_noon(granted_on),
    )
    .expect("grant short");
    repo.save(&open).await.expect("save open");
    repo.save(&short).await.expect("save short");

    let today = day(2024, 7, 2);
    assert_eq!(
        repo.list_available(user.id(), event.id(), today)
            .await
            .expect("available")
            .len(),
        2
    );

    // expiry day itself is no longer usable
    let available = repo
        .list_available(user.id(), event.id(), day(2024, 7, 3))
        .await
        .expect("available");
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].id(), open.id());

    let all = repo.list_all(user.id(), event.id()).await.expect("all");
    assert_eq!(all.len(), 2);
    let expired = all
        .iter()
        .find(|t| t.id() == short.id())
        .expect("short token listed");
    assert_eq!(expired.status(day(2024, 7, 3)), FreezeStatus::Expired);
}

#[tokio::test]
async fn claim_takes_oldest_first_integration() {
    let pool = test_helpers::setup_in_memory_db().await;
    let user = test_helpers::seed_user(&pool, "claimer").await;
    let event = test_helpers::seed_event(&pool, &user, "Journal").await;
    let repo = SqliteStreakFreezeRepository::new(pool.clone());

    let older = FreezeToken::grant(
        user.id().clone(),
        event.id().clone(),
        None,
        at_noon(day(2024, 1, 1)),
    )
    .expect("grant older");
    let newer = FreezeToken::grant(
        user.id().clone(),
        event.id().clone(),
        None,
        at_noon(day(2024, 1, 5)),
    )
    .expect("grant newer");
    // insertion order differs from age on purpose
    repo.save(&newer).await.expect("save newer");
    repo.save(&older).await.expect("save older");

    let today = day(2024, 1, 10);
    let first = repo
        .claim_oldest_available(user.id(), event.id(), today)
        .await
        .expect("claim")
        .expect("a freeze was available");
    assert_eq!(&first, older.id());

    let stored = repo
        .find_by_id(older.id())
        .await
        .expect("find")
        .expect("exists");
    assert!(stored.is_used());
    assert_eq!(stored.used_on_day(), Some(today));

    let second = repo
        .claim_oldest_available(user.id(), event.id(), today)
        .await
        .expect("claim")
        .expect("second freeze available");
    assert_eq!(&second, newer.id());

    assert!(repo
        .claim_oldest_available(user.id(), event.id(), today)
        .await
        .expect("claim")
        .is_none());
}

#[tokio::test]
async fn claim_ignores_expired_tokens_integration() {
    let pool = test_helpers::setup_in_memory_db().await;
    let user = test_helpers::seed_user(&pool, "late").await;
    let event = test_helpers::seed_event(&pool, &user, "Yoga").await;
    let repo = SqliteStreakFreezeRepository::new(pool.clone());

    let token = FreezeToken::grant(
        user.id().clone(),
        event.id().clone(),
        Some(day(2024, 8, 2)),
        at_noon(day(2024, 8, 1)),
    )
    .expect("grant");
    repo.save(&token).await.expect("save");

    assert!(repo
        .claim_oldest_available(user.id(), event.id(), day(2024, 8, 2))
        .await
        .expect("claim")
        .is_none());

    let stored = repo.find_by_id(token.id()).await.expect("find").expect("exists");
    assert!(!stored.is_used());
}
