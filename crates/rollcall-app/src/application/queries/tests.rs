use chrono::Days;
use rollcall_domain::shared::DomainError;

use crate::application::commands::{CommandHandler, CreateEventCommand};
use crate::application::config::AppConfig;
use crate::test_support::{day, TestApp};

/// Check `user` in on `days` consecutive days ending on `last`.
async fn run_of(app: &TestApp, user: &str, event: &str, days: u64, last: chrono::NaiveDate) {
    for back in (0..days).rev() {
        let on = last - Days::new(back);
        app.check_in_on(user, event, on).await;
    }
}

#[tokio::test]
async fn test_streak_leaderboard_breaks_ties_by_earliest_day() {
    let app = TestApp::on(day(2024, 6, 1)).await;
    let ann = app.user("ann").await;
    let ben = app.user("ben").await;
    let cat = app.user("cat").await;
    let event = app.event(&ann, "Cold shower").await;

    run_of(&app, &ann, &event, 5, day(2024, 6, 2)).await;
    run_of(&app, &ben, &event, 5, day(2024, 6, 1)).await;
    run_of(&app, &cat, &event, 3, day(2024, 6, 3)).await;
    // Ben missed 06-02; a pending freeze keeps the run alive on 06-03.
    app.grant_freeze(&ben, &event, None).await;

    let board = app
        .state
        .queries
        .leaderboard
        .event_leaderboard(&event, None)
        .await
        .unwrap();

    let order: Vec<(&str, u32, &str)> = board
        .iter()
        .map(|e| (e.user_id.as_str(), e.current_streak, e.last_check_in_day.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![
            (ben.as_str(), 5, "2024-06-01"),
            (ann.as_str(), 5, "2024-06-02"),
            (cat.as_str(), 3, "2024-06-03"),
        ]
    );
    assert_eq!(board.iter().map(|e| e.rank).collect::<Vec<_>>(), vec![1, 2, 3]);

    let summary = app
        .state
        .queries
        .leaderboard
        .event_summary(&event)
        .await
        .unwrap();
    assert_eq!(summary.total_checkins, 13);
    assert_eq!(summary.highest_streak, 5);
    assert_eq!(summary.avg_streak, 4);
    let mut leaders = vec![ann.clone(), ben.clone()];
    leaders.sort();
    assert_eq!(summary.streak_leader_user_ids, leaders);
}

#[tokio::test]
async fn test_lapsed_run_ranks_below_active_one() {
    let app = TestApp::on(day(2024, 6, 1)).await;
    let ann = app.user("ann").await;
    let quitter = app.user("quitter").await;
    let event = app.event(&ann, "Cold shower").await;

    run_of(&app, &quitter, &event, 5, day(2024, 6, 5)).await;
    run_of(&app, &ann, &event, 2, day(2024, 6, 20)).await;

    let board = app
        .state
        .queries
        .leaderboard
        .event_leaderboard(&event, None)
        .await
        .unwrap();

    let order: Vec<(&str, u32)> = board
        .iter()
        .map(|e| (e.user_id.as_str(), e.current_streak))
        .collect();
    assert_eq!(order, vec![(ann.as_str(), 2), (quitter.as_str(), 0)]);

    // One missed day without a freeze also drops to zero.
    app.set_day(day(2024, 6, 22));
    let board = app
        .state
        .queries
        .leaderboard
        .event_leaderboard(&event, None)
        .await
        .unwrap();
    assert!(board.iter().all(|e| e.current_streak == 0));
}

#[tokio::test]
async fn test_checkin_leaderboard_prefers_recent_activity_on_ties() {
    let app = TestApp::on(day(2024, 6, 1)).await;
    let ann = app.user("ann").await;
    let ben = app.user("ben").await;
    let event = app.event(&ann, "Cold shower").await;

    // Same count, ben's last check-in is later.
    app.check_in_on(&ann, &event, day(2024, 6, 1)).await;
    app.check_in_on(&ann, &event, day(2024, 6, 5)).await;
    app.check_in_on(&ben, &event, day(2024, 6, 2)).await;
    app.check_in_on(&ben, &event, day(2024, 6, 6)).await;

    let board = app
        .state
        .queries
        .leaderboard
        .event_checkin_leaderboard(&event, Some(1))
        .await
        .unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].user_id, ben);
    assert_eq!(board[0].total_checkins, 2);
}

#[tokio::test]
async fn test_leaderboard_of_empty_event_is_empty_and_summary_zero() {
    let app = TestApp::on(day(2024, 6, 1)).await;
    let ann = app.user("ann").await;
    let event = app.event(&ann, "Quiet event").await;

    let board = app
        .state
        .queries
        .leaderboard
        .event_leaderboard(&event, Some(10))
        .await
        .unwrap();
    assert!(board.is_empty());

    let summary = app
        .state
        .queries
        .leaderboard
        .event_summary(&event)
        .await
        .unwrap();
    assert_eq!(summary.total_checkins, 0);
    assert_eq!(summary.highest_streak, 0);
    assert!(summary.streak_leader_user_ids.is_empty());
}

#[tokio::test]
async fn test_leaderboard_of_unknown_event_is_not_found() {
    let app = TestApp::on(day(2024, 6, 1)).await;
    let missing = rollcall_domain::EventId::new().to_string();

    let err = app
        .state
        .queries
        .leaderboard
        .event_leaderboard(&missing, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));

    let err = app
        .state
        .queries
        .leaderboard
        .event_summary("not-an-id")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidIdentifier(_)));
}

#[tokio::test]
async fn test_leaderboard_limit_is_capped() {
    let mut config = AppConfig::default();
    config.leaderboard.max_limit = 2;
    let app = TestApp::with_config(day(2024, 6, 1), config).await;
    let ann = app.user("ann").await;
    let event = app.event(&ann, "Cold shower").await;

    for name in ["ben", "cat", "dan"] {
        let user = app.user(name).await;
        app.check_in(&user, &event).await.unwrap();
    }

    let board = app
        .state
        .queries
        .leaderboard
        .event_leaderboard(&event, Some(50))
        .await
        .unwrap();
    assert_eq!(board.len(), 2);
}

#[tokio::test]
async fn test_history_is_newest_first_and_paged() {
    let app = TestApp::on(day(2024, 6, 1)).await;
    let ann = app.user("ann").await;
    let event = app.event(&ann, "Cold shower").await;
    run_of(&app, &ann, &event, 4, day(2024, 6, 4)).await;

    let first_page = app
        .state
        .queries
        .streak
        .check_in_history(&ann, &event, None, Some(2))
        .await
        .unwrap();
    let days: Vec<&str> = first_page.iter().map(|c| c.day.as_str()).collect();
    assert_eq!(days, vec!["2024-06-04", "2024-06-03"]);

    let second_page = app
        .state
        .queries
        .streak
        .check_in_history(&ann, &event, Some(2), Some(2))
        .await
        .unwrap();
    assert_eq!(second_page[0].day, "2024-06-02");
    assert_eq!(second_page[1].streak_count_at_time, 1);

    let all = app
        .state
        .queries
        .streak
        .event_check_ins(&event, None, None)
        .await
        .unwrap();
    assert_eq!(all.len(), 4);
}

#[tokio::test]
async fn test_streak_reads_do_not_consume_freezes() {
    let app = TestApp::on(day(2024, 6, 1)).await;
    let ann = app.user("ann").await;
    let event = app.event(&ann, "Cold shower").await;
    run_of(&app, &ann, &event, 3, day(2024, 6, 3)).await;
    app.grant_freeze(&ann, &event, None).await;

    app.set_day(day(2024, 6, 5));
    for _ in 0..3 {
        let streak = app
            .state
            .queries
            .streak
            .compute_streak(&ann, &event)
            .await
            .unwrap();
        assert_eq!(streak.current_streak, 3);
        assert_eq!(streak.available_freezes, 1);
    }

    // Two missed days: a freeze no longer helps.
    app.set_day(day(2024, 6, 6));
    let streak = app
        .state
        .queries
        .streak
        .compute_streak(&ann, &event)
        .await
        .unwrap();
    assert_eq!(streak.current_streak, 0);
    assert_eq!(streak.longest_streak, 3);
}

#[tokio::test]
async fn test_user_streaks_and_has_checked_in_today() {
    let app = TestApp::on(day(2024, 6, 1)).await;
    let ann = app.user("ann").await;
    let shower = app.event(&ann, "Cold shower").await;
    let walk = app.event(&ann, "Evening walk").await;
    let _unused = app.event(&ann, "Never joined").await;

    assert!(!app
        .state
        .queries
        .streak
        .has_checked_in_today(&ann, &shower)
        .await
        .unwrap());

    app.check_in(&ann, &shower).await.unwrap();
    app.check_in(&ann, &walk).await.unwrap();

    assert!(app
        .state
        .queries
        .streak
        .has_checked_in_today(&ann, &shower)
        .await
        .unwrap());

    let streaks = app.state.queries.streak.user_streaks(&ann).await.unwrap();
    assert_eq!(streaks.len(), 2);
    assert!(streaks.iter().all(|s| s.current_streak == 1));

    app.set_day(day(2024, 6, 2));
    assert!(!app
        .state
        .queries
        .streak
        .has_checked_in_today(&ann, &shower)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_user_streaks_decay_cached_state_without_touching_it() {
    let app = TestApp::on(day(2024, 6, 1)).await;
    let ann = app.user("ann").await;
    let shower = app.event(&ann, "Cold shower").await;
    let walk = app.event(&ann, "Evening walk").await;

    run_of(&app, &ann, &shower, 4, day(2024, 6, 4)).await;
    run_of(&app, &ann, &walk, 2, day(2024, 6, 4)).await;
    app.grant_freeze(&ann, &walk, None).await;

    // 06-04 was the last check-in; 06-05 is the one missed day.
    app.set_day(day(2024, 6, 6));
    let streaks = app.state.queries.streak.user_streaks(&ann).await.unwrap();
    let by_event = |event: &str| {
        streaks
            .iter()
            .find(|s| s.event_id == event)
            .map(|s| (s.current_streak, s.longest_streak, s.available_freezes))
    };
    assert_eq!(by_event(&shower), Some((0, 4, 0)));
    assert_eq!(by_event(&walk), Some((2, 2, 1)));

    // Checking in again resumes from the cached state, not the decayed read.
    let streak = app.check_in_on(&ann, &shower, day(2024, 6, 6)).await;
    assert_eq!(streak, 1);
    let streaks = app.state.queries.streak.user_streaks(&ann).await.unwrap();
    let shower_now = streaks.iter().find(|s| s.event_id == shower).unwrap();
    assert_eq!((shower_now.current_streak, shower_now.longest_streak), (1, 4));
}

#[tokio::test]
async fn test_user_leaderboard_ranks_by_longest_streak_and_exposes_counters() {
    let app = TestApp::on(day(2024, 6, 1)).await;
    let ann = app.user("ann").await;
    let ben = app.user("ben").await;
    let cat = app.user("cat").await;
    let shower = app.event(&ann, "Cold shower").await;
    let walk = app.event(&ben, "Evening walk").await;

    // Ben's best run is 4 even though his current one is 1.
    run_of(&app, &ben, &walk, 4, day(2024, 6, 4)).await;
    app.check_in_on(&ben, &walk, day(2024, 6, 9)).await;
    run_of(&app, &ann, &shower, 3, day(2024, 6, 10)).await;
    app.check_in_on(&cat, &shower, day(2024, 6, 10)).await;

    let directory = &app.state.queries.directory;
    let board = directory.user_leaderboard(None).await.unwrap();
    let order: Vec<(&str, u32, u32)> = board
        .iter()
        .map(|u| (u.id.as_str(), u.longest_streak, u.total_checkins))
        .collect();
    assert_eq!(
        order,
        vec![(ben.as_str(), 4, 5), (ann.as_str(), 3, 3), (cat.as_str(), 1, 1)]
    );

    let top = directory.user_leaderboard(Some(1)).await.unwrap();
    assert_eq!(top.len(), 1);

    let ben_dto = directory.get_user(&ben).await.unwrap();
    assert_eq!((ben_dto.total_checkins, ben_dto.longest_streak), (5, 4));

    let page = directory.list_users(Some(1), Some(5)).await.unwrap();
    assert_eq!(page.len(), 2);
}

#[tokio::test]
async fn test_event_directory_hides_private_events_from_public_list() {
    let app = TestApp::on(day(2024, 6, 1)).await;
    let ann = app.user("ann").await;
    let public = app.event(&ann, "Cold shower").await;
    let private = app
        .state
        .command_handlers
        .create_event
        .handle(CreateEventCommand {
            title: "Journal".to_string(),
            description: None,
            creator_id: ann.clone(),
            category: None,
            is_public: false,
        })
        .await
        .unwrap();

    let directory = &app.state.queries.directory;
    let listed = directory.list_public_events(None, None).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, public);

    let owned = directory.events_created_by(&ann, None, None).await.unwrap();
    assert_eq!(owned.len(), 2);
    assert!(!directory.get_event(&private.id).await.unwrap().is_public);

    let err = directory.events_created_by("nobody", None, None).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidIdentifier(_)));
}
