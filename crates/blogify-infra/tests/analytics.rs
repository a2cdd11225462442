mod common;

use chrono::{DateTime, FixedOffset, TimeDelta, TimeZone, Utc};

use blogify_core::domain::{PostStatus, Role};
use blogify_core::services::parse_window;

use common::World;

fn noon_utc() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2026, 10, 17, 12, 0, 0)
        .unwrap()
}

#[tokio::test]
async fn empty_store_yields_zeroes() {
    let world = World::new();

    let report = world.analytics.compute_at(30, noon_utc()).await.unwrap();

    assert_eq!(report.overview.total_posts, 0);
    assert_eq!(report.overview.total_users, 0);
    assert_eq!(report.recent.posts, 0);
    assert_eq!(report.insights.avg_content_length, 0);
    assert!(report.insights.top_authors.is_empty());
    assert!(report.trends.daily.iter().all(|d| d.posts == 0));
    assert!(report.trends.monthly.iter().all(|m| m.posts == 0));
}

#[tokio::test]
async fn trend_sizes_do_not_depend_on_window() {
    let world = World::new();

    for days in [1, 7, 30, 365, u32::MAX] {
        let report = world.analytics.compute_at(days, noon_utc()).await.unwrap();
        assert_eq!(report.trends.daily.len(), 7);
        assert_eq!(report.trends.monthly.len(), 6);
        assert_eq!(report.period_days, days);
    }
}

#[tokio::test]
async fn counts_split_by_status_window_and_day() {
    let world = World::new();
    let now = noon_utc();
    let now_utc = now.with_timezone(&Utc);
    world.user("Root", Role::Admin).await;
    let alice = world.user("Alice", Role::User).await;
    let bob = world.user("Bob", Role::User).await;

    // Two hours ago, three days ago, twenty days ago, and ninety days ago.
    world
        .post_at(alice, PostStatus::Pending, now_utc - TimeDelta::hours(2), "abcd")
        .await;
    world
        .post_at(alice, PostStatus::Approved, now_utc - TimeDelta::days(3), "abcdef")
        .await;
    world
        .post_at(bob, PostStatus::Rejected, now_utc - TimeDelta::days(20), "ab")
        .await;
    world
        .post_at(alice, PostStatus::Approved, now_utc - TimeDelta::days(90), "abc")
        .await;

    let report = world.analytics.compute_at(7, now).await.unwrap();

    assert_eq!(report.overview.total_posts, 4);
    assert_eq!(report.overview.pending_posts, 1);
    assert_eq!(report.overview.approved_posts, 2);
    assert_eq!(report.overview.rejected_posts, 1);
    assert_eq!(report.overview.total_users, 3);
    assert_eq!(report.overview.admin_users, 1);

    assert_eq!(report.recent.posts, 2);
    assert_eq!(report.recent.pending, 1);
    assert_eq!(report.recent.approved, 1);
    assert_eq!(report.recent.rejected, 0);
    assert_eq!(report.recent.activity_24h, 1);

    let daily: Vec<u64> = report.trends.daily.iter().map(|d| d.posts).collect();
    assert_eq!(daily, [0, 0, 0, 1, 0, 0, 1]);
    assert_eq!(report.trends.daily[6].date.to_string(), "2026-10-17");

    let monthly: Vec<u64> = report.trends.monthly.iter().map(|m| m.posts).collect();
    assert_eq!(report.trends.monthly[0].month, "May 2026");
    assert_eq!(report.trends.monthly[5].month, "Oct 2026");
    // 90 days back lands in July, 20 days back in September.
    assert_eq!(monthly, [0, 0, 1, 0, 1, 2]);

    // (4 + 6 + 2 + 3) / 4 = 3.75
    assert_eq!(report.insights.avg_content_length, 4);

    let top = &report.insights.top_authors;
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].id, alice.id);
    assert_eq!(top[0].post_count, 3);
    assert_eq!(top[0].email, "alice@example.com");
    assert_eq!(top[1].id, bob.id);
}

#[tokio::test]
async fn top_authors_are_capped_at_five() {
    let world = World::new();
    let now = noon_utc();
    for name in ["A1", "A2", "A3", "A4", "A5", "A6", "A7"] {
        let author = world.user(name, Role::User).await;
        world
            .post_at(author, PostStatus::Pending, now.with_timezone(&Utc), "x")
            .await;
    }

    let report = world.analytics.compute_at(30, now).await.unwrap();

    assert_eq!(report.insights.top_authors.len(), 5);
}

#[test]
fn window_parameter_falls_back_to_thirty_days() {
    assert_eq!(parse_window(Some("not-a-number")), 30);
    assert_eq!(parse_window(Some("-1")), 30);
    assert_eq!(parse_window(Some("14")), 14);
}
