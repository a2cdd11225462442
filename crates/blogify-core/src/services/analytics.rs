//! Analytics aggregator: read-only counts, trends and rankings over posts and users.
//!
//! Every figure comes from its own store query. The queries are independent and run
//! concurrently; there is no snapshot isolation across them.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use futures::future::try_join_all;
use futures::try_join;

use crate::domain::{
    AnalyticsReport, DailyCount, Insights, MonthlyCount, Overview, PostStatus, RecentActivity,
    Role, Trends,
};
use crate::error::{DomainError, RepoError};
use crate::ports::{PostFilter, PostRepository, UserRepository};

pub const DEFAULT_WINDOW_DAYS: u32 = 30;

const DAILY_POINTS: u64 = 7;
const MONTHLY_POINTS: i32 = 6;
const TOP_AUTHORS: u64 = 5;

/// Window size from a raw query value. Anything but a positive integer means the default.
pub fn parse_window(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|days| *days > 0)
        .map(|days| u32::try_from(days).unwrap_or(u32::MAX))
        .unwrap_or(DEFAULT_WINDOW_DAYS)
}

/// A labelled half-open UTC range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Bucket {
    label: NaiveDate,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Bucket {
    fn filter(&self) -> PostFilter {
        PostFilter::all().created_between(Some(self.start), Some(self.end))
    }
}

/// Start of `day` in `tz`, resolved with the offset in force on that day.
fn local_midnight<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> Option<DateTime<Utc>> {
    let midnight = day.and_time(NaiveTime::MIN);
    // A DST jump at midnight skips it; the day then starts an hour later.
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(midnight + TimeDelta::hours(1))).earliest())
        .map(|start| start.with_timezone(&Utc))
}

/// The last seven local calendar days, oldest first, today included.
fn daily_buckets<Tz: TimeZone>(now: &DateTime<Tz>) -> Vec<Bucket> {
    let tz = now.timezone();
    let today = now.date_naive();
    (0..DAILY_POINTS)
        .rev()
        .filter_map(|back| {
            let day = today.checked_sub_days(Days::new(back))?;
            let next = day.succ_opt()?;
            Some(Bucket {
                label: day,
                start: local_midnight(day, &tz)?,
                end: local_midnight(next, &tz)?,
            })
        })
        .collect()
}

fn first_of_month(index: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(index.div_euclid(12), index.rem_euclid(12) as u32 + 1, 1)
}

/// The last six local calendar months, oldest first, current month included.
fn monthly_buckets<Tz: TimeZone>(now: &DateTime<Tz>) -> Vec<Bucket> {
    let tz = now.timezone();
    let current = now.year() * 12 + now.month0() as i32;
    (0..MONTHLY_POINTS)
        .rev()
        .filter_map(|back| {
            let start = first_of_month(current - back)?;
            let end = first_of_month(current - back + 1)?;
            Some(Bucket {
                label: start,
                start: local_midnight(start, &tz)?,
                end: local_midnight(end, &tz)?,
            })
        })
        .collect()
}

pub struct AnalyticsService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl AnalyticsService {
    pub fn new(posts: Arc<dyn PostRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { posts, users }
    }

    /// Compute the report for a trailing window of `days`, as of now in server-local time.
    pub async fn compute(&self, days: u32) -> Result<AnalyticsReport, DomainError> {
        self.compute_at(days, Local::now()).await
    }

    /// Compute the report as of `now`. Trend buckets follow the calendar of `now`'s zone.
    pub async fn compute_at<Tz: TimeZone>(
        &self,
        days: u32,
        now: DateTime<Tz>,
    ) -> Result<AnalyticsReport, DomainError> {
        let now_utc = now.with_timezone(&Utc);
        let day_buckets = daily_buckets(&now);
        let month_buckets = monthly_buckets(&now);
        // A window reaching past the calendar's range counts everything.
        let window_start =
            TimeDelta::try_days(i64::from(days)).and_then(|d| now_utc.checked_sub_signed(d));

        let (overview, recent, trends, insights) = try_join!(
            self.overview(),
            self.recent(window_start, now_utc),
            self.trends(&day_buckets, &month_buckets),
            self.insights(),
        )?;

        tracing::debug!(
            days,
            total_posts = overview.total_posts,
            window_posts = recent.posts,
            "Analytics computed"
        );

        Ok(AnalyticsReport {
            overview,
            recent,
            trends,
            insights,
            period_days: days,
        })
    }

    async fn overview(&self) -> Result<Overview, RepoError> {
        let all = PostFilter::all();
        let (total_posts, pending_posts, approved_posts, rejected_posts, total_users, admin_users) =
            try_join!(
                self.posts.count(all),
                self.posts.count(all.with_status(PostStatus::Pending)),
                self.posts.count(all.with_status(PostStatus::Approved)),
                self.posts.count(all.with_status(PostStatus::Rejected)),
                self.users.count(None),
                self.users.count(Some(Role::Admin)),
            )?;

        Ok(Overview {
            total_posts,
            pending_posts,
            approved_posts,
            rejected_posts,
            total_users,
            admin_users,
        })
    }

    async fn recent(
        &self,
        window_start: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<RecentActivity, RepoError> {
        let window = PostFilter::all().created_between(window_start, None);
        let last_day = PostFilter::all().created_between(Some(now - TimeDelta::hours(24)), None);

        let (posts, pending, approved, rejected, activity_24h) = try_join!(
            self.posts.count(window),
            self.posts.count(window.with_status(PostStatus::Pending)),
            self.posts.count(window.with_status(PostStatus::Approved)),
            self.posts.count(window.with_status(PostStatus::Rejected)),
            self.posts.count(last_day),
        )?;

        Ok(RecentActivity {
            posts,
            pending,
            approved,
            rejected,
            activity_24h,
        })
    }

    async fn trends(&self, days: &[Bucket], months: &[Bucket]) -> Result<Trends, RepoError> {
        let (day_counts, month_counts) = try_join!(
            try_join_all(days.iter().map(|b| self.posts.count(b.filter()))),
            try_join_all(months.iter().map(|b| self.posts.count(b.filter()))),
        )?;

        let daily = days
            .iter()
            .zip(day_counts)
            .map(|(bucket, posts)| DailyCount {
                date: bucket.label,
                posts,
            })
            .collect();
        let monthly = months
            .iter()
            .zip(month_counts)
            .map(|(bucket, posts)| MonthlyCount {
                month: bucket.label.format("%b %Y").to_string(),
                posts,
            })
            .collect();

        Ok(Trends { daily, monthly })
    }

    async fn insights(&self) -> Result<Insights, RepoError> {
        let (top_authors, content) = try_join!(
            self.posts.top_authors(TOP_AUTHORS),
            self.posts.content_stats(),
        )?;

        Ok(Insights {
            top_authors,
            avg_content_length: content.average_length(),
        })
    }
}
