//! Read-only report types produced by the analytics aggregator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Global counts, not limited to the requested window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overview {
    pub total_posts: u64,
    pub pending_posts: u64,
    pub approved_posts: u64,
    pub rejected_posts: u64,
    pub total_users: u64,
    pub admin_users: u64,
}

/// Counts of posts created inside the trailing window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentActivity {
    pub posts: u64,
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
    pub activity_24h: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub posts: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCount {
    /// Short label such as `Oct 2026`.
    pub month: String,
    pub posts: u64,
}

/// Fixed-size trends: 7 days and 6 months, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trends {
    pub daily: Vec<DailyCount>,
    pub monthly: Vec<MonthlyCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorPostCount {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub post_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insights {
    pub top_authors: Vec<AuthorPostCount>,
    pub avg_content_length: u64,
}

/// Raw material for the average content length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentStats {
    pub posts: u64,
    pub total_chars: u64,
}

impl ContentStats {
    /// Mean characters per post, rounded half up. Zero when there are no posts.
    pub fn average_length(&self) -> u64 {
        if self.posts == 0 {
            return 0;
        }
        (self.total_chars + self.posts / 2) / self.posts
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub overview: Overview,
    pub recent: RecentActivity,
    pub trends: Trends,
    pub insights: Insights,
    pub period_days: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_of_nothing_is_zero() {
        assert_eq!(ContentStats::default().average_length(), 0);
    }

    #[test]
    fn average_rounds_half_up() {
        let stats = ContentStats {
            posts: 2,
            total_chars: 5,
        };
        assert_eq!(stats.average_length(), 3);

        let stats = ContentStats {
            posts: 3,
            total_chars: 10,
        };
        assert_eq!(stats.average_length(), 3);
    }
}
