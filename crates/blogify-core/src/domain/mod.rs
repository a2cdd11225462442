//! Domain entities - the core business objects.

mod analytics;
mod post;
mod user;

pub use analytics::{
    AnalyticsReport, AuthorPostCount, ContentStats, DailyCount, Insights, MonthlyCount, Overview,
    RecentActivity, Trends,
};
pub use post::{AuthorRef, Post, PostStatus, PostWithAuthor};
pub use user::{Actor, Role, User, mask_email, normalize_email};
