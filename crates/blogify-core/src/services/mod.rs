//! Application services - the decision logic, expressed against ports.

mod accounts;
mod analytics;
mod bulk;
mod moderation;
mod posts;

pub use accounts::{AccountService, Principal, StaticPrincipal};
pub use analytics::{AnalyticsService, DEFAULT_WINDOW_DAYS, parse_window};
pub use bulk::{BulkOutcome, BulkService};
pub use moderation::{ModeratedPost, ModerationService};
pub use posts::PostService;
