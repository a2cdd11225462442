//! Observability module - request correlation.

mod request_id;

pub use request_id::{RequestIdMiddleware, current_request_id};
