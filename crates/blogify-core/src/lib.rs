//! # Blogify Core
//!
//! The domain layer of the Blogify backend.
//! Post moderation, bulk moderation, analytics and account rules live here,
//! expressed against ports with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
