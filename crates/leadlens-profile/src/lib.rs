//! Actor-platform client for the profile data source.
//!
//! The provider runs scraping "actors" asynchronously: the profile actor is
//! driven through a start-job / poll-status / fetch-result protocol, the
//! posts actor through a synchronous dataset endpoint. This crate hides both
//! behind two synchronous-looking calls plus an orchestrating
//! [`ProfileClient::extract`], with a bounded poll loop and explicit
//! timeout so a stuck run fails instead of hanging.

mod client;
mod error;
mod response;

pub use client::{activity_days_from_posts, extract_username, ProfileClient};
pub use error::ProfileError;
