//! Poll publishing
//!
//! Defines the `Publisher` trait. Publishers never retry: a duplicate post
//! is worse than a missed one.

pub mod mastodon;

use crate::error::Result;
use crate::poll::PollSpec;
use serde::{Deserialize, Serialize};

/// What a successful publish left behind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublishReceipt {
    /// Public URL of the status carrying the map
    pub image_status_url: Option<String>,
    /// Public URL of the reply carrying the poll
    pub poll_status_url: Option<String>,
    /// Whether the answer reveal was scheduled
    pub answer_scheduled: bool,
}

/// Trait for social network publishers
pub trait Publisher {
    /// Returns the publisher name (e.g., "mastodon")
    fn name(&self) -> &'static str;

    /// Post the map and its poll
    fn publish(&self, poll: &PollSpec) -> Result<PublishReceipt>;
}
