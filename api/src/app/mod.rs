//! Application layer
//!
//! The feed core and the services around it.
//! Services coordinate between domain entities and the source ports.

pub mod cursor_tracker;
pub mod feed_controller;
pub mod feed_merger;
pub mod feed_sessions;
pub mod retry;
pub mod scroll_trigger;

pub use feed_controller::{FeedSettings, FeedView};
pub use feed_sessions::{DynFeedController, FeedSessions};
pub use retry::{RetryPolicy, RetryingSource};
pub use scroll_trigger::{ScrollTrigger, SuppressReason, TriggerResult};
