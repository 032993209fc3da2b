//! Feed module
//!
//! Readable rendering of feed views.

pub mod renderer;

pub use renderer::{render_feed, render_trigger};
