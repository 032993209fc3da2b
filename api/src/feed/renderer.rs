//! Feed renderer
//!
//! Renders feed views to readable markdown.

use crate::app::{FeedView, SuppressReason, TriggerResult};
use crate::domain::entities::{FeedItem, FeedPayload};

/// Render a feed view to markdown format
pub fn render_feed(view: &FeedView) -> String {
    let mut buf = String::new();

    buf.push_str("# Feed\n\n");

    // Errors first, the list below is whatever was loaded before the failure
    if let Some(error) = &view.error {
        buf.push_str(&format!("> **Error:** {}\n\n", error));
    }

    if view.items.is_empty() {
        if view.is_loading {
            buf.push_str("_Loading..._\n");
        } else {
            buf.push_str("_Nothing here yet._\n");
        }
        return buf;
    }

    for (i, item) in view.items.iter().enumerate() {
        buf.push_str(&render_item(i + 1, item));
        buf.push('\n');
    }

    buf.push_str("---\n\n");
    if view.is_loading_more {
        buf.push_str("_Loading more..._\n");
    } else if view.has_more {
        buf.push_str("_More items available._\n");
    } else {
        buf.push_str("_End of feed._\n");
    }

    buf
}

fn render_item(n: usize, item: &FeedItem) -> String {
    let date = item.created_at.format("%Y-%m-%d");

    match &item.payload {
        FeedPayload::Project(project) => {
            let mut out = format!("{}. [PROJECT] {} ({})\n", n, project.title, date);
            if let Some(desc) = &project.description {
                out.push_str(&format!("    {}\n", truncate(desc, 80)));
            }
            if !project.tags.is_empty() {
                out.push_str(&format!("    Tags: {}\n", project.tags.join(", ")));
            }
            out
        }
        FeedPayload::Article(article) => {
            let mut out = format!("{}. [ARTICLE] {} ({})\n", n, article.title, date);
            if let Some(excerpt) = &article.excerpt {
                out.push_str(&format!("    {}\n", truncate(excerpt, 80)));
            }
            if let Some(slug) = &article.slug {
                out.push_str(&format!("    /blog/{}\n", slug));
            }
            out
        }
    }
}

/// One-line status for a scroll trigger result
pub fn render_trigger(result: &TriggerResult) -> String {
    match result {
        TriggerResult::Triggered => "Loaded more items.".to_string(),
        TriggerResult::Suppressed(SuppressReason::Loading) => {
            "Feed is still loading, try again shortly.".to_string()
        }
        TriggerResult::Suppressed(SuppressReason::LoadingMore) => {
            "Already loading more items.".to_string()
        }
        TriggerResult::Suppressed(SuppressReason::NoMore) => "No more items.".to_string(),
    }
}

/// Truncate to at most `max_len` characters
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
