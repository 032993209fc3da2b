//! Infinite-scroll trigger
//!
//! The rendering layer reports that the sentinel at the end of the list is
//! visible. That signal is level-triggered: it keeps arriving for as long as
//! the sentinel stays on screen, so it only turns into a `load_more` when the
//! feed has more and no round is already running.

use std::sync::Arc;

use serde::Serialize;

use super::feed_controller::{FeedController, RoundOutcome, SkipReason};
use crate::domain::entities::{ArticleItem, PortfolioItem};
use crate::domain::ports::PagedSource;

/// Result of a sentinel signal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum TriggerResult {
    /// A load-more round ran
    Triggered,
    /// Nothing ran
    Suppressed(SuppressReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressReason {
    Loading,
    LoadingMore,
    NoMore,
}

impl From<SkipReason> for SuppressReason {
    fn from(reason: SkipReason) -> Self {
        match reason {
            SkipReason::AlreadyLoading => SuppressReason::Loading,
            SkipReason::AlreadyLoadingMore => SuppressReason::LoadingMore,
            SkipReason::Exhausted => SuppressReason::NoMore,
        }
    }
}

pub struct ScrollTrigger<P, A>
where
    P: PagedSource<Item = PortfolioItem> + ?Sized,
    A: PagedSource<Item = ArticleItem> + ?Sized,
{
    controller: Arc<FeedController<P, A>>,
}

impl<P, A> ScrollTrigger<P, A>
where
    P: PagedSource<Item = PortfolioItem> + ?Sized,
    A: PagedSource<Item = ArticleItem> + ?Sized,
{
    pub fn new(controller: Arc<FeedController<P, A>>) -> Self {
        Self { controller }
    }

    /// The sentinel is in (or near) the viewport
    pub async fn sentinel_visible(&self) -> TriggerResult {
        let view = self.controller.view();
        if view.is_loading {
            return TriggerResult::Suppressed(SuppressReason::Loading);
        }
        if view.is_loading_more {
            return TriggerResult::Suppressed(SuppressReason::LoadingMore);
        }
        if !view.has_more {
            return TriggerResult::Suppressed(SuppressReason::NoMore);
        }

        // The controller re-checks under its lock; a concurrent signal that
        // got past the snapshot above is still refused there
        match self.controller.load_more().await {
            RoundOutcome::Skipped(reason) => TriggerResult::Suppressed(reason.into()),
            RoundOutcome::Applied { .. } | RoundOutcome::Failed(_) | RoundOutcome::Discarded => {
                TriggerResult::Triggered
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::FeedSettings;
    use crate::domain::ports::Page;
    use crate::test_utils::{
        test_article_at, test_project_at, ScriptedArticleSource, ScriptedProjectSource,
    };

    fn project_page(id: &str, has_more: bool) -> Page<PortfolioItem> {
        Page {
            data: vec![test_project_at(id, None)],
            last_id: Some(id.to_string()),
            has_more,
        }
    }

    fn article_page(id: &str, has_more: bool) -> Page<ArticleItem> {
        Page {
            data: vec![test_article_at(id, None)],
            last_id: Some(id.to_string()),
            has_more,
        }
    }

    #[tokio::test]
    async fn triggers_when_more_is_available() {
        let projects = Arc::new(
            ScriptedProjectSource::new()
                .with_page(project_page("p1", true))
                .with_page(project_page("p2", false)),
        );
        let articles = Arc::new(ScriptedArticleSource::new().with_page(article_page("a1", false)));
        let controller = Arc::new(FeedController::new(
            projects.clone(),
            articles.clone(),
            FeedSettings::default(),
        ));
        controller.load_initial().await;

        let trigger = ScrollTrigger::new(controller.clone());

        assert_eq!(trigger.sentinel_visible().await, TriggerResult::Triggered);
        assert_eq!(
            trigger.sentinel_visible().await,
            TriggerResult::Suppressed(SuppressReason::NoMore)
        );
        assert_eq!(projects.call_count(), 2);
        assert_eq!(articles.call_count(), 1);
        assert_eq!(controller.view().items.len(), 3);
    }

    #[tokio::test]
    async fn repeated_signals_while_loading_more_are_suppressed() {
        let projects = Arc::new(
            ScriptedProjectSource::new()
                .with_page(project_page("p1", true))
                .with_page(project_page("p2", true)),
        );
        let articles = Arc::new(ScriptedArticleSource::new().with_page(article_page("a1", false)));
        let controller = Arc::new(FeedController::new(
            projects.clone(),
            articles,
            FeedSettings::default(),
        ));
        controller.load_initial().await;

        let gate = projects.hold_next();
        let trigger = Arc::new(ScrollTrigger::new(controller.clone()));
        let first = tokio::spawn({
            let trigger = trigger.clone();
            async move { trigger.sentinel_visible().await }
        });
        projects.wait_for_calls(2).await;

        for _ in 0..3 {
            assert_eq!(
                trigger.sentinel_visible().await,
                TriggerResult::Suppressed(SuppressReason::LoadingMore)
            );
        }

        gate.release();
        assert_eq!(first.await.unwrap(), TriggerResult::Triggered);
        assert_eq!(projects.call_count(), 2);
    }

    #[test]
    fn serializes_reason() {
        let json =
            serde_json::to_value(TriggerResult::Suppressed(SuppressReason::NoMore)).unwrap();
        assert_eq!(json["status"], "suppressed");
        assert_eq!(json["reason"], "no_more");
        let json = serde_json::to_value(TriggerResult::Triggered).unwrap();
        assert_eq!(json["status"], "triggered");
    }
}
