//! Feed controller
//!
//! Drives fetch rounds against the two content sources and owns the state a
//! rendering layer reads: the merged item list plus loading/error flags.
//!
//! A round queries both sources concurrently, waits for both, and then
//! applies the result in one step. Rounds never overlap: `load_more` is
//! refused while any round is in flight and initial/refresh rounds are
//! refused while another initial/refresh round is in flight. A refresh may
//! start while a `load_more` is pending; every round carries the generation
//! it was issued under and results from a superseded generation are dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use super::cursor_tracker::CursorTracker;
use super::feed_merger::merge;
use crate::config::DEFAULT_PAGE_SIZE;
use crate::domain::entities::{ArticleItem, FeedItem, PortfolioItem};
use crate::domain::ports::{Page, PageRequest, PagedSource, Sort, SortField};
use crate::error::DomainError;

/// Query parameters shared by every round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedSettings {
    pub page_size: u64,
    pub project_sort: Sort,
    pub article_sort: Sort,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            project_sort: Sort::newest_first(SortField::CreatedAt),
            article_sort: Sort::newest_first(SortField::Date),
        }
    }
}

impl FeedSettings {
    pub fn with_page_size(page_size: u64) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }
}

/// Read-only snapshot handed to the rendering layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedView {
    pub items: Vec<FeedItem>,
    pub is_loading: bool,
    pub is_loading_more: bool,
    pub has_more: bool,
    pub error: Option<String>,
}

/// Coarse lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedPhase {
    /// Nothing fetched yet
    Idle,
    /// Initial load or refresh in flight
    Loading,
    /// A load-more round in flight
    LoadingMore,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundKind {
    /// Initial load or refresh: replaces the list
    Initial,
    /// Next pages: appends to the list
    More,
}

/// Why a requested round was not started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyLoading,
    AlreadyLoadingMore,
    Exhausted,
}

/// What became of a requested round
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Results were merged into the list
    Applied { added: usize },
    /// A guard refused to start the round
    Skipped(SkipReason),
    /// The round finished after a newer round superseded it
    Discarded,
    /// A source failed; nothing was changed but the error message
    Failed(String),
}

#[derive(Debug)]
struct FeedState {
    projects: CursorTracker,
    articles: CursorTracker,
    items: Vec<FeedItem>,
    loading: bool,
    loading_more: bool,
    has_more: bool,
    error: Option<String>,
    generation: u64,
    loaded: bool,
}

impl FeedState {
    fn new() -> Self {
        Self {
            projects: CursorTracker::new(),
            articles: CursorTracker::new(),
            items: Vec::new(),
            loading: false,
            loading_more: false,
            has_more: true,
            error: None,
            generation: 0,
            loaded: false,
        }
    }
}

/// Requests captured under the lock when a round starts
#[derive(Debug)]
struct RoundPlan {
    kind: RoundKind,
    generation: u64,
    projects: Option<PageRequest>,
    articles: Option<PageRequest>,
}

/// Controller merging projects and articles into one infinite feed
pub struct FeedController<P, A>
where
    P: PagedSource<Item = PortfolioItem> + ?Sized,
    A: PagedSource<Item = ArticleItem> + ?Sized,
{
    projects: Arc<P>,
    articles: Arc<A>,
    settings: FeedSettings,
    state: Mutex<FeedState>,
}

impl<P, A> FeedController<P, A>
where
    P: PagedSource<Item = PortfolioItem> + ?Sized,
    A: PagedSource<Item = ArticleItem> + ?Sized,
{
    pub fn new(projects: Arc<P>, articles: Arc<A>, settings: FeedSettings) -> Self {
        Self {
            projects,
            articles,
            settings,
            state: Mutex::new(FeedState::new()),
        }
    }

    /// First fetch after mounting. Replaces the list.
    pub async fn load_initial(&self) -> RoundOutcome {
        match self.begin_initial(false) {
            Ok(plan) => self.run_round(plan).await,
            Err(reason) => RoundOutcome::Skipped(reason),
        }
    }

    /// Reset both cursors and load from scratch. Replaces the list.
    pub async fn refresh(&self) -> RoundOutcome {
        match self.begin_initial(true) {
            Ok(plan) => self.run_round(plan).await,
            Err(reason) => RoundOutcome::Skipped(reason),
        }
    }

    /// Fetch the next page of every source that still has more. Appends.
    pub async fn load_more(&self) -> RoundOutcome {
        match self.begin_more() {
            Ok(plan) => self.run_round(plan).await,
            Err(reason) => RoundOutcome::Skipped(reason),
        }
    }

    pub fn view(&self) -> FeedView {
        let state = self.state();
        FeedView {
            items: state.items.clone(),
            is_loading: state.loading,
            is_loading_more: state.loading_more,
            has_more: state.has_more,
            error: state.error.clone(),
        }
    }

    pub fn phase(&self) -> FeedPhase {
        let state = self.state();
        if state.loading {
            FeedPhase::Loading
        } else if state.loading_more {
            FeedPhase::LoadingMore
        } else if state.loaded {
            FeedPhase::Ready
        } else {
            FeedPhase::Idle
        }
    }

    /// Current (projects, articles) trackers
    pub fn trackers(&self) -> (CursorTracker, CursorTracker) {
        let state = self.state();
        (state.projects.clone(), state.articles.clone())
    }

    fn state(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin_initial(&self, reset: bool) -> Result<RoundPlan, SkipReason> {
        let mut state = self.state();
        if state.loading {
            return Err(SkipReason::AlreadyLoading);
        }

        state.generation += 1;
        state.loading = true;
        // A pending load-more belongs to the old generation now
        state.loading_more = false;
        state.error = None;

        // Trackers are only reset once the round succeeds
        let plan = RoundPlan {
            kind: RoundKind::Initial,
            generation: state.generation,
            projects: Some(self.request(None, self.settings.project_sort)),
            articles: Some(self.request(None, self.settings.article_sort)),
        };
        tracing::debug!(generation = plan.generation, reset, "feed round started");
        Ok(plan)
    }

    fn begin_more(&self) -> Result<RoundPlan, SkipReason> {
        let mut state = self.state();
        if state.loading_more {
            return Err(SkipReason::AlreadyLoadingMore);
        }
        if state.loading {
            return Err(SkipReason::AlreadyLoading);
        }
        if !state.has_more {
            return Err(SkipReason::Exhausted);
        }

        state.loading_more = true;

        let plan = RoundPlan {
            kind: RoundKind::More,
            generation: state.generation,
            projects: state
                .projects
                .has_more()
                .then(|| self.request(state.projects.cursor(), self.settings.project_sort)),
            articles: state
                .articles
                .has_more()
                .then(|| self.request(state.articles.cursor(), self.settings.article_sort)),
        };
        tracing::debug!(
            generation = plan.generation,
            projects = plan.projects.is_some(),
            articles = plan.articles.is_some(),
            "feed load-more started"
        );
        Ok(plan)
    }

    fn request(&self, cursor: Option<String>, sort: Sort) -> PageRequest {
        PageRequest {
            cursor,
            page_size: self.settings.page_size,
            sort,
        }
    }

    async fn run_round(&self, plan: RoundPlan) -> RoundOutcome {
        let projects = async {
            match &plan.projects {
                Some(request) => self
                    .projects
                    .fetch_page(request)
                    .await
                    .map(Some)
                    .map_err(|e| {
                        tracing::warn!(source = self.projects.name(), error = %e, "source fetch failed");
                        e
                    }),
                None => Ok(None),
            }
        };
        let articles = async {
            match &plan.articles {
                Some(request) => self
                    .articles
                    .fetch_page(request)
                    .await
                    .map(Some)
                    .map_err(|e| {
                        tracing::warn!(source = self.articles.name(), error = %e, "source fetch failed");
                        e
                    }),
                None => Ok(None),
            }
        };

        let result: Result<(Option<Page<PortfolioItem>>, Option<Page<ArticleItem>>), DomainError> =
            tokio::try_join!(projects, articles);

        let mut state = self.state();
        if state.generation != plan.generation {
            tracing::debug!(
                round = plan.generation,
                current = state.generation,
                "discarding superseded feed round"
            );
            return RoundOutcome::Discarded;
        }

        match plan.kind {
            RoundKind::Initial => state.loading = false,
            RoundKind::More => state.loading_more = false,
        }

        let (project_page, article_page) = match result {
            Ok(pages) => pages,
            Err(e) => {
                tracing::warn!("Feed round failed: {}", e);
                let message = format!("Failed to load feed: {}", e);
                state.error = Some(message.clone());
                return RoundOutcome::Failed(message);
            }
        };

        if plan.kind == RoundKind::Initial {
            state.projects.reset();
            state.articles.reset();
        }
        if let Some(page) = &project_page {
            state.projects.advance(page);
        }
        if let Some(page) = &article_page {
            state.articles.advance(page);
        }

        let merged = merge(
            project_page.unwrap_or_else(Page::empty).data,
            article_page.unwrap_or_else(Page::empty).data,
        );
        let added = merged.len();

        match plan.kind {
            RoundKind::Initial => state.items = merged,
            RoundKind::More => state.items.extend(merged),
        }
        state.has_more = state.projects.has_more() || state.articles.has_more();
        state.error = None;
        state.loaded = true;

        tracing::info!(
            added,
            total = state.items.len(),
            has_more = state.has_more,
            "feed round applied"
        );
        RoundOutcome::Applied { added }
    }
}
