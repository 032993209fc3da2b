//! Mock implementations of the source port
//!
//! - `ScriptedSource` replays a queue of canned responses, records every
//!   request, and can hold a call open until the test releases it.
//! - `InMemorySource` paginates a fixed list with real cursor semantics.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::domain::entities::{ArticleItem, PortfolioItem};
use crate::domain::ports::{Page, PageRequest, PagedSource};
use crate::error::DomainError;

// ============================================================================
// Gate
// ============================================================================

/// Holds a source call open until released
#[derive(Default)]
pub struct Gate {
    released: AtomicBool,
    notify: Notify,
}

impl Gate {
    pub fn release(&self) {
        self.released.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    async fn wait(&self) {
        loop {
            let notified = self.notify.notified();
            if self.released.load(Ordering::SeqCst) {
                return;
            }
            notified.await;
        }
    }
}

// ============================================================================
// Scripted Source
// ============================================================================

pub struct ScriptedSource<T> {
    name: &'static str,
    responses: Mutex<VecDeque<Result<Page<T>, DomainError>>>,
    requests: Mutex<Vec<PageRequest>>,
    gate: Mutex<Option<Arc<Gate>>>,
    called: Notify,
}

pub type ScriptedProjectSource = ScriptedSource<PortfolioItem>;
pub type ScriptedArticleSource = ScriptedSource<ArticleItem>;

impl<T> Default for ScriptedSource<T> {
    fn default() -> Self {
        Self {
            name: "scripted",
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            gate: Mutex::new(None),
            called: Notify::new(),
        }
    }
}

impl<T> ScriptedSource<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful page
    pub fn with_page(self, page: Page<T>) -> Self {
        self.responses.lock().unwrap().push_back(Ok(page));
        self
    }

    /// Queue a failure
    pub fn with_error(self, error: DomainError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    /// Hold the next call open until the returned gate is released
    pub fn hold_next(&self) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Wait until at least `n` calls have been made
    pub async fn wait_for_calls(&self, n: usize) {
        loop {
            let notified = self.called.notified();
            if self.call_count() >= n {
                return;
            }
            notified.await;
        }
    }
}

#[async_trait]
impl<T: Send> PagedSource for ScriptedSource<T> {
    type Item = T;

    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<T>, DomainError> {
        let (response, gate) = {
            self.requests.lock().unwrap().push(request.clone());
            let response = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(DomainError::Internal("script exhausted".to_string())));
            let gate = self.gate.lock().unwrap().take();
            (response, gate)
        };
        self.called.notify_waiters();

        if let Some(gate) = gate {
            gate.wait().await;
        }
        response
    }
}

// ============================================================================
// In-Memory Source
// ============================================================================

/// Serves a fixed list, in the order given, honoring cursors
pub struct InMemorySource<T> {
    items: Vec<T>,
    id_of: fn(&T) -> &str,
}

impl<T> InMemorySource<T> {
    pub fn new(items: Vec<T>, id_of: fn(&T) -> &str) -> Self {
        Self { items, id_of }
    }
}

#[async_trait]
impl<T: Clone + Send + Sync> PagedSource for InMemorySource<T> {
    type Item = T;

    fn name(&self) -> &'static str {
        "in-memory"
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<T>, DomainError> {
        let start = match &request.cursor {
            None => 0,
            Some(cursor) => {
                self.items
                    .iter()
                    .position(|item| (self.id_of)(item) == cursor)
                    .ok_or_else(|| DomainError::InvalidCursor(cursor.clone()))?
                    + 1
            }
        };

        let data: Vec<T> = self
            .items
            .iter()
            .skip(start)
            .take(request.page_size as usize)
            .cloned()
            .collect();
        let has_more = start + data.len() < self.items.len();
        let last_id = data.last().map(|item| (self.id_of)(item).to_string());

        Ok(Page {
            data,
            last_id,
            has_more,
        })
    }
}

/// In-memory project source with one dated item per id, newest first
pub fn in_memory_projects(ids: &[&str]) -> InMemorySource<PortfolioItem> {
    let items: Vec<PortfolioItem> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| super::test_project_at(id, Some(day(i))))
        .collect();
    InMemorySource::new(items, |p| p.id.as_str())
}

/// In-memory article source with one item per id, newest first
pub fn in_memory_articles(ids: &[&str]) -> InMemorySource<ArticleItem> {
    let items: Vec<ArticleItem> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| super::test_article_at(id, Some(day(i))))
        .collect();
    InMemorySource::new(items, |a| a.id.as_str())
}

/// Midnight of 2024-06-30 minus `offset` days
fn day(offset: usize) -> chrono::DateTime<chrono::Utc> {
    super::ts("2024-06-30T00:00:00Z") - chrono::Duration::days(offset as i64)
}
