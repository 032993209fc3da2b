//! Per-source pagination state

use crate::domain::ports::Page;

/// Where a source's pagination currently stands.
///
/// One tracker per source. Starts at the beginning with `has_more = true`
/// and is only advanced from a completed fetch round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorTracker {
    last_id: Option<String>,
    has_more: bool,
}

impl Default for CursorTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorTracker {
    pub fn new() -> Self {
        Self {
            last_id: None,
            has_more: true,
        }
    }

    pub fn last_id(&self) -> Option<&str> {
        self.last_id.as_deref()
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Cursor to send with the next request
    pub fn cursor(&self) -> Option<String> {
        self.last_id.clone()
    }

    /// Record the outcome of a fetch from this source.
    ///
    /// A page without a `last_id` (an empty page) keeps the current cursor
    /// instead of rewinding to the beginning.
    pub fn advance<T>(&mut self, page: &Page<T>) {
        if let Some(id) = &page.last_id {
            self.last_id = Some(id.clone());
        }
        self.has_more = page.has_more;
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
