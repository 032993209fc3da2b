//! Paged content source port
//!
//! Each content type the feed draws from implements this trait.
//! Implementations are provided by adapters (PostgreSQL, hosted REST API).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{ArticleItem, PortfolioItem};
use crate::error::DomainError;

/// Column a source orders its pages by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    CreatedAt,
    /// Article publication date
    Date,
}

impl SortField {
    pub fn column_name(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::Date => "date",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    pub fn newest_first(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }
}

/// A request for one page of a source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Id of the last item already seen; `None` starts from the beginning
    pub cursor: Option<String>,
    pub page_size: u64,
    pub sort: Sort,
}

/// One page of results
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    /// Cursor to resume after this page
    pub last_id: Option<String>,
    pub has_more: bool,
}

impl<T> Page<T> {
    /// The page substituted for a source that is not queried in a round
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            last_id: None,
            has_more: false,
        }
    }

    /// Build a page from rows fetched with a limit of `page_size + 1`.
    ///
    /// The extra row only signals that more exist; it is dropped.
    pub fn from_overfetched<R>(mut rows: Vec<R>, page_size: u64, id_of: impl Fn(&R) -> String) -> Self
    where
        T: From<R>,
    {
        let has_more = rows.len() as u64 > page_size;
        rows.truncate(page_size as usize);
        let last_id = rows.last().map(id_of);

        Self {
            data: rows.into_iter().map(T::from).collect(),
            last_id,
            has_more,
        }
    }
}

/// A cursor-paginated content source.
///
/// Feeding `last_id` back as the next `cursor` must yield the following page
/// with no duplicates and no gaps (absent concurrent writes). Callers must
/// stop once a page reports `has_more == false`.
#[async_trait]
pub trait PagedSource: Send + Sync {
    type Item: Send;

    /// Short name used in logs
    fn name(&self) -> &'static str;

    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<Self::Item>, DomainError>;
}

/// Source of portfolio projects
pub type ProjectSource = dyn PagedSource<Item = PortfolioItem>;

/// Source of blog articles
pub type ArticleSource = dyn PagedSource<Item = ArticleItem>;
