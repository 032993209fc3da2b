//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod paged_source;

pub use paged_source::{
    ArticleSource, Page, PageRequest, PagedSource, ProjectSource, Sort, SortDirection, SortField,
};
