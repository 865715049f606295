//! Core list logic for the dashweb admin views
//!
//! - debounce: quiet-interval search input
//! - pagination: pager window with ellipses
//! - controller: paged fetch lifecycle with stale-response suppression
//!
//! Storage lives behind [`PageSource`]; this crate never touches data directly.

pub mod controller;
pub mod debounce;
pub mod error;
pub mod models;
pub mod pagination;
pub mod types;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use controller::{
    ControllerOptions, FetchOutcome, ListController, ListPhase, ListSnapshot, ListState,
    PageRequest, SearchQuery,
};
pub use debounce::Debouncer;
pub use error::{CoreError, CoreResult, ErrorCode, ErrorDetails, ErrorSeverity};
pub use models::{Transaction, User};
pub use pagination::{page_tokens, PageToken, PaginationWindow};
pub use types::{PaymentMethod, SubscriptionStatus, TransactionStatus};

/// A record that can be listed, searched and deleted
pub trait ListItem: Clone + Send + Sync + 'static {
    /// Stable identifier used by delete
    fn id(&self) -> &str;

    /// Match against an already lower-cased needle
    fn matches(&self, needle: &str) -> bool;

    /// Case-insensitive search; an empty term matches everything
    fn matches_term(&self, term: &str) -> bool {
        term.is_empty() || self.matches(&term.to_lowercase())
    }
}

/// One page of results as returned by a backing collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub total_pages: usize,
    pub total_count: usize,
}

/// Source reference type
pub type SourceRef<T> = Arc<dyn PageSource<T>>;

/// Backing collection consumed by the list controller.
///
/// Implementations must tolerate overlapping calls; the controller issues a
/// new fetch without waiting for earlier ones to resolve.
#[async_trait]
pub trait PageSource<T>: Send + Sync {
    /// Fetch page `page` (1-based) of the items matching `term`
    async fn fetch_page(&self, page: usize, term: &str) -> CoreResult<PageResponse<T>>;

    /// Remove one item
    async fn delete_item(&self, id: &str) -> CoreResult<()>;
}
