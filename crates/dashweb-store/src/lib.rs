//! In-memory backing collections for the dashweb list views
//!
//! [`MemoryCollection`] answers page and delete requests from a vector held
//! in memory, optionally after a simulated round-trip delay.

pub mod seed;

use async_trait::async_trait;
use dashweb_core::{CoreError, CoreResult, ListItem, PageResponse, PageSource};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

/// A searchable, deletable collection held in memory
#[derive(Debug)]
pub struct MemoryCollection<T> {
    items: RwLock<Vec<T>>,
    items_per_page: usize,
    latency: Duration,
}

impl<T: ListItem> MemoryCollection<T> {
    /// Collection that answers immediately. A page size of zero is treated as one.
    pub fn new(items: Vec<T>, items_per_page: usize) -> Self {
        Self {
            items: RwLock::new(items),
            items_per_page: items_per_page.max(1),
            latency: Duration::ZERO,
        }
    }

    /// Collection that waits `latency` before answering each call
    pub fn with_latency(items: Vec<T>, items_per_page: usize, latency: Duration) -> Self {
        Self {
            latency,
            ..Self::new(items, items_per_page)
        }
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn len(&self) -> usize {
        self.items.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Page through the items matching `term` without any delay
    pub fn page(&self, page: usize, term: &str) -> PageResponse<T> {
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        let matching: Vec<&T> = items.iter().filter(|item| item.matches_term(term)).collect();

        let total_count = matching.len();
        let total_pages = (total_count + self.items_per_page - 1) / self.items_per_page;
        let start = page.saturating_sub(1).saturating_mul(self.items_per_page);

        PageResponse {
            items: matching
                .into_iter()
                .skip(start)
                .take(self.items_per_page)
                .cloned()
                .collect(),
            total_pages,
            total_count,
        }
    }

    /// Remove the item with `id`
    pub fn remove(&self, id: &str) -> CoreResult<T> {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        let index = items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| CoreError::ItemNotFound { id: id.to_string() })?;
        Ok(items.remove(index))
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl<T: ListItem + DeserializeOwned> MemoryCollection<T> {
    /// Load a collection from a JSON array of records
    pub async fn from_json_file(
        path: impl AsRef<Path>,
        items_per_page: usize,
        latency: Duration,
    ) -> CoreResult<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;
        let items: Vec<T> = serde_json::from_str(&content).map_err(|e| CoreError::InvalidFixture {
            message: format!("{}: {}", path.display(), e),
        })?;

        log::info!(target: "dashweb::store", "loaded {} records from {}", items.len(), path.display());
        Ok(Self::with_latency(items, items_per_page, latency))
    }
}

#[async_trait]
impl<T: ListItem> PageSource<T> for MemoryCollection<T> {
    async fn fetch_page(&self, page: usize, term: &str) -> CoreResult<PageResponse<T>> {
        self.simulate_latency().await;
        let response = self.page(page, term);
        log::debug!(
            target: "dashweb::store",
            "page {} of {} for '{}' ({} matches)",
            page,
            response.total_pages,
            term,
            response.total_count
        );
        Ok(response)
    }

    async fn delete_item(&self, id: &str) -> CoreResult<()> {
        self.simulate_latency().await;
        self.remove(id)?;
        log::info!(target: "dashweb::store", "deleted {}", id);
        Ok(())
    }
}
