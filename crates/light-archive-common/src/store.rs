//! Record store interface for archive rows

use async_trait::async_trait;

use crate::{
    error::Result,
    types::{ArchiveCategory, ArchiveItem, ArchiveStatus, ArchiveUpdate, NewArchive, Pagination},
};

/// Full-text search parameters
#[derive(Debug, Clone)]
pub struct ArchiveSearchParams {
    /// Substring matched case-insensitively against title, description and content
    pub query: String,
    pub category: Option<ArchiveCategory>,
    pub pagination: Pagination,
}

/// Listing parameters
#[derive(Debug, Clone, Default)]
pub struct ArchiveListParams {
    pub category: Option<ArchiveCategory>,
    pub status: Option<ArchiveStatus>,
    pub pagination: Pagination,
}

/// Access to the `archive_items` table.
///
/// Searches and listings are ordered newest first by `created_at`.
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    /// Check if the store is reachable
    async fn health_check(&self) -> Result<bool>;

    async fn get(&self, id: &str) -> Result<Option<ArchiveItem>>;

    /// Search published archives
    async fn search(&self, params: &ArchiveSearchParams) -> Result<Vec<ArchiveItem>>;

    async fn list(&self, params: &ArchiveListParams) -> Result<Vec<ArchiveItem>>;

    /// Insert a record and return it as stored
    async fn insert(&self, archive: &NewArchive) -> Result<ArchiveItem>;

    /// Apply `update` and stamp `updated_at`. `None` if no row has `id`.
    async fn update(&self, id: &str, update: &ArchiveUpdate) -> Result<Option<ArchiveItem>>;

    /// Every published archive except `id`; the candidate pool for ranking
    async fn published_excluding(&self, id: &str) -> Result<Vec<ArchiveItem>>;
}
