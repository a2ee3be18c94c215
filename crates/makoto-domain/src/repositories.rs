//! Repository interfaces for data persistence
//!
//! The domain layer defines only the contracts. Implementations live in the
//! persistence crate and must re-validate every document into an aggregate
//! before handing it back.
//!
//! Common rules for every implementation:
//! - soft-deleted records never appear in reads
//! - a missing record is `Ok(None)`, not an error
//! - `total` on a [`Page`] counts the filter before pagination

use async_trait::async_trait;

use crate::{
    errors::DomainResult,
    store::{Store, StoreListing, StoreSearchFilter},
    survey::{Survey, SurveySearchFilter},
    value_objects::*,
};

/// One page of a listing plus the size of the whole result
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }

    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

/// Repository for store aggregates
#[async_trait]
pub trait StoreRepository: Send + Sync {
    /// Upsert by identity, replacing the whole document
    async fn save(&self, store: &Store) -> DomainResult<()>;

    /// Find a live store by ID
    async fn find_by_id(&self, id: &StoreId) -> DomainResult<Option<Store>>;

    /// Stores in a prefecture, newest first
    async fn find_by_prefecture(
        &self,
        prefecture: Prefecture,
        page: Pagination,
    ) -> DomainResult<Vec<Store>>;

    /// Stores in an area, newest first
    async fn find_by_area(&self, area: Area, page: Pagination) -> DomainResult<Vec<Store>>;

    /// Filtered listing with per-store survey statistics
    async fn search(
        &self,
        filter: &StoreSearchFilter,
        sort: SortKey,
        page: Pagination,
    ) -> DomainResult<Page<StoreListing>>;

    /// Physically remove a store; absent IDs are not an error
    async fn delete(&self, id: &StoreId) -> DomainResult<()>;

    /// Allocate a fresh identity from the backing store
    fn next_id(&self) -> StoreId;
}

/// Repository for survey aggregates
#[async_trait]
pub trait SurveyRepository: Send + Sync {
    /// Upsert by identity, replacing the whole document
    async fn save(&self, survey: &Survey) -> DomainResult<()>;

    /// Find a live survey by ID
    async fn find_by_id(&self, id: &SurveyId) -> DomainResult<Option<Survey>>;

    /// Surveys of one store
    async fn find_by_store(
        &self,
        store_id: &StoreId,
        sort: SortKey,
        page: Pagination,
    ) -> DomainResult<Page<Survey>>;

    /// Surveys whose snapshotted store is in `prefecture`
    async fn find_by_prefecture(
        &self,
        prefecture: Prefecture,
        sort: SortKey,
        page: Pagination,
    ) -> DomainResult<Page<Survey>>;

    /// Filtered listing for the admin screens
    async fn find_admin(
        &self,
        filter: &SurveySearchFilter,
        sort: SortKey,
        page: Pagination,
    ) -> DomainResult<Page<Survey>>;

    /// Every live survey
    async fn find_all(&self, sort: SortKey, page: Pagination) -> DomainResult<Page<Survey>>;

    /// Physically remove a survey; absent IDs are not an error
    async fn delete(&self, id: &SurveyId) -> DomainResult<()>;

    /// Allocate a fresh identity from the backing store
    fn next_id(&self) -> SurveyId;
}
