//! Store Application Service
//!
//! Thin use-case layer over [`StoreRepository`]. Every call runs under a
//! [`RequestContext`].

use std::sync::Arc;

use tracing::info;

use makoto_domain::{
    repositories::{Page, StoreRepository},
    store::{Store, StoreListing, StoreSearchFilter},
    value_objects::{Area, Pagination, Prefecture, SortKey, StoreId, Timestamp},
};

use crate::context::RequestContext;
use crate::dto::StoreInput;
use crate::errors::{ApplicationError, ApplicationResult};

/// Store Application Service
///
/// Stateless: all mutable state is persisted via the repository.
pub struct StoreService<R>
where
    R: StoreRepository,
{
    repository: Arc<R>,
}

impl<R> Clone for StoreService<R>
where
    R: StoreRepository,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R> StoreService<R>
where
    R: StoreRepository,
{
    /// Create a new StoreService with injected dependencies
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Allocate an identity for a new store
    pub fn next_id(&self) -> StoreId {
        self.repository.next_id()
    }

    /// Upsert a store
    pub async fn save(&self, ctx: &RequestContext, store: Option<&Store>) -> ApplicationResult<()> {
        let store = store.ok_or(ApplicationError::MissingAggregate("store"))?;
        ctx.run(self.repository.save(store)).await
    }

    pub async fn create(&self, ctx: &RequestContext, store: Option<&Store>) -> ApplicationResult<()> {
        self.save(ctx, store).await?;
        if let Some(store) = store {
            info!("Created store {}", store.id());
        }
        Ok(())
    }

    pub async fn update(&self, ctx: &RequestContext, store: Option<&Store>) -> ApplicationResult<()> {
        self.save(ctx, store).await?;
        if let Some(store) = store {
            info!("Updated store {}", store.id());
        }
        Ok(())
    }

    /// Validate `input` into a new store and persist it
    pub async fn create_from_input(
        &self,
        ctx: &RequestContext,
        input: StoreInput,
    ) -> ApplicationResult<Store> {
        let store = input.into_store(self.next_id())?;
        self.create(ctx, Some(&store)).await?;
        Ok(store)
    }

    /// Replace a live store's fields, keeping its creation time
    pub async fn update_from_input(
        &self,
        ctx: &RequestContext,
        id: &StoreId,
        input: StoreInput,
    ) -> ApplicationResult<Store> {
        let existing = self
            .find_by_id(ctx, id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("store", id.value()))?;

        let replacement = input.into_store(id.clone())?;
        let store = replacement
            .to_builder()
            .with_created_at(existing.created_at())
            .with_updated_at(Timestamp::now())
            .build()?;

        self.update(ctx, Some(&store)).await?;
        Ok(store)
    }

    pub async fn find_by_id(&self, ctx: &RequestContext, id: &StoreId) -> ApplicationResult<Option<Store>> {
        ctx.run(self.repository.find_by_id(id)).await
    }

    pub async fn find_by_prefecture(
        &self,
        ctx: &RequestContext,
        prefecture: Prefecture,
        page: Pagination,
    ) -> ApplicationResult<Vec<Store>> {
        ctx.run(self.repository.find_by_prefecture(prefecture, page)).await
    }

    pub async fn find_by_area(
        &self,
        ctx: &RequestContext,
        area: Area,
        page: Pagination,
    ) -> ApplicationResult<Vec<Store>> {
        ctx.run(self.repository.find_by_area(area, page)).await
    }

    /// Filtered listing with survey statistics
    pub async fn search(
        &self,
        ctx: &RequestContext,
        filter: &StoreSearchFilter,
        sort: SortKey,
        page: Pagination,
    ) -> ApplicationResult<Page<StoreListing>> {
        ctx.run(self.repository.search(filter, sort, page)).await
    }

    /// Physically remove a store (administrative path)
    pub async fn delete(&self, ctx: &RequestContext, id: &StoreId) -> ApplicationResult<()> {
        ctx.run(self.repository.delete(id)).await?;
        info!("Deleted store {}", id);
        Ok(())
    }

    /// Mark a store deleted so reads stop returning it
    pub async fn soft_delete(&self, ctx: &RequestContext, id: &StoreId) -> ApplicationResult<()> {
        let store = self
            .find_by_id(ctx, id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("store", id.value()))?;

        let now = Timestamp::now();
        let deleted = store.to_builder().with_deleted_at(now).with_updated_at(now).build()?;
        ctx.run(self.repository.save(&deleted)).await?;
        info!("Soft-deleted store {}", id);
        Ok(())
    }
}
