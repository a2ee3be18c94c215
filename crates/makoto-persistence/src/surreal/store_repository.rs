//! SurrealDB Store Repository Implementation

use async_trait::async_trait;
use tracing::debug;

use makoto_domain::{
    errors::DomainResult,
    repositories::{Page, StoreRepository},
    store::{Store, StoreListing, StoreSearchFilter},
    value_objects::{Area, Pagination, Prefecture, SortKey, StoreId},
};

use super::{connection::SharedConnection, count, remove, select, upsert};
use crate::{
    document::{encode, fields, CollectionNames, StoreDocument, StoreListingDocument},
    id::ObjectId,
    query::{self, Filter, Pipeline},
};

/// SurrealDB implementation of [`StoreRepository`]
pub struct SurrealStoreRepository {
    connection: SharedConnection,
    collections: CollectionNames,
}

impl SurrealStoreRepository {
    /// Create a new SurrealDB store repository
    pub fn new(connection: SharedConnection) -> Self {
        Self::with_collections(connection, CollectionNames::default())
    }

    pub fn with_collections(connection: SharedConnection, collections: CollectionNames) -> Self {
        Self {
            connection,
            collections,
        }
    }

    fn table(&self) -> &str {
        &self.collections.stores
    }

    async fn list(&self, pipeline: &Pipeline) -> DomainResult<Vec<Store>> {
        let docs: Vec<StoreDocument> = select(&self.connection, self.table(), pipeline).await?;
        docs.into_iter()
            .map(|doc| Ok(doc.into_store(self.table())?))
            .collect()
    }

    async fn list_by(&self, filter: Filter, page: Pagination) -> DomainResult<Vec<Store>> {
        let pipeline = Pipeline::matching(filter)
            .sort(query::store_listing_sort())
            .paginate(page);
        self.list(&pipeline).await
    }
}

#[async_trait]
impl StoreRepository for SurrealStoreRepository {
    async fn save(&self, store: &Store) -> DomainResult<()> {
        debug!("Saving store {} to SurrealDB", store.id());
        let doc = encode(&StoreDocument::from(store))?;
        upsert(&self.connection, self.table(), store.id().value(), doc).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &StoreId) -> DomainResult<Option<Store>> {
        debug!("Finding store by id: {}", id);
        Ok(self.list(&query::by_id(id.value())).await?.into_iter().next())
    }

    async fn find_by_prefecture(
        &self,
        prefecture: Prefecture,
        page: Pagination,
    ) -> DomainResult<Vec<Store>> {
        debug!("Finding stores by prefecture: {}", prefecture);
        self.list_by(Filter::live().eq(fields::PREFECTURE, prefecture.value()), page)
            .await
    }

    async fn find_by_area(&self, area: Area, page: Pagination) -> DomainResult<Vec<Store>> {
        debug!("Finding stores by area: {}", area);
        self.list_by(Filter::live().eq(fields::AREA, area.value()), page)
            .await
    }

    async fn search(
        &self,
        filter: &StoreSearchFilter,
        sort: SortKey,
        page: Pagination,
    ) -> DomainResult<Page<StoreListing>> {
        debug!("Searching stores: {:?} sort={} page={:?}", filter, sort, page);

        let total = count(&self.connection, self.table(), &query::store_filter(filter)).await?;
        let pipeline = query::store_search_pipeline(filter, sort, page, &self.collections.surveys);
        let rows: Vec<StoreListingDocument> = select(&self.connection, self.table(), &pipeline).await?;

        let items = rows
            .into_iter()
            .map(|row| Ok(row.into_listing(self.table())?))
            .collect::<DomainResult<Vec<_>>>()?;
        Ok(Page::new(items, total))
    }

    async fn delete(&self, id: &StoreId) -> DomainResult<()> {
        debug!("Deleting store: {}", id);
        remove(&self.connection, self.table(), id.value()).await?;
        Ok(())
    }

    fn next_id(&self) -> StoreId {
        StoreId::from_bytes(ObjectId::new().bytes())
    }
}
