//! In-Memory Store Repository Implementation

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use makoto_domain::{
    errors::DomainResult,
    repositories::{Page, StoreRepository},
    store::{Store, StoreListing, StoreSearchFilter},
    value_objects::{Area, Pagination, Prefecture, SortKey, StoreId},
};

use super::InMemoryDocumentStore;
use crate::{
    document::{decode, encode, fields, CollectionNames, StoreDocument, StoreListingDocument},
    id::ObjectId,
    query::{self, Filter, Pipeline},
};

/// In-memory implementation of [`StoreRepository`]
///
/// # Example
///
/// ```ignore
/// use makoto_persistence::memory::InMemoryStoreRepository;
/// use makoto_domain::repositories::StoreRepository;
/// use std::sync::Arc;
///
/// let repo: Arc<dyn StoreRepository> = Arc::new(InMemoryStoreRepository::new());
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryStoreRepository {
    docs: Arc<InMemoryDocumentStore>,
    collections: CollectionNames,
}

impl Default for InMemoryStoreRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStoreRepository {
    /// Create a repository over its own empty document store
    pub fn new() -> Self {
        Self::with_store(Arc::new(InMemoryDocumentStore::new()))
    }

    /// Create a repository over a shared document store
    pub fn with_store(docs: Arc<InMemoryDocumentStore>) -> Self {
        Self::with_collections(docs, CollectionNames::default())
    }

    pub fn with_collections(docs: Arc<InMemoryDocumentStore>, collections: CollectionNames) -> Self {
        Self { docs, collections }
    }

    /// The document store, for sharing with a survey repository
    pub fn document_store(&self) -> Arc<InMemoryDocumentStore> {
        Arc::clone(&self.docs)
    }

    /// Get the current count of stored documents, deleted ones included (for testing)
    pub fn count(&self) -> usize {
        self.docs.len(&self.collections.stores)
    }

    /// Clear all stores (for testing)
    pub fn clear(&self) {
        self.docs.clear(&self.collections.stores);
    }

    fn collection(&self) -> &str {
        &self.collections.stores
    }

    fn list(&self, pipeline: &Pipeline) -> DomainResult<Vec<Store>> {
        self.docs
            .aggregate(self.collection(), pipeline)
            .into_iter()
            .map(|row| {
                let doc: StoreDocument = decode(self.collection(), row)?;
                Ok(doc.into_store(self.collection())?)
            })
            .collect()
    }

    fn list_by(&self, filter: Filter, page: Pagination) -> DomainResult<Vec<Store>> {
        let pipeline = Pipeline::matching(filter)
            .sort(query::store_listing_sort())
            .paginate(page);
        self.list(&pipeline)
    }
}

#[async_trait]
impl StoreRepository for InMemoryStoreRepository {
    async fn save(&self, store: &Store) -> DomainResult<()> {
        debug!("Saving store {} to memory", store.id());
        let doc = encode(&StoreDocument::from(store))?;
        self.docs.upsert(self.collection(), store.id().value(), doc);
        Ok(())
    }

    async fn find_by_id(&self, id: &StoreId) -> DomainResult<Option<Store>> {
        debug!("Finding store by id: {}", id);
        Ok(self.list(&query::by_id(id.value()))?.into_iter().next())
    }

    async fn find_by_prefecture(
        &self,
        prefecture: Prefecture,
        page: Pagination,
    ) -> DomainResult<Vec<Store>> {
        debug!("Finding stores by prefecture: {}", prefecture);
        self.list_by(Filter::live().eq(fields::PREFECTURE, prefecture.value()), page)
    }

    async fn find_by_area(&self, area: Area, page: Pagination) -> DomainResult<Vec<Store>> {
        debug!("Finding stores by area: {}", area);
        self.list_by(Filter::live().eq(fields::AREA, area.value()), page)
    }

    async fn search(
        &self,
        filter: &StoreSearchFilter,
        sort: SortKey,
        page: Pagination,
    ) -> DomainResult<Page<StoreListing>> {
        debug!("Searching stores: {:?} sort={} page={:?}", filter, sort, page);

        let total = self.docs.count(self.collection(), &query::store_filter(filter));
        let pipeline = query::store_search_pipeline(filter, sort, page, &self.collections.surveys);

        let items = self
            .docs
            .aggregate(self.collection(), &pipeline)
            .into_iter()
            .map(|row| {
                let doc: StoreListingDocument = decode(self.collection(), row)?;
                Ok(doc.into_listing(self.collection())?)
            })
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(Page::new(items, total))
    }

    async fn delete(&self, id: &StoreId) -> DomainResult<()> {
        debug!("Deleting store: {}", id);
        self.docs.remove(self.collection(), id.value());
        Ok(())
    }

    fn next_id(&self) -> StoreId {
        StoreId::from_bytes(ObjectId::new().bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use makoto_domain::value_objects::{Industry, Name, Timestamp};

    fn at(secs: i64) -> Timestamp {
        Timestamp::new(Utc.timestamp_opt(secs, 0).unwrap()).unwrap()
    }

    fn store(repo: &InMemoryStoreRepository, name: &str, created: i64) -> Store {
        Store::builder(
            repo.next_id(),
            Name::new(name).unwrap(),
            Prefecture::TOKYO,
            Industry::SOAPLAND,
        )
        .try_with_area("吉原")
        .with_created_at(at(created))
        .build()
        .unwrap()
    }

    #[tokio::test]
    async fn test_save_and_find_by_id() {
        let repo = InMemoryStoreRepository::new();
        let s = store(&repo, "Club", 1_700_000_000);

        repo.save(&s).await.unwrap();

        let found = repo.find_by_id(s.id()).await.unwrap();
        assert_eq!(found, Some(s));
    }

    #[tokio::test]
    async fn test_find_by_id_not_found() {
        let repo = InMemoryStoreRepository::new();
        let id = repo.next_id();

        assert!(repo.find_by_id(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_is_idempotent_upsert() {
        let repo = InMemoryStoreRepository::new();
        let s = store(&repo, "Club", 1_700_000_000);

        repo.save(&s).await.unwrap();
        repo.save(&s).await.unwrap();
        let renamed = s.to_builder().with_name(Name::new("Renamed").unwrap()).build().unwrap();
        repo.save(&renamed).await.unwrap();

        assert_eq!(repo.count(), 1);
        let found = repo.find_by_id(s.id()).await.unwrap().unwrap();
        assert_eq!(found.name().value(), "Renamed");
    }

    #[tokio::test]
    async fn test_soft_deleted_store_is_hidden() {
        let repo = InMemoryStoreRepository::new();
        let s = store(&repo, "Club", 1_700_000_000);
        let deleted = s.to_builder().with_deleted_at(Timestamp::now()).build().unwrap();
        repo.save(&deleted).await.unwrap();

        assert!(repo.find_by_id(s.id()).await.unwrap().is_none());
        let page = repo
            .search(&StoreSearchFilter::new(), SortKey::default(), Pagination::default())
            .await
            .unwrap();
        assert_eq!(page.total, 0);
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_find_by_area_newest_first() {
        let repo = InMemoryStoreRepository::new();
        let older = store(&repo, "Older", 1_700_000_000);
        let newer = store(&repo, "Newer", 1_700_000_500);
        repo.save(&older).await.unwrap();
        repo.save(&newer).await.unwrap();

        let found = repo.find_by_area(Area::YOSHIWARA, Pagination::new(1, 10)).await.unwrap();
        let names: Vec<&str> = found.iter().map(|s| s.name().value()).collect();
        assert_eq!(names, ["Newer", "Older"]);

        let none = repo.find_by_area(Area::NAKASU, Pagination::new(1, 10)).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_find_by_prefecture_paginates() {
        let repo = InMemoryStoreRepository::new();
        for i in 0..5 {
            repo.save(&store(&repo, &format!("Club {i}"), 1_700_000_000 + i))
                .await
                .unwrap();
        }

        let second = repo
            .find_by_prefecture(Prefecture::TOKYO, Pagination::new(2, 2))
            .await
            .unwrap();
        let names: Vec<&str> = second.iter().map(|s| s.name().value()).collect();
        assert_eq!(names, ["Club 2", "Club 1"]);
    }

    #[tokio::test]
    async fn test_search_keyword_total_ignores_pagination() {
        let repo = InMemoryStoreRepository::new();
        for name in ["Night Club", "night club 2", "Bar"] {
            repo.save(&store(&repo, name, 1_700_000_000)).await.unwrap();
        }

        let page = repo
            .search(
                &StoreSearchFilter::new().with_keyword("CLUB"),
                SortKey::NEWEST,
                Pagination::new(1, 1),
            )
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].stats.survey_count, 0);
    }

    #[tokio::test]
    async fn test_delete_is_physical_and_tolerates_absent() {
        let repo = InMemoryStoreRepository::new();
        let s = store(&repo, "Club", 1_700_000_000);
        repo.save(&s).await.unwrap();

        repo.delete(s.id()).await.unwrap();
        repo.delete(s.id()).await.unwrap();
        assert_eq!(repo.count(), 0);
    }

    #[tokio::test]
    async fn test_corrupt_document_aborts_read() {
        let repo = InMemoryStoreRepository::new();
        let s = store(&repo, "Club", 1_700_000_000);
        let mut doc = serde_json::to_value(StoreDocument::from(&s)).unwrap();
        doc["industry"] = "casino".into();
        repo.document_store().upsert("stores", s.id().value(), doc);

        let err = repo.find_by_id(s.id()).await.unwrap_err();
        assert_eq!(err.kind(), makoto_domain::errors::ErrorKind::CorruptRecord);
    }

    #[test]
    fn test_next_id_is_unique() {
        let repo = InMemoryStoreRepository::new();
        assert_ne!(repo.next_id(), repo.next_id());
    }
}
