//! In-Memory Survey Repository Implementation

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use makoto_domain::{
    errors::DomainResult,
    repositories::{Page, SurveyRepository},
    survey::{Survey, SurveySearchFilter},
    value_objects::{Pagination, Prefecture, SortKey, StoreId, SurveyId},
};

use super::InMemoryDocumentStore;
use crate::{
    document::{decode, encode, fields, CollectionNames, SurveyDocument},
    id::ObjectId,
    query::{self, Filter, Pipeline},
};

/// In-memory implementation of [`SurveyRepository`]
#[derive(Debug, Clone)]
pub struct InMemorySurveyRepository {
    docs: Arc<InMemoryDocumentStore>,
    collections: CollectionNames,
}

impl Default for InMemorySurveyRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySurveyRepository {
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

    pub fn document_store(&self) -> Arc<InMemoryDocumentStore> {
        Arc::clone(&self.docs)
    }

    /// Get the current count of stored documents, deleted ones included (for testing)
    pub fn count(&self) -> usize {
        self.docs.len(&self.collections.surveys)
    }

    /// Clear all surveys (for testing)
    pub fn clear(&self) {
        self.docs.clear(&self.collections.surveys);
    }

    fn collection(&self) -> &str {
        &self.collections.surveys
    }

    fn list(&self, pipeline: &Pipeline) -> DomainResult<Vec<Survey>> {
        self.docs
            .aggregate(self.collection(), pipeline)
            .into_iter()
            .map(|row| {
                let doc: SurveyDocument = decode(self.collection(), row)?;
                Ok(doc.into_survey(self.collection())?)
            })
            .collect()
    }

    fn page(&self, filter: Filter, sort: SortKey, page: Pagination) -> DomainResult<Page<Survey>> {
        let total = self.docs.count(self.collection(), &filter);
        let pipeline = Pipeline::matching(filter)
            .sort(query::survey_sort(sort))
            .paginate(page);
        Ok(Page::new(self.list(&pipeline)?, total))
    }
}

#[async_trait]
impl SurveyRepository for InMemorySurveyRepository {
    async fn save(&self, survey: &Survey) -> DomainResult<()> {
        debug!("Saving survey {} to memory", survey.id());
        let doc = encode(&SurveyDocument::from(survey))?;
        self.docs.upsert(self.collection(), survey.id().value(), doc);
        Ok(())
    }

    async fn find_by_id(&self, id: &SurveyId) -> DomainResult<Option<Survey>> {
        debug!("Finding survey by id: {}", id);
        Ok(self.list(&query::by_id(id.value()))?.into_iter().next())
    }

    async fn find_by_store(
        &self,
        store_id: &StoreId,
        sort: SortKey,
        page: Pagination,
    ) -> DomainResult<Page<Survey>> {
        debug!("Finding surveys by store: {}", store_id);
        self.page(Filter::live().eq(fields::STORE_ID, store_id.value()), sort, page)
    }

    async fn find_by_prefecture(
        &self,
        prefecture: Prefecture,
        sort: SortKey,
        page: Pagination,
    ) -> DomainResult<Page<Survey>> {
        debug!("Finding surveys by prefecture: {}", prefecture);
        self.page(
            Filter::live().eq(fields::STORE_PREFECTURE, prefecture.value()),
            sort,
            page,
        )
    }

    async fn find_admin(
        &self,
        filter: &SurveySearchFilter,
        sort: SortKey,
        page: Pagination,
    ) -> DomainResult<Page<Survey>> {
        debug!("Finding surveys for admin: {:?} sort={}", filter, sort);
        self.page(query::survey_filter(filter), sort, page)
    }

    async fn find_all(&self, sort: SortKey, page: Pagination) -> DomainResult<Page<Survey>> {
        debug!("Finding all surveys sort={}", sort);
        self.page(Filter::live(), sort, page)
    }

    async fn delete(&self, id: &SurveyId) -> DomainResult<()> {
        debug!("Deleting survey: {}", id);
        self.docs.remove(self.collection(), id.value());
        Ok(())
    }

    fn next_id(&self) -> SurveyId {
        SurveyId::from_bytes(ObjectId::new().bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use makoto_domain::{
        store::Store,
        survey::SurveyAnswers,
        value_objects::*,
    };

    fn at(secs: i64) -> Timestamp {
        Timestamp::new(Utc.timestamp_opt(secs, 0).unwrap()).unwrap()
    }

    fn parent(prefecture: Prefecture, name: &str) -> Store {
        Store::builder(
            StoreId::from_bytes(ObjectId::new().bytes()),
            Name::new(name).unwrap(),
            prefecture,
            Industry::DELIVERY_HEALTH,
        )
        .try_with_branch_name("本店")
        .build()
        .unwrap()
    }

    fn answers(earning: i32) -> SurveyAnswers {
        SurveyAnswers {
            visited_period: VisitedPeriod::new("2024-03").unwrap(),
            work_type: WorkType::VISITING,
            age: Age::new(25).unwrap(),
            spec_score: SpecScore::new(100).unwrap(),
            wait_time_hours: WaitTimeHours::new(2).unwrap(),
            average_earning: AverageEarning::new(earning).unwrap(),
            rating: Rating::new(4.0).unwrap(),
        }
    }

    fn survey(repo: &InMemorySurveyRepository, store: &Store, earning: i32, created: i64) -> Survey {
        Survey::builder_from_store(repo.next_id(), store, answers(earning))
            .with_created_at(at(created))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_save_and_find_by_id() {
        let repo = InMemorySurveyRepository::new();
        let store = parent(Prefecture::FUKUOKA, "Club");
        let s = survey(&repo, &store, 5, 1_700_000_000);

        repo.save(&s).await.unwrap();

        assert_eq!(repo.find_by_id(s.id()).await.unwrap(), Some(s));
    }

    #[tokio::test]
    async fn test_find_by_store_excludes_deleted_and_other_stores() {
        let repo = InMemorySurveyRepository::new();
        let a = parent(Prefecture::FUKUOKA, "A");
        let b = parent(Prefecture::FUKUOKA, "B");

        let kept = survey(&repo, &a, 5, 1_700_000_000);
        let gone = survey(&repo, &a, 6, 1_700_000_100)
            .to_builder()
            .with_deleted_at(at(1_700_000_200))
            .build()
            .unwrap();
        repo.save(&kept).await.unwrap();
        repo.save(&gone).await.unwrap();
        repo.save(&survey(&repo, &b, 7, 1_700_000_000)).await.unwrap();

        let page = repo
            .find_by_store(a.id(), SortKey::NEWEST, Pagination::new(1, 10))
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items, vec![kept]);
        assert!(repo.find_by_id(gone.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_earning_sort_breaks_ties_by_recency() {
        let repo = InMemorySurveyRepository::new();
        let store = parent(Prefecture::OSAKA, "Club");
        let low = survey(&repo, &store, 3, 1_700_000_300);
        let high_old = survey(&repo, &store, 9, 1_700_000_000);
        let high_new = survey(&repo, &store, 9, 1_700_000_100);
        for s in [&low, &high_old, &high_new] {
            repo.save(s).await.unwrap();
        }

        let page = repo.find_all(SortKey::EARNING, Pagination::default()).await.unwrap();
        let ids: Vec<&SurveyId> = page.items.iter().map(Survey::id).collect();
        assert_eq!(ids, [high_new.id(), high_old.id(), low.id()]);
    }

    #[tokio::test]
    async fn test_helpful_sort() {
        let repo = InMemorySurveyRepository::new();
        let store = parent(Prefecture::OSAKA, "Club");
        let plain = survey(&repo, &store, 3, 1_700_000_300);
        let liked = survey(&repo, &store, 3, 1_700_000_000)
            .to_builder()
            .with_helpful_count(12)
            .build()
            .unwrap();
        repo.save(&plain).await.unwrap();
        repo.save(&liked).await.unwrap();

        let page = repo.find_all(SortKey::HELPFUL, Pagination::new(1, 1)).await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.items[0].id(), liked.id());
    }

    #[tokio::test]
    async fn test_find_by_prefecture_uses_snapshot() {
        let repo = InMemorySurveyRepository::new();
        let osaka = parent(Prefecture::OSAKA, "Club");
        let tokyo = parent(Prefecture::TOKYO, "Club");
        repo.save(&survey(&repo, &osaka, 3, 1_700_000_000)).await.unwrap();
        repo.save(&survey(&repo, &tokyo, 3, 1_700_000_000)).await.unwrap();

        let page = repo
            .find_by_prefecture(Prefecture::OSAKA, SortKey::NEWEST, Pagination::new(1, 10))
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].store_prefecture(), Prefecture::OSAKA);
    }

    #[tokio::test]
    async fn test_find_admin_keyword_matches_branch() {
        let repo = InMemorySurveyRepository::new();
        let store = parent(Prefecture::OSAKA, "Club");
        repo.save(&survey(&repo, &store, 3, 1_700_000_000)).await.unwrap();

        let filter = SurveySearchFilter::new()
            .with_industry(Industry::DELIVERY_HEALTH)
            .with_keyword("本店");
        let page = repo
            .find_admin(&filter, SortKey::NEWEST, Pagination::new(1, 10))
            .await
            .unwrap();
        assert_eq!(page.total, 1);

        let miss = SurveySearchFilter::new().with_keyword("支店");
        let page = repo
            .find_admin(&miss, SortKey::NEWEST, Pagination::new(1, 10))
            .await
            .unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_delete_removes_document() {
        let repo = InMemorySurveyRepository::new();
        let store = parent(Prefecture::OSAKA, "Club");
        let s = survey(&repo, &store, 3, 1_700_000_000);
        repo.save(&s).await.unwrap();

        repo.delete(s.id()).await.unwrap();
        assert_eq!(repo.count(), 0);
    }
}
