//! SurrealDB Survey Repository Implementation

use async_trait::async_trait;
use tracing::debug;

use makoto_domain::{
    errors::DomainResult,
    repositories::{Page, SurveyRepository},
    survey::{Survey, SurveySearchFilter},
    value_objects::{Pagination, Prefecture, SortKey, StoreId, SurveyId},
};

use super::{connection::SharedConnection, count, remove, select, upsert};
use crate::{
    document::{encode, fields, CollectionNames, SurveyDocument},
    id::ObjectId,
    query::{self, Filter, Pipeline},
};

/// SurrealDB implementation of [`SurveyRepository`]
pub struct SurrealSurveyRepository {
    connection: SharedConnection,
    collections: CollectionNames,
}

impl SurrealSurveyRepository {
    /// Create a new SurrealDB survey repository
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
        &self.collections.surveys
    }

    async fn list(&self, pipeline: &Pipeline) -> DomainResult<Vec<Survey>> {
        let docs: Vec<SurveyDocument> = select(&self.connection, self.table(), pipeline).await?;
        docs.into_iter()
            .map(|doc| Ok(doc.into_survey(self.table())?))
            .collect()
    }

    async fn page(&self, filter: Filter, sort: SortKey, page: Pagination) -> DomainResult<Page<Survey>> {
        let total = count(&self.connection, self.table(), &filter).await?;
        let pipeline = Pipeline::matching(filter)
            .sort(query::survey_sort(sort))
            .paginate(page);
        Ok(Page::new(self.list(&pipeline).await?, total))
    }
}

#[async_trait]
impl SurveyRepository for SurrealSurveyRepository {
    async fn save(&self, survey: &Survey) -> DomainResult<()> {
        debug!("Saving survey {} to SurrealDB", survey.id());
        let doc = encode(&SurveyDocument::from(survey))?;
        upsert(&self.connection, self.table(), survey.id().value(), doc).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &SurveyId) -> DomainResult<Option<Survey>> {
        debug!("Finding survey by id: {}", id);
        Ok(self.list(&query::by_id(id.value())).await?.into_iter().next())
    }

    async fn find_by_store(
        &self,
        store_id: &StoreId,
        sort: SortKey,
        page: Pagination,
    ) -> DomainResult<Page<Survey>> {
        debug!("Finding surveys by store: {}", store_id);
        self.page(Filter::live().eq(fields::STORE_ID, store_id.value()), sort, page)
            .await
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
        .await
    }

    async fn find_admin(
        &self,
        filter: &SurveySearchFilter,
        sort: SortKey,
        page: Pagination,
    ) -> DomainResult<Page<Survey>> {
        debug!("Finding surveys for admin: {:?} sort={}", filter, sort);
        self.page(query::survey_filter(filter), sort, page).await
    }

    async fn find_all(&self, sort: SortKey, page: Pagination) -> DomainResult<Page<Survey>> {
        debug!("Finding all surveys sort={}", sort);
        self.page(Filter::live(), sort, page).await
    }

    async fn delete(&self, id: &SurveyId) -> DomainResult<()> {
        debug!("Deleting survey: {}", id);
        remove(&self.connection, self.table(), id.value()).await?;
        Ok(())
    }

    fn next_id(&self) -> SurveyId {
        SurveyId::from_bytes(ObjectId::new().bytes())
    }
}
