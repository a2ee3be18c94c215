//! Survey Application Service
//!
//! Surveys are created by admins against an existing store, whose metadata
//! is snapshotted into the survey. Public submissions are only forwarded to
//! the notifier.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use makoto_domain::{
    repositories::{Page, StoreRepository, SurveyRepository},
    survey::{Survey, SurveySearchFilter},
    value_objects::{Pagination, Prefecture, SortKey, StoreId, SurveyId, Timestamp},
};

use crate::context::RequestContext;
use crate::dto::SurveyInput;
use crate::errors::{ApplicationError, ApplicationResult};
use crate::notifier::{SurveyNotification, SurveyNotifier};

/// Default time a detached notification may take
pub const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// Survey Application Service
pub struct SurveyService<R, S, N>
where
    R: SurveyRepository,
    S: StoreRepository,
    N: SurveyNotifier + 'static,
{
    repository: Arc<R>,
    stores: Arc<S>,
    notifier: Arc<N>,
    notify_timeout: Duration,
}

impl<R, S, N> SurveyService<R, S, N>
where
    R: SurveyRepository,
    S: StoreRepository,
    N: SurveyNotifier + 'static,
{
    /// Create a new SurveyService with injected dependencies
    pub fn new(repository: Arc<R>, stores: Arc<S>, notifier: Arc<N>) -> Self {
        Self {
            repository,
            stores,
            notifier,
            notify_timeout: DEFAULT_NOTIFY_TIMEOUT,
        }
    }

    pub fn with_notify_timeout(mut self, timeout: Duration) -> Self {
        self.notify_timeout = timeout;
        self
    }

    /// Allocate an identity for a new survey
    pub fn next_id(&self) -> SurveyId {
        self.repository.next_id()
    }

    async fn save(&self, ctx: &RequestContext, survey: Option<&Survey>) -> ApplicationResult<()> {
        let survey = survey.ok_or(ApplicationError::MissingAggregate("survey"))?;
        ctx.run(self.repository.save(survey)).await
    }

    pub async fn create(&self, ctx: &RequestContext, survey: Option<&Survey>) -> ApplicationResult<()> {
        self.save(ctx, survey).await?;
        if let Some(survey) = survey {
            info!("Created survey {} for store {}", survey.id(), survey.store_id());
        }
        Ok(())
    }

    pub async fn update(&self, ctx: &RequestContext, survey: Option<&Survey>) -> ApplicationResult<()> {
        self.save(ctx, survey).await?;
        if let Some(survey) = survey {
            info!("Updated survey {}", survey.id());
        }
        Ok(())
    }

    pub async fn find_by_id(&self, ctx: &RequestContext, id: &SurveyId) -> ApplicationResult<Option<Survey>> {
        ctx.run(self.repository.find_by_id(id)).await
    }

    /// Surveys of one store
    pub async fn get_by_store(
        &self,
        ctx: &RequestContext,
        store_id: &StoreId,
        sort: SortKey,
        page: Pagination,
    ) -> ApplicationResult<Page<Survey>> {
        ctx.run(self.repository.find_by_store(store_id, sort, page)).await
    }

    pub async fn get_by_prefecture(
        &self,
        ctx: &RequestContext,
        prefecture: Prefecture,
        sort: SortKey,
        page: Pagination,
    ) -> ApplicationResult<Page<Survey>> {
        ctx.run(self.repository.find_by_prefecture(prefecture, sort, page)).await
    }

    /// Filtered listing for the admin screens; an empty filter lists everything
    pub async fn list_admin(
        &self,
        ctx: &RequestContext,
        filter: &SurveySearchFilter,
        sort: SortKey,
        page: Pagination,
    ) -> ApplicationResult<Page<Survey>> {
        if *filter == SurveySearchFilter::default() {
            return ctx.run(self.repository.find_all(sort, page)).await;
        }
        ctx.run(self.repository.find_admin(filter, sort, page)).await
    }

    /// Physically remove a survey (administrative path)
    pub async fn delete(&self, ctx: &RequestContext, id: &SurveyId) -> ApplicationResult<()> {
        ctx.run(self.repository.delete(id)).await?;
        info!("Deleted survey {}", id);
        Ok(())
    }

    /// Mark a survey deleted so reads and store statistics stop counting it
    pub async fn soft_delete(&self, ctx: &RequestContext, id: &SurveyId) -> ApplicationResult<()> {
        let survey = self
            .find_by_id(ctx, id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("survey", id.value()))?;

        let now = Timestamp::now();
        let deleted = survey.to_builder().with_deleted_at(now).with_updated_at(now).build()?;
        ctx.run(self.repository.save(&deleted)).await?;
        info!("Soft-deleted survey {}", id);
        Ok(())
    }

    /// Look up the referenced store and build a survey snapshotting it
    pub async fn build_from_input(
        &self,
        ctx: &RequestContext,
        id: SurveyId,
        input: &SurveyInput,
    ) -> ApplicationResult<Survey> {
        let store_id = input.store_id()?;
        let store = ctx
            .run(self.stores.find_by_id(&store_id))
            .await?
            .ok_or_else(|| ApplicationError::not_found("store", store_id.value()))?;

        let answers = input.answers()?;
        let builder = Survey::builder_from_store(id, &store, answers);
        Ok(input.apply_optional(builder).build()?)
    }

    /// Forward a public submission to the notifier without storing it
    ///
    /// The notification runs on its own task with its own timeout, so the
    /// caller may return or be cancelled immediately. Must be called from
    /// within a Tokio runtime.
    pub fn submit(&self, input: &SurveyInput) -> JoinHandle<()> {
        let notification = SurveyNotification::from_input(input);
        let notifier = Arc::clone(&self.notifier);
        let timeout = self.notify_timeout;

        tokio::spawn(async move {
            match tokio::time::timeout(timeout, notifier.notify(&notification)).await {
                Ok(Ok(())) => debug!("Forwarded survey submission from {}", notification.sender),
                Ok(Err(e)) => warn!("Survey submission from {} not forwarded: {}", notification.sender, e),
                Err(_) => warn!(
                    "Survey submission from {} timed out after {:?}",
                    notification.sender, timeout
                ),
            }
        })
    }
}
