//! Survey aggregate

mod search_filter;

pub use search_filter::SurveySearchFilter;

use crate::errors::{DomainError, DomainResult};
use crate::store::Store;
use crate::value_objects::{
    Age, Area, AverageEarning, BranchName, CustomerComment, EmailAddress, Genre, ImageUrls,
    Industry, Name, Prefecture, Rating, SpecScore, StaffComment, StoreId, SurveyId, Timestamp,
    VisitedPeriod, WaitTimeHours, WorkEnvironmentComment, WorkType,
};

/// Copy of the parent store's listing fields taken when the survey is created
///
/// Never refreshed afterwards; later edits to the store do not reach it.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    pub store_id: StoreId,
    pub name: Name,
    pub prefecture: Prefecture,
    pub industry: Industry,
    pub branch_name: Option<BranchName>,
    pub area: Option<Area>,
    pub genre: Option<Genre>,
}

impl StoreSnapshot {
    pub fn new(store_id: StoreId, name: Name, prefecture: Prefecture, industry: Industry) -> Self {
        Self {
            store_id,
            name,
            prefecture,
            industry,
            branch_name: None,
            area: None,
            genre: None,
        }
    }

    /// Snapshot of a stored aggregate
    pub fn of(store: &Store) -> Self {
        Self {
            store_id: store.id().clone(),
            name: store.name().clone(),
            prefecture: store.prefecture(),
            industry: store.industry(),
            branch_name: store.branch_name().cloned(),
            area: store.area(),
            genre: store.genre(),
        }
    }

    pub fn with_branch_name(mut self, branch_name: BranchName) -> Self {
        self.branch_name = (!branch_name.is_zero()).then_some(branch_name);
        self
    }

    pub fn with_area(mut self, area: Area) -> Self {
        self.area = (!area.is_zero()).then_some(area);
        self
    }

    pub fn with_genre(mut self, genre: Genre) -> Self {
        self.genre = (!genre.is_zero()).then_some(genre);
        self
    }

    fn validate(&self) -> DomainResult<()> {
        self.store_id.validate()?;
        self.name.validate()?;
        self.prefecture.validate()?;
        self.industry.validate()?;
        if let Some(branch) = &self.branch_name {
            branch.validate()?;
        }
        if let Some(area) = &self.area {
            area.validate()?;
        }
        if let Some(genre) = &self.genre {
            genre.validate()?;
        }
        Ok(())
    }
}

/// The mandatory answers of a survey
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurveyAnswers {
    pub visited_period: VisitedPeriod,
    pub work_type: WorkType,
    pub age: Age,
    pub spec_score: SpecScore,
    pub wait_time_hours: WaitTimeHours,
    pub average_earning: AverageEarning,
    pub rating: Rating,
}

impl SurveyAnswers {
    fn validate(&self) -> DomainResult<()> {
        self.visited_period.validate()?;
        self.work_type.validate()?;
        self.age.validate()?;
        self.spec_score.validate()?;
        self.wait_time_hours.validate()?;
        self.average_earning.validate()?;
        self.rating.validate()
    }
}

/// A review of a store written by someone who worked there
#[derive(Debug, Clone, PartialEq)]
pub struct Survey {
    id: SurveyId,
    store: StoreSnapshot,
    answers: SurveyAnswers,
    customer_comment: Option<CustomerComment>,
    staff_comment: Option<StaffComment>,
    work_environment_comment: Option<WorkEnvironmentComment>,
    email_address: Option<EmailAddress>,
    image_urls: ImageUrls,
    helpful_count: u32,
    created_at: Timestamp,
    updated_at: Timestamp,
    deleted_at: Option<Timestamp>,
}

impl Survey {
    pub fn builder(id: SurveyId, store: StoreSnapshot, answers: SurveyAnswers) -> SurveyBuilder {
        SurveyBuilder {
            id,
            store,
            answers,
            customer_comment: None,
            staff_comment: None,
            work_environment_comment: None,
            email_address: None,
            image_urls: ImageUrls::default(),
            helpful_count: 0,
            created_at: None,
            updated_at: None,
            deleted_at: None,
            error: None,
        }
    }

    /// Builder whose store fields are a snapshot of `store`
    pub fn builder_from_store(id: SurveyId, store: &Store, answers: SurveyAnswers) -> SurveyBuilder {
        Self::builder(id, StoreSnapshot::of(store), answers)
    }

    /// Re-open this survey for a wholesale replacement keeping its identity
    pub fn to_builder(&self) -> SurveyBuilder {
        SurveyBuilder {
            id: self.id.clone(),
            store: self.store.clone(),
            answers: self.answers,
            customer_comment: self.customer_comment.clone(),
            staff_comment: self.staff_comment.clone(),
            work_environment_comment: self.work_environment_comment.clone(),
            email_address: self.email_address.clone(),
            image_urls: self.image_urls.clone(),
            helpful_count: self.helpful_count,
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
            deleted_at: self.deleted_at,
            error: None,
        }
    }

    pub fn id(&self) -> &SurveyId {
        &self.id
    }

    pub fn store(&self) -> &StoreSnapshot {
        &self.store
    }

    pub fn store_id(&self) -> &StoreId {
        &self.store.store_id
    }

    pub fn store_name(&self) -> &Name {
        &self.store.name
    }

    pub fn store_branch_name(&self) -> Option<&BranchName> {
        self.store.branch_name.as_ref()
    }

    pub fn store_prefecture(&self) -> Prefecture {
        self.store.prefecture
    }

    pub fn store_area(&self) -> Option<Area> {
        self.store.area
    }

    pub fn store_genre(&self) -> Option<Genre> {
        self.store.genre
    }

    pub fn store_industry(&self) -> Industry {
        self.store.industry
    }

    pub fn answers(&self) -> &SurveyAnswers {
        &self.answers
    }

    pub fn visited_period(&self) -> VisitedPeriod {
        self.answers.visited_period
    }

    pub fn work_type(&self) -> WorkType {
        self.answers.work_type
    }

    pub fn age(&self) -> Age {
        self.answers.age
    }

    pub fn spec_score(&self) -> SpecScore {
        self.answers.spec_score
    }

    pub fn wait_time_hours(&self) -> WaitTimeHours {
        self.answers.wait_time_hours
    }

    pub fn average_earning(&self) -> AverageEarning {
        self.answers.average_earning
    }

    pub fn rating(&self) -> Rating {
        self.answers.rating
    }

    pub fn customer_comment(&self) -> Option<&CustomerComment> {
        self.customer_comment.as_ref()
    }

    pub fn staff_comment(&self) -> Option<&StaffComment> {
        self.staff_comment.as_ref()
    }

    pub fn work_environment_comment(&self) -> Option<&WorkEnvironmentComment> {
        self.work_environment_comment.as_ref()
    }

    pub fn email_address(&self) -> Option<&EmailAddress> {
        self.email_address.as_ref()
    }

    pub fn image_urls(&self) -> &ImageUrls {
        &self.image_urls
    }

    pub fn helpful_count(&self) -> u32 {
        self.helpful_count
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    pub fn deleted_at(&self) -> Option<Timestamp> {
        self.deleted_at
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Collects optional fields for a [`Survey`]
#[derive(Debug, Clone)]
pub struct SurveyBuilder {
    id: SurveyId,
    store: StoreSnapshot,
    answers: SurveyAnswers,
    customer_comment: Option<CustomerComment>,
    staff_comment: Option<StaffComment>,
    work_environment_comment: Option<WorkEnvironmentComment>,
    email_address: Option<EmailAddress>,
    image_urls: ImageUrls,
    helpful_count: u32,
    created_at: Option<Timestamp>,
    updated_at: Option<Timestamp>,
    deleted_at: Option<Timestamp>,
    error: Option<DomainError>,
}

impl SurveyBuilder {
    pub fn with_answers(mut self, answers: SurveyAnswers) -> Self {
        self.answers = answers;
        self
    }

    pub fn with_customer_comment(mut self, comment: CustomerComment) -> Self {
        self.customer_comment = (!comment.is_zero()).then_some(comment);
        self
    }

    pub fn with_staff_comment(mut self, comment: StaffComment) -> Self {
        self.staff_comment = (!comment.is_zero()).then_some(comment);
        self
    }

    pub fn with_work_environment_comment(mut self, comment: WorkEnvironmentComment) -> Self {
        self.work_environment_comment = (!comment.is_zero()).then_some(comment);
        self
    }

    pub fn with_email_address(mut self, email: EmailAddress) -> Self {
        self.email_address = (!email.is_zero()).then_some(email);
        self
    }

    pub fn with_image_urls(mut self, urls: ImageUrls) -> Self {
        self.image_urls = urls;
        self
    }

    pub fn with_helpful_count(mut self, count: u32) -> Self {
        self.helpful_count = count;
        self
    }

    pub fn with_created_at(mut self, at: Timestamp) -> Self {
        self.created_at = Some(at);
        self
    }

    pub fn with_updated_at(mut self, at: Timestamp) -> Self {
        self.updated_at = Some(at);
        self
    }

    pub fn with_deleted_at(mut self, at: Timestamp) -> Self {
        self.deleted_at = Some(at);
        self
    }

    pub fn try_with_customer_comment(self, raw: &str) -> Self {
        self.apply(CustomerComment::new(raw), Self::with_customer_comment)
    }

    pub fn try_with_staff_comment(self, raw: &str) -> Self {
        self.apply(StaffComment::new(raw), Self::with_staff_comment)
    }

    pub fn try_with_work_environment_comment(self, raw: &str) -> Self {
        self.apply(
            WorkEnvironmentComment::new(raw),
            Self::with_work_environment_comment,
        )
    }

    pub fn try_with_email_address(self, raw: &str) -> Self {
        self.apply(EmailAddress::new(raw), Self::with_email_address)
    }

    pub fn try_with_image_urls<S: AsRef<str>>(self, raw: &[S]) -> Self {
        self.apply(ImageUrls::new(raw), Self::with_image_urls)
    }

    fn apply<T>(mut self, parsed: DomainResult<T>, set: fn(Self, T) -> Self) -> Self {
        match parsed {
            Ok(value) => set(self, value),
            Err(err) => {
                self.error.get_or_insert(err);
                self
            }
        }
    }

    /// Validate every field and produce the survey
    pub fn build(self) -> DomainResult<Survey> {
        if let Some(err) = self.error {
            return Err(err);
        }

        self.id.validate()?;
        self.store.validate()?;
        self.answers.validate()?;
        if let Some(comment) = &self.customer_comment {
            comment.validate()?;
        }
        if let Some(comment) = &self.staff_comment {
            comment.validate()?;
        }
        if let Some(comment) = &self.work_environment_comment {
            comment.validate()?;
        }
        if let Some(email) = &self.email_address {
            email.validate()?;
        }
        self.image_urls.validate()?;

        let created_at = self.created_at.filter(|at| !at.is_zero()).unwrap_or_else(Timestamp::now);
        let updated_at = self.updated_at.filter(|at| !at.is_zero()).unwrap_or(created_at);
        let deleted_at = self.deleted_at.filter(|at| !at.is_zero());

        Ok(Survey {
            id: self.id,
            store: self.store,
            answers: self.answers,
            customer_comment: self.customer_comment,
            staff_comment: self.staff_comment,
            work_environment_comment: self.work_environment_comment,
            email_address: self.email_address,
            image_urls: self.image_urls,
            helpful_count: self.helpful_count,
            created_at,
            updated_at,
            deleted_at,
        })
    }
}
