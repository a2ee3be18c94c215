//! Survey DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use makoto_domain::{
    errors::DomainResult,
    survey::{Survey, SurveyAnswers, SurveyBuilder},
    value_objects::*,
};

/// Request body for a survey
///
/// Admin flows reference an existing store through `store_id`; public
/// submissions may instead describe the store by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyInput {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub store_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub branch_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prefecture: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub industry: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub store_id: String,
    pub visited_period: String,
    pub work_type: String,
    pub age: i32,
    pub spec_score: i32,
    pub wait_time_hours: i32,
    pub average_earning: i32,
    pub rating: f64,
    #[serde(default)]
    pub customer_comment: Option<String>,
    #[serde(default)]
    pub staff_comment: Option<String>,
    #[serde(default)]
    pub work_environment_comment: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

impl SurveyInput {
    pub fn store_id(&self) -> DomainResult<StoreId> {
        StoreId::parse(&self.store_id)
    }

    /// Validate the seven required answers
    pub fn answers(&self) -> DomainResult<SurveyAnswers> {
        Ok(SurveyAnswers {
            visited_period: VisitedPeriod::new(&self.visited_period)?,
            work_type: WorkType::new(&self.work_type)?,
            age: Age::new(self.age)?,
            spec_score: SpecScore::new(self.spec_score)?,
            wait_time_hours: WaitTimeHours::new(self.wait_time_hours)?,
            average_earning: AverageEarning::new(self.average_earning)?,
            rating: Rating::new(self.rating)?,
        })
    }

    /// Apply the optional free-text fields; failures surface at `build()`
    pub fn apply_optional(&self, mut builder: SurveyBuilder) -> SurveyBuilder {
        if let Some(comment) = &self.customer_comment {
            builder = builder.try_with_customer_comment(comment);
        }
        if let Some(comment) = &self.staff_comment {
            builder = builder.try_with_staff_comment(comment);
        }
        if let Some(comment) = &self.work_environment_comment {
            builder = builder.try_with_work_environment_comment(comment);
        }
        if let Some(email) = &self.email_address {
            builder = builder.try_with_email_address(email);
        }
        builder.try_with_image_urls(self.image_urls.as_slice())
    }
}

/// Survey as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyDto {
    pub id: String,
    pub store_id: String,
    pub store_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_branch: Option<String>,
    pub store_prefecture: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_area: Option<String>,
    pub store_industry: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_genre: Option<String>,
    pub visited_period: String,
    pub work_type: String,
    pub age: i32,
    pub spec_score: i32,
    pub wait_time_hours: i32,
    pub average_earning: i32,
    pub rating: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_environment_comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub image_urls: Vec<String>,
    pub helpful_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl SurveyDto {
    pub fn from_domain(survey: &Survey) -> Self {
        Self {
            id: survey.id().to_string(),
            store_id: survey.store_id().to_string(),
            store_name: survey.store_name().value().to_string(),
            store_branch: survey.store_branch_name().map(|b| b.value().to_string()),
            store_prefecture: survey.store_prefecture().value().to_string(),
            store_area: survey.store_area().map(|a| a.value().to_string()),
            store_industry: survey.store_industry().value().to_string(),
            store_genre: survey.store_genre().map(|g| g.value().to_string()),
            visited_period: survey.visited_period().value(),
            work_type: survey.work_type().value().to_string(),
            age: survey.age().value(),
            spec_score: survey.spec_score().value(),
            wait_time_hours: survey.wait_time_hours().value(),
            average_earning: survey.average_earning().value(),
            rating: survey.rating().value(),
            customer_comment: survey.customer_comment().map(|c| c.value().to_string()),
            staff_comment: survey.staff_comment().map(|c| c.value().to_string()),
            work_environment_comment: survey
                .work_environment_comment()
                .map(|c| c.value().to_string()),
            email_address: survey.email_address().map(|e| e.value().to_string()),
            image_urls: survey.image_urls().strings(),
            helpful_count: survey.helpful_count(),
            created_at: survey.created_at().value(),
            updated_at: survey.updated_at().value(),
            deleted_at: survey.deleted_at().map(|t| t.value()),
        }
    }
}
