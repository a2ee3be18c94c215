use std::fmt::Display;

use makoto_domain::{
    survey::{StoreSnapshot, Survey, SurveyAnswers},
    value_objects::*,
};
use serde::{Deserialize, Serialize};

use super::{format_timestamp, parse_timestamp};
use crate::error::PersistenceError;

/// Stored shape of a [`Survey`], including the store snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub store_id: String,
    pub store_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_branch_name: Option<String>,
    pub store_prefecture: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_area: Option<String>,
    pub store_industry: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_genre: Option<String>,
    pub visited_period: String,
    pub work_type: String,
    pub age: i32,
    pub spec_score: i32,
    pub wait_time_hours: i32,
    pub average_earning: i32,
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_environment_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub helpful_count: u32,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
}

impl From<&Survey> for SurveyDocument {
    fn from(survey: &Survey) -> Self {
        Self {
            id: survey.id().value().to_string(),
            store_id: survey.store_id().value().to_string(),
            store_name: survey.store_name().value().to_string(),
            store_branch_name: survey.store_branch_name().map(|b| b.value().to_string()),
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
            created_at: format_timestamp(survey.created_at()),
            updated_at: format_timestamp(survey.updated_at()),
            deleted_at: survey.deleted_at().map(format_timestamp),
        }
    }
}

impl SurveyDocument {
    /// Rebuild and re-validate the aggregate
    pub fn into_survey(self, collection: &str) -> Result<Survey, PersistenceError> {
        let bad = |e: &dyn Display| PersistenceError::corrupt(collection, format!("{}: {}", self.id, e));

        let id = SurveyId::parse(&self.id).map_err(|e| bad(&e))?;

        let mut store = StoreSnapshot::new(
            StoreId::parse(&self.store_id).map_err(|e| bad(&e))?,
            Name::new(&self.store_name).map_err(|e| bad(&e))?,
            Prefecture::new(&self.store_prefecture).map_err(|e| bad(&e))?,
            Industry::new(&self.store_industry).map_err(|e| bad(&e))?,
        );
        if let Some(branch) = &self.store_branch_name {
            store = store.with_branch_name(BranchName::new(branch).map_err(|e| bad(&e))?);
        }
        if let Some(area) = &self.store_area {
            store = store.with_area(Area::new(area).map_err(|e| bad(&e))?);
        }
        if let Some(genre) = &self.store_genre {
            store = store.with_genre(Genre::new(genre).map_err(|e| bad(&e))?);
        }

        let answers = SurveyAnswers {
            visited_period: VisitedPeriod::new(&self.visited_period).map_err(|e| bad(&e))?,
            work_type: WorkType::new(&self.work_type).map_err(|e| bad(&e))?,
            age: Age::new(self.age).map_err(|e| bad(&e))?,
            spec_score: SpecScore::new(self.spec_score).map_err(|e| bad(&e))?,
            wait_time_hours: WaitTimeHours::new(self.wait_time_hours).map_err(|e| bad(&e))?,
            average_earning: AverageEarning::new(self.average_earning).map_err(|e| bad(&e))?,
            rating: Rating::new(self.rating).map_err(|e| bad(&e))?,
        };

        let mut builder = Survey::builder(id, store, answers)
            .with_helpful_count(self.helpful_count)
            .with_created_at(parse_timestamp(collection, &self.created_at)?)
            .with_updated_at(parse_timestamp(collection, &self.updated_at)?)
            .try_with_image_urls(self.image_urls.as_slice());

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
        if let Some(deleted) = &self.deleted_at {
            builder = builder.with_deleted_at(parse_timestamp(collection, deleted)?);
        }

        builder.build().map_err(|e| bad(&e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Survey {
        let store = StoreSnapshot::new(
            StoreId::parse("65a1b2c3d4e5f60718293a4b").unwrap(),
            Name::new("Club").unwrap(),
            Prefecture::OSAKA,
            Industry::MENS_ESTHE,
        )
        .with_genre(Genre::STANDARD);
        let answers = SurveyAnswers {
            visited_period: VisitedPeriod::new("2024-01").unwrap(),
            work_type: WorkType::RESIDENT,
            age: Age::new(22).unwrap(),
            spec_score: SpecScore::new(110).unwrap(),
            wait_time_hours: WaitTimeHours::new(4).unwrap(),
            average_earning: AverageEarning::new(5).unwrap(),
            rating: Rating::new(4.5).unwrap(),
        };
        Survey::builder(SurveyId::parse("75a1b2c3d4e5f60718293a4b").unwrap(), store, answers)
            .try_with_staff_comment("丁寧")
            .try_with_image_urls(&["https://example.com/1.jpg"])
            .with_helpful_count(4)
            .build()
            .unwrap()
    }

    #[test]
    fn test_document_field_names() {
        let json = serde_json::to_value(SurveyDocument::from(&sample())).unwrap();
        assert_eq!(json["storeId"], "65a1b2c3d4e5f60718293a4b");
        assert_eq!(json["storeGenre"], "スタンダード");
        assert_eq!(json["visitedPeriod"], "2024-01");
        assert_eq!(json["waitTimeHours"], 4);
        assert_eq!(json["helpfulCount"], 4);
        assert!(json.get("storeArea").is_none());
        assert!(json.get("customerComment").is_none());
        assert!(json.get("deletedAt").is_none());
    }

    #[test]
    fn test_document_rebuilds_equal_survey() {
        let survey = sample();
        let rebuilt = SurveyDocument::from(&survey).into_survey("surveys").unwrap();
        assert_eq!(rebuilt, survey);
    }

    #[test]
    fn test_missing_required_field_fails_decode() {
        let mut json = serde_json::to_value(SurveyDocument::from(&sample())).unwrap();
        json.as_object_mut().unwrap().remove("storeName");
        assert!(serde_json::from_value::<SurveyDocument>(json).is_err());
    }

    #[test]
    fn test_out_of_range_answer_is_corrupt() {
        let mut doc = SurveyDocument::from(&sample());
        doc.age = 12;
        assert!(matches!(
            doc.into_survey("surveys"),
            Err(PersistenceError::Deserialization { .. })
        ));
    }
}
