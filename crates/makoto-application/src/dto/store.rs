//! Store DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use makoto_domain::{
    errors::DomainResult,
    store::{Store, StoreListing},
    value_objects::{Industry, Name, Prefecture, StoreId},
};

/// Request body for creating or replacing a store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreInput {
    pub name: String,
    #[serde(default)]
    pub branch_name: Option<String>,
    pub prefecture: String,
    #[serde(default)]
    pub area: Option<String>,
    pub industry: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub business_hours: Option<BusinessHoursInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessHoursInput {
    pub open: String,
    pub close: String,
}

impl StoreInput {
    /// Validate into a store aggregate with identity `id`
    pub fn into_store(self, id: StoreId) -> DomainResult<Store> {
        let mut builder = Store::builder(
            id,
            Name::new(&self.name)?,
            Prefecture::new(&self.prefecture)?,
            Industry::new(&self.industry)?,
        );
        if let Some(branch) = &self.branch_name {
            builder = builder.try_with_branch_name(branch);
        }
        if let Some(area) = &self.area {
            builder = builder.try_with_area(area);
        }
        if let Some(genre) = &self.genre {
            builder = builder.try_with_genre(genre);
        }
        if let Some(hours) = &self.business_hours {
            builder = builder.try_with_business_hours(&hours.open, &hours.close);
        }
        builder.build()
    }
}

/// Store as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreDto {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
    pub prefecture: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    pub industry: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_hours: Option<BusinessHoursInput>,
    pub average_rating: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub survey_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helpful_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_earning: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl StoreDto {
    pub fn from_domain(store: &Store) -> Self {
        Self {
            id: store.id().to_string(),
            name: store.name().value().to_string(),
            branch_name: store.branch_name().map(|b| b.value().to_string()),
            prefecture: store.prefecture().value().to_string(),
            area: store.area().map(|a| a.value().to_string()),
            industry: store.industry().value().to_string(),
            genre: store.genre().map(|g| g.value().to_string()),
            business_hours: store.business_hours().map(|h| BusinessHoursInput {
                open: h.open_string(),
                close: h.close_string(),
            }),
            average_rating: store.average_rating().value(),
            survey_count: None,
            helpful_count: None,
            average_earning: None,
            created_at: store.created_at().value(),
            updated_at: store.updated_at().value(),
            deleted_at: store.deleted_at().map(|t| t.value()),
        }
    }

    /// Include the search statistics
    pub fn from_listing(listing: &StoreListing) -> Self {
        Self {
            survey_count: Some(listing.stats.survey_count),
            helpful_count: Some(listing.stats.helpful_count),
            average_earning: Some(listing.stats.average_earning),
            ..Self::from_domain(&listing.store)
        }
    }
}
