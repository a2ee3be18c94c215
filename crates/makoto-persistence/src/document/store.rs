use std::fmt::Display;

use makoto_domain::{
    store::{Store, StoreListing, StoreStats},
    value_objects::*,
};
use serde::{Deserialize, Serialize};

use super::{format_timestamp, parse_timestamp};
use crate::error::PersistenceError;

/// Stored shape of a [`Store`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
    pub prefecture: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    pub industry: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_hours: Option<BusinessHoursDocument>,
    #[serde(default)]
    pub average_rating: f64,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessHoursDocument {
    pub open: String,
    pub close: String,
}

/// A store row produced by the search join, carrying the computed figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreListingDocument {
    #[serde(flatten)]
    pub store: StoreDocument,
    #[serde(default)]
    pub survey_count: u64,
    #[serde(default)]
    pub helpful_count: u64,
    #[serde(default)]
    pub average_earning_agg: f64,
}

impl From<&Store> for StoreDocument {
    fn from(store: &Store) -> Self {
        Self {
            id: store.id().value().to_string(),
            name: store.name().value().to_string(),
            branch_name: store.branch_name().map(|b| b.value().to_string()),
            prefecture: store.prefecture().value().to_string(),
            area: store.area().map(|a| a.value().to_string()),
            industry: store.industry().value().to_string(),
            genre: store.genre().map(|g| g.value().to_string()),
            business_hours: store.business_hours().map(|h| BusinessHoursDocument {
                open: h.open_string(),
                close: h.close_string(),
            }),
            average_rating: store.average_rating().value(),
            created_at: format_timestamp(store.created_at()),
            updated_at: format_timestamp(store.updated_at()),
            deleted_at: store.deleted_at().map(format_timestamp),
        }
    }
}

impl StoreDocument {
    /// Rebuild and re-validate the aggregate
    pub fn into_store(self, collection: &str) -> Result<Store, PersistenceError> {
        let bad = |e: &dyn Display| PersistenceError::corrupt(collection, format!("{}: {}", self.id, e));

        let id = StoreId::parse(&self.id).map_err(|e| bad(&e))?;
        let name = Name::new(&self.name).map_err(|e| bad(&e))?;
        let prefecture = Prefecture::new(&self.prefecture).map_err(|e| bad(&e))?;
        let industry = Industry::new(&self.industry).map_err(|e| bad(&e))?;

        let mut builder = Store::builder(id, name, prefecture, industry)
            .with_created_at(parse_timestamp(collection, &self.created_at)?)
            .with_updated_at(parse_timestamp(collection, &self.updated_at)?);

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
        builder = builder.try_with_average_rating(self.average_rating);
        if let Some(deleted) = &self.deleted_at {
            builder = builder.with_deleted_at(parse_timestamp(collection, deleted)?);
        }

        builder.build().map_err(|e| bad(&e))
    }
}

impl StoreListingDocument {
    pub fn into_listing(self, collection: &str) -> Result<StoreListing, PersistenceError> {
        let stats = StoreStats {
            survey_count: self.survey_count,
            helpful_count: self.helpful_count,
            average_earning: self.average_earning_agg,
        };
        Ok(StoreListing::new(self.store.into_store(collection)?, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Store {
        Store::builder(
            StoreId::parse("65a1b2c3d4e5f60718293a4b").unwrap(),
            Name::new("Club").unwrap(),
            Prefecture::TOKYO,
            Industry::SOAPLAND,
        )
        .try_with_area("吉原")
        .try_with_business_hours("22:00", "06:00")
        .try_with_average_rating(3.7)
        .build()
        .unwrap()
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let doc = StoreDocument::from(&sample());
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["_id"], "65a1b2c3d4e5f60718293a4b");
        assert_eq!(json["area"], "吉原");
        assert!(json.get("branchName").is_none());
        assert!(json.get("genre").is_none());
        assert!(json.get("deletedAt").is_none());
        assert_eq!(json["businessHours"]["close"], "06:00");
    }

    #[test]
    fn test_document_rebuilds_equal_store() {
        let store = sample();
        let rebuilt = StoreDocument::from(&store).into_store("stores").unwrap();
        assert_eq!(rebuilt, store);
    }

    #[test]
    fn test_invalid_enum_is_corrupt() {
        let mut doc = StoreDocument::from(&sample());
        doc.prefecture = "Atlantis".to_string();
        let err = doc.into_store("stores").unwrap_err();
        assert!(matches!(err, PersistenceError::Deserialization { .. }));
    }

    #[test]
    fn test_listing_reads_computed_fields() {
        let mut json = serde_json::to_value(StoreDocument::from(&sample())).unwrap();
        json["surveyCount"] = 3.into();
        json["helpfulCount"] = 9.into();
        json["averageEarningAgg"] = 6.5.into();
        let row: StoreListingDocument = serde_json::from_value(json).unwrap();
        let listing = row.into_listing("stores").unwrap();
        assert_eq!(listing.stats.survey_count, 3);
        assert_eq!(listing.stats.helpful_count, 9);
        assert_eq!(listing.stats.average_earning, 6.5);
    }
}
