//! Document shapes shared by every backend
//!
//! Field names are camelCase. Optional fields are omitted when absent and
//! `deletedAt` is a presence flag. Timestamps are fixed-width RFC 3339 strings
//! with microsecond precision so they order correctly as plain strings.

mod store;
mod survey;

pub use store::{BusinessHoursDocument, StoreDocument, StoreListingDocument};
pub use survey::SurveyDocument;

use chrono::{DateTime, Utc};
use makoto_domain::value_objects::Timestamp;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::PersistenceError;

/// Field names used by queries
pub mod fields {
    pub const ID: &str = "_id";
    pub const CREATED_AT: &str = "createdAt";
    pub const UPDATED_AT: &str = "updatedAt";
    pub const DELETED_AT: &str = "deletedAt";

    pub const NAME: &str = "name";
    pub const BRANCH_NAME: &str = "branchName";
    pub const PREFECTURE: &str = "prefecture";
    pub const AREA: &str = "area";
    pub const INDUSTRY: &str = "industry";
    pub const GENRE: &str = "genre";

    pub const STORE_ID: &str = "storeId";
    pub const STORE_NAME: &str = "storeName";
    pub const STORE_BRANCH_NAME: &str = "storeBranchName";
    pub const STORE_PREFECTURE: &str = "storePrefecture";
    pub const STORE_INDUSTRY: &str = "storeIndustry";
    pub const AVERAGE_EARNING: &str = "averageEarning";
    pub const HELPFUL_COUNT: &str = "helpfulCount";

    /// Computed by the store search join
    pub const SURVEY_COUNT: &str = "surveyCount";
    /// Computed by the store search join
    pub const AVERAGE_EARNING_AGG: &str = "averageEarningAgg";
}

/// Collection (table) names used by a pair of repositories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionNames {
    pub stores: String,
    pub surveys: String,
}

impl CollectionNames {
    pub fn new(stores: impl Into<String>, surveys: impl Into<String>) -> Self {
        Self {
            stores: stores.into(),
            surveys: surveys.into(),
        }
    }
}

impl Default for CollectionNames {
    fn default() -> Self {
        Self::new("stores", "surveys")
    }
}

pub(crate) fn encode<T: Serialize>(doc: &T) -> Result<Value, PersistenceError> {
    serde_json::to_value(doc).map_err(|e| PersistenceError::Serialization(e.to_string()))
}

/// Missing or mistyped fields are reported as a corrupt record
pub(crate) fn decode<T: DeserializeOwned>(collection: &str, doc: Value) -> Result<T, PersistenceError> {
    serde_json::from_value(doc).map_err(|e| PersistenceError::corrupt(collection, e.to_string()))
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

pub(crate) fn format_timestamp(ts: Timestamp) -> String {
    ts.value().format(TIMESTAMP_FORMAT).to_string()
}

pub(crate) fn parse_timestamp(collection: &str, raw: &str) -> Result<Timestamp, PersistenceError> {
    let at = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| PersistenceError::corrupt(collection, format!("timestamp {raw:?}: {e}")))?
        .with_timezone(&Utc);
    Timestamp::new(at).map_err(|e| PersistenceError::corrupt(collection, e.to_string()))
}
