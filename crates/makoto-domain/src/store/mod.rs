//! Store aggregate

mod listing;
mod search_filter;

pub use listing::{StoreListing, StoreStats};
pub use search_filter::StoreSearchFilter;

use crate::errors::{DomainError, DomainResult};
use crate::value_objects::{
    Area, AverageRating, BranchName, BusinessHours, Genre, Industry, Name, Prefecture, StoreId,
    Timestamp,
};

/// A listed business
///
/// Only obtainable through [`StoreBuilder::build`], so every instance holds
/// individually valid fields and non-zero timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct Store {
    id: StoreId,
    name: Name,
    branch_name: Option<BranchName>,
    prefecture: Prefecture,
    area: Option<Area>,
    genre: Option<Genre>,
    industry: Industry,
    business_hours: Option<BusinessHours>,
    average_rating: AverageRating,
    created_at: Timestamp,
    updated_at: Timestamp,
    deleted_at: Option<Timestamp>,
}

impl Store {
    /// Start assembling a store from its required fields
    pub fn builder(id: StoreId, name: Name, prefecture: Prefecture, industry: Industry) -> StoreBuilder {
        StoreBuilder {
            id,
            name,
            prefecture,
            industry,
            branch_name: None,
            area: None,
            genre: None,
            business_hours: None,
            average_rating: AverageRating::default(),
            created_at: None,
            updated_at: None,
            deleted_at: None,
            error: None,
        }
    }

    /// Re-open this store for a wholesale replacement keeping its identity
    pub fn to_builder(&self) -> StoreBuilder {
        StoreBuilder {
            id: self.id.clone(),
            name: self.name.clone(),
            prefecture: self.prefecture,
            industry: self.industry,
            branch_name: self.branch_name.clone(),
            area: self.area,
            genre: self.genre,
            business_hours: self.business_hours,
            average_rating: self.average_rating,
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
            deleted_at: self.deleted_at,
            error: None,
        }
    }

    pub fn id(&self) -> &StoreId {
        &self.id
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn branch_name(&self) -> Option<&BranchName> {
        self.branch_name.as_ref()
    }

    pub fn prefecture(&self) -> Prefecture {
        self.prefecture
    }

    pub fn area(&self) -> Option<Area> {
        self.area
    }

    pub fn genre(&self) -> Option<Genre> {
        self.genre
    }

    pub fn industry(&self) -> Industry {
        self.industry
    }

    pub fn business_hours(&self) -> Option<BusinessHours> {
        self.business_hours
    }

    pub fn average_rating(&self) -> AverageRating {
        self.average_rating
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

/// Collects optional fields for a [`Store`]
///
/// `try_with_*` setters take raw input and remember the first failure;
/// [`build`](Self::build) then rejects the whole store.
#[derive(Debug, Clone)]
pub struct StoreBuilder {
    id: StoreId,
    name: Name,
    prefecture: Prefecture,
    industry: Industry,
    branch_name: Option<BranchName>,
    area: Option<Area>,
    genre: Option<Genre>,
    business_hours: Option<BusinessHours>,
    average_rating: AverageRating,
    created_at: Option<Timestamp>,
    updated_at: Option<Timestamp>,
    deleted_at: Option<Timestamp>,
    error: Option<DomainError>,
}

impl StoreBuilder {
    pub fn with_name(mut self, name: Name) -> Self {
        self.name = name;
        self
    }

    pub fn with_prefecture(mut self, prefecture: Prefecture) -> Self {
        self.prefecture = prefecture;
        self
    }

    pub fn with_industry(mut self, industry: Industry) -> Self {
        self.industry = industry;
        self
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

    pub fn with_business_hours(mut self, hours: BusinessHours) -> Self {
        self.business_hours = Some(hours);
        self
    }

    pub fn with_average_rating(mut self, rating: AverageRating) -> Self {
        self.average_rating = rating;
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

    /// Drop the soft-delete marker
    pub fn restored(mut self) -> Self {
        self.deleted_at = None;
        self
    }

    pub fn try_with_branch_name(self, raw: &str) -> Self {
        self.apply(BranchName::new(raw), Self::with_branch_name)
    }

    pub fn try_with_area(self, raw: &str) -> Self {
        self.apply(Area::new(raw), Self::with_area)
    }

    pub fn try_with_genre(self, raw: &str) -> Self {
        self.apply(Genre::new(raw), Self::with_genre)
    }

    pub fn try_with_business_hours(self, open: &str, close: &str) -> Self {
        self.apply(BusinessHours::new(open, close), Self::with_business_hours)
    }

    pub fn try_with_average_rating(self, value: f64) -> Self {
        self.apply(AverageRating::new(value), Self::with_average_rating)
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

    /// Validate every field and produce the store
    pub fn build(self) -> DomainResult<Store> {
        if let Some(err) = self.error {
            return Err(err);
        }

        self.id.validate()?;
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
        if let Some(hours) = &self.business_hours {
            hours.validate()?;
        }
        self.average_rating.validate()?;

        let created_at = self.created_at.filter(|at| !at.is_zero()).unwrap_or_else(Timestamp::now);
        let updated_at = self.updated_at.filter(|at| !at.is_zero()).unwrap_or(created_at);
        let deleted_at = self.deleted_at.filter(|at| !at.is_zero());

        Ok(Store {
            id: self.id,
            name: self.name,
            branch_name: self.branch_name,
            prefecture: self.prefecture,
            area: self.area,
            genre: self.genre,
            industry: self.industry,
            business_hours: self.business_hours,
            average_rating: self.average_rating,
            created_at,
            updated_at,
            deleted_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> StoreBuilder {
        Store::builder(
            StoreId::parse("65a1b2c3d4e5f60718293a4b").unwrap(),
            Name::new("Club Makoto").unwrap(),
            Prefecture::TOKYO,
            Industry::DELIVERY_HEALTH,
        )
    }

    #[test]
    fn test_build_minimal_backfills_timestamps() {
        let store = builder().build().unwrap();
        assert!(!store.created_at().is_zero());
        assert_eq!(store.updated_at(), store.created_at());
        assert!(store.area().is_none());
        assert!(!store.is_deleted());
    }

    #[test]
    fn test_optional_fields() {
        let store = builder()
            .try_with_branch_name(" 新宿店 ")
            .try_with_area("歌舞伎町")
            .try_with_genre("高級店")
            .try_with_business_hours("20:00", "04:00")
            .try_with_average_rating(4.26)
            .build()
            .unwrap();
        assert_eq!(store.branch_name().map(|b| b.value()), Some("新宿店"));
        assert_eq!(store.area(), Some(Area::KABUKICHO));
        assert_eq!(store.genre(), Some(Genre::LUXURY));
        assert_eq!(store.average_rating().value(), 4.3);
        assert!(store.business_hours().unwrap().is_overnight());
    }

    #[test]
    fn test_blank_branch_is_absent() {
        let store = builder().try_with_branch_name("   ").build().unwrap();
        assert!(store.branch_name().is_none());
    }

    #[test]
    fn test_first_error_wins() {
        let err = builder()
            .try_with_area("渋谷")
            .try_with_genre("unknown")
            .build()
            .unwrap_err();
        assert_eq!(err.field(), Some("area"));
    }

    #[test]
    fn test_to_builder_keeps_identity_and_created_at() {
        let store = builder().build().unwrap();
        let deleted = store
            .to_builder()
            .with_deleted_at(Timestamp::now())
            .build()
            .unwrap();
        assert_eq!(deleted.id(), store.id());
        assert_eq!(deleted.created_at(), store.created_at());
        assert!(deleted.is_deleted());
    }
}
