//! Backend-neutral queries over documents
//!
//! Repositories describe what they want as a [`Filter`], a [`SortSpec`] and a
//! [`Pipeline`] of stages. The in-memory store executes these directly; the
//! SurrealDB backend renders them to SurrealQL.
//!
//! ```text
//! Match ──► LookupStats ──► Sort ──► Skip ──► Limit
//! ```

use std::cmp::Ordering;

use makoto_domain::{
    store::StoreSearchFilter,
    survey::SurveySearchFilter,
    value_objects::{Pagination, SortKey, SortKind},
};
use serde_json::Value;

use crate::document::fields;

/// One predicate on a document
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field equals the value
    Eq { field: &'static str, value: Value },
    /// Field is absent or null
    Missing { field: &'static str },
    /// Any of the fields contains `needle`, ignoring case
    ContainsIgnoreCase {
        fields: Vec<&'static str>,
        needle: String,
    },
}

impl Condition {
    pub fn matches(&self, doc: &Value) -> bool {
        match self {
            Self::Eq { field, value } => doc.get(field) == Some(value),
            Self::Missing { field } => doc.get(field).map_or(true, Value::is_null),
            Self::ContainsIgnoreCase { fields, needle } => fields.iter().any(|field| {
                doc.get(field)
                    .and_then(Value::as_str)
                    .is_some_and(|text| text.to_lowercase().contains(needle.as_str()))
            }),
        }
    }
}

/// Conjunction of conditions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    /// Matches every document
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches documents without a soft-delete marker
    pub fn live() -> Self {
        Self::all().missing(fields::DELETED_AT)
    }

    pub fn eq(mut self, field: &'static str, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Eq {
            field,
            value: value.into(),
        });
        self
    }

    pub fn missing(mut self, field: &'static str) -> Self {
        self.conditions.push(Condition::Missing { field });
        self
    }

    /// Case-insensitive substring match on any of `fields`
    pub fn contains_any(mut self, fields: &[&'static str], needle: &str) -> Self {
        self.conditions.push(Condition::ContainsIgnoreCase {
            fields: fields.to_vec(),
            needle: needle.to_lowercase(),
        });
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn matches(&self, doc: &Value) -> bool {
        self.conditions.iter().all(|c| c.matches(doc))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Ordered list of sort keys; later keys break ties of earlier ones
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortSpec {
    keys: Vec<(&'static str, Direction)>,
}

impl SortSpec {
    pub fn desc(mut self, field: &'static str) -> Self {
        self.keys.push((field, Direction::Desc));
        self
    }

    pub fn asc(mut self, field: &'static str) -> Self {
        self.keys.push((field, Direction::Asc));
        self
    }

    pub fn keys(&self) -> &[(&'static str, Direction)] {
        &self.keys
    }

    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        for (field, direction) in &self.keys {
            let ordering = compare_values(a.get(field), b.get(field));
            let ordering = match direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

/// Absent and null sort below everything else
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or_default();
            let y = y.as_f64().unwrap_or_default();
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

/// Join each document to the live documents of another collection and add
/// count / sum / mean fields computed over the joined set
#[derive(Debug, Clone, PartialEq)]
pub struct LookupStats {
    pub from: String,
    pub local_field: &'static str,
    pub foreign_field: &'static str,
    pub foreign_filter: Filter,
    pub sum_field: &'static str,
    pub mean_field: &'static str,
    pub count_as: &'static str,
    pub sum_as: &'static str,
    pub mean_as: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Match(Filter),
    LookupStats(LookupStats),
    Sort(SortSpec),
    Skip(u64),
    Limit(u64),
}

/// Ordered stages applied to one collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn matching(filter: Filter) -> Self {
        Self {
            stages: vec![Stage::Match(filter)],
        }
    }

    pub fn lookup_stats(mut self, lookup: LookupStats) -> Self {
        self.stages.push(Stage::LookupStats(lookup));
        self
    }

    pub fn sort(mut self, spec: SortSpec) -> Self {
        self.stages.push(Stage::Sort(spec));
        self
    }

    /// Skip and limit per `page`; the unbounded page adds nothing
    pub fn paginate(mut self, page: Pagination) -> Self {
        if !page.is_zero() {
            self.stages.push(Stage::Skip(page.offset()));
            self.stages.push(Stage::Limit(u64::from(page.limit())));
        }
        self
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.stages.push(Stage::Limit(n));
        self
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }
}

// ============================================================================
// Store queries
// ============================================================================

pub fn store_filter(filter: &StoreSearchFilter) -> Filter {
    let mut query = Filter::live();
    if let Some(prefecture) = filter.prefecture {
        query = query.eq(fields::PREFECTURE, prefecture.value());
    }
    if let Some(area) = filter.area {
        query = query.eq(fields::AREA, area.value());
    }
    if let Some(industry) = filter.industry {
        query = query.eq(fields::INDUSTRY, industry.value());
    }
    if let Some(genre) = filter.genre {
        query = query.eq(fields::GENRE, genre.value());
    }
    if let Some(keyword) = filter.keyword.as_deref().filter(|k| !k.trim().is_empty()) {
        query = query.contains_any(&[fields::NAME, fields::BRANCH_NAME], keyword.trim());
    }
    query
}

pub fn store_sort(sort: SortKey) -> SortSpec {
    match sort.kind() {
        SortKind::Newest => SortSpec::default().desc(fields::UPDATED_AT),
        SortKind::Helpful => SortSpec::default()
            .desc(fields::HELPFUL_COUNT)
            .desc(fields::UPDATED_AT),
        SortKind::Earning => SortSpec::default()
            .desc(fields::AVERAGE_EARNING_AGG)
            .desc(fields::UPDATED_AT),
    }
}

/// Plain store listings are ordered by creation time
pub fn store_listing_sort() -> SortSpec {
    SortSpec::default().desc(fields::CREATED_AT)
}

/// Join stores to their live surveys for the search statistics
pub fn survey_stats_lookup(survey_collection: &str) -> LookupStats {
    LookupStats {
        from: survey_collection.to_string(),
        local_field: fields::ID,
        foreign_field: fields::STORE_ID,
        foreign_filter: Filter::live(),
        sum_field: fields::HELPFUL_COUNT,
        mean_field: fields::AVERAGE_EARNING,
        count_as: fields::SURVEY_COUNT,
        sum_as: fields::HELPFUL_COUNT,
        mean_as: fields::AVERAGE_EARNING_AGG,
    }
}

pub fn store_search_pipeline(
    filter: &StoreSearchFilter,
    sort: SortKey,
    page: Pagination,
    survey_collection: &str,
) -> Pipeline {
    Pipeline::matching(store_filter(filter))
        .lookup_stats(survey_stats_lookup(survey_collection))
        .sort(store_sort(sort))
        .paginate(page)
}

// ============================================================================
// Survey queries
// ============================================================================

pub fn survey_filter(filter: &SurveySearchFilter) -> Filter {
    let mut query = Filter::live();
    if let Some(prefecture) = filter.prefecture {
        query = query.eq(fields::STORE_PREFECTURE, prefecture.value());
    }
    if let Some(industry) = filter.industry {
        query = query.eq(fields::STORE_INDUSTRY, industry.value());
    }
    if let Some(keyword) = filter.keyword.as_deref().filter(|k| !k.trim().is_empty()) {
        query = query.contains_any(&[fields::STORE_NAME, fields::STORE_BRANCH_NAME], keyword.trim());
    }
    query
}

pub fn survey_sort(sort: SortKey) -> SortSpec {
    match sort.kind() {
        SortKind::Newest => SortSpec::default().desc(fields::CREATED_AT),
        SortKind::Helpful => SortSpec::default()
            .desc(fields::HELPFUL_COUNT)
            .desc(fields::CREATED_AT),
        SortKind::Earning => SortSpec::default()
            .desc(fields::AVERAGE_EARNING)
            .desc(fields::CREATED_AT),
    }
}

/// Single live document by identity
pub fn by_id(id: &str) -> Pipeline {
    Pipeline::matching(Filter::live().eq(fields::ID, id)).limit(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use makoto_domain::value_objects::{Area, Prefecture};
    use serde_json::json;

    #[test]
    fn test_live_filter_excludes_deleted() {
        let filter = Filter::live();
        assert!(filter.matches(&json!({"name": "a"})));
        assert!(filter.matches(&json!({"name": "a", "deletedAt": null})));
        assert!(!filter.matches(&json!({"name": "a", "deletedAt": "2024-01-01T00:00:00.000000Z"})));
    }

    #[test]
    fn test_keyword_matches_name_or_branch_ignoring_case() {
        let filter = store_filter(&StoreSearchFilter::new().with_keyword("CLUB"));
        assert!(filter.matches(&json!({"name": "Night club"})));
        assert!(filter.matches(&json!({"name": "x", "branchName": "Club 新宿"})));
        assert!(!filter.matches(&json!({"name": "x"})));
    }

    #[test]
    fn test_store_filter_equality_criteria() {
        let filter = store_filter(
            &StoreSearchFilter::new()
                .with_prefecture(Prefecture::TOKYO)
                .with_area(Area::KABUKICHO),
        );
        assert!(filter.matches(&json!({"prefecture": "東京都", "area": "歌舞伎町"})));
        assert!(!filter.matches(&json!({"prefecture": "東京都", "area": "吉原"})));
        assert_eq!(filter.conditions().len(), 3);
    }

    #[test]
    fn test_sort_tie_break() {
        let spec = store_sort(SortKey::EARNING);
        let a = json!({"averageEarningAgg": 5.0, "updatedAt": "2024-01-02"});
        let b = json!({"averageEarningAgg": 5.0, "updatedAt": "2024-01-01"});
        let c = json!({"averageEarningAgg": 7.5, "updatedAt": "2023-01-01"});
        assert_eq!(spec.compare(&a, &b), Ordering::Less);
        assert_eq!(spec.compare(&c, &a), Ordering::Less);
    }

    #[test]
    fn test_missing_sorts_last_when_descending() {
        let spec = SortSpec::default().desc("helpfulCount");
        assert_eq!(
            spec.compare(&json!({"helpfulCount": 0}), &json!({})),
            Ordering::Less
        );
    }

    #[test]
    fn test_unbounded_page_adds_no_stages() {
        let pipeline = Pipeline::matching(Filter::live()).paginate(Pagination::unbounded());
        assert_eq!(pipeline.stages().len(), 1);

        let pipeline = Pipeline::matching(Filter::live()).paginate(Pagination::new(3, 20));
        assert_eq!(
            &pipeline.stages()[1..],
            &[Stage::Skip(40), Stage::Limit(20)]
        );
    }

    #[test]
    fn test_search_pipeline_stage_order() {
        let pipeline = store_search_pipeline(
            &StoreSearchFilter::new(),
            SortKey::HELPFUL,
            Pagination::new(1, 10),
            "surveys",
        );
        let kinds: Vec<&str> = pipeline
            .stages()
            .iter()
            .map(|s| match s {
                Stage::Match(_) => "match",
                Stage::LookupStats(_) => "lookup",
                Stage::Sort(_) => "sort",
                Stage::Skip(_) => "skip",
                Stage::Limit(_) => "limit",
            })
            .collect();
        assert_eq!(kinds, ["match", "lookup", "sort", "skip", "limit"]);
    }

    #[test]
    fn test_survey_sort_uses_created_at() {
        let spec = survey_sort(SortKey::default());
        assert_eq!(spec.keys(), &[(fields::CREATED_AT, Direction::Desc)]);
    }
}
