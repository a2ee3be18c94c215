//! Value objects shared by both aggregates and by listing queries

use std::fmt;

use chrono::{DateTime, SubsecRound, Utc};

use crate::errors::{DomainError, DomainResult};

/// UTC instant stored on aggregates
///
/// Precision is truncated to microseconds so that the value survives a round
/// trip through any backing store unchanged. The zero value is the UNIX epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn new(at: DateTime<Utc>) -> DomainResult<Self> {
        let at = at.trunc_subsecs(6);
        if at == DateTime::<Utc>::default() {
            return Err(DomainError::required("timestamp"));
        }
        Ok(Self(at))
    }

    pub fn now() -> Self {
        Self(Utc::now().trunc_subsecs(6))
    }

    pub fn value(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == DateTime::<Utc>::default()
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.is_zero() {
            Err(DomainError::required("timestamp"))
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

/// Listing order requested by a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKind {
    /// Most recently touched first
    Newest,
    /// Highest helpful count first
    Helpful,
    /// Highest average earning first
    Earning,
}

/// Validated sort key: `newest`, `helpful` or `earning`
///
/// Blank input selects `newest`. The zero value also behaves as `newest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SortKey(&'static str);

impl SortKey {
    pub const NEWEST: Self = Self("newest");
    pub const HELPFUL: Self = Self("helpful");
    pub const EARNING: Self = Self("earning");

    pub const ALLOWED: &'static [&'static str] = &["newest", "helpful", "earning"];

    pub fn new(raw: &str) -> DomainResult<Self> {
        let sanitized = raw.trim().to_lowercase();
        if sanitized.is_empty() {
            return Ok(Self::NEWEST);
        }
        Self::ALLOWED
            .iter()
            .copied()
            .find(|candidate| *candidate == sanitized)
            .map(Self)
            .ok_or_else(|| DomainError::invalid("sort", format!("unsupported sort key {sanitized:?}")))
    }

    pub fn value(&self) -> &'static str {
        self.0
    }

    pub fn kind(&self) -> SortKind {
        match self.0 {
            "helpful" => SortKind::Helpful,
            "earning" => SortKind::Earning,
            _ => SortKind::Newest,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    pub fn validate(&self) -> DomainResult<()> {
        if Self::ALLOWED.contains(&self.0) {
            Ok(())
        } else {
            Err(DomainError::invalid("sort", format!("unsupported sort key {:?}", self.0)))
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.kind() {
            SortKind::Newest => "newest",
            SortKind::Helpful => "helpful",
            SortKind::Earning => "earning",
        };
        f.write_str(name)
    }
}

/// 1-based page request
///
/// `Pagination::default()` (page 0, limit 0) is the unbounded sentinel: no
/// skip and no limit are applied. It is distinct from any normalized page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pagination {
    page: u32,
    limit: u32,
}

impl Pagination {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const MAX_LIMIT: u32 = 100;

    /// Normalize a caller request; never fails
    pub fn new(page: i64, limit: i64) -> Self {
        let page = if page < i64::from(Self::DEFAULT_PAGE) {
            Self::DEFAULT_PAGE
        } else {
            u32::try_from(page).unwrap_or(u32::MAX)
        };
        let limit = if limit <= 0 {
            Self::DEFAULT_LIMIT
        } else {
            limit.min(i64::from(Self::MAX_LIMIT)) as u32
        };
        Self { page, limit }
    }

    /// No skip, no limit
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of documents to skip
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    pub fn is_zero(&self) -> bool {
        self.page == 0 && self.limit == 0
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.is_zero()
            || (self.page >= Self::DEFAULT_PAGE && self.limit > 0 && self.limit <= Self::MAX_LIMIT)
        {
            Ok(())
        } else {
            Err(DomainError::out_of_range(
                "pagination",
                format!("page {} limit {}", self.page, self.limit),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_pagination_defaults() {
        let p = Pagination::new(0, 0);
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), 10);
        assert!(!p.is_zero());
    }

    #[test]
    fn test_pagination_clamps_limit() {
        assert_eq!(Pagination::new(1, 500).limit(), 100);
        assert_eq!(Pagination::new(-4, -1).page(), 1);
    }

    #[test]
    fn test_pagination_offset() {
        assert_eq!(Pagination::new(3, 20).offset(), 40);
        assert_eq!(Pagination::new(1, 20).offset(), 0);
    }

    #[test]
    fn test_unbounded_is_zero() {
        let p = Pagination::unbounded();
        assert!(p.is_zero());
        assert_eq!(p.offset(), 0);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_sort_key_blank_defaults_to_newest() {
        assert_eq!(SortKey::new("  ").unwrap(), SortKey::NEWEST);
        assert_eq!(SortKey::new(" Earning ").unwrap(), SortKey::EARNING);
        assert_eq!(SortKey::new("helpful").unwrap().kind(), SortKind::Helpful);
    }

    #[test]
    fn test_sort_key_rejects_unknown() {
        let err = SortKey::new("oldest").unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::Validation);
    }

    #[test]
    fn test_sort_key_zero_behaves_as_newest() {
        let zero = SortKey::default();
        assert!(zero.is_zero());
        assert_eq!(zero.kind(), SortKind::Newest);
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_timestamp_rejects_epoch() {
        assert!(Timestamp::new(DateTime::<Utc>::default()).is_err());
        assert!(Timestamp::default().is_zero());
    }

    #[test]
    fn test_timestamp_truncates_to_micros() {
        let at = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let ts = Timestamp::new(at).unwrap();
        assert_eq!(ts.value().timestamp_subsec_nanos(), 123_456_000);
    }
}
