//! Survey-side value objects

use std::fmt;

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::errors::{DomainError, DomainResult};

object_id_value_object!(
    /// Survey identifier: 24 lowercase hex characters assigned by the backing store
    SurveyId,
    field = "survey_id"
);

/// Year and month the respondent worked at the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct VisitedPeriod {
    year: i32,
    month: u32,
}

impl VisitedPeriod {
    /// Parse a `YYYY-MM` string
    pub fn new(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::required("visited_period"));
        }
        let bad = || DomainError::format("visited_period", format!("expected YYYY-MM, got {trimmed:?}"));
        let (year, month) = trimmed.split_once('-').ok_or_else(bad)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(bad());
        }
        let year: i32 = year.parse().map_err(|_| bad())?;
        let month: u32 = month.parse().map_err(|_| bad())?;
        let date = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(bad)?;
        Ok(Self {
            year: date.year(),
            month: date.month(),
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Storage form, `YYYY-MM`
    pub fn value(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Human form, `YYYY年M月`
    pub fn label(&self) -> String {
        if self.is_zero() {
            return String::new();
        }
        format!("{}年{}月", self.year, self.month)
    }

    pub fn is_zero(&self) -> bool {
        self.year == 0 && self.month == 0
    }

    pub fn validate(&self) -> DomainResult<()> {
        if (1..=12).contains(&self.month) && self.year > 0 {
            Ok(())
        } else {
            Err(DomainError::required("visited_period"))
        }
    }
}

impl fmt::Display for VisitedPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

enum_value_object!(
    /// Employment style
    WorkType,
    field = "work_type",
    values = [
        RESIDENT => "在籍",
        VISITING => "出稼ぎ",
    ]
);

clamped_value_object!(
    /// Respondent age in years
    Age,
    field = "age",
    min = 18,
    max = 60
);

clamped_value_object!(
    /// Self-reported spec score (height minus weight)
    SpecScore,
    field = "spec_score",
    min = 60,
    max = 140
);

clamped_value_object!(
    /// Hours spent waiting per shift
    WaitTimeHours,
    field = "wait_time_hours",
    min = 1,
    max = 24
);

clamped_value_object!(
    /// Average earning per day, in units of 10,000 yen
    AverageEarning,
    field = "average_earning",
    min = 0,
    max = 20
);

rating_value_object!(
    /// Overall rating given by the respondent
    Rating,
    field = "rating"
);

/// Ceiling shared by the long-form comment fields
pub const MAX_COMMENT_CHARS: usize = 2000;

text_value_object!(
    /// Comment about the clientele
    CustomerComment,
    field = "customer_comment",
    max_chars = MAX_COMMENT_CHARS
);

text_value_object!(
    /// Comment about the staff
    StaffComment,
    field = "staff_comment",
    max_chars = MAX_COMMENT_CHARS
);

text_value_object!(
    /// Comment about the work environment
    WorkEnvironmentComment,
    field = "work_environment_comment",
    max_chars = MAX_COMMENT_CHARS
);

text_value_object!(
    /// Free-form remarks
    EtcComment,
    field = "etc_comment"
);

text_value_object!(
    /// Description of the cast back arrangement
    CastBack,
    field = "cast_back"
);

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern is valid")
});

/// Contact address; blank input yields the zero value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub const MAX_LEN: usize = 256;

    pub fn new(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        Self::check(trimmed)?;
        Ok(Self(trimmed.to_string()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.is_zero() {
            return Ok(());
        }
        Self::check(&self.0)
    }

    fn check(candidate: &str) -> DomainResult<()> {
        if candidate.len() > Self::MAX_LEN {
            return Err(DomainError::TooLong {
                field: "email_address".to_string(),
                max: Self::MAX_LEN,
            });
        }
        if !EMAIL_PATTERN.is_match(candidate) {
            return Err(DomainError::format("email_address", "not an email address"));
        }
        Ok(())
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Absolute http(s) URL of an uploaded image
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ImageUrl(String);

impl ImageUrl {
    pub fn new(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::required("image_url"));
        }
        Self::check(trimmed)?;
        Ok(Self(trimmed.to_string()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    pub fn validate(&self) -> DomainResult<()> {
        Self::check(&self.0)
    }

    fn check(candidate: &str) -> DomainResult<()> {
        let parsed = Url::parse(candidate)
            .map_err(|e| DomainError::format("image_url", e.to_string()))?;
        match parsed.scheme() {
            "http" | "https" if parsed.has_host() => Ok(()),
            scheme => Err(DomainError::format(
                "image_url",
                format!("unsupported scheme {scheme:?}"),
            )),
        }
    }
}

impl fmt::Display for ImageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Up to ten image URLs attached to a survey
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ImageUrls(Vec<ImageUrl>);

impl ImageUrls {
    pub const MAX: usize = 10;

    pub fn new<S: AsRef<str>>(inputs: &[S]) -> DomainResult<Self> {
        if inputs.len() > Self::MAX {
            return Err(DomainError::TooMany {
                field: "image_urls".to_string(),
                max: Self::MAX,
            });
        }
        let urls = inputs
            .iter()
            .map(|raw| ImageUrl::new(raw.as_ref()))
            .collect::<DomainResult<Vec<_>>>()?;
        Ok(Self(urls))
    }

    pub fn values(&self) -> &[ImageUrl] {
        &self.0
    }

    /// Plain strings, for persistence and transport
    pub fn strings(&self) -> Vec<String> {
        self.0.iter().map(|url| url.value().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.0.len() > Self::MAX {
            return Err(DomainError::TooMany {
                field: "image_urls".to_string(),
                max: Self::MAX,
            });
        }
        self.0.iter().try_for_each(ImageUrl::validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn test_visited_period() {
        let period = VisitedPeriod::new(" 2024-03 ").unwrap();
        assert_eq!(period.value(), "2024-03");
        assert_eq!(period.label(), "2024年3月");
        assert!(VisitedPeriod::new("2024-13").is_err());
        assert!(VisitedPeriod::new("2024/03").is_err());
        assert!(matches!(
            VisitedPeriod::new(""),
            Err(DomainError::Required { .. })
        ));
    }

    #[test]
    fn test_clamped_bounds() {
        assert!(Age::new(17).is_err());
        assert_eq!(Age::new(18).unwrap().value(), 18);
        assert_eq!(Age::new(61).unwrap().value(), 60);
        assert_eq!(SpecScore::new(141).unwrap().value(), 140);
        assert!(WaitTimeHours::new(0).is_err());
        assert_eq!(WaitTimeHours::new(30).unwrap().value(), 24);
        assert!(AverageEarning::new(-1).is_err());
        assert_eq!(AverageEarning::new(0).unwrap().value(), 0);
        assert_eq!(AverageEarning::new(21).unwrap().value(), 20);
    }

    #[test]
    fn test_comment_ceiling_counts_code_points() {
        let at_limit = "あ".repeat(MAX_COMMENT_CHARS);
        assert!(CustomerComment::new(&at_limit).is_ok());
        let over = "あ".repeat(MAX_COMMENT_CHARS + 1);
        let err = StaffComment::new(&over).unwrap_err();
        assert!(matches!(err, DomainError::TooLong { max: 2000, .. }));
    }

    #[test]
    fn test_permissive_text_only_trims() {
        assert_eq!(EtcComment::new("  free  ").unwrap().value(), "free");
        assert!(CastBack::new(&"x".repeat(5000)).is_ok());
    }

    #[test]
    fn test_email() {
        assert!(EmailAddress::new("   ").unwrap().is_zero());
        assert_eq!(
            EmailAddress::new(" cast@example.com ").unwrap().value(),
            "cast@example.com"
        );
        assert_eq!(
            EmailAddress::new("not-an-email").unwrap_err().kind(),
            ErrorKind::Format
        );
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            EmailAddress::new(&long),
            Err(DomainError::TooLong { .. })
        ));
    }

    #[test]
    fn test_image_urls() {
        let urls = ImageUrls::new(&["https://cdn.example.com/a.jpg", "http://example.com/b.png"]).unwrap();
        assert_eq!(urls.len(), 2);
        assert!(ImageUrls::new(&["ftp://example.com/a.jpg"]).is_err());
        assert!(ImageUrls::new(&["/relative/a.jpg"]).is_err());
        let eleven: Vec<String> = (0..11).map(|i| format!("https://example.com/{i}.jpg")).collect();
        assert!(matches!(
            ImageUrls::new(eleven.as_slice()),
            Err(DomainError::TooMany { max: 10, .. })
        ));
    }

    #[test]
    fn test_rating() {
        assert_eq!(Rating::new(3.14).unwrap().value(), 3.1);
        assert_eq!(Rating::new(4.96).unwrap().value(), 5.0);
        assert!(Rating::new(-0.1).is_err());
        assert!(Rating::new(5.1).is_err());
    }

    #[test]
    fn test_work_type() {
        assert_eq!(WorkType::new("出稼ぎ").unwrap(), WorkType::VISITING);
        assert!(WorkType::new("派遣").is_err());
    }
}
