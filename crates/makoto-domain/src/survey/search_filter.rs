use crate::value_objects::{Industry, Prefecture};

/// Criteria for the survey listings used by the admin screens
///
/// `keyword` is a case-insensitive substring match against the snapshotted
/// store name or branch name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveySearchFilter {
    pub prefecture: Option<Prefecture>,
    pub industry: Option<Industry>,
    pub keyword: Option<String>,
}

impl SurveySearchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefecture(mut self, prefecture: Prefecture) -> Self {
        self.prefecture = Some(prefecture);
        self
    }

    pub fn with_industry(mut self, industry: Industry) -> Self {
        self.industry = Some(industry);
        self
    }

    /// Blank keywords are ignored
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        let trimmed = keyword.trim();
        self.keyword = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }
}
