use crate::value_objects::{Area, Genre, Industry, Prefecture};

/// Criteria for listing stores
///
/// Every `Some` criterion narrows the result by equality. `keyword` is a
/// case-insensitive substring match against the name or the branch name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSearchFilter {
    pub prefecture: Option<Prefecture>,
    pub area: Option<Area>,
    pub industry: Option<Industry>,
    pub genre: Option<Genre>,
    pub keyword: Option<String>,
}

impl StoreSearchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefecture(mut self, prefecture: Prefecture) -> Self {
        self.prefecture = Some(prefecture);
        self
    }

    pub fn with_area(mut self, area: Area) -> Self {
        self.area = Some(area);
        self
    }

    pub fn with_industry(mut self, industry: Industry) -> Self {
        self.industry = Some(industry);
        self
    }

    pub fn with_genre(mut self, genre: Genre) -> Self {
        self.genre = Some(genre);
        self
    }

    /// Blank keywords are ignored
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        let trimmed = keyword.trim();
        self.keyword = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.prefecture.is_none()
            && self.area.is_none()
            && self.industry.is_none()
            && self.genre.is_none()
            && self.keyword.is_none()
    }
}
