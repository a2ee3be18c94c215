//! Value objects representing immutable domain concepts
//!
//! Every value object exposes a validating constructor, `value()`,
//! `validate()` for re-checking decoded data, and `is_zero()`. `Default`
//! produces the zero value, which doubles as "not set".

#[macro_use]
mod macros;

pub mod common;
pub mod store;
pub mod survey;

pub use common::{Pagination, SortKey, SortKind, Timestamp};
pub use store::{
    Area, AverageRating, BranchName, BusinessHours, Genre, Industry, Name, Prefecture, StoreId,
    UnitPrice,
};
pub use survey::{
    Age, AverageEarning, CastBack, CustomerComment, EmailAddress, EtcComment, ImageUrl,
    ImageUrls, Rating, SpecScore, StaffComment, SurveyId, VisitedPeriod, WaitTimeHours,
    WorkEnvironmentComment, WorkType, MAX_COMMENT_CHARS,
};
