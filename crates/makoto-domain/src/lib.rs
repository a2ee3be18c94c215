//! makoto-domain: core domain model for the makoto-club directory
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       makoto-domain                      │
//! │                                                          │
//! │  value_objects ──► store::Store ◄── StoreBuilder          │
//! │        │                 │                               │
//! │        └──────────► survey::Survey ◄── SurveyBuilder      │
//! │                          │      (StoreSnapshot)          │
//! │                          ▼                               │
//! │              repositories (traits only)                  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Aggregates can only be obtained through their builders, whose `build()`
//! runs one validation pass over every field. Persistence adapters rebuild
//! aggregates the same way when reading documents back.

pub mod errors;
pub mod repositories;
pub mod store;
pub mod survey;
pub mod value_objects;

pub use errors::{DomainError, DomainResult, ErrorKind};
pub use repositories::{Page, StoreRepository, SurveyRepository};
pub use store::{Store, StoreBuilder, StoreListing, StoreSearchFilter, StoreStats};
pub use survey::{StoreSnapshot, Survey, SurveyAnswers, SurveyBuilder, SurveySearchFilter};
