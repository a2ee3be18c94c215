//! Application layer services
//!
//! These services implement the store and survey use cases. All services
//! are stateless and use constructor injection for dependencies.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Services                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  StoreService   - store lifecycle, listings and search       │
//! │  SurveyService  - survey lifecycle, listings, submissions    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Non-Goals
//!
//! - Domain logic (belongs in Domain Layer)
//! - Direct I/O (belongs in Infrastructure Layer)

mod store_service;
mod survey_service;

pub use store_service::StoreService;
pub use survey_service::{SurveyService, DEFAULT_NOTIFY_TIMEOUT};
