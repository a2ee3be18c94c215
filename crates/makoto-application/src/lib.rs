//! Makoto Club Application Layer
//!
//! The Application Layer implements use cases by orchestrating the store and
//! survey aggregates through the repository traits. Services are stateless;
//! every call takes a [`RequestContext`] carrying cancellation and a deadline.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Application Layer                                 │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  Services          │ DTOs              │ Ports              │ Context   │
//! │  ─────────         │ ────              │ ─────              │ ───────   │
//! │  StoreService      │ StoreInput        │ SurveyNotifier     │ Request-  │
//! │  SurveyService     │ SurveyInput       │                    │ Context   │
//! │                    │ StoreDto          │                    │           │
//! │                    │ SurveyDto         │                    │           │
//! │                    │ ListResponse      │                    │           │
//! └─────────────────────────────────────────────────────────────────────────┘
//!                              ▲
//!                              │ depends on
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Layer                                     │
//! │  Aggregates, Value Objects, Repository Traits                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Non-Goals
//!
//! - Domain logic (belongs in Domain Layer)
//! - Direct I/O operations (belongs in Infrastructure Layer)
//! - HTTP handling (belongs in Presentation Layer)

pub mod context;
pub mod dto;
pub mod errors;
pub mod notifier;
pub mod services;

// Re-export commonly used types
pub use context::RequestContext;
pub use dto::*;
pub use errors::{ApplicationError, ApplicationResult};
pub use notifier::{LoggingNotifier, NoOpNotifier, NotifyError, SurveyNotification, SurveyNotifier};
pub use services::*;
