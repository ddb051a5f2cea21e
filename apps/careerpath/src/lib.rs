//! Client-side glue for the career-path web app: REST wrappers for the
//! career-path resource plus the content-moderation heuristics that run
//! before user content is persisted.

pub mod career_path;
pub mod config;
pub mod errors;
pub mod format;
pub mod models;
pub mod moderation;
pub mod store;
pub mod telemetry;

pub use career_path::{CareerPathClient, CareerPathError};
pub use config::Config;
pub use errors::StoreError;
pub use models::content::ContentItem;
pub use moderation::{
    ActionLogger, ContentGuard, DuplicateDetector, SafetyClassifier, SafetyVerdict,
    ValidationResult,
};
pub use store::{Filter, Row, Store};
