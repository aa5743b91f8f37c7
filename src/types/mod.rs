//! Core request and result types.

pub mod article;
pub mod request;

pub use article::{ArticleMetadata, GeneratedArticle, RequestOutcome};
pub use request::{GenerationRequest, StyleParameters, MAX_KEYWORDS};
