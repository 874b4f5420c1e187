//! Core types for esg-align: the requirement corpus, documents, scores, and
//! Arrow result schemas.

pub mod corpus;
pub mod document;
pub mod error;
pub mod schema;
pub mod score;

pub use corpus::{CorpusError, Framework, RequirementCorpus, Topic};
pub use document::{Document, FrameworkSelection};
pub use error::InvalidInput;
pub use schema::results;
pub use score::{AlignmentLabel, AnalysisResult, FrameworkMean, TopicScore};
