//! Model-collaborator integration: the HTTP gateway to the model
//! service, normalization of its untrusted output, and the image
//! analysis pipeline built on both.

pub mod error;
pub mod gateway;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod prompts;
pub mod service;

pub use error::{AnalysisError, AnalysisResult};
pub use gateway::{HttpModelGateway, ModelGateway, ModelServiceConfig};
pub use models::{ImageAnalysis, NormalizedAnalysis, QueryAnalysis, SearchPath};
pub use service::AnalysisService;
