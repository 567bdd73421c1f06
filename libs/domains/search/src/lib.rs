//! Search orchestration: ties the model gateway and the catalog
//! retrieval engine together behind the `/search` endpoint.

pub mod error;
pub mod handlers;
pub mod models;
pub mod service;

pub use error::{SearchError, SearchResult};
pub use models::{SearchRequest, SearchResponse};
pub use service::SearchService;
