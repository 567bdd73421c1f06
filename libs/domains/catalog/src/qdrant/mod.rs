mod client;
mod config;

pub use client::QdrantCatalogRepository;
pub use config::QdrantConfig;
