//! Configuration for the Search API

use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use domain_analysis::ModelServiceConfig;
use domain_catalog::QdrantConfig;
use domain_catalog::retrieval::RetrievalConfig;

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub qdrant: QdrantConfig,
    pub model: ModelServiceConfig,
    pub retrieval: RetrievalConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let qdrant = QdrantConfig::from_env();
        let model = ModelServiceConfig::from_env();
        let retrieval =
            RetrievalConfig::from_env().map_err(|e| eyre::eyre!("retrieval config: {}", e))?;

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            qdrant,
            model,
            retrieval,
        })
    }
}
