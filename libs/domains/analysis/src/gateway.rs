use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use crate::error::{AnalysisError, AnalysisResult};
use crate::models::{QueryAnalysis, SearchPath};

/// Model service connection configuration
#[derive(Debug, Clone)]
pub struct ModelServiceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl ModelServiceConfig {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            timeout_secs: 60,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn from_env() -> Self {
        let base_url = std::env::var("MODEL_SERVICE_URL")
            .unwrap_or_else(|_| "http://ai-service-api:8000/api/v1".to_string());

        // Model inference is slow; the bound exists so one stuck call
        // cannot hang a search request forever.
        let timeout_secs = std::env::var("MODEL_SERVICE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);

        Self {
            base_url,
            timeout_secs,
        }
    }
}

impl Default for ModelServiceConfig {
    fn default() -> Self {
        Self::new("http://ai-service-api:8000/api/v1".to_string())
    }
}

/// Trait for the model collaborator behind the analysis pipelines.
///
/// An empty embedding is NOT an error at this layer; callers decide
/// what an empty vector means for their operation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Embed a text into the search vector space.
    async fn embed(&self, text: &str) -> AnalysisResult<Vec<f32>>;

    /// Generate free-form text from a prompt plus a base64 image.
    async fn generate_from_image(&self, prompt: &str, image_b64: &str) -> AnalysisResult<String>;

    /// Generate a free-form text answer.
    async fn generate_text(&self, prompt: &str) -> AnalysisResult<String>;

    /// Ask the model service which pipeline should handle a query.
    async fn determine_path(&self, query: &str) -> AnalysisResult<SearchPath>;

    /// Run a query through the chosen pipeline, yielding its embedding
    /// and a human-readable reason string.
    async fn process_query<'a>(
        &self,
        path: SearchPath,
        query: &str,
        image_b64: Option<&'a str>,
    ) -> AnalysisResult<QueryAnalysis>;
}

/// HTTP implementation of [`ModelGateway`] against the model service.
pub struct HttpModelGateway {
    client: Client,
    config: ModelServiceConfig,
}

impl HttpModelGateway {
    pub fn new(config: ModelServiceConfig) -> AnalysisResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AnalysisError::Config(format!("Failed to build client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> AnalysisResult<Self> {
        Self::new(ModelServiceConfig::from_env())
    }

    async fn post_json<Req, Resp>(&self, path: &str, request: &Req) -> AnalysisResult<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}{}", self.config.base_url, path))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Upstream(format!(
                "{} returned {}: {}",
                path, status, error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AnalysisError::Upstream(format!("{} returned invalid body: {}", path, e)))
    }
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    vector: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct GenerateImageRequest<'a> {
    prompt: &'a str,
    image_b64: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerateTextRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    answer: String,
}

#[derive(Debug, Serialize)]
struct PathRequest<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct PathResponse {
    path: SearchPath,
}

#[derive(Debug, Serialize)]
struct ProcessRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_b64: Option<&'a str>,
}

#[async_trait]
impl ModelGateway for HttpModelGateway {
    async fn embed(&self, text: &str) -> AnalysisResult<Vec<f32>> {
        let response: EmbedResponse = self.post_json("/embed-text", &EmbedRequest { text }).await?;
        Ok(response.vector)
    }

    async fn generate_from_image(&self, prompt: &str, image_b64: &str) -> AnalysisResult<String> {
        let response: GenerateResponse = self
            .post_json("/generate-image", &GenerateImageRequest { prompt, image_b64 })
            .await?;
        Ok(response.answer)
    }

    async fn generate_text(&self, prompt: &str) -> AnalysisResult<String> {
        let response: GenerateResponse = self
            .post_json("/generate-text", &GenerateTextRequest { prompt })
            .await?;
        Ok(response.answer)
    }

    async fn determine_path(&self, query: &str) -> AnalysisResult<SearchPath> {
        let response: PathResponse = self
            .post_json("/determine-path", &PathRequest { query })
            .await?;
        Ok(response.path)
    }

    async fn process_query<'a>(
        &self,
        path: SearchPath,
        query: &str,
        image_b64: Option<&'a str>,
    ) -> AnalysisResult<QueryAnalysis> {
        let endpoint = match path {
            SearchPath::External => "/process-external",
            SearchPath::Internal => "/process-internal",
        };

        self.post_json(endpoint, &ProcessRequest { query, image_b64 })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_from_env_defaults() {
        temp_env::with_vars(
            [
                ("MODEL_SERVICE_URL", None::<&str>),
                ("MODEL_SERVICE_TIMEOUT_SECS", None),
            ],
            || {
                let config = ModelServiceConfig::from_env();
                assert_eq!(config.base_url, "http://ai-service-api:8000/api/v1");
                assert_eq!(config.timeout_secs, 60);
            },
        );
    }

    #[test]
    fn config_from_env_overrides() {
        temp_env::with_vars(
            [
                ("MODEL_SERVICE_URL", Some("http://localhost:8000/api/v1")),
                ("MODEL_SERVICE_TIMEOUT_SECS", Some("5")),
            ],
            || {
                let config = ModelServiceConfig::from_env();
                assert_eq!(config.base_url, "http://localhost:8000/api/v1");
                assert_eq!(config.timeout_secs, 5);
            },
        );
    }
}
