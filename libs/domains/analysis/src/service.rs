use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::{error, info, instrument};

use crate::error::AnalysisResult;
use crate::gateway::ModelGateway;
use crate::models::ImageAnalysis;
use crate::normalize;
use crate::prompts::{ANSWER_FALLBACK, FAILURE_DESCRIPTION, VISION_ANALYSIS_PROMPT, answer_prompt};

/// Image analysis and text generation over a [`ModelGateway`].
///
/// Both entry points are infallible: whatever goes wrong inside, the
/// caller gets a complete record (image analysis) or an apology string
/// (text generation). Failures are logged, never propagated.
pub struct AnalysisService<G: ModelGateway> {
    gateway: Arc<G>,
    /// Dimension of the zero vector used in the terminal fallback.
    dimension: usize,
}

impl<G: ModelGateway> AnalysisService<G> {
    pub fn new(gateway: Arc<G>, dimension: usize) -> Self {
        Self { gateway, dimension }
    }

    pub fn gateway(&self) -> Arc<G> {
        Arc::clone(&self.gateway)
    }

    /// Analyze an uploaded product image into a complete record.
    ///
    /// Pipeline: base64-encode, ask the vision model for a product
    /// JSON, normalize its output (refusals become the all-fallback
    /// record), then embed the normalized fields for search. Gateway
    /// failures land on the terminal fallback with a zero vector.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn analyze_image(&self, file_name: &str, bytes: &[u8]) -> ImageAnalysis {
        match self.try_analyze(file_name, bytes).await {
            Ok(analysis) => analysis,
            Err(err) => {
                error!(%err, file_name, "image analysis failed, using fallback record");
                self.failure_record(file_name)
            }
        }
    }

    async fn try_analyze(&self, file_name: &str, bytes: &[u8]) -> AnalysisResult<ImageAnalysis> {
        let image_b64 = BASE64.encode(bytes);

        info!(file_name, "analyzing image");
        let raw = self
            .gateway
            .generate_from_image(VISION_ANALYSIS_PROMPT, &image_b64)
            .await?;

        let record = normalize::normalize_analysis(&raw, file_stem(file_name));

        let meta_text = format!("{} {} {}", record.name, record.category, record.description);
        let vector = self.gateway.embed(&meta_text).await?;

        Ok(ImageAnalysis {
            name: record.name,
            category: record.category,
            description: record.description,
            price: record.price,
            vector,
        })
    }

    fn failure_record(&self, file_name: &str) -> ImageAnalysis {
        ImageAnalysis {
            name: format!("등록된 상품 ({})", file_name),
            category: "Etc".to_string(),
            description: FAILURE_DESCRIPTION.to_string(),
            price: 0,
            vector: vec![0.0; self.dimension],
        }
    }

    /// Answer a free-form prompt in Korean.
    #[instrument(skip(self, prompt))]
    pub async fn generate_answer(&self, prompt: &str) -> String {
        match self.gateway.generate_text(&answer_prompt(prompt)).await {
            Ok(raw) => normalize::normalize_text_answer(&raw),
            Err(err) => {
                error!(%err, "text generation failed, using fallback answer");
                ANSWER_FALLBACK.to_string()
            }
        }
    }
}

fn file_stem(file_name: &str) -> &str {
    file_name.split('.').next().unwrap_or(file_name)
}
