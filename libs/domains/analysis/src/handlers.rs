//! HTTP handlers for the analysis endpoints

use axum::{
    Json, Router,
    extract::{Multipart, State},
    routing::post,
};
use axum_helpers::{AppError, ErrorResponse, ValidatedJson};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::gateway::ModelGateway;
use crate::models::{AnswerResponse, GenerateAnswerRequest, ImageAnalysis};
use crate::service::AnalysisService;

/// OpenAPI documentation for the analysis endpoints
#[derive(OpenApi)]
#[openapi(
    paths(analyze_image, generate_answer),
    components(schemas(ImageAnalysis, GenerateAnswerRequest, AnswerResponse, ErrorResponse)),
    tags(
        (name = "Analysis", description = "Image analysis and text generation endpoints")
    )
)]
pub struct ApiDoc;

/// Create the analysis router
pub fn router<G: ModelGateway + 'static>(service: Arc<AnalysisService<G>>) -> Router {
    Router::new()
        .route("/analyze-image", post(analyze_image))
        .route("/generate-answer", post(generate_answer))
        .with_state(service)
}

/// Analyze an uploaded product image into a complete record
///
/// Always answers 200 with a fully populated record; analysis failures
/// surface as the fallback record, not as an error status.
#[utoipa::path(
    post,
    path = "/analyze-image",
    tag = "Analysis",
    responses(
        (status = 200, description = "Complete product record", body = ImageAnalysis),
        (status = 400, description = "Missing file field", body = ErrorResponse)
    )
)]
async fn analyze_image<G: ModelGateway + 'static>(
    State(service): State<Arc<AnalysisService<G>>>,
    mut multipart: Multipart,
) -> Result<Json<ImageAnalysis>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidMultipart(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidMultipart(format!("Failed to read file: {}", e)))?;

        let analysis = service.analyze_image(&file_name, &bytes).await;
        return Ok(Json(analysis));
    }

    Err(AppError::BadRequest(
        "Missing required 'file' field".to_string(),
    ))
}

/// Generate a Korean answer for a free-form prompt
#[utoipa::path(
    post,
    path = "/generate-answer",
    tag = "Analysis",
    request_body = GenerateAnswerRequest,
    responses(
        (status = 200, description = "Generated answer", body = AnswerResponse),
        (status = 400, description = "Validation error", body = ErrorResponse)
    )
)]
async fn generate_answer<G: ModelGateway + 'static>(
    State(service): State<Arc<AnalysisService<G>>>,
    ValidatedJson(request): ValidatedJson<GenerateAnswerRequest>,
) -> Json<AnswerResponse> {
    let answer = service.generate_answer(&request.prompt).await;
    Json(AnswerResponse { answer })
}
