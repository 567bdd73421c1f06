use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use validator::Validate;

/// Which model pipeline handles a search query.
///
/// The model service decides this per query; anything it returns that
/// we do not recognize collapses to [`SearchPath::Internal`], the safe
/// default, rather than failing the search.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default, ToSchema,
)]
#[serde(from = "String")]
pub enum SearchPath {
    #[default]
    #[serde(rename = "INTERNAL")]
    #[strum(serialize = "INTERNAL")]
    Internal,
    #[serde(rename = "EXTERNAL")]
    #[strum(serialize = "EXTERNAL")]
    External,
}

impl From<String> for SearchPath {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_default()
    }
}

/// Structured product fields recovered from free-form model output.
///
/// Always fully populated; the normalizer substitutes fallbacks for
/// anything missing or malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NormalizedAnalysis {
    pub name: String,
    pub category: String,
    pub description: String,
    pub price: i64,
}

/// Complete image-analysis result: normalized fields plus the search
/// embedding of their concatenation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImageAnalysis {
    pub name: String,
    pub category: String,
    pub description: String,
    pub price: i64,
    pub vector: Vec<f32>,
}

/// Outcome of query processing on the model side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryAnalysis {
    pub vector: Vec<f32>,
    pub reason: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GenerateAnswerRequest {
    #[validate(length(min = 1, message = "prompt must not be empty"))]
    pub prompt: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnswerResponse {
    pub answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_path_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&SearchPath::Internal).unwrap(),
            "\"INTERNAL\""
        );
        assert_eq!(
            serde_json::to_string(&SearchPath::External).unwrap(),
            "\"EXTERNAL\""
        );
    }

    #[test]
    fn unknown_path_falls_back_to_internal() {
        let path: SearchPath = serde_json::from_str("\"HYBRID\"").unwrap();
        assert_eq!(path, SearchPath::Internal);
    }

    #[test]
    fn external_path_round_trips() {
        let path: SearchPath = serde_json::from_str("\"EXTERNAL\"").unwrap();
        assert_eq!(path, SearchPath::External);
    }
}
