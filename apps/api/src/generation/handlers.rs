//! Axum route handlers for the Brochure API.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::context::{GenerationContext, Measurement, ValidationFeedback};
use crate::generation::optimizer::generate_with_optimization;
use crate::generation::reconcile::reconcile;
use crate::layout::{compact_for_single_page, LayoutValidation};
use crate::models::brochure::{BrochureContent, BrochureSettings};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub description: Option<String>,
    /// Partial settings are completed with defaults.
    #[serde(default)]
    pub settings: BrochureSettings,
    /// Present when the client is asking for a correction of an earlier attempt.
    pub validation: Option<ValidationFeedback>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub content: BrochureContent,
    pub validation: LayoutValidation,
    pub optimized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    pub content: Option<BrochureContent>,
    pub real_measurement: Option<Measurement>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeResponse {
    pub content: BrochureContent,
    pub original_overflow: i32,
}

#[derive(Debug, Deserialize)]
pub struct ContentRequest {
    pub content: Option<BrochureContent>,
}

#[derive(Debug, Serialize)]
pub struct CompactResponse {
    pub content: BrochureContent,
    pub validation: LayoutValidation,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/brochures/generate
///
/// Generates a brochure and, when the estimate overflows by more than the trigger,
/// runs the bounded optimization loop before responding.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let GenerateRequest {
        description,
        settings,
        validation,
    } = request;
    let description = description
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| AppError::Validation("description is required".to_string()))?;

    let request_id = Uuid::new_v4();
    let span = info_span!("generate_brochure", %request_id);

    async move {
        info!(
            page_count = u8::from(settings.page_count),
            density = settings.layout_density.as_str(),
            correction = validation.is_some(),
            "Generating brochure"
        );

        let context = GenerationContext::new(description, settings).with_validation(validation);
        let outcome =
            generate_with_optimization(state.generator.as_ref(), &state.validator, &context)
                .await?;

        info!(
            overflow = outcome.validation.overflow,
            optimized = outcome.optimized,
            attempts = ?outcome.attempts,
            "Brochure generated"
        );

        Ok::<_, AppError>(Json(GenerateResponse {
            content: outcome.content,
            validation: outcome.validation,
            optimized: outcome.optimized,
            attempts: outcome.attempts,
            generated_at: Utc::now(),
        }))
    }
    .instrument(span)
    .await
}

/// POST /api/v1/brochures/optimize
///
/// One corrective pass for content whose rendered height overflowed.
/// The result is not re-estimated; the client re-renders it.
pub async fn handle_optimize(
    State(state): State<AppState>,
    Json(request): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, AppError> {
    let (content, measurement) = match (request.content, request.real_measurement) {
        (Some(content), Some(measurement)) => (content, measurement),
        _ => {
            return Err(AppError::Validation(
                "content and realMeasurement are required".to_string(),
            ))
        }
    };

    let request_id = Uuid::new_v4();
    let span = info_span!("optimize_brochure", %request_id);

    async move {
        let condensed = reconcile(state.generator.as_ref(), &content, &measurement).await?;

        Ok::<_, AppError>(Json(OptimizeResponse {
            content: condensed,
            original_overflow: measurement.overflow,
        }))
    }
    .instrument(span)
    .await
}

/// POST /api/v1/brochures/validate
///
/// Estimate-only layout check. Never calls the generator.
pub async fn handle_validate(
    State(state): State<AppState>,
    Json(request): Json<ContentRequest>,
) -> Result<Json<LayoutValidation>, AppError> {
    let content = require_content(request)?;
    Ok(Json(state.validator.validate(&content)))
}

/// POST /api/v1/brochures/compact
///
/// Deterministic single-page compaction followed by a fresh estimate.
pub async fn handle_compact(
    State(state): State<AppState>,
    Json(request): Json<ContentRequest>,
) -> Result<Json<CompactResponse>, AppError> {
    let content = require_content(request)?;
    let compacted = compact_for_single_page(&content, &state.validator);
    let validation = state.validator.validate(&compacted);

    info!(
        before = content.sections.len(),
        overflow = validation.overflow,
        "Brochure compacted"
    );

    Ok(Json(CompactResponse {
        content: compacted,
        validation,
    }))
}

fn require_content(request: ContentRequest) -> Result<BrochureContent, AppError> {
    request
        .content
        .ok_or_else(|| AppError::Validation("content is required".to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::generation::testing::{
        height_for_overflow, length_validator, sized_brochure_json, ScriptedGenerator,
    };
    use crate::layout::LayoutValidator;
    use crate::llm_client::LlmError;
    use crate::routes::build_router;
    use crate::state::AppState;

    fn router(generator: Arc<ScriptedGenerator>, validator: LayoutValidator) -> Router {
        build_router(AppState {
            generator,
            validator: Arc::new(validator),
        })
    }

    async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn brochure(text_len: usize) -> Value {
        json!({
            "title": "Harbor Dental",
            "description": "Family dentistry",
            "sections": [{ "type": "text", "content": "x".repeat(text_len) }]
        })
    }

    #[tokio::test]
    async fn test_health() {
        let app = router(Arc::new(ScriptedGenerator::default()), length_validator());
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // ── generate ────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_generate_requires_description() {
        let generator = Arc::new(ScriptedGenerator::default());
        let app = router(generator.clone(), length_validator());

        let (status, body) = post(app.clone(), "/api/v1/brochures/generate", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (status, _) = post(
            app,
            "/api/v1/brochures/generate",
            json!({ "description": "   " }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_generate_fitting_brochure() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Ok(sized_brochure_json(
            "Harbor Dental",
            700,
        ))]));
        let app = router(generator.clone(), length_validator());

        let (status, body) = post(
            app,
            "/api/v1/brochures/generate",
            json!({ "description": "A family dental clinic", "settings": { "theme": "dark" } }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"]["title"], "Harbor Dental");
        assert_eq!(body["content"]["settings"]["theme"], "dark");
        assert_eq!(body["content"]["settings"]["pageCount"], 1);
        assert_eq!(body["validation"]["isValid"], true);
        assert_eq!(body["validation"]["overflow"], -107);
        assert_eq!(body["optimized"], false);
        assert!(body.get("attempts").is_none());
        assert!(body["generatedAt"].is_string());
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_generate_runs_optimization_loop() {
        let generator = Arc::new(ScriptedGenerator::new(vec![
            Ok(sized_brochure_json("v0", height_for_overflow(160))),
            Ok(sized_brochure_json("v1", height_for_overflow(15))),
        ]));
        let app = router(generator.clone(), length_validator());

        let (status, body) = post(
            app,
            "/api/v1/brochures/generate",
            json!({ "description": "A family dental clinic" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"]["title"], "v1");
        assert_eq!(body["optimized"], true);
        assert_eq!(body["attempts"], 1);
        assert_eq!(body["validation"]["overflow"], 15);
    }

    #[tokio::test]
    async fn test_generate_upstream_failure_is_generic_500() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Err(LlmError::Api {
            status: 401,
            message: "invalid x-api-key".to_string(),
        })]));
        let app = router(generator, length_validator());

        let (status, body) = post(
            app,
            "/api/v1/brochures/generate",
            json!({ "description": "A family dental clinic" }),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "LLM_ERROR");
        assert_eq!(body["error"]["message"], "Failed to generate brochure");
    }

    #[tokio::test]
    async fn test_generate_structural_failure() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Ok(
            r#"{"title": "Harbor Dental"}"#.to_string(),
        )]));
        let app = router(generator, length_validator());

        let (status, body) = post(
            app,
            "/api/v1/brochures/generate",
            json!({ "description": "A family dental clinic" }),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "INVALID_STRUCTURE");
    }

    // ── optimize ────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_optimize_requires_both_inputs() {
        let generator = Arc::new(ScriptedGenerator::default());
        let app = router(generator.clone(), length_validator());

        let (status, body) = post(
            app,
            "/api/v1/brochures/optimize",
            json!({ "content": brochure(100) }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_optimize_returns_condensed_content_and_original_overflow() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Ok(sized_brochure_json(
            "Harbor Dental",
            400,
        ))]));
        let app = router(generator.clone(), length_validator());

        let (status, body) = post(
            app,
            "/api/v1/brochures/optimize",
            json!({
                "content": brochure(900),
                "realMeasurement": {
                    "totalHeight": 960,
                    "availableHeight": 807,
                    "overflow": 153,
                    "isValid": false
                }
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["originalOverflow"], 153);
        assert_eq!(body["content"]["title"], "Harbor Dental");
        assert_eq!(generator.call_count(), 1);
        assert!(generator.prompts()[0].contains("MEASURED LAYOUT: content is 960px tall"));
    }

    // ── validate / compact ──────────────────────────────────────────────────

    #[tokio::test]
    async fn test_validate_estimates_without_generator() {
        let generator = Arc::new(ScriptedGenerator::default());
        let app = router(generator.clone(), length_validator());

        let (status, body) = post(
            app,
            "/api/v1/brochures/validate",
            json!({ "content": brochure(900) }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isValid"], false);
        assert_eq!(body["overflow"], 93);
        assert_eq!(body["suggestions"][0], "Content overflows by 93px");
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_validate_requires_content() {
        let app = router(Arc::new(ScriptedGenerator::default()), length_validator());
        let (status, _) = post(app, "/api/v1/brochures/validate", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_compact_trims_overflowing_content() {
        let features: Vec<Value> = (1..=6)
            .map(|i| json!({ "id": format!("feature-{i}"), "title": "F", "description": "d" }))
            .collect();
        let content = json!({
            "title": "Harbor Dental",
            "settings": { "fontSize": "large", "layoutDensity": "spacious" },
            "sections": [
                { "type": "hero", "title": "Smile", "ctaButton": { "text": "Book" } },
                { "type": "features", "columns": 3, "features": features },
                { "type": "pricing", "tiers": [
                    { "id": "a", "name": "A", "price": "$1" },
                    { "id": "b", "name": "B", "price": "$2" },
                    { "id": "c", "name": "C", "price": "$3" }
                ] }
            ]
        });
        let app = router(
            Arc::new(ScriptedGenerator::default()),
            LayoutValidator::default(),
        );

        let (status, body) = post(
            app,
            "/api/v1/brochures/compact",
            json!({ "content": content }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"]["settings"]["layoutDensity"], "compact");
        assert_eq!(body["content"]["settings"]["fontSize"], "medium");
        assert_eq!(body["content"]["sections"][1]["features"].as_array().unwrap().len(), 3);
        assert_eq!(body["content"]["sections"][2]["tiers"].as_array().unwrap().len(), 2);
        assert!(body["validation"]["overflow"].is_number());
    }
}
