//! Generation-Time Optimization — bounded regeneration driven by the layout estimate.
//!
//! # Loop
//! - Generate a first draft and validate it.
//! - Skip optimization when the overflow is already small or when the request is
//!   itself a correction round. Two-page drafts are judged by overflow like any other.
//! - Otherwise regenerate up to `MAX_ATTEMPTS` times, each time feeding back the best
//!   attempt so far with its overflow and suggestions, at a falling temperature.
//! - A candidate replaces the best attempt only if its overflow is no worse.
//!   Failed or unparseable attempts are logged and skipped.
//!
//! The returned overflow is therefore never worse than the first draft's, and the
//! loop is strictly sequential: each prompt depends on the previous verdict.

use serde::Serialize;
use tracing::{info, warn};

use crate::generation::context::GenerationContext;
use crate::generation::generator::{generate_brochure, GenerationError, BASE_TEMPERATURE};
use crate::layout::validator::{LayoutValidation, LayoutValidator};
use crate::llm_client::TextGenerator;
use crate::models::brochure::BrochureContent;

/// Regeneration rounds after the first draft.
pub const MAX_ATTEMPTS: u32 = 3;
/// An accepted attempt at or below this overflow ends the loop.
pub const SUCCESS_THRESHOLD: i32 = 20;
/// First drafts at or below this overflow are returned as-is.
pub const OPTIMIZATION_TRIGGER: i32 = 50;

/// Best content found, with its estimate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationOutcome {
    pub content: BrochureContent,
    pub validation: LayoutValidation,
    /// True when the returned overflow is strictly below the first draft's.
    pub optimized: bool,
    /// Regeneration rounds run; `None` when optimization was skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
}

/// Temperature for regeneration round `attempt` (1-based): 0.7 − 0.2 × attempt, floored at 0.3.
pub fn attempt_temperature(attempt: u32) -> f32 {
    // Computed in tenths so the schedule hits 0.5 and 0.3 exactly.
    let tenths = (7 - 2 * attempt as i32).max(3);
    tenths as f32 / 10.0
}

/// Generates a brochure and, if it overflows, runs the bounded optimization loop.
///
/// Only a failure of the first draft is returned as an error.
pub async fn generate_with_optimization(
    generator: &dyn TextGenerator,
    validator: &LayoutValidator,
    context: &GenerationContext,
) -> Result<OptimizationOutcome, GenerationError> {
    let initial = generate_brochure(generator, context, BASE_TEMPERATURE).await?;
    let initial_validation = validator.validate(&initial);

    info!(
        overflow = initial_validation.overflow,
        total_height = initial_validation.total_height,
        is_valid = initial_validation.is_valid,
        "Initial brochure estimated"
    );

    if context.is_correction_retry() || initial_validation.overflow <= OPTIMIZATION_TRIGGER {
        return Ok(OptimizationOutcome {
            content: initial,
            validation: initial_validation,
            optimized: false,
            attempts: None,
        });
    }

    let original_overflow = initial_validation.overflow;
    let mut best_content = initial;
    let mut best_validation = initial_validation;
    let mut attempts = 0u32;

    while attempts < MAX_ATTEMPTS {
        attempts += 1;
        let temperature = attempt_temperature(attempts);
        let corrected = context.corrected(&best_content, &best_validation);

        let candidate = match generate_brochure(generator, &corrected, temperature).await {
            Ok(content) => content,
            Err(e) => {
                warn!(
                    attempt = attempts,
                    temperature, "Optimization attempt failed, keeping best so far: {e}"
                );
                continue;
            }
        };

        let validation = validator.validate(&candidate);

        if validation.overflow > best_validation.overflow {
            info!(
                attempt = attempts,
                overflow = validation.overflow,
                best = best_validation.overflow,
                "Optimization attempt regressed; discarded"
            );
            continue;
        }

        info!(
            attempt = attempts,
            overflow = validation.overflow,
            previous = best_validation.overflow,
            "Optimization attempt accepted"
        );
        best_content = candidate;
        best_validation = validation;

        if best_validation.overflow <= SUCCESS_THRESHOLD {
            break;
        }
    }

    let optimized = best_validation.overflow < original_overflow;
    if !optimized {
        warn!(
            attempts,
            overflow = best_validation.overflow,
            "Optimization did not reduce overflow"
        );
    }

    Ok(OptimizationOutcome {
        content: best_content,
        validation: best_validation,
        optimized,
        attempts: Some(attempts),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
