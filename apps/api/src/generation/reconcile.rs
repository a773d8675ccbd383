//! Measurement Reconciliation — a single corrective pass driven by a rendered height.
//!
//! The renderer's measurement is ground truth, so this pass does not re-estimate or
//! loop; the caller re-renders and decides whether another round is needed.

use tracing::info;

use crate::generation::context::{GenerationContext, Measurement};
use crate::generation::generator::{generate_brochure, GenerationError};
use crate::llm_client::TextGenerator;
use crate::models::brochure::BrochureContent;

/// Temperature for the measurement-driven pass.
pub const RECONCILE_TEMPERATURE: f32 = 0.3;

/// Asks the generator to condense `content` given what the renderer actually measured.
pub async fn reconcile(
    generator: &dyn TextGenerator,
    content: &BrochureContent,
    measurement: &Measurement,
) -> Result<BrochureContent, GenerationError> {
    info!(
        overflow = measurement.overflow,
        total_height = measurement.total_height,
        available_height = measurement.available_height,
        sections = content.sections.len(),
        "Reconciling brochure with rendered measurement"
    );

    let context = GenerationContext::for_measurement(content, measurement);
    generate_brochure(generator, &context, RECONCILE_TEMPERATURE).await
}
