use std::sync::Arc;

use crate::layout::LayoutValidator;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// The generative service. `LlmClient` in production.
    pub generator: Arc<dyn TextGenerator>,
    /// A4 geometry, height table and density spacing, built once in `main`.
    pub validator: Arc<LayoutValidator>,
}
