//! Test doubles for the generation pipeline.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::layout::estimator::HeightEstimator;
use crate::layout::geometry::PageGeometry;
use crate::layout::validator::{DensitySpacing, LayoutValidator};
use crate::llm_client::{LlmError, TextGenerator};
use crate::models::brochure::{BrochureSettings, Section};

/// Replays a fixed script of responses and records every call it receives.
/// An exhausted script answers with `LlmError::EmptyContent`.
#[derive(Default)]
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: Mutex<Vec<(String, f32)>>,
}

impl ScriptedGenerator {
    pub fn new(responses: Vec<Result<String, LlmError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn temperatures(&self) -> Vec<f32> {
        self.calls.lock().unwrap().iter().map(|(_, t)| *t).collect()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(p, _)| p.clone()).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        prompt: &str,
        _system: &str,
        temperature: f32,
    ) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), temperature));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}

/// Estimates a text section as exactly one pixel per character; everything else is 0.
pub struct LengthEstimator;

impl HeightEstimator for LengthEstimator {
    fn estimate(&self, section: &Section, _settings: &BrochureSettings) -> u32 {
        match section {
            Section::Text(text) => text.content.chars().count() as u32,
            _ => 0,
        }
    }
}

/// A validator whose total height for `sized_brochure_json` output equals the requested height.
pub fn length_validator() -> LayoutValidator {
    LayoutValidator::new(
        PageGeometry::a4(),
        DensitySpacing::default(),
        Arc::new(LengthEstimator),
    )
}

/// A single-section brochure that `length_validator` measures at `height` pixels.
pub fn sized_brochure_json(title: &str, height: u32) -> String {
    serde_json::json!({
        "title": title,
        "description": "Test brochure",
        "settings": BrochureSettings::default(),
        "sections": [
            { "type": "text", "content": "x".repeat(height as usize) }
        ]
    })
    .to_string()
}

/// A brochure with `sections` short text sections.
pub fn brochure_json(title: &str, sections: usize) -> String {
    let sections: Vec<_> = (0..sections)
        .map(|i| serde_json::json!({ "type": "text", "title": format!("Part {i}"), "content": "Short." }))
        .collect();
    serde_json::json!({
        "title": title,
        "description": "Test brochure",
        "settings": BrochureSettings::default(),
        "sections": sections
    })
    .to_string()
}

/// Height that yields `overflow` against the A4 budget.
pub fn height_for_overflow(overflow: i32) -> u32 {
    (PageGeometry::a4().available_height() as i32 + overflow) as u32
}
