//! Generation context — the payload a prompt is built from, including corrective feedback.

use serde::{Deserialize, Serialize};

use crate::layout::validator::LayoutValidation;
use crate::models::brochure::{BrochureContent, BrochureSettings};

/// Used when a rendered measurement arrives without its own suggestions.
const GENERIC_REDUCTION_SUGGESTIONS: [&str; 3] = [
    "Reduce content length significantly",
    "Use more compact descriptions",
    "Consider fewer sections",
];

/// Feedback about a previous attempt, sent back to the generator on corrective rounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFeedback {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_attempt: Option<BrochureContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overflow: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_valid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

impl ValidationFeedback {
    /// Feedback from the estimator: the attempt, its overflow, and its suggestions.
    pub fn from_estimate(attempt: &BrochureContent, validation: &LayoutValidation) -> Self {
        Self {
            previous_attempt: Some(attempt.clone()),
            overflow: Some(validation.overflow),
            total_height: None,
            available_height: None,
            is_valid: None,
            suggestions: Some(validation.suggestions.clone()),
        }
    }

    /// Feedback from a rendered measurement. Falls back to generic suggestions
    /// when the renderer supplied none.
    pub fn from_measurement(attempt: &BrochureContent, measurement: &Measurement) -> Self {
        let suggestions = measurement.suggestions.clone().unwrap_or_else(|| {
            std::iter::once(format!("Content overflows by {}px", measurement.overflow))
                .chain(GENERIC_REDUCTION_SUGGESTIONS.iter().map(|s| s.to_string()))
                .collect()
        });

        Self {
            previous_attempt: Some(attempt.clone()),
            overflow: Some(measurement.overflow),
            total_height: Some(measurement.total_height),
            available_height: Some(measurement.available_height),
            is_valid: Some(measurement.is_valid),
            suggestions: Some(suggestions),
        }
    }

    /// Overflow that warrants corrective instructions, if any.
    pub fn positive_overflow(&self) -> Option<i32> {
        self.overflow.filter(|o| *o > 0)
    }
}

/// A ground-truth height observation reported by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub total_height: u32,
    pub available_height: u32,
    pub overflow: i32,
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

/// Everything the prompt builder needs for one generator call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationContext {
    pub description: String,
    pub settings: BrochureSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationFeedback>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing_content: Option<BrochureContent>,
    #[serde(default)]
    pub is_optimization: bool,
}

impl GenerationContext {
    pub fn new(description: impl Into<String>, settings: BrochureSettings) -> Self {
        Self {
            description: description.into(),
            settings,
            validation: None,
            existing_content: None,
            is_optimization: false,
        }
    }

    pub fn with_validation(mut self, validation: Option<ValidationFeedback>) -> Self {
        self.validation = validation;
        self
    }

    /// A request that already carries feedback is itself a correction round.
    pub fn is_correction_retry(&self) -> bool {
        self.validation.is_some()
    }

    /// Builds the context for the next corrective attempt from the current best one.
    pub fn corrected(&self, current: &BrochureContent, validation: &LayoutValidation) -> Self {
        Self {
            description: self.description.clone(),
            settings: self.settings,
            validation: Some(ValidationFeedback::from_estimate(current, validation)),
            existing_content: None,
            is_optimization: false,
        }
    }

    /// Builds the one-shot optimization context for a brochure that overflowed when rendered.
    pub fn for_measurement(content: &BrochureContent, measurement: &Measurement) -> Self {
        Self {
            description: format!(
                "Optimize this brochure content: {} - {}",
                content.title, content.description
            ),
            settings: content.settings,
            validation: Some(ValidationFeedback::from_measurement(content, measurement)),
            existing_content: Some(content.clone()),
            is_optimization: true,
        }
    }
}
