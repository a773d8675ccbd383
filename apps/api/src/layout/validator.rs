//! Layout Validator — estimates whether a brochure fits its page budget.
//!
//! # Rules
//! - total = Σ section estimates + density spacing between consecutive sections
//! - overflow = total − available height (negative when there is room left)
//! - single page: valid iff overflow ≤ 0
//! - two pages: always valid; the first section whose running total crosses the
//!   budget is recorded as the page break
//!
//! Suggestions are advisory strings. They are only produced for an overflowing
//! single-page brochure and are forwarded verbatim to the generator.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::layout::estimator::{HeightEstimator, HeuristicEstimator};
use crate::layout::geometry::PageGeometry;
use crate::models::brochure::{
    BrochureContent, FontSize, LayoutDensity, PageCount, Section, TestimonialLayout,
};

/// Above this overflow a second page is worth suggesting.
const TWO_PAGE_SUGGESTION_OVERFLOW: i32 = 200;
const MAX_FEATURES: usize = 3;
const MAX_PRICING_TIERS: usize = 2;
const MAX_TIMELINE_STEPS: usize = 4;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// Verdict for one brochure. Always recomputed from scratch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutValidation {
    pub is_valid: bool,
    pub total_height: u32,
    pub available_height: u32,
    pub overflow: i32,
    pub suggestions: Vec<String>,
    /// Present only for two-page brochures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_breaks: Option<Vec<usize>>,
}

/// Spacing inserted between consecutive sections, per layout density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DensitySpacing {
    pub compact: u32,
    pub normal: u32,
    pub spacious: u32,
}

impl DensitySpacing {
    pub fn for_density(&self, density: LayoutDensity) -> u32 {
        match density {
            LayoutDensity::Compact => self.compact,
            LayoutDensity::Normal => self.normal,
            LayoutDensity::Spacious => self.spacious,
        }
    }
}

impl Default for DensitySpacing {
    fn default() -> Self {
        Self {
            compact: 16,
            normal: 24,
            spacious: 32,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Validator
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct LayoutValidator {
    geometry: PageGeometry,
    spacing: DensitySpacing,
    estimator: Arc<dyn HeightEstimator>,
}

impl LayoutValidator {
    pub fn new(
        geometry: PageGeometry,
        spacing: DensitySpacing,
        estimator: Arc<dyn HeightEstimator>,
    ) -> Self {
        Self {
            geometry,
            spacing,
            estimator,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Estimates the brochure's height and returns the full verdict.
    pub fn validate(&self, content: &BrochureContent) -> LayoutValidation {
        let settings = &content.settings;
        let available = self.geometry.available_height();
        let spacing = self.spacing.for_density(settings.layout_density);
        let two_pages = settings.page_count == PageCount::Two;
        let last = content.sections.len().saturating_sub(1);

        let mut total: u32 = 0;
        let mut first_break: Option<usize> = None;

        for (index, section) in content.sections.iter().enumerate() {
            total += self.estimator.estimate(section, settings);
            if index < last {
                total += spacing;
            }
            // The running total is not reset after a break.
            if two_pages && first_break.is_none() && total > available {
                first_break = Some(index);
            }
        }

        let overflow = total as i32 - available as i32;
        let is_valid = overflow <= 0 || two_pages;

        let suggestions = if overflow > 0 && !two_pages {
            build_suggestions(content, overflow)
        } else {
            vec![]
        };

        LayoutValidation {
            is_valid,
            total_height: total,
            available_height: available,
            overflow,
            suggestions,
            page_breaks: two_pages.then(|| first_break.into_iter().collect()),
        }
    }
}

impl Default for LayoutValidator {
    fn default() -> Self {
        Self::new(
            PageGeometry::a4(),
            DensitySpacing::default(),
            Arc::new(HeuristicEstimator::default()),
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Suggestions
// ────────────────────────────────────────────────────────────────────────────

/// Builds the ordered suggestion list for an overflowing single-page brochure.
fn build_suggestions(content: &BrochureContent, overflow: i32) -> Vec<String> {
    let mut suggestions = vec![format!("Content overflows by {overflow}px")];

    if overflow > TWO_PAGE_SUGGESTION_OVERFLOW {
        suggestions.push("Consider switching to 2-page layout".to_string());
    }

    for section in &content.sections {
        let suggestion = match section {
            Section::Features(f) if f.features.len() > MAX_FEATURES => {
                Some("Reduce features to 3 or fewer")
            }
            Section::Pricing(p) if p.tiers.len() > MAX_PRICING_TIERS => {
                Some("Consider showing only 2 pricing tiers")
            }
            Section::Testimonial(t) if t.layout == Some(TestimonialLayout::Centered) => {
                Some("Use inline testimonial layout to save space")
            }
            Section::Timeline(t) if t.steps.len() > MAX_TIMELINE_STEPS => {
                Some("Limit timeline to 4 steps or fewer")
            }
            _ => None,
        };
        if let Some(s) = suggestion {
            suggestions.push(s.to_string());
        }
    }

    if content.settings.layout_density != LayoutDensity::Compact {
        suggestions.push("Try compact layout density".to_string());
    }

    match content.settings.font_size {
        FontSize::Large => suggestions.push("Try medium or small font size".to_string()),
        FontSize::Medium => suggestions.push("Try small font size".to_string()),
        FontSize::Small => {}
    }

    suggestions
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
