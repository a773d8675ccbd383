//! Section Height Estimator — table-driven height heuristics per section kind.
//!
//! Heights are in CSS pixels, calibrated against the rendered components.
//! No text is shaped and no layout is run. Card grids are assumed to wrap into a
//! fixed number of rows, so several kinds ignore their item count.
//!
//! The estimator sits behind `HeightEstimator` so an exact layout engine can
//! replace it without touching the validator or the optimization loop.

use serde::{Deserialize, Serialize};

use crate::models::brochure::{
    BrochureSettings, ImageLayout, Section, TestimonialLayout,
};

/// Assumed characters per rendered line in a text section.
const CHARS_PER_LINE: usize = 80;
/// Character count assumed when a text section has no content.
const EMPTY_TEXT_CHARS: usize = 100;
/// Item count assumed when a list-bearing section has an empty list.
const EMPTY_LIST_ITEMS: u32 = 3;
/// Pricing tiers sit in a single row of at most three; extra tiers are not estimated.
const MAX_COUNTED_TIERS: u32 = 3;
/// Hero descriptions longer than this wrap to an extra line block.
const LONG_HERO_DESCRIPTION: usize = 100;

// ────────────────────────────────────────────────────────────────────────────
// Height table
// ────────────────────────────────────────────────────────────────────────────

/// Height allowances in pixels, one field per rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeightTable {
    pub hero_normal: u32,
    pub hero_with_cta: u32,
    pub hero_long_description: u32,

    pub metrics_title: u32,
    pub metrics_three_columns: u32,

    pub features_title: u32,
    pub features_three_columns: u32,
    pub features_four_columns: u32,

    pub testimonial_inline: u32,
    pub testimonial_card: u32,
    pub testimonial_centered: u32,

    pub contact_compact: u32,
    pub contact_with_extras: u32,

    pub pricing_title: u32,
    pub pricing_per_tier: u32,

    pub timeline_title: u32,
    pub timeline_per_step: u32,

    pub team_title: u32,
    pub team_per_member: u32,

    pub text_title: u32,
    pub text_line_height: u32,

    pub grid_two_columns: u32,
    pub grid_three_columns: u32,

    pub image_full: u32,
    pub image_side_by_side: u32,

    pub unknown: u32,
}

impl Default for HeightTable {
    fn default() -> Self {
        Self {
            hero_normal: 180,
            hero_with_cta: 220,
            hero_long_description: 40,

            metrics_title: 35,
            metrics_three_columns: 145,

            features_title: 55,
            features_three_columns: 240,
            features_four_columns: 185,

            testimonial_inline: 75,
            testimonial_card: 110,
            testimonial_centered: 160,

            contact_compact: 110,
            contact_with_extras: 145,

            pricing_title: 60,
            pricing_per_tier: 400,

            timeline_title: 60,
            timeline_per_step: 60,

            team_title: 60,
            team_per_member: 50,

            text_title: 40,
            text_line_height: 24,

            grid_two_columns: 200,
            grid_three_columns: 180,

            image_full: 200,
            image_side_by_side: 160,

            unknown: 100,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Estimator trait
// ────────────────────────────────────────────────────────────────────────────

/// Estimates the rendered height of one section. Implementations must be pure.
pub trait HeightEstimator: Send + Sync {
    fn estimate(&self, section: &Section, settings: &BrochureSettings) -> u32;
}

/// Default estimator backed by a `HeightTable`.
#[derive(Debug, Clone, Default)]
pub struct HeuristicEstimator {
    heights: HeightTable,
}

impl HeuristicEstimator {
    pub fn new(heights: HeightTable) -> Self {
        Self { heights }
    }
}

impl HeightEstimator for HeuristicEstimator {
    // Settings are part of the contract but the current tables do not vary by font size.
    fn estimate(&self, section: &Section, _settings: &BrochureSettings) -> u32 {
        let h = &self.heights;

        match section {
            Section::Hero(hero) => {
                let mut height = if hero.cta_button.is_some() {
                    h.hero_with_cta
                } else {
                    h.hero_normal
                };
                if hero
                    .description
                    .as_deref()
                    .is_some_and(|d| d.chars().count() > LONG_HERO_DESCRIPTION)
                {
                    height += h.hero_long_description;
                }
                height
            }

            Section::Metrics(_) => h.metrics_title + h.metrics_three_columns,

            Section::Features(features) => {
                let block = if features.columns == Some(4) {
                    h.features_four_columns
                } else {
                    h.features_three_columns
                };
                h.features_title + block
            }

            Section::Testimonial(testimonial) => match testimonial.layout {
                Some(TestimonialLayout::Centered) => h.testimonial_centered,
                Some(TestimonialLayout::Card) => h.testimonial_card,
                Some(TestimonialLayout::Inline) | None => h.testimonial_inline,
            },

            Section::Contact(contact) => {
                if !contact.social_links.is_empty() || contact.cta_button.is_some() {
                    h.contact_with_extras
                } else {
                    h.contact_compact
                }
            }

            Section::Pricing(pricing) => {
                let tiers = count_or_default(pricing.tiers.len()).min(MAX_COUNTED_TIERS);
                h.pricing_title + h.pricing_per_tier * tiers
            }

            Section::Timeline(timeline) => {
                h.timeline_title + h.timeline_per_step * count_or_default(timeline.steps.len())
            }

            Section::Team(team) => {
                h.team_title + h.team_per_member * count_or_default(team.members.len())
            }

            Section::Text(text) => {
                let chars = match text.content.chars().count() {
                    0 => EMPTY_TEXT_CHARS,
                    n => n,
                };
                let lines = chars.div_ceil(CHARS_PER_LINE) as u32;
                h.text_title + h.text_line_height * lines
            }

            Section::Grid(grid) => {
                if grid.columns == 2 {
                    h.grid_two_columns
                } else {
                    h.grid_three_columns
                }
            }

            Section::Image(image) => {
                if image.layout == Some(ImageLayout::Full) {
                    h.image_full
                } else {
                    h.image_side_by_side
                }
            }

            Section::Unknown(_) => h.unknown,
        }
    }
}

/// An empty list is estimated as if it held the default item count.
fn count_or_default(len: usize) -> u32 {
    if len == 0 {
        EMPTY_LIST_ITEMS
    } else {
        len as u32
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
