//! Deterministic single-page compaction — trims a brochure locally, without the generator.
//!
//! Applies every structural fix the validator knows how to suggest in one pass.
//! The result is not re-validated here; callers that care re-run the validator.

use tracing::debug;

use crate::layout::validator::LayoutValidator;
use crate::models::brochure::{
    BrochureContent, FontSize, LayoutDensity, Section, TestimonialLayout,
};

const KEEP_FEATURES: usize = 3;
const KEEP_PRICING_TIERS: usize = 2;
const KEEP_TIMELINE_STEPS: usize = 4;

/// Returns `content` unchanged when it already validates, otherwise a compacted copy.
pub fn compact_for_single_page(
    content: &BrochureContent,
    validator: &LayoutValidator,
) -> BrochureContent {
    let validation = validator.validate(content);
    if validation.is_valid {
        return content.clone();
    }

    debug!(
        overflow = validation.overflow,
        "Compacting brochure for single page"
    );

    let mut compacted = content.clone();
    compacted.settings.layout_density = LayoutDensity::Compact;
    if compacted.settings.font_size == FontSize::Large {
        compacted.settings.font_size = FontSize::Medium;
    }

    for (index, section) in compacted.sections.iter_mut().enumerate() {
        let trimmed = match section {
            Section::Features(f) => truncate(&mut f.features, KEEP_FEATURES),
            Section::Pricing(p) => truncate(&mut p.tiers, KEEP_PRICING_TIERS),
            Section::Testimonial(t) if t.layout == Some(TestimonialLayout::Centered) => {
                t.layout = Some(TestimonialLayout::Inline);
                true
            }
            Section::Timeline(t) => truncate(&mut t.steps, KEEP_TIMELINE_STEPS),
            _ => false,
        };
        if trimmed {
            debug!(index, kind = section.kind(), "Section compacted");
        }
    }

    compacted
}

/// Truncates `items` to `keep`, reporting whether anything was dropped.
fn truncate<T>(items: &mut Vec<T>, keep: usize) -> bool {
    let dropped = items.len() > keep;
    items.truncate(keep);
    dropped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::validator::tests::{content, feature_section, text_section};
    use crate::models::brochure::*;

    #[test]
    fn test_valid_content_is_returned_unchanged() {
        let validator = LayoutValidator::default();
        let original = content(BrochureSettings::default(), vec![feature_section(5)]);
        assert!(validator.validate(&original).is_valid);

        let result = compact_for_single_page(&original, &validator);
        assert_eq!(result, original);
    }

    #[test]
    fn test_overflowing_content_is_trimmed() {
        let validator = LayoutValidator::default();
        let settings = BrochureSettings {
            font_size: FontSize::Large,
            layout_density: LayoutDensity::Spacious,
            ..Default::default()
        };
        let original = content(
            settings,
            vec![
                feature_section(6),
                Section::Testimonial(TestimonialSection {
                    quote: "Great".to_string(),
                    author: Author {
                        name: "Ann".to_string(),
                        title: None,
                        company: None,
                    },
                    rating: None,
                    layout: Some(TestimonialLayout::Centered),
                }),
                text_section(20),
            ],
        );
        assert!(!validator.validate(&original).is_valid);

        let result = compact_for_single_page(&original, &validator);

        assert_eq!(result.settings.layout_density, LayoutDensity::Compact);
        assert_eq!(result.settings.font_size, FontSize::Medium);
        assert!(matches!(&result.sections[0], Section::Features(f) if f.features.len() == 3));
        assert!(matches!(
            &result.sections[1],
            Section::Testimonial(t) if t.layout == Some(TestimonialLayout::Inline)
        ));
        // text sections are left alone
        assert_eq!(result.sections[2], original.sections[2]);
        assert!(
            validator.validate(&result).overflow < validator.validate(&original).overflow,
            "compaction should reduce the estimated height"
        );
    }

    #[test]
    fn test_keeps_first_items_in_order() {
        let validator = LayoutValidator::default();
        let original = content(
            BrochureSettings::default(),
            vec![feature_section(5), text_section(30)],
        );
        let result = compact_for_single_page(&original, &validator);
        match &result.sections[0] {
            Section::Features(f) => {
                let ids: Vec<&str> = f.features.iter().map(|f| f.id.as_str()).collect();
                assert_eq!(ids, vec!["feature-1", "feature-2", "feature-3"]);
            }
            other => panic!("expected features, got {other:?}"),
        }
    }

    #[test]
    fn test_truncate_reports_whether_items_were_dropped() {
        let mut items = vec![1, 2, 3, 4];
        assert!(truncate(&mut items, 3));
        assert_eq!(items, vec![1, 2, 3]);
        assert!(!truncate(&mut items, 3));
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn test_unknown_sections_pass_through_intact() {
        let validator = LayoutValidator::default();
        let carousel = Section::Unknown(serde_json::json!({
            "type": "carousel",
            "slides": ["a.png", "b.png"]
        }));
        let original = content(
            BrochureSettings::default(),
            vec![feature_section(6), text_section(40), carousel.clone()],
        );
        assert!(!validator.validate(&original).is_valid);

        let result = compact_for_single_page(&original, &validator);
        assert_eq!(result.sections[2], carousel);
    }
}
