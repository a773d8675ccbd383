//! Brochure prompt construction.
//!
//! `build_brochure_prompt` fills `BROCHURE_PROMPT_TEMPLATE` from a `GenerationContext`.
//! Corrective rounds add graded reduction instructions, the suggestion list, and the
//! previous attempt, so the generator can see exactly what it has to shrink.

use crate::generation::context::{GenerationContext, ValidationFeedback};
use crate::models::brochure::{BrochureSettings, LayoutDensity, PageCount};

pub const BROCHURE_PROMPT_TEMPLATE: &str = r#"Create a professional business brochure based on this description: "{description}"

{optimization_instructions}{feedback_block}CRITICAL SPACE CONSTRAINTS:
{space_constraints}

Settings:
- Pages: {page_count} ({page_rule})
- Layout density: {layout_density} ({density_guidance})
- Font size: {font_size}
- Color scheme: {color_scheme}
- Theme: {theme}

JSON Structure Required:
{
  "title": "Business Name (keep under 50 characters)",
  "description": "Brief tagline (keep under 80 characters)",
  "settings": {
    "pageCount": {page_count},
    "theme": "{theme}",
    "fontSize": "{font_size}",
    "colorScheme": "{color_scheme}",
    "layoutDensity": "{layout_density}"
  },
  "sections": [
    {section_guidance}
  ]
}

Allowed section types: hero, metrics, features, image, testimonial, timeline, team, contact, pricing, text, grid.

CONTENT GUIDELINES:
- Hero: Title (max 8 words), subtitle optional, description 1-2 sentences
- Metrics: Max 3 metrics for single page, use realistic numbers
- Features: Max {max_features} features, keep descriptions under 15 words each
- Testimonial: Quote under 25 words, layout one of "inline", "card", "centered"
- Contact: Keep contact info concise, max 3 contact methods

VALIDATION RULES:
- All button variants must be: "primary", "secondary", or "ghost"
- Features columns: 2-3 max (3 for normal/spacious, 2 for compact)
- Pricing tiers: Max 3 for single page
- Timeline steps: Max 4 for single page
- ALL features MUST have unique "id" fields (e.g., "feature-1", "feature-2")
- ALL pricing tiers and timeline steps MUST have unique "id" fields

Return ONLY the JSON object, no additional text or markdown."#;

const COMPACT_SINGLE_PAGE_SECTIONS: &str = r#"{
      "type": "hero",
      "title": "Short Impactful Title",
      "description": "One concise sentence.",
      "ctaButton": {"text": "Action", "variant": "primary"}
    },
    {
      "type": "features",
      "title": "Key Services",
      "columns": 3,
      "features": [
        {"id": "feature-1", "title": "Service 1", "description": "Brief description."},
        {"id": "feature-2", "title": "Service 2", "description": "Brief description."},
        {"id": "feature-3", "title": "Service 3", "description": "Brief description."}
      ]
    },
    {
      "type": "contact",
      "title": "Get Started",
      "contactInfo": {"email": "contact@business.com", "phone": "(555) 123-4567"},
      "ctaButton": {"text": "Contact Us", "variant": "primary"}
    }"#;

const STANDARD_SECTIONS: &str = r#"{
      "type": "hero",
      "title": "Compelling Business Title",
      "subtitle": "Optional subtitle",
      "description": "Brief value proposition in 1-2 sentences.",
      "ctaButton": {"text": "Get Started", "variant": "primary"}
    },
    {
      "type": "metrics",
      "title": "Proven Results",
      "metrics": [
        {"value": "150+", "title": "Clients", "change": {"value": 25, "type": "increase"}},
        {"value": "98%", "title": "Success Rate"}
      ]
    },
    {
      "type": "features",
      "title": "Core Services",
      "columns": 3,
      "features": [
        {"id": "feature-1", "title": "Service 1", "description": "Clear description of service."},
        {"id": "feature-2", "title": "Service 2", "description": "Clear description of service."},
        {"id": "feature-3", "title": "Service 3", "description": "Clear description of service."}
      ]
    },
    {
      "type": "contact",
      "title": "Start Your Journey",
      "description": "Ready to transform your business?",
      "contactInfo": {"email": "contact@business.com", "phone": "(555) 123-4567"},
      "ctaButton": {"text": "Schedule Consultation", "variant": "primary"}
    }"#;

// ────────────────────────────────────────────────────────────────────────────
// Prompt builder
// ────────────────────────────────────────────────────────────────────────────

/// Builds the full generation prompt for one generator call.
pub fn build_brochure_prompt(context: &GenerationContext) -> String {
    let settings = &context.settings;
    let single_page = settings.page_count == PageCount::One;

    let optimization_instructions = context
        .validation
        .as_ref()
        .and_then(ValidationFeedback::positive_overflow)
        .map(optimization_instructions)
        .unwrap_or_default();

    let fill = |part: &str| {
        part.replace("{space_constraints}", space_constraints(settings))
            .replace("{page_count}", &u8::from(settings.page_count).to_string())
            .replace(
                "{page_rule}",
                if single_page {
                    "MUST fit on single page"
                } else {
                    "can use 2 pages"
                },
            )
            .replace("{layout_density}", settings.layout_density.as_str())
            .replace(
                "{density_guidance}",
                density_guidance(settings.layout_density),
            )
            .replace("{font_size}", settings.font_size.as_str())
            .replace("{color_scheme}", settings.color_scheme.as_str())
            .replace("{theme}", settings.theme.as_str())
            .replace("{section_guidance}", section_guidance(settings))
            .replace("{max_features}", if single_page { "3-4" } else { "6" })
            .replace("{optimization_instructions}", &optimization_instructions)
            // Free text goes in last so it is never scanned for placeholders.
            .replace("{description}", &context.description)
    };

    // The feedback block embeds generated JSON; it is spliced in after filling.
    match BROCHURE_PROMPT_TEMPLATE.split_once("{feedback_block}") {
        Some((head, tail)) => format!("{}{}{}", fill(head), feedback_block(context), fill(tail)),
        None => fill(BROCHURE_PROMPT_TEMPLATE),
    }
}

/// Reduction instructions graded by how far the previous attempt overflowed.
pub(crate) fn optimization_instructions(overflow: i32) -> String {
    let mut lines = vec![format!(
        "CRITICAL: Previous attempt overflowed by {overflow}px. You MUST make MAJOR changes to fit."
    )];

    if overflow > 200 {
        lines.push("\nDRASTIC REDUCTION REQUIRED:".to_string());
        lines.push(
            "- REMOVE entire sections if necessary (keep only hero + contact minimum)".to_string(),
        );
        lines.push("- If keeping metrics, use only 2 metrics max".to_string());
        lines.push("- If keeping features, use only 2 features max with 5-word descriptions".to_string());
        lines.push("- Eliminate ALL optional content (subtitles, descriptions, etc.)".to_string());
    } else if overflow > 100 {
        lines.push("\nSIGNIFICANT REDUCTION REQUIRED:".to_string());
        lines.push("- REMOVE 1-2 sections entirely (keep most essential only)".to_string());
        lines.push("- Cut all descriptions to maximum 3-5 words".to_string());
        lines.push("- Remove subtitles and optional text".to_string());
        lines.push("- Use minimum possible content".to_string());
    } else if overflow > 50 {
        lines.push("\nMODERATE REDUCTION REQUIRED:".to_string());
        lines.push("- Shorten ALL descriptions significantly".to_string());
        lines.push("- Remove non-essential sections".to_string());
        lines.push("- Use more compact wording".to_string());
    }

    lines.push("\nSECTION REMOVAL GUIDELINES:".to_string());
    lines.push("- Hero section: REQUIRED (but make minimal)".to_string());
    lines.push("- Contact section: REQUIRED (but make minimal)".to_string());
    lines.push("- Metrics section: OPTIONAL - remove if needed".to_string());
    lines.push("- Features section: OPTIONAL - remove if needed".to_string());
    lines.push("- Testimonial section: OPTIONAL - remove if needed".to_string());
    lines.push("- Any other sections: REMOVE if needed".to_string());
    lines.push(
        "\nPRIORITY: Fitting on one page is MORE IMPORTANT than having complete content."
            .to_string(),
    );

    lines.join("\n") + "\n\n"
}

/// Measured heights, suggestions, and the content being corrected.
fn feedback_block(context: &GenerationContext) -> String {
    let mut block = String::new();

    if let Some(feedback) = &context.validation {
        if let (Some(total), Some(available)) = (feedback.total_height, feedback.available_height)
        {
            block.push_str(&format!(
                "MEASURED LAYOUT: content is {total}px tall; {available}px are available.\n"
            ));
        }

        if let Some(suggestions) = feedback.suggestions.as_ref().filter(|s| !s.is_empty()) {
            block.push_str("LAYOUT SUGGESTIONS:\n");
            for suggestion in suggestions {
                block.push_str(&format!("- {suggestion}\n"));
            }
        }

        // The existing content is shown below; avoid repeating the same document.
        if context.existing_content.is_none() {
            if let Some(previous) = &feedback.previous_attempt {
                block.push_str(&content_json_block("PREVIOUS ATTEMPT (too tall)", previous));
            }
        }
    }

    if let Some(existing) = &context.existing_content {
        block.push_str(&content_json_block(
            "CURRENT CONTENT TO CONDENSE (keep the same business and voice)",
            existing,
        ));
    }

    if !block.is_empty() {
        block.push('\n');
    }
    block
}

fn content_json_block(heading: &str, content: &crate::models::brochure::BrochureContent) -> String {
    let json = serde_json::to_string(content).unwrap_or_else(|_| content.title.clone());
    format!("{heading}:\n{json}\n")
}

fn space_constraints(settings: &BrochureSettings) -> &'static str {
    match (settings.page_count, settings.layout_density) {
        (PageCount::One, LayoutDensity::Compact) => {
            "- SINGLE PAGE MAXIMUM: 3-4 sections ONLY (hero + 1-2 optional + contact)\n\
             - Compact spacing: 2-3 word descriptions maximum\n\
             - Hero section MUST be minimal (no subtitle, short description)\n\
             - Contact section MUST be minimal (email only, short title)"
        }
        (PageCount::One, LayoutDensity::Spacious) => {
            "- SINGLE PAGE MAXIMUM: 2-3 sections ONLY (hero + contact + maybe 1 more)\n\
             - Spacious layout means VERY limited content\n\
             - Descriptions must be 1-2 words only\n\
             - Remove ALL optional elements"
        }
        (PageCount::One, LayoutDensity::Normal) => {
            "- SINGLE PAGE MAXIMUM: 3-4 sections ONLY\n\
             - Available height: ONLY 807 pixels total\n\
             - Each section averages 200px - plan accordingly\n\
             - REMOVE sections if content doesn't fit"
        }
        (PageCount::Two, _) => {
            "- TWO PAGES: Can include 6-8 sections total\n\
             - Distribute content evenly between pages\n\
             - More detailed descriptions allowed"
        }
    }
}

fn density_guidance(density: LayoutDensity) -> &'static str {
    match density {
        LayoutDensity::Compact => "tight spacing, more content, shorter descriptions",
        LayoutDensity::Spacious => "generous spacing, less content, breathing room",
        LayoutDensity::Normal => "balanced spacing and content",
    }
}

fn section_guidance(settings: &BrochureSettings) -> &'static str {
    if settings.page_count == PageCount::One && settings.layout_density == LayoutDensity::Compact {
        COMPACT_SINGLE_PAGE_SECTIONS
    } else {
        STANDARD_SECTIONS
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
