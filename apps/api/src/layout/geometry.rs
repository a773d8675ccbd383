//! Page geometry — the physical page and its reserved regions, in CSS pixels at 96 DPI.
//!
//! Built once at startup and injected wherever the overflow budget is needed.
//! `available_height` depends on these constants alone, never on content or settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageGeometry {
    pub page_width: u32,
    pub page_height: u32,
    /// Uniform margin applied to all four sides.
    pub margin: u32,
    /// Brochure title + tagline block at the top of the content area.
    pub header_height: u32,
    /// Generated-date line and its border at the bottom of the content area.
    pub footer_height: u32,
    /// Gutter reserved for the page number.
    pub page_number_height: u32,
}

impl PageGeometry {
    /// A4 portrait at 96 DPI with 48px margins.
    pub const fn a4() -> Self {
        Self {
            page_width: 794,
            page_height: 1123,
            margin: 48,
            header_height: 124,
            footer_height: 48,
            page_number_height: 48,
        }
    }

    pub const fn content_width(&self) -> u32 {
        self.page_width - 2 * self.margin
    }

    pub const fn content_height(&self) -> u32 {
        self.page_height - 2 * self.margin
    }

    /// Vertical space left for sections once the header, footer and page number are reserved.
    pub const fn available_height(&self) -> u32 {
        self.content_height() - self.header_height - self.footer_height - self.page_number_height
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}
