//! Run-length sections extracted from a binarized page.
//!
//! A page is read twice: column by column (vertical runs) and row by row
//! (horizontal runs). Runs on consecutive lines are chained into a
//! [`Section`] only while the overlap is one-to-one, so a section never
//! crosses a junction where strokes split or merge. Vertical sections are
//! the raw material of stem fibers; horizontal sections of unit width act as
//! staples bridging vertical pieces.
//!
//! Complexity is linear in the number of pixels per orientation.

mod extractor;
mod section;

pub use extractor::SectionsResult;
pub use section::{Orientation, Run, Section, SectionId};

use crate::image::ImageU8;

/// Default gray level below which a pixel is ink.
pub const DEFAULT_FOREGROUND_THRESHOLD: u8 = 128;

/// Extracts all sections of one orientation from `image`.
pub fn extract_sections(image: &ImageU8<'_>, orientation: Orientation, threshold: u8) -> SectionsResult {
    extractor::SectionExtractor::new(image, orientation, threshold).extract()
}
