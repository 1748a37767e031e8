use super::inter::StemCache;
use crate::config::StemParams;
use crate::fiber::FiberFactory;
use crate::glyph::GlyphIndex;
use crate::grade::StemGrader;
use crate::scale::{Scale, Skew};
use crate::sections::Section;
use crate::seeds::SystemRegion;

/// Read-only services shared by the builders of one region.
///
/// Only the glyph index and the stem cache see writes, both through
/// insert-or-get operations, so a context can be shared across threads.
pub struct StemContext<'r> {
    scale: Scale,
    skew: Skew,
    params: StemParams,
    index: &'r GlyphIndex,
    factory: &'r dyn FiberFactory,
    grader: &'r dyn StemGrader,
    vertical_sections: &'r [Section],
    horizontal_sections: &'r [Section],
    cache: StemCache,
}

impl<'r> StemContext<'r> {
    pub fn new(
        scale: Scale,
        skew: Skew,
        params: StemParams,
        index: &'r GlyphIndex,
        factory: &'r dyn FiberFactory,
        grader: &'r dyn StemGrader,
    ) -> Self {
        Self {
            scale,
            skew,
            params,
            index,
            factory,
            grader,
            vertical_sections: &[],
            horizontal_sections: &[],
            cache: StemCache::new(),
        }
    }

    /// Sections scanned for chunks around each anchor.
    pub fn with_sections(mut self, vertical: &'r [Section], horizontal: &'r [Section]) -> Self {
        self.vertical_sections = vertical;
        self.horizontal_sections = horizontal;
        self
    }

    pub fn with_region(self, region: &'r SystemRegion) -> Self {
        self.with_sections(region.vertical_sections(), region.horizontal_sections())
    }

    pub fn scale(&self) -> &Scale {
        &self.scale
    }

    pub fn skew(&self) -> &Skew {
        &self.skew
    }

    pub fn params(&self) -> &StemParams {
        &self.params
    }

    pub fn index(&self) -> &'r GlyphIndex {
        self.index
    }

    pub fn factory(&self) -> &'r dyn FiberFactory {
        self.factory
    }

    pub fn grader(&self) -> &'r dyn StemGrader {
        self.grader
    }

    pub fn vertical_sections(&self) -> &'r [Section] {
        self.vertical_sections
    }

    pub fn horizontal_sections(&self) -> &'r [Section] {
        self.horizontal_sections
    }

    pub fn cache(&self) -> &StemCache {
        &self.cache
    }
}
