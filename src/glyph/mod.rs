//! Foreground shapes and the page-wide shape registry.
//!
//! A [`Glyph`] is value-like: its identity is the exact pixel set it covers.
//! Fibers, seeds, chunks and merged stems all end up as glyphs registered in
//! the [`GlyphIndex`], which deduplicates physically identical shapes so that
//! equality checks downstream reduce to comparing canonical instances.

#[allow(clippy::module_inception)]
mod glyph;
mod index;

pub use glyph::{Glyph, GlyphId, GlyphLine, PixelSpan};
pub use index::GlyphIndex;

use std::sync::Arc;

/// Canonical identity test (pointer first, pixel set otherwise).
#[inline]
pub fn same_glyph(a: &Arc<Glyph>, b: &Arc<Glyph>) -> bool {
    Arc::ptr_eq(a, b) || a == b
}
