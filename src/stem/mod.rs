//! Stem item sequences and reachable lengths.
//!
//! For one anchor ([`StemLinker`](crate::linker::StemLinker)), the
//! [`StemSequenceBuilder`] gathers every plausible piece of stem evidence
//! along the theoretical line:
//! - the anchor's own stump and the other anchors met on the way,
//! - region seeds aligned with the stump,
//! - chunks assembled on the fly from nearby sections.
//!
//! Items are ordered in the direction of travel and separated by gap items.
//! For every [`Profile`](crate::profiles::Profile) the builder records how
//! far the sequence reaches before a gap the profile cannot bridge, so that
//! callers may retry at more permissive profiles without rebuilding.
//! Prefixes of the sequence are finally merged and graded into a
//! [`StemInter`] through [`StemSequenceBuilder::create_stem`].

mod builder;
mod chunks;
mod context;
mod error;
mod filter;
mod inter;
mod item;
mod lengths;

pub use builder::StemSequenceBuilder;
pub use context::StemContext;
pub use error::StemBuildError;
pub use filter::are_aligned;
pub use inter::{StemCache, StemInter};
pub use item::{Extent, ShapeOrigin, StemItem};
pub use lengths::LengthTable;

#[cfg(test)]
mod tests;
