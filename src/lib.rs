#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod config;
pub mod diagnostics;
pub mod image;
pub mod linker;
pub mod profiles;
pub mod seeds;
pub mod stem;

// Building blocks shared by the stages above.
pub mod fiber;
pub mod geometry;
pub mod glyph;
pub mod grade;
pub mod scale;
pub mod sections;

// --- High-level re-exports -------------------------------------------------

pub use crate::linker::{LinkerKind, StemLinker};
pub use crate::profiles::Profile;
pub use crate::seeds::{collect_all_seeds, SystemRegion};
pub use crate::stem::{StemBuildError, StemContext, StemInter, StemSequenceBuilder};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use stem_detector::prelude::*;
///
/// # fn main() {
/// let scale = Scale::new(20, 3, 4);
/// let params = StemConfig::default().resolve(&scale);
/// let grader = StemChecker::new(scale, Skew::default(), CheckerConfig::default(), params.gap_table.clone());
/// let index = GlyphIndex::new();
/// let ctx = StemContext::new(scale, Skew::default(), params, &index, &StickFactory, &grader);
///
/// let stump = index.register(Glyph::from_rect(Rect::new(49, 100, 3, 20)));
/// let start = StemLinker::along_axis(
///     LinkerId(1),
///     LinkerKind::HeadCorner,
///     AxisLine::new([50.0, 100.0], [50.0, 160.0]),
///     6.0,
///     LinkerSource::new(SourceId(1), Rect::new(38, 95, 12, 10)),
/// )
/// .with_stump(stump);
///
/// let builder = StemSequenceBuilder::new(&ctx, &start, &[], &[], Profile::MAX).unwrap();
/// println!("length={} at {}", builder.length(Profile::STRICT), Profile::STRICT);
/// # }
/// ```
pub mod prelude {
    pub use crate::config::{CheckerConfig, StemConfig};
    pub use crate::fiber::StickFactory;
    pub use crate::geometry::{AxisLine, Rect};
    pub use crate::glyph::{Glyph, GlyphIndex};
    pub use crate::grade::StemChecker;
    pub use crate::image::ImageU8;
    pub use crate::linker::{LinkerId, LinkerKind, LinkerSource, SourceId, StemLinker};
    pub use crate::profiles::Profile;
    pub use crate::scale::{Scale, Skew};
    pub use crate::stem::{StemContext, StemSequenceBuilder};
}
