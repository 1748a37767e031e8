//! Region-level collection of stem seeds.
//!
//! Each [`SystemRegion`] owns its sections and an append-only pool of
//! seeds. [`VerticalsBuilder`] fills that pool once per region; regions are
//! independent, so [`collect_all_seeds`] runs them in parallel and only
//! shares the (thread-safe) glyph index between workers.

mod collector;
mod region;

pub use collector::{SeedStats, VerticalsBuilder};
pub use region::{Seed, StaffZone, SystemRegion};

use crate::stem::StemContext;
use rayon::prelude::*;

/// Collects seeds for every region, one rayon task per region.
pub fn collect_all_seeds(regions: &mut [SystemRegion], ctx: &StemContext<'_>) -> Vec<SeedStats> {
    regions
        .par_iter_mut()
        .map(|region| VerticalsBuilder::new(ctx).collect_seeds(region))
        .collect()
}
