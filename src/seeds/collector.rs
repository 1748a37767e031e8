use super::region::{Seed, SystemRegion};
use crate::fiber::FiberParams;
use crate::profiles::Profile;
use crate::sections::{Orientation, Section};
use crate::stem::StemContext;
use log::{debug, trace};
use serde::Serialize;

/// Outcome counters of one seed collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SeedStats {
    pub fibers: usize,
    pub excluded: usize,
    pub rejected: usize,
    pub accepted: usize,
}

/// Collects stem seeds for system regions.
pub struct VerticalsBuilder<'c> {
    ctx: &'c StemContext<'c>,
}

impl<'c> VerticalsBuilder<'c> {
    pub fn new(ctx: &'c StemContext<'c>) -> Self {
        Self { ctx }
    }

    /// Assembles vertical fibers inside `region`, grades them and appends
    /// the acceptable ones to the region seed pool.
    ///
    /// Every fiber is skipped when the region has no staff. Otherwise a
    /// fiber whose centroid falls on a tablature or left of the header stop
    /// of its closest staff is skipped too. The remaining fibers are
    /// registered in the page index before the canonical instance is graded.
    pub fn collect_seeds(&self, region: &mut SystemRegion) -> SeedStats {
        let params = self.ctx.params();
        let centered = |s: &&Section| region.contains_x(s.centroid()[0]);
        let vertical: Vec<Section> = region
            .vertical_sections()
            .iter()
            .filter(centered)
            .cloned()
            .collect();
        let staples: Vec<Section> = region
            .horizontal_sections()
            .iter()
            .filter(|s| s.bounds().width == 1)
            .filter(centered)
            .cloned()
            .collect();

        let fiber_params = FiberParams {
            orientation: Orientation::Vertical,
            max_thickness: params.max_stem_thickness,
            min_core_length: params.min_core_section_length,
            min_side_ratio: params.min_side_ratio,
        };
        let fibers = self.ctx.factory().assemble(&fiber_params, &vertical, &staples);

        let mut stats = SeedStats {
            fibers: fibers.len(),
            ..SeedStats::default()
        };
        let mut accepted: Vec<Seed> = Vec::new();
        for fiber in fibers {
            let glyph = fiber.to_glyph();
            let centroid = glyph.centroid();
            let excluded = match region.closest_staff(centroid) {
                None => true,
                Some(staff) => staff.tablature || centroid[0] < staff.header_stop as f32,
            };
            if excluded {
                stats.excluded += 1;
                continue;
            }

            let glyph = self.ctx.index().register(glyph);
            let grade = self.ctx.grader().grade(&glyph, Profile::MAX).grade();
            if grade < params.seed_min_grade {
                trace!("fiber at {:?} rejected (grade {grade:.3})", glyph.bounds());
                stats.rejected += 1;
                continue;
            }
            accepted.push(Seed { glyph, grade });
        }

        stats.accepted = accepted.len();
        for seed in accepted {
            region.add_seed(seed);
        }
        debug!(
            "region#{} seeds: {} accepted, {} rejected, {} excluded out of {} fibers",
            region.id(),
            stats.accepted,
            stats.rejected,
            stats.excluded,
            stats.fibers
        );
        stats
    }
}
