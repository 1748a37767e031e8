use super::builder::StemSequenceBuilder;
use super::filter::{filter_unaligned, sort_along};
use crate::fiber::{Fiber, FiberParams};
use crate::glyph::{same_glyph, Glyph};
use crate::sections::{Orientation, Section};
use log::trace;
use std::sync::Arc;

/// Mean thickness rounded half to even.
fn rounded_thickness(fiber: &Fiber) -> i32 {
    fiber.mean_thickness().round_ties_even() as i32
}

impl<'a> StemSequenceBuilder<'a> {
    /// Vertical sections of the lookup area close enough to the line.
    fn lookup_vertical_sections(&self) -> Vec<Section> {
        let params = self.ctx.params();
        let area = self.start.lookup_area();
        let theo = self.start.theo_line();
        let stump_box = self.start.stump().map(|s| s.bounds());

        self.ctx
            .vertical_sections()
            .iter()
            .filter(|section| {
                let bounds = section.bounds();
                if !area.intersects(&bounds) || bounds.width > params.max_stem_thickness {
                    return false;
                }
                // Pieces of the stump itself are already accounted for.
                if stump_box.is_some_and(|b| bounds.y_overlap(&b) > 0 && bounds.height < b.height) {
                    return false;
                }
                let center = section.centroid();
                !self.beyond_last_head(center[1]) && theo.dist(center) <= params.max_line_section_dx
            })
            .cloned()
            .collect()
    }

    /// One-pixel wide horizontal sections of the lookup area, used as staples.
    fn lookup_horizontal_sections(&self) -> Vec<Section> {
        let area = self.start.lookup_area();
        self.ctx
            .horizontal_sections()
            .iter()
            .filter(|section| {
                let bounds = section.bounds();
                bounds.width <= 1
                    && area.intersects(&bounds)
                    && !self.beyond_last_head(section.centroid()[1])
            })
            .cloned()
            .collect()
    }

    /// Chunks assembled from the sections around the line, seeds excluded,
    /// aligned with the stump and sorted along the direction of travel.
    pub(super) fn lookup_chunks(&self, seeds: &[Arc<Glyph>]) -> Vec<Arc<Glyph>> {
        let vertical = self.lookup_vertical_sections();
        if vertical.is_empty() {
            return Vec::new();
        }
        let horizontal = self.lookup_horizontal_sections();
        let params = self.ctx.params();
        let fiber_params = FiberParams {
            orientation: Orientation::Vertical,
            max_thickness: params.max_stem_thickness,
            // Sections near the line are long enough already.
            min_core_length: 0,
            min_side_ratio: params.min_side_ratio,
        };

        let head = self
            .start
            .source()
            .glyph
            .as_ref()
            .filter(|_| self.start.is_head_corner());
        let index = self.ctx.index();
        let mut chunks: Vec<Arc<Glyph>> = Vec::new();
        for fiber in self.ctx.factory().assemble(&fiber_params, &vertical, &horizontal) {
            let fiber = if rounded_thickness(&fiber) > params.max_stem_thickness {
                match self.trim_wide_chunk(fiber) {
                    Some(trimmed) => trimmed,
                    None => continue,
                }
            } else {
                fiber
            };
            let glyph = index.register(fiber.to_glyph());
            if let Some(head) = head {
                let own = glyph.weight() - glyph.shared_weight(head);
                if own < params.min_head_chunk_weight {
                    trace!("chunk {:?} is mostly head ink ({own} px)", glyph.id());
                    continue;
                }
            }
            if seeds.iter().any(|s| same_glyph(s, &glyph)) {
                continue;
            }
            chunks.push(glyph);
        }

        let stump = self.start.stump();
        filter_unaligned(&mut chunks, stump, self.y_dir, self.ctx.skew(), params);
        if let Some(stump) = stump {
            chunks.retain(|c| !same_glyph(c, stump));
        }
        sort_along(&mut chunks, self.y_dir);
        chunks
    }

    /// Shrinks a too-wide fiber by removing the members farthest from the
    /// theoretical line, one at a time, until its rounded mean thickness
    /// fits the maximum stem thickness.
    ///
    /// Returns `None` when no member is left to remove.
    pub fn trim_wide_chunk(&self, mut wide: Fiber) -> Option<Fiber> {
        let theo = self.start.theo_line();
        let max_thickness = self.ctx.params().max_stem_thickness;
        let mut members: Vec<_> = wide
            .members()
            .iter()
            .map(|s| (theo.dist_sq(s.centroid()), s.id))
            .collect();
        members.sort_by(|a, b| b.0.total_cmp(&a.0));

        for (_, id) in members {
            wide.remove_section(id);
            if wide.is_empty() {
                break;
            }
            if rounded_thickness(&wide) <= max_thickness {
                return Some(wide);
            }
        }
        None
    }
}
