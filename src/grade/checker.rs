use super::{GradeImpacts, StemGrader};
use crate::config::stem::CheckerConfig;
use crate::glyph::Glyph;
use crate::profiles::{GapTable, Profile};
use crate::scale::{Scale, Skew};
use log::trace;

/// Maps `value` onto `[0, 1]` between `low` and `high`.
///
/// A covariant check rewards large values, the other kind rewards small ones.
fn ramp(value: f32, low: f32, high: f32, covariant: bool) -> f32 {
    if high <= low {
        let pass = if covariant { value >= high } else { value <= low };
        return if pass { 1.0 } else { 0.0 };
    }
    let t = ((value - low) / (high - low)).clamp(0.0, 1.0);
    if covariant {
        t
    } else {
        1.0 - t
    }
}

/// Row statistics gathered in one pass over the glyph spans.
#[derive(Default)]
struct RowStats {
    black: i32,
    white: i32,
    clean: i32,
    largest_gap: i32,
}

fn row_stats(glyph: &Glyph, max_width: i32) -> RowStats {
    let mut stats = RowStats::default();
    let spans = glyph.spans();
    let mut i = 0;
    let mut last_y: Option<i32> = None;
    while i < spans.len() {
        let y = spans[i].y;
        let mut width = 0;
        while i < spans.len() && spans[i].y == y {
            width += spans[i].len();
            i += 1;
        }
        if let Some(prev) = last_y {
            let gap = y - prev - 1;
            stats.white += gap;
            stats.largest_gap = stats.largest_gap.max(gap);
        }
        stats.black += 1;
        if width <= max_width {
            stats.clean += 1;
        }
        last_y = Some(y);
    }
    stats
}

/// Default stem grader working on the glyph pixels only.
///
/// Checks and weights:
/// - `slope` (1): tangent difference with the page slope.
/// - `straight` (1): mean pixel distance to the fitted line.
/// - `length` (2): vertical extent.
/// - `clean` (2): rows with nothing stuck to the stem, skipped from
///   [`Profile::BEAM_SIDE`] upwards.
/// - `black` (1) and `black_ratio` (1): filled rows, absolute and relative.
/// - `gap` (5): largest run of empty rows against the profile gap bound.
#[derive(Clone, Debug)]
pub struct StemChecker {
    scale: Scale,
    skew: Skew,
    config: CheckerConfig,
    gap_table: GapTable,
}

impl StemChecker {
    pub fn new(scale: Scale, skew: Skew, config: CheckerConfig, gap_table: GapTable) -> Self {
        Self {
            scale,
            skew,
            config,
            gap_table,
        }
    }

    fn frac(&self, pixels: f32) -> f32 {
        self.scale.pixels_to_frac(pixels)
    }
}

impl StemGrader for StemChecker {
    fn grade(&self, glyph: &Glyph, profile: Profile) -> GradeImpacts {
        let cfg = &self.config;
        let p = profile.index().min(Profile::COUNT - 1);
        let mut impacts = GradeImpacts::new();
        if glyph.is_empty() {
            impacts.push("length", 0.0, 2.0);
            return impacts;
        }

        let slope = match glyph.center_line() {
            Some(line) => {
                let dy = line.p2[1] - line.p1[1];
                // Stem slope is measured against the normal of the staff lines.
                let stem_slope = -(line.p2[0] - line.p1[0]) / dy;
                (stem_slope - self.skew.slope).abs()
            }
            None => f32::INFINITY,
        };
        impacts.push("slope", ramp(slope, 0.0, cfg.slope_high, false), 1.0);

        let straight = self.frac(glyph.mean_distance_to_line());
        impacts.push("straight", ramp(straight, 0.0, cfg.straight_high, false), 1.0);

        let length = self.frac(glyph.bounds().height as f32);
        impacts.push("length", ramp(length, cfg.length_low, cfg.length_high, true), 2.0);

        let stats = row_stats(glyph, self.scale.max_stem);
        if profile < Profile::BEAM_SIDE {
            let clean = self.frac(stats.clean as f32);
            impacts.push("clean", ramp(clean, cfg.clean_low[p], cfg.clean_high, true), 2.0);
        }

        let black = self.frac(stats.black as f32);
        impacts.push("black", ramp(black, cfg.black_low[p], cfg.black_high[p], true), 1.0);

        let ratio = stats.black as f32 / (stats.black + stats.white).max(1) as f32;
        impacts.push("black_ratio", ramp(ratio, cfg.black_ratio_low[p], 1.0, true), 1.0);

        let gap = self.frac(stats.largest_gap as f32);
        let gap_high = self.frac(self.gap_table.max_gap(profile) as f32);
        impacts.push("gap", ramp(gap, 0.0, gap_high, false), 5.0);

        trace!(
            "graded glyph {:?} at {}: {:.3} {:?}",
            glyph.id(),
            profile,
            impacts.grade(),
            impacts.impacts
        );
        impacts
    }
}
