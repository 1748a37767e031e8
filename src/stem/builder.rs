use super::context::StemContext;
use super::error::StemBuildError;
use super::filter::filter_unaligned;
use super::inter::StemInter;
use super::item::{Extent, ShapeOrigin, StemItem};
use super::lengths::LengthTable;
use crate::diagnostics::{ItemReport, ProfileLength, StemSequenceReport};
use crate::geometry::Rect;
use crate::glyph::{same_glyph, Glyph};
use crate::grade::GradeImpacts;
use crate::linker::{LinkerId, LinkerKind, SourceId, StemLinker};
use crate::profiles::Profile;
use log::{debug, trace, warn};
use std::sync::Arc;

/// Smallest distance (pixels) between two items recorded as a gap.
const GAP_EPSILON: f32 = 0.01;

/// Ordered sequence of stem evidence along one anchor's theoretical line.
///
/// Everything is computed at construction: items are collected, filtered,
/// sorted, separated by gap items and the reachable length is recorded for
/// every profile. Afterwards the builder only answers queries and merges
/// item prefixes into stems on request.
pub struct StemSequenceBuilder<'a> {
    pub(super) ctx: &'a StemContext<'a>,
    pub(super) start: &'a StemLinker,
    pub(super) y_dir: i32,
    /// Rounded ordinate of the reference point.
    ref_y: i32,
    /// Bounds of the theoretical line, only the vertical range matters.
    y_range: Rect,
    max_profile: Profile,
    /// Ordinate of the last reachable head when leaving a beam.
    pub(super) last_head_y: Option<f32>,
    items: Vec<StemItem<'a>>,
    lengths: LengthTable,
    truncated: bool,
    dropped_linkers: Vec<LinkerId>,
}

impl<'a> StemSequenceBuilder<'a> {
    /// Builds the item sequence of `start`.
    ///
    /// `seeds` is the region seed pool (only seeds meeting the lookup area
    /// are considered) and `others` the anchors possibly reached along the
    /// line. Gaps larger than what `max_profile` tolerates cut the sequence.
    pub fn new(
        ctx: &'a StemContext<'a>,
        start: &'a StemLinker,
        seeds: &[Arc<Glyph>],
        others: &[&'a StemLinker],
        max_profile: Profile,
    ) -> Result<Self, StemBuildError> {
        let theo = start.theo_line();
        if theo.is_degenerate() {
            return Err(StemBuildError::DegenerateAxis { linker: start.id() });
        }
        if start.lookup_area().is_empty() {
            return Err(StemBuildError::EmptyLookupArea { linker: start.id() });
        }
        if !max_profile.is_valid() {
            return Err(StemBuildError::InvalidProfile { profile: max_profile });
        }

        let mut builder = Self {
            ctx,
            start,
            y_dir: theo.y_dir(),
            ref_y: theo.p1[1].round() as i32,
            y_range: theo.bounds(),
            max_profile,
            last_head_y: None,
            items: Vec::new(),
            lengths: LengthTable::new(),
            truncated: false,
            dropped_linkers: Vec::new(),
        };
        builder.retrieve_items(seeds, others);
        builder.retrieve_lengths();
        debug!(
            "linker#{} {:?} items:{} truncated:{} lengths:{:?}",
            start.id().0,
            start.kind(),
            builder.items.len(),
            builder.truncated,
            builder.lengths
        );
        Ok(builder)
    }

    /// Vertical overlap of `rect` with the theoretical line range, never negative.
    fn contrib(&self, rect: &Rect) -> i32 {
        self.y_range.y_overlap(rect).max(0)
    }

    /// Stump extent when it contributes, reference ordinate otherwise.
    fn anchor_extent(&self, linker: &StemLinker, contrib: i32) -> Extent {
        match linker.stump() {
            Some(stump) if contrib > 0 => Extent::of_rect(&stump.bounds()),
            _ => Extent::point(linker.reference_point()[1].round() as i32),
        }
    }

    pub(super) fn beyond_last_head(&self, y: f32) -> bool {
        self.last_head_y
            .is_some_and(|head_y| self.y_dir as f32 * (y - head_y) >= 0.0)
    }

    fn retrieve_items(&mut self, seeds: &[Arc<Glyph>], others: &[&'a StemLinker]) {
        let start = self.start;
        let stump = start.stump();
        let start_box = stump.map(|s| s.bounds());
        let start_contrib = start_box.map_or(0, |b| self.contrib(&b));
        let mut items = vec![StemItem::Start {
            linker: start,
            contrib: start_contrib,
            extent: self.anchor_extent(start, start_contrib),
        }];

        let area = start.lookup_area();
        let mut kept_seeds: Vec<Arc<Glyph>> = Vec::new();
        for seed in seeds.iter().filter(|s| area.intersects(&s.bounds())) {
            if !kept_seeds.iter().any(|k| same_glyph(k, seed)) {
                kept_seeds.push(Arc::clone(seed));
            }
        }

        // Seeds and stumps of the other linkers are filtered together.
        let mut candidates = kept_seeds.clone();
        for stump in others.iter().filter_map(|l| l.stump()) {
            if !candidates.iter().any(|c| same_glyph(c, stump)) {
                candidates.push(Arc::clone(stump));
            }
        }
        let removed = filter_unaligned(
            &mut candidates,
            stump,
            self.y_dir,
            self.ctx.skew(),
            self.ctx.params(),
        );
        let is_removed = |g: &Arc<Glyph>| removed.iter().any(|r| same_glyph(r, g));
        kept_seeds.retain(|s| !is_removed(s));

        let mut targets: Vec<&'a StemLinker> = Vec::new();
        let mut linker_items: Vec<StemItem<'a>> = Vec::new();
        for &linker in others {
            if linker.id() == start.id() {
                warn!("linker#{} listed among its own targets", start.id().0);
                continue;
            }
            if linker.stump().is_some_and(|s| is_removed(s)) {
                trace!("linker#{} dropped with its misaligned stump", linker.id().0);
                self.dropped_linkers.push(linker.id());
                continue;
            }
            let contrib = linker.stump().map_or(0, |s| self.contrib(&s.bounds()));
            linker_items.push(StemItem::Anchor {
                linker,
                contrib,
                extent: self.anchor_extent(linker, contrib),
            });
            targets.push(linker);
        }
        self.sort_items(&mut linker_items);

        self.last_head_y = self.find_last_head_y(&linker_items);
        if self.last_head_y.is_some() {
            kept_seeds.retain(|s| !self.beyond_last_head(s.bounds().center()[1]));
        }
        items.extend(linker_items);

        for seed in &kept_seeds {
            if targets
                .iter()
                .any(|l| l.stump().is_some_and(|st| same_glyph(st, seed)))
            {
                continue;
            }
            let bounds = seed.bounds();
            if start_box.is_some_and(|b| b.y_overlap(&bounds) > 0) {
                continue;
            }
            let contrib = self.contrib(&bounds);
            if contrib > 0 {
                items.push(StemItem::Shape {
                    glyph: Arc::clone(seed),
                    origin: ShapeOrigin::Seed,
                    contrib,
                    extent: Extent::of_rect(&bounds),
                });
            }
        }

        for chunk in self.lookup_chunks(&kept_seeds) {
            let bounds = chunk.bounds();
            items.push(StemItem::Shape {
                contrib: self.contrib(&bounds),
                glyph: chunk,
                origin: ShapeOrigin::Chunk,
                extent: Extent::of_rect(&bounds),
            });
        }

        self.sort_items(&mut items[1..]);
        self.items = self.insert_gaps(items);
    }

    /// Reference ordinate of the last head-corner linker, only when
    /// starting from a beam.
    fn find_last_head_y(&self, sorted: &[StemItem<'a>]) -> Option<f32> {
        if self.start.kind() != LinkerKind::BeamSide {
            return None;
        }
        sorted
            .iter()
            .rev()
            .filter_map(StemItem::linker)
            .find(|l| l.is_head_corner())
            .map(|l| l.reference_point()[1])
    }

    /// Stable sort by leading edge in the direction of travel; linkers at
    /// the same edge follow their reference ordinate.
    ///
    /// Anchors are not ordered by reference ordinate alone: a stump may
    /// start before the reference point of an earlier anchor, and extents
    /// must stay monotonic along the sequence.
    fn sort_items(&self, items: &mut [StemItem<'a>]) {
        let y_dir = self.y_dir;
        let key = |item: &StemItem<'a>| {
            let edge = y_dir * item.extent().leading(y_dir);
            let secondary = match item.linker() {
                Some(linker) => y_dir as f32 * linker.reference_point()[1],
                None => edge as f32,
            };
            (edge, secondary)
        };
        items.sort_by(|a, b| {
            let (ea, sa) = key(a);
            let (eb, sb) = key(b);
            ea.cmp(&eb).then(sa.total_cmp(&sb))
        });
    }

    /// Inserts gap items and cuts the sequence at the first gap that even
    /// `max_profile` cannot bridge.
    fn insert_gaps(&mut self, items: Vec<StemItem<'a>>) -> Vec<StemItem<'a>> {
        let max_gap = self.ctx.params().gap_table.max_gap(self.max_profile);
        let y_dir = self.y_dir;
        let mut sequence = Vec::with_capacity(items.len() * 2);
        let mut reached: Option<i32> = None;

        for item in items {
            let extent = item.extent();
            let (lead, trail) = (extent.leading(y_dir), extent.trailing(y_dir));
            match reached {
                None => reached = Some(trail),
                Some(last) => {
                    let gap = y_dir * (lead - last);
                    if gap > max_gap {
                        debug!(
                            "linker#{} cut at gap {} > {} ({})",
                            self.start.id().0,
                            gap,
                            max_gap,
                            self.max_profile
                        );
                        self.truncated = true;
                        break;
                    }
                    if gap as f32 > GAP_EPSILON {
                        sequence.push(StemItem::Gap {
                            extent: Extent::new(last, lead),
                        });
                    }
                    if y_dir * (trail - last) > 0 {
                        reached = Some(trail);
                    }
                }
            }
            sequence.push(item);
        }
        sequence
    }

    fn retrieve_lengths(&mut self) {
        let gap_table = &self.ctx.params().gap_table;
        let mut lengths = LengthTable::new();
        for (i, item) in self.items.iter().enumerate() {
            let Some(gap) = item.gap_length() else {
                continue;
            };
            for (profile, max_gap) in gap_table.iter() {
                if gap <= max_gap {
                    break;
                }
                // A gap is never first, the start item is.
                lengths.set_if_unset(profile, self.length_at(i.saturating_sub(1)));
            }
        }
        let full = self.length_at(self.max_index());
        for profile in Profile::all() {
            lengths.set_if_unset(profile, full);
        }
        self.lengths = lengths;
    }

    /// Length from the reference point to the furthest item up to `index`,
    /// a reached anchor contributing the bounds of its head or beam.
    pub fn length_at(&self, index: usize) -> i32 {
        let mut span: Option<Extent> = None;
        for item in self.items.iter().take(index.saturating_add(1)) {
            let extent = match item {
                StemItem::Gap { .. } => continue,
                StemItem::Anchor { linker, extent, .. } => {
                    extent.union(&Extent::of_rect(&linker.source().bounds))
                }
                StemItem::Start { extent, .. } | StemItem::Shape { extent, .. } => *extent,
            };
            span = Some(span.map_or(extent, |s| s.union(&extent)));
        }
        let Some(span) = span else {
            return 0;
        };
        let length = if self.y_dir > 0 {
            span.bottom - self.ref_y
        } else {
            self.ref_y - span.top
        };
        length.max(0)
    }

    /// Reachable length at `profile`.
    pub fn length(&self, profile: Profile) -> i32 {
        self.lengths.get(profile.min(Profile::MAX)).unwrap_or(0)
    }

    /// Length at the most permissive profile.
    pub fn total_length(&self) -> i32 {
        self.length(Profile::MAX)
    }

    pub fn has_minimal_length(&self, profile: Profile) -> bool {
        self.length(profile) >= self.ctx.params().min_linker_length
    }

    /// Whether evidence leaves the anchor directly, before any gap, with
    /// the minimal linker length.
    pub fn has_concrete_start(&self, profile: Profile) -> bool {
        let first_gap = self.items.iter().position(StemItem::is_gap);
        let prefix = match first_gap {
            Some(i) => self.length_at(i.saturating_sub(1)),
            None => self.length_at(self.max_index()),
        };
        prefix.min(self.length(profile)) >= self.ctx.params().min_linker_length
    }

    pub fn items(&self) -> &[StemItem<'a>] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&StemItem<'a>> {
        self.items.get(index)
    }

    /// Index of the last item (the sequence is never empty).
    pub fn max_index(&self) -> usize {
        self.items.len().saturating_sub(1)
    }

    pub fn start(&self) -> &'a StemLinker {
        self.start
    }

    pub fn y_dir(&self) -> i32 {
        self.y_dir
    }

    pub fn lengths(&self) -> &LengthTable {
        &self.lengths
    }

    /// Whether a gap too large for the maximum profile cut the sequence.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Linkers discarded because their stump was misaligned.
    pub fn dropped_linkers(&self) -> &[LinkerId] {
        &self.dropped_linkers
    }

    /// Distinct shapes of the items up to `index`, in first-seen order.
    pub fn items_up_to(&self, index: usize) -> Vec<Arc<Glyph>> {
        let mut glyphs: Vec<Arc<Glyph>> = Vec::new();
        for glyph in self
            .items
            .iter()
            .take(index.saturating_add(1))
            .filter_map(StemItem::glyph)
        {
            if !glyphs.iter().any(|g| same_glyph(g, glyph)) {
                glyphs.push(Arc::clone(glyph));
            }
        }
        glyphs
    }

    /// First anchor item after `index`, unless a gap too large for
    /// `profile` comes first.
    pub fn first_anchor_after(&self, index: usize, profile: Profile) -> Option<&StemItem<'a>> {
        let max_gap = self.ctx.params().gap_table.max_gap(profile);
        for item in self.items.iter().skip(index.saturating_add(1)) {
            match item {
                StemItem::Gap { extent } if extent.height() > max_gap => return None,
                StemItem::Anchor { .. } => return Some(item),
                _ => {}
            }
        }
        None
    }

    /// Last gap item strictly before `index`.
    pub fn last_gap_before(&self, index: usize) -> Option<&StemItem<'a>> {
        self.items
            .iter()
            .take(index.min(self.items.len()))
            .rev()
            .find(|item| item.is_gap())
    }

    pub fn index_of_linker(&self, id: LinkerId) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.linker().is_some_and(|l| l.id() == id))
    }

    /// Linker item whose head or beam is `source`.
    pub fn linker_of_source(&self, source: SourceId) -> Option<&'a StemLinker> {
        self.items
            .iter()
            .filter_map(StemItem::linker)
            .find(|l| l.source().id == source)
    }

    /// Head-corner linkers up to `max_index` (whole sequence when `None`).
    pub fn head_linkers_up_to(&self, max_index: Option<usize>) -> Vec<&'a StemLinker> {
        let last = max_index.unwrap_or(self.max_index());
        self.items
            .iter()
            .take(last.saturating_add(1))
            .filter_map(StemItem::linker)
            .filter(|l| l.is_head_corner())
            .collect()
    }

    /// Linkers reached past the start one, in sequence order.
    pub fn target_linkers(&self) -> Vec<&'a StemLinker> {
        self.items
            .iter()
            .filter(|item| item.is_anchor())
            .filter_map(StemItem::linker)
            .collect()
    }

    /// Merges `glyphs` into one stem and grades it at `profile`.
    ///
    /// A stem already created for the same merged shape is returned as is.
    /// Below the minimum grade, the artificial stem policy may still accept
    /// the shape at its fixed grade; with no shape at all it then draws a
    /// main-thickness stem along the theoretical line.
    pub fn create_stem(&self, glyphs: &[Arc<Glyph>], profile: Profile) -> Option<Arc<StemInter>> {
        let params = self.ctx.params();
        let policy = params.artificial_stem;
        let index = self.ctx.index();
        let merged = match glyphs {
            [] if policy.applies_to(profile) => index.register(Glyph::along_axis(
                self.start.theo_line(),
                params.main_stem_thickness,
            )),
            [] => return None,
            [single] => index.register(Glyph::clone(single)),
            many => index.register(Glyph::union(many.iter().map(Arc::as_ref))),
        };

        let cache = self.ctx.cache();
        if let Some(existing) = cache.get(&merged) {
            return Some(existing);
        }

        // A line drawn without any evidence is not worth grading.
        let impacts = if glyphs.is_empty() {
            GradeImpacts::new()
        } else {
            self.ctx.grader().grade(&merged, profile)
        };
        let grade = impacts.grade();
        if grade >= params.min_grade {
            return Some(cache.insert(StemInter::new(merged, impacts, profile)));
        }
        if policy.applies_to(profile) {
            debug!(
                "linker#{} artificial stem at {} (grade {:.3})",
                self.start.id().0,
                profile,
                grade
            );
            return Some(cache.insert(StemInter::artificial(merged, policy.grade, impacts, profile)));
        }
        trace!("linker#{} stem rejected at {} (grade {:.3})", self.start.id().0, profile, grade);
        None
    }

    /// Serializable snapshot of the construction.
    pub fn report(&self) -> StemSequenceReport {
        let items = self
            .items
            .iter()
            .map(|item| {
                let extent = item.extent();
                match item {
                    StemItem::Start { linker, contrib, .. } => ItemReport::Start {
                        linker: linker.id(),
                        contrib: *contrib,
                        extent,
                    },
                    StemItem::Anchor { linker, contrib, .. } => ItemReport::Anchor {
                        linker: linker.id(),
                        kind: linker.kind(),
                        source: linker.source().id,
                        contrib: *contrib,
                        extent,
                    },
                    StemItem::Shape {
                        glyph,
                        origin,
                        contrib,
                        ..
                    } => ItemReport::Shape {
                        glyph: glyph.id(),
                        origin: *origin,
                        contrib: *contrib,
                        extent,
                    },
                    StemItem::Gap { .. } => ItemReport::Gap {
                        length: extent.height(),
                        extent,
                    },
                }
            })
            .collect();
        let lengths = self
            .lengths
            .iter()
            .map(|(profile, length)| ProfileLength {
                profile,
                length: length.unwrap_or(0),
            })
            .collect();
        StemSequenceReport {
            linker: self.start.id(),
            kind: self.start.kind(),
            y_dir: self.y_dir,
            max_profile: self.max_profile,
            items,
            lengths,
            truncated: self.truncated,
            last_head_y: self.last_head_y,
            dropped_linkers: self.dropped_linkers.clone(),
            stem: None,
        }
    }
}
