use super::filter::filter_unaligned;
use super::*;
use crate::config::{CheckerConfig, StemConfig, StemParams};
use crate::fiber::{Fiber, StickFactory};
use crate::geometry::{AxisLine, LookupArea, Rect};
use crate::glyph::{Glyph, GlyphIndex};
use crate::grade::{GradeImpacts, StemChecker, StemGrader};
use crate::linker::{LinkerId, LinkerKind, LinkerSource, SourceId, StemLinker};
use crate::profiles::{GapTable, Profile};
use crate::scale::{Scale, Skew};
use crate::sections::{Orientation, Section, SectionId};
use std::sync::Arc;

const GAPS: [i32; 5] = [4, 8, 12, 40, 80];

fn scale() -> Scale {
    Scale::new(20, 3, 4)
}

fn params(gaps: &[i32]) -> StemParams {
    let mut params = StemConfig::default().resolve(&scale());
    params.gap_table = GapTable::from_pixels(gaps);
    params
}

fn context<'r>(
    index: &'r GlyphIndex,
    grader: &'r dyn StemGrader,
    params: StemParams,
) -> StemContext<'r> {
    StemContext::new(scale(), Skew::default(), params, index, &StickFactory, grader)
}

fn checker() -> StemChecker {
    StemChecker::new(
        scale(),
        Skew::default(),
        CheckerConfig::default(),
        GapTable::from_pixels(&GAPS),
    )
}

/// Grader returning the same grade for any shape.
struct FixedGrader(f32);

impl StemGrader for FixedGrader {
    fn grade(&self, _glyph: &Glyph, _profile: Profile) -> GradeImpacts {
        let mut impacts = GradeImpacts::new();
        impacts.push("fixed", self.0, 1.0);
        impacts
    }
}

fn glyph(index: &GlyphIndex, rect: Rect) -> Arc<Glyph> {
    index.register(Glyph::from_rect(rect))
}

fn linker(id: u32, kind: LinkerKind, reference: [f32; 2], target: [f32; 2], source: Rect) -> StemLinker {
    StemLinker::along_axis(
        LinkerId(id),
        kind,
        AxisLine::new(reference, target),
        6.0,
        LinkerSource::new(SourceId(id), source),
    )
}

/// Head-corner linker at x=50 going down from `ref_y` to `ref_y + 100`.
fn head_down(id: u32, ref_y: f32) -> StemLinker {
    linker(
        id,
        LinkerKind::HeadCorner,
        [50.0, ref_y],
        [50.0, ref_y + 100.0],
        Rect::new(38, ref_y as i32 - 5, 12, 10),
    )
}

fn vertical(rects: &[Rect]) -> Vec<Section> {
    rects
        .iter()
        .enumerate()
        .map(|(i, r)| Section::from_rect(SectionId::new(Orientation::Vertical, i as u32), Orientation::Vertical, *r))
        .collect()
}

fn shape_extents(builder: &StemSequenceBuilder<'_>) -> Vec<Extent> {
    builder
        .items()
        .iter()
        .filter(|item| matches!(item, StemItem::Shape { .. }))
        .map(StemItem::extent)
        .collect()
}

/// Ordering and gap rules every built sequence must satisfy.
fn assert_well_formed(builder: &StemSequenceBuilder<'_>) {
    let y_dir = builder.y_dir();
    let items = builder.items();
    assert!(matches!(items[0], StemItem::Start { .. }));
    assert!(!items[items.len() - 1].is_gap(), "sequence never ends with a gap");

    let mut reached = items[0].extent().trailing(y_dir);
    let mut last_lead: Option<i32> = None;
    for (i, item) in items.iter().enumerate().skip(1) {
        let extent = item.extent();
        if item.is_gap() {
            let next = &items[i + 1];
            assert!(!next.is_gap(), "two gaps in a row");
            assert!(extent.height() > 0);
            assert_eq!(extent, Extent::new(reached, next.extent().leading(y_dir)));
            continue;
        }
        let lead = extent.leading(y_dir);
        if let Some(prev) = last_lead {
            assert!(y_dir * (lead - prev) >= 0, "items out of order at {i}");
        }
        last_lead = Some(lead);
        if !items[i - 1].is_gap() {
            assert!(y_dir * (lead - reached) <= 0, "missing gap before item {i}");
        }
        let trail = extent.trailing(y_dir);
        if y_dir * (trail - reached) > 0 {
            reached = trail;
        }
    }
}

fn assert_monotonic(builder: &StemSequenceBuilder<'_>) {
    let lengths: Vec<i32> = Profile::all().map(|p| builder.length(p)).collect();
    assert!(builder.lengths().is_complete());
    assert!(lengths.windows(2).all(|w| w[0] <= w[1]), "{lengths:?}");
    assert!(lengths.iter().all(|&l| l >= 0));
}

#[test]
fn stump_behind_the_anchor_gives_zero_length() {
    let _ = env_logger::builder().is_test(true).try_init();
    let index = GlyphIndex::new();
    let grader = FixedGrader(0.8);
    let ctx = context(&index, &grader, params(&GAPS));
    let start = head_down(1, 100.0).with_stump(glyph(&index, Rect::new(44, 85, 12, 15)));

    let builder = StemSequenceBuilder::new(&ctx, &start, &[], &[], Profile::MAX).unwrap();
    assert_eq!(builder.items().len(), 1);
    assert_eq!(builder.items()[0].contrib(), 0);
    assert_eq!(builder.items()[0].extent(), Extent::point(100));
    assert_eq!(builder.length(Profile::STRICT), 0);
    assert_eq!(builder.total_length(), 0);
    assert!(!builder.has_minimal_length(Profile::MAX));
}

#[test]
fn small_gap_is_recorded_but_bridged_everywhere() {
    let index = GlyphIndex::new();
    let grader = FixedGrader(0.8);
    let ctx = context(&index, &grader, params(&GAPS));
    let stump = glyph(&index, Rect::new(49, 100, 3, 20));
    let seed = glyph(&index, Rect::new(49, 123, 3, 25));
    let start = head_down(1, 100.0).with_stump(Arc::clone(&stump));

    let builder = StemSequenceBuilder::new(&ctx, &start, &[Arc::clone(&seed)], &[], Profile::MAX).unwrap();
    assert_well_formed(&builder);
    assert_eq!(builder.items().len(), 3);
    assert_eq!(builder.items()[1].gap_length(), Some(3));
    assert_eq!(builder.items()[0].contrib(), 20);
    assert_eq!(builder.items()[2].contrib(), 25);
    for profile in Profile::all() {
        assert_eq!(builder.length(profile), 48, "{profile}");
    }
    assert!(builder.has_minimal_length(Profile::STRICT));
    assert!(builder.has_concrete_start(Profile::STRICT));
    assert!(!builder.is_truncated());

    let shapes = builder.items_up_to(builder.max_index());
    assert_eq!(shapes.len(), 2);
    assert!(Arc::ptr_eq(&shapes[0], &stump));
    assert!(Arc::ptr_eq(&shapes[1], &seed));
    assert_eq!(builder.items_up_to(0).len(), 1);
}

#[test]
fn gap_beyond_strict_tolerance_splits_lengths() {
    let index = GlyphIndex::new();
    let grader = FixedGrader(0.8);
    let ctx = context(&index, &grader, params(&GAPS));
    let start = head_down(1, 100.0).with_stump(glyph(&index, Rect::new(49, 100, 3, 20)));
    let seeds = [glyph(&index, Rect::new(49, 126, 3, 25))];

    let builder = StemSequenceBuilder::new(&ctx, &start, &seeds, &[], Profile::MAX).unwrap();
    assert_well_formed(&builder);
    assert_monotonic(&builder);
    assert_eq!(builder.length(Profile::STRICT), 20);
    assert_eq!(builder.length(Profile::STANDARD), 51);
    assert_eq!(builder.length(Profile::MAX), 51);
    assert!(builder.has_concrete_start(Profile::STANDARD));
}

#[test]
fn shorter_of_two_misaligned_candidates_is_removed() {
    let index = GlyphIndex::new();
    let grader = FixedGrader(0.8);
    let ctx = context(&index, &grader, params(&GAPS));
    let start = head_down(1, 100.0);
    let long = glyph(&index, Rect::new(49, 125, 3, 30));
    let short = glyph(&index, Rect::new(53, 125, 3, 10));
    assert!(!are_aligned(ctx.skew(), ctx.params(), &long, &short));

    let builder = StemSequenceBuilder::new(
        &ctx,
        &start,
        &[Arc::clone(&short), Arc::clone(&long)],
        &[],
        Profile::MAX,
    )
    .unwrap();
    assert_well_formed(&builder);
    assert_eq!(shape_extents(&builder), vec![Extent::new(125, 155)]);
    assert!(builder
        .items()
        .iter()
        .filter_map(StemItem::glyph)
        .all(|g| !Arc::ptr_eq(g, &short)));
}

#[test]
fn beam_side_without_evidence_gets_artificial_stem() {
    let index = GlyphIndex::new();
    let grader = checker();
    let ctx = context(&index, &grader, params(&GAPS));
    let start = linker(
        1,
        LinkerKind::BeamSide,
        [50.0, 100.0],
        [50.0, 160.0],
        Rect::new(20, 95, 30, 5),
    );
    let builder = StemSequenceBuilder::new(&ctx, &start, &[], &[], Profile::MAX).unwrap();

    let stem = builder.create_stem(&[], Profile::BEAM_SIDE).unwrap();
    assert!(stem.is_artificial());
    assert!((stem.grade() - 0.4).abs() < 1e-6);
    assert_eq!(stem.profile(), Profile::BEAM_SIDE);
    let bounds = stem.glyph().bounds();
    assert_eq!(bounds.width, 3);
    assert_eq!((bounds.y, bounds.bottom()), (100, 160));

    assert!(builder.create_stem(&[], Profile::STANDARD).is_none());
}

#[test]
fn weak_shapes_are_accepted_only_under_the_artificial_policy() {
    let index = GlyphIndex::new();
    let grader = FixedGrader(0.05);
    let ctx = context(&index, &grader, params(&GAPS));
    let stump = glyph(&index, Rect::new(49, 100, 3, 20));
    let start = head_down(1, 100.0).with_stump(Arc::clone(&stump));
    let builder = StemSequenceBuilder::new(&ctx, &start, &[], &[], Profile::MAX).unwrap();

    assert!(builder.create_stem(&[Arc::clone(&stump)], Profile::STANDARD).is_none());
    let stem = builder.create_stem(&[stump], Profile::BEAM_SIDE).unwrap();
    assert!(stem.is_artificial());
    assert!((stem.impacts().grade() - 0.05).abs() < 1e-4);
}

#[test]
fn create_stem_reuses_the_cached_interpretation() {
    let index = GlyphIndex::new();
    let grader = checker();
    let ctx = context(&index, &grader, params(&GAPS));
    let stump = glyph(&index, Rect::new(49, 100, 3, 20));
    let seed = glyph(&index, Rect::new(49, 123, 3, 25));
    let start = head_down(1, 100.0).with_stump(stump);
    let builder = StemSequenceBuilder::new(&ctx, &start, &[seed], &[], Profile::MAX).unwrap();

    let shapes = builder.items_up_to(builder.max_index());
    let first = builder.create_stem(&shapes, Profile::STANDARD).unwrap();
    let second = builder.create_stem(&shapes, Profile::STANDARD).unwrap();
    assert!(!first.is_artificial());
    assert!(first.grade() >= ctx.params().min_grade);
    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(first.glyph(), second.glyph()));
    assert_eq!(first.glyph().bounds(), Rect::new(49, 100, 3, 48));
    assert_eq!(ctx.cache().len(), 1);
}

#[test]
fn sequence_is_cut_at_a_gap_too_large_for_max_profile() {
    let index = GlyphIndex::new();
    let grader = FixedGrader(0.8);
    let ctx = context(&index, &grader, params(&[4, 8, 12, 16, 20]));
    let start = head_down(1, 100.0).with_stump(glyph(&index, Rect::new(49, 100, 3, 20)));
    let seeds = [
        glyph(&index, Rect::new(49, 125, 3, 20)),
        glyph(&index, Rect::new(49, 175, 3, 20)),
    ];

    let builder = StemSequenceBuilder::new(&ctx, &start, &seeds, &[], Profile::POOR).unwrap();
    assert!(builder.is_truncated());
    assert_well_formed(&builder);
    assert_monotonic(&builder);
    assert_eq!(shape_extents(&builder), vec![Extent::new(125, 145)]);
    assert_eq!(builder.length(Profile::STRICT), 20);
    assert_eq!(builder.length(Profile::POOR), 45);
    assert_eq!(builder.total_length(), 45);
}

#[test]
fn upward_sequence_measures_from_the_reference_point() {
    let index = GlyphIndex::new();
    let grader = FixedGrader(0.8);
    let ctx = context(&index, &grader, params(&GAPS));
    let start = linker(
        1,
        LinkerKind::HeadCorner,
        [50.0, 200.0],
        [50.0, 140.0],
        Rect::new(50, 195, 12, 10),
    )
    .with_stump(glyph(&index, Rect::new(49, 180, 3, 20)));
    let seeds = [glyph(&index, Rect::new(49, 150, 3, 25))];

    let builder = StemSequenceBuilder::new(&ctx, &start, &seeds, &[], Profile::MAX).unwrap();
    assert_eq!(builder.y_dir(), -1);
    assert_well_formed(&builder);
    assert_eq!(builder.items()[1].extent(), Extent::new(175, 180));
    assert_eq!(builder.length(Profile::STRICT), 20);
    assert_eq!(builder.length(Profile::STANDARD), 50);
}

#[test]
fn overlapping_seeds_keep_order_and_gap_rules() {
    let index = GlyphIndex::new();
    let grader = FixedGrader(0.8);
    let ctx = context(&index, &grader, params(&GAPS));
    let start = head_down(1, 100.0).with_stump(glyph(&index, Rect::new(49, 100, 3, 20)));
    let seeds = [
        glyph(&index, Rect::new(49, 185, 3, 15)),
        glyph(&index, Rect::new(50, 130, 3, 30)),
        glyph(&index, Rect::new(49, 125, 3, 20)),
        glyph(&index, Rect::new(49, 170, 3, 10)),
    ];

    let builder = StemSequenceBuilder::new(&ctx, &start, &seeds, &[], Profile::MAX).unwrap();
    assert_well_formed(&builder);
    assert_monotonic(&builder);
    let gaps: Vec<i32> = builder.items().iter().filter_map(StemItem::gap_length).collect();
    assert_eq!(gaps, vec![5, 10, 5]);
    assert_eq!(builder.length(Profile::STRICT), 20);
    assert_eq!(builder.length(Profile::STANDARD), 60);
    assert_eq!(builder.length(Profile::POOR), 100);
}

#[test]
fn beam_side_start_stops_at_the_last_head() {
    let index = GlyphIndex::new();
    let grader = FixedGrader(0.8);
    let ctx = context(&index, &grader, params(&GAPS));
    let start = linker(
        1,
        LinkerKind::BeamSide,
        [50.0, 100.0],
        [50.0, 200.0],
        Rect::new(20, 95, 30, 5),
    );
    let head = linker(
        2,
        LinkerKind::HeadCorner,
        [50.0, 160.0],
        [50.0, 100.0],
        Rect::new(38, 155, 12, 10),
    );
    let seeds = [
        glyph(&index, Rect::new(49, 105, 3, 40)),
        glyph(&index, Rect::new(49, 170, 3, 20)),
    ];

    let builder = StemSequenceBuilder::new(&ctx, &start, &seeds, &[&head], Profile::MAX).unwrap();
    assert_well_formed(&builder);
    assert_eq!(builder.report().last_head_y, Some(160.0));
    assert_eq!(shape_extents(&builder), vec![Extent::new(105, 145)]);
    assert_eq!(builder.items().len(), 5);
    assert_eq!(builder.index_of_linker(LinkerId(2)), Some(4));
    assert_eq!(builder.index_of_linker(LinkerId(9)), None);

    assert_eq!(builder.length(Profile::STRICT), 0);
    assert_eq!(builder.length(Profile::STANDARD), 45);
    assert_eq!(builder.length(Profile::POOR), 45);
    assert_eq!(builder.length(Profile::BEAM_SIDE), 65);
    assert!(!builder.has_concrete_start(Profile::MAX));

    assert!(builder.first_anchor_after(0, Profile::STANDARD).is_none());
    let anchor = builder.first_anchor_after(0, Profile::BEAM_SIDE).unwrap();
    assert_eq!(anchor.linker().map(StemLinker::id), Some(LinkerId(2)));
    assert_eq!(builder.last_gap_before(4).and_then(StemItem::gap_length), Some(15));
    assert_eq!(builder.last_gap_before(2).and_then(StemItem::gap_length), Some(5));
    assert!(builder.last_gap_before(1).is_none());

    assert_eq!(builder.linker_of_source(SourceId(2)).map(StemLinker::id), Some(LinkerId(2)));
    assert!(builder.linker_of_source(SourceId(1)).is_some());
    assert_eq!(builder.head_linkers_up_to(None).len(), 1);
    assert!(builder.head_linkers_up_to(Some(3)).is_empty());
    let targets = builder.target_linkers();
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].id(), LinkerId(2));
}

#[test]
fn head_start_ignores_last_head_cutoff() {
    let index = GlyphIndex::new();
    let grader = FixedGrader(0.8);
    let ctx = context(&index, &grader, params(&GAPS));
    let start = head_down(1, 100.0);
    let other = head_down(2, 130.0);
    let seeds = [glyph(&index, Rect::new(49, 140, 3, 20))];

    let builder = StemSequenceBuilder::new(&ctx, &start, &seeds, &[&other], Profile::MAX).unwrap();
    assert_eq!(builder.report().last_head_y, None);
    assert_eq!(shape_extents(&builder), vec![Extent::new(140, 160)]);
}

#[test]
fn misaligned_stump_drops_its_linker() {
    let index = GlyphIndex::new();
    let grader = FixedGrader(0.8);
    let ctx = context(&index, &grader, params(&GAPS));
    let start = head_down(1, 100.0).with_stump(glyph(&index, Rect::new(49, 100, 3, 20)));
    let stray = linker(
        2,
        LinkerKind::HeadCorner,
        [57.0, 150.0],
        [57.0, 110.0],
        Rect::new(57, 145, 12, 10),
    )
    .with_stump(glyph(&index, Rect::new(55, 140, 3, 10)));
    let shared_seed = glyph(&index, Rect::new(49, 160, 3, 20));
    let aligned = linker(
        3,
        LinkerKind::HeadCorner,
        [50.0, 180.0],
        [50.0, 140.0],
        Rect::new(38, 175, 12, 10),
    )
    .with_stump(Arc::clone(&shared_seed));

    let builder = StemSequenceBuilder::new(
        &ctx,
        &start,
        &[Arc::clone(&shared_seed)],
        &[&stray, &aligned],
        Profile::MAX,
    )
    .unwrap();
    assert_eq!(builder.dropped_linkers(), &[LinkerId(2)]);
    assert_eq!(builder.index_of_linker(LinkerId(2)), None);
    assert!(builder.index_of_linker(LinkerId(3)).is_some());
    // The seed is the stump of a reached linker, not a shape of its own.
    assert!(shape_extents(&builder).is_empty());
    assert_well_formed(&builder);
}

#[test]
fn anchors_follow_their_leading_edge() {
    let index = GlyphIndex::new();
    let grader = FixedGrader(0.8);
    let ctx = context(&index, &grader, params(&GAPS));
    let start = head_down(1, 100.0);
    let stumped = linker(
        2,
        LinkerKind::HeadCorner,
        [50.0, 150.0],
        [50.0, 110.0],
        Rect::new(38, 145, 12, 10),
    )
    .with_stump(glyph(&index, Rect::new(49, 120, 3, 35)));
    let bare = linker(
        3,
        LinkerKind::HeadCorner,
        [50.0, 130.0],
        [50.0, 90.0],
        Rect::new(38, 125, 12, 10),
    );

    let builder = StemSequenceBuilder::new(&ctx, &start, &[], &[&bare, &stumped], Profile::MAX).unwrap();
    assert_well_formed(&builder);
    let first = builder.index_of_linker(LinkerId(2)).unwrap();
    let second = builder.index_of_linker(LinkerId(3)).unwrap();
    assert!(first < second, "stump edge at 120 comes before reference 130");
    assert_eq!(builder.total_length(), 55);
}

#[test]
fn invalid_inputs_are_rejected() {
    let index = GlyphIndex::new();
    let grader = FixedGrader(0.8);
    let ctx = context(&index, &grader, params(&GAPS));

    let flat = linker(1, LinkerKind::HeadCorner, [50.0, 100.0], [60.0, 100.0], Rect::new(38, 95, 12, 10));
    assert!(matches!(
        StemSequenceBuilder::new(&ctx, &flat, &[], &[], Profile::MAX),
        Err(StemBuildError::DegenerateAxis { linker: LinkerId(1) })
    ));

    let blind = StemLinker::new(
        LinkerId(2),
        LinkerKind::HeadCorner,
        AxisLine::new([50.0, 100.0], [50.0, 140.0]),
        LookupArea::default(),
        LinkerSource::new(SourceId(2), Rect::new(38, 95, 12, 10)),
    );
    assert!(matches!(
        StemSequenceBuilder::new(&ctx, &blind, &[], &[], Profile::MAX),
        Err(StemBuildError::EmptyLookupArea { linker: LinkerId(2) })
    ));

    let start = head_down(3, 100.0);
    let err = StemSequenceBuilder::new(&ctx, &start, &[], &[], Profile(7))
        .err()
        .unwrap();
    assert_eq!(err, StemBuildError::InvalidProfile { profile: Profile(7) });
    assert!(err.to_string().contains("p7"));
}

#[test]
fn alignment_is_symmetric() {
    let params = params(&GAPS);
    let skew = Skew::new(0.05);
    let rects = [
        Rect::new(49, 100, 3, 20),
        Rect::new(52, 130, 3, 20),
        Rect::new(56, 110, 3, 10),
        Rect::new(45, 300, 3, 40),
        Rect::new(60, 160, 4, 30),
    ];
    let glyphs: Vec<Glyph> = rects.iter().map(|r| Glyph::from_rect(*r)).collect();
    for a in &glyphs {
        for b in &glyphs {
            assert_eq!(are_aligned(&skew, &params, a, b), are_aligned(&skew, &params, b, a));
        }
    }
    // Far apart vertically, abscissas do not matter.
    assert!(are_aligned(&skew, &params, &glyphs[0], &glyphs[3]));
}

#[test]
fn short_stump_gives_way_to_a_longer_misaligned_shape() {
    let index = GlyphIndex::new();
    let params = params(&GAPS);
    let stump = glyph(&index, Rect::new(49, 100, 3, 10));
    let long_stray = glyph(&index, Rect::new(56, 112, 3, 40));
    let aligned = glyph(&index, Rect::new(49, 115, 3, 20));
    let mut candidates = vec![Arc::clone(&long_stray), Arc::clone(&aligned)];

    // The stump leaves the comparison, then the shorter of the next pair goes.
    let removed = filter_unaligned(&mut candidates, Some(&stump), 1, &Skew::default(), &params);
    assert_eq!(removed.len(), 1);
    assert!(Arc::ptr_eq(&removed[0], &aligned));
    assert_eq!(candidates.len(), 1);
    assert!(Arc::ptr_eq(&candidates[0], &long_stray));
}

#[test]
fn longer_seed_survives_a_short_misaligned_stump() {
    let index = GlyphIndex::new();
    let grader = FixedGrader(0.8);
    let ctx = context(&index, &grader, params(&GAPS));
    let stump = glyph(&index, Rect::new(49, 100, 3, 10));
    let start = head_down(1, 100.0).with_stump(Arc::clone(&stump));
    let seed = glyph(&index, Rect::new(55, 112, 3, 30));

    let builder = StemSequenceBuilder::new(&ctx, &start, &[Arc::clone(&seed)], &[], Profile::MAX).unwrap();
    assert!(matches!(builder.items()[0], StemItem::Start { .. }));
    assert_eq!(shape_extents(&builder), vec![Extent::new(112, 142)]);
    assert_eq!(builder.total_length(), 42);
    assert_eq!(builder.length(Profile::STRICT), 42);
    assert_well_formed(&builder);
}

#[test]
fn chunks_are_built_from_nearby_sections() {
    let index = GlyphIndex::new();
    let grader = FixedGrader(0.8);
    let sections = vertical(&[
        Rect::new(49, 125, 3, 30),
        // Too far from the line.
        Rect::new(62, 125, 3, 30),
    ]);
    let ctx = context(&index, &grader, params(&GAPS)).with_sections(&sections, &[]);
    let start = head_down(1, 100.0).with_stump(glyph(&index, Rect::new(49, 100, 3, 20)));

    let builder = StemSequenceBuilder::new(&ctx, &start, &[], &[], Profile::MAX).unwrap();
    assert_well_formed(&builder);
    let chunks: Vec<_> = builder
        .items()
        .iter()
        .filter(|item| matches!(item, StemItem::Shape { origin: ShapeOrigin::Chunk, .. }))
        .collect();
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].extent(), Extent::new(125, 155));
    assert!(chunks[0].glyph().and_then(|g| g.id()).is_some());
    assert_eq!(builder.length(Profile::STRICT), 20);
    assert_eq!(builder.length(Profile::STANDARD), 55);
}

#[test]
fn chunks_mostly_made_of_head_ink_are_skipped() {
    let index = GlyphIndex::new();
    let grader = FixedGrader(0.8);
    let sections = vertical(&[Rect::new(47, 100, 3, 6), Rect::new(49, 110, 3, 30)]);
    let ctx = context(&index, &grader, params(&GAPS)).with_sections(&sections, &[]);
    let head = glyph(&index, Rect::new(38, 95, 12, 10));
    let start = StemLinker::along_axis(
        LinkerId(1),
        LinkerKind::HeadCorner,
        AxisLine::new([50.0, 100.0], [50.0, 160.0]),
        6.0,
        LinkerSource::new(SourceId(1), head.bounds()).with_glyph(head),
    );

    let builder = StemSequenceBuilder::new(&ctx, &start, &[], &[], Profile::MAX).unwrap();
    assert_eq!(shape_extents(&builder), vec![Extent::new(110, 140)]);
}

#[test]
fn wide_chunk_is_trimmed_from_the_outside() {
    let index = GlyphIndex::new();
    let grader = FixedGrader(0.8);
    let ctx = context(&index, &grader, params(&GAPS));
    let start = head_down(1, 100.0);
    let builder = StemSequenceBuilder::new(&ctx, &start, &[], &[], Profile::MAX).unwrap();

    let members = vec![
        Section::from_rect(SectionId(0), Orientation::Vertical, Rect::new(49, 100, 3, 30)),
        Section::from_rect(SectionId(2), Orientation::Vertical, Rect::new(52, 100, 2, 30)),
        Section::from_rect(SectionId(4), Orientation::Vertical, Rect::new(54, 100, 2, 30)),
    ];
    let wide = Fiber::new(Orientation::Vertical, members);
    assert_eq!(wide.mean_thickness(), 7.0);
    let trimmed = builder.trim_wide_chunk(wide).unwrap();
    assert_eq!(trimmed.members().len(), 1);
    assert_eq!(trimmed.members()[0].id, SectionId(0));

    let blob = Fiber::new(
        Orientation::Vertical,
        vec![Section::from_rect(SectionId(6), Orientation::Vertical, Rect::new(47, 100, 6, 30))],
    );
    assert!(builder.trim_wide_chunk(blob).is_none());
}

#[test]
fn report_lists_items_and_lengths() {
    let index = GlyphIndex::new();
    let grader = FixedGrader(0.8);
    let ctx = context(&index, &grader, params(&GAPS));
    let start = head_down(1, 100.0).with_stump(glyph(&index, Rect::new(49, 100, 3, 20)));
    let seeds = [glyph(&index, Rect::new(49, 126, 3, 25))];
    let builder = StemSequenceBuilder::new(&ctx, &start, &seeds, &[], Profile::MAX).unwrap();

    let stem = builder.create_stem(&builder.items_up_to(builder.max_index()), Profile::STANDARD);
    let report = builder.report().with_stem(stem.as_deref());
    assert_eq!(report.items.len(), 3);
    assert_eq!(report.lengths.len(), Profile::COUNT);
    assert_eq!(report.lengths[0].length, 20);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["items"][1]["kind"], "gap");
    assert_eq!(json["items"][1]["length"], 6);
    assert_eq!(json["yDir"], 1);
    assert!(json["stem"]["grade"].as_f64().is_some());
}
