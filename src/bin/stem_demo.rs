use serde::Serialize;
use stem_detector::config::demo::{self, AnchorConfig};
use stem_detector::config::StemParams;
use stem_detector::diagnostics::{RegionSeedReport, SeedReport, StemSequenceReport};
use stem_detector::fiber::StickFactory;
use stem_detector::geometry::{AxisLine, Rect};
use stem_detector::glyph::{Glyph, GlyphIndex};
use stem_detector::grade::StemChecker;
use stem_detector::image::io::{load_page_image, save_stem_overlay, write_json_file};
use stem_detector::image::ImageU8;
use stem_detector::linker::{LinkerId, LinkerSource, SourceId, StemLinker};
use stem_detector::profiles::Profile;
use stem_detector::scale::{Scale, Skew};
use stem_detector::sections::{extract_sections, Orientation};
use stem_detector::seeds::{collect_all_seeds, SystemRegion};
use stem_detector::stem::{StemContext, StemInter, StemSequenceBuilder};
use std::env;
use std::path::Path;
use std::sync::Arc;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = demo::load_config(Path::new(&config_path))?;

    let page = load_page_image(&config.input)?;
    let image = page.as_view();
    let vertical = extract_sections(&image, Orientation::Vertical, config.threshold).sections;
    let horizontal = extract_sections(&image, Orientation::Horizontal, config.threshold).sections;

    let scale = config.scale;
    let skew = Skew::new(config.skew_slope);
    let params = config.stem.resolve(&scale);
    let grader = StemChecker::new(scale, skew, config.stem.checker.clone(), params.gap_table.clone());
    let index = GlyphIndex::new();
    let factory = StickFactory;

    let mut regions: Vec<SystemRegion> = config
        .regions
        .iter()
        .enumerate()
        .map(|(i, r)| SystemRegion::new(i, r.left, r.right, r.staves.clone()).with_sections(&vertical, &horizontal))
        .collect();
    let seed_ctx = StemContext::new(scale, skew, params.clone(), &index, &factory, &grader);
    let stats = collect_all_seeds(&mut regions, &seed_ctx);

    let region_reports: Vec<RegionSeedReport> = regions
        .iter()
        .zip(stats)
        .map(|(region, stats)| RegionSeedReport {
            region: region.id(),
            stats,
            seeds: region
                .seeds()
                .iter()
                .map(|seed| SeedReport {
                    glyph: seed.glyph.id(),
                    bounds: seed.glyph.bounds(),
                    weight: seed.glyph.weight(),
                    grade: seed.grade,
                })
                .collect(),
        })
        .collect();

    let mut next_id = 0u32;
    let mut sequences = Vec::new();
    let mut stems: Vec<Arc<StemInter>> = Vec::new();
    for (region, region_config) in regions.iter().zip(&config.regions) {
        let linkers: Vec<StemLinker> = region_config
            .anchors
            .iter()
            .map(|anchor| {
                next_id += 1;
                build_linker(next_id, anchor, &image, config.threshold, &index)
            })
            .collect();
        let ctx = StemContext::new(scale, skew, params.clone(), &index, &factory, &grader).with_region(region);
        let seeds = region.seed_glyphs();

        for start in &linkers {
            let others: Vec<&StemLinker> = linkers
                .iter()
                .filter(|l| l.id() != start.id() && start.lookup_area().contains(l.reference_point()))
                .collect();
            let builder = StemSequenceBuilder::new(&ctx, start, &seeds, &others, Profile::MAX)
                .map_err(|e| format!("Region {}: {e}", region.id()))?;
            let stem = commit_stem(&builder, &params);
            sequences.push(builder.report().with_stem(stem.as_deref()));
            stems.extend(stem);
        }
    }

    let report = StemDemoReport {
        scale,
        params,
        vertical_sections: vertical.len(),
        horizontal_sections: horizontal.len(),
        regions: region_reports,
        sequences,
    };
    write_json_file(&config.output.report_json, &report)?;
    if let Some(path) = &config.output.overlay_png {
        let glyphs: Vec<&Glyph> = stems.iter().map(|s| s.glyph().as_ref()).collect();
        save_stem_overlay(&page, &glyphs, path)?;
        println!("Saved stem overlay to {}", path.display());
    }

    println!(
        "Collected {} seeds in {} regions",
        report.regions.iter().map(|r| r.seeds.len()).sum::<usize>(),
        report.regions.len()
    );
    println!(
        "Built {} stem sequences ({} stems) into {}",
        report.sequences.len(),
        stems.len(),
        config.output.report_json.display()
    );

    Ok(())
}

fn usage() -> String {
    "Usage: stem_demo <config.json>".to_string()
}

/// Ink of `rect` as a glyph, `None` when the box holds no foreground.
fn ink_in(image: &ImageU8<'_>, rect: &Rect, threshold: u8) -> Option<Glyph> {
    let pixels = image.foreground_in(rect, threshold);
    (!pixels.is_empty()).then(|| Glyph::from_pixels(pixels))
}

fn build_linker(id: u32, anchor: &AnchorConfig, image: &ImageU8<'_>, threshold: u8, index: &GlyphIndex) -> StemLinker {
    let mut source = LinkerSource::new(SourceId(id), anchor.source);
    if let Some(glyph) = ink_in(image, &anchor.source, threshold) {
        source = source.with_glyph(index.register(glyph));
    }
    let linker = StemLinker::along_axis(
        LinkerId(id),
        anchor.kind,
        AxisLine::new(anchor.reference, anchor.target),
        anchor.half_width,
        source,
    );
    match anchor.stump.and_then(|rect| ink_in(image, &rect, threshold)) {
        Some(stump) => linker.with_stump(index.register(stump)),
        None => linker,
    }
}

/// Stem over the items reached at the strictest profile giving a minimal
/// length, or the artificial stem when no profile does.
fn commit_stem(
    builder: &StemSequenceBuilder<'_>,
    params: &StemParams,
) -> Option<Arc<StemInter>> {
    let Some(profile) = Profile::all().find(|&p| builder.has_minimal_length(p)) else {
        let profile = params.artificial_stem.profile;
        return builder.create_stem(&builder.items_up_to(builder.max_index()), profile);
    };
    let reach = builder.length(profile);
    let last = (0..=builder.max_index())
        .rev()
        .find(|&i| builder.length_at(i) <= reach)
        .unwrap_or(0);
    builder.create_stem(&builder.items_up_to(last), profile)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StemDemoReport {
    scale: Scale,
    params: StemParams,
    vertical_sections: usize,
    horizontal_sections: usize,
    regions: Vec<RegionSeedReport>,
    sequences: Vec<StemSequenceReport>,
}
