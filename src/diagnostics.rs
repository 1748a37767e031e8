//! Serializable snapshots of seed collection and stem construction.
//!
//! These structures only carry ids, extents and numbers so they can be
//! dumped as JSON by tools without holding on to page data.

use crate::geometry::Rect;
use crate::glyph::GlyphId;
use crate::grade::GradeImpacts;
use crate::linker::{LinkerId, LinkerKind, SourceId};
use crate::profiles::Profile;
use crate::seeds::SeedStats;
use crate::stem::{Extent, ShapeOrigin, StemInter};
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemReport {
    Start {
        linker: LinkerId,
        contrib: i32,
        extent: Extent,
    },
    Anchor {
        linker: LinkerId,
        #[serde(rename = "linkerKind")]
        kind: LinkerKind,
        source: SourceId,
        contrib: i32,
        extent: Extent,
    },
    Shape {
        glyph: Option<GlyphId>,
        origin: ShapeOrigin,
        contrib: i32,
        extent: Extent,
    },
    Gap {
        length: i32,
        extent: Extent,
    },
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct ProfileLength {
    pub profile: Profile,
    pub length: i32,
}

/// Created stem, as stored in a report.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StemReport {
    pub glyph: Option<GlyphId>,
    pub bounds: Rect,
    pub weight: i32,
    pub grade: f32,
    pub profile: Profile,
    pub artificial: bool,
    pub impacts: GradeImpacts,
}

impl StemReport {
    pub fn from_inter(inter: &StemInter) -> Self {
        let glyph = inter.glyph();
        Self {
            glyph: glyph.id(),
            bounds: glyph.bounds(),
            weight: glyph.weight(),
            grade: inter.grade(),
            profile: inter.profile(),
            artificial: inter.is_artificial(),
            impacts: inter.impacts().clone(),
        }
    }
}

/// One stem sequence construction.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StemSequenceReport {
    pub linker: LinkerId,
    pub kind: LinkerKind,
    pub y_dir: i32,
    pub max_profile: Profile,
    pub items: Vec<ItemReport>,
    pub lengths: Vec<ProfileLength>,
    pub truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_head_y: Option<f32>,
    pub dropped_linkers: Vec<LinkerId>,
    /// Stem committed by the caller, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stem: Option<StemReport>,
}

impl StemSequenceReport {
    pub fn with_stem(mut self, inter: Option<&StemInter>) -> Self {
        self.stem = inter.map(StemReport::from_inter);
        self
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub glyph: Option<GlyphId>,
    pub bounds: Rect,
    pub weight: i32,
    pub grade: f32,
}

/// Seed collection of one region.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSeedReport {
    pub region: usize,
    pub stats: SeedStats,
    pub seeds: Vec<SeedReport>,
}
