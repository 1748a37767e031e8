//! Anchors ("linkers") from which stems are searched.
//!
//! A linker sits on a head corner or on a beam side. It carries the directed
//! theoretical stem line (reference point first), the lookup area bounding
//! relevant evidence and, when present, the stump already touching it.
//! Linkers are immutable once built; builders only read them.

use crate::geometry::{AxisLine, LookupArea, Rect};
use crate::glyph::Glyph;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkerId(pub u32);

/// Identifier of the head or beam a linker belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkerKind {
    /// Corner of a note head, reached when linking from a beam.
    HeadCorner,
    /// Side of a beam, reached when linking from a head.
    BeamSide,
}

/// Head or beam owning a linker.
#[derive(Clone, Debug)]
pub struct LinkerSource {
    pub id: SourceId,
    pub bounds: Rect,
    /// Pixels of the head or beam, when known.
    pub glyph: Option<Arc<Glyph>>,
}

impl LinkerSource {
    pub fn new(id: SourceId, bounds: Rect) -> Self {
        Self {
            id,
            bounds,
            glyph: None,
        }
    }

    pub fn with_glyph(mut self, glyph: Arc<Glyph>) -> Self {
        self.glyph = Some(glyph);
        self
    }
}

#[derive(Clone, Debug)]
pub struct StemLinker {
    id: LinkerId,
    kind: LinkerKind,
    theo_line: AxisLine,
    lookup_area: LookupArea,
    stump: Option<Arc<Glyph>>,
    source: LinkerSource,
}

impl StemLinker {
    pub fn new(
        id: LinkerId,
        kind: LinkerKind,
        theo_line: AxisLine,
        lookup_area: LookupArea,
        source: LinkerSource,
    ) -> Self {
        Self {
            id,
            kind,
            theo_line,
            lookup_area,
            stump: None,
            source,
        }
    }

    /// Linker whose lookup area is a band of `half_width` pixels on each
    /// side of the theoretical line.
    pub fn along_axis(
        id: LinkerId,
        kind: LinkerKind,
        theo_line: AxisLine,
        half_width: f32,
        source: LinkerSource,
    ) -> Self {
        let area = LookupArea::around_axis(&theo_line, half_width, half_width);
        Self::new(id, kind, theo_line, area, source)
    }

    pub fn with_stump(mut self, stump: Arc<Glyph>) -> Self {
        self.stump = Some(stump);
        self
    }

    pub fn id(&self) -> LinkerId {
        self.id
    }

    pub fn kind(&self) -> LinkerKind {
        self.kind
    }

    pub fn is_head_corner(&self) -> bool {
        self.kind == LinkerKind::HeadCorner
    }

    pub fn theo_line(&self) -> &AxisLine {
        &self.theo_line
    }

    pub fn lookup_area(&self) -> &LookupArea {
        &self.lookup_area
    }

    pub fn stump(&self) -> Option<&Arc<Glyph>> {
        self.stump.as_ref()
    }

    pub fn source(&self) -> &LinkerSource {
        &self.source
    }

    /// Point where the stem meets the head or beam.
    pub fn reference_point(&self) -> [f32; 2] {
        self.theo_line.p1
    }
}
