use crate::geometry::Rect;
use crate::glyph::Glyph;
use crate::linker::StemLinker;
use serde::Serialize;
use std::sync::Arc;

/// Vertical interval `top..bottom` (bottom exclusive) covered by an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Extent {
    pub top: i32,
    pub bottom: i32,
}

impl Extent {
    pub fn new(top: i32, bottom: i32) -> Self {
        Self {
            top: top.min(bottom),
            bottom: top.max(bottom),
        }
    }

    pub fn of_rect(rect: &Rect) -> Self {
        Self::new(rect.y, rect.bottom())
    }

    /// Empty extent located at ordinate `y`.
    pub fn point(y: i32) -> Self {
        Self { top: y, bottom: y }
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// First ordinate met when travelling in `y_dir`.
    #[inline]
    pub fn leading(&self, y_dir: i32) -> i32 {
        if y_dir > 0 {
            self.top
        } else {
            self.bottom
        }
    }

    /// Last ordinate met when travelling in `y_dir`.
    #[inline]
    pub fn trailing(&self, y_dir: i32) -> i32 {
        if y_dir > 0 {
            self.bottom
        } else {
            self.top
        }
    }

    pub fn union(&self, other: &Extent) -> Extent {
        Extent {
            top: self.top.min(other.top),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

/// Where a shape item comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeOrigin {
    /// Seed collected for the whole region.
    Seed,
    /// Chunk assembled from sections around this anchor only.
    Chunk,
}

/// One element of the ordered sequence along an anchor's axis.
#[derive(Clone, Debug)]
pub enum StemItem<'a> {
    /// The anchor the sequence starts from, always first.
    Start {
        linker: &'a StemLinker,
        contrib: i32,
        extent: Extent,
    },
    /// Another anchor reached along the axis.
    Anchor {
        linker: &'a StemLinker,
        contrib: i32,
        extent: Extent,
    },
    Shape {
        glyph: Arc<Glyph>,
        origin: ShapeOrigin,
        contrib: i32,
        extent: Extent,
    },
    /// Uncovered distance between two consecutive items.
    Gap { extent: Extent },
}

impl<'a> StemItem<'a> {
    pub fn extent(&self) -> Extent {
        match self {
            StemItem::Start { extent, .. }
            | StemItem::Anchor { extent, .. }
            | StemItem::Shape { extent, .. }
            | StemItem::Gap { extent } => *extent,
        }
    }

    /// Positive overlap with the theoretical line range; a gap reports its length.
    pub fn contrib(&self) -> i32 {
        match self {
            StemItem::Start { contrib, .. }
            | StemItem::Anchor { contrib, .. }
            | StemItem::Shape { contrib, .. } => *contrib,
            StemItem::Gap { extent } => extent.height(),
        }
    }

    /// Shape carried by the item: the stump for anchors, none for gaps.
    pub fn glyph(&self) -> Option<&Arc<Glyph>> {
        match self {
            StemItem::Start { linker, .. } | StemItem::Anchor { linker, .. } => linker.stump(),
            StemItem::Shape { glyph, .. } => Some(glyph),
            StemItem::Gap { .. } => None,
        }
    }

    pub fn linker(&self) -> Option<&'a StemLinker> {
        match self {
            StemItem::Start { linker, .. } | StemItem::Anchor { linker, .. } => Some(*linker),
            StemItem::Shape { .. } | StemItem::Gap { .. } => None,
        }
    }

    pub fn gap_length(&self) -> Option<i32> {
        match self {
            StemItem::Gap { extent } => Some(extent.height()),
            _ => None,
        }
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, StemItem::Gap { .. })
    }

    pub fn is_anchor(&self) -> bool {
        matches!(self, StemItem::Anchor { .. })
    }
}
