use crate::geometry::Rect;
use serde::{Deserialize, Serialize};

/// Direction along which runs are read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// `(start, length)` of `rect` along this orientation.
    #[inline]
    pub fn along(self, rect: &Rect) -> (i32, i32) {
        match self {
            Orientation::Vertical => (rect.y, rect.height),
            Orientation::Horizontal => (rect.x, rect.width),
        }
    }

    /// `(start, length)` of `rect` across this orientation.
    #[inline]
    pub fn across(self, rect: &Rect) -> (i32, i32) {
        match self {
            Orientation::Vertical => (rect.x, rect.width),
            Orientation::Horizontal => (rect.y, rect.height),
        }
    }
}

/// Identifier of a section, unique per page across both orientations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(pub u32);

impl SectionId {
    pub fn new(orientation: Orientation, index: u32) -> Self {
        let bit = match orientation {
            Orientation::Vertical => 0,
            Orientation::Horizontal => 1,
        };
        SectionId((index << 1) | bit)
    }
}

/// Maximal sequence of foreground pixels along one line of the raster.
///
/// `pos` is the column for vertical runs and the row for horizontal runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Run {
    pub pos: i32,
    pub start: i32,
    pub len: i32,
}

impl Run {
    #[inline]
    pub fn end(&self) -> i32 {
        self.start + self.len
    }

    #[inline]
    pub fn overlaps(&self, other: &Run) -> bool {
        self.start < other.end() && other.start < self.end()
    }
}

/// Connected set of runs of one orientation, on consecutive lines.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub orientation: Orientation,
    runs: Vec<Run>,
    bounds: Rect,
    weight: i32,
    centroid: [f32; 2],
}

impl PartialEq for Section {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Section {}

impl Section {
    pub fn new(id: SectionId, orientation: Orientation, runs: Vec<Run>) -> Self {
        let mut weight = 0i32;
        let mut sx = 0f64;
        let mut sy = 0f64;
        let mut bounds: Option<Rect> = None;
        for run in &runs {
            let rect = match orientation {
                Orientation::Vertical => Rect::new(run.pos, run.start, 1, run.len),
                Orientation::Horizontal => Rect::new(run.start, run.pos, run.len, 1),
            };
            bounds = Some(bounds.map_or(rect, |b| b.union(&rect)));
            let c = rect.center();
            weight += run.len;
            sx += c[0] as f64 * run.len as f64;
            sy += c[1] as f64 * run.len as f64;
        }
        let centroid = if weight > 0 {
            [(sx / weight as f64) as f32, (sy / weight as f64) as f32]
        } else {
            [0.0, 0.0]
        };
        Self {
            id,
            orientation,
            runs,
            bounds: bounds.unwrap_or_default(),
            weight,
            centroid,
        }
    }

    /// Solid rectangular section, handy for synthetic layouts.
    pub fn from_rect(id: SectionId, orientation: Orientation, rect: Rect) -> Self {
        let (across_start, across_len) = orientation.across(&rect);
        let (along_start, along_len) = orientation.along(&rect);
        let runs = (across_start..across_start + across_len)
            .map(|pos| Run {
                pos,
                start: along_start,
                len: along_len,
            })
            .collect();
        Self::new(id, orientation, runs)
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Number of foreground pixels.
    pub fn weight(&self) -> i32 {
        self.weight
    }

    /// Mass center of the pixels (pixel centers at `+0.5`).
    pub fn centroid(&self) -> [f32; 2] {
        self.centroid
    }

    /// Extent along the section orientation.
    pub fn length(&self) -> i32 {
        self.orientation.along(&self.bounds).1
    }

    /// Extent across the section orientation.
    pub fn thickness(&self) -> i32 {
        self.orientation.across(&self.bounds).1
    }

    /// Foreground pixels as `(x, y)` pairs.
    pub fn pixels(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let orientation = self.orientation;
        self.runs.iter().flat_map(move |run| {
            (run.start..run.end()).map(move |v| match orientation {
                Orientation::Vertical => (run.pos, v),
                Orientation::Horizontal => (v, run.pos),
            })
        })
    }
}
