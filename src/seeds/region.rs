use crate::glyph::Glyph;
use crate::sections::Section;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Staff area within a region, with the zones where seeds are not wanted.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StaffZone {
    pub top: i32,
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
    /// Abscissa where the staff header (clef, key, time) ends.
    #[serde(default)]
    pub header_stop: i32,
    /// Tablature staves carry no stems.
    #[serde(default)]
    pub tablature: bool,
}

impl StaffZone {
    /// Vertical distance from `y` to the staff, 0 inside it.
    pub fn distance_y(&self, y: f32) -> f32 {
        if y < self.top as f32 {
            self.top as f32 - y
        } else if y > self.bottom as f32 {
            y - self.bottom as f32
        } else {
            0.0
        }
    }
}

/// Fiber accepted as stem evidence for a whole region.
#[derive(Clone, Debug)]
pub struct Seed {
    pub glyph: Arc<Glyph>,
    pub grade: f32,
}

/// Horizontal slice of the page holding one system of staves.
///
/// The seed pool is append-only: seeds are added by the collector and then
/// only read by stem builders.
#[derive(Clone, Debug)]
pub struct SystemRegion {
    id: usize,
    left: i32,
    right: i32,
    staves: Vec<StaffZone>,
    vertical_sections: Vec<Section>,
    horizontal_sections: Vec<Section>,
    seeds: Vec<Seed>,
}

impl SystemRegion {
    pub fn new(id: usize, left: i32, right: i32, staves: Vec<StaffZone>) -> Self {
        Self {
            id,
            left,
            right,
            staves,
            vertical_sections: Vec::new(),
            horizontal_sections: Vec::new(),
            seeds: Vec::new(),
        }
    }

    /// Keeps the page sections horizontally overlapping the region.
    pub fn with_sections(mut self, vertical: &[Section], horizontal: &[Section]) -> Self {
        let (left, right) = (self.left, self.right);
        let inside = |s: &&Section| {
            let b = s.bounds();
            b.right() > left && b.x < right
        };
        self.vertical_sections = vertical.iter().filter(inside).cloned().collect();
        self.horizontal_sections = horizontal.iter().filter(inside).cloned().collect();
        self
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn left(&self) -> i32 {
        self.left
    }

    pub fn right(&self) -> i32 {
        self.right
    }

    pub fn staves(&self) -> &[StaffZone] {
        &self.staves
    }

    pub fn vertical_sections(&self) -> &[Section] {
        &self.vertical_sections
    }

    pub fn horizontal_sections(&self) -> &[Section] {
        &self.horizontal_sections
    }

    /// Whether abscissa `x` lies strictly between the region bounds.
    pub fn contains_x(&self, x: f32) -> bool {
        x > self.left as f32 && x < self.right as f32
    }

    /// Staff vertically closest to `point`, the first one on ties.
    pub fn closest_staff(&self, point: [f32; 2]) -> Option<&StaffZone> {
        self.staves
            .iter()
            .min_by(|a, b| a.distance_y(point[1]).total_cmp(&b.distance_y(point[1])))
    }

    pub fn seeds(&self) -> &[Seed] {
        &self.seeds
    }

    /// Seed shapes, as handed to stem builders.
    pub fn seed_glyphs(&self) -> Vec<Arc<Glyph>> {
        self.seeds.iter().map(|s| Arc::clone(&s.glyph)).collect()
    }

    pub(crate) fn add_seed(&mut self, seed: Seed) {
        self.seeds.push(seed);
    }
}
