use crate::geometry::Rect;
use crate::glyph::Glyph;
use crate::sections::{Orientation, Section, SectionId};

/// Elongated shape assembled from sections, with removable members.
#[derive(Clone, Debug)]
pub struct Fiber {
    orientation: Orientation,
    members: Vec<Section>,
}

impl Fiber {
    pub fn new(orientation: Orientation, members: Vec<Section>) -> Self {
        Self {
            orientation,
            members,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn members(&self) -> &[Section] {
        &self.members
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn bounds(&self) -> Rect {
        self.members
            .iter()
            .map(Section::bounds)
            .reduce(|a, b| a.union(&b))
            .unwrap_or_default()
    }

    pub fn weight(&self) -> i32 {
        self.members.iter().map(Section::weight).sum()
    }

    /// Extent along the fiber orientation.
    pub fn length(&self) -> i32 {
        self.orientation.along(&self.bounds()).1
    }

    /// Pixel weight divided by the length along the fiber orientation.
    pub fn mean_thickness(&self) -> f32 {
        let length = self.length();
        if length <= 0 {
            return 0.0;
        }
        self.weight() as f32 / length as f32
    }

    /// Mean thickness the fiber would have once `extra` is absorbed.
    pub(crate) fn thickness_with(&self, extra: &[&Section]) -> f32 {
        let mut bounds = (!self.members.is_empty()).then(|| self.bounds());
        let mut weight = self.weight();
        for s in extra {
            bounds = Some(bounds.map_or(s.bounds(), |b| b.union(&s.bounds())));
            weight += s.weight();
        }
        let length = bounds.map_or(0, |b| self.orientation.along(&b).1);
        if length <= 0 {
            return 0.0;
        }
        weight as f32 / length as f32
    }

    pub(crate) fn absorb(&mut self, section: Section) {
        self.members.push(section);
    }

    pub(crate) fn absorb_fiber(&mut self, other: Fiber) {
        self.members.extend(other.members);
    }

    /// Removes the member with `id`, reporting whether it was present.
    pub fn remove_section(&mut self, id: SectionId) -> bool {
        let before = self.members.len();
        self.members.retain(|s| s.id != id);
        self.members.len() != before
    }

    pub fn to_glyph(&self) -> Glyph {
        Glyph::from_sections(&self.members)
    }
}
