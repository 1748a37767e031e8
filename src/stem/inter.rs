use crate::glyph::Glyph;
use crate::grade::GradeImpacts;
use crate::profiles::Profile;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Committed stem: one merged shape plus its grade.
#[derive(Clone, Debug)]
pub struct StemInter {
    glyph: Arc<Glyph>,
    grade: f32,
    impacts: GradeImpacts,
    profile: Profile,
    artificial: bool,
}

impl StemInter {
    pub fn new(glyph: Arc<Glyph>, impacts: GradeImpacts, profile: Profile) -> Self {
        Self {
            glyph,
            grade: impacts.grade(),
            impacts,
            profile,
            artificial: false,
        }
    }

    /// Stem accepted with a fixed grade despite weak pixel evidence.
    pub fn artificial(glyph: Arc<Glyph>, grade: f32, impacts: GradeImpacts, profile: Profile) -> Self {
        Self {
            glyph,
            grade,
            impacts,
            profile,
            artificial: true,
        }
    }

    pub fn glyph(&self) -> &Arc<Glyph> {
        &self.glyph
    }

    pub fn grade(&self) -> f32 {
        self.grade
    }

    /// Sub-scores from the grader (even for an artificial stem).
    pub fn impacts(&self) -> &GradeImpacts {
        &self.impacts
    }

    /// Profile the stem was created at.
    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn is_artificial(&self) -> bool {
        self.artificial
    }
}

/// Region-level memory of created stems, keyed by canonical merged shape.
#[derive(Default)]
pub struct StemCache {
    stems: Mutex<HashMap<Arc<Glyph>, Arc<StemInter>>>,
}

impl StemCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, glyph: &Glyph) -> Option<Arc<StemInter>> {
        let stems = self.stems.lock().unwrap_or_else(|e| e.into_inner());
        stems.get(glyph).cloned()
    }

    /// Stores `inter` unless a stem already exists for the same shape, and
    /// returns the stored one.
    pub fn insert(&self, inter: StemInter) -> Arc<StemInter> {
        let mut stems = self.stems.lock().unwrap_or_else(|e| e.into_inner());
        let key = Arc::clone(inter.glyph());
        Arc::clone(stems.entry(key).or_insert_with(|| Arc::new(inter)))
    }

    pub fn len(&self) -> usize {
        self.stems.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
