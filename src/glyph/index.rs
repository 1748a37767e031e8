use super::glyph::{Glyph, GlyphId};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct IndexState {
    canonical: HashSet<Arc<Glyph>>,
    by_id: Vec<Arc<Glyph>>,
}

/// Page-wide registry returning one canonical instance per pixel set.
///
/// Registration is an insert-or-get under a mutex, so region workers may
/// register concurrently; whoever registers a shape first fixes its id.
#[derive(Default)]
pub struct GlyphIndex {
    state: Mutex<IndexState>,
}

impl GlyphIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the canonical instance for `glyph`, registering it if new.
    pub fn register(&self, glyph: Glyph) -> Arc<Glyph> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = state.canonical.get(&glyph) {
            return Arc::clone(existing);
        }
        let id = GlyphId(state.by_id.len() as u32);
        let glyph = Arc::new(glyph.with_id(id));
        state.canonical.insert(Arc::clone(&glyph));
        state.by_id.push(Arc::clone(&glyph));
        glyph
    }

    pub fn get(&self, id: GlyphId) -> Option<Arc<Glyph>> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.by_id.get(id.0 as usize).cloned()
    }

    pub fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .by_id
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
