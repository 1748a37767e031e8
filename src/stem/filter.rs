use crate::config::StemParams;
use crate::glyph::{same_glyph, Glyph};
use crate::scale::Skew;
use log::trace;
use std::sync::Arc;

/// Whether two shapes could belong to the same stem.
///
/// Centroids are compared once the page slope is removed. Far apart
/// vertically, shapes are always considered aligned since the abscissa
/// test gets unreliable.
pub fn are_aligned(skew: &Skew, params: &StemParams, g1: &Glyph, g2: &Glyph) -> bool {
    let d1 = skew.deskewed(g1.centroid());
    let d2 = skew.deskewed(g2.centroid());
    let dy = (d2[1] - d1[1]).abs();
    if dy > params.max_stem_alignment_dy {
        return true;
    }
    (d2[0] - d1[0]).abs() <= params.max_stem_alignment_dx
}

/// Sorts glyphs along the direction of travel: by top going down, by
/// reverse bottom going up.
pub(crate) fn sort_along(glyphs: &mut [Arc<Glyph>], y_dir: i32) {
    glyphs.sort_by_key(|g| {
        let b = g.bounds();
        let key = if y_dir > 0 { b.y } else { -b.bottom() };
        (key, b.x, g.id())
    });
}

/// Removes, from `glyphs`, every shape misaligned with its neighbour and
/// returns the removed ones.
///
/// Consecutive shapes along the axis are compared pairwise, the shorter of
/// a misaligned pair is dropped and the comparison resumes with the new
/// neighbour. The `stump`, when given, is compared first; it may leave the
/// comparison but is never part of the returned shapes.
pub(crate) fn filter_unaligned(
    glyphs: &mut Vec<Arc<Glyph>>,
    stump: Option<&Arc<Glyph>>,
    y_dir: i32,
    skew: &Skew,
    params: &StemParams,
) -> Vec<Arc<Glyph>> {
    let mut list = glyphs.clone();
    sort_along(&mut list, y_dir);
    if let Some(stump) = stump {
        list.retain(|g| !same_glyph(g, stump));
        list.insert(0, Arc::clone(stump));
    }

    let mut removed: Vec<Arc<Glyph>> = Vec::new();
    let mut i = 0;
    while i + 1 < list.len() {
        if are_aligned(skew, params, &list[i], &list[i + 1]) {
            i += 1;
            continue;
        }
        let alien = if list[i].bounds().height < list[i + 1].bounds().height {
            i
        } else {
            i + 1
        };
        let glyph = list.remove(alien);
        trace!(
            "dropping misaligned glyph {:?} at {:?}",
            glyph.id(),
            glyph.bounds()
        );
        // The stump only leaves the comparison, its start item stays.
        if !stump.is_some_and(|s| same_glyph(s, &glyph)) {
            removed.push(glyph);
        }
        if alien == i {
            i = i.saturating_sub(1);
        }
    }

    glyphs.retain(|g| !removed.iter().any(|r| same_glyph(r, g)));
    removed
}
