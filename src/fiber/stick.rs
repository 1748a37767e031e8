use super::{Fiber, FiberFactory, FiberParams};
use crate::geometry::Rect;
use crate::sections::Section;
use log::trace;

/// Default fiber builder.
///
/// 1. Sections long enough become cores; touching cores are grown into
///    sticks as long as the mean thickness stays within bounds.
/// 2. Staples touching a stick are absorbed and may bridge two sticks.
/// 3. Remaining side sections enlarge a stick only when they cover a
///    sufficient ratio of its length.
#[derive(Clone, Copy, Debug, Default)]
pub struct StickFactory;

impl StickFactory {
    pub fn new() -> Self {
        Self
    }
}

#[inline]
fn touch(a: &Rect, b: &Rect) -> bool {
    a.x_overlap(b) >= 0 && a.y_overlap(b) >= 0
}

fn touches(fiber: &Fiber, section: &Section) -> bool {
    let bounds = section.bounds();
    fiber.members().iter().any(|m| touch(&m.bounds(), &bounds))
}

impl FiberFactory for StickFactory {
    fn assemble(&self, params: &FiberParams, sections: &[Section], staples: &[Section]) -> Vec<Fiber> {
        let orientation = params.orientation;
        let max_thickness = params.max_thickness as f32;
        let sort_key = |s: &Section| {
            let b = s.bounds();
            (orientation.along(&b).0, orientation.across(&b).0, s.id)
        };

        let (mut cores, mut sides): (Vec<&Section>, Vec<&Section>) = sections.iter().partition(|s| {
            s.length() >= params.min_core_length && s.thickness() as f32 <= max_thickness
        });
        cores.sort_by_key(|s| sort_key(s));
        sides.sort_by_key(|s| sort_key(s));

        let mut sticks: Vec<Fiber> = Vec::new();
        for core in cores {
            let target = sticks
                .iter()
                .position(|st| touches(st, core) && st.thickness_with(&[core]) <= max_thickness);
            match target {
                Some(i) => sticks[i].absorb(core.clone()),
                None => sticks.push(Fiber::new(orientation, vec![core.clone()])),
            }
        }

        let mut staples: Vec<&Section> = staples.iter().collect();
        staples.sort_by_key(|s| sort_key(s));
        for staple in staples {
            let touching: Vec<usize> = sticks
                .iter()
                .enumerate()
                .filter(|(_, st)| touches(st, staple))
                .map(|(i, _)| i)
                .collect();
            let Some(&first) = touching.first() else {
                continue;
            };
            if sticks[first].thickness_with(&[staple]) > max_thickness {
                continue;
            }
            sticks[first].absorb(staple.clone());
            for &other in touching[1..].iter().rev() {
                let fits = {
                    let candidate: Vec<&Section> = sticks[other].members().iter().collect();
                    sticks[first].thickness_with(&candidate) <= max_thickness
                };
                if fits {
                    let bridged = sticks.remove(other);
                    sticks[first].absorb_fiber(bridged);
                }
            }
        }

        for side in sides {
            let target = sticks.iter().position(|st| {
                touches(st, side)
                    && side.length() as f32 >= params.min_side_ratio * st.length() as f32
                    && st.thickness_with(&[side]) <= max_thickness
            });
            if let Some(i) = target {
                sticks[i].absorb(side.clone());
            }
        }

        sticks.sort_by_key(|st| {
            let b = st.bounds();
            (orientation.across(&b).0, orientation.along(&b).0)
        });
        trace!(
            "assembled {} sticks from {} sections and staples",
            sticks.len(),
            sections.len()
        );
        sticks
    }
}
