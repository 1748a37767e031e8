use super::section::{Orientation, Run, Section, SectionId};
use crate::image::ImageU8;
use log::debug;

/// Result of a section extraction pass over one orientation.
#[derive(Clone, Debug, Default)]
pub struct SectionsResult {
    pub sections: Vec<Section>,
    pub runs: usize,
}

/// Builds sections line by line, continuing a section only through
/// one-to-one run overlaps (junction policy).
pub(crate) struct SectionExtractor<'a> {
    image: &'a ImageU8<'a>,
    orientation: Orientation,
    threshold: u8,
    /// Runs of every section under construction, indexed by section slot.
    pending: Vec<Vec<Run>>,
    /// Runs of the previous line with the slot they extend.
    previous: Vec<(Run, usize)>,
    run_count: usize,
}

impl<'a> SectionExtractor<'a> {
    pub(crate) fn new(image: &'a ImageU8<'a>, orientation: Orientation, threshold: u8) -> Self {
        Self {
            image,
            orientation,
            threshold,
            pending: Vec::new(),
            previous: Vec::new(),
            run_count: 0,
        }
    }

    pub(crate) fn extract(mut self) -> SectionsResult {
        let (lines, span) = match self.orientation {
            Orientation::Vertical => (self.image.w, self.image.h),
            Orientation::Horizontal => (self.image.h, self.image.w),
        };
        for pos in 0..lines {
            let runs = self.line_runs(pos, span);
            self.run_count += runs.len();
            self.link_line(runs);
        }

        let orientation = self.orientation;
        let sections: Vec<Section> = self
            .pending
            .into_iter()
            .enumerate()
            .map(|(i, runs)| Section::new(SectionId::new(orientation, i as u32), orientation, runs))
            .collect();
        debug!(
            "{:?} sections: {} from {} runs",
            orientation,
            sections.len(),
            self.run_count
        );
        SectionsResult {
            sections,
            runs: self.run_count,
        }
    }

    fn is_ink(&self, pos: usize, v: usize) -> bool {
        match self.orientation {
            Orientation::Vertical => self.image.is_foreground(pos, v, self.threshold),
            Orientation::Horizontal => self.image.is_foreground(v, pos, self.threshold),
        }
    }

    fn line_runs(&self, pos: usize, span: usize) -> Vec<Run> {
        let mut runs = Vec::new();
        let mut start: Option<usize> = None;
        for v in 0..span {
            match (self.is_ink(pos, v), start) {
                (true, None) => start = Some(v),
                (false, Some(s)) => {
                    runs.push(Run {
                        pos: pos as i32,
                        start: s as i32,
                        len: (v - s) as i32,
                    });
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            runs.push(Run {
                pos: pos as i32,
                start: s as i32,
                len: (span - s) as i32,
            });
        }
        runs
    }

    fn link_line(&mut self, runs: Vec<Run>) {
        let mut successors = vec![0usize; self.previous.len()];
        let mut predecessors: Vec<Vec<usize>> = Vec::with_capacity(runs.len());
        for run in &runs {
            let preds: Vec<usize> = self
                .previous
                .iter()
                .enumerate()
                .filter(|(_, (prev, _))| prev.overlaps(run))
                .map(|(i, _)| i)
                .collect();
            for &p in &preds {
                successors[p] += 1;
            }
            predecessors.push(preds);
        }

        let mut current = Vec::with_capacity(runs.len());
        for (run, preds) in runs.into_iter().zip(predecessors) {
            let slot = match preds.as_slice() {
                [p] if successors[*p] == 1 => {
                    let slot = self.previous[*p].1;
                    self.pending[slot].push(run);
                    slot
                }
                _ => {
                    self.pending.push(vec![run]);
                    self.pending.len() - 1
                }
            };
            current.push((run, slot));
        }
        self.previous = current;
    }
}
