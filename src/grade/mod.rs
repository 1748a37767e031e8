//! Quality grading of candidate stem shapes.
//!
//! The stem pipeline only relies on the [`StemGrader`] contract: a pure
//! function from `(glyph, profile)` to a set of weighted sub-scores. The
//! combined grade is the weighted geometric mean of those sub-scores, so a
//! single failing check drags the whole grade to zero.
//!
//! [`StemChecker`] is the default grader, built from profile-dependent
//! checks on slope, straightness, length, black coverage and gaps.

mod checker;

pub use checker::StemChecker;

use crate::glyph::Glyph;
use crate::profiles::Profile;
use serde::Serialize;

/// One named sub-score in `[0, 1]` with its weight in the suite.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Impact {
    pub name: &'static str,
    pub value: f32,
    pub weight: f32,
}

/// Sub-scores produced by a grader for one shape at one profile.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GradeImpacts {
    pub impacts: Vec<Impact>,
}

impl GradeImpacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &'static str, value: f32, weight: f32) {
        self.impacts.push(Impact {
            name,
            value: value.clamp(0.0, 1.0),
            weight,
        });
    }

    pub fn get(&self, name: &str) -> Option<f32> {
        self.impacts.iter().find(|i| i.name == name).map(|i| i.value)
    }

    /// Weighted geometric mean of the sub-scores; non-positive weights are
    /// ignored and an empty suite grades 0.
    pub fn grade(&self) -> f32 {
        let mut total_weight = 0f32;
        let mut log_sum = 0f32;
        for impact in self.impacts.iter().filter(|i| i.weight > 0.0) {
            if impact.value <= 0.0 {
                return 0.0;
            }
            total_weight += impact.weight;
            log_sum += impact.weight * impact.value.ln();
        }
        if total_weight <= 0.0 {
            return 0.0;
        }
        (log_sum / total_weight).exp()
    }
}

/// Black-box grader of candidate stems.
pub trait StemGrader: Send + Sync {
    fn grade(&self, glyph: &Glyph, profile: Profile) -> GradeImpacts;
}
