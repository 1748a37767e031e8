//! Assembly of elongated fibers ("sticks") from oriented sections.
//!
//! The stem pipeline treats fiber assembly as a black box behind the
//! [`FiberFactory`] trait: given sections read along the fiber orientation,
//! unit-thickness staple sections read across it, and thickness/length
//! constraints, the factory returns fibers as [`Fiber`] compounds whose
//! members can later be trimmed one by one.
//!
//! [`StickFactory`] is the default implementation used by the seed
//! collector and the per-anchor chunk lookup.

#[allow(clippy::module_inception)]
mod fiber;
mod stick;

pub use fiber::Fiber;
pub use stick::StickFactory;

use crate::sections::{Orientation, Section};
use serde::{Deserialize, Serialize};

/// Constraints handed to a fiber factory.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FiberParams {
    pub orientation: Orientation,
    /// Maximum mean thickness of a fiber, in pixels.
    pub max_thickness: i32,
    /// Minimum length of a section to start a fiber (0 accepts all).
    pub min_core_length: i32,
    /// Minimum ratio of side-section length to fiber length for enlargement.
    pub min_side_ratio: f32,
}

/// Black-box builder of fibers; a pure function of its inputs.
pub trait FiberFactory: Send + Sync {
    fn assemble(&self, params: &FiberParams, sections: &[Section], staples: &[Section]) -> Vec<Fiber>;
}
