//! Strictness tiers used when reaching for stem evidence.
//!
//! A higher profile tolerates larger white gaps between consecutive stem
//! items. The tiers form a small dense range so per-profile tables are plain
//! arrays indexed by [`Profile::index`].

use crate::scale::Scale;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Strictness tier (0 = strictest).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile(pub u8);

impl Profile {
    pub const STRICT: Profile = Profile(0);
    pub const STANDARD: Profile = Profile(1);
    pub const POOR: Profile = Profile(2);
    /// Linking a beam side, where near-zero evidence is still acceptable.
    pub const BEAM_SIDE: Profile = Profile(3);
    pub const BEAM_SEED: Profile = Profile(4);
    pub const MAX: Profile = Profile::BEAM_SEED;

    /// Number of tiers, `MAX` included.
    pub const COUNT: usize = Profile::MAX.0 as usize + 1;

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_valid(self) -> bool {
        self.index() < Self::COUNT
    }

    /// All tiers in ascending strictness order (strict first).
    pub fn all() -> impl Iterator<Item = Profile> {
        (0..Self::COUNT as u8).map(Profile)
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// Default maximum vertical gap per profile, in interline fractions.
pub const DEFAULT_GAP_FRACTIONS: [f32; Profile::COUNT] = [0.0, 0.3, 0.6, 2.0, 4.0];

/// Maximum tolerated gap (pixels) for every profile, non-decreasing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GapTable {
    max_gaps: [i32; Profile::COUNT],
}

impl GapTable {
    /// Builds the table from pixel values; missing tiers repeat the last
    /// value and a smaller value never follows a larger one.
    pub fn from_pixels(values: &[i32]) -> Self {
        let mut max_gaps = [0i32; Profile::COUNT];
        let mut last = 0i32;
        for (i, slot) in max_gaps.iter_mut().enumerate() {
            let v = values.get(i).copied().unwrap_or(last);
            last = v.max(last);
            *slot = last;
        }
        Self { max_gaps }
    }

    pub fn from_fractions(scale: &Scale, fractions: &[f32]) -> Self {
        let pixels: Vec<i32> = fractions.iter().map(|&f| scale.to_pixels(f)).collect();
        Self::from_pixels(&pixels)
    }

    #[inline]
    pub fn max_gap(&self, profile: Profile) -> i32 {
        self.max_gaps[profile.index().min(Profile::COUNT - 1)]
    }

    /// `(profile, max_gap)` pairs in ascending tolerance order.
    pub fn iter(&self) -> impl Iterator<Item = (Profile, i32)> + '_ {
        self.max_gaps
            .iter()
            .enumerate()
            .map(|(i, &g)| (Profile(i as u8), g))
    }
}

impl Default for GapTable {
    fn default() -> Self {
        Self::from_fractions(&Scale::default(), &DEFAULT_GAP_FRACTIONS)
    }
}
