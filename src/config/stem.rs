//! Tunables of the stem pipeline, expressed in interline fractions.
//!
//! [`StemConfig`] is what users edit (JSON, all fields optional);
//! [`StemConfig::resolve`] converts it once per page into pixel-based
//! [`StemParams`] consumed by the seed collector and the sequence builder.

use crate::profiles::{GapTable, Profile, DEFAULT_GAP_FRACTIONS};
use crate::scale::Scale;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// What `create_stem` does when the grade of a merged shape is too low.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtificialStemPolicy {
    pub enabled: bool,
    /// Profile at which a weak stem is still accepted.
    pub profile: Profile,
    /// Grade assigned to such a stem.
    pub grade: f32,
}

impl Default for ArtificialStemPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            profile: Profile::BEAM_SIDE,
            grade: 0.4,
        }
    }
}

impl ArtificialStemPolicy {
    pub fn applies_to(&self, profile: Profile) -> bool {
        self.enabled && profile == self.profile
    }
}

/// Profile-dependent bounds of the default stem checker.
///
/// Per-profile arrays are indexed by [`Profile::index`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Maximum tangent difference with the page slope.
    pub slope_high: f32,
    /// Maximum mean distance to the fitted line (interline fraction).
    pub straight_high: f32,
    pub length_low: f32,
    pub length_high: f32,
    pub black_low: [f32; Profile::COUNT],
    pub black_high: [f32; Profile::COUNT],
    pub black_ratio_low: [f32; Profile::COUNT],
    /// Rows free of any attached ink (interline fraction); not applied from
    /// [`Profile::BEAM_SIDE`] upwards.
    pub clean_low: [f32; Profile::COUNT],
    pub clean_high: f32,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            slope_high: 0.08,
            straight_high: 0.2,
            length_low: 1.25,
            length_high: 3.5,
            black_low: [1.25, 0.625, 0.625, 0.625, 0.625],
            black_high: [2.5, 1.25, 1.25, 1.25, 1.25],
            black_ratio_low: [0.5, 0.3, 0.2, 0.1, 0.1],
            clean_low: [0.5, 0.3, 0.2, 0.0, 0.0],
            clean_high: 2.0,
        }
    }
}

/// User-facing stem configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StemConfig {
    /// Maximum vertical gap per profile (interline fractions).
    pub max_gap: [f32; Profile::COUNT],
    /// Minimum concrete length for a linker.
    pub min_linker_length: f32,
    /// Maximum dx between aligned stem seeds.
    pub max_stem_alignment_dx: f32,
    /// Maximum dy under which the dx alignment test applies.
    pub max_stem_alignment_dy: f32,
    /// Maximum distance from a section center to the theoretical line.
    pub max_line_section_dx: f32,
    /// Minimum length of core sections when collecting seeds.
    pub min_core_section_length: f32,
    /// Minimum ratio of fiber length covered by an enlarging side section.
    pub min_side_ratio: f32,
    /// Minimum chunk weight (pixels) left once head pixels are removed.
    pub min_head_chunk_weight: i32,
    /// Minimum grade for a stem interpretation.
    pub min_grade: f32,
    /// Minimum grade for a fiber to become a seed.
    pub seed_min_grade: f32,
    pub artificial_stem: ArtificialStemPolicy,
    pub checker: CheckerConfig,
}

impl Default for StemConfig {
    fn default() -> Self {
        Self {
            max_gap: DEFAULT_GAP_FRACTIONS,
            min_linker_length: 0.85,
            max_stem_alignment_dx: 0.15,
            max_stem_alignment_dy: 4.0,
            max_line_section_dx: 0.3,
            min_core_section_length: 1.5,
            min_side_ratio: 0.4,
            min_head_chunk_weight: 15,
            min_grade: 0.1,
            seed_min_grade: 0.2,
            artificial_stem: ArtificialStemPolicy::default(),
            checker: CheckerConfig::default(),
        }
    }
}

impl StemConfig {
    /// Pre-scales every fraction for the page `scale`.
    pub fn resolve(&self, scale: &Scale) -> StemParams {
        StemParams {
            gap_table: GapTable::from_fractions(scale, &self.max_gap),
            main_stem_thickness: scale.main_stem,
            max_stem_thickness: scale.max_stem,
            min_linker_length: scale.to_pixels(self.min_linker_length),
            max_stem_alignment_dx: scale.to_pixels_f32(self.max_stem_alignment_dx),
            max_stem_alignment_dy: scale.to_pixels_f32(self.max_stem_alignment_dy),
            max_line_section_dx: scale.to_pixels_f32(self.max_line_section_dx),
            min_core_section_length: scale.to_pixels(self.min_core_section_length),
            min_side_ratio: self.min_side_ratio,
            min_head_chunk_weight: self.min_head_chunk_weight,
            min_grade: self.min_grade,
            seed_min_grade: self.seed_min_grade,
            artificial_stem: self.artificial_stem,
        }
    }
}

/// Pixel-based parameters derived from [`StemConfig`] for one page.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StemParams {
    pub gap_table: GapTable,
    pub main_stem_thickness: i32,
    pub max_stem_thickness: i32,
    pub min_linker_length: i32,
    pub max_stem_alignment_dx: f32,
    pub max_stem_alignment_dy: f32,
    pub max_line_section_dx: f32,
    pub min_core_section_length: i32,
    pub min_side_ratio: f32,
    pub min_head_chunk_weight: i32,
    pub min_grade: f32,
    pub seed_min_grade: f32,
    pub artificial_stem: ArtificialStemPolicy,
}

impl Default for StemParams {
    fn default() -> Self {
        StemConfig::default().resolve(&Scale::default())
    }
}

pub fn load_config(path: &Path) -> Result<StemConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data).map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
