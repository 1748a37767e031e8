use super::stem::StemConfig;
use crate::geometry::Rect;
use crate::linker::LinkerKind;
use crate::scale::Scale;
use crate::seeds::StaffZone;
use crate::sections::DEFAULT_FOREGROUND_THRESHOLD;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct DemoToolConfig {
    #[serde(rename = "input")]
    pub input: PathBuf,
    /// Gray level below which a pixel is ink.
    #[serde(default = "default_threshold")]
    pub threshold: u8,
    #[serde(default)]
    pub scale: Scale,
    /// Global page slope (tangent).
    #[serde(default)]
    pub skew_slope: f32,
    #[serde(default)]
    pub stem: StemConfig,
    pub regions: Vec<RegionConfig>,
    pub output: DemoOutputConfig,
}

fn default_threshold() -> u8 {
    DEFAULT_FOREGROUND_THRESHOLD
}

/// One system region of the page.
#[derive(Debug, Deserialize)]
pub struct RegionConfig {
    pub left: i32,
    pub right: i32,
    #[serde(default)]
    pub staves: Vec<StaffZone>,
    #[serde(default)]
    pub anchors: Vec<AnchorConfig>,
}

/// Anchor from which a stem sequence is built.
#[derive(Debug, Deserialize)]
pub struct AnchorConfig {
    pub kind: LinkerKind,
    /// Reference point on the head corner or beam side.
    pub reference: [f32; 2],
    /// Far end of the theoretical stem line.
    pub target: [f32; 2],
    /// Half width of the lookup area around the line, in pixels.
    #[serde(default = "default_half_width")]
    pub half_width: f32,
    /// Bounds of the head or beam the anchor belongs to.
    pub source: Rect,
    /// Box whose ink is already attached to the anchor, if any.
    #[serde(default)]
    pub stump: Option<Rect>,
}

fn default_half_width() -> f32 {
    6.0
}

#[derive(Debug, Deserialize)]
pub struct DemoOutputConfig {
    #[serde(rename = "report_json")]
    pub report_json: PathBuf,
    /// Page copy with the committed stems painted over it.
    #[serde(rename = "overlay_png", default)]
    pub overlay_png: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<DemoToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data).map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
