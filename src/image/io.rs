//! Page image I/O and report output.
//!
//! - `load_page_image`: read a page into an owned 8-bit gray buffer.
//! - `save_stem_overlay`: paint stem shapes in red over the page.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::ImageU8;
use crate::glyph::Glyph;
use image::{Rgb, RgbImage};
use serde::Serialize;
use std::fs;
use std::path::Path;

const STEM_COLOR: Rgb<u8> = Rgb([220, 30, 30]);

/// Owned grayscale page.
#[derive(Clone, Debug)]
pub struct PageImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PageImage {
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_view(&self) -> ImageU8<'_> {
        ImageU8 {
            w: self.width,
            h: self.height,
            stride: self.width,
            data: &self.data,
        }
    }
}

/// Load a page from disk and convert it to 8-bit grayscale.
pub fn load_page_image(path: &Path) -> Result<PageImage, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    Ok(PageImage::new(width, height, img.into_raw()))
}

/// Writes the page as an RGB PNG with the pixels of `stems` highlighted.
pub fn save_stem_overlay(page: &PageImage, stems: &[&Glyph], path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let view = page.as_view();
    let mut out = RgbImage::from_fn(page.width as u32, page.height as u32, |x, y| {
        let v = view.get(x as usize, y as usize);
        Rgb([v, v, v])
    });
    let (w, h) = (page.width as i32, page.height as i32);
    for (x, y) in stems.iter().flat_map(|g| g.pixels()) {
        if (0..w).contains(&x) && (0..h).contains(&y) {
            out.put_pixel(x as u32, y as u32, STEM_COLOR);
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
