//! Page-level scale and skew services.
//!
//! Both are read-only once computed for a page. `Scale` converts interline
//! fractions into pixels; `Skew` removes the global page slope so that
//! alignment checks can compare abscissae directly.

use nalgebra::{Point2, Rotation2};
use serde::{Deserialize, Serialize};

/// Interline-based unit conversion for one page.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    /// Main vertical distance between two staff lines, in pixels.
    pub interline: i32,
    /// Most frequent stem thickness, in pixels.
    pub main_stem: i32,
    /// Reasonable maximum stem thickness, in pixels.
    pub max_stem: i32,
}

impl Default for Scale {
    fn default() -> Self {
        Self {
            interline: 20,
            main_stem: 3,
            max_stem: 4,
        }
    }
}

impl Scale {
    pub fn new(interline: i32, main_stem: i32, max_stem: i32) -> Self {
        Self {
            interline,
            main_stem,
            max_stem: max_stem.max(main_stem),
        }
    }

    /// Converts an interline fraction to a rounded pixel count.
    #[inline]
    pub fn to_pixels(&self, fraction: f32) -> i32 {
        (fraction * self.interline as f32).round() as i32
    }

    #[inline]
    pub fn to_pixels_f32(&self, fraction: f32) -> f32 {
        fraction * self.interline as f32
    }

    #[inline]
    pub fn pixels_to_frac(&self, pixels: f32) -> f32 {
        pixels / self.interline.max(1) as f32
    }
}

/// Global page slope (tangent of the staff-line angle).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Skew {
    pub slope: f32,
}

impl Skew {
    pub fn new(slope: f32) -> Self {
        Self { slope }
    }

    pub fn angle(&self) -> f32 {
        self.slope.atan()
    }

    /// Rotates `p` around the page origin so that staff lines become horizontal.
    pub fn deskewed(&self, p: [f32; 2]) -> [f32; 2] {
        if self.slope == 0.0 {
            return p;
        }
        let rot = Rotation2::new(-self.angle());
        let q = rot * Point2::new(p[0], p[1]);
        [q.x, q.y]
    }
}
