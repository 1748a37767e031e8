use crate::geometry::{AxisLine, Rect};
use crate::sections::Section;
use nalgebra::{Matrix2, SymmetricEigen};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

/// Identifier handed out by the glyph index on first registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlyphId(pub u32);

/// Horizontal span of foreground pixels `x0..x1` on row `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PixelSpan {
    pub y: i32,
    pub x0: i32,
    pub x1: i32,
}

impl PixelSpan {
    #[inline]
    pub fn len(&self) -> i32 {
        self.x1 - self.x0
    }
}

/// Principal axis of a glyph, oriented downwards.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GlyphLine {
    pub center: [f32; 2],
    pub dir: [f32; 2],
}

impl GlyphLine {
    /// Abscissa at ordinate `y`, `None` for a horizontal axis.
    pub fn x_at_y(&self, y: f32) -> Option<f32> {
        if self.dir[1].abs() < 1e-6 {
            return None;
        }
        Some(self.center[0] + (y - self.center[1]) * self.dir[0] / self.dir[1])
    }

    /// dx/dy of the axis (0 for a vertical axis).
    pub fn inverted_slope(&self) -> f32 {
        if self.dir[1].abs() < 1e-6 {
            f32::INFINITY
        } else {
            self.dir[0] / self.dir[1]
        }
    }
}

/// Immutable foreground shape stored as normalized row spans.
///
/// Two glyphs are equal when they cover exactly the same pixels; the id is
/// bookkeeping only and does not take part in equality or hashing.
#[derive(Clone, Debug, Serialize)]
pub struct Glyph {
    id: Option<GlyphId>,
    spans: Vec<PixelSpan>,
    bounds: Rect,
    weight: i32,
    centroid: [f32; 2],
    #[serde(skip)]
    line: OnceLock<Option<GlyphLine>>,
}

impl PartialEq for Glyph {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.bounds == other.bounds && self.spans == other.spans
    }
}

impl Eq for Glyph {}

impl Hash for Glyph {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.spans.hash(state);
    }
}

impl Glyph {
    /// Builds a glyph from any pixel collection; duplicates are ignored.
    pub fn from_pixels<I: IntoIterator<Item = (i32, i32)>>(pixels: I) -> Self {
        let mut points: Vec<(i32, i32)> = pixels.into_iter().map(|(x, y)| (y, x)).collect();
        points.sort_unstable();
        points.dedup();

        let mut spans: Vec<PixelSpan> = Vec::new();
        for (y, x) in points {
            match spans.last_mut() {
                Some(last) if last.y == y && last.x1 == x => last.x1 += 1,
                _ => spans.push(PixelSpan { y, x0: x, x1: x + 1 }),
            }
        }
        Self::from_spans(spans)
    }

    pub fn from_sections<'s, I: IntoIterator<Item = &'s Section>>(sections: I) -> Self {
        Self::from_pixels(sections.into_iter().flat_map(|s| s.pixels().collect::<Vec<_>>()))
    }

    /// Solid rectangle glyph.
    pub fn from_rect(rect: Rect) -> Self {
        let spans = (rect.y..rect.bottom())
            .map(|y| PixelSpan {
                y,
                x0: rect.x,
                x1: rect.right(),
            })
            .collect();
        Self::from_spans(spans)
    }

    /// Straight band of `thickness` pixels centered on `axis`.
    pub fn along_axis(axis: &AxisLine, thickness: i32) -> Self {
        let thickness = thickness.max(1);
        let y0 = axis.p1[1].min(axis.p2[1]).floor() as i32;
        let y1 = axis.p1[1].max(axis.p2[1]).ceil() as i32;
        let spans = (y0..y1.max(y0 + 1))
            .map(|y| {
                let xc = axis.x_at_y(y as f32 + 0.5);
                let x0 = (xc - thickness as f32 * 0.5).round() as i32;
                PixelSpan {
                    y,
                    x0,
                    x1: x0 + thickness,
                }
            })
            .collect();
        Self::from_spans(spans)
    }

    /// Pixel union of several glyphs.
    pub fn union<'g, I: IntoIterator<Item = &'g Glyph>>(glyphs: I) -> Self {
        Self::from_pixels(glyphs.into_iter().flat_map(|g| g.pixels().collect::<Vec<_>>()))
    }

    fn from_spans(spans: Vec<PixelSpan>) -> Self {
        let mut weight = 0i32;
        let mut sx = 0f64;
        let mut sy = 0f64;
        let mut bounds: Option<Rect> = None;
        for span in &spans {
            let n = span.len();
            weight += n;
            // Sum of pixel centers along the span.
            sx += (span.x0 + span.x1) as f64 * 0.5 * n as f64;
            sy += (span.y as f64 + 0.5) * n as f64;
            let rect = Rect::new(span.x0, span.y, n, 1);
            bounds = Some(bounds.map_or(rect, |b| b.union(&rect)));
        }
        let centroid = if weight > 0 {
            [(sx / weight as f64) as f32, (sy / weight as f64) as f32]
        } else {
            [0.0, 0.0]
        };
        Self {
            id: None,
            spans,
            bounds: bounds.unwrap_or_default(),
            weight,
            centroid,
            line: OnceLock::new(),
        }
    }

    pub(crate) fn with_id(mut self, id: GlyphId) -> Self {
        self.id = Some(id);
        self
    }

    /// Id assigned by the index, `None` until registered.
    pub fn id(&self) -> Option<GlyphId> {
        self.id
    }

    pub fn spans(&self) -> &[PixelSpan] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.weight == 0
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn weight(&self) -> i32 {
        self.weight
    }

    pub fn centroid(&self) -> [f32; 2] {
        self.centroid
    }

    pub fn pixels(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.spans
            .iter()
            .flat_map(|s| (s.x0..s.x1).map(move |x| (x, s.y)))
    }

    /// Number of pixels shared with `other`.
    pub fn shared_weight(&self, other: &Glyph) -> i32 {
        if !self.bounds.intersects(&other.bounds) {
            return 0;
        }
        let (mut i, mut j) = (0usize, 0usize);
        let mut shared = 0;
        while i < self.spans.len() && j < other.spans.len() {
            let a = self.spans[i];
            let b = other.spans[j];
            if (a.y, a.x1) <= (b.y, b.x0) {
                i += 1;
                continue;
            }
            if (b.y, b.x1) <= (a.y, a.x0) {
                j += 1;
                continue;
            }
            shared += (a.x1.min(b.x1) - a.x0.max(b.x0)).max(0);
            if (a.y, a.x1) < (b.y, b.x1) {
                i += 1;
            } else {
                j += 1;
            }
        }
        shared
    }

    /// Principal axis from the pixel covariance, `None` for an empty glyph.
    pub fn line(&self) -> Option<GlyphLine> {
        *self.line.get_or_init(|| self.compute_line())
    }

    fn compute_line(&self) -> Option<GlyphLine> {
        if self.weight == 0 {
            return None;
        }
        let [cx, cy] = self.centroid;
        let (mut cxx, mut cyy, mut cxy) = (0f32, 0f32, 0f32);
        for (x, y) in self.pixels() {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            cxx += dx * dx;
            cyy += dy * dy;
            cxy += dx * dy;
        }
        let n = self.weight as f32;
        let cov = Matrix2::new(cxx / n, cxy / n, cxy / n, cyy / n);
        let eig = SymmetricEigen::new(cov);
        let v = if eig.eigenvalues[0] >= eig.eigenvalues[1] {
            eig.eigenvectors.column(0)
        } else {
            eig.eigenvectors.column(1)
        };
        let (mut tx, mut ty) = (v[0], v[1]);
        let norm = (tx * tx + ty * ty).sqrt();
        if !norm.is_finite() || norm < 1e-6 {
            return None;
        }
        tx /= norm;
        ty /= norm;
        // Single-pixel or square blobs: fall back to vertical.
        if (eig.eigenvalues[0] - eig.eigenvalues[1]).abs() < 1e-6 {
            tx = 0.0;
            ty = 1.0;
        }
        if ty < 0.0 {
            tx = -tx;
            ty = -ty;
        }
        Some(GlyphLine {
            center: self.centroid,
            dir: [tx, ty],
        })
    }

    /// Fitted center line clipped to the glyph's vertical extent.
    pub fn center_line(&self) -> Option<AxisLine> {
        let line = self.line()?;
        let top = self.bounds.y as f32;
        let bottom = self.bounds.bottom() as f32;
        let x_top = line.x_at_y(top)?;
        let x_bottom = line.x_at_y(bottom)?;
        Some(AxisLine::new([x_top, top], [x_bottom, bottom]))
    }

    /// Average horizontal thickness over the vertical extent.
    pub fn mean_thickness(&self) -> f32 {
        if self.bounds.height <= 0 {
            return 0.0;
        }
        self.weight as f32 / self.bounds.height as f32
    }

    /// Longest run of consecutive rows without any pixel, inside the bounds.
    pub fn largest_row_gap(&self) -> i32 {
        let mut largest = 0;
        let mut last_y: Option<i32> = None;
        for span in &self.spans {
            if let Some(prev) = last_y {
                largest = largest.max(span.y - prev - 1);
            }
            last_y = Some(span.y);
        }
        largest
    }

    /// Mean absolute distance from pixel centers to the fitted axis.
    pub fn mean_distance_to_line(&self) -> f32 {
        let Some(line) = self.line() else {
            return 0.0;
        };
        let normal = [-line.dir[1], line.dir[0]];
        let sum: f32 = self
            .pixels()
            .map(|(x, y)| {
                let dx = x as f32 + 0.5 - line.center[0];
                let dy = y as f32 + 0.5 - line.center[1];
                (dx * normal[0] + dy * normal[1]).abs()
            })
            .sum();
        sum / self.weight.max(1) as f32
    }
}
