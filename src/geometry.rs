//! Planar geometry shared by the stem pipeline.
//!
//! Coordinates follow the raster convention: `x` grows to the right, `y`
//! grows downwards. Integer boxes use exclusive right/bottom edges so that a
//! box of height `h` starting at `y` covers the rows `y..y + h`.

use serde::{Deserialize, Serialize};

const EPS: f32 = 1e-6;

/// Integer bounding box with exclusive right and bottom edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest box enclosing the two inclusive pixel corners.
    pub fn from_corners(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        let (xmin, xmax) = (x0.min(x1), x0.max(x1));
        let (ymin, ymax) = (y0.min(y1), y0.max(y1));
        Self::new(xmin, ymin, xmax - xmin + 1, ymax - ymin + 1)
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn center(&self) -> [f32; 2] {
        [
            self.x as f32 + self.width as f32 * 0.5,
            self.y as f32 + self.height as f32 * 0.5,
        ]
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x_overlap(other) > 0 && self.y_overlap(other) > 0
    }

    /// Signed vertical overlap; negative values measure the vertical gap.
    #[inline]
    pub fn y_overlap(&self, other: &Rect) -> i32 {
        self.bottom().min(other.bottom()) - self.y.max(other.y)
    }

    /// Signed horizontal overlap; negative values measure the horizontal gap.
    #[inline]
    pub fn x_overlap(&self, other: &Rect) -> i32 {
        self.right().min(other.right()) - self.x.max(other.x)
    }

    pub fn contains_point(&self, p: [f32; 2]) -> bool {
        p[0] >= self.x as f32
            && p[0] <= self.right() as f32
            && p[1] >= self.y as f32
            && p[1] <= self.bottom() as f32
    }
}

/// Directed line segment from a reference point towards a target point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisLine {
    pub p1: [f32; 2],
    pub p2: [f32; 2],
}

impl AxisLine {
    pub fn new(p1: [f32; 2], p2: [f32; 2]) -> Self {
        Self { p1, p2 }
    }

    /// +1 when travelling down the page, -1 when travelling up.
    #[inline]
    pub fn y_dir(&self) -> i32 {
        if self.p2[1] > self.p1[1] {
            1
        } else {
            -1
        }
    }

    /// An axis with no vertical extent cannot order stem items.
    pub fn is_degenerate(&self) -> bool {
        !(self.p1[0].is_finite()
            && self.p1[1].is_finite()
            && self.p2[0].is_finite()
            && self.p2[1].is_finite())
            || (self.p2[1] - self.p1[1]).abs() < EPS
    }

    pub fn length(&self) -> f32 {
        let dx = self.p2[0] - self.p1[0];
        let dy = self.p2[1] - self.p1[1];
        (dx * dx + dy * dy).sqrt()
    }

    /// Integer bounds of the segment (zero width for a vertical axis).
    pub fn bounds(&self) -> Rect {
        let x0 = self.p1[0].min(self.p2[0]).floor() as i32;
        let x1 = self.p1[0].max(self.p2[0]).ceil() as i32;
        let y0 = self.p1[1].min(self.p2[1]).floor() as i32;
        let y1 = self.p1[1].max(self.p2[1]).ceil() as i32;
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Abscissa of the infinite line at ordinate `y`.
    pub fn x_at_y(&self, y: f32) -> f32 {
        let dy = self.p2[1] - self.p1[1];
        if dy.abs() < EPS {
            return self.p1[0];
        }
        self.p1[0] + (y - self.p1[1]) * (self.p2[0] - self.p1[0]) / dy
    }

    /// Squared distance from `p` to the infinite line through the axis.
    pub fn dist_sq(&self, p: [f32; 2]) -> f32 {
        let dx = self.p2[0] - self.p1[0];
        let dy = self.p2[1] - self.p1[1];
        let len_sq = dx * dx + dy * dy;
        if len_sq < EPS {
            let ex = p[0] - self.p1[0];
            let ey = p[1] - self.p1[1];
            return ex * ex + ey * ey;
        }
        let cross = dx * (p[1] - self.p1[1]) - dy * (p[0] - self.p1[0]);
        cross * cross / len_sq
    }

    pub fn dist(&self, p: [f32; 2]) -> f32 {
        self.dist_sq(p).sqrt()
    }
}

/// Closed polygon bounding the shapes relevant to one anchor.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LookupArea {
    pub vertices: Vec<[f32; 2]>,
}

impl LookupArea {
    pub fn new(vertices: Vec<[f32; 2]>) -> Self {
        Self { vertices }
    }

    pub fn from_rect(rect: &Rect) -> Self {
        let (x0, y0) = (rect.x as f32, rect.y as f32);
        let (x1, y1) = (rect.right() as f32, rect.bottom() as f32);
        Self::new(vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1]])
    }

    /// Quadrilateral following `axis`, widened by `dx_left` and `dx_right`
    /// on each side of the line (sides taken with respect to the page).
    pub fn around_axis(axis: &AxisLine, dx_left: f32, dx_right: f32) -> Self {
        let len = axis.length().max(EPS);
        let d = [
            (axis.p2[0] - axis.p1[0]) / len,
            (axis.p2[1] - axis.p1[1]) / len,
        ];
        // Unit normal pointing to the right of the page.
        let mut n = [-d[1], d[0]];
        if n[0] < 0.0 {
            n = [-n[0], -n[1]];
        }
        let shift = |p: [f32; 2], k: f32| [p[0] + n[0] * k, p[1] + n[1] * k];
        Self::new(vec![
            shift(axis.p1, -dx_left),
            shift(axis.p2, -dx_left),
            shift(axis.p2, dx_right),
            shift(axis.p1, dx_right),
        ])
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.len() < 3
    }

    pub fn bounds(&self) -> Rect {
        if self.vertices.is_empty() {
            return Rect::default();
        }
        let mut xmin = f32::INFINITY;
        let mut ymin = f32::INFINITY;
        let mut xmax = f32::NEG_INFINITY;
        let mut ymax = f32::NEG_INFINITY;
        for v in &self.vertices {
            xmin = xmin.min(v[0]);
            ymin = ymin.min(v[1]);
            xmax = xmax.max(v[0]);
            ymax = ymax.max(v[1]);
        }
        let x0 = xmin.floor() as i32;
        let y0 = ymin.floor() as i32;
        Rect::new(x0, y0, xmax.ceil() as i32 - x0, ymax.ceil() as i32 - y0)
    }

    /// Even-odd point containment test.
    pub fn contains(&self, p: [f32; 2]) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let vi = self.vertices[i];
            let vj = self.vertices[j];
            if (vi[1] > p[1]) != (vj[1] > p[1]) {
                let x = vj[0] + (p[1] - vj[1]) * (vi[0] - vj[0]) / (vi[1] - vj[1]);
                if p[0] < x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// True when the polygon and the (continuous) box share any point.
    pub fn intersects(&self, rect: &Rect) -> bool {
        if self.is_empty() {
            return false;
        }
        let x0 = rect.x as f32;
        let y0 = rect.y as f32;
        let x1 = rect.right().max(rect.x) as f32;
        let y1 = rect.bottom().max(rect.y) as f32;
        let own = self.bounds();
        if (own.right() as f32) < x0
            || (own.x as f32) > x1
            || (own.bottom() as f32) < y0
            || (own.y as f32) > y1
        {
            return false;
        }

        let corners = [[x0, y0], [x1, y0], [x1, y1], [x0, y1]];
        if corners.iter().any(|&c| self.contains(c)) {
            return true;
        }
        if self
            .vertices
            .iter()
            .any(|v| v[0] >= x0 && v[0] <= x1 && v[1] >= y0 && v[1] <= y1)
        {
            return true;
        }
        let n = self.vertices.len();
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            for k in 0..4 {
                if segments_intersect(a, b, corners[k], corners[(k + 1) % 4]) {
                    return true;
                }
            }
        }
        false
    }
}

fn orient(a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> f32 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

fn segments_intersect(a: [f32; 2], b: [f32; 2], c: [f32; 2], d: [f32; 2]) -> bool {
    let o1 = orient(a, b, c);
    let o2 = orient(a, b, d);
    let o3 = orient(c, d, a);
    let o4 = orient(c, d, b);
    (o1 * o2 <= 0.0) && (o3 * o4 <= 0.0)
}
