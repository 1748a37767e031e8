use crate::geometry::Rect;

/// Borrowed 8-bit page raster where dark pixels are foreground (ink).
#[derive(Clone, Copy, Debug)]
pub struct ImageU8<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize, // bytes between rows
    pub data: &'a [u8],
}

impl<'a> ImageU8<'a> {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.stride + x]
    }

    /// Ink test against a binarization threshold (`value < threshold`).
    #[inline]
    pub fn is_foreground(&self, x: usize, y: usize, threshold: u8) -> bool {
        self.get(x, y) < threshold
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.w as i32, self.h as i32)
    }

    /// Ink pixels `(x, y)` inside `rect`, clipped to the raster.
    pub fn foreground_in(&self, rect: &Rect, threshold: u8) -> Vec<(i32, i32)> {
        let (x0, x1) = (rect.x.max(0), rect.right().min(self.w as i32));
        let (y0, y1) = (rect.y.max(0), rect.bottom().min(self.h as i32));
        let mut pixels = Vec::new();
        for y in y0..y1 {
            for x in x0..x1 {
                if self.is_foreground(x as usize, y as usize, threshold) {
                    pixels.push((x, y));
                }
            }
        }
        pixels
    }
}
