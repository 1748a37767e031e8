use stem_detector::geometry::Rect;

pub const INK: u8 = 0;
pub const PAPER: u8 = 255;

/// White page of `width` x `height` with every rectangle filled in black.
pub fn page_with_strokes(width: usize, height: usize, strokes: &[Rect]) -> Vec<u8> {
    assert!(width > 0 && height > 0, "page dimensions must be positive");

    let mut page = vec![PAPER; width * height];
    for stroke in strokes {
        let x0 = stroke.x.max(0) as usize;
        let y0 = stroke.y.max(0) as usize;
        let x1 = (stroke.right().max(0) as usize).min(width);
        let y1 = (stroke.bottom().max(0) as usize).min(height);
        for y in y0..y1 {
            for x in x0..x1 {
                page[y * width + x] = INK;
            }
        }
    }
    page
}
