use crate::buffer::BaseAddressLock;

/// Where device row 0 of a drawing context sits in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Device row 0 is the first row in memory.
    TopLeft,
    /// Device row 0 is the last row in memory (bitmap-context convention).
    BottomLeft,
}

/// Vertical part of the current transformation matrix: `y' = scale * y + translate`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct VerticalTransform {
    scale: f64,
    translate: f64,
}

impl VerticalTransform {
    const IDENTITY: Self = Self {
        scale: 1.0,
        translate: 0.0,
    };

    fn apply(&self, y: f64) -> f64 {
        self.scale * y + self.translate
    }
}

/// 2D drawing context over a locked pixel buffer.
///
/// Only the vertical axis carries a transform; horizontal coordinates map
/// one to one.
pub struct BitmapContext<'lock, 'buf> {
    target: &'lock mut BaseAddressLock<'buf>,
    origin: Origin,
    ctm: VerticalTransform,
}

impl<'lock, 'buf> BitmapContext<'lock, 'buf> {
    pub fn new(target: &'lock mut BaseAddressLock<'buf>, origin: Origin) -> Self {
        Self {
            target,
            origin,
            ctm: VerticalTransform::IDENTITY,
        }
    }

    /// Prepend a vertical translation to the current transform.
    pub fn translate_by(&mut self, ty: f64) {
        self.ctm.translate += self.ctm.scale * ty;
    }

    /// Prepend a vertical scale to the current transform.
    pub fn scale_by(&mut self, sy: f64) {
        self.ctm.scale *= sy;
    }

    /// Make user row 0 the top row in memory.
    ///
    /// Bottom-left contexts need the flip: translate by the height, then
    /// mirror Y. Top-left contexts are already upright.
    pub fn flip_to_top_left(&mut self) {
        if self.origin == Origin::BottomLeft {
            self.translate_by(self.target.height() as f64);
            self.scale_by(-1.0);
        }
    }

    /// Draw a packed RGB image that exactly covers the context rectangle.
    ///
    /// Rows mapped outside the buffer are clipped. The alpha slot is written
    /// as opaque.
    pub fn draw_rgb(&mut self, rgb: &[u8], width: u32, height: u32) {
        let _s = common::span_debug!("draw_rgb");

        debug_assert_eq!(width, self.target.width());
        debug_assert_eq!(height, self.target.height());
        debug_assert_eq!(rgb.len(), width as usize * height as usize * 3);

        let format = self.target.pixel_format();
        let bpp = format.bytes_per_pixel();
        let offsets = format.rgb_offsets();
        let alpha = format.alpha_offset();
        let stride = self.target.bytes_per_row();
        let rows = self.target.height() as i64;
        let src_row_len = width as usize * 3;

        for (y, src_row) in rgb.chunks_exact(src_row_len).enumerate() {
            let Some(memory_row) = self.memory_row(y as f64, rows) else {
                continue;
            };

            let dst_start = memory_row * stride;
            let dst_row = &mut self.target[dst_start..dst_start + width as usize * bpp];

            for (dst, src) in dst_row.chunks_exact_mut(bpp).zip(src_row.chunks_exact(3)) {
                dst[offsets[0]] = src[0];
                dst[offsets[1]] = src[1];
                dst[offsets[2]] = src[2];
                dst[alpha] = u8::MAX;
            }
        }
    }

    /// Memory row covered by the unit user-space row starting at `y`.
    fn memory_row(&self, y: f64, rows: i64) -> Option<usize> {
        let a = self.ctm.apply(y);
        let b = self.ctm.apply(y + 1.0);
        let device_row = a.min(b).floor() as i64;

        if !(0..rows).contains(&device_row) {
            return None;
        }

        let memory_row = match self.origin {
            Origin::TopLeft => device_row,
            Origin::BottomLeft => rows - 1 - device_row,
        };
        Some(memory_row as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ModelInputBuffer, PixelFormat};

    /// Two rows: red on top, blue below.
    const RED_OVER_BLUE: [u8; 6] = [255, 0, 0, 0, 0, 255];

    fn draw(origin: Origin, flip: bool) -> ModelInputBuffer {
        let mut buffer = ModelInputBuffer::allocate(1, 2, PixelFormat::Argb32).unwrap();
        {
            let mut lock = buffer.lock();
            let mut ctx = BitmapContext::new(&mut lock, origin);
            if flip {
                ctx.flip_to_top_left();
            }
            ctx.draw_rgb(&RED_OVER_BLUE, 1, 2);
        }
        buffer
    }

    #[test]
    fn test_flipped_bottom_left_context_is_upright() {
        let buffer = draw(Origin::BottomLeft, true);
        assert_eq!(buffer.rgb_at(0, 0), [255, 0, 0], "top row should be red");
        assert_eq!(buffer.rgb_at(0, 1), [0, 0, 255], "bottom row should be blue");
    }

    #[test]
    fn test_unflipped_bottom_left_context_is_upside_down() {
        let buffer = draw(Origin::BottomLeft, false);
        assert_eq!(buffer.rgb_at(0, 0), [0, 0, 255]);
        assert_eq!(buffer.rgb_at(0, 1), [255, 0, 0]);
    }

    #[test]
    fn test_top_left_context_needs_no_flip() {
        let plain = draw(Origin::TopLeft, false);
        let flipped = draw(Origin::TopLeft, true);
        assert_eq!(plain.as_bytes(), flipped.as_bytes());
        assert_eq!(plain.rgb_at(0, 0), [255, 0, 0]);
    }

    #[test]
    fn test_padding_byte_is_opaque() {
        let buffer = draw(Origin::BottomLeft, true);
        assert_eq!(buffer.as_bytes()[0], 0xFF);
        assert_eq!(&buffer.as_bytes()[1..4], &[255, 0, 0]);
    }

    #[test]
    fn test_transform_composition_order() {
        let mut buffer = ModelInputBuffer::allocate(1, 4, PixelFormat::Argb32).unwrap();
        let mut lock = buffer.lock();
        let mut ctx = BitmapContext::new(&mut lock, Origin::BottomLeft);
        ctx.translate_by(4.0);
        ctx.scale_by(-1.0);
        assert_eq!(ctx.ctm.apply(0.0), 4.0);
        assert_eq!(ctx.ctm.apply(1.0), 3.0);
        assert_eq!(ctx.ctm.apply(4.0), 0.0);
    }
}
