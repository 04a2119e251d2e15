//! CPU-side RGBA pixel buffers.
//!
//! [`ImageBuffer`] wraps an `image::RgbaImage` and adds the operations the
//! compositor needs: clipped opaque and alpha blits, tiling, solid fills and
//! sub-image extraction. All coordinates are integer pixels; every operation
//! clips against the buffer bounds and the caller's clip rectangle, so
//! out-of-range requests draw nothing instead of failing.
//!
//! # Example
//!
//! ```
//! use horizon_skin_core::{Point, Rect, Size};
//! use horizon_skin_render::{BlendMode, Color, ImageBuffer};
//!
//! let mut target = ImageBuffer::filled(Size::new(64, 64), Color::BLACK);
//! let sprite = ImageBuffer::filled(Size::new(16, 16), Color::RED);
//!
//! target.blit(&sprite, sprite.rect(), Point::new(8, 8), &target.rect(), BlendMode::Alpha);
//! assert_eq!(target.pixel(Point::new(10, 10)), Some(Color::RED));
//! ```

use horizon_skin_core::{Point, Rect, Size};
use image::RgbaImage;

use crate::error::{RenderError, RenderResult};
use crate::types::{BlendMode, Color};

/// An owned RGBA pixel buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    inner: RgbaImage,
}

impl ImageBuffer {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Create a transparent buffer. Negative dimensions are treated as zero.
    pub fn new(size: Size) -> Self {
        let (width, height) = dims(size);
        Self {
            inner: RgbaImage::new(width, height),
        }
    }

    /// Create a buffer filled with a solid color.
    pub fn filled(size: Size, color: Color) -> Self {
        let (width, height) = dims(size);
        Self {
            inner: RgbaImage::from_pixel(width, height, color.to_rgba()),
        }
    }

    /// Synthesize a placeholder of the given size.
    ///
    /// Used when a skin image is missing or its state images disagree in
    /// size. The placeholder is a solid fill with a one pixel black frame so
    /// its bounds stay visible against a fill of the same color.
    pub fn placeholder(size: Size, color: Color) -> Self {
        let mut buffer = Self::filled(size, color);
        let rect = buffer.rect();
        buffer.stroke_rect(&rect, Color::BLACK, &rect);
        buffer
    }

    /// Wrap raw RGBA bytes.
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> RenderResult<Self> {
        let len = data.len();
        RgbaImage::from_raw(width, height, data)
            .map(|inner| Self { inner })
            .ok_or(RenderError::BufferSize { width, height, len })
    }

    /// Decode an encoded image (any format the `image` crate was built with).
    pub fn from_bytes(bytes: &[u8]) -> RenderResult<Self> {
        let decoded = image::load_from_memory(bytes)?;
        Ok(Self {
            inner: decoded.to_rgba8(),
        })
    }

    /// Wrap an existing `image` buffer.
    pub fn from_image(inner: RgbaImage) -> Self {
        Self { inner }
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> i32 {
        to_i32(self.inner.width())
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> i32 {
        to_i32(self.inner.height())
    }

    /// Size in pixels.
    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// The buffer bounds, anchored at the origin.
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_size(self.size())
    }

    /// Check whether the buffer has no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size().is_empty()
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_raw(&self) -> &[u8] {
        self.inner.as_raw()
    }

    /// The wrapped `image` buffer.
    pub fn as_inner(&self) -> &RgbaImage {
        &self.inner
    }

    /// Unwrap into the `image` buffer.
    pub fn into_inner(self) -> RgbaImage {
        self.inner
    }

    // =========================================================================
    // Pixel access
    // =========================================================================

    /// Read a pixel, or `None` outside the buffer.
    pub fn pixel(&self, at: Point) -> Option<Color> {
        self.rect()
            .contains(at)
            .then(|| Color::from_pixel(*self.inner.get_pixel(at.x as u32, at.y as u32)))
    }

    /// Write a pixel. Writes outside the buffer are ignored.
    pub fn set_pixel(&mut self, at: Point, color: Color) {
        if self.rect().contains(at) {
            self.inner.put_pixel(at.x as u32, at.y as u32, color.to_rgba());
        }
    }

    /// Extract a copy of the pixels inside `rect`.
    ///
    /// Returns `None` unless `rect` is non-empty and lies entirely inside the
    /// buffer.
    pub fn sub_image(&self, rect: &Rect) -> Option<ImageBuffer> {
        if rect.is_empty() || !self.rect().contains_rect(rect) {
            return None;
        }
        let view = image::imageops::crop_imm(
            &self.inner,
            rect.left() as u32,
            rect.top() as u32,
            rect.width() as u32,
            rect.height() as u32,
        );
        Some(Self {
            inner: view.to_image(),
        })
    }

    // =========================================================================
    // Drawing
    // =========================================================================

    /// Fill `rect` with a color, clipped to `clip`.
    pub fn fill_rect(&mut self, rect: &Rect, color: Color, clip: &Rect, mode: BlendMode) {
        let Some(area) = self.clip_to_bounds(rect, clip) else {
            return;
        };
        let src = color.to_rgba().0;
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                let dst = self.inner.get_pixel_mut(x as u32, y as u32);
                dst.0 = blend(src, dst.0, mode);
            }
        }
    }

    /// Draw a one pixel frame just inside `rect`, clipped to `clip`.
    pub fn stroke_rect(&mut self, rect: &Rect, color: Color, clip: &Rect) {
        if rect.is_empty() {
            return;
        }
        let (l, t, r, b) = (rect.left(), rect.top(), rect.right(), rect.bottom());
        for edge in [
            Rect::from_ltrb(l, t, r, t + 1),
            Rect::from_ltrb(l, b - 1, r, b),
            Rect::from_ltrb(l, t, l + 1, b),
            Rect::from_ltrb(r - 1, t, r, b),
        ] {
            self.fill_rect(&edge, color, clip, BlendMode::Alpha);
        }
    }

    /// Copy `src_rect` of `src` so that its top-left corner lands on `dest`.
    ///
    /// The destination is clipped to `clip` and to this buffer; the source
    /// rectangle is clipped to `src`.
    pub fn blit(
        &mut self,
        src: &ImageBuffer,
        src_rect: Rect,
        dest: Point,
        clip: &Rect,
        mode: BlendMode,
    ) {
        let Some(clipped) = src_rect.intersect(&src.rect()) else {
            return;
        };
        // Clipping the source shifts where its first pixel lands.
        let dest = dest.offset(
            clipped.left() - src_rect.left(),
            clipped.top() - src_rect.top(),
        );
        let src_rect = clipped;
        let target = Rect {
            origin: dest,
            size: src_rect.size,
        };
        let Some(area) = self.clip_to_bounds(&target, clip) else {
            return;
        };

        let dx = src_rect.left() - dest.x;
        let dy = src_rect.top() - dest.y;
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                let s = src.inner.get_pixel((x + dx) as u32, (y + dy) as u32).0;
                let d = self.inner.get_pixel_mut(x as u32, y as u32);
                d.0 = blend(s, d.0, mode);
            }
        }
    }

    /// Blit the whole of `src` at `dest`.
    pub fn draw_image(&mut self, src: &ImageBuffer, dest: Point, clip: &Rect, mode: BlendMode) {
        self.blit(src, src.rect(), dest, clip, mode);
    }

    /// Repeat `src` across `area`, starting at its top-left corner.
    pub fn tile(&mut self, src: &ImageBuffer, area: &Rect, clip: &Rect, mode: BlendMode) {
        if src.is_empty() {
            return;
        }
        let Some(clip) = area.intersect(clip) else {
            return;
        };
        // Skip whole tiles left of and above the clip.
        let first_x = area.left() + (clip.left() - area.left()) / src.width() * src.width();
        let first_y = area.top() + (clip.top() - area.top()) / src.height() * src.height();

        let mut y = first_y;
        while y < clip.bottom() {
            let mut x = first_x;
            while x < clip.right() {
                self.draw_image(src, Point::new(x, y), &clip, mode);
                x += src.width();
            }
            y += src.height();
        }
    }

    fn clip_to_bounds(&self, rect: &Rect, clip: &Rect) -> Option<Rect> {
        rect.intersect(clip)?.intersect(&self.rect())
    }
}

impl std::fmt::Debug for ImageBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageBuffer")
            .field("width", &self.inner.width())
            .field("height", &self.inner.height())
            .finish()
    }
}

/// Source-over for straight alpha, or a plain copy.
#[inline]
fn blend(src: [u8; 4], dst: [u8; 4], mode: BlendMode) -> [u8; 4] {
    let sa = u32::from(src[3]);
    match mode {
        BlendMode::Opaque => src,
        BlendMode::Alpha if sa == 255 => src,
        BlendMode::Alpha if sa == 0 => dst,
        BlendMode::Alpha => {
            let da = u32::from(dst[3]);
            let inv = 255 - sa;
            // Output alpha scaled by 255.
            let out_a = sa * 255 + da * inv;
            if out_a == 0 {
                return [0, 0, 0, 0];
            }
            let channel = |i: usize| {
                let c = (u32::from(src[i]) * sa * 255 + u32::from(dst[i]) * da * inv) / out_a;
                c.min(255) as u8
            };
            [
                channel(0),
                channel(1),
                channel(2),
                ((out_a + 127) / 255).min(255) as u8,
            ]
        }
    }
}

fn dims(size: Size) -> (u32, u32) {
    (size.width.max(0) as u32, size.height.max(0) as u32)
}

fn to_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> ImageBuffer {
        let mut img = ImageBuffer::filled(Size::new(2, 2), Color::WHITE);
        img.set_pixel(Point::new(1, 0), Color::BLACK);
        img.set_pixel(Point::new(0, 1), Color::BLACK);
        img
    }

    #[test]
    fn test_fill_is_clipped() {
        let mut img = ImageBuffer::filled(Size::new(10, 10), Color::BLACK);
        img.fill_rect(
            &Rect::new(-5, -5, 10, 10),
            Color::RED,
            &Rect::new(0, 0, 3, 3),
            BlendMode::Opaque,
        );
        assert_eq!(img.pixel(Point::new(2, 2)), Some(Color::RED));
        assert_eq!(img.pixel(Point::new(3, 3)), Some(Color::BLACK));
        assert_eq!(img.pixel(Point::new(4, 0)), Some(Color::BLACK));
    }

    #[test]
    fn test_blit_source_offset_and_clip() {
        let mut src = ImageBuffer::filled(Size::new(4, 4), Color::BLUE);
        src.set_pixel(Point::new(2, 2), Color::GREEN);
        let mut dst = ImageBuffer::filled(Size::new(8, 8), Color::BLACK);

        dst.blit(
            &src,
            Rect::new(2, 2, 2, 2),
            Point::new(5, 5),
            &dst.rect(),
            BlendMode::Opaque,
        );
        assert_eq!(dst.pixel(Point::new(5, 5)), Some(Color::GREEN));
        assert_eq!(dst.pixel(Point::new(6, 6)), Some(Color::BLUE));
        assert_eq!(dst.pixel(Point::new(4, 4)), Some(Color::BLACK));
        assert_eq!(dst.pixel(Point::new(7, 7)), Some(Color::BLACK));
    }

    #[test]
    fn test_blit_negative_destination() {
        let src = checker();
        let mut dst = ImageBuffer::filled(Size::new(4, 4), Color::RED);
        dst.draw_image(&src, Point::new(-1, -1), &dst.rect(), BlendMode::Opaque);
        // Only the source's bottom-right pixel lands inside.
        assert_eq!(dst.pixel(Point::new(0, 0)), Some(Color::WHITE));
        assert_eq!(dst.pixel(Point::new(1, 0)), Some(Color::RED));
    }

    #[test]
    fn test_alpha_blend() {
        let mut dst = ImageBuffer::filled(Size::new(1, 1), Color::BLACK);
        let half_white = ImageBuffer::filled(Size::new(1, 1), Color::WHITE.with_alpha(128));
        dst.draw_image(&half_white, Point::ZERO, &dst.rect(), BlendMode::Alpha);

        let p = dst.pixel(Point::ZERO).unwrap();
        assert!((127..=129).contains(&p.r), "{p:?}");
        assert_eq!(p.a, 255);

        let clear = ImageBuffer::new(Size::new(1, 1));
        dst.draw_image(&clear, Point::ZERO, &dst.rect(), BlendMode::Alpha);
        assert_eq!(dst.pixel(Point::ZERO), Some(p));

        dst.draw_image(&clear, Point::ZERO, &dst.rect(), BlendMode::Opaque);
        assert_eq!(dst.pixel(Point::ZERO), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_tile_repeats_pattern() {
        let mut dst = ImageBuffer::new(Size::new(5, 5));
        dst.tile(&checker(), &dst.rect(), &Rect::new(2, 2, 3, 3), BlendMode::Opaque);

        assert_eq!(dst.pixel(Point::new(1, 1)), Some(Color::TRANSPARENT));
        assert_eq!(dst.pixel(Point::new(2, 2)), Some(Color::WHITE));
        assert_eq!(dst.pixel(Point::new(3, 2)), Some(Color::BLACK));
        assert_eq!(dst.pixel(Point::new(4, 4)), Some(Color::WHITE));
    }

    #[test]
    fn test_sub_image_bounds() {
        let img = checker();
        let sub = img.sub_image(&Rect::new(1, 0, 1, 2)).unwrap();
        assert_eq!(sub.size(), Size::new(1, 2));
        assert_eq!(sub.pixel(Point::ZERO), Some(Color::BLACK));
        assert!(img.sub_image(&Rect::new(1, 1, 2, 2)).is_none());
        assert!(img.sub_image(&Rect::ZERO).is_none());
    }

    #[test]
    fn test_placeholder_has_frame() {
        let img = ImageBuffer::placeholder(Size::new(4, 4), Color::RED);
        assert_eq!(img.pixel(Point::ZERO), Some(Color::BLACK));
        assert_eq!(img.pixel(Point::new(1, 1)), Some(Color::RED));
    }

    #[test]
    fn test_from_rgba_checks_length() {
        assert!(ImageBuffer::from_rgba(vec![0; 16], 2, 2).is_ok());
        assert!(matches!(
            ImageBuffer::from_rgba(vec![0; 15], 2, 2),
            Err(RenderError::BufferSize { len: 15, .. })
        ));
    }
}
