//! Drawing context for the post-draw pass.
//!
//! After compositing, each repaint rectangle is copied into a temporary
//! [`ImageBuffer`] and handed to widgets for native-style drawing (text,
//! focus frames, native backgrounds). A [`DrawContext`] hides the buffer's
//! offset from the window: callers draw in window coordinates, and every
//! operation is clipped to the context's clip [`Region`], which excludes the
//! areas owned by native sub-windows.

use horizon_skin_core::{Point, Rect, Region};

use crate::image_buffer::ImageBuffer;
use crate::types::{BlendMode, Color};

/// A clipped, window-coordinate view onto a temporary bitmap.
#[derive(Debug)]
pub struct DrawContext<'a> {
    target: &'a mut ImageBuffer,
    /// Window position of the target's top-left pixel.
    origin: Point,
    /// Window-coordinate clip, always inside the target.
    clip: Region,
}

impl<'a> DrawContext<'a> {
    /// Create a context drawing into `target`, whose top-left pixel sits at
    /// `origin` in window coordinates.
    pub fn new(target: &'a mut ImageBuffer, origin: Point, clip: Region) -> Self {
        let bounds = target.rect().translate(origin);
        let clip = clip.intersect_rect(&bounds);
        Self {
            target,
            origin,
            clip,
        }
    }

    /// Window position of the bitmap's top-left pixel (the viewport origin).
    #[inline]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// The area drawing is allowed to touch, in window coordinates.
    #[inline]
    pub fn clip(&self) -> &Region {
        &self.clip
    }

    /// The bitmap's area in window coordinates.
    pub fn bounds(&self) -> Rect {
        self.target.rect().translate(self.origin)
    }

    /// Check whether drawing inside `rect` could change any pixel.
    pub fn is_visible(&self, rect: &Rect) -> bool {
        self.clip.intersects_rect(rect)
    }

    /// Narrow the clip further, for the duration of the returned context.
    pub fn clipped(&mut self, rect: &Rect) -> DrawContext<'_> {
        DrawContext {
            clip: self.clip.intersect_rect(rect),
            target: &mut *self.target,
            origin: self.origin,
        }
    }

    /// Fill a window-coordinate rectangle.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let local = self.to_local(rect);
        self.for_each_clip(|target, clip| {
            target.fill_rect(&local, color, clip, BlendMode::Alpha);
        });
    }

    /// Draw a one pixel frame just inside a window-coordinate rectangle.
    pub fn stroke_rect(&mut self, rect: Rect, color: Color) {
        let local = self.to_local(rect);
        self.for_each_clip(|target, clip| target.stroke_rect(&local, color, clip));
    }

    /// Draw an image with its top-left corner at a window position.
    pub fn draw_image(&mut self, image: &ImageBuffer, at: Point, mode: BlendMode) {
        let local = at.delta_from(self.origin);
        self.for_each_clip(|target, clip| target.draw_image(image, local, clip, mode));
    }

    fn to_local(&self, rect: Rect) -> Rect {
        rect.offset(-self.origin.x, -self.origin.y)
    }

    fn for_each_clip(&mut self, mut draw: impl FnMut(&mut ImageBuffer, &Rect)) {
        for rect in &self.clip {
            let local = rect.offset(-self.origin.x, -self.origin.y);
            draw(&mut *self.target, &local);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_skin_core::Size;

    #[test]
    fn test_draws_in_window_coordinates() {
        let mut bitmap = ImageBuffer::filled(Size::new(10, 10), Color::BLACK);
        let origin = Point::new(100, 50);
        let mut ctx = DrawContext::new(&mut bitmap, origin, Region::from(Rect::new(0, 0, 500, 500)));

        ctx.fill_rect(Rect::new(102, 52, 2, 2), Color::RED);
        assert_eq!(bitmap.pixel(Point::new(2, 2)), Some(Color::RED));
        assert_eq!(bitmap.pixel(Point::new(4, 4)), Some(Color::BLACK));
    }

    #[test]
    fn test_clip_region_excludes_hole() {
        let mut bitmap = ImageBuffer::filled(Size::new(10, 10), Color::BLACK);
        let mut clip = Region::from(Rect::new(0, 0, 10, 10));
        clip.subtract_rect(&Rect::new(4, 4, 2, 2));

        let mut ctx = DrawContext::new(&mut bitmap, Point::ZERO, clip);
        ctx.fill_rect(Rect::new(0, 0, 10, 10), Color::WHITE);

        assert_eq!(bitmap.pixel(Point::new(0, 0)), Some(Color::WHITE));
        assert_eq!(bitmap.pixel(Point::new(4, 4)), Some(Color::BLACK));
        assert_eq!(bitmap.pixel(Point::new(6, 6)), Some(Color::WHITE));
    }

    #[test]
    fn test_clip_is_limited_to_bitmap() {
        let mut bitmap = ImageBuffer::new(Size::new(10, 10));
        let ctx = DrawContext::new(&mut bitmap, Point::new(5, 5), Region::from(Rect::new(0, 0, 100, 100)));
        assert_eq!(ctx.clip().bounds(), Some(Rect::new(5, 5, 10, 10)));
        assert!(!ctx.is_visible(&Rect::new(0, 0, 5, 5)));
    }

    #[test]
    fn test_nested_clip() {
        let mut bitmap = ImageBuffer::filled(Size::new(10, 10), Color::BLACK);
        let mut ctx = DrawContext::new(&mut bitmap, Point::ZERO, Region::from(Rect::new(0, 0, 10, 10)));
        ctx.clipped(&Rect::new(0, 0, 3, 3)).fill_rect(Rect::new(0, 0, 10, 10), Color::GREEN);
        ctx.stroke_rect(Rect::new(5, 5, 5, 5), Color::BLUE);

        assert_eq!(bitmap.pixel(Point::new(2, 2)), Some(Color::GREEN));
        assert_eq!(bitmap.pixel(Point::new(3, 3)), Some(Color::BLACK));
        assert_eq!(bitmap.pixel(Point::new(5, 7)), Some(Color::BLUE));
        assert_eq!(bitmap.pixel(Point::new(7, 7)), Some(Color::BLACK));
    }
}
