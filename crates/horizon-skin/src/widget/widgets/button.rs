//! Momentary push button.

use horizon_skin_core::{Point, Rect};
use horizon_skin_render::{BlendMode, Color, ImageBuffer};

use super::draw_at_node;
use crate::skin::{AttributeSet, ParseContext, StateImages};
use crate::widget::{Drawable, Focusable, Widget, WidgetCx, WidgetNode};

/// A push button.
///
/// The pressed look follows the pointer while the button holds capture, so
/// dragging off the button before releasing cancels the click visually as
/// well. A click emits the button's command with its value.
#[derive(Debug, Clone, Default)]
pub struct Button {
    images: StateImages,
    color: Option<Color>,
}

impl Button {
    /// A button without skin images.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the state images.
    pub fn with_images(mut self, images: StateImages) -> Self {
        self.images = images;
        self
    }

    /// The state images.
    pub fn images(&self) -> &StateImages {
        &self.images
    }
}

/// Update the pressed look from the pointer position while tracking.
pub(crate) fn track_pressed(cx: &mut WidgetCx<'_>, pos: Point) {
    let inside = Rect::from_size(cx.node().size()).contains(pos);
    if cx.node().pressed != inside {
        cx.node_mut().pressed = inside;
        cx.invalidate();
    }
}

impl Widget for Button {
    fn kind(&self) -> &'static str {
        "Button"
    }

    fn interactive(&self) -> bool {
        true
    }

    fn parse_attributes(&mut self, node: &mut WidgetNode, attrs: &AttributeSet, cx: &mut ParseContext<'_>) {
        self.images = cx.state_images(attrs, node.size());
        self.color = cx.color(attrs, "Color");
    }

    fn track_mouse_move(&mut self, cx: &mut WidgetCx<'_>, pos: Point) {
        track_pressed(cx, pos);
    }

    fn as_drawable(&self) -> Option<&dyn Drawable> {
        Some(self)
    }

    fn as_focusable(&self) -> Option<&dyn Focusable> {
        Some(self)
    }
}

impl Drawable for Button {
    fn draw(&self, node: &WidgetNode, target: &mut ImageBuffer, clip: &Rect) {
        if let Some(image) = self.images.select(node) {
            draw_at_node(node, image, target, clip);
        } else if let Some(color) = self.color {
            target.fill_rect(&node.abs_rect(), color, clip, BlendMode::Alpha);
        }
    }
}

impl Focusable for Button {}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_skin_core::Size;
    use std::sync::Arc;

    #[test]
    fn test_draws_state_image() {
        let images = StateImages {
            normal: Some(Arc::new(ImageBuffer::filled(Size::new(4, 4), Color::GREEN))),
            pressed: Some(Arc::new(ImageBuffer::filled(Size::new(4, 4), Color::BLUE))),
            ..StateImages::default()
        };
        let button = Button::new().with_images(images);
        let mut node = WidgetNode::new(Rect::new(2, 2, 4, 4));
        let mut target = ImageBuffer::new(Size::new(8, 8));
        let full = target.rect();

        button.draw(&node, &mut target, &full);
        assert_eq!(target.pixel(Point::new(3, 3)), Some(Color::GREEN));

        node.pressed = true;
        button.draw(&node, &mut target, &full);
        assert_eq!(target.pixel(Point::new(3, 3)), Some(Color::BLUE));
        assert_eq!(target.pixel(Point::new(7, 7)), Some(Color::TRANSPARENT));
    }
}
