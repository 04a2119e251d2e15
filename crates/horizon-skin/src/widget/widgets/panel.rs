//! Panel widget implementation.

use std::sync::Arc;

use horizon_skin_core::Rect;
use horizon_skin_render::{BlendMode, Color, ImageBuffer};

use crate::skin::{AttributeSet, ParseContext};
use crate::widget::{Drawable, Widget, WidgetNode};

/// A passive container.
///
/// Draws an optional fill color and an optional skin image (placed at the
/// top-left corner, or tiled across the panel).
#[derive(Debug, Clone, Default)]
pub struct Panel {
    color: Option<Color>,
    image: Option<Arc<ImageBuffer>>,
    tile: bool,
}

impl Panel {
    /// An empty, transparent panel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fill color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the skin image.
    pub fn with_image(mut self, image: Arc<ImageBuffer>, tile: bool) -> Self {
        self.image = Some(image);
        self.tile = tile;
        self
    }

    /// The fill color.
    pub fn color(&self) -> Option<Color> {
        self.color
    }
}

impl Widget for Panel {
    fn kind(&self) -> &'static str {
        "Panel"
    }

    fn parse_attributes(&mut self, _node: &mut WidgetNode, attrs: &AttributeSet, cx: &mut ParseContext<'_>) {
        self.color = cx.color(attrs, "Color");
        self.image = cx.image(attrs, "Image");
        self.tile = cx.bool(attrs, "Tile", false);
    }

    fn as_drawable(&self) -> Option<&dyn Drawable> {
        Some(self)
    }
}

impl Drawable for Panel {
    fn draw(&self, node: &WidgetNode, target: &mut ImageBuffer, clip: &Rect) {
        let area = node.abs_rect();
        let Some(clip) = clip.intersect(&area) else {
            return;
        };
        if let Some(color) = self.color {
            target.fill_rect(&area, color, &clip, BlendMode::Alpha);
        }
        if let Some(image) = &self.image {
            if self.tile {
                target.tile(image, &area, &clip, BlendMode::Alpha);
            } else {
                target.draw_image(image, area.origin, &clip, BlendMode::Alpha);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_skin_core::{Point, Size};

    #[test]
    fn test_draw_is_clipped_to_node() {
        let panel = Panel::new().with_color(Color::GREEN);
        let node = WidgetNode::new(Rect::new(2, 2, 4, 4));
        let mut target = ImageBuffer::filled(Size::new(10, 10), Color::BLACK);

        panel.draw(&node, &mut target, &Rect::new(0, 0, 4, 10));
        assert_eq!(target.pixel(Point::new(3, 3)), Some(Color::GREEN));
        assert_eq!(target.pixel(Point::new(4, 3)), Some(Color::BLACK));
        assert_eq!(target.pixel(Point::new(1, 1)), Some(Color::BLACK));
    }

    #[test]
    fn test_tiled_image() {
        let tile = Arc::new(ImageBuffer::filled(Size::new(2, 2), Color::BLUE));
        let panel = Panel::new().with_image(tile, true);
        let node = WidgetNode::new(Rect::new(0, 0, 6, 6));
        let mut target = ImageBuffer::new(Size::new(8, 8));

        panel.draw(&node, &mut target, &Rect::new(0, 0, 8, 8));
        assert_eq!(target.pixel(Point::new(5, 5)), Some(Color::BLUE));
        assert_eq!(target.pixel(Point::new(6, 6)), Some(Color::TRANSPARENT));
    }
}
