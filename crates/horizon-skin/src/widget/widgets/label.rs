//! Label widget implementation.
//!
//! A [`Label`] carries text painted in the post-draw pass, on top of the
//! composite image. Glyph rendering belongs to the platform text stack; the
//! core paints the background swatch and a bar covering the text's extent so
//! layout and clipping can be observed without a font engine.
//!
//! A label bound to a command adopts reflected values as usual and, when the
//! reflected command carries a parameter, shows the parameter as its text.

use horizon_skin_core::Rect;
use horizon_skin_render::{Color, DrawContext};

use crate::skin::{AttributeSet, ParseContext};
use crate::widget::{Drawable, Widget, WidgetCx, WidgetNode};

/// Nominal advance of one character of the text-metrics bar.
const CHAR_WIDTH: i32 = 6;

/// Nominal height of the text-metrics bar.
const LINE_HEIGHT: i32 = 10;

/// A text carrier.
#[derive(Debug, Clone)]
pub struct Label {
    text: String,
    background: Option<Color>,
    text_color: Color,
}

impl Default for Label {
    fn default() -> Self {
        Self {
            text: String::new(),
            background: None,
            text_color: Color::BLACK,
        }
    }
}

impl Label {
    /// An empty label.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a label with text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the background swatch.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// The text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Color of the text.
    pub fn text_color(&self) -> Color {
        self.text_color
    }

    /// Area covered by the text, in window coordinates.
    pub fn text_extent(&self, node: &WidgetNode) -> Rect {
        let area = node.abs_rect();
        let chars = i32::try_from(self.text.chars().count()).unwrap_or(i32::MAX);
        let width = chars.saturating_mul(CHAR_WIDTH).min(area.width());
        let height = LINE_HEIGHT.min(area.height());
        let top = area.top() + (area.height() - height) / 2;
        Rect::new(area.left(), top, width, height)
    }
}

impl Widget for Label {
    fn kind(&self) -> &'static str {
        "Label"
    }

    fn parse_attributes(&mut self, _node: &mut WidgetNode, attrs: &AttributeSet, cx: &mut ParseContext<'_>) {
        if let Some(text) = cx.string(attrs, "Text") {
            self.text = text;
        }
        self.background = cx.color(attrs, "Color");
        if let Some(color) = cx.color(attrs, "TextColor") {
            self.text_color = color;
        }
    }

    fn reflect_value(&mut self, cx: &mut WidgetCx<'_>, value: f32, param: &str) {
        cx.set_value_silently(value);
        if !param.is_empty() && param != self.text {
            self.text = param.to_string();
            cx.invalidate();
        }
    }

    fn as_drawable(&self) -> Option<&dyn Drawable> {
        Some(self)
    }
}

impl Drawable for Label {
    fn post_draw(&self, node: &WidgetNode, cx: &mut DrawContext<'_>) {
        let area = node.abs_rect();
        if !cx.is_visible(&area) {
            return;
        }
        if let Some(background) = self.background {
            cx.fill_rect(area, background);
        }
        let extent = self.text_extent(node);
        if !extent.is_empty() {
            cx.fill_rect(extent, self.text_color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_skin_core::{Point, Region, Size};
    use horizon_skin_render::ImageBuffer;

    #[test]
    fn test_text_extent_is_capped_by_node() {
        let label = Label::new().with_text("abcdefghij");
        let node = WidgetNode::new(Rect::new(10, 10, 40, 20));
        assert_eq!(label.text_extent(&node), Rect::new(10, 15, 40, 10));

        let short = Label::new().with_text("ab");
        assert_eq!(short.text_extent(&node).width(), 12);
    }

    #[test]
    fn test_post_draw_paints_swatch_and_text() {
        let label = Label::new().with_text("a").with_background(Color::WHITE);
        let node = WidgetNode::new(Rect::new(0, 0, 20, 20));
        let mut bitmap = ImageBuffer::new(Size::new(20, 20));
        let mut cx = DrawContext::new(&mut bitmap, Point::ZERO, Region::from(Rect::new(0, 0, 20, 20)));

        label.post_draw(&node, &mut cx);
        assert_eq!(bitmap.pixel(Point::new(2, 10)), Some(Color::BLACK));
        assert_eq!(bitmap.pixel(Point::new(15, 10)), Some(Color::WHITE));
    }
}
