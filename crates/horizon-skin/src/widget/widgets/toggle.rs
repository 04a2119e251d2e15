//! Two-state button.

use std::sync::Arc;

use horizon_skin_core::{Point, Rect};
use horizon_skin_render::{BlendMode, Color, ImageBuffer};

use super::button::track_pressed;
use super::draw_at_node;
use crate::skin::{AttributeSet, ParseContext, StateImages};
use crate::widget::{Drawable, Focusable, Widget, WidgetCx, WidgetNode};

/// A button whose value flips between its minimum (off) and maximum (on).
#[derive(Debug, Clone, Default)]
pub struct Toggle {
    images: StateImages,
    on_image: Option<Arc<ImageBuffer>>,
    color: Option<Color>,
    on_color: Option<Color>,
}

impl Toggle {
    /// A toggle without skin images.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the node's value is at the "on" end of its range.
    pub fn is_on(node: &WidgetNode) -> bool {
        node.control()
            .is_some_and(|control| control.value() > (control.min() + control.max()) / 2.0)
    }
}

impl Widget for Toggle {
    fn kind(&self) -> &'static str {
        "Toggle"
    }

    fn interactive(&self) -> bool {
        true
    }

    fn parse_attributes(&mut self, node: &mut WidgetNode, attrs: &AttributeSet, cx: &mut ParseContext<'_>) {
        self.images = cx.state_images(attrs, node.size());
        if attrs.contains("OnImage") {
            self.on_image = Some(
                cx.image(attrs, "OnImage")
                    .unwrap_or_else(|| cx.placeholder(node.size())),
            );
        }
        self.color = cx.color(attrs, "Color");
        self.on_color = cx.color(attrs, "OnColor");
    }

    fn track_mouse_move(&mut self, cx: &mut WidgetCx<'_>, pos: Point) {
        track_pressed(cx, pos);
    }

    fn on_click(&mut self, cx: &mut WidgetCx<'_>) {
        let Some(control) = cx.node().control() else {
            return;
        };
        let next = if Toggle::is_on(cx.node()) {
            control.min()
        } else {
            control.max()
        };
        cx.set_value_and_emit(next);
    }

    fn as_drawable(&self) -> Option<&dyn Drawable> {
        Some(self)
    }

    fn as_focusable(&self) -> Option<&dyn Focusable> {
        Some(self)
    }
}

impl Drawable for Toggle {
    fn draw(&self, node: &WidgetNode, target: &mut ImageBuffer, clip: &Rect) {
        let on = Toggle::is_on(node);
        let image = match &self.on_image {
            Some(image) if on && node.is_enabled() => Some(&**image),
            _ => self.images.select(node),
        };
        if let Some(image) = image {
            draw_at_node(node, image, target, clip);
            return;
        }
        let color = if on { self.on_color.or(self.color) } else { self.color };
        if let Some(color) = color {
            target.fill_rect(&node.abs_rect(), color, clip, BlendMode::Alpha);
        }
    }
}

impl Focusable for Toggle {}
