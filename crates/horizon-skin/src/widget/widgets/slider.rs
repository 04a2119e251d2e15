//! Slider widget implementation.
//!
//! A [`Slider`] maps the pointer position along its axis to an absolute
//! value. The value approaches that target through the control's delta
//! filter: every move feeds the remaining distance as the raw delta, and
//! stationary track-timer ticks keep feeding it until the value arrives.

use std::str::FromStr;
use std::sync::Arc;

use horizon_skin_core::{Key, Modifiers, Point, Rect};
use horizon_skin_render::{BlendMode, Color, ImageBuffer};

use super::{analog_key, apply_filtered, draw_at_node, nudge_value};
use crate::skin::{AttributeSet, ParseContext};
use crate::widget::{Drawable, Focusable, Widget, WidgetCx, WidgetNode};

/// Axis of a slider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Orientation {
    /// Minimum on the left.
    #[default]
    Horizontal,
    /// Minimum at the bottom.
    Vertical,
}

impl FromStr for Orientation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" | "h" => Ok(Self::Horizontal),
            "vertical" | "v" => Ok(Self::Vertical),
            _ => Err(()),
        }
    }
}

/// A linear analog control.
#[derive(Debug, Clone)]
pub struct Slider {
    orientation: Orientation,
    track: Option<Arc<ImageBuffer>>,
    thumb: Option<Arc<ImageBuffer>>,
    thumb_color: Color,
    step: f32,
    target: Option<f32>,
}

impl Default for Slider {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            track: None,
            thumb: None,
            thumb_color: Color::GRAY,
            step: 0.05,
            target: None,
        }
    }
}

impl Slider {
    /// A horizontal slider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the orientation.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// The orientation.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Normalized position of a widget-local point along the axis.
    pub fn position_to_normalized(&self, node: &WidgetNode, pos: Point) -> f32 {
        let size = node.size();
        let t = match self.orientation {
            Orientation::Horizontal => pos.x as f32 / (size.width - 1).max(1) as f32,
            Orientation::Vertical => 1.0 - pos.y as f32 / (size.height - 1).max(1) as f32,
        };
        t.clamp(0.0, 1.0)
    }

    /// The thumb rectangle for the node's value, in window coordinates.
    pub fn thumb_rect(&self, node: &WidgetNode) -> Rect {
        let area = node.abs_rect();
        let normalized = node.control().map_or(0.0, |control| control.normalized());
        let thumb = self.thumb.as_ref().map(|image| image.size());
        match self.orientation {
            Orientation::Horizontal => {
                let width = thumb.map_or(area.height().min(area.width()), |s| s.width);
                let x = ((area.width() - width).max(0) as f32 * normalized).round() as i32;
                Rect::new(area.left() + x, area.top(), width, area.height())
            }
            Orientation::Vertical => {
                let height = thumb.map_or(area.width().min(area.height()), |s| s.height);
                let y = ((area.height() - height).max(0) as f32 * (1.0 - normalized)).round() as i32;
                Rect::new(area.left(), area.top() + y, area.width(), height)
            }
        }
    }

    fn chase_target(&self, cx: &mut WidgetCx<'_>) {
        let Some(target) = self.target else {
            return;
        };
        let Some(control) = cx.node().control() else {
            return;
        };
        let raw = target - control.value();
        apply_filtered(cx, raw);
    }

    fn track_to(&mut self, cx: &mut WidgetCx<'_>, pos: Point) {
        let normalized = self.position_to_normalized(cx.node(), pos);
        let Some(control) = cx.node().control() else {
            return;
        };
        self.target = Some(control.min() + normalized * (control.max() - control.min()));
        self.chase_target(cx);
    }
}

impl Widget for Slider {
    fn kind(&self) -> &'static str {
        "Slider"
    }

    fn interactive(&self) -> bool {
        true
    }

    fn wants_track_timer(&self) -> bool {
        true
    }

    fn parse_attributes(&mut self, node: &mut WidgetNode, attrs: &AttributeSet, cx: &mut ParseContext<'_>) {
        if let Some(raw) = attrs.get("Orientation") {
            match raw.parse() {
                Ok(orientation) => self.orientation = orientation,
                Err(()) => cx.warn(format!("unknown orientation '{raw}', using horizontal")),
            }
        }
        let step = cx.config().nudge_step;
        self.step = cx.float(attrs, "Step", step);
        if attrs.contains("Image") {
            self.track = Some(
                cx.image(attrs, "Image")
                    .unwrap_or_else(|| cx.placeholder(node.size())),
            );
        }
        self.thumb = cx.image(attrs, "ThumbImage");
        if let Some(color) = cx.color(attrs, "Color") {
            self.thumb_color = color;
        }
    }

    fn track_mouse_down(&mut self, cx: &mut WidgetCx<'_>, pos: Point) {
        self.track_to(cx, pos);
    }

    fn track_mouse_move(&mut self, cx: &mut WidgetCx<'_>, pos: Point) {
        self.track_to(cx, pos);
    }

    fn track_mouse_release(&mut self, _cx: &mut WidgetCx<'_>, _pos: Point, _inside: bool) {
        self.target = None;
    }

    fn track_timer(&mut self, cx: &mut WidgetCx<'_>) {
        self.chase_target(cx);
    }

    fn on_click(&mut self, _cx: &mut WidgetCx<'_>) {}

    fn nudge(&mut self, cx: &mut WidgetCx<'_>, delta: f32) -> bool {
        nudge_value(cx, delta, self.step)
    }

    fn key_down(&mut self, cx: &mut WidgetCx<'_>, key: Key, _modifiers: Modifiers) -> bool {
        analog_key(cx, key, self.step)
    }

    fn as_drawable(&self) -> Option<&dyn Drawable> {
        Some(self)
    }

    fn as_focusable(&self) -> Option<&dyn Focusable> {
        Some(self)
    }
}

impl Drawable for Slider {
    fn draw(&self, node: &WidgetNode, target: &mut ImageBuffer, clip: &Rect) {
        if let Some(track) = &self.track {
            draw_at_node(node, track, target, clip);
        }
        let Some(clip) = clip.intersect(&node.abs_rect()) else {
            return;
        };
        let thumb = self.thumb_rect(node);
        match &self.thumb {
            Some(image) => target.draw_image(image, thumb.origin, &clip, BlendMode::Alpha),
            None => target.fill_rect(&thumb, self.thumb_color, &clip, BlendMode::Alpha),
        }
    }
}

impl Focusable for Slider {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skin::SkinConfig;
    use crate::widget::{ControlState, Effects, WidgetId};

    #[test]
    fn test_absolute_mapping() {
        let mut slider = Slider::new();
        let mut node = WidgetNode::new(Rect::new(0, 0, 101, 10))
            .with_control(ControlState::new("Pos").with_range(0.0, 10.0));
        let config = SkinConfig::default();
        let mut effects = Effects::default();
        let mut cx = WidgetCx::new(WidgetId::default(), &mut node, &mut effects, &config);

        slider.track_mouse_down(&mut cx, Point::new(50, 5));
        assert!((cx.node().control().unwrap().value() - 5.0).abs() < 1e-4);
        slider.track_mouse_move(&mut cx, Point::new(500, 5));
        assert_eq!(cx.node().control().unwrap().value(), 10.0);
        slider.track_mouse_release(&mut cx, Point::new(500, 5), false);
        assert_eq!(effects.commands.len(), 2);
    }

    #[test]
    fn test_vertical_minimum_is_at_bottom() {
        let slider = Slider::new().with_orientation(Orientation::Vertical);
        let node = WidgetNode::new(Rect::new(0, 0, 10, 11));
        assert_eq!(slider.position_to_normalized(&node, Point::new(5, 10)), 0.0);
        assert_eq!(slider.position_to_normalized(&node, Point::new(5, 0)), 1.0);
    }

    #[test]
    fn test_smoothed_slider_converges_on_ticks() {
        let mut slider = Slider::new();
        let mut node = WidgetNode::new(Rect::new(0, 0, 11, 10))
            .with_control(ControlState::new("Pos").with_smoothing(0.5));
        let config = SkinConfig::default();
        let mut effects = Effects::default();
        let mut cx = WidgetCx::new(WidgetId::default(), &mut node, &mut effects, &config);

        slider.track_mouse_down(&mut cx, Point::new(10, 5));
        let first = cx.node().control().unwrap().value();
        assert!(first > 0.0 && first < 1.0);
        for _ in 0..40 {
            slider.track_timer(&mut cx);
        }
        assert!((cx.node().control().unwrap().value() - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_thumb_follows_value() {
        let slider = Slider::new();
        let mut node = WidgetNode::new(Rect::new(10, 0, 50, 10))
            .with_control(ControlState::new("Pos"));
        assert_eq!(slider.thumb_rect(&node), Rect::new(10, 0, 10, 10));
        node.control_mut().unwrap().set_value(1.0);
        assert_eq!(slider.thumb_rect(&node), Rect::new(50, 0, 10, 10));
    }
}
