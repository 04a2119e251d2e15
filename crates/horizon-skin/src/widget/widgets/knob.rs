//! Rotary control.
//!
//! A [`Knob`] maps vertical drags to relative value changes: moving the
//! pointer up by one pixel adds `sensitivity * (max - min)` to the value.
//! Raw deltas pass through the control's delta filter, and the window feeds
//! zero deltas on stationary track-timer ticks so a smoothed knob settles.
//!
//! The skin image is a filmstrip of equally sized frames, stacked vertically
//! (or horizontally when the image is wider than tall), one frame per value
//! step.

use std::sync::Arc;

use horizon_skin_core::{Key, Modifiers, Point, Rect, Size};
use horizon_skin_render::ImageBuffer;

use super::{analog_key, apply_filtered, draw_at_node, nudge_value};
use crate::skin::{AttributeSet, ParseContext};
use crate::widget::{Drawable, Focusable, Widget, WidgetCx, WidgetNode};

/// A rotary analog control.
#[derive(Debug, Clone)]
pub struct Knob {
    filmstrip: Option<Arc<ImageBuffer>>,
    sensitivity: f32,
    step: f32,
    last_pos: Option<Point>,
}

impl Default for Knob {
    fn default() -> Self {
        Self {
            filmstrip: None,
            sensitivity: 0.005,
            step: 0.05,
            last_pos: None,
        }
    }
}

impl Knob {
    /// A knob with default sensitivity and step.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value change per pixel, as a fraction of the range.
    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Set the nudge step, as a fraction of the range.
    pub fn with_step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    /// Value change per pixel, as a fraction of the range.
    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    /// Nudge step, as a fraction of the range.
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Frames in the filmstrip for a knob of `frame` size.
    pub fn frame_count(image: &ImageBuffer, frame: Size) -> i32 {
        if frame.is_empty() {
            return 0;
        }
        if image.width() > image.height() {
            image.width() / frame.width
        } else {
            image.height() / frame.height
        }
    }

    /// The filmstrip frame showing the node's value.
    pub fn frame_index(node: &WidgetNode, frames: i32) -> i32 {
        let normalized = node.control().map_or(0.0, |control| control.normalized());
        if frames <= 1 {
            return 0;
        }
        ((normalized * (frames - 1) as f32).round() as i32).clamp(0, frames - 1)
    }
}

impl Widget for Knob {
    fn kind(&self) -> &'static str {
        "Knob"
    }

    fn interactive(&self) -> bool {
        true
    }

    fn wants_track_timer(&self) -> bool {
        true
    }

    fn parse_attributes(&mut self, node: &mut WidgetNode, attrs: &AttributeSet, cx: &mut ParseContext<'_>) {
        let (sensitivity, step) = (cx.config().knob_sensitivity, cx.config().nudge_step);
        self.sensitivity = cx.float(attrs, "Sensitivity", sensitivity);
        self.step = cx.float(attrs, "Step", step);
        if attrs.contains("Image") {
            let image = cx
                .image(attrs, "Image")
                .unwrap_or_else(|| cx.placeholder(node.size()));
            if Knob::frame_count(&image, node.size()) == 0 {
                cx.warn("filmstrip is smaller than the knob; using placeholder");
                self.filmstrip = Some(cx.placeholder(node.size()));
            } else {
                self.filmstrip = Some(image);
            }
        }
    }

    fn track_mouse_down(&mut self, _cx: &mut WidgetCx<'_>, pos: Point) {
        self.last_pos = Some(pos);
    }

    fn track_mouse_move(&mut self, cx: &mut WidgetCx<'_>, pos: Point) {
        let Some(last) = self.last_pos.replace(pos) else {
            return;
        };
        let Some(control) = cx.node().control() else {
            return;
        };
        let dy = (last.y - pos.y) as f32;
        let raw = dy * self.sensitivity * (control.max() - control.min());
        apply_filtered(cx, raw);
    }

    fn track_mouse_release(&mut self, _cx: &mut WidgetCx<'_>, _pos: Point, _inside: bool) {
        self.last_pos = None;
    }

    fn track_timer(&mut self, cx: &mut WidgetCx<'_>) {
        apply_filtered(cx, 0.0);
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

impl Drawable for Knob {
    fn draw(&self, node: &WidgetNode, target: &mut ImageBuffer, clip: &Rect) {
        let Some(filmstrip) = &self.filmstrip else {
            return;
        };
        let size = node.size();
        let frames = Knob::frame_count(filmstrip, size);
        let index = Knob::frame_index(node, frames);
        let frame = if filmstrip.width() > filmstrip.height() {
            Rect::new(index * size.width, 0, size.width, size.height)
        } else {
            Rect::new(0, index * size.height, size.width, size.height)
        };
        if let Some(image) = filmstrip.sub_image(&frame) {
            draw_at_node(node, &image, target, clip);
        }
    }
}

impl Focusable for Knob {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skin::SkinConfig;
    use crate::widget::{ControlState, Effects, WidgetId};
    use horizon_skin_render::{BlendMode, Color};

    fn knob_node() -> WidgetNode {
        WidgetNode::new(Rect::new(0, 0, 20, 20)).with_control(ControlState::new("Gain"))
    }

    #[test]
    fn test_vertical_drag_is_relative() {
        let mut knob = Knob::new().with_sensitivity(0.01);
        let mut node = knob_node();
        let config = SkinConfig::default();
        let mut effects = Effects::default();
        let mut cx = WidgetCx::new(WidgetId::default(), &mut node, &mut effects, &config);

        knob.track_mouse_down(&mut cx, Point::new(10, 10));
        knob.track_mouse_move(&mut cx, Point::new(30, 0));
        knob.track_mouse_move(&mut cx, Point::new(30, 5));
        knob.track_mouse_release(&mut cx, Point::new(30, 5), false);

        assert!((node.control().unwrap().value() - 0.05).abs() < 1e-5);
        assert_eq!(effects.commands.len(), 2);
    }

    #[test]
    fn test_smoothed_knob_settles_on_timer_ticks() {
        let mut knob = Knob::new().with_sensitivity(0.01);
        let mut node = knob_node();
        node.control_mut().unwrap().set_value(0.5);
        node.control_mut().unwrap().filter.set_coefficient(0.5);
        let config = SkinConfig::default();
        let mut effects = Effects::default();
        let mut cx = WidgetCx::new(WidgetId::default(), &mut node, &mut effects, &config);

        knob.track_mouse_down(&mut cx, Point::new(0, 20));
        knob.track_mouse_move(&mut cx, Point::new(0, 0));
        // 20px * 0.01 = 0.2 raw, half of it passes the filter.
        let after_move = cx.node().control().unwrap().value();
        assert!((after_move - 0.6).abs() < 1e-5);

        knob.track_timer(&mut cx);
        let after_tick = cx.node().control().unwrap().value();
        assert!((after_tick - 0.65).abs() < 1e-5);
    }

    #[test]
    fn test_keys_and_nudge() {
        let mut knob = Knob::new().with_step(0.1);
        let mut node = knob_node();
        let config = SkinConfig::default();
        let mut effects = Effects::default();
        let mut cx = WidgetCx::new(WidgetId::default(), &mut node, &mut effects, &config);

        assert!(knob.key_down(&mut cx, Key::End, Modifiers::NONE));
        assert_eq!(cx.node().control().unwrap().value(), 1.0);
        assert!(knob.nudge(&mut cx, -2.0));
        assert!((cx.node().control().unwrap().value() - 0.8).abs() < 1e-5);
        assert!(!knob.key_down(&mut cx, Key::Tab, Modifiers::NONE));
    }

    #[test]
    fn test_filmstrip_frame_follows_value() {
        let mut strip = ImageBuffer::new(Size::new(4, 12));
        strip.fill_rect(&Rect::new(0, 0, 4, 4), Color::RED, &strip.rect(), BlendMode::Opaque);
        strip.fill_rect(&Rect::new(0, 8, 4, 4), Color::BLUE, &Rect::new(0, 0, 4, 12), BlendMode::Opaque);

        assert_eq!(Knob::frame_count(&strip, Size::new(4, 4)), 3);
        let mut node = WidgetNode::new(Rect::new(0, 0, 4, 4)).with_control(ControlState::new("Pan"));
        assert_eq!(Knob::frame_index(&node, 3), 0);
        node.control_mut().unwrap().set_value(1.0);
        assert_eq!(Knob::frame_index(&node, 3), 2);

        let knob = Knob {
            filmstrip: Some(Arc::new(strip)),
            ..Knob::new()
        };
        let mut target = ImageBuffer::new(Size::new(4, 4));
        knob.draw(&node, &mut target, &Rect::new(0, 0, 4, 4));
        assert_eq!(target.pixel(Point::new(1, 1)), Some(Color::BLUE));
    }
}
