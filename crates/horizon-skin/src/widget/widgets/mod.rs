//! Built-in widget behaviors.
//!
//! - [`Panel`]: container with an optional fill or skin image
//! - [`ImageView`]: static skin image
//! - [`Label`]: text carrier painted in the post-draw pass
//! - [`Button`]: momentary push button
//! - [`Toggle`]: two-state button
//! - [`Knob`]: rotary control driven by vertical drags
//! - [`Slider`]: linear control with absolute mapping
//! - [`NativeControl`]: edit box, list or tree realized natively
//! - [`TabPages`]: page container showing one child at a time

mod button;
mod image_view;
mod knob;
mod label;
mod native_control;
mod panel;
mod slider;
mod tab_pages;
mod toggle;

pub use button::Button;
pub use image_view::ImageView;
pub use knob::Knob;
pub use label::Label;
pub use native_control::NativeControl;
pub use panel::Panel;
pub use slider::{Orientation, Slider};
pub use tab_pages::TabPages;
pub use toggle::Toggle;

use horizon_skin_core::{Key, Rect};
use horizon_skin_render::{BlendMode, ImageBuffer};

use super::base::WidgetNode;
use super::traits::WidgetCx;

/// Blit an image at the node's top-left corner, clipped to the node.
pub(crate) fn draw_at_node(node: &WidgetNode, image: &ImageBuffer, target: &mut ImageBuffer, clip: &Rect) {
    let Some(clip) = clip.intersect(&node.abs_rect()) else {
        return;
    };
    target.draw_image(image, node.abs_rect().origin, &clip, BlendMode::Alpha);
}

/// Move an analog control's value by `steps` nudge steps of its range.
pub(crate) fn nudge_value(cx: &mut WidgetCx<'_>, steps: f32, step: f32) -> bool {
    let Some(control) = cx.node().control() else {
        return false;
    };
    let target = control.value() + steps * step * (control.max() - control.min());
    cx.set_value_and_emit(target);
    true
}

/// Shared key handling of analog controls: PageUp/PageDown nudge by one
/// step, Home/End jump to the range ends.
pub(crate) fn analog_key(cx: &mut WidgetCx<'_>, key: Key, step: f32) -> bool {
    let Some(control) = cx.node().control() else {
        return false;
    };
    let (min, max) = (control.min(), control.max());
    match key {
        Key::PageUp => nudge_value(cx, 1.0, step),
        Key::PageDown => nudge_value(cx, -1.0, step),
        Key::Home => {
            cx.set_value_and_emit(min);
            true
        }
        Key::End => {
            cx.set_value_and_emit(max);
            true
        }
        _ => false,
    }
}

/// Feed a raw value delta through the control's filter and apply it.
pub(crate) fn apply_filtered(cx: &mut WidgetCx<'_>, raw: f32) -> bool {
    let Some(control) = cx.node_mut().control_mut() else {
        return false;
    };
    let delta = control.filter.apply(raw);
    if delta.abs() < f32::EPSILON {
        return false;
    }
    let target = control.value() + delta;
    cx.set_value_and_emit(target)
}
