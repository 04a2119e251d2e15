//! Hover, mouse capture and window dragging.
//!
//! One window holds at most one capture. While a widget is captured every
//! pointer move is delivered to it in its local coordinates, whatever lies
//! under the pointer. A press on empty skin area of a drag-anywhere window
//! starts a window drag instead.

use horizon_skin_core::logging::targets;
use horizon_skin_core::{Point, Rect};

use super::{TRACK_TIMER, Window, WindowOutput};
use crate::platform::Platform;
use crate::widget::{FocusManager, WidgetId, hit_test, resolve_cursor};

/// Pointer state of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    /// Nothing hovered, nothing captured.
    #[default]
    Idle,
    /// The pointer is over an interactive widget.
    Hovering(WidgetId),
    /// A widget owns the pointer until release.
    Captured {
        widget: WidgetId,
        /// Whether the pointer moved since the last track tick.
        moved_since_tick: bool,
    },
    /// The window follows the pointer.
    Dragging { last_screen: Point },
}

impl CaptureState {
    /// The captured widget.
    pub fn captured(&self) -> Option<WidgetId> {
        match *self {
            Self::Captured { widget, .. } => Some(widget),
            _ => None,
        }
    }

    /// The hovered widget.
    pub fn hovered(&self) -> Option<WidgetId> {
        match *self {
            Self::Hovering(widget) => Some(widget),
            _ => None,
        }
    }

    /// Whether the window is being dragged.
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }
}

impl Window {
    /// Current pointer state.
    pub fn capture_state(&self) -> CaptureState {
        self.capture
    }

    /// The widget holding the capture.
    pub fn captured(&self) -> Option<WidgetId> {
        self.capture.captured()
    }

    pub(super) fn pointer_move(&mut self, platform: &mut dyn Platform, pos: Point, screen: Point) {
        match self.capture {
            CaptureState::Captured { widget, .. } => {
                let local = self.tree.to_local(widget, pos).unwrap_or(pos);
                self.with_behavior(platform, widget, |b, cx| b.track_mouse_move(cx, local));
                self.capture = CaptureState::Captured {
                    widget,
                    moved_since_tick: true,
                };
            }
            CaptureState::Dragging { last_screen } => {
                let delta = screen.delta_from(last_screen);
                self.drag_by(platform, delta);
                self.capture = CaptureState::Dragging { last_screen: screen };
            }
            CaptureState::Idle | CaptureState::Hovering(_) => self.update_hover(platform, Some(pos)),
        }
    }

    /// Move the window (or its host) by a screen delta.
    fn drag_by(&mut self, platform: &mut dyn Platform, delta: Point) {
        if delta == Point::ZERO {
            return;
        }
        match self.host {
            Some(host) => {
                if let Some(pos) = platform.surface_position(host) {
                    platform.move_surface(host, pos.offset(delta.x, delta.y));
                }
            }
            None => {
                self.position = self.position.offset(delta.x, delta.y);
                if let Some(surface) = self.surface {
                    platform.move_surface(surface, self.position);
                }
            }
        }
        tracing::trace!(target: targets::CAPTURE, window = %self.name, ?delta, "window dragged");
    }

    /// Re-hit-test and move the hover (flag, cursor, hint) accordingly.
    /// `None` clears the hover.
    pub(super) fn update_hover(&mut self, platform: &mut dyn Platform, pos: Option<Point>) {
        let target = pos.and_then(|p| hit_test(&self.tree, p));
        let current = self.capture.hovered();
        if target == current {
            return;
        }
        if let Some(old) = current
            && let Some(node) = self.tree.get_mut(old)
        {
            node.hovered = false;
            self.invalidate(old, None, false);
        }
        if let Some(new) = target
            && let Some(node) = self.tree.get_mut(new)
        {
            node.hovered = true;
            self.invalidate(new, None, false);
        }
        self.capture = target.map_or(CaptureState::Idle, CaptureState::Hovering);

        if let Some(surface) = self.surface
            && pos.is_some()
        {
            let cursor = resolve_cursor(&self.tree, target.unwrap_or(self.tree.root()));
            platform.set_cursor(surface, cursor);
        }
        let hint = target.and_then(|id| self.tree.get(id)?.hint().map(str::to_string));
        if hint != self.hint {
            self.hint = hint.clone();
            self.outputs.push(WindowOutput::Hint(hint));
        }
        tracing::trace!(target: targets::CAPTURE, window = %self.name, ?current, ?target, "hover changed");
    }

    pub(super) fn pointer_down(&mut self, platform: &mut dyn Platform, pos: Point, screen: Point) {
        if matches!(self.capture, CaptureState::Captured { .. } | CaptureState::Dragging { .. }) {
            tracing::trace!(target: targets::CAPTURE, window = %self.name, "press while captured ignored");
            return;
        }
        let Some(surface) = self.surface else {
            return;
        };
        let Some(widget) = hit_test(&self.tree, pos) else {
            if self.config.drag_anywhere() {
                self.update_hover(platform, None);
                self.capture = CaptureState::Dragging { last_screen: screen };
                platform.begin_capture(surface);
                tracing::debug!(target: targets::CAPTURE, window = %self.name, "drag started");
            }
            return;
        };

        // Hover moves to the pressed widget even without a move in between.
        self.update_hover(platform, Some(pos));
        if FocusManager::can_focus(&self.tree, widget) {
            self.set_focus(platform, widget);
        }
        if let Some(node) = self.tree.get_mut(widget) {
            node.pressed = true;
            if let Some(control) = node.control_mut() {
                control.filter.reset();
            }
        }
        self.invalidate(widget, None, false);
        self.capture = CaptureState::Captured {
            widget,
            moved_since_tick: false,
        };
        platform.begin_capture(surface);
        tracing::debug!(target: targets::CAPTURE, window = %self.name, ?widget, "capture begins");

        let local = self.tree.to_local(widget, pos).unwrap_or(pos);
        self.with_behavior(platform, widget, |b, cx| b.track_mouse_down(cx, local));
        if self.tree.behavior(widget).is_some_and(|b| b.wants_track_timer()) {
            platform.set_timer(surface, TRACK_TIMER, self.skin_config.track_timer_interval());
        }
    }

    pub(super) fn pointer_up(&mut self, platform: &mut dyn Platform, pos: Point, _screen: Point) {
        match self.capture {
            CaptureState::Captured { widget, .. } => {
                let local = self.tree.to_local(widget, pos).unwrap_or(pos);
                let inside = self.tree.get(widget).is_some_and(|n| n.abs_rect().contains(pos));
                self.with_behavior(platform, widget, |b, cx| b.track_mouse_release(cx, local, inside));
                self.unpress(widget);
                if inside && self.tree.is_effectively_enabled(widget) {
                    tracing::debug!(target: targets::CAPTURE, window = %self.name, ?widget, "click");
                    self.with_behavior(platform, widget, |b, cx| b.on_click(cx));
                }
                self.end_capture(platform);
                if self.tree.get(widget).is_some_and(|n| n.is_hovered()) {
                    self.capture = CaptureState::Hovering(widget);
                }
                self.update_hover(platform, Some(pos));
                self.outputs.push(WindowOutput::SessionEnded);
            }
            CaptureState::Dragging { .. } => {
                self.end_capture(platform);
                self.update_hover(platform, Some(pos));
                self.outputs.push(WindowOutput::SessionEnded);
            }
            CaptureState::Idle | CaptureState::Hovering(_) => {}
        }
    }

    fn unpress(&mut self, widget: WidgetId) {
        if let Some(node) = self.tree.get_mut(widget) {
            node.pressed = false;
        }
        self.invalidate(widget, None, true);
    }

    fn end_capture(&mut self, platform: &mut dyn Platform) {
        let captured = self.capture.captured();
        self.capture = CaptureState::Idle;
        if let Some(surface) = self.surface {
            platform.end_capture(surface);
            if captured.is_some() {
                platform.kill_timer(surface, TRACK_TIMER);
            }
        }
        tracing::debug!(target: targets::CAPTURE, window = %self.name, ?captured, "capture ends");
    }

    /// Abort the capture or drag in progress without a click.
    pub fn release_capture(&mut self, platform: &mut dyn Platform) {
        match self.capture {
            CaptureState::Captured { widget, .. } => {
                self.with_behavior(platform, widget, |b, cx| b.track_mouse_release(cx, Point::new(-1, -1), false));
                self.unpress(widget);
                if let Some(node) = self.tree.get_mut(widget) {
                    node.hovered = false;
                }
                self.end_capture(platform);
                self.outputs.push(WindowOutput::SessionEnded);
            }
            CaptureState::Dragging { .. } => {
                self.end_capture(platform);
                self.outputs.push(WindowOutput::SessionEnded);
            }
            CaptureState::Hovering(_) => self.update_hover(platform, None),
            CaptureState::Idle => {}
        }
    }

    pub(super) fn track_timer_tick(&mut self, platform: &mut dyn Platform) {
        let CaptureState::Captured {
            widget,
            moved_since_tick,
        } = self.capture
        else {
            return;
        };
        if !moved_since_tick {
            self.with_behavior(platform, widget, |b, cx| b.track_timer(cx));
        }
        self.capture = CaptureState::Captured {
            widget,
            moved_since_tick: false,
        };
    }

    pub(super) fn focus_lost(&mut self, platform: &mut dyn Platform) {
        self.release_capture(platform);
        self.update_hover(platform, None);
    }

    pub(super) fn pointer_leave(&mut self, platform: &mut dyn Platform) {
        if self.capture.captured().is_none() && !self.capture.is_dragging() {
            self.update_hover(platform, None);
        }
    }

    pub(super) fn wheel(&mut self, platform: &mut dyn Platform, pos: Point, delta: f32) {
        if self.capture.captured().is_some() || self.capture.is_dragging() {
            return;
        }
        let Some(widget) = hit_test(&self.tree, pos) else {
            return;
        };
        self.with_behavior(platform, widget, |b, cx| b.nudge(cx, delta));
    }

    /// Absolute rectangle of the captured widget, for diagnostics.
    pub fn captured_rect(&self) -> Option<Rect> {
        self.tree.get(self.capture.captured()?).map(|n| n.abs_rect())
    }
}
