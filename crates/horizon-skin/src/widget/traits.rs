//! Widget behavior traits.
//!
//! Every node of a widget tree pairs a plain [`WidgetNode`] with a behavior
//! object implementing [`Widget`]. The window calls the behavior's hooks with
//! a [`WidgetCx`], through which the behavior mutates its node and requests
//! side effects (invalidation, command emission, page selection). The window
//! applies those [`Effects`] once the hook returns, so behaviors never hold a
//! reference to the window or the tree.
//!
//! Optional abilities are expressed as capability traits, reached through the
//! `as_*` accessors on [`Widget`]:
//!
//! - [`Drawable`] - paints into the composite image or the post-draw pass
//! - [`Focusable`] - may take keyboard focus
//! - [`NativeBacked`] - owns a native child control
//! - [`Composite`] - exposes only part of its children (tab pages)

use std::any::Any;
use std::fmt::Debug;

use horizon_skin_core::{Key, Modifiers, Point, Rect};
use horizon_skin_render::{DrawContext, ImageBuffer};

use super::base::{WidgetId, WidgetNode};
use crate::platform::{NativeHandle, NativeKind};
use crate::skin::{AttributeSet, Command, ParseContext, SkinConfig};

// =========================================================================
// Effects
// =========================================================================

/// Side effects requested by a behavior hook.
#[derive(Debug, Default)]
pub struct Effects {
    pub(crate) commands: Vec<Command>,
    /// Widget-local rectangles to invalidate; `None` is the whole widget.
    pub(crate) invalidations: Vec<Option<Rect>>,
    pub(crate) select_page: Option<usize>,
    pub(crate) sync_native: bool,
}

impl Effects {
    /// Check whether the hook requested anything.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
            && self.invalidations.is_empty()
            && self.select_page.is_none()
            && !self.sync_native
    }
}

/// Context handed to behavior hooks.
pub struct WidgetCx<'a> {
    id: WidgetId,
    node: &'a mut WidgetNode,
    effects: &'a mut Effects,
    config: &'a SkinConfig,
}

impl<'a> WidgetCx<'a> {
    pub(crate) fn new(
        id: WidgetId,
        node: &'a mut WidgetNode,
        effects: &'a mut Effects,
        config: &'a SkinConfig,
    ) -> Self {
        Self {
            id,
            node,
            effects,
            config,
        }
    }

    /// The widget being called.
    #[inline]
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// The widget's node.
    #[inline]
    pub fn node(&self) -> &WidgetNode {
        self.node
    }

    /// The widget's node, mutably.
    #[inline]
    pub fn node_mut(&mut self) -> &mut WidgetNode {
        self.node
    }

    /// Toolkit-wide settings.
    #[inline]
    pub fn config(&self) -> &SkinConfig {
        self.config
    }

    /// Repaint the whole widget.
    pub fn invalidate(&mut self) {
        self.effects.invalidations.push(None);
    }

    /// Repaint part of the widget (widget-local coordinates).
    pub fn invalidate_rect(&mut self, rect: Rect) {
        self.effects.invalidations.push(Some(rect));
    }

    /// Emit a command. Commands without a name are dropped.
    pub fn emit(&mut self, command: Command) {
        if command.name.is_empty() {
            tracing::trace!(
                target: horizon_skin_core::logging::targets::COMMAND,
                "dropping unnamed command"
            );
            return;
        }
        self.effects.commands.push(command);
    }

    /// Emit the node's control command with its current value.
    pub fn emit_value(&mut self) {
        if let Some(control) = self.node.control() {
            let command = Command::from_control(control);
            self.emit(command);
        }
    }

    /// Set the control value and, if it changed, invalidate and emit.
    ///
    /// Returns `true` if the value changed.
    pub fn set_value_and_emit(&mut self, value: f32) -> bool {
        let changed = self
            .node
            .control_mut()
            .is_some_and(|control| control.set_value(value));
        if changed {
            self.invalidate();
            self.emit_value();
        }
        changed
    }

    /// Set the control value without emitting. Invalidates on change.
    pub fn set_value_silently(&mut self, value: f32) -> bool {
        let changed = self
            .node
            .control_mut()
            .is_some_and(|control| control.set_value(value));
        if changed {
            self.invalidate();
        }
        changed
    }

    /// Ask the window to select a page of this composite widget.
    pub fn select_page(&mut self, index: usize) {
        self.effects.select_page = Some(index);
    }

    /// Push the native-backed state (text) to the native control.
    pub fn sync_native(&mut self) {
        self.effects.sync_native = true;
    }
}

// =========================================================================
// Widget
// =========================================================================

/// Behavior of a widget.
///
/// All hooks have no-op defaults. Positions handed to the tracking hooks are
/// in widget-local coordinates.
pub trait Widget: Any + Debug {
    /// The skin kind this behavior was created for.
    fn kind(&self) -> &'static str;

    /// Whether nodes of this kind are controls: they get a
    /// [`ControlState`](super::ControlState), take part in hit testing and
    /// receive pointer tracking.
    fn interactive(&self) -> bool {
        false
    }

    /// Read kind-specific attributes. Called once after construction, before
    /// the first layout pass. Common attributes (geometry, flags, command
    /// binding) are already applied to `node`.
    fn parse_attributes(
        &mut self,
        node: &mut WidgetNode,
        attrs: &AttributeSet,
        cx: &mut ParseContext<'_>,
    ) {
        let _ = (node, attrs, cx);
    }

    /// Whether the window should run the track timer while this widget holds
    /// capture.
    fn wants_track_timer(&self) -> bool {
        false
    }

    /// A capture session starts.
    fn track_mouse_down(&mut self, cx: &mut WidgetCx<'_>, pos: Point) {
        let _ = (cx, pos);
    }

    /// The pointer moved while this widget holds capture.
    fn track_mouse_move(&mut self, cx: &mut WidgetCx<'_>, pos: Point) {
        let _ = (cx, pos);
    }

    /// The capture session ends. `inside` tells whether the release point lies
    /// inside the widget.
    fn track_mouse_release(&mut self, cx: &mut WidgetCx<'_>, pos: Point, inside: bool) {
        let _ = (cx, pos, inside);
    }

    /// Track timer tick with a stationary pointer.
    fn track_timer(&mut self, cx: &mut WidgetCx<'_>) {
        let _ = cx;
    }

    /// A press and release inside the widget, or keyboard activation.
    fn on_click(&mut self, cx: &mut WidgetCx<'_>) {
        cx.emit_value();
    }

    /// Wheel or keyboard nudge by `delta` steps. Returns `true` if handled.
    fn nudge(&mut self, cx: &mut WidgetCx<'_>, delta: f32) -> bool {
        let _ = (cx, delta);
        false
    }

    /// A key press while the widget holds focus. Returns `true` if handled.
    fn key_down(&mut self, cx: &mut WidgetCx<'_>, key: Key, modifiers: Modifiers) -> bool {
        let _ = (cx, key, modifiers);
        false
    }

    /// Another control bound to the same command changed its value.
    ///
    /// The default adopts the value (clamped) without emitting.
    fn reflect_value(&mut self, cx: &mut WidgetCx<'_>, value: f32, param: &str) {
        let _ = param;
        cx.set_value_silently(value);
    }

    /// Keyboard focus was gained or lost.
    fn on_focus(&mut self, cx: &mut WidgetCx<'_>, gained: bool) {
        let _ = gained;
        cx.invalidate();
    }

    // =========================================================================
    // Capabilities
    // =========================================================================

    /// Drawing capability.
    fn as_drawable(&self) -> Option<&dyn Drawable> {
        None
    }

    /// Focus capability.
    fn as_focusable(&self) -> Option<&dyn Focusable> {
        None
    }

    /// Native child capability.
    fn as_native(&self) -> Option<&dyn NativeBacked> {
        None
    }

    /// Native child capability, mutably.
    fn as_native_mut(&mut self) -> Option<&mut dyn NativeBacked> {
        None
    }

    /// Composite capability.
    fn as_composite(&self) -> Option<&dyn Composite> {
        None
    }

    /// Composite capability, mutably.
    fn as_composite_mut(&mut self) -> Option<&mut dyn Composite> {
        None
    }
}

impl dyn Widget {
    /// Downcast to a concrete behavior.
    pub fn downcast_ref<T: Widget>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref()
    }

    /// Downcast to a concrete behavior, mutably.
    pub fn downcast_mut<T: Widget>(&mut self) -> Option<&mut T> {
        let any: &mut dyn Any = self;
        any.downcast_mut()
    }
}

/// Painting capability.
pub trait Drawable {
    /// Composite the widget onto the window image. `target` is the whole
    /// composite image; `clip` (window coordinates) bounds the pixels that
    /// may change.
    fn draw(&self, node: &WidgetNode, target: &mut ImageBuffer, clip: &Rect) {
        let _ = (node, target, clip);
    }

    /// Native-style drawing after compositing, in window coordinates.
    fn post_draw(&self, node: &WidgetNode, cx: &mut DrawContext<'_>) {
        let _ = (node, cx);
    }
}

/// Keyboard focus capability.
pub trait Focusable {
    /// Whether the window draws its focus frame around the widget.
    fn shows_focus_frame(&self) -> bool {
        true
    }
}

/// Capability of widgets realized as native child controls.
pub trait NativeBacked {
    /// The native control kind.
    fn native_kind(&self) -> NativeKind;

    /// The live native handle, if the parent surface exists.
    fn handle(&self) -> Option<NativeHandle>;

    /// Record the native handle.
    fn set_handle(&mut self, handle: Option<NativeHandle>);

    /// Text shown by the native control.
    fn text(&self) -> &str;
}

/// Capability of widgets that expose only part of their children.
pub trait Composite {
    /// Children taking part in focus traversal.
    fn focus_scope(&self, children: &[WidgetId]) -> Vec<WidgetId>;

    /// Index of the selected page.
    fn selected(&self) -> usize;

    /// Record the selected page. The window applies visibility.
    fn set_selected(&mut self, index: usize);
}
