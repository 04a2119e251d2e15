//! The widget node: state shared by every element of a widget tree.
//!
//! A [`WidgetNode`] carries geometry, visibility and interaction flags and
//! the tree links. Behavior lives beside it in a [`Widget`] trait object;
//! the arena ([`WidgetTree`]) owns both and keeps the cached absolute
//! rectangle of every node current.
//!
//! [`Widget`]: super::Widget
//! [`WidgetTree`]: super::WidgetTree

use cursor_icon::CursorIcon;
use horizon_skin_core::{Rect, Size};

use super::control::ControlState;

slotmap::new_key_type! {
    /// Identifier of a widget inside one window's arena.
    pub struct WidgetId;
}

/// Edges of the parent a widget stays anchored to when the parent resizes.
///
/// Pinning both opposite edges stretches the widget; pinning only the right
/// (or bottom) edge moves it. Unpinned axes keep their position and size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pins {
    pub left: bool,
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
}

impl Pins {
    /// Check whether any edge is pinned.
    pub fn any(&self) -> bool {
        self.left || self.top || self.right || self.bottom
    }
}

/// Distances to the parent's edges, recorded when the rect was last set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Margins {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Margins {
    pub(crate) fn measure(rect: &Rect, parent: Size) -> Self {
        Self {
            left: rect.left(),
            top: rect.top(),
            right: parent.width - rect.right(),
            bottom: parent.height - rect.bottom(),
        }
    }
}

/// The base tree element.
///
/// Geometry setters live on [`WidgetTree`](super::WidgetTree) because every
/// change must refresh the cached absolute rectangles of the subtree.
#[derive(Debug, Clone)]
pub struct WidgetNode {
    pub(crate) parent: Option<WidgetId>,
    pub(crate) children: Vec<WidgetId>,

    /// Geometry relative to the parent.
    pub(crate) rect: Rect,
    /// Cached window-absolute geometry.
    pub(crate) abs_rect: Rect,
    pub(crate) margins: Margins,
    pins: Pins,

    pub(crate) visible: bool,
    pub(crate) enabled: bool,
    focusable: bool,
    no_navigate: bool,

    name: Option<String>,
    cursor: Option<CursorIcon>,
    hint: Option<String>,

    // Interaction state.
    pub(crate) pressed: bool,
    pub(crate) hovered: bool,
    pub(crate) focused: bool,

    control: Option<ControlState>,
}

impl Default for WidgetNode {
    fn default() -> Self {
        Self::new(Rect::ZERO)
    }
}

impl WidgetNode {
    /// Create a visible, enabled, non-focusable node.
    pub fn new(rect: Rect) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            rect: rect.normalized(),
            abs_rect: rect.normalized(),
            margins: Margins::default(),
            pins: Pins::default(),
            visible: true,
            enabled: true,
            focusable: false,
            no_navigate: false,
            name: None,
            cursor: None,
            hint: None,
            pressed: false,
            hovered: false,
            focused: false,
            control: None,
        }
    }

    // =========================================================================
    // Builders
    // =========================================================================

    /// Set the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Make the node a control.
    pub fn with_control(mut self, control: ControlState) -> Self {
        self.control = Some(control);
        self.focusable = true;
        self
    }

    /// Set keyboard focusability.
    pub fn with_focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }

    /// Set the pinned edges.
    pub fn with_pins(mut self, pins: Pins) -> Self {
        self.pins = pins;
        self
    }

    /// Set the cursor shown over the node.
    pub fn with_cursor(mut self, cursor: CursorIcon) -> Self {
        self.cursor = Some(cursor);
        self
    }

    /// Set the hint text.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Set initial visibility.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Set initial enabled state.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Opt out of arrow-key navigation.
    pub fn with_no_navigate(mut self, no_navigate: bool) -> Self {
        self.no_navigate = no_navigate;
        self
    }

    // =========================================================================
    // Tree
    // =========================================================================

    /// The parent node, `None` for the window root.
    #[inline]
    pub fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    /// Children in z-order (first is bottom-most).
    #[inline]
    pub fn children(&self) -> &[WidgetId] {
        &self.children
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Geometry relative to the parent.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Geometry in window client coordinates.
    #[inline]
    pub fn abs_rect(&self) -> Rect {
        self.abs_rect
    }

    /// Size of the node.
    #[inline]
    pub fn size(&self) -> Size {
        self.rect.size
    }

    /// Pinned edges.
    #[inline]
    pub fn pins(&self) -> Pins {
        self.pins
    }

    // =========================================================================
    // Flags
    // =========================================================================

    /// The node's own visibility flag (ancestors are not consulted).
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The node's own enabled flag.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the node asks for keyboard focus.
    #[inline]
    pub fn is_focusable(&self) -> bool {
        self.focusable
    }

    /// Set keyboard focusability.
    pub fn set_focusable(&mut self, focusable: bool) {
        self.focusable = focusable;
    }

    /// Whether the node opts out of arrow-key navigation.
    #[inline]
    pub fn no_navigate(&self) -> bool {
        self.no_navigate
    }

    /// Whether the mouse button is held on the node.
    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Whether the pointer hovers the node (the control is "active").
    #[inline]
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Whether the node holds keyboard focus.
    #[inline]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    /// The node's name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The node's own cursor, if it declares one.
    pub fn cursor(&self) -> Option<CursorIcon> {
        self.cursor
    }

    /// Hint (tooltip) text.
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Replace the hint text.
    pub fn set_hint(&mut self, hint: Option<String>) {
        self.hint = hint;
    }

    // =========================================================================
    // Control
    // =========================================================================

    /// Control state, for interactive nodes.
    pub fn control(&self) -> Option<&ControlState> {
        self.control.as_ref()
    }

    /// Mutable control state.
    pub fn control_mut(&mut self) -> Option<&mut ControlState> {
        self.control.as_mut()
    }

    /// Whether the node is a control.
    #[inline]
    pub fn is_control(&self) -> bool {
        self.control.is_some()
    }

    /// Clear pressed, hovered and focused flags.
    pub(crate) fn reset_interaction(&mut self) {
        self.pressed = false;
        self.hovered = false;
        self.focused = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_negative_size() {
        let node = WidgetNode::new(Rect::new(5, 5, -10, 20));
        assert_eq!(node.rect(), Rect::new(5, 5, 0, 20));
        assert!(node.is_visible());
        assert!(!node.is_focusable());
    }

    #[test]
    fn test_control_is_focusable_by_default() {
        let node = WidgetNode::new(Rect::new(0, 0, 10, 10)).with_control(ControlState::new("Vol"));
        assert!(node.is_control());
        assert!(node.is_focusable());

        let opted_out = WidgetNode::new(Rect::new(0, 0, 10, 10))
            .with_control(ControlState::new("Vol"))
            .with_focusable(false);
        assert!(!opted_out.is_focusable());
    }

    #[test]
    fn test_margins() {
        let m = Margins::measure(&Rect::new(10, 20, 30, 40), Size::new(100, 100));
        assert_eq!(m, Margins { left: 10, top: 20, right: 60, bottom: 40 });
    }
}
