//! Focus management for widget trees.
//!
//! This module provides [`FocusManager`], which tracks the keyboard focus of
//! one window and moves it along the focus chain or spatially with the arrow
//! keys.
//!
//! # Focus Chain
//!
//! The chain is a depth-first preorder traversal of visible, enabled widgets
//! (parents before children, siblings in z-order) collecting the focusable
//! ones. A [`Composite`](super::Composite) widget contributes only its focus
//! scope, so a tab page container exposes only its selected page.
//!
//! # Spatial Navigation
//!
//! [`FocusManager::focus_direction`] considers chain members that do not opt
//! out of navigation and whose band perpendicular to the movement overlaps
//! the focused widget. Among those strictly beyond the focused center, the
//! nearest along the axis wins; ties go to the smaller perpendicular center
//! distance, then to chain order.
//!
//! The manager only updates node flags. The window delivers focus
//! notifications to behaviors using the returned [`FocusChange`].

use horizon_skin_core::logging::targets;
use horizon_skin_core::Rect;

use super::base::WidgetId;
use super::tree::WidgetTree;

/// Direction of spatial focus navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Outcome of a focus move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusChange {
    /// The widget that lost focus.
    pub lost: Option<WidgetId>,
    /// The widget that gained focus.
    pub gained: Option<WidgetId>,
}

/// Manages keyboard focus for a widget tree.
#[derive(Debug, Default)]
pub struct FocusManager {
    focused: Option<WidgetId>,
}

impl FocusManager {
    /// Create a new focus manager.
    pub fn new() -> Self {
        Self { focused: None }
    }

    /// Get the currently focused widget.
    #[inline]
    pub fn focused(&self) -> Option<WidgetId> {
        self.focused
    }

    /// Check if a specific widget has focus.
    #[inline]
    pub fn has_focus(&self, id: WidgetId) -> bool {
        self.focused == Some(id)
    }

    /// Check whether `id` may take focus: it must be focusable, expose the
    /// focus capability and be visible and enabled including its ancestors.
    pub fn can_focus(tree: &WidgetTree, id: WidgetId) -> bool {
        let focusable = tree.get(id).is_some_and(|n| n.is_focusable())
            && tree.behavior(id).is_some_and(|b| b.as_focusable().is_some());
        focusable && tree.is_effectively_visible(id) && tree.is_effectively_enabled(id)
    }

    /// Set focus to a specific widget.
    ///
    /// Returns `None` (and changes nothing) if the widget cannot take focus
    /// or already holds it.
    pub fn set_focus(&mut self, tree: &mut WidgetTree, id: WidgetId) -> Option<FocusChange> {
        if self.focused == Some(id) || !Self::can_focus(tree, id) {
            return None;
        }
        let lost = self.focused.take();
        if let Some(old) = lost
            && let Some(node) = tree.get_mut(old)
        {
            node.focused = false;
        }
        if let Some(node) = tree.get_mut(id) {
            node.focused = true;
        }
        self.focused = Some(id);
        tracing::debug!(target: targets::FOCUS, ?lost, gained = ?id, "focus changed");
        Some(FocusChange {
            lost,
            gained: Some(id),
        })
    }

    /// Clear focus. Returns the widget that lost it; `None` when nothing was
    /// focused.
    pub fn clear_focus(&mut self, tree: &mut WidgetTree) -> Option<WidgetId> {
        let old = self.focused.take()?;
        if let Some(node) = tree.get_mut(old) {
            node.focused = false;
        }
        tracing::debug!(target: targets::FOCUS, lost = ?old, "focus cleared");
        Some(old)
    }

    /// Forget a widget that is about to be removed from the tree.
    pub(crate) fn forget(&mut self, id: WidgetId) {
        if self.focused == Some(id) {
            self.focused = None;
        }
    }

    /// Move focus to the next widget of the chain, wrapping at the end.
    ///
    /// Focuses the first chain member when nothing is focused or the focused
    /// widget is not part of the chain.
    pub fn focus_next(&mut self, tree: &mut WidgetTree) -> Option<FocusChange> {
        let chain = Self::focus_chain(tree);
        let next = match self.position_in(&chain) {
            Some(pos) => chain[(pos + 1) % chain.len()],
            None => *chain.first()?,
        };
        self.set_focus(tree, next)
    }

    /// Move focus to the previous widget of the chain, wrapping at the start.
    ///
    /// Focuses the last chain member when nothing is focused or the focused
    /// widget is not part of the chain.
    pub fn focus_previous(&mut self, tree: &mut WidgetTree) -> Option<FocusChange> {
        let chain = Self::focus_chain(tree);
        let prev = match self.position_in(&chain) {
            Some(0) => *chain.last()?,
            Some(pos) => chain[pos - 1],
            None => *chain.last()?,
        };
        self.set_focus(tree, prev)
    }

    /// Move focus spatially.
    ///
    /// With no current focus the first chain member is focused. When no
    /// candidate lies in the requested direction focus stays where it is.
    pub fn focus_direction(
        &mut self,
        tree: &mut WidgetTree,
        direction: Direction,
    ) -> Option<FocusChange> {
        let chain = Self::focus_chain(tree);
        let Some(current) = self.focused.filter(|id| chain.contains(id)) else {
            let first = *chain.first()?;
            return self.set_focus(tree, first);
        };
        let target = find_in_direction(tree, &chain, current, direction)?;
        self.set_focus(tree, target)
    }

    /// Build the focus chain of a tree.
    pub fn focus_chain(tree: &WidgetTree) -> Vec<WidgetId> {
        let mut chain = Vec::new();
        let mut stack = vec![tree.root()];
        while let Some(id) = stack.pop() {
            let Some(node) = tree.get(id) else {
                continue;
            };
            if !node.is_visible() || !node.is_enabled() {
                continue;
            }
            if Self::can_focus(tree, id) {
                chain.push(id);
            }
            let children = match tree.behavior(id).and_then(|b| b.as_composite()) {
                Some(composite) => composite.focus_scope(node.children()),
                None => node.children().to_vec(),
            };
            stack.extend(children.into_iter().rev());
        }
        chain
    }

    fn position_in(&self, chain: &[WidgetId]) -> Option<usize> {
        let current = self.focused?;
        chain.iter().position(|&id| id == current)
    }
}

/// Pick the spatial neighbour of `current` among chain members.
fn find_in_direction(
    tree: &WidgetTree,
    chain: &[WidgetId],
    current: WidgetId,
    direction: Direction,
) -> Option<WidgetId> {
    let from = tree.get(current)?.abs_rect();
    let center = from.center();

    chain
        .iter()
        .enumerate()
        .filter(|&(_, &id)| id != current)
        .filter_map(|(order, &id)| {
            let node = tree.get(id)?;
            if node.no_navigate() {
                return None;
            }
            let rect = node.abs_rect();
            let c = rect.center();
            let (axis, perp, overlaps) = match direction {
                Direction::Up => (center.y - c.y, c.x - center.x, overlaps_horizontally(&from, &rect)),
                Direction::Down => (c.y - center.y, c.x - center.x, overlaps_horizontally(&from, &rect)),
                Direction::Left => (center.x - c.x, c.y - center.y, overlaps_vertically(&from, &rect)),
                Direction::Right => (c.x - center.x, c.y - center.y, overlaps_vertically(&from, &rect)),
            };
            (overlaps && axis > 0).then_some(((axis, perp.abs(), order), id))
        })
        .min_by_key(|&(key, _)| key)
        .map(|(_, id)| id)
}

fn overlaps_horizontally(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && b.left() < a.right()
}

fn overlaps_vertically(a: &Rect, b: &Rect) -> bool {
    a.top() < b.bottom() && b.top() < a.bottom()
}
