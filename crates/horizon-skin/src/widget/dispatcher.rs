//! Pointer dispatch helpers: hit testing and cursor resolution.
//!
//! # Hit Testing
//!
//! [`hit_test`] walks the tree from the root, visiting only visible and
//! enabled nodes whose absolute rectangle contains the point. Siblings are
//! tried top-most first (reverse insertion order) and a match inside a child
//! beats its parent, so the deepest, last-inserted interactive widget wins.
//!
//! Widgets realized as native child controls are skipped: the platform
//! delivers their input directly.

use cursor_icon::CursorIcon;
use horizon_skin_core::Point;

use super::base::WidgetId;
use super::tree::WidgetTree;

/// Find the interactive widget under a window point.
pub fn hit_test(tree: &WidgetTree, point: Point) -> Option<WidgetId> {
    let root = tree.get(tree.root())?;
    if !root.is_visible() || !root.is_enabled() || !root.abs_rect().contains(point) {
        return None;
    }
    hit_test_children(tree, tree.root(), point)
}

fn hit_test_children(tree: &WidgetTree, parent: WidgetId, point: Point) -> Option<WidgetId> {
    let node = tree.get(parent)?;
    for &child in node.children().iter().rev() {
        let Some(child_node) = tree.get(child) else {
            continue;
        };
        if !child_node.is_visible()
            || !child_node.is_enabled()
            || !child_node.abs_rect().contains(point)
        {
            continue;
        }
        if let Some(hit) = hit_test_children(tree, child, point) {
            return Some(hit);
        }
        if is_interactive(tree, child) {
            return Some(child);
        }
    }
    None
}

/// Check whether a widget takes part in hit testing.
pub fn is_interactive(tree: &WidgetTree, id: WidgetId) -> bool {
    let is_control = tree.get(id).is_some_and(|n| n.is_control());
    is_control
        && tree
            .behavior(id)
            .is_some_and(|b| b.interactive() && b.as_native().is_none())
}

/// The cursor to show over a widget: its own, else the nearest ancestor's,
/// else the default arrow.
pub fn resolve_cursor(tree: &WidgetTree, id: WidgetId) -> CursorIcon {
    std::iter::once(id)
        .chain(tree.ancestors(id))
        .find_map(|w| tree.get(w).and_then(|n| n.cursor()))
        .unwrap_or(CursorIcon::Default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::widgets::{Button, Panel};
    use crate::widget::{ControlState, WidgetNode};
    use horizon_skin_core::{Rect, Size};

    fn button(rect: Rect) -> WidgetNode {
        WidgetNode::new(rect).with_control(ControlState::new("b"))
    }

    #[test]
    fn test_last_inserted_sibling_wins() {
        let mut tree = WidgetTree::new(Size::new(100, 100));
        let root = tree.root();
        let below = tree.insert(root, button(Rect::new(0, 0, 50, 50)), Box::new(Button::new())).unwrap();
        let above = tree.insert(root, button(Rect::new(25, 25, 50, 50)), Box::new(Button::new())).unwrap();

        assert_eq!(hit_test(&tree, Point::new(30, 30)), Some(above));
        assert_eq!(hit_test(&tree, Point::new(10, 10)), Some(below));
        assert_eq!(hit_test(&tree, Point::new(90, 10)), None);
    }

    #[test]
    fn test_deepest_widget_wins_and_panels_are_transparent() {
        let mut tree = WidgetTree::new(Size::new(100, 100));
        let root = tree.root();
        let outer = tree.insert(root, button(Rect::new(0, 0, 80, 80)), Box::new(Button::new())).unwrap();
        let group = tree
            .insert(outer, WidgetNode::new(Rect::new(10, 10, 40, 40)), Box::new(Panel::new()))
            .unwrap();
        let inner = tree.insert(group, button(Rect::new(5, 5, 10, 10)), Box::new(Button::new())).unwrap();

        assert_eq!(hit_test(&tree, Point::new(16, 16)), Some(inner));
        // Inside the panel but not the inner button: the panel is skipped.
        assert_eq!(hit_test(&tree, Point::new(40, 40)), Some(outer));
    }

    #[test]
    fn test_hidden_and_disabled_are_skipped() {
        let mut tree = WidgetTree::new(Size::new(100, 100));
        let root = tree.root();
        let below = tree.insert(root, button(Rect::new(0, 0, 50, 50)), Box::new(Button::new())).unwrap();
        let above = tree.insert(root, button(Rect::new(0, 0, 50, 50)), Box::new(Button::new())).unwrap();

        tree.set_visible(above, false);
        assert_eq!(hit_test(&tree, Point::new(5, 5)), Some(below));
        tree.set_enabled(below, false);
        assert_eq!(hit_test(&tree, Point::new(5, 5)), None);
    }

    #[test]
    fn test_cursor_is_inherited() {
        let mut tree = WidgetTree::new(Size::new(100, 100));
        let root = tree.root();
        let group = tree
            .insert(
                root,
                WidgetNode::new(Rect::new(0, 0, 50, 50)).with_cursor(CursorIcon::Pointer),
                Box::new(Panel::new()),
            )
            .unwrap();
        let child = tree.insert(group, button(Rect::new(0, 0, 10, 10)), Box::new(Button::new())).unwrap();

        assert_eq!(resolve_cursor(&tree, child), CursorIcon::Pointer);
        assert_eq!(resolve_cursor(&tree, root), CursorIcon::Default);
    }
}
