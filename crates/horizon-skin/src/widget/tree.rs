//! The widget arena of one window.
//!
//! Nodes live in a `slotmap` keyed by [`WidgetId`]; behaviors live in a
//! secondary map beside them. Parents own their children through ordered id
//! lists and children point back with a plain id, so the tree has no
//! ownership cycles and removing a node removes its whole subtree.
//!
//! Every geometry change goes through [`WidgetTree::set_rect`], which keeps
//! the cached absolute rectangles of the affected subtree current and
//! re-lays out pinned children when a node changes size.

use horizon_skin_core::logging::targets;
use horizon_skin_core::{Point, Rect, Size};
use slotmap::{SecondaryMap, SlotMap};

use super::base::{Margins, WidgetId, WidgetNode};
use super::traits::Widget;
use super::widgets::Panel;
use crate::error::{SkinError, SkinResult};

/// Arena of widget nodes and their behaviors.
#[derive(Debug)]
pub struct WidgetTree {
    nodes: SlotMap<WidgetId, WidgetNode>,
    behaviors: SecondaryMap<WidgetId, Box<dyn Widget>>,
    root: WidgetId,
}

impl WidgetTree {
    /// Create a tree whose root panel covers `size`.
    pub fn new(size: Size) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(WidgetNode::new(Rect::from_size(size)).with_name("root"));
        let mut behaviors: SecondaryMap<WidgetId, Box<dyn Widget>> = SecondaryMap::new();
        behaviors.insert(root, Box::new(Panel::new()));
        Self {
            nodes,
            behaviors,
            root,
        }
    }

    /// The root node, which spans the window's client area.
    #[inline]
    pub fn root(&self) -> WidgetId {
        self.root
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check whether only the root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Check whether `id` names a live node.
    pub fn contains(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Get a node.
    pub fn get(&self, id: WidgetId) -> Option<&WidgetNode> {
        self.nodes.get(id)
    }

    /// Get a node mutably.
    ///
    /// Geometry and visibility must be changed through the tree so cached
    /// state stays consistent.
    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut WidgetNode> {
        self.nodes.get_mut(id)
    }

    /// Get a node's behavior.
    pub fn behavior(&self, id: WidgetId) -> Option<&dyn Widget> {
        self.behaviors.get(id).map(|b| &**b)
    }

    /// Get a node's behavior mutably.
    pub fn behavior_mut(&mut self, id: WidgetId) -> Option<&mut dyn Widget> {
        self.behaviors.get_mut(id).map(|b| &mut **b)
    }

    /// Get a node's behavior as a concrete type.
    pub fn behavior_as<T: Widget>(&self, id: WidgetId) -> Option<&T> {
        self.behavior(id)?.downcast_ref::<T>()
    }

    /// Borrow a node and its behavior together.
    pub fn node_and_behavior_mut(
        &mut self,
        id: WidgetId,
    ) -> Option<(&mut WidgetNode, &mut dyn Widget)> {
        let node = self.nodes.get_mut(id)?;
        let behavior = self.behaviors.get_mut(id)?;
        Some((node, &mut **behavior))
    }

    /// All node ids, in arena order.
    pub fn ids(&self) -> impl Iterator<Item = WidgetId> + '_ {
        self.nodes.keys()
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Append a node as the top-most child of `parent`.
    ///
    /// The node's rectangle is parent-local; margins for pinned layout are
    /// measured against the parent's current size.
    pub fn insert(
        &mut self,
        parent: WidgetId,
        mut node: WidgetNode,
        behavior: Box<dyn Widget>,
    ) -> SkinResult<WidgetId> {
        let Some(parent_node) = self.nodes.get(parent) else {
            return Err(SkinError::NoSuchWidget);
        };
        node.parent = Some(parent);
        node.children.clear();
        node.margins = Margins::measure(&node.rect, parent_node.size());
        node.abs_rect = node.rect.translate(parent_node.abs_rect.origin);

        let id = self.nodes.insert(node);
        self.behaviors.insert(id, behavior);
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(id);
        }
        Ok(id)
    }

    /// Remove a node and its subtree. The root cannot be removed.
    ///
    /// Returns the removed ids (preorder) with their behaviors, so the caller
    /// can release native resources.
    pub fn remove(&mut self, id: WidgetId) -> Vec<(WidgetId, Box<dyn Widget>)> {
        if id == self.root || !self.nodes.contains_key(id) {
            return Vec::new();
        }
        let subtree = self.preorder(id);
        if let Some(parent) = self.nodes.get(id).and_then(|n| n.parent)
            && let Some(parent_node) = self.nodes.get_mut(parent)
        {
            parent_node.children.retain(|&c| c != id);
        }

        let mut removed = Vec::with_capacity(subtree.len());
        for node_id in subtree {
            self.nodes.remove(node_id);
            if let Some(behavior) = self.behaviors.remove(node_id) {
                removed.push((node_id, behavior));
            }
        }
        removed
    }

    /// Ids of `start` and all its descendants, parents before children,
    /// siblings in z-order.
    pub fn preorder(&self, start: WidgetId) -> Vec<WidgetId> {
        let mut order = Vec::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            order.push(id);
            stack.extend(node.children.iter().rev().copied());
        }
        order
    }

    /// Iterate over the ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: WidgetId) -> impl Iterator<Item = WidgetId> + '_ {
        std::iter::successors(self.nodes.get(id).and_then(|n| n.parent), move |&p| {
            self.nodes.get(p).and_then(|n| n.parent)
        })
    }

    /// Check whether `id` lies in the subtree rooted at `ancestor`.
    pub fn is_descendant_of(&self, id: WidgetId, ancestor: WidgetId) -> bool {
        id == ancestor || self.ancestors(id).any(|a| a == ancestor)
    }

    /// Find the first node (preorder) with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<WidgetId> {
        self.preorder(self.root)
            .into_iter()
            .find(|&id| self.nodes.get(id).and_then(|n| n.name()) == Some(name))
    }

    /// Controls bound to `command`, in preorder.
    pub fn controls_with_command(&self, command: &str) -> Vec<WidgetId> {
        self.preorder(self.root)
            .into_iter()
            .filter(|&id| {
                self.nodes
                    .get(id)
                    .and_then(|n| n.control())
                    .is_some_and(|c| c.command() == command)
            })
            .collect()
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Move or resize a node (parent-local rectangle).
    ///
    /// Negative sizes are clamped to zero. Returns `false` for unknown ids.
    pub fn set_rect(&mut self, id: WidgetId, rect: Rect) -> bool {
        if rect.width() < 0 || rect.height() < 0 {
            tracing::error!(
                target: targets::WINDOW,
                width = rect.width(),
                height = rect.height(),
                "negative widget size clamped to zero"
            );
        }
        self.place(id, rect.normalized(), true)
    }

    /// Convert a window point into `id`'s local coordinates.
    pub fn to_local(&self, id: WidgetId, point: Point) -> Option<Point> {
        self.nodes
            .get(id)
            .map(|n| point.delta_from(n.abs_rect.origin))
    }

    /// Convert a widget-local rectangle into window coordinates.
    pub fn to_window(&self, id: WidgetId, rect: Rect) -> Option<Rect> {
        self.nodes.get(id).map(|n| rect.translate(n.abs_rect.origin))
    }

    fn place(&mut self, id: WidgetId, rect: Rect, remeasure: bool) -> bool {
        let parent_size = self
            .nodes
            .get(id)
            .and_then(|n| n.parent)
            .and_then(|p| self.nodes.get(p))
            .map(|p| p.size());
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        let old_size = node.rect.size;
        node.rect = rect;
        if remeasure && let Some(parent_size) = parent_size {
            node.margins = Margins::measure(&rect, parent_size);
        }

        self.update_abs_rects(id);
        if old_size != rect.size {
            self.relayout_children(id, rect.size);
        }
        true
    }

    /// Recompute cached absolute rectangles of `start`'s subtree.
    fn update_abs_rects(&mut self, start: WidgetId) {
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let parent_origin = self
                .nodes
                .get(id)
                .and_then(|n| n.parent)
                .and_then(|p| self.nodes.get(p))
                .map_or(Point::ZERO, |p| p.abs_rect.origin);
            if let Some(node) = self.nodes.get_mut(id) {
                node.abs_rect = node.rect.translate(parent_origin);
                stack.extend(node.children.iter().copied());
            }
        }
    }

    /// Re-apply pins of `id`'s children after it became `size`.
    fn relayout_children(&mut self, id: WidgetId, size: Size) {
        let children = match self.nodes.get(id) {
            Some(node) => node.children.clone(),
            None => return,
        };
        for child in children {
            let Some(node) = self.nodes.get(child) else {
                continue;
            };
            let pins = node.pins();
            if !pins.any() {
                continue;
            }
            let (m, r) = (node.margins, node.rect);

            let (x, width) = match (pins.left, pins.right) {
                (true, true) => (m.left, (size.width - m.left - m.right).max(0)),
                (false, true) => (size.width - m.right - r.width(), r.width()),
                _ => (r.left(), r.width()),
            };
            let (y, height) = match (pins.top, pins.bottom) {
                (true, true) => (m.top, (size.height - m.top - m.bottom).max(0)),
                (false, true) => (size.height - m.bottom - r.height(), r.height()),
                _ => (r.top(), r.height()),
            };

            let laid_out = Rect::new(x, y, width, height);
            if laid_out != r {
                self.place(child, laid_out, false);
            }
        }
    }

    // =========================================================================
    // Flags
    // =========================================================================

    /// Change a node's own visibility flag. Returns `true` if it changed.
    pub fn set_visible(&mut self, id: WidgetId, visible: bool) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) if node.visible != visible => {
                node.visible = visible;
                true
            }
            _ => false,
        }
    }

    /// Change a node's own enabled flag. Returns `true` if it changed.
    pub fn set_enabled(&mut self, id: WidgetId, enabled: bool) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) if node.enabled != enabled => {
                node.enabled = enabled;
                true
            }
            _ => false,
        }
    }

    /// Check whether the node and all its ancestors are visible.
    pub fn is_effectively_visible(&self, id: WidgetId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.visible)
            && self
                .ancestors(id)
                .all(|a| self.nodes.get(a).is_some_and(|n| n.visible))
    }

    /// Check whether the node and all its ancestors are enabled.
    pub fn is_effectively_enabled(&self, id: WidgetId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.enabled)
            && self
                .ancestors(id)
                .all(|a| self.nodes.get(a).is_some_and(|n| n.enabled))
    }
}
