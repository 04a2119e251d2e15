//! Human-readable dumps of widget trees.
//!
//! ```
//! use horizon_skin::debug::{TreeFormatOptions, WidgetTreeDebug};
//! use horizon_skin::widget::{WidgetNode, WidgetTree};
//! use horizon_skin::widget::widgets::Panel;
//! use horizon_skin_core::{Rect, Size};
//!
//! let mut tree = WidgetTree::new(Size::new(100, 50));
//! tree.insert(tree.root(), WidgetNode::new(Rect::new(0, 0, 10, 10)).with_name("pad"), Box::new(Panel::new()))
//!     .unwrap();
//!
//! let dump = WidgetTreeDebug::with_options(TreeFormatOptions::minimal()).format(&tree);
//! assert_eq!(dump, "root\n\u{2514}\u{2500}\u{2500} pad\n");
//! ```

use std::fmt::Write;

use crate::widget::{WidgetId, WidgetTree};

/// Branch drawing style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Dashes only.
    Compact,
}

/// What a dump shows per widget.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    pub style: TreeStyle,
    /// Show widget ids.
    pub show_ids: bool,
    /// Show behavior kinds (`Knob`, `Panel`, ...).
    pub show_kinds: bool,
    /// Show absolute rectangles.
    pub show_rects: bool,
    /// Show flags and control values.
    pub show_state: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: false,
            show_kinds: true,
            show_rects: true,
            show_state: false,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Everything, including ids and state.
    pub fn detailed() -> Self {
        Self {
            show_ids: true,
            show_state: true,
            ..Default::default()
        }
    }

    /// Names only.
    pub fn minimal() -> Self {
        Self {
            show_kinds: false,
            show_rects: false,
            ..Default::default()
        }
    }
}

/// Formats a [`WidgetTree`] one widget per line.
#[derive(Debug, Clone, Default)]
pub struct WidgetTreeDebug {
    options: TreeFormatOptions,
}

impl WidgetTreeDebug {
    /// A formatter with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// A formatter with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format the whole tree.
    pub fn format(&self, tree: &WidgetTree) -> String {
        self.format_subtree(tree, tree.root())
    }

    /// Format the subtree below `start`.
    pub fn format_subtree(&self, tree: &WidgetTree, start: WidgetId) -> String {
        let mut output = String::new();
        self.format_into(tree, start, 0, true, &mut output);
        output
    }

    fn format_into(&self, tree: &WidgetTree, id: WidgetId, depth: usize, is_last: bool, output: &mut String) {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return;
        }
        let Some(node) = tree.get(id) else {
            return;
        };
        output.push_str(&self.prefix(depth, is_last));
        output.push_str(node.name().unwrap_or("(unnamed)"));

        if self.options.show_ids {
            let _ = write!(output, " [{id:?}]");
        }
        if self.options.show_kinds
            && let Some(behavior) = tree.behavior(id)
        {
            let _ = write!(output, " ({})", behavior.kind());
        }
        if self.options.show_rects {
            let r = node.abs_rect();
            let _ = write!(output, " @{},{} {}x{}", r.left(), r.top(), r.width(), r.height());
        }
        if self.options.show_state {
            let flags: Vec<&str> = [
                (!node.is_visible(), "hidden"),
                (!node.is_enabled(), "disabled"),
                (node.is_focused(), "focused"),
                (node.is_pressed(), "pressed"),
                (node.is_hovered(), "hovered"),
            ]
            .into_iter()
            .filter_map(|(on, flag)| on.then_some(flag))
            .collect();
            if !flags.is_empty() {
                let _ = write!(output, " <{}>", flags.join(","));
            }
            if let Some(control) = node.control() {
                let _ = write!(output, " {}={}", control.command(), control.value());
            }
        }
        output.push('\n');

        let children = node.children();
        for (i, &child) in children.iter().enumerate() {
            self.format_into(tree, child, depth + 1, i + 1 == children.len(), output);
        }
    }

    fn prefix(&self, depth: usize, is_last: bool) -> String {
        if depth == 0 {
            return String::new();
        }
        let (branch, tee, corner) = match self.options.style {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
            TreeStyle::Compact => ("", "-", "-"),
        };
        let mut prefix = String::new();
        for _ in 1..depth {
            prefix.push_str(branch);
            prefix.push_str(&" ".repeat(self.options.indent_size));
        }
        prefix.push_str(if is_last { corner } else { tee });
        prefix.push(' ');
        prefix
    }
}

impl std::fmt::Display for WidgetTreeDebug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WidgetTreeDebug({:?})", self.options.style)
    }
}

#[cfg(test)]
mod tests {
    use horizon_skin_core::{Rect, Size};

    use super::*;
    use crate::widget::widgets::{Knob, Panel};
    use crate::widget::{ControlState, WidgetNode};

    fn tree() -> WidgetTree {
        let mut tree = WidgetTree::new(Size::new(100, 100));
        let root = tree.root();
        let panel = tree
            .insert(root, WidgetNode::new(Rect::new(10, 10, 50, 50)).with_name("strip"), Box::new(Panel::new()))
            .unwrap();
        tree.insert(
            panel,
            WidgetNode::new(Rect::new(5, 5, 20, 20))
                .with_name("gain")
                .with_control(ControlState::new("Gain")),
            Box::new(Knob::new()),
        )
        .unwrap();
        tree.insert(root, WidgetNode::new(Rect::new(0, 80, 100, 20)).with_name("footer"), Box::new(Panel::new()))
            .unwrap();
        tree
    }

    #[test]
    fn test_ascii_layout() {
        let dump = WidgetTreeDebug::with_options(TreeFormatOptions {
            style: TreeStyle::Ascii,
            ..TreeFormatOptions::minimal()
        })
        .format(&tree());
        assert_eq!(dump, "root\n+-- strip\n|  `-- gain\n`-- footer\n");
    }

    #[test]
    fn test_kinds_rects_and_state() {
        let dump = WidgetTreeDebug::with_options(TreeFormatOptions {
            show_state: true,
            ..TreeFormatOptions::default()
        })
        .format(&tree());
        assert!(dump.contains("gain (Knob) @15,15 20x20 Gain=0"));
        assert!(dump.contains("footer (Panel) @0,80 100x20"));
    }

    #[test]
    fn test_max_depth() {
        let dump = WidgetTreeDebug::with_options(TreeFormatOptions {
            max_depth: Some(1),
            ..TreeFormatOptions::minimal()
        })
        .format(&tree());
        assert!(!dump.contains("gain"));
        assert!(dump.contains("footer"));
    }
}
