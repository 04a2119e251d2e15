//! Widget system for Horizon Skin.
//!
//! This module provides the widget architecture the window drives:
//!
//! - [`WidgetNode`]: geometry, flags and tree links shared by every element
//! - [`Widget`] trait: the behavior paired with each node
//! - [`WidgetTree`]: the per-window arena owning nodes and behaviors
//! - [`FocusManager`]: the keyboard focus chain and directional navigation
//! - [`hit_test`]: resolving the interactive widget under a point
//!
//! # Overview
//!
//! Nodes and behaviors are stored side by side in a `slotmap` arena keyed by
//! [`WidgetId`]. Parents own their children by id; a node's absolute
//! rectangle is cached and recomputed for the whole subtree whenever an
//! ancestor moves or resizes.
//!
//! Behaviors never see the tree. Hooks receive a [`WidgetCx`] scoped to
//! their own node and request side effects (repaint, commands, page
//! selection) as [`Effects`] that the window applies afterwards.
//!
//! ```
//! use horizon_skin::widget::{ControlState, WidgetNode, WidgetTree};
//! use horizon_skin::widget::widgets::{Knob, Panel};
//! use horizon_skin_core::{Rect, Size};
//!
//! let mut tree = WidgetTree::new(Size::new(200, 100));
//! let panel = tree
//!     .insert(tree.root(), WidgetNode::new(Rect::new(10, 10, 100, 50)), Box::new(Panel::new()))
//!     .unwrap();
//! let knob = tree
//!     .insert(
//!         panel,
//!         WidgetNode::new(Rect::new(5, 5, 20, 20)).with_control(ControlState::new("Gain")),
//!         Box::new(Knob::new()),
//!     )
//!     .unwrap();
//!
//! assert_eq!(tree.get(knob).unwrap().abs_rect(), Rect::new(15, 15, 20, 20));
//! ```

mod base;
mod control;
mod dispatcher;
mod focus;
mod traits;
mod tree;
pub mod widgets;

pub use base::{Pins, WidgetId, WidgetNode};
pub use control::{ControlState, DeltaFilter, MAX_SMOOTHING};
pub use dispatcher::{hit_test, is_interactive, resolve_cursor};
pub use focus::{Direction, FocusChange, FocusManager};
pub use traits::{Composite, Drawable, Effects, Focusable, NativeBacked, Widget, WidgetCx};
pub use tree::WidgetTree;
