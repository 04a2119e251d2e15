//! Horizon Skin - a skin-driven, retained-mode GUI core.
//!
//! Windows are described by a declarative skin definition (a tree of
//! [`SkinNode`](skin::SkinNode)s) and realized as composited widget trees on
//! native surfaces provided by a [`Platform`](platform::Platform). Geometry,
//! events and the worker live in `horizon_skin_core`; images and damage
//! tracking in `horizon_skin_render`, re-exported as [`render`].
//!
//! # Example
//!
//! ```
//! use horizon_skin::prelude::*;
//!
//! let mut skin = Skin::new(HeadlessPlatform::new(), NullApplication, AppContext::default());
//! let def = SkinNode::new("Window")
//!     .attr("Color", "#202020")
//!     .child(SkinNode::new("Button").rect(10, 10, 40, 20).attr("Command", "Quit"));
//! let main = skin.load_window("main", WindowConfig::new("Demo").with_size(200, 100), &def).unwrap();
//! skin.open_window(main).unwrap();
//!
//! skin.execute(Command::new("Quit"));
//! assert!(!skin.is_running());
//! ```
//!
//! # Logging
//!
//! Every module logs through `tracing` under the targets listed in
//! `horizon_skin_core::logging::targets`. Install a subscriber in the host application
//! to see them.

pub mod debug;
pub mod error;
pub mod platform;
pub mod preferences;
pub mod prelude;
pub mod skin;
pub mod widget;
pub mod window;

pub use error::{SkinError, SkinResult};

/// Software rendering: images, colors, damage tracking.
pub mod render {
    pub use horizon_skin_render::*;
}
