//! Prelude module for Horizon Skin.
//!
//! ```
//! use horizon_skin::prelude::*;
//! ```
//!
//! This provides access to:
//! - The skin root and application traits (`Skin`, `Application`, `AppContext`)
//! - Skin definitions (`SkinNode`, `WidgetFactory`, image providers)
//! - Windows and their configuration (`Window`, `WindowConfig`)
//! - Widget foundation (`Widget`, `WidgetNode`, `WidgetTree`, `ControlState`)
//! - Built-in widgets (`Button`, `Knob`, `Slider`, ...)
//! - Geometry and color types (`Point`, `Size`, `Rect`, `Region`, `Color`)

// ============================================================================
// Skin root and application
// ============================================================================

pub use crate::skin::{
    AppContext, AppEvent, Application, Command, NullApplication, PromptResult, Skin, SkinConfig,
};

// ============================================================================
// Skin definitions
// ============================================================================

pub use crate::skin::{AttributeSet, ImageProvider, MemoryImageProvider, SkinNode, WidgetFactory};

// ============================================================================
// Windows and platform
// ============================================================================

pub use crate::platform::{HeadlessPlatform, Platform};
pub use crate::window::{Window, WindowConfig, WindowId};

// ============================================================================
// Widgets
// ============================================================================

pub use crate::widget::widgets::{
    Button, ImageView, Knob, Label, NativeControl, Panel, Slider, TabPages, Toggle,
};
pub use crate::widget::{ControlState, Widget, WidgetCx, WidgetId, WidgetNode, WidgetTree};

// ============================================================================
// Preferences and errors
// ============================================================================

pub use crate::error::{SkinError, SkinResult};
pub use crate::preferences::{MemoryPreferences, Preferences};

// ============================================================================
// Geometry and color
// ============================================================================

pub use horizon_skin_core::{Key, Modifiers, MouseButton, Point, Rect, Region, SkinEvent, Size};
pub use horizon_skin_render::Color;
