//! Window configuration and builder.
//!
//! This module provides `WindowConfig`, a builder for the options a
//! [`Window`](super::Window) is created with. The same options can be read
//! from TOML, which lets a skin ship its window setup next to its images.

use horizon_skin_core::{Point, Size};
use horizon_skin_render::Color;
use serde::{Deserialize, Serialize};

use crate::error::SkinResult;

/// Configuration of a skinned window.
///
/// # Example
///
/// ```
/// use horizon_skin::window::WindowConfig;
///
/// let config = WindowConfig::new("Mixer")
///     .with_size(640, 360)
///     .with_drag_anywhere(true)
///     .with_preferences_key("mixer");
///
/// assert_eq!(config.size().width, 640);
/// assert!(config.drag_anywhere());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title. Default: empty.
    title: String,
    /// Client width in pixels. Default: 320.
    width: i32,
    /// Client height in pixels. Default: 240.
    height: i32,
    /// Initial screen position. Default: platform origin.
    position: Option<(i32, i32)>,
    /// Smallest client size accepted on resize. Default: 1x1.
    min_size: (i32, i32),
    /// Whether pressing on empty skin area drags the window. Default: off.
    drag_anywhere: bool,
    /// Whether the window has a system caption. Default: on.
    caption: bool,
    /// Whether the user may resize the window. Default: off.
    resizable: bool,
    /// Fill behind the skin background image. Default: black.
    background: Color,
    /// Key prefix for persisted state. Default: the window name.
    preferences_key: Option<String>,
    /// Whether closing asks the application first. Default: off.
    confirm_close: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new("")
    }
}

impl WindowConfig {
    /// Create a configuration with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            width: 320,
            height: 240,
            position: None,
            min_size: (1, 1),
            drag_anywhere: false,
            caption: true,
            resizable: false,
            background: Color::BLACK,
            preferences_key: None,
            confirm_close: false,
        }
    }

    /// Parse a configuration from TOML.
    pub fn from_toml_str(source: &str) -> SkinResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Set the client size.
    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the initial screen position.
    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.position = Some((x, y));
        self
    }

    /// Set the minimum client size.
    pub fn with_min_size(mut self, width: i32, height: i32) -> Self {
        self.min_size = (width, height);
        self
    }

    /// Drag the window by pressing on any non-interactive area.
    pub fn with_drag_anywhere(mut self, drag_anywhere: bool) -> Self {
        self.drag_anywhere = drag_anywhere;
        self
    }

    /// Set whether the window has a system caption.
    pub fn with_caption(mut self, caption: bool) -> Self {
        self.caption = caption;
        self
    }

    /// Set whether the window is resizable.
    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Set the background fill.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Set the preferences key prefix.
    pub fn with_preferences_key(mut self, key: impl Into<String>) -> Self {
        self.preferences_key = Some(key.into());
        self
    }

    /// Ask the application before closing.
    pub fn with_confirm_close(mut self, confirm: bool) -> Self {
        self.confirm_close = confirm;
        self
    }

    /// Window title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Client size.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub(crate) fn set_size(&mut self, size: Size) {
        self.width = size.width;
        self.height = size.height;
    }

    /// Initial screen position.
    pub fn position(&self) -> Point {
        self.position.map_or(Point::ZERO, Point::from)
    }

    /// Minimum client size.
    pub fn min_size(&self) -> Size {
        Size::new(self.min_size.0, self.min_size.1)
    }

    /// Whether empty skin area drags the window.
    pub fn drag_anywhere(&self) -> bool {
        self.drag_anywhere
    }

    /// Whether the window has a system caption.
    pub fn caption(&self) -> bool {
        self.caption
    }

    /// Whether the window is resizable.
    pub fn resizable(&self) -> bool {
        self.resizable
    }

    /// Background fill.
    pub fn background(&self) -> Color {
        self.background
    }

    pub(crate) fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    /// Preferences key prefix, if set explicitly.
    pub fn preferences_key(&self) -> Option<&str> {
        self.preferences_key.as_deref()
    }

    /// Whether closing asks the application first.
    pub fn confirm_close(&self) -> bool {
        self.confirm_close
    }
}
