//! Error types for Horizon Skin.
//!
//! Only resource failures surface as errors. Configuration problems are
//! recovered where they are found (defaults, placeholder images) and recorded
//! as diagnostics, and user cancellation is a [`PromptResult`] rather than an
//! error.
//!
//! [`PromptResult`]: crate::skin::PromptResult

use horizon_skin_core::CoreError;
use horizon_skin_render::RenderError;
use thiserror::Error;

/// The main error type for Horizon Skin operations.
#[derive(Debug, Error)]
pub enum SkinError {
    /// A native resource (surface, child control) could not be created.
    #[error("failed to create {what}: {reason}")]
    Resource { what: String, reason: String },

    /// A window id does not name an open window.
    #[error("no such window")]
    NoSuchWindow,

    /// A widget id does not name a widget of the window.
    #[error("no such widget")]
    NoSuchWidget,

    /// The window has no native surface yet.
    #[error("window '{0}' is not shown")]
    NotShown(String),

    /// Reading or writing a preferences or configuration file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A preferences or configuration file is not valid TOML.
    #[error("invalid TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Preferences could not be serialized.
    #[error("failed to serialize TOML: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    /// Error from a core primitive (worker, event queue).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Error from the render backend.
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl SkinError {
    /// Build a [`SkinError::Resource`].
    pub fn resource(what: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Resource {
            what: what.into(),
            reason: reason.into(),
        }
    }
}

/// A specialized Result type for Horizon Skin operations.
pub type SkinResult<T> = std::result::Result<T, SkinError>;
