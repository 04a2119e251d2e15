//! The application side of a skin: handler trait and explicit context.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use horizon_skin_core::logging::targets;

use super::command::Command;
use super::config::SkinConfig;
use crate::error::SkinError;
use crate::preferences::{MemoryPreferences, Preferences};
use crate::window::WindowId;

// =========================================================================
// Diagnostics
// =========================================================================

/// Severity of a recorded diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// A configuration problem that was recovered from.
    Warning,
    /// A degraded invariant.
    Error,
}

/// A recorded configuration or invariant problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    /// A warning.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    /// An error.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{level}: {}", self.message)
    }
}

/// Diagnostics collected while loading skins and running windows.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record and log a warning.
    pub fn warn(&mut self, message: impl Into<String>) {
        let diagnostic = Diagnostic::warning(message);
        tracing::warn!(target: targets::SKIN, "{}", diagnostic.message);
        self.entries.push(diagnostic);
    }

    /// Record and log an error.
    pub fn error(&mut self, message: impl Into<String>) {
        let diagnostic = Diagnostic::error(message);
        tracing::error!(target: targets::SKIN, "{}", diagnostic.message);
        self.entries.push(diagnostic);
    }

    /// Record a diagnostic that was already logged.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// All recorded diagnostics, oldest first.
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Recorded warnings.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.severity == Severity::Warning)
    }

    /// Number of diagnostics.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove and return all diagnostics.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.entries)
    }
}

// =========================================================================
// Application
// =========================================================================

/// Answer to a yes/no/cancel prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptResult {
    Accepted,
    Declined,
    Cancelled,
}

/// Notifications delivered to [`Application::on_event`].
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The hint of the hovered widget changed. `None` clears it.
    Hint {
        window: WindowId,
        text: Option<String>,
    },
    /// A window was opened (shown).
    WindowOpened(WindowId),
    /// A window was closed.
    WindowClosed(WindowId),
    /// A threaded command finished on its window's worker.
    ThreadedCommandFinished {
        window: WindowId,
        command: String,
        result: Result<String, String>,
    },
    /// The skin stops running.
    Quit,
}

/// Work run on a window's background worker for a threaded command.
pub type ThreadedHandler = Arc<dyn Fn(&Command) -> Result<String, String> + Send + Sync>;

/// The application hosting a skin.
///
/// Commands nobody else handled end up in [`on_command`](Self::on_command).
pub trait Application {
    /// Handle a command. Returns `true` if it was handled.
    fn on_command(&mut self, ctx: &mut AppContext, command: &Command) -> bool {
        let _ = (ctx, command);
        false
    }

    /// Observe a skin notification.
    fn on_event(&mut self, ctx: &mut AppContext, event: &AppEvent) {
        let _ = (ctx, event);
    }

    /// Show an error to the user.
    fn display_error(&mut self, ctx: &mut AppContext, error: &SkinError) {
        let _ = ctx;
        tracing::error!(target: targets::SKIN, %error, "unhandled skin error");
    }

    /// Ask the user a yes/no/cancel question.
    fn prompt(&mut self, ctx: &mut AppContext, message: &str) -> PromptResult {
        let _ = (ctx, message);
        PromptResult::Accepted
    }
}

/// An application that handles nothing.
#[derive(Debug, Default)]
pub struct NullApplication;

impl Application for NullApplication {}

// =========================================================================
// AppContext
// =========================================================================

/// Application-wide state threaded through every handler.
pub struct AppContext {
    strings: HashMap<String, String>,
    diagnostics: Diagnostics,
    preferences: Box<dyn Preferences>,
    threaded: HashMap<String, ThreadedHandler>,
    config: SkinConfig,
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("strings", &self.strings.len())
            .field("diagnostics", &self.diagnostics.len())
            .field("threaded", &self.threaded.keys().collect::<Vec<_>>())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new(SkinConfig::default())
    }
}

impl AppContext {
    /// A context with in-memory preferences.
    pub fn new(config: SkinConfig) -> Self {
        Self {
            strings: HashMap::new(),
            diagnostics: Diagnostics::new(),
            preferences: Box::new(MemoryPreferences::new()),
            threaded: HashMap::new(),
            config,
        }
    }

    /// Replace the preferences store.
    pub fn with_preferences(mut self, preferences: impl Preferences + 'static) -> Self {
        self.preferences = Box::new(preferences);
        self
    }

    /// Register a string.
    pub fn with_string(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.strings.insert(key.into(), value.into());
        self
    }

    /// Look up a localized string, falling back to the key.
    pub fn string<'a>(&'a self, key: &'a str) -> &'a str {
        self.strings.get(key).map_or(key, String::as_str)
    }

    /// Register a command that runs on the emitting window's worker.
    pub fn register_threaded<F>(&mut self, command: impl Into<String>, handler: F)
    where
        F: Fn(&Command) -> Result<String, String> + Send + Sync + 'static,
    {
        self.threaded.insert(command.into(), Arc::new(handler));
    }

    /// The threaded handler for a command.
    pub fn threaded_handler(&self, command: &str) -> Option<ThreadedHandler> {
        self.threaded.get(command).cloned()
    }

    /// Names of all threaded commands.
    pub fn threaded_commands(&self) -> impl Iterator<Item = &str> {
        self.threaded.keys().map(String::as_str)
    }

    /// Collected diagnostics.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Collected diagnostics, mutably.
    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    /// The preferences store.
    pub fn preferences(&self) -> &dyn Preferences {
        &*self.preferences
    }

    /// The preferences store, mutably.
    pub fn preferences_mut(&mut self) -> &mut dyn Preferences {
        &mut *self.preferences
    }

    /// Toolkit settings.
    pub fn config(&self) -> &SkinConfig {
        &self.config
    }
}
