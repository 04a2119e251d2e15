//! The skin root.
//!
//! A [`Skin`] owns every window of an application, the [`Platform`] they are
//! realized on, the [`Application`] and its [`AppContext`]. It drives the
//! whole toolkit from one thread:
//!
//! - [`pump`](Skin::pump) drains each window's event queue in arrival order
//!   and dispatches the events;
//! - commands emitted by controls bubble from the window's command table to
//!   the skin's own table and finally to [`Application::on_command`];
//! - every command's value is reflected into the other controls bound to it,
//!   in all windows, whoever handles it.
//!
//! # Example
//!
//! ```
//! use horizon_skin::platform::HeadlessPlatform;
//! use horizon_skin::skin::{AppContext, NullApplication, Skin, SkinNode};
//! use horizon_skin::window::WindowConfig;
//!
//! let mut skin = Skin::new(HeadlessPlatform::new(), NullApplication, AppContext::default());
//! let def = SkinNode::new("Window").child(
//!     SkinNode::new("Knob").rect(10, 10, 32, 32).attr("Name", "gain").attr("Command", "Gain"),
//! );
//! let main = skin.load_window("main", WindowConfig::new("Main"), &def).unwrap();
//! skin.open_window(main).unwrap();
//! skin.pump();
//!
//! assert!(skin.window(main).unwrap().is_shown());
//! ```

mod app;
mod command;
mod config;
mod loader;
mod throttle;

pub use app::{
    AppContext, AppEvent, Application, Diagnostic, Diagnostics, NullApplication, PromptResult,
    Severity, ThreadedHandler,
};
pub use command::{Command, CommandSource};
pub use config::SkinConfig;
pub use loader::{
    AttributeSet, FileImageProvider, ImageProvider, MemoryImageProvider, ParseContext, SkinNode,
    StateImages, WidgetConstructor, WidgetFactory,
};
pub use throttle::UpdateThrottle;

use std::time::Instant;

use horizon_skin_core::logging::{span_names, targets};
use horizon_skin_core::{EventSender, SkinEvent};
use slotmap::SlotMap;

use crate::error::{SkinError, SkinResult};
use crate::platform::{Platform, SurfaceHandle};
use crate::window::{Background, Window, WindowAction, WindowConfig, WindowId, WindowOutput};

/// Open the window named by the command target.
pub const CMD_OPEN_WINDOW: &str = "OpenWindow";
/// Close the window named by the command target.
pub const CMD_CLOSE_WINDOW: &str = "CloseWindow";
/// Open or close the window named by the command target.
pub const CMD_TOGGLE_OPEN: &str = "ToggleOpen";
/// Stop the skin.
pub const CMD_QUIT: &str = "Quit";

/// String table key of the close confirmation prompt.
pub const CONFIRM_CLOSE_KEY: &str = "confirm_close";

/// Upper bound of output rounds per dispatch, against command ping-pong
/// between windows.
const MAX_OUTPUT_ROUNDS: usize = 64;

/// The root of a skinned application.
pub struct Skin<P: Platform> {
    platform: P,
    windows: SlotMap<WindowId, Window>,
    app: Box<dyn Application>,
    ctx: AppContext,
    factory: WidgetFactory,
    images: Box<dyn ImageProvider>,
    running: bool,
}

impl<P: Platform + std::fmt::Debug> std::fmt::Debug for Skin<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Skin")
            .field("platform", &self.platform)
            .field("windows", &self.windows.len())
            .field("running", &self.running)
            .finish()
    }
}

impl<P: Platform> Skin<P> {
    /// Create a skin with the built-in widget kinds and no images.
    pub fn new(platform: P, app: impl Application + 'static, ctx: AppContext) -> Self {
        tracing::info!(target: targets::SKIN, "skin created");
        Self {
            platform,
            windows: SlotMap::with_key(),
            app: Box::new(app),
            ctx,
            factory: WidgetFactory::new(),
            images: Box::new(MemoryImageProvider::new()),
            running: true,
        }
    }

    /// Use an image provider for skin images.
    pub fn with_images(mut self, images: impl ImageProvider + 'static) -> Self {
        self.images = Box::new(images);
        self
    }

    /// Use a custom widget factory.
    pub fn with_factory(mut self, factory: WidgetFactory) -> Self {
        self.factory = factory;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The platform.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// The platform, mutably.
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// The application context.
    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    /// The application context, mutably.
    pub fn context_mut(&mut self) -> &mut AppContext {
        &mut self.ctx
    }

    /// A window by id.
    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(id)
    }

    /// A window by id, mutably.
    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.get_mut(id)
    }

    /// A window by name.
    pub fn window_by_name(&self, name: &str) -> Option<WindowId> {
        self.windows
            .iter()
            .find_map(|(id, w)| (w.name() == name).then_some(id))
    }

    /// Ids of all loaded windows.
    pub fn window_ids(&self) -> Vec<WindowId> {
        self.windows.keys().collect()
    }

    /// Whether the skin still runs (no quit command yet).
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Run a closure on a window together with the platform, then route
    /// whatever the window produced.
    pub fn with_window<R>(&mut self, id: WindowId, f: impl FnOnce(&mut Window, &mut dyn Platform) -> R) -> Option<R> {
        let window = self.windows.get_mut(id)?;
        let result = f(window, &mut self.platform);
        self.drain_outputs(Instant::now());
        Some(result)
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Build a window from a skin definition.
    ///
    /// The root node's `Color`, `Image` and `Tile` attributes form the window
    /// background; its children become the widget tree. Configuration
    /// problems are recorded in the context's diagnostics.
    pub fn load_window(&mut self, name: &str, config: WindowConfig, def: &SkinNode) -> SkinResult<WindowId> {
        if self.window_by_name(name).is_some() {
            tracing::warn!(target: targets::SKIN, name, "window name already in use");
            self.ctx
                .diagnostics_mut()
                .warn(format!("window name '{name}' is used twice; commands target the first"));
        }
        let skin_config = self.ctx.config().clone();
        let background_color = config.background();
        let id = self
            .windows
            .insert_with_key(|id| Window::new(id, name, config, skin_config.clone()));
        let window = &mut self.windows[id];

        {
            let mut cx = ParseContext::new(self.ctx.diagnostics_mut(), &*self.images, &skin_config);
            let attrs = &def.attributes;
            let background = Background {
                color: cx.color(attrs, "Color").unwrap_or(background_color),
                image: cx.image(attrs, "Image"),
                tile: cx.bool(attrs, "Tile", false),
            };
            window.set_background(background);
            let root = window.tree().root();
            loader::load_children(window.tree_mut(), root, def, &self.factory, &mut cx);
        }
        window.finish_load(&mut self.platform);

        let threaded: Vec<String> = self
            .ctx
            .threaded_commands()
            .filter(|name| !window.tree().controls_with_command(name).is_empty())
            .map(str::to_string)
            .collect();
        for name in threaded {
            if let Some(handler) = self.ctx.threaded_handler(&name) {
                window.add_threaded_command(name, handler);
            }
        }
        tracing::info!(target: targets::SKIN, name, widgets = window.tree().len(), "window loaded");
        self.drain_outputs(Instant::now());
        Ok(id)
    }

    /// Remove a window, closing it first.
    pub fn remove_window(&mut self, id: WindowId) -> SkinResult<()> {
        if self.windows.get(id).is_some_and(Window::is_shown) {
            self.close_now(id);
        }
        self.windows.remove(id).ok_or(SkinError::NoSuchWindow)?;
        Ok(())
    }

    // =========================================================================
    // Window lifecycle
    // =========================================================================

    /// Open (show) a window, restoring its saved preferences first.
    pub fn open_window(&mut self, id: WindowId) -> SkinResult<()> {
        let window = self.windows.get_mut(id).ok_or(SkinError::NoSuchWindow)?;
        if window.is_shown() {
            return window.show(&mut self.platform);
        }
        window.restore_preferences(&mut self.platform, self.ctx.preferences());
        if let Err(err) = window.show(&mut self.platform) {
            tracing::error!(target: targets::SKIN, %err, "cannot open window");
            self.app.display_error(&mut self.ctx, &err);
            return Err(err);
        }
        self.app.on_event(&mut self.ctx, &AppEvent::WindowOpened(id));
        self.drain_outputs(Instant::now());
        Ok(())
    }

    /// Close a window: ask the application if the window wants
    /// confirmation, save its preferences, stop its worker and destroy its
    /// surface.
    ///
    /// Returns `false` if the window was not shown or the user cancelled.
    pub fn close_window(&mut self, id: WindowId) -> SkinResult<bool> {
        let window = self.windows.get(id).ok_or(SkinError::NoSuchWindow)?;
        if !window.is_shown() {
            return Ok(false);
        }
        if window.config().confirm_close() {
            let message = self.ctx.string(CONFIRM_CLOSE_KEY).to_string();
            match self.app.prompt(&mut self.ctx, &message) {
                PromptResult::Accepted => {}
                PromptResult::Declined | PromptResult::Cancelled => {
                    tracing::debug!(target: targets::SKIN, "close cancelled");
                    return Ok(false);
                }
            }
        }
        self.close_now(id);
        Ok(true)
    }

    fn close_now(&mut self, id: WindowId) {
        let Some(window) = self.windows.get_mut(id) else {
            return;
        };
        window.save_preferences(self.ctx.preferences_mut());
        if let Err(err) = self.ctx.preferences_mut().flush() {
            tracing::warn!(target: targets::SKIN, %err, "cannot store preferences");
            self.app.display_error(&mut self.ctx, &err);
        }
        window.shutdown_worker();
        window.hide(&mut self.platform, true);
        tracing::info!(target: targets::SKIN, name = window.name(), "window closed");
        self.app.on_event(&mut self.ctx, &AppEvent::WindowClosed(id));
    }

    /// Hide a window, keeping its surface.
    pub fn hide_window(&mut self, id: WindowId) -> SkinResult<()> {
        let window = self.windows.get_mut(id).ok_or(SkinError::NoSuchWindow)?;
        window.hide(&mut self.platform, false);
        Ok(())
    }

    /// Open a closed window or close an open one.
    pub fn toggle_window(&mut self, id: WindowId) -> SkinResult<()> {
        let shown = self.windows.get(id).ok_or(SkinError::NoSuchWindow)?.is_shown();
        if shown {
            self.close_window(id).map(|_| ())
        } else {
            self.open_window(id)
        }
    }

    /// Embed a window into a host surface, or detach it with `None`.
    pub fn embed_window(&mut self, id: WindowId, host: Option<SurfaceHandle>) -> SkinResult<()> {
        let window = self.windows.get_mut(id).ok_or(SkinError::NoSuchWindow)?;
        let result = window.set_host(&mut self.platform, host);
        self.drain_outputs(Instant::now());
        result
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Post an event to a window's queue.
    pub fn post(&self, id: WindowId, event: SkinEvent) -> SkinResult<()> {
        self.windows.get(id).ok_or(SkinError::NoSuchWindow)?.post(event);
        Ok(())
    }

    /// A sender posting into a window's queue, usable from other threads.
    pub fn sender(&self, id: WindowId) -> Option<EventSender> {
        self.windows.get(id).map(Window::sender)
    }

    /// Dispatch every queued event. Returns the number of events handled.
    pub fn pump(&mut self) -> usize {
        self.pump_at(Instant::now())
    }

    /// [`pump`](Self::pump) with an explicit clock, for deterministic
    /// update throttling.
    pub fn pump_at(&mut self, now: Instant) -> usize {
        let _span = tracing::trace_span!(target: targets::SKIN, span_names::PUMP).entered();
        let mut handled = 0;
        for id in self.window_ids() {
            while let Some(window) = self.windows.get_mut(id)
                && let Some(event) = window.next_event()
            {
                window.handle_event(&mut self.platform, event);
                handled += 1;
                self.drain_outputs(now);
                for window in self.windows.values_mut() {
                    window.request_update(&mut self.platform, now);
                }
            }
        }
        for window in self.windows.values_mut() {
            window.flush_due(&mut self.platform, now);
        }
        if handled > 0 {
            tracing::trace!(target: targets::SKIN, handled, "pump");
        }
        handled
    }

    /// Route outputs of every window until none are left.
    fn drain_outputs(&mut self, now: Instant) {
        for _ in 0..MAX_OUTPUT_ROUNDS {
            let pending: Vec<(WindowId, Vec<WindowOutput>)> = self
                .windows
                .iter_mut()
                .map(|(id, w)| (id, w.take_outputs()))
                .filter(|(_, outputs)| !outputs.is_empty())
                .collect();
            if pending.is_empty() {
                return;
            }
            for (id, outputs) in pending {
                for output in outputs {
                    self.handle_output(id, output, now);
                }
            }
        }
        tracing::error!(target: targets::SKIN, "window outputs keep coming, giving up for this round");
    }

    fn handle_output(&mut self, id: WindowId, output: WindowOutput, now: Instant) {
        match output {
            WindowOutput::Command(command) => {
                self.dispatch_command(&command);
            }
            WindowOutput::Hint(text) => {
                self.app
                    .on_event(&mut self.ctx, &AppEvent::Hint { window: id, text });
            }
            WindowOutput::SessionEnded => {
                // Values reflected during the session may have dirtied other windows too.
                for (other, window) in self.windows.iter_mut() {
                    if other == id || window.needs_flush() {
                        window.complete_session(&mut self.platform, now);
                    }
                }
            }
            WindowOutput::CloseRequested => {
                if let Err(err) = self.close_window(id) {
                    self.app.display_error(&mut self.ctx, &err);
                }
            }
            WindowOutput::WorkerDone { command, result } => {
                let event = AppEvent::ThreadedCommandFinished {
                    window: id,
                    command,
                    result,
                };
                self.app.on_event(&mut self.ctx, &event);
            }
            WindowOutput::Error(err) => self.app.display_error(&mut self.ctx, &err),
            WindowOutput::Diagnostic(diagnostic) => self.ctx.diagnostics_mut().push(diagnostic),
        }
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Run a command programmatically, as if a control had emitted it.
    ///
    /// Returns `true` if someone handled it.
    pub fn execute(&mut self, command: Command) -> bool {
        let handled = self.dispatch_command(&command);
        self.drain_outputs(Instant::now());
        handled
    }

    fn dispatch_command(&mut self, command: &Command) -> bool {
        let _span =
            tracing::debug_span!(target: targets::COMMAND, span_names::COMMAND, command = %command.name).entered();

        for window in self.windows.values_mut() {
            window.reflect(&mut self.platform, command);
        }

        if let Some(source) = command.source
            && let Some(action) = self.windows.get(source.window).and_then(|w| w.command_action(command))
        {
            tracing::debug!(target: targets::COMMAND, ?action, "handled by window");
            self.run_window_action(source.window, action, command);
            return true;
        }

        if self.run_skin_command(command) {
            return true;
        }

        let handled = self.app.on_command(&mut self.ctx, command);
        if !handled {
            tracing::trace!(target: targets::COMMAND, command = %command.name, "unhandled");
        }
        handled
    }

    fn run_window_action(&mut self, id: WindowId, action: WindowAction, command: &Command) {
        let result = match action {
            WindowAction::Close => self.close_window(id).map(|_| ()),
            WindowAction::Hide => self.hide_window(id),
            WindowAction::Minimize => {
                if let Some(window) = self.windows.get_mut(id) {
                    window.minimize(&mut self.platform);
                }
                Ok(())
            }
            WindowAction::ShowWindow(name) => self.named(&name).and_then(|target| self.open_window(target)),
            WindowAction::ToggleWindow(name) => {
                self.named(&name).and_then(|target| self.toggle_window(target))
            }
            WindowAction::Threaded => match self.windows.get_mut(id) {
                Some(window) => window.submit_threaded(command).map(|_| ()),
                None => Err(SkinError::NoSuchWindow),
            },
        };
        if let Err(err) = result {
            self.app.display_error(&mut self.ctx, &err);
        }
    }

    fn run_skin_command(&mut self, command: &Command) -> bool {
        let target = command.target.as_deref().unwrap_or_default();
        let result = match command.name.as_str() {
            CMD_QUIT => {
                tracing::info!(target: targets::SKIN, "quit");
                self.running = false;
                self.app.on_event(&mut self.ctx, &AppEvent::Quit);
                Ok(())
            }
            CMD_OPEN_WINDOW => self.named(target).and_then(|id| self.open_window(id)),
            CMD_CLOSE_WINDOW => self.named(target).and_then(|id| self.close_window(id).map(|_| ())),
            CMD_TOGGLE_OPEN => self.named(target).and_then(|id| self.toggle_window(id)),
            _ => return false,
        };
        if let Err(err) = result {
            self.app.display_error(&mut self.ctx, &err);
        }
        true
    }

    fn named(&mut self, name: &str) -> SkinResult<WindowId> {
        match self.window_by_name(name) {
            Some(id) => Ok(id),
            None => {
                tracing::warn!(target: targets::SKIN, name, "command targets an unknown window");
                self.ctx
                    .diagnostics_mut()
                    .warn(format!("command targets unknown window '{name}'"));
                Err(SkinError::NoSuchWindow)
            }
        }
    }
}
