//! Skinned windows.
//!
//! A [`Window`] owns one widget tree and everything needed to drive it: the
//! off-screen composite image, the dirty region, the exclusion region of
//! native child controls, keyboard focus, mouse capture and an inbound
//! [`EventQueue`]. It is bound to at most one native surface at a time; the
//! surface is created on [`show`](Window::show), may be torn down and
//! recreated (for example when the window is embedded into a host), while the
//! window and its widget state persist.
//!
//! Window methods never call back into the skin. Whatever must travel further
//! (commands, hint changes, errors) is queued as [`WindowOutput`] and picked up
//! by the skin after each event.
//!
//! The implementation is split by concern:
//!
//! - `compositor`: invalidation, redraw and presentation
//! - `capture`: hit testing, hover and mouse capture
//! - `keyboard`: focus and key routing
//! - `commands`: the window command table, threaded commands and reflection

mod capture;
mod commands;
mod compositor;
mod keyboard;
mod window_config;

pub use capture::CaptureState;
pub use commands::WindowAction;
pub use window_config::WindowConfig;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use horizon_skin_core::logging::targets;
use horizon_skin_core::{
    EventQueue, EventSender, MouseButton, Point, Rect, Region, SkinEvent, Size, TimerId, Worker,
};
use horizon_skin_render::{Color, DamageTracker, ImageBuffer};

use crate::error::{SkinError, SkinResult};
use crate::platform::{Platform, SurfaceDesc, SurfaceHandle};
use crate::preferences::Preferences;
use crate::skin::{Command, Diagnostic, SkinConfig, ThreadedHandler, UpdateThrottle};
use crate::widget::{Effects, FocusManager, Widget, WidgetCx, WidgetId, WidgetTree};

slotmap::new_key_type! {
    /// Identifier of a window inside a skin.
    pub struct WindowId;
}

/// Timer driving track ticks of the captured widget.
pub const TRACK_TIMER: TimerId = TimerId(1);

/// Something a window hands to the skin.
#[derive(Debug)]
pub enum WindowOutput {
    /// A widget emitted a command (source already set).
    Command(Command),
    /// The hint of the hovered widget changed.
    Hint(Option<String>),
    /// A mouse session ended; coalesced updates should be flushed.
    SessionEnded,
    /// The platform asked to close the window.
    CloseRequested,
    /// A threaded command finished.
    WorkerDone {
        command: String,
        result: Result<String, String>,
    },
    /// A resource error that aborted an operation for one widget.
    Error(SkinError),
    /// A recovered problem worth reporting.
    Diagnostic(Diagnostic),
}

/// Background of the window, painted below every widget.
#[derive(Debug, Clone, Default)]
pub(crate) struct Background {
    pub color: Color,
    pub image: Option<Arc<ImageBuffer>>,
    pub tile: bool,
}

/// A skinned window.
pub struct Window {
    id: WindowId,
    name: String,
    config: WindowConfig,
    skin_config: SkinConfig,

    tree: WidgetTree,
    background: Background,
    composite: ImageBuffer,
    exclusion: Region,
    damage: DamageTracker,
    throttle: UpdateThrottle,
    painting: bool,

    focus: FocusManager,
    capture: CaptureState,
    hint: Option<String>,

    queue: EventQueue,
    threaded: HashMap<String, ThreadedHandler>,
    worker: Option<Worker>,

    surface: Option<SurfaceHandle>,
    host: Option<SurfaceHandle>,
    position: Point,

    outputs: Vec<WindowOutput>,
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("widgets", &self.tree.len())
            .field("surface", &self.surface)
            .field("capture", &self.capture)
            .finish()
    }
}

impl Window {
    /// Create a window with an empty widget tree.
    pub fn new(id: WindowId, name: impl Into<String>, config: WindowConfig, skin_config: SkinConfig) -> Self {
        let size = config.size();
        let size = Size::new(size.width.max(1), size.height.max(1));
        let throttle = UpdateThrottle::new(skin_config.update_interval());
        let position = config.position();
        Self {
            id,
            name: name.into(),
            background: Background {
                color: config.background(),
                ..Background::default()
            },
            config,
            skin_config,
            tree: WidgetTree::new(size),
            composite: ImageBuffer::new(size),
            exclusion: Region::new(),
            damage: DamageTracker::with_viewport(Rect::from_size(size)),
            throttle,
            painting: false,
            focus: FocusManager::new(),
            capture: CaptureState::Idle,
            hint: None,
            queue: EventQueue::new(),
            threaded: HashMap::new(),
            worker: None,
            surface: None,
            host: None,
            position,
            outputs: Vec::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The window's identifier.
    #[inline]
    pub fn id(&self) -> WindowId {
        self.id
    }

    /// The window's name (used as a command target).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The window configuration.
    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// The widget tree.
    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    /// The widget tree, mutably.
    ///
    /// Changes made here bypass invalidation; prefer the window's own
    /// setters for geometry and visibility, and
    /// [`remove_widget`](Self::remove_widget) for removal.
    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        &mut self.tree
    }

    /// Client size.
    pub fn size(&self) -> Size {
        self.composite.size()
    }

    /// The client rectangle.
    pub fn client_rect(&self) -> Rect {
        Rect::from_size(self.size())
    }

    /// Screen position (relative to the host when embedded).
    pub fn position(&self) -> Point {
        self.position
    }

    /// The live native surface.
    pub fn surface(&self) -> Option<SurfaceHandle> {
        self.surface
    }

    /// The surface this window is embedded into.
    pub fn host(&self) -> Option<SurfaceHandle> {
        self.host
    }

    /// Whether the window currently has a native surface.
    pub fn is_shown(&self) -> bool {
        self.surface.is_some()
    }

    /// The keyboard focus.
    pub fn focused(&self) -> Option<WidgetId> {
        self.focus.focused()
    }

    /// The hint text of the hovered widget.
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Post an event to the window's queue.
    pub fn post(&self, event: SkinEvent) {
        self.queue.post(event);
    }

    /// A sender posting into the window's queue.
    pub fn sender(&self) -> EventSender {
        self.queue.sender()
    }

    /// Number of queued events.
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Look up a widget by name.
    pub fn find(&self, name: &str) -> Option<WidgetId> {
        self.tree.find_by_name(name)
    }

    /// The value of a control.
    pub fn value(&self, id: WidgetId) -> Option<f32> {
        self.tree.get(id)?.control().map(|c| c.value())
    }

    pub(crate) fn take_outputs(&mut self) -> Vec<WindowOutput> {
        std::mem::take(&mut self.outputs)
    }

    pub(crate) fn next_event(&self) -> Option<SkinEvent> {
        self.queue.pop()
    }

    fn diagnostic(&mut self, diagnostic: Diagnostic) {
        self.outputs.push(WindowOutput::Diagnostic(diagnostic));
    }

    // =========================================================================
    // Loading
    // =========================================================================

    pub(crate) fn set_background(&mut self, background: Background) {
        self.background = background;
        self.config.set_background(self.background.color);
    }

    /// Apply the state the skin definition selected once all widgets exist:
    /// selected tab pages, the exclusion region and a full repaint.
    pub(crate) fn finish_load(&mut self, platform: &mut dyn Platform) {
        let composites: Vec<(WidgetId, usize)> = self
            .tree
            .preorder(self.tree.root())
            .into_iter()
            .filter_map(|id| {
                let composite = self.tree.behavior(id)?.as_composite()?;
                Some((id, composite.selected()))
            })
            .collect();
        for (id, selected) in composites {
            let pages = self.tree.get(id).map_or(0, |n| n.children().len());
            // A page container's value is the selected page index.
            if let Some(control) = self.tree.get_mut(id).and_then(|n| n.control_mut()) {
                control.set_range(0.0, pages.saturating_sub(1) as f32);
            }
            self.select_page(platform, id, selected);
        }
        self.regenerate_exclusion();
        self.damage.invalidate_all();
    }

    // =========================================================================
    // Behavior calls
    // =========================================================================

    /// Run a behavior hook and apply the effects it requested.
    pub(crate) fn with_behavior<R>(
        &mut self,
        platform: &mut dyn Platform,
        id: WidgetId,
        f: impl FnOnce(&mut dyn Widget, &mut WidgetCx<'_>) -> R,
    ) -> Option<R> {
        let mut effects = Effects::default();
        let result = {
            let (node, behavior) = self.tree.node_and_behavior_mut(id)?;
            let mut cx = WidgetCx::new(id, node, &mut effects, &self.skin_config);
            f(behavior, &mut cx)
        };
        self.apply_effects(platform, id, effects, true);
        Some(result)
    }

    pub(crate) fn apply_effects(
        &mut self,
        platform: &mut dyn Platform,
        id: WidgetId,
        effects: Effects,
        allow_commands: bool,
    ) {
        if effects.is_empty() {
            return;
        }
        for rect in effects.invalidations {
            self.invalidate(id, rect, false);
        }
        if effects.sync_native {
            self.push_native_text(platform, id);
        }
        if let Some(index) = effects.select_page {
            self.select_page(platform, id, index);
        }
        for command in effects.commands {
            if allow_commands {
                self.outputs
                    .push(WindowOutput::Command(command.with_source(self.id, id)));
            } else {
                tracing::trace!(
                    target: targets::COMMAND,
                    command = %command.name,
                    "command emitted during reflection dropped"
                );
            }
        }
    }

    // =========================================================================
    // Event dispatch
    // =========================================================================

    /// Dispatch one inbound event.
    pub fn handle_event(&mut self, platform: &mut dyn Platform, event: SkinEvent) {
        tracing::trace!(target: targets::WINDOW, window = %self.name, event = event.name(), "dispatch");
        match event {
            SkinEvent::PointerMove { pos, screen } => self.pointer_move(platform, pos, screen),
            SkinEvent::PointerDown {
                pos,
                screen,
                button: MouseButton::Left,
            } => self.pointer_down(platform, pos, screen),
            SkinEvent::PointerUp {
                pos,
                screen,
                button: MouseButton::Left,
            } => self.pointer_up(platform, pos, screen),
            SkinEvent::PointerDown { .. } | SkinEvent::PointerUp { .. } => {}
            SkinEvent::PointerLeave => self.pointer_leave(platform),
            SkinEvent::Wheel { pos, delta } => self.wheel(platform, pos, delta),
            SkinEvent::KeyDown { key, modifiers } => {
                self.key_down(platform, key, modifiers);
            }
            SkinEvent::Paint { region } => self.redraw(platform, region.as_ref()),
            SkinEvent::Resize { size } => self.resize(platform, size),
            SkinEvent::Moved { pos } => self.position = pos,
            SkinEvent::FocusGained => {}
            SkinEvent::FocusLost => self.focus_lost(platform),
            SkinEvent::Timer { id } if id == TRACK_TIMER => self.track_timer_tick(platform),
            SkinEvent::Timer { .. } => {}
            SkinEvent::CloseRequested => self.outputs.push(WindowOutput::CloseRequested),
            SkinEvent::WorkerDone { command, result } => {
                self.outputs.push(WindowOutput::WorkerDone { command, result });
            }
        }
    }

    /// Flush pending invalidations if the update throttle allows it.
    pub(crate) fn request_update(&mut self, platform: &mut dyn Platform, now: Instant) {
        if self.damage.has_damage() && self.throttle.request(now) {
            self.update(platform);
        }
    }

    /// Flush a deferred update whose interval has elapsed.
    pub(crate) fn flush_due(&mut self, platform: &mut dyn Platform, now: Instant) {
        if self.throttle.take_due(now) {
            self.update(platform);
        }
    }

    /// Flush right away at the end of a command session.
    pub(crate) fn complete_session(&mut self, platform: &mut dyn Platform, now: Instant) {
        self.update(platform);
        self.throttle.mark_flushed(now);
    }

    /// Whether an update is waiting for the throttle.
    pub fn has_pending_update(&self) -> bool {
        self.throttle.is_pending()
    }

    pub(crate) fn needs_flush(&self) -> bool {
        self.damage.has_damage() || self.throttle.is_pending()
    }

    // =========================================================================
    // Surface lifecycle
    // =========================================================================

    /// Show the window, creating its native surface if needed.
    pub fn show(&mut self, platform: &mut dyn Platform) -> SkinResult<()> {
        if let Some(surface) = self.surface {
            platform.show_surface(surface, true);
            return Ok(());
        }
        let desc = SurfaceDesc {
            title: self.config.title().to_string(),
            rect: Rect {
                origin: self.position,
                size: self.size(),
            },
            parent: self.host,
            caption: self.config.caption(),
            resizable: self.config.resizable(),
        };
        let surface = platform.create_surface(&desc, self.queue.sender())?;
        self.surface = Some(surface);
        tracing::debug!(target: targets::WINDOW, window = %self.name, ?surface, "surface created");

        self.on_parent_create(platform);
        platform.show_surface(surface, true);
        self.damage.invalidate_all();
        platform.invalidate(surface, None);
        Ok(())
    }

    /// Hide the window. With `destroy` the native surface (and every native
    /// child) is destroyed; widget state is kept.
    pub fn hide(&mut self, platform: &mut dyn Platform, destroy: bool) {
        let Some(surface) = self.surface else {
            return;
        };
        self.release_capture(platform);
        if !destroy {
            platform.show_surface(surface, false);
            return;
        }
        if let Some(pos) = platform.surface_position(surface) {
            self.position = pos;
        }
        self.on_parent_destroy(platform);
        platform.destroy_surface(surface);
        self.surface = None;
        self.damage.clear();
        tracing::debug!(target: targets::WINDOW, window = %self.name, ?surface, "surface destroyed");
    }

    /// Minimize the native surface.
    pub fn minimize(&mut self, platform: &mut dyn Platform) {
        if let Some(surface) = self.surface {
            self.release_capture(platform);
            platform.minimize_surface(surface);
        }
    }

    /// Embed the window into a host surface (or detach it with `None`).
    ///
    /// A live surface is torn down and recreated under the new host.
    pub fn set_host(&mut self, platform: &mut dyn Platform, host: Option<SurfaceHandle>) -> SkinResult<()> {
        if self.host == host {
            return Ok(());
        }
        let shown = self.surface.is_some();
        self.hide(platform, true);
        self.host = host;
        self.position = Point::ZERO;
        if shown {
            self.show(platform)?;
        }
        Ok(())
    }

    /// Create native children for native-backed widgets.
    fn on_parent_create(&mut self, platform: &mut dyn Platform) {
        let Some(surface) = self.surface else {
            return;
        };
        for id in self.native_widgets() {
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            let rect = node.abs_rect();
            let Some(kind) = self.tree.behavior(id).and_then(|b| b.as_native()).map(|n| n.native_kind()) else {
                continue;
            };
            match platform.create_native_child(surface, kind, rect) {
                Ok(handle) => {
                    if let Some(native) = self.tree.behavior_mut(id).and_then(|b| b.as_native_mut()) {
                        native.set_handle(Some(handle));
                    }
                    self.push_native_text(platform, id);
                }
                Err(err) => {
                    tracing::warn!(target: targets::WINDOW, window = %self.name, %err, "native child creation failed");
                    self.outputs.push(WindowOutput::Error(err));
                }
            }
        }
        self.sync_natives(platform);
    }

    /// Destroy native children.
    fn on_parent_destroy(&mut self, platform: &mut dyn Platform) {
        for id in self.native_widgets() {
            let Some(native) = self.tree.behavior_mut(id).and_then(|b| b.as_native_mut()) else {
                continue;
            };
            if let Some(handle) = native.handle() {
                platform.destroy_native_child(handle);
                native.set_handle(None);
            }
        }
    }

    fn native_widgets(&self) -> Vec<WidgetId> {
        self.tree
            .preorder(self.tree.root())
            .into_iter()
            .filter(|&id| self.tree.behavior(id).is_some_and(|b| b.as_native().is_some()))
            .collect()
    }

    /// Move, show and enable native children to match their nodes.
    pub(crate) fn sync_natives(&mut self, platform: &mut dyn Platform) {
        for id in self.native_widgets() {
            let Some(handle) = self.tree.behavior(id).and_then(|b| b.as_native()).and_then(|n| n.handle()) else {
                continue;
            };
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            platform.move_native_child(handle, node.abs_rect());
            platform.show_native_child(handle, self.tree.is_effectively_visible(id));
            platform.enable_native_child(handle, self.tree.is_effectively_enabled(id));
        }
    }

    fn push_native_text(&mut self, platform: &mut dyn Platform, id: WidgetId) {
        let Some(native) = self.tree.behavior(id).and_then(|b| b.as_native()) else {
            return;
        };
        if let Some(handle) = native.handle() {
            platform.set_native_text(handle, native.text());
        }
    }

    // =========================================================================
    // Geometry and flags
    // =========================================================================

    /// Resize the client area. Empty sizes are ignored; sizes below the
    /// configured minimum are raised to it.
    pub fn resize(&mut self, platform: &mut dyn Platform, size: Size) {
        if size.is_empty() {
            tracing::trace!(target: targets::WINDOW, window = %self.name, "ignoring empty resize");
            return;
        }
        let min = self.config.min_size();
        let size = Size::new(size.width.max(min.width), size.height.max(min.height));
        if size == self.size() {
            return;
        }
        self.tree.set_rect(self.tree.root(), Rect::from_size(size));
        self.config.set_size(size);
        if let Some(surface) = self.surface {
            platform.resize_surface(surface, size);
        }
        self.sync_natives(platform);
        self.reset_background();
    }

    /// Move or resize a widget (parent-local coordinates).
    pub fn set_widget_rect(&mut self, platform: &mut dyn Platform, id: WidgetId, rect: Rect) -> bool {
        self.invalidate(id, None, true);
        if !self.tree.set_rect(id, rect) {
            return false;
        }
        self.invalidate(id, None, true);
        self.after_layout_change(platform);
        true
    }

    /// Show or hide a widget.
    pub fn set_visible(&mut self, platform: &mut dyn Platform, id: WidgetId, visible: bool) -> bool {
        if !self.tree.set_visible(id, visible) {
            return false;
        }
        self.invalidate(id, None, true);
        self.after_layout_change(platform);
        self.drop_hidden_interaction(platform);
        true
    }

    /// Enable or disable a widget.
    pub fn set_enabled(&mut self, platform: &mut dyn Platform, id: WidgetId, enabled: bool) -> bool {
        if !self.tree.set_enabled(id, enabled) {
            return false;
        }
        self.invalidate(id, None, false);
        self.sync_natives(platform);
        self.drop_hidden_interaction(platform);
        true
    }

    fn after_layout_change(&mut self, platform: &mut dyn Platform) {
        self.sync_natives(platform);
        self.regenerate_exclusion();
    }

    /// Drop focus and capture held by widgets that can no longer interact.
    fn drop_hidden_interaction(&mut self, platform: &mut dyn Platform) {
        if let Some(focused) = self.focus.focused()
            && !FocusManager::can_focus(&self.tree, focused)
        {
            self.kill_focus(platform);
        }
        if let Some(captured) = self.capture.captured()
            && !(self.tree.is_effectively_visible(captured) && self.tree.is_effectively_enabled(captured))
        {
            self.release_capture(platform);
        }
    }

    /// Select a page of a tab-pages widget.
    ///
    /// An index past the last page selects the first page and records a
    /// diagnostic.
    pub fn select_page(&mut self, platform: &mut dyn Platform, id: WidgetId, index: usize) {
        let Some(node) = self.tree.get(id) else {
            tracing::error!(target: targets::WINDOW, ?id, "select_page on missing widget");
            return;
        };
        let pages = node.children().to_vec();
        let index = if index < pages.len() || pages.is_empty() {
            index
        } else {
            tracing::error!(target: targets::WINDOW, ?id, index, pages = pages.len(), "page index out of range, selecting 0");
            self.diagnostic(Diagnostic::error(format!(
                "page index {index} out of range ({} pages), selecting the first page",
                pages.len()
            )));
            0
        };
        match self.tree.behavior_mut(id).and_then(|b| b.as_composite_mut()) {
            Some(composite) => composite.set_selected(index),
            None => {
                tracing::error!(target: targets::WINDOW, ?id, "select_page on a widget without pages");
                return;
            }
        }
        if let Some(control) = self.tree.get_mut(id).and_then(|n| n.control_mut()) {
            control.set_value(index as f32);
        }
        for (i, page) in pages.into_iter().enumerate() {
            self.tree.set_visible(page, i == index);
        }
        self.drop_hidden_interaction(platform);
        self.after_layout_change(platform);
        self.invalidate(id, None, true);
    }

    /// Remove a widget and its subtree.
    ///
    /// Capture and hover held inside the subtree are released, focus is
    /// forgotten without notifying the dying widget, and native children are
    /// destroyed. The vacated area is repainted. The root cannot be removed.
    pub fn remove_widget(&mut self, platform: &mut dyn Platform, id: WidgetId) -> bool {
        if id == self.tree.root() || self.tree.get(id).is_none() {
            return false;
        }
        self.invalidate(id, None, true);
        if let Some(captured) = self.capture.captured()
            && self.tree.is_descendant_of(captured, id)
        {
            self.release_capture(platform);
        }
        if let Some(hovered) = self.capture.hovered()
            && self.tree.is_descendant_of(hovered, id)
        {
            self.update_hover(platform, None);
        }

        let removed = self.tree.remove(id);
        for (widget, behavior) in &removed {
            self.focus.forget(*widget);
            if let Some(handle) = behavior.as_native().and_then(|n| n.handle()) {
                platform.destroy_native_child(handle);
            }
        }
        self.after_layout_change(platform);
        tracing::debug!(target: targets::WINDOW, window = %self.name, ?id, count = removed.len(), "widget removed");
        true
    }

    // =========================================================================
    // Preferences
    // =========================================================================

    fn preferences_prefix(&self) -> String {
        self.config
            .preferences_key()
            .map_or_else(|| self.name.clone(), str::to_string)
    }

    fn persisted_controls(&self) -> Vec<(WidgetId, String)> {
        self.tree
            .preorder(self.tree.root())
            .into_iter()
            .filter_map(|id| {
                let node = self.tree.get(id)?;
                let control = node.control().filter(|c| c.persist())?;
                let key = node.name().unwrap_or(control.command());
                (!key.is_empty()).then(|| (id, key.to_string()))
            })
            .collect()
    }

    /// Store the window position, size and persisted control values.
    pub fn save_preferences(&self, preferences: &mut dyn Preferences) {
        let prefix = self.preferences_prefix();
        preferences.set_int(&format!("{prefix}/x"), i64::from(self.position.x));
        preferences.set_int(&format!("{prefix}/y"), i64::from(self.position.y));
        preferences.set_int(&format!("{prefix}/width"), i64::from(self.size().width));
        preferences.set_int(&format!("{prefix}/height"), i64::from(self.size().height));
        for (id, key) in self.persisted_controls() {
            if let Some(value) = self.value(id) {
                preferences.set_float(&format!("{prefix}/{key}"), f64::from(value));
            }
        }
    }

    /// Restore what [`save_preferences`](Self::save_preferences) stored.
    pub fn restore_preferences(&mut self, platform: &mut dyn Platform, preferences: &dyn Preferences) {
        let prefix = self.preferences_prefix();
        let int = |key: &str| {
            preferences
                .get_int(&format!("{prefix}/{key}"))
                .and_then(|v| i32::try_from(v).ok())
        };
        if let (Some(x), Some(y)) = (int("x"), int("y")) {
            self.position = Point::new(x, y);
            if let Some(surface) = self.surface {
                platform.move_surface(surface, self.position);
            }
        }
        if let (Some(width), Some(height)) = (int("width"), int("height"))
            && self.config.resizable()
        {
            self.resize(platform, Size::new(width, height));
        }
        for (id, key) in self.persisted_controls() {
            let Some(value) = preferences.get_float(&format!("{prefix}/{key}")) else {
                continue;
            };
            let changed = self
                .tree
                .get_mut(id)
                .and_then(|n| n.control_mut())
                .is_some_and(|c| c.set_value(value as f32));
            if changed {
                self.invalidate(id, None, false);
            }
        }
    }

    // =========================================================================
    // Threaded commands
    // =========================================================================

    /// Add a threaded command to the window's command table.
    pub fn add_threaded_command(&mut self, name: impl Into<String>, handler: ThreadedHandler) {
        self.threaded.insert(name.into(), handler);
    }

    /// Whether a command runs on this window's worker.
    pub fn is_threaded(&self, name: &str) -> bool {
        self.threaded.contains_key(name)
    }

    /// The window's worker, once a threaded command has run.
    pub fn worker(&self) -> Option<&Worker> {
        self.worker.as_ref()
    }

    /// Stop the worker, discarding queued jobs and joining its thread.
    pub fn shutdown_worker(&mut self) {
        if let Some(worker) = self.worker.take() {
            let discarded = worker.shutdown();
            worker.join();
            tracing::debug!(target: targets::WINDOW, window = %self.name, discarded, "worker stopped");
        }
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        self.shutdown_worker();
    }
}
