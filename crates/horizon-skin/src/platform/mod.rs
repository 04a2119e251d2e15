//! Native windowing contract.
//!
//! The core never talks to an operating system directly. Everything it needs
//! from the windowing system goes through the [`Platform`] trait: native
//! surfaces for windows, native child controls for edit boxes and lists,
//! mouse capture, cursors, timers and presenting composed bitmaps.
//!
//! Native callbacks flow the other way through the [`EventSender`] handed to
//! [`Platform::create_surface`]: a backend only ever enqueues [`SkinEvent`]s,
//! and the skin pump dispatches them later on the UI thread.
//!
//! [`HeadlessPlatform`] implements the contract in memory. It keeps a
//! software framebuffer per surface and records every call, which makes it
//! suitable for tests and for offscreen hosts.
//!
//! [`SkinEvent`]: horizon_skin_core::SkinEvent

mod headless;

use std::time::Duration;

use cursor_icon::CursorIcon;
use horizon_skin_core::{EventSender, Point, Rect, Region, Size, TimerId};
use horizon_skin_render::ImageBuffer;

use crate::error::SkinResult;

pub use headless::{HeadlessPlatform, NativeChildState, PlatformCall};

/// Opaque handle of a native top-level (or embedded) surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceHandle(pub u64);

/// Opaque handle of a native child control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeHandle(pub u64);

/// The kinds of native child control the core can host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeKind {
    /// Single-line text entry.
    Edit,
    /// List box.
    List,
    /// Tree view.
    Tree,
}

impl NativeKind {
    /// Parse an attribute value (`edit`, `list` or `tree`, any case).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "edit" => Some(Self::Edit),
            "list" => Some(Self::List),
            "tree" => Some(Self::Tree),
            _ => None,
        }
    }
}

/// Everything a backend needs to create a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceDesc {
    /// Window title.
    pub title: String,
    /// Screen position and client size. For embedded surfaces the position
    /// is relative to the host.
    pub rect: Rect,
    /// Host surface the new surface is embedded into.
    pub parent: Option<SurfaceHandle>,
    /// Whether the window has a system caption.
    pub caption: bool,
    /// Whether the user may resize the window.
    pub resizable: bool,
}

/// Native windowing services used by the core.
///
/// All methods are called on the UI thread. Methods acting on unknown
/// handles must be no-ops.
pub trait Platform {
    // =========================================================================
    // Surfaces
    // =========================================================================

    /// Create a native surface. Native callbacks for it must be posted
    /// through `events`.
    fn create_surface(&mut self, desc: &SurfaceDesc, events: EventSender)
    -> SkinResult<SurfaceHandle>;

    /// Destroy a surface and every native child on it.
    fn destroy_surface(&mut self, surface: SurfaceHandle);

    /// Show or hide a surface.
    fn show_surface(&mut self, surface: SurfaceHandle, visible: bool);

    /// Minimize a surface.
    fn minimize_surface(&mut self, surface: SurfaceHandle);

    /// Move a surface to a screen position.
    fn move_surface(&mut self, surface: SurfaceHandle, pos: Point);

    /// Resize a surface's client area.
    fn resize_surface(&mut self, surface: SurfaceHandle, size: Size);

    /// Current screen position of a surface.
    fn surface_position(&self, surface: SurfaceHandle) -> Option<Point>;

    // =========================================================================
    // Native child controls
    // =========================================================================

    /// Create a native child control at `rect` (client coordinates).
    fn create_native_child(
        &mut self,
        parent: SurfaceHandle,
        kind: NativeKind,
        rect: Rect,
    ) -> SkinResult<NativeHandle>;

    /// Destroy a native child control.
    fn destroy_native_child(&mut self, child: NativeHandle);

    /// Move or resize a native child control.
    fn move_native_child(&mut self, child: NativeHandle, rect: Rect);

    /// Enable or disable a native child control.
    fn enable_native_child(&mut self, child: NativeHandle, enabled: bool);

    /// Show or hide a native child control.
    fn show_native_child(&mut self, child: NativeHandle, visible: bool);

    /// Replace the text of a native child control.
    fn set_native_text(&mut self, child: NativeHandle, text: &str);

    // =========================================================================
    // Input
    // =========================================================================

    /// Route all mouse input to `surface` until [`end_capture`](Self::end_capture).
    fn begin_capture(&mut self, surface: SurfaceHandle);

    /// Release mouse capture.
    fn end_capture(&mut self, surface: SurfaceHandle);

    /// Set the cursor shown over `surface`.
    fn set_cursor(&mut self, surface: SurfaceHandle, cursor: CursorIcon);

    /// Start (or restart) a repeating timer that posts
    /// [`SkinEvent::Timer`](horizon_skin_core::SkinEvent::Timer).
    fn set_timer(&mut self, surface: SurfaceHandle, id: TimerId, interval: Duration);

    /// Stop a timer. Unknown timers are ignored.
    fn kill_timer(&mut self, surface: SurfaceHandle, id: TimerId);

    // =========================================================================
    // Painting
    // =========================================================================

    /// Copy `area` (client coordinates) of `bitmap` to the surface. The
    /// bitmap's top-left pixel sits at `origin` in client coordinates.
    fn present(&mut self, surface: SurfaceHandle, bitmap: &ImageBuffer, origin: Point, area: &Rect);

    /// Ask the platform for a paint notification covering `region`, or the
    /// whole client area when `None`.
    fn invalidate(&mut self, surface: SurfaceHandle, region: Option<&Region>);
}
