//! In-memory platform backend.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use cursor_icon::CursorIcon;
use horizon_skin_core::{EventSender, Point, Rect, Region, SkinEvent, Size, TimerId};
use horizon_skin_render::{BlendMode, Color, ImageBuffer};
use parking_lot::Mutex;

use super::{NativeHandle, NativeKind, Platform, SurfaceDesc, SurfaceHandle};
use crate::error::{SkinError, SkinResult};

/// A recorded platform call.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformCall {
    CreateSurface {
        surface: SurfaceHandle,
        parent: Option<SurfaceHandle>,
    },
    DestroySurface(SurfaceHandle),
    ShowSurface(SurfaceHandle, bool),
    MinimizeSurface(SurfaceHandle),
    MoveSurface(SurfaceHandle, Point),
    ResizeSurface(SurfaceHandle, Size),
    CreateNativeChild {
        child: NativeHandle,
        parent: SurfaceHandle,
        kind: NativeKind,
        rect: Rect,
    },
    DestroyNativeChild(NativeHandle),
    MoveNativeChild(NativeHandle, Rect),
    EnableNativeChild(NativeHandle, bool),
    ShowNativeChild(NativeHandle, bool),
    SetNativeText(NativeHandle, String),
    BeginCapture(SurfaceHandle),
    EndCapture(SurfaceHandle),
    SetCursor(SurfaceHandle, CursorIcon),
    SetTimer(SurfaceHandle, TimerId),
    KillTimer(SurfaceHandle, TimerId),
    Present { surface: SurfaceHandle, area: Rect },
    Invalidate(SurfaceHandle),
}

/// Snapshot of a native child control.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeChildState {
    pub parent: SurfaceHandle,
    pub kind: NativeKind,
    pub rect: Rect,
    pub enabled: bool,
    pub visible: bool,
    pub text: String,
}

struct SurfaceState {
    desc: SurfaceDesc,
    position: Point,
    visible: bool,
    minimized: bool,
    framebuffer: ImageBuffer,
    events: EventSender,
    timers: BTreeMap<TimerId, Duration>,
    cursor: CursorIcon,
}

#[derive(Default)]
struct HeadlessState {
    next_handle: u64,
    surfaces: HashMap<SurfaceHandle, SurfaceState>,
    natives: HashMap<NativeHandle, NativeChildState>,
    calls: Vec<PlatformCall>,
    captured: Option<SurfaceHandle>,
    fail_native_creation: bool,
}

impl HeadlessState {
    fn next_handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

/// A [`Platform`] that keeps everything in memory.
///
/// Clones share state, so a test can keep a clone for inspection after
/// handing the platform to a [`Skin`](crate::skin::Skin).
///
/// # Example
///
/// ```
/// use horizon_skin::platform::{HeadlessPlatform, Platform, SurfaceDesc};
/// use horizon_skin_core::{EventQueue, Rect};
///
/// let mut platform = HeadlessPlatform::new();
/// let queue = EventQueue::new();
/// let desc = SurfaceDesc {
///     title: "main".into(),
///     rect: Rect::new(0, 0, 320, 200),
///     parent: None,
///     caption: true,
///     resizable: false,
/// };
/// let surface = platform.create_surface(&desc, queue.sender()).unwrap();
/// assert_eq!(platform.framebuffer(surface).unwrap().width(), 320);
/// ```
#[derive(Clone, Default)]
pub struct HeadlessPlatform {
    state: Arc<Mutex<HeadlessState>>,
}

impl std::fmt::Debug for HeadlessPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("HeadlessPlatform")
            .field("surfaces", &state.surfaces.len())
            .field("natives", &state.natives.len())
            .field("calls", &state.calls.len())
            .finish()
    }
}

impl HeadlessPlatform {
    /// Create an empty platform.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Every call recorded so far.
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.state.lock().calls.clone()
    }

    /// Forget recorded calls.
    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Copy of a surface's framebuffer.
    pub fn framebuffer(&self, surface: SurfaceHandle) -> Option<ImageBuffer> {
        self.state
            .lock()
            .surfaces
            .get(&surface)
            .map(|s| s.framebuffer.clone())
    }

    /// Whether a surface exists.
    pub fn has_surface(&self, surface: SurfaceHandle) -> bool {
        self.state.lock().surfaces.contains_key(&surface)
    }

    /// Number of live surfaces.
    pub fn surface_count(&self) -> usize {
        self.state.lock().surfaces.len()
    }

    /// Whether a surface is shown.
    pub fn is_visible(&self, surface: SurfaceHandle) -> bool {
        self.state
            .lock()
            .surfaces
            .get(&surface)
            .is_some_and(|s| s.visible && !s.minimized)
    }

    /// The description a surface was created with.
    pub fn surface_desc(&self, surface: SurfaceHandle) -> Option<SurfaceDesc> {
        self.state.lock().surfaces.get(&surface).map(|s| s.desc.clone())
    }

    /// The cursor last set on a surface.
    pub fn cursor(&self, surface: SurfaceHandle) -> Option<CursorIcon> {
        self.state.lock().surfaces.get(&surface).map(|s| s.cursor)
    }

    /// Timers running on a surface.
    pub fn timers(&self, surface: SurfaceHandle) -> Vec<TimerId> {
        self.state
            .lock()
            .surfaces
            .get(&surface)
            .map(|s| s.timers.keys().copied().collect())
            .unwrap_or_default()
    }

    /// The surface currently holding mouse capture.
    pub fn captured(&self) -> Option<SurfaceHandle> {
        self.state.lock().captured
    }

    /// Snapshot of a native child.
    pub fn native_child(&self, child: NativeHandle) -> Option<NativeChildState> {
        self.state.lock().natives.get(&child).cloned()
    }

    /// Handles of all live native children, sorted.
    pub fn native_children(&self) -> Vec<NativeHandle> {
        let mut handles: Vec<_> = self.state.lock().natives.keys().copied().collect();
        handles.sort();
        handles
    }

    /// Make subsequent native child creation fail.
    pub fn set_fail_native_creation(&self, fail: bool) {
        self.state.lock().fail_native_creation = fail;
    }

    // =========================================================================
    // Simulated input
    // =========================================================================

    /// Post an event as if the OS had delivered it to `surface`.
    ///
    /// Returns `false` if the surface does not exist or its window is gone.
    pub fn send(&self, surface: SurfaceHandle, event: SkinEvent) -> bool {
        let sender = match self.state.lock().surfaces.get(&surface) {
            Some(s) => s.events.clone(),
            None => return false,
        };
        sender.post(event).is_ok()
    }

    /// Fire a running timer once.
    pub fn fire_timer(&self, surface: SurfaceHandle, id: TimerId) -> bool {
        let running = self
            .state
            .lock()
            .surfaces
            .get(&surface)
            .is_some_and(|s| s.timers.contains_key(&id));
        running && self.send(surface, SkinEvent::Timer { id })
    }

    fn with_surface(&self, surface: SurfaceHandle, call: PlatformCall, f: impl FnOnce(&mut SurfaceState)) {
        let mut state = self.state.lock();
        state.calls.push(call);
        if let Some(s) = state.surfaces.get_mut(&surface) {
            f(s);
        }
    }

    fn with_native(&self, child: NativeHandle, call: PlatformCall, f: impl FnOnce(&mut NativeChildState)) {
        let mut state = self.state.lock();
        state.calls.push(call);
        if let Some(n) = state.natives.get_mut(&child) {
            f(n);
        }
    }
}

impl Platform for HeadlessPlatform {
    fn create_surface(
        &mut self,
        desc: &SurfaceDesc,
        events: EventSender,
    ) -> SkinResult<SurfaceHandle> {
        if desc.rect.is_empty() {
            return Err(SkinError::resource(
                format!("surface '{}'", desc.title),
                "empty client area",
            ));
        }
        let mut state = self.state.lock();
        if let Some(parent) = desc.parent
            && !state.surfaces.contains_key(&parent)
        {
            return Err(SkinError::resource(
                format!("surface '{}'", desc.title),
                "host surface does not exist",
            ));
        }

        let surface = SurfaceHandle(state.next_handle());
        state.surfaces.insert(
            surface,
            SurfaceState {
                desc: desc.clone(),
                position: desc.rect.origin,
                visible: false,
                minimized: false,
                framebuffer: ImageBuffer::new(desc.rect.size),
                events,
                timers: BTreeMap::new(),
                cursor: CursorIcon::Default,
            },
        );
        state.calls.push(PlatformCall::CreateSurface {
            surface,
            parent: desc.parent,
        });
        Ok(surface)
    }

    fn destroy_surface(&mut self, surface: SurfaceHandle) {
        let mut state = self.state.lock();
        state.calls.push(PlatformCall::DestroySurface(surface));
        state.surfaces.remove(&surface);
        state.natives.retain(|_, n| n.parent != surface);
        if state.captured == Some(surface) {
            state.captured = None;
        }
    }

    fn show_surface(&mut self, surface: SurfaceHandle, visible: bool) {
        self.with_surface(surface, PlatformCall::ShowSurface(surface, visible), |s| {
            s.visible = visible;
            s.minimized = false;
        });
    }

    fn minimize_surface(&mut self, surface: SurfaceHandle) {
        self.with_surface(surface, PlatformCall::MinimizeSurface(surface), |s| {
            s.minimized = true;
        });
    }

    fn move_surface(&mut self, surface: SurfaceHandle, pos: Point) {
        self.with_surface(surface, PlatformCall::MoveSurface(surface, pos), |s| {
            s.position = pos;
        });
    }

    fn resize_surface(&mut self, surface: SurfaceHandle, size: Size) {
        self.with_surface(surface, PlatformCall::ResizeSurface(surface, size), |s| {
            let mut framebuffer = ImageBuffer::new(size);
            let keep = framebuffer.rect();
            framebuffer.draw_image(&s.framebuffer, Point::ZERO, &keep, BlendMode::Opaque);
            s.framebuffer = framebuffer;
            s.desc.rect.size = size;
        });
    }

    fn surface_position(&self, surface: SurfaceHandle) -> Option<Point> {
        self.state.lock().surfaces.get(&surface).map(|s| s.position)
    }

    fn create_native_child(
        &mut self,
        parent: SurfaceHandle,
        kind: NativeKind,
        rect: Rect,
    ) -> SkinResult<NativeHandle> {
        let mut state = self.state.lock();
        if state.fail_native_creation {
            return Err(SkinError::resource(format!("{kind:?} control"), "creation refused"));
        }
        if !state.surfaces.contains_key(&parent) {
            return Err(SkinError::resource(format!("{kind:?} control"), "parent surface does not exist"));
        }
        let child = NativeHandle(state.next_handle());
        state.natives.insert(
            child,
            NativeChildState {
                parent,
                kind,
                rect,
                enabled: true,
                visible: true,
                text: String::new(),
            },
        );
        state.calls.push(PlatformCall::CreateNativeChild {
            child,
            parent,
            kind,
            rect,
        });
        Ok(child)
    }

    fn destroy_native_child(&mut self, child: NativeHandle) {
        let mut state = self.state.lock();
        state.calls.push(PlatformCall::DestroyNativeChild(child));
        state.natives.remove(&child);
    }

    fn move_native_child(&mut self, child: NativeHandle, rect: Rect) {
        self.with_native(child, PlatformCall::MoveNativeChild(child, rect), |n| n.rect = rect);
    }

    fn enable_native_child(&mut self, child: NativeHandle, enabled: bool) {
        self.with_native(child, PlatformCall::EnableNativeChild(child, enabled), |n| {
            n.enabled = enabled;
        });
    }

    fn show_native_child(&mut self, child: NativeHandle, visible: bool) {
        self.with_native(child, PlatformCall::ShowNativeChild(child, visible), |n| {
            n.visible = visible;
        });
    }

    fn set_native_text(&mut self, child: NativeHandle, text: &str) {
        self.with_native(child, PlatformCall::SetNativeText(child, text.to_string()), |n| {
            n.text = text.to_string();
        });
    }

    fn begin_capture(&mut self, surface: SurfaceHandle) {
        let mut state = self.state.lock();
        state.calls.push(PlatformCall::BeginCapture(surface));
        state.captured = Some(surface);
    }

    fn end_capture(&mut self, surface: SurfaceHandle) {
        let mut state = self.state.lock();
        state.calls.push(PlatformCall::EndCapture(surface));
        if state.captured == Some(surface) {
            state.captured = None;
        }
    }

    fn set_cursor(&mut self, surface: SurfaceHandle, cursor: CursorIcon) {
        self.with_surface(surface, PlatformCall::SetCursor(surface, cursor), |s| {
            s.cursor = cursor;
        });
    }

    fn set_timer(&mut self, surface: SurfaceHandle, id: TimerId, interval: Duration) {
        self.with_surface(surface, PlatformCall::SetTimer(surface, id), |s| {
            s.timers.insert(id, interval);
        });
    }

    fn kill_timer(&mut self, surface: SurfaceHandle, id: TimerId) {
        self.with_surface(surface, PlatformCall::KillTimer(surface, id), |s| {
            s.timers.remove(&id);
        });
    }

    fn present(&mut self, surface: SurfaceHandle, bitmap: &ImageBuffer, origin: Point, area: &Rect) {
        self.with_surface(
            surface,
            PlatformCall::Present {
                surface,
                area: *area,
            },
            |s| {
                s.framebuffer
                    .draw_image(bitmap, origin, area, BlendMode::Opaque);
            },
        );
    }

    fn invalidate(&mut self, surface: SurfaceHandle, region: Option<&Region>) {
        let sender = {
            let mut state = self.state.lock();
            state.calls.push(PlatformCall::Invalidate(surface));
            state.surfaces.get(&surface).map(|s| s.events.clone())
        };
        if let Some(sender) = sender {
            let _ = sender.post(SkinEvent::Paint {
                region: region.cloned(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_skin_core::EventQueue;

    fn desc() -> SurfaceDesc {
        SurfaceDesc {
            title: "test".into(),
            rect: Rect::new(10, 20, 100, 50),
            parent: None,
            caption: true,
            resizable: true,
        }
    }

    #[test]
    fn test_present_writes_framebuffer() {
        let mut platform = HeadlessPlatform::new();
        let queue = EventQueue::new();
        let surface = platform.create_surface(&desc(), queue.sender()).unwrap();

        let bitmap = ImageBuffer::filled(Size::new(10, 10), Color::RED);
        platform.present(surface, &bitmap, Point::new(5, 5), &Rect::new(5, 5, 5, 5));

        let fb = platform.framebuffer(surface).unwrap();
        assert_eq!(fb.pixel(Point::new(5, 5)), Some(Color::RED));
        assert_eq!(fb.pixel(Point::new(12, 12)), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_invalidate_posts_paint() {
        let mut platform = HeadlessPlatform::new();
        let queue = EventQueue::new();
        let surface = platform.create_surface(&desc(), queue.sender()).unwrap();

        platform.invalidate(surface, None);
        assert!(matches!(queue.pop(), Some(SkinEvent::Paint { region: None })));
    }

    #[test]
    fn test_destroy_surface_drops_children() {
        let mut platform = HeadlessPlatform::new();
        let queue = EventQueue::new();
        let surface = platform.create_surface(&desc(), queue.sender()).unwrap();
        let child = platform
            .create_native_child(surface, NativeKind::Edit, Rect::new(0, 0, 10, 10))
            .unwrap();

        platform.destroy_surface(surface);
        assert!(platform.native_child(child).is_none());
        assert!(!platform.send(surface, SkinEvent::FocusLost));
    }

    #[test]
    fn test_native_creation_failure() {
        let mut platform = HeadlessPlatform::new();
        let queue = EventQueue::new();
        let surface = platform.create_surface(&desc(), queue.sender()).unwrap();
        platform.set_fail_native_creation(true);

        let err = platform
            .create_native_child(surface, NativeKind::List, Rect::new(0, 0, 10, 10))
            .unwrap_err();
        assert!(matches!(err, SkinError::Resource { .. }));
    }
}
