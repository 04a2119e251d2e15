//! Inbound events and the per-window FIFO event queue.
//!
//! Native window callbacks never call into widget code directly. They only
//! enqueue a [`SkinEvent`] through an [`EventSender`]; the skin's pump later
//! drains each window's [`EventQueue`] in arrival order and dispatches the
//! events on the UI thread. Background workers use the same sender to post
//! their results back.

use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};

use crate::error::{CoreError, CoreResult};
use crate::geometry::{Point, Size};
use crate::logging::targets;
use crate::region::Region;

/// Identifier of a platform timer owned by a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u32);

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Keys the core reacts to. Everything else arrives as [`Key::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Tab,
    Enter,
    Space,
    Escape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    PageUp,
    PageDown,
    Home,
    End,
    Other(u32),
}

/// Keyboard modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
}

impl Modifiers {
    /// No modifier pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
    };

    /// Only shift pressed.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
    };
}

/// An inbound event for one window.
///
/// Pointer positions are in window client coordinates; `screen` is the same
/// position in screen coordinates, needed for window dragging.
#[derive(Debug, Clone)]
pub enum SkinEvent {
    /// The pointer moved.
    PointerMove { pos: Point, screen: Point },
    /// A mouse button was pressed.
    PointerDown {
        pos: Point,
        screen: Point,
        button: MouseButton,
    },
    /// A mouse button was released.
    PointerUp {
        pos: Point,
        screen: Point,
        button: MouseButton,
    },
    /// The pointer left the client area.
    PointerLeave,
    /// Mouse wheel rotation, in notches (positive away from the user).
    Wheel { pos: Point, delta: f32 },
    /// A key was pressed.
    KeyDown { key: Key, modifiers: Modifiers },
    /// The platform asks for a repaint. `None` means the whole client area.
    Paint { region: Option<Region> },
    /// The client area changed size.
    Resize { size: Size },
    /// The native window moved on screen.
    Moved { pos: Point },
    /// The native window gained keyboard focus.
    FocusGained,
    /// The native window lost keyboard focus.
    FocusLost,
    /// A platform timer owned by the window fired.
    Timer { id: TimerId },
    /// The user asked to close the window.
    CloseRequested,
    /// A threaded command finished on the window's worker.
    WorkerDone {
        /// Command name.
        command: String,
        /// Outcome reported by the handler.
        result: Result<String, String>,
    },
}

impl SkinEvent {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PointerMove { .. } => "pointer_move",
            Self::PointerDown { .. } => "pointer_down",
            Self::PointerUp { .. } => "pointer_up",
            Self::PointerLeave => "pointer_leave",
            Self::Wheel { .. } => "wheel",
            Self::KeyDown { .. } => "key_down",
            Self::Paint { .. } => "paint",
            Self::Resize { .. } => "resize",
            Self::Moved { .. } => "moved",
            Self::FocusGained => "focus_gained",
            Self::FocusLost => "focus_lost",
            Self::Timer { .. } => "timer",
            Self::CloseRequested => "close_requested",
            Self::WorkerDone { .. } => "worker_done",
        }
    }
}

/// Cloneable, thread-safe handle for posting events to a window's queue.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<SkinEvent>,
}

impl EventSender {
    /// Post an event. Fails if the owning queue has been dropped.
    pub fn post(&self, event: SkinEvent) -> CoreResult<()> {
        self.tx.send(event).map_err(|err| {
            tracing::debug!(
                target: targets::EVENT_QUEUE,
                event = err.0.name(),
                "event queue closed, dropping event"
            );
            CoreError::QueueClosed
        })
    }
}

/// FIFO queue of inbound events owned by a single window.
#[derive(Debug)]
pub struct EventQueue {
    tx: Sender<SkinEvent>,
    rx: Receiver<SkinEvent>,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// A sender that can be handed to platform callbacks or other threads.
    pub fn sender(&self) -> EventSender {
        EventSender {
            tx: self.tx.clone(),
        }
    }

    /// Post an event from the owning thread.
    pub fn post(&self, event: SkinEvent) {
        // The queue owns a receiver, so the channel cannot be disconnected here.
        let _ = self.tx.send(event);
    }

    /// Take the oldest pending event.
    pub fn pop(&self) -> Option<SkinEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Take every pending event, oldest first.
    ///
    /// Events posted while the returned batch is being processed stay queued
    /// for the next drain.
    pub fn drain(&self) -> Vec<SkinEvent> {
        self.rx.try_iter().collect()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Check whether no events are pending.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let queue = EventQueue::new();
        queue.post(SkinEvent::FocusGained);
        queue.post(SkinEvent::PointerLeave);
        queue.post(SkinEvent::FocusLost);

        let names: Vec<_> = queue.drain().iter().map(SkinEvent::name).collect();
        assert_eq!(names, ["focus_gained", "pointer_leave", "focus_lost"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_sender_from_other_thread() {
        let queue = EventQueue::new();
        let sender = queue.sender();
        std::thread::spawn(move || {
            sender.post(SkinEvent::Timer { id: TimerId(7) }).unwrap();
        })
        .join()
        .unwrap();

        match queue.pop() {
            Some(SkinEvent::Timer { id }) => assert_eq!(id, TimerId(7)),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_sender_after_queue_dropped() {
        let queue = EventQueue::new();
        let sender = queue.sender();
        drop(queue);
        assert!(matches!(
            sender.post(SkinEvent::CloseRequested),
            Err(CoreError::QueueClosed)
        ));
    }
}
