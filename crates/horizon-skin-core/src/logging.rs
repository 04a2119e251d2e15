//! Logging facilities for Horizon Skin.
//!
//! Horizon Skin uses the `tracing` crate for instrumentation. To see logs,
//! install a subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt::init();
//! ```
//!
//! Every subsystem logs under one of the [`targets`] so logs can be filtered
//! per concern, for example `RUST_LOG=horizon_skin::capture=trace`.

/// Span names used throughout Horizon Skin for tracing.
pub mod span_names {
    /// One full redraw pass of a window.
    pub const REDRAW: &str = "horizon_skin::redraw";
    /// Draining a window's inbound event queue.
    pub const PUMP: &str = "horizon_skin::pump";
    /// Bubbling one command through window, skin and application.
    pub const COMMAND: &str = "horizon_skin::command";
}

/// Target names for log filtering.
pub mod targets {
    /// Core primitives.
    pub const CORE: &str = "horizon_skin_core";
    /// Inbound event queues.
    pub const EVENT_QUEUE: &str = "horizon_skin_core::event_queue";
    /// Background command workers.
    pub const WORKER: &str = "horizon_skin_core::worker";
    /// Invalidation and compositing.
    pub const COMPOSITOR: &str = "horizon_skin::compositor";
    /// Hit testing and mouse capture.
    pub const CAPTURE: &str = "horizon_skin::capture";
    /// Keyboard focus.
    pub const FOCUS: &str = "horizon_skin::focus";
    /// Command bubbling and value reflection.
    pub const COMMAND: &str = "horizon_skin::command";
    /// Window lifecycle.
    pub const WINDOW: &str = "horizon_skin::window";
    /// Declarative skin loading and attribute parsing.
    pub const SKIN: &str = "horizon_skin::skin";
}
