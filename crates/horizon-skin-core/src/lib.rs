//! Core systems for Horizon Skin.
//!
//! This crate provides the foundation the rest of the toolkit is built on:
//!
//! - **Geometry**: integer [`Point`], [`Size`] and [`Rect`]
//! - **Regions**: [`Region`], sets of disjoint rectangles used for dirty,
//!   exclusion and clip areas
//! - **Events**: the typed [`SkinEvent`] and the per-window FIFO [`EventQueue`]
//! - **Workers**: a single background [`Worker`] thread for threaded commands
//! - **Logging**: `tracing` target and span names
//!
//! # Example
//!
//! ```
//! use horizon_skin_core::{EventQueue, Point, Rect, Region, SkinEvent};
//!
//! let mut dirty = Region::new();
//! dirty.union_rect(&Rect::new(0, 0, 50, 50));
//! dirty.union_rect(&Rect::new(25, 25, 50, 50));
//! assert!(dirty.contains(Point::new(60, 60)));
//!
//! let queue = EventQueue::new();
//! queue.post(SkinEvent::Paint { region: Some(dirty) });
//! assert_eq!(queue.len(), 1);
//! ```

mod error;
mod event;
mod geometry;
pub mod logging;
mod region;
pub mod worker;

pub use error::{CoreError, CoreResult};
pub use event::{EventQueue, EventSender, Key, Modifiers, MouseButton, SkinEvent, TimerId};
pub use geometry::{Point, Rect, Size};
pub use region::Region;
pub use worker::{Job, Worker};
