//! Software compositing backend for Horizon Skin.
//!
//! Skins are rendered on the CPU into RGBA bitmaps, then patched onto native
//! windows by the platform layer. This crate provides the pieces the
//! compositor is built from:
//!
//! - [`ImageBuffer`]: RGBA bitmaps with clipped blits, fills and tiling
//! - [`Color`]: 8-bit colors with hex parsing
//! - [`DamageTracker`]: dirty-region accumulation per window
//! - [`DrawContext`]: clipped window-coordinate drawing for the post-draw pass
//!
//! # Example
//!
//! ```
//! use horizon_skin_core::{Point, Rect, Region, Size};
//! use horizon_skin_render::{Color, DrawContext, ImageBuffer};
//!
//! let mut composite = ImageBuffer::filled(Size::new(200, 100), Color::from_rgb8(32, 32, 32));
//! let mut scratch = composite.sub_image(&Rect::new(50, 0, 50, 50)).unwrap();
//!
//! // Draw a focus frame in window coordinates.
//! let mut ctx = DrawContext::new(&mut scratch, Point::new(50, 0), Region::from(Rect::new(0, 0, 200, 100)));
//! ctx.stroke_rect(Rect::new(55, 5, 20, 20), Color::WHITE);
//! assert_eq!(scratch.pixel(Point::new(5, 5)), Some(Color::WHITE));
//! ```

mod context;
pub mod damage;
mod error;
mod image_buffer;
mod types;

pub use context::DrawContext;
pub use damage::DamageTracker;
pub use error::{RenderError, RenderResult};
pub use image_buffer::ImageBuffer;
pub use types::{BlendMode, Color};
