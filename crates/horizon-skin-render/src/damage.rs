//! Damage tracking for partial repaints.
//!
//! [`DamageTracker`] accumulates the dirty area of one window as a
//! [`Region`] of disjoint rectangles, clipped to the window's client
//! rectangle (the viewport). Two heuristics collapse fragmented damage into a
//! single full repaint:
//!
//! - the dirty area exceeds 90% of the viewport, or
//! - more than 100 rectangles were submitted since the last clear.

use horizon_skin_core::logging::targets;
use horizon_skin_core::{Rect, Region};

/// Dirty area above which the whole viewport is repainted.
const FULL_REPAINT_THRESHOLD: f64 = 0.9;

/// Submissions after which the whole viewport is repainted.
const MAX_DAMAGE_COUNT: u32 = 100;

/// Tracks damaged (dirty) areas that need repainting.
///
/// # Example
///
/// ```
/// use horizon_skin_core::Rect;
/// use horizon_skin_render::DamageTracker;
///
/// let mut tracker = DamageTracker::with_viewport(Rect::new(0, 0, 800, 600));
/// tracker.add_damage(Rect::new(10, 10, 50, 30));
/// tracker.add_damage(Rect::new(100, 100, 20, 20));
///
/// let dirty = tracker.take();
/// assert_eq!(dirty.area(), 50 * 30 + 20 * 20);
/// assert!(!tracker.has_damage());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DamageTracker {
    damage: Region,
    damage_count: u32,
    full_repaint: bool,
    viewport: Rect,
}

impl DamageTracker {
    /// Create a tracker with an empty viewport. Nothing can be damaged until
    /// [`set_viewport`](Self::set_viewport) is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracker for the given viewport.
    pub fn with_viewport(viewport: Rect) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// Set the viewport bounds, clipping existing damage to it.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
        self.damage = self.damage.intersect_rect(&viewport);
        if self.full_repaint {
            self.damage = Region::from(viewport);
        }
        self.check_full_repaint_threshold();
    }

    /// Add a damaged rectangle. Parts outside the viewport are dropped.
    pub fn add_damage(&mut self, rect: Rect) {
        let Some(rect) = rect.intersect(&self.viewport) else {
            return;
        };
        if self.full_repaint {
            return;
        }
        self.damage_count += 1;
        self.damage.union_rect(&rect);
        self.check_full_repaint_threshold();
    }

    /// Add every rectangle of a region.
    pub fn add_region(&mut self, region: &Region) {
        for rect in region {
            self.add_damage(*rect);
        }
    }

    /// Mark the entire viewport as damaged.
    pub fn invalidate_all(&mut self) {
        self.full_repaint = true;
        self.damage = Region::from(self.viewport);
        self.damage_count = 1;
    }

    /// The current dirty region.
    pub fn damage_region(&self) -> &Region {
        &self.damage
    }

    /// Check if any damage has been recorded.
    #[inline]
    pub fn has_damage(&self) -> bool {
        !self.damage.is_empty()
    }

    /// Check if the heuristics (or [`invalidate_all`](Self::invalidate_all))
    /// collapsed the damage into a full repaint.
    #[inline]
    pub fn needs_full_repaint(&self) -> bool {
        self.full_repaint
    }

    /// Number of rectangles submitted since the last clear.
    #[inline]
    pub fn damage_count(&self) -> u32 {
        self.damage_count
    }

    /// The viewport bounds.
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Dirty area divided by viewport area, in `[0, 1]`.
    pub fn damage_ratio(&self) -> f64 {
        let viewport_area = self.viewport.area();
        if viewport_area == 0 {
            return 0.0;
        }
        (self.damage.area() as f64 / viewport_area as f64).min(1.0)
    }

    /// Clear all damage.
    pub fn clear(&mut self) {
        self.damage.clear();
        self.damage_count = 0;
        self.full_repaint = false;
    }

    /// Take the accumulated damage and clear the tracker.
    pub fn take(&mut self) -> Region {
        let damage = std::mem::take(&mut self.damage);
        self.clear();
        damage
    }

    fn check_full_repaint_threshold(&mut self) {
        if self.viewport.is_empty() {
            return;
        }
        if self.damage_count > MAX_DAMAGE_COUNT || self.damage_ratio() > FULL_REPAINT_THRESHOLD {
            tracing::trace!(
                target: targets::COMPOSITOR,
                count = self.damage_count,
                ratio = self.damage_ratio(),
                "damage collapsed into full repaint"
            );
            self.full_repaint = true;
            self.damage = Region::from(self.viewport);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_skin_core::Point;

    fn tracker() -> DamageTracker {
        DamageTracker::with_viewport(Rect::new(0, 0, 100, 100))
    }

    #[test]
    fn test_empty_tracker() {
        let tracker = tracker();
        assert!(!tracker.has_damage());
        assert!(tracker.damage_region().is_empty());
        assert_eq!(tracker.damage_count(), 0);
    }

    #[test]
    fn test_overlapping_damage_is_not_double_counted() {
        let mut tracker = tracker();
        tracker.add_damage(Rect::new(0, 0, 20, 20));
        tracker.add_damage(Rect::new(10, 10, 20, 20));

        assert_eq!(tracker.damage_count(), 2);
        assert_eq!(tracker.damage_region().area(), 400 + 400 - 100);
        assert!(!tracker.damage_region().contains(Point::new(25, 5)));
    }

    #[test]
    fn test_viewport_clipping() {
        let mut tracker = tracker();
        tracker.add_damage(Rect::new(-50, -50, 100, 100));
        assert_eq!(tracker.damage_region().bounds(), Some(Rect::new(0, 0, 50, 50)));

        tracker.clear();
        tracker.add_damage(Rect::new(1000, 1000, 10, 10));
        assert!(!tracker.has_damage());
        assert_eq!(tracker.damage_count(), 0);
    }

    #[test]
    fn test_empty_viewport_accepts_nothing() {
        let mut tracker = DamageTracker::new();
        tracker.add_damage(Rect::new(0, 0, 10, 10));
        assert!(!tracker.has_damage());
    }

    #[test]
    fn test_full_repaint_threshold() {
        let mut tracker = tracker();
        tracker.add_damage(Rect::new(0, 0, 98, 98));
        assert!(tracker.needs_full_repaint());
        assert_eq!(tracker.damage_region().area(), 100 * 100);
    }

    #[test]
    fn test_fragmented_damage_collapses() {
        let mut tracker = tracker();
        for i in 0..=MAX_DAMAGE_COUNT as i32 {
            tracker.add_damage(Rect::new(i % 100, 0, 1, 1));
        }
        assert!(tracker.needs_full_repaint());
    }

    #[test]
    fn test_take_clears() {
        let mut tracker = tracker();
        tracker.invalidate_all();
        let region = tracker.take();
        assert_eq!(region.area(), 10_000);
        assert!(!tracker.has_damage());
        assert!(!tracker.needs_full_repaint());
    }

    #[test]
    fn test_shrinking_viewport_clips_damage() {
        let mut tracker = tracker();
        tracker.add_damage(Rect::new(40, 40, 20, 20));
        tracker.set_viewport(Rect::new(0, 0, 50, 50));
        assert_eq!(tracker.damage_region().area(), 100);
    }
}
