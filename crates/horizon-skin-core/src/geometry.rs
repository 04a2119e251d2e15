//! Integer pixel geometry.
//!
//! Skins are authored in whole pixels and composited into pixel buffers, so
//! every coordinate in the core is an `i32`. Rectangles are half-open: a rect
//! at `(0, 0)` with size `10x10` contains `(9, 9)` but not `(10, 10)`.

use serde::{Deserialize, Serialize};

/// A point in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The origin point (0, 0).
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Translate the point by the given offsets.
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Component-wise difference `self - other`.
    #[inline]
    pub const fn delta_from(self, other: Point) -> Point {
        Point {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// A size in 2D space (width and height).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Zero size.
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    /// Check if the size has zero (or negative) area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

impl From<(i32, i32)> for Size {
    fn from((width, height): (i32, i32)) -> Self {
        Self { width, height }
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self {
            width: i32::try_from(width).unwrap_or(i32::MAX),
            height: i32::try_from(height).unwrap_or(i32::MAX),
        }
    }
}

/// A rectangle defined by origin and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    /// Create a new rectangle from origin and size.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            origin: Point { x, y },
            size: Size { width, height },
        }
    }

    /// Create a rectangle from its left, top, right and bottom edges.
    #[inline]
    pub const fn from_ltrb(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self {
            origin: Point::ZERO,
            size,
        }
    }

    /// Empty rectangle at origin.
    pub const ZERO: Self = Self {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    #[inline]
    pub const fn left(&self) -> i32 {
        self.origin.x
    }

    #[inline]
    pub const fn top(&self) -> i32 {
        self.origin.y
    }

    #[inline]
    pub const fn right(&self) -> i32 {
        self.origin.x + self.size.width
    }

    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.origin.y + self.size.height
    }

    #[inline]
    pub const fn width(&self) -> i32 {
        self.size.width
    }

    #[inline]
    pub const fn height(&self) -> i32 {
        self.size.height
    }

    /// Center point of the rectangle (rounded toward the origin).
    #[inline]
    pub const fn center(&self) -> Point {
        Point {
            x: self.origin.x + self.size.width / 2,
            y: self.origin.y + self.size.height / 2,
        }
    }

    /// Area in pixels; zero for empty rectangles.
    #[inline]
    pub fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            i64::from(self.size.width) * i64::from(self.size.height)
        }
    }

    /// Check if the rectangle is empty (zero or negative size).
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// Check if `other` lies entirely within this rectangle.
    #[inline]
    pub const fn contains_rect(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.top() >= self.top()
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Check whether the two rectangles share any pixel.
    #[inline]
    pub const fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Compute the intersection of two rectangles.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if left < right && top < bottom {
            Some(Rect::from_ltrb(left, top, right, bottom))
        } else {
            None
        }
    }

    /// Compute the union (bounding box) of two rectangles.
    ///
    /// Empty rectangles do not contribute to the bounding box.
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Rect::from_ltrb(
            self.left().min(other.left()),
            self.top().min(other.top()),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Offset the rectangle by the given amount.
    #[inline]
    pub const fn offset(&self, dx: i32, dy: i32) -> Rect {
        Rect {
            origin: self.origin.offset(dx, dy),
            size: self.size,
        }
    }

    /// Offset the rectangle by a point.
    #[inline]
    pub const fn translate(&self, by: Point) -> Rect {
        self.offset(by.x, by.y)
    }

    /// Replace a negative width or height with zero.
    #[inline]
    pub fn normalized(&self) -> Rect {
        Rect {
            origin: self.origin,
            size: Size::new(self.size.width.max(0), self.size.height.max(0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_open_contains() {
        let r = Rect::new(0, 0, 10, 10);
        assert!(r.contains(Point::new(0, 0)));
        assert!(r.contains(Point::new(9, 9)));
        assert!(!r.contains(Point::new(10, 9)));
        assert!(!r.contains(Point::new(9, 10)));
    }

    #[test]
    fn test_intersect_and_union() {
        let a = Rect::from_ltrb(0, 0, 50, 50);
        let b = Rect::from_ltrb(25, 25, 100, 100);
        assert_eq!(a.intersect(&b), Some(Rect::from_ltrb(25, 25, 50, 50)));
        assert_eq!(a.union(&b), Rect::from_ltrb(0, 0, 100, 100));

        let far = Rect::new(200, 200, 5, 5);
        assert_eq!(a.intersect(&far), None);
        assert!(!a.intersects(&far));
    }

    #[test]
    fn test_union_ignores_empty() {
        let a = Rect::new(10, 10, 5, 5);
        assert_eq!(a.union(&Rect::ZERO), a);
        assert_eq!(Rect::ZERO.union(&a), a);
    }

    #[test]
    fn test_center_and_area() {
        let r = Rect::from_ltrb(0, 20, 10, 30);
        assert_eq!(r.center(), Point::new(5, 25));
        assert_eq!(r.area(), 100);
        assert_eq!(Rect::new(0, 0, -4, 10).area(), 0);
    }

    #[test]
    fn test_normalized() {
        let r = Rect::new(3, 4, -10, 7).normalized();
        assert_eq!(r.size, Size::new(0, 7));
        assert!(r.is_empty());
    }
}
