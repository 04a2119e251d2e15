//! Pixel regions built from non-overlapping rectangles.
//!
//! A [`Region`] is the currency of the invalidation engine: dirty areas,
//! exclusion areas reserved for native sub-windows, and clip areas for the
//! post-draw pass are all regions.
//!
//! The representation is a flat list of pairwise disjoint rectangles. Union
//! adds only the parts of a rectangle that are not already covered, and
//! subtraction splits every affected rectangle into at most four pieces, so
//! the disjointness invariant holds after every operation.
//!
//! ```
//! use horizon_skin_core::{Rect, Region};
//!
//! let mut region = Region::from(Rect::new(0, 0, 100, 100));
//! region.subtract_rect(&Rect::new(25, 25, 50, 50));
//! assert_eq!(region.area(), 100 * 100 - 50 * 50);
//! ```

use crate::geometry::{Point, Rect};

/// A set of pixels described by disjoint rectangles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    rects: Vec<Rect>,
}

impl Region {
    /// Create an empty region.
    pub const fn new() -> Self {
        Self { rects: Vec::new() }
    }

    /// Check whether the region covers no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// The disjoint rectangles making up this region.
    #[inline]
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Iterate over the disjoint rectangles.
    pub fn iter(&self) -> impl Iterator<Item = &Rect> {
        self.rects.iter()
    }

    /// Number of rectangles in the representation.
    #[inline]
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// Remove all pixels.
    pub fn clear(&mut self) {
        self.rects.clear();
    }

    /// Total covered area in pixels.
    pub fn area(&self) -> i64 {
        self.rects.iter().map(Rect::area).sum()
    }

    /// Bounding box of the region, or `None` when empty.
    pub fn bounds(&self) -> Option<Rect> {
        let mut iter = self.rects.iter();
        let first = *iter.next()?;
        Some(iter.fold(first, |acc, r| acc.union(r)))
    }

    /// Check whether a point lies inside the region.
    pub fn contains(&self, point: Point) -> bool {
        self.rects.iter().any(|r| r.contains(point))
    }

    /// Check whether any part of `rect` lies inside the region.
    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        self.rects.iter().any(|r| r.intersects(rect))
    }

    /// Add a rectangle to the region.
    pub fn union_rect(&mut self, rect: &Rect) {
        if rect.is_empty() {
            return;
        }

        // Only the parts not already covered are added.
        let mut pieces = vec![*rect];
        for existing in &self.rects {
            if pieces.is_empty() {
                return;
            }
            pieces = pieces
                .into_iter()
                .flat_map(|piece| subtract_one(piece, existing))
                .collect();
        }
        self.rects.extend(pieces);
    }

    /// Add every pixel of `other` to the region.
    pub fn union(&mut self, other: &Region) {
        for rect in &other.rects {
            self.union_rect(rect);
        }
    }

    /// Remove a rectangle from the region.
    pub fn subtract_rect(&mut self, rect: &Rect) {
        if rect.is_empty() || self.rects.is_empty() {
            return;
        }
        let rects = std::mem::take(&mut self.rects);
        self.rects = rects
            .into_iter()
            .flat_map(|existing| subtract_one(existing, rect))
            .collect();
    }

    /// Remove every pixel of `other` from the region.
    pub fn subtract(&mut self, other: &Region) {
        for rect in &other.rects {
            if self.rects.is_empty() {
                return;
            }
            self.subtract_rect(rect);
        }
    }

    /// The part of this region inside `rect`.
    pub fn intersect_rect(&self, rect: &Rect) -> Region {
        Region {
            rects: self.rects.iter().filter_map(|r| r.intersect(rect)).collect(),
        }
    }

    /// The part of this region also covered by `other`.
    pub fn intersect(&self, other: &Region) -> Region {
        let mut rects = Vec::new();
        for a in &self.rects {
            for b in &other.rects {
                if let Some(i) = a.intersect(b) {
                    rects.push(i);
                }
            }
        }
        // Both inputs are disjoint, so pairwise intersections are disjoint too.
        Region { rects }
    }

    /// Move every rectangle by the given offset.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        for rect in &mut self.rects {
            *rect = rect.offset(dx, dy);
        }
    }

    /// Check whether both regions cover exactly the same pixels, regardless
    /// of how they are split into rectangles.
    pub fn covers_same(&self, other: &Region) -> bool {
        if self.area() != other.area() {
            return false;
        }
        let mut difference = self.clone();
        difference.subtract(other);
        difference.is_empty()
    }
}

impl From<Rect> for Region {
    fn from(rect: Rect) -> Self {
        let mut region = Region::new();
        region.union_rect(&rect);
        region
    }
}

impl FromIterator<Rect> for Region {
    fn from_iter<I: IntoIterator<Item = Rect>>(iter: I) -> Self {
        let mut region = Region::new();
        for rect in iter {
            region.union_rect(&rect);
        }
        region
    }
}

impl<'a> IntoIterator for &'a Region {
    type Item = &'a Rect;
    type IntoIter = std::slice::Iter<'a, Rect>;

    fn into_iter(self) -> Self::IntoIter {
        self.rects.iter()
    }
}

/// `a` minus `b` as up to four disjoint bands: full-width top and bottom,
/// then left and right slices of the intersection's rows.
fn subtract_one(a: Rect, b: &Rect) -> impl Iterator<Item = Rect> {
    let pieces = match a.intersect(b) {
        None => [Some(a), None, None, None],
        Some(i) => [
            (i.top() > a.top()).then(|| Rect::from_ltrb(a.left(), a.top(), a.right(), i.top())),
            (i.bottom() < a.bottom())
                .then(|| Rect::from_ltrb(a.left(), i.bottom(), a.right(), a.bottom())),
            (i.left() > a.left())
                .then(|| Rect::from_ltrb(a.left(), i.top(), i.left(), i.bottom())),
            (i.right() < a.right())
                .then(|| Rect::from_ltrb(i.right(), i.top(), a.right(), i.bottom())),
        ],
    };
    pieces.into_iter().flatten()
}
