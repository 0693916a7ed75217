use super::{unwrap_spatial_index, Segment};
use crate::core::{
    math::{line_winding, ring_area, Vector2},
    traits::Real,
};
use static_aabb2d_index::{StaticAABB2DIndex, StaticAABB2DIndexBuilder, AABB};
use std::ops::{Index, IndexMut};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents the orientation of a polygon.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PolygonOrientation {
    /// Polygon is open (a polyline).
    Open,
    /// Polygon is closed and directionally clockwise.
    Clockwise,
    /// Polygon is closed and directionally counter clockwise.
    CounterClockwise,
}

/// Ordered list of vertexes joined by straight segments.
///
/// A closed polygon has an implied segment from the last vertex back to the first and never
/// stores the first position again at the end.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon<T = f64> {
    #[cfg_attr(feature = "serde", serde(rename = "vertexes"))]
    pub vertex_data: Vec<Vector2<T>>,
    pub is_closed: bool,
}

impl<T> Default for Polygon<T>
where
    T: Real,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for Polygon<T> {
    type Output = Vector2<T>;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.vertex_data[index]
    }
}

impl<T> IndexMut<usize> for Polygon<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.vertex_data[index]
    }
}

impl<T> Polygon<T>
where
    T: Real,
{
    /// Create a new empty open polygon.
    #[inline]
    pub fn new() -> Self {
        Polygon {
            vertex_data: Vec::new(),
            is_closed: false,
        }
    }

    /// Create a new empty closed polygon.
    #[inline]
    pub fn new_closed() -> Self {
        Polygon {
            vertex_data: Vec::new(),
            is_closed: true,
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize, is_closed: bool) -> Self {
        Polygon {
            vertex_data: Vec::with_capacity(capacity),
            is_closed,
        }
    }

    #[inline]
    pub fn from_vertexes<I>(vertexes: I, is_closed: bool) -> Self
    where
        I: IntoIterator<Item = Vector2<T>>,
    {
        Polygon {
            vertex_data: vertexes.into_iter().collect(),
            is_closed,
        }
    }

    #[inline]
    pub fn add(&mut self, x: T, y: T) {
        self.vertex_data.push(Vector2::new(x, y));
    }

    #[inline]
    pub fn add_vertex(&mut self, v: Vector2<T>) {
        self.vertex_data.push(v);
    }

    /// Add `v` unless it is within `pos_equal_eps` of the current last vertex.
    #[inline]
    pub fn add_or_skip(&mut self, v: Vector2<T>, pos_equal_eps: T) {
        match self.vertex_data.last() {
            Some(last) if last.fuzzy_eq_eps(v, pos_equal_eps) => {}
            _ => self.vertex_data.push(v),
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertex_data.is_empty()
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.is_closed
    }

    #[inline]
    pub fn set_is_closed(&mut self, is_closed: bool) {
        self.is_closed = is_closed;
    }

    #[inline]
    pub fn last(&self) -> Option<Vector2<T>> {
        self.vertex_data.last().copied()
    }

    #[inline]
    pub fn iter_vertexes(&self) -> impl DoubleEndedIterator<Item = Vector2<T>> + '_ {
        self.vertex_data.iter().copied()
    }

    /// Number of segments (vertex count for closed polygons, one less for open ones).
    #[inline]
    pub fn segment_count(&self) -> usize {
        let vc = self.vertex_count();
        if vc < 2 {
            0
        } else if self.is_closed {
            vc
        } else {
            vc - 1
        }
    }

    /// Iterate all segments, including the closing segment of a closed polygon.
    #[inline]
    pub fn iter_segments(&self) -> SegmentIter<'_, T> {
        SegmentIter {
            polygon: self,
            pos: 0,
            remaining: self.segment_count(),
        }
    }

    /// Fuzzy compare vertexes (same count, same order) and closed state.
    pub fn fuzzy_eq_eps(&self, other: &Self, eps: T) -> bool {
        self.is_closed == other.is_closed
            && self.vertex_count() == other.vertex_count()
            && self
                .iter_vertexes()
                .zip(other.iter_vertexes())
                .all(|(a, b)| a.fuzzy_eq_eps(b, eps))
    }

    /// Total length of all segments.
    pub fn path_length(&self) -> T {
        self.iter_segments()
            .fold(T::zero(), |acc, seg| acc + seg.length())
    }

    /// Signed area, positive for counter clockwise closed polygons. Open polygons have zero area.
    ///
    /// # Examples
    ///
    /// ```
    /// # use path_contours::polygon_closed;
    /// # use path_contours::core::traits::*;
    /// let mut square = polygon_closed![(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)];
    /// assert!(square.area().fuzzy_eq(4.0));
    /// square.invert_direction_mut();
    /// assert!(square.area().fuzzy_eq(-4.0));
    /// ```
    pub fn area(&self) -> T {
        if !self.is_closed {
            return T::zero();
        }

        ring_area(&self.vertex_data)
    }

    pub fn orientation(&self) -> PolygonOrientation {
        if !self.is_closed {
            return PolygonOrientation::Open;
        }

        if self.area() < T::zero() {
            PolygonOrientation::Clockwise
        } else {
            PolygonOrientation::CounterClockwise
        }
    }

    /// Axis aligned bounding box of all vertexes, `None` when empty.
    pub fn extents(&self) -> Option<AABB<T>> {
        let first = self.vertex_data.first()?;
        let mut result = AABB::new(first.x, first.y, first.x, first.y);
        for v in self.vertex_data.iter().skip(1) {
            result.min_x = num_traits::real::Real::min(result.min_x, v.x);
            result.min_y = num_traits::real::Real::min(result.min_y, v.y);
            result.max_x = num_traits::real::Real::max(result.max_x, v.x);
            result.max_y = num_traits::real::Real::max(result.max_y, v.y);
        }

        Some(result)
    }

    /// Winding number of `point` relative to this closed polygon (0 for open polygons).
    ///
    /// # Examples
    ///
    /// ```
    /// # use path_contours::polygon_closed;
    /// # use path_contours::core::math::Vector2;
    /// let mut square = polygon_closed![(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)];
    /// assert_eq!(square.winding_number(Vector2::new(1.0, 1.0)), 1);
    /// assert_eq!(square.winding_number(Vector2::new(3.0, 1.0)), 0);
    /// square.invert_direction_mut();
    /// assert_eq!(square.winding_number(Vector2::new(1.0, 1.0)), -1);
    /// ```
    pub fn winding_number(&self, point: Vector2<T>) -> i32 {
        if !self.is_closed {
            return 0;
        }

        self.iter_segments()
            .map(|seg| line_winding(seg.start, seg.end, point))
            .sum()
    }

    /// Even-odd containment by horizontal ray cast.
    ///
    /// Uses the half-open rule `(a.y > p.y) != (b.y > p.y)` so a ray passing exactly through a
    /// vertex is counted once. Points exactly on the boundary may land on either side, callers
    /// that need a boundary convention test distance to the boundary first.
    pub fn contains_point_even_odd(&self, point: Vector2<T>) -> bool {
        if !self.is_closed {
            return false;
        }

        self.iter_segments()
            .filter(|seg| ray_crosses(seg, point))
            .count()
            % 2
            == 1
    }

    /// Remove consecutive vertexes that are fuzzy equal, including a closed polygon's last vertex
    /// repeating its first.
    ///
    /// Returns `None` when nothing was removed.
    pub fn remove_repeat_pos(&self, pos_equal_eps: T) -> Option<Self> {
        if self.vertex_count() < 2 {
            return None;
        }

        let mut result = Polygon::with_capacity(self.vertex_count(), self.is_closed);
        for v in self.iter_vertexes() {
            result.add_or_skip(v, pos_equal_eps);
        }

        if self.is_closed && result.vertex_count() > 1 {
            if let (Some(first), Some(last)) = (result.vertex_data.first(), result.last()) {
                if first.fuzzy_eq_eps(last, pos_equal_eps) {
                    result.vertex_data.pop();
                }
            }
        }

        if result.vertex_count() == self.vertex_count() {
            return None;
        }

        Some(result)
    }

    /// Reverse the direction of the polygon in place.
    #[inline]
    pub fn invert_direction_mut(&mut self) {
        self.vertex_data.reverse();
    }

    /// Uniformly scale all vertexes about the origin by `scale_factor`.
    pub fn scale_mut(&mut self, scale_factor: T) {
        for v in self.vertex_data.iter_mut() {
            *v = v.scale(scale_factor);
        }
    }

    pub fn translate_mut(&mut self, x: T, y: T) {
        for v in self.vertex_data.iter_mut() {
            v.x = v.x + x;
            v.y = v.y + y;
        }
    }

    /// Creates a spatial index of all the polygon segments. The key of each box is the segment's
    /// start vertex index.
    pub fn create_aabb_index(&self) -> StaticAABB2DIndex<T> {
        let mut builder = StaticAABB2DIndexBuilder::new(self.segment_count());
        for seg in self.iter_segments() {
            let bb = seg.bounding_box();
            builder.add(bb.min_x, bb.min_y, bb.max_x, bb.max_y);
        }

        unwrap_spatial_index(builder)
    }
}

/// Half-open horizontal ray test: does the ray from `point` toward +x cross `seg`.
#[inline]
pub fn ray_crosses<T>(seg: &Segment<T>, point: Vector2<T>) -> bool
where
    T: Real,
{
    let a = seg.start;
    let b = seg.end;
    if (a.y > point.y) == (b.y > point.y) {
        return false;
    }

    let x_cross = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
    point.x < x_cross
}

/// Iterator over the segments of a [Polygon].
#[derive(Debug, Clone)]
pub struct SegmentIter<'a, T> {
    polygon: &'a Polygon<T>,
    pos: usize,
    remaining: usize,
}

impl<T> Iterator for SegmentIter<'_, T>
where
    T: Real,
{
    type Item = Segment<T>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        self.remaining -= 1;
        let vc = self.polygon.vertex_count();
        let i = self.pos;
        let j = if i + 1 == vc { 0 } else { i + 1 };
        self.pos += 1;
        Some(Segment::new(self.polygon[i], self.polygon[j]))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for SegmentIter<'_, T> where T: Real {}
