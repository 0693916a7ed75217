use crate::core::{
    math::{midpoint, min_max, point_from_parametric, Vector2},
    traits::Real,
};
use static_aabb2d_index::AABB;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One straight edge going from `start` to `end`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Segment<T = f64> {
    pub start: Vector2<T>,
    pub end: Vector2<T>,
}

impl<T> Segment<T>
where
    T: Real,
{
    #[inline]
    pub fn new(start: Vector2<T>, end: Vector2<T>) -> Self {
        Segment { start, end }
    }

    #[inline]
    pub fn length(&self) -> T {
        (self.end - self.start).length()
    }

    #[inline]
    pub fn midpoint(&self) -> Vector2<T> {
        midpoint(self.start, self.end)
    }

    /// Point at parametric value `t` (0 at `start`, 1 at `end`).
    #[inline]
    pub fn point_at(&self, t: T) -> Vector2<T> {
        point_from_parametric(self.start, self.end, t)
    }

    /// Same segment walked the other way.
    #[inline]
    pub fn reversed(&self) -> Self {
        Segment::new(self.end, self.start)
    }

    #[inline]
    pub fn bounding_box(&self) -> AABB<T> {
        let (min_x, max_x) = min_max(self.start.x, self.end.x);
        let (min_y, max_y) = min_max(self.start.y, self.end.y);
        AABB::new(min_x, min_y, max_x, max_y)
    }

    #[inline]
    pub fn fuzzy_eq_eps(&self, other: &Self, eps: T) -> bool {
        self.start.fuzzy_eq_eps(other.start, eps) && self.end.fuzzy_eq_eps(other.end, eps)
    }

    #[inline]
    pub fn fuzzy_eq(&self, other: &Self) -> bool {
        self.fuzzy_eq_eps(other, T::fuzzy_epsilon())
    }
}
