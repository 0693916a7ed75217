use super::Vector2;
use crate::core::traits::Real;

/// Returns the (min, max) values from `v1` and `v2`.
///
/// # Examples
///
/// ```
/// # use path_contours::core::math::*;
/// assert_eq!(min_max(8, 4), (4, 8));
/// ```
#[inline]
pub fn min_max<T>(v1: T, v2: T) -> (T, T)
where
    T: PartialOrd,
{
    if v1 < v2 {
        (v1, v2)
    } else {
        (v2, v1)
    }
}

/// Distance squared between the points `p0` and `p1`.
#[inline]
pub fn dist_squared<T>(p0: Vector2<T>, p1: Vector2<T>) -> T
where
    T: Real,
{
    let d = p0 - p1;
    d.dot(d)
}

/// Midpoint of a line segment defined by `p0` to `p1`.
#[inline]
pub fn midpoint<T>(p0: Vector2<T>, p1: Vector2<T>) -> Vector2<T>
where
    T: Real,
{
    Vector2::new((p0.x + p1.x) / T::two(), (p0.y + p1.y) / T::two())
}

/// Returns the point on the line segment going from `p0` to `p1` at parametric value `t`.
#[inline]
pub fn point_from_parametric<T>(p0: Vector2<T>, p1: Vector2<T>, t: T) -> Vector2<T>
where
    T: Real,
{
    p0 + (p1 - p0).scale(t)
}

/// Returns the parametric value on the line segment going from `p0` to `p1` at the `point` given.
///
/// Assumes `point` lies on the line. Vertical segments (`p0.x` fuzzy equal to `p1.x` using
/// `epsilon`) are measured along y.
#[inline]
pub fn parametric_from_point<T>(p0: Vector2<T>, p1: Vector2<T>, point: Vector2<T>, epsilon: T) -> T
where
    T: Real,
{
    if p0.x.fuzzy_eq_eps(p1.x, epsilon) {
        (point.y - p0.y) / (p1.y - p0.y)
    } else {
        (point.x - p0.x) / (p1.x - p0.x)
    }
}

/// Returns the closest point on the line segment from `p0` to `p1` to the `point` given.
#[inline]
pub fn line_seg_closest_point<T>(p0: Vector2<T>, p1: Vector2<T>, point: Vector2<T>) -> Vector2<T>
where
    T: Real,
{
    // http://geomalgorithms.com/a02-_lines.html
    let v = p1 - p0;
    let w = point - p0;
    let c1 = w.dot(v);
    if c1 < T::fuzzy_epsilon() {
        return p0;
    }

    let c2 = v.length_squared();
    if c2 < c1 + T::fuzzy_epsilon() {
        return p1;
    }

    p0 + v.scale(c1 / c2)
}

/// Distance from `point` to the closest point of the segment `p0` to `p1`.
#[inline]
pub fn line_seg_distance<T>(p0: Vector2<T>, p1: Vector2<T>, point: Vector2<T>) -> T
where
    T: Real,
{
    dist_squared(line_seg_closest_point(p0, p1, point), point).sqrt()
}

/// Perpendicular distance from `point` to the infinite line through `p0` and `p1`.
///
/// Falls back to the distance between `point` and `p0` when the line is degenerate.
#[inline]
pub fn line_distance<T>(p0: Vector2<T>, p1: Vector2<T>, point: Vector2<T>) -> T
where
    T: Real,
{
    let v = p1 - p0;
    let len = v.length();
    if len.fuzzy_eq_zero() {
        return dist_squared(p0, point).sqrt();
    }

    (v.perp_dot(point - p0) / len).abs()
}

#[inline]
fn perp_dot_test_value<T>(p0: Vector2<T>, p1: Vector2<T>, point: Vector2<T>) -> T
where
    T: Real,
{
    (p1.x - p0.x) * (point.y - p0.y) - (p1.y - p0.y) * (point.x - p0.x)
}

/// Returns true if `point` is left of the direction vector `p1 - p0`.
///
/// # Examples
///
/// ```
/// # use path_contours::core::math::*;
/// let p0 = Vector2::new(1.0, 1.0);
/// let p1 = Vector2::new(2.0, 2.0);
/// assert!(is_left(p0, p1, Vector2::new(0.0, 1.0)));
/// assert!(!is_left(p0, p1, Vector2::new(1.0, 0.0)));
/// ```
#[inline]
pub fn is_left<T>(p0: Vector2<T>, p1: Vector2<T>, point: Vector2<T>) -> bool
where
    T: Real,
{
    perp_dot_test_value(p0, p1, point) > T::zero()
}

/// Signed area of a closed ring of points (shoelace formula), positive when counter clockwise.
#[inline]
pub fn ring_area<T>(points: &[Vector2<T>]) -> T
where
    T: Real,
{
    let n = points.len();
    if n < 3 {
        return T::zero();
    }

    let mut double_area = T::zero();
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        double_area = double_area + a.perp_dot(b);
    }

    double_area / T::two()
}

/// Winding number contribution of the directed line `v1 -> v2` for `point`.
///
/// Upward crossings with the point on the left count `+1`, downward crossings with the point on
/// the right count `-1`. Summing this over a closed ring gives its winding number.
#[inline]
pub fn line_winding<T>(v1: Vector2<T>, v2: Vector2<T>, point: Vector2<T>) -> i32
where
    T: Real,
{
    if v1.y <= point.y {
        if v2.y > point.y && is_left(v1, v2, point) {
            return 1;
        }
    } else if v2.y <= point.y && !is_left(v1, v2, point) {
        return -1;
    }

    0
}
