use super::{base_math::parametric_from_point, Vector2};
use crate::core::traits::Real;

/// Result of intersecting two line segments.
#[derive(Debug, Copy, Clone)]
pub enum LineLineIntr<T>
where
    T: Real,
{
    /// Segments are parallel and not collinear, or degenerate and apart.
    NoIntersect,
    /// Segments cross (or touch) at a single point.
    TrueIntersect {
        /// Parametric value of the intersect along the first segment.
        seg1_t: T,
        /// Parametric value of the intersect along the second segment.
        seg2_t: T,
    },
    /// Segments are collinear and share a stretch.
    Overlapping {
        /// Parametric value where the shared stretch starts along the second segment.
        seg2_t0: T,
        /// Parametric value where the shared stretch ends along the second segment.
        seg2_t1: T,
    },
    /// The infinite lines cross but at least one segment would have to be extended.
    FalseIntersect {
        /// Parametric value of the intersect along the first segment.
        seg1_t: T,
        /// Parametric value of the intersect along the second segment.
        seg2_t: T,
    },
}

/// Intersects the segments `v1->v2` and `u1->u2`.
///
/// Solutions are parametric values for `P(t) = p0 + t * (p1 - p0)` on each segment. Segments
/// are parallel when the parallelogram they span has an area under `epsilon^2`, and collinear
/// when they are also within `epsilon` of each other's line. Parametric values are scaled by
/// segment length before fuzzy comparing, so `epsilon` is a distance throughout and the result
/// does not depend on the coordinate scale.
///
/// # Examples
///
/// ```
/// # use path_contours::core::math::*;
/// let v1 = Vector2::new(0.0, 0.0);
/// let v2 = Vector2::new(1.0, 0.0);
/// let u1 = Vector2::new(0.5, -1.0);
/// let u2 = Vector2::new(0.5, 1.0);
/// if let LineLineIntr::TrueIntersect { seg1_t, seg2_t } = line_line_intr(v1, v2, u1, u2, 1e-5) {
///     assert_eq!(seg1_t, 0.5);
///     assert_eq!(seg2_t, 0.5);
/// } else {
///     unreachable!("expected true intersection between line segments");
/// }
/// ```
pub fn line_line_intr<T>(
    v1: Vector2<T>,
    v2: Vector2<T>,
    u1: Vector2<T>,
    u2: Vector2<T>,
    epsilon: T,
) -> LineLineIntr<T>
where
    T: Real,
{
    // http://geomalgorithms.com/a05-_intersect-1.html
    use LineLineIntr::*;

    let v = v2 - v1;
    let u = u2 - u1;
    let v_pdot_u = v.perp_dot(u);
    let w = v1 - u1;
    let eps = epsilon;

    let seg1_length = v.length();
    let seg2_length = u.length();

    if !v_pdot_u.fuzzy_eq_zero_eps(eps * eps) {
        let seg1_t = u.perp_dot(w) / v_pdot_u;
        let seg2_t = v.perp_dot(w) / v_pdot_u;
        if !(seg1_t * seg1_length).fuzzy_in_range_eps(T::zero(), seg1_length, eps)
            || !(seg2_t * seg2_length).fuzzy_in_range_eps(T::zero(), seg2_length, eps)
        {
            return FalseIntersect { seg1_t, seg2_t };
        }
        return TrueIntersect { seg1_t, seg2_t };
    }

    // parallel from here on
    let v_pdot_w = v.perp_dot(w);
    let u_pdot_w = u.perp_dot(w);
    if !v_pdot_w.fuzzy_eq_zero_eps(eps * seg1_length)
        || !u_pdot_w.fuzzy_eq_zero_eps(eps * seg2_length)
    {
        return NoIntersect;
    }

    let v_is_point = v1.fuzzy_eq_eps(v2, eps);
    let u_is_point = u1.fuzzy_eq_eps(u2, eps);

    match (v_is_point, u_is_point) {
        (true, true) => {
            if v1.fuzzy_eq_eps(u1, eps) {
                return TrueIntersect {
                    seg1_t: T::zero(),
                    seg2_t: T::zero(),
                };
            }
            return NoIntersect;
        }
        (true, false) => {
            let seg2_t = parametric_from_point(u1, u2, v1, eps);
            if (seg2_t * seg2_length).fuzzy_in_range_eps(T::zero(), seg2_length, eps) {
                return TrueIntersect {
                    seg1_t: T::zero(),
                    seg2_t,
                };
            }
            return NoIntersect;
        }
        (false, true) => {
            let seg1_t = parametric_from_point(v1, v2, u1, eps);
            if (seg1_t * seg1_length).fuzzy_in_range_eps(T::zero(), seg1_length, eps) {
                return TrueIntersect {
                    seg1_t,
                    seg2_t: T::zero(),
                };
            }
            return NoIntersect;
        }
        (false, false) => {}
    }

    // collinear, find the shared stretch along u
    let w2 = v2 - u1;
    let (mut seg2_t0, mut seg2_t1) = if u.x.abs() < u.y.abs() {
        (w.y / u.y, w2.y / u.y)
    } else {
        (w.x / u.x, w2.x / u.x)
    };

    if seg2_t0 > seg2_t1 {
        std::mem::swap(&mut seg2_t0, &mut seg2_t1);
    }

    if !(seg2_t0 * seg2_length).fuzzy_lt_eps(seg2_length, eps)
        || !(seg2_t1 * seg2_length).fuzzy_gt_eps(T::zero(), eps)
    {
        return NoIntersect;
    }

    seg2_t0 = num_traits::real::Real::max(seg2_t0, T::zero());
    seg2_t1 = num_traits::real::Real::min(seg2_t1, T::one());

    if ((seg2_t1 - seg2_t0) * seg2_length).fuzzy_eq_zero_eps(eps) {
        // end to end touch
        let seg1_t = if v1.fuzzy_eq_eps(u1, eps) || v1.fuzzy_eq_eps(u2, eps) {
            T::zero()
        } else {
            T::one()
        };

        return TrueIntersect {
            seg1_t,
            seg2_t: seg2_t0,
        };
    }

    Overlapping { seg2_t0, seg2_t1 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::vec2;

    #[test]
    fn parallel_segments_do_not_intersect() {
        let r = line_line_intr(
            vec2(0.0, 0.0),
            vec2(10.0, 0.0),
            vec2(0.0, 1.0),
            vec2(10.0, 1.0),
            1e-5,
        );
        assert!(matches!(r, LineLineIntr::NoIntersect));
    }

    #[test]
    fn collinear_segments_overlap() {
        let r = line_line_intr(
            vec2(0.0, 0.0),
            vec2(10.0, 0.0),
            vec2(5.0, 0.0),
            vec2(15.0, 0.0),
            1e-5,
        );
        match r {
            LineLineIntr::Overlapping { seg2_t0, seg2_t1 } => {
                assert!(f64::abs(seg2_t0 - 0.0) < 1e-9);
                assert!(f64::abs(seg2_t1 - 0.5) < 1e-9);
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn crossing_outside_segment_is_false_intersect() {
        let r = line_line_intr(
            vec2(0.0, 0.0),
            vec2(1.0, 0.0),
            vec2(5.0, -1.0),
            vec2(5.0, 1.0),
            1e-5,
        );
        assert!(matches!(r, LineLineIntr::FalseIntersect { .. }));
    }

    #[test]
    fn short_perpendicular_segments_cross() {
        let r = line_line_intr(
            vec2(-0.005, 0.0025),
            vec2(0.01, 0.0025),
            vec2(0.005, 0.0),
            vec2(0.005, 0.005),
            1e-4,
        );
        match r {
            LineLineIntr::TrueIntersect { seg1_t, seg2_t } => {
                assert!(f64::abs(seg1_t - 2.0 / 3.0) < 1e-9);
                assert!(f64::abs(seg2_t - 0.5) < 1e-9);
            }
            other => panic!("unexpected result {other:?}"),
        }
    }
}
