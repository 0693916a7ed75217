//! Raw offset outlines, built per sub-path in grid space before any cleanup.
//!
//! Outlines follow the classic polygon offsetting scheme: every edge is moved along its right
//! hand unit normal and consecutive moved edges are connected with a join. Outlines may self
//! intersect, the winding union pass resolves that.
use super::{EndType, JoinType};
use crate::core::{
    math::{vec2, Vector2},
    traits::Real,
};

/// Raw outline builder for a single offset distance.
#[derive(Debug, Clone)]
pub struct OutlineBuilder<T> {
    delta: T,
    join_type: JoinType,
    /// Threshold for `1 + cos` below which a miter join falls back to a square join.
    miter_lim: T,
    /// Round join/cap steps per radian of turn.
    steps_per_rad: T,
}

impl<T> OutlineBuilder<T>
where
    T: Real,
{
    /// `delta`, `miter_limit` and `arc_tolerance` are all in grid units.
    pub fn new(delta: T, join_type: JoinType, miter_limit: T, arc_tolerance: T) -> Self {
        let abs_delta = delta.abs();
        let quarter = abs_delta / T::four();
        let tol = if arc_tolerance <= T::zero() {
            T::from(0.25).unwrap_or_else(T::one)
        } else if arc_tolerance > quarter {
            quarter
        } else {
            arc_tolerance
        };

        let mut steps_per_2pi = if abs_delta > T::zero() {
            T::pi() / (T::one() - tol / abs_delta).acos()
        } else {
            T::one()
        };
        if steps_per_2pi > abs_delta * T::pi() {
            steps_per_2pi = abs_delta * T::pi();
        }

        let miter_lim = if miter_limit > T::two() {
            T::two() / (miter_limit * miter_limit)
        } else {
            T::half()
        };

        OutlineBuilder {
            delta,
            join_type,
            miter_lim,
            steps_per_rad: steps_per_2pi / T::tau(),
        }
    }

    #[inline]
    pub fn delta(&self) -> T {
        self.delta
    }

    fn arc_steps(&self, angle: T) -> usize {
        let steps = (self.steps_per_rad * angle.abs()).round();
        steps.to_usize().unwrap_or(1).max(1)
    }

    /// Outline of a single point: a circle for round joins, otherwise a square.
    pub fn point(&self, p: Vector2<T>) -> Vec<Vector2<T>> {
        let d = self.delta;
        if self.join_type == JoinType::Round {
            let steps = self.arc_steps(T::tau());
            let step = T::tau() / T::from(steps).unwrap_or_else(T::one);
            return (0..steps)
                .map(|i| {
                    let a = step * T::from(i).unwrap_or_else(T::zero);
                    p + vec2(a.cos(), a.sin()).scale(d)
                })
                .collect();
        }

        vec![
            vec2(p.x - d, p.y - d),
            vec2(p.x + d, p.y - d),
            vec2(p.x + d, p.y + d),
            vec2(p.x - d, p.y + d),
        ]
    }

    /// Outline of a closed ring (at least 3 distinct vertexes).
    pub fn closed_ring(&self, points: &[Vector2<T>]) -> Vec<Vector2<T>> {
        let n = points.len();
        let normals = edge_normals(points, true);
        let mut out = Vec::with_capacity(n * 2);
        for j in 0..n {
            let k = if j == 0 { n - 1 } else { j - 1 };
            self.join(points[j], normals[k], normals[j], &mut out);
        }

        out
    }

    /// Outline of an open path (at least 2 distinct vertexes) capped with `end_type`.
    pub fn open_path(&self, points: &[Vector2<T>], end_type: EndType) -> Vec<Vector2<T>> {
        let mut out = Vec::with_capacity(points.len() * 4);
        self.side(points, &mut out);
        let n = points.len();
        let end_dir = (points[n - 1] - points[n - 2]).normalize();
        self.cap(points[n - 1], end_dir, end_type, &mut out);

        let reversed: Vec<Vector2<T>> = points.iter().rev().copied().collect();
        self.side(&reversed, &mut out);
        let start_dir = (points[0] - points[1]).normalize();
        self.cap(points[0], start_dir, end_type, &mut out);

        out
    }

    /// One side of an open path: moved first point, joins at interior vertexes, moved last point.
    fn side(&self, points: &[Vector2<T>], out: &mut Vec<Vector2<T>>) {
        let d = self.delta;
        let normals = edge_normals(points, false);
        out.push(points[0] + normals[0].scale(d));
        for j in 1..points.len() - 1 {
            self.join(points[j], normals[j - 1], normals[j], out);
        }
        let last = normals.len() - 1;
        out.push(points[points.len() - 1] + normals[last].scale(d));
    }

    /// Cap points strictly between `p + n*d` and `p - n*d`, where `dir` is the walk direction
    /// arriving at `p`.
    fn cap(&self, p: Vector2<T>, dir: Vector2<T>, end_type: EndType, out: &mut Vec<Vector2<T>>) {
        let d = self.delta;
        let n = vec2(dir.y, -dir.x);
        match end_type {
            EndType::OpenSquare => {
                let ext = dir.scale(d.abs());
                out.push(p + n.scale(d) + ext);
                out.push(p - n.scale(d) + ext);
            }
            EndType::OpenRound => {
                let steps = self.arc_steps(T::pi());
                let step = T::pi() / T::from(steps).unwrap_or_else(T::one);
                for i in 1..steps {
                    let a = step * T::from(i).unwrap_or_else(T::zero);
                    out.push(p + n.rotate(a).scale(d));
                }
            }
            EndType::OpenButt | EndType::ClosedPolygon | EndType::ClosedLine => {}
        }
    }

    /// Join at vertex `v` between the moved edge with normal `n1` and the next with normal `n2`.
    fn join(&self, v: Vector2<T>, n1: Vector2<T>, n2: Vector2<T>, out: &mut Vec<Vector2<T>>) {
        let d = self.delta;
        let mut sin_a = n1.perp_dot(n2);
        let cos_a = n1.dot(n2);

        if (sin_a * d).abs() < T::one() {
            if cos_a > T::zero() {
                // nearly collinear
                out.push(v + n1.scale(d));
                return;
            }
            // reversal: growing outlines wrap around the tip, shrinking ones pinch at it
            if d < T::zero() {
                out.push(v + n1.scale(d));
                out.push(v);
                out.push(v + n2.scale(d));
                return;
            }
            sin_a = T::zero();
        } else if sin_a > T::one() {
            sin_a = T::one();
        } else if sin_a < -T::one() {
            sin_a = -T::one();
        }

        if sin_a * d < T::zero() {
            // concave for this offset direction
            out.push(v + n1.scale(d));
            out.push(v);
            out.push(v + n2.scale(d));
            return;
        }

        match self.join_type {
            JoinType::Miter => {
                let r = T::one() + cos_a;
                if r >= self.miter_lim {
                    out.push(v + (n1 + n2).scale(d / r));
                } else {
                    self.square(v, n1, n2, cos_a, out);
                }
            }
            JoinType::Square => self.square(v, n1, n2, cos_a, out),
            JoinType::Round => self.round(v, n1, n2, sin_a, cos_a, out),
        }
    }

    /// Turns of at most 90 degrees get the exact miter point, sharper turns extend both moved
    /// edges by `|d|` past the vertex and connect them.
    fn square(
        &self,
        v: Vector2<T>,
        n1: Vector2<T>,
        n2: Vector2<T>,
        cos_a: T,
        out: &mut Vec<Vector2<T>>,
    ) {
        let d = self.delta;
        if cos_a >= T::zero() {
            out.push(v + (n1 + n2).scale(d / (T::one() + cos_a)));
            return;
        }

        let t1 = vec2(-n1.y, n1.x);
        let t2 = vec2(-n2.y, n2.x);
        let ext = d.abs();
        out.push(v + n1.scale(d) + t1.scale(ext));
        out.push(v + n2.scale(d) - t2.scale(ext));
    }

    fn round(
        &self,
        v: Vector2<T>,
        n1: Vector2<T>,
        n2: Vector2<T>,
        sin_a: T,
        cos_a: T,
        out: &mut Vec<Vector2<T>>,
    ) {
        let d = self.delta;
        let a = sin_a.atan2(cos_a);
        let steps = self.arc_steps(a);
        let step = a / T::from(steps).unwrap_or_else(T::one);
        for i in 0..steps {
            let angle = step * T::from(i).unwrap_or_else(T::zero);
            out.push(v + n1.rotate(angle).scale(d));
        }
        out.push(v + n2.scale(d));
    }
}

/// Right hand unit normal of every edge. Closed rings include the closing edge.
fn edge_normals<T>(points: &[Vector2<T>], is_closed: bool) -> Vec<Vector2<T>>
where
    T: Real,
{
    let n = points.len();
    let edge_count = if is_closed { n } else { n - 1 };
    (0..edge_count)
        .map(|i| {
            let j = if i + 1 == n { 0 } else { i + 1 };
            (points[j] - points[i]).unit_right_normal()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::ring_area;

    fn ccw_square(size: f64) -> Vec<Vector2<f64>> {
        vec![
            vec2(0.0, 0.0),
            vec2(size, 0.0),
            vec2(size, size),
            vec2(0.0, size),
        ]
    }

    #[test]
    fn square_join_right_angles_are_exact_miters() {
        let builder = OutlineBuilder::new(1.0, JoinType::Square, 3.0, 0.25);
        let outline = builder.closed_ring(&ccw_square(10.0));
        assert_eq!(outline.len(), 4);
        assert!(outline[0].fuzzy_eq(vec2(-1.0, -1.0)));
        assert!(outline[2].fuzzy_eq(vec2(11.0, 11.0)));
    }

    #[test]
    fn sharp_miter_falls_back_to_square() {
        // spike with a very sharp tip at (100, 1)
        let spike = vec![vec2(0.0, 0.0), vec2(100.0, 1.0), vec2(0.0, 2.0)];
        let builder = OutlineBuilder::new(1.0, JoinType::Miter, 3.0, 0.25);
        let outline = builder.closed_ring(&spike);
        // the tip is cut: no point reaches far beyond the spike
        assert!(outline.iter().all(|p| p.x < 102.0));
        assert!(outline.len() > 3);
    }

    #[test]
    fn round_cap_area_is_stadium() {
        let builder = OutlineBuilder::new(2048.0, JoinType::Round, 3.0, 0.25);
        let outline = builder.open_path(&[vec2(0.0, 0.0), vec2(10240.0, 0.0)], EndType::OpenRound);
        let area = ring_area(&outline) / (1024.0 * 1024.0);
        let expected = 40.0 + 4.0 * std::f64::consts::PI;
        assert!((area - expected).abs() < 0.01, "area {area}");
    }

    #[test]
    fn butt_cap_is_rectangle() {
        let builder = OutlineBuilder::new(2.0, JoinType::Miter, 3.0, 0.25);
        let outline = builder.open_path(&[vec2(0.0, 0.0), vec2(10.0, 0.0)], EndType::OpenButt);
        assert_eq!(outline.len(), 4);
        assert!(f64::abs(ring_area(&outline) - 40.0) < 1e-9);
    }

    #[test]
    fn point_outline_is_square_or_circle() {
        let square = OutlineBuilder::new(1.0, JoinType::Miter, 3.0, 0.25).point(vec2(5.0, 5.0));
        assert!(f64::abs(ring_area(&square) - 4.0) < 1e-9);

        let circle = OutlineBuilder::new(1024.0, JoinType::Round, 3.0, 0.25).point(vec2(0.0, 0.0));
        let area = ring_area(&circle);
        let expected = std::f64::consts::PI * 1024.0 * 1024.0;
        assert!((area - expected).abs() / expected < 1e-3);
    }

    #[test]
    fn near_reversal_wraps_around_tip() {
        let pts = [vec2(0.0, 0.0), vec2(10240.0, 0.0), vec2(0.0, 1.0)];
        let normals = edge_normals(&pts, false);

        let mut out = Vec::new();
        OutlineBuilder::new(1024.0, JoinType::Miter, 3.0, 0.25).join(
            pts[1],
            normals[0],
            normals[1],
            &mut out,
        );
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|p| p.x > 11000.0), "{out:?}");

        out.clear();
        OutlineBuilder::new(-1024.0, JoinType::Miter, 3.0, 0.25).join(
            pts[1],
            normals[0],
            normals[1],
            &mut out,
        );
        assert_eq!(out.len(), 3);
        assert_eq!(out[1], pts[1]);
    }
}
