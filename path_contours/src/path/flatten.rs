use super::{PathData, PathDataIssue, PathSegment};
use crate::{
    core::math::{line_distance, midpoint, vec2, Vector2},
    polygon::Polygon,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum recursion depth when subdividing a cubic curve.
const MAX_SUBDIVISION_DEPTH: u32 = 16;

/// Options used when decomposing path data into polygons.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Copy, Clone)]
pub struct FlattenOptions {
    /// Maximum distance between a curve and the chords approximating it.
    pub flatness: f64,
    /// Fuzzy comparison epsilon used for determining if two positions are equal (closing point
    /// detection and repeat vertex removal).
    pub pos_equal_eps: f64,
}

impl FlattenOptions {
    #[inline]
    pub fn new() -> Self {
        Self {
            flatness: 0.1,
            pos_equal_eps: 1e-4,
        }
    }
}

impl Default for FlattenOptions {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Sub-paths produced by [PathData::decompose] plus the issues met along the way.
#[derive(Debug, Clone, Default)]
pub struct Decomposed {
    pub polygons: Vec<Polygon<f64>>,
    pub issues: Vec<PathDataIssue>,
}

#[derive(Copy, Clone)]
enum LastControl {
    None,
    Cubic(Vector2),
    Quadratic(Vector2),
}

struct Walker<'a> {
    options: &'a FlattenOptions,
    current: Vector2,
    start: Vector2,
    last_control: LastControl,
    points: Vec<Vector2>,
    open_subpath: bool,
    seen_move: bool,
    subpath_index: usize,
    result: Decomposed,
}

impl PathData {
    /// Walk the commands and decompose them into sub-path polygons of straight chords.
    ///
    /// Curves are subdivided until within `options.flatness`. A sub-path is closed when it ends
    /// with a close command or its last point is within `options.pos_equal_eps` of its first.
    ///
    /// # Examples
    ///
    /// ```
    /// # use path_contours::path::*;
    /// # use path_contours::core::traits::*;
    /// let (data, _) = PathData::parse("M 0 0 H 10 V 10 H 0 Z M 20 0 L 30 0");
    /// let result = data.decompose(&FlattenOptions::new());
    /// assert!(result.issues.is_empty());
    /// assert_eq!(result.polygons.len(), 2);
    /// assert!(result.polygons[0].is_closed());
    /// assert_eq!(result.polygons[0].vertex_count(), 4);
    /// assert!(result.polygons[0].area().fuzzy_eq(100.0));
    /// assert!(!result.polygons[1].is_closed());
    /// ```
    pub fn decompose(&self, options: &FlattenOptions) -> Decomposed {
        let mut walker = Walker {
            options,
            current: Vector2::zero(),
            start: Vector2::zero(),
            last_control: LastControl::None,
            points: Vec::new(),
            open_subpath: false,
            seen_move: false,
            subpath_index: 0,
            result: Decomposed::default(),
        };

        for cmd in &self.commands {
            walker.command(cmd.relative, cmd.segment);
        }

        walker.finish(false);
        walker.result
    }
}

impl Walker<'_> {
    fn resolve(&self, relative: bool, x: f64, y: f64) -> Vector2 {
        if relative {
            vec2(self.current.x + x, self.current.y + y)
        } else {
            vec2(x, y)
        }
    }

    /// Make sure a sub-path is in progress before a drawing command.
    fn ensure_subpath(&mut self) {
        if self.open_subpath {
            return;
        }

        if !self.seen_move {
            self.result.issues.push(PathDataIssue::NoInitialMove);
            self.seen_move = true;
        }

        // after a close (or at the very start) drawing continues from the sub-path start
        self.points.clear();
        self.points.push(self.current);
        self.open_subpath = true;
    }

    fn command(&mut self, relative: bool, segment: PathSegment) {
        let mut next_control = LastControl::None;
        match segment {
            PathSegment::MoveTo { x, y } => {
                self.finish(false);
                let p = self.resolve(relative, x, y);
                self.seen_move = true;
                self.current = p;
                self.start = p;
                self.points.clear();
                self.points.push(p);
                self.open_subpath = true;
            }
            PathSegment::LineTo { x, y } => {
                self.ensure_subpath();
                let p = self.resolve(relative, x, y);
                self.line_to(p);
            }
            PathSegment::HorizontalLineTo { x } => {
                self.ensure_subpath();
                let x = if relative { self.current.x + x } else { x };
                self.line_to(vec2(x, self.current.y));
            }
            PathSegment::VerticalLineTo { y } => {
                self.ensure_subpath();
                let y = if relative { self.current.y + y } else { y };
                self.line_to(vec2(self.current.x, y));
            }
            PathSegment::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                self.ensure_subpath();
                let c1 = self.resolve(relative, x1, y1);
                let c2 = self.resolve(relative, x2, y2);
                let p = self.resolve(relative, x, y);
                self.cubic_to(c1, c2, p);
                next_control = LastControl::Cubic(c2);
            }
            PathSegment::SmoothCurveTo { x2, y2, x, y } => {
                self.ensure_subpath();
                let c1 = match self.last_control {
                    LastControl::Cubic(c) => reflect(c, self.current),
                    _ => self.current,
                };
                let c2 = self.resolve(relative, x2, y2);
                let p = self.resolve(relative, x, y);
                self.cubic_to(c1, c2, p);
                next_control = LastControl::Cubic(c2);
            }
            PathSegment::Quadratic { x1, y1, x, y } => {
                self.ensure_subpath();
                let q = self.resolve(relative, x1, y1);
                let p = self.resolve(relative, x, y);
                self.quadratic_to(q, p);
                next_control = LastControl::Quadratic(q);
            }
            PathSegment::SmoothQuadratic { x, y } => {
                self.ensure_subpath();
                let q = match self.last_control {
                    LastControl::Quadratic(c) => reflect(c, self.current),
                    _ => self.current,
                };
                let p = self.resolve(relative, x, y);
                self.quadratic_to(q, p);
                next_control = LastControl::Quadratic(q);
            }
            PathSegment::EllipticalArc {
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                x,
                y,
            } => {
                self.ensure_subpath();
                let p = self.resolve(relative, x, y);
                self.arc_to(rx, ry, x_axis_rotation, large_arc, sweep, p);
            }
            PathSegment::ClosePath => {
                if self.open_subpath {
                    self.finish(true);
                }
                self.current = self.start;
            }
        }

        self.last_control = next_control;
    }

    fn line_to(&mut self, p: Vector2) {
        self.points.push(p);
        self.current = p;
    }

    fn cubic_to(&mut self, c1: Vector2, c2: Vector2, p: Vector2) {
        let p0 = self.current;
        flatten_cubic(
            p0,
            c1,
            c2,
            p,
            self.options.flatness,
            MAX_SUBDIVISION_DEPTH,
            &mut self.points,
        );
        self.current = p;
    }

    fn quadratic_to(&mut self, q: Vector2, p: Vector2) {
        // degree elevation to a cubic
        let p0 = self.current;
        let two_thirds = 2.0 / 3.0;
        let c1 = p0 + (q - p0).scale(two_thirds);
        let c2 = p + (q - p).scale(two_thirds);
        self.cubic_to(c1, c2, p);
    }

    fn arc_to(
        &mut self,
        rx: f64,
        ry: f64,
        x_axis_rotation: f64,
        large_arc: bool,
        sweep: bool,
        p: Vector2,
    ) {
        let p0 = self.current;
        if p0.fuzzy_eq_eps(p, self.options.pos_equal_eps) {
            return;
        }

        match arc_to_cubics(p0, rx, ry, x_axis_rotation, large_arc, sweep, p) {
            Some(cubics) => {
                for [c1, c2, end] in cubics {
                    self.cubic_to(c1, c2, end);
                }
            }
            None => self.line_to(p),
        }
        self.current = p;
    }

    /// Close off the sub-path in progress (if any) and push it to the result.
    fn finish(&mut self, explicit_close: bool) {
        if !self.open_subpath {
            return;
        }
        self.open_subpath = false;

        let index = self.subpath_index;
        self.subpath_index += 1;

        let eps = self.options.pos_equal_eps;
        let points = std::mem::take(&mut self.points);
        let mut polygon = Polygon::from_vertexes(points, false);
        let implicit_close = polygon.vertex_count() > 2
            && polygon[0].fuzzy_eq_eps(polygon[polygon.vertex_count() - 1], eps);
        polygon.set_is_closed(explicit_close || implicit_close);

        if let Some(cleaned) = polygon.remove_repeat_pos(eps) {
            polygon = cleaned;
        }

        if polygon.vertex_count() < 2 {
            self.result
                .issues
                .push(PathDataIssue::DegenerateSubPath { index });
            return;
        }

        self.result.polygons.push(polygon);
    }
}

#[inline]
fn reflect(control: Vector2, about: Vector2) -> Vector2 {
    about + (about - control)
}

/// Recursively subdivide the cubic `p0 c1 c2 p3` at `t = 0.5` until both control points are
/// within `flatness` of the chord, pushing every chord end point to `out`.
pub fn flatten_cubic(
    p0: Vector2,
    c1: Vector2,
    c2: Vector2,
    p3: Vector2,
    flatness: f64,
    depth: u32,
    out: &mut Vec<Vector2>,
) {
    let flat = line_distance(p0, p3, c1) <= flatness && line_distance(p0, p3, c2) <= flatness;
    if flat || depth == 0 {
        out.push(p3);
        return;
    }

    // de Casteljau split
    let p01 = midpoint(p0, c1);
    let p12 = midpoint(c1, c2);
    let p23 = midpoint(c2, p3);
    let p012 = midpoint(p01, p12);
    let p123 = midpoint(p12, p23);
    let mid = midpoint(p012, p123);

    flatten_cubic(p0, p01, p012, mid, flatness, depth - 1, out);
    flatten_cubic(mid, p123, p23, p3, flatness, depth - 1, out);
}

/// Convert an endpoint parameterized elliptical arc into cubic curves of at most 90 degrees each.
///
/// Returns `None` when either radius is zero (the arc degenerates to a straight line). Radii too
/// small to span the endpoints are scaled up.
pub fn arc_to_cubics(
    p0: Vector2,
    rx: f64,
    ry: f64,
    x_axis_rotation: f64,
    large_arc: bool,
    sweep: bool,
    p: Vector2,
) -> Option<Vec<[Vector2; 3]>> {
    use std::f64::consts::{FRAC_PI_2, TAU};

    let mut rx = rx.abs();
    let mut ry = ry.abs();
    if rx == 0.0 || ry == 0.0 {
        return None;
    }

    let phi = x_axis_rotation.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();

    let dx2 = (p0.x - p.x) / 2.0;
    let dy2 = (p0.y - p.y) / 2.0;
    let x1p = cos_phi * dx2 + sin_phi * dy2;
    let y1p = -sin_phi * dx2 + cos_phi * dy2;

    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let s = lambda.sqrt();
        rx *= s;
        ry *= s;
    }

    let rx2 = rx * rx;
    let ry2 = ry * ry;
    let num = rx2 * ry2 - rx2 * y1p * y1p - ry2 * x1p * x1p;
    let den = rx2 * y1p * y1p + ry2 * x1p * x1p;
    let mut coef = if den == 0.0 {
        0.0
    } else {
        (num / den).max(0.0).sqrt()
    };
    if large_arc == sweep {
        coef = -coef;
    }

    let cxp = coef * rx * y1p / ry;
    let cyp = -coef * ry * x1p / rx;
    let cx = cos_phi * cxp - sin_phi * cyp + (p0.x + p.x) / 2.0;
    let cy = sin_phi * cxp + cos_phi * cyp + (p0.y + p.y) / 2.0;

    let u = vec2((x1p - cxp) / rx, (y1p - cyp) / ry);
    let v = vec2((-x1p - cxp) / rx, (-y1p - cyp) / ry);
    let theta1 = u.y.atan2(u.x);
    let mut dtheta = u.perp_dot(v).atan2(u.dot(v));
    if !sweep && dtheta > 0.0 {
        dtheta -= TAU;
    } else if sweep && dtheta < 0.0 {
        dtheta += TAU;
    }

    let piece_count = ((dtheta.abs() / FRAC_PI_2).ceil() as usize).max(1);
    let delta = dtheta / piece_count as f64;
    let kappa = 4.0 / 3.0 * (delta / 4.0).tan();

    let map = |ux: f64, uy: f64| {
        vec2(
            cx + cos_phi * rx * ux - sin_phi * ry * uy,
            cy + sin_phi * rx * ux + cos_phi * ry * uy,
        )
    };

    let mut result = Vec::with_capacity(piece_count);
    for i in 0..piece_count {
        let a1 = theta1 + delta * i as f64;
        let a2 = a1 + delta;
        let (s1, c1) = a1.sin_cos();
        let (s2, c2) = a2.sin_cos();
        let ctrl1 = map(c1 - kappa * s1, s1 + kappa * c1);
        let ctrl2 = map(c2 + kappa * s2, s2 - kappa * c2);
        let end = if i + 1 == piece_count { p } else { map(c2, s2) };
        result.push([ctrl1, ctrl2, end]);
    }

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::*;

    fn decompose(text: &str) -> Decomposed {
        let (data, issues) = PathData::parse(text);
        assert!(issues.is_empty(), "{issues:?}");
        data.decompose(&FlattenOptions::new())
    }

    #[test]
    fn flat_cubic_is_single_chord() {
        let r = decompose("M 0 0 C 1 0 2 0 3 0");
        assert_eq!(r.polygons[0].vertex_count(), 2);
    }

    #[test]
    fn cubic_chords_stay_within_flatness() {
        let r = decompose("M 0 0 C 0 10 10 10 10 0");
        let pg = &r.polygons[0];
        assert!(pg.vertex_count() > 4);
        // the apex of this symmetric curve is at (5, 7.5)
        let top = pg
            .iter_vertexes()
            .map(|v| v.y)
            .fold(f64::MIN, f64::max);
        assert!((7.5 - top).abs() <= 0.1);
    }

    #[test]
    fn circle_from_arcs_has_expected_area() {
        let r = decompose("M 10 0 A 10 10 0 0 1 -10 0 A 10 10 0 0 1 10 0 Z");
        assert_eq!(r.polygons.len(), 1);
        let pg = &r.polygons[0];
        assert!(pg.is_closed());
        let expected = std::f64::consts::PI * 100.0;
        assert!((pg.area().abs() - expected).abs() / expected < 0.01);
    }

    #[test]
    fn tiny_arc_radii_are_scaled_up() {
        // radius 1 cannot span 10 units, arc becomes a half circle of radius 5
        let r = decompose("M 0 0 A 1 1 0 0 1 10 0");
        let pg = &r.polygons[0];
        let lowest = pg
            .iter_vertexes()
            .map(|v| v.y)
            .fold(f64::MAX, f64::min);
        let highest = pg
            .iter_vertexes()
            .map(|v| v.y)
            .fold(f64::MIN, f64::max);
        assert!(lowest.abs().max(highest.abs()) > 4.9);
        assert!(pg[pg.vertex_count() - 1].fuzzy_eq(vec2(10.0, 0.0)));
    }

    #[test]
    fn zero_radius_arc_is_line() {
        let r = decompose("M 0 0 A 0 5 0 0 1 10 0");
        assert_eq!(r.polygons[0].vertex_count(), 2);
    }

    #[test]
    fn implicit_close_by_coincident_end() {
        let r = decompose("M 0 0 L 10 0 L 10 10 L 0 0.00001");
        let pg = &r.polygons[0];
        assert!(pg.is_closed());
        assert_eq!(pg.vertex_count(), 3);
    }

    #[test]
    fn drawing_after_close_starts_at_subpath_start() {
        let r = decompose("M 5 5 l 10 0 l 0 10 z l -5 0 l 0 -5");
        assert_eq!(r.polygons.len(), 2);
        let second = &r.polygons[1];
        assert!(second[0].fuzzy_eq(vec2(5.0, 5.0)));
        assert!(second[1].fuzzy_eq(vec2(0.0, 5.0)));
        assert!(second[2].fuzzy_eq(vec2(0.0, 0.0)));
    }

    #[test]
    fn smooth_curves_reflect_controls() {
        let with_smooth = decompose("M 0 0 C 0 10 10 10 10 0 S 20 -10 20 0");
        let explicit = decompose("M 0 0 C 0 10 10 10 10 0 C 10 -10 20 -10 20 0");
        assert!(with_smooth.polygons[0].fuzzy_eq_eps(&explicit.polygons[0], 1e-9));

        let quad_smooth = decompose("M 0 0 Q 5 10 10 0 T 20 0");
        let quad_explicit = decompose("M 0 0 Q 5 10 10 0 Q 15 -10 20 0");
        assert!(quad_smooth.polygons[0].fuzzy_eq_eps(&quad_explicit.polygons[0], 1e-9));
    }

    #[test]
    fn missing_initial_move_starts_at_origin() {
        let (data, _) = PathData::parse("L 10 0 L 10 10");
        let r = data.decompose(&FlattenOptions::new());
        assert_eq!(r.issues, vec![PathDataIssue::NoInitialMove]);
        assert!(r.polygons[0][0].fuzzy_eq(Vector2::zero()));
    }

    #[test]
    fn lone_move_is_reported() {
        let r = decompose("M 1 1 M 0 0 L 1 0");
        assert_eq!(r.polygons.len(), 1);
        assert_eq!(r.issues, vec![PathDataIssue::DegenerateSubPath { index: 0 }]);
    }
}
