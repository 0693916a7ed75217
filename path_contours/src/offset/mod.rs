//! Polygon offsetting with square, round and miter joins and open path end caps.
//!
//! All sub-paths of one element are offset together: coordinates are moved onto an integer grid
//! (multiplied by [OffsetOptions::scale] and rounded), closed sub-paths are oriented by nesting
//! depth so holes shrink when outer contours grow, raw outlines are built per sub-path and then
//! merged by a positive winding union. Results are rounded to the grid and scaled back.
mod raw_outline;
mod winding_union;

pub use raw_outline::OutlineBuilder;
pub use winding_union::union_positive;

use crate::{
    core::{
        math::{line_winding, ring_area, Vector2},
        traits::Real,
    },
    polygon::Polygon,
};
use log::debug;
use std::{fmt, str::FromStr};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How moved edges meet at a convex corner.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "kebab-case")
)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum JoinType {
    #[cfg_attr(feature = "serde", serde(alias = "0"))]
    Square,
    #[cfg_attr(feature = "serde", serde(alias = "1"))]
    Round,
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "2"))]
    Miter,
}

/// How sub-paths are treated: closed variants offset areas or outlines, open variants choose the
/// cap at the free ends of open sub-paths.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "kebab-case")
)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum EndType {
    #[cfg_attr(feature = "serde", serde(alias = "0"))]
    ClosedPolygon,
    #[cfg_attr(feature = "serde", serde(alias = "1"))]
    ClosedLine,
    #[cfg_attr(feature = "serde", serde(alias = "2"))]
    OpenButt,
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "3"))]
    OpenSquare,
    #[cfg_attr(feature = "serde", serde(alias = "4"))]
    OpenRound,
}

impl EndType {
    #[inline]
    pub fn is_closed(self) -> bool {
        matches!(self, EndType::ClosedPolygon | EndType::ClosedLine)
    }
}

impl FromStr for JoinType {
    type Err = OffsetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "square" | "0" => Ok(JoinType::Square),
            "round" | "1" => Ok(JoinType::Round),
            "miter" | "2" => Ok(JoinType::Miter),
            _ => Err(OffsetError::UnknownJoinType(s.to_string())),
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JoinType::Square => "square",
            JoinType::Round => "round",
            JoinType::Miter => "miter",
        })
    }
}

impl FromStr for EndType {
    type Err = OffsetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "closed-polygon" | "closedpolygon" | "0" => Ok(EndType::ClosedPolygon),
            "closed-line" | "closedline" | "1" => Ok(EndType::ClosedLine),
            "open-butt" | "openbutt" | "2" => Ok(EndType::OpenButt),
            "open-square" | "opensquare" | "3" => Ok(EndType::OpenSquare),
            "open-round" | "openround" | "4" => Ok(EndType::OpenRound),
            _ => Err(OffsetError::UnknownEndType(s.to_string())),
        }
    }
}

impl fmt::Display for EndType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EndType::ClosedPolygon => "closed-polygon",
            EndType::ClosedLine => "closed-line",
            EndType::OpenButt => "open-butt",
            EndType::OpenSquare => "open-square",
            EndType::OpenRound => "open-round",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OffsetError {
    #[error("scale must be a positive power of two, got {0}")]
    InvalidScale(f64),
    #[error("miter limit must be a positive finite number, got {0}")]
    InvalidMiterLimit(f64),
    #[error("arc tolerance must be a positive finite number, got {0}")]
    InvalidArcTolerance(f64),
    #[error("position equal epsilon must be a positive finite number, got {0}")]
    InvalidEpsilon(f64),
    #[error("unknown join type '{0}' (expected square, round, miter or 0-2)")]
    UnknownJoinType(String),
    #[error("unknown end type '{0}' (expected closed-polygon, closed-line, open-butt, open-square, open-round or 0-4)")]
    UnknownEndType(String),
}

/// Options for offsetting.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Copy, Clone)]
pub struct OffsetOptions<T> {
    pub join_type: JoinType,
    pub end_type: EndType,
    /// Maximum miter length as a multiple of the offset distance before a miter join is squared
    /// off.
    pub miter_limit: T,
    /// Maximum distance (in grid units) between a round join/cap and its chords.
    pub arc_tolerance: T,
    /// Grid scale factor, a positive power of two.
    pub scale: T,
    /// Fuzzy comparison epsilon (in input units) used for determining if two positions are equal.
    pub pos_equal_eps: T,
}

impl<T> OffsetOptions<T>
where
    T: Real,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            join_type: JoinType::default(),
            end_type: EndType::default(),
            miter_limit: T::from(3.0).unwrap(),
            arc_tolerance: T::from(0.25).unwrap(),
            scale: T::from(1024.0).unwrap(),
            pos_equal_eps: T::from(1e-4).unwrap(),
        }
    }

    /// Check all numeric options.
    ///
    /// # Examples
    ///
    /// ```
    /// # use path_contours::offset::*;
    /// let mut options = OffsetOptions::<f64>::new();
    /// assert!(options.validate().is_ok());
    /// options.scale = 1000.0;
    /// assert_eq!(options.validate(), Err(OffsetError::InvalidScale(1000.0)));
    /// ```
    pub fn validate(&self) -> Result<(), OffsetError> {
        let as_f64 = |v: T| v.to_f64().unwrap_or(f64::NAN);
        let positive_finite = |v: T| v.to_f64().is_some_and(f64::is_finite) && v > T::zero();

        if !positive_finite(self.scale)
            || self.scale < T::one()
            || !self.scale.log2().fract().fuzzy_eq_zero()
        {
            return Err(OffsetError::InvalidScale(as_f64(self.scale)));
        }
        if !positive_finite(self.miter_limit) {
            return Err(OffsetError::InvalidMiterLimit(as_f64(self.miter_limit)));
        }
        if !positive_finite(self.arc_tolerance) {
            return Err(OffsetError::InvalidArcTolerance(as_f64(self.arc_tolerance)));
        }
        if !positive_finite(self.pos_equal_eps) {
            return Err(OffsetError::InvalidEpsilon(as_f64(self.pos_equal_eps)));
        }

        Ok(())
    }
}

impl<T> Default for OffsetOptions<T>
where
    T: Real,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// A series of offset distances: `d_i = initial + i * step + sign(increase) * (i * increase)^2`
/// for `i` in `0..count`.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OffsetSeries<T> {
    pub count: usize,
    pub initial: T,
    pub step: T,
    pub increase: T,
}

impl<T> OffsetSeries<T>
where
    T: Real,
{
    /// Single distance.
    #[inline]
    pub fn single(distance: T) -> Self {
        OffsetSeries {
            count: 1,
            initial: distance,
            step: T::zero(),
            increase: T::zero(),
        }
    }

    /// All distances, each computed in the series' unit and then multiplied by `unit_factor`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use path_contours::offset::*;
    /// let series = OffsetSeries { count: 3, initial: 1.0, step: 2.0, increase: -1.0 };
    /// assert_eq!(series.distances(1.0), vec![1.0, 2.0, 1.0]);
    /// assert_eq!(series.distances(2.0), vec![2.0, 4.0, 2.0]);
    /// ```
    pub fn distances(&self, unit_factor: T) -> Vec<T> {
        (0..self.count)
            .map(|i| {
                let i = T::from(i).unwrap_or_else(T::zero);
                let growth = i * self.increase;
                let growth = if self.increase < T::zero() {
                    -(growth * growth)
                } else {
                    growth * growth
                };
                (self.initial + i * self.step + growth) * unit_factor
            })
            .collect()
    }
}

/// Sub-path prepared for offsetting, in grid coordinates.
#[derive(Debug, Clone)]
enum GridPath<T> {
    /// Closed sub-path offset as an area.
    Area(Vec<Vector2<T>>),
    /// Closed sub-path offset on both sides of its outline.
    Line(Vec<Vector2<T>>),
    /// Open sub-path with end caps.
    Open(Vec<Vector2<T>>),
    /// Single point open sub-path.
    Point(Vector2<T>),
}

fn to_grid<T>(polygon: &Polygon<T>, options: &OffsetOptions<T>) -> Option<GridPath<T>>
where
    T: Real,
{
    let eps = T::fuzzy_epsilon();
    let mut pts: Vec<Vector2<T>> = Vec::with_capacity(polygon.vertex_count());
    for v in polygon.iter_vertexes() {
        let g = v.scale(options.scale).round();
        if !pts.last().is_some_and(|last| last.fuzzy_eq_eps(g, eps)) {
            pts.push(g);
        }
    }

    let closed_mode = polygon.is_closed() || options.end_type.is_closed();
    if closed_mode && pts.len() > 1 && pts[0].fuzzy_eq_eps(pts[pts.len() - 1], eps) {
        pts.pop();
    }

    match pts.len() {
        0 => None,
        1 if !closed_mode => Some(GridPath::Point(pts[0])),
        1 => None,
        _ if closed_mode && options.end_type == EndType::ClosedLine => Some(GridPath::Line(pts)),
        2 if closed_mode => None,
        _ if closed_mode => Some(GridPath::Area(pts)),
        _ => Some(GridPath::Open(pts)),
    }
}

fn ring_winding<T>(ring: &[Vector2<T>], point: Vector2<T>) -> i32
where
    T: Real,
{
    let n = ring.len();
    (0..n)
        .map(|i| line_winding(ring[i], ring[(i + 1) % n], point))
        .sum()
}

/// Orient area rings by nesting depth: even depth counter clockwise, odd depth clockwise.
fn normalize_orientation<T>(rings: &mut [Vec<Vector2<T>>])
where
    T: Real,
{
    let depths: Vec<usize> = (0..rings.len())
        .map(|i| {
            let probe = rings[i][0];
            rings
                .iter()
                .enumerate()
                .filter(|&(j, other)| j != i && ring_winding(other, probe) != 0)
                .count()
        })
        .collect();

    for (ring, depth) in rings.iter_mut().zip(depths) {
        let is_ccw = ring_area(ring) > T::zero();
        if is_ccw != (depth % 2 == 0) {
            ring.reverse();
        }
    }
}

/// Round a grid loop, drop repeated and collinear vertexes and scale it back. Loops left with
/// fewer than 3 vertexes or under one grid cell of area are dropped.
fn finish_grid_loop<T>(points: &[Vector2<T>], scale: T) -> Option<Polygon<T>>
where
    T: Real,
{
    let collinear = |a: Vector2<T>, b: Vector2<T>, c: Vector2<T>| {
        (b - a).perp_dot(c - b).fuzzy_eq_zero()
    };

    let mut out: Vec<Vector2<T>> = Vec::with_capacity(points.len());
    for p in points.iter().map(|p| p.round()) {
        while out.len() >= 2 && collinear(out[out.len() - 2], out[out.len() - 1], p) {
            out.pop();
        }
        if out.last() != Some(&p) {
            out.push(p);
        }
    }

    loop {
        let n = out.len();
        if n < 3 {
            return None;
        }
        if out[n - 1] == out[0] || collinear(out[n - 2], out[n - 1], out[0]) {
            out.pop();
        } else if collinear(out[n - 1], out[0], out[1]) {
            out.remove(0);
        } else {
            break;
        }
    }

    if ring_area(&out).abs() < T::one() {
        return None;
    }

    let inv_scale = T::one() / scale;
    Some(Polygon::from_vertexes(
        out.into_iter().map(|v| v.scale(inv_scale)),
        true,
    ))
}

/// Offset all sub-paths of one path by `delta` (negative shrinks closed areas).
///
/// Closed results only. Over-erosion returns an empty list. `delta == 0` returns the closed
/// area sub-paths grid rounded and otherwise unchanged, open sub-paths and closed line outlines
/// produce nothing for `delta <= 0`.
///
/// # Examples
///
/// ```
/// # use path_contours::{offset::*, polygon_closed};
/// # use path_contours::core::traits::*;
/// let square = polygon_closed![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
/// let mut options = OffsetOptions::new();
/// options.join_type = JoinType::Square;
/// let result = offset_path(&[square], 1.0, &options).unwrap();
/// assert_eq!(result.len(), 1);
/// assert!(result[0].area().fuzzy_eq(144.0));
/// ```
pub fn offset_path<T>(
    sub_paths: &[Polygon<T>],
    delta: T,
    options: &OffsetOptions<T>,
) -> Result<Vec<Polygon<T>>, OffsetError>
where
    T: Real,
{
    options.validate()?;

    let scale = options.scale;
    let grid_paths: Vec<GridPath<T>> = sub_paths
        .iter()
        .filter_map(|pg| to_grid(pg, options))
        .collect();

    if delta.fuzzy_eq_zero() {
        let inv_scale = T::one() / scale;
        return Ok(grid_paths
            .into_iter()
            .filter_map(|gp| match gp {
                GridPath::Area(ring) => Some(Polygon::from_vertexes(
                    ring.into_iter().map(|v| v.scale(inv_scale)),
                    true,
                )),
                _ => None,
            })
            .collect());
    }

    let mut area_rings = Vec::new();
    let mut others = Vec::new();
    for gp in grid_paths {
        match gp {
            GridPath::Area(ring) => area_rings.push(ring),
            other => others.push(other),
        }
    }
    normalize_orientation(&mut area_rings);

    let grid_delta = delta * scale;
    let builder = OutlineBuilder::new(
        grid_delta,
        options.join_type,
        options.miter_limit,
        options.arc_tolerance,
    );

    let mut outlines: Vec<Vec<Vector2<T>>> = area_rings
        .iter()
        .map(|ring| builder.closed_ring(ring))
        .collect();

    if grid_delta > T::zero() {
        for gp in &others {
            match gp {
                GridPath::Line(ring) => {
                    outlines.push(builder.closed_ring(ring));
                    let reversed: Vec<Vector2<T>> = ring.iter().rev().copied().collect();
                    outlines.push(builder.closed_ring(&reversed));
                }
                GridPath::Open(pts) => outlines.push(builder.open_path(pts, options.end_type)),
                GridPath::Point(p) => outlines.push(builder.point(*p)),
                GridPath::Area(_) => {}
            }
        }
    }

    debug!(
        "offset {:?}: {} raw outlines from {} sub-paths",
        delta,
        outlines.len(),
        sub_paths.len()
    );

    let loops = union_positive(&outlines, options.pos_equal_eps * scale);
    Ok(loops
        .iter()
        .filter_map(|l| finish_grid_loop(l, scale))
        .collect())
}

/// Offset a path by every distance of `series` (scaled by `unit_factor`). Result polygons equal
/// to one already produced by an earlier distance are emitted once.
pub fn offset_series<T>(
    sub_paths: &[Polygon<T>],
    series: &OffsetSeries<T>,
    unit_factor: T,
    options: &OffsetOptions<T>,
) -> Result<Vec<Polygon<T>>, OffsetError>
where
    T: Real,
{
    let mut result: Vec<Polygon<T>> = Vec::new();
    for distance in series.distances(unit_factor) {
        for pg in offset_path(sub_paths, distance, options)? {
            if !result.contains(&pg) {
                result.push(pg);
            }
        }
    }

    Ok(result)
}
