//! Destructive clipping: cut target paths at a closed clip region and keep what lies inside.
//!
//! Target segments are split at every crossing with the region boundary and each piece is kept
//! when its midpoint is inside the region. Points on the boundary (within `pos_equal_eps`) count
//! as inside, so clipping a shape by itself leaves it unchanged.
use crate::{
    core::{
        math::{line_line_intr, line_seg_distance, LineLineIntr, Vector2},
        traits::Real,
    },
    polygon::{build_segment_index, ray_crosses, Polygon, Segment},
};
use log::debug;
use static_aabb2d_index::{StaticAABB2DIndex, AABB};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Error building a [ClipRegion].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipError {
    #[error("clip path sub-path {index} is open, a clip region must be closed")]
    OpenClipPath { index: usize },
    #[error("clip region has no segments")]
    EmptyClipRegion,
}

/// Options for clipping.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Copy, Clone)]
pub struct ClipOptions<T> {
    /// Fuzzy comparison epsilon used for determining if two positions are equal. Also the
    /// boundary distance within which a point counts as inside and the shortest piece kept.
    pub pos_equal_eps: T,
}

impl<T> ClipOptions<T>
where
    T: Real,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            pos_equal_eps: T::from(1e-4).unwrap(),
        }
    }
}

impl<T> Default for ClipOptions<T>
where
    T: Real,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Closed region built from one or more closed sub-paths, evaluated with the even-odd rule.
#[derive(Debug, Clone)]
pub struct ClipRegion<T = f64>
where
    T: Real,
{
    segments: Vec<Segment<T>>,
    aabb_index: StaticAABB2DIndex<T>,
    extents: AABB<T>,
    pos_equal_eps: T,
}

/// Result of clipping one target sub-path.
#[derive(Debug, Clone)]
pub struct ClippedSubPath<T = f64> {
    /// Kept pieces in target order.
    pub pieces: Vec<Segment<T>>,
    /// Target sub-path was closed and every piece was kept.
    pub unbroken_closed: bool,
    source: Polygon<T>,
}

impl<T> ClipRegion<T>
where
    T: Real,
{
    /// Build a clip region from the sub-paths of the clip shape.
    ///
    /// # Examples
    ///
    /// ```
    /// # use path_contours::{clip::*, polygon_closed, polygon_open};
    /// # use path_contours::core::math::Vector2;
    /// let square = polygon_closed![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
    /// let region = ClipRegion::new(&[square], &ClipOptions::new()).unwrap();
    /// assert!(region.contains_point(Vector2::new(5.0, 5.0)));
    /// assert!(region.contains_point(Vector2::new(10.0, 5.0)));
    /// assert!(!region.contains_point(Vector2::new(11.0, 5.0)));
    ///
    /// let line = polygon_open![(0.0, 0.0), (10.0, 0.0)];
    /// assert_eq!(
    ///     ClipRegion::new(&[line], &ClipOptions::new()).unwrap_err(),
    ///     ClipError::OpenClipPath { index: 0 }
    /// );
    /// ```
    pub fn new(sub_paths: &[Polygon<T>], options: &ClipOptions<T>) -> Result<Self, ClipError> {
        let eps = options.pos_equal_eps;
        if let Some(index) = sub_paths.iter().position(|pg| !pg.is_closed()) {
            return Err(ClipError::OpenClipPath { index });
        }

        let segments: Vec<Segment<T>> = sub_paths
            .iter()
            .flat_map(|pg| pg.iter_segments())
            .filter(|seg| seg.length() > eps)
            .collect();

        if segments.is_empty() {
            return Err(ClipError::EmptyClipRegion);
        }

        let mut extents = segments[0].bounding_box();
        for seg in &segments[1..] {
            let bb = seg.bounding_box();
            extents.min_x = num_traits::real::Real::min(extents.min_x, bb.min_x);
            extents.min_y = num_traits::real::Real::min(extents.min_y, bb.min_y);
            extents.max_x = num_traits::real::Real::max(extents.max_x, bb.max_x);
            extents.max_y = num_traits::real::Real::max(extents.max_y, bb.max_y);
        }

        let aabb_index = build_segment_index(&segments, eps);
        debug!("built clip region with {} segments", segments.len());

        Ok(ClipRegion {
            segments,
            aabb_index,
            extents,
            pos_equal_eps: eps,
        })
    }

    #[inline]
    pub fn segments(&self) -> &[Segment<T>] {
        &self.segments
    }

    #[inline]
    pub fn extents(&self) -> AABB<T> {
        self.extents
    }

    /// True if `point` is within `pos_equal_eps` of any region segment.
    pub fn on_boundary(&self, point: Vector2<T>) -> bool {
        let eps = self.pos_equal_eps;
        let mut hit = false;
        let mut visitor = |i: usize| {
            let seg = &self.segments[i];
            if line_seg_distance(seg.start, seg.end, point) <= eps {
                hit = true;
                static_aabb2d_index::Control::Break(())
            } else {
                static_aabb2d_index::Control::Continue
            }
        };
        self.aabb_index
            .visit_query(point.x, point.y, point.x, point.y, &mut visitor);
        hit
    }

    /// Boundary counts as inside, otherwise even-odd count of a horizontal ray toward +x.
    pub fn contains_point(&self, point: Vector2<T>) -> bool {
        if self.on_boundary(point) {
            return true;
        }

        if point.x > self.extents.max_x
            || point.y < self.extents.min_y
            || point.y > self.extents.max_y
        {
            return false;
        }

        let mut crossings = 0usize;
        let mut visitor = |i: usize| {
            if ray_crosses(&self.segments[i], point) {
                crossings += 1;
            }
        };
        self.aabb_index.visit_query(
            point.x,
            point.y,
            self.extents.max_x,
            point.y,
            &mut visitor,
        );

        crossings % 2 == 1
    }

    /// Split `segment` at every true crossing with the region boundary. Pieces are returned in
    /// order from the segment start, pieces shorter than `pos_equal_eps` are dropped.
    pub fn split_segment(&self, segment: &Segment<T>) -> Vec<Segment<T>> {
        let eps = self.pos_equal_eps;
        let length = segment.length();
        if length <= eps {
            return Vec::new();
        }

        let bb = segment.bounding_box();
        let mut split_ts = Vec::new();
        let mut visitor = |i: usize| {
            let clip_seg = &self.segments[i];
            if let LineLineIntr::TrueIntersect { seg1_t, .. } = line_line_intr(
                segment.start,
                segment.end,
                clip_seg.start,
                clip_seg.end,
                eps,
            ) {
                let dist = seg1_t * length;
                if dist > eps && dist < length - eps {
                    split_ts.push(seg1_t);
                }
            }
        };
        self.aabb_index
            .visit_query(bb.min_x, bb.min_y, bb.max_x, bb.max_y, &mut visitor);

        split_ts.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mut pieces = Vec::with_capacity(split_ts.len() + 1);
        let mut piece_start = segment.start;
        for t in split_ts {
            let p = segment.point_at(t);
            if (p - piece_start).length() > eps {
                pieces.push(Segment::new(piece_start, p));
                piece_start = p;
            }
        }

        if (segment.end - piece_start).length() > eps {
            pieces.push(Segment::new(piece_start, segment.end));
        } else if let Some(last) = pieces.last_mut() {
            last.end = segment.end;
        }

        pieces
    }

    /// Pieces of `segment` inside the region.
    pub fn clip_segment(&self, segment: &Segment<T>) -> Vec<Segment<T>> {
        self.split_segment(segment)
            .into_iter()
            .filter(|piece| self.contains_point(piece.midpoint()))
            .collect()
    }

    /// Clip one target sub-path.
    pub fn clip_polygon(&self, polygon: &Polygon<T>) -> ClippedSubPath<T> {
        let mut pieces = Vec::new();
        let mut all_kept = true;
        for seg in polygon.iter_segments() {
            for piece in self.split_segment(&seg) {
                if self.contains_point(piece.midpoint()) {
                    pieces.push(piece);
                } else {
                    all_kept = false;
                }
            }
        }

        ClippedSubPath {
            unbroken_closed: polygon.is_closed() && all_kept && !pieces.is_empty(),
            pieces,
            source: polygon.clone(),
        }
    }

    /// Clip every sub-path of a target path.
    pub fn clip_path(&self, sub_paths: &[Polygon<T>]) -> Vec<ClippedSubPath<T>> {
        sub_paths.iter().map(|pg| self.clip_polygon(pg)).collect()
    }
}

impl<T> ClippedSubPath<T>
where
    T: Real,
{
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Chain the kept pieces into polygons.
    ///
    /// Contiguous pieces (end within `pos_equal_eps` of the next start) join into one open
    /// polygon. An unbroken closed sub-path is returned closed and unchanged. When a closed
    /// sub-path was broken, the chain running through its first vertex is joined back together.
    pub fn to_polygons(&self, pos_equal_eps: T) -> Vec<Polygon<T>> {
        if self.unbroken_closed {
            return vec![self.source.clone()];
        }

        let mut chains: Vec<Polygon<T>> = Vec::new();
        for piece in &self.pieces {
            match chains.last_mut() {
                Some(chain)
                    if chain
                        .last()
                        .is_some_and(|end| end.fuzzy_eq_eps(piece.start, pos_equal_eps)) =>
                {
                    chain.add_vertex(piece.end);
                }
                _ => {
                    let mut chain = Polygon::with_capacity(2, false);
                    chain.add_vertex(piece.start);
                    chain.add_vertex(piece.end);
                    chains.push(chain);
                }
            }
        }

        if self.source.is_closed() && chains.len() > 1 {
            let first_start = chains[0][0];
            let wraps = chains
                .last()
                .and_then(|c| c.last())
                .is_some_and(|end| end.fuzzy_eq_eps(first_start, pos_equal_eps));
            if wraps {
                if let Some(mut tail) = chains.pop() {
                    tail.vertex_data
                        .extend(chains[0].vertex_data.iter().skip(1).copied());
                    chains[0] = tail;
                }
            }
        }

        chains
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::vec2;

    fn square(min: f64, max: f64) -> Polygon<f64> {
        polygon_closed![(min, min), (max, min), (max, max), (min, max)]
    }

    #[test]
    fn segment_crossing_region_is_trimmed() {
        let region = ClipRegion::new(&[square(0.0, 10.0)], &ClipOptions::new()).unwrap();
        let kept = region.clip_segment(&Segment::new(vec2(-5.0, 5.0), vec2(15.0, 5.0)));
        assert_eq!(kept.len(), 1);
        assert!(kept[0].start.fuzzy_eq(vec2(0.0, 5.0)));
        assert!(kept[0].end.fuzzy_eq(vec2(10.0, 5.0)));
    }

    #[test]
    fn ring_region_is_even_odd() {
        let region = ClipRegion::new(
            &[square(0.0, 10.0), square(3.0, 7.0)],
            &ClipOptions::new(),
        )
        .unwrap();
        assert!(region.contains_point(vec2(1.0, 5.0)));
        assert!(!region.contains_point(vec2(5.0, 5.0)));
        // hole boundary is still boundary
        assert!(region.contains_point(vec2(3.0, 5.0)));
    }

    #[test]
    fn ray_through_vertex_counts_once() {
        let diamond = polygon_closed![(0.0, -5.0), (5.0, 0.0), (0.0, 5.0), (-5.0, 0.0)];
        let region = ClipRegion::new(&[diamond], &ClipOptions::new()).unwrap();
        assert!(region.contains_point(vec2(0.0, 0.0)));
        assert!(!region.contains_point(vec2(-6.0, 0.0)));
    }

    #[test]
    fn broken_closed_target_rejoins_through_start() {
        // target square straddles the right side of the region, its start vertex is inside
        let region = ClipRegion::new(&[square(0.0, 10.0)], &ClipOptions::new()).unwrap();
        let target = polygon_closed![(5.0, 5.0), (5.0, 2.0), (15.0, 2.0), (15.0, 8.0), (5.0, 8.0)];
        let clipped = region.clip_polygon(&target);
        assert!(!clipped.unbroken_closed);
        let polygons = clipped.to_polygons(1e-4);
        assert_eq!(polygons.len(), 1);
        let pg = &polygons[0];
        assert!(!pg.is_closed());
        assert!(pg[0].fuzzy_eq(vec2(10.0, 8.0)));
        assert!(pg[pg.vertex_count() - 1].fuzzy_eq(vec2(10.0, 2.0)));
    }

    #[test]
    fn empty_region_is_error() {
        let degenerate = polygon_closed![(1.0, 1.0), (1.0, 1.0)];
        assert_eq!(
            ClipRegion::new(&[degenerate], &ClipOptions::new()).unwrap_err(),
            ClipError::EmptyClipRegion
        );
    }
}
