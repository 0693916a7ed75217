//! Union of raw offset outlines by the positive fill rule.
//!
//! All outline edges are cut at every mutual intersection. Each resulting piece is classified
//! by sampling the winding number just left and right of its midpoint: pieces with positive
//! winding on exactly one side bound the filled region and are kept, oriented so the filled
//! side is on the left. Kept pieces are then stitched end to start into closed loops.
use crate::{
    core::{
        math::{
            line_line_intr, line_seg_distance, line_winding, parametric_from_point, LineLineIntr,
            Vector2,
        },
        traits::Real,
    },
    polygon::{build_segment_index, unwrap_spatial_index, Segment},
};
use log::debug;
use static_aabb2d_index::{StaticAABB2DIndex, StaticAABB2DIndexBuilder};

/// Union all `loops` (closed, implicitly joined last to first) by positive winding and return
/// the boundary loops. `eps` is the position equality epsilon in the loops' coordinate space.
pub fn union_positive<T>(loops: &[Vec<Vector2<T>>], eps: T) -> Vec<Vec<Vector2<T>>>
where
    T: Real,
{
    let edges = collect_edges(loops, eps);
    if edges.is_empty() {
        return Vec::new();
    }

    let edge_index = build_segment_index(&edges, eps);
    let splits = find_split_points(&edges, &edge_index, eps);
    let pieces = split_edges(&edges, &splits, eps);
    let boundary = classify_pieces(&edges, &edge_index, pieces, eps);
    let boundary = remove_duplicate_pieces(boundary, eps);
    debug!(
        "winding union: {} edges, {} boundary pieces",
        edges.len(),
        boundary.len()
    );

    stitch_pieces_together(&boundary, eps)
}

fn collect_edges<T>(loops: &[Vec<Vector2<T>>], eps: T) -> Vec<Segment<T>>
where
    T: Real,
{
    let mut edges = Vec::new();
    for pts in loops {
        let n = pts.len();
        if n < 3 {
            continue;
        }
        for i in 0..n {
            let j = if i + 1 == n { 0 } else { i + 1 };
            let seg = Segment::new(pts[i], pts[j]);
            if seg.length() > eps {
                edges.push(seg);
            }
        }
    }

    edges
}

/// Parametric split values for every edge from all its true intersects and overlaps.
fn find_split_points<T>(
    edges: &[Segment<T>],
    edge_index: &StaticAABB2DIndex<T>,
    eps: T,
) -> Vec<Vec<T>>
where
    T: Real,
{
    let mut splits: Vec<Vec<T>> = vec![Vec::new(); edges.len()];
    let mut query_stack = Vec::with_capacity(8);
    let mut candidates = Vec::new();

    for (i, e1) in edges.iter().enumerate() {
        let bb = e1.bounding_box();
        candidates.clear();
        let mut visitor = |j: usize| {
            if j > i {
                candidates.push(j);
            }
        };
        edge_index.visit_query_with_stack(
            bb.min_x - eps,
            bb.min_y - eps,
            bb.max_x + eps,
            bb.max_y + eps,
            &mut visitor,
            &mut query_stack,
        );

        for &j in candidates.iter() {
            let e2 = &edges[j];
            match line_line_intr(e1.start, e1.end, e2.start, e2.end, eps) {
                LineLineIntr::TrueIntersect { seg1_t, seg2_t } => {
                    splits[i].push(seg1_t);
                    splits[j].push(seg2_t);
                }
                LineLineIntr::Overlapping { seg2_t0, seg2_t1 } => {
                    for t2 in [seg2_t0, seg2_t1] {
                        let p = e2.point_at(t2);
                        splits[j].push(t2);
                        splits[i].push(parametric_from_point(e1.start, e1.end, p, eps));
                    }
                }
                LineLineIntr::NoIntersect | LineLineIntr::FalseIntersect { .. } => {}
            }
        }
    }

    splits
}

/// Cut every edge at its split values, dropping pieces no longer than `eps`.
fn split_edges<T>(edges: &[Segment<T>], splits: &[Vec<T>], eps: T) -> Vec<Segment<T>>
where
    T: Real,
{
    let mut pieces = Vec::with_capacity(edges.len());
    for (edge, ts) in edges.iter().zip(splits) {
        let length = edge.length();
        let mut ts: Vec<T> = ts
            .iter()
            .copied()
            .filter(|&t| {
                let dist = t * length;
                dist > eps && dist < length - eps
            })
            .collect();
        ts.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mut start = edge.start;
        for t in ts {
            let p = edge.point_at(t);
            if (p - start).length() > eps {
                pieces.push(Segment::new(start, p));
                start = p;
            }
        }

        if (edge.end - start).length() > eps {
            pieces.push(Segment::new(start, edge.end));
        } else if let Some(last) = pieces.last_mut() {
            last.end = edge.end;
        }
    }

    pieces
}

fn winding_number_at<T>(
    edges: &[Segment<T>],
    edge_index: &StaticAABB2DIndex<T>,
    max_x: T,
    point: Vector2<T>,
    query_stack: &mut Vec<usize>,
) -> i32
where
    T: Real,
{
    if point.x > max_x {
        return 0;
    }

    let mut winding = 0;
    let mut visitor = |i: usize| {
        let e = &edges[i];
        winding += line_winding(e.start, e.end, point);
    };
    edge_index.visit_query_with_stack(point.x, point.y, max_x, point.y, &mut visitor, query_stack);
    winding
}

/// Keep pieces separating positive winding from non-positive winding, filled side on the left.
///
/// Winding is sampled a short distance to each side of a piece's midpoint. The distance stays
/// under half the gap to the nearest edge not running through the midpoint, so outline edges
/// packed closer than a grid unit (cusps, caps leaving tangent to an edge) are still told apart.
fn classify_pieces<T>(
    edges: &[Segment<T>],
    edge_index: &StaticAABB2DIndex<T>,
    pieces: Vec<Segment<T>>,
    eps: T,
) -> Vec<Segment<T>>
where
    T: Real,
{
    let max_x = edges.iter().fold(edges[0].start.x, |acc, e| {
        num_traits::real::Real::max(acc, num_traits::real::Real::max(e.start.x, e.end.x))
    });
    let mut query_stack = Vec::with_capacity(8);
    let quarter = T::one() / T::four();
    let coincident = eps * T::from(1e-6).unwrap_or_else(T::zero);

    pieces
        .into_iter()
        .filter_map(|piece| {
            let length = piece.length();
            let dir = (piece.end - piece.start).scale(T::one() / length);
            let left = dir.perp();
            let mid = piece.midpoint();
            let reach = num_traits::real::Real::min(length * quarter, T::one());

            let mut nearest = reach + reach;
            let mut visitor = |i: usize| {
                let e = &edges[i];
                let dist = line_seg_distance(e.start, e.end, mid);
                if dist > coincident && dist < nearest {
                    nearest = dist;
                }
            };
            edge_index.visit_query_with_stack(
                mid.x - reach - reach,
                mid.y - reach - reach,
                mid.x + reach + reach,
                mid.y + reach + reach,
                &mut visitor,
                &mut query_stack,
            );
            let h = num_traits::real::Real::min(reach, nearest * T::half());

            let wl = winding_number_at(edges, edge_index, max_x, mid + left.scale(h), &mut query_stack);
            let wr = winding_number_at(edges, edge_index, max_x, mid - left.scale(h), &mut query_stack);
            match (wl > 0, wr > 0) {
                (true, false) => Some(piece),
                (false, true) => Some(piece.reversed()),
                _ => None,
            }
        })
        .collect()
}

fn start_point_index<T>(pieces: &[Segment<T>], eps: T) -> StaticAABB2DIndex<T>
where
    T: Real,
{
    let mut builder = StaticAABB2DIndexBuilder::new(pieces.len());
    for piece in pieces {
        let p = piece.start;
        builder.add(p.x - eps, p.y - eps, p.x + eps, p.y + eps);
    }

    unwrap_spatial_index(builder)
}

/// Coincident boundary pieces (from overlapping outline edges) are kept once.
fn remove_duplicate_pieces<T>(pieces: Vec<Segment<T>>, eps: T) -> Vec<Segment<T>>
where
    T: Real,
{
    if pieces.len() < 2 {
        return pieces;
    }

    let index = start_point_index(&pieces, eps);
    let mut removed = vec![false; pieces.len()];
    let mut query_stack = Vec::with_capacity(8);
    for i in 0..pieces.len() {
        if removed[i] {
            continue;
        }
        let p = pieces[i];
        let mut visitor = |j: usize| {
            if j > i && !removed[j] && pieces[j].fuzzy_eq_eps(&p, eps) {
                removed[j] = true;
            }
        };
        index.visit_query_with_stack(
            p.start.x,
            p.start.y,
            p.start.x,
            p.start.y,
            &mut visitor,
            &mut query_stack,
        );
    }

    pieces
        .into_iter()
        .zip(removed)
        .filter_map(|(p, r)| (!r).then_some(p))
        .collect()
}

/// Join boundary pieces end to start into closed loops. Where several pieces start at the same
/// point the one turning furthest left is taken so touching loops stay separate.
fn stitch_pieces_together<T>(pieces: &[Segment<T>], eps: T) -> Vec<Vec<Vector2<T>>>
where
    T: Real,
{
    let mut result = Vec::new();
    if pieces.is_empty() {
        return result;
    }

    let index = start_point_index(pieces, eps);
    let mut visited = vec![false; pieces.len()];
    let mut query_results = Vec::new();
    let mut query_stack = Vec::with_capacity(8);

    for i in 0..pieces.len() {
        if visited[i] {
            continue;
        }
        visited[i] = true;

        let initial_start = pieces[i].start;
        let mut current = i;
        let mut loop_points = vec![initial_start];
        let mut closed = false;
        let max_loop_count = pieces.len();
        for _ in 0..=max_loop_count {
            let piece = pieces[current];
            let end = piece.end;
            if end.fuzzy_eq_eps(initial_start, eps) {
                closed = true;
                break;
            }
            loop_points.push(end);

            query_results.clear();
            let mut visitor = |j: usize| {
                if !visited[j] {
                    query_results.push(j);
                }
            };
            index.visit_query_with_stack(
                end.x,
                end.y,
                end.x,
                end.y,
                &mut visitor,
                &mut query_stack,
            );

            let incoming = piece.end - piece.start;
            let next = query_results.iter().copied().max_by(|&a, &b| {
                let ta = turn_angle(incoming, pieces[a].end - pieces[a].start);
                let tb = turn_angle(incoming, pieces[b].end - pieces[b].start);
                ta.partial_cmp(&tb).unwrap_or(std::cmp::Ordering::Equal)
            });

            match next {
                Some(j) => {
                    visited[j] = true;
                    current = j;
                }
                None => break,
            }
        }

        if closed {
            result.push(loop_points);
        } else {
            debug!(
                "discarding unclosed boundary chain of {} points",
                loop_points.len()
            );
        }
    }

    result
}

#[inline]
fn turn_angle<T>(incoming: Vector2<T>, outgoing: Vector2<T>) -> T
where
    T: Real,
{
    incoming.perp_dot(outgoing).atan2(incoming.dot(outgoing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::{ring_area, vec2};

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Vector2<f64>> {
        vec![vec2(x0, y0), vec2(x1, y0), vec2(x1, y1), vec2(x0, y1)]
    }

    #[test]
    fn overlapping_rects_merge() {
        let loops = vec![rect(0.0, 0.0, 10.0, 10.0), rect(5.0, 5.0, 15.0, 15.0)];
        let result = union_positive(&loops, 1e-6);
        assert_eq!(result.len(), 1);
        assert!((ring_area(&result[0]) - 175.0).abs() < 1e-6);
    }

    #[test]
    fn clockwise_loop_alone_is_empty() {
        let mut cw = rect(0.0, 0.0, 10.0, 10.0);
        cw.reverse();
        assert!(union_positive(&[cw], 1e-6).is_empty());
    }

    #[test]
    fn hole_stays_hole() {
        let mut hole = rect(3.0, 3.0, 7.0, 7.0);
        hole.reverse();
        let result = union_positive(&[rect(0.0, 0.0, 10.0, 10.0), hole], 1e-6);
        assert_eq!(result.len(), 2);
        let total: f64 = result.iter().map(|l| ring_area(l)).sum();
        assert!((total - 84.0).abs() < 1e-6);
    }

    #[test]
    fn shared_edge_rects_merge() {
        let loops = vec![rect(0.0, 0.0, 10.0, 10.0), rect(10.0, 0.0, 20.0, 10.0)];
        let result = union_positive(&loops, 1e-6);
        assert_eq!(result.len(), 1);
        assert!((ring_area(&result[0]) - 200.0).abs() < 1e-6);
    }

    #[test]
    fn corner_touching_rects_stay_separate() {
        let loops = vec![rect(0.0, 0.0, 10.0, 10.0), rect(10.0, 10.0, 20.0, 20.0)];
        let result = union_positive(&loops, 1e-6);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn edges_closer_than_a_grid_unit_are_told_apart() {
        let loops = vec![rect(0.0, 0.0, 100.0, 10.0), rect(0.0, 0.5, 100.0, 10.5)];
        let result = union_positive(&loops, 1e-6);
        assert_eq!(result.len(), 1);
        assert!((ring_area(&result[0]) - 1050.0).abs() < 1e-6);
    }
}
