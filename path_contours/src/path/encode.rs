//! Encoding polygons and segments back into path data.
use super::{PathCommand, PathData, PathSegment};
use crate::{
    core::math::Vector2,
    polygon::{Polygon, Segment},
};
use std::fmt;

/// Format a coordinate with at most 6 decimals, trailing zeros trimmed and negative zero written
/// as `0`.
///
/// # Examples
///
/// ```
/// # use path_contours::path::encode::format_number;
/// assert_eq!(format_number(1.5), "1.5");
/// assert_eq!(format_number(2.0), "2");
/// assert_eq!(format_number(-0.0000001), "0");
/// assert_eq!(format_number(1.0 / 3.0), "0.333333");
/// ```
pub fn format_number(value: f64) -> String {
    let mut s = format!("{value:.6}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }

    if s == "-0" {
        s = "0".to_string();
    }

    s
}

/// Encode polygons as path data: a move to the first vertex, lines to the rest and a close for
/// closed polygons.
pub fn polygons_to_path_data<'a, I>(polygons: I) -> PathData
where
    I: IntoIterator<Item = &'a Polygon<f64>>,
{
    let mut data = PathData::new();
    for pg in polygons {
        let mut vertexes = pg.iter_vertexes();
        let Some(first) = vertexes.next() else {
            continue;
        };
        data.move_to(first);
        for v in vertexes {
            data.line_to(v);
        }
        if pg.is_closed() {
            data.close();
        }
    }

    data
}

/// Encode segments as path data, starting a new sub-path whenever a segment does not start
/// within `pos_equal_eps` of the previous segment's end.
///
/// # Examples
///
/// ```
/// # use path_contours::path::encode::segments_to_path_data;
/// # use path_contours::polygon::Segment;
/// # use path_contours::core::math::vec2;
/// let segments = [
///     Segment::new(vec2(0.0, 0.0), vec2(1.0, 0.0)),
///     Segment::new(vec2(1.0, 0.0), vec2(1.0, 1.0)),
///     Segment::new(vec2(5.0, 5.0), vec2(6.0, 5.0)),
/// ];
/// let data = segments_to_path_data(&segments, 1e-4);
/// assert_eq!(data.to_string(), "M 0,0 L 1,0 L 1,1 M 5,5 L 6,5");
/// ```
pub fn segments_to_path_data(segments: &[Segment<f64>], pos_equal_eps: f64) -> PathData {
    let mut data = PathData::new();
    let mut prev_end: Option<Vector2> = None;
    for seg in segments {
        let continues = prev_end.is_some_and(|end| end.fuzzy_eq_eps(seg.start, pos_equal_eps));
        if !continues {
            data.move_to(seg.start);
        }
        data.line_to(seg.end);
        prev_end = Some(seg.end);
    }

    data
}

struct Pair(f64, f64);

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", format_number(self.0), format_number(self.1))
    }
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = self.letter();
        match self.segment {
            PathSegment::MoveTo { x, y }
            | PathSegment::LineTo { x, y }
            | PathSegment::SmoothQuadratic { x, y } => write!(f, "{letter} {}", Pair(x, y)),
            PathSegment::HorizontalLineTo { x } => write!(f, "{letter} {}", format_number(x)),
            PathSegment::VerticalLineTo { y } => write!(f, "{letter} {}", format_number(y)),
            PathSegment::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => write!(
                f,
                "{letter} {} {} {}",
                Pair(x1, y1),
                Pair(x2, y2),
                Pair(x, y)
            ),
            PathSegment::SmoothCurveTo { x2, y2, x, y } => {
                write!(f, "{letter} {} {}", Pair(x2, y2), Pair(x, y))
            }
            PathSegment::Quadratic { x1, y1, x, y } => {
                write!(f, "{letter} {} {}", Pair(x1, y1), Pair(x, y))
            }
            PathSegment::EllipticalArc {
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                x,
                y,
            } => write!(
                f,
                "{letter} {} {} {} {} {}",
                Pair(rx, ry),
                format_number(x_axis_rotation),
                u8::from(large_arc),
                u8::from(sweep),
                Pair(x, y)
            ),
            PathSegment::ClosePath => write!(f, "{letter}"),
        }
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cmd) in self.commands.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{cmd}")?;
        }
        Ok(())
    }
}
