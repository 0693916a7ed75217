//! The closed set of SVG shape kinds that can be decomposed into sub-paths.
use crate::{
    core::math::Vector2,
    path::{Decomposed, FlattenOptions, PathCommand, PathData, PathSegment},
};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Invalid shape parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("radius must be positive, got {0}")]
    NonPositiveRadius(f64),
    #[error("size must be positive, got {width} x {height}")]
    NonPositiveSize { width: f64, height: f64 },
    #[error("shape has no points")]
    EmptyPoints,
    #[error("invalid points list: {0}")]
    InvalidPoints(String),
}

/// A supported shape element with its geometry attributes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Path(PathData),
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rx: Option<f64>,
        ry: Option<f64>,
    },
    Polygon(Vec<Vector2>),
    Polyline(Vec<Vector2>),
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
}

impl Shape {
    /// SVG element name of this kind.
    pub fn tag_name(&self) -> &'static str {
        match self {
            Shape::Path(_) => "path",
            Shape::Circle { .. } => "circle",
            Shape::Ellipse { .. } => "ellipse",
            Shape::Rect { .. } => "rect",
            Shape::Polygon(_) => "polygon",
            Shape::Polyline(_) => "polyline",
            Shape::Line { .. } => "line",
        }
    }

    /// Path commands drawing this shape.
    ///
    /// # Examples
    ///
    /// ```
    /// # use path_contours::shape::Shape;
    /// let rect = Shape::Rect { x: 0.0, y: 0.0, width: 4.0, height: 2.0, rx: None, ry: None };
    /// assert_eq!(rect.to_path_data().unwrap().to_string(), "M 0,0 H 4 V 2 H 0 Z");
    /// ```
    pub fn to_path_data(&self) -> Result<PathData, ShapeError> {
        match self {
            Shape::Path(data) => Ok(data.clone()),
            Shape::Circle { cx, cy, r } => {
                if *r <= 0.0 {
                    return Err(ShapeError::NonPositiveRadius(*r));
                }
                Ok(ellipse_path(*cx, *cy, *r, *r))
            }
            Shape::Ellipse { cx, cy, rx, ry } => {
                if *rx <= 0.0 {
                    return Err(ShapeError::NonPositiveRadius(*rx));
                }
                if *ry <= 0.0 {
                    return Err(ShapeError::NonPositiveRadius(*ry));
                }
                Ok(ellipse_path(*cx, *cy, *rx, *ry))
            }
            Shape::Rect {
                x,
                y,
                width,
                height,
                rx,
                ry,
            } => {
                if *width <= 0.0 || *height <= 0.0 {
                    return Err(ShapeError::NonPositiveSize {
                        width: *width,
                        height: *height,
                    });
                }
                Ok(rect_path(*x, *y, *width, *height, *rx, *ry))
            }
            Shape::Polygon(points) => points_path(points, true),
            Shape::Polyline(points) => points_path(points, false),
            Shape::Line { x1, y1, x2, y2 } => Ok(PathData::from_iter([
                PathCommand::absolute(PathSegment::MoveTo { x: *x1, y: *y1 }),
                PathCommand::absolute(PathSegment::LineTo { x: *x2, y: *y2 }),
            ])),
        }
    }

    /// Flatten this shape into sub-path polygons.
    pub fn decompose(&self, options: &FlattenOptions) -> Result<Decomposed, ShapeError> {
        Ok(self.to_path_data()?.decompose(options))
    }
}

fn arc(rx: f64, ry: f64, x: f64, y: f64) -> PathCommand {
    PathCommand::absolute(PathSegment::EllipticalArc {
        rx,
        ry,
        x_axis_rotation: 0.0,
        large_arc: false,
        sweep: true,
        x,
        y,
    })
}

fn ellipse_path(cx: f64, cy: f64, rx: f64, ry: f64) -> PathData {
    PathData::from_iter([
        PathCommand::absolute(PathSegment::MoveTo { x: cx + rx, y: cy }),
        arc(rx, ry, cx, cy + ry),
        arc(rx, ry, cx - rx, cy),
        arc(rx, ry, cx, cy - ry),
        arc(rx, ry, cx + rx, cy),
        PathCommand::absolute(PathSegment::ClosePath),
    ])
}

fn rect_path(x: f64, y: f64, w: f64, h: f64, rx: Option<f64>, ry: Option<f64>) -> PathData {
    // negative radii are ignored, a single given radius is used for both
    let rx = rx.filter(|v| *v >= 0.0);
    let ry = ry.filter(|v| *v >= 0.0);
    let (rx, ry) = match (rx, ry) {
        (Some(rx), Some(ry)) => (rx, ry),
        (Some(r), None) | (None, Some(r)) => (r, r),
        (None, None) => (0.0, 0.0),
    };
    let rx = rx.min(w / 2.0);
    let ry = ry.min(h / 2.0);

    let abs = PathCommand::absolute;
    if rx <= 0.0 || ry <= 0.0 {
        return PathData::from_iter([
            abs(PathSegment::MoveTo { x, y }),
            abs(PathSegment::HorizontalLineTo { x: x + w }),
            abs(PathSegment::VerticalLineTo { y: y + h }),
            abs(PathSegment::HorizontalLineTo { x }),
            abs(PathSegment::ClosePath),
        ]);
    }

    PathData::from_iter([
        abs(PathSegment::MoveTo { x: x + rx, y }),
        abs(PathSegment::HorizontalLineTo { x: x + w - rx }),
        arc(rx, ry, x + w, y + ry),
        abs(PathSegment::VerticalLineTo { y: y + h - ry }),
        arc(rx, ry, x + w - rx, y + h),
        abs(PathSegment::HorizontalLineTo { x: x + rx }),
        arc(rx, ry, x, y + h - ry),
        abs(PathSegment::VerticalLineTo { y: y + ry }),
        arc(rx, ry, x + rx, y),
        abs(PathSegment::ClosePath),
    ])
}

fn points_path(points: &[Vector2], close: bool) -> Result<PathData, ShapeError> {
    let (first, rest) = points.split_first().ok_or(ShapeError::EmptyPoints)?;
    let mut data = PathData::new();
    data.move_to(*first);
    for p in rest {
        data.line_to(*p);
    }
    if close {
        data.close();
    }

    Ok(data)
}

/// Parse an SVG `points` attribute (`"x1,y1 x2,y2 ..."`).
///
/// # Examples
///
/// ```
/// # use path_contours::shape::parse_points;
/// let points = parse_points("0,0 10,0 10 10").unwrap();
/// assert_eq!(points.len(), 3);
/// assert!(parse_points("0,0 10").is_err());
/// assert!(parse_points("0,0 1e400,0").is_err());
/// ```
pub fn parse_points(text: &str) -> Result<Vec<Vector2>, ShapeError> {
    let numbers = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| ShapeError::InvalidPoints(format!("'{s}' is not a finite number")))
        })
        .collect::<Result<Vec<f64>, _>>()?;

    if numbers.len() % 2 != 0 {
        return Err(ShapeError::InvalidPoints(
            "odd number of coordinates".to_string(),
        ));
    }

    Ok(numbers
        .chunks_exact(2)
        .map(|c| Vector2::new(c[0], c[1]))
        .collect())
}
