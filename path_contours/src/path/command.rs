use crate::core::math::Vector2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Geometry of one path data command. Coordinates are absolute or relative depending on the
/// owning [PathCommand].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PathSegment {
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    HorizontalLineTo {
        x: f64,
    },
    VerticalLineTo {
        y: f64,
    },
    CurveTo {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    SmoothCurveTo {
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    Quadratic {
        x1: f64,
        y1: f64,
        x: f64,
        y: f64,
    },
    SmoothQuadratic {
        x: f64,
        y: f64,
    },
    EllipticalArc {
        rx: f64,
        ry: f64,
        x_axis_rotation: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
    },
    ClosePath,
}

impl PathSegment {
    /// Upper case command letter for this segment kind.
    pub fn letter(&self) -> char {
        match self {
            PathSegment::MoveTo { .. } => 'M',
            PathSegment::LineTo { .. } => 'L',
            PathSegment::HorizontalLineTo { .. } => 'H',
            PathSegment::VerticalLineTo { .. } => 'V',
            PathSegment::CurveTo { .. } => 'C',
            PathSegment::SmoothCurveTo { .. } => 'S',
            PathSegment::Quadratic { .. } => 'Q',
            PathSegment::SmoothQuadratic { .. } => 'T',
            PathSegment::EllipticalArc { .. } => 'A',
            PathSegment::ClosePath => 'Z',
        }
    }

    /// False if any numeric argument is infinite or NaN.
    pub fn is_finite(&self) -> bool {
        let all_finite = |args: &[f64]| args.iter().all(|v| v.is_finite());
        match self {
            PathSegment::MoveTo { x, y }
            | PathSegment::LineTo { x, y }
            | PathSegment::SmoothQuadratic { x, y } => all_finite(&[*x, *y]),
            PathSegment::HorizontalLineTo { x } => x.is_finite(),
            PathSegment::VerticalLineTo { y } => y.is_finite(),
            PathSegment::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => all_finite(&[*x1, *y1, *x2, *y2, *x, *y]),
            PathSegment::SmoothCurveTo { x2, y2, x, y } => all_finite(&[*x2, *y2, *x, *y]),
            PathSegment::Quadratic { x1, y1, x, y } => all_finite(&[*x1, *y1, *x, *y]),
            PathSegment::EllipticalArc {
                rx,
                ry,
                x_axis_rotation,
                x,
                y,
                ..
            } => all_finite(&[*rx, *ry, *x_axis_rotation, *x, *y]),
            PathSegment::ClosePath => true,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PathCommand {
    pub relative: bool,
    pub segment: PathSegment,
}

impl PathCommand {
    #[inline]
    pub fn absolute(segment: PathSegment) -> Self {
        PathCommand {
            relative: false,
            segment,
        }
    }

    #[inline]
    pub fn relative(segment: PathSegment) -> Self {
        PathCommand {
            relative: true,
            segment,
        }
    }

    /// Command letter, lower case for relative commands.
    #[inline]
    pub fn letter(&self) -> char {
        let l = self.segment.letter();
        if self.relative {
            l.to_ascii_lowercase()
        } else {
            l
        }
    }
}

/// Ordered list of path commands, the parsed form of an SVG `d` attribute.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData {
    pub commands: Vec<PathCommand>,
}

impl PathData {
    #[inline]
    pub fn new() -> Self {
        PathData {
            commands: Vec::new(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn push(&mut self, command: PathCommand) {
        self.commands.push(command);
    }

    pub fn move_to(&mut self, p: Vector2) {
        self.push(PathCommand::absolute(PathSegment::MoveTo { x: p.x, y: p.y }));
    }

    pub fn line_to(&mut self, p: Vector2) {
        self.push(PathCommand::absolute(PathSegment::LineTo { x: p.x, y: p.y }));
    }

    pub fn close(&mut self) {
        self.push(PathCommand::absolute(PathSegment::ClosePath));
    }

    /// Append all commands of `other`.
    pub fn extend(&mut self, other: &PathData) {
        self.commands.extend_from_slice(&other.commands);
    }
}

impl FromIterator<PathCommand> for PathData {
    fn from_iter<I: IntoIterator<Item = PathCommand>>(iter: I) -> Self {
        PathData {
            commands: iter.into_iter().collect(),
        }
    }
}
