//! Mapping SVG elements to library shapes and writing geometry back.
use crate::{document::Element, units::parse_length_px};
use log::warn;
use path_contours::{
    path::{FlattenOptions, PathData},
    polygon::Polygon,
    shape::{parse_points, Shape, ShapeError},
};
use thiserror::Error;

/// Why an element cannot be processed. Reported as a warning and the element is skipped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ElementError {
    #[error("group '{id}' is ignored, ungroup it first")]
    Group { id: String },
    #[error("element '{id}' of type '{tag}' is not a supported shape")]
    Unsupported { id: String, tag: String },
    #[error("element '{id}' has no '{attribute}' attribute")]
    MissingAttribute { id: String, attribute: &'static str },
    #[error("element '{id}' has an invalid '{attribute}' value '{value}'")]
    InvalidAttribute {
        id: String,
        attribute: &'static str,
        value: String,
    },
    #[error("element '{id}': {source}")]
    Shape { id: String, source: ShapeError },
}

/// Geometry attributes replaced when an element is rewritten as a path.
const GEOMETRY_ATTRIBUTES: &[&str] = &[
    "d", "cx", "cy", "r", "rx", "ry", "x", "y", "width", "height", "points", "x1", "y1", "x2",
    "y2",
];

struct Attrs<'a> {
    element: &'a Element,
    id: &'a str,
}

impl<'a> Attrs<'a> {
    fn length(&self, attribute: &'static str) -> Result<Option<f64>, ElementError> {
        match self.element.attr(attribute) {
            None => Ok(None),
            Some(value) => parse_length_px(value).map(Some).ok_or_else(|| {
                ElementError::InvalidAttribute {
                    id: self.id.to_string(),
                    attribute,
                    value: value.to_string(),
                }
            }),
        }
    }

    fn length_or_zero(&self, attribute: &'static str) -> Result<f64, ElementError> {
        Ok(self.length(attribute)?.unwrap_or(0.0))
    }

    fn required(&self, attribute: &'static str) -> Result<f64, ElementError> {
        self.length(attribute)?
            .ok_or_else(|| ElementError::MissingAttribute {
                id: self.id.to_string(),
                attribute,
            })
    }

    fn text(&self, attribute: &'static str) -> Result<&'a str, ElementError> {
        self.element
            .attr(attribute)
            .ok_or_else(|| ElementError::MissingAttribute {
                id: self.id.to_string(),
                attribute,
            })
    }

    fn points(&self) -> Result<Vec<path_contours::core::math::Vector2>, ElementError> {
        parse_points(self.text("points")?).map_err(|source| ElementError::Shape {
            id: self.id.to_string(),
            source,
        })
    }
}

/// Read the shape an element draws.
pub fn shape_from_element(element: &Element) -> Result<Shape, ElementError> {
    let id = element.id().unwrap_or("");
    let a = Attrs { element, id };
    let shape = match element.name.as_str() {
        "path" => {
            let (data, issues) = PathData::parse(a.text("d")?);
            for issue in issues {
                warn!("{id}: {issue}");
            }
            Shape::Path(data)
        }
        "circle" => Shape::Circle {
            cx: a.length_or_zero("cx")?,
            cy: a.length_or_zero("cy")?,
            r: a.required("r")?,
        },
        "ellipse" => Shape::Ellipse {
            cx: a.length_or_zero("cx")?,
            cy: a.length_or_zero("cy")?,
            rx: a.required("rx")?,
            ry: a.required("ry")?,
        },
        "rect" => Shape::Rect {
            x: a.length_or_zero("x")?,
            y: a.length_or_zero("y")?,
            width: a.required("width")?,
            height: a.required("height")?,
            rx: a.length("rx")?,
            ry: a.length("ry")?,
        },
        "polygon" => Shape::Polygon(a.points()?),
        "polyline" => Shape::Polyline(a.points()?),
        "line" => Shape::Line {
            x1: a.length_or_zero("x1")?,
            y1: a.length_or_zero("y1")?,
            x2: a.length_or_zero("x2")?,
            y2: a.length_or_zero("y2")?,
        },
        "g" => return Err(ElementError::Group { id: id.to_string() }),
        other => {
            return Err(ElementError::Unsupported {
                id: id.to_string(),
                tag: other.to_string(),
            })
        }
    };

    Ok(shape)
}

/// Read an element's path data and flatten it into sub-paths, warning about decomposition
/// issues.
pub fn element_sub_paths(
    element: &Element,
    options: &FlattenOptions,
) -> Result<(PathData, Vec<Polygon>), ElementError> {
    let id = element.id().unwrap_or("");
    let data = shape_from_element(element)?
        .to_path_data()
        .map_err(|source| ElementError::Shape {
            id: id.to_string(),
            source,
        })?;
    let decomposed = data.decompose(options);
    for issue in &decomposed.issues {
        warn!("{id}: {issue}");
    }

    Ok((data, decomposed.polygons))
}

/// Turn `element` into a `path` drawing `data`, keeping every non-geometry attribute.
pub fn set_path_data(element: &mut Element, data: &PathData) {
    if element.name != "path" {
        for name in GEOMETRY_ATTRIBUTES {
            element.remove_attr(name);
        }
        element.name = "path".to_string();
    }
    element.set_attr("d", data.to_string());
}
