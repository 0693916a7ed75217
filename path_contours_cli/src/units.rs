//! CSS absolute length units and the document user unit scale.
use crate::{document::Element, error::Error};
use std::{fmt, str::FromStr};

/// Absolute length unit, converted with the CSS 96 DPI table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Px,
    Pt,
    Pc,
    Mm,
    Cm,
    M,
    In,
    Ft,
    Yd,
    Q,
}

impl Unit {
    /// Size of one unit in px.
    pub fn px(self) -> f64 {
        match self {
            Unit::Px => 1.0,
            Unit::Pt => 96.0 / 72.0,
            Unit::Pc => 16.0,
            Unit::Mm => 96.0 / 25.4,
            Unit::Cm => 96.0 / 2.54,
            Unit::M => 96.0 / 0.0254,
            Unit::In => 96.0,
            Unit::Ft => 96.0 * 12.0,
            Unit::Yd => 96.0 * 36.0,
            Unit::Q => 96.0 / 101.6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Unit::Px => "px",
            Unit::Pt => "pt",
            Unit::Pc => "pc",
            Unit::Mm => "mm",
            Unit::Cm => "cm",
            Unit::M => "m",
            Unit::In => "in",
            Unit::Ft => "ft",
            Unit::Yd => "yd",
            Unit::Q => "Q",
        }
    }
}

impl FromStr for Unit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = match s.trim() {
            "px" | "" => Unit::Px,
            "pt" => Unit::Pt,
            "pc" => Unit::Pc,
            "mm" => Unit::Mm,
            "cm" => Unit::Cm,
            "m" => Unit::M,
            "in" => Unit::In,
            "ft" => Unit::Ft,
            "yd" => Unit::Yd,
            "Q" | "q" => Unit::Q,
            other => return Err(Error::UnknownUnit(other.to_string())),
        };
        Ok(unit)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse a length such as `"210mm"`, `"12.5"` or `"1e2px"` into px. Percentages and unknown
/// suffixes give `None`.
pub fn parse_length_px(text: &str) -> Option<f64> {
    let text = text.trim();
    let split = text
        .char_indices()
        .find(|&(i, c)| {
            c.is_ascii_alphabetic()
                && !(matches!(c, 'e' | 'E')
                    && text[i + 1..]
                        .chars()
                        .next()
                        .is_some_and(|n| n.is_ascii_digit() || n == '-' || n == '+'))
                || c == '%'
        })
        .map_or(text.len(), |(i, _)| i);
    let (number, suffix) = text.split_at(split);
    let value: f64 = number.trim().parse().ok()?;
    if suffix == "%" {
        return None;
    }
    let unit = suffix.parse::<Unit>().ok()?;
    let px = value * unit.px();
    px.is_finite().then_some(px)
}

/// px per user unit of the document: root `width` in px divided by the `viewBox` width. Missing
/// or unusable values give 1.
pub fn document_scale(root: &Element) -> f64 {
    let width_px = root.attr("width").and_then(parse_length_px);
    let view_box_width = root.attr("viewBox").and_then(|vb| {
        vb.split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .nth(2)
            .and_then(|w| w.parse::<f64>().ok())
    });

    match (width_px, view_box_width) {
        (Some(w), Some(vb)) if w > 0.0 && vb > 0.0 => w / vb,
        _ => 1.0,
    }
}

/// User units per one `unit`.
pub fn unit_factor(unit: Unit, document_scale: f64) -> f64 {
    unit.px() / document_scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn unit_table() {
        assert_close(Unit::In.px(), 96.0);
        assert_close(Unit::Mm.px() * 25.4, 96.0);
        assert_close(Unit::Pt.px() * 72.0, 96.0);
        assert_close(Unit::Q.px() * 4.0, Unit::Mm.px());
        assert_eq!("Q".parse::<Unit>().unwrap(), Unit::Q);
        assert!(matches!("furlong".parse::<Unit>(), Err(Error::UnknownUnit(_))));
    }

    #[test]
    fn lengths() {
        assert_close(parse_length_px("10").unwrap(), 10.0);
        assert_close(parse_length_px("1in").unwrap(), 96.0);
        assert_close(parse_length_px(" 2.54cm ").unwrap(), 96.0);
        assert_close(parse_length_px("1e1px").unwrap(), 10.0);
        assert_eq!(parse_length_px("100%"), None);
        assert_eq!(parse_length_px("abc"), None);
        assert_eq!(parse_length_px("1e400"), None);
    }

    #[test]
    fn mm_document_scale() {
        let doc = Document::parse(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="210mm" height="297mm" viewBox="0 0 210 297"/>"#,
        )
        .unwrap();
        let scale = document_scale(doc.root());
        assert_close(scale, 96.0 / 25.4);
        // one mm is one user unit in this document
        assert_close(unit_factor(Unit::Mm, scale), 1.0);
        assert_close(unit_factor(Unit::Cm, scale), 10.0);
    }

    #[test]
    fn unscaled_document() {
        let doc = Document::parse(r#"<svg xmlns="http://www.w3.org/2000/svg" width="100"/>"#)
            .unwrap();
        assert_close(document_scale(doc.root()), 1.0);
        assert_close(unit_factor(Unit::In, 1.0), 96.0);
    }
}
