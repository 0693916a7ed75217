#![allow(dead_code)]

use path_contours::{core::traits::FuzzyEq, polygon::Polygon, AABB};

/// Fuzzy compare AABB values
pub fn aabb_fuzzy_eq_eps(a: &AABB<f64>, b: &AABB<f64>, eps: f64) -> bool {
    a.min_x.fuzzy_eq_eps(b.min_x, eps)
        && a.min_y.fuzzy_eq_eps(b.min_y, eps)
        && a.max_x.fuzzy_eq_eps(b.max_x, eps)
        && a.max_y.fuzzy_eq_eps(b.max_y, eps)
}

/// Holds a set of properties of a polygon for comparison in tests
#[derive(Debug, Copy, Clone)]
pub struct PolygonProperties {
    pub vertex_count: usize,
    pub area: f64,
    pub path_length: f64,
    pub extents: AABB<f64>,
}

impl PolygonProperties {
    // positions equal epsilon
    pub const POS_EQ_EPS: f64 = 1e-5;
    // property comparer epsilon
    pub const PROP_CMP_EPS: f64 = 1e-4;

    pub fn new(
        vertex_count: usize,
        area: f64,
        path_length: f64,
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
    ) -> Self {
        Self {
            vertex_count,
            area,
            path_length,
            extents: AABB::new(min_x, min_y, max_x, max_y),
        }
    }

    pub fn from_polygon(polygon: &Polygon<f64>) -> Self {
        let rr = polygon.remove_repeat_pos(Self::POS_EQ_EPS);
        let polygon = rr.as_ref().unwrap_or(polygon);
        Self {
            vertex_count: polygon.vertex_count(),
            area: polygon.area(),
            path_length: polygon.path_length(),
            extents: polygon.extents().unwrap(),
        }
    }

    pub fn fuzzy_eq_eps(&self, other: &Self, eps: f64) -> bool {
        self.vertex_count == other.vertex_count
            && self.area.fuzzy_eq_eps(other.area, eps)
            && self.path_length.fuzzy_eq_eps(other.path_length, eps)
            && aabb_fuzzy_eq_eps(&self.extents, &other.extents, eps)
    }
}

pub fn create_property_set<'a, I>(polygons: I) -> Vec<PolygonProperties>
where
    I: IntoIterator<Item = &'a Polygon<f64>>,
{
    polygons
        .into_iter()
        .map(PolygonProperties::from_polygon)
        .collect()
}

/// Order independent match of two property sets.
pub fn property_sets_match(
    result_set: &[PolygonProperties],
    expected_set: &[PolygonProperties],
) -> bool {
    if result_set.len() != expected_set.len() {
        return false;
    }

    let mut used = vec![false; result_set.len()];
    for expected in expected_set {
        let found = result_set.iter().enumerate().position(|(i, r)| {
            !used[i] && r.fuzzy_eq_eps(expected, PolygonProperties::PROP_CMP_EPS)
        });
        match found {
            Some(i) => used[i] = true,
            None => return false,
        }
    }

    true
}

pub fn square(min: f64, max: f64) -> Polygon<f64> {
    let mut pg = Polygon::with_capacity(4, true);
    pg.add(min, min);
    pg.add(max, min);
    pg.add(max, max);
    pg.add(min, max);
    pg
}
