mod test_utils;

use path_contours::{
    clip::{ClipError, ClipOptions, ClipRegion},
    core::math::Vector2,
    path::{
        encode::{polygons_to_path_data, segments_to_path_data},
        FlattenOptions, PathData,
    },
    polygon::Segment,
    polygon_closed, polygon_open,
};
use test_utils::square;

fn clip_to_path_data(region: &ClipRegion<f64>, target: &str) -> String {
    let (data, issues) = PathData::parse(target);
    assert!(issues.is_empty());
    let decomposed = data.decompose(&FlattenOptions::new());
    let polygons: Vec<_> = region
        .clip_path(&decomposed.polygons)
        .iter()
        .flat_map(|c| c.to_polygons(1e-4))
        .collect();
    polygons_to_path_data(&polygons).to_string()
}

fn region(clip: &str) -> ClipRegion<f64> {
    let (data, issues) = PathData::parse(clip);
    assert!(issues.is_empty());
    let decomposed = data.decompose(&FlattenOptions::new());
    ClipRegion::new(&decomposed.polygons, &ClipOptions::new()).unwrap()
}

#[test]
fn superset_clip_keeps_convex_polygon() {
    let region = ClipRegion::new(&[square(-5.0, 15.0)], &ClipOptions::new()).unwrap();
    let triangle = polygon_closed![(0.0, 0.0), (10.0, 0.0), (5.0, 8.0)];
    let clipped = region.clip_polygon(&triangle);
    assert!(clipped.unbroken_closed);
    let result = clipped.to_polygons(1e-4);
    assert_eq!(result.len(), 1);
    assert!(result[0].fuzzy_eq_eps(&triangle, 1e-9));
}

#[test]
fn self_clip_keeps_polygon() {
    let pg = polygon_closed![(0.0, 0.0), (10.0, 0.0), (12.0, 6.0), (4.0, 9.0), (-2.0, 5.0)];
    let region = ClipRegion::new(std::slice::from_ref(&pg), &ClipOptions::new()).unwrap();
    let clipped = region.clip_polygon(&pg);
    assert!(clipped.unbroken_closed);
    assert_eq!(clipped.pieces.len(), 5);
}

#[test]
fn x_arms_clip_to_four_segments() {
    let region = region("M -5,-5 H 5 V 5 H -5 Z");
    let arms = [
        polygon_open![(1.0, 0.5), (10.0, 5.0)],
        polygon_open![(-1.0, 0.5), (-10.0, 5.0)],
        polygon_open![(-1.0, -0.5), (-10.0, -5.0)],
        polygon_open![(1.0, -0.5), (10.0, -5.0)],
    ];
    let pieces: Vec<Segment<f64>> = region
        .clip_path(&arms)
        .into_iter()
        .flat_map(|c| c.pieces)
        .collect();
    assert_eq!(pieces.len(), 4);
    let data = segments_to_path_data(&pieces, 1e-4);
    assert_eq!(
        data.to_string(),
        "M 1,0.5 L 5,2.5 M -1,0.5 L -5,2.5 M -1,-0.5 L -5,-2.5 M 1,-0.5 L 5,-2.5"
    );
}

#[test]
fn crossing_diagonals_clip_to_x() {
    let region = region("M -4,-5 H 4 V 5 H -4 Z");
    assert_eq!(
        clip_to_path_data(&region, "M -10,-10 L 10,10 M -10,10 L 10,-10"),
        "M -4,-4 L 4,4 M -4,4 L 4,-4"
    );
}

#[test]
fn single_sub_path_gets_move_at_every_gap() {
    let region = region("M -5,-5 H 5 V 5 H -5 Z");
    // both diagonals cross the frame twice, the connecting edge lies outside
    assert_eq!(
        clip_to_path_data(&region, "M -10,-5 L 10,5 L 10,-5 L -10,5"),
        "M -5,-2.5 L 5,2.5 M 5,-2.5 L -5,2.5"
    );
}

#[test]
fn small_scale_crossing_is_split() {
    let region = ClipRegion::new(&[square(0.0, 0.005)], &ClipOptions::new()).unwrap();
    let pieces = region.clip_segment(&Segment::new(
        Vector2::new(-0.005, 0.0025),
        Vector2::new(0.01, 0.0025),
    ));
    assert_eq!(pieces.len(), 1);
    assert!(pieces[0].start.fuzzy_eq_eps(Vector2::new(0.0, 0.0025), 1e-9));
    assert!(pieces[0].end.fuzzy_eq_eps(Vector2::new(0.005, 0.0025), 1e-9));
}

#[test]
fn crossing_closed_polygon_is_cut_and_rejoined() {
    let region = ClipRegion::new(&[square(0.0, 10.0)], &ClipOptions::new()).unwrap();
    // starts inside, leaves through the right side and comes back
    let target = polygon_closed![(5.0, 2.0), (15.0, 2.0), (15.0, 8.0), (5.0, 8.0)];
    let clipped = region.clip_polygon(&target);
    assert!(!clipped.unbroken_closed);
    let result = clipped.to_polygons(1e-4);
    assert_eq!(result.len(), 1);
    let expected = polygon_open![(10.0, 8.0), (5.0, 8.0), (5.0, 2.0), (10.0, 2.0)];
    assert!(result[0].fuzzy_eq_eps(&expected, 1e-9));
}

#[test]
fn ring_clip_region_is_even_odd() {
    let region = region("M 0,0 H 20 V 20 H 0 Z M 5,5 H 15 V 15 H 5 Z");
    let line = polygon_open![(-5.0, 10.0), (25.0, 10.0)];
    let clipped = region.clip_polygon(&line);
    let result = clipped.to_polygons(1e-4);
    assert_eq!(result.len(), 2);
    assert!(result[0].fuzzy_eq_eps(&polygon_open![(0.0, 10.0), (5.0, 10.0)], 1e-9));
    assert!(result[1].fuzzy_eq_eps(&polygon_open![(15.0, 10.0), (20.0, 10.0)], 1e-9));
}

#[test]
fn target_outside_is_empty() {
    let region = ClipRegion::new(&[square(0.0, 10.0)], &ClipOptions::new()).unwrap();
    let clipped = region.clip_polygon(&polygon_open![(20.0, 0.0), (30.0, 5.0)]);
    assert!(clipped.is_empty());
    assert!(clipped.to_polygons(1e-4).is_empty());
}

#[test]
fn open_clip_shape_is_rejected() {
    let (data, _) = PathData::parse("M 0,0 L 10,0 L 10,10");
    let decomposed = data.decompose(&FlattenOptions::new());
    assert_eq!(
        ClipRegion::new(&decomposed.polygons, &ClipOptions::new()).unwrap_err(),
        ClipError::OpenClipPath { index: 0 }
    );
    assert_eq!(
        ClipRegion::<f64>::new(&[], &ClipOptions::new()).unwrap_err(),
        ClipError::EmptyClipRegion
    );
}
