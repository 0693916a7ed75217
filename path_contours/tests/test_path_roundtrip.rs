use path_contours::{
    path::{encode::polygons_to_path_data, FlattenOptions, PathData, PathDataIssue},
    shape::Shape,
};

fn decompose(text: &str) -> Vec<path_contours::polygon::Polygon<f64>> {
    let (data, issues) = PathData::parse(text);
    assert!(issues.is_empty(), "{issues:?}");
    let decomposed = data.decompose(&FlattenOptions::new());
    assert!(decomposed.issues.is_empty(), "{:?}", decomposed.issues);
    decomposed.polygons
}

#[test]
fn decompose_encode_decompose_is_stable() {
    let inputs = [
        "M 0,0 C 10,0 10,10 0,10 Z M 20,0 L 30,0 L 25,5",
        "m 10 10 q 5 -10 10 0 t 10 0 s 5 5 10 0",
        "M 50,50 a 20 10 30 1 1 10 10 z",
        "M0 0h10v10h-10z",
    ];
    for input in inputs {
        let first = decompose(input);
        let encoded = polygons_to_path_data(&first).to_string();
        let second = decompose(&encoded);
        assert_eq!(first.len(), second.len(), "{input}");
        for (a, b) in first.iter().zip(&second) {
            assert!(a.fuzzy_eq_eps(b, 1e-5), "{input} -> {encoded}");
        }
    }
}

#[test]
fn closing_by_position_drops_duplicate() {
    let polygons = decompose("M 0,0 L 10,0 L 10,10 L 0,0");
    assert_eq!(polygons.len(), 1);
    assert!(polygons[0].is_closed());
    assert_eq!(polygons[0].vertex_count(), 3);
}

#[test]
fn bad_commands_are_reported_and_skipped() {
    let (data, issues) = PathData::parse("M 0,0 L 10,0 B 3 4 L 10,10 Z");
    assert_eq!(
        issues,
        vec![PathDataIssue::UnsupportedCommand {
            letter: 'B',
            offset: 13
        }]
    );
    let decomposed = data.decompose(&FlattenOptions::new());
    assert_eq!(decomposed.polygons.len(), 1);
    assert_eq!(decomposed.polygons[0].vertex_count(), 3);
}

#[test]
fn shapes_encode_as_closed_polygons() {
    let shapes = [
        Shape::Circle {
            cx: 0.0,
            cy: 0.0,
            r: 5.0,
        },
        Shape::Rect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 5.0,
            rx: Some(1.0),
            ry: Some(1.0),
        },
    ];
    for shape in &shapes {
        let decomposed = shape.decompose(&FlattenOptions::new()).unwrap();
        assert_eq!(decomposed.polygons.len(), 1);
        assert!(decomposed.polygons[0].is_closed());
        let text = polygons_to_path_data(&decomposed.polygons).to_string();
        assert!(text.starts_with('M') && text.ends_with('Z'));
    }
}
