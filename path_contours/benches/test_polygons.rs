use path_contours::{core::math::Vector2, polygon::Polygon};
use std::f64::consts::TAU;

/// Star with `point_count` spikes, alternating outer radius 100 and inner radius 40.
pub fn star(point_count: usize) -> Polygon<f64> {
    let n = point_count * 2;
    Polygon::from_vertexes(
        (0..n).map(|i| {
            let angle = TAU * i as f64 / n as f64;
            let r = if i % 2 == 0 { 100.0 } else { 40.0 };
            Vector2::new(r * angle.cos(), r * angle.sin())
        }),
        true,
    )
}

/// Open zig-zag line crossing y = 0 `count` times.
pub fn zig_zag(count: usize) -> Polygon<f64> {
    Polygon::from_vertexes(
        (0..=count).map(|i| {
            let y = if i % 2 == 0 { -50.0 } else { 50.0 };
            Vector2::new(-100.0 + 200.0 * i as f64 / count as f64, y)
        }),
        false,
    )
}

/// Path data of `count` cubic curves.
pub fn wavy_path_data(count: usize) -> String {
    let mut d = String::from("M 0,0");
    for i in 0..count {
        let x = i as f64 * 10.0;
        d.push_str(&format!(" C {},20 {},-20 {},0", x + 3.0, x + 7.0, x + 10.0));
    }
    d
}
