use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use path_contours::{
    clip::{ClipOptions, ClipRegion},
    offset::{offset_path, JoinType, OffsetOptions},
    path::{FlattenOptions, PathData},
};
mod test_polygons;
use test_polygons::*;

fn offset_group(c: &mut Criterion) {
    let mut group = c.benchmark_group("offset");
    let options = OffsetOptions {
        join_type: JoinType::Round,
        ..Default::default()
    };
    for &n in &[8, 64, 512] {
        let input = [star(n)];
        group.bench_with_input(BenchmarkId::new("star_outward", n), &input, |b, input| {
            b.iter(|| offset_path(input, 2.0, &options))
        });
        group.bench_with_input(BenchmarkId::new("star_inward", n), &input, |b, input| {
            b.iter(|| offset_path(input, -2.0, &options))
        });
    }

    group.finish();
}

fn clip_group(c: &mut Criterion) {
    let mut group = c.benchmark_group("clip");
    for &n in &[8, 64, 512] {
        let region = ClipRegion::new(&[star(n)], &ClipOptions::new()).unwrap();
        let target = [zig_zag(n * 4)];
        group.bench_with_input(BenchmarkId::new("zig_zag_in_star", n), &target, |b, t| {
            b.iter(|| region.clip_path(t))
        });
    }

    group.finish();
}

fn decompose_group(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompose");
    for &n in &[10, 100, 1000] {
        let d = wavy_path_data(n);
        group.bench_with_input(BenchmarkId::new("cubics", n), &d, |b, d| {
            b.iter(|| {
                let (data, _) = PathData::parse(d);
                data.decompose(&FlattenOptions::new())
            })
        });
    }

    group.finish();
}

criterion_group!(offset, offset_group);
criterion_group!(clip, clip_group);
criterion_group!(decompose, decompose_group);
criterion_main!(offset, clip, decompose);
