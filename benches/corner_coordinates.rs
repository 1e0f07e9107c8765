use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use hsfm_rs::photogrammetry::{
    FrameSpec, GeoPoint, Heading, corner_coordinates_string, from_local_projection,
    to_local_projection,
};

fn benchmark_corner_string(c: &mut Criterion) {
    let mut group = c.benchmark_group("corner_coordinates_string");
    let frame = FrameSpec::new(152.0, 0.02, 14000, 13000);

    let centers = vec![
        (GeoPoint::new(46.85, -121.76), "cascades"),
        (GeoPoint::new(0.0, 3.0), "equator"),
        (GeoPoint::new(-54.0, -68.0), "southern"),
        (GeoPoint::new(78.0, 15.0), "svalbard"),
    ];

    for (center, label) in centers {
        group.bench_with_input(BenchmarkId::from_parameter(label), &center, |b, center| {
            let heading = Heading::from_degrees(37.5).unwrap();
            b.iter(|| corner_coordinates_string(black_box(*center), &frame, heading, 1500.0));
        });
    }

    group.finish();
}

fn benchmark_utm_round_trip(c: &mut Criterion) {
    c.bench_function("utm_round_trip", |b| {
        b.iter(|| {
            let projected = to_local_projection(black_box(46.85), black_box(-121.76)).unwrap();
            from_local_projection(
                projected.easting,
                projected.northing,
                projected.zone.number,
                projected.zone.letter,
            )
        });
    });
}

criterion_group!(benches, benchmark_corner_string, benchmark_utm_round_trip);
criterion_main!(benches);
