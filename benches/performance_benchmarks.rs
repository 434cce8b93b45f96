use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use trailsync::{parse_gpx, summarize, Trackpoint};

/// Accumulator and GPX parsing throughput over growing track sizes

fn create_track(points: usize) -> Vec<Trackpoint> {
    (0..points)
        .map(|i| {
            let t = i as f64;
            Trackpoint::with_elevation(
                46.0 + t * 0.0001,
                7.0 + (t * 0.01).sin() * 0.001,
                1000.0 + (t * 0.05).sin() * 50.0,
            )
        })
        .collect()
}

fn create_gpx(points: usize) -> String {
    let mut xml = String::from("<gpx><trk><trkseg>");
    for p in create_track(points) {
        xml.push_str(&format!(
            r#"<trkpt lat="{:.6}" lon="{:.6}"><ele>{:.1}</ele></trkpt>"#,
            p.latitude,
            p.longitude,
            p.elevation.unwrap_or(0.0)
        ));
    }
    xml.push_str("</trkseg></trk></gpx>");
    xml
}

fn bench_summarize(c: &mut Criterion) {
    let mut group = c.benchmark_group("Track Summary");

    for &size in &[100, 1_000, 10_000, 100_000] {
        let track = create_track(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("summarize", size), &track, |b, track| {
            b.iter(|| summarize(black_box(track)));
        });
    }

    group.finish();
}

fn bench_parse_gpx(c: &mut Criterion) {
    let mut group = c.benchmark_group("GPX Parsing");

    for &size in &[100, 1_000, 10_000] {
        let xml = create_gpx(size);

        group.throughput(Throughput::Bytes(xml.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse_gpx", size), &xml, |b, xml| {
            b.iter(|| parse_gpx(black_box(xml)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_summarize, bench_parse_gpx);
criterion_main!(benches);
