use chapter_progress::{build_segments, format_timestamp, TimestampExtractor};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Build a description with a chapter line every three minutes
fn synthetic_description(chapters: usize) -> String {
    let mut text = String::from("Course contents:\n\n");
    for i in 0..chapters {
        let start = (i * 180) as u64;
        text.push_str(&format!("{} - Chapter number {}\n", format_timestamp(start), i));
    }
    text
}

fn bench_extract(c: &mut Criterion) {
    let extractor = TimestampExtractor::new();
    let description = synthetic_description(100);

    c.bench_function("extract_100_chapters", |b| {
        b.iter(|| extractor.extract(black_box(&description)))
    });
}

fn bench_extract_and_build(c: &mut Criterion) {
    let extractor = TimestampExtractor::new();
    let description = synthetic_description(100);

    c.bench_function("extract_and_build_100_chapters", |b| {
        b.iter(|| {
            let timestamps = extractor.extract(black_box(&description));
            build_segments(&timestamps, "bench-video", Some(18_000), 600)
        })
    });
}

criterion_group!(benches, bench_extract, bench_extract_and_build);
criterion_main!(benches);
