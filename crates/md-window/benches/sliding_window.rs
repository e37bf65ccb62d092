use criterion::{Criterion, black_box, criterion_group, criterion_main};
use md_core::PixelBuffer;
use md_window::{Axis, EngineConfig, WindowEngine, erode_line};

fn synthetic(width: usize, height: usize) -> PixelBuffer {
    let mut data = Vec::with_capacity(width * height);
    for i in 0..(width * height) {
        data.push((i % 251) as u8);
    }
    PixelBuffer::from_vec(width, height, 1, data).expect("valid image")
}

fn bench_erode_line(c: &mut Criterion) {
    let line: Vec<u8> = (0..4096usize).map(|i| (i * 37 % 251) as u8).collect();

    for size in [3usize, 15, 101] {
        c.bench_function(&format!("erode_line_4096_s{size}"), |b| {
            b.iter(|| {
                let out = erode_line(black_box(&line), size).expect("valid window");
                black_box(out);
            });
        });
    }
}

fn bench_passes(c: &mut Criterion) {
    let img = synthetic(1280, 1024);
    let engine = WindowEngine::new(EngineConfig::default()).expect("pool");

    c.bench_function("erode_horizontal_s21_1280x1024", |b| {
        b.iter(|| {
            let mut buf = img.clone();
            engine
                .erode(&mut buf, Axis::Horizontal, 21)
                .expect("valid pass");
            black_box(buf);
        });
    });

    c.bench_function("erode_vertical_s21_1280x1024", |b| {
        b.iter(|| {
            let mut buf = img.clone();
            engine
                .erode(&mut buf, Axis::Vertical, 21)
                .expect("valid pass");
            black_box(buf);
        });
    });
}

criterion_group!(benches, bench_erode_line, bench_passes);
criterion_main!(benches);
