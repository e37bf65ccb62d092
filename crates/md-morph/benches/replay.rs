use criterion::{Criterion, black_box, criterion_group, criterion_main};
use md_core::PixelBuffer;
use md_decomp::{decompose, disc_se};
use md_morph::{Replayer, opening_direct};
use md_window::EngineConfig;

fn synthetic(width: usize, height: usize) -> PixelBuffer {
    let mut data = Vec::with_capacity(width * height);
    for i in 0..(width * height) {
        data.push((i % 251) as u8);
    }
    PixelBuffer::from_vec(width, height, 1, data).expect("valid image")
}

fn bench_decompose(c: &mut Criterion) {
    let se = disc_se(25);
    c.bench_function("decompose_disc_r25", |b| {
        b.iter(|| {
            let queue = decompose(black_box(&se)).expect("disc");
            black_box(queue);
        });
    });
}

fn bench_opening(c: &mut Criterion) {
    let img = synthetic(640, 480);
    let se = disc_se(9);
    let queue = decompose(&se).expect("disc");
    let replayer = Replayer::new(EngineConfig::default()).expect("pool");

    c.bench_function("opening_exact_disc_r9_640x480", |b| {
        b.iter(|| {
            let out = replayer.opening(black_box(&img), &queue).expect("opening");
            black_box(out);
        });
    });

    c.bench_function("opening_cascade_disc_r9_640x480", |b| {
        b.iter(|| {
            let mut out = img.clone();
            replayer
                .cascade_opening(&mut out, queue.clone())
                .expect("cascade");
            black_box(out);
        });
    });

    c.bench_function("opening_direct_disc_r9_640x480", |b| {
        b.iter(|| {
            let out = opening_direct(black_box(&img), &se).expect("opening");
            black_box(out);
        });
    });
}

criterion_group!(benches, bench_decompose, bench_opening);
criterion_main!(benches);
