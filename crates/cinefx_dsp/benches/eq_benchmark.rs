//! Performance benchmarks for the DSP module
//!
//! Run with: cargo bench -p cinefx_dsp

use cinefx_dsp::{
    AudioProcessor, BassBoost, Equalizer, LoudnessEnhancer, Virtualizer, DEFAULT_BAND_CENTERS,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn benchmark_eq_processing(c: &mut Criterion) {
    let mut group = c.benchmark_group("equalizer");

    for size in [64, 128, 256, 512, 1024, 2048] {
        let sample_count = size * 2;
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("process_interleaved_{}_frames", size), |b| {
            let mut eq = Equalizer::new(48000.0, &DEFAULT_BAND_CENTERS).unwrap();
            let mut buffer: Vec<f32> = (0..sample_count)
                .map(|i| (i as f32 * 0.001).sin())
                .collect();

            b.iter(|| {
                eq.process_interleaved(black_box(&mut buffer));
            });
        });
    }

    group.finish();
}

fn benchmark_full_chain(c: &mut Criterion) {
    let mut eq = Equalizer::new(48000.0, &DEFAULT_BAND_CENTERS).unwrap();
    let mut bass = BassBoost::new(48000.0).unwrap();
    bass.set_enabled(true);
    bass.set_strength(600).unwrap();
    let mut virt = Virtualizer::new();
    virt.set_enabled(true);
    virt.set_strength(400).unwrap();
    let mut loud = LoudnessEnhancer::new();
    loud.set_enabled(true);
    loud.set_target_gain(300);

    let mut buffer: Vec<f32> = (0..1024).map(|i| (i as f32 * 0.003).sin()).collect();

    c.bench_function("chain_process_512_frames", |b| {
        b.iter(|| {
            let chain: [&mut dyn AudioProcessor; 4] = [&mut eq, &mut bass, &mut virt, &mut loud];
            for p in chain {
                p.process(black_box(&mut buffer));
            }
        });
    });
}

fn benchmark_eq_coefficient_update(c: &mut Criterion) {
    c.bench_function("eq_set_band_gain", |b| {
        let mut eq = Equalizer::new(48000.0, &DEFAULT_BAND_CENTERS).unwrap();
        let mut band = 0;
        let mut gain = 0.0_f32;

        b.iter(|| {
            // Simulate dragging a slider
            eq.set_band_gain(band, gain).unwrap();
            band = (band + 1) % DEFAULT_BAND_CENTERS.len();
            gain = (gain + 1.0) % 15.0;
        });
    });
}

criterion_group!(
    benches,
    benchmark_eq_processing,
    benchmark_full_chain,
    benchmark_eq_coefficient_update
);

criterion_main!(benches);
