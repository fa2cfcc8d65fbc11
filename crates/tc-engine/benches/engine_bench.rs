//! Benchmarks for the sample and modulation hot paths.
//!
//! Run with: cargo bench --bench engine_bench -p tc-engine

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use tc_engine::{Driver, EventQueue, Synth};
use tc_ir::{ChannelId, EnvelopeParams, VibratoParams};

fn busy_synth() -> Synth {
    let mut synth = Synth::new(48_000);
    synth.configure_envelope(ChannelId::Noise, EnvelopeParams::new(2, 6, 0, 0));
    synth.envelope_on(ChannelId::Noise);
    synth.configure_vibrato(ChannelId::SquareA, VibratoParams::new(115, 30));
    synth.configure_vibrato(ChannelId::SquareB, VibratoParams::new(115, 30));
    synth.note_on(ChannelId::SquareA, 64, 32);
    synth.note_on(ChannelId::SquareB, 67, 32);
    synth.note_on(ChannelId::Triangle, 48, 92);
    synth.note_on(ChannelId::Noise, 100, 40);
    synth
}

fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("mix");
    let mut synth = busy_synth();

    for count in [480usize, 4800, 48_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter(|| {
                for _ in 0..count {
                    black_box(synth.mix());
                }
            });
        });
    }

    group.finish();
}

fn bench_driver(c: &mut Criterion) {
    let mut driver = Driver::new(busy_synth(), EventQueue::new());
    c.bench_function("driver_one_second", |b| {
        b.iter(|| {
            for _ in 0..48_000 {
                black_box(driver.next_sample());
            }
        });
    });
}

fn bench_modulation(c: &mut Criterion) {
    let mut synth = busy_synth();
    c.bench_function("tick_modulation", |b| b.iter(|| synth.tick_modulation()));
}

criterion_group!(benches, bench_mix, bench_driver, bench_modulation);
criterion_main!(benches);
