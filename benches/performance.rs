// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Performance benchmarks for stave
//!
//! Run with: cargo bench
//!
//! These benchmarks measure:
//! - Pitch to staff height spelling, per strategy
//! - Staff height back to pitch
//! - Key lookup
//! - Accidental bookkeeping over a bar of notes

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use stave::notation::{
    Accidental, AccidentalTable, BarResetType, Clef, Key, NoAccidentalStrategy, OctaveType, Pitch,
    SpellerSettings, StaffSpeller,
};

/// Benchmark spelling every MIDI pitch in one key
fn bench_raw_to_display(c: &mut Criterion) {
    let mut group = c.benchmark_group("raw_to_display");
    let key = Key::new("Eb major").unwrap();
    let clef = Clef::default();

    for strategy in [
        NoAccidentalStrategy::UseKey,
        NoAccidentalStrategy::UseSharps,
        NoAccidentalStrategy::UseKeySharpness,
    ] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", strategy)),
            &strategy,
            |b, &strategy| {
                b.iter(|| {
                    for pitch in 0..=127 {
                        black_box(Pitch::raw_pitch_to_display_pitch(
                            black_box(pitch),
                            Accidental::NoAccidental,
                            &clef,
                            &key,
                            strategy,
                        ));
                    }
                })
            },
        );
    }

    group.finish();
}

/// Benchmark reading heights back to pitches
fn bench_display_to_raw(c: &mut Criterion) {
    let key = Key::new("A major").unwrap();
    let clef = Clef::new("bass", 0).unwrap();

    c.bench_function("display_to_raw", |b| {
        b.iter(|| {
            for height in -20..30 {
                black_box(Pitch::display_pitch_to_raw_pitch(
                    black_box(height),
                    Accidental::NoAccidental,
                    &clef,
                    &key,
                    false,
                ));
            }
        })
    });
}

/// Benchmark key lookup by name and by tonic
fn bench_key_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_lookup");

    group.bench_function("by_name", |b| b.iter(|| black_box(Key::new(black_box("F# minor")))));
    group.bench_function("by_tonic", |b| {
        b.iter(|| {
            for tonic in 0..12 {
                black_box(Key::from_tonic(black_box(tonic), false));
            }
        })
    });
    group.bench_function("as_key", |b| b.iter(|| black_box(Pitch::new(black_box(66)).as_key())));

    group.finish();
}

/// Benchmark accidental bookkeeping for bars of chromatic notes
fn bench_accidental_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("accidental_table");
    let key = Key::new("D major").unwrap();

    for octave_type in [OctaveType::Independent, OctaveType::Cautionary, OctaveType::Equivalent] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", octave_type)),
            &octave_type,
            |b, &octave_type| {
                b.iter(|| {
                    let mut table = AccidentalTable::new(
                        key,
                        Clef::default(),
                        octave_type,
                        BarResetType::Cautionary,
                    );
                    for bar in 0..4 {
                        for height in 0..16 {
                            let mut cautionary = false;
                            let requested = if (height + bar) % 3 == 0 {
                                Accidental::Natural
                            } else {
                                Accidental::NoAccidental
                            };
                            black_box(table.process_display_accidental(
                                requested,
                                height,
                                &mut cautionary,
                            ));
                            table.update();
                        }
                        table.new_bar();
                    }
                })
            },
        );
    }

    group.finish();
}

/// Benchmark the full per-staff pipeline on a chromatic run
fn bench_staff_speller(c: &mut Criterion) {
    let pitches: Vec<Pitch> = (48..84).map(Pitch::new).collect();

    c.bench_function("staff_speller_bar", |b| {
        b.iter(|| {
            let mut staff = StaffSpeller::new(
                Key::new("Bb major").unwrap(),
                Clef::default(),
                SpellerSettings::default(),
            );
            for chunk in pitches.chunks(3) {
                black_box(staff.spell_chord(chunk));
            }
            staff.bar_line();
        })
    });
}

criterion_group!(
    benches,
    bench_raw_to_display,
    bench_display_to_raw,
    bench_key_lookup,
    bench_accidental_table,
    bench_staff_speller,
);

criterion_main!(benches);
