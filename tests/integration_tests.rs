// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Integration tests for stave
//!
//! These tests drive the public API end to end: spelling against every key
//! and clef, and whole melodies through a staff speller.

use std::collections::HashMap;
use std::io::Write;
use std::thread;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use stave::notation::spelling;
use stave::notation::{
    Accidental, BarResetType, Clef, DisplayNote, Key, NoAccidentalStrategy, OctaveType, Pitch,
    SpellerSettings, StaffSpeller,
};
use stave::EngravingConfig;

const STRATEGIES: [NoAccidentalStrategy; 4] = [
    NoAccidentalStrategy::UseKey,
    NoAccidentalStrategy::UseSharps,
    NoAccidentalStrategy::UseFlats,
    NoAccidentalStrategy::UseKeySharpness,
];

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Every pitch spelled in every key and clef reads back as the same pitch
#[test]
fn test_round_trip_all_keys_and_clefs() {
    init_tracing();

    for key in Key::all() {
        for clef in Clef::clefs() {
            for strategy in STRATEGIES {
                for pitch in 0..=127 {
                    let display = Pitch::raw_pitch_to_display_pitch(
                        pitch,
                        Accidental::NoAccidental,
                        &clef,
                        &key,
                        strategy,
                    );
                    let back = Pitch::display_pitch_to_raw_pitch(
                        display.height,
                        display.accidental,
                        &clef,
                        &key,
                        false,
                    );
                    assert_eq!(
                        back, pitch,
                        "{} in {} / {} ({:?}) -> {:?}",
                        pitch, key, clef, strategy, display
                    );
                }
            }
        }
    }
}

/// Explicit spellings survive the round trip too, whenever they are legal
#[test]
fn test_round_trip_explicit_accidentals() {
    for key in Key::all() {
        let clefs = [
            Clef::default(),
            Clef::new("bass", 0).unwrap(),
            Clef::new("alto", 1).unwrap(),
        ];
        for clef in clefs {
            for pitch in 0..=127 {
                for acc in Accidental::ALL {
                    if !spelling::is_valid(pitch % 12, acc) {
                        continue;
                    }
                    let display = Pitch::raw_pitch_to_display_pitch(
                        pitch,
                        acc,
                        &clef,
                        &key,
                        NoAccidentalStrategy::UseKey,
                    );
                    let back = Pitch::display_pitch_to_raw_pitch(
                        display.height,
                        display.accidental,
                        &clef,
                        &key,
                        false,
                    );
                    assert_eq!(back, pitch, "{} as {} in {} / {}", pitch, acc, key, clef);

                    let from_height =
                        Pitch::from_height(display.height, &clef, &key, display.accidental);
                    assert_eq!(from_height.performance_pitch(), pitch);
                }
            }
        }
    }
}

#[test]
fn test_diatonic_notes_need_no_accidental() {
    for key in Key::all() {
        let tonic = key.tonic_pitch();
        let scale: &[i32] = if key.is_minor() {
            &[0, 2, 3, 5, 7, 8, 10]
        } else {
            &[0, 2, 4, 5, 7, 9, 11]
        };
        for &interval in scale {
            let pitch = Pitch::new(60 + (tonic + interval) % 12);
            assert_eq!(
                pitch.display_accidental(&key),
                Accidental::NoAccidental,
                "{} in {}",
                pitch,
                key
            );
        }
    }

    let g_major = Key::new("G major").unwrap();
    assert_eq!(Pitch::new(66).display_accidental(&g_major), Accidental::NoAccidental);
}

#[test]
fn test_well_known_spellings() {
    assert_eq!(Pitch::new(70).as_key().name(), "Bb major");

    let d_major = Key::new("D major").unwrap();
    assert_eq!(Pitch::new(66).height_on_staff(&Clef::default(), &d_major), 1);

    // Middle C: one ledger line below treble, one above bass, middle of alto
    let c_major = Key::default();
    let middle_c = Pitch::new(60);
    assert_eq!(middle_c.height_on_staff(&Clef::default(), &c_major), -2);
    assert_eq!(middle_c.height_on_staff(&Clef::new("bass", 0).unwrap(), &c_major), 10);
    assert_eq!(middle_c.height_on_staff(&Clef::new("alto", 0).unwrap(), &c_major), 4);
}

#[test]
fn test_key_registry_shared_between_threads() {
    let handles: Vec<_> = (0..8)
        .map(|i| thread::spawn(move || Key::from_tonic(i, i % 2 == 0)))
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let key = handle.join().unwrap();
        assert_eq!(key.tonic_pitch(), i as i32);
    }
}

/// Reads a staff the way a musician does: a printed accidental holds for the
/// rest of the bar at that height, otherwise the key signature applies
struct Reader {
    key: Key,
    clef: Clef,
    in_force: HashMap<i32, Accidental>,
}

impl Reader {
    fn new(key: Key, clef: Clef) -> Self {
        Self {
            key,
            clef,
            in_force: HashMap::new(),
        }
    }

    fn read(&mut self, note: &DisplayNote) -> i32 {
        if note.accidental != Accidental::NoAccidental {
            self.in_force.insert(note.height, note.accidental);
        }
        let acc = self
            .in_force
            .get(&note.height)
            .copied()
            .unwrap_or(Accidental::NoAccidental);
        Pitch::display_pitch_to_raw_pitch(note.height, acc, &self.clef, &self.key, false)
    }

    fn bar_line(&mut self) {
        self.in_force.clear();
    }
}

/// Random melodies come out readable: what is printed is what sounds
#[test]
fn test_random_melodies_read_back() {
    init_tracing();
    let mut rng = StdRng::seed_from_u64(42);
    let keys = Key::all();

    for bar_reset in [BarResetType::None, BarResetType::Cautionary, BarResetType::Explicit] {
        for _ in 0..20 {
            let key = keys[rng.gen_range(0..keys.len())];
            let clef = Clef::clefs()[rng.gen_range(0..11)];
            let settings = SpellerSettings {
                octave_type: OctaveType::Independent,
                bar_reset,
                strategy: STRATEGIES[rng.gen_range(0..STRATEGIES.len())],
            };
            let mut staff = StaffSpeller::new(key, clef, settings);
            let mut reader = Reader::new(key, clef);

            for _ in 0..16 {
                for _ in 0..8 {
                    let pitch = rng.gen_range(48..84);
                    let note = staff.spell_note(Pitch::new(pitch));
                    assert_eq!(
                        reader.read(&note),
                        pitch,
                        "{} in {} / {}: {:?}",
                        pitch,
                        key,
                        clef,
                        note
                    );
                }
                staff.bar_line();
                reader.bar_line();
            }
        }
    }
}

/// Chords from a config file, through a clef change and a barline
#[test]
fn test_config_driven_staff() {
    init_tracing();
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(file, "key: Bb major").unwrap();
    writeln!(file, "clef: treble").unwrap();
    writeln!(file, "bar_reset: cautionary").unwrap();

    let config = EngravingConfig::load(file.path()).unwrap();
    let mut staff = StaffSpeller::from_config(&config).unwrap();

    // Bb major triad: the signature covers everything
    let chord = staff.spell_chord(&[Pitch::new(58), Pitch::new(62), Pitch::new(65)]);
    assert!(chord.iter().all(|n| n.accidental == Accidental::NoAccidental));
    assert_eq!(chord.iter().map(|n| n.height).collect::<Vec<_>>(), vec![-3, -1, 1]);

    // B natural needs a natural sign
    let b = staff.spell_note(Pitch::new(71));
    assert_eq!((b.height, b.accidental), (4, Accidental::Natural));

    // Next bar, Bb again: a cautionary flat
    staff.bar_line();
    let bb = staff.spell_note(Pitch::new(70));
    assert_eq!(bb.accidental, Accidental::Flat);
    assert!(bb.cautionary);

    // Into bass clef
    staff.clef_change(Clef::new("bass", 0).unwrap());
    let low_bb = staff.spell_note(Pitch::new(46));
    assert_eq!((low_bb.height, low_bb.accidental), (2, Accidental::NoAccidental));
}
