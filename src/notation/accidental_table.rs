// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Accidental bookkeeping during a rendering pass.
//!
//! Spelling a pitch says which accidental a note *could* carry. Whether it
//! is actually printed depends on what came before it in the bar: a second
//! F# in the same bar needs no sharp, an F natural after it needs a natural.
//! `AccidentalTable` tracks what is in force, height by height, and decides.
//!
//! Usage per staff:
//!
//! ```text
//! for each bar:
//!     for each chord:
//!         for each note: process_display_accidental(..)
//!         update()
//!     new_bar()
//! ```
//!
//! Notes within one chord are judged against the state before the chord,
//! so two notes of a chord never suppress each other.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::accidental::Accidental;
use super::clef::Clef;
use super::key::{canonical_height, Key};

/// How accidentals in one octave affect the same letter in other octaves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OctaveType {
    /// Each octave is tracked on its own
    #[default]
    Independent,
    /// Octaves are independent, but a note whose letter carries a different
    /// accidental in another octave gets a cautionary accidental
    Cautionary,
    /// An accidental applies to its letter in every octave
    Equivalent,
}

/// What to do at a barline about accidentals from the bar before
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarResetType {
    /// Nothing; the barline cancels them silently
    #[default]
    None,
    /// Restore the key's accidental, marked cautionary
    Cautionary,
    /// Restore the key's accidental as an ordinary accidental
    Explicit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AccidentalRec {
    accidental: Accidental,
    previous_bar: bool,
}

type AccidentalMap = BTreeMap<i32, AccidentalRec>;

/// Tracks accidentals in force on one staff
#[derive(Debug, Clone)]
pub struct AccidentalTable {
    key: Key,
    clef: Clef,
    octave_type: OctaveType,
    bar_reset: BarResetType,
    accidentals: AccidentalMap,
    canonical_accidentals: AccidentalMap,
    new_accidentals: AccidentalMap,
    new_canonical_accidentals: AccidentalMap,
}

/// Natural and "nothing" are the same thing to the reader
fn same_sounding(a: Accidental, b: Accidental) -> bool {
    let plain = |a: Accidental| matches!(a, Accidental::NoAccidental | Accidental::Natural);
    a == b || (plain(a) && plain(b))
}

fn lookup(map: &AccidentalMap, height: i32, previous_bar: bool) -> Accidental {
    match map.get(&height) {
        Some(rec) if rec.previous_bar == previous_bar => rec.accidental,
        _ => Accidental::NoAccidental,
    }
}

impl AccidentalTable {
    pub fn new(key: Key, clef: Clef, octave_type: OctaveType, bar_reset: BarResetType) -> Self {
        Self {
            key,
            clef,
            octave_type,
            bar_reset,
            accidentals: AccidentalMap::new(),
            canonical_accidentals: AccidentalMap::new(),
            new_accidentals: AccidentalMap::new(),
            new_canonical_accidentals: AccidentalMap::new(),
        }
    }

    pub fn key(&self) -> Key {
        self.key
    }

    pub fn clef(&self) -> Clef {
        self.clef
    }

    pub fn octave_type(&self) -> OctaveType {
        self.octave_type
    }

    pub fn bar_reset_type(&self) -> BarResetType {
        self.bar_reset
    }

    /// Decide the accidental to print for a note.
    ///
    /// `requested` is the spelled accidental at `height`, where
    /// `NoAccidental` means "whatever the key signature says". The result
    /// is `NoAccidental` when nothing needs printing. `cautionary` is read
    /// as the caller's own request for a cautionary accidental and set when
    /// the table decides one is due.
    pub fn process_display_accidental(
        &mut self,
        requested: Accidental,
        height: i32,
        cautionary: &mut bool,
    ) -> Accidental {
        let canonical = canonical_height(height);
        let key_acc = self.key.accidental_at_height(height, &self.clef);

        let canonical_acc = match self.octave_type {
            OctaveType::Independent => Accidental::NoAccidental,
            OctaveType::Cautionary | OctaveType::Equivalent => {
                lookup(&self.canonical_accidentals, canonical, false)
            }
        };
        let normal_acc = lookup(&self.accidentals, height, false);
        let prev_bar_acc = match self.bar_reset {
            BarResetType::None => Accidental::NoAccidental,
            _ => lookup(&self.accidentals, height, true),
        };

        let mut acc = if requested == Accidental::NoAccidental {
            key_acc
        } else {
            requested
        };

        match self.octave_type {
            OctaveType::Independent | OctaveType::Equivalent => {
                let in_force = if self.octave_type == OctaveType::Equivalent {
                    canonical_acc
                } else {
                    normal_acc
                };
                let expected = if in_force == Accidental::NoAccidental {
                    key_acc
                } else {
                    in_force
                };

                if same_sounding(acc, expected) {
                    if !*cautionary {
                        acc = Accidental::NoAccidental;
                    } else if acc == Accidental::NoAccidental {
                        acc = Accidental::Natural;
                    }
                } else if acc == Accidental::NoAccidental {
                    acc = Accidental::Natural;
                }
            }
            OctaveType::Cautionary => {
                let expected = if normal_acc == Accidental::NoAccidental {
                    key_acc
                } else {
                    normal_acc
                };

                if !same_sounding(acc, expected) {
                    if acc == Accidental::NoAccidental {
                        acc = Accidental::Natural;
                    }
                } else if canonical_acc != Accidental::NoAccidental
                    && !same_sounding(canonical_acc, acc)
                {
                    // Same letter, different accidental in another octave
                    *cautionary = true;
                    if acc == Accidental::NoAccidental {
                        acc = Accidental::Natural;
                    }
                } else if !*cautionary {
                    acc = Accidental::NoAccidental;
                } else if acc == Accidental::NoAccidental {
                    acc = Accidental::Natural;
                }
            }
        }

        if acc == Accidental::NoAccidental
            && prev_bar_acc != Accidental::NoAccidental
            && !same_sounding(prev_bar_acc, key_acc)
        {
            acc = if key_acc == Accidental::NoAccidental {
                Accidental::Natural
            } else {
                key_acc
            };
            *cautionary = self.bar_reset == BarResetType::Cautionary;
        }

        if acc != Accidental::NoAccidental {
            let rec = AccidentalRec {
                accidental: acc,
                previous_bar: false,
            };
            self.new_accidentals.insert(height, rec);
            self.new_canonical_accidentals.insert(canonical, rec);
        }

        trace!(
            height,
            requested = %requested,
            displayed = %acc,
            cautionary = *cautionary,
            "display accidental"
        );
        acc
    }

    /// Commit the accidentals recorded since the last update; call once
    /// after each chord
    pub fn update(&mut self) {
        self.accidentals = self.new_accidentals.clone();
        self.canonical_accidentals = self.new_canonical_accidentals.clone();
    }

    /// Start a new bar
    pub fn new_bar(&mut self) {
        self.accidentals.retain(|_, rec| !rec.previous_bar);
        for rec in self.accidentals.values_mut() {
            rec.previous_bar = true;
        }
        self.canonical_accidentals.clear();

        self.new_accidentals = self.accidentals.clone();
        self.new_canonical_accidentals.clear();
        trace!(carried = self.accidentals.len(), "new bar");
    }

    /// Change clef mid-bar. Accidentals already in force stay in force.
    pub fn new_clef(&mut self, clef: Clef) {
        self.clef = clef;
    }
}

impl Default for AccidentalTable {
    fn default() -> Self {
        Self::new(
            Key::default(),
            Clef::default(),
            OctaveType::default(),
            BarResetType::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Treble clef heights
    const F4: i32 = 1;
    const F5: i32 = 8;
    const C5: i32 = 5;

    fn table(key: &str, octave_type: OctaveType, bar_reset: BarResetType) -> AccidentalTable {
        AccidentalTable::new(Key::new(key).unwrap(), Clef::default(), octave_type, bar_reset)
    }

    /// Process one note as a one-note chord
    fn note(table: &mut AccidentalTable, acc: Accidental, height: i32) -> (Accidental, bool) {
        let mut cautionary = false;
        let shown = table.process_display_accidental(acc, height, &mut cautionary);
        table.update();
        (shown, cautionary)
    }

    #[test]
    fn test_repeated_accidental_is_suppressed() {
        let mut t = table("C major", OctaveType::Independent, BarResetType::None);
        assert_eq!(note(&mut t, Accidental::Sharp, F4), (Accidental::Sharp, false));
        assert_eq!(note(&mut t, Accidental::Sharp, F4), (Accidental::NoAccidental, false));
        // Different octave is tracked separately
        assert_eq!(note(&mut t, Accidental::Sharp, F5), (Accidental::Sharp, false));
    }

    #[test]
    fn test_natural_cancels_earlier_sharp() {
        let mut t = table("C major", OctaveType::Independent, BarResetType::None);
        note(&mut t, Accidental::Sharp, F4);
        assert_eq!(note(&mut t, Accidental::NoAccidental, F4), (Accidental::Natural, false));
        // And the natural is itself remembered
        assert_eq!(note(&mut t, Accidental::NoAccidental, F4), (Accidental::NoAccidental, false));
    }

    #[test]
    fn test_key_signature_accidentals() {
        let mut t = table("G major", OctaveType::Independent, BarResetType::None);
        // F# in G major: the signature covers it
        assert_eq!(note(&mut t, Accidental::NoAccidental, F4), (Accidental::NoAccidental, false));
        assert_eq!(note(&mut t, Accidental::Natural, F4), (Accidental::Natural, false));
        // Back to F#: the sharp must be restored explicitly
        assert_eq!(note(&mut t, Accidental::NoAccidental, F4), (Accidental::Sharp, false));
        assert_eq!(note(&mut t, Accidental::NoAccidental, F4), (Accidental::NoAccidental, false));
    }

    #[test]
    fn test_chord_notes_do_not_affect_each_other() {
        let mut t = table("C major", OctaveType::Independent, BarResetType::None);
        let mut cautionary = false;
        assert_eq!(
            t.process_display_accidental(Accidental::Sharp, F4, &mut cautionary),
            Accidental::Sharp
        );
        assert_eq!(
            t.process_display_accidental(Accidental::Sharp, F4, &mut cautionary),
            Accidental::Sharp
        );
        t.update();
        assert_eq!(
            t.process_display_accidental(Accidental::Sharp, F4, &mut cautionary),
            Accidental::NoAccidental
        );
    }

    #[test]
    fn test_new_bar_forgets_accidentals() {
        let mut t = table("C major", OctaveType::Independent, BarResetType::None);
        note(&mut t, Accidental::Sharp, F4);
        t.new_bar();
        assert_eq!(note(&mut t, Accidental::NoAccidental, F4), (Accidental::NoAccidental, false));
        assert_eq!(note(&mut t, Accidental::Sharp, F4), (Accidental::Sharp, false));
    }

    #[test]
    fn test_bar_reset_cautionary() {
        let mut t = table("C major", OctaveType::Independent, BarResetType::Cautionary);
        note(&mut t, Accidental::Sharp, F4);
        t.new_bar();
        assert_eq!(note(&mut t, Accidental::NoAccidental, F4), (Accidental::Natural, true));
        // Only the first note after the barline needs the reminder
        assert_eq!(note(&mut t, Accidental::NoAccidental, F4), (Accidental::NoAccidental, false));
    }

    #[test]
    fn test_bar_reset_explicit() {
        let mut t = table("C major", OctaveType::Independent, BarResetType::Explicit);
        note(&mut t, Accidental::Sharp, F4);
        t.new_bar();
        assert_eq!(note(&mut t, Accidental::NoAccidental, F4), (Accidental::Natural, false));
    }

    #[test]
    fn test_bar_reset_restores_key_accidental() {
        let mut t = table("G major", OctaveType::Independent, BarResetType::Cautionary);
        note(&mut t, Accidental::Natural, F4);
        t.new_bar();
        assert_eq!(note(&mut t, Accidental::NoAccidental, F4), (Accidental::Sharp, true));
    }

    #[test]
    fn test_bar_reset_lasts_one_bar() {
        let mut t = table("C major", OctaveType::Independent, BarResetType::Explicit);
        note(&mut t, Accidental::Sharp, F4);
        t.new_bar();
        t.new_bar();
        assert_eq!(note(&mut t, Accidental::NoAccidental, F4), (Accidental::NoAccidental, false));
    }

    #[test]
    fn test_equivalent_octaves() {
        let mut t = table("C major", OctaveType::Equivalent, BarResetType::None);
        note(&mut t, Accidental::Sharp, F4);
        // The sharp applies an octave up too
        assert_eq!(note(&mut t, Accidental::Sharp, F5), (Accidental::NoAccidental, false));
        assert_eq!(note(&mut t, Accidental::NoAccidental, F5), (Accidental::Natural, false));
        // Other letters are untouched
        assert_eq!(note(&mut t, Accidental::NoAccidental, C5), (Accidental::NoAccidental, false));
    }

    #[test]
    fn test_cautionary_octaves() {
        let mut t = table("C major", OctaveType::Cautionary, BarResetType::None);
        note(&mut t, Accidental::Sharp, F4);
        // F natural an octave up gets a reminder natural
        assert_eq!(note(&mut t, Accidental::NoAccidental, F5), (Accidental::Natural, true));

        let mut t = table("C major", OctaveType::Cautionary, BarResetType::None);
        note(&mut t, Accidental::Sharp, F4);
        // F# an octave up is a real accidental, not a reminder
        assert_eq!(note(&mut t, Accidental::Sharp, F5), (Accidental::Sharp, false));
        assert_eq!(note(&mut t, Accidental::Sharp, F4), (Accidental::NoAccidental, false));
    }

    #[test]
    fn test_requested_cautionary_is_printed() {
        let mut t = AccidentalTable::default();
        let mut cautionary = true;
        assert_eq!(
            t.process_display_accidental(Accidental::NoAccidental, C5, &mut cautionary),
            Accidental::Natural
        );
        assert!(cautionary);
    }

    #[test]
    fn test_new_clef_keeps_state() {
        let mut t = table("C major", OctaveType::Independent, BarResetType::None);
        note(&mut t, Accidental::Sharp, F4);
        let bass = Clef::new("bass", 0).unwrap();
        t.new_clef(bass);
        assert_eq!(t.clef(), bass);
        assert_eq!(note(&mut t, Accidental::Sharp, F4), (Accidental::NoAccidental, false));
    }

    #[test]
    fn test_new_clef_moves_signature() {
        // Height 6 is D5 in treble but F3 in bass
        const HEIGHT: i32 = 6;
        let bass = Clef::new("bass", 0).unwrap();

        let mut t = table("G major", OctaveType::Independent, BarResetType::None);
        assert_eq!(note(&mut t, Accidental::Sharp, HEIGHT), (Accidental::Sharp, false));

        let mut t = table("G major", OctaveType::Independent, BarResetType::None);
        t.new_clef(bass);
        assert_eq!(
            note(&mut t, Accidental::Sharp, HEIGHT),
            (Accidental::NoAccidental, false)
        );
        assert_eq!(note(&mut t, Accidental::Natural, HEIGHT), (Accidental::Natural, false));
        assert_eq!(
            note(&mut t, Accidental::NoAccidental, HEIGHT),
            (Accidental::Sharp, false)
        );
    }

    #[test]
    fn test_defaults() {
        let t = AccidentalTable::default();
        assert_eq!(t.key().name(), "C major");
        assert_eq!(t.clef(), Clef::default());
        assert_eq!(t.octave_type(), OctaveType::Independent);
        assert_eq!(t.bar_reset_type(), BarResetType::None);
    }
}
