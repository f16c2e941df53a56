// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pitch spelling.
//!
//! Converts between performance pitch (MIDI note numbers) and what is
//! written on a staff: a height plus an accidental. The two directions are
//! `Pitch::raw_pitch_to_display_pitch` and `Pitch::display_pitch_to_raw_pitch`;
//! everything else in this module is built on them.
//!
//! For every pitch, clef, key and strategy the display form converts back to
//! the same performance pitch.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use super::accidental::Accidental;
use super::clef::Clef;
use super::key::Key;
use super::scale::ScaleType;
use super::spelling::{self, Letter, Spelling};

/// Lowest performance pitch
pub const MIN_PITCH: i32 = 0;

/// Highest performance pitch
pub const MAX_PITCH: i32 = 127;

/// Octave base for the "middle C is C4" naming convention
pub const MIDDLE_C_OCTAVE_BASE: i32 = -1;

/// How to choose an accidental when a pitch has none, or an unusable one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoAccidentalStrategy {
    /// Spell by scale step in the current key
    #[default]
    UseKey,
    /// Key spelling for diatonic notes, sharps for the rest
    UseSharps,
    /// Key spelling for diatonic notes, flats for the rest
    UseFlats,
    /// `UseSharps` in sharp keys, `UseFlats` in flat keys
    UseKeySharpness,
}

/// A staff position and the accidental to print there
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayPitch {
    pub height: i32,
    pub accidental: Accidental,
}

/// A performance pitch with an optional explicit spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pitch {
    pitch: i32,
    accidental: Accidental,
}

impl Pitch {
    /// A pitch with no explicit accidental; spelled by key when displayed
    pub fn new(pitch: i32) -> Self {
        Self::with_accidental(pitch, Accidental::NoAccidental)
    }

    /// A pitch with an explicit accidental.
    ///
    /// Pitches outside 0..=127 are clamped, and a clamped pitch loses its
    /// accidental.
    pub fn with_accidental(pitch: i32, accidental: Accidental) -> Self {
        let clamped = pitch.clamp(MIN_PITCH, MAX_PITCH);
        if clamped != pitch {
            trace!(pitch, clamped, "clamped performance pitch");
            return Self {
                pitch: clamped,
                accidental: Accidental::NoAccidental,
            };
        }
        Self { pitch, accidental }
    }

    /// A pitch from pitch class and octave number
    pub fn from_pitch_in_octave(
        pitch_in_octave: i32,
        octave: i32,
        accidental: Accidental,
        octave_base: i32,
    ) -> Self {
        Self::with_accidental((octave - octave_base) * 12 + pitch_in_octave, accidental)
    }

    /// The pitch written at `height` in `clef` and `key`.
    ///
    /// With `NoAccidental` the key signature decides, and the signature's
    /// accidental is kept as the pitch's explicit spelling.
    pub fn from_height(height: i32, clef: &Clef, key: &Key, accidental: Accidental) -> Self {
        let pitch = Self::display_pitch_to_raw_pitch(height, accidental, clef, key, false);
        let accidental = match accidental {
            Accidental::NoAccidental => key.accidental_at_height(height, clef),
            explicit => explicit,
        };
        Self::with_accidental(pitch, accidental)
    }

    /// The pitch for a letter in an octave (the letter's own octave, so
    /// B#4 sounds as C5).
    ///
    /// With `NoAccidental` the key signature decides.
    pub fn from_note_name(
        letter: Letter,
        octave: i32,
        key: &Key,
        accidental: Accidental,
        octave_base: i32,
    ) -> Self {
        let accidental = match accidental {
            Accidental::NoAccidental => key.accidental_for_letter(letter),
            explicit => explicit,
        };
        let pitch = (octave - octave_base) * 12
            + letter.natural_pitch_class()
            + accidental.pitch_offset();
        Self::with_accidental(pitch, accidental)
    }

    pub fn performance_pitch(&self) -> i32 {
        self.pitch
    }

    /// Explicit accidental as given, which may not be valid for the pitch
    pub fn explicit_accidental(&self) -> Accidental {
        self.accidental
    }

    /// Pitch class, 0..=11
    pub fn pitch_in_octave(&self) -> i32 {
        self.pitch.rem_euclid(12)
    }

    /// Octave number, where MIDI pitches 0..=11 are octave `octave_base`
    pub fn octave(&self, octave_base: i32) -> i32 {
        self.pitch.div_euclid(12) + octave_base
    }

    /// Whether the explicit accidental can spell this pitch at all.
    ///
    /// `NoAccidental` is always valid. Otherwise the pitch minus the
    /// accidental's offset must land on a natural letter: C with a sharp can
    /// never sound as D.
    pub fn valid_accidental(&self) -> bool {
        self.accidental == Accidental::NoAccidental
            || spelling::is_valid(self.pitch_in_octave(), self.accidental)
    }

    /// Letter implied by the explicit accidental alone
    pub fn written_letter(&self) -> Option<Letter> {
        if self.accidental == Accidental::NoAccidental {
            return None;
        }
        spelling::spell(self.pitch_in_octave(), self.accidental).map(|s| s.letter)
    }

    /// Absolute accidental used to spell this pitch in `key` (explicit if
    /// valid, else by key). Naturals are `NoAccidental`.
    pub fn accidental(&self, key: &Key) -> Accidental {
        match self.resolved_accidental(key, NoAccidentalStrategy::UseKey) {
            Accidental::Natural => Accidental::NoAccidental,
            other => other,
        }
    }

    /// The accidental to print in `key`, spelling by key
    pub fn display_accidental(&self, key: &Key) -> Accidental {
        self.display_accidental_with_strategy(key, NoAccidentalStrategy::UseKey)
    }

    /// The accidental to print in `key`
    pub fn display_accidental_with_strategy(
        &self,
        key: &Key,
        strategy: NoAccidentalStrategy,
    ) -> Accidental {
        self.display(&Clef::default(), key, strategy).accidental
    }

    /// Staff height in `clef` and `key`, spelling by key
    pub fn height_on_staff(&self, clef: &Clef, key: &Key) -> i32 {
        self.height_on_staff_with_strategy(clef, key, NoAccidentalStrategy::UseKey)
    }

    pub fn height_on_staff_with_strategy(
        &self,
        clef: &Clef,
        key: &Key,
        strategy: NoAccidentalStrategy,
    ) -> i32 {
        self.display(clef, key, strategy).height
    }

    /// Height and printed accidental in `clef` and `key`
    pub fn display(&self, clef: &Clef, key: &Key, strategy: NoAccidentalStrategy) -> DisplayPitch {
        Self::raw_pitch_to_display_pitch(self.pitch, self.accidental, clef, key, strategy)
    }

    /// Letter this pitch is written with in `key`
    pub fn note_name(&self, key: &Key) -> Letter {
        self.spelled(key).0.letter
    }

    /// Scale step (0 = tonic) from the major or harmonic minor step table
    pub fn note_in_scale(&self, key: &Key) -> usize {
        ScaleType::for_stepping(key.is_minor()).step_for_offset(self.pitch - key.tonic_pitch())
    }

    /// Whether the pitch class belongs to the key's signature scale
    pub fn is_diatonic_in_key(&self, key: &Key) -> bool {
        diatonic_accidental(self.pitch_in_octave(), key).is_some()
    }

    /// Note name with octave, e.g. "F#4" or "B#3" (the letter's own octave)
    pub fn as_string(&self, key: &Key, octave_base: i32) -> String {
        let (spelling, accidental) = self.spelled(key);
        let suffix = if accidental == Accidental::Natural {
            ""
        } else {
            accidental.symbol()
        };
        let octave = self.pitch.div_euclid(12) + spelling.octave_shift + octave_base;
        format!("{}{}{}", spelling.letter, suffix, octave)
    }

    /// The major key whose tonic is this pitch as spelled.
    ///
    /// Walks the circle of fifths from Cb major to C# major looking for a
    /// tonic with the same pitch class and accidental. A pitch without a
    /// usable accidental only matches natural tonics; when nothing matches
    /// the key comes from the pitch class alone (so plain 70 gives
    /// Bb major).
    pub fn as_key(&self) -> Key {
        let pitch_class = self.pitch_in_octave();
        let wanted = if self.valid_accidental() {
            self.accidental
        } else {
            Accidental::NoAccidental
        };

        let c_major = Key::default();
        let mut candidate = Pitch::with_accidental(71, Accidental::Flat);
        for _ in 0..15 {
            if candidate.pitch_in_octave() == pitch_class
                && candidate.accidental.same_absolute(wanted)
            {
                if let Some(letter) = candidate.written_letter() {
                    if let Ok(key) = Key::from_tonic_spelling(letter, candidate.accidental, false) {
                        return key;
                    }
                }
            }
            candidate = candidate.transpose(&c_major, 7, 4);
            if candidate.pitch > 71 {
                candidate = candidate.transpose(&c_major, -12, -7);
            }
        }

        trace!(pitch = self.pitch, "no spelled tonic match, using pitch class");
        Key::from_tonic(pitch_class, false)
    }

    /// Transpose by `pitch_delta` semitones and `height_delta` letters.
    ///
    /// The letter moves independently of the sound, and the new accidental
    /// is whatever bridges the two, so a major third up from Bb is D (not
    /// C##) and a diminished fourth up from C is Fb. If the letter is more
    /// than a double accidental away from the sound, the result has no
    /// explicit accidental and is spelled by key when displayed.
    pub fn transpose(&self, key: &Key, pitch_delta: i32, height_delta: i32) -> Pitch {
        let (spelling, _) = self.spelled(key);
        let letter_octave = self.pitch.div_euclid(12) + spelling.octave_shift;
        let old_step = letter_octave * 7 + spelling.letter.index() as i32;

        let new_pitch = self.pitch + pitch_delta;
        let new_step = old_step + height_delta;
        let natural = new_step.div_euclid(7) * 12
            + ScaleType::Major.interval_for_step(new_step.rem_euclid(7) as usize);

        if !(MIN_PITCH..=MAX_PITCH).contains(&new_pitch) {
            warn!(
                pitch = self.pitch,
                pitch_delta, "transposition leaves the pitch range, clamping"
            );
            return Pitch::new(new_pitch);
        }

        let accidental = Accidental::from_offset(new_pitch - natural).unwrap_or_else(|_| {
            trace!(new_pitch, new_step, "no accidental bridges transposed letter");
            Accidental::NoAccidental
        });
        Pitch::with_accidental(new_pitch, accidental)
    }

    /// Spelling and absolute accidental for this pitch in `key`
    fn spelled(&self, key: &Key) -> (Spelling, Accidental) {
        let accidental = self.resolved_accidental(key, NoAccidentalStrategy::UseKey);
        (spell_or_panic(self.pitch_in_octave(), accidental), accidental)
    }

    fn resolved_accidental(&self, key: &Key, strategy: NoAccidentalStrategy) -> Accidental {
        resolve_accidental(self.pitch_in_octave(), self.accidental, key, strategy)
    }

    /// Performance pitch to staff height and printed accidental.
    ///
    /// `accidental` is used as the spelling when it is valid for the pitch;
    /// otherwise `strategy` chooses one. The printed accidental is
    /// `NoAccidental` when the key signature already implies the spelling,
    /// `Natural` when a natural contradicts the signature, and the spelling's
    /// accidental otherwise.
    pub fn raw_pitch_to_display_pitch(
        pitch: i32,
        accidental: Accidental,
        clef: &Clef,
        key: &Key,
        strategy: NoAccidentalStrategy,
    ) -> DisplayPitch {
        let octave = pitch.div_euclid(12);
        let pitch_class = pitch.rem_euclid(12);

        let accidental = resolve_accidental(pitch_class, accidental, key, strategy);
        let spelling = spell_or_panic(pitch_class, accidental);

        let height = spelling.letter.height()
            + (octave + spelling.octave_shift - 5) * 7
            + clef.pitch_offset()
            - 7 * clef.octave();

        let signature = key.accidental_at_height(height, clef);
        let printed = if accidental.same_absolute(signature) {
            Accidental::NoAccidental
        } else if accidental.pitch_offset() == 0 {
            Accidental::Natural
        } else {
            accidental
        };

        DisplayPitch {
            height,
            accidental: printed,
        }
    }

    /// Staff height and printed accidental back to performance pitch.
    ///
    /// `NoAccidental` means whatever the key signature has at that height.
    /// With `ignore_offset` the clef's pitch offset is not removed first,
    /// which reads the height as if it were on a treble staff transposed by
    /// the clef's octave.
    pub fn display_pitch_to_raw_pitch(
        height: i32,
        accidental: Accidental,
        clef: &Clef,
        key: &Key,
        ignore_offset: bool,
    ) -> i32 {
        let accidental = match accidental {
            Accidental::NoAccidental => key.accidental_at_height(height, clef),
            explicit => explicit,
        };

        let mut height = height;
        if !ignore_offset {
            height -= clef.pitch_offset();
        }

        let mut octave = clef.octave() + height.div_euclid(7);
        let folded = height.rem_euclid(7);
        // Heights 5 and 6 are C and D, the start of the next octave
        if folded > 4 {
            octave += 1;
        }

        Letter::from_canonical_height(folded).natural_pitch_class()
            + accidental.pitch_offset()
            + 12 * (octave + 5)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.accidental {
            Accidental::NoAccidental => write!(f, "{}", self.pitch),
            acc => write!(f, "{} ({})", self.pitch, acc),
        }
    }
}

/// Absolute accidental for a pitch class: the requested one if it can spell
/// the pitch, else one chosen by `strategy`. Never `NoAccidental`.
fn resolve_accidental(
    pitch_class: i32,
    requested: Accidental,
    key: &Key,
    strategy: NoAccidentalStrategy,
) -> Accidental {
    if requested != Accidental::NoAccidental && spelling::is_valid(pitch_class, requested) {
        return requested;
    }
    resolve_no_accidental(pitch_class, key, strategy)
}

fn resolve_no_accidental(
    pitch_class: i32,
    key: &Key,
    strategy: NoAccidentalStrategy,
) -> Accidental {
    match strategy {
        NoAccidentalStrategy::UseKeySharpness => {
            let strategy = if key.is_sharp() {
                NoAccidentalStrategy::UseSharps
            } else {
                NoAccidentalStrategy::UseFlats
            };
            resolve_no_accidental(pitch_class, key, strategy)
        }
        NoAccidentalStrategy::UseSharps | NoAccidentalStrategy::UseFlats => {
            if let Some(accidental) = diatonic_accidental(pitch_class, key) {
                accidental
            } else if spelling::is_valid(pitch_class, Accidental::Natural) {
                Accidental::Natural
            } else if strategy == NoAccidentalStrategy::UseSharps {
                Accidental::Sharp
            } else {
                Accidental::Flat
            }
        }
        NoAccidentalStrategy::UseKey => {
            let minor = key.is_minor();
            let offset = (pitch_class - key.tonic_pitch()).rem_euclid(12);
            let step = ScaleType::for_stepping(minor).step_for_offset(offset);
            let signature = key.accidental_for_step(step);
            // Distance from the signature's own note on that step: -1 or +1
            // for a chromatic note, 0 for a diatonic one
            let correction = offset - ScaleType::for_signature(minor).interval_for_step(step);
            let total = signature.pitch_offset() + correction;
            let Ok(accidental) = Accidental::from_offset(total) else {
                unreachable!(
                    "key spelling of pitch class {pitch_class} in {key} needs offset {total}"
                );
            };
            accidental
        }
    }
}

/// The signature spelling of a pitch class in `key`, if it is in the scale
fn diatonic_accidental(pitch_class: i32, key: &Key) -> Option<Accidental> {
    Letter::ALL.into_iter().find_map(|letter| {
        let signature = key.accidental_for_letter(letter);
        let sounding = (letter.natural_pitch_class() + signature.pitch_offset()).rem_euclid(12);
        (sounding == pitch_class).then_some(match signature {
            Accidental::NoAccidental => Accidental::Natural,
            other => other,
        })
    })
}

fn spell_or_panic(pitch_class: i32, accidental: Accidental) -> Spelling {
    match spelling::spell(pitch_class, accidental) {
        Some(spelling) => spelling,
        None => panic!(
            "spelling table has no entry for pitch class {pitch_class} with {accidental}"
        ),
    }
}
