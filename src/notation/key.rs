// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Key signatures.
//!
//! A `Key` is a handle onto one entry of a fixed, process-wide table of the
//! thirty standard major and minor keys (0 to 7 sharps or flats). The table
//! is built on first use behind a `OnceLock` and never changes afterwards,
//! so keys are `Copy` and can be shared freely between threads.
//!
//! Keys compare and order by name only: "B major" and "Cb major" are
//! different keys even though they sound the same.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::accidental::Accidental;
use super::clef::Clef;
use super::pitch::Pitch;
use super::spelling::Letter;
use super::NotationError;

/// Static facts about one key
#[derive(Debug, Clone, Copy)]
struct KeyDetails {
    sharps: bool,
    minor: bool,
    accidental_count: u8,
    equivalence: &'static str,
    legacy_name: &'static str,
    tonic_pitch: i32,
}

/// The key table, ordered by name, plus a tonic index built from it
struct Registry {
    by_name: BTreeMap<&'static str, KeyDetails>,
    /// First key (in name order) for each tonic pitch class; [major, minor]
    by_tonic: [[&'static str; 12]; 2],
}

#[rustfmt::skip]
const KEY_TABLE: [(&str, bool, bool, u8, &str, &str, i32); 30] = [
    // name        sharps minor count equivalence   legacy name    tonic
    ("C major",    true,  false, 0, "A minor",  "C Major",  0),
    ("G major",    true,  false, 1, "E minor",  "G Major",  7),
    ("D major",    true,  false, 2, "B minor",  "D Major",  2),
    ("A major",    true,  false, 3, "F# minor", "A Major",  9),
    ("E major",    true,  false, 4, "C# minor", "E Major",  4),
    ("B major",    true,  false, 5, "G# minor", "B Major",  11),
    ("F# major",   true,  false, 6, "D# minor", "F# Major", 6),
    ("C# major",   true,  false, 7, "A# minor", "C# Major", 1),
    ("F major",    false, false, 1, "D minor",  "F Major",  5),
    ("Bb major",   false, false, 2, "G minor",  "Bb Major", 10),
    ("Eb major",   false, false, 3, "C minor",  "Eb Major", 3),
    ("Ab major",   false, false, 4, "F minor",  "Ab Major", 8),
    ("Db major",   false, false, 5, "Bb minor", "Db Major", 1),
    ("Gb major",   false, false, 6, "Eb minor", "Gb Major", 6),
    ("Cb major",   false, false, 7, "Ab minor", "Cb Major", 11),
    ("A minor",    true,  true,  0, "C major",  "A Minor",  9),
    ("E minor",    true,  true,  1, "G major",  "E Minor",  4),
    ("B minor",    true,  true,  2, "D major",  "B Minor",  11),
    ("F# minor",   true,  true,  3, "A major",  "F# Minor", 6),
    ("C# minor",   true,  true,  4, "E major",  "C# Minor", 1),
    ("G# minor",   true,  true,  5, "B major",  "G# Minor", 8),
    ("D# minor",   true,  true,  6, "F# major", "D# Minor", 3),
    ("A# minor",   true,  true,  7, "C# major", "A# Minor", 10),
    ("D minor",    false, true,  1, "F major",  "D Minor",  2),
    ("G minor",    false, true,  2, "Bb major", "G Minor",  7),
    ("C minor",    false, true,  3, "Eb major", "C Minor",  0),
    ("F minor",    false, true,  4, "Ab major", "F Minor",  5),
    ("Bb minor",   false, true,  5, "Db major", "Bb Minor", 10),
    ("Eb minor",   false, true,  6, "Gb major", "Eb Minor", 3),
    ("Ab minor",   false, true,  7, "Cb major", "Ab Minor", 8),
];

fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let by_name: BTreeMap<&'static str, KeyDetails> = KEY_TABLE
            .iter()
            .map(|&(name, sharps, minor, accidental_count, equivalence, legacy_name, tonic_pitch)| {
                (
                    name,
                    KeyDetails {
                        sharps,
                        minor,
                        accidental_count,
                        equivalence,
                        legacy_name,
                        tonic_pitch,
                    },
                )
            })
            .collect();

        // Ambiguous tonics (B major / Cb major, ...) go to the name that
        // sorts first
        let mut by_tonic = [[""; 12]; 2];
        for (&name, details) in &by_name {
            let slot = &mut by_tonic[details.minor as usize][details.tonic_pitch as usize];
            if slot.is_empty() {
                *slot = name;
            }
        }
        assert!(
            by_tonic.iter().flatten().all(|name| !name.is_empty()),
            "key table must cover every tonic in both modes"
        );

        debug!(keys = by_name.len(), "built key registry");
        Registry { by_name, by_tonic }
    })
}

/// Fold a staff height into one octave (0..=6)
pub fn canonical_height(height: i32) -> i32 {
    height.rem_euclid(7)
}

/// A key signature
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Key {
    name: &'static str,
}

impl Key {
    /// Look a key up by name, e.g. "Eb major" or "F# minor"
    pub fn new(name: &str) -> Result<Self, NotationError> {
        registry()
            .by_name
            .get_key_value(name.trim())
            .map(|(&name, _)| Key { name })
            .ok_or_else(|| NotationError::BadKeyName(name.to_string()))
    }

    /// The key with this many sharps or flats.
    ///
    /// With no accidentals, `sharp` is ignored.
    pub fn from_signature(
        accidental_count: u8,
        sharp: bool,
        minor: bool,
    ) -> Result<Self, NotationError> {
        registry()
            .by_name
            .iter()
            .find(|(_, d)| {
                d.accidental_count == accidental_count
                    && d.minor == minor
                    && (d.sharps == sharp || d.accidental_count == 0)
            })
            .map(|(&name, _)| Key { name })
            .ok_or(NotationError::BadKeySpec {
                accidentals: accidental_count,
                sharp,
                minor,
            })
    }

    /// The key with this tonic pitch class.
    ///
    /// Some tonics have two spellings in the table (B major and Cb major,
    /// F# major and Gb major, ...). The one whose name sorts first wins, so
    /// tonic 11 major is "B major" and tonic 8 minor is "Ab minor".
    pub fn from_tonic(tonic_pitch: i32, minor: bool) -> Self {
        Key {
            name: registry().by_tonic[minor as usize][tonic_pitch.rem_euclid(12) as usize],
        }
    }

    /// The key whose tonic is spelled `letter` + `accidental`, e.g.
    /// (B, Flat, false) for "Bb major"
    pub fn from_tonic_spelling(
        letter: Letter,
        accidental: Accidental,
        minor: bool,
    ) -> Result<Self, NotationError> {
        let suffix = match accidental {
            Accidental::Natural => "",
            other => other.symbol(),
        };
        let mode = if minor { "minor" } else { "major" };
        Key::new(&format!("{}{} {}", letter, suffix, mode))
    }

    /// Look a key up by its legacy name, e.g. "Bb Major"
    pub fn from_legacy_name(legacy_name: &str) -> Result<Self, NotationError> {
        registry()
            .by_name
            .iter()
            .find(|(_, d)| d.legacy_name == legacy_name)
            .map(|(&name, _)| Key { name })
            .ok_or_else(|| NotationError::BadKeyName(legacy_name.to_string()))
    }

    /// All major or all minor keys, in name order
    pub fn keys(minor: bool) -> Vec<Key> {
        registry()
            .by_name
            .iter()
            .filter(|(_, d)| d.minor == minor)
            .map(|(&name, _)| Key { name })
            .collect()
    }

    /// Every key in the table, in name order
    pub fn all() -> Vec<Key> {
        registry().by_name.keys().map(|&name| Key { name }).collect()
    }

    pub fn is_valid_name(name: &str) -> bool {
        registry().by_name.contains_key(name.trim())
    }

    fn details(&self) -> &'static KeyDetails {
        &registry().by_name[self.name]
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_minor(&self) -> bool {
        self.details().minor
    }

    /// Whether the signature uses sharps. True for C major and A minor.
    pub fn is_sharp(&self) -> bool {
        self.details().sharps
    }

    pub fn accidental_count(&self) -> u8 {
        self.details().accidental_count
    }

    pub fn tonic_pitch(&self) -> i32 {
        self.details().tonic_pitch
    }

    /// The other key with the same signature (relative major or minor)
    pub fn equivalence(&self) -> Key {
        Key {
            name: self.details().equivalence,
        }
    }

    pub fn legacy_name(&self) -> &'static str {
        self.details().legacy_name
    }

    /// Letter of the tonic as spelled in the key's name
    pub fn tonic_letter(&self) -> Letter {
        self.name
            .chars()
            .next()
            .and_then(Letter::from_char)
            .unwrap_or(Letter::C)
    }

    /// Accidental of the tonic as spelled in the key's name
    pub fn tonic_accidental(&self) -> Accidental {
        let suffix = self.name[1..].split(' ').next().unwrap_or("");
        Accidental::from_symbol(suffix).unwrap_or(Accidental::NoAccidental)
    }

    /// Treble-clef heights of the signature's accidentals in insertion order
    fn signature_heights(&self) -> Vec<i32> {
        let sharp = self.is_sharp();
        let mut height = if sharp { 8 } else { 4 };
        let mut heights = Vec::with_capacity(self.accidental_count() as usize);
        for _ in 0..self.accidental_count() {
            heights.push(height);
            if sharp {
                height -= 3;
                if height < 3 {
                    height += 7;
                }
            } else {
                height += 3;
                if height > 7 {
                    height -= 7;
                }
            }
        }
        heights
    }

    /// Heights at which the signature is drawn on a staff with this clef
    pub fn accidental_heights(&self, clef: &Clef) -> Vec<i32> {
        let offset = clef.pitch_offset();
        self.signature_heights()
            .into_iter()
            .map(|h| {
                let h = h + offset;
                // Only fold what the clef pushed off the staff
                if offset > 0 && h > 8 {
                    h - 7
                } else if offset < 0 && h < 0 {
                    h + 7
                } else {
                    h
                }
            })
            .collect()
    }

    /// The signature's accidental at a staff height, in any octave
    pub fn accidental_at_height(&self, height: i32, clef: &Clef) -> Accidental {
        let target = canonical_height(height);
        let offset = clef.pitch_offset();
        let in_signature = self
            .signature_heights()
            .into_iter()
            .any(|h| canonical_height(h + offset) == target);
        if !in_signature {
            Accidental::NoAccidental
        } else if self.is_sharp() {
            Accidental::Sharp
        } else {
            Accidental::Flat
        }
    }

    /// The signature's accidental on a letter
    pub fn accidental_for_letter(&self, letter: Letter) -> Accidental {
        self.accidental_at_height(letter.height(), &Clef::default())
    }

    /// The signature's accidental on a scale step (0 = tonic).
    ///
    /// Walks the order in which accidentals are added to signatures.
    /// Counted from a major tonic, sharps land on steps 6, 2, 5, 1, 4, 0, 3
    /// (F C G D A E B in C) and flats on 3, 0, 4, 1, 5, 2, 6 (B E A D G C F
    /// in C). Minor keys are shifted onto their relative major first.
    pub fn accidental_for_step(&self, step: usize) -> Accidental {
        let step = if self.is_minor() { (step + 5) % 7 } else { step % 7 };
        let sharp = self.is_sharp();
        let (mut current, stride) = if sharp { (6, 3) } else { (3, 4) };
        for _ in 0..self.accidental_count() {
            if current == step {
                return if sharp { Accidental::Sharp } else { Accidental::Flat };
            }
            current = (current + stride) % 7;
        }
        Accidental::NoAccidental
    }

    /// Transpose the key by moving its tonic.
    ///
    /// `height_delta` decides the tonic's new letter, so the result keeps
    /// the intended spelling when the table has it; otherwise it falls back
    /// to the key with the same tonic pitch class.
    pub fn transpose(&self, pitch_delta: i32, height_delta: i32) -> Key {
        let tonic = Pitch::with_accidental(60 + self.tonic_pitch(), self.tonic_accidental());
        let new_tonic = tonic.transpose(self, pitch_delta, height_delta);

        if let Some(letter) = new_tonic.written_letter() {
            let accidental = new_tonic.explicit_accidental();
            match Key::from_tonic_spelling(letter, accidental, self.is_minor()) {
                Ok(key) => return key,
                Err(e) => debug!(error = %e, "transposed key not in table, using tonic pitch"),
            }
        }
        Key::from_tonic(new_tonic.pitch_in_octave(), self.is_minor())
    }
}

impl Default for Key {
    fn default() -> Self {
        Key { name: "C major" }
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self.name)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl FromStr for Key {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Key::new(s)
    }
}

impl TryFrom<String> for Key {
    type Error = NotationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Key::new(&value)
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.name.to_string()
    }
}
