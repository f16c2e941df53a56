// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Note letters and the forward spelling table.
//!
//! `SPELLINGS` answers one question: given a pitch class and the accidental
//! it is to be written with, which letter is written and does that letter
//! belong to a neighbouring octave? Every legal combination has an entry,
//! every illegal one is `None`, so the table doubles as the accidental
//! validity check.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::accidental::Accidental;

/// A natural note letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    /// All letters from C upward
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// Position from C (C = 0 .. B = 6)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Letter at a position from C, wrapping
    pub fn from_index(index: i32) -> Self {
        Letter::ALL[index.rem_euclid(7) as usize]
    }

    /// Pitch class of the unaltered letter
    pub fn natural_pitch_class(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    /// Treble-clef height of the letter in the octave starting at middle C,
    /// shifted into the window -2..=4 (C4 = -2, E4 = 0, B4 = 4)
    pub fn height(self) -> i32 {
        self.index() as i32 - 2
    }

    /// Letter for a natural pitch class, if there is one
    pub fn from_natural_pitch_class(pitch_class: i32) -> Option<Self> {
        let pitch_class = pitch_class.rem_euclid(12);
        Letter::ALL
            .into_iter()
            .find(|l| l.natural_pitch_class() == pitch_class)
    }

    /// Letter written on a canonical (0..=6) treble height; 0 is E
    pub fn from_canonical_height(height: i32) -> Self {
        Letter::from_index(height + 2)
    }

    /// Parse a letter, case-insensitive
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Where a (pitch class, accidental) pair is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spelling {
    pub letter: Letter,
    /// -1 when the letter belongs to the octave below (B#, B##),
    /// +1 when it belongs to the octave above (Cb, Cbb)
    pub octave_shift: i32,
}

const fn same(letter: Letter) -> Option<Spelling> {
    Some(Spelling { letter, octave_shift: 0 })
}

const fn below(letter: Letter) -> Option<Spelling> {
    Some(Spelling { letter, octave_shift: -1 })
}

const fn above(letter: Letter) -> Option<Spelling> {
    Some(Spelling { letter, octave_shift: 1 })
}

const NONE: Option<Spelling> = None;

use Letter::{A, B, C, D, E, F, G};

/// Columns: natural, sharp, flat, double-sharp, double-flat
static SPELLINGS: [[Option<Spelling>; 5]; 12] = [
    /* 0  */ [same(C), below(B), NONE, NONE, same(D)],
    /* 1  */ [NONE, same(C), same(D), below(B), NONE],
    /* 2  */ [same(D), NONE, NONE, same(C), same(E)],
    /* 3  */ [NONE, same(D), same(E), NONE, same(F)],
    /* 4  */ [same(E), NONE, same(F), same(D), NONE],
    /* 5  */ [same(F), same(E), NONE, NONE, same(G)],
    /* 6  */ [NONE, same(F), same(G), same(E), NONE],
    /* 7  */ [same(G), NONE, NONE, same(F), same(A)],
    /* 8  */ [NONE, same(G), same(A), NONE, NONE],
    /* 9  */ [same(A), NONE, NONE, same(G), same(B)],
    /* 10 */ [NONE, same(A), same(B), NONE, above(C)],
    /* 11 */ [same(B), NONE, above(C), same(A), NONE],
];

fn column(accidental: Accidental) -> usize {
    match accidental {
        Accidental::NoAccidental | Accidental::Natural => 0,
        Accidental::Sharp => 1,
        Accidental::Flat => 2,
        Accidental::DoubleSharp => 3,
        Accidental::DoubleFlat => 4,
    }
}

/// Look up how a pitch class is written with an explicit accidental.
///
/// `NoAccidental` is read as natural here; interpreting it against a key is
/// the caller's business.
pub fn spell(pitch_class: i32, accidental: Accidental) -> Option<Spelling> {
    SPELLINGS[pitch_class.rem_euclid(12) as usize][column(accidental)]
}

/// Whether `accidental` can be applied to a letter to reach `pitch_class`
pub fn is_valid(pitch_class: i32, accidental: Accidental) -> bool {
    spell(pitch_class, accidental).is_some()
}
