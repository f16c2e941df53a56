// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Accidentals and their semitone offsets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::NotationError;

/// An accidental attached to a note or implied by a key signature.
///
/// `NoAccidental` means "nothing written": when a note is displayed it defers
/// to the key signature (and to accidentals already in force in the bar).
/// `Natural` is an explicit natural sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Accidental {
    #[default]
    NoAccidental,
    Natural,
    Sharp,
    Flat,
    DoubleSharp,
    DoubleFlat,
}

impl Accidental {
    /// All accidentals, `NoAccidental` first
    pub const ALL: [Accidental; 6] = [
        Accidental::NoAccidental,
        Accidental::Natural,
        Accidental::Sharp,
        Accidental::Flat,
        Accidental::DoubleSharp,
        Accidental::DoubleFlat,
    ];

    /// Semitone adjustment applied to the natural letter
    pub fn pitch_offset(self) -> i32 {
        match self {
            Accidental::NoAccidental | Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
            Accidental::DoubleSharp => 2,
            Accidental::DoubleFlat => -2,
        }
    }

    /// Accidental for a semitone offset in -2..=2.
    ///
    /// An offset of zero yields `Natural`, never `NoAccidental`.
    pub fn from_offset(offset: i32) -> Result<Self, NotationError> {
        match offset {
            -2 => Ok(Accidental::DoubleFlat),
            -1 => Ok(Accidental::Flat),
            0 => Ok(Accidental::Natural),
            1 => Ok(Accidental::Sharp),
            2 => Ok(Accidental::DoubleSharp),
            _ => Err(NotationError::BadAccidentalOffset(offset)),
        }
    }

    /// Canonical lower-case name ("sharp", "double-flat", ...)
    pub fn name(self) -> &'static str {
        match self {
            Accidental::NoAccidental => "no-accidental",
            Accidental::Natural => "natural",
            Accidental::Sharp => "sharp",
            Accidental::Flat => "flat",
            Accidental::DoubleSharp => "double-sharp",
            Accidental::DoubleFlat => "double-flat",
        }
    }

    /// Suffix used in note names such as "F#" or "Bbb"
    pub fn symbol(self) -> &'static str {
        match self {
            Accidental::NoAccidental => "",
            Accidental::Natural => "n",
            Accidental::Sharp => "#",
            Accidental::Flat => "b",
            Accidental::DoubleSharp => "##",
            Accidental::DoubleFlat => "bb",
        }
    }

    /// Parse a note-name suffix ("", "n", "#", "b", "##", "bb")
    pub fn from_symbol(s: &str) -> Option<Self> {
        Accidental::ALL.into_iter().find(|acc| acc.symbol() == s)
    }

    /// True for `Sharp` and `DoubleSharp`
    pub fn is_sharp(self) -> bool {
        self.pitch_offset() > 0
    }

    /// True for `Flat` and `DoubleFlat`
    pub fn is_flat(self) -> bool {
        self.pitch_offset() < 0
    }

    /// Treats `NoAccidental` and `Natural` as the same absolute accidental
    pub fn same_absolute(self, other: Accidental) -> bool {
        self.pitch_offset() == other.pitch_offset()
    }
}

impl fmt::Display for Accidental {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Accidental {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "no-accidental" | "none" | "" => Ok(Accidental::NoAccidental),
            "natural" => Ok(Accidental::Natural),
            "sharp" => Ok(Accidental::Sharp),
            "flat" => Ok(Accidental::Flat),
            "double-sharp" => Ok(Accidental::DoubleSharp),
            "double-flat" => Ok(Accidental::DoubleFlat),
            _ => Err(NotationError::BadAccidentalName(s.to_string())),
        }
    }
}
