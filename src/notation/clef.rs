// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Clefs.
//!
//! A clef is a clef type plus an octave offset (for "treble 8va" and the
//! like). Everything else is a fixed table lookup on the type.
//!
//! Staff heights count lines and spaces upward from the bottom line, which
//! is height 0. In treble clef the bottom line is E4.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::NotationError;

/// The standard clef types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClefType {
    Treble,
    French,
    Soprano,
    Mezzosoprano,
    Alto,
    Tenor,
    Baritone,
    Varbaritone,
    Bass,
    Subbass,
    TwoBar,
}

/// Per-type constants: name, octave, pitch offset, axis height
struct ClefDetails {
    name: &'static str,
    octave: i32,
    pitch_offset: i32,
    axis_height: i32,
}

impl ClefType {
    /// All clef types in table order
    pub const ALL: [ClefType; 11] = [
        ClefType::Treble,
        ClefType::French,
        ClefType::Soprano,
        ClefType::Mezzosoprano,
        ClefType::Alto,
        ClefType::Tenor,
        ClefType::Baritone,
        ClefType::Varbaritone,
        ClefType::Bass,
        ClefType::Subbass,
        ClefType::TwoBar,
    ];

    fn details(self) -> &'static ClefDetails {
        const fn clef(
            name: &'static str,
            octave: i32,
            pitch_offset: i32,
            axis_height: i32,
        ) -> ClefDetails {
            ClefDetails {
                name,
                octave,
                pitch_offset,
                axis_height,
            }
        }
        static TABLE: [ClefDetails; 11] = [
            clef("treble", 0, 0, 2),
            clef("french", 0, -2, 0),
            clef("soprano", -1, -5, 0),
            clef("mezzosoprano", -1, -3, 2),
            clef("alto", -1, -1, 4),
            clef("tenor", -1, 1, 6),
            clef("baritone", -1, 3, 8),
            clef("varbaritone", -2, -4, 4),
            clef("bass", -2, -2, 6),
            clef("subbass", -2, 0, 8),
            clef("twobar", 0, 0, 4),
        ];
        &TABLE[self as usize]
    }

    /// Name used for lookup and display
    pub fn name(self) -> &'static str {
        self.details().name
    }

    /// Look a clef type up by name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        ClefType::ALL.into_iter().find(|t| t.name() == name)
    }
}

/// A clef type with an octave transposition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Clef {
    clef_type: ClefType,
    octave_offset: i32,
}

impl Clef {
    /// Create a clef from its name, e.g. `Clef::new("bass", 0)`
    pub fn new(name: &str, octave_offset: i32) -> Result<Self, NotationError> {
        let clef_type =
            ClefType::from_name(name).ok_or_else(|| NotationError::BadClefName(name.to_string()))?;
        Ok(Self::from_type(clef_type, octave_offset))
    }

    /// Create a clef from a known type
    pub fn from_type(clef_type: ClefType, octave_offset: i32) -> Self {
        Self {
            clef_type,
            octave_offset,
        }
    }

    /// Every standard clef with no octave offset
    pub fn clefs() -> Vec<Clef> {
        ClefType::ALL
            .into_iter()
            .map(|t| Clef::from_type(t, 0))
            .collect()
    }

    /// Whether `name` names a standard clef
    pub fn is_valid_name(name: &str) -> bool {
        ClefType::from_name(name).is_some()
    }

    pub fn clef_type(&self) -> ClefType {
        self.clef_type
    }

    pub fn name(&self) -> &'static str {
        self.clef_type.name()
    }

    pub fn octave_offset(&self) -> i32 {
        self.octave_offset
    }

    /// Octave displacement of the clef's reference pitch, including the
    /// clef's own octave offset
    pub fn octave(&self) -> i32 {
        self.clef_type.details().octave + self.octave_offset
    }

    /// Staff height displacement relative to treble clef, within one octave
    pub fn pitch_offset(&self) -> i32 {
        self.clef_type.details().pitch_offset
    }

    /// Height of the line the clef symbol sits on
    pub fn axis_height(&self) -> i32 {
        self.clef_type.details().axis_height
    }

    /// Combined octave and pitch-offset transposition
    pub fn transpose(&self) -> i32 {
        self.octave() * 12 - self.pitch_offset()
    }
}

impl Default for Clef {
    fn default() -> Self {
        Self::from_type(ClefType::Treble, 0)
    }
}

impl fmt::Display for Clef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.octave_offset == 0 {
            write!(f, "{}", self.name())
        } else {
            write!(f, "{} ({:+} octave)", self.name(), self.octave_offset)
        }
    }
}

impl FromStr for Clef {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Clef::new(s, 0)
    }
}
