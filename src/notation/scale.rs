// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Fixed diatonic scale tables.
//!
//! Spelling works in terms of scale steps (0-6) counted from a tonic. These
//! tables map semitone distances from the tonic to steps and back.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The diatonic scale shapes used for spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleType {
    Major,
    NaturalMinor,
    HarmonicMinor,
}

impl ScaleType {
    /// Semitones from the tonic for each step
    pub fn intervals(self) -> &'static [i32; 7] {
        match self {
            ScaleType::Major => &[0, 2, 4, 5, 7, 9, 11],
            ScaleType::NaturalMinor => &[0, 2, 3, 5, 7, 8, 10],
            ScaleType::HarmonicMinor => &[0, 2, 3, 5, 7, 8, 11],
        }
    }

    /// Scale step for each semitone distance from the tonic (0-11).
    ///
    /// Chromatic notes go to the step they are most often written as an
    /// alteration of: in major #1, b3, #4, b6, b7; in minor b2, #3, #4, #6
    /// and the raised leading tone #7.
    pub fn steps(self) -> &'static [usize; 12] {
        match self {
            ScaleType::Major => &[0, 0, 1, 2, 2, 3, 3, 4, 5, 5, 6, 6],
            ScaleType::NaturalMinor | ScaleType::HarmonicMinor => {
                &[0, 1, 1, 2, 2, 3, 3, 4, 5, 5, 6, 6]
            }
        }
    }

    /// Step for a semitone distance from the tonic, wrapping
    pub fn step_for_offset(self, semitones: i32) -> usize {
        self.steps()[semitones.rem_euclid(12) as usize]
    }

    /// Semitone distance from the tonic to a step, wrapping steps past 6
    pub fn interval_for_step(self, step: usize) -> i32 {
        self.intervals()[step % 7]
    }

    /// Scale used to choose steps for a key: major, or harmonic minor
    pub fn for_stepping(minor: bool) -> Self {
        if minor {
            ScaleType::HarmonicMinor
        } else {
            ScaleType::Major
        }
    }

    /// Scale implied by a key signature: major, or natural minor
    pub fn for_signature(minor: bool) -> Self {
        if minor {
            ScaleType::NaturalMinor
        } else {
            ScaleType::Major
        }
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            ScaleType::Major => "Major",
            ScaleType::NaturalMinor => "Natural Minor",
            ScaleType::HarmonicMinor => "Harmonic Minor",
        }
    }
}

impl fmt::Display for ScaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
