// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pitch spelling for staff notation.
//!
//! This module turns performance pitches (MIDI note numbers) into what gets
//! written on a staff: a height on the staff plus an accidental, and back
//! again. The pieces are:
//!
//! - [`Key`]: the thirty standard key signatures
//! - [`Clef`]: the standard clefs and their staff geometry
//! - [`Pitch`]: the spelling algorithm between pitch and staff height
//! - [`AccidentalTable`]: which accidentals actually get printed in a bar
//! - [`StaffSpeller`]: ties the above together for one staff

pub mod accidental;
pub mod accidental_table;
pub mod clef;
pub mod key;
pub mod pitch;
pub mod scale;
pub mod spelling;
pub mod staff;

pub use accidental::Accidental;
pub use accidental_table::{AccidentalTable, BarResetType, OctaveType};
pub use clef::{Clef, ClefType};
pub use key::{canonical_height, Key};
pub use pitch::{DisplayPitch, NoAccidentalStrategy, Pitch};
pub use scale::ScaleType;
pub use spelling::Letter;
pub use staff::{DisplayNote, SpellerSettings, StaffSpeller};

use thiserror::Error;

/// Errors from constructing notation values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("unknown key name: {0:?}")]
    BadKeyName(String),

    #[error("no key with {accidentals} accidentals (sharp: {sharp}, minor: {minor})")]
    BadKeySpec { accidentals: u8, sharp: bool, minor: bool },

    #[error("unknown clef name: {0:?}")]
    BadClefName(String),

    #[error("unknown accidental: {0:?}")]
    BadAccidentalName(String),

    #[error("no accidental alters pitch by {0} semitones")]
    BadAccidentalOffset(i32),
}
