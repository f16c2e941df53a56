// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Stave: pitch spelling for staff notation.
//!
//! Converts performance pitches into staff heights and accidentals under a
//! key signature and clef, and decides which accidentals a bar actually
//! needs printed.
//!
//! ```no_run
//! use stave::notation::{Clef, Key, Pitch, SpellerSettings, StaffSpeller};
//!
//! let key = Key::new("D major")?;
//! let mut staff = StaffSpeller::new(key, Clef::default(), SpellerSettings::default());
//! let note = staff.spell_note(Pitch::new(66));
//! assert_eq!(note.height, 1);
//! # Ok::<(), stave::notation::NotationError>(())
//! ```

pub mod config;
pub mod notation;

pub use config::EngravingConfig;
pub use notation::{
    Accidental, AccidentalTable, Clef, DisplayNote, Key, NotationError, Pitch, StaffSpeller,
};
