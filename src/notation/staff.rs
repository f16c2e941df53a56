// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! One staff's worth of spelling state.
//!
//! `StaffSpeller` owns the key, clef and accidental table for a staff and
//! runs each chord through spelling and then accidental bookkeeping, so a
//! caller only has to report chords, barlines and clef/key changes in
//! order.

use tracing::debug;

use super::accidental::Accidental;
use super::accidental_table::{AccidentalTable, BarResetType, OctaveType};
use super::clef::Clef;
use super::key::Key;
use super::pitch::{NoAccidentalStrategy, Pitch};
use super::NotationError;
use crate::config::EngravingConfig;

/// Engraving choices that stay fixed for a staff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpellerSettings {
    pub octave_type: OctaveType,
    pub bar_reset: BarResetType,
    pub strategy: NoAccidentalStrategy,
}

/// A note ready for layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayNote {
    /// Staff height, 0 = bottom line
    pub height: i32,
    /// Accidental to print; `NoAccidental` prints nothing
    pub accidental: Accidental,
    /// Print the accidental as a reminder (bracketed)
    pub cautionary: bool,
    /// The pitch this note was spelled from
    pub pitch: Pitch,
}

/// Spells successive chords on one staff
#[derive(Debug, Clone)]
pub struct StaffSpeller {
    settings: SpellerSettings,
    table: AccidentalTable,
}

impl StaffSpeller {
    pub fn new(key: Key, clef: Clef, settings: SpellerSettings) -> Self {
        Self {
            settings,
            table: AccidentalTable::new(key, clef, settings.octave_type, settings.bar_reset),
        }
    }

    /// Build a speller from an engraving configuration
    pub fn from_config(config: &EngravingConfig) -> Result<Self, NotationError> {
        let key = config.resolve_key()?;
        let clef = config.resolve_clef()?;
        debug!(key = %key, clef = %clef, "staff speller from config");
        Ok(Self::new(key, clef, config.settings()))
    }

    pub fn key(&self) -> Key {
        self.table.key()
    }

    pub fn clef(&self) -> Clef {
        self.table.clef()
    }

    pub fn settings(&self) -> SpellerSettings {
        self.settings
    }

    /// Spell a single note (a one-note chord)
    pub fn spell_note(&mut self, pitch: Pitch) -> DisplayNote {
        let note = self.spell(pitch);
        self.table.update();
        note
    }

    /// Spell a chord. All notes are judged against the accidentals in force
    /// before the chord.
    pub fn spell_chord(&mut self, pitches: &[Pitch]) -> Vec<DisplayNote> {
        let notes: Vec<DisplayNote> = pitches.iter().map(|&pitch| self.spell(pitch)).collect();
        self.table.update();
        notes
    }

    fn spell(&mut self, pitch: Pitch) -> DisplayNote {
        let display = Pitch::raw_pitch_to_display_pitch(
            pitch.performance_pitch(),
            pitch.explicit_accidental(),
            &self.table.clef(),
            &self.table.key(),
            self.settings.strategy,
        );
        let mut cautionary = false;
        let accidental = self
            .table
            .process_display_accidental(display.accidental, display.height, &mut cautionary);
        DisplayNote {
            height: display.height,
            accidental,
            cautionary,
            pitch,
        }
    }

    /// A barline
    pub fn bar_line(&mut self) {
        self.table.new_bar();
    }

    /// A clef change; accidentals already in the bar stay in force
    pub fn clef_change(&mut self, clef: Clef) {
        debug!(clef = %clef, "clef change");
        self.table.new_clef(clef);
    }

    /// A key change. The new signature cancels everything before it.
    pub fn key_change(&mut self, key: Key) {
        debug!(key = %key, "key change");
        self.table = AccidentalTable::new(
            key,
            self.table.clef(),
            self.settings.octave_type,
            self.settings.bar_reset,
        );
    }
}
