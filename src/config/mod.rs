// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Engraving configuration.
//!
//! A small file describing how a staff is engraved: starting key and clef,
//! how accidentals carry between octaves and across barlines, and how
//! unspelled pitches are spelled. YAML is the primary format; files ending
//! in `.toml` are read as TOML.
//!
//! ```yaml
//! key: Eb major
//! clef: bass
//! octave_type: cautionary
//! bar_reset: explicit
//! strategy: use_key_sharpness
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::notation::{
    BarResetType, Clef, Key, NoAccidentalStrategy, NotationError, OctaveType, SpellerSettings,
};

/// Engraving settings for a staff
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngravingConfig {
    /// Key name, e.g. "Eb major" or "F# minor"
    #[serde(default = "default_key")]
    pub key: String,
    /// Clef name, e.g. "treble" or "alto"
    #[serde(default = "default_clef")]
    pub clef: String,
    /// Octave transposition of the clef (1 for "treble 8va")
    #[serde(default)]
    pub clef_octave: i32,
    #[serde(default)]
    pub octave_type: OctaveType,
    #[serde(default)]
    pub bar_reset: BarResetType,
    #[serde(default)]
    pub strategy: NoAccidentalStrategy,
}

fn default_key() -> String {
    "C major".to_string()
}
fn default_clef() -> String {
    "treble".to_string()
}

impl Default for EngravingConfig {
    fn default() -> Self {
        Self {
            key: default_key(),
            clef: default_clef(),
            clef_octave: 0,
            octave_type: OctaveType::default(),
            bar_reset: BarResetType::default(),
            strategy: NoAccidentalStrategy::default(),
        }
    }
}

impl EngravingConfig {
    /// Load a configuration file; `.toml` files are TOML, anything else YAML
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let parsed = if is_toml {
            Self::from_toml(&contents)
        } else {
            Self::from_yaml(&contents)
        };
        parsed.with_context(|| format!("Invalid config file: {:?}", path))
    }

    /// Parse a configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Parse a configuration from TOML string
    pub fn from_toml(toml: &str) -> Result<Self> {
        toml::from_str(toml).context("Failed to parse TOML configuration")
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))
    }

    pub fn resolve_key(&self) -> Result<Key, NotationError> {
        Key::new(&self.key)
    }

    pub fn resolve_clef(&self) -> Result<Clef, NotationError> {
        Clef::new(&self.clef, self.clef_octave)
    }

    /// The per-staff engraving choices
    pub fn settings(&self) -> SpellerSettings {
        SpellerSettings {
            octave_type: self.octave_type,
            bar_reset: self.bar_reset,
            strategy: self.strategy,
        }
    }
}
