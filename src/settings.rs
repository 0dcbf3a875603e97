//! Tuning parameters for focusing and character control.
//!
//! Defaults come from [`crate::constants`]. Hosts may override them from a
//! JSON document via [`GameSettings::load`]; every loaded document is
//! validated before use.

use std::fs;
use std::path::Path;

use bevy::prelude::Resource;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    ARM_LENGTH, DEBUG_DRAW_SECONDS, FOCUS_INTERP_SPEED, FOCUS_SEARCH_RADIUS, INDICATOR_OFFSET_X,
    INDICATOR_OFFSET_Y, LOOK_SENSITIVITY, MOVE_SPEED, PITCH_LIMIT_DEGREES, PIVOT_HEIGHT,
    PROBE_HALF_EXTENT, ROTATION_RATE_DEGREES, SWEEP_START_OFFSET,
};
use crate::targeting::CandidateOrder;

/// Configuration for target acquisition and the focus camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusSettings {
    /// Maximum sweep distance and the range beyond which focus is dropped.
    pub search_radius: f32,
    /// Half extents of the acquisition probe.
    pub probe_half_extents: Vec3,
    /// Distance ahead of the camera where the probe starts.
    pub sweep_start_offset: f32,
    /// Exponential smoothing speed for the aim rotation, per second.
    pub interp_speed: f32,
    /// Screen-space offset applied to the focus indicator.
    pub indicator_offset: Vec2,
    /// Height added to the target position before aiming at it.
    pub target_height_offset: f32,
    /// Ordering policy for acquired candidates.
    pub candidate_order: CandidateOrder,
    /// How long sweep debug shapes stay on screen. Zero disables them.
    pub debug_draw_seconds: f32,
}

impl Default for FocusSettings {
    fn default() -> Self {
        Self {
            search_radius: FOCUS_SEARCH_RADIUS,
            probe_half_extents: Vec3::splat(PROBE_HALF_EXTENT),
            sweep_start_offset: SWEEP_START_OFFSET,
            interp_speed: FOCUS_INTERP_SPEED,
            indicator_offset: Vec2::new(INDICATOR_OFFSET_X, INDICATOR_OFFSET_Y),
            target_height_offset: 0.0,
            candidate_order: CandidateOrder::default(),
            debug_draw_seconds: DEBUG_DRAW_SECONDS,
        }
    }
}

impl FocusSettings {
    /// Checks the invariants acquisition relies on.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.search_radius.is_finite() && self.search_radius > 0.0) {
            return Err(SettingsError::invalid("search_radius", "must be positive"));
        }
        if !(self.sweep_start_offset >= 0.0 && self.sweep_start_offset < self.search_radius) {
            return Err(SettingsError::invalid(
                "sweep_start_offset",
                "must lie in [0, search_radius)",
            ));
        }
        if !(self.probe_half_extents.is_finite() && self.probe_half_extents.min_element() > 0.0) {
            return Err(SettingsError::invalid(
                "probe_half_extents",
                "every axis must be positive",
            ));
        }
        if !(self.interp_speed >= 0.0) {
            return Err(SettingsError::invalid("interp_speed", "must not be negative"));
        }
        if !(self.debug_draw_seconds >= 0.0) {
            return Err(SettingsError::invalid(
                "debug_draw_seconds",
                "must not be negative",
            ));
        }
        Ok(())
    }
}

/// Configuration for character movement, free look and the camera arm.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterSettings {
    /// Walking speed in world units per second.
    pub move_speed: f32,
    /// Turn rate when facing the movement direction, degrees per second.
    pub rotation_rate: f32,
    /// Radians of aim rotation per unit of look input.
    pub look_sensitivity: f32,
    /// Free-look pitch limit in degrees, applied symmetrically.
    pub pitch_limit: f32,
    /// Distance from the pivot to the camera.
    pub arm_length: f32,
    /// Height of the camera pivot above the character origin.
    pub pivot_height: f32,
}

impl Default for CharacterSettings {
    fn default() -> Self {
        Self {
            move_speed: MOVE_SPEED,
            rotation_rate: ROTATION_RATE_DEGREES,
            look_sensitivity: LOOK_SENSITIVITY,
            pitch_limit: PITCH_LIMIT_DEGREES,
            arm_length: ARM_LENGTH,
            pivot_height: PIVOT_HEIGHT,
        }
    }
}

impl CharacterSettings {
    /// Turn rate in radians per second.
    #[must_use]
    pub const fn rotation_rate_radians(&self) -> f32 {
        self.rotation_rate.to_radians()
    }

    /// Pitch limit in radians.
    #[must_use]
    pub const fn pitch_limit_radians(&self) -> f32 {
        self.pitch_limit.to_radians()
    }

    /// Checks that speeds and distances are usable.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let non_negative = [
            ("move_speed", self.move_speed),
            ("rotation_rate", self.rotation_rate),
            ("look_sensitivity", self.look_sensitivity),
            ("arm_length", self.arm_length),
        ];
        if let Some((field, _)) = non_negative.iter().find(|(_, value)| !(*value >= 0.0)) {
            return Err(SettingsError::invalid(field, "must not be negative"));
        }
        if !(self.pitch_limit > 0.0 && self.pitch_limit < 90.0) {
            return Err(SettingsError::invalid("pitch_limit", "must lie in (0, 90)"));
        }
        if !self.pivot_height.is_finite() {
            return Err(SettingsError::invalid("pivot_height", "must be finite"));
        }
        Ok(())
    }
}

/// Complete settings document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Focus and acquisition tuning.
    pub focus: FocusSettings,
    /// Movement and camera tuning.
    pub character: CharacterSettings,
}

impl GameSettings {
    /// Parses and validates a JSON settings document.
    ///
    /// Missing fields fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Parse`] for malformed JSON and
    /// [`SettingsError::Invalid`] when a value is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use soulslike::settings::GameSettings;
    ///
    /// let settings = GameSettings::from_json_str(r#"{ "focus": { "search_radius": 2000.0 } }"#)
    ///     .unwrap();
    /// assert_eq!(settings.focus.search_radius, 2000.0);
    /// assert_eq!(settings.focus.sweep_start_offset, 800.0);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads, parses and validates the settings file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] when the file cannot be read, otherwise
    /// as [`GameSettings::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Validates both sections.
    ///
    /// # Errors
    ///
    /// Returns the first [`SettingsError::Invalid`] found.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.focus.validate()?;
        self.character.validate()
    }
}

/// Failure to load settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    /// The document is not valid settings JSON.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is outside its accepted range.
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        /// Name of the offending field.
        field: String,
        /// Constraint the value violates.
        reason: &'static str,
    },
}

impl SettingsError {
    fn invalid(field: &str, reason: &'static str) -> Self {
        Self::Invalid {
            field: field.to_owned(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults_match_documented_tuning() {
        let focus = FocusSettings::default();
        assert_eq!(focus.search_radius, 3000.0);
        assert_eq!(focus.probe_half_extents, Vec3::splat(500.0));
        assert_eq!(focus.sweep_start_offset, 800.0);
        assert_eq!(focus.interp_speed, 10.0);
        assert_eq!(focus.indicator_offset, Vec2::new(0.0, -15.0));
        assert_eq!(focus.candidate_order, CandidateOrder::Nearest);
    }

    #[test]
    fn default_settings_are_valid() {
        assert!(GameSettings::default().validate().is_ok());
    }

    #[rstest]
    #[case::zero_radius(FocusSettings { search_radius: 0.0, ..FocusSettings::default() }, "search_radius")]
    #[case::offset_beyond_radius(FocusSettings { sweep_start_offset: 3500.0, ..FocusSettings::default() }, "sweep_start_offset")]
    #[case::flat_probe(FocusSettings { probe_half_extents: Vec3::new(500.0, 0.0, 500.0), ..FocusSettings::default() }, "probe_half_extents")]
    #[case::negative_speed(FocusSettings { interp_speed: -1.0, ..FocusSettings::default() }, "interp_speed")]
    #[case::nan_speed(FocusSettings { interp_speed: f32::NAN, ..FocusSettings::default() }, "interp_speed")]
    fn invalid_focus_settings_name_the_field(
        #[case] settings: FocusSettings,
        #[case] expected: &str,
    ) {
        match settings.validate() {
            Err(SettingsError::Invalid { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected invalid {expected}, got {other:?}"),
        }
    }

    #[rstest]
    #[case::negative_move(CharacterSettings { move_speed: -5.0, ..CharacterSettings::default() }, "move_speed")]
    #[case::vertical_pitch(CharacterSettings { pitch_limit: 90.0, ..CharacterSettings::default() }, "pitch_limit")]
    fn invalid_character_settings_name_the_field(
        #[case] settings: CharacterSettings,
        #[case] expected: &str,
    ) {
        match settings.validate() {
            Err(SettingsError::Invalid { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected invalid {expected}, got {other:?}"),
        }
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{ "character": { "move_speed": 450.0 }, "focus": { "candidate_order": "SweepOrder" } }"#;
        let settings = GameSettings::from_json_str(json)
            .unwrap_or_else(|e| panic!("settings should parse: {e}"));
        assert_eq!(settings.character.move_speed, 450.0);
        assert_eq!(settings.character.arm_length, ARM_LENGTH);
        assert_eq!(settings.focus.candidate_order, CandidateOrder::SweepOrder);
        assert_eq!(settings.focus.search_radius, FOCUS_SEARCH_RADIUS);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let result = GameSettings::from_json_str("{ focus: ");
        assert!(matches!(result, Err(SettingsError::Parse(_))));
    }

    #[test]
    fn out_of_range_json_is_rejected() {
        let result = GameSettings::from_json_str(r#"{ "focus": { "search_radius": -1.0 } }"#);
        assert!(matches!(result, Err(SettingsError::Invalid { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = GameSettings::load("/nonexistent/soulslike/settings.json");
        assert!(matches!(result, Err(SettingsError::Io(_))));
    }
}
