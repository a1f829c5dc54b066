//! Preset file format and operations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use walsh_core::{MAX_AMOUNT_CURVE, MIN_AMOUNT_CURVE, ParamSet, WalshParam};

use crate::{Error, Result};

/// Named set of control values for offline processing.
///
/// Missing parameters take their defaults; unknown ones are rejected when
/// the preset is loaded or parsed.
///
/// # TOML Format
///
/// ```toml
/// name = "Crushed Drums"
/// description = "Keep only the loudest eighth of each window"
/// amount_curve = 2.0
///
/// [params]
/// window = 0.6
/// amount = 0.875
/// normalize = 0.25
/// mix = 0.8
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Root applied to the amount control (1.0 when absent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_curve: Option<f64>,

    /// Normalized control values keyed by parameter key.
    #[serde(default)]
    pub params: BTreeMap<String, f32>,
}

impl Preset {
    /// Create a preset with no explicit values.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            amount_curve: None,
            params: BTreeMap::new(),
        }
    }

    /// Preset listing every control at its default.
    pub fn defaults() -> Self {
        let mut preset = Self::new("Default");
        for param in WalshParam::ALL {
            preset = preset.with_param(param, param.default_value());
        }
        preset.with_amount_curve(1.0)
    }

    /// Capture the current values of a parameter set.
    pub fn from_params(name: impl Into<String>, params: &ParamSet) -> Self {
        let mut preset = Self::new(name);
        for param in WalshParam::ALL {
            preset = preset.with_param(param, params.get(param));
        }
        preset
    }

    /// Add a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the amount curve.
    pub fn with_amount_curve(mut self, curve: f64) -> Self {
        self.amount_curve = Some(curve);
        self
    }

    /// Set one control value.
    pub fn with_param(mut self, param: WalshParam, value: f32) -> Self {
        self.params.insert(param.key().to_string(), value);
        self
    }

    /// Set a control by key, rejecting unknown keys.
    pub fn set(&mut self, key: &str, value: f32) -> Result<()> {
        let param = WalshParam::from_key(key).ok_or_else(|| Error::UnknownParam(key.to_string()))?;
        self.params.insert(param.key().to_string(), value);
        Ok(())
    }

    /// Value for a control, or its default when unset.
    pub fn value(&self, param: WalshParam) -> f32 {
        self.params
            .get(param.key())
            .copied()
            .unwrap_or_else(|| param.default_value())
    }

    /// Amount curve, defaulting to 1.0 and clamped to the supported range.
    pub fn curve(&self) -> f64 {
        self.amount_curve
            .filter(|c| !c.is_nan())
            .unwrap_or(1.0)
            .clamp(MIN_AMOUNT_CURVE, MAX_AMOUNT_CURVE)
    }

    /// Reject parameter keys that do not name a control.
    pub fn validate(&self) -> Result<()> {
        match self
            .params
            .keys()
            .find(|key| WalshParam::from_key(key).is_none())
        {
            Some(key) => Err(Error::UnknownParam(key.clone())),
            None => Ok(()),
        }
    }

    /// Write every control (defaults for unset ones) into `params`.
    pub fn apply(&self, params: &ParamSet) {
        for param in WalshParam::ALL {
            params.set(param, self.value(param));
        }
    }

    /// Load and validate a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::read_file(path, e))?;
        let preset = Self::from_toml(&content)?;
        tracing::debug!("preset_load: '{}' from {}", preset.name, path.display());
        Ok(preset)
    }

    /// Parse and validate a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let preset: Preset = toml::from_str(toml_str)?;
        preset.validate()?;
        Ok(preset)
    }

    /// Save the preset to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| Error::write_file(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| Error::write_file(path, e))?;
        tracing::debug!("preset_save: '{}' to {}", self.name, path.display());
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::defaults()
    }
}
