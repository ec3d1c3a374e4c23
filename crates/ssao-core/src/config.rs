//! SSAO (Screen Space Ambient Occlusion) configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SsaoError};

/// Largest accepted blur half-width, in texels.
pub const MAX_BLUR_LEVEL: u32 = 32;

/// SSAO configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SsaoConfig {
    /// Box blur half-width in texels. Zero disables both blur passes.
    pub blur_level: u32,
    /// Radius of the sampling hemisphere in view-space units.
    pub hemisphere_radius: f32,
    /// Depth bias to prevent self-occlusion artifacts.
    pub bias: f32,
    /// Seed for this effect's rotation noise. `None` uses system entropy.
    ///
    /// The sample kernel belongs to the shared `SsaoResources` and takes its
    /// own seed there.
    pub seed: Option<u64>,
}

impl Default for SsaoConfig {
    fn default() -> Self {
        Self {
            blur_level: 2,
            hemisphere_radius: 0.5,
            bias: 0.025,
            seed: None,
        }
    }
}

impl SsaoConfig {
    /// Creates a config with the given blur level and hemisphere radius.
    pub fn new(blur_level: u32, hemisphere_radius: f32) -> Self {
        Self {
            blur_level,
            hemisphere_radius,
            ..Self::default()
        }
    }

    /// Sets the blur level.
    pub fn with_blur_level(mut self, blur_level: u32) -> Self {
        self.blur_level = blur_level;
        self
    }

    /// Sets the hemisphere radius.
    pub fn with_hemisphere_radius(mut self, radius: f32) -> Self {
        self.hemisphere_radius = radius;
        self
    }

    /// Sets the depth bias.
    pub fn with_bias(mut self, bias: f32) -> Self {
        self.bias = bias;
        self
    }

    /// Fixes the noise seed so the noise texture is reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Side length of the square noise texture.
    ///
    /// The noise tile grows with the blur so the blur passes can hide its
    /// repetition.
    pub fn noise_dimension(&self) -> u32 {
        self.blur_level.max(1) * 2
    }

    /// Checks that every field is in range.
    pub fn validate(&self) -> Result<()> {
        if !self.hemisphere_radius.is_finite() || self.hemisphere_radius <= 0.0 {
            return Err(SsaoError::InvalidConfig(format!(
                "hemisphere radius must be positive, got {}",
                self.hemisphere_radius
            )));
        }
        if !self.bias.is_finite() || self.bias < 0.0 {
            return Err(SsaoError::InvalidConfig(format!(
                "bias must be non-negative, got {}",
                self.bias
            )));
        }
        if self.blur_level > MAX_BLUR_LEVEL {
            return Err(SsaoError::InvalidConfig(format!(
                "blur level {} exceeds maximum of {MAX_BLUR_LEVEL}",
                self.blur_level
            )));
        }
        Ok(())
    }

    /// Parses and validates a config from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the config as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Loads a config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::debug!("loaded SSAO config from {}", path.display());
        Ok(config)
    }

    /// Writes the config to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ssao_config_default() {
        let config = SsaoConfig::default();
        assert_eq!(config.blur_level, 2);
        assert_eq!(config.hemisphere_radius, 0.5);
        assert_eq!(config.bias, 0.025);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ssao_config_builder() {
        let config = SsaoConfig::new(4, 1.0).with_bias(0.05).with_seed(7);
        assert_eq!(config.blur_level, 4);
        assert_eq!(config.hemisphere_radius, 1.0);
        assert_eq!(config.bias, 0.05);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_noise_dimension_follows_blur() {
        assert_eq!(SsaoConfig::new(0, 0.5).noise_dimension(), 2);
        assert_eq!(SsaoConfig::new(1, 0.5).noise_dimension(), 2);
        assert_eq!(SsaoConfig::new(4, 0.5).noise_dimension(), 8);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(SsaoConfig::new(2, 0.0).validate().is_err());
        assert!(SsaoConfig::new(2, f32::NAN).validate().is_err());
        assert!(SsaoConfig::new(2, 0.5).with_bias(-0.1).validate().is_err());
        assert!(SsaoConfig::new(MAX_BLUR_LEVEL + 1, 0.5).validate().is_err());
        assert!(SsaoConfig::new(MAX_BLUR_LEVEL, 0.5).validate().is_ok());
    }

    #[test]
    fn test_json_partial_fills_defaults() {
        let config = SsaoConfig::from_json_str(r#"{ "blur_level": 0 }"#).unwrap();
        assert_eq!(config.blur_level, 0);
        assert_eq!(config.hemisphere_radius, 0.5);
    }

    #[test]
    fn test_json_rejects_invalid() {
        let err = SsaoConfig::from_json_str(r#"{ "hemisphere_radius": -1.0 }"#).unwrap_err();
        assert!(matches!(err, SsaoError::InvalidConfig(_)));

        let err = SsaoConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, SsaoError::JsonError(_)));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("ssao_config_{}.json", std::process::id()));
        let config = SsaoConfig::new(3, 0.75).with_seed(42);
        config.save(&path).unwrap();
        let loaded = SsaoConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = SsaoConfig::load("/nonexistent/ssao.json").unwrap_err();
        assert!(matches!(err, SsaoError::IoError(_)));
    }
}
