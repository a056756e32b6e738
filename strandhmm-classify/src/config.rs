use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for `{name}`: {value}")]
    InvalidValue { name: &'static str, value: f64 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

///
/// Numeric knobs of the classifier.
///
/// Every field has a default, so a TOML file only needs the values it changes.
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Bins whose normalized mean count is at or below this value are dropped as low
    pub min_bin_mean: f64,
    /// Bins whose normalized mean count reaches mean + this many SDs are dropped as high
    pub max_sd_above_mean: f64,
    /// Expected number of strand state changes per cell across the genome
    pub expected_events: f64,
    /// Background rate of the absent channel in the CC and WW states
    pub zero_channel_rate: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_bin_mean: 0.01,
            max_sd_above_mean: 3.0,
            expected_events: 10.0,
            zero_channel_rate: 0.5,
        }
    }
}

impl ClassifierConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        let checks = [
            ("min_bin_mean", self.min_bin_mean, self.min_bin_mean >= 0.0),
            ("max_sd_above_mean", self.max_sd_above_mean, self.max_sd_above_mean > 0.0),
            ("expected_events", self.expected_events, self.expected_events >= 0.0),
            ("zero_channel_rate", self.zero_channel_rate, self.zero_channel_rate > 0.0),
        ];
        for (name, value, ok) in checks {
            if !(value.is_finite() && ok) {
                return Err(ConfigError::InvalidValue { name, value });
            }
        }
        Ok(())
    }
}

impl TryFrom<&Path> for ClassifierConfig {
    type Error = ConfigError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        let config: ClassifierConfig = toml::from_str(&toml_str)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::io::Write;

    fn write_toml(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[rstest]
    fn test_defaults_are_valid() {
        let config = ClassifierConfig::default();
        assert_eq!(config.validate().is_ok(), true);
        assert_eq!(config.expected_events, 10.0);
    }

    #[rstest]
    fn test_partial_toml_keeps_defaults() {
        let file = write_toml("expected_events = 4.0\nzero_channel_rate = 0.25\n");
        let config = ClassifierConfig::try_from(file.path()).unwrap();

        assert_eq!(config.expected_events, 4.0);
        assert_eq!(config.zero_channel_rate, 0.25);
        assert_eq!(config.min_bin_mean, 0.01);
        assert_eq!(config.max_sd_above_mean, 3.0);
    }

    #[rstest]
    fn test_rejects_invalid_values() {
        let file = write_toml("zero_channel_rate = 0.0\n");
        let result = ClassifierConfig::try_from(file.path());
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { name: "zero_channel_rate", .. })
        ));
    }

    #[rstest]
    fn test_rejects_malformed_toml() {
        let file = write_toml("expected_events = \"many\"\n");
        assert!(matches!(
            ClassifierConfig::try_from(file.path()),
            Err(ConfigError::Toml(_))
        ));
    }
}
