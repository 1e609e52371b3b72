//! Coercion configuration via `cdfkit.toml`
//!
//! Every setting has a default, so an empty or missing file behaves like
//! `CoercionConfig::default()`. Settings only affect containers created after
//! the config is applied.

use crate::inference::InferenceOptions;
use cdfkit_core::{CompressionType, Error, Limits, Result, ScalarType, TimeEncoding};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "cdfkit.toml";

/// Coercion settings loaded from `cdfkit.toml`.
///
/// # Example
///
/// ```toml
/// narrow_tagged_integers = false
/// string_type = "CDF_CHAR"
/// time_encoding = "tt2000"
/// compression = "none"
///
/// [limits]
/// max_nesting_depth = 32
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoercionConfig {
    /// Narrow width-tagged integer lists like plain literal lists.
    #[serde(default)]
    pub narrow_tagged_integers: bool,
    /// Type of new string values: `"CDF_CHAR"` or `"CDF_UCHAR"`.
    #[serde(default = "default_string_type")]
    pub string_type: String,
    /// Encoding of new time values.
    #[serde(default)]
    pub time_encoding: TimeEncoding,
    /// Compression recorded on new variables.
    #[serde(default)]
    pub compression: CompressionType,
    /// Input size limits.
    #[serde(default)]
    pub limits: Limits,
}

fn default_string_type() -> String {
    ScalarType::Char.name().to_string()
}

impl Default for CoercionConfig {
    fn default() -> Self {
        Self {
            narrow_tagged_integers: false,
            string_type: default_string_type(),
            time_encoding: TimeEncoding::default(),
            compression: CompressionType::default(),
            limits: Limits::default(),
        }
    }
}

impl CoercionConfig {
    /// Parse the string type setting.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` unless the setting names a string type.
    pub fn string_type(&self) -> Result<ScalarType> {
        match ScalarType::from_name(&self.string_type) {
            Some(t) if t.is_string() => Ok(t),
            _ => Err(Error::Config(format!(
                "Invalid string_type '{}' in {}. Expected \"CDF_CHAR\" or \"CDF_UCHAR\".",
                self.string_type, CONFIG_FILE_NAME
            ))),
        }
    }

    /// Check every setting that serde cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        self.string_type()?;
        Ok(())
    }

    /// Inference options these settings describe.
    pub fn to_inference_options(&self) -> Result<InferenceOptions> {
        Ok(InferenceOptions {
            narrow_tagged_integers: self.narrow_tagged_integers,
            string_type: self.string_type()?,
            time_encoding: self.time_encoding,
            limits: self.limits.clone(),
        })
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# cdfkit coercion configuration
#
# Narrow width-tagged integer lists (e.g. a list of u32 values) to the
# smallest type holding their values, like plain integer lists (default: false)
narrow_tagged_integers = false

# Type of new string values: "CDF_CHAR" (default) or "CDF_UCHAR"
string_type = "CDF_CHAR"

# Encoding of new time values: "tt2000" (default), "epoch" or "epoch16"
time_encoding = "tt2000"

# Compression recorded on new variables:
# "none" (default), "rle", "huffman", "adaptive_huffman", "gzip" or "zstd"
compression = "none"

# Input size limits
[limits]
max_nesting_depth = 32
max_elements = 268435456
max_string_bytes = 16777216
"#
    }

    /// Parse config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be parsed or fails validation.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CoercionConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{} ({})", msg, path.display())),
            other => other,
        })
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::Config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::Config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_uses_char_and_tt2000() {
        let config = CoercionConfig::default();
        assert_eq!(config.string_type().unwrap(), ScalarType::Char);
        assert_eq!(config.time_encoding, TimeEncoding::Tt2000);
        assert_eq!(config.compression, CompressionType::None);
        assert!(!config.narrow_tagged_integers);
    }

    #[test]
    fn default_toml_parses_to_default() {
        let config = CoercionConfig::from_toml_str(CoercionConfig::default_toml()).unwrap();
        assert_eq!(config, CoercionConfig::default());
    }

    #[test]
    fn parse_overrides() {
        let config = CoercionConfig::from_toml_str(
            r#"
narrow_tagged_integers = true
string_type = "CDF_UCHAR"
time_encoding = "epoch16"
compression = "gzip"

[limits]
max_nesting_depth = 4
"#,
        )
        .unwrap();
        assert!(config.narrow_tagged_integers);
        assert_eq!(config.string_type().unwrap(), ScalarType::Uchar);
        assert_eq!(config.time_encoding, TimeEncoding::Epoch16);
        assert_eq!(config.compression, CompressionType::Gzip);
        assert_eq!(config.limits.max_nesting_depth, 4);
        assert_eq!(config.limits.max_elements, Limits::default().max_elements);
    }

    #[test]
    fn parse_invalid_string_type_returns_error() {
        let err = CoercionConfig::from_toml_str("string_type = \"CDF_INT4\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn parse_unknown_encoding_returns_error() {
        let err = CoercionConfig::from_toml_str("time_encoding = \"unix\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn inference_options_follow_config() {
        let config = CoercionConfig {
            narrow_tagged_integers: true,
            string_type: "CDF_UCHAR".to_string(),
            time_encoding: TimeEncoding::Epoch,
            ..CoercionConfig::default()
        };
        let options = config.to_inference_options().unwrap();
        assert!(options.narrow_tagged_integers);
        assert_eq!(options.string_type, ScalarType::Uchar);
        assert_eq!(options.time_encoding, TimeEncoding::Epoch);
    }

    #[test]
    fn write_default_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        assert!(!path.exists());

        CoercionConfig::write_default_if_missing(&path).unwrap();
        assert!(path.exists());

        let config = CoercionConfig::from_file(&path).unwrap();
        assert_eq!(config, CoercionConfig::default());
    }

    #[test]
    fn write_default_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        std::fs::write(&path, "time_encoding = \"epoch\"\n").unwrap();
        CoercionConfig::write_default_if_missing(&path).unwrap();

        let config = CoercionConfig::from_file(&path).unwrap();
        assert_eq!(config.time_encoding, TimeEncoding::Epoch);
    }

    #[test]
    fn from_file_with_missing_fields_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "").unwrap();

        let config = CoercionConfig::from_file(&path).unwrap();
        assert_eq!(config, CoercionConfig::default());
    }

    #[test]
    fn from_missing_file_returns_error() {
        let dir = TempDir::new().unwrap();
        let err = CoercionConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn write_to_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        let config = CoercionConfig {
            narrow_tagged_integers: true,
            string_type: "CDF_UCHAR".to_string(),
            time_encoding: TimeEncoding::Epoch16,
            compression: CompressionType::Zstd,
            limits: Limits::with_small_limits(),
        };
        config.write_to_file(&path).unwrap();
        assert_eq!(CoercionConfig::from_file(&path).unwrap(), config);
    }
}
