//! # Configuration System
//!
//! YAML configuration for applications built on the mapping engine:
//!
//! - Default interpolation method and out-of-range value for new mappings
//! - Extra dimensions registered at start-up, which fixes their ordering
//! - Out-of-range value for element-wise algebra results
//! - Logging configuration
//! - Named mapping profiles, e.g. one per signal kind
//!
//! ## Configuration Search Path
//!
//! Configuration is loaded from the first file found:
//! 1. Path specified via `PHYMAP_CONFIG` environment variable
//! 2. `./phymap.yaml` (current directory)
//! 3. `~/.config/phymap/config.yaml` (user config)
//! 4. `/etc/phymap/config.yaml` (system config)
//!
//! ## Example Configuration
//!
//! ```yaml
//! mapping:
//!   interpolation: linear
//!   out_of_range: 0.0
//!   dimensions: ["frequency", "channel"]
//!
//! algebra:
//!   out_of_range: 0.0
//!
//! logging:
//!   level: debug
//!   format: compact
//!
//! profiles:
//!   bitrate:
//!     interpolation: steps
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::dimension::{Dimension, DimensionSet, TIME_DIMENSION_NAME};
use crate::error::MappingResult;
use crate::interpolation::InterpolationMethod;
use crate::mapping::ConstMapping;
use crate::multi_dim::KeyedMapping;
use crate::observe::LogConfig;
use crate::utils;

/// Error type for configuration operations.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file or profile not found
    NotFound(String),
    /// Failed to read or write configuration file
    ReadError(String),
    /// Failed to parse configuration
    ParseError(String),
    /// Invalid configuration value
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(msg) => write!(f, "config not found: {}", msg),
            ConfigError::ReadError(msg) => write!(f, "failed to read config: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "failed to parse config: {}", msg),
            ConfigError::ValidationError(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Defaults for newly created mappings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Interpolation method (steps, nearest, linear)
    pub interpolation: InterpolationMethod,
    /// Value outside of the key range; boundary values if unset
    pub out_of_range: Option<f64>,
    /// Dimension names to register, innermost first (time is implicit)
    pub dimensions: Vec<String>,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            interpolation: InterpolationMethod::Linear,
            out_of_range: None,
            dimensions: Vec::new(),
        }
    }
}

/// Element-wise algebra settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgebraConfig {
    /// Out-of-range value of algebra results
    pub out_of_range: Option<f64>,
}

/// Complete configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhymapConfig {
    /// Configuration version
    pub version: String,
    pub mapping: MappingConfig,
    pub algebra: AlgebraConfig,
    pub logging: LogConfig,
    /// Named mapping presets
    pub profiles: HashMap<String, MappingConfig>,
}

impl Default for PhymapConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            mapping: MappingConfig::default(),
            algebra: AlgebraConfig::default(),
            logging: LogConfig::default(),
            profiles: HashMap::new(),
        }
    }
}

impl PhymapConfig {
    /// Load configuration from the default search path.
    ///
    /// Search order:
    /// 1. `PHYMAP_CONFIG` environment variable
    /// 2. `./phymap.yaml`
    /// 3. `~/.config/phymap/config.yaml`
    /// 4. `/etc/phymap/config.yaml`
    ///
    /// Returns default config if no file is found.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var("PHYMAP_CONFIG") {
            if Path::new(&path).exists() {
                return Self::load_from(Path::new(&path));
            }
        }

        for path in Self::config_search_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;

        let config = Self::parse(&content)?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_yaml::to_string(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))
    }

    /// Replace the mapping defaults with the named profile.
    ///
    /// A profile without dimensions keeps the registered dimensions.
    pub fn with_profile(&self, name: &str) -> Result<Self, ConfigError> {
        let profile = self
            .profiles
            .get(name)
            .ok_or_else(|| ConfigError::NotFound(format!("profile '{}' not found", name)))?;

        let mut config = self.clone();
        let dimensions = std::mem::take(&mut config.mapping.dimensions);
        config.mapping = profile.clone();
        if config.mapping.dimensions.is_empty() {
            config.mapping.dimensions = dimensions;
        }
        Ok(config)
    }

    /// Get configuration search paths.
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./phymap.yaml")];

        if let Some(dirs) = directories::ProjectDirs::from("", "", "phymap") {
            paths.push(dirs.config_dir().join("config.yaml"));
        }

        paths.push(PathBuf::from("/etc/phymap/config.yaml"));

        paths
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_mapping("mapping", &self.mapping)?;
        for (name, profile) in &self.profiles {
            validate_mapping(&format!("profiles.{}", name), profile)?;
        }
        validate_out_of_range("algebra", self.algebra.out_of_range)
    }

    /// Generate example configuration YAML.
    pub fn example_yaml() -> String {
        let config = Self {
            mapping: MappingConfig {
                out_of_range: Some(0.0),
                dimensions: vec!["frequency".to_string()],
                ..Default::default()
            },
            algebra: AlgebraConfig {
                out_of_range: Some(0.0),
            },
            profiles: {
                let mut profiles = HashMap::new();
                profiles.insert(
                    "bitrate".to_string(),
                    MappingConfig {
                        interpolation: InterpolationMethod::Steps,
                        ..Default::default()
                    },
                );
                profiles
            },
            ..Default::default()
        };

        serde_yaml::to_string(&config).unwrap_or_default()
    }
}

fn validate_out_of_range(section: &str, value: Option<f64>) -> Result<(), ConfigError> {
    match value {
        Some(v) if !v.is_finite() => Err(ConfigError::ValidationError(format!(
            "{}.out_of_range must be finite, got {}",
            section, v
        ))),
        _ => Ok(()),
    }
}

fn validate_mapping(section: &str, mapping: &MappingConfig) -> Result<(), ConfigError> {
    validate_out_of_range(section, mapping.out_of_range)?;

    let mut seen = HashSet::new();
    for name in &mapping.dimensions {
        if name == TIME_DIMENSION_NAME {
            return Err(ConfigError::ValidationError(format!(
                "{}.dimensions must not list '{}'",
                section, TIME_DIMENSION_NAME
            )));
        }
        if !seen.insert(name.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "{}.dimensions lists '{}' twice",
                section, name
            )));
        }
    }
    Ok(())
}

/// Creates mappings and combines them with the configured defaults.
#[derive(Debug, Clone)]
pub struct MappingFactory {
    mapping: MappingConfig,
    algebra: AlgebraConfig,
    dimensions: Vec<Dimension>,
}

impl MappingFactory {
    /// Build a factory and register the configured dimensions in order.
    pub fn new(config: &PhymapConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let dimensions = config.mapping.dimensions.iter().map(|name| Dimension::new(name)).collect();
        debug!(
            interpolation = %config.mapping.interpolation,
            dimensions = ?config.mapping.dimensions,
            "mapping factory ready"
        );
        Ok(Self {
            mapping: config.mapping.clone(),
            algebra: config.algebra.clone(),
            dimensions,
        })
    }

    /// Registered dimensions, innermost first.
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Time plus every registered dimension.
    pub fn full_domain(&self) -> DimensionSet {
        DimensionSet::from_dimensions(self.dimensions.iter().copied()).with(Dimension::time())
    }

    pub fn interpolation(&self) -> InterpolationMethod {
        self.mapping.interpolation
    }

    /// Empty mapping over `domain` with the configured defaults.
    pub fn create(&self, domain: &DimensionSet) -> MappingResult<KeyedMapping> {
        match self.mapping.out_of_range {
            Some(oor) => utils::create_mapping_with_out_of_range(domain, self.mapping.interpolation, oor),
            None => utils::create_mapping(domain, self.mapping.interpolation),
        }
    }

    pub fn add(&self, f1: &dyn ConstMapping, f2: &dyn ConstMapping) -> MappingResult<KeyedMapping> {
        utils::apply_element_wise(f1, f2, |a, b| a + b, self.algebra.out_of_range)
    }

    pub fn subtract(&self, f1: &dyn ConstMapping, f2: &dyn ConstMapping) -> MappingResult<KeyedMapping> {
        utils::apply_element_wise(f1, f2, |a, b| a - b, self.algebra.out_of_range)
    }

    pub fn multiply(&self, f1: &dyn ConstMapping, f2: &dyn ConstMapping) -> MappingResult<KeyedMapping> {
        utils::apply_element_wise(f1, f2, |a, b| a * b, self.algebra.out_of_range)
    }

    pub fn divide(&self, f1: &dyn ConstMapping, f2: &dyn ConstMapping) -> MappingResult<KeyedMapping> {
        utils::apply_element_wise(f1, f2, |a, b| a / b, self.algebra.out_of_range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::Argument;
    use crate::error::MappingError;
    use crate::mapping::Mapping;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = PhymapConfig::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.mapping.interpolation, InterpolationMethod::Linear);
        assert!(config.mapping.out_of_range.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
mapping:
  interpolation: nearest
  out_of_range: 0.5
  dimensions: ["frequency"]

algebra:
  out_of_range: 0.0

logging:
  level: debug
"#;

        let config = PhymapConfig::parse(yaml).unwrap();
        assert_eq!(config.mapping.interpolation, InterpolationMethod::Nearest);
        assert_eq!(config.mapping.out_of_range, Some(0.5));
        assert_eq!(config.mapping.dimensions, vec!["frequency".to_string()]);
        assert_eq!(config.algebra.out_of_range, Some(0.0));
        assert_eq!(config.logging.level, crate::observe::LogLevel::Debug);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            PhymapConfig::parse("mapping:\n  interpolation: cubic\n"),
            Err(ConfigError::ParseError(_))
        ));
        let err = PhymapConfig::load_from(Path::new("/nonexistent/phymap.yaml")).unwrap_err();
        assert!(err.to_string().starts_with("failed to read config"));
    }

    #[test]
    fn test_profiles() {
        let yaml = r#"
mapping:
  dimensions: ["frequency"]

profiles:
  bitrate:
    interpolation: steps
    out_of_range: 0.0
"#;

        let config = PhymapConfig::parse(yaml).unwrap();
        let bitrate = config.with_profile("bitrate").unwrap();
        assert_eq!(bitrate.mapping.interpolation, InterpolationMethod::Steps);
        assert_eq!(bitrate.mapping.out_of_range, Some(0.0));
        assert_eq!(bitrate.mapping.dimensions, vec!["frequency".to_string()]);
        assert!(matches!(config.with_profile("missing"), Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_validation() {
        let mut config = PhymapConfig::default();
        config.mapping.out_of_range = Some(f64::NAN);
        assert!(config.validate().is_err());

        config.mapping.out_of_range = None;
        config.mapping.dimensions = vec!["time".to_string()];
        assert!(config.validate().is_err());

        config.mapping.dimensions = vec!["frequency".to_string(), "frequency".to_string()];
        assert!(config.validate().is_err());

        config.mapping.dimensions.pop();
        config.algebra.out_of_range = Some(f64::INFINITY);
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("phymap.yaml");

        let yaml = PhymapConfig::example_yaml();
        let example = PhymapConfig::parse(&yaml).unwrap();
        example.save(&path).unwrap();

        let loaded = PhymapConfig::load_from(&path).unwrap();
        assert_eq!(loaded.mapping, example.mapping);
        assert_eq!(loaded.algebra, example.algebra);
        assert_eq!(loaded.profiles["bitrate"].interpolation, InterpolationMethod::Steps);
        assert!(loaded.validate().is_ok());
    }

    #[test]
    fn test_search_paths() {
        let paths = PhymapConfig::config_search_paths();
        assert_eq!(paths.first(), Some(&PathBuf::from("./phymap.yaml")));
        assert_eq!(paths.last(), Some(&PathBuf::from("/etc/phymap/config.yaml")));
    }

    #[test]
    fn test_factory() {
        let mut config = PhymapConfig::default();
        config.mapping.interpolation = InterpolationMethod::Steps;
        config.mapping.out_of_range = Some(-1.0);
        config.mapping.dimensions = vec!["config_test_frequency".to_string()];
        config.algebra.out_of_range = Some(0.0);

        let factory = MappingFactory::new(&config).unwrap();
        let freq = Dimension::new("config_test_frequency");
        assert_eq!(factory.dimensions(), &[freq]);
        assert!(factory.full_domain().has_dimension(freq));
        assert!(factory.full_domain().has_time());

        let mut m = factory.create(&DimensionSet::time_domain()).unwrap();
        assert_eq!(m.method(), InterpolationMethod::Steps);
        m.set_value(&Argument::new(1.0), 2.0);
        m.set_value(&Argument::new(2.0), 4.0);
        assert_eq!(m.value(&Argument::new(0.0)), -1.0);
        assert_eq!(m.value(&Argument::new(1.5)), 2.0);

        let product = factory.multiply(&m, &m).unwrap();
        assert_eq!(product.value(&Argument::new(2.0)), 16.0);
        assert_eq!(product.value(&Argument::new(5.0)), 0.0);
        let sum = factory.add(&m, &m).unwrap();
        assert_eq!(sum.value(&Argument::new(1.0)), 4.0);

        assert_eq!(
            factory.create(&DimensionSet::from_dimensions([freq])).unwrap_err(),
            MappingError::MissingTimeDimension(DimensionSet::from_dimensions([freq]))
        );
    }
}
