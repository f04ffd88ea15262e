//! Run configuration and configuration file loading.
//!
//! A run is described by [`AugmentConfig`]. It can be loaded from TOML or
//! JSON, and the command line overrides whatever the file provides.

use crate::augment::AugmentationPolicy;
use crate::ocr::OcrSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use table_augment_core::core::{
    AugmentError, ConfigError, ConfigValidator, DEFAULT_IMAGE_EXTENSION,
    DEFAULT_MAX_IDLE_PASSES, DEFAULT_OCR_EXTENSION, GROUND_TRUTH_EXTENSION,
};

/// Everything a generation run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentConfig {
    /// Page images.
    pub image_dir: PathBuf,
    /// Ground-truth descriptors.
    pub xml_dir: PathBuf,
    /// OCR cache; filled on first use.
    pub ocr_dir: PathBuf,
    /// Output root receiving `images/`, `ocr/` and `gt/`.
    pub out_dir: PathBuf,
    /// Number of samples to generate.
    pub num_samples: usize,
    /// Where to write the run log, if anywhere.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    /// Seed for reproducible runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Consecutive unproductive passes over the inputs before giving up.
    pub max_idle_passes: usize,
    pub image_extension: String,
    pub ocr_extension: String,
    pub ocr: OcrSettings,
    pub policy: AugmentationPolicy,
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::new(),
            xml_dir: PathBuf::new(),
            ocr_dir: PathBuf::new(),
            out_dir: PathBuf::new(),
            num_samples: 0,
            log_file: None,
            seed: None,
            max_idle_passes: DEFAULT_MAX_IDLE_PASSES,
            image_extension: DEFAULT_IMAGE_EXTENSION.to_string(),
            ocr_extension: DEFAULT_OCR_EXTENSION.to_string(),
            ocr: OcrSettings::default(),
            policy: AugmentationPolicy::default(),
        }
    }
}

impl AugmentConfig {
    /// Page image of the input identified by `stem`.
    pub fn image_path(&self, stem: &str) -> PathBuf {
        self.image_dir
            .join(format!("{stem}.{}", self.image_extension))
    }

    /// Descriptor of the input identified by `stem`.
    pub fn xml_path(&self, stem: &str) -> PathBuf {
        self.xml_dir
            .join(format!("{stem}.{GROUND_TRUTH_EXTENSION}"))
    }

    /// OCR cache file of the input identified by `stem`.
    pub fn ocr_path(&self, stem: &str) -> PathBuf {
        self.ocr_dir.join(format!("{stem}.{}", self.ocr_extension))
    }

    fn require_dir(path: &Path, name: &str) -> Result<(), ConfigError> {
        if path.as_os_str().is_empty() {
            Err(ConfigError::MissingSetting {
                name: name.to_string(),
            })
        } else {
            Ok(())
        }
    }
}

impl ConfigValidator for AugmentConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        Self::require_dir(&self.image_dir, "image_dir")?;
        Self::require_dir(&self.xml_dir, "xml_dir")?;
        Self::require_dir(&self.ocr_dir, "ocr_dir")?;
        Self::require_dir(&self.out_dir, "out_dir")?;
        self.validate_directory(&self.image_dir)?;
        self.validate_directory(&self.xml_dir)?;

        if self.num_samples == 0 {
            return Err(ConfigError::InvalidSampleCount);
        }
        self.validate_positive(self.max_idle_passes, "max_idle_passes")?;
        self.validate_extension(&self.image_extension, "image_extension")?;
        self.validate_extension(&self.ocr_extension, "ocr_extension")?;

        self.validate_positive(self.ocr.target_width as usize, "ocr.target_width")?;
        self.validate_positive_f64(self.ocr.outlier_factor, "ocr.outlier_factor")?;
        self.policy.validate()
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Configuration file format
#[derive(Debug, Clone, Copy)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Loads and saves [`AugmentConfig`] files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file, auto-detecting the format from the extension
    ///
    /// ```rust,no_run
    /// use table_augment::pipeline::ConfigLoader;
    /// use std::path::Path;
    ///
    /// let config = ConfigLoader::load_from_file(Path::new("augment.toml"))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load_from_file(path: &Path) -> Result<AugmentConfig, AugmentError> {
        let format = Self::format_of(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            AugmentError::config_error(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        Self::load_from_string(&content, format)
    }

    pub fn load_from_string(
        content: &str,
        format: ConfigFormat,
    ) -> Result<AugmentConfig, AugmentError> {
        match format {
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| {
                AugmentError::config_error(format!("Failed to parse TOML config: {e}"))
            }),
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| {
                AugmentError::config_error(format!("Failed to parse JSON config: {e}"))
            }),
        }
    }

    /// Save configuration to a file, auto-detecting the format from the extension
    pub fn save_to_file(config: &AugmentConfig, path: &Path) -> Result<(), AugmentError> {
        let format = Self::format_of(path)?;
        let content = Self::save_to_string(config, format)?;

        std::fs::write(path, content).map_err(|e| {
            AugmentError::config_error(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }

    pub fn save_to_string(
        config: &AugmentConfig,
        format: ConfigFormat,
    ) -> Result<String, AugmentError> {
        match format {
            ConfigFormat::Toml => toml::to_string_pretty(config).map_err(|e| {
                AugmentError::config_error(format!("Failed to serialize config to TOML: {e}"))
            }),
            ConfigFormat::Json => serde_json::to_string_pretty(config).map_err(|e| {
                AugmentError::config_error(format!("Failed to serialize config to JSON: {e}"))
            }),
        }
    }

    fn format_of(path: &Path) -> Result<ConfigFormat, AugmentError> {
        ConfigFormat::from_extension(path).ok_or_else(|| {
            AugmentError::config_error(format!(
                "Unsupported config file extension: {:?}",
                path.extension()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::augment::CountRange;

    fn valid_config(root: &Path) -> AugmentConfig {
        let images = root.join("images");
        let xmls = root.join("xml");
        std::fs::create_dir_all(&images).unwrap();
        std::fs::create_dir_all(&xmls).unwrap();
        AugmentConfig {
            image_dir: images,
            xml_dir: xmls,
            ocr_dir: root.join("ocr"),
            out_dir: root.join("out"),
            num_samples: 5,
            ..AugmentConfig::default()
        }
    }

    #[test]
    fn test_config_format_detection() {
        assert!(matches!(
            ConfigFormat::from_extension(Path::new("augment.toml")),
            Some(ConfigFormat::Toml)
        ));
        assert!(matches!(
            ConfigFormat::from_extension(Path::new("augment.json")),
            Some(ConfigFormat::Json)
        ));
        assert!(ConfigFormat::from_extension(Path::new("augment.yaml")).is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ConfigLoader::load_from_string(
            r#"
            image_dir = "data/images"
            num_samples = 12
            seed = 42

            [ocr]
            target_width = 1800

            [[policy.rows.tiers]]
            min_blocks = 2
            augment = { min = 1, max = 2 }
            "#,
            ConfigFormat::Toml,
        )
        .unwrap();

        assert_eq!(config.image_dir, PathBuf::from("data/images"));
        assert_eq!(config.num_samples, 12);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.ocr.target_width, 1800);
        assert_eq!(config.ocr.outlier_factor, 30.0);
        assert_eq!(config.max_idle_passes, DEFAULT_MAX_IDLE_PASSES);
        assert_eq!(config.image_extension, "png");
        assert_eq!(config.policy.rows.tiers.len(), 1);
        assert_eq!(
            config.policy.rows.tiers[0].augment,
            Some(CountRange::new(1, 2))
        );
    }

    #[test]
    fn test_file_roundtrip_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = valid_config(dir.path());
        config.seed = Some(7);
        config.log_file = Some(dir.path().join("run.log"));

        for name in ["augment.toml", "augment.json"] {
            let path = dir.path().join(name);
            ConfigLoader::save_to_file(&config, &path).unwrap();
            assert_eq!(ConfigLoader::load_from_file(&path).unwrap(), config);
        }
    }

    #[test]
    fn test_unsupported_extension() {
        let err = ConfigLoader::load_from_file(Path::new("augment.ini")).unwrap_err();
        assert!(matches!(err, AugmentError::ConfigError { .. }));
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        let dir = tempfile::tempdir().unwrap();
        assert!(valid_config(dir.path()).validate().is_ok());
    }

    #[test]
    fn test_validate_reports_problems() {
        let dir = tempfile::tempdir().unwrap();

        let mut config = valid_config(dir.path());
        config.out_dir = PathBuf::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingSetting { name }) if name == "out_dir"
        ));

        let mut config = valid_config(dir.path());
        config.num_samples = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidSampleCount)));

        let mut config = valid_config(dir.path());
        config.xml_dir = dir.path().join("missing");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DirectoryNotFound { .. })
        ));

        let mut config = valid_config(dir.path());
        config.max_idle_passes = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config(dir.path());
        config.ocr_extension = ".json".to_string();
        assert!(config.validate().is_err());

        let mut config = valid_config(dir.path());
        config.policy.columns.tiers[0].remove = Some(CountRange::new(2, 1));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_input_paths() {
        let config = AugmentConfig {
            image_dir: PathBuf::from("img"),
            xml_dir: PathBuf::from("xml"),
            ocr_dir: PathBuf::from("ocr"),
            ..AugmentConfig::default()
        };
        assert_eq!(config.image_path("p1"), PathBuf::from("img/p1.png"));
        assert_eq!(config.xml_path("p1"), PathBuf::from("xml/p1.xml"));
        assert_eq!(config.ocr_path("p1"), PathBuf::from("ocr/p1.json"));
    }
}
