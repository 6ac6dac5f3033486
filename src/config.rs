//! Configuration for manifest extraction runs

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::file_types::ConfigFormat;

/// Default size limit for a single manifest (1 MiB)
const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Directories that hold vendored or generated dependencies, not manifests of the project
const DEFAULT_IGNORE: [&str; 3] = ["**/node_modules/**", "**/vendor/**", "**/.git/**"];

/// Extraction configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Input bounds
    pub limits: LimitsConfig,
    /// Format selection
    pub formats: FormatsConfig,
    /// Directory scan settings
    pub scan: ScanConfig,
}

/// Input size limits applied before parsing
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Files larger than this many bytes are skipped
    pub max_file_size: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// Format selection
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FormatsConfig {
    /// Formats the registry never dispatches to
    pub disabled: Vec<ConfigFormat>,
}

/// Directory scan settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Repository-relative paths to skip (glob patterns)
    pub ignore: Vec<String>,
    /// Owning project, attached to log events
    pub project_id: Option<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ignore: DEFAULT_IGNORE.iter().map(|p| p.to_string()).collect(),
            project_id: None,
        }
    }
}

impl FormatsConfig {
    pub fn is_enabled(&self, format: ConfigFormat) -> bool {
        !self.disabled.contains(&format)
    }
}

impl Config {
    /// Build configuration from a JSON value, falling back to defaults when it
    /// is missing or malformed.
    pub fn from_json_value(value: Option<serde_json::Value>) -> Self {
        match value {
            Some(value) => serde_json::from_value(value).unwrap_or_default(),
            None => Self::default(),
        }
    }

    /// Load configuration from a TOML file, or from a JSON file when the path
    /// ends in `.json`.
    ///
    /// JSON documents go through [`Config::from_json_value`], so only a syntax
    /// error is reported; a document of the wrong shape yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            let value = serde_json::from_str(&content)
                .with_context(|| format!("failed to parse config file {}", path.display()))?;
            return Ok(Self::from_json_value(Some(value)));
        }

        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.limits.max_file_size, DEFAULT_MAX_FILE_SIZE);
        assert!(config.formats.disabled.is_empty());
        assert_eq!(config.scan.ignore, DEFAULT_IGNORE);
        assert!(config.scan.project_id.is_none());
    }

    #[test]
    fn test_parse_from_json() {
        let json = json!({
            "limits": {
                "max_file_size": 4096
            },
            "formats": {
                "disabled": ["python_pip", "ruby_gems_lock"]
            },
            "scan": {
                "ignore": ["third_party/**"],
                "project_id": "42"
            }
        });

        let config = Config::from_json_value(Some(json));
        assert_eq!(config.limits.max_file_size, 4096);
        assert_eq!(
            config.formats.disabled,
            vec![ConfigFormat::PythonPip, ConfigFormat::RubyGemsLock]
        );
        assert!(!config.formats.is_enabled(ConfigFormat::PythonPip));
        assert!(config.formats.is_enabled(ConfigFormat::GoModules));
        assert_eq!(config.scan.ignore, vec!["third_party/**"]);
        assert_eq!(config.scan.project_id.as_deref(), Some("42"));
    }

    #[test]
    fn test_partial_config() {
        let json = json!({
            "scan": {
                "project_id": "7"
            }
        });

        let config = Config::from_json_value(Some(json));
        assert_eq!(config.scan.project_id.as_deref(), Some("7"));
        // Other fields should use defaults
        assert_eq!(config.scan.ignore, DEFAULT_IGNORE);
        assert_eq!(config.limits.max_file_size, DEFAULT_MAX_FILE_SIZE);
    }

    #[test]
    fn test_from_json_value_none() {
        let config = Config::from_json_value(None);
        assert_eq!(config.limits.max_file_size, DEFAULT_MAX_FILE_SIZE);
    }

    #[test]
    fn test_from_json_value_invalid_json() {
        let config = Config::from_json_value(Some(json!("invalid")));
        assert_eq!(config.limits.max_file_size, DEFAULT_MAX_FILE_SIZE);

        // Unknown format ids make the whole value invalid
        let config = Config::from_json_value(Some(json!({"formats": {"disabled": ["cargo"]}})));
        assert!(config.formats.disabled.is_empty());
    }

    #[test]
    fn test_load_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest-libs.toml");
        std::fs::write(
            &path,
            r#"
[limits]
max_file_size = 2048

[formats]
disabled = ["java_gradle"]
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.limits.max_file_size, 2048);
        assert_eq!(config.formats.disabled, vec![ConfigFormat::JavaGradle]);
        assert_eq!(config.scan.ignore, DEFAULT_IGNORE);
    }

    #[test]
    fn test_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest-libs.json");
        std::fs::write(
            &path,
            r#"{"formats": {"disabled": ["c_conan_py", "c_conan_txt"]}, "scan": {"project_id": "99"}}"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(
            config.formats.disabled,
            vec![ConfigFormat::CConanPy, ConfigFormat::CConanTxt]
        );
        assert_eq!(config.scan.project_id.as_deref(), Some("99"));
        assert_eq!(config.limits.max_file_size, DEFAULT_MAX_FILE_SIZE);

        // Wrong shape falls back to defaults, broken syntax is an error
        std::fs::write(&path, r#"{"limits": {"max_file_size": "big"}}"#).unwrap();
        assert_eq!(
            Config::load(&path).unwrap().limits.max_file_size,
            DEFAULT_MAX_FILE_SIZE
        );
        std::fs::write(&path, "{\"limits\": ").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(&dir.path().join("missing.toml")).is_err());

        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[limits\nmax_file_size = ").unwrap();
        assert!(Config::load(&path).is_err());
    }
}
