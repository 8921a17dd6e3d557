//! Library settings with TOML file support.
//!
//! Settings name the program loaders to enable, the directories searched for
//! shader files and the initial projection parameters. Every field has a
//! default, so a partial TOML file (e.g. only `PROGRAM_DIRS`) is valid.

mod projection;

use std::path::{Path, PathBuf};

pub use projection::ProjectionSettings;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::GlviewError;

/// Top-level settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct Settings {
    /// Names of the program loaders to enable, in resolution order.
    #[serde(rename = "PROGRAM_LOADERS")]
    pub program_loaders: Vec<String>,
    /// Directories searched, in order, for relative program paths.
    #[serde(rename = "PROGRAM_DIRS")]
    pub program_dirs: Vec<PathBuf>,
    /// Initial projection parameters.
    pub projection: ProjectionSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            program_loaders: vec!["single".to_owned(), "separate".to_owned()],
            program_dirs: Vec::new(),
            projection: ProjectionSettings::default(),
        }
    }
}

impl Settings {
    /// Generate JSON Schema describing the settings file.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Settings)
    }

    /// Parse settings from a TOML string. Missing fields use defaults.
    pub fn from_toml(content: &str) -> Result<Self, GlviewError> {
        toml::from_str(content)
            .map_err(|e| GlviewError::SettingsParse(e.to_string()))
    }

    /// Load settings from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, GlviewError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| GlviewError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let settings = Self::from_toml(&content)?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), GlviewError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GlviewError::SettingsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        log::debug!("Saved settings to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let settings = Settings {
            program_dirs: vec![PathBuf::from("assets/programs")],
            ..Settings::default()
        };
        let toml_str = toml::to_string_pretty(&settings).unwrap();
        let parsed = Settings::from_toml(&toml_str).unwrap();
        assert_eq!(settings, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
PROGRAM_DIRS = ["shaders"]

[projection]
fov = 60.0
"#;
        let settings = Settings::from_toml(toml_str).unwrap();
        assert_eq!(settings.program_dirs, vec![PathBuf::from("shaders")]);
        assert_eq!(settings.projection.fov, 60.0);
        // Everything else should be default
        assert_eq!(settings.projection.far, 100.0);
        assert_eq!(settings.program_loaders, ["single", "separate"]);
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir()
            .join(format!("glview-settings-{}", std::process::id()));
        let path = dir.join("nested/settings.toml");
        let mut settings = Settings::default();
        settings.projection.near = 0.1;
        settings.program_loaders.truncate(1);

        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(loaded, settings);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err =
            Settings::load(Path::new("does/not/exist.toml")).unwrap_err();
        assert!(matches!(err, GlviewError::Read { .. }));
    }

    #[test]
    fn save_under_a_file_is_an_io_error() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("Cargo.toml/settings.toml");
        let err = Settings::default().save(&path).unwrap_err();
        assert!(matches!(err, GlviewError::Io(_)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Settings::from_toml("PROGRAM_LOADERS = 3").unwrap_err();
        assert!(matches!(err, GlviewError::SettingsParse(_)));
    }

    #[test]
    fn schema_uses_setting_keys() {
        let schema_value =
            serde_json::to_value(Settings::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("PROGRAM_LOADERS"));
        assert!(props.contains_key("PROGRAM_DIRS"));
        assert!(props.contains_key("projection"));
        assert!(!props.contains_key("program_loaders"));

        let projection = &props["projection"]["properties"];
        assert!(projection.get("fov").is_some());
        assert!(projection.get("aspect_ratio").is_some());
    }
}
