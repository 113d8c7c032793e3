//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::Path;

/// File name of the project configuration.
pub const CONFIG_FILE: &str = "patchbay.toml";

/// Loads and validates a `patchbay.toml` from a project directory.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `patchbay.toml` from a string.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and build parameters are supported.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.project.patches.is_empty() {
        return Err(ConfigError::MissingField("project.patches".to_string()));
    }
    if config.target.hardware.is_empty() {
        return Err(ConfigError::MissingField("target.hardware".to_string()));
    }
    config.build.options().validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
[project]
name = "verb"
patches = ["reverb.cpp"]

[target]
hardware = "daisy.patch.json"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.project.name, "verb");
        assert_eq!(config.target.hardware, "daisy.patch.json");
        assert_eq!(config.build.samplerate_khz, 48);
        assert_eq!(config.build.blocksize, 24);
        assert!(config.build.oled);
        assert_eq!(config.build.output_dir, "build");
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[project]
name = "duo"
patches = ["a.cpp", "b.cpp"]

[target]
hardware = "boards/field.json"

[build]
samplerate_khz = 96
blocksize = 48
boost = true
fastmath = true
oled = false
output_dir = "gen"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.project.patches.len(), 2);
        let opts = config.build.options();
        assert_eq!(opts.samplerate_khz, 96);
        assert!(opts.fastmath);
        assert!(opts.nooled);
        assert_eq!(config.build.output_dir, "gen");
    }

    #[test]
    fn missing_patches_errors() {
        let toml = r#"
[project]
name = "x"

[target]
hardware = "h.json"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert_eq!(err.to_string(), "missing required field: project.patches");
    }

    #[test]
    fn missing_hardware_errors() {
        let toml = r#"
[project]
name = "x"
patches = "a.cpp"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(f) if f == "target.hardware"));
    }

    #[test]
    fn unsupported_samplerate_errors() {
        let toml = r#"
[project]
name = "x"
patches = "a.cpp"

[target]
hardware = "h.json"

[build]
samplerate_khz = 44
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[project]\nname = \"d\"\npatches = \"p.cpp\"\n[target]\nhardware = \"h.json\"\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.project.patches, vec!["p.cpp"]);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
