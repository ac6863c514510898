//! Settings: command-line flags layered over an optional TOML file.
//!
//! Precedence is flag, then file, then built-in default.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tsirouters_export::ExportFormat;

pub const DEFAULT_DATA_DIR: &str = ".tsirouters";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const EXPORT_SUBDIR: &str = "export";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("{0}")]
    Format(String),
}

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub data_dir: Option<PathBuf>,
    pub export_dir: Option<PathBuf>,
    pub format: Option<ExportFormat>,
    pub log_level: Option<String>,
}

impl FileConfig {
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text, path)
    }
}

/// Values given on the command line.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub data_dir: Option<String>,
    pub config: Option<String>,
    pub export_dir: Option<String>,
    pub format: Option<String>,
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub export_dir: PathBuf,
    pub format: ExportFormat,
    pub log_level: String,
    pub config_path: Option<PathBuf>,
}

impl Settings {
    pub fn resolve(overrides: &Overrides) -> Result<Self, ConfigError> {
        let flag_data_dir = overrides.data_dir.as_ref().map(PathBuf::from);

        let (file, config_path) = match &overrides.config {
            Some(explicit) => {
                let path = PathBuf::from(explicit);
                (FileConfig::load(&path)?, Some(path))
            }
            None => {
                let base = flag_data_dir
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
                let implicit = base.join(CONFIG_FILE_NAME);
                if implicit.is_file() {
                    (FileConfig::load(&implicit)?, Some(implicit))
                } else {
                    (FileConfig::default(), None)
                }
            }
        };

        Self::layer(overrides, file, config_path)
    }

    fn layer(
        overrides: &Overrides,
        file: FileConfig,
        config_path: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let data_dir = overrides
            .data_dir
            .as_ref()
            .map(PathBuf::from)
            .or(file.data_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let export_dir = overrides
            .export_dir
            .as_ref()
            .map(PathBuf::from)
            .or(file.export_dir)
            .unwrap_or_else(|| data_dir.join(EXPORT_SUBDIR));

        let format = match &overrides.format {
            Some(raw) => raw.parse().map_err(ConfigError::Format)?,
            None => file.format.unwrap_or_default(),
        };

        Ok(Self {
            data_dir,
            export_dir,
            format,
            log_level: file
                .log_level
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            config_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_flags_or_file() {
        let settings = Settings::layer(&Overrides::default(), FileConfig::default(), None)
            .expect("defaults resolve");
        assert_eq!(settings.data_dir, PathBuf::from(".tsirouters"));
        assert_eq!(settings.export_dir, PathBuf::from(".tsirouters/export"));
        assert_eq!(settings.format, ExportFormat::TnrV2);
        assert_eq!(settings.log_level, "warn");
    }

    #[test]
    fn file_values_fill_in_and_flags_win() {
        let file = FileConfig::parse(
            "data_dir = \"/srv/routers\"\nformat = \"ini-v1\"\nlog_level = \"debug\"\n",
            Path::new("config.toml"),
        )
        .expect("config parses");

        let from_file =
            Settings::layer(&Overrides::default(), file.clone(), None).expect("resolve");
        assert_eq!(from_file.data_dir, PathBuf::from("/srv/routers"));
        assert_eq!(from_file.export_dir, PathBuf::from("/srv/routers/export"));
        assert_eq!(from_file.format, ExportFormat::IniV1);
        assert_eq!(from_file.log_level, "debug");

        let overrides = Overrides {
            data_dir: Some("/tmp/other".to_string()),
            export_dir: Some("/tmp/out".to_string()),
            format: Some("tnr-v2".to_string()),
            ..Overrides::default()
        };
        let flagged = Settings::layer(&overrides, file, None).expect("resolve");
        assert_eq!(flagged.data_dir, PathBuf::from("/tmp/other"));
        assert_eq!(flagged.export_dir, PathBuf::from("/tmp/out"));
        assert_eq!(flagged.format, ExportFormat::TnrV2);
    }

    #[test]
    fn unknown_keys_and_formats_are_rejected() {
        assert!(matches!(
            FileConfig::parse("colour = \"blue\"\n", Path::new("config.toml")),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            FileConfig::parse("format = \"csv\"\n", Path::new("config.toml")),
            Err(ConfigError::Parse { .. })
        ));

        let overrides = Overrides {
            format: Some("csv".to_string()),
            ..Overrides::default()
        };
        assert!(matches!(
            Settings::layer(&overrides, FileConfig::default(), None),
            Err(ConfigError::Format(_))
        ));
    }

    #[test]
    fn file_format_accepts_the_flag_aliases() {
        for (raw, expected) in [("v1", ExportFormat::IniV1), ("TNR-V2", ExportFormat::TnrV2)] {
            let text = format!("format = \"{raw}\"\n");
            let file = FileConfig::parse(&text, Path::new("config.toml")).expect("alias parses");
            assert_eq!(file.format, Some(expected));
        }
    }

    #[test]
    fn implicit_config_is_read_from_data_dir() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join(CONFIG_FILE_NAME), "format = \"ini-v1\"\n")
            .expect("config should write");

        let overrides = Overrides {
            data_dir: Some(dir.path().display().to_string()),
            ..Overrides::default()
        };
        let settings = Settings::resolve(&overrides).expect("resolve");
        assert_eq!(settings.format, ExportFormat::IniV1);
        assert_eq!(
            settings.config_path,
            Some(dir.path().join(CONFIG_FILE_NAME))
        );
    }

    #[test]
    fn explicit_config_must_exist() {
        let overrides = Overrides {
            config: Some("/nonexistent/tsirouters.toml".to_string()),
            ..Overrides::default()
        };
        assert!(matches!(
            Settings::resolve(&overrides),
            Err(ConfigError::Read { .. })
        ));
    }
}
