// SPDX-License-Identifier: MIT
//!
//! Optional config file (tbx2tsv.toml or ~/.tbx2tsv.toml)
//!
//! ```toml
//! source_lang = "en"
//! target_lang = "es"
//! ```
//!

use crate::error::{Error, Result};
use crate::tbx::LanguagePair;

/// Config file name searched in the current directory
pub const CONFIG_FILE: &str = "tbx2tsv.toml";

#[derive(serde::Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct Config {
    /// Default source language code
    pub source_lang: Option<String>,
    /// Default target language code
    pub target_lang: Option<String>,
}

impl Config {
    /// Search default config files, empty config if none exists
    pub fn new() -> Result<Self> {
        use std::path::PathBuf;
        let config_files = [
            PathBuf::new().join(CONFIG_FILE),
            dirs::home_dir()
                .unwrap_or_default()
                .join(format!(".{}", CONFIG_FILE)),
        ];

        for config_file in config_files {
            match Self::with_config(&config_file) {
                Ok(conf) => {
                    log::debug!("Read config file {:?}", config_file);
                    return Ok(conf);
                }
                Err(Error::ConfigUnreadable { source, .. })
                    if source.kind() == std::io::ErrorKind::NotFound =>
                {
                    log::debug!("Config file {:?} NOT found.", config_file);
                }
                Err(err) => {
                    // Other err, stop searching
                    log::debug!("Config file {:?} is broken: {:?}", config_file, err);
                    return Err(err);
                }
            }
        }

        Ok(Self::default())
    }

    /// Config from specific file
    pub fn with_config<P: AsRef<std::path::Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();
        let config = std::fs::read_to_string(config_path).map_err(|e| Error::ConfigUnreadable {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&config).map_err(|e| Error::ConfigInvalid {
            path: config_path.to_path_buf(),
            source: e,
        })
    }

    /// Language pair from command line values, falling back to this config,
    /// then to en => es
    pub fn language_pair(&self, source: Option<String>, target: Option<String>) -> LanguagePair {
        let default = LanguagePair::default();
        LanguagePair {
            source: source
                .or_else(|| self.source_lang.clone())
                .unwrap_or(default.source),
            target: target
                .or_else(|| self.target_lang.clone())
                .unwrap_or(default.target),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "source_lang = \"de\"\n").unwrap();

        let config = Config::with_config(&path).unwrap();
        assert_eq!(config.source_lang.as_deref(), Some("de"));
        assert_eq!(config.target_lang, None);
    }

    #[test]
    fn unknown_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "sourcelang = \"de\"\n").unwrap();

        let err = Config::with_config(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { .. }));
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::with_config(dir.path().join(CONFIG_FILE)).unwrap_err();
        assert!(matches!(err, Error::ConfigUnreadable { .. }));
    }

    #[test]
    fn language_precedence() {
        let empty = Config::default();
        assert_eq!(empty.language_pair(None, None), LanguagePair::new("en", "es"));

        let config = Config {
            source_lang: Some("de".to_string()),
            target_lang: Some("fr".to_string()),
        };
        assert_eq!(config.language_pair(None, None), LanguagePair::new("de", "fr"));
        assert_eq!(
            config.language_pair(Some("ja".to_string()), None),
            LanguagePair::new("ja", "fr")
        );
    }
}
