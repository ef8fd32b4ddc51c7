#![forbid(unsafe_code)]
#![allow(unused_assignments)]

use std::fs;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_FILE: &str = "safescript.toml";

#[derive(Debug, Error, Diagnostic)]
#[error("config error: {message}")]
#[diagnostic(code(safescript::config))]
#[allow(unused_assignments)]
pub struct ConfigError {
    pub message: String,
}

/// Contents of `safescript.toml`. Every key is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub build: BuildConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct BuildConfig {
    /// Output directory; relative paths are taken from the config file's directory.
    pub out_dir: Option<PathBuf>,
    pub preamble: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            out_dir: None,
            preamble: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct AnalysisConfig {
    pub borrow_check: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { borrow_check: true }
    }
}

impl Config {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|e| ConfigError {
            message: e.to_string(),
        })
    }

    /// Reads `path` and resolves relative paths against its directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|e| ConfigError {
            message: format!("failed to read {}: {e}", path.display()),
        })?;
        let mut config = Self::from_toml_str(&raw).map_err(|e| ConfigError {
            message: format!("failed to parse {}: {}", path.display(), e.message),
        })?;

        if let Some(dir) = config.build.out_dir.take() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            config.build.out_dir = Some(if dir.is_absolute() { dir } else { base.join(dir) });
        }
        Ok(config)
    }

    /// Uses `explicit` if given, otherwise the nearest `safescript.toml` above
    /// `input`. No file at all yields the defaults.
    pub fn resolve(
        input: &Path,
        explicit: Option<&Path>,
    ) -> Result<(Self, Option<PathBuf>), ConfigError> {
        let found = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => find_config(input),
        };
        match found {
            Some(path) => Ok((Self::load(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }
}

pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut cur = if start.is_file() {
        start.parent()?.to_path_buf()
    } else {
        start.to_path_buf()
    };

    loop {
        let candidate = cur.join(CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !cur.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.build.preamble);
        assert!(config.analysis.borrow_check);
    }

    #[test]
    fn kebab_case_keys() {
        let config = Config::from_toml_str(
            "[build]\nout-dir = \"dist\"\npreamble = false\n[analysis]\nborrow-check = false\n",
        )
        .unwrap();
        assert_eq!(config.build.out_dir, Some(PathBuf::from("dist")));
        assert!(!config.build.preamble);
        assert!(!config.analysis.borrow_check);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::from_toml_str("[build]\noutdir = \"x\"\n").unwrap_err();
        assert!(err.message.contains("outdir"), "unexpected: {}", err.message);
    }

    #[test]
    fn discovery_walks_up_and_resolves_out_dir() {
        let root = tempfile::tempdir().expect("tempdir");
        let nested = root.path().join("src").join("deep");
        fs::create_dir_all(&nested).unwrap();
        fs::write(root.path().join(CONFIG_FILE), "[build]\nout-dir = \"dist\"\n").unwrap();
        let input = nested.join("main.ss");
        fs::write(&input, "let a = 1\n").unwrap();

        let (config, path) = Config::resolve(&input, None).unwrap();
        assert_eq!(path, Some(root.path().join(CONFIG_FILE)));
        assert_eq!(config.build.out_dir, Some(root.path().join("dist")));
    }

    #[test]
    fn missing_config_is_not_an_error() {
        let root = tempfile::tempdir().expect("tempdir");
        let input = root.path().join("main.ss");
        fs::write(&input, "").unwrap();
        // A config further up (e.g. in the system temp dir) would be picked up;
        // only assert that resolution succeeds.
        assert!(Config::resolve(&input, None).is_ok());
    }
}
