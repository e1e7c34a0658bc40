//! User settings: call templates, the translation file location and the
//! optional unit id prefix.
//!
//! Settings are stored as TOML with camelCase keys:
//!
//! ```toml
//! twigTemplate = "{{ '%s'|trans }}"
//! phpTemplate = "__('%s')"
//! jsTemplate = "t('%s')"
//! translationPath = "translations/messages.en.xlf"
//! unitIdPrefix = ""
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Name of the settings file looked up at the project root.
pub const SETTINGS_FILE_NAME: &str = "xliffgen.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub twig_template: String,
    pub php_template: String,
    pub js_template: String,
    /// Path of the XLIFF file, relative to the project root.
    pub translation_path: String,
    pub unit_id_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            twig_template: "{{ '%s'|trans }}".to_string(),
            php_template: "__('%s')".to_string(),
            js_template: "t('%s')".to_string(),
            translation_path: "translations/messages.en.xlf".to_string(),
            unit_id_prefix: String::new(),
        }
    }
}

impl Settings {
    /// Parses settings from TOML. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, Error> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> Result<String, Error> {
        Ok(toml::to_string(self)?)
    }

    /// Reads settings from `path`; the file must exist.
    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Writes all settings to `path`, replacing the file.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Loads `<project_root>/xliffgen.toml`, or the defaults when the project
    /// has no settings file.
    pub fn load<P: AsRef<Path>>(project_root: P) -> Result<Self, Error> {
        let path = Self::default_path(project_root);
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        tracing::debug!(path = %path.display(), "loading settings");
        Self::read_from(path)
    }

    pub fn default_path<P: AsRef<Path>>(project_root: P) -> PathBuf {
        project_root.as_ref().join(SETTINGS_FILE_NAME)
    }

    /// Resolves `translation_path` against `project_root`. Absolute paths are
    /// returned unchanged.
    pub fn translation_file<P: AsRef<Path>>(&self, project_root: P) -> PathBuf {
        project_root.as_ref().join(&self.translation_path)
    }
}
