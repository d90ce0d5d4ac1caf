//! The `config.json` substitution context.
//!
//! The configuration is deliberately schemaless: whatever keys the file
//! holds are handed to the template engine as-is. Only the optional
//! `icon.background` pair is inspected by the tooling itself.
//!
//! ```json
//! {
//!   "name": "my-extension",
//!   "icon": { "background": ["#FF5500", "#0055FF"] }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const GLYPH_FILE_NAME: &str = "glyph.svg";

/// Icon parameters as they appear in `config.json`.
#[derive(Debug, Clone, Deserialize)]
struct IconSettings {
    background: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Configuration {
    dir: PathBuf,
    values: Map<String, Value>,
}

impl Configuration {
    /// Loads `<config_dir>/config.json`.
    pub fn load(config_dir: &Path) -> Result<Self> {
        let path = config_dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Err(Error::ConfigNotFound(config_dir.to_owned()));
        }
        let text = fs::read_to_string(&path).map_err(|err| Error::ConfigParse {
            path: path.clone(),
            reason: err.to_string(),
        })?;
        let values = Self::parse(&text).map_err(|reason| Error::ConfigParse {
            path: path.clone(),
            reason,
        })?;

        tracing::debug!(keys = values.len(), "loaded {}", path.display());
        Ok(Self {
            dir: config_dir.to_owned(),
            values,
        })
    }

    /// Builds a configuration from an in-memory JSON object.
    pub fn from_values(dir: impl Into<PathBuf>, values: Map<String, Value>) -> Self {
        Self {
            dir: dir.into(),
            values,
        }
    }

    fn parse(text: &str) -> std::result::Result<Map<String, Value>, String> {
        match serde_json::from_str::<Value>(text).map_err(|e| e.to_string())? {
            Value::Object(values) => Ok(values),
            other => Err(format!(
                "expected a JSON object at the top level, found {}",
                json_kind(&other)
            )),
        }
    }

    /// The directory `config.json` was read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Path of the glyph the icon trigger looks for.
    pub fn glyph_path(&self) -> PathBuf {
        self.dir.join(GLYPH_FILE_NAME)
    }

    /// The gradient start/end colors from `icon.background`.
    ///
    /// `None` unless `icon.background` is a list holding at least two strings.
    pub fn icon_background(&self) -> Option<(String, String)> {
        let icon = self.values.get("icon")?;
        let settings = IconSettings::deserialize(icon).ok()?;
        let mut colors = settings.background.into_iter();
        match (colors.next(), colors.next()) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config_from(value: Value) -> Configuration {
        match value {
            Value::Object(values) => Configuration::from_values("cfg", values),
            _ => panic!("test config must be an object"),
        }
    }

    #[test]
    fn loads_object() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), r#"{"title":"Hello"}"#).unwrap();

        let config = Configuration::load(dir.path()).unwrap();
        assert_eq!(config.values()["title"], json!("Hello"));
        assert_eq!(config.dir(), dir.path());
        assert_eq!(config.glyph_path(), dir.path().join("glyph.svg"));
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = Configuration::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(_)));
        assert!(err.to_string().contains("config.json not found"));
    }

    #[test]
    fn malformed_json_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "{ not json").unwrap();
        let err = Configuration::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn non_object_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "[1, 2, 3]").unwrap();
        let err = Configuration::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn icon_background_pair() {
        let config = config_from(json!({
            "icon": { "background": ["#FF0000", "#0000FF", "#00FF00"] }
        }));
        assert_eq!(
            config.icon_background(),
            Some(("#FF0000".to_owned(), "#0000FF".to_owned()))
        );
    }

    #[test]
    fn icon_background_malformed() {
        for value in [
            json!({}),
            json!({ "icon": null }),
            json!({ "icon": { "background": "#FF0000" } }),
            json!({ "icon": { "background": ["#FF0000"] } }),
            json!({ "icon": { "background": [1, 2] } }),
            json!({ "icon": { "colors": ["#FF0000", "#0000FF"] } }),
        ] {
            assert_eq!(config_from(value.clone()).icon_background(), None, "{value}");
        }
    }
}
