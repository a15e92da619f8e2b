use std::path::Path;

use serde::Deserialize;

use coltype_api::Options;

use crate::error::EngineError;

/// Entity mapping description, parsed from TOML.
///
/// ```toml
/// entity = "Person"
///
/// [[columns]]
/// name = "sex"
/// type = "enum"
/// options = { enumClass = "Sex", identifierMethod = "toInt", valueOfMethod = "fromInt" }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct MappingConfig {
    pub entity: String,

    #[serde(default)]
    pub columns: Vec<ColumnConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnConfig {
    pub name: String,

    /// Adapter kind, e.g. `enum`, `boolean`, `date`.
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub options: toml::Table,
}

impl MappingConfig {
    /// Load a mapping from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content).map_err(|e| e.with_context(path.display()))
    }

    /// Parse a mapping from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, EngineError> {
        toml::from_str(toml_str).map_err(|e| EngineError::Config(e.to_string()))
    }

    pub fn column(&self, name: &str) -> Option<&ColumnConfig> {
        self.columns.iter().find(|c| c.name == name)
    }
}

impl ColumnConfig {
    /// Flatten the option table into the adapter's string options.
    ///
    /// Scalars become their textual form; arrays and tables are rejected.
    pub fn flat_options(&self) -> Result<Options, EngineError> {
        let mut options = Options::new();
        for (key, value) in &self.options {
            let text = match value {
                toml::Value::String(s) => s.clone(),
                toml::Value::Boolean(b) => b.to_string(),
                toml::Value::Integer(i) => i.to_string(),
                toml::Value::Float(f) => f.to_string(),
                toml::Value::Datetime(d) => d.to_string(),
                toml::Value::Array(_) | toml::Value::Table(_) => {
                    return Err(EngineError::Config(format!(
                        "column '{}': option '{key}' must be a string, boolean or number",
                        self.name
                    )));
                }
            };
            options.insert(key.clone(), text);
        }
        Ok(options)
    }
}
