use std::collections::BTreeMap;

use crate::error::AdapterError;

/// Flat string-keyed option set handed to an adapter once at setup time.
///
/// Every value is text; interpretation belongs to the adapter.
pub type Options = BTreeMap<String, String>;

/// Parameter type for adapter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Bool,
    Str,
}

/// Declaration of a single adapter option.
///
/// Adapters export these via `UserTypeFactory::config_params()`.
/// `parse_options` validates raw option text against them BEFORE the
/// adapter is created.
#[derive(Debug, Clone)]
pub struct ConfigParam {
    pub name: String,
    pub param_type: ParamType,
    pub required: bool,
    pub default: Option<ParamValue>,
    pub description: String,
}

/// Typed option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Bool(bool),
    Str(String),
}

/// Validated option values, passed to the adapter at creation time.
///
/// Adapter reads values via typed getters.
#[derive(Debug, Clone, Default)]
pub struct ConfigValues {
    entries: Vec<(String, ParamValue)>,
}

impl ConfigValues {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn set(&mut self, name: impl Into<String>, value: ParamValue) {
        let name = name.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == &name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name) {
            Some(ParamValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(ParamValue::Str(v)) => Some(v),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Option parsing & validation
// ---------------------------------------------------------------------------

/// Parse raw adapter options into `ConfigValues`.
///
/// For each declared param:
/// - If present in `options`: convert the text according to `ParamType`.
/// - If absent with default: use default value.
/// - If absent and required: return error.
///
/// Keys not declared in `params` are ignored.
pub fn parse_options(options: &Options, params: &[ConfigParam]) -> Result<ConfigValues, AdapterError> {
    for key in options.keys() {
        if !params.iter().any(|p| &p.name == key) {
            tracing::debug!(option = %key, "ignoring unknown adapter option");
        }
    }

    let mut values = ConfigValues::new();
    for param in params {
        match options.get(&param.name) {
            Some(raw) => {
                values.set(&param.name, text_to_param_value(raw, param)?);
            }
            None => {
                if let Some(ref default) = param.default {
                    values.set(&param.name, default.clone());
                } else if param.required {
                    return Err(AdapterError::config(format!(
                        "missing required parameter '{}'",
                        param.name
                    )));
                }
            }
        }
    }

    Ok(values)
}

/// Convert a single option text to a `ParamValue` according to the declared type.
fn text_to_param_value(raw: &str, param: &ConfigParam) -> Result<ParamValue, AdapterError> {
    match param.param_type {
        ParamType::Bool => {
            if raw.trim().eq_ignore_ascii_case("true") {
                Ok(ParamValue::Bool(true))
            } else if raw.trim().eq_ignore_ascii_case("false") {
                Ok(ParamValue::Bool(false))
            } else {
                Err(AdapterError::config(format!(
                    "parameter '{}': expected 'true' or 'false', got {raw:?}",
                    param.name
                )))
            }
        }
        ParamType::Str => Ok(ParamValue::Str(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn params() -> Vec<ConfigParam> {
        vec![
            ConfigParam {
                name: "target".into(),
                param_type: ParamType::Str,
                required: true,
                default: None,
                description: "required text".into(),
            },
            ConfigParam {
                name: "strict".into(),
                param_type: ParamType::Bool,
                required: false,
                default: Some(ParamValue::Bool(true)),
                description: "flag with default".into(),
            },
        ]
    }

    fn options(pairs: &[(&str, &str)]) -> Options {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_fill_missing_keys() {
        let values = parse_options(&options(&[("target", "x")]), &params()).unwrap();
        assert_eq!(values.get_str("target"), Some("x"));
        assert_eq!(values.get_bool("strict"), Some(true));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let values =
            parse_options(&options(&[("target", "x"), ("bogus", "1")]), &params()).unwrap();
        assert_eq!(values.len(), 2);
        assert!(values.get("bogus").is_none());
    }

    #[test]
    fn missing_required_key_is_config_error() {
        let err = parse_options(&Options::new(), &params()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.message().contains("target"));
    }

    #[test]
    fn bool_text_is_case_insensitive() {
        let values =
            parse_options(&options(&[("target", "x"), ("strict", "FALSE")]), &params()).unwrap();
        assert_eq!(values.get_bool("strict"), Some(false));
    }

    #[test]
    fn bool_rejects_other_text() {
        let err = parse_options(&options(&[("target", "x"), ("strict", "yes")]), &params())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn typed_getter_mismatch_returns_none() {
        let mut values = ConfigValues::new();
        values.set("flag", ParamValue::Bool(true));
        assert_eq!(values.get_str("flag"), None);
        values.set("flag", ParamValue::Str("true".into()));
        assert_eq!(values.get_str("flag"), Some("true"));
        assert_eq!(values.len(), 1);
    }
}
