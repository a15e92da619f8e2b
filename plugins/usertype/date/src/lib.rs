mod pattern;

use coltype_api::usertype::unexpected_value;
use coltype_api::{
    AdapterError, ColumnValue, ConfigParam, ConfigParams, ConfigValues, DomainValue, SqlType,
    Timestamp, TypeContext, UserType, UserTypeFactory,
};

use crate::pattern::DatePattern;

pub const DEFAULT_FORMAT: &str = "yyyyMMddHHmmss";

#[derive(Debug, ConfigParams)]
pub struct DateOptions {
    #[param(description = "Date pattern of the stored text, e.g. yyyyMMddHHmmss")]
    pub format: String,
}

impl Default for DateOptions {
    fn default() -> Self {
        Self {
            format: DEFAULT_FORMAT.to_string(),
        }
    }
}

/// Persists a timestamp as text in a configurable date pattern.
///
/// `Timestamp` can be changed in place, so this type reports itself mutable
/// and hands out fresh copies from `deep_copy` and `replace`.
#[derive(Debug, Clone)]
pub struct DateUserType {
    pattern: DatePattern,
    sql_types: [SqlType; 1],
}

impl DateUserType {
    /// The pattern as configured.
    pub fn format(&self) -> &str {
        self.pattern.source()
    }
}

impl UserType for DateUserType {
    fn sql_types(&self) -> &[SqlType] {
        &self.sql_types
    }

    fn returned_type(&self) -> &str {
        "timestamp"
    }

    fn decode(&self, column: Option<&ColumnValue>) -> Result<Option<DomainValue>, AdapterError> {
        let text = match column {
            None => return Ok(None),
            Some(ColumnValue::Text(text)) => text,
            Some(other) => {
                return Err(AdapterError::decode(format!(
                    "expected text column for date, got [{other}]"
                )));
            }
        };

        let parsed = self.pattern.parse(text).map_err(|e| {
            AdapterError::from(e).with_context(format!(
                "Failed to parse [{text}] with [{}]",
                self.pattern.source()
            ))
        })?;
        Ok(Some(DomainValue::Timestamp(Timestamp::new(parsed))))
    }

    fn to_column(&self, value: Option<&DomainValue>) -> Result<Option<ColumnValue>, AdapterError> {
        let ts = match value {
            None => return Ok(None),
            Some(DomainValue::Timestamp(ts)) => ts,
            Some(other) => return Err(unexpected_value("timestamp", other)),
        };

        let text = self.pattern.format(ts.as_naive()).map_err(|e| {
            AdapterError::encode(format!(
                "Failed to format [{ts}] with [{}]",
                self.pattern.source()
            ))
            .with_source(e)
        })?;

        // Fields outside the pattern are dropped on purpose; the text itself
        // must still read back through the same pattern.
        let unreadable = |detail: String| {
            AdapterError::encode(format!(
                "[{ts}] formats to [{text}] which [{}] cannot read back: {detail}",
                self.pattern.source()
            ))
        };
        let reread = self
            .pattern
            .parse(&text)
            .map_err(|e| unreadable(e.to_string()).with_source(e))?;
        let reformatted = self.pattern.format(&reread).map_err(|e| unreadable(e.to_string()))?;
        if reformatted != text {
            return Err(unreadable(format!("reads back as [{reformatted}]")));
        }
        Ok(Some(ColumnValue::Text(text)))
    }

    fn is_mutable(&self) -> bool {
        true
    }

    fn deep_copy(&self, value: Option<&DomainValue>) -> Option<DomainValue> {
        value.map(copy_timestamp)
    }

    fn replace(&self, original: &DomainValue, _target: &DomainValue) -> DomainValue {
        copy_timestamp(original)
    }
}

/// Fresh `Timestamp` holding the same instant; other kinds are cloned.
fn copy_timestamp(value: &DomainValue) -> DomainValue {
    match value {
        DomainValue::Timestamp(ts) => DomainValue::Timestamp(Timestamp::new(*ts.as_naive())),
        other => other.clone(),
    }
}

impl UserTypeFactory for DateUserType {
    const NAME: &'static str = "date";

    fn config_params() -> Vec<ConfigParam> {
        DateOptions::config_params()
    }

    fn create(config: &ConfigValues, _ctx: &TypeContext) -> Result<Self, AdapterError> {
        let options = DateOptions::from_config(config)?;
        let pattern = DatePattern::compile(&options.format)?;

        tracing::debug!(
            format = %pattern.source(),
            strftime = %pattern.strftime(),
            "date user type initialized"
        );

        Ok(Self {
            pattern,
            sql_types: [SqlType::Varchar],
        })
    }
}
