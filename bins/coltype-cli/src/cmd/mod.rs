pub mod decode;
pub mod describe;
pub mod roundtrip;

use coltype_api::{ColumnValue, SqlType};
use coltype_engine::{EntityMapping, MappingConfig, TypeRegistry};

use crate::catalog;
use crate::config::MappingArgs;
use crate::error::CliError;

pub fn load_mapping(args: &MappingArgs) -> Result<EntityMapping, CliError> {
    let config = MappingConfig::load(&args.mapping)?;
    tracing::info!(mapping = %args.mapping, entity = %config.entity, "loaded mapping");
    Ok(EntityMapping::from_config(
        &config,
        &TypeRegistry::with_builtins(),
        &catalog::context(),
    )?)
}

/// Raw `--value` text as the column value a driver would return for `sql_type`.
pub fn parse_raw(text: &str, sql_type: SqlType) -> Result<ColumnValue, CliError> {
    let invalid = |detail: String| CliError::Value {
        value: text.to_string(),
        sql_type,
        detail,
    };
    Ok(match sql_type {
        SqlType::Varchar => ColumnValue::Text(text.to_string()),
        SqlType::Char => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => ColumnValue::Char(c),
                _ => return Err(invalid("expected exactly one character".into())),
            }
        }
        SqlType::Integer => ColumnValue::Int(text.parse().map_err(|e| invalid(format!("{e}")))?),
        SqlType::SmallInt => {
            ColumnValue::SmallInt(text.parse().map_err(|e| invalid(format!("{e}")))?)
        }
        SqlType::TinyInt => ColumnValue::TinyInt(text.parse().map_err(|e| invalid(format!("{e}")))?),
        SqlType::BigInt => ColumnValue::BigInt(text.parse().map_err(|e| invalid(format!("{e}")))?),
        SqlType::Boolean => ColumnValue::Bool(text.parse().map_err(|e| invalid(format!("{e}")))?),
        SqlType::Double => ColumnValue::Double(text.parse().map_err(|e| invalid(format!("{e}")))?),
        SqlType::Real => ColumnValue::Real(text.parse().map_err(|e| invalid(format!("{e}")))?),
    })
}
