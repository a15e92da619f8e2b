use serde::Serialize;

use coltype_api::{ColumnValue, DomainValue, SqlType};

use crate::cmd::{load_mapping, parse_raw};
use crate::config::ValueArgs;
use crate::error::CliError;

#[derive(Serialize)]
struct Roundtrip {
    column: String,
    sql_type: SqlType,
    raw: Option<ColumnValue>,
    decoded: Option<DomainValue>,
    bound: Option<ColumnValue>,
}

pub fn run(args: ValueArgs) -> Result<(), CliError> {
    let mapping = load_mapping(&args.mapping)?;
    let ut = mapping.column(&args.column)?.user_type()?;
    let column_ctx = format!("column '{}'", args.column);

    let raw = args
        .value
        .as_deref()
        .map(|text| parse_raw(text, ut.sql_type()))
        .transpose()?;
    let decoded = ut
        .decode(raw.as_ref())
        .map_err(|e| e.with_context(&column_ctx))?;
    let bound = ut
        .to_column(decoded.as_ref())
        .map_err(|e| e.with_context(&column_ctx))?;

    let report = Roundtrip {
        column: args.column,
        sql_type: ut.sql_type(),
        raw,
        decoded,
        bound,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
