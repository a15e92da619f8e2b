use crate::cmd::{load_mapping, parse_raw};
use crate::config::ValueArgs;
use crate::error::CliError;

pub fn run(args: ValueArgs) -> Result<(), CliError> {
    let mapping = load_mapping(&args.mapping)?;
    let ut = mapping.column(&args.column)?.user_type()?;

    let raw = args
        .value
        .as_deref()
        .map(|text| parse_raw(text, ut.sql_type()))
        .transpose()?;
    let decoded = ut
        .decode(raw.as_ref())
        .map_err(|e| e.with_context(format!("column '{}'", args.column)))?;

    println!("{}", serde_json::to_string(&decoded)?);
    Ok(())
}
