use crate::cmd::load_mapping;
use crate::config::MappingArgs;
use crate::error::CliError;

pub fn run(args: MappingArgs) -> Result<(), CliError> {
    let mapping = load_mapping(&args)?;
    println!("entity {}", mapping.entity());
    for column in mapping.columns() {
        let ut = column.user_type()?;
        println!(
            "  {:<16} {:<8} {:<10} {:<12} {}",
            column.name(),
            column.kind(),
            ut.sql_type(),
            ut.returned_type(),
            if ut.is_mutable() { "mutable" } else { "immutable" }
        );
    }
    Ok(())
}
