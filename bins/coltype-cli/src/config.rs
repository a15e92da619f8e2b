use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "coltype", about = "Inspect column user type mappings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List mapped columns with their adapter, SQL type and mutability
    Describe(MappingArgs),
    /// Decode one raw column value and print it as JSON
    Decode(ValueArgs),
    /// Decode then encode one raw column value and print what gets bound
    Roundtrip(ValueArgs),
}

#[derive(Args, Clone, Debug)]
pub struct MappingArgs {
    /// Path to the TOML mapping file
    #[arg(long, default_value = "mapping.toml", env = "COLTYPE_MAPPING")]
    pub mapping: String,
}

#[derive(Args, Clone, Debug)]
pub struct ValueArgs {
    #[command(flatten)]
    pub mapping: MappingArgs,

    /// Mapped column name
    #[arg(long)]
    pub column: String,

    /// Raw column text; omit for SQL NULL
    #[arg(long)]
    pub value: Option<String>,
}
