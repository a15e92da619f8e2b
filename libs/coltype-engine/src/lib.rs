//! Host-side glue for column user types: kind registry, configure-once
//! slots and entity mappings built from TOML.

pub mod config;
pub mod error;
pub mod mapping;
pub mod registry;
pub mod slot;

pub use config::{ColumnConfig, MappingConfig};
pub use error::EngineError;
pub use mapping::{EntityMapping, MappedColumn, Record};
pub use registry::TypeRegistry;
pub use slot::UserTypeSlot;
