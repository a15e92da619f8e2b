pub mod column;
pub mod config;
pub mod enums;
pub mod error;
pub mod usertype;
pub mod value;

pub use coltype_api_derive::ConfigParams;

pub use column::{Bound, BoundParameters, ColumnReader, ColumnValue, ColumnWriter, Row, SqlType};
pub use config::{ConfigParam, ConfigValues, Options, ParamType, ParamValue};
pub use enums::{EnumRegistry, Identifier, IdentifierType, PersistentEnum};
pub use error::{AdapterError, ErrorKind};
pub use usertype::{TypeContext, UserType, UserTypeFactory};
pub use value::{DomainValue, EnumMember, Timestamp};
