use std::hash::{DefaultHasher, Hash, Hasher};

use crate::column::{ColumnReader, ColumnValue, ColumnWriter, SqlType};
use crate::config::{parse_options, ConfigParam, ConfigValues, Options};
use crate::enums::EnumRegistry;
use crate::error::AdapterError;
use crate::value::DomainValue;

/// Custom scalar type adapter: one domain value ↔ one column value.
///
/// The host decides when each method is called and supplies the live
/// reader/writer. Implementations hold only their immutable configuration,
/// so one instance may serve concurrent reads and writes.
pub trait UserType: Send + Sync {
    /// Column types the persisted form occupies. Always one element here.
    fn sql_types(&self) -> &[SqlType];

    /// Domain kind name (`"boolean"`, `"timestamp"`, or the enum type).
    fn returned_type(&self) -> &str;

    /// Raw column value → domain value. `None` in, `None` out.
    fn decode(&self, column: Option<&ColumnValue>) -> Result<Option<DomainValue>, AdapterError>;

    /// Domain value → raw column value. `None` means bind SQL NULL.
    fn to_column(&self, value: Option<&DomainValue>) -> Result<Option<ColumnValue>, AdapterError>;

    /// Whether a returned value can change in place.
    fn is_mutable(&self) -> bool;

    /// Write the encoded value at `index`, SQL NULL included.
    fn encode(
        &self,
        value: Option<&DomainValue>,
        sink: &mut dyn ColumnWriter,
        index: usize,
    ) -> Result<(), AdapterError> {
        self.null_safe_set(sink, value, index)
    }

    /// Read the first of `names` from the current row and decode it.
    fn null_safe_get(
        &self,
        row: &dyn ColumnReader,
        names: &[&str],
    ) -> Result<Option<DomainValue>, AdapterError> {
        let column = names
            .first()
            .ok_or_else(|| AdapterError::io("no column name supplied"))?;
        let raw = row.read(column)?;
        let value = self
            .decode(raw.as_ref())
            .map_err(|e| e.with_context(format!("column '{column}'")))?;
        tracing::trace!(
            column = %column,
            original = ?raw,
            found = ?value,
            "extracted column value"
        );
        Ok(value)
    }

    /// Encode `value` and bind it at `index`.
    fn null_safe_set(
        &self,
        sink: &mut dyn ColumnWriter,
        value: Option<&DomainValue>,
        index: usize,
    ) -> Result<(), AdapterError> {
        let column = self
            .to_column(value)
            .map_err(|e| e.with_context(format!("parameter {index}")))?;
        tracing::trace!(
            index,
            sql_type = %self.sql_type(),
            bound = ?column,
            original = ?value,
            "binding parameter"
        );
        match column {
            Some(column) => sink.write(index, column),
            None => sink.write_null(index, self.sql_type()),
        }
    }

    /// The single column type.
    fn sql_type(&self) -> SqlType {
        self.sql_types()[0]
    }

    /// Null-safe value equality, used for dirty checking.
    fn values_equal(&self, a: Option<&DomainValue>, b: Option<&DomainValue>) -> bool {
        a == b
    }

    /// Consistent with `values_equal`.
    fn hash_of(&self, value: &DomainValue) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    /// Independent copy for mutable types; the value itself otherwise.
    fn deep_copy(&self, value: Option<&DomainValue>) -> Option<DomainValue> {
        value.cloned()
    }

    /// Value → second-level cache form.
    fn disassemble(&self, value: &DomainValue) -> DomainValue {
        value.clone()
    }

    /// Second-level cache form → value.
    fn assemble(&self, cached: &DomainValue) -> DomainValue {
        cached.clone()
    }

    /// Value to store into `target` during an entity merge.
    fn replace(&self, original: &DomainValue, _target: &DomainValue) -> DomainValue {
        original.clone()
    }
}

/// Resources the host shares with adapters at configure time.
#[derive(Debug, Clone, Default)]
pub struct TypeContext {
    pub enums: EnumRegistry,
}

impl TypeContext {
    pub fn new(enums: EnumRegistry) -> Self {
        Self { enums }
    }
}

/// Static side of an adapter: its name, option schema and constructor.
pub trait UserTypeFactory: UserType + Sized + 'static {
    /// Kind name the host refers to this adapter by.
    const NAME: &'static str;

    fn config_params() -> Vec<ConfigParam>;

    /// Build from already-validated option values.
    fn create(config: &ConfigValues, ctx: &TypeContext) -> Result<Self, AdapterError>;

    /// Parse raw options against `config_params()` and build.
    fn configure(options: &Options, ctx: &TypeContext) -> Result<Self, AdapterError> {
        let values = parse_options(options, &Self::config_params())?;
        Self::create(&values, ctx).map_err(|e| e.with_context(Self::NAME))
    }
}

/// Reject a domain value of the wrong kind on the encode path.
pub fn unexpected_value(expected: &str, value: &DomainValue) -> AdapterError {
    AdapterError::encode(format!(
        "expected {expected} value, got {} [{value}]",
        value.kind()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{Bound, BoundParameters, Row};
    use crate::value::Timestamp;

    /// Minimal adapter: booleans as 1/0 integers.
    struct Flag;

    impl UserType for Flag {
        fn sql_types(&self) -> &[SqlType] {
            &[SqlType::Integer]
        }

        fn returned_type(&self) -> &str {
            "boolean"
        }

        fn decode(
            &self,
            column: Option<&ColumnValue>,
        ) -> Result<Option<DomainValue>, AdapterError> {
            match column {
                None => Ok(None),
                Some(ColumnValue::Int(v)) => Ok(Some(DomainValue::Bool(*v != 0))),
                Some(other) => Err(AdapterError::decode(format!("not a flag: {other}"))),
            }
        }

        fn to_column(
            &self,
            value: Option<&DomainValue>,
        ) -> Result<Option<ColumnValue>, AdapterError> {
            match value {
                None => Ok(None),
                Some(DomainValue::Bool(b)) => Ok(Some(ColumnValue::Int(i32::from(*b)))),
                Some(other) => Err(unexpected_value("boolean", other)),
            }
        }

        fn is_mutable(&self) -> bool {
            false
        }
    }

    #[test]
    fn encode_writes_explicit_null() {
        let mut params = BoundParameters::new();
        Flag.encode(None, &mut params, 3).unwrap();
        assert_eq!(params.get(3), Some(&Bound::Null(SqlType::Integer)));
    }

    #[test]
    fn null_safe_get_reads_first_name() {
        let row = Row::new()
            .with("a", Some(ColumnValue::Int(1)))
            .with("b", None);
        assert_eq!(
            Flag.null_safe_get(&row, &["a", "b"]).unwrap(),
            Some(DomainValue::Bool(true))
        );
        assert_eq!(Flag.null_safe_get(&row, &["b"]).unwrap(), None);
        assert!(Flag.null_safe_get(&row, &[]).is_err());
    }

    #[test]
    fn decode_error_names_the_column() {
        let row = Row::new().with("a", Some("x".into()));
        let err = Flag.null_safe_get(&row, &["a"]).unwrap_err();
        assert!(err.is_decode());
        assert!(err.message().starts_with("column 'a'"));
    }

    #[test]
    fn encode_and_null_safe_set_bind_alike() {
        let mut via_encode = BoundParameters::new();
        let mut via_set = BoundParameters::new();
        let value = DomainValue::Bool(true);
        Flag.encode(Some(&value), &mut via_encode, 2).unwrap();
        Flag.null_safe_set(&mut via_set, Some(&value), 2).unwrap();
        assert_eq!(via_encode.get(2), via_set.get(2));

        let ts = DomainValue::Timestamp(Timestamp::from_ymd(2020, 1, 1).unwrap());
        let err = Flag.encode(Some(&ts), &mut via_encode, 5).unwrap_err();
        assert!(err.message().starts_with("parameter 5"));
    }

    #[test]
    fn wrong_kind_is_encode_error() {
        let ts = DomainValue::Timestamp(Timestamp::from_ymd(2020, 1, 1).unwrap());
        let mut params = BoundParameters::new();
        let err = Flag.null_safe_set(&mut params, Some(&ts), 1).unwrap_err();
        assert!(err.is_encode());
        assert!(params.is_empty());
    }

    #[test]
    fn default_equality_and_hash_agree() {
        let a = DomainValue::Bool(true);
        let b = DomainValue::Bool(true);
        assert!(Flag.values_equal(Some(&a), Some(&b)));
        assert!(Flag.values_equal(None, None));
        assert!(!Flag.values_equal(Some(&a), None));
        assert_eq!(Flag.hash_of(&a), Flag.hash_of(&b));
    }
}
