//! Named identifier accessors and value factories for persisted enums.
//!
//! An enum type is registered once with its members plus any number of
//! named operations. Every registration gets the canonical pair for free:
//!
//! - `name`: member → its name (`String`)
//! - `valueOf`: name → member
//!
//! Further pairs are added by name, e.g. `toInt` / `fromInt`. Each operation
//! records the `IdentifierType` it produces or accepts, so an adapter can
//! check at configure time that the factory it picked accepts exactly what
//! the accessor it picked returns.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::column::{ColumnValue, SqlType};
use crate::error::AdapterError;
use crate::value::EnumMember;

/// Name of the accessor every registered enum gets.
pub const NAME_ACCESSOR: &str = "name";
/// Name of the factory every registered enum gets.
pub const VALUE_OF_FACTORY: &str = "valueOf";

/// Rust enum that can be persisted through the enum adapter.
pub trait PersistentEnum: Copy + PartialEq + Send + Sync + 'static {
    /// Name the enum is looked up by (`enumClass` option).
    const TYPE_NAME: &'static str;

    /// All members, in declaration order.
    fn members() -> &'static [Self];

    /// Canonical member name.
    fn name(&self) -> &'static str;

    fn ordinal(&self) -> usize {
        Self::members()
            .iter()
            .position(|m| m == self)
            .unwrap_or_default()
    }

    fn member(&self) -> EnumMember {
        EnumMember::new(Self::TYPE_NAME, self.name(), self.ordinal())
    }

    /// Typed member back from a decoded handle. `None` if it belongs to another type.
    fn from_member(member: EnumMember) -> Option<Self> {
        if member.type_name() != Self::TYPE_NAME {
            return None;
        }
        Self::members().get(member.ordinal()).copied()
    }
}

// ---------------------------------------------------------------------------
// Identifier types
// ---------------------------------------------------------------------------

/// Semantic type of the value an enum member is reduced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierType {
    String,
    Char,
    Int,
    Short,
    Byte,
    Long,
    Boolean,
    Double,
    Float,
    /// Any other type. Accessors may return it, but no column type maps to it.
    Other(&'static str),
}

impl IdentifierType {
    /// Column type an identifier of this type is stored in.
    pub const fn sql_type(self) -> Option<SqlType> {
        match self {
            IdentifierType::String => Some(SqlType::Varchar),
            IdentifierType::Char => Some(SqlType::Char),
            IdentifierType::Int => Some(SqlType::Integer),
            IdentifierType::Short => Some(SqlType::SmallInt),
            IdentifierType::Byte => Some(SqlType::TinyInt),
            IdentifierType::Long => Some(SqlType::BigInt),
            IdentifierType::Boolean => Some(SqlType::Boolean),
            IdentifierType::Double => Some(SqlType::Double),
            IdentifierType::Float => Some(SqlType::Real),
            IdentifierType::Other(_) => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            IdentifierType::String => "string",
            IdentifierType::Char => "char",
            IdentifierType::Int => "int",
            IdentifierType::Short => "short",
            IdentifierType::Byte => "byte",
            IdentifierType::Long => "long",
            IdentifierType::Boolean => "boolean",
            IdentifierType::Double => "double",
            IdentifierType::Float => "float",
            IdentifierType::Other(name) => name,
        }
    }
}

impl fmt::Display for IdentifierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rust type usable as an enum identifier.
pub trait Identifier: Sized + 'static {
    const TYPE: IdentifierType;

    fn to_column(&self) -> Result<ColumnValue, AdapterError>;

    /// `None` when the column value is not of this identifier's kind.
    fn from_column(value: &ColumnValue) -> Option<Self>;
}

macro_rules! identifier_impl {
    ($ty:ty, $id:ident, $variant:ident) => {
        impl Identifier for $ty {
            const TYPE: IdentifierType = IdentifierType::$id;

            fn to_column(&self) -> Result<ColumnValue, AdapterError> {
                Ok(ColumnValue::$variant(*self))
            }

            fn from_column(value: &ColumnValue) -> Option<Self> {
                match value {
                    ColumnValue::$variant(v) => Some(*v),
                    _ => None,
                }
            }
        }
    };
}

identifier_impl!(i16, Short, SmallInt);
identifier_impl!(i8, Byte, TinyInt);
identifier_impl!(bool, Boolean, Bool);
identifier_impl!(f64, Double, Double);
identifier_impl!(f32, Float, Real);

impl Identifier for i32 {
    const TYPE: IdentifierType = IdentifierType::Int;

    fn to_column(&self) -> Result<ColumnValue, AdapterError> {
        Ok(ColumnValue::Int(*self))
    }

    fn from_column(value: &ColumnValue) -> Option<Self> {
        match value {
            ColumnValue::Int(v) => Some(*v),
            ColumnValue::SmallInt(v) => Some(i32::from(*v)),
            ColumnValue::TinyInt(v) => Some(i32::from(*v)),
            _ => None,
        }
    }
}

impl Identifier for i64 {
    const TYPE: IdentifierType = IdentifierType::Long;

    fn to_column(&self) -> Result<ColumnValue, AdapterError> {
        Ok(ColumnValue::BigInt(*self))
    }

    fn from_column(value: &ColumnValue) -> Option<Self> {
        match value {
            ColumnValue::BigInt(v) => Some(*v),
            ColumnValue::Int(v) => Some(i64::from(*v)),
            _ => None,
        }
    }
}

impl Identifier for char {
    const TYPE: IdentifierType = IdentifierType::Char;

    fn to_column(&self) -> Result<ColumnValue, AdapterError> {
        Ok(ColumnValue::Char(*self))
    }

    fn from_column(value: &ColumnValue) -> Option<Self> {
        match value {
            ColumnValue::Char(c) => Some(*c),
            // CHAR(1) columns frequently come back as one-character text.
            ColumnValue::Text(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

impl Identifier for String {
    const TYPE: IdentifierType = IdentifierType::String;

    fn to_column(&self) -> Result<ColumnValue, AdapterError> {
        Ok(ColumnValue::Text(self.clone()))
    }

    fn from_column(value: &ColumnValue) -> Option<Self> {
        value.as_text().map(str::to_string)
    }
}

// ---------------------------------------------------------------------------
// Bound operations
// ---------------------------------------------------------------------------

type AccessorFn = dyn Fn(EnumMember) -> Result<ColumnValue, AdapterError> + Send + Sync;
type FactoryFn = dyn Fn(&ColumnValue) -> Option<EnumMember> + Send + Sync;

/// Named operation member → identifier.
#[derive(Clone)]
pub struct IdentifierAccessor {
    name: String,
    return_type: IdentifierType,
    call: Arc<AccessorFn>,
}

impl IdentifierAccessor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn return_type(&self) -> IdentifierType {
        self.return_type
    }

    pub fn invoke(&self, member: EnumMember) -> Result<ColumnValue, AdapterError> {
        (self.call)(member)
    }
}

impl fmt::Debug for IdentifierAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}() -> {}", self.name, self.return_type)
    }
}

/// Named operation identifier → member.
#[derive(Clone)]
pub struct ValueFactory {
    name: String,
    param_type: IdentifierType,
    call: Arc<FactoryFn>,
}

impl ValueFactory {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param_type(&self) -> IdentifierType {
        self.param_type
    }

    /// `None` when no member matches (or the value has the wrong kind).
    pub fn invoke(&self, identifier: &ColumnValue) -> Option<EnumMember> {
        (self.call)(identifier)
    }
}

impl fmt::Debug for ValueFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.param_type)
    }
}

/// One registered enum type and its bound operations.
#[derive(Debug, Clone)]
pub struct EnumDescriptor {
    type_name: &'static str,
    members: Vec<EnumMember>,
    accessors: Vec<IdentifierAccessor>,
    factories: Vec<ValueFactory>,
}

impl EnumDescriptor {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn members(&self) -> &[EnumMember] {
        &self.members
    }

    /// Zero-argument accessor by name.
    pub fn accessor(&self, name: &str) -> Option<&IdentifierAccessor> {
        self.accessors.iter().find(|a| a.name == name)
    }

    /// Factory by name and exact parameter type.
    pub fn factory(&self, name: &str, param_type: IdentifierType) -> Option<&ValueFactory> {
        self.factories
            .iter()
            .find(|f| f.name == name && f.param_type == param_type)
    }

    fn put_accessor(&mut self, accessor: IdentifierAccessor) {
        self.accessors.retain(|a| a.name != accessor.name);
        self.accessors.push(accessor);
    }

    fn put_factory(&mut self, factory: ValueFactory) {
        self.factories
            .retain(|f| !(f.name == factory.name && f.param_type == factory.param_type));
        self.factories.push(factory);
    }
}

/// Enum types known to the host, keyed by `PersistentEnum::TYPE_NAME`.
#[derive(Debug, Clone, Default)]
pub struct EnumRegistry {
    types: HashMap<&'static str, EnumDescriptor>,
}

impl EnumRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `E` (idempotent) and return a binder for named operations.
    pub fn register<E: PersistentEnum>(&mut self) -> EnumBinder<'_, E> {
        let descriptor = self.types.entry(E::TYPE_NAME).or_insert_with(|| {
            let mut descriptor = EnumDescriptor {
                type_name: E::TYPE_NAME,
                members: E::members().iter().map(|m| m.member()).collect(),
                accessors: Vec::new(),
                factories: Vec::new(),
            };
            descriptor.put_accessor(accessor::<E, String>(NAME_ACCESSOR, |e: &E| {
                e.name().to_string()
            }));
            descriptor.put_factory(factory::<E, String>(VALUE_OF_FACTORY, |name: String| {
                E::members().iter().copied().find(|m| m.name() == name)
            }));
            descriptor
        });
        EnumBinder {
            descriptor,
            _enum: std::marker::PhantomData,
        }
    }

    pub fn lookup(&self, type_name: &str) -> Option<&EnumDescriptor> {
        self.types.get(type_name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Adds named operations to one registered enum.
pub struct EnumBinder<'r, E> {
    descriptor: &'r mut EnumDescriptor,
    _enum: std::marker::PhantomData<E>,
}

impl<E: PersistentEnum> EnumBinder<'_, E> {
    /// Bind a member → identifier accessor under `name`.
    pub fn identifier<T, F>(self, name: &str, f: F) -> Self
    where
        T: Identifier,
        F: Fn(&E) -> T + Send + Sync + 'static,
    {
        self.descriptor.put_accessor(accessor::<E, T>(name, f));
        self
    }

    /// Bind an identifier → member factory under `name`.
    pub fn value_of<T, F>(self, name: &str, f: F) -> Self
    where
        T: Identifier,
        F: Fn(T) -> Option<E> + Send + Sync + 'static,
    {
        self.descriptor.put_factory(factory::<E, T>(name, f));
        self
    }
}

fn accessor<E, T>(name: &str, f: impl Fn(&E) -> T + Send + Sync + 'static) -> IdentifierAccessor
where
    E: PersistentEnum,
    T: Identifier,
{
    IdentifierAccessor {
        name: name.to_string(),
        return_type: T::TYPE,
        call: Arc::new(move |member: EnumMember| {
            let value = E::from_member(member).ok_or_else(|| {
                AdapterError::encode(format!(
                    "[{member}] of enum '{}' is not a member of '{}'",
                    member.type_name(),
                    E::TYPE_NAME
                ))
            })?;
            f(&value).to_column()
        }),
    }
}

fn factory<E, T>(name: &str, f: impl Fn(T) -> Option<E> + Send + Sync + 'static) -> ValueFactory
where
    E: PersistentEnum,
    T: Identifier,
{
    ValueFactory {
        name: name.to_string(),
        param_type: T::TYPE,
        call: Arc::new(move |value: &ColumnValue| {
            T::from_column(value).and_then(&f).map(|e| e.member())
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Color {
        Red,
        Green,
    }

    impl PersistentEnum for Color {
        const TYPE_NAME: &'static str = "Color";

        fn members() -> &'static [Self] {
            &[Color::Red, Color::Green]
        }

        fn name(&self) -> &'static str {
            match self {
                Color::Red => "RED",
                Color::Green => "GREEN",
            }
        }
    }

    fn registry() -> EnumRegistry {
        let mut registry = EnumRegistry::new();
        registry
            .register::<Color>()
            .identifier("code", |c: &Color| match c {
                Color::Red => 'r',
                Color::Green => 'g',
            })
            .value_of("fromCode", |c: char| match c {
                'r' => Some(Color::Red),
                'g' => Some(Color::Green),
                _ => None,
            });
        registry
    }

    #[test]
    fn canonical_operations_are_bound() {
        let registry = registry();
        let color = registry.lookup("Color").unwrap();
        assert_eq!(
            color.members(),
            [Color::Red.member(), Color::Green.member()]
        );

        let name = color.accessor(NAME_ACCESSOR).unwrap();
        assert_eq!(name.return_type(), IdentifierType::String);
        assert_eq!(
            name.invoke(Color::Green.member()).unwrap(),
            ColumnValue::Text("GREEN".into())
        );

        let value_of = color.factory(VALUE_OF_FACTORY, IdentifierType::String).unwrap();
        assert_eq!(value_of.invoke(&"RED".into()), Some(Color::Red.member()));
        assert_eq!(value_of.invoke(&"BLUE".into()), None);
    }

    #[test]
    fn factory_lookup_requires_matching_param_type() {
        let registry = registry();
        let color = registry.lookup("Color").unwrap();
        assert!(color.factory("fromCode", IdentifierType::Char).is_some());
        assert!(color.factory("fromCode", IdentifierType::String).is_none());
    }

    #[test]
    fn char_identifier_accepts_single_char_text() {
        let registry = registry();
        let from_code = registry
            .lookup("Color")
            .unwrap()
            .factory("fromCode", IdentifierType::Char)
            .unwrap();
        assert_eq!(from_code.invoke(&"g".into()), Some(Color::Green.member()));
        assert_eq!(from_code.invoke(&"gg".into()), None);
    }

    #[test]
    fn member_round_trips_to_typed_enum() {
        assert_eq!(Color::Green.ordinal(), 1);
        assert_eq!(Color::from_member(Color::Green.member()), Some(Color::Green));
        assert_eq!(
            Color::from_member(EnumMember::new("Other", "GREEN", 1)),
            None
        );
    }

    #[test]
    fn registering_twice_keeps_bindings() {
        let mut registry = registry();
        registry.register::<Color>();
        assert_eq!(registry.len(), 1);
        assert!(registry.lookup("Color").unwrap().accessor("code").is_some());
    }

    #[test]
    fn other_identifier_has_no_sql_type() {
        assert_eq!(IdentifierType::Other("Person").sql_type(), None);
        assert_eq!(IdentifierType::Char.sql_type(), Some(SqlType::Char));
        assert_eq!(IdentifierType::Int.sql_type(), Some(SqlType::Integer));
    }
}
