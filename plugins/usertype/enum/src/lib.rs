use coltype_api::enums::{IdentifierAccessor, ValueFactory, NAME_ACCESSOR, VALUE_OF_FACTORY};
use coltype_api::usertype::unexpected_value;
use coltype_api::{
    AdapterError, ColumnValue, ConfigParam, ConfigParams, ConfigValues, DomainValue,
    IdentifierType, SqlType, TypeContext, UserType, UserTypeFactory,
};

// ═══════════════════════════════════════════════════════════════
//  Options
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, ConfigParams)]
pub struct EnumOptions {
    #[param(name = "enumClass", required, description = "Registered enum type name")]
    pub enum_class: String,

    /// Must return the type `valueOfMethod` accepts.
    #[param(
        name = "identifierMethod",
        description = "Accessor reducing a member to the stored identifier"
    )]
    pub identifier_method: String,

    #[param(
        name = "valueOfMethod",
        description = "Factory turning a stored identifier back into a member"
    )]
    pub value_of_method: String,
}

impl Default for EnumOptions {
    fn default() -> Self {
        Self {
            enum_class: String::new(),
            identifier_method: NAME_ACCESSOR.to_string(),
            value_of_method: VALUE_OF_FACTORY.to_string(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  EnumUserType
// ═══════════════════════════════════════════════════════════════

/// Persists an enum member as an arbitrary identifier (code, short code, name).
///
/// The identifier accessor and value factory are resolved by name once,
/// at configure time; the column type follows the accessor's return type.
#[derive(Debug, Clone)]
pub struct EnumUserType {
    enum_type: &'static str,
    identifier_type: IdentifierType,
    identifier_method: IdentifierAccessor,
    value_of_method: ValueFactory,
    sql_types: [SqlType; 1],
}

impl EnumUserType {
    pub fn identifier_type(&self) -> IdentifierType {
        self.identifier_type
    }

    pub fn identifier_method(&self) -> &IdentifierAccessor {
        &self.identifier_method
    }

    pub fn value_of_method(&self) -> &ValueFactory {
        &self.value_of_method
    }
}

impl UserType for EnumUserType {
    fn sql_types(&self) -> &[SqlType] {
        &self.sql_types
    }

    fn returned_type(&self) -> &str {
        self.enum_type
    }

    fn decode(&self, column: Option<&ColumnValue>) -> Result<Option<DomainValue>, AdapterError> {
        let Some(identifier) = column else {
            return Ok(None);
        };

        match self.value_of_method.invoke(identifier) {
            Some(member) => Ok(Some(DomainValue::Enum(member))),
            None => Err(AdapterError::decode(format!(
                "no enum member of '{}' for identifier [{identifier}] (valueOf method '{}')",
                self.enum_type,
                self.value_of_method.name()
            ))),
        }
    }

    fn to_column(&self, value: Option<&DomainValue>) -> Result<Option<ColumnValue>, AdapterError> {
        let member = match value {
            None => return Ok(None),
            Some(DomainValue::Enum(member)) if member.type_name() == self.enum_type => *member,
            Some(other) => return Err(unexpected_value(self.enum_type, other)),
        };

        self.identifier_method
            .invoke(member)
            .map(Some)
            .map_err(|e| {
                e.with_context(format!(
                    "invoking identifier method '{}' of enum '{}'",
                    self.identifier_method.name(),
                    self.enum_type
                ))
            })
    }

    fn is_mutable(&self) -> bool {
        false
    }
}

impl UserTypeFactory for EnumUserType {
    const NAME: &'static str = "enum";

    fn config_params() -> Vec<ConfigParam> {
        EnumOptions::config_params()
    }

    fn create(config: &ConfigValues, ctx: &TypeContext) -> Result<Self, AdapterError> {
        let options = EnumOptions::from_config(config)?;

        let descriptor = ctx.enums.lookup(&options.enum_class).ok_or_else(|| {
            AdapterError::config(format!("Enum class({}) not found.", options.enum_class))
        })?;

        let identifier_method = descriptor
            .accessor(&options.identifier_method)
            .ok_or_else(|| {
                AdapterError::config(format!(
                    "Failed to obtain identifier method({}).",
                    options.identifier_method
                ))
            })?
            .clone();
        let identifier_type = identifier_method.return_type();

        let sql_type = identifier_type.sql_type().ok_or_else(|| {
            AdapterError::config(format!("Unsupported identifier type {identifier_type}"))
        })?;

        let value_of_method = descriptor
            .factory(&options.value_of_method, identifier_type)
            .ok_or_else(|| {
                AdapterError::config(format!(
                    "Failed to obtain valueOf method({}) with identifierType({identifier_type}).",
                    options.value_of_method
                ))
            })?
            .clone();

        tracing::debug!(
            enum_class = %descriptor.type_name(),
            members = descriptor.members().len(),
            identifier_method = ?identifier_method,
            identifier_type = %identifier_type,
            value_of_method = ?value_of_method,
            "enum user type initialized"
        );

        Ok(Self {
            enum_type: descriptor.type_name(),
            identifier_type,
            identifier_method,
            value_of_method,
            sql_types: [sql_type],
        })
    }
}

#[cfg(test)]
mod tests {
    use coltype_api::{
        Bound, BoundParameters, EnumRegistry, Identifier, Options, PersistentEnum,
    };

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Sex {
        Male,
        Female,
    }

    impl Sex {
        fn to_int(self) -> i32 {
            match self {
                Sex::Male => 10001,
                Sex::Female => 20002,
            }
        }

        fn from_int(value: i32) -> Option<Self> {
            Self::members().iter().copied().find(|s| s.to_int() == value)
        }

        fn to_short_code(self) -> char {
            match self {
                Sex::Male => 'M',
                Sex::Female => 'F',
            }
        }

        fn from_short_code(code: char) -> Option<Self> {
            Self::members()
                .iter()
                .copied()
                .find(|s| s.to_short_code() == code)
        }
    }

    impl PersistentEnum for Sex {
        const TYPE_NAME: &'static str = "Sex";

        fn members() -> &'static [Self] {
            &[Sex::Male, Sex::Female]
        }

        fn name(&self) -> &'static str {
            match self {
                Sex::Male => "MALE",
                Sex::Female => "FEMALE",
            }
        }
    }

    /// Identifier type with no column mapping.
    struct Person;

    impl Identifier for Person {
        const TYPE: IdentifierType = IdentifierType::Other("Person");

        fn to_column(&self) -> Result<ColumnValue, AdapterError> {
            Err(AdapterError::encode("a person is not a column value"))
        }

        fn from_column(_value: &ColumnValue) -> Option<Self> {
            None
        }
    }

    fn context() -> TypeContext {
        let mut enums = EnumRegistry::new();
        enums
            .register::<Sex>()
            .identifier("toInt", |s: &Sex| s.to_int())
            .value_of("fromInt", Sex::from_int)
            .identifier("toShortCode", |s: &Sex| s.to_short_code())
            .value_of("fromShortCode", Sex::from_short_code)
            .identifier("toPerson", |_: &Sex| Person);
        TypeContext::new(enums)
    }

    fn configure(pairs: &[(&str, &str)]) -> Result<EnumUserType, AdapterError> {
        let options: Options = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnumUserType::configure(&options, &context())
    }

    fn member(sex: Sex) -> DomainValue {
        DomainValue::Enum(sex.member())
    }

    #[test]
    fn by_int_identifier() {
        let ut = configure(&[
            ("enumClass", "Sex"),
            ("identifierMethod", "toInt"),
            ("valueOfMethod", "fromInt"),
        ])
        .unwrap();

        assert_eq!(ut.identifier_type(), IdentifierType::Int);
        assert_eq!(ut.sql_types(), &[SqlType::Integer]);
        assert_eq!(ut.returned_type(), "Sex");
        assert!(!ut.is_mutable());

        for sex in [Sex::Male, Sex::Female] {
            let column = ut.to_column(Some(&member(sex))).unwrap();
            assert_eq!(column, Some(ColumnValue::Int(sex.to_int())));
            assert_eq!(ut.decode(column.as_ref()).unwrap(), Some(member(sex)));
        }
    }

    #[test]
    fn by_short_code_identifier() {
        let ut = configure(&[
            ("enumClass", "Sex"),
            ("identifierMethod", "toShortCode"),
            ("valueOfMethod", "fromShortCode"),
        ])
        .unwrap();

        assert_eq!(ut.sql_types(), &[SqlType::Char]);
        let mut params = BoundParameters::new();
        ut.encode(Some(&member(Sex::Female)), &mut params, 1).unwrap();
        assert_eq!(params.get(1), Some(&Bound::Value(ColumnValue::Char('F'))));

        let decoded = ut.decode(Some(&ColumnValue::Text("M".into()))).unwrap();
        assert_eq!(decoded, Some(member(Sex::Male)));
        assert_eq!(
            decoded.and_then(|v| v.as_enum()).and_then(Sex::from_member),
            Some(Sex::Male)
        );
    }

    #[test]
    fn defaults_to_name() {
        let ut = configure(&[("enumClass", "Sex")]).unwrap();
        assert_eq!(ut.identifier_method().name(), "name");
        assert_eq!(ut.value_of_method().name(), "valueOf");
        assert_eq!(ut.sql_types(), &[SqlType::Varchar]);

        assert_eq!(
            ut.to_column(Some(&member(Sex::Male))).unwrap(),
            Some(ColumnValue::Text("MALE".into()))
        );
        assert_eq!(
            ut.decode(Some(&"FEMALE".into())).unwrap(),
            Some(member(Sex::Female))
        );
    }

    #[test]
    fn unmatched_identifier_is_decode_error() {
        let ut = configure(&[
            ("enumClass", "Sex"),
            ("identifierMethod", "toInt"),
            ("valueOfMethod", "fromInt"),
        ])
        .unwrap();

        let err = ut.decode(Some(&ColumnValue::Int(1))).unwrap_err();
        assert!(err.is_decode());
        assert!(err.message().contains("no enum member of 'Sex'"));

        // Wrong primitive kind never reaches the factory.
        assert!(ut.decode(Some(&"10001".into())).unwrap_err().is_decode());
    }

    #[test]
    fn null_in_null_out() {
        let ut = configure(&[
            ("enumClass", "Sex"),
            ("identifierMethod", "toInt"),
            ("valueOfMethod", "fromInt"),
        ])
        .unwrap();

        assert_eq!(ut.decode(None).unwrap(), None);
        let mut params = BoundParameters::new();
        ut.encode(None, &mut params, 7).unwrap();
        assert_eq!(params.get(7), Some(&Bound::Null(SqlType::Integer)));
    }

    #[test]
    fn unknown_enum_class() {
        let err = configure(&[("enumClass", "does.not.Exist")]).unwrap_err();
        assert!(err.is_config());
        assert!(err.message().contains("Enum class(does.not.Exist) not found."));
    }

    #[test]
    fn missing_enum_class() {
        let err = configure(&[]).unwrap_err();
        assert!(err.is_config());
        assert!(err.message().contains("enumClass"));
    }

    #[test]
    fn unknown_identifier_method() {
        let err = configure(&[("enumClass", "Sex"), ("identifierMethod", "toLong")]).unwrap_err();
        assert!(err.is_config());
        assert!(err.message().contains("Failed to obtain identifier method(toLong)."));
    }

    #[test]
    fn unsupported_identifier_type() {
        let err = configure(&[("enumClass", "Sex"), ("identifierMethod", "toPerson")]).unwrap_err();
        assert!(err.is_config());
        assert!(err.message().contains("Unsupported identifier type Person"));
    }

    #[test]
    fn value_of_must_accept_identifier_type() {
        // toInt returns int, fromShortCode accepts char.
        let err = configure(&[
            ("enumClass", "Sex"),
            ("identifierMethod", "toInt"),
            ("valueOfMethod", "fromShortCode"),
        ])
        .unwrap_err();
        assert!(err.is_config());
        assert!(err
            .message()
            .contains("Failed to obtain valueOf method(fromShortCode) with identifierType(int)."));
    }

    #[test]
    fn encode_rejects_other_kinds() {
        let ut = configure(&[("enumClass", "Sex")]).unwrap();
        let err = ut.to_column(Some(&DomainValue::Bool(true))).unwrap_err();
        assert!(err.is_encode());

        let foreign = DomainValue::Enum(coltype_api::EnumMember::new("Color", "RED", 0));
        assert!(ut.to_column(Some(&foreign)).unwrap_err().is_encode());
    }

    #[test]
    fn identity_semantics() {
        let ut = configure(&[("enumClass", "Sex")]).unwrap();
        let a = member(Sex::Male);
        let b = ut.decode(Some(&"MALE".into())).unwrap().unwrap();
        assert!(ut.values_equal(Some(&a), Some(&b)));
        assert_eq!(ut.hash_of(&a), ut.hash_of(&b));
        assert!(!ut.values_equal(Some(&a), Some(&member(Sex::Female))));
        assert_eq!(ut.deep_copy(Some(&a)), Some(a.clone()));
        assert_eq!(ut.replace(&a, &member(Sex::Female)), a);
    }
}
