//! Enum types mapping files handled by this binary may refer to.

use coltype_api::{EnumRegistry, PersistentEnum, TypeContext};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn to_int(self) -> i32 {
        match self {
            Sex::Male => 10001,
            Sex::Female => 20002,
        }
    }

    pub fn from_int(value: i32) -> Option<Self> {
        Self::members().iter().copied().find(|s| s.to_int() == value)
    }

    pub fn to_short_code(self) -> char {
        match self {
            Sex::Male => 'M',
            Sex::Female => 'F',
        }
    }

    pub fn from_short_code(code: char) -> Option<Self> {
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

pub fn context() -> TypeContext {
    let mut enums = EnumRegistry::new();
    enums
        .register::<Sex>()
        .identifier("toInt", |s: &Sex| s.to_int())
        .value_of("fromInt", Sex::from_int)
        .identifier("toShortCode", |s: &Sex| s.to_short_code())
        .value_of("fromShortCode", Sex::from_short_code);
    tracing::debug!(enums = enums.len(), "enum catalog ready");
    TypeContext::new(enums)
}
