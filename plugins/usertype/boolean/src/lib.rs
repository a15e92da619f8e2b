use coltype_api::usertype::unexpected_value;
use coltype_api::{
    AdapterError, ColumnValue, ConfigParam, ConfigParams, ConfigValues, DomainValue, SqlType,
    TypeContext, UserType, UserTypeFactory,
};

// ═══════════════════════════════════════════════════════════════
//  Options
// ═══════════════════════════════════════════════════════════════

pub const DEFAULT_TRUE_VALUE: &str = "Y";
pub const DEFAULT_FALSE_VALUE: &str = "N";

/// Options of the boolean ↔ token adapter.
#[derive(Debug, ConfigParams)]
pub struct BooleanOptions {
    #[param(name = "trueValue", description = "Column token stored for true")]
    pub true_value: String,

    #[param(name = "falseValue", description = "Column token stored for false")]
    pub false_value: String,

    /// Raw text; validated by `parse_unknown_result`.
    #[param(
        name = "unknownResult",
        description = "Result for tokens matching neither value: 'true', 'false' or 'null'"
    )]
    pub unknown_result: String,

    #[param(name = "ignoreCase", description = "Compare tokens ignoring case")]
    pub ignore_case: bool,
}

impl Default for BooleanOptions {
    fn default() -> Self {
        Self {
            true_value: DEFAULT_TRUE_VALUE.to_string(),
            false_value: DEFAULT_FALSE_VALUE.to_string(),
            unknown_result: "null".to_string(),
            ignore_case: true,
        }
    }
}

/// `"true"`, `"false"` or `"null"`, any case.
pub fn parse_unknown_result(raw: &str) -> Result<Option<bool>, AdapterError> {
    if raw.eq_ignore_ascii_case("true") {
        Ok(Some(true))
    } else if raw.eq_ignore_ascii_case("false") {
        Ok(Some(false))
    } else if raw.eq_ignore_ascii_case("null") {
        Ok(None)
    } else {
        Err(AdapterError::config(format!(
            "[{raw}] is illegal unknownResult value. Only 'true', 'false', 'null' are allowed."
        )))
    }
}

// ═══════════════════════════════════════════════════════════════
//  BooleanUserType
// ═══════════════════════════════════════════════════════════════

/// Persists a boolean as one of two configurable string tokens.
///
/// Decoding is soft: a token matching neither value yields the configured
/// `unknownResult` instead of an error.
#[derive(Debug, Clone)]
pub struct BooleanUserType {
    true_value: String,
    false_value: String,
    unknown_result: Option<bool>,
    ignore_case: bool,
    sql_types: [SqlType; 1],
}

impl BooleanUserType {
    pub fn true_value(&self) -> &str {
        &self.true_value
    }

    pub fn false_value(&self) -> &str {
        &self.false_value
    }

    pub fn unknown_result(&self) -> Option<bool> {
        self.unknown_result
    }

    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    fn token_matches(&self, token: &str, stored: &str) -> bool {
        if self.ignore_case {
            equals_ignore_case(token, stored)
        } else {
            token == stored
        }
    }

    fn to_bool(&self, stored: &str) -> Option<bool> {
        if self.token_matches(&self.true_value, stored) {
            return Some(true);
        }
        if self.token_matches(&self.false_value, stored) {
            return Some(false);
        }
        tracing::trace!(
            stored = %stored,
            fallback = ?self.unknown_result,
            "unknown boolean token"
        );
        self.unknown_result
    }
}

/// Character-wise comparison folding case on both sides.
fn equals_ignore_case(a: &str, b: &str) -> bool {
    if a.chars().count() != b.chars().count() {
        return false;
    }
    a.chars().zip(b.chars()).all(|(x, y)| {
        x == y || x.to_uppercase().eq(y.to_uppercase()) || x.to_lowercase().eq(y.to_lowercase())
    })
}

impl UserType for BooleanUserType {
    fn sql_types(&self) -> &[SqlType] {
        &self.sql_types
    }

    fn returned_type(&self) -> &str {
        "boolean"
    }

    fn decode(&self, column: Option<&ColumnValue>) -> Result<Option<DomainValue>, AdapterError> {
        let result = match column {
            None => return Ok(None),
            Some(ColumnValue::Text(s)) => self.to_bool(s),
            Some(ColumnValue::Char(c)) => self.to_bool(c.encode_utf8(&mut [0; 4])),
            Some(other) => {
                return Err(AdapterError::decode(format!(
                    "expected text column for boolean token, got [{other}]"
                )));
            }
        };
        Ok(result.map(DomainValue::Bool))
    }

    fn to_column(&self, value: Option<&DomainValue>) -> Result<Option<ColumnValue>, AdapterError> {
        match value {
            None => Ok(None),
            Some(DomainValue::Bool(true)) => Ok(Some(ColumnValue::Text(self.true_value.clone()))),
            Some(DomainValue::Bool(false)) => Ok(Some(ColumnValue::Text(self.false_value.clone()))),
            Some(other) => Err(unexpected_value("boolean", other)),
        }
    }

    fn is_mutable(&self) -> bool {
        false
    }
}

impl UserTypeFactory for BooleanUserType {
    const NAME: &'static str = "boolean";

    fn config_params() -> Vec<ConfigParam> {
        BooleanOptions::config_params()
    }

    fn create(config: &ConfigValues, _ctx: &TypeContext) -> Result<Self, AdapterError> {
        let options = BooleanOptions::from_config(config)?;
        let unknown_result = parse_unknown_result(&options.unknown_result)?;

        tracing::debug!(
            true_value = %options.true_value,
            false_value = %options.false_value,
            unknown_result = ?unknown_result,
            ignore_case = options.ignore_case,
            "boolean user type initialized"
        );

        Ok(Self {
            true_value: options.true_value,
            false_value: options.false_value,
            unknown_result,
            ignore_case: options.ignore_case,
            sql_types: [SqlType::Varchar],
        })
    }
}

#[cfg(test)]
mod tests {
    use coltype_api::{Bound, BoundParameters, Options};

    use super::*;

    fn configure(pairs: &[(&str, &str)]) -> Result<BooleanUserType, AdapterError> {
        let options: Options = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BooleanUserType::configure(&options, &TypeContext::default())
    }

    fn decode(ut: &BooleanUserType, token: &str) -> Option<bool> {
        ut.decode(Some(&ColumnValue::Text(token.to_string())))
            .unwrap()
            .and_then(|v| v.as_bool())
    }

    #[test]
    fn defaults() {
        let ut = configure(&[]).unwrap();
        assert_eq!(ut.true_value(), "Y");
        assert_eq!(ut.false_value(), "N");
        assert_eq!(ut.unknown_result(), None);
        assert!(ut.ignore_case());
        assert_eq!(ut.sql_types(), &[SqlType::Varchar]);
        assert!(!ut.is_mutable());
    }

    #[test]
    fn case_sensitive_tokens() {
        let ut = configure(&[
            ("trueValue", "Y"),
            ("falseValue", "N"),
            ("unknownResult", "null"),
            ("ignoreCase", "false"),
        ])
        .unwrap();

        assert_eq!(decode(&ut, "Y"), Some(true));
        assert_eq!(decode(&ut, "N"), Some(false));
        assert_eq!(decode(&ut, "y"), None);
        assert_eq!(decode(&ut, "n"), None);
    }

    #[test]
    fn case_insensitive_tokens() {
        let ut = configure(&[("trueValue", "right"), ("falseValue", "wrong")]).unwrap();
        assert_eq!(decode(&ut, "RIGHT"), Some(true));
        assert_eq!(decode(&ut, "Wrong"), Some(false));
        assert_eq!(decode(&ut, "y"), None);

        let ut = configure(&[("ignoreCase", "true")]).unwrap();
        assert_eq!(decode(&ut, "y"), Some(true));
    }

    #[test]
    fn unknown_result_fallback() {
        let ut = configure(&[("unknownResult", "TRUE")]).unwrap();
        assert_eq!(decode(&ut, "maybe"), Some(true));
        assert_eq!(decode(&ut, ""), Some(true));
        assert_eq!(decode(&ut, "N"), Some(false));

        let ut = configure(&[("unknownResult", "false")]).unwrap();
        assert_eq!(decode(&ut, "?"), Some(false));
    }

    #[test]
    fn illegal_unknown_result() {
        let err = configure(&[("unknownResult", "maybe")]).unwrap_err();
        assert!(err.is_config());
        assert!(err.message().contains("[maybe] is illegal unknownResult value"));
    }

    #[test]
    fn true_wins_when_tokens_collide() {
        let ut = configure(&[("trueValue", "X"), ("falseValue", "X")]).unwrap();
        assert_eq!(decode(&ut, "X"), Some(true));
    }

    #[test]
    fn null_in_null_out() {
        let ut = configure(&[("unknownResult", "true")]).unwrap();
        assert_eq!(ut.decode(None).unwrap(), None);

        let mut params = BoundParameters::new();
        ut.encode(None, &mut params, 1).unwrap();
        assert_eq!(params.get(1), Some(&Bound::Null(SqlType::Varchar)));
    }

    #[test]
    fn encode_writes_tokens() {
        let ut = configure(&[("trueValue", "right"), ("falseValue", "wrong")]).unwrap();
        let mut params = BoundParameters::new();
        ut.encode(Some(&DomainValue::Bool(true)), &mut params, 1).unwrap();
        ut.encode(Some(&DomainValue::Bool(false)), &mut params, 2).unwrap();

        assert_eq!(params.get(1), Some(&Bound::Value("right".into())));
        assert_eq!(params.get(2), Some(&Bound::Value("wrong".into())));
    }

    #[test]
    fn canonical_tokens_round_trip() {
        let ut = configure(&[]).unwrap();
        for token in ["Y", "N"] {
            let decoded = ut.decode(Some(&token.into())).unwrap();
            let encoded = ut.to_column(decoded.as_ref()).unwrap();
            assert_eq!(encoded, Some(ColumnValue::Text(token.into())));
        }
    }

    #[test]
    fn char_column_is_accepted() {
        let ut = configure(&[]).unwrap();
        assert_eq!(
            ut.decode(Some(&ColumnValue::Char('y'))).unwrap(),
            Some(DomainValue::Bool(true))
        );
        assert!(ut.decode(Some(&ColumnValue::Int(1))).unwrap_err().is_decode());
    }

    #[test]
    fn cache_hooks_pass_through() {
        let ut = configure(&[]).unwrap();
        let v = DomainValue::Bool(true);
        assert_eq!(ut.deep_copy(Some(&v)), Some(v.clone()));
        assert_eq!(ut.deep_copy(None), None);
        assert_eq!(ut.assemble(&ut.disassemble(&v)), v);
        assert_eq!(ut.replace(&v, &DomainValue::Bool(false)), v);
    }

    #[test]
    fn unicode_case_folding() {
        assert!(equals_ignore_case("ÄRGER", "ärger"));
        assert!(!equals_ignore_case("a", "ab"));
    }
}
