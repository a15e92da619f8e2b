use std::sync::{Arc, OnceLock};

use coltype_api::{AdapterError, Options, TypeContext, UserType};

use crate::error::EngineError;
use crate::registry::TypeRegistry;

/// Holder for one column's adapter: created empty, configured exactly once.
///
/// Every use before `configure` fails with a "not configured" config error.
pub struct UserTypeSlot {
    kind: String,
    adapter: OnceLock<Arc<dyn UserType>>,
}

impl std::fmt::Debug for UserTypeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserTypeSlot")
            .field("kind", &self.kind)
            .field("configured", &self.is_configured())
            .finish()
    }
}

impl UserTypeSlot {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            adapter: OnceLock::new(),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn is_configured(&self) -> bool {
        self.adapter.get().is_some()
    }

    /// Build the adapter from `options`. A second call is a config error.
    pub fn configure(
        &self,
        registry: &TypeRegistry,
        options: &Options,
        ctx: &TypeContext,
    ) -> Result<(), EngineError> {
        if self.is_configured() {
            return Err(EngineError::Config(format!(
                "user type '{}' is already configured",
                self.kind
            )));
        }
        let adapter = registry.create(&self.kind, options, ctx)?;
        self.adapter.set(adapter).map_err(|_| {
            EngineError::Config(format!("user type '{}' is already configured", self.kind))
        })
    }

    /// The configured adapter.
    pub fn adapter(&self) -> Result<&dyn UserType, AdapterError> {
        self.adapter
            .get()
            .map(|a| a.as_ref())
            .ok_or_else(|| AdapterError::not_configured(&self.kind))
    }
}

#[cfg(test)]
mod tests {
    use coltype_api::{BoundParameters, DomainValue, Row};

    use super::*;

    #[test]
    fn unconfigured_slot_refuses_every_operation() {
        let slot = UserTypeSlot::new("boolean");
        assert!(!slot.is_configured());

        let err = slot.adapter().map(|_| ()).unwrap_err();
        assert!(err.is_config());
        assert_eq!(err.message(), "user type 'boolean' is not configured");
    }

    #[test]
    fn configure_once() {
        let registry = TypeRegistry::with_builtins();
        let ctx = TypeContext::default();
        let slot = UserTypeSlot::new("boolean");
        slot.configure(&registry, &Options::new(), &ctx).unwrap();
        assert!(slot.is_configured());

        let err = slot.configure(&registry, &Options::new(), &ctx).unwrap_err();
        assert!(matches!(err, EngineError::Config(ref m) if m.contains("already configured")));

        let row = Row::new().with("flag", Some("N".into()));
        let adapter = slot.adapter().unwrap();
        assert_eq!(
            adapter.null_safe_get(&row, &["flag"]).unwrap(),
            Some(DomainValue::Bool(false))
        );
        let mut params = BoundParameters::new();
        adapter
            .null_safe_set(&mut params, Some(&DomainValue::Bool(true)), 1)
            .unwrap();
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn failed_configure_leaves_slot_empty() {
        let registry = TypeRegistry::with_builtins();
        let slot = UserTypeSlot::new("date");
        let options = Options::from([("format".to_string(), "yyyy zzz".to_string())]);
        assert!(slot
            .configure(&registry, &options, &TypeContext::default())
            .is_err());
        assert!(!slot.is_configured());
    }
}
