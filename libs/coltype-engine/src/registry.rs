use std::collections::HashMap;
use std::sync::Arc;

use coltype_api::{AdapterError, ConfigParam, Options, TypeContext, UserType, UserTypeFactory};
use coltype_usertype_boolean::BooleanUserType;
use coltype_usertype_date::DateUserType;
use coltype_usertype_enum::EnumUserType;

use crate::error::EngineError;

type CreateFn = fn(&Options, &TypeContext) -> Result<Arc<dyn UserType>, AdapterError>;

#[derive(Clone, Copy)]
struct TypeEntry {
    config_params: fn() -> Vec<ConfigParam>,
    create: CreateFn,
}

/// User type kinds known to the host, keyed by `UserTypeFactory::NAME`.
#[derive(Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<&'static str, TypeEntry>,
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

impl TypeRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the bundled `enum`, `boolean` and `date` kinds.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register::<EnumUserType>();
        registry.register::<BooleanUserType>();
        registry.register::<DateUserType>();
        registry
    }

    /// Register `T` under `T::NAME`, replacing any previous kind of that name.
    pub fn register<T: UserTypeFactory>(&mut self) {
        let previous = self.types.insert(
            T::NAME,
            TypeEntry {
                config_params: T::config_params,
                create: create_shared::<T>,
            },
        );
        if previous.is_some() {
            tracing::warn!(kind = T::NAME, "user type kind re-registered");
        }
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.types.contains_key(kind)
    }

    /// Registered kind names, sorted.
    pub fn kinds(&self) -> Vec<&'static str> {
        let mut kinds: Vec<_> = self.types.keys().copied().collect();
        kinds.sort_unstable();
        kinds
    }

    /// Declared options of `kind`.
    pub fn config_params(&self, kind: &str) -> Result<Vec<ConfigParam>, EngineError> {
        self.entry(kind).map(|e| (e.config_params)())
    }

    /// Configure a new adapter of `kind` from raw options.
    pub fn create(
        &self,
        kind: &str,
        options: &Options,
        ctx: &TypeContext,
    ) -> Result<Arc<dyn UserType>, EngineError> {
        let entry = self.entry(kind)?;
        Ok((entry.create)(options, ctx)?)
    }

    fn entry(&self, kind: &str) -> Result<&TypeEntry, EngineError> {
        self.types
            .get(kind)
            .ok_or_else(|| EngineError::UnknownType(kind.to_string()))
    }
}

fn create_shared<T: UserTypeFactory>(
    options: &Options,
    ctx: &TypeContext,
) -> Result<Arc<dyn UserType>, AdapterError> {
    Ok(Arc::new(T::configure(options, ctx)?))
}
