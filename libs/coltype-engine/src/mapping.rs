use std::collections::HashSet;

use serde::ser::{Serialize, SerializeMap, Serializer};

use coltype_api::{ColumnReader, ColumnWriter, DomainValue, TypeContext, UserType};

use crate::config::MappingConfig;
use crate::error::EngineError;
use crate::registry::TypeRegistry;
use crate::slot::UserTypeSlot;

/// One mapped column and its adapter.
#[derive(Debug)]
pub struct MappedColumn {
    name: String,
    slot: UserTypeSlot,
}

impl MappedColumn {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &str {
        self.slot.kind()
    }

    pub fn user_type(&self) -> Result<&dyn UserType, EngineError> {
        Ok(self.slot.adapter()?)
    }
}

/// Domain values of one entity row, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    entries: Vec<(String, Option<DomainValue>)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style `set`.
    pub fn with(mut self, column: impl Into<String>, value: Option<DomainValue>) -> Self {
        self.set(column, value);
        self
    }

    /// Set `column`, keeping its position when already present.
    pub fn set(&mut self, column: impl Into<String>, value: Option<DomainValue>) {
        let column = column.into();
        match self.entries.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((column, value)),
        }
    }

    /// `None` when the column is absent; `Some(None)` when it holds NULL.
    pub fn get(&self, column: &str) -> Option<Option<&DomainValue>> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_ref())
    }

    pub fn get_mut(&mut self, column: &str) -> Option<&mut DomainValue> {
        self.entries
            .iter_mut()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| value.as_mut())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&DomainValue>)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Ordered set of configured columns of one entity.
///
/// Reads a row into a `Record`, binds a `Record` as statement parameters
/// `1..=n`, snapshots it and dirty-checks two snapshots, always through
/// each column's adapter.
#[derive(Debug)]
pub struct EntityMapping {
    entity: String,
    columns: Vec<MappedColumn>,
}

impl EntityMapping {
    /// Configure every column of `config`.
    pub fn from_config(
        config: &MappingConfig,
        registry: &TypeRegistry,
        ctx: &TypeContext,
    ) -> Result<Self, EngineError> {
        let entity_ctx = format!("entity '{}'", config.entity);
        let mut seen = HashSet::new();
        let mut columns = Vec::with_capacity(config.columns.len());

        for column_cfg in &config.columns {
            let column_ctx = format!("{entity_ctx}, column '{}'", column_cfg.name);
            if !seen.insert(column_cfg.name.as_str()) {
                return Err(EngineError::Config(format!(
                    "{column_ctx}: duplicate column"
                )));
            }

            let options = column_cfg
                .flat_options()
                .map_err(|e| e.with_context(&entity_ctx))?;
            let slot = UserTypeSlot::new(&column_cfg.kind);
            slot.configure(registry, &options, ctx)
                .map_err(|e| e.with_context(&column_ctx))?;

            tracing::debug!(
                entity = %config.entity,
                column = %column_cfg.name,
                kind = %column_cfg.kind,
                "mapped column"
            );
            columns.push(MappedColumn {
                name: column_cfg.name.clone(),
                slot,
            });
        }

        tracing::info!(entity = %config.entity, columns = columns.len(), "configured entity mapping");
        Ok(Self {
            entity: config.entity.clone(),
            columns,
        })
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn columns(&self) -> &[MappedColumn] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Result<&MappedColumn, EngineError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| EngineError::UnknownColumn(format!("{}.{name}", self.entity)))
    }

    /// Decode every mapped column of the current row.
    pub fn read(&self, row: &dyn ColumnReader) -> Result<Record, EngineError> {
        let mut record = Record::new();
        for column in &self.columns {
            let value = column
                .user_type()?
                .null_safe_get(row, &[column.name.as_str()])
                .map_err(|e| e.with_context(format!("entity '{}'", self.entity)))?;
            record.set(column.name.clone(), value);
        }
        Ok(record)
    }

    /// Bind `record` as parameters `1..=n` in column order.
    ///
    /// Columns absent from `record` bind SQL NULL. Entries naming no
    /// mapped column are an error.
    pub fn bind(&self, record: &Record, sink: &mut dyn ColumnWriter) -> Result<(), EngineError> {
        self.check_columns(record)?;
        for (position, column) in self.columns.iter().enumerate() {
            let value = record.get(&column.name).flatten();
            column
                .user_type()?
                .null_safe_set(sink, value, position + 1)
                .map_err(|e| {
                    e.with_context(format!("entity '{}', column '{}'", self.entity, column.name))
                })?;
        }
        Ok(())
    }

    /// Columns whose values differ according to their adapter.
    pub fn dirty_columns(&self, old: &Record, new: &Record) -> Result<Vec<&str>, EngineError> {
        let mut dirty = Vec::new();
        for column in &self.columns {
            let before = old.get(&column.name).flatten();
            let after = new.get(&column.name).flatten();
            if !column.user_type()?.values_equal(before, after) {
                dirty.push(column.name.as_str());
            }
        }
        Ok(dirty)
    }

    /// Independent copy of `record` for later dirty checking.
    pub fn snapshot(&self, record: &Record) -> Result<Record, EngineError> {
        self.check_columns(record)?;
        let mut snapshot = Record::new();
        for column in &self.columns {
            if let Some(value) = record.get(&column.name) {
                snapshot.set(column.name.clone(), column.user_type()?.deep_copy(value));
            }
        }
        Ok(snapshot)
    }

    fn check_columns(&self, record: &Record) -> Result<(), EngineError> {
        for (name, _) in record.iter() {
            self.column(name)?;
        }
        Ok(())
    }
}
