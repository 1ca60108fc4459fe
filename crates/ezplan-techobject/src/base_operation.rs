//! Base operations declared by device-type templates
//!
//! A [`BaseTechObject`] is the registry of [`BaseOperation`]s for one device
//! type. Modes refer to its entries by lua name only; the registry stays the
//! single owner of operation data.

use crate::error::{TechObjectError, TechObjectResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Named capability declared by a device-type template
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BaseOperation {
    lua_name: String,
    display_name: String,
    ordinal: i32,
}

impl BaseOperation {
    /// Create base operation
    #[inline]
    #[must_use]
    pub fn new(lua_name: impl Into<String>, display_name: impl Into<String>, ordinal: i32) -> Self {
        Self {
            lua_name: lua_name.into(),
            display_name: display_name.into(),
            ordinal,
        }
    }

    /// Stable identifier, unique within the declaring registry
    #[inline]
    #[must_use]
    pub fn lua_name(&self) -> &str {
        &self.lua_name
    }

    /// Human readable name
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Position hint
    #[inline]
    #[must_use]
    pub fn ordinal(&self) -> i32 {
        self.ordinal
    }
}

/// Device-type template: an ordered registry of base operations
///
/// Declaration order is preserved and is the order in which
/// [`ModesManager::set_up_from_base_tech_object`](crate::ModesManager::set_up_from_base_tech_object)
/// creates modes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseTechObject {
    name: String,
    eplan_name: String,
    operations: IndexMap<String, BaseOperation>,
}

impl BaseTechObject {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, eplan_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            eplan_name: eplan_name.into(),
            operations: IndexMap::new(),
        }
    }

    /// Declare a base operation
    ///
    /// # Errors
    /// - `TechObjectError::EmptyLuaName` if `lua_name` is empty
    /// - `TechObjectError::DuplicateLuaName` if `lua_name` is already declared
    pub fn add_base_operation(
        &mut self,
        lua_name: impl Into<String>,
        display_name: impl Into<String>,
        ordinal: i32,
    ) -> TechObjectResult<()> {
        let operation = BaseOperation::new(lua_name, display_name, ordinal);

        if operation.lua_name.is_empty() {
            return Err(TechObjectError::EmptyLuaName {
                display_name: operation.display_name,
            });
        }

        if self.operations.contains_key(&operation.lua_name) {
            return Err(TechObjectError::DuplicateLuaName {
                lua_name: operation.lua_name,
                base_tech_object: self.name.clone(),
            });
        }

        self.operations.insert(operation.lua_name.clone(), operation);
        Ok(())
    }

    /// Builder-style variant of [`Self::add_base_operation`]
    ///
    /// # Errors
    /// Same as [`Self::add_base_operation`].
    pub fn with_base_operation(
        mut self,
        lua_name: impl Into<String>,
        display_name: impl Into<String>,
        ordinal: i32,
    ) -> TechObjectResult<Self> {
        self.add_base_operation(lua_name, display_name, ordinal)?;
        Ok(self)
    }

    /// Template name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name used by the CAD host
    #[inline]
    #[must_use]
    pub fn eplan_name(&self) -> &str {
        &self.eplan_name
    }

    /// Look up operation by lua name
    #[inline]
    #[must_use]
    pub fn operation(&self, lua_name: &str) -> Option<&BaseOperation> {
        self.operations.get(lua_name)
    }

    /// Check if lua name is declared
    #[inline]
    #[must_use]
    pub fn contains(&self, lua_name: &str) -> bool {
        self.operations.contains_key(lua_name)
    }

    /// Declaration index of a lua name
    #[inline]
    #[must_use]
    pub fn position(&self, lua_name: &str) -> Option<usize> {
        self.operations.get_index_of(lua_name)
    }

    /// Operations in declaration order
    pub fn operations(&self) -> impl ExactSizeIterator<Item = &BaseOperation> {
        self.operations.values()
    }

    /// Number of declared operations
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if nothing is declared
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valve() -> BaseTechObject {
        BaseTechObject::new("Valve", "V")
            .with_base_operation("OPEN", "Open", 1)
            .and_then(|b| b.with_base_operation("CLOSE", "Close", 2))
            .and_then(|b| b.with_base_operation("WASH", "Wash", 3))
            .unwrap()
    }

    #[test]
    fn declaration_order_preserved() {
        let valve = valve();
        let names: Vec<_> = valve.operations().map(BaseOperation::lua_name).collect();
        assert_eq!(names, vec!["OPEN", "CLOSE", "WASH"]);
        assert_eq!(valve.position("WASH"), Some(2));
    }

    #[test]
    fn lookup_by_lua_name() {
        let valve = valve();
        let op = valve.operation("CLOSE").unwrap();
        assert_eq!(op.display_name(), "Close");
        assert_eq!(op.ordinal(), 2);
        assert!(valve.operation("close").is_none());
    }

    #[test]
    fn duplicate_lua_name_rejected() {
        let mut valve = valve();
        let err = valve.add_base_operation("OPEN", "Open again", 4).unwrap_err();
        assert_eq!(
            err,
            TechObjectError::DuplicateLuaName {
                lua_name: "OPEN".to_string(),
                base_tech_object: "Valve".to_string(),
            }
        );
        assert_eq!(valve.len(), 3);
    }

    #[test]
    fn empty_lua_name_rejected() {
        let mut empty = BaseTechObject::new("Pump", "P");
        assert!(matches!(
            empty.add_base_operation("", "Nameless", 1),
            Err(TechObjectError::EmptyLuaName { .. })
        ));
        assert!(empty.is_empty());
    }
}
