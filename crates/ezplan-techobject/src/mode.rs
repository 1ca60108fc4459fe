//! Operation modes
//!
//! A [`Mode`] is a named operating state of one automation object. It may be
//! bound to a base operation of the owning manager's registry; the binding is
//! kept as a lua name key and resolved on demand.
//!
//! Modes are only changed through [`Mode::set_name`] and
//! [`Mode::set_base_operation`]. Every effective change is reported to the
//! attached [`ModeObserver`] as a separate [`ModeChange`].

use crate::base_operation::{BaseOperation, BaseTechObject};
use crate::error::{TechObjectError, TechObjectResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Stable mode identity
///
/// Assigned on creation and kept across renames and rebinding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModeId(Uuid);

impl ModeId {
    /// Generate a fresh id
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ModeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ModeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Observable change of a single mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeChange {
    /// Display name changed
    Renamed {
        /// Previous name
        old: String,
        /// New name
        new: String,
    },
    /// Bound base operation changed (`None` = unbound)
    BaseOperationChanged {
        /// Previous lua name
        old: Option<String>,
        /// New lua name
        new: Option<String>,
    },
}

/// Receives mode changes (UI refresh, persistence, undo tracking)
#[cfg_attr(test, mockall::automock)]
pub trait ModeObserver: Send + Sync {
    /// Called once per effective change
    fn mode_changed(&self, id: ModeId, change: &ModeChange);
}

/// Operation mode of an automation object
pub struct Mode {
    id: ModeId,
    name: String,
    base_operation: Option<String>,
    params: BTreeMap<String, serde_json::Value>,
    observer: Option<Arc<dyn ModeObserver>>,
}

impl Mode {
    /// Create unbound mode
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ModeId::new(),
            name: name.into(),
            base_operation: None,
            params: BTreeMap::new(),
            observer: None,
        }
    }

    /// Create mode bound to a base operation
    #[must_use]
    pub fn bound(name: impl Into<String>, operation: &BaseOperation) -> Self {
        let mut mode = Self::new(name);
        mode.base_operation = Some(operation.lua_name().to_string());
        mode
    }

    /// Attach observer
    #[inline]
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ModeObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub(crate) fn set_observer(&mut self, observer: Option<Arc<dyn ModeObserver>>) {
        self.observer = observer;
    }

    /// Mode identity
    #[inline]
    #[must_use]
    pub fn id(&self) -> ModeId {
        self.id
    }

    /// Display name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bound lua name, if any
    #[inline]
    #[must_use]
    pub fn base_operation(&self) -> Option<&str> {
        self.base_operation.as_deref()
    }

    /// Bound lua name, empty when unbound
    #[inline]
    #[must_use]
    pub fn base_operation_lua_name(&self) -> &str {
        self.base_operation.as_deref().unwrap_or("")
    }

    /// Resolve binding against a registry
    #[must_use]
    pub fn resolve_base_operation<'a>(
        &self,
        registry: &'a BaseTechObject,
    ) -> Option<&'a BaseOperation> {
        self.base_operation
            .as_deref()
            .and_then(|lua_name| registry.operation(lua_name))
    }

    /// Rename mode
    ///
    /// Returns `true` if the name changed.
    pub fn set_name(&mut self, new_name: impl Into<String>) -> bool {
        let new_name = new_name.into();
        if new_name == self.name {
            return false;
        }

        let old = std::mem::replace(&mut self.name, new_name);
        self.notify(&ModeChange::Renamed {
            old,
            new: self.name.clone(),
        });
        true
    }

    /// Rebind mode to another base operation
    ///
    /// An empty `lua_name` unbinds the mode. With a registry the name must be
    /// declared there; without one (detached manager) it is stored as given.
    ///
    /// Returns `true` if the binding changed.
    ///
    /// # Errors
    /// - `TechObjectError::UnknownBaseOperation` if `registry` does not declare
    ///   `lua_name`. The binding is left as it was.
    pub fn set_base_operation(
        &mut self,
        lua_name: &str,
        registry: Option<&BaseTechObject>,
    ) -> TechObjectResult<bool> {
        let new = (!lua_name.is_empty()).then(|| lua_name.to_string());

        if let (Some(lua_name), Some(registry)) = (new.as_deref(), registry) {
            if !registry.contains(lua_name) {
                return Err(TechObjectError::unknown_base_operation(
                    lua_name,
                    registry.name(),
                ));
            }
        }

        if new == self.base_operation {
            return Ok(false);
        }

        let old = std::mem::replace(&mut self.base_operation, new);
        self.notify(&ModeChange::BaseOperationChanged {
            old,
            new: self.base_operation.clone(),
        });
        Ok(true)
    }

    /// Instance parameter value
    #[inline]
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&serde_json::Value> {
        self.params.get(key)
    }

    /// Set instance parameter, returning the previous value
    pub fn set_param(
        &mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Option<serde_json::Value> {
        self.params.insert(key.into(), value.into())
    }

    /// Remove instance parameter
    pub fn remove_param(&mut self, key: &str) -> Option<serde_json::Value> {
        self.params.remove(key)
    }

    /// All instance parameters
    #[inline]
    #[must_use]
    pub fn params(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.params
    }

    fn notify(&self, change: &ModeChange) {
        tracing::trace!(mode = %self.id, ?change, "mode changed");
        if let Some(observer) = &self.observer {
            observer.mode_changed(self.id, change);
        }
    }
}

impl fmt::Debug for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mode")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("base_operation", &self.base_operation)
            .field("params", &self.params)
            .field("observed", &self.observer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::{always, eq};

    fn registry() -> BaseTechObject {
        BaseTechObject::new("Valve", "V")
            .with_base_operation("OPEN", "Open", 1)
            .and_then(|b| b.with_base_operation("CLOSE", "Close", 2))
            .unwrap()
    }

    #[test]
    fn rename_notifies_once() {
        let mut observer = MockModeObserver::new();
        observer
            .expect_mode_changed()
            .with(
                always(),
                eq(ModeChange::Renamed {
                    old: "Manual".to_string(),
                    new: "Auto".to_string(),
                }),
            )
            .times(1)
            .return_const(());

        let mut mode = Mode::new("Manual").with_observer(Arc::new(observer));
        assert!(mode.set_name("Auto"));
        assert!(!mode.set_name("Auto"));
        assert_eq!(mode.name(), "Auto");
    }

    #[test]
    fn rebind_validates_against_registry() {
        let registry = registry();
        let mut mode = Mode::new("Manual");

        assert_eq!(mode.set_base_operation("OPEN", Some(&registry)), Ok(true));
        assert_eq!(mode.base_operation(), Some("OPEN"));

        let err = mode.set_base_operation("DRAIN", Some(&registry)).unwrap_err();
        assert!(matches!(err, TechObjectError::UnknownBaseOperation { .. }));
        assert_eq!(mode.base_operation(), Some("OPEN"));
    }

    #[test]
    fn detached_rebind_accepts_any_key() {
        let mut mode = Mode::new("Manual");
        assert_eq!(mode.set_base_operation("ANYTHING", None), Ok(true));
        assert_eq!(mode.base_operation_lua_name(), "ANYTHING");
    }

    #[test]
    fn empty_lua_name_unbinds() {
        let registry = registry();
        let op = registry.operation("CLOSE").unwrap();
        let mut observer = MockModeObserver::new();
        observer
            .expect_mode_changed()
            .with(
                always(),
                eq(ModeChange::BaseOperationChanged {
                    old: Some("CLOSE".to_string()),
                    new: None,
                }),
            )
            .times(1)
            .return_const(());

        let mut mode = Mode::bound("Close", op).with_observer(Arc::new(observer));
        assert_eq!(mode.set_base_operation("", Some(&registry)), Ok(true));
        assert_eq!(mode.set_base_operation("", Some(&registry)), Ok(false));
        assert!(mode.base_operation().is_none());
        assert!(mode.resolve_base_operation(&registry).is_none());
    }

    #[test]
    fn id_survives_mutation() {
        let mut mode = Mode::new("Manual");
        let id = mode.id();
        mode.set_name("Auto");
        mode.set_base_operation("OPEN", None).unwrap();
        assert_eq!(mode.id(), id);
    }

    #[test]
    fn params_are_independent_of_name() {
        let mut mode = Mode::new("Manual");
        assert!(mode.set_param("timeout", 30).is_none());
        mode.set_name("Auto");
        assert_eq!(mode.param("timeout"), Some(&serde_json::json!(30)));
        assert_eq!(mode.remove_param("timeout"), Some(serde_json::json!(30)));
        assert!(mode.params().is_empty());
    }
}
