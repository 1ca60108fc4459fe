//! Modes manager
//!
//! Owns the ordered mode list of one automation object, builds it from a
//! device-type template and reconciles it against the modes of a generic
//! (template) object.
//!
//! # Reconciliation
//!
//! ```text
//! generic:  [ Open/OPEN ][ Close/CLOSE ][ Wash/WASH ]
//!                |             |             |
//!           set_name +    set_name +     (shortfall
//!           set_base_op   set_base_op     policy)
//!                v             v
//! instance: [ Manual/OPEN ][ Auto/CLOSE ]
//! ```
//!
//! Pairing follows [`ReconcileStrategy`]. Each paired instance mode receives
//! two separate calls, rename first, then rebinding. The manager never writes
//! mode fields itself. Generic and instance managers share no storage.
//!
//! A manager is not internally synchronized; callers serialize access.

use crate::base_operation::BaseTechObject;
use crate::error::{TechObjectError, TechObjectResult};
use crate::mode::{Mode, ModeId, ModeObserver};
use crate::reconcile::{ModesConfig, ReconcileReport, ReconcileStrategy, ShortfallPolicy};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Reference to the automation object owning a modes manager
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerRef {
    /// Object name
    pub name: String,
    /// Name used by the CAD host
    pub eplan_name: String,
}

impl OwnerRef {
    /// Create owner reference
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, eplan_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            eplan_name: eplan_name.into(),
        }
    }
}

/// Pairing of instance modes with generic modes
struct Plan {
    /// `(instance index, generic index)`
    pairs: Vec<(usize, usize)>,
    /// `(generic index, may be appended)`
    surplus: Vec<(usize, bool)>,
}

/// Ordered mode list of one automation object
pub struct ModesManager {
    owner: Option<OwnerRef>,
    base_tech_object: Option<Arc<BaseTechObject>>,
    modes: Vec<Mode>,
    observer: Option<Arc<dyn ModeObserver>>,
    config: ModesConfig,
}

impl ModesManager {
    /// Create manager for an automation object
    #[inline]
    #[must_use]
    pub fn new(owner: Option<OwnerRef>) -> Self {
        Self {
            owner,
            base_tech_object: None,
            modes: Vec::new(),
            observer: None,
            config: ModesConfig::default(),
        }
    }

    /// Create manager without owner (templates, tests)
    #[inline]
    #[must_use]
    pub fn detached() -> Self {
        Self::new(None)
    }

    /// With reconciliation configuration
    #[inline]
    #[must_use]
    pub fn with_config(mut self, config: ModesConfig) -> Self {
        self.config = config;
        self
    }

    /// With registry used to resolve bindings, keeping current modes
    #[inline]
    #[must_use]
    pub fn with_base_tech_object(mut self, base_tech_object: Arc<BaseTechObject>) -> Self {
        self.base_tech_object = Some(base_tech_object);
        self
    }

    /// With observer for all current and future modes
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ModeObserver>) -> Self {
        for mode in &mut self.modes {
            mode.set_observer(Some(Arc::clone(&observer)));
        }
        self.observer = Some(observer);
        self
    }

    /// Replace all modes with one mode per base operation
    ///
    /// Modes are created in declaration order, named after the operation's
    /// display name and bound to it. A template without operations leaves an
    /// empty mode list.
    pub fn set_up_from_base_tech_object(&mut self, base_tech_object: Arc<BaseTechObject>) {
        self.modes = base_tech_object
            .operations()
            .map(|operation| {
                let mut mode = Mode::bound(operation.display_name(), operation);
                mode.set_observer(self.observer.clone());
                mode
            })
            .collect();

        if self.modes.is_empty() {
            tracing::debug!(
                base_tech_object = base_tech_object.name(),
                "base tech object declares no operations"
            );
        } else {
            tracing::debug!(
                base_tech_object = base_tech_object.name(),
                modes = self.modes.len(),
                "set up modes from base tech object"
            );
        }

        self.base_tech_object = Some(base_tech_object);
    }

    /// Append a mode
    ///
    /// The mode is bound to `lua_name` if it is non-empty and declared by the
    /// manager's registry; otherwise it stays unbound.
    pub fn add_mode(&mut self, display_name: impl Into<String>, lua_name: &str) -> &Mode {
        let mut mode = Mode::new(display_name);

        if !lua_name.is_empty() {
            match self
                .base_tech_object
                .as_deref()
                .and_then(|registry| registry.operation(lua_name))
            {
                Some(operation) => mode = Mode::bound(mode.name(), operation),
                None => tracing::debug!(lua_name, "base operation not resolvable, mode left unbound"),
            }
        }

        mode.set_observer(self.observer.clone());
        let index = self.modes.len();
        self.modes.push(mode);
        &self.modes[index]
    }

    /// Remove and return the mode at `index`
    pub fn remove_mode(&mut self, index: usize) -> Option<Mode> {
        (index < self.modes.len()).then(|| self.modes.remove(index))
    }

    /// Synchronize modes with a generic manager
    ///
    /// Paired modes get the generic name and the generic binding through
    /// [`Mode::set_name`] and [`Mode::set_base_operation`]. Instance modes
    /// without a generic counterpart are left untouched. Generic modes without
    /// an instance counterpart are handled per [`ShortfallPolicy`].
    ///
    /// Bindings refused by this manager's registry do not stop the pass; they
    /// are listed in [`ReconcileReport::unresolved`].
    ///
    /// # Errors
    /// With [`ShortfallPolicy::Reject`], before any mode is touched:
    /// - `TechObjectError::StructuralMismatch` (positional) if the generic list is longer
    /// - `TechObjectError::UnmatchedGenericModes` (by base operation) if a generic mode has no partner
    pub fn update_on_generic_tech_object(
        &mut self,
        generic: &ModesManager,
    ) -> TechObjectResult<ReconcileReport> {
        let plan = match self.config.strategy {
            ReconcileStrategy::Positional => self.positional_plan(generic),
            ReconcileStrategy::ByBaseOperation => self.keyed_plan(generic),
        };

        if self.config.shortfall == ShortfallPolicy::Reject && !plan.surplus.is_empty() {
            let err = match self.config.strategy {
                ReconcileStrategy::Positional => TechObjectError::StructuralMismatch {
                    generic: generic.len(),
                    instance: self.len(),
                },
                ReconcileStrategy::ByBaseOperation => TechObjectError::UnmatchedGenericModes {
                    unmatched: plan.surplus.len(),
                },
            };
            tracing::warn!(owner = ?self.owner_name(), %err, "reconciliation rejected");
            return Err(err);
        }

        let mut report = ReconcileReport::default();
        let registry = self.base_tech_object.as_deref();

        for &(instance_index, generic_index) in &plan.pairs {
            apply_generic(
                &mut self.modes[instance_index],
                &generic.modes[generic_index],
                registry,
                instance_index,
                &mut report,
            );
        }

        for (generic_index, appendable) in plan.surplus {
            if self.config.shortfall == ShortfallPolicy::Extend && appendable {
                self.append_copy(&generic.modes[generic_index], &mut report);
            } else {
                report.skipped.push(generic_index);
            }
        }

        if !report.skipped.is_empty() {
            tracing::warn!(
                owner = ?self.owner_name(),
                skipped = ?report.skipped,
                "generic modes without instance counterpart were not applied"
            );
        }

        tracing::debug!(
            owner = ?self.owner_name(),
            updated = report.updated.len(),
            renamed = report.renamed,
            rebound = report.rebound,
            appended = report.appended.len(),
            "reconciled modes with generic object"
        );

        Ok(report)
    }

    fn positional_plan(&self, generic: &ModesManager) -> Plan {
        let shared = self.modes.len().min(generic.modes.len());
        Plan {
            pairs: (0..shared).map(|i| (i, i)).collect(),
            surplus: (shared..generic.modes.len()).map(|i| (i, true)).collect(),
        }
    }

    fn keyed_plan(&self, generic: &ModesManager) -> Plan {
        let mut first_by_key: HashMap<&str, usize> = HashMap::new();
        for (index, mode) in generic.modes.iter().enumerate() {
            if let Some(key) = mode.base_operation() {
                first_by_key.entry(key).or_insert(index);
            }
        }

        let mut matched = vec![false; generic.modes.len()];
        let mut pairs = Vec::new();
        for (instance_index, mode) in self.modes.iter().enumerate() {
            if let Some(&generic_index) = mode.base_operation().and_then(|k| first_by_key.get(k)) {
                matched[generic_index] = true;
                pairs.push((instance_index, generic_index));
            }
        }

        let registry = self.base_tech_object.as_deref();
        let surplus = generic
            .modes
            .iter()
            .enumerate()
            .filter(|(index, _)| !matched[*index])
            .map(|(index, mode)| {
                let appendable = mode.base_operation().is_some_and(|key| {
                    first_by_key.get(key) == Some(&index)
                        && registry.map_or(true, |registry| registry.contains(key))
                });
                (index, appendable)
            })
            .collect();

        Plan { pairs, surplus }
    }

    fn append_copy(&mut self, generic_mode: &Mode, report: &mut ReconcileReport) {
        let index = self.modes.len();
        let mut mode = Mode::new(generic_mode.name());

        if let Err(err) = mode.set_base_operation(
            generic_mode.base_operation_lua_name(),
            self.base_tech_object.as_deref(),
        ) {
            tracing::warn!(index, %err, "appended mode left unbound");
            report.unresolved.push((index, err));
        }
        for (key, value) in generic_mode.params() {
            mode.set_param(key.clone(), value.clone());
        }

        mode.set_observer(self.observer.clone());
        report.appended.push(mode.id());
        self.modes.push(mode);
    }

    /// Owning automation object
    #[inline]
    #[must_use]
    pub fn owner(&self) -> Option<&OwnerRef> {
        self.owner.as_ref()
    }

    fn owner_name(&self) -> Option<&str> {
        self.owner.as_ref().map(|owner| owner.name.as_str())
    }

    /// Registry the modes are bound against
    #[inline]
    #[must_use]
    pub fn base_tech_object(&self) -> Option<&Arc<BaseTechObject>> {
        self.base_tech_object.as_ref()
    }

    /// Reconciliation configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> ModesConfig {
        self.config
    }

    /// Modes in list order
    #[inline]
    #[must_use]
    pub fn modes(&self) -> &[Mode] {
        &self.modes
    }

    /// Mode at `index`
    #[inline]
    #[must_use]
    pub fn mode(&self, index: usize) -> Option<&Mode> {
        self.modes.get(index)
    }

    /// Mutable mode at `index`
    #[inline]
    pub fn mode_mut(&mut self, index: usize) -> Option<&mut Mode> {
        self.modes.get_mut(index)
    }

    /// Mode with identity `id`
    #[must_use]
    pub fn mode_by_id(&self, id: ModeId) -> Option<&Mode> {
        self.modes.iter().find(|mode| mode.id() == id)
    }

    /// Index of the mode with identity `id`
    #[must_use]
    pub fn position(&self, id: ModeId) -> Option<usize> {
        self.modes.iter().position(|mode| mode.id() == id)
    }

    /// 1-based mode number as shown to the user
    #[must_use]
    pub fn mode_number(&self, id: ModeId) -> Option<usize> {
        self.position(id).map(|index| index + 1)
    }

    /// Number of modes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.modes.len()
    }

    /// Check if there are no modes
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }
}

impl Default for ModesManager {
    fn default() -> Self {
        Self::detached()
    }
}

impl fmt::Debug for ModesManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModesManager")
            .field("owner", &self.owner)
            .field(
                "base_tech_object",
                &self.base_tech_object.as_ref().map(|b| b.name()),
            )
            .field("modes", &self.modes)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn apply_generic(
    mode: &mut Mode,
    generic_mode: &Mode,
    registry: Option<&BaseTechObject>,
    index: usize,
    report: &mut ReconcileReport,
) {
    if mode.set_name(generic_mode.name()) {
        report.renamed += 1;
    }

    match mode.set_base_operation(generic_mode.base_operation_lua_name(), registry) {
        Ok(true) => report.rebound += 1,
        Ok(false) => {}
        Err(err) => {
            tracing::warn!(index, %err, "generic binding not available to instance");
            report.unresolved.push((index, err));
        }
    }

    report.updated.push(index);
}
