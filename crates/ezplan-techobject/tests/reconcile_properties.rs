//! Reconciliation Tests
//!
//! Setup from base tech objects and generic-to-instance propagation.
//!
use ezplan_techobject::prelude::*;
use ezplan_techobject::{ModeId, OwnerRef};
use ezplan_test_utils::{base_tech_object, RecordingObserver};
use proptest::prelude::*;
use std::sync::Arc;

fn build(
    registry: &Arc<BaseTechObject>,
    spec: &[(String, usize)],
    config: ModesConfig,
) -> ModesManager {
    let mut manager = ModesManager::detached()
        .with_base_tech_object(Arc::clone(registry))
        .with_config(config);
    for (name, op) in spec {
        let lua_name = if *op == 0 { String::new() } else { format!("OP{op}") };
        manager.add_mode(name.clone(), &lua_name);
    }
    manager
}

fn state(manager: &ModesManager) -> Vec<(ModeId, String, String)> {
    manager
        .modes()
        .iter()
        .map(|m| {
            (
                m.id(),
                m.name().to_string(),
                m.base_operation_lua_name().to_string(),
            )
        })
        .collect()
}

fn mode_specs() -> impl Strategy<Value = Vec<(String, usize)>> {
    prop::collection::vec(("[a-z]{1,8}", 0usize..=5), 0..8)
}

#[test]
fn test_set_up_from_base_tech_object_check_modes() {
    let mut manager = ModesManager::new(Some(OwnerRef::new("name", "eplanName")));
    let registry = BaseTechObject::new("NameBc", "")
        .with_base_operation("LuaName1", "Name1", 1)
        .and_then(|b| b.with_base_operation("LuaName2", "Name2", 2))
        .and_then(|b| b.with_base_operation("LuaName3", "Name3", 3))
        .unwrap();

    manager.set_up_from_base_tech_object(Arc::new(registry));

    assert_eq!(manager.len(), 3);
}

#[test]
fn test_update_on_generic_two_separate_signals() {
    let registry = base_tech_object(3);
    let mut generic = ModesManager::detached().with_base_tech_object(Arc::clone(&registry));
    generic.add_mode("operation 1", "OP1");
    generic.add_mode("operation 2", "OP2");

    let observer = RecordingObserver::new();
    let mut instance = ModesManager::detached().with_base_tech_object(registry);
    instance.add_mode("operation", "OP3");
    let mut instance = instance.with_observer(observer.clone());
    let id = instance.modes()[0].id();

    instance.update_on_generic_tech_object(&generic).unwrap();

    assert_eq!(observer.renames(), vec![(id, "operation 1".to_string())]);
    assert_eq!(observer.rebinds(), vec![(id, Some("OP1".to_string()))]);
    assert_eq!(observer.changes().len(), 2);
    assert_eq!(instance.len(), 1);
}

proptest! {
    #[test]
    fn setup_yields_one_bound_mode_per_operation(count in 0usize..24) {
        let registry = base_tech_object(count);
        let mut manager = ModesManager::detached();
        manager.set_up_from_base_tech_object(Arc::clone(&registry));

        prop_assert_eq!(manager.len(), count);
        for (mode, op) in manager.modes().iter().zip(registry.operations()) {
            prop_assert_eq!(mode.base_operation(), Some(op.lua_name()));
            prop_assert_eq!(mode.name(), op.display_name());
        }
    }

    #[test]
    fn equal_length_reconcile_mirrors_generic(
        generic_spec in mode_specs(),
        seed in "[a-z]{1,8}",
    ) {
        let registry = base_tech_object(5);
        let generic = build(&registry, &generic_spec, ModesConfig::new());
        let instance_spec: Vec<_> = generic_spec
            .iter()
            .enumerate()
            .map(|(i, _)| (format!("{seed}{i}"), i % 6))
            .collect();
        let mut instance = build(&registry, &instance_spec, ModesConfig::new());
        let ids: Vec<_> = instance.modes().iter().map(Mode::id).collect();

        let report = instance.update_on_generic_tech_object(&generic).unwrap();

        prop_assert!(report.is_complete());
        prop_assert_eq!(instance.len(), generic.len());
        for (i, (mode, generic_mode)) in instance.modes().iter().zip(generic.modes()).enumerate() {
            prop_assert_eq!(mode.id(), ids[i]);
            prop_assert_eq!(mode.name(), generic_mode.name());
            prop_assert_eq!(mode.base_operation(), generic_mode.base_operation());
        }
    }

    #[test]
    fn reconcile_is_idempotent(
        generic_spec in mode_specs(),
        instance_spec in mode_specs(),
        keyed in any::<bool>(),
        extend in any::<bool>(),
    ) {
        let registry = base_tech_object(5);
        let config = ModesConfig::new()
            .with_strategy(if keyed {
                ReconcileStrategy::ByBaseOperation
            } else {
                ReconcileStrategy::Positional
            })
            .with_shortfall(if extend { ShortfallPolicy::Extend } else { ShortfallPolicy::Skip });
        let generic = build(&registry, &generic_spec, ModesConfig::new());
        let observer = RecordingObserver::new();
        let mut instance = build(&registry, &instance_spec, config).with_observer(observer.clone());

        instance.update_on_generic_tech_object(&generic).unwrap();
        let once = state(&instance);
        observer.clear();

        let second = instance.update_on_generic_tech_object(&generic).unwrap();

        prop_assert_eq!(state(&instance), once);
        prop_assert!(!second.has_changes());
        prop_assert!(observer.changes().is_empty());
    }

    #[test]
    fn positional_skip_never_touches_missing_or_extra_slots(
        generic_spec in mode_specs(),
        instance_spec in mode_specs(),
    ) {
        let registry = base_tech_object(5);
        let generic = build(&registry, &generic_spec, ModesConfig::new());
        let mut instance = build(&registry, &instance_spec, ModesConfig::new());
        let before = state(&instance);

        let report = instance.update_on_generic_tech_object(&generic).unwrap();

        let shared = generic.len().min(before.len());
        prop_assert_eq!(instance.len(), before.len());
        prop_assert_eq!(report.updated, (0..shared).collect::<Vec<_>>());
        prop_assert_eq!(report.skipped, (shared..generic.len()).collect::<Vec<_>>());
        let after = state(&instance);
        prop_assert_eq!(&after[shared..], &before[shared..]);
    }
}
