//! `ezplan reconcile`
//!
//! Reads a YAML scenario describing a base tech object, the generic modes and
//! the instance modes, reconciles the instance and prints the result.
//!
//! ```yaml
//! base_tech_object:
//!   name: Valve
//!   eplan_name: V
//!   operations:
//!     - { lua_name: OPEN, display_name: Open, ordinal: 1 }
//!     - { lua_name: CLOSE, display_name: Close, ordinal: 2 }
//! config:
//!   strategy: positional
//!   shortfall: extend
//! generic:
//!   - { name: Open, base_operation: OPEN }
//!   - { name: Close, base_operation: CLOSE }
//! instance:
//!   - { name: Manual }
//! ```

use anyhow::{Context, Result};
use clap::Args;
use ezplan_techobject::{
    BaseOperation, BaseTechObject, ModesConfig, ModesManager, OwnerRef, ReconcileReport,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ReconcileArgs {
    /// Scenario file (YAML)
    scenario: PathBuf,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Deserialize)]
struct Scenario {
    base_tech_object: RegistrySpec,
    /// Registry of the instance, defaults to `base_tech_object`
    #[serde(default)]
    instance_base_tech_object: Option<RegistrySpec>,
    #[serde(default)]
    config: ModesConfig,
    #[serde(default)]
    generic: Vec<ModeSpec>,
    #[serde(default)]
    instance: Vec<ModeSpec>,
}

#[derive(Debug, Deserialize)]
struct RegistrySpec {
    name: String,
    #[serde(default)]
    eplan_name: String,
    #[serde(default)]
    operations: Vec<BaseOperation>,
}

#[derive(Debug, Deserialize)]
struct ModeSpec {
    name: String,
    #[serde(default)]
    base_operation: String,
}

#[derive(Debug, Serialize)]
struct Outcome {
    modes: Vec<ModeLine>,
    updated: Vec<usize>,
    renamed: usize,
    rebound: usize,
    skipped: Vec<usize>,
    appended: usize,
    unresolved: Vec<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct ModeLine {
    number: usize,
    name: String,
    base_operation: String,
}

pub(crate) fn run(args: &ReconcileArgs) -> Result<ExitCode> {
    let raw = std::fs::read_to_string(&args.scenario)
        .with_context(|| format!("cannot read scenario {}", args.scenario.display()))?;
    let outcome = reconcile_scenario(&raw)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        for line in &outcome.modes {
            println!("{:>3}  {:<24} {}", line.number, line.name, line.base_operation);
        }
        println!(
            "renamed {}, rebound {}, appended {}, skipped {:?}",
            outcome.renamed, outcome.rebound, outcome.appended, outcome.skipped
        );
        for problem in &outcome.unresolved {
            println!("  unresolved {problem}");
        }
    }

    Ok(if outcome.skipped.is_empty() && outcome.unresolved.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn reconcile_scenario(raw: &str) -> Result<Outcome> {
    let scenario: Scenario = serde_yaml::from_str(raw).context("invalid scenario")?;

    let generic_registry = build_registry(&scenario.base_tech_object)?;
    let instance_registry = match &scenario.instance_base_tech_object {
        Some(spec) => build_registry(spec)?,
        None => Arc::clone(&generic_registry),
    };

    let mut generic = ModesManager::new(Some(OwnerRef::new(
        generic_registry.name(),
        generic_registry.eplan_name(),
    )))
    .with_base_tech_object(generic_registry);
    for mode in &scenario.generic {
        generic.add_mode(mode.name.as_str(), &mode.base_operation);
    }

    let mut instance = ModesManager::new(Some(OwnerRef::new(
        instance_registry.name(),
        instance_registry.eplan_name(),
    )))
    .with_base_tech_object(instance_registry)
    .with_config(scenario.config);
    for mode in &scenario.instance {
        instance.add_mode(mode.name.as_str(), &mode.base_operation);
    }

    let report = instance
        .update_on_generic_tech_object(&generic)
        .context("reconciliation rejected")?;
    Ok(outcome(&instance, report))
}

fn build_registry(spec: &RegistrySpec) -> Result<Arc<BaseTechObject>> {
    let mut registry = BaseTechObject::new(spec.name.as_str(), spec.eplan_name.as_str());
    for operation in &spec.operations {
        registry
            .add_base_operation(
                operation.lua_name(),
                operation.display_name(),
                operation.ordinal(),
            )
            .with_context(|| format!("invalid base tech object {}", spec.name))?;
    }
    Ok(Arc::new(registry))
}

fn outcome(instance: &ModesManager, report: ReconcileReport) -> Outcome {
    let modes = instance
        .modes()
        .iter()
        .enumerate()
        .map(|(index, mode)| ModeLine {
            number: index + 1,
            name: mode.name().to_string(),
            base_operation: mode.base_operation_lua_name().to_string(),
        })
        .collect();

    Outcome {
        modes,
        updated: report.updated,
        renamed: report.renamed,
        rebound: report.rebound,
        skipped: report.skipped,
        appended: report.appended.len(),
        unresolved: report
            .unresolved
            .into_iter()
            .map(|(index, err)| format!("mode {}: {err}", index + 1))
            .collect(),
    }
}
