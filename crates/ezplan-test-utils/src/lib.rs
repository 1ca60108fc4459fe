//! Testing utilities for EZPlan workspace
//!
//! Shared test helpers, fixtures, and assertions.

#![allow(missing_docs)]

use ezplan_techobject::{BaseTechObject, ModeChange, ModeId, ModeObserver};
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Observer that keeps every change it receives
#[derive(Debug, Default)]
pub struct RecordingObserver {
    changes: Mutex<Vec<(ModeId, ModeChange)>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn changes(&self) -> Vec<(ModeId, ModeChange)> {
        self.changes.lock().clone()
    }

    pub fn renames(&self) -> Vec<(ModeId, String)> {
        self.changes
            .lock()
            .iter()
            .filter_map(|(id, change)| match change {
                ModeChange::Renamed { new, .. } => Some((*id, new.clone())),
                ModeChange::BaseOperationChanged { .. } => None,
            })
            .collect()
    }

    pub fn rebinds(&self) -> Vec<(ModeId, Option<String>)> {
        self.changes
            .lock()
            .iter()
            .filter_map(|(id, change)| match change {
                ModeChange::BaseOperationChanged { new, .. } => Some((*id, new.clone())),
                ModeChange::Renamed { .. } => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.changes.lock().clear();
    }
}

impl ModeObserver for RecordingObserver {
    fn mode_changed(&self, id: ModeId, change: &ModeChange) {
        self.changes.lock().push((id, change.clone()));
    }
}

/// Registry with operations `OP1..=OPn` named `Operation 1..=n`
pub fn base_tech_object(count: usize) -> Arc<BaseTechObject> {
    let mut registry = BaseTechObject::new("TestObject", "TO");
    for i in 1..=count {
        let ordinal = i32::try_from(i).unwrap();
        registry
            .add_base_operation(format!("OP{i}"), format!("Operation {i}"), ordinal)
            .unwrap();
    }
    Arc::new(registry)
}

/// Well-formed `.lrp` template
pub fn sensor_xml(version: &str, product: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<LinerecorderSensor Version="{version}">
  <Sensor>
    <VendorId>176</VendorId>
    <DeviceId>1050883</DeviceId>
    <ProductId>{product}</ProductId>
    <ProductName>{product} pressure sensor</ProductName>
    <Description>Pressure transmitter</Description>
  </Sensor>
  <Parameters>
    <Parameter Index="64" Subindex="0" Name="Switchpoint" Value="10" />
    <Parameter Index="65" Subindex="0" Name="Hysteresis" Value="2" />
  </Parameters>
</LinerecorderSensor>
"#
    )
}

/// Malformed `.lrp` template
pub fn broken_xml() -> String {
    r#"<LinerecorderSensor Version="1.0"><Sensor><ProductId>oops</Sensor>"#.to_string()
}

/// Temporary template directory
pub struct TemplateDir {
    dir: TempDir,
}

impl TemplateDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `file_name` with `contents`, returning its path
    pub fn write(&self, file_name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(file_name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    /// Write `count` well-formed templates named `T000.lrp`, `T001.lrp`, ...
    pub fn write_sensors(&self, count: usize, version: &str) -> Vec<PathBuf> {
        (0..count)
            .map(|i| {
                let name = format!("T{i:03}");
                self.write(&format!("{name}.lrp"), &sensor_xml(version, &name))
            })
            .collect()
    }
}

impl Default for TemplateDir {
    fn default() -> Self {
        Self::new()
    }
}
