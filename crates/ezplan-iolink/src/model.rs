//! IO-Link device template record
//!
//! One `.lrp` file describes one sensor or module:
//!
//! ```xml
//! <LinerecorderSensor Version="1.0">
//!   <Sensor>
//!     <VendorId>176</VendorId>
//!     <DeviceId>1050883</DeviceId>
//!     <ProductId>PN7092</ProductId>
//!     <ProductName>Pressure sensor</ProductName>
//!   </Sensor>
//!   <Parameters>
//!     <Parameter Index="64" Subindex="0" Name="Switchpoint" Value="10" />
//!   </Parameters>
//! </LinerecorderSensor>
//! ```
//!
//! Only [`LinerecorderSensor::version`] is interpreted by the store; the rest
//! is carried for downstream consumers.

use serde::{Deserialize, Serialize};

/// Parsed device template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "LinerecorderSensor")]
pub struct LinerecorderSensor {
    /// Template format version
    #[serde(rename = "@Version", default)]
    pub version: String,

    /// Device identification
    #[serde(rename = "Sensor", default)]
    pub sensor: Sensor,

    /// Device parameters
    #[serde(rename = "Parameters", default)]
    pub parameters: Parameters,
}

impl LinerecorderSensor {
    /// Create record with only a version
    #[inline]
    #[must_use]
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Self::default()
        }
    }

    /// Look up parameter by IO-Link index and subindex
    #[must_use]
    pub fn parameter(&self, index: u16, subindex: u8) -> Option<&Parameter> {
        self.parameters
            .items
            .iter()
            .find(|p| p.index == index && p.subindex == subindex)
    }
}

/// Device identification block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sensor {
    #[serde(rename = "VendorId", default)]
    pub vendor_id: u32,
    #[serde(rename = "DeviceId", default)]
    pub device_id: u32,
    #[serde(rename = "ProductId", default)]
    pub product_id: String,
    #[serde(rename = "ProductName", default)]
    pub product_name: String,
    #[serde(rename = "Description", default)]
    pub description: String,
}

/// Parameter list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    #[serde(rename = "Parameter", default)]
    pub items: Vec<Parameter>,
}

/// Single device parameter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(rename = "@Index")]
    pub index: u16,
    #[serde(rename = "@Subindex", default)]
    pub subindex: u8,
    #[serde(rename = "@Name", default)]
    pub name: String,
    #[serde(rename = "@Value", default)]
    pub value: String,
}
