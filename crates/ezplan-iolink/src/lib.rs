//! EZPlan IO-Link Templates
//!
//! Concurrent ingestion of IO-Link device template files into a shared store.
//!
//! # Core Operations
//!
//! - **Discover**: list `.lrp` files of a directory
//! - **Load**: spawn one parse-and-insert task per file, return the handles
//! - **Store**: deduplicate by template name, record the canonical version
//!
//! # Example
//!
//! ```rust,ignore
//! use ezplan_iolink::{TemplateLoader, TemplateStore, XmlSensorParser};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = TemplateStore::shared();
//! let loader = TemplateLoader::new(XmlSensorParser);
//!
//! let handles = loader.load("templates/devices", store.clone())?;
//! let report = handles.join_all().await;
//!
//! println!("{} templates, version {:?}", store.len(), store.version());
//! for failure in &report.failures {
//!     eprintln!("{failure}");
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod loader;
pub mod model;
pub mod parser;
pub mod store;

// Re-exports for convenience
pub use config::LoaderConfig;
pub use error::{ConfigError, IngestError, ParseError};
pub use loader::{IngestionHandles, IngestionReport, PendingTemplate, TemplateFile, TemplateLoader};
pub use model::{LinerecorderSensor, Parameter, Parameters, Sensor};
pub use parser::{TemplateParser, XmlSensorParser};
pub use store::{StoreError, TemplateStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
