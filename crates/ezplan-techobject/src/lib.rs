//! EZPlan Technological Objects
//!
//! Operation modes of automation objects (valves, pumps, sensors) and their
//! binding to the base operations declared by device-type templates.
//!
//! # Core Concepts
//!
//! - [`BaseTechObject`]: ordered registry of [`BaseOperation`]s for one device type
//! - [`Mode`]: named operating state, optionally bound to a base operation by lua name
//! - [`ModesManager`]: ordered mode list of one object; set up from a template and
//!   reconciled against a generic (template) object's manager
//! - [`ModesConfig`]: reconciliation strategy and shortfall policy
//!
//! # Example
//!
//! ```rust
//! use ezplan_techobject::{BaseTechObject, ModesManager};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), ezplan_techobject::TechObjectError> {
//! let valve = Arc::new(
//!     BaseTechObject::new("Valve", "V")
//!         .with_base_operation("OPEN", "Open", 1)?
//!         .with_base_operation("CLOSE", "Close", 2)?,
//! );
//!
//! let mut generic = ModesManager::detached();
//! generic.set_up_from_base_tech_object(Arc::clone(&valve));
//!
//! let mut instance = ModesManager::detached().with_base_tech_object(valve);
//! instance.add_mode("Manual", "CLOSE");
//! instance.add_mode("Auto", "");
//!
//! let report = instance.update_on_generic_tech_object(&generic)?;
//! assert_eq!(report.updated, vec![0, 1]);
//! assert_eq!(instance.modes()[1].base_operation(), Some("CLOSE"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod base_operation;
pub mod error;
pub mod mode;
pub mod modes_manager;
pub mod reconcile;

// Re-exports for convenience
pub use base_operation::{BaseOperation, BaseTechObject};
pub use error::{TechObjectError, TechObjectResult};
pub use mode::{Mode, ModeChange, ModeId, ModeObserver};
pub use modes_manager::{ModesManager, OwnerRef};
pub use reconcile::{ModesConfig, ReconcileReport, ReconcileStrategy, ShortfallPolicy};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with modes
    pub use crate::{
        BaseOperation, BaseTechObject, Mode, ModeChange, ModeObserver, ModesConfig, ModesManager,
        ReconcileStrategy, ShortfallPolicy,
    };
}
