//! Error types for technological objects
//!
//! Covers registry declaration, mode binding and structural mismatches
//! found while reconciling an instance against its generic object.

/// Errors raised by base operation registries, modes and modes managers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TechObjectError {
    /// Base operation declared without a lua name
    #[error("base operation '{display_name}' has an empty lua name")]
    EmptyLuaName {
        /// Display name of the rejected operation
        display_name: String,
    },

    /// Base operation lua name declared twice in one registry
    #[error("base operation '{lua_name}' is already declared in '{base_tech_object}'")]
    DuplicateLuaName {
        /// Colliding lua name
        lua_name: String,
        /// Registry that already holds it
        base_tech_object: String,
    },

    /// Lua name does not resolve in the owning registry
    #[error("base operation '{lua_name}' is not declared in '{base_tech_object}'")]
    UnknownBaseOperation {
        /// Requested lua name
        lua_name: String,
        /// Registry that was searched
        base_tech_object: String,
    },

    /// Generic object has more modes than the instance has slots for
    #[error("generic object has {generic} modes but instance has only {instance}")]
    StructuralMismatch {
        /// Mode count of the generic manager
        generic: usize,
        /// Mode count of the instance manager
        instance: usize,
    },

    /// Generic modes whose bound operation no instance mode shares
    #[error("{unmatched} generic modes have no instance mode with the same base operation")]
    UnmatchedGenericModes {
        /// Number of generic modes without a counterpart
        unmatched: usize,
    },
}

impl TechObjectError {
    /// Create unknown base operation error
    pub fn unknown_base_operation(
        lua_name: impl Into<String>,
        base_tech_object: impl Into<String>,
    ) -> Self {
        Self::UnknownBaseOperation {
            lua_name: lua_name.into(),
            base_tech_object: base_tech_object.into(),
        }
    }
}

/// Result type alias for technological object operations
pub type TechObjectResult<T> = Result<T, TechObjectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_mismatch_display() {
        let err = TechObjectError::StructuralMismatch {
            generic: 3,
            instance: 1,
        };
        assert_eq!(
            err.to_string(),
            "generic object has 3 modes but instance has only 1"
        );
    }

    #[test]
    fn unknown_base_operation_display() {
        let err = TechObjectError::unknown_base_operation("OPEN", "Valve");
        assert!(err.to_string().contains("'OPEN'"));
        assert!(err.to_string().contains("'Valve'"));
    }
}
