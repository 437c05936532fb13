//! Error types for the resource index.

use thiserror::Error;

use crate::variable::{CollectionId, VariableId};

/// Result type alias using IndexError.
pub type IndexResult<T> = Result<T, IndexError>;

/// Errors raised while wiring the collection hierarchy.
///
/// Lookups never fail with an error; a miss is an `Option::None` or an
/// empty collection. Only hierarchy construction can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("Appending node '{child}' below '{parent}' would create a cycle")]
    CycleDetected {
        parent: CollectionId,
        child: CollectionId,
    },

    #[error("Collection already owned by another node: {0}")]
    DuplicateCollection(CollectionId),

    #[error("Unknown node index: {0}")]
    UnknownNode(usize),
}

/// Why a resource could not be placed in the hierarchy.
///
/// Placement failures never abort a batch: the resource is skipped, logged,
/// and reported back through [`BatchReport::rejected`](crate::BatchReport).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("Resource has no defining variables")]
    EmptyDefinition,

    #[error("Variable '{0}' does not belong to any collection")]
    UnownedVariable(VariableId),

    #[error("Collection '{0}' is not part of the hierarchy")]
    UnknownCollection(CollectionId),

    #[error("Variable '{id}' is not a member of collection '{collection}'")]
    ForeignVariable {
        collection: CollectionId,
        id: VariableId,
    },

    #[error("Resource defines more than one variable of collection '{0}'")]
    DuplicateAxis(CollectionId),

    #[error("No hierarchy path covers all defining variables")]
    Unreachable,
}

impl PlacementError {
    /// Short machine-readable code, used as a structured log field.
    pub fn code(&self) -> &'static str {
        match self {
            PlacementError::EmptyDefinition => "empty_definition",
            PlacementError::UnownedVariable(_) => "unowned_variable",
            PlacementError::UnknownCollection(_) => "unknown_collection",
            PlacementError::ForeignVariable { .. } => "foreign_variable",
            PlacementError::DuplicateAxis(_) => "duplicate_axis",
            PlacementError::Unreachable => "unreachable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = IndexError::CycleDetected {
            parent: CollectionId::new("offsets"),
            child: CollectionId::new("models"),
        };
        assert_eq!(
            err.to_string(),
            "Appending node 'models' below 'offsets' would create a cycle"
        );

        let err = PlacementError::ForeignVariable {
            collection: CollectionId::new("models"),
            id: VariableId::from("ICON"),
        };
        assert_eq!(
            err.to_string(),
            "Variable 'ICON' is not a member of collection 'models'"
        );
        assert_eq!(err.code(), "foreign_variable");
    }
}
