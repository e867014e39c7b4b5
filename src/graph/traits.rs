//! Abstract graph capability consumed by satisfaction checks.
//!
//! The difference engine never owns the concept graph; it reads it
//! through this narrow trait. Using a trait enables:
//! - In-memory backends for testing and embedded use
//! - Storage-engine backends in the surrounding system
//!
//! All query methods are read-only and must be safe to call from many
//! threads at once.

use thiserror::Error;

use crate::concept::{RoleLabel, ThingId, TypeLabel};
use crate::value::Value;

/// Errors that can occur during graph lookups.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Instance not found.
    #[error("Thing not found: {0}")]
    ThingNotFound(ThingId),

    /// Type label not found.
    #[error("Type not found: {0}")]
    TypeNotFound(TypeLabel),

    /// Role label not found.
    #[error("Role not found: {0}")]
    RoleNotFound(RoleLabel),

    /// The instance exists but is not an attribute.
    #[error("Not an attribute: {0}")]
    NotAnAttribute(ThingId),

    /// The instance exists but is not a relation.
    #[error("Not a relation: {0}")]
    NotARelation(ThingId),

    /// Label already defined.
    #[error("Duplicate label: {0}")]
    DuplicateLabel(String),

    /// Backend error.
    #[error("Graph backend error: {0}")]
    BackendError(String),
}

/// Read capability over the concept graph.
///
/// Implementations answer type, value, and role-play questions about
/// stored instances. Result ordering must be deterministic so that
/// repeated satisfaction checks walk identical candidate sequences.
pub trait GraphQuery: Send + Sync {
    /// The runtime type of an instance.
    fn thing_type(&self, thing: ThingId) -> Result<TypeLabel, GraphError>;

    /// The stored value of an attribute instance.
    fn attribute_value(&self, thing: ThingId) -> Result<Value, GraphError>;

    /// Relations in which `player` fills at least one of `roles` at
    /// least once, ascending by ID. An empty role slice yields no
    /// relations.
    fn relations_playing(
        &self,
        player: ThingId,
        roles: &[RoleLabel],
    ) -> Result<Vec<ThingId>, GraphError>;

    /// Number of role slots in `relation`, restricted to `roles`, that
    /// are filled by `player`. Enumeration stops once `cap` slots have
    /// been counted, so callers checking "at least n" pass `cap = n`.
    fn count_role_plays(
        &self,
        relation: ThingId,
        roles: &[RoleLabel],
        player: ThingId,
        cap: u32,
    ) -> Result<u32, GraphError>;

    /// The type itself plus all transitive subtypes, deterministic order.
    fn sub_types(&self, ty: &TypeLabel) -> Result<Vec<TypeLabel>, GraphError>;

    /// The role itself plus all transitive sub-roles, deterministic order.
    fn sub_roles(&self, role: &RoleLabel) -> Result<Vec<RoleLabel>, GraphError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time test: ensure the trait is object-safe
    fn _assert_graph_query_object_safe(_: &dyn GraphQuery) {}

    #[test]
    fn test_graph_error_display() {
        let err = GraphError::ThingNotFound(ThingId::nil());
        assert!(err.to_string().contains("Thing not found"));

        let err = GraphError::BackendError("lock poisoned".to_string());
        assert!(err.to_string().contains("lock poisoned"));

        let err = GraphError::RoleNotFound(RoleLabel::of("employee"));
        assert!(err.to_string().contains("employee"));
    }
}
