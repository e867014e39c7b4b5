//! Concept identifiers and the polymorphic binding model.
//!
//! A query answer binds each variable to a [`Concept`]: either a stored
//! instance (a *thing*: entity, relation, or attribute), a schema type, or
//! a schema role. Constraint checks never narrow a binding blindly; they
//! ask for the one interpretation they need through the checked `as_*`
//! accessors and surface a kind mismatch as an error at the call site.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Globally unique identifier for a stored instance.
///
/// Entities, relations, and attribute instances all live in one instance
/// namespace: a relation can itself play a role in another relation, so
/// one identifier kind serves them all.
///
/// # Examples
///
/// ```
/// use subsume::ThingId;
///
/// let id = ThingId::new();
/// assert!(!id.is_nil());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThingId(Uuid);

impl ThingId {
    /// Creates a new random instance ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an instance ID from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Returns true if this is a nil (all zeros) UUID.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Creates a nil instance ID (for testing or sentinel values).
    #[must_use]
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for ThingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ThingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ThingId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<ThingId> for Uuid {
    fn from(id: ThingId) -> Self {
        id.0
    }
}

/// A schema type name.
///
/// Types form a subtype hierarchy; label equality is identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeLabel(String);

impl TypeLabel {
    /// Creates a type label.
    #[must_use]
    pub fn of(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the label text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TypeLabel {
    fn from(name: &str) -> Self {
        Self::of(name)
    }
}

impl From<String> for TypeLabel {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// A schema role name.
///
/// Roles form their own sub-role hierarchy, independent of the type
/// hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleLabel(String);

impl RoleLabel {
    /// Creates a role label.
    #[must_use]
    pub fn of(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the label text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RoleLabel {
    fn from(name: &str) -> Self {
        Self::of(name)
    }
}

impl From<String> for RoleLabel {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// A concept bound to a query variable.
///
/// Most bindings are things; type and role bindings occur in meta-level
/// queries that quantify over the schema itself.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Concept {
    /// A stored instance: entity, relation, or attribute.
    Thing(ThingId),
    /// A schema type.
    Type(TypeLabel),
    /// A schema role.
    Role(RoleLabel),
}

impl Concept {
    pub const fn is_thing(&self) -> bool {
        matches!(self, Self::Thing(_))
    }

    pub const fn is_type(&self) -> bool {
        matches!(self, Self::Type(_))
    }

    pub const fn is_role(&self) -> bool {
        matches!(self, Self::Role(_))
    }

    pub const fn as_thing(&self) -> Option<ThingId> {
        match self {
            Self::Thing(id) => Some(*id),
            _ => None,
        }
    }

    pub const fn as_type(&self) -> Option<&TypeLabel> {
        match self {
            Self::Type(label) => Some(label),
            _ => None,
        }
    }

    pub const fn as_role(&self) -> Option<&RoleLabel> {
        match self {
            Self::Role(label) => Some(label),
            _ => None,
        }
    }

    /// Returns a human-readable kind name.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Thing(_) => "thing",
            Self::Type(_) => "type",
            Self::Role(_) => "role",
        }
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Thing(id) => write!(f, "thing:{id}"),
            Self::Type(label) => write!(f, "type:{label}"),
            Self::Role(label) => write!(f, "role:{label}"),
        }
    }
}

impl From<ThingId> for Concept {
    fn from(id: ThingId) -> Self {
        Self::Thing(id)
    }
}

impl From<TypeLabel> for Concept {
    fn from(label: TypeLabel) -> Self {
        Self::Type(label)
    }
}

impl From<RoleLabel> for Concept {
    fn from(label: RoleLabel) -> Self {
        Self::Role(label)
    }
}
