//! Per-variable constraint bundles.
//!
//! A [`VariableDefinition`] gathers everything a child query demands of
//! one variable beyond what the parent query already guaranteed: a
//! required type, a required role, value predicates, and a multiset of
//! roles the bound instance must play. Definitions merge by conjunction
//! and a definition demanding nothing is *trivial*.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::concept::{RoleLabel, TypeLabel};
use crate::error::{SubsumeError, SubsumeResult};
use crate::predicate::ValuePredicate;
use crate::var::Var;

/// A multiset of required roles, kept as a role-to-count map.
///
/// `employee*2` means the player must fill the `employee` slot (or a
/// sub-role of it) in at least two distinct role slots of one relation.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoleBag {
    counts: BTreeMap<RoleLabel, u32>,
}

impl RoleBag {
    /// Creates an empty bag.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }

    /// Adds one occurrence of a role, consuming self.
    #[must_use]
    pub fn with(self, role: impl Into<RoleLabel>) -> Self {
        self.with_count(role, 1)
    }

    /// Adds `count` occurrences of a role, consuming self.
    ///
    /// Adding zero occurrences leaves the bag unchanged; stored counts
    /// are always at least one.
    #[must_use]
    pub fn with_count(mut self, role: impl Into<RoleLabel>, count: u32) -> Self {
        if count > 0 {
            let slot = self.counts.entry(role.into()).or_insert(0);
            *slot = slot.saturating_add(count);
        }
        self
    }

    /// Returns true if no role is required.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of distinct required roles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Required occurrence count for a role; zero if absent.
    #[must_use]
    pub fn count(&self, role: &RoleLabel) -> u32 {
        self.counts.get(role).copied().unwrap_or(0)
    }

    /// Iterates roles and their counts in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&RoleLabel, u32)> {
        self.counts.iter().map(|(role, count)| (role, *count))
    }

    /// Combines two bags by summing counts per role.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let mut merged = self.counts.clone();
        for (role, count) in &other.counts {
            let slot = merged.entry(role.clone()).or_insert(0);
            *slot = slot.saturating_add(*count);
        }
        Self { counts: merged }
    }
}

impl FromIterator<RoleLabel> for RoleBag {
    fn from_iter<I: IntoIterator<Item = RoleLabel>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |bag, role| bag.with(role))
    }
}

impl fmt::Display for RoleBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (role, count)) in self.counts.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{role}*{count}")?;
        }
        write!(f, "}}")
    }
}

/// The constraints a child query adds on a single variable.
///
/// Field order matters for the derived `Ord`: definitions sort by
/// variable first, which gives difference sets their canonical order.
///
/// # Examples
///
/// ```
/// use subsume::{Var, VariableDefinition};
///
/// let def = VariableDefinition::new("x")
///     .with_required_type("person")
///     .with_played_role("employee");
/// assert!(!def.is_trivial());
/// assert_eq!(def.var(), &Var::named("x"));
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct VariableDefinition {
    var: Var,
    required_type: Option<TypeLabel>,
    required_role: Option<RoleLabel>,
    value_predicates: BTreeSet<ValuePredicate>,
    played_roles: RoleBag,
}

impl VariableDefinition {
    /// Creates a trivial definition for a variable.
    #[must_use]
    pub fn new(var: impl Into<Var>) -> Self {
        Self {
            var: var.into(),
            required_type: None,
            required_role: None,
            value_predicates: BTreeSet::new(),
            played_roles: RoleBag::new(),
        }
    }

    /// Requires the bound instance's type to be a subtype of `ty`.
    #[must_use]
    pub fn with_required_type(mut self, ty: impl Into<TypeLabel>) -> Self {
        self.required_type = Some(ty.into());
        self
    }

    /// Requires the bound role to be a sub-role of `role`.
    #[must_use]
    pub fn with_required_role(mut self, role: impl Into<RoleLabel>) -> Self {
        self.required_role = Some(role.into());
        self
    }

    /// Adds a value predicate the bound attribute must satisfy.
    #[must_use]
    pub fn with_predicate(mut self, predicate: ValuePredicate) -> Self {
        self.value_predicates.insert(predicate);
        self
    }

    /// Adds one required play of `role`.
    #[must_use]
    pub fn with_played_role(mut self, role: impl Into<RoleLabel>) -> Self {
        self.played_roles = self.played_roles.with(role);
        self
    }

    /// Adds `count` required plays of `role`.
    #[must_use]
    pub fn with_played_role_count(mut self, role: impl Into<RoleLabel>, count: u32) -> Self {
        self.played_roles = self.played_roles.with_count(role, count);
        self
    }

    /// The constrained variable.
    #[must_use]
    pub const fn var(&self) -> &Var {
        &self.var
    }

    /// Required type, if any.
    #[must_use]
    pub const fn required_type(&self) -> Option<&TypeLabel> {
        self.required_type.as_ref()
    }

    /// Required role, if any.
    #[must_use]
    pub const fn required_role(&self) -> Option<&RoleLabel> {
        self.required_role.as_ref()
    }

    /// Value predicates in canonical order.
    #[must_use]
    pub const fn value_predicates(&self) -> &BTreeSet<ValuePredicate> {
        &self.value_predicates
    }

    /// Required role plays.
    #[must_use]
    pub const fn played_roles(&self) -> &RoleBag {
        &self.played_roles
    }

    /// Returns true if the definition demands nothing.
    ///
    /// Trivial definitions are dropped at difference construction; a
    /// variable without requirements must not influence satisfaction,
    /// equality, or hashing.
    #[must_use]
    pub fn is_trivial(&self) -> bool {
        self.required_type.is_none()
            && self.required_role.is_none()
            && self.value_predicates.is_empty()
            && self.played_roles.is_empty()
    }

    /// Conjoins two definitions of the same variable.
    ///
    /// Types and roles must agree when both sides carry one; predicates
    /// union; role plays sum per role.
    pub fn merge(&self, other: &Self) -> SubsumeResult<Self> {
        if self.var != other.var {
            return Err(SubsumeError::MismatchedVariables {
                left: self.var.clone(),
                right: other.var.clone(),
            });
        }

        let required_type = merge_requirement(
            &self.var,
            "type",
            self.required_type.as_ref(),
            other.required_type.as_ref(),
        )?
        .cloned();
        let required_role = merge_requirement(
            &self.var,
            "role",
            self.required_role.as_ref(),
            other.required_role.as_ref(),
        )?
        .cloned();

        let mut value_predicates = self.value_predicates.clone();
        value_predicates.extend(other.value_predicates.iter().cloned());

        Ok(Self {
            var: self.var.clone(),
            required_type,
            required_role,
            value_predicates,
            played_roles: self.played_roles.merge(&other.played_roles),
        })
    }
}

/// Merges one optional requirement; both sides present and unequal is a
/// conflict rather than a silent choice.
fn merge_requirement<'a, T: PartialEq + fmt::Display>(
    var: &Var,
    field: &'static str,
    left: Option<&'a T>,
    right: Option<&'a T>,
) -> SubsumeResult<Option<&'a T>> {
    match (left, right) {
        (Some(a), Some(b)) if a != b => Err(SubsumeError::ConflictingRequirement {
            var: var.clone(),
            field,
            left: a.to_string(),
            right: b.to_string(),
        }),
        (Some(a), _) => Ok(Some(a)),
        (None, b) => Ok(b),
    }
}

impl fmt::Display for VariableDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.var)?;
        let mut first = true;
        let mut sep = |f: &mut fmt::Formatter<'_>| -> fmt::Result {
            if first {
                first = false;
                Ok(())
            } else {
                write!(f, ", ")
            }
        };
        if let Some(ty) = &self.required_type {
            sep(f)?;
            write!(f, "isa {ty}")?;
        }
        if let Some(role) = &self.required_role {
            sep(f)?;
            write!(f, "role {role}")?;
        }
        for predicate in &self.value_predicates {
            sep(f)?;
            write!(f, "{predicate}")?;
        }
        if !self.played_roles.is_empty() {
            sep(f)?;
            write!(f, "plays {}", self.played_roles)?;
        }
        write!(f, "}}")
    }
}
