//! Semantic difference between two queries in a subsumption relation.
//!
//! The difference between a child query C and a parent query P is the
//! specialisation that turns P into a query equivalent to C. Holding the
//! difference, the cache can test whether an answer computed for P is
//! also an answer for C, and transform it into the child's variable
//! space, without re-running C.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::answer::Answer;
use crate::concept::ThingId;
use crate::definition::{RoleBag, VariableDefinition};
use crate::error::{SubsumeError, SubsumeResult};
use crate::graph::GraphQuery;
use crate::unifier::Unifier;
use crate::value::Value;
use crate::var::Var;

/// The set of extra constraints a parent answer must satisfy to count as
/// a child answer.
///
/// Construction drops trivial definitions, so a difference built from
/// nothing but trivial definitions equals the empty difference, and
/// definition order never influences equality, hashing, or the digest.
///
/// # Examples
///
/// ```
/// use subsume::graph::InMemoryGraph;
/// use subsume::{Answer, Concept, SemanticDifference, VariableDefinition};
///
/// let graph = InMemoryGraph::new();
/// graph.define_type("person")?;
/// graph.define_subtype("student", "person")?;
/// let bob = graph.insert_entity("student")?;
///
/// let diff = SemanticDifference::new([
///     VariableDefinition::new("x").with_required_type("person"),
/// ])?;
/// let answer = Answer::new().with("x", Concept::Thing(bob));
/// assert!(diff.satisfied_by(&answer, &graph)?);
/// # Ok::<(), subsume::SubsumeError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SemanticDifference {
    // sorted by variable, non-trivial, one definition per variable
    definitions: Vec<VariableDefinition>,
}

impl SemanticDifference {
    /// Creates the empty (trivial) difference.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            definitions: Vec::new(),
        }
    }

    /// Builds a difference from per-variable definitions.
    ///
    /// Trivial definitions are dropped and identical duplicates collapse;
    /// two differing definitions of one variable are rejected.
    pub fn new(
        definitions: impl IntoIterator<Item = VariableDefinition>,
    ) -> SubsumeResult<Self> {
        let mut kept: Vec<VariableDefinition> = definitions
            .into_iter()
            .filter(|vd| !vd.is_trivial())
            .collect();
        kept.sort();
        kept.dedup();
        for pair in kept.windows(2) {
            if pair[0].var() == pair[1].var() {
                return Err(SubsumeError::DuplicateDefinition {
                    var: pair[0].var().clone(),
                });
            }
        }
        Ok(Self { definitions: kept })
    }

    /// Returns true if the difference demands nothing.
    #[must_use]
    pub fn is_trivial(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Number of constrained variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns true if no variable is constrained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Definitions in canonical (variable) order.
    pub fn definitions(&self) -> impl Iterator<Item = &VariableDefinition> {
        self.definitions.iter()
    }

    /// The definition constraining `var`, if any.
    #[must_use]
    pub fn definition_of(&self, var: &Var) -> Option<&VariableDefinition> {
        self.definitions
            .binary_search_by(|vd| vd.var().cmp(var))
            .ok()
            .map(|idx| &self.definitions[idx])
    }

    /// Conjoins two differences variable by variable.
    pub fn merge(&self, other: &Self) -> SubsumeResult<Self> {
        let mut merged: BTreeMap<Var, VariableDefinition> = self
            .definitions
            .iter()
            .map(|vd| (vd.var().clone(), vd.clone()))
            .collect();
        for vd in &other.definitions {
            match merged.entry(vd.var().clone()) {
                Entry::Occupied(mut entry) => {
                    let conjoined = entry.get().merge(vd)?;
                    entry.insert(conjoined);
                }
                Entry::Vacant(entry) => {
                    entry.insert(vd.clone());
                }
            }
        }
        Self::new(merged.into_values())
    }

    /// A stable content hash of the difference, usable as a cache key.
    ///
    /// The digest is computed over the canonical definition order, so
    /// equal differences always hash alike regardless of how they were
    /// built. Stability is per crate version.
    #[must_use]
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(self.definitions.len() as u64).to_le_bytes());
        for vd in &self.definitions {
            hash_str(&mut hasher, vd.var().as_str());
            match vd.required_type() {
                Some(ty) => {
                    hasher.update(&[1]);
                    hash_str(&mut hasher, ty.as_str());
                }
                None => {
                    hasher.update(&[0]);
                }
            }
            match vd.required_role() {
                Some(role) => {
                    hasher.update(&[1]);
                    hash_str(&mut hasher, role.as_str());
                }
                None => {
                    hasher.update(&[0]);
                }
            }
            hasher.update(&(vd.value_predicates().len() as u64).to_le_bytes());
            for predicate in vd.value_predicates() {
                hasher.update(&[predicate.operator() as u8]);
                hash_value(&mut hasher, predicate.operand());
            }
            hasher.update(&(vd.played_roles().len() as u64).to_le_bytes());
            for (role, count) in vd.played_roles().iter() {
                hash_str(&mut hasher, role.as_str());
                hasher.update(&count.to_le_bytes());
            }
        }
        *hasher.finalize().as_bytes()
    }

    /// Tests whether a parent answer satisfies every added constraint.
    ///
    /// Ordinary failures, an unbound variable, a type outside the
    /// required hierarchy, a missed predicate, a missing co-witnessing
    /// relation, yield `Ok(false)`. Structural misuse, such as a binding
    /// of the wrong concept kind or an unknown graph element, is an
    /// `Err`.
    pub fn satisfied_by(&self, answer: &Answer, graph: &dyn GraphQuery) -> SubsumeResult<bool> {
        if self.is_trivial() {
            return Ok(true);
        }

        let role_requirements: Vec<(&Var, &RoleBag)> = self
            .definitions
            .iter()
            .filter(|vd| !vd.played_roles().is_empty())
            .map(|vd| (vd.var(), vd.played_roles()))
            .collect();

        // Role compatibility: one relation must witness every role
        // requirement at once, so the per-variable relation sets are
        // intersected, short-circuiting as soon as they run dry.
        if let Some((&(first_var, first_bag), rest)) = role_requirements.split_first() {
            let mut relations = roles_to_relations(first_var, first_bag, answer, graph)?;
            for &(var, bag) in rest {
                if relations.is_empty() {
                    break;
                }
                let next = roles_to_relations(var, bag, answer, graph)?;
                relations = relations.intersection(&next).copied().collect();
            }
            if relations.is_empty() {
                debug!("no relation witnesses all role requirements");
                return Ok(false);
            }
        }

        for vd in &self.definitions {
            if !definition_satisfied(vd, answer, graph)? {
                debug!(var = %vd.var(), "definition rejected answer");
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Transforms a parent answer into a child answer.
    ///
    /// The pipeline runs satisfaction, unifier application, a join with
    /// the child's partial substitution, and a projection onto the
    /// child's variables. Any rejection along the way yields the empty
    /// answer; the unifier is never consulted for an unsatisfied answer.
    pub fn propagate_answer(
        &self,
        answer: &Answer,
        child_sub: &Answer,
        child_vars: &BTreeSet<Var>,
        unifier: &Unifier,
        graph: &dyn GraphQuery,
    ) -> SubsumeResult<Answer> {
        if !self.satisfied_by(answer, graph)? {
            debug!(%answer, "answer rejected before unification");
            return Ok(Answer::new());
        }
        let unified = unifier.apply(answer);
        if unified.is_empty() {
            return Ok(unified);
        }
        let unified_vars = unified.vars();
        let child_sub_vars = child_sub.vars();
        let vars_to_retain: BTreeSet<Var> =
            unified_vars.difference(&child_sub_vars).cloned().collect();
        Ok(unified
            .project(&vars_to_retain)
            .join(child_sub)
            .project(child_vars))
    }
}

/// Relations in which the player bound to `var` fills every role in the
/// bag at least the required number of times.
///
/// The first role (in bag order) seeds the candidate pool; every role,
/// the seeding one included, then filters the pool by an early-stopped
/// play count. An unbound variable yields no relations.
fn roles_to_relations(
    var: &Var,
    roles: &RoleBag,
    answer: &Answer,
    graph: &dyn GraphQuery,
) -> SubsumeResult<BTreeSet<ThingId>> {
    let Some(concept) = answer.get(var) else {
        return Ok(BTreeSet::new());
    };
    let Some(player) = concept.as_thing() else {
        return Err(SubsumeError::BindingKind {
            var: var.clone(),
            expected: "thing",
            found: concept.kind_name(),
        });
    };

    let mut pool: Option<BTreeSet<ThingId>> = None;
    for (role, required) in roles.iter() {
        let role_and_subs = graph.sub_roles(role)?;
        let candidates = match pool.take() {
            // seed from the relations connected via this one role
            None => graph
                .relations_playing(player, &role_and_subs)?
                .into_iter()
                .collect(),
            Some(surviving) => surviving,
        };

        let mut filtered = BTreeSet::new();
        for relation in candidates {
            let played = graph.count_role_plays(relation, &role_and_subs, player, required)?;
            if played >= required {
                filtered.insert(relation);
            }
        }
        trace!(var = %var, role = %role, survivors = filtered.len(), "role requirement filtered pool");
        pool = Some(filtered);
    }
    Ok(pool.unwrap_or_default())
}

/// Checks one definition's type, role, and value requirements.
fn definition_satisfied(
    vd: &VariableDefinition,
    answer: &Answer,
    graph: &dyn GraphQuery,
) -> SubsumeResult<bool> {
    let Some(concept) = answer.get(vd.var()) else {
        return Ok(false);
    };

    if let Some(required) = vd.required_type() {
        let Some(thing) = concept.as_thing() else {
            return Err(SubsumeError::BindingKind {
                var: vd.var().clone(),
                expected: "thing",
                found: concept.kind_name(),
            });
        };
        let thing_type = graph.thing_type(thing)?;
        if !graph.sub_types(required)?.contains(&thing_type) {
            return Ok(false);
        }
    }

    if let Some(required) = vd.required_role() {
        let Some(role) = concept.as_role() else {
            return Err(SubsumeError::BindingKind {
                var: vd.var().clone(),
                expected: "role",
                found: concept.kind_name(),
            });
        };
        if !graph.sub_roles(required)?.contains(role) {
            return Ok(false);
        }
    }

    if !vd.value_predicates().is_empty() {
        let Some(thing) = concept.as_thing() else {
            return Err(SubsumeError::BindingKind {
                var: vd.var().clone(),
                expected: "thing",
                found: concept.kind_name(),
            });
        };
        let value = graph.attribute_value(thing)?;
        for predicate in vd.value_predicates() {
            if !predicate.holds_for(&value)? {
                return Ok(false);
            }
        }
    }

    Ok(true)
}

fn hash_str(hasher: &mut blake3::Hasher, s: &str) {
    hasher.update(&(s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

fn hash_value(hasher: &mut blake3::Hasher, value: &Value) {
    match value {
        Value::Bool(v) => {
            hasher.update(&[0, u8::from(*v)]);
        }
        Value::Int(v) => {
            hasher.update(&[1]);
            hasher.update(&v.to_le_bytes());
        }
        Value::Float(v) => {
            hasher.update(&[2]);
            hasher.update(&v.to_bits().to_le_bytes());
        }
        Value::String(v) => {
            hasher.update(&[3]);
            hash_str(hasher, v);
        }
        Value::DateTime(v) => {
            hasher.update(&[4]);
            hasher.update(&v.timestamp().to_le_bytes());
            hasher.update(&v.timestamp_subsec_nanos().to_le_bytes());
        }
    }
}

impl Default for SemanticDifference {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for SemanticDifference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, vd) in self.definitions.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{vd}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concept::{Concept, RoleLabel, ThingId};
    use crate::graph::InMemoryGraph;
    use crate::predicate::ValuePredicate;

    fn employment_graph() -> InMemoryGraph {
        let graph = InMemoryGraph::new();
        graph.define_type("person").unwrap();
        graph.define_subtype("employee-person", "person").unwrap();
        graph.define_type("company").unwrap();
        graph.define_type("employment").unwrap();
        graph.define_type("age").unwrap();
        graph.define_role("employee").unwrap();
        graph.define_subrole("part-time-employee", "employee").unwrap();
        graph.define_role("employer").unwrap();
        graph
    }

    fn type_def(var: &str, ty: &str) -> VariableDefinition {
        VariableDefinition::new(var).with_required_type(ty)
    }

    #[test]
    fn test_construction_drops_trivial() {
        let diff = SemanticDifference::new([
            VariableDefinition::new("x"),
            VariableDefinition::new("y"),
        ])
        .unwrap();
        assert!(diff.is_trivial());
        assert_eq!(diff, SemanticDifference::empty());
    }

    #[test]
    fn test_construction_collapses_identical_duplicates() {
        let diff = SemanticDifference::new([type_def("x", "person"), type_def("x", "person")])
            .unwrap();
        assert_eq!(diff.len(), 1);
    }

    #[test]
    fn test_construction_rejects_differing_duplicates() {
        let err = SemanticDifference::new([type_def("x", "person"), type_def("x", "company")])
            .unwrap_err();
        assert!(matches!(err, SubsumeError::DuplicateDefinition { .. }));
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let forwards =
            SemanticDifference::new([type_def("a", "person"), type_def("b", "company")]).unwrap();
        let backwards =
            SemanticDifference::new([type_def("b", "company"), type_def("a", "person")]).unwrap();
        assert_eq!(forwards, backwards);
        assert_eq!(forwards.digest(), backwards.digest());

        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        let hash_of = |diff: &SemanticDifference| {
            let mut hasher = DefaultHasher::new();
            diff.hash(&mut hasher);
            hasher.finish()
        };
        assert_eq!(hash_of(&forwards), hash_of(&backwards));
    }

    #[test]
    fn test_digest_distinguishes_differences() {
        let a = SemanticDifference::new([type_def("x", "person")]).unwrap();
        let b = SemanticDifference::new([type_def("x", "company")]).unwrap();
        assert_ne!(a.digest(), b.digest());
        assert_ne!(a.digest(), SemanticDifference::empty().digest());
    }

    #[test]
    fn test_definition_lookup() {
        let diff =
            SemanticDifference::new([type_def("a", "person"), type_def("c", "company")]).unwrap();
        assert!(diff.definition_of(&Var::named("a")).is_some());
        assert!(diff.definition_of(&Var::named("b")).is_none());
    }

    #[test]
    fn test_merge_unions_distinct_vars() {
        let left = SemanticDifference::new([type_def("x", "person")]).unwrap();
        let right = SemanticDifference::new([type_def("y", "company")]).unwrap();
        let merged = left.merge(&right).unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged, right.merge(&left).unwrap());
    }

    #[test]
    fn test_merge_conjoins_shared_var() {
        let left = SemanticDifference::new([type_def("x", "person")]).unwrap();
        let right = SemanticDifference::new([VariableDefinition::new("x")
            .with_predicate(ValuePredicate::gte(Value::Int(40)))])
        .unwrap();
        let merged = left.merge(&right).unwrap();
        assert_eq!(merged.len(), 1);
        let def = merged.definition_of(&Var::named("x")).unwrap();
        assert!(def.required_type().is_some());
        assert_eq!(def.value_predicates().len(), 1);
    }

    #[test]
    fn test_merge_conflict_errors() {
        let left = SemanticDifference::new([type_def("x", "person")]).unwrap();
        let right = SemanticDifference::new([type_def("x", "company")]).unwrap();
        assert!(left.merge(&right).unwrap_err().is_conflict());
    }

    #[test]
    fn test_merge_with_empty_is_identity() {
        let diff = SemanticDifference::new([type_def("x", "person")]).unwrap();
        assert_eq!(diff.merge(&SemanticDifference::empty()).unwrap(), diff);
    }

    #[test]
    fn test_trivial_difference_satisfied_by_anything() {
        let graph = employment_graph();
        let diff = SemanticDifference::empty();
        assert!(diff.satisfied_by(&Answer::new(), &graph).unwrap());
        let answer = Answer::new().with("x", Concept::Thing(ThingId::nil()));
        // Even a dangling binding passes: nothing is demanded of it.
        assert!(diff.satisfied_by(&answer, &graph).unwrap());
    }

    #[test]
    fn test_unbound_variable_rejects() {
        let graph = employment_graph();
        let diff = SemanticDifference::new([type_def("x", "person")]).unwrap();
        assert!(!diff.satisfied_by(&Answer::new(), &graph).unwrap());
    }

    #[test]
    fn test_type_check_is_reflexive_and_transitive() {
        let graph = employment_graph();
        let person = graph.insert_entity("person").unwrap();
        let specialised = graph.insert_entity("employee-person").unwrap();
        let company = graph.insert_entity("company").unwrap();
        let diff = SemanticDifference::new([type_def("x", "person")]).unwrap();

        let bind = |thing| Answer::new().with("x", Concept::Thing(thing));
        assert!(diff.satisfied_by(&bind(person), &graph).unwrap());
        assert!(diff.satisfied_by(&bind(specialised), &graph).unwrap());
        assert!(!diff.satisfied_by(&bind(company), &graph).unwrap());
    }

    #[test]
    fn test_role_check_uses_role_hierarchy() {
        let graph = employment_graph();
        let diff = SemanticDifference::new([
            VariableDefinition::new("r").with_required_role("employee")
        ])
        .unwrap();

        let bind = |label: &str| Answer::new().with("r", Concept::Role(RoleLabel::of(label)));
        assert!(diff.satisfied_by(&bind("employee"), &graph).unwrap());
        assert!(diff.satisfied_by(&bind("part-time-employee"), &graph).unwrap());
        assert!(!diff.satisfied_by(&bind("employer"), &graph).unwrap());
    }

    #[test]
    fn test_role_check_on_thing_binding_is_error() {
        let graph = employment_graph();
        let alice = graph.insert_entity("person").unwrap();
        let diff = SemanticDifference::new([
            VariableDefinition::new("r").with_required_role("employee")
        ])
        .unwrap();
        let answer = Answer::new().with("r", Concept::Thing(alice));
        assert!(diff.satisfied_by(&answer, &graph).unwrap_err().is_binding_kind());
    }

    #[test]
    fn test_value_predicates_check_attribute_value() {
        let graph = employment_graph();
        let young = graph.insert_attribute("age", Value::Int(12)).unwrap();
        let old = graph.insert_attribute("age", Value::Int(64)).unwrap();
        let diff = SemanticDifference::new([
            VariableDefinition::new("a").with_predicate(ValuePredicate::gte(Value::Int(18)))
        ])
        .unwrap();

        let bind = |thing| Answer::new().with("a", Concept::Thing(thing));
        assert!(!diff.satisfied_by(&bind(young), &graph).unwrap());
        assert!(diff.satisfied_by(&bind(old), &graph).unwrap());
    }

    #[test]
    fn test_value_predicate_on_non_attribute_is_error() {
        let graph = employment_graph();
        let alice = graph.insert_entity("person").unwrap();
        let diff = SemanticDifference::new([
            VariableDefinition::new("a").with_predicate(ValuePredicate::gte(Value::Int(18)))
        ])
        .unwrap();
        let answer = Answer::new().with("a", Concept::Thing(alice));
        assert!(diff.satisfied_by(&answer, &graph).unwrap_err().is_graph());
    }

    #[test]
    fn test_unknown_required_type_is_error() {
        let graph = employment_graph();
        let alice = graph.insert_entity("person").unwrap();
        let diff = SemanticDifference::new([type_def("x", "ghost")]).unwrap();
        let answer = Answer::new().with("x", Concept::Thing(alice));
        assert!(diff.satisfied_by(&answer, &graph).unwrap_err().is_graph());
    }

    #[test]
    fn test_role_count_threshold() {
        let graph = employment_graph();
        let alice = graph.insert_entity("person").unwrap();
        let acme = graph.insert_entity("company").unwrap();
        graph
            .insert_relation(
                "employment",
                [
                    (RoleLabel::of("employee"), alice),
                    (RoleLabel::of("part-time-employee"), alice),
                    (RoleLabel::of("employer"), acme),
                ],
            )
            .unwrap();

        let answer = Answer::new().with("x", Concept::Thing(alice));
        // Sub-roles count towards the super-role's requirement.
        let twice = SemanticDifference::new([
            VariableDefinition::new("x").with_played_role_count("employee", 2)
        ])
        .unwrap();
        assert!(twice.satisfied_by(&answer, &graph).unwrap());

        let thrice = SemanticDifference::new([
            VariableDefinition::new("x").with_played_role_count("employee", 3)
        ])
        .unwrap();
        assert!(!thrice.satisfied_by(&answer, &graph).unwrap());
    }

    #[test]
    fn test_role_requirements_need_one_witnessing_relation() {
        let graph = employment_graph();
        let alice = graph.insert_entity("person").unwrap();
        let acme = graph.insert_entity("company").unwrap();
        let globex = graph.insert_entity("company").unwrap();
        graph
            .insert_relation(
                "employment",
                [
                    (RoleLabel::of("employee"), alice),
                    (RoleLabel::of("employer"), acme),
                ],
            )
            .unwrap();
        graph
            .insert_relation("employment", [(RoleLabel::of("employer"), globex)])
            .unwrap();

        let both_in_one = SemanticDifference::new([
            VariableDefinition::new("x").with_played_role("employee"),
            VariableDefinition::new("y").with_played_role("employer"),
        ])
        .unwrap();

        let shared = Answer::new()
            .with("x", Concept::Thing(alice))
            .with("y", Concept::Thing(acme));
        assert!(both_in_one.satisfied_by(&shared, &graph).unwrap());

        // Both variables play their roles somewhere, but never in the
        // same relation.
        let split = Answer::new()
            .with("x", Concept::Thing(alice))
            .with("y", Concept::Thing(globex));
        assert!(!both_in_one.satisfied_by(&split, &graph).unwrap());
    }

    #[test]
    fn test_role_requirement_on_role_binding_is_error() {
        let graph = employment_graph();
        let diff = SemanticDifference::new([
            VariableDefinition::new("x").with_played_role("employee")
        ])
        .unwrap();
        let answer = Answer::new().with("x", Concept::Role(RoleLabel::of("employee")));
        assert!(diff.satisfied_by(&answer, &graph).unwrap_err().is_binding_kind());
    }

    #[test]
    fn test_propagate_rejection_yields_empty() {
        let graph = employment_graph();
        let company = graph.insert_entity("company").unwrap();
        let diff = SemanticDifference::new([type_def("x", "person")]).unwrap();
        let answer = Answer::new().with("x", Concept::Thing(company));
        let child_vars: BTreeSet<Var> = [Var::named("x")].into_iter().collect();
        let propagated = diff
            .propagate_answer(&answer, &Answer::new(), &child_vars, &Unifier::identity(), &graph)
            .unwrap();
        assert!(propagated.is_empty());
    }

    #[test]
    fn test_propagate_projects_and_joins() {
        let graph = employment_graph();
        let alice = graph.insert_entity("person").unwrap();
        let acme = graph.insert_entity("company").unwrap();
        let diff = SemanticDifference::new([type_def("p", "person")]).unwrap();

        let answer = Answer::new()
            .with("p", Concept::Thing(alice))
            .with("extra", Concept::Thing(acme));
        let unifier = Unifier::identity().with("p", "x");
        let child_sub = Answer::new().with("y", Concept::Thing(acme));
        let child_vars: BTreeSet<Var> = [Var::named("x"), Var::named("y")].into_iter().collect();

        let propagated = diff
            .propagate_answer(&answer, &child_sub, &child_vars, &unifier, &graph)
            .unwrap();
        assert_eq!(propagated.len(), 2);
        assert_eq!(propagated.get(&Var::named("x")), Some(&Concept::Thing(alice)));
        assert_eq!(propagated.get(&Var::named("y")), Some(&Concept::Thing(acme)));
        assert!(!propagated.contains_var(&Var::named("extra")));
    }

    #[test]
    fn test_difference_serialization() {
        let diff = SemanticDifference::new([
            type_def("x", "person"),
            VariableDefinition::new("y").with_played_role_count("employee", 2),
        ])
        .unwrap();
        let json = serde_json::to_string(&diff).unwrap();
        let back: SemanticDifference = serde_json::from_str(&json).unwrap();
        assert_eq!(diff, back);
        assert_eq!(diff.digest(), back.digest());
    }
}
