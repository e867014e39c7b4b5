//! In-memory graph backend.
//!
//! This module provides a thread-safe in-memory implementation of
//! [`GraphQuery`]. It is intended for embedded usage, tests, and as a
//! reference implementation: schema references are validated on every
//! write, and relations index their players so role-play queries stay
//! cheap.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::hash::Hash;
use std::sync::RwLock;

use crate::concept::{RoleLabel, ThingId, TypeLabel};
use crate::graph::traits::{GraphError, GraphQuery};
use crate::value::Value;

fn lock_err(context: &'static str) -> GraphError {
    GraphError::BackendError(format!("poisoned lock: {context}"))
}

/// The label itself plus everything below it, breadth-first.
fn expand_down<L>(root: &L, children: &HashMap<L, BTreeSet<L>>) -> Vec<L>
where
    L: Clone + Ord + Hash,
{
    let mut out = vec![root.clone()];
    let mut queue: VecDeque<&L> = VecDeque::from([root]);
    while let Some(current) = queue.pop_front() {
        if let Some(subs) = children.get(current) {
            for sub in subs {
                out.push(sub.clone());
                queue.push_back(sub);
            }
        }
    }
    out
}

#[derive(Debug, Default)]
struct GraphState {
    // schema: label -> direct sub-labels
    type_children: HashMap<TypeLabel, BTreeSet<TypeLabel>>,
    role_children: HashMap<RoleLabel, BTreeSet<RoleLabel>>,
    // instances
    things: HashMap<ThingId, TypeLabel>,
    attributes: HashMap<ThingId, Value>,
    // role slots in insertion order; one player may fill several slots
    relations: HashMap<ThingId, Vec<(RoleLabel, ThingId)>>,
    plays_index: HashMap<ThingId, BTreeSet<ThingId>>,
}

impl GraphState {
    fn require_type(&self, ty: &TypeLabel) -> Result<(), GraphError> {
        if self.type_children.contains_key(ty) {
            Ok(())
        } else {
            Err(GraphError::TypeNotFound(ty.clone()))
        }
    }

    fn require_role(&self, role: &RoleLabel) -> Result<(), GraphError> {
        if self.role_children.contains_key(role) {
            Ok(())
        } else {
            Err(GraphError::RoleNotFound(role.clone()))
        }
    }

    fn require_thing(&self, thing: ThingId) -> Result<(), GraphError> {
        if self.things.contains_key(&thing) {
            Ok(())
        } else {
            Err(GraphError::ThingNotFound(thing))
        }
    }
}

/// Thread-safe in-memory concept graph.
///
/// # Examples
///
/// ```
/// use subsume::graph::{GraphQuery, InMemoryGraph};
/// use subsume::TypeLabel;
///
/// let graph = InMemoryGraph::new();
/// graph.define_type("person")?;
/// let alice = graph.insert_entity("person")?;
/// assert_eq!(graph.thing_type(alice)?, TypeLabel::of("person"));
/// # Ok::<(), subsume::graph::GraphError>(())
/// ```
#[derive(Debug, Default)]
pub struct InMemoryGraph {
    state: RwLock<GraphState>,
}

impl InMemoryGraph {
    /// Creates a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines a root type.
    pub fn define_type(&self, ty: impl Into<TypeLabel>) -> Result<(), GraphError> {
        let ty = ty.into();
        let mut state = self.state.write().map_err(|_| lock_err("define_type"))?;
        if state.type_children.contains_key(&ty) {
            return Err(GraphError::DuplicateLabel(ty.to_string()));
        }
        state.type_children.insert(ty, BTreeSet::new());
        Ok(())
    }

    /// Defines a type below an existing supertype.
    pub fn define_subtype(
        &self,
        ty: impl Into<TypeLabel>,
        super_ty: impl Into<TypeLabel>,
    ) -> Result<(), GraphError> {
        let ty = ty.into();
        let super_ty = super_ty.into();
        let mut state = self.state.write().map_err(|_| lock_err("define_subtype"))?;
        state.require_type(&super_ty)?;
        if state.type_children.contains_key(&ty) {
            return Err(GraphError::DuplicateLabel(ty.to_string()));
        }
        state.type_children.insert(ty.clone(), BTreeSet::new());
        if let Some(children) = state.type_children.get_mut(&super_ty) {
            children.insert(ty);
        }
        Ok(())
    }

    /// Defines a root role.
    pub fn define_role(&self, role: impl Into<RoleLabel>) -> Result<(), GraphError> {
        let role = role.into();
        let mut state = self.state.write().map_err(|_| lock_err("define_role"))?;
        if state.role_children.contains_key(&role) {
            return Err(GraphError::DuplicateLabel(role.to_string()));
        }
        state.role_children.insert(role, BTreeSet::new());
        Ok(())
    }

    /// Defines a role below an existing super-role.
    pub fn define_subrole(
        &self,
        role: impl Into<RoleLabel>,
        super_role: impl Into<RoleLabel>,
    ) -> Result<(), GraphError> {
        let role = role.into();
        let super_role = super_role.into();
        let mut state = self.state.write().map_err(|_| lock_err("define_subrole"))?;
        state.require_role(&super_role)?;
        if state.role_children.contains_key(&role) {
            return Err(GraphError::DuplicateLabel(role.to_string()));
        }
        state.role_children.insert(role.clone(), BTreeSet::new());
        if let Some(children) = state.role_children.get_mut(&super_role) {
            children.insert(role);
        }
        Ok(())
    }

    /// Inserts an entity instance of an existing type.
    pub fn insert_entity(&self, ty: impl Into<TypeLabel>) -> Result<ThingId, GraphError> {
        let ty = ty.into();
        let mut state = self.state.write().map_err(|_| lock_err("insert_entity"))?;
        state.require_type(&ty)?;
        let id = ThingId::new();
        state.things.insert(id, ty);
        Ok(id)
    }

    /// Inserts an attribute instance of an existing type.
    pub fn insert_attribute(
        &self,
        ty: impl Into<TypeLabel>,
        value: Value,
    ) -> Result<ThingId, GraphError> {
        let ty = ty.into();
        let mut state = self
            .state
            .write()
            .map_err(|_| lock_err("insert_attribute"))?;
        state.require_type(&ty)?;
        let id = ThingId::new();
        state.things.insert(id, ty);
        state.attributes.insert(id, value);
        Ok(id)
    }

    /// Inserts a relation instance with its role slots.
    ///
    /// Every role must be defined and every player must exist; a player
    /// may fill several slots, including several slots of one role.
    pub fn insert_relation(
        &self,
        ty: impl Into<TypeLabel>,
        players: impl IntoIterator<Item = (RoleLabel, ThingId)>,
    ) -> Result<ThingId, GraphError> {
        let ty = ty.into();
        let slots: Vec<(RoleLabel, ThingId)> = players.into_iter().collect();
        let mut state = self
            .state
            .write()
            .map_err(|_| lock_err("insert_relation"))?;
        state.require_type(&ty)?;
        for (role, player) in &slots {
            state.require_role(role)?;
            state.require_thing(*player)?;
        }

        let id = ThingId::new();
        state.things.insert(id, ty);
        for (_, player) in &slots {
            state.plays_index.entry(*player).or_default().insert(id);
        }
        state.relations.insert(id, slots);
        Ok(id)
    }
}

impl GraphQuery for InMemoryGraph {
    fn thing_type(&self, thing: ThingId) -> Result<TypeLabel, GraphError> {
        let state = self.state.read().map_err(|_| lock_err("thing_type"))?;
        state
            .things
            .get(&thing)
            .cloned()
            .ok_or(GraphError::ThingNotFound(thing))
    }

    fn attribute_value(&self, thing: ThingId) -> Result<Value, GraphError> {
        let state = self
            .state
            .read()
            .map_err(|_| lock_err("attribute_value"))?;
        state.require_thing(thing)?;
        state
            .attributes
            .get(&thing)
            .cloned()
            .ok_or(GraphError::NotAnAttribute(thing))
    }

    fn relations_playing(
        &self,
        player: ThingId,
        roles: &[RoleLabel],
    ) -> Result<Vec<ThingId>, GraphError> {
        let state = self
            .state
            .read()
            .map_err(|_| lock_err("relations_playing"))?;
        state.require_thing(player)?;

        let wanted: BTreeSet<&RoleLabel> = roles.iter().collect();
        let Some(candidates) = state.plays_index.get(&player) else {
            return Ok(Vec::new());
        };

        let mut out = Vec::new();
        for relation in candidates {
            let Some(slots) = state.relations.get(relation) else {
                continue;
            };
            let plays_wanted = slots
                .iter()
                .any(|(role, filler)| *filler == player && wanted.contains(role));
            if plays_wanted {
                out.push(*relation);
            }
        }
        Ok(out)
    }

    fn count_role_plays(
        &self,
        relation: ThingId,
        roles: &[RoleLabel],
        player: ThingId,
        cap: u32,
    ) -> Result<u32, GraphError> {
        let state = self
            .state
            .read()
            .map_err(|_| lock_err("count_role_plays"))?;
        state.require_thing(relation)?;
        let slots = state
            .relations
            .get(&relation)
            .ok_or(GraphError::NotARelation(relation))?;

        let wanted: BTreeSet<&RoleLabel> = roles.iter().collect();
        let mut count = 0u32;
        for (role, filler) in slots {
            if count >= cap {
                break;
            }
            if *filler == player && wanted.contains(role) {
                count += 1;
            }
        }
        Ok(count)
    }

    fn sub_types(&self, ty: &TypeLabel) -> Result<Vec<TypeLabel>, GraphError> {
        let state = self.state.read().map_err(|_| lock_err("sub_types"))?;
        state.require_type(ty)?;
        Ok(expand_down(ty, &state.type_children))
    }

    fn sub_roles(&self, role: &RoleLabel) -> Result<Vec<RoleLabel>, GraphError> {
        let state = self.state.read().map_err(|_| lock_err("sub_roles"))?;
        state.require_role(role)?;
        Ok(expand_down(role, &state.role_children))
    }
}
