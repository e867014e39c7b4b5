//! Variable renaming between parent and child queries.
//!
//! A [`Unifier`] is produced elsewhere, by the machinery that established
//! the subsumption relation between two queries. Here it is only applied:
//! it rewrites a parent answer into the child's variable space before the
//! child's substitution is joined in.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::answer::Answer;
use crate::concept::Concept;
use crate::var::Var;

/// A parent-to-child variable mapping.
///
/// The mapping is a multimap: one parent variable may map onto several
/// child variables. The empty unifier is the identity.
///
/// # Examples
///
/// ```
/// use subsume::{Answer, Concept, ThingId, Unifier, Var};
///
/// let x = ThingId::new();
/// let unifier = Unifier::identity().with("p", "c");
/// let parent = Answer::new().with("p", Concept::Thing(x));
/// let child = unifier.apply(&parent);
/// assert_eq!(child.get(&Var::named("c")), Some(&Concept::Thing(x)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Unifier {
    mappings: BTreeMap<Var, BTreeSet<Var>>,
}

impl Unifier {
    /// Creates the identity unifier.
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            mappings: BTreeMap::new(),
        }
    }

    /// Adds a parent-to-child mapping, consuming self.
    #[must_use]
    pub fn with(mut self, parent: impl Into<Var>, child: impl Into<Var>) -> Self {
        self.mappings
            .entry(parent.into())
            .or_default()
            .insert(child.into());
        self
    }

    /// Returns true if no mapping is present.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Child variables a parent variable maps onto.
    #[must_use]
    pub fn images_of(&self, parent: &Var) -> Option<&BTreeSet<Var>> {
        self.mappings.get(parent)
    }

    /// Iterates mappings in parent-variable order.
    pub fn iter(&self) -> impl Iterator<Item = (&Var, &BTreeSet<Var>)> {
        self.mappings.iter()
    }

    /// Rewrites an answer into the child's variable space.
    ///
    /// Mapped variables are renamed to each of their images. An unmapped
    /// variable keeps its name unless that name is claimed as the image
    /// of some mapping, in which case its binding is dropped. Two parent
    /// variables carrying different concepts onto one child variable
    /// reject the whole application and yield the empty answer.
    #[must_use]
    pub fn apply(&self, answer: &Answer) -> Answer {
        if self.is_identity() {
            return answer.clone();
        }

        let claimed: BTreeSet<&Var> = self.mappings.values().flatten().collect();
        let mut rewritten: BTreeMap<Var, Concept> = BTreeMap::new();
        for (var, concept) in answer.iter() {
            if let Some(images) = self.mappings.get(var) {
                for image in images {
                    match rewritten.get(image) {
                        Some(existing) if existing != concept => return Answer::new(),
                        _ => {
                            rewritten.insert(image.clone(), concept.clone());
                        }
                    }
                }
            } else if !claimed.contains(var) {
                rewritten.insert(var.clone(), concept.clone());
            }
        }
        rewritten.into_iter().collect()
    }
}

impl FromIterator<(Var, Var)> for Unifier {
    fn from_iter<I: IntoIterator<Item = (Var, Var)>>(iter: I) -> Self {
        let mut unifier = Self::identity();
        for (parent, child) in iter {
            unifier = unifier.with(parent, child);
        }
        unifier
    }
}

impl fmt::Display for Unifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for (parent, images) in &self.mappings {
            for image in images {
                if !first {
                    write!(f, ", ")?;
                }
                write!(f, "{parent}->{image}")?;
                first = false;
            }
        }
        write!(f, "}}")
    }
}
