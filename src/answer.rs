//! Query answers as variable substitutions.
//!
//! An [`Answer`] maps variables to the concepts bound to them. The empty
//! answer doubles as the rejection sentinel throughout the propagation
//! pipeline: any step that disqualifies an answer returns `Answer::new()`
//! and every later step passes it through unchanged.

use std::collections::BTreeSet;
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::concept::Concept;
use crate::var::Var;

/// An immutable substitution from variables to concepts.
///
/// # Examples
///
/// ```
/// use subsume::{Answer, Concept, ThingId, Var};
///
/// let x = ThingId::new();
/// let answer = Answer::new().with("x", Concept::Thing(x));
/// assert_eq!(answer.get(&Var::named("x")), Some(&Concept::Thing(x)));
/// assert!(!answer.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answer {
    bindings: BTreeMap<Var, Concept>,
}

impl Answer {
    /// Creates the empty answer, which is also the rejection sentinel.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bindings: BTreeMap::new(),
        }
    }

    /// Adds a binding, consuming self.
    #[must_use]
    pub fn with(mut self, var: impl Into<Var>, concept: impl Into<Concept>) -> Self {
        self.bindings.insert(var.into(), concept.into());
        self
    }

    /// Returns true if no variable is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Number of bound variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true if `var` is bound.
    #[must_use]
    pub fn contains_var(&self, var: &Var) -> bool {
        self.bindings.contains_key(var)
    }

    /// Looks up the concept bound to `var`.
    #[must_use]
    pub fn get(&self, var: &Var) -> Option<&Concept> {
        self.bindings.get(var)
    }

    /// The set of bound variables.
    #[must_use]
    pub fn vars(&self) -> BTreeSet<Var> {
        self.bindings.keys().cloned().collect()
    }

    /// Iterates bindings in variable order.
    pub fn iter(&self) -> impl Iterator<Item = (&Var, &Concept)> {
        self.bindings.iter()
    }

    /// Restricts the answer to the given variables.
    #[must_use]
    pub fn project(&self, vars: &BTreeSet<Var>) -> Self {
        Self {
            bindings: self
                .bindings
                .iter()
                .filter(|(var, _)| vars.contains(*var))
                .map(|(var, concept)| (var.clone(), concept.clone()))
                .collect(),
        }
    }

    /// Natural join of two answers.
    ///
    /// An empty side acts as the identity. A disagreement on any shared
    /// variable rejects the whole join and yields the empty answer.
    #[must_use]
    pub fn join(&self, other: &Self) -> Self {
        let mut joined = self.bindings.clone();
        for (var, concept) in &other.bindings {
            match joined.get(var) {
                Some(existing) if existing != concept => return Self::new(),
                _ => {
                    joined.insert(var.clone(), concept.clone());
                }
            }
        }
        Self { bindings: joined }
    }
}

impl FromIterator<(Var, Concept)> for Answer {
    fn from_iter<I: IntoIterator<Item = (Var, Concept)>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Answer {
    type Item = (Var, Concept);
    type IntoIter = btree_map::IntoIter<Var, Concept>;

    fn into_iter(self) -> Self::IntoIter {
        self.bindings.into_iter()
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (var, concept)) in self.bindings.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{var}={concept}")?;
        }
        write!(f, "}}")
    }
}
