//! # Subsume - semantic-difference gated answer propagation
//!
//! Subsume decides whether an answer already computed for a general
//! ("parent") query can be reused as an answer to a more specific
//! ("child") query, and transforms it when it can. It is the validity
//! gate of a query-answer cache in a typed graph-reasoning engine:
//! instead of recomputing the child query, the engine derives child
//! answers from cached parent answers, paying only the cost of checking
//! the *semantic difference*, the extra constraints the parent binding
//! must additionally satisfy.
//!
//! ## Core Concepts
//!
//! - **VariableDefinition**: the constraints a child query adds on one
//!   variable (required type, required role, value predicates, played
//!   roles)
//! - **SemanticDifference**: an immutable set of non-trivial definitions
//!   with satisfaction checking and answer propagation
//! - **Answer**: a substitution from variables to concepts; the empty
//!   answer is the rejection sentinel
//! - **GraphQuery**: the narrow read capability over the concept graph
//!
//! ## Usage
//!
//! ```rust
//! use std::collections::BTreeSet;
//! use subsume::graph::InMemoryGraph;
//! use subsume::{
//!     Answer, Concept, SemanticDifference, Unifier, Var, VariableDefinition,
//! };
//!
//! // A small employment graph.
//! let graph = InMemoryGraph::new();
//! graph.define_type("person")?;
//! graph.define_type("employment")?;
//! graph.define_role("employee")?;
//! let alice = graph.insert_entity("person")?;
//! graph.insert_relation("employment", [("employee".into(), alice)])?;
//!
//! // The child query additionally demands that $x is a person playing
//! // the employee role.
//! let diff = SemanticDifference::new([VariableDefinition::new("x")
//!     .with_required_type("person")
//!     .with_played_role("employee")])?;
//!
//! let parent_answer = Answer::new().with("x", Concept::Thing(alice));
//! let child_vars: BTreeSet<Var> = [Var::named("x")].into_iter().collect();
//! let propagated = diff.propagate_answer(
//!     &parent_answer,
//!     &Answer::new(),
//!     &child_vars,
//!     &Unifier::identity(),
//!     &graph,
//! )?;
//! assert_eq!(propagated.get(&Var::named("x")), Some(&Concept::Thing(alice)));
//! # Ok::<(), subsume::SubsumeError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod answer;
pub mod concept;
pub mod definition;
pub mod difference;
pub mod error;
pub mod graph;
pub mod predicate;
pub mod unifier;
pub mod value;
pub mod var;

// Re-export primary types at crate root for convenience
pub use answer::Answer;
pub use concept::{Concept, RoleLabel, ThingId, TypeLabel};
pub use definition::{RoleBag, VariableDefinition};
pub use difference::SemanticDifference;
pub use error::{SubsumeError, SubsumeResult};
pub use graph::{GraphError, GraphQuery, InMemoryGraph};
pub use predicate::{ValueOperator, ValuePredicate};
pub use unifier::Unifier;
pub use value::Value;
pub use var::Var;
