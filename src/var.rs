//! Query-variable names.
//!
//! A [`Var`] names a slot in a query. Answers bind variables to concepts,
//! unifiers rename them, and the semantic difference constrains them.
//! Variables are ordered so that substitutions and definition sets iterate
//! deterministically.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque query-variable name.
///
/// # Examples
///
/// ```
/// use subsume::Var;
///
/// let x = Var::named("x");
/// assert_eq!(x.as_str(), "x");
/// assert_eq!(format!("{x}"), "$x");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Var(String);

impl Var {
    /// Creates a variable with the given name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the variable name without the display sigil.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

impl From<&str> for Var {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<String> for Var {
    fn from(name: String) -> Self {
        Self(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_display_uses_sigil() {
        let v = Var::named("employee");
        assert_eq!(format!("{v}"), "$employee");
        assert_eq!(v.as_str(), "employee");
    }

    #[test]
    fn test_var_ordering_is_lexicographic() {
        let a = Var::named("a");
        let b = Var::named("b");
        assert!(a < b);
    }

    #[test]
    fn test_var_from_conversions() {
        let _: Var = "x".into();
        let _: Var = String::from("x").into();
        assert_eq!(Var::from("x"), Var::named("x"));
    }

    #[test]
    fn test_var_serde_is_transparent() {
        let v = Var::named("x");
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "\"x\"");
        let back: Var = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }
}
