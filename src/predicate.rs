//! Value predicates carried by variable definitions.
//!
//! A predicate pairs a comparison operator with an operand value and is
//! tested against the value of a bound attribute instance. Comparisons
//! run on the semantic (number-line) ordering; a comparison against an
//! incomparable kind never holds, `Neq` included, so a mismatched answer
//! is rejected rather than accepted by accident.

use std::collections::HashMap;
use std::fmt;
use std::sync::{OnceLock, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::{SubsumeError, SubsumeResult};
use crate::value::Value;

const REGEX_CACHE_MAX: usize = 1024;

static REGEX_CACHE: OnceLock<RwLock<HashMap<String, regex::Regex>>> = OnceLock::new();

/// Compiles `pattern` with full-string anchoring, caching the result.
///
/// `like` matches the whole attribute value, so `"a.*"` matches `"ab"`
/// but not `"xab"`.
fn cached_regex(pattern: &str) -> SubsumeResult<regex::Regex> {
    let cache = REGEX_CACHE.get_or_init(|| RwLock::new(HashMap::new()));

    {
        let guard = cache
            .read()
            .map_err(|_| SubsumeError::internal("regex cache lock poisoned"))?;
        if let Some(re) = guard.get(pattern) {
            return Ok(re.clone());
        }
    }

    let compiled =
        regex::Regex::new(&format!("^(?:{pattern})$")).map_err(|e| SubsumeError::InvalidPredicate {
            reason: format!("invalid regex '{pattern}': {e}"),
        })?;

    let mut guard = cache
        .write()
        .map_err(|_| SubsumeError::internal("regex cache lock poisoned"))?;

    if guard.len() >= REGEX_CACHE_MAX {
        // Keep the cache bounded to avoid unbounded memory usage.
        guard.clear();
    }

    // Another thread may have inserted it while we compiled.
    guard
        .entry(pattern.to_string())
        .or_insert_with(|| compiled.clone());
    Ok(compiled)
}

/// Comparison operator of a value predicate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ValueOperator {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    /// Substring containment; string operands only.
    Contains,
    /// Full-string regex match; string operands only.
    Like,
}

impl ValueOperator {
    /// Returns the operator's surface syntax.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Neq => "!=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Contains => "contains",
            Self::Like => "like",
        }
    }
}

impl fmt::Display for ValueOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A single value constraint, e.g. `> 40` or `like "c.*"`.
///
/// String-operand operators (`Contains`, `Like`) are validated at
/// construction; an invalid combination or an uncompilable pattern is
/// rejected up front rather than at evaluation time.
///
/// # Examples
///
/// ```
/// use subsume::{Value, ValueOperator, ValuePredicate};
///
/// let at_least_40 = ValuePredicate::new(ValueOperator::Gte, Value::Int(40))?;
/// assert!(at_least_40.holds_for(&Value::Int(41))?);
/// assert!(!at_least_40.holds_for(&Value::Float(39.5))?);
/// # Ok::<(), subsume::SubsumeError>(())
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ValuePredicate {
    operator: ValueOperator,
    operand: Value,
}

impl ValuePredicate {
    /// Creates a predicate, validating the operator/operand combination.
    pub fn new(operator: ValueOperator, operand: Value) -> SubsumeResult<Self> {
        match operator {
            ValueOperator::Contains | ValueOperator::Like => {
                let Some(pattern) = operand.as_string() else {
                    return Err(SubsumeError::InvalidPredicate {
                        reason: format!(
                            "operator '{operator}' requires a string operand, got {}",
                            operand.type_name()
                        ),
                    });
                };
                if operator == ValueOperator::Like {
                    // Compile once now; also warms the cache.
                    cached_regex(pattern)?;
                }
            }
            _ => {}
        }
        Ok(Self { operator, operand })
    }

    /// Creates an equality predicate.
    #[must_use]
    pub fn eq(operand: impl Into<Value>) -> Self {
        Self {
            operator: ValueOperator::Eq,
            operand: operand.into(),
        }
    }

    /// Creates an inequality predicate.
    #[must_use]
    pub fn neq(operand: impl Into<Value>) -> Self {
        Self {
            operator: ValueOperator::Neq,
            operand: operand.into(),
        }
    }

    /// Creates a `<` predicate.
    #[must_use]
    pub fn lt(operand: impl Into<Value>) -> Self {
        Self {
            operator: ValueOperator::Lt,
            operand: operand.into(),
        }
    }

    /// Creates a `<=` predicate.
    #[must_use]
    pub fn lte(operand: impl Into<Value>) -> Self {
        Self {
            operator: ValueOperator::Lte,
            operand: operand.into(),
        }
    }

    /// Creates a `>` predicate.
    #[must_use]
    pub fn gt(operand: impl Into<Value>) -> Self {
        Self {
            operator: ValueOperator::Gt,
            operand: operand.into(),
        }
    }

    /// Creates a `>=` predicate.
    #[must_use]
    pub fn gte(operand: impl Into<Value>) -> Self {
        Self {
            operator: ValueOperator::Gte,
            operand: operand.into(),
        }
    }

    /// Creates a substring-containment predicate.
    pub fn contains(needle: impl Into<String>) -> SubsumeResult<Self> {
        Self::new(ValueOperator::Contains, Value::String(needle.into()))
    }

    /// Creates a full-string regex predicate.
    pub fn like(pattern: impl Into<String>) -> SubsumeResult<Self> {
        Self::new(ValueOperator::Like, Value::String(pattern.into()))
    }

    /// Returns the operator.
    #[must_use]
    pub const fn operator(&self) -> ValueOperator {
        self.operator
    }

    /// Returns the comparison operand.
    #[must_use]
    pub const fn operand(&self) -> &Value {
        &self.operand
    }

    /// Tests the predicate against an attribute value.
    ///
    /// Kind mismatches yield `Ok(false)`, not an error: the caller is
    /// asking "does this cached value still qualify", and a value of the
    /// wrong kind simply does not.
    pub fn holds_for(&self, value: &Value) -> SubsumeResult<bool> {
        use std::cmp::Ordering;

        let outcome = match self.operator {
            ValueOperator::Eq => value.semantic_eq(&self.operand),
            ValueOperator::Neq => value
                .semantic_cmp(&self.operand)
                .map_or(false, |ord| ord != Ordering::Equal),
            ValueOperator::Lt => value
                .semantic_cmp(&self.operand)
                .map_or(false, |ord| ord == Ordering::Less),
            ValueOperator::Lte => value
                .semantic_cmp(&self.operand)
                .map_or(false, |ord| ord != Ordering::Greater),
            ValueOperator::Gt => value
                .semantic_cmp(&self.operand)
                .map_or(false, |ord| ord == Ordering::Greater),
            ValueOperator::Gte => value
                .semantic_cmp(&self.operand)
                .map_or(false, |ord| ord != Ordering::Less),
            ValueOperator::Contains => match (value.as_string(), self.operand.as_string()) {
                (Some(haystack), Some(needle)) => haystack.contains(needle),
                _ => false,
            },
            ValueOperator::Like => match (value.as_string(), self.operand.as_string()) {
                (Some(text), Some(pattern)) => cached_regex(pattern)?.is_match(text),
                _ => false,
            },
        };
        Ok(outcome)
    }
}

impl fmt::Display for ValuePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.operator, self.operand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eq_uses_semantic_equality() {
        let pred = ValuePredicate::eq(Value::Int(5));
        assert!(pred.holds_for(&Value::Int(5)).unwrap());
        assert!(pred.holds_for(&Value::Float(5.0)).unwrap());
        assert!(!pred.holds_for(&Value::Int(6)).unwrap());
    }

    #[test]
    fn test_neq_requires_comparable_kinds() {
        let pred = ValuePredicate::neq(Value::Int(5));
        assert!(pred.holds_for(&Value::Int(6)).unwrap());
        assert!(!pred.holds_for(&Value::Int(5)).unwrap());
        // Incomparable kinds never satisfy a comparison, != included.
        assert!(!pred.holds_for(&Value::String("5".into())).unwrap());
    }

    #[test]
    fn test_ordering_operators() {
        let gte = ValuePredicate::gte(Value::Int(40));
        assert!(gte.holds_for(&Value::Int(40)).unwrap());
        assert!(gte.holds_for(&Value::Float(40.5)).unwrap());
        assert!(!gte.holds_for(&Value::Int(39)).unwrap());

        let lt = ValuePredicate::lt(Value::Float(1.5));
        assert!(lt.holds_for(&Value::Int(1)).unwrap());
        assert!(!lt.holds_for(&Value::Float(1.5)).unwrap());

        let lte = ValuePredicate::lte(Value::Int(3));
        assert!(lte.holds_for(&Value::Int(3)).unwrap());
        assert!(!lte.holds_for(&Value::Int(4)).unwrap());

        let gt = ValuePredicate::gt(Value::Int(0));
        assert!(gt.holds_for(&Value::Float(0.1)).unwrap());
        assert!(!gt.holds_for(&Value::Int(0)).unwrap());
    }

    #[test]
    fn test_contains_is_substring() {
        let pred = ValuePredicate::contains("rak").unwrap();
        assert!(pred.holds_for(&Value::String("kraken".into())).unwrap());
        assert!(!pred.holds_for(&Value::String("Kraken".into())).unwrap());
        assert!(!pred.holds_for(&Value::Int(7)).unwrap());
    }

    #[test]
    fn test_like_matches_full_string() {
        let pred = ValuePredicate::like("c.*").unwrap();
        assert!(pred.holds_for(&Value::String("cat".into())).unwrap());
        assert!(!pred.holds_for(&Value::String("acat".into())).unwrap());
    }

    #[test]
    fn test_like_rejects_invalid_pattern_up_front() {
        let err = ValuePredicate::like("c(").unwrap_err();
        assert!(matches!(err, SubsumeError::InvalidPredicate { .. }));
    }

    #[test]
    fn test_contains_requires_string_operand() {
        let err = ValuePredicate::new(ValueOperator::Contains, Value::Int(5)).unwrap_err();
        assert!(matches!(err, SubsumeError::InvalidPredicate { .. }));
    }

    #[test]
    fn test_regex_cache_reuse() {
        // Same pattern evaluated twice goes through the cache.
        let pred = ValuePredicate::like("p[0-9]+").unwrap();
        assert!(pred.holds_for(&Value::String("p42".into())).unwrap());
        assert!(pred.holds_for(&Value::String("p7".into())).unwrap());
        assert!(!pred.holds_for(&Value::String("q7".into())).unwrap());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ValuePredicate::gte(Value::Int(40))), ">= 40");
        assert_eq!(
            format!("{}", ValuePredicate::like("a.*").unwrap()),
            "like \"a.*\""
        );
    }

    #[test]
    fn test_predicate_serialization() {
        let pred = ValuePredicate::gte(Value::Int(40));
        let json = serde_json::to_string(&pred).unwrap();
        let back: ValuePredicate = serde_json::from_str(&json).unwrap();
        assert_eq!(pred, back);
    }
}
