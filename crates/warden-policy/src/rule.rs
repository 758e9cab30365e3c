//! # Policy rows
//!
//! A row matches a (role, class, method) triple with three regular
//! expressions and carries an outcome: a fixed decision, or a predicate
//! over the triple and caller context.

use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::error::{PolicyError, PolicyResult};

/// One (role, class, method) triple being evaluated.
#[derive(Debug, Clone, Copy)]
pub struct PolicyRequest<'a> {
    /// The role asking.
    pub role: &'a str,
    /// Type identifier of the target.
    pub class: &'a str,
    /// Method or action identifier.
    pub method: &'a str,
    /// Caller context.
    pub data: Option<&'a Value>,
}

/// A predicate deciding whether a row grants.
pub type PolicyPredicate = Arc<dyn Fn(&PolicyRequest<'_>) -> bool + Send + Sync>;

/// What a matching row decides.
#[derive(Clone)]
pub enum Outcome {
    /// Always grants (`true`) or always denies (`false`).
    Fixed(bool),
    /// Grants when the predicate holds; abstains otherwise.
    Predicate(PolicyPredicate),
}

impl Outcome {
    /// Decide a request.
    ///
    /// Returns `Some(true)` to grant, `Some(false)` to deny, and `None` when
    /// the row abstains and later rows should be consulted.
    pub fn decide(&self, request: &PolicyRequest<'_>) -> Option<bool> {
        match self {
            Outcome::Fixed(grant) => Some(*grant),
            Outcome::Predicate(predicate) => (predicate.as_ref())(request).then_some(true),
        }
    }
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Fixed(grant) => write!(f, "Fixed({})", grant),
            Outcome::Predicate(_) => f.write_str("Predicate"),
        }
    }
}

impl From<bool> for Outcome {
    fn from(grant: bool) -> Self {
        Outcome::Fixed(grant)
    }
}

/// A row of a policy table.
///
/// # Example
///
/// ```
/// use warden_policy::{PolicyRequest, PolicyRow};
///
/// let row = PolicyRow::allow("^Teller$", "^Account$", "^(deposit|withdraw)$").unwrap();
/// assert!(row.matches("Teller", "Account", "deposit"));
/// assert!(!row.matches("Teller", "Account", "close"));
///
/// let request = PolicyRequest { role: "Teller", class: "Account", method: "deposit", data: None };
/// assert_eq!(row.decide(&request), Some(true));
/// ```
#[derive(Debug, Clone)]
pub struct PolicyRow {
    roles: Regex,
    classes: Regex,
    methods: Regex,
    outcome: Outcome,
}

impl PolicyRow {
    /// Create a row from pattern strings.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::InvalidPattern`] if any pattern fails to compile.
    pub fn new(
        roles: &str,
        classes: &str,
        methods: &str,
        outcome: impl Into<Outcome>,
    ) -> PolicyResult<Self> {
        Ok(Self::from_regexes(
            compile("roles", roles)?,
            compile("classes", classes)?,
            compile("methods", methods)?,
            outcome,
        ))
    }

    /// Create a row from compiled patterns.
    pub fn from_regexes(
        roles: Regex,
        classes: Regex,
        methods: Regex,
        outcome: impl Into<Outcome>,
    ) -> Self {
        Self {
            roles,
            classes,
            methods,
            outcome: outcome.into(),
        }
    }

    /// A row that grants whatever it matches.
    pub fn allow(roles: &str, classes: &str, methods: &str) -> PolicyResult<Self> {
        Self::new(roles, classes, methods, true)
    }

    /// A row that denies whatever it matches.
    pub fn deny(roles: &str, classes: &str, methods: &str) -> PolicyResult<Self> {
        Self::new(roles, classes, methods, false)
    }

    /// A row that grants when `predicate` holds and abstains otherwise.
    pub fn when<F>(roles: &str, classes: &str, methods: &str, predicate: F) -> PolicyResult<Self>
    where
        F: Fn(&PolicyRequest<'_>) -> bool + Send + Sync + 'static,
    {
        Self::new(roles, classes, methods, Outcome::Predicate(Arc::new(predicate)))
    }

    /// Check if all three patterns match the triple.
    ///
    /// Patterns search anywhere in the value; anchor them with `^...$` to
    /// match whole identifiers.
    pub fn matches(&self, role: &str, class: &str, method: &str) -> bool {
        self.roles.is_match(role) && self.classes.is_match(class) && self.methods.is_match(method)
    }

    /// Decide a request this row matches. See [`Outcome::decide`].
    pub fn decide(&self, request: &PolicyRequest<'_>) -> Option<bool> {
        self.outcome.decide(request)
    }

    /// The outcome of this row.
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// The role pattern.
    pub fn roles(&self) -> &str {
        self.roles.as_str()
    }

    /// The class pattern.
    pub fn classes(&self) -> &str {
        self.classes.as_str()
    }

    /// The method pattern.
    pub fn methods(&self) -> &str {
        self.methods.as_str()
    }
}

fn compile(field: &'static str, pattern: &str) -> PolicyResult<Regex> {
    Regex::new(pattern).map_err(|source| PolicyError::InvalidPattern {
        field,
        pattern: pattern.to_string(),
        source,
    })
}
