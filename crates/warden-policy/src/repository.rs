//! # Policy repository
//!
//! Evaluates an ordered table of [`PolicyRow`]s.
//!
//! For a single role, rows whose three patterns all match are consulted in
//! table order and the first row that decides wins: row order lets a
//! narrow deny exception sit in front of a coarse allow-all row.
//!
//! For several roles, each role is evaluated on its own:
//!
//! - the query is denied if any role is denied
//! - otherwise it is granted if at least one role is granted
//!
//! A query nobody decides is neither granted nor denied.

use serde_json::Value;
use std::slice;
use tracing::debug;

use crate::config::PolicyConfig;
use crate::defaults::default_table;
use crate::error::PolicyResult;
use crate::rule::{PolicyRequest, PolicyRow};

/// A read request against a policy table.
#[derive(Debug, Clone, Copy)]
pub struct PolicyQuery<'a, R: AsRef<str> = &'a str> {
    /// Roles held by the caller.
    pub roles: &'a [R],
    /// Type identifier of the target.
    pub class: &'a str,
    /// Method or action identifier.
    pub method: &'a str,
    /// Caller context.
    pub data: Option<&'a Value>,
}

impl<'a, R: AsRef<str>> PolicyQuery<'a, R> {
    /// Query on behalf of several roles.
    pub fn new(roles: &'a [R], class: &'a str, method: &'a str) -> Self {
        Self {
            roles,
            class,
            method,
            data: None,
        }
    }

    /// Query on behalf of a single role.
    pub fn role(role: &'a R, class: &'a str, method: &'a str) -> Self {
        Self::new(slice::from_ref(role), class, method)
    }

    /// Attach caller context handed to predicate rows.
    pub fn with_data(mut self, data: &'a Value) -> Self {
        self.data = Some(data);
        self
    }

    fn request(&self, role: &'a str) -> PolicyRequest<'a> {
        PolicyRequest {
            role,
            class: self.class,
            method: self.method,
            data: self.data,
        }
    }
}

/// An ordered policy table.
///
/// # Example
///
/// ```
/// use warden_policy::{PolicyQuery, PolicyRepository, PolicyRow};
///
/// let repository = PolicyRepository::from_rows(vec![
///     PolicyRow::deny("^Dummy$", ".*", ".*").unwrap(),
///     PolicyRow::allow("^Teller$", "^Foo$", "^bar$").unwrap(),
/// ]);
///
/// let roles = ["Teller", "Manager"];
/// assert!(repository.grants(&PolicyQuery::new(&roles, "Foo", "bar")));
///
/// let roles = ["Teller", "Dummy"];
/// assert!(!repository.grants(&PolicyQuery::new(&roles, "Foo", "bar")));
/// assert!(repository.denies(&PolicyQuery::new(&roles, "Foo", "bar")));
/// ```
#[derive(Debug, Clone)]
pub struct PolicyRepository {
    rows: Vec<PolicyRow>,
}

impl PolicyRepository {
    /// Create a repository, falling back to the default table when no
    /// table is given.
    pub fn new(table: Option<Vec<PolicyRow>>) -> PolicyResult<Self> {
        let rows = match table {
            Some(rows) => rows,
            None => default_table()?,
        };
        Ok(Self::from_rows(rows))
    }

    /// Create a repository from an ordered table.
    pub fn from_rows(rows: Vec<PolicyRow>) -> Self {
        debug!(rows = rows.len(), "Policy table loaded");
        Self { rows }
    }

    /// Create a repository from configuration.
    pub fn from_config(config: &PolicyConfig) -> PolicyResult<Self> {
        Ok(Self::from_rows(config.compile()?))
    }

    /// Create a repository from a JSON table.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::InvalidConfig`](crate::PolicyError::InvalidConfig)
    /// for malformed JSON and
    /// [`PolicyError::InvalidPattern`](crate::PolicyError::InvalidPattern) for
    /// a pattern that does not compile.
    pub fn from_json(json: &str) -> PolicyResult<Self> {
        Self::from_config(&PolicyConfig::from_json(json)?)
    }

    /// A copy of the table.
    pub fn rows(&self) -> Vec<PolicyRow> {
        self.rows.clone()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check if the query is granted.
    pub fn grants<R: AsRef<str>>(&self, query: &PolicyQuery<'_, R>) -> bool {
        let mut granted = false;
        for role in query.roles {
            match self.decide(&query.request(role.as_ref())) {
                Some(false) => {
                    debug!(
                        role = role.as_ref(),
                        class = query.class,
                        method = query.method,
                        "Policy denies role"
                    );
                    return false;
                }
                Some(true) => granted = true,
                None => {}
            }
        }
        debug!(class = query.class, method = query.method, granted, "Policy decision");
        granted
    }

    /// Check if the query is denied.
    pub fn denies<R: AsRef<str>>(&self, query: &PolicyQuery<'_, R>) -> bool {
        query
            .roles
            .iter()
            .any(|role| self.decide(&query.request(role.as_ref())) == Some(false))
    }

    /// First decision of a matching row for one role, in table order.
    fn decide(&self, request: &PolicyRequest<'_>) -> Option<bool> {
        self.rows
            .iter()
            .filter(|row| row.matches(request.role, request.class, request.method))
            .find_map(|row| row.decide(request))
    }
}
