//! Policy table configuration.
//!
//! Tables are configuration, not code: a table of fixed allow/deny rows can
//! be written as JSON and loaded at startup. Predicate rows can only be
//! built in code.

use serde::{Deserialize, Serialize};

use crate::error::PolicyResult;
use crate::rule::PolicyRow;

/// One row of a policy table as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowConfig {
    /// Role pattern.
    pub roles: String,
    /// Class pattern.
    #[serde(default = "match_all")]
    pub classes: String,
    /// Method pattern.
    #[serde(default = "match_all")]
    pub methods: String,
    /// `true` grants, `false` denies.
    pub grant: bool,
}

/// A policy table as written in configuration.
///
/// # Example
///
/// ```
/// use warden_policy::PolicyConfig;
///
/// let config: PolicyConfig = serde_json::from_str(r#"{
///     "rows": [
///         { "roles": "^Dummy$", "grant": false },
///         { "roles": "^Teller$", "classes": "^Foo$", "methods": "^bar$", "grant": true }
///     ]
/// }"#).unwrap();
///
/// assert_eq!(config.rows.len(), 2);
/// assert_eq!(config.rows[0].classes, ".*");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Rows in evaluation order.
    #[serde(default)]
    pub rows: Vec<RowConfig>,
}

impl RowConfig {
    /// Compile into a policy row.
    pub fn compile(&self) -> PolicyResult<PolicyRow> {
        PolicyRow::new(&self.roles, &self.classes, &self.methods, self.grant)
    }
}

impl PolicyConfig {
    /// Parse a table from JSON.
    pub fn from_json(json: &str) -> PolicyResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Compile every row, in order.
    ///
    /// # Errors
    ///
    /// Fails on the first row with an invalid pattern.
    pub fn compile(&self) -> PolicyResult<Vec<PolicyRow>> {
        self.rows.iter().map(RowConfig::compile).collect()
    }
}

fn match_all() -> String {
    ".*".to_string()
}
