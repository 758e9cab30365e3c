//! Default policy table.
//!
//! Used when a repository is created without a table of its own: the
//! `Admin` role may call any method on any class, and nobody else is
//! granted anything.

use crate::config::{PolicyConfig, RowConfig};
use crate::error::PolicyResult;
use crate::rule::PolicyRow;

/// Role granted everything by the default table.
pub const ADMIN_ROLE: &str = "Admin";

/// The default table as configuration.
pub fn default_config() -> PolicyConfig {
    PolicyConfig {
        rows: vec![RowConfig {
            roles: format!("^{}$", ADMIN_ROLE),
            classes: "^.*$".to_string(),
            methods: "^.*$".to_string(),
            grant: true,
        }],
    }
}

/// Build the default table.
pub fn default_table() -> PolicyResult<Vec<PolicyRow>> {
    default_config().compile()
}
