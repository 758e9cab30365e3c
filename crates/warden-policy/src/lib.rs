//! # Warden Policy
//!
//! This crate provides declarative, table-driven authorization: an ordered
//! table of rows, each matching a role, a class and a method by regular
//! expression, and deciding to grant or deny.
//!
//! ## Overview
//!
//! The warden-policy crate handles:
//! - **Rows**: Three patterns and an outcome (fixed, or a predicate over the request)
//! - **Repository**: Ordered evaluation with first-match-wins per role
//! - **Configuration**: Tables written as JSON and compiled at load time
//! - **Defaults**: A table granting the `Admin` role everything
//!
//! ## Combination
//!
//! ```text
//! one role:    first matching row that decides wins
//! many roles:  any role denied  -> denied
//!              else any granted -> granted
//!              else             -> neither
//! ```
//!
//! Row order matters here, unlike per-object lists in `warden-acl` where a
//! denial anywhere wins.
//!
//! ## Usage
//!
//! ```rust
//! use warden_policy::{PolicyQuery, PolicyRepository};
//!
//! let repository = PolicyRepository::from_json(r#"{
//!     "rows": [
//!         { "roles": "^Teller$", "classes": "^Account$", "methods": "^close$", "grant": false },
//!         { "roles": "^Teller$", "classes": "^Account$", "grant": true }
//!     ]
//! }"#).unwrap();
//!
//! assert!(repository.grants(&PolicyQuery::role(&"Teller", "Account", "deposit")));
//! assert!(repository.denies(&PolicyQuery::role(&"Teller", "Account", "close")));
//! ```

pub mod config;
pub mod defaults;
pub mod error;
pub mod repository;
pub mod rule;

pub use config::{PolicyConfig, RowConfig};
pub use defaults::{default_config, default_table, ADMIN_ROLE};
pub use error::{PolicyError, PolicyResult};
pub use repository::{PolicyQuery, PolicyRepository};
pub use rule::{Outcome, PolicyPredicate, PolicyRequest, PolicyRow};
