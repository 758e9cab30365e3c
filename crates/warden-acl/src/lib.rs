//! # Warden ACL
//!
//! This crate provides per-object access control: rules about what
//! principals may do to a securable object, combined with deny-overrides,
//! and a capability that lets any domain type secure itself.
//!
//! ## Overview
//!
//! The warden-acl crate handles:
//! - **Strategies**: Pluggable grant/deny decision units
//! - **Entries**: One rule binding optional principal/action/securable filters to a strategy
//! - **Lists**: Ordered entries for one securable, with idempotent mutation
//! - **Securables**: Objects that lazily create their list and gate changes to it
//!
//! ## Architecture
//!
//! ```text
//! securable.grants(principals, actions)
//!   └─ Acl::grants(query on securable)
//!        └─ each applicable Ace
//!             └─ Strategy::grants / Strategy::denies
//! ```
//!
//! ## Combination
//!
//! - Any applicable denial of any requested (principal, action) pair wins,
//!   independent of entry order.
//! - Otherwise every requested action must be granted to at least one of
//!   the requested principals.
//! - An action nobody decides is resolved by [`AclConfig`] (closed by default).
//! - A query with no actions is granted and not denied.
//!
//! ## Usage
//!
//! ```rust
//! use warden_acl::{Acl, Query, Target};
//!
//! let mut acl: Acl<&str, &str, u64> = Acl::new();
//! acl.grant(Target::any().action("read"))
//!     .deny(Target::new("mallory", "read"));
//!
//! assert!(acl.grants(&Query::new(&"alice", &"read")));
//! assert!(!acl.grants(&Query::new(&"mallory", &"read")));
//!
//! // One denied principal among several denies the whole query
//! let principals = ["alice", "mallory"];
//! assert!(!acl.grants(&Query::of(&principals, &["read"])));
//! ```
//!
//! ## Concurrency
//!
//! Evaluation is synchronous and side-effect free, so lists may be read
//! from many threads at once. Writers must be excluded by the embedding
//! application; this crate does no locking.

pub mod ace;
pub mod acl;
pub mod actions;
pub mod config;
pub mod error;
pub mod sameness;
pub mod securable;
pub mod strategy;
pub mod target;

// Re-export main types for convenience
pub use ace::{Ace, AceBuilder};
pub use acl::Acl;
pub use actions::{ActionKind, PrimitiveAction};
pub use config::AclConfig;
pub use error::{AclError, AclResult, AuthorizationError};
pub use sameness::Sameness;
pub use securable::{Change, Securable, Security};
pub use strategy::{AccessControlStrategy, FnStrategy, Request, Strategy};
pub use target::{Query, Target};
