//! # Actions
//!
//! Defines the action types that can be requested against a securable.
//! Any type can serve as an action as long as it names the distinguished
//! SECURE action that guards changes to an object's own rules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An operation category that can be granted or denied.
///
/// Implementors name the SECURE action, which the securable capability
/// checks before accepting changes to an object's rules, and may name an
/// "all actions" wildcard.
///
/// # Example
///
/// ```
/// use warden_acl::actions::{ActionKind, PrimitiveAction};
///
/// assert_eq!(PrimitiveAction::secure(), PrimitiveAction::Secure);
/// assert!(PrimitiveAction::All.is_all());
/// assert_eq!(<&str as ActionKind>::secure(), "secure");
/// ```
pub trait ActionKind: Clone + fmt::Debug {
    /// The action required to change the rules of a securable.
    fn secure() -> Self;

    /// Whether this action stands for every action.
    ///
    /// An entry filtered on the wildcard applies to any requested action.
    fn is_all(&self) -> bool {
        false
    }
}

impl ActionKind for String {
    fn secure() -> Self {
        "secure".to_string()
    }

    fn is_all(&self) -> bool {
        self == "*"
    }
}

impl ActionKind for &'static str {
    fn secure() -> Self {
        "secure"
    }

    fn is_all(&self) -> bool {
        *self == "*"
    }
}

/// Primitive actions that can be performed on securables.
///
/// - **Create**: Create new instances of a type
/// - **Reference**: Refer to a type or instance from elsewhere
/// - **Read**: View instance data
/// - **Update**: Modify instance data
/// - **Delete**: Remove an instance
/// - **Secure**: Change the rules guarding an instance
/// - **All**: Wildcard standing for every action
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveAction {
    /// Create new instances.
    Create,

    /// Reference from another object.
    Reference,

    /// Read/view an instance.
    Read,

    /// Update an existing instance.
    Update,

    /// Delete an instance.
    Delete,

    /// Change the rules guarding an instance.
    ///
    /// Holding this grant is what allows a principal to grant, deny,
    /// ungrant, or undeny anything else on the same securable.
    Secure,

    /// Every action.
    All,
}

impl PrimitiveAction {
    /// Get the string representation of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveAction::Create => "create",
            PrimitiveAction::Reference => "reference",
            PrimitiveAction::Read => "read",
            PrimitiveAction::Update => "update",
            PrimitiveAction::Delete => "delete",
            PrimitiveAction::Secure => "secure",
            PrimitiveAction::All => "all",
        }
    }

    /// Parse action from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive, supports aliases)
    ///
    /// # Example
    ///
    /// ```
    /// use warden_acl::actions::PrimitiveAction;
    ///
    /// assert_eq!(PrimitiveAction::parse("READ"), Some(PrimitiveAction::Read));
    /// assert_eq!(PrimitiveAction::parse("*"), Some(PrimitiveAction::All));
    /// assert_eq!(PrimitiveAction::parse("invalid"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "create" | "new" => Some(PrimitiveAction::Create),
            "reference" | "ref" => Some(PrimitiveAction::Reference),
            "read" | "view" | "get" => Some(PrimitiveAction::Read),
            "update" | "write" | "edit" => Some(PrimitiveAction::Update),
            "delete" | "remove" => Some(PrimitiveAction::Delete),
            "secure" => Some(PrimitiveAction::Secure),
            "all" | "*" => Some(PrimitiveAction::All),
            _ => None,
        }
    }

    /// Get all actions, the wildcard last.
    pub fn all() -> Vec<Self> {
        vec![
            PrimitiveAction::Create,
            PrimitiveAction::Reference,
            PrimitiveAction::Read,
            PrimitiveAction::Update,
            PrimitiveAction::Delete,
            PrimitiveAction::Secure,
            PrimitiveAction::All,
        ]
    }

    /// Actions taken against a type rather than one of its instances.
    pub fn static_actions() -> Vec<Self> {
        vec![PrimitiveAction::Create, PrimitiveAction::Reference]
    }

    /// Actions taken against an existing instance.
    pub fn instance_actions() -> Vec<Self> {
        vec![
            PrimitiveAction::Read,
            PrimitiveAction::Update,
            PrimitiveAction::Delete,
            PrimitiveAction::Secure,
        ]
    }

    /// Check if this action is taken against an instance.
    pub fn is_instance_action(&self) -> bool {
        matches!(
            self,
            PrimitiveAction::Read
                | PrimitiveAction::Update
                | PrimitiveAction::Delete
                | PrimitiveAction::Secure
        )
    }
}

impl ActionKind for PrimitiveAction {
    fn secure() -> Self {
        PrimitiveAction::Secure
    }

    fn is_all(&self) -> bool {
        matches!(self, PrimitiveAction::All)
    }
}

impl fmt::Display for PrimitiveAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
