//! # Targets and queries
//!
//! A [`Target`] is what an entry is about: optional principal, action, and
//! securable filters, where an absent filter matches anything on that axis.
//! A [`Query`] is what a caller asks: one or more principals, one or more
//! actions, an optional securable, and caller context.

use serde_json::Value;
use std::fmt;
use std::slice;

use crate::strategy::Request;

/// The filters of an access control entry.
///
/// # Example
///
/// ```
/// use warden_acl::Target;
///
/// // Felix, any action, any securable
/// let target: Target<&str, &str, u64> = Target::any().principal("felix");
/// assert!(!target.is_wildcard());
/// assert!(target.action.is_none());
///
/// // Everyone may read document 7
/// let target: Target<&str, &str, u64> = Target::any().action("read").securable(7);
/// assert!(target.principal.is_none());
/// ```
pub struct Target<P, A, S> {
    /// Principal filter. `None` matches every principal.
    pub principal: Option<P>,
    /// Action filter. `None` matches every action.
    pub action: Option<A>,
    /// Securable filter. `None` matches every securable.
    pub securable: Option<S>,
}

impl<P, A, S> Target<P, A, S> {
    /// A target with no filters, matching everything.
    pub fn any() -> Self {
        Self {
            principal: None,
            action: None,
            securable: None,
        }
    }

    /// A target for one principal and one action.
    pub fn new(principal: P, action: A) -> Self {
        Self::any().principal(principal).action(action)
    }

    /// Restrict to a principal.
    pub fn principal(mut self, principal: P) -> Self {
        self.principal = Some(principal);
        self
    }

    /// Restrict to an action.
    pub fn action(mut self, action: A) -> Self {
        self.action = Some(action);
        self
    }

    /// Restrict to a securable.
    pub fn securable(mut self, securable: S) -> Self {
        self.securable = Some(securable);
        self
    }

    /// Check if this target has no filters at all.
    pub fn is_wildcard(&self) -> bool {
        self.principal.is_none() && self.action.is_none() && self.securable.is_none()
    }
}

impl<P, A, S> Default for Target<P, A, S> {
    fn default() -> Self {
        Self::any()
    }
}

impl<P: Clone, A: Clone, S: Clone> Clone for Target<P, A, S> {
    fn clone(&self) -> Self {
        Self {
            principal: self.principal.clone(),
            action: self.action.clone(),
            securable: self.securable.clone(),
        }
    }
}

impl<P: fmt::Debug, A: fmt::Debug, S: fmt::Debug> fmt::Debug for Target<P, A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("principal", &self.principal)
            .field("action", &self.action)
            .field("securable", &self.securable)
            .finish()
    }
}

/// A read-only access question.
///
/// Principals and actions are always sequences; the scalar constructor
/// wraps single values as one-element slices without copying them.
///
/// # Example
///
/// ```
/// use warden_acl::Query;
///
/// let principals = ["felix", "oscar"];
/// let actions = ["read", "update"];
/// let query: Query<'_, &str, &str, u64> = Query::of(&principals, &actions).on(&42);
/// assert_eq!(query.pairs().count(), 4);
///
/// let single: Query<'_, &str, &str, u64> = Query::new(&"felix", &"read");
/// assert_eq!(single.principals.len(), 1);
/// ```
pub struct Query<'a, P, A, S> {
    /// Principals asking; any one of them may satisfy a grant.
    pub principals: &'a [P],
    /// Actions requested; every one of them must be granted.
    pub actions: &'a [A],
    /// The securable targeted, if known.
    pub securable: Option<&'a S>,
    /// Caller context.
    pub data: Option<&'a Value>,
}

impl<'a, P, A, S> Query<'a, P, A, S> {
    /// Ask about a single principal and a single action.
    pub fn new(principal: &'a P, action: &'a A) -> Self {
        Self::of(slice::from_ref(principal), slice::from_ref(action))
    }

    /// Ask about several principals and several actions.
    pub fn of(principals: &'a [P], actions: &'a [A]) -> Self {
        Self {
            principals,
            actions,
            securable: None,
            data: None,
        }
    }

    /// Target a securable.
    pub fn on(mut self, securable: &'a S) -> Self {
        self.securable = Some(securable);
        self
    }

    /// Attach caller context.
    pub fn with_data(mut self, data: &'a Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Every (principal, action) pair of the request.
    pub fn pairs(&self) -> impl Iterator<Item = (&'a P, &'a A)> + 'a {
        let actions = self.actions;
        self.principals
            .iter()
            .flat_map(move |p| actions.iter().map(move |a| (p, a)))
    }

    /// The strategy-level request for one pair.
    pub fn request(&self, principal: &'a P, action: &'a A) -> Request<'a, P, A, S> {
        Request {
            principal,
            action,
            securable: self.securable,
            data: self.data,
        }
    }
}

impl<P, A, S> Clone for Query<'_, P, A, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P, A, S> Copy for Query<'_, P, A, S> {}
