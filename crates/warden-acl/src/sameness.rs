//! # Sameness
//!
//! Principals, actions, and securables are opaque to this crate. Whether an
//! entry's filter matches a requested value is decided by an injectable
//! comparison function per axis, never by assuming a primitive type.

use std::fmt;
use std::sync::Arc;

/// A comparison deciding whether two values denote the same thing.
pub type SamenessFn<T> = Arc<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// The comparison functions used for the principal, action, and securable
/// axes of an entry.
///
/// The default compares with `==`. Types whose identity differs from their
/// structural equality supply their own test, for example by comparing ids,
/// or by pointer for shared handles (see [`same_arc`]).
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use warden_acl::sameness::{same_arc, Sameness};
///
/// struct User { name: String }
///
/// let sameness: Sameness<Arc<User>, &str, u64> =
///     Sameness::new(same_arc, |a: &&str, b: &&str| a == b, |a: &u64, b: &u64| a == b);
///
/// let alice = Arc::new(User { name: "alice".into() });
/// let impostor = Arc::new(User { name: "alice".into() });
/// assert!(sameness.same_principal(&alice, &alice.clone()));
/// assert!(!sameness.same_principal(&alice, &impostor));
/// ```
pub struct Sameness<P, A, S> {
    principal: SamenessFn<P>,
    action: SamenessFn<A>,
    securable: SamenessFn<S>,
}

impl<P, A, S> Sameness<P, A, S> {
    /// Create from one comparison function per axis.
    pub fn new(
        principal: impl Fn(&P, &P) -> bool + Send + Sync + 'static,
        action: impl Fn(&A, &A) -> bool + Send + Sync + 'static,
        securable: impl Fn(&S, &S) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            principal: Arc::new(principal),
            action: Arc::new(action),
            securable: Arc::new(securable),
        }
    }

    /// Replace the principal comparison, keeping the others.
    pub fn with_principal(mut self, f: impl Fn(&P, &P) -> bool + Send + Sync + 'static) -> Self {
        self.principal = Arc::new(f);
        self
    }

    /// Replace the action comparison, keeping the others.
    pub fn with_action(mut self, f: impl Fn(&A, &A) -> bool + Send + Sync + 'static) -> Self {
        self.action = Arc::new(f);
        self
    }

    /// Replace the securable comparison, keeping the others.
    pub fn with_securable(mut self, f: impl Fn(&S, &S) -> bool + Send + Sync + 'static) -> Self {
        self.securable = Arc::new(f);
        self
    }

    /// Check if two principals are the same.
    pub fn same_principal(&self, a: &P, b: &P) -> bool {
        (self.principal)(a, b)
    }

    /// Check if two actions are the same.
    pub fn same_action(&self, a: &A, b: &A) -> bool {
        (self.action)(a, b)
    }

    /// Check if two securables are the same.
    pub fn same_securable(&self, a: &S, b: &S) -> bool {
        (self.securable)(a, b)
    }
}

impl<P, A, S> Clone for Sameness<P, A, S> {
    fn clone(&self) -> Self {
        Self {
            principal: Arc::clone(&self.principal),
            action: Arc::clone(&self.action),
            securable: Arc::clone(&self.securable),
        }
    }
}

impl<P, A, S> Default for Sameness<P, A, S>
where
    P: PartialEq + 'static,
    A: PartialEq + 'static,
    S: PartialEq + 'static,
{
    fn default() -> Self {
        Self::new(|a: &P, b: &P| a == b, |a: &A, b: &A| a == b, |a: &S, b: &S| a == b)
    }
}

impl<P, A, S> fmt::Debug for Sameness<P, A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sameness").finish_non_exhaustive()
    }
}

/// Identity comparison for shared handles: same allocation, not equal contents.
pub fn same_arc<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
    Arc::ptr_eq(a, b)
}
