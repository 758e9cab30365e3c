//! # Strategies
//!
//! A strategy is the decision unit bound to an entry. It answers two
//! separate questions for a request: does it grant, and does it deny. A
//! well-behaved strategy never answers yes to both for the same request.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A single (principal, action) pair evaluated against a securable,
/// together with caller context.
pub struct Request<'a, P, A, S> {
    /// The principal asking.
    pub principal: &'a P,
    /// The action requested.
    pub action: &'a A,
    /// The securable the action targets, if known.
    pub securable: Option<&'a S>,
    /// Caller context, e.g. transaction attributes.
    pub data: Option<&'a Value>,
}

impl<'a, P, A, S> Request<'a, P, A, S> {
    /// Create a request without securable or caller context.
    pub fn new(principal: &'a P, action: &'a A) -> Self {
        Self {
            principal,
            action,
            securable: None,
            data: None,
        }
    }
}

impl<P, A, S> Clone for Request<'_, P, A, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P, A, S> Copy for Request<'_, P, A, S> {}

/// Pluggable decision logic for an entry.
///
/// Implement this for attribute-based or algorithmic rules that consult the
/// request's `data`.
///
/// # Example
///
/// ```
/// use warden_acl::strategy::{AccessControlStrategy, Request};
///
/// /// Grants only during business hours, as reported by the caller.
/// struct BusinessHours;
///
/// impl AccessControlStrategy<String, String, u64> for BusinessHours {
///     fn grants(&self, request: &Request<'_, String, String, u64>) -> bool {
///         request
///             .data
///             .and_then(|d| d["hour"].as_u64())
///             .map(|h| (9..17).contains(&h))
///             .unwrap_or(false)
///     }
///
///     fn denies(&self, _request: &Request<'_, String, String, u64>) -> bool {
///         false
///     }
/// }
/// ```
pub trait AccessControlStrategy<P, A, S>: Send + Sync {
    /// Whether this strategy grants the request.
    fn grants(&self, request: &Request<'_, P, A, S>) -> bool;

    /// Whether this strategy denies the request.
    fn denies(&self, request: &Request<'_, P, A, S>) -> bool;
}

/// A strategy built from two closures.
pub struct FnStrategy<G, D> {
    grants: G,
    denies: D,
}

impl<G, D> FnStrategy<G, D> {
    /// Create from a grant predicate and a deny predicate.
    pub fn new(grants: G, denies: D) -> Self {
        Self { grants, denies }
    }
}

impl<P, A, S, G, D> AccessControlStrategy<P, A, S> for FnStrategy<G, D>
where
    G: Fn(&Request<'_, P, A, S>) -> bool + Send + Sync,
    D: Fn(&Request<'_, P, A, S>) -> bool + Send + Sync,
{
    fn grants(&self, request: &Request<'_, P, A, S>) -> bool {
        (self.grants)(request)
    }

    fn denies(&self, request: &Request<'_, P, A, S>) -> bool {
        (self.denies)(request)
    }
}

/// The strategy bound to an entry.
///
/// `Grant` and `Deny` are the static built-ins and compare by variant;
/// custom strategies compare by reference.
pub enum Strategy<P, A, S> {
    /// Always grants, never denies.
    Grant,
    /// Always denies, never grants.
    Deny,
    /// Caller-supplied decision logic.
    Custom(Arc<dyn AccessControlStrategy<P, A, S>>),
}

impl<P, A, S> Strategy<P, A, S> {
    /// Wrap a custom strategy.
    pub fn custom(strategy: impl AccessControlStrategy<P, A, S> + 'static) -> Self {
        Strategy::Custom(Arc::new(strategy))
    }

    /// Wrap a pair of closures as a custom strategy.
    pub fn from_fn<G, D>(grants: G, denies: D) -> Self
    where
        G: Fn(&Request<'_, P, A, S>) -> bool + Send + Sync + 'static,
        D: Fn(&Request<'_, P, A, S>) -> bool + Send + Sync + 'static,
        P: 'static,
        A: 'static,
        S: 'static,
    {
        Strategy::custom(FnStrategy::new(grants, denies))
    }

    /// Whether this strategy grants the request.
    pub fn grants(&self, request: &Request<'_, P, A, S>) -> bool {
        match self {
            Strategy::Grant => true,
            Strategy::Deny => false,
            Strategy::Custom(s) => s.grants(request),
        }
    }

    /// Whether this strategy denies the request.
    pub fn denies(&self, request: &Request<'_, P, A, S>) -> bool {
        match self {
            Strategy::Grant => false,
            Strategy::Deny => true,
            Strategy::Custom(s) => s.denies(request),
        }
    }

    /// Check if two strategies are the same strategy.
    pub fn is_same(&self, other: &Strategy<P, A, S>) -> bool {
        match (self, other) {
            (Strategy::Grant, Strategy::Grant) | (Strategy::Deny, Strategy::Deny) => true,
            (Strategy::Custom(a), Strategy::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Get a short name for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Grant => "grant",
            Strategy::Deny => "deny",
            Strategy::Custom(_) => "custom",
        }
    }
}

impl<P, A, S> Clone for Strategy<P, A, S> {
    fn clone(&self) -> Self {
        match self {
            Strategy::Grant => Strategy::Grant,
            Strategy::Deny => Strategy::Deny,
            Strategy::Custom(s) => Strategy::Custom(Arc::clone(s)),
        }
    }
}

impl<P, A, S> fmt::Debug for Strategy<P, A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Grant => f.write_str("Grant"),
            Strategy::Deny => f.write_str("Deny"),
            Strategy::Custom(s) => write!(f, "Custom({:p})", Arc::as_ptr(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    type S = Strategy<&'static str, &'static str, u32>;

    #[test]
    fn test_static_strategies() {
        let request = Request::new(&"felix", &"close");
        assert!(S::Grant.grants(&request));
        assert!(!S::Grant.denies(&request));
        assert!(S::Deny.denies(&request));
        assert!(!S::Deny.grants(&request));
    }

    #[test]
    fn test_custom_strategy_consults_data() {
        let even_days: S = Strategy::from_fn(
            |r| {
                r.data
                    .and_then(|d| d["dayOfMonth"].as_u64())
                    .map(|day| day % 2 == 0)
                    .unwrap_or(false)
            },
            |_| false,
        );

        let odd = json!({ "dayOfMonth": 1 });
        let even = json!({ "dayOfMonth": 2 });
        let mut request = Request::new(&"felix", &"close");

        request.data = Some(&odd);
        assert!(!even_days.grants(&request));
        request.data = Some(&even);
        assert!(even_days.grants(&request));
        assert!(!even_days.denies(&request));
        request.data = None;
        assert!(!even_days.grants(&request));
    }

    #[test]
    fn test_strategy_sameness() {
        let custom: S = Strategy::from_fn(|_| true, |_| false);
        let other: S = Strategy::from_fn(|_| true, |_| false);

        assert!(S::Grant.is_same(&S::Grant));
        assert!(!S::Grant.is_same(&S::Deny));
        assert!(custom.is_same(&custom.clone()));
        assert!(!custom.is_same(&other));
        assert!(!custom.is_same(&S::Grant));
    }

    #[test]
    fn test_debug_names() {
        assert_eq!(format!("{:?}", S::Grant), "Grant");
        assert_eq!(format!("{:?}", S::Deny), "Deny");
        assert_eq!(S::Deny.as_str(), "deny");
    }
}
