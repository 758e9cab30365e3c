//! # Access control entries
//!
//! An entry binds optional principal, action, and securable filters to one
//! strategy. Entries are immutable: lists add and remove them, never edit
//! them in place.

use std::fmt;

use crate::actions::ActionKind;
use crate::error::{AclError, AclResult};
use crate::sameness::Sameness;
use crate::strategy::{Request, Strategy};
use crate::target::Target;

/// A single access control rule.
///
/// # Example
///
/// ```
/// use warden_acl::{Ace, Target};
///
/// let ace: Ace<&str, &str, u64> = Ace::denying(Target::new("felix", "close"));
///
/// assert!(ace.denies(&"felix", &"close", None, None));
/// assert!(!ace.grants(&"felix", &"close", None, None));
/// // Filters that don't match leave the entry silent
/// assert!(!ace.denies(&"oscar", &"close", None, None));
/// ```
pub struct Ace<P, A, S> {
    target: Target<P, A, S>,
    strategy: Strategy<P, A, S>,
    sameness: Sameness<P, A, S>,
}

impl<P, A, S> Ace<P, A, S>
where
    P: PartialEq + 'static,
    A: PartialEq + 'static,
    S: PartialEq + 'static,
{
    /// An entry that grants whatever its target matches.
    pub fn granting(target: Target<P, A, S>) -> Self {
        Self::of(Strategy::Grant, target)
    }

    /// An entry that denies whatever its target matches.
    pub fn denying(target: Target<P, A, S>) -> Self {
        Self::of(Strategy::Deny, target)
    }

    /// An entry with the given strategy, compared with `==`.
    pub fn of(strategy: Strategy<P, A, S>, target: Target<P, A, S>) -> Self {
        Self::with_sameness(strategy, target, Sameness::default())
    }

    /// Start building an entry whose strategy may not be known yet.
    pub fn builder() -> AceBuilder<P, A, S> {
        AceBuilder::new(Sameness::default())
    }
}

impl<P, A, S> Ace<P, A, S> {
    /// An entry with the given strategy and comparison functions.
    pub fn with_sameness(
        strategy: Strategy<P, A, S>,
        target: Target<P, A, S>,
        sameness: Sameness<P, A, S>,
    ) -> Self {
        Self {
            target,
            strategy,
            sameness,
        }
    }

    /// The principal filter, if any.
    pub fn principal(&self) -> Option<&P> {
        self.target.principal.as_ref()
    }

    /// The action filter, if any.
    pub fn action(&self) -> Option<&A> {
        self.target.action.as_ref()
    }

    /// The securable filter, if any.
    pub fn securable(&self) -> Option<&S> {
        self.target.securable.as_ref()
    }

    /// The strategy of this entry.
    pub fn strategy(&self) -> &Strategy<P, A, S> {
        &self.strategy
    }

    /// The filters of this entry.
    pub fn target(&self) -> &Target<P, A, S> {
        &self.target
    }

    /// Check if the strategy is the given one (by variant, or by reference
    /// for custom strategies).
    pub fn has_strategy(&self, strategy: &Strategy<P, A, S>) -> bool {
        self.strategy.is_same(strategy)
    }

    /// Check if the principal filter is exactly the given one.
    ///
    /// `None` matches only an entry without a principal filter.
    pub fn has_principal(&self, principal: Option<&P>) -> bool {
        match (self.principal(), principal) {
            (None, None) => true,
            (Some(mine), Some(theirs)) => self.sameness.same_principal(mine, theirs),
            _ => false,
        }
    }

    /// Check if the securable filter is exactly the given one.
    pub fn has_securable(&self, securable: Option<&S>) -> bool {
        match (self.securable(), securable) {
            (None, None) => true,
            (Some(mine), Some(theirs)) => self.sameness.same_securable(mine, theirs),
            _ => false,
        }
    }

    /// Check if the action filter is exactly the given one.
    pub fn has_action(&self, action: Option<&A>) -> bool {
        match (self.action(), action) {
            (None, None) => true,
            (Some(mine), Some(theirs)) => self.sameness.same_action(mine, theirs),
            _ => false,
        }
    }
}

impl<P, A: ActionKind, S> Ace<P, A, S> {
    /// Check if this entry is about the given principal, action, and securable.
    ///
    /// Each axis matches when the entry has no filter for it or the filter
    /// is the same as the requested value. An action filter that is the
    /// wildcard action matches every action. A securable filter never
    /// matches a request that names no securable.
    pub fn applies(&self, principal: &P, action: &A, securable: Option<&S>) -> bool {
        let securable_matches = match (self.securable(), securable) {
            (None, _) => true,
            (Some(mine), Some(theirs)) => self.sameness.same_securable(mine, theirs),
            (Some(_), None) => false,
        };
        let action_matches = match self.action() {
            None => true,
            Some(mine) => mine.is_all() || self.sameness.same_action(mine, action),
        };
        let principal_matches = match self.principal() {
            None => true,
            Some(mine) => self.sameness.same_principal(mine, principal),
        };

        securable_matches && action_matches && principal_matches
    }

    /// Check if this entry grants the request.
    ///
    /// An entry never reports a grant while its own strategy denies the
    /// same request.
    pub fn grants(
        &self,
        principal: &P,
        action: &A,
        securable: Option<&S>,
        data: Option<&serde_json::Value>,
    ) -> bool {
        let request = Request {
            principal,
            action,
            securable,
            data,
        };
        self.grants_request(&request)
    }

    /// Check if this entry denies the request.
    pub fn denies(
        &self,
        principal: &P,
        action: &A,
        securable: Option<&S>,
        data: Option<&serde_json::Value>,
    ) -> bool {
        let request = Request {
            principal,
            action,
            securable,
            data,
        };
        self.denies_request(&request)
    }

    pub(crate) fn grants_request(&self, request: &Request<'_, P, A, S>) -> bool {
        self.applies(request.principal, request.action, request.securable)
            && !self.strategy.denies(request)
            && self.strategy.grants(request)
    }

    pub(crate) fn denies_request(&self, request: &Request<'_, P, A, S>) -> bool {
        self.applies(request.principal, request.action, request.securable)
            && self.strategy.denies(request)
    }
}

impl<P: Clone, A: Clone, S: Clone> Clone for Ace<P, A, S> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
            strategy: self.strategy.clone(),
            sameness: self.sameness.clone(),
        }
    }
}

impl<P: fmt::Debug, A: fmt::Debug, S: fmt::Debug> fmt::Debug for Ace<P, A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ace")
            .field("principal", &self.target.principal)
            .field("action", &self.target.action)
            .field("securable", &self.target.securable)
            .field("strategy", &self.strategy)
            .finish()
    }
}

/// Builder for entries assembled from optional parts.
///
/// The strategy is mandatory; [`AceBuilder::build`] fails with
/// [`AclError::MissingStrategy`] when it was never set, so no entry without
/// a strategy can exist.
pub struct AceBuilder<P, A, S> {
    target: Target<P, A, S>,
    strategy: Option<Strategy<P, A, S>>,
    sameness: Sameness<P, A, S>,
}

impl<P, A, S> AceBuilder<P, A, S> {
    /// Start a builder using the given comparison functions.
    pub fn new(sameness: Sameness<P, A, S>) -> Self {
        Self {
            target: Target::any(),
            strategy: None,
            sameness,
        }
    }

    /// Set the principal filter.
    pub fn principal(mut self, principal: impl Into<Option<P>>) -> Self {
        self.target.principal = principal.into();
        self
    }

    /// Set the action filter.
    pub fn action(mut self, action: impl Into<Option<A>>) -> Self {
        self.target.action = action.into();
        self
    }

    /// Set the securable filter.
    pub fn securable(mut self, securable: impl Into<Option<S>>) -> Self {
        self.target.securable = securable.into();
        self
    }

    /// Set the strategy.
    pub fn strategy(mut self, strategy: impl Into<Option<Strategy<P, A, S>>>) -> Self {
        self.strategy = strategy.into();
        self
    }

    /// Build the entry.
    ///
    /// # Errors
    ///
    /// Returns [`AclError::MissingStrategy`] if no strategy was set.
    pub fn build(self) -> AclResult<Ace<P, A, S>, P, A>
    where
        P: fmt::Debug,
        A: fmt::Debug,
    {
        let strategy = self.strategy.ok_or(AclError::MissingStrategy)?;
        Ok(Ace::with_sameness(strategy, self.target, self.sameness))
    }
}
