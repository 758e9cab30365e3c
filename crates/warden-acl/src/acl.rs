//! # Access control lists
//!
//! An ordered set of entries for one securable, combined with
//! deny-overrides:
//!
//! 1. Entries applicable to any (principal, action) pair of the query are
//!    selected.
//! 2. If any applicable entry denies any pair, the query is not granted,
//!    whatever else the list says and in whatever order.
//! 3. Otherwise every requested action must be granted by some applicable
//!    entry for some requested principal.
//!
//! A query with no actions imposes no obligations: it is granted and not
//! denied.

use std::fmt;
use tracing::{debug, trace};

use crate::ace::Ace;
use crate::actions::ActionKind;
use crate::config::AclConfig;
use crate::sameness::Sameness;
use crate::strategy::Strategy;
use crate::target::{Query, Target};

/// An access control list.
///
/// Mutations are idempotent: adding an entry identical to an existing one
/// does nothing, and removing an entry that isn't there does nothing.
///
/// # Example
///
/// ```
/// use warden_acl::{Acl, Query, Target};
///
/// let mut acl: Acl<&str, &str, u64> = Acl::new();
/// acl.deny(Target::new("felix", "close"))
///     .grant(Target::new("felix", "close"))
///     .grant(Target::new("felix", "open"));
///
/// // Deny overrides the later grant
/// assert!(!acl.grants(&Query::new(&"felix", &"close")));
/// assert!(acl.denies(&Query::new(&"felix", &"close")));
/// assert!(acl.grants(&Query::new(&"felix", &"open")));
/// ```
pub struct Acl<P, A, S> {
    entries: Vec<Ace<P, A, S>>,
    sameness: Sameness<P, A, S>,
    config: AclConfig,
}

impl<P, A, S> Acl<P, A, S>
where
    P: PartialEq + 'static,
    A: PartialEq + 'static,
    S: PartialEq + 'static,
{
    /// Create an empty list comparing with `==`.
    pub fn new() -> Self {
        Self::with_sameness(Sameness::default())
    }
}

impl<P, A, S> Default for Acl<P, A, S>
where
    P: PartialEq + 'static,
    A: PartialEq + 'static,
    S: PartialEq + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<P, A, S> Acl<P, A, S> {
    /// Create an empty list using the given comparison functions.
    ///
    /// Every entry the list creates shares them.
    pub fn with_sameness(sameness: Sameness<P, A, S>) -> Self {
        Self {
            entries: Vec::new(),
            sameness,
            config: AclConfig::default(),
        }
    }

    /// Use the given evaluation configuration.
    pub fn with_config(mut self, config: AclConfig) -> Self {
        self.config = config;
        self
    }

    /// The evaluation configuration.
    pub fn config(&self) -> &AclConfig {
        &self.config
    }

    /// The comparison functions shared by this list's entries.
    pub fn sameness(&self) -> &Sameness<P, A, S> {
        &self.sameness
    }

    /// Get a copy of the entries, in insertion order.
    pub fn entries(&self) -> Vec<Ace<P, A, S>>
    where
        P: Clone,
        A: Clone,
        S: Clone,
    {
        self.entries.clone()
    }

    /// Get the count of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add an entry binding `strategy` to `target`, unless an entry with
    /// exactly the same strategy and filters already exists.
    pub fn secure(&mut self, strategy: Strategy<P, A, S>, target: Target<P, A, S>) -> &mut Self {
        if self.position(&strategy, &target, true).is_some() {
            trace!(strategy = strategy.as_str(), "Entry already present");
            return self;
        }

        trace!(strategy = strategy.as_str(), entries = self.entries.len() + 1, "Adding entry");
        self.entries
            .push(Ace::with_sameness(strategy, target, self.sameness.clone()));
        self
    }

    /// Remove the first entry binding `strategy` to `target`.
    ///
    /// Principal and action filters must match exactly. An absent securable
    /// in `target` matches an entry with any securable filter.
    pub fn unsecure(&mut self, strategy: &Strategy<P, A, S>, target: &Target<P, A, S>) -> &mut Self {
        match self.position(strategy, target, target.securable.is_some()) {
            Some(index) => {
                trace!(strategy = strategy.as_str(), "Removing entry");
                self.entries.remove(index);
            }
            None => trace!(strategy = strategy.as_str(), "No entry to remove"),
        }
        self
    }

    /// Add a granting entry.
    pub fn grant(&mut self, target: Target<P, A, S>) -> &mut Self {
        self.secure(Strategy::Grant, target)
    }

    /// Remove a granting entry.
    pub fn ungrant(&mut self, target: &Target<P, A, S>) -> &mut Self {
        self.unsecure(&Strategy::Grant, target)
    }

    /// Add a denying entry.
    pub fn deny(&mut self, target: Target<P, A, S>) -> &mut Self {
        self.secure(Strategy::Deny, target)
    }

    /// Remove a denying entry.
    pub fn undeny(&mut self, target: &Target<P, A, S>) -> &mut Self {
        self.unsecure(&Strategy::Deny, target)
    }

    fn position(
        &self,
        strategy: &Strategy<P, A, S>,
        target: &Target<P, A, S>,
        match_securable: bool,
    ) -> Option<usize> {
        self.entries.iter().position(|ace| {
            ace.has_strategy(strategy)
                && ace.has_principal(target.principal.as_ref())
                && ace.has_action(target.action.as_ref())
                && (!match_securable || ace.has_securable(target.securable.as_ref()))
        })
    }
}

impl<P, A: ActionKind, S> Acl<P, A, S> {
    /// Determine whether the query is granted.
    ///
    /// Every requested action must be granted to at least one requested
    /// principal, and no applicable entry may deny any requested pair. A
    /// query naming no principals is never granted, even when abstention
    /// grants.
    pub fn grants(&self, query: &Query<'_, P, A, S>) -> bool {
        self.grants_with(query, self.config.grant_on_abstention)
    }

    /// Evaluate the query with an explicit abstention outcome, ignoring
    /// this list's configuration.
    pub(crate) fn grants_with(&self, query: &Query<'_, P, A, S>, grant_on_abstention: bool) -> bool {
        if query.actions.is_empty() {
            debug!("No actions requested, granting vacuously");
            return true;
        }
        if query.principals.is_empty() {
            debug!("No principals requested, not granting");
            return false;
        }

        let applicable = self.applicable(query);
        if Self::any_denies(&applicable, query) {
            debug!(applicable = applicable.len(), "Access denied by entry");
            return false;
        }

        let granted = query.actions.iter().all(|action| {
            grant_on_abstention
                || query.principals.iter().any(|principal| {
                    let request = query.request(principal, action);
                    applicable.iter().any(|ace| ace.grants_request(&request))
                })
        });

        debug!(
            applicable = applicable.len(),
            principals = query.principals.len(),
            actions = query.actions.len(),
            granted,
            "Evaluated access control list"
        );
        granted
    }

    /// Determine whether any applicable entry denies any requested
    /// (principal, action) pair.
    pub fn denies(&self, query: &Query<'_, P, A, S>) -> bool {
        let applicable = self.applicable(query);
        Self::any_denies(&applicable, query)
    }

    fn applicable(&self, query: &Query<'_, P, A, S>) -> Vec<&Ace<P, A, S>> {
        self.entries
            .iter()
            .filter(|ace| {
                query
                    .pairs()
                    .any(|(principal, action)| ace.applies(principal, action, query.securable))
            })
            .collect()
    }

    fn any_denies(applicable: &[&Ace<P, A, S>], query: &Query<'_, P, A, S>) -> bool {
        applicable.iter().any(|ace| {
            query
                .pairs()
                .any(|(principal, action)| ace.denies_request(&query.request(principal, action)))
        })
    }
}

impl<P: Clone, A: Clone, S: Clone> Clone for Acl<P, A, S> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            sameness: self.sameness.clone(),
            config: self.config,
        }
    }
}

impl<P: fmt::Debug, A: fmt::Debug, S: fmt::Debug> fmt::Debug for Acl<P, A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Acl")
            .field("entries", &self.entries)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type L = Acl<&'static str, &'static str, u32>;

    #[test]
    fn test_deny_overrides_regardless_of_order() {
        let mut deny_first = L::new();
        deny_first
            .deny(Target::new("felix", "close"))
            .grant(Target::new("felix", "close"));

        let mut grant_first = L::new();
        grant_first
            .grant(Target::new("felix", "close"))
            .deny(Target::new("felix", "close"));

        for acl in [&deny_first, &grant_first] {
            let query = Query::new(&"felix", &"close").on(&1);
            assert!(!acl.grants(&query));
            assert!(acl.denies(&query));
        }
    }

    #[test]
    fn test_empty_list_grants_nothing() {
        let acl = L::new();
        assert!(!acl.grants(&Query::new(&"felix", &"close")));
        assert!(!acl.denies(&Query::new(&"felix", &"close")));
    }

    #[test]
    fn test_empty_actions_are_vacuous() {
        let mut acl = L::new();
        acl.deny(Target::any());

        let query: Query<'_, &str, &str, u32> = Query::of(&["felix"], &[]);
        assert!(acl.grants(&query));
        assert!(!acl.denies(&query));
    }

    #[test]
    fn test_every_action_must_be_granted() {
        let mut acl = L::new();
        acl.grant(Target::new("felix", "open"));

        let actions = ["open", "close"];
        assert!(!acl.grants(&Query::of(&["felix"], &actions)));

        acl.grant(Target::new("felix", "close"));
        assert!(acl.grants(&Query::of(&["felix"], &actions)));
    }

    #[test]
    fn test_any_principal_may_satisfy_an_action() {
        let mut acl = L::new();
        acl.grant(Target::new("felix", "open"))
            .grant(Target::new("oscar", "close"));

        let principals = ["felix", "oscar"];
        let actions = ["open", "close"];
        assert!(acl.grants(&Query::of(&principals, &actions)));
        assert!(!acl.grants(&Query::of(&principals[..1], &actions)));
    }

    #[test]
    fn test_denial_of_one_principal_blocks_the_group() {
        let mut acl = L::new();
        acl.grant(Target::any().action("open"))
            .deny(Target::new("mallory", "open"));

        let principals = ["felix", "mallory"];
        let query = Query::of(&principals, &["open"]);
        assert!(!acl.grants(&query));
        assert!(acl.denies(&query));
    }

    #[test]
    fn test_abstention_config() {
        let mut acl = L::new().with_config(AclConfig::open());
        assert!(acl.grants(&Query::new(&"felix", &"close")));

        acl.deny(Target::new("felix", "close"));
        assert!(!acl.grants(&Query::new(&"felix", &"close")));
        assert!(acl.grants(&Query::new(&"felix", &"open")));
    }

    #[test]
    fn test_no_principals_never_granted() {
        let acl = L::new().with_config(AclConfig::open());
        let principals: [&str; 0] = [];
        let query: Query<'_, &str, &str, u32> = Query::of(&principals, &["close"]);
        assert!(!acl.grants(&query));
        assert!(!acl.denies(&query));
    }

    #[test]
    fn test_grants_with_closed_abstention_ignores_config() {
        let mut acl = L::new().with_config(AclConfig::open());
        acl.grant(Target::new("felix", "secure"));

        assert!(acl.grants(&Query::new(&"oscar", &"secure")));
        assert!(!acl.grants_with(&Query::new(&"oscar", &"secure"), false));
        assert!(acl.grants_with(&Query::new(&"felix", &"secure"), false));
    }

    #[test]
    fn test_grant_is_idempotent() {
        let mut acl = L::new();
        acl.grant(Target::new("felix", "close"))
            .grant(Target::new("felix", "close"));
        assert_eq!(acl.len(), 1);

        // Different strategy is a different entry
        acl.deny(Target::new("felix", "close"));
        assert_eq!(acl.len(), 2);
    }

    #[test]
    fn test_ungrant_and_undeny_missing_entries_are_noops() {
        let mut acl = L::new();
        acl.grant(Target::new("felix", "close"));

        acl.ungrant(&Target::new("oscar", "close"))
            .undeny(&Target::new("felix", "close"));
        assert_eq!(acl.len(), 1);
        assert!(acl.grants(&Query::new(&"felix", &"close")));

        acl.ungrant(&Target::new("felix", "close"));
        assert!(acl.is_empty());
        assert!(!acl.grants(&Query::new(&"felix", &"close")));
    }

    #[test]
    fn test_unsecure_without_securable_matches_any_securable() {
        let mut acl = L::new();
        acl.grant(Target::new("felix", "close").securable(7));

        acl.ungrant(&Target::new("felix", "close").securable(8));
        assert_eq!(acl.len(), 1);

        acl.ungrant(&Target::new("felix", "close"));
        assert!(acl.is_empty());
    }

    #[test]
    fn test_unsecure_removes_only_first_match() {
        let mut acl = L::new();
        acl.grant(Target::new("felix", "close").securable(1))
            .grant(Target::new("felix", "close").securable(2));

        acl.ungrant(&Target::new("felix", "close"));
        let remaining = acl.entries();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].securable(), Some(&2));
    }

    #[test]
    fn test_entries_is_a_copy() {
        let mut acl = L::new();
        acl.grant(Target::new("felix", "close"));

        let mut copy = acl.entries();
        copy.clear();
        assert_eq!(acl.len(), 1);
    }

    #[test]
    fn test_custom_strategy_identity_for_removal() {
        let strategy: Strategy<&'static str, &'static str, u32> = Strategy::from_fn(|_| true, |_| false);
        let lookalike: Strategy<&'static str, &'static str, u32> = Strategy::from_fn(|_| true, |_| false);

        let mut acl = L::new();
        acl.secure(strategy.clone(), Target::new("felix", "close"))
            .secure(strategy.clone(), Target::new("felix", "close"));
        assert_eq!(acl.len(), 1);

        acl.unsecure(&lookalike, &Target::new("felix", "close"));
        assert_eq!(acl.len(), 1);

        acl.unsecure(&strategy, &Target::new("felix", "close"));
        assert!(acl.is_empty());
    }

    #[test]
    fn test_replay_reproduces_decisions() {
        let script: Vec<(bool, &'static str, Option<&'static str>)> = vec![
            (true, "felix", Some("open")),
            (true, "felix", Some("close")),
            (false, "oscar", None),
            (true, "ada", None),
            (false, "ada", Some("close")),
            (true, "felix", Some("open")),
        ];

        let build = || {
            let mut acl = L::new();
            for (grant, principal, action) in &script {
                let mut target = Target::any().principal(*principal);
                target.action = *action;
                if *grant {
                    acl.grant(target);
                } else {
                    acl.deny(target);
                }
            }
            acl
        };

        let first = build();
        let second = build();
        assert_eq!(first.len(), second.len());

        for principal in ["felix", "oscar", "ada", "nobody"] {
            for action in ["open", "close", "audit"] {
                let query = Query::new(&principal, &action);
                assert_eq!(first.grants(&query), second.grants(&query));
                assert_eq!(first.denies(&query), second.denies(&query));
            }
        }

        assert!(first.grants(&Query::new(&"ada", &"open")));
        assert!(!first.grants(&Query::new(&"ada", &"close")));
        assert!(first.denies(&Query::new(&"oscar", &"audit")));
    }
}
