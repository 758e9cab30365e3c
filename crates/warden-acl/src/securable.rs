//! # Securable capability
//!
//! Lets any domain type guard itself with an access control list. The list
//! is created lazily by the first securing change; until then the object is
//! unsecured and every read is allowed.
//!
//! Changing an object's rules is itself an access-controlled action: the
//! acting principal must hold the SECURE action on the object. The one
//! exception is the very first change, which bootstraps the list by granting
//! SECURE to whoever made it. Without that exception nobody could ever
//! secure a new object.
//!
//! ```text
//! Unsecured ──secure()──▶ Secured ──secure()/unsecure()──▶ Secured
//!            (SECURE granted to         (acting principal must
//!             the first securer)         hold SECURE)
//! ```

use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

use crate::acl::Acl;
use crate::actions::ActionKind;
use crate::config::AclConfig;
use crate::error::AuthorizationError;
use crate::sameness::Sameness;
use crate::strategy::Strategy;
use crate::target::{Query, Target};

/// The security state a securable domain type embeds.
///
/// Holds the object's list once it has been secured, along with the
/// comparison functions and configuration the list will be created with.
pub struct Security<P, A, S> {
    acl: Option<Acl<P, A, S>>,
    sameness: Sameness<P, A, S>,
    config: AclConfig,
}

impl<P, A, S> Security<P, A, S>
where
    P: PartialEq + 'static,
    A: PartialEq + 'static,
    S: PartialEq + 'static,
{
    /// Unsecured state whose list will compare with `==`.
    pub fn new() -> Self {
        Self::with_sameness(Sameness::default())
    }
}

impl<P, A, S> Default for Security<P, A, S>
where
    P: PartialEq + 'static,
    A: PartialEq + 'static,
    S: PartialEq + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<P, A, S> Security<P, A, S> {
    /// Unsecured state whose list will use the given comparison functions.
    pub fn with_sameness(sameness: Sameness<P, A, S>) -> Self {
        Self {
            acl: None,
            sameness,
            config: AclConfig::default(),
        }
    }

    /// Use the given evaluation configuration for the list.
    pub fn with_config(mut self, config: AclConfig) -> Self {
        self.config = config;
        if let Some(acl) = self.acl.take() {
            self.acl = Some(acl.with_config(config));
        }
        self
    }

    /// Check if the list exists.
    pub fn is_secured(&self) -> bool {
        self.acl.is_some()
    }

    /// The list, if the object has been secured.
    pub fn acl(&self) -> Option<&Acl<P, A, S>> {
        self.acl.as_ref()
    }

    fn ensure_acl(&mut self) -> &mut Acl<P, A, S> {
        let sameness = &self.sameness;
        let config = self.config;
        self.acl.get_or_insert_with(|| {
            debug!("Creating access control list for unsecured object");
            Acl::with_sameness(sameness.clone()).with_config(config)
        })
    }
}

impl<P: Clone, A: Clone, S: Clone> Clone for Security<P, A, S> {
    fn clone(&self) -> Self {
        Self {
            acl: self.acl.clone(),
            sameness: self.sameness.clone(),
            config: self.config,
        }
    }
}

impl<P: fmt::Debug, A: fmt::Debug, S: fmt::Debug> fmt::Debug for Security<P, A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Security")
            .field("acl", &self.acl)
            .field("config", &self.config)
            .finish()
    }
}

/// A requested change to a securable's rules.
///
/// `principal` and `action` are the filters of the entry to add or remove;
/// `None` stands for every principal or every action. `securor` is the
/// acting party whose SECURE grant is checked, defaulting to `principal`.
#[derive(Debug, Clone)]
pub struct Change<P, A> {
    /// Principal filter of the entry.
    pub principal: Option<P>,
    /// Action filter of the entry.
    pub action: Option<A>,
    /// The party making the change, if not `principal` itself.
    pub securor: Option<P>,
    /// Caller context for the authorization check.
    pub data: Option<Value>,
}

impl<P, A> Change<P, A> {
    /// A change about one principal, made by that principal.
    pub fn to(principal: P) -> Self {
        Self {
            principal: Some(principal),
            action: None,
            securor: None,
            data: None,
        }
    }

    /// A change about every principal. Needs a [`Change::by`] securor.
    pub fn everyone() -> Self {
        Self {
            principal: None,
            action: None,
            securor: None,
            data: None,
        }
    }

    /// Restrict the entry to an action.
    pub fn action(mut self, action: A) -> Self {
        self.action = Some(action);
        self
    }

    /// Name the acting party.
    pub fn by(mut self, securor: P) -> Self {
        self.securor = Some(securor);
        self
    }

    /// Attach caller context.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// The party whose SECURE grant is checked.
    pub fn acting_party(&self) -> Option<&P> {
        self.securor.as_ref().or(self.principal.as_ref())
    }
}

/// The securable capability.
///
/// Domain types implement the three accessors, embedding a [`Security`]
/// value, and receive the full method set.
///
/// # Example
///
/// ```
/// use warden_acl::{Change, PrimitiveAction, Securable, Security};
///
/// struct Account {
///     id: u64,
///     security: Security<&'static str, PrimitiveAction, u64>,
/// }
///
/// impl Securable for Account {
///     type Principal = &'static str;
///     type Action = PrimitiveAction;
///     type Key = u64;
///
///     fn securable_key(&self) -> u64 {
///         self.id
///     }
///
///     fn security(&self) -> &Security<&'static str, PrimitiveAction, u64> {
///         &self.security
///     }
///
///     fn security_mut(&mut self) -> &mut Security<&'static str, PrimitiveAction, u64> {
///         &mut self.security
///     }
/// }
///
/// let mut account = Account { id: 1, security: Security::new() };
/// assert!(account.grants(&["anyone"], &[PrimitiveAction::Read], None));
///
/// // Felix secures the account, becoming its first securer
/// account.grant(Change::to("felix").action(PrimitiveAction::Read)).unwrap();
/// assert!(account.grants(&["felix"], &[PrimitiveAction::Secure], None));
/// assert!(!account.grants(&["anyone"], &[PrimitiveAction::Read], None));
///
/// // Oscar may not change the rules
/// let denied = account.grant(Change::to("oscar").action(PrimitiveAction::Read));
/// assert!(denied.is_err());
/// ```
pub trait Securable {
    /// Identity type of principals.
    type Principal: Clone + fmt::Debug;
    /// Action type.
    type Action: ActionKind;
    /// Identity of this object, used as the securable filter of its entries.
    type Key: Clone;

    /// This object's identity.
    fn securable_key(&self) -> Self::Key;

    /// This object's security state.
    fn security(&self) -> &Security<Self::Principal, Self::Action, Self::Key>;

    /// This object's security state, mutably.
    fn security_mut(&mut self) -> &mut Security<Self::Principal, Self::Action, Self::Key>;

    /// Check if this object has been secured.
    fn secured(&self) -> bool {
        self.security().is_secured()
    }

    /// This object's list, once secured.
    fn acl(&self) -> Option<&Acl<Self::Principal, Self::Action, Self::Key>> {
        self.security().acl()
    }

    /// Determine whether the principals may take all of the actions.
    ///
    /// Always true while the object is unsecured.
    fn grants(
        &self,
        principals: &[Self::Principal],
        actions: &[Self::Action],
        data: Option<&Value>,
    ) -> bool {
        let Some(acl) = self.security().acl() else {
            return true;
        };
        let key = self.securable_key();
        let mut query = Query::of(principals, actions).on(&key);
        query.data = data;
        acl.grants(&query)
    }

    /// Determine whether any of the principals is explicitly denied any of
    /// the actions.
    ///
    /// Always false while the object is unsecured.
    fn denies(
        &self,
        principals: &[Self::Principal],
        actions: &[Self::Action],
        data: Option<&Value>,
    ) -> bool {
        let Some(acl) = self.security().acl() else {
            return false;
        };
        let key = self.securable_key();
        let mut query = Query::of(principals, actions).on(&key);
        query.data = data;
        acl.denies(&query)
    }

    /// Grant the change's principal its action.
    fn grant(
        &mut self,
        change: Change<Self::Principal, Self::Action>,
    ) -> Result<&mut Self, AuthorizationError<Self::Principal, Self::Action>> {
        self.secure(Strategy::Grant, change)
    }

    /// Stop granting the change's principal its action.
    fn ungrant(
        &mut self,
        change: Change<Self::Principal, Self::Action>,
    ) -> Result<&mut Self, AuthorizationError<Self::Principal, Self::Action>> {
        self.unsecure(&Strategy::Grant, change)
    }

    /// Explicitly deny the change's principal its action.
    fn deny(
        &mut self,
        change: Change<Self::Principal, Self::Action>,
    ) -> Result<&mut Self, AuthorizationError<Self::Principal, Self::Action>> {
        self.secure(Strategy::Deny, change)
    }

    /// Stop explicitly denying the change's principal its action.
    fn undeny(
        &mut self,
        change: Change<Self::Principal, Self::Action>,
    ) -> Result<&mut Self, AuthorizationError<Self::Principal, Self::Action>> {
        self.unsecure(&Strategy::Deny, change)
    }

    /// Add an entry binding `strategy` to the change's principal and action.
    ///
    /// On an unsecured object this first creates the list and grants the
    /// acting party SECURE, without any check. On a secured object the
    /// acting party must already hold SECURE.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizationError`] if the object is secured and the
    /// acting party lacks SECURE, or if the change names no acting party.
    fn secure(
        &mut self,
        strategy: Strategy<Self::Principal, Self::Action, Self::Key>,
        change: Change<Self::Principal, Self::Action>,
    ) -> Result<&mut Self, AuthorizationError<Self::Principal, Self::Action>> {
        let key = self.securable_key();
        let security = self.security_mut();

        if security.is_secured() {
            authorize(security, &key, &change)?;
        } else {
            let Some(actor) = change.acting_party().cloned() else {
                warn!("Rejected securing attempt without an acting party");
                let secure = <Self::Action as ActionKind>::secure();
                return Err(AuthorizationError::new(None, secure).with_data(change.data));
            };
            debug!(principal = ?actor, "Bootstrapping SECURE grant for first securer");
            security
                .ensure_acl()
                .grant(Target::new(actor, <Self::Action as ActionKind>::secure()).securable(key.clone()));
        }

        let target = Target {
            principal: change.principal,
            action: change.action,
            securable: Some(key),
        };
        security.ensure_acl().secure(strategy, target);
        Ok(self)
    }

    /// Remove the entry binding `strategy` to the change's principal and
    /// action. Does nothing on an unsecured object.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizationError`] if the acting party lacks SECURE.
    fn unsecure(
        &mut self,
        strategy: &Strategy<Self::Principal, Self::Action, Self::Key>,
        change: Change<Self::Principal, Self::Action>,
    ) -> Result<&mut Self, AuthorizationError<Self::Principal, Self::Action>> {
        if !self.secured() {
            return Ok(self);
        }

        let key = self.securable_key();
        let security = self.security_mut();
        authorize(security, &key, &change)?;

        let target = Target {
            principal: change.principal,
            action: change.action,
            securable: Some(key),
        };
        security.ensure_acl().unsecure(strategy, &target);
        Ok(self)
    }
}

/// Check that the change's acting party holds SECURE on a secured object.
///
/// SECURE must be granted explicitly: abstention never authorizes a rules
/// change, whatever the list's configuration.
fn authorize<P, A, S>(
    security: &Security<P, A, S>,
    key: &S,
    change: &Change<P, A>,
) -> Result<(), AuthorizationError<P, A>>
where
    P: Clone + fmt::Debug,
    A: ActionKind,
{
    let secure = A::secure();
    let allowed = match (security.acl(), change.acting_party()) {
        (Some(acl), Some(actor)) => {
            let mut query = Query::new(actor, &secure).on(key);
            query.data = change.data.as_ref();
            acl.grants_with(&query, false)
        }
        _ => false,
    };

    if allowed {
        return Ok(());
    }

    let principal = change.acting_party().cloned();
    warn!(principal = ?principal, "Rejected securing attempt without SECURE grant");
    Err(AuthorizationError::new(principal, secure).with_data(change.data.clone()))
}
