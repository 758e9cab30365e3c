//! Integration tests for securable domain objects.
//!
//! These tests drive a small banking domain through the public API:
//! accounts secure themselves, owners delegate and revoke rights, and
//! wildcard principals and actions interact with explicit denials.

use serde_json::json;
use uuid::Uuid;
use warden_acl::{
    AclConfig, AclError, Change, PrimitiveAction, Query, Securable, Security, Strategy, Target,
};

use PrimitiveAction::{All, Delete, Read, Secure, Update};

/// A securable account identified by a UUID.
#[derive(Debug)]
struct Account {
    /// Account ID
    id: Uuid,
    /// Security state
    security: Security<Uuid, PrimitiveAction, Uuid>,
}

impl Account {
    fn new() -> Self {
        Self {
            id: Uuid::now_v7(),
            security: Security::new(),
        }
    }
}

impl Securable for Account {
    type Principal = Uuid;
    type Action = PrimitiveAction;
    type Key = Uuid;

    fn securable_key(&self) -> Uuid {
        self.id
    }

    fn security(&self) -> &Security<Uuid, PrimitiveAction, Uuid> {
        &self.security
    }

    fn security_mut(&mut self) -> &mut Security<Uuid, PrimitiveAction, Uuid> {
        &mut self.security
    }
}

/// Test fixture: an account already secured by its owner.
struct Fixture {
    owner: Uuid,
    p1: Uuid,
    p2: Uuid,
    account: Account,
}

impl Fixture {
    fn new() -> Self {
        let owner = Uuid::now_v7();
        let mut account = Account::new();
        account
            .grant(Change::to(owner).action(Read))
            .expect("first securer is never rejected");

        Self {
            owner,
            p1: Uuid::now_v7(),
            p2: Uuid::now_v7(),
            account,
        }
    }

    fn grants(&self, principal: Uuid, action: PrimitiveAction) -> bool {
        self.account.grants(&[principal], &[action], None)
    }

    fn denies(&self, principal: Uuid, action: PrimitiveAction) -> bool {
        self.account.denies(&[principal], &[action], None)
    }
}

#[test]
fn test_default_allow_before_secured() {
    let account = Account::new();
    let anyone = Uuid::now_v7();

    for action in PrimitiveAction::all() {
        assert!(account.grants(&[anyone], &[action], None));
        assert!(!account.denies(&[anyone], &[action], None));
    }
    assert!(!account.secured());
}

#[test]
fn test_bootstrap_grant() {
    let mut account = Account::new();
    let p = Uuid::now_v7();
    let other = Uuid::now_v7();

    account.secure(Strategy::Grant, Change::to(p).action(Secure)).unwrap();

    assert!(account.secured());
    assert!(account.grants(&[p], &[Secure], None));
    assert!(!account.grants(&[other], &[Secure], None));
    assert!(!account.grants(&[other], &[Read], None));
}

#[test]
fn test_grant_when_permitted() {
    let mut f = Fixture::new();
    f.account.grant(Change::to(f.p1).action(Update).by(f.owner)).unwrap();

    assert!(f.grants(f.p1, Update));
    assert!(!f.denies(f.p1, Update));
    assert!(!f.grants(f.p2, Update));
    assert!(!f.denies(f.p2, Update));
}

#[test]
fn test_deny_when_denied_even_if_granted() {
    let mut f = Fixture::new();
    f.account.grant(Change::to(f.p1).action(Update).by(f.owner)).unwrap();
    f.account.deny(Change::to(f.p1).action(Update).by(f.owner)).unwrap();

    assert!(!f.grants(f.p1, Update));
    assert!(f.denies(f.p1, Update));
}

#[test]
fn test_grant_all_principals_an_action() {
    let mut f = Fixture::new();
    f.account.grant(Change::everyone().action(Delete).by(f.owner)).unwrap();

    assert!(f.grants(f.p1, Delete));
    assert!(f.grants(f.p2, Delete));
    assert!(!f.grants(f.p1, Update));
}

#[test]
fn test_grant_a_principal_all_actions() {
    let mut f = Fixture::new();
    f.account.grant(Change::to(f.p1).action(All).by(f.owner)).unwrap();

    assert!(f.grants(f.p1, Delete));
    assert!(f.grants(f.p1, Secure));
    assert!(!f.grants(f.p2, Delete));

    // With SECURE via the wildcard, p1 may now change the rules itself
    f.account.grant(Change::to(f.p2).action(Read).by(f.p1)).unwrap();
    assert!(f.grants(f.p2, Read));
}

#[test]
fn test_grant_everyone_everything_without_action_filter() {
    let mut f = Fixture::new();
    f.account.grant(Change::everyone().by(f.owner)).unwrap();

    assert!(f.grants(f.p1, Update));
    assert!(f.grants(f.p2, Secure));
}

#[test]
fn test_deny_all_principals_an_action() {
    let mut f = Fixture::new();
    f.account.grant(Change::everyone().action(Read).by(f.owner)).unwrap();
    f.account.deny(Change::everyone().action(Read).by(f.owner)).unwrap();

    assert!(!f.grants(f.p1, Read));
    assert!(f.denies(f.p1, Read));
    assert!(f.denies(f.p2, Read));
    // The owner is denied too: deny overrides its own grant
    assert!(f.denies(f.owner, Read));
    // But still holds SECURE
    assert!(f.grants(f.owner, Secure));
}

#[test]
fn test_deny_a_principal_all_actions() {
    let mut f = Fixture::new();
    f.account.grant(Change::everyone().action(Read).by(f.owner)).unwrap();
    f.account.deny(Change::to(f.p1).action(All).by(f.owner)).unwrap();

    assert!(!f.grants(f.p1, Read));
    assert!(f.denies(f.p1, Read));
    assert!(f.denies(f.p1, Delete));
    assert!(f.grants(f.p2, Read));
    assert!(!f.denies(f.p2, Read));
}

#[test]
fn test_denied_owner_loses_ability_to_secure() {
    let mut f = Fixture::new();
    f.account.deny(Change::to(f.owner).action(Secure)).unwrap();

    let err = f.account.grant(Change::to(f.p1).action(Read).by(f.owner)).unwrap_err();
    assert_eq!(err.principal, Some(f.owner));
    assert_eq!(err.action, Secure);
    assert_eq!(err.error_code(), "E_UNAUTHORIZED");
}

#[test]
fn test_unauthorized_error_carries_data() {
    let mut f = Fixture::new();
    let data = json!({ "transaction": "tx-1" });

    let err = f
        .account
        .grant(Change::to(f.p1).action(Read).with_data(data.clone()))
        .unwrap_err();
    assert_eq!(err.principal, Some(f.p1));
    assert_eq!(err.data, Some(data));

    let wrapped: AclError<Uuid, PrimitiveAction> = err.into();
    assert!(!wrapped.is_configuration_error());
}

#[test]
fn test_idempotent_grant_through_securable() {
    let mut f = Fixture::new();
    let before = f.account.acl().unwrap().len();

    f.account.grant(Change::to(f.p1).action(Read).by(f.owner)).unwrap();
    f.account.grant(Change::to(f.p1).action(Read).by(f.owner)).unwrap();
    assert_eq!(f.account.acl().unwrap().len(), before + 1);

    f.account.ungrant(Change::to(f.p2).action(Read).by(f.owner)).unwrap();
    f.account.undeny(Change::to(f.p1).action(Read).by(f.owner)).unwrap();
    assert_eq!(f.account.acl().unwrap().len(), before + 1);
}

#[test]
fn test_multiple_principals_and_actions() {
    let mut f = Fixture::new();
    f.account.grant(Change::to(f.p1).action(Read).by(f.owner)).unwrap();
    f.account.grant(Change::to(f.p2).action(Update).by(f.owner)).unwrap();

    // Each action granted to some principal
    assert!(f.account.grants(&[f.p1, f.p2], &[Read, Update], None));
    // Delete granted to nobody
    assert!(!f.account.grants(&[f.p1, f.p2], &[Read, Delete], None));
    // No actions requested
    assert!(f.account.grants(&[f.p1], &[], None));
    assert!(!f.account.denies(&[f.p1], &[], None));
}

#[test]
fn test_custom_strategy_on_securable() {
    let mut f = Fixture::new();
    let business_hours: Strategy<Uuid, PrimitiveAction, Uuid> = Strategy::from_fn(
        |r| {
            r.data
                .and_then(|d| d["hour"].as_u64())
                .map(|h| (9..17).contains(&h))
                .unwrap_or(false)
        },
        |_| false,
    );
    f.account
        .secure(business_hours, Change::to(f.p1).action(Update).by(f.owner))
        .unwrap();

    let morning = json!({ "hour": 10 });
    let night = json!({ "hour": 23 });
    assert!(f.account.grants(&[f.p1], &[Update], Some(&morning)));
    assert!(!f.account.grants(&[f.p1], &[Update], Some(&night)));
    assert!(!f.account.denies(&[f.p1], &[Update], Some(&night)));
}

#[test]
fn test_open_config_grants_abstentions() {
    let owner = Uuid::now_v7();
    let stranger = Uuid::now_v7();
    let mut account = Account {
        id: Uuid::now_v7(),
        security: Security::new().with_config(AclConfig::open()),
    };
    account.deny(Change::to(stranger).action(Delete).by(owner)).unwrap();

    assert!(account.grants(&[stranger], &[Read], None));
    assert!(!account.grants(&[stranger], &[Delete], None));
}

#[test]
fn test_open_config_keeps_secure_gated() {
    let owner = Uuid::now_v7();
    let stranger = Uuid::now_v7();
    let mut account = Account {
        id: Uuid::now_v7(),
        security: Security::new().with_config(AclConfig::open()),
    };
    account.grant(Change::to(owner).action(Read)).unwrap();

    // The stranger is granted undecided actions but not SECURE
    assert!(account.grants(&[stranger], &[Update], None));
    let err = account
        .deny(Change::to(owner).action(Secure).by(stranger))
        .unwrap_err();
    assert_eq!(err.principal, Some(stranger));
    assert_eq!(err.action, Secure);

    // The owner keeps control of the rules
    assert!(account.grants(&[owner], &[Secure], None));
    account
        .deny(Change::to(stranger).action(Delete).by(owner))
        .unwrap();
    assert!(account.denies(&[stranger], &[Delete], None));
}

#[test]
fn test_list_scenario_deny_then_grant() {
    let felix = "felix";
    let s = Uuid::now_v7();
    let mut acl: warden_acl::Acl<&str, &str, Uuid> = warden_acl::Acl::new();
    acl.deny(Target::new(felix, "close"))
        .grant(Target::new(felix, "close"));

    let query = Query::new(&felix, &"close").on(&s);
    assert!(!acl.grants(&query));
    assert!(acl.denies(&query));
}
