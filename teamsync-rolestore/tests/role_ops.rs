//! Per-role operations against an in-memory store.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use serde_json::{json, Value};

use teamsync_core::types::{RoleName, Username};
use teamsync_rolestore::{
    default_role_template, ensure_role, upsert_role_mapping, RoleStore, RoleStoreError,
};

#[derive(Default)]
struct MemoryStore {
    roles: RefCell<BTreeMap<String, Value>>,
    mappings: RefCell<BTreeMap<String, Value>>,
    get_calls: RefCell<usize>,
}

impl RoleStore for MemoryStore {
    fn get_role(&self, name: &RoleName) -> Result<Option<Value>, RoleStoreError> {
        *self.get_calls.borrow_mut() += 1;
        Ok(self.roles.borrow().get(name.as_str()).cloned())
    }

    fn put_role(&self, name: &RoleName, definition: &Value) -> Result<(), RoleStoreError> {
        self.roles
            .borrow_mut()
            .insert(name.to_string(), definition.clone());
        Ok(())
    }

    fn put_role_mapping(&self, name: &RoleName, mapping: &Value) -> Result<(), RoleStoreError> {
        self.mappings
            .borrow_mut()
            .insert(name.to_string(), mapping.clone());
        Ok(())
    }
}

fn members(names: &[&str]) -> BTreeSet<Username> {
    names.iter().map(|n| Username::from(*n)).collect()
}

#[test]
fn upsert_twice_with_same_members_yields_identical_state() {
    let store = MemoryStore::default();
    let role = RoleName::from("TeamA");

    upsert_role_mapping(&store, &role, &members(&["alice", "bob"]), true).expect("first");
    let first = store.mappings.borrow().get("TeamA").cloned().expect("state");

    upsert_role_mapping(&store, &role, &members(&["bob", "alice"]), true).expect("second");
    let second = store.mappings.borrow().get("TeamA").cloned().expect("state");

    assert_eq!(first, second);
}

#[test]
fn upsert_fully_replaces_the_previous_mapping() {
    let store = MemoryStore::default();
    let role = RoleName::from("TeamA");

    upsert_role_mapping(&store, &role, &members(&["alice", "bob"]), true).expect("first");
    upsert_role_mapping(&store, &role, &members(&["carol"]), true).expect("second");

    let state = store.mappings.borrow().get("TeamA").cloned().expect("state");
    assert_eq!(
        state["rules"]["any"],
        json!([{"field": {"username": "carol"}}]),
        "no trace of the previous membership may remain"
    );
}

#[test]
fn ensure_role_creates_missing_role_from_template() {
    let store = MemoryStore::default();
    let created = ensure_role(&store, &RoleName::from("QA"), &default_role_template())
        .expect("ensure");

    assert!(created);
    let roles = store.roles.borrow();
    assert_eq!(roles.get("QA").unwrap()["indices"][0]["names"][0], "QA-*");
}

#[test]
fn ensure_role_never_touches_an_existing_role() {
    let store = MemoryStore::default();
    let existing = json!({"cluster": ["all"], "indices": []});
    store
        .roles
        .borrow_mut()
        .insert("QA".into(), existing.clone());

    // A completely different template must be ignored.
    let template = json!({"cluster": ["none"], "indices": [{"names": ["{role}-*"]}]});
    let created = ensure_role(&store, &RoleName::from("QA"), &template).expect("ensure");

    assert!(!created);
    assert_eq!(store.roles.borrow().get("QA"), Some(&existing));
}

#[test]
fn ensure_role_checks_before_writing() {
    let store = MemoryStore::default();
    ensure_role(&store, &RoleName::from("QA"), &default_role_template()).expect("ensure");
    assert_eq!(*store.get_calls.borrow(), 1);
}
