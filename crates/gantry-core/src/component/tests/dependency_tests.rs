use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::json;

use crate::component::{Component, ComponentRef, Declaration, Dependencies, DependencySpec, Key};
use crate::lifecycle::error::LifecycleError;

#[derive(Debug, PartialEq)]
struct Database {
    url: String,
}

impl Component for Database {}

#[derive(Debug)]
struct Cache;

impl Component for Cache {}

#[test]
fn test_list_spec_expands_to_identity_map() {
    let list = DependencySpec::list(["x", "y"]);
    let map = DependencySpec::map([("x", "x"), ("y", "y")]);

    assert_eq!(Declaration::from(&list), Declaration::from(&map));
    assert_eq!(
        list.entries(),
        vec![("x".to_string(), Key::from("x")), ("y".to_string(), Key::from("y"))]
    );
}

#[test]
fn test_declarations_merge_instead_of_replacing() {
    let mut declaration = Declaration::new();
    declaration.merge(&DependencySpec::list(["db"]));
    declaration.merge(&DependencySpec::map([("cache", "redis")]));

    assert_eq!(declaration.len(), 2);
    assert_eq!(declaration.get("db"), Some(&Key::from("db")));
    assert_eq!(declaration.get("cache"), Some(&Key::from("redis")));
}

#[test]
fn test_redeclared_field_overwrites_only_that_entry() {
    let mut declaration = Declaration::new();
    declaration.merge(&DependencySpec::map([("db", "primary"), ("cache", "redis")]));
    declaration.merge(&DependencySpec::map([("db", "replica")]));

    assert_eq!(declaration.get("db"), Some(&Key::from("replica")));
    assert_eq!(declaration.get("cache"), Some(&Key::from("redis")));
    let targets: Vec<&Key> = declaration.targets().collect();
    assert_eq!(targets.len(), 2);
}

#[test]
fn test_spec_from_json_array_and_object() {
    let list = DependencySpec::try_from(&json!(["db", "cache"])).unwrap();
    assert_eq!(list, DependencySpec::list(["db", "cache"]));

    let map = DependencySpec::try_from(&json!({"store": "db"})).unwrap();
    let mut expected = BTreeMap::new();
    expected.insert("store".to_string(), Key::from("db"));
    assert_eq!(map, DependencySpec::Map(expected));
}

#[test]
fn test_spec_from_invalid_json_is_rejected() {
    for value in [json!(42), json!("db"), json!([1, 2]), json!({"store": 7}), json!(null)] {
        match DependencySpec::try_from(&value) {
            Err(LifecycleError::InvalidDependencySpec { spec }) => {
                assert_eq!(spec, value.to_string());
            }
            other => panic!("Expected InvalidDependencySpec for {}, got {:?}", value, other),
        }
    }
}

#[test]
fn test_dependencies_downcast_to_concrete_type() {
    let db: ComponentRef = Arc::new(Database { url: "postgres://localhost".into() });
    let mut deps = Dependencies::new();
    deps.insert("db", db);
    deps.insert("cache", Arc::new(Cache));

    assert_eq!(deps.get::<Database>("db").map(|d| d.url.as_str()), Some("postgres://localhost"));
    assert!(deps.get::<Cache>("db").is_none(), "Wrong type must not downcast");
    assert!(deps.get::<Database>("missing").is_none());
    assert_eq!(deps.fields().collect::<Vec<_>>(), vec!["cache", "db"]);
}

#[test]
fn test_dependencies_equality_is_identity() {
    let db: ComponentRef = Arc::new(Database { url: "a".into() });
    let same_value: ComponentRef = Arc::new(Database { url: "a".into() });

    let mut first = Dependencies::new();
    first.insert("db", db.clone());
    let mut second = Dependencies::new();
    second.insert("db", db);
    let mut third = Dependencies::new();
    third.insert("db", same_value);

    assert_eq!(first, second);
    assert_ne!(first, third);
}
