use crate::component::{Component, DependencySpec, Key, Managed};

#[derive(Debug, Clone, PartialEq)]
struct Counter {
    count: u32,
}

impl Component for Counter {}

#[test]
fn test_using_accumulates_declarations() {
    let managed = Managed::new(Counter { count: 0 })
        .using(DependencySpec::list(["a"]))
        .using(DependencySpec::map([("store", "b")]));

    let declaration = managed.declaration();
    assert_eq!(declaration.get("a"), Some(&Key::from("a")));
    assert_eq!(declaration.get("store"), Some(&Key::from("b")));
}

#[test]
fn test_wiring_does_not_touch_component() {
    let managed = Managed::new(Counter { count: 3 }).using(DependencySpec::list(["a"]));
    assert_eq!(managed.downcast_ref::<Counter>(), Some(&Counter { count: 3 }));
    assert!(managed.dependencies().is_empty());
}

#[test]
fn test_equality_is_identity_of_component() {
    let managed = Managed::new(Counter { count: 1 });
    let clone = managed.clone();
    let lookalike = Managed::new(Counter { count: 1 });

    assert_eq!(managed, clone);
    assert_ne!(managed, lookalike, "Structurally equal values are different components");
    assert_ne!(managed.clone().using(DependencySpec::list(["x"])), clone);
}
