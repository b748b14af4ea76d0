use crate::component::{Component, DependencySpec, Key, Managed};
use crate::lifecycle::error::LifecycleError;
use crate::lifecycle::gate::always;
use crate::lifecycle::tests::support::{ExecutionTracker, Recorder, Toggle};
use crate::lifecycle::{Action, Gate};
use crate::system::SystemMap;

#[derive(Debug)]
struct Stateless;
impl Component for Stateless {}

#[test]
fn test_always_gate_admits_everything() {
    let managed = Managed::new(Toggle::new("t"));
    assert!(always(&managed));
    assert!(Gate::Always.admits(Action::Start, &managed, true));
    assert!(Gate::Always.admits(Action::Stop, &managed, false));
}

#[test]
fn test_idempotent_gate_uses_component_state() {
    let tracker = ExecutionTracker::new();
    let stopped = Managed::new(Recorder::new("r", &tracker));
    let mut running = Recorder::new("r", &tracker);
    running.started = true;
    let running = Managed::new(running);

    // The component's own report wins over the system flag
    assert!(Gate::Idempotent.admits(Action::Start, &stopped, true));
    assert!(!Gate::Idempotent.admits(Action::Stop, &stopped, true));
    assert!(!Gate::Idempotent.admits(Action::Start, &running, false));
    assert!(Gate::Idempotent.admits(Action::Stop, &running, false));
}

#[test]
fn test_idempotent_gate_falls_back_to_system_flag() {
    let managed = Managed::new(Stateless);
    assert!(Gate::Idempotent.admits(Action::Start, &managed, false));
    assert!(!Gate::Idempotent.admits(Action::Start, &managed, true));
    assert!(Gate::Idempotent.admits(Action::Stop, &managed, true));
    assert!(!Gate::Idempotent.admits(Action::Stop, &managed, false));
}

#[tokio::test]
async fn test_idempotent_double_start_is_a_no_op() -> Result<(), LifecycleError> {
    let tracker = ExecutionTracker::new();
    let system = SystemMap::new()
        .with("a", Managed::new(Recorder::new("a", &tracker)))
        .with("b", Managed::new(Recorder::new("b", &tracker)).using(DependencySpec::list(["a"])))
        .idempotent();

    let once = system.start().await?;
    let twice = once.clone().start().await?;

    assert_eq!(tracker.calls().await, vec!["start:a", "start:b"]);
    assert_eq!(once, twice, "Second start must leave every component untouched");
    Ok(())
}

#[tokio::test]
async fn test_idempotent_stop_of_stopped_system_is_a_no_op() -> Result<(), LifecycleError> {
    let tracker = ExecutionTracker::new();
    let system = SystemMap::new()
        .with("a", Managed::new(Recorder::new("a", &tracker)))
        .idempotent();

    let stopped = system.clone().stop().await?;
    assert!(tracker.calls().await.is_empty());
    assert_eq!(stopped.get(&Key::from("a")), system.get(&Key::from("a")));
    Ok(())
}

#[tokio::test]
async fn test_non_idempotent_double_start_invokes_again() -> Result<(), LifecycleError> {
    let system = SystemMap::new().with("t", Managed::new(Toggle::new("t")));

    let twice = system.start().await?.start().await?;
    let toggle = twice.component::<Toggle>(&Key::from("t")).unwrap();
    assert_eq!(toggle.transitions, 2);
    Ok(())
}

#[tokio::test]
async fn test_idempotent_gate_on_stateless_components() -> Result<(), LifecycleError> {
    let tracker = ExecutionTracker::new();
    let system = SystemMap::new()
        .with("plain", Managed::new(Stateless))
        .with("rec", Managed::new(Recorder::new("rec", &tracker)))
        .idempotent();

    let started = system.start().await?;
    assert!(started.is_started());
    let again = started.start().await?;
    let stopped = again.stop().await?;
    assert!(!stopped.is_started());

    assert_eq!(tracker.calls().await, vec!["start:rec", "stop:rec"]);
    Ok(())
}
