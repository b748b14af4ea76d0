use crate::component::{Key, Managed, Transition};
use crate::graph::{dependency_graph, topological_order};
use crate::lifecycle::error::LifecycleError;
use crate::lifecycle::Operation;
use crate::system::SystemMap;

/// Apply `operation` to the components at `keys`, dependencies first.
///
/// Components for which `select` returns false are left untouched. Any
/// failure aborts the traversal; components already processed keep their
/// new values in the snapshot attached to the error.
pub async fn update_system<O, P>(
    system: SystemMap,
    keys: &[Key],
    operation: &O,
    select: P,
) -> Result<SystemMap, LifecycleError>
where
    O: Operation + ?Sized,
    P: Fn(&Managed) -> bool,
{
    let graph = dependency_graph(&system, keys)?;
    let order = topological_order(&graph, keys)?.into_vec();
    run(system, order, operation, select).await
}

/// Like [`update_system`], but dependents first.
pub async fn update_system_reverse<O, P>(
    system: SystemMap,
    keys: &[Key],
    operation: &O,
    select: P,
) -> Result<SystemMap, LifecycleError>
where
    O: Operation + ?Sized,
    P: Fn(&Managed) -> bool,
{
    let graph = dependency_graph(&system, keys)?;
    let order = topological_order(&graph, keys)?.reversed();
    run(system, order, operation, select).await
}

/// Fold over `order`, carrying the system as the accumulator.
async fn run<O, P>(
    mut system: SystemMap,
    order: Vec<Key>,
    operation: &O,
    select: P,
) -> Result<SystemMap, LifecycleError>
where
    O: Operation + ?Sized,
    P: Fn(&Managed) -> bool,
{
    log::debug!("Calling {} on {:?}", operation.name(), order);

    for key in order {
        let managed = fetch_component(&system, &key)?;

        if !select(&managed) {
            log::warn!("Skipping {} for component '{}'", operation.name(), key);
            continue;
        }

        let managed = match inject_dependencies(&system, &key, managed) {
            Ok(managed) => managed,
            Err(err) => return Err(attach_snapshot(err, system)),
        };

        log::debug!("Calling {} on component '{}'", operation.name(), key);
        let outcome = operation.apply(managed.component(), managed.dependencies()).await;
        let transition = match outcome {
            Ok(transition) => transition,
            Err(source) => {
                log::warn!(
                    "Component '{}' failed during {}: {}",
                    key,
                    operation.name(),
                    source
                );
                return Err(LifecycleError::ComponentAction {
                    action: operation.name().to_string(),
                    key,
                    component: Some(Box::new(managed)),
                    system: Some(Box::new(system)),
                    source,
                });
            }
        };

        let updated = match transition {
            Transition::Unchanged => Some(managed),
            Transition::Replace(component) => Some(managed.replace_component(component)),
            Transition::Nil => {
                log::warn!("Component '{}' returned nothing from {}", key, operation.name());
                None
            }
        };
        system.put(key, updated);
    }

    Ok(system)
}

fn fetch_component(system: &SystemMap, key: &Key) -> Result<Managed, LifecycleError> {
    match system.slot(key) {
        None => Err(LifecycleError::MissingComponent { key: key.clone() }),
        Some(None) => Err(LifecycleError::NilComponent { key: key.clone() }),
        Some(Some(managed)) => Ok(managed.clone()),
    }
}

/// Resolve every declared dependency against the current system state.
fn inject_dependencies(
    system: &SystemMap,
    key: &Key,
    mut managed: Managed,
) -> Result<Managed, LifecycleError> {
    let wiring: Vec<(String, Key)> = managed
        .declaration()
        .iter()
        .map(|(field, dependency)| (field.clone(), dependency.clone()))
        .collect();

    for (field, dependency) in wiring {
        let resolved = match system.slot(&dependency) {
            None => {
                return Err(LifecycleError::MissingDependency {
                    key: key.clone(),
                    field,
                    dependency,
                    system: None,
                });
            }
            Some(None) => {
                return Err(LifecycleError::NilDependency {
                    key: key.clone(),
                    field,
                    dependency,
                    system: None,
                });
            }
            Some(Some(target)) => target.component_ref().clone(),
        };
        managed.inject(&field, resolved);
    }
    Ok(managed)
}

/// Attach the in-progress system to a dependency error.
fn attach_snapshot(err: LifecycleError, snapshot: SystemMap) -> LifecycleError {
    match err {
        LifecycleError::MissingDependency {
            key,
            field,
            dependency,
            ..
        } => LifecycleError::MissingDependency {
            key,
            field,
            dependency,
            system: Some(Box::new(snapshot)),
        },
        LifecycleError::NilDependency {
            key,
            field,
            dependency,
            ..
        } => LifecycleError::NilDependency {
            key,
            field,
            dependency,
            system: Some(Box::new(snapshot)),
        },
        other => other,
    }
}
