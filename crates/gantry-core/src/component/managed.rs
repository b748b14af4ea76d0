use std::sync::Arc;

use crate::component::{
    downcast_ref, Component, ComponentRef, Declaration, Dependencies, DependencySpec,
};

/// A component as stored in a system: the value itself plus its wiring.
///
/// The declaration travels with the component across transitions, so a
/// replacement returned from `start` keeps the dependencies declared on the
/// original. Equality is identity of the component value, not structural.
#[derive(Debug, Clone)]
pub struct Managed {
    component: ComponentRef,
    declaration: Declaration,
    injected: Dependencies,
}

impl Managed {
    /// Wrap a concrete component with no declared dependencies
    pub fn new<C: Component>(component: C) -> Self {
        Self::from_ref(Arc::new(component))
    }

    /// Wrap an existing component handle
    pub fn from_ref(component: ComponentRef) -> Self {
        Self {
            component,
            declaration: Declaration::new(),
            injected: Dependencies::new(),
        }
    }

    /// Declare dependencies, merging with any already declared.
    pub fn using(mut self, spec: impl Into<DependencySpec>) -> Self {
        self.declaration.merge(&spec.into());
        self
    }

    /// The accumulated dependency declaration
    pub fn declaration(&self) -> &Declaration {
        &self.declaration
    }

    /// Dependencies injected by the most recent lifecycle operation
    pub fn dependencies(&self) -> &Dependencies {
        &self.injected
    }

    /// Injected dependency for `field`, downcast to its concrete type
    pub fn dependency<T: Component>(&self, field: &str) -> Option<&T> {
        self.injected.get::<T>(field)
    }

    /// The component as a trait object
    pub fn component(&self) -> &dyn Component {
        self.component.as_ref()
    }

    /// The shared component handle
    pub fn component_ref(&self) -> &ComponentRef {
        &self.component
    }

    /// The component downcast to its concrete type
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        downcast_ref::<T>(self.component.as_ref())
    }

    pub(crate) fn inject(&mut self, field: &str, dependency: ComponentRef) {
        self.injected.insert(field, dependency);
    }

    pub(crate) fn replace_component(mut self, component: ComponentRef) -> Self {
        self.component = component;
        self
    }
}

impl From<ComponentRef> for Managed {
    fn from(component: ComponentRef) -> Self {
        Managed::from_ref(component)
    }
}

impl PartialEq for Managed {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.component, &other.component)
            && self.declaration == other.declaration
            && self.injected == other.injected
    }
}
