//! Factory registry used to construct receivers for instance methods.
//!
//! `bind` records how to build a class; `make` runs that factory. Factories receive the
//! container so they can resolve their own dependencies. A factory's error is returned
//! as-is (no extra context) so callers can still downcast it.

use anyhow::Result;
use std::any::Any;
use std::collections::HashMap;

use super::normalize_class;
use crate::error::ResolutionError;

/// A constructed, type-erased receiver.
pub type Instance = Box<dyn Any>;

type Factory = Box<dyn Fn(&Container) -> Result<Instance>>;

#[derive(Default)]
pub struct Container {
    factories: HashMap<String, Factory>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the factory for `class`.
    pub fn bind<T, F>(&mut self, class: &str, factory: F) -> &mut Self
    where
        T: 'static,
        F: Fn(&Container) -> Result<T> + 'static,
    {
        self.factories.insert(
            normalize_class(class).to_string(),
            Box::new(move |c: &Container| factory(c).map(|v| Box::new(v) as Instance)),
        );
        self
    }

    /// Construct a fresh instance of `class`.
    pub fn make(&self, class: &str) -> Result<Instance> {
        let key = normalize_class(class);
        let factory = self
            .factories
            .get(key)
            .ok_or_else(|| ResolutionError::NotInstantiable(key.to_string()))?;
        factory(self)
    }

    /// Construct `class` and downcast it to `T` (for factories resolving dependencies).
    pub fn make_as<T: 'static>(&self, class: &str) -> Result<T> {
        let instance = self.make(class)?;
        instance
            .downcast::<T>()
            .map(|b| *b)
            .map_err(|_| ResolutionError::ReceiverType(normalize_class(class).to_string()).into())
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&String> = self.factories.keys().collect();
        keys.sort();
        f.debug_struct("Container").field("bindings", &keys).finish()
    }
}
