/*!
Class/method registry: string keys -> typed invocable handles.

Handles are registered through a typed builder and erased on insertion:

  registry
      .class::<Inventory>("App\\Inventory")
      .static_method("defaults", |_args| Ok(vec!["a", "b"]))
      .method("find", |inv, args| inv.find(required_str(args, 0, "sku")?));

Return values may be any `Serialize` type; they are captured as `serde_json::Value`
at call time so downstream serializers see one value model.
*/

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::collections::BTreeMap;
use std::marker::PhantomData;

use super::argument::Argument;
use super::normalize_class;
use crate::error::ResolutionError;

type StaticHandle = Box<dyn Fn(&[Argument]) -> Result<Value>>;
type InstanceHandle = Box<dyn Fn(&dyn Any, &[Argument]) -> Result<Value>>;

/// An erased method handle.
pub enum Handle {
    /// Called without a receiver.
    Static(StaticHandle),
    /// Called on an instance produced by the container.
    Instance(InstanceHandle),
}

impl Handle {
    pub fn is_static(&self) -> bool {
        matches!(self, Handle::Static(_))
    }
}

impl std::fmt::Debug for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(if self.is_static() { "Handle::Static" } else { "Handle::Instance" })
    }
}

/// All methods registered under one class name.
#[derive(Debug)]
struct ClassEntry {
    name: String,
    methods: BTreeMap<String, Handle>,
}

#[derive(Debug, Default)]
pub struct Registry {
    classes: BTreeMap<String, ClassEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open (or reopen) the entry for `name`; `T` is the receiver type of instance methods.
    pub fn class<T: 'static>(&mut self, name: &str) -> ClassBuilder<'_, T> {
        let key = normalize_class(name).to_string();
        let entry = self
            .classes
            .entry(key.clone())
            .or_insert_with(|| ClassEntry {
                name: key,
                methods: BTreeMap::new(),
            });
        ClassBuilder {
            entry,
            _receiver: PhantomData,
        }
    }

    /// Find the handle for `class::method`.
    pub fn lookup(&self, class: &str, method: &str) -> Result<&Handle, ResolutionError> {
        let key = normalize_class(class);
        let entry = self
            .classes
            .get(key)
            .ok_or_else(|| ResolutionError::UnknownClass(key.to_string()))?;
        entry
            .methods
            .get(method)
            .ok_or_else(|| ResolutionError::UnknownMethod {
                class: key.to_string(),
                method: method.to_string(),
            })
    }
}

/// Typed registration surface for one class.
pub struct ClassBuilder<'a, T> {
    entry: &'a mut ClassEntry,
    _receiver: PhantomData<fn(&T)>,
}

impl<T: 'static> ClassBuilder<'_, T> {
    pub fn static_method<R, F>(self, name: &str, f: F) -> Self
    where
        R: Serialize,
        F: Fn(&[Argument]) -> Result<R> + 'static,
    {
        let handle: StaticHandle = Box::new(move |args: &[Argument]| capture(f(args)?));
        self.entry
            .methods
            .insert(name.to_string(), Handle::Static(handle));
        self
    }

    pub fn method<R, F>(self, name: &str, f: F) -> Self
    where
        R: Serialize,
        F: Fn(&T, &[Argument]) -> Result<R> + 'static,
    {
        let class = self.entry.name.clone();
        let handle: InstanceHandle = Box::new(move |receiver: &dyn Any, args: &[Argument]| {
            let this = receiver
                .downcast_ref::<T>()
                .ok_or_else(|| ResolutionError::ReceiverType(class.clone()))?;
            capture(f(this, args)?)
        });
        self.entry
            .methods
            .insert(name.to_string(), Handle::Instance(handle));
        self
    }
}

fn capture<R: Serialize>(value: R) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}
