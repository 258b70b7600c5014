/*!
Target resolution and invocation.

  registry.rs   class/method names -> erased handles (static or instance)
  container.rs  class names -> factories for receivers
  argument.rs   raw token coercion (null/true/false)

`Resolver::resolve` looks the handle up and, for instance methods only, asks the
container for a receiver. `Target::invoke` then calls the handle. Neither step
catches the invoked code's errors.
*/

pub mod argument;
pub mod container;
pub mod registry;

use anyhow::Result;
use serde_json::Value;
use std::any::Any;

pub use argument::{Argument, coerce_arguments, required_str};
pub use container::{Container, Instance};
pub use registry::{Handle, Registry};

use crate::{log_debug, log_trace};

/// Strip one leading namespace separator (`\App\Foo` names the same class as `App\Foo`).
pub(crate) fn normalize_class(name: &str) -> &str {
    name.strip_prefix('\\').unwrap_or(name)
}

/// What the user asked to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    pub class_name: String,
    pub method_name: String,
    pub raw_arguments: Vec<String>,
}

impl InvocationRequest {
    pub fn new(
        class_name: impl Into<String>,
        method_name: impl Into<String>,
        raw_arguments: Vec<String>,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            method_name: method_name.into(),
            raw_arguments,
        }
    }
}

/// Looks up handles and builds receivers.
pub struct Resolver<'a> {
    registry: &'a Registry,
    container: &'a Container,
}

pub type StaticFn = dyn Fn(&[Argument]) -> Result<Value>;
pub type InstanceFn = dyn Fn(&dyn Any, &[Argument]) -> Result<Value>;

/// A resolved method, bound to its receiver when it has one.
pub enum Target<'a> {
    Static(&'a StaticFn),
    Bound(&'a InstanceFn, Instance),
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a Registry, container: &'a Container) -> Self {
        Self {
            registry,
            container,
        }
    }

    pub fn resolve(&self, class_name: &str, method_name: &str) -> Result<Target<'a>> {
        let target = match self.registry.lookup(class_name, method_name)? {
            Handle::Static(f) => Target::Static(&**f),
            Handle::Instance(f) => {
                log_debug!("constructing receiver for {class_name}");
                Target::Bound(&**f, self.container.make(class_name)?)
            }
        };
        log_debug!(
            "resolved {class_name}::{method_name} ({})",
            if target.is_static() { "static" } else { "instance" }
        );
        Ok(target)
    }
}

impl Target<'_> {
    pub fn is_static(&self) -> bool {
        matches!(self, Target::Static(_))
    }

    pub fn invoke(&self, args: &[Argument]) -> Result<Value> {
        match self {
            Target::Static(f) => f(args),
            Target::Bound(f, receiver) => f(&**receiver, args),
        }
    }
}

/// Resolve, coerce and invoke in one step; returns the captured return value.
pub fn get_method_output(
    request: &InvocationRequest,
    registry: &Registry,
    container: &Container,
) -> Result<Value> {
    let target = Resolver::new(registry, container)
        .resolve(&request.class_name, &request.method_name)?;
    let args = coerce_arguments(&request.raw_arguments);
    log_trace!("raw arguments: {:?}", request.raw_arguments);
    log_trace!(
        "coerced arguments: [{}]",
        args.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(", ")
    );
    target.invoke(&args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolutionError;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Repo {
        rows: Vec<&'static str>,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("boom from method")]
    struct Boom;

    #[derive(Debug, thiserror::Error)]
    #[error("constructor exploded")]
    struct CtorFailed;

    fn fixture() -> (Registry, Container, Rc<Cell<usize>>) {
        let built = Rc::new(Cell::new(0));
        let mut registry = Registry::new();
        registry
            .class::<Repo>("App\\Repo")
            .static_method("echo", |args| Ok(args.to_vec()))
            .static_method("explode", |_| -> Result<()> { Err(Boom.into()) })
            .method("rows", |repo, _| Ok(repo.rows.clone()));
        registry
            .class::<Repo>("App\\Broken")
            .method("rows", |repo, _| Ok(repo.rows.clone()));
        let mut container = Container::new();
        let counter = Rc::clone(&built);
        container.bind("App\\Repo", move |_| {
            counter.set(counter.get() + 1);
            Ok(Repo {
                rows: vec!["a", "b"],
            })
        });
        container.bind::<Repo, _>("App\\Broken", |_| Err(CtorFailed.into()));
        (registry, container, built)
    }

    fn request(class: &str, method: &str, args: &[&str]) -> InvocationRequest {
        InvocationRequest::new(class, method, args.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn static_call_never_constructs() {
        let (r, c, built) = fixture();
        let out = get_method_output(&request("App\\Repo", "echo", &["null", "true", "3"]), &r, &c)
            .unwrap();
        assert_eq!(out, serde_json::json!([null, true, "3"]));
        assert_eq!(built.get(), 0);
    }

    #[test]
    fn instance_call_constructs_once() {
        let (r, c, built) = fixture();
        let target = Resolver::new(&r, &c).resolve("App\\Repo", "rows").unwrap();
        assert!(!target.is_static());
        assert_eq!(built.get(), 1);
        assert_eq!(target.invoke(&[]).unwrap(), serde_json::json!(["a", "b"]));
        assert_eq!(built.get(), 1);
    }

    #[test]
    fn unknown_method_fails_before_construction() {
        let (r, c, built) = fixture();
        let err = get_method_output(&request("App\\Repo", "missing", &[]), &r, &c).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ResolutionError>(),
            Some(ResolutionError::UnknownMethod { .. })
        ));
        assert_eq!(built.get(), 0);
    }

    #[test]
    fn unknown_class_is_resolution_error() {
        let (r, c, _) = fixture();
        let err = get_method_output(&request("App\\Ghost", "rows", &[]), &r, &c).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ResolutionError>(),
            Some(&ResolutionError::UnknownClass("App\\Ghost".into()))
        );
    }

    #[test]
    fn construction_failure_propagates_unmodified() {
        let (r, c, _) = fixture();
        let err = get_method_output(&request("App\\Broken", "rows", &[]), &r, &c).unwrap_err();
        assert!(err.downcast_ref::<CtorFailed>().is_some());
    }

    #[test]
    fn invocation_failure_propagates() {
        let (r, c, _) = fixture();
        let err = get_method_output(&request("App\\Repo", "explode", &[]), &r, &c).unwrap_err();
        assert!(err.downcast_ref::<Boom>().is_some());
    }

    #[test]
    fn null_return_is_captured() {
        let mut r = Registry::new();
        r.class::<()>("App\\Void").static_method("nothing", |_| Ok(None::<u8>));
        let out = get_method_output(&request("App\\Void", "nothing", &[]), &r, &Container::new())
            .unwrap();
        assert!(out.is_null());
    }
}
