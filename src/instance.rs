//! Constructed services and constructor parameters

use crate::{bootstrap::Bootstrapper, provider::ServiceProvider};
use indexmap::{IndexMap, map::Iter};
use serde::Deserialize;
use serde_json::Value;
use std::{
    any::Any,
    fmt::{Debug, Formatter},
    sync::Arc
};

type ArcService = Arc<
    dyn Any
    + Send
    + Sync
>;

/// A constructed object together with the name of its concrete type.
///
/// Optional capabilities are declared when the instance is created,
/// so the [`ServiceManager`](crate::ServiceManager) never needs to probe the value:
/// - [`Instance::new`] - a plain service
/// - [`Instance::bootstrapped`] - a service with a [`Bootstrapper`] hook
/// - [`Instance::provider`] - a [`ServiceProvider`]
/// - [`Instance::bootstrapped_provider`] - a [`ServiceProvider`] with a [`Bootstrapper`] hook
///
/// Cloning an [`Instance`] is cheap and keeps pointing to the same value.
#[derive(Clone)]
pub struct Instance {
    type_name: Arc<str>,
    value: ArcService,
    bootstrapper: Option<Arc<dyn Bootstrapper>>,
    provider: Option<Arc<dyn ServiceProvider>>
}

impl Debug for Instance {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("type_name", &self.type_name)
            .field("bootstrapper", &self.bootstrapper.is_some())
            .field("provider", &self.provider.is_some())
            .finish()
    }
}

impl Instance {
    /// Wraps a plain service value
    #[inline]
    pub fn new<T: Send + Sync + 'static>(type_name: impl Into<Arc<str>>, value: T) -> Self {
        Self::from_arc(type_name, Arc::new(value))
    }

    /// Wraps an already shared service value
    #[inline]
    pub fn from_arc<T: Send + Sync + 'static>(type_name: impl Into<Arc<str>>, value: Arc<T>) -> Self {
        Self {
            type_name: type_name.into(),
            value: value as ArcService,
            bootstrapper: None,
            provider: None
        }
    }

    /// Wraps a service that has to be bootstrapped right after its construction
    pub fn bootstrapped<T: Bootstrapper + 'static>(type_name: impl Into<Arc<str>>, value: T) -> Self {
        let value = Arc::new(value);
        Self {
            bootstrapper: Some(value.clone() as Arc<dyn Bootstrapper>),
            ..Self::from_arc(type_name, value)
        }
    }

    /// Wraps a service provider
    pub fn provider<T: ServiceProvider + 'static>(type_name: impl Into<Arc<str>>, value: T) -> Self {
        let value = Arc::new(value);
        Self {
            provider: Some(value.clone() as Arc<dyn ServiceProvider>),
            ..Self::from_arc(type_name, value)
        }
    }

    /// Wraps a service provider that has to be bootstrapped right after its registration
    pub fn bootstrapped_provider<T>(type_name: impl Into<Arc<str>>, value: T) -> Self
    where
        T: ServiceProvider + Bootstrapper + 'static
    {
        let value = Arc::new(value);
        Self {
            bootstrapper: Some(value.clone() as Arc<dyn Bootstrapper>),
            provider: Some(value.clone() as Arc<dyn ServiceProvider>),
            ..Self::from_arc(type_name, value)
        }
    }

    /// Returns the name of the concrete type of this instance
    #[inline]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns a shared pointer to the value if it is a `T`
    #[inline]
    pub fn downcast<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.value
            .clone()
            .downcast::<T>()
            .ok()
    }

    /// Returns `true` if both instances point to the same value
    #[inline]
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }

    #[inline]
    pub(crate) fn bootstrapper(&self) -> Option<Arc<dyn Bootstrapper>> {
        self.bootstrapper.clone()
    }

    #[inline]
    pub(crate) fn as_provider(&self) -> Option<Arc<dyn ServiceProvider>> {
        self.provider.clone()
    }
}

/// A single named constructor parameter
#[derive(Debug, Clone)]
pub enum Parameter {
    /// A plain value
    Value(Value),
    /// An already constructed service
    Service(Instance)
}

impl From<Value> for Parameter {
    #[inline]
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Instance> for Parameter {
    #[inline]
    fn from(instance: Instance) -> Self {
        Self::Service(instance)
    }
}

/// Ordered map of named constructor parameters
///
/// # Example
/// ```
/// use service_manager::Parameters;
///
/// let params = Parameters::new()
///     .with("host", "smtp.local")
///     .with("port", 25);
///
/// assert_eq!(params.len(), 2);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "IndexMap<String, Value>")]
pub struct Parameters {
    inner: IndexMap<String, Parameter>
}

impl From<IndexMap<String, Value>> for Parameters {
    fn from(map: IndexMap<String, Value>) -> Self {
        let inner = map
            .into_iter()
            .map(|(name, value)| (name, Parameter::Value(value)))
            .collect();
        Self { inner }
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = (&'a String, &'a Parameter);
    type IntoIter = Iter<'a, String, Parameter>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl Parameters {
    /// Creates an empty parameter map
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a plain value parameter
    #[inline]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, Parameter::Value(value.into()));
        self
    }

    /// Adds an already constructed service as a parameter
    #[inline]
    pub fn with_service(mut self, name: impl Into<String>, instance: Instance) -> Self {
        self.insert(name, Parameter::Service(instance));
        self
    }

    /// Inserts a parameter, replacing the previous one with the same name
    #[inline]
    pub fn insert(&mut self, name: impl Into<String>, param: impl Into<Parameter>) {
        self.inner.insert(name.into(), param.into());
    }

    /// Returns the parameter with the given name
    #[inline]
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.inner.get(name)
    }

    /// Returns the number of parameters
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if there are no parameters
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates over the parameters in insertion order
    #[inline]
    pub fn iter(&self) -> Iter<'_, String, Parameter> {
        self.inner.iter()
    }
}
