//! In-memory type catalog that acts as both [`TypeRegistry`] and [`Injector`]

use crate::{
    Bootstrapper,
    Instance,
    Parameter,
    Parameters,
    ServiceProvider,
    error::BoxError,
    injector::{InjectError, Injector, ValueLookup},
    provider::PROVIDER_CONTRACT,
    types::TypeRegistry
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use smallvec::{SmallVec, smallvec};
use std::{
    collections::{HashMap, HashSet},
    fmt::{Debug, Formatter},
    sync::Arc
};

type Constructor = Arc<
    dyn Fn(&str, &Arguments) -> Result<Instance, BoxError>
    + Send
    + Sync
>;

#[derive(Debug, Clone)]
enum ParamKind {
    Value(Option<Value>),
    Service(String)
}

#[derive(Debug, Clone)]
struct ParamDef {
    name: String,
    kind: ParamKind
}

/// Describes a single type: its parents, constructor parameters and constructor
pub struct TypeDef {
    parents: SmallVec<[String; 2]>,
    params: SmallVec<[ParamDef; 4]>,
    constructor: Option<Constructor>
}

impl Debug for TypeDef {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeDef")
            .field("parents", &self.parents)
            .field("params", &self.params)
            .field("instantiable", &self.constructor.is_some())
            .finish()
    }
}

impl TypeDef {
    #[inline]
    fn new() -> Self {
        Self {
            parents: SmallVec::new(),
            params: SmallVec::new(),
            constructor: None
        }
    }

    /// Declares `parent` as a direct supertype of this type
    pub fn implements(&mut self, parent: impl Into<String>) -> &mut Self {
        let parent = parent.into();
        if !self.parents.contains(&parent) {
            self.parents.push(parent);
        }
        self
    }

    /// Declares a required value parameter
    pub fn param(&mut self, name: impl Into<String>) -> &mut Self {
        self.push_param(name, ParamKind::Value(None))
    }

    /// Declares a value parameter that falls back to `default`
    pub fn param_or(&mut self, name: impl Into<String>, default: impl Into<Value>) -> &mut Self {
        self.push_param(name, ParamKind::Value(Some(default.into())))
    }

    /// Declares a parameter that is satisfied by a service of `type_name`
    /// through the injector's lookup hook, unless passed explicitly.
    pub fn dependency(&mut self, name: impl Into<String>, type_name: impl Into<String>) -> &mut Self {
        self.push_param(name, ParamKind::Service(type_name.into()))
    }

    /// Sets a constructor producing a plain service
    pub fn construct<T, F>(&mut self, f: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Arguments) -> Result<T, BoxError> + Send + Sync + 'static
    {
        self.constructor(f, |name: Arc<str>, value: T| Instance::new(name, value))
    }

    /// Sets a constructor producing a service with a bootstrap hook
    pub fn bootstrapped<T, F>(&mut self, f: F) -> &mut Self
    where
        T: Bootstrapper + 'static,
        F: Fn(&Arguments) -> Result<T, BoxError> + Send + Sync + 'static
    {
        self.constructor(f, |name: Arc<str>, value: T| Instance::bootstrapped(name, value))
    }

    /// Sets a constructor producing a service provider.
    ///
    /// The type implicitly implements the service provider contract.
    pub fn provider<T, F>(&mut self, f: F) -> &mut Self
    where
        T: ServiceProvider + 'static,
        F: Fn(&Arguments) -> Result<T, BoxError> + Send + Sync + 'static
    {
        self.implements(PROVIDER_CONTRACT)
            .constructor(f, |name: Arc<str>, value: T| Instance::provider(name, value))
    }

    /// Sets a constructor producing a service provider with a bootstrap hook.
    ///
    /// The type implicitly implements the service provider contract.
    pub fn bootstrapped_provider<T, F>(&mut self, f: F) -> &mut Self
    where
        T: ServiceProvider + Bootstrapper + 'static,
        F: Fn(&Arguments) -> Result<T, BoxError> + Send + Sync + 'static
    {
        self.implements(PROVIDER_CONTRACT)
            .constructor(f, |name: Arc<str>, value: T| Instance::bootstrapped_provider(name, value))
    }

    #[inline]
    fn push_param(&mut self, name: impl Into<String>, kind: ParamKind) -> &mut Self {
        self.params.push(ParamDef { name: name.into(), kind });
        self
    }

    fn constructor<T, F, S>(&mut self, f: F, shape: S) -> &mut Self
    where
        T: 'static,
        F: Fn(&Arguments) -> Result<T, BoxError> + Send + Sync + 'static,
        S: Fn(Arc<str>, T) -> Instance + Send + Sync + 'static
    {
        self.constructor = Some(Arc::new(move |type_name: &str, args: &Arguments| {
            f(args).map(|value| shape(type_name.into(), value))
        }));
        self
    }
}

/// Arguments passed to a constructor registered in the [`Catalog`]
#[derive(Debug, Clone)]
pub struct Arguments {
    type_name: String,
    values: Parameters
}

impl Arguments {
    /// Name of the type being constructed
    #[inline]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns a raw argument
    #[inline]
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.values.get(name)
    }

    /// Deserializes a value argument into `T`
    pub fn value<T: DeserializeOwned>(&self, name: &str) -> Result<T, InjectError> {
        match self.get(name) {
            Some(Parameter::Value(value)) => serde_json::from_value(value.clone())
                .map_err(|err| self.invalid(name, err.to_string())),
            Some(Parameter::Service(instance)) => Err(self.invalid(
                name,
                format!("expected a value, found an instance of {}", instance.type_name()))),
            None => Err(self.unresolved(name))
        }
    }

    /// Returns a service argument as `T`
    pub fn service<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>, InjectError> {
        let instance = self.instance(name)?;
        instance
            .downcast::<T>()
            .ok_or_else(|| self.invalid(
                name,
                format!("{} is not a {}", instance.type_name(), std::any::type_name::<T>())))
    }

    /// Returns a service argument as an [`Instance`]
    pub fn instance(&self, name: &str) -> Result<&Instance, InjectError> {
        match self.get(name) {
            Some(Parameter::Service(instance)) => Ok(instance),
            Some(Parameter::Value(_)) => Err(self.invalid(name, "expected a service, found a value".into())),
            None => Err(self.unresolved(name))
        }
    }

    #[inline]
    fn invalid(&self, name: &str, reason: String) -> InjectError {
        InjectError::InvalidArgument {
            parameter: name.into(),
            reason
        }
    }

    #[inline]
    fn unresolved(&self, name: &str) -> InjectError {
        InjectError::Unresolved {
            type_name: self.type_name.clone(),
            parameter: name.into()
        }
    }
}

/// An in-memory catalog of types.
///
/// Serves as the [`TypeRegistry`] and the [`Injector`] of a [`ServiceManager`](crate::ServiceManager).
/// Every type is identified by its name; classes carry a constructor, interfaces don't.
///
/// When instantiating, each declared parameter is taken from the passed parameters by name.
/// Missing dependencies are requested from the lookup hook by their declared type,
/// missing values fall back to their defaults.
///
/// # Example
/// ```
/// use service_manager::{Catalog, Parameters, ServiceManager};
///
/// struct Mailer {
///     host: String
/// }
///
/// let mut catalog = Catalog::new();
/// catalog.class("app.Mailer")
///     .param("host")
///     .construct(|args| Ok(Mailer { host: args.value("host")? }));
///
/// let mut manager = ServiceManager::new(catalog);
/// manager.register("app.Mailer", Parameters::new().with("host", "smtp.local")).unwrap();
///
/// let mailer = manager.get_as::<Mailer>("app.Mailer").unwrap();
/// assert_eq!(mailer.host, "smtp.local");
/// ```
#[derive(Debug)]
pub struct Catalog {
    types: HashMap<String, TypeDef>
}

impl Default for Catalog {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Creates a catalog that knows only the service provider contract
    pub fn new() -> Self {
        let mut catalog = Self { types: HashMap::new() };
        catalog.interface(PROVIDER_CONTRACT);
        catalog
    }

    /// Declares an interface, a type that can't be instantiated
    #[inline]
    pub fn interface(&mut self, name: impl Into<String>) -> &mut TypeDef {
        self.define(name)
    }

    /// Declares a class, a constructor has to be set on the returned [`TypeDef`]
    #[inline]
    pub fn class(&mut self, name: impl Into<String>) -> &mut TypeDef {
        self.define(name)
    }

    /// Returns the number of known types
    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no type is defined
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    #[inline]
    fn define(&mut self, name: impl Into<String>) -> &mut TypeDef {
        self.types
            .entry(name.into())
            .and_modify(|def| *def = TypeDef::new())
            .or_insert_with(TypeDef::new)
    }

    fn resolve_param(
        &self,
        type_name: &str,
        param: &ParamDef,
        lookup: &mut dyn ValueLookup
    ) -> Result<Parameter, InjectError> {
        match &param.kind {
            ParamKind::Service(dependency) => match lookup.lookup(&param.name, dependency) {
                Ok(Some(instance)) => Ok(Parameter::Service(instance)),
                Ok(None) => Err(InjectError::Unresolved {
                    type_name: type_name.into(),
                    parameter: param.name.clone()
                }),
                Err(source) => Err(InjectError::Lookup {
                    parameter: param.name.clone(),
                    source
                })
            },
            ParamKind::Value(Some(default)) => Ok(Parameter::Value(default.clone())),
            ParamKind::Value(None) => Err(InjectError::Unresolved {
                type_name: type_name.into(),
                parameter: param.name.clone()
            })
        }
    }
}

impl TypeRegistry for Catalog {
    #[inline]
    fn exists(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    fn is_subtype_of(&self, type_name: &str, parent: &str) -> bool {
        let mut stack: SmallVec<[&str; 8]> = smallvec![type_name];
        let mut visited = HashSet::new();
        while let Some(current) = stack.pop() {
            let Some(def) = self.types.get(current) else {
                continue;
            };
            for candidate in &def.parents {
                if candidate == parent {
                    return true;
                }
                if visited.insert(candidate.as_str()) {
                    stack.push(candidate.as_str());
                }
            }
        }
        false
    }
}

impl Injector for Catalog {
    fn instantiate(
        &self,
        type_name: &str,
        params: &Parameters,
        lookup: &mut dyn ValueLookup
    ) -> Result<Instance, BoxError> {
        let def = self.types
            .get(type_name)
            .ok_or_else(|| InjectError::TypeUndefined(type_name.into()))?;
        let constructor = def.constructor
            .as_ref()
            .ok_or_else(|| InjectError::NotInstantiable(type_name.into()))?;

        let mut values = params.clone();
        for param in &def.params {
            if values.get(&param.name).is_none() {
                let value = self.resolve_param(type_name, param, lookup)?;
                values.insert(param.name.clone(), value);
            }
        }

        let args = Arguments {
            type_name: type_name.into(),
            values
        };
        constructor(type_name, &args)
    }
}
