//! The service manager: registration and lazy resolution of services

use crate::{
    Instance,
    Parameters,
    alias::AliasRegistry,
    config::ManagerConfig,
    container::ServiceContainer,
    error::Error,
    injector::{Injector, ValueLookup},
    namespace::NamespaceRegistry,
    provider::ProviderRegistry,
    types::TypeRegistry
};
use indexmap::IndexSet;
use std::{
    collections::HashMap,
    error::Error as StdError,
    fmt::{Debug, Formatter},
    sync::Arc
};

#[cfg(feature = "tracing")]
use crate::tracing::TracingConfig;

/// A registered service
#[derive(Debug, Clone)]
enum ServiceEntry {
    /// Registered but not constructed yet, holds the constructor parameters
    Pending(Parameters),
    /// Constructed or explicitly set, never changes afterwards
    Resolved(Instance)
}

/// Outcome of a resolution attempt
enum Resolution {
    Unresolved,
    Resolvable,
    Resolved(Instance)
}

/// Registers services and resolves them lazily.
///
/// A request for a service is resolved strictly in the following order:
/// 1. A registered service, constructed once on first request and cached afterwards.
/// 2. The first registered [`ServiceProvider`](crate::ServiceProvider) that supports it, never cached.
/// 3. An alias, substituted by its target.
/// 4. A registered namespace, under which the service gets registered implicitly.
///
/// Construction is delegated to an [`Injector`], type checks to a [`TypeRegistry`].
/// While constructing, the injector may ask the manager back for the constructor
/// dependencies through the [`ValueLookup`] hook.
///
/// # Example
/// ```
/// use service_manager::{Catalog, Parameters, ServiceManager};
///
/// struct Logger;
///
/// let mut catalog = Catalog::new();
/// catalog.class("app.Logger").construct(|_| Ok(Logger));
///
/// let mut manager = ServiceManager::new(catalog);
/// manager.register("app.Logger", Parameters::new()).unwrap();
///
/// let first = manager.get("app.Logger").unwrap();
/// let second = manager.get("app.Logger").unwrap();
/// assert!(first.ptr_eq(&second));
/// ```
pub struct ServiceManager {
    pub(crate) types: Arc<dyn TypeRegistry>,
    pub(crate) injector: Arc<dyn Injector>,
    pub(crate) aliases: AliasRegistry,
    pub(crate) namespaces: NamespaceRegistry,
    pub(crate) providers: ProviderRegistry,
    pub(crate) config: ManagerConfig,
    #[cfg(feature = "tracing")]
    pub(crate) tracing_config: TracingConfig,
    services: HashMap<String, ServiceEntry>,
    resolving: IndexSet<String>
}

impl Debug for ServiceManager {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceManager")
            .field("services", &self.services.keys())
            .field("aliases", &self.aliases)
            .field("namespaces", &self.namespaces)
            .field("providers", &self.providers)
            .field("config", &self.config)
            .finish()
    }
}

impl ServiceManager {
    /// Creates a new service manager that uses `catalog` both as the type registry and the injector
    pub fn new<C>(catalog: C) -> Self
    where
        C: TypeRegistry + Injector + 'static
    {
        let catalog = Arc::new(catalog);
        Self::from_parts(catalog.clone(), catalog)
    }

    /// Creates a new service manager from a separate type registry and injector
    pub fn from_parts(types: Arc<dyn TypeRegistry>, injector: Arc<dyn Injector>) -> Self {
        let config = ManagerConfig::default();
        Self {
            types,
            injector,
            aliases: AliasRegistry::new(),
            namespaces: NamespaceRegistry::new(config.separator()),
            providers: ProviderRegistry::new(),
            config,
            #[cfg(feature = "tracing")]
            tracing_config: TracingConfig::default(),
            services: HashMap::new(),
            resolving: IndexSet::new()
        }
    }

    /// Returns the alias registry
    #[inline]
    pub fn aliases(&self) -> &AliasRegistry {
        &self.aliases
    }

    /// Returns the namespace registry
    #[inline]
    pub fn namespaces(&self) -> &NamespaceRegistry {
        &self.namespaces
    }

    /// Returns the provider registry
    #[inline]
    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    /// Returns a [`ServiceContainer`] that exposes only service retrieval
    #[inline]
    pub fn container(&mut self) -> ServiceContainer<'_> {
        ServiceContainer::new(self)
    }

    /// Registers a service that will be constructed with `params` on its first request
    pub fn register(&mut self, type_name: &str, params: Parameters) -> Result<(), Error> {
        if !self.types.exists(type_name) {
            return Err(Error::TypeUndefined(type_name.into()));
        }

        if self.services.contains_key(type_name) {
            return Err(Error::AlreadyRegistered(type_name.into()));
        }

        self.services.insert(type_name.into(), ServiceEntry::Pending(params));
        #[cfg(feature = "tracing")]
        tracing::debug!(service = type_name, "service registered");
        Ok(())
    }

    /// Sets an already constructed `instance` as the `type_name` service,
    /// registering the service first if needed.
    ///
    /// The instance type must be the service type itself, its subtype or its supertype.
    pub fn set(&mut self, type_name: &str, instance: Instance) -> Result<(), Error> {
        self.set_instance(type_name, instance, true)
    }

    /// Sets an already constructed `instance` as the previously registered `type_name` service
    pub fn set_registered(&mut self, type_name: &str, instance: Instance) -> Result<(), Error> {
        self.set_instance(type_name, instance, false)
    }

    /// Returns `true` if `type_name` can be resolved, without constructing anything.
    ///
    /// A type under a registered namespace gets registered implicitly.
    pub fn has(&mut self, type_name: &str) -> Result<bool, Error> {
        let resolution = self.resolve(type_name, Parameters::new(), false)?;
        Ok(!matches!(resolution, Resolution::Unresolved))
    }

    /// Resolves the `type_name` service
    #[inline]
    pub fn get(&mut self, type_name: &str) -> Result<Instance, Error> {
        self.get_with(type_name, Parameters::new())
    }

    /// Resolves the `type_name` service.
    ///
    /// The `params` reach a service provider, or register a service implicitly
    /// under a namespace. A registered service is always constructed
    /// with the parameters it was registered with.
    pub fn get_with(&mut self, type_name: &str, params: Parameters) -> Result<Instance, Error> {
        match self.resolve(type_name, params, true)? {
            Resolution::Resolved(instance) => Ok(instance),
            _ => {
                #[cfg(feature = "tracing")]
                tracing::debug!(service = type_name, "service not found");
                Err(Error::NotFound(type_name.into()))
            }
        }
    }

    /// Resolves the `type_name` service and downcasts it to `T`
    ///
    /// # Example
    /// ```
    /// use service_manager::{Catalog, Parameters, ServiceManager};
    ///
    /// struct Logger;
    ///
    /// let mut catalog = Catalog::new();
    /// catalog.class("app.Logger").construct(|_| Ok(Logger));
    ///
    /// let mut manager = ServiceManager::new(catalog);
    /// manager.register("app.Logger", Parameters::new()).unwrap();
    ///
    /// let logger = manager.get_as::<Logger>("app.Logger");
    /// assert!(logger.is_ok());
    /// ```
    pub fn get_as<T: Send + Sync + 'static>(&mut self, type_name: &str) -> Result<Arc<T>, Error> {
        self.get(type_name)?
            .downcast::<T>()
            .ok_or_else(|| Error::TypeMismatch {
                type_name: type_name.into(),
                expected: std::any::type_name::<T>()
            })
    }

    /// Constructs a new instance of `type_name` through the injector, bypassing the registries.
    ///
    /// Meant for service providers that construct the instances they hand out.
    /// Constructor dependencies are still resolved through this manager.
    pub fn instantiate(&mut self, type_name: &str, params: &Parameters) -> Result<Instance, Error> {
        self.inject(type_name, params)
    }

    fn set_instance(&mut self, type_name: &str, instance: Instance, auto_register: bool) -> Result<(), Error> {
        match self.services.get(type_name) {
            Some(ServiceEntry::Resolved(_)) => return Err(Error::AlreadySet(type_name.into())),
            Some(ServiceEntry::Pending(_)) => (),
            None if !auto_register => return Err(Error::NotFound(type_name.into())),
            None if !self.types.exists(type_name) => return Err(Error::TypeUndefined(type_name.into())),
            None => ()
        }

        let instance_type = instance.type_name();
        if instance_type != type_name && !self.types.is_related(instance_type, type_name) {
            return Err(Error::NotInstanceOf {
                instance: instance_type.into(),
                expected: type_name.into()
            });
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(service = type_name, instance = instance_type, "service set");

        self.services.insert(type_name.into(), ServiceEntry::Resolved(instance));
        Ok(())
    }

    fn resolve(&mut self, type_name: &str, params: Parameters, instantiate: bool) -> Result<Resolution, Error> {
        if self.services.contains_key(type_name) {
            return self.resolve_literal(type_name, instantiate);
        }

        if let Some(provider) = self.providers.provider_for(type_name) {
            if !instantiate {
                return Ok(Resolution::Resolvable);
            }
            return self
                .dispatch(provider, type_name, &params)
                .map(Resolution::Resolved);
        }

        let target = self.aliases
            .target(type_name)
            .unwrap_or(type_name)
            .to_owned();

        if !self.services.contains_key(&target) && self.namespaces.matches(&target) {
            self.register(&target, params)
                .map_err(|err| Error::resolution_failed(type_name, err))?;
        }

        self.resolve_literal(&target, instantiate)
    }

    fn resolve_literal(&mut self, type_name: &str, instantiate: bool) -> Result<Resolution, Error> {
        let params = match self.services.get(type_name) {
            None => return Ok(Resolution::Unresolved),
            Some(_) if !instantiate => return Ok(Resolution::Resolvable),
            Some(ServiceEntry::Resolved(instance)) => return Ok(Resolution::Resolved(instance.clone())),
            Some(ServiceEntry::Pending(params)) => params.clone()
        };

        self.construct(type_name, &params)
            .map(Resolution::Resolved)
    }

    fn construct(&mut self, type_name: &str, params: &Parameters) -> Result<Instance, Error> {
        let instance = self.inject(type_name, params)?;

        self.services.insert(type_name.into(), ServiceEntry::Resolved(instance.clone()));
        #[cfg(feature = "tracing")]
        tracing::debug!(service = type_name, "service constructed");

        if let Some(bootstrapper) = instance.bootstrapper() {
            bootstrapper
                .bootstrap(self)
                .map_err(|err| Error::resolution_failed(type_name, err))?;
            #[cfg(feature = "tracing")]
            tracing::debug!(service = type_name, "service bootstrapped");
        }

        Ok(instance)
    }

    /// Runs the injector for `type_name`, failing fast if it is already being instantiated
    fn inject(&mut self, type_name: &str, params: &Parameters) -> Result<Instance, Error> {
        if self.config.detect_cycles() && self.resolving.contains(type_name) {
            let mut chain = self.resolving
                .iter()
                .skip_while(|service| service.as_str() != type_name)
                .cloned()
                .collect::<Vec<_>>();
            chain.push(type_name.into());
            return Err(Error::CyclicDependency(chain));
        }

        #[cfg(feature = "tracing")]
        let _span = self.resolution_span(type_name);

        let injector = self.injector.clone();
        let entered = self.resolving.insert(type_name.into());
        let result = injector.instantiate(type_name, params, self);
        if entered {
            self.resolving.shift_remove(type_name);
        }

        result.map_err(|err| {
            #[cfg(feature = "tracing")]
            tracing::debug!(service = type_name, error = %err, "service construction failed");
            match find_cycle(&*err) {
                Some(chain) => Error::CyclicDependency(chain),
                None => Error::resolution_failed(type_name, err)
            }
        })
    }
}

impl ValueLookup for ServiceManager {
    fn lookup(&mut self, name: &str, type_name: &str) -> Result<Option<Instance>, Error> {
        #[cfg(feature = "tracing")]
        tracing::trace!(parameter = name, service = type_name, "looking up a dependency");
        #[cfg(not(feature = "tracing"))]
        let _ = name;

        if self.has(type_name)? {
            self.get(type_name).map(Some)
        } else {
            Ok(None)
        }
    }
}

/// Finds a cyclic dependency error anywhere in the `source` chain
fn find_cycle(err: &(dyn StdError + 'static)) -> Option<Vec<String>> {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(Error::CyclicDependency(chain)) = err.downcast_ref::<Error>() {
            return Some(chain.clone());
        }
        current = err.source();
    }
    None
}
