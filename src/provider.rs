//! Service providers producing services on demand

use crate::{
    Instance,
    Parameters,
    ServiceManager,
    error::{BoxError, Error}
};
use indexmap::IndexMap;
use std::{
    fmt::{Debug, Formatter},
    sync::Arc
};

/// Type name of the contract every service provider type has to implement
pub const PROVIDER_CONTRACT: &str = "service_manager.ServiceProvider";

/// A trait for objects that produce services of the types they support.
///
/// Provider output is never cached by the [`ServiceManager`], every request
/// reaches [`handle`](ServiceProvider::handle), so a provider decides on its own
/// whether to hand out a shared or a fresh instance.
///
/// # Example
/// ```
/// use service_manager::{Instance, Parameters, ServiceManager, ServiceProvider, error::BoxError};
///
/// struct Clock;
///
/// impl ServiceProvider for Clock {
///     fn supports(&self, type_name: &str) -> bool {
///         type_name == "app.Now"
///     }
///
///     fn handle(&self, type_name: &str, _: &Parameters, _: &mut ServiceManager) -> Result<Instance, BoxError> {
///         Ok(Instance::new(type_name, std::time::SystemTime::now()))
///     }
/// }
/// ```
pub trait ServiceProvider: Send + Sync {
    /// Returns `true` if this provider can produce `type_name`
    fn supports(&self, type_name: &str) -> bool;

    /// Produces an instance of `type_name`
    fn handle(
        &self,
        type_name: &str,
        params: &Parameters,
        manager: &mut ServiceManager
    ) -> Result<Instance, BoxError>;

    /// Returns `true` if the provider is expected to hand out the same instance
    /// for every request of `type_name`.
    ///
    /// Purely informational, the [`ServiceManager`] never relies on it.
    #[inline]
    fn is_singleton_expected(&self, _type_name: &str) -> bool {
        true
    }
}

/// Registered service providers, queried in registration order
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: IndexMap<String, Arc<dyn ServiceProvider>>
}

impl Debug for ProviderRegistry {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set()
            .entries(self.providers.keys())
            .finish()
    }
}

impl ProviderRegistry {
    /// Creates an empty provider registry
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if a provider of the `provider` type is registered
    #[inline]
    pub fn has_provider(&self, provider: &str) -> bool {
        self.providers.contains_key(provider)
    }

    /// Returns the registered provider of the `provider` type
    pub fn get_provider(&self, provider: &str) -> Result<Arc<dyn ServiceProvider>, Error> {
        self.providers
            .get(provider)
            .cloned()
            .ok_or_else(|| Error::ProviderNotRegistered(provider.into()))
    }

    /// Returns the first registered provider that supports `type_name`
    pub fn provider_for(&self, type_name: &str) -> Option<Arc<dyn ServiceProvider>> {
        self.providers
            .values()
            .find(|provider| provider.supports(type_name))
            .cloned()
    }

    /// Returns `true` if any registered provider supports `type_name`
    #[inline]
    pub fn supports(&self, type_name: &str) -> bool {
        self.providers
            .values()
            .any(|provider| provider.supports(type_name))
    }

    /// Iterates over the provider type names in registration order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    /// Returns the number of registered service providers
    #[inline]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns `true` if no service provider is registered
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl ServiceManager {
    /// Constructs and registers a service provider of the `provider` type.
    ///
    /// The provider type must implement [`PROVIDER_CONTRACT`].
    /// If the provider has a bootstrap hook, it runs right after the registration.
    pub fn register_provider(&mut self, provider: &str, params: Parameters) -> Result<(), Error> {
        if !self.types.exists(provider) {
            return Err(Error::ProviderTypeUndefined(provider.into()));
        }

        if self.providers.has_provider(provider) {
            return Err(Error::ProviderAlreadyRegistered(provider.into()));
        }

        if !self.types.is_subtype_of(provider, PROVIDER_CONTRACT) {
            return Err(Error::ProviderMissingContract(provider.into()));
        }

        let injector = self.injector.clone();
        let instance = injector
            .instantiate(provider, &params, self)
            .map_err(|err| Error::provider_registration_failed(provider, err))?;

        let Some(service_provider) = instance.as_provider() else {
            return Err(Error::ProviderMissingContract(provider.into()));
        };

        self.providers
            .providers
            .insert(provider.into(), service_provider);

        #[cfg(feature = "tracing")]
        tracing::debug!(provider, "service provider registered");

        if let Some(bootstrapper) = instance.bootstrapper() {
            bootstrapper
                .bootstrap(self)
                .map_err(|err| Error::provider_registration_failed(provider, err))?;

            #[cfg(feature = "tracing")]
            tracing::debug!(provider, "service provider bootstrapped");
        }

        Ok(())
    }

    /// Asks the providers directly for an instance of `type_name`, bypassing
    /// registered services, aliases and namespaces.
    pub fn provide(&mut self, type_name: &str, params: &Parameters) -> Result<Instance, Error> {
        let provider = self.providers
            .provider_for(type_name)
            .ok_or_else(|| Error::NoProviderForService(type_name.into()))?;
        self.dispatch(provider, type_name, params)
    }

    pub(crate) fn dispatch(
        &mut self,
        provider: Arc<dyn ServiceProvider>,
        type_name: &str,
        params: &Parameters
    ) -> Result<Instance, Error> {
        #[cfg(feature = "tracing")]
        tracing::debug!(service = type_name, "dispatching to service provider");

        provider
            .handle(type_name, params, self)
            .map_err(|err| Error::resolution_failed(type_name, err))
    }
}
