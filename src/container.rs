//! Read-only view over the [`ServiceManager`]

use crate::{Instance, ServiceManager, error::Error};
use std::sync::Arc;

/// Exposes only service retrieval of a [`ServiceManager`] to application code,
/// while registration stays with the code that bootstraps the application.
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
/// let mut container = manager.container();
/// assert!(container.has("app.Logger").unwrap());
/// assert!(container.get_as::<Logger>("app.Logger").is_ok());
/// ```
#[derive(Debug)]
pub struct ServiceContainer<'a> {
    manager: &'a mut ServiceManager
}

impl<'a> ServiceContainer<'a> {
    /// Creates a container over `manager`
    #[inline]
    pub fn new(manager: &'a mut ServiceManager) -> Self {
        Self { manager }
    }

    /// Resolves the `type_name` service
    #[inline]
    pub fn get(&mut self, type_name: &str) -> Result<Instance, Error> {
        self.manager.get(type_name)
    }

    /// Resolves the `type_name` service and downcasts it to `T`
    #[inline]
    pub fn get_as<T: Send + Sync + 'static>(&mut self, type_name: &str) -> Result<Arc<T>, Error> {
        self.manager.get_as::<T>(type_name)
    }

    /// Returns `true` if `type_name` can be resolved
    #[inline]
    pub fn has(&mut self, type_name: &str) -> Result<bool, Error> {
        self.manager.has(type_name)
    }
}
