//! Post-construction hook for services and providers

use crate::{ServiceManager, error::BoxError};

/// A trait for services and providers that need one-time access to the [`ServiceManager`]
/// right after they have been constructed.
///
/// The hook is invoked only for direct services and service providers,
/// never for instances produced by a provider's [`handle`](crate::ServiceProvider::handle).
/// It runs at most once per instance, after the instance has been cached.
///
/// Declare the capability with [`Instance::bootstrapped`](crate::Instance::bootstrapped)
/// or [`Instance::bootstrapped_provider`](crate::Instance::bootstrapped_provider).
///
/// # Example
/// ```
/// use service_manager::{Bootstrapper, ServiceManager, error::BoxError};
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// #[derive(Default)]
/// struct Router {
///     ready: AtomicBool
/// }
///
/// impl Bootstrapper for Router {
///     fn bootstrap(&self, manager: &mut ServiceManager) -> Result<(), BoxError> {
///         manager.register_namespace("app.routes")?;
///         self.ready.store(true, Ordering::SeqCst);
///         Ok(())
///     }
/// }
/// ```
pub trait Bootstrapper: Send + Sync {
    /// Performs bootstrap actions for this instance
    fn bootstrap(&self, manager: &mut ServiceManager) -> Result<(), BoxError>;
}
