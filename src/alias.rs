//! Aliases resolving to registered services

use crate::{ServiceManager, error::Error};
use std::collections::HashMap;

/// Maps alias type names to the services they resolve to
#[derive(Debug, Clone, Default)]
pub struct AliasRegistry {
    aliases: HashMap<String, String>
}

impl AliasRegistry {
    /// Creates an empty alias registry
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `alias` is registered
    #[inline]
    pub fn has(&self, alias: &str) -> bool {
        self.aliases.contains_key(alias)
    }

    /// Returns the service type name the `alias` points to
    #[inline]
    pub fn get(&self, alias: &str) -> Result<&str, Error> {
        self.aliases
            .get(alias)
            .map(String::as_str)
            .ok_or_else(|| Error::AliasNotRegistered(alias.into()))
    }

    /// Iterates over `(alias, target)` pairs
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases
            .iter()
            .map(|(alias, target)| (alias.as_str(), target.as_str()))
    }

    /// Returns the number of registered aliases
    #[inline]
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Returns `true` if no alias is registered
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    #[inline]
    pub(crate) fn target(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    #[inline]
    fn ensure_vacant(&self, alias: &str, target: &str) -> Result<(), Error> {
        match self.aliases.get(alias) {
            None => Ok(()),
            Some(existing) => Err(Error::AliasAlreadyRegistered {
                alias: alias.into(),
                target: target.into(),
                existing: existing.clone()
            })
        }
    }
}

impl ServiceManager {
    /// Registers `alias` as another name of the `target` service.
    ///
    /// The target must already be resolvable, and the alias type must be a subtype
    /// or a supertype of the target type, so that resolving the alias
    /// always yields a compatible instance.
    ///
    /// # Example
    /// ```
    /// use service_manager::{Catalog, Parameters, ServiceManager};
    ///
    /// let mut catalog = Catalog::new();
    /// catalog.interface("app.Transport");
    /// catalog.class("app.SmtpTransport")
    ///     .implements("app.Transport")
    ///     .construct(|_| Ok(()));
    ///
    /// let mut manager = ServiceManager::new(catalog);
    /// manager.register("app.SmtpTransport", Parameters::new()).unwrap();
    /// manager.register_alias("app.Transport", "app.SmtpTransport").unwrap();
    ///
    /// let transport = manager.get("app.Transport").unwrap();
    /// assert_eq!(transport.type_name(), "app.SmtpTransport");
    /// ```
    pub fn register_alias(&mut self, alias: &str, target: &str) -> Result<(), Error> {
        self.aliases.ensure_vacant(alias, target)?;

        if !self.has(target)? {
            return Err(Error::NotFound(target.into()));
        }

        if !self.types.exists(alias) {
            return Err(Error::AliasTypeUndefined(alias.into()));
        }

        if !self.types.is_related(alias, target) {
            return Err(Error::AliasNotDerived {
                alias: alias.into(),
                target: target.into()
            });
        }

        self.aliases.aliases.insert(alias.into(), target.into());
        #[cfg(feature = "tracing")]
        tracing::debug!(alias, target, "alias registered");
        Ok(())
    }
}
