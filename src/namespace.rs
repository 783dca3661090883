//! Namespaces enabling implicit service registration

use crate::{ServiceManager, error::Error};
use indexmap::IndexSet;

/// Default namespace separator
pub const DEFAULT_SEPARATOR: char = '.';

/// Keeps the namespace prefixes under which any type is registered implicitly
/// the first time it is requested.
#[derive(Debug, Clone)]
pub struct NamespaceRegistry {
    separator: char,
    namespaces: IndexSet<String>
}

impl Default for NamespaceRegistry {
    #[inline]
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR)
    }
}

impl NamespaceRegistry {
    /// Creates an empty registry that uses `separator` between namespace segments
    #[inline]
    pub fn new(separator: char) -> Self {
        Self {
            separator,
            namespaces: IndexSet::new()
        }
    }

    /// Returns the namespace separator
    #[inline]
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Returns `true` if `type_name` lives under one of the registered namespaces
    pub fn matches(&self, type_name: &str) -> bool {
        self.namespaces
            .iter()
            .any(|namespace| type_name.starts_with(namespace.as_str()))
    }

    /// Registers a namespace.
    ///
    /// The namespace must start with a letter and may contain only letters, digits,
    /// underscores and separators. A trailing separator is appended if missing,
    /// so `app` never matches `application.Service`.
    pub fn register(&mut self, namespace: &str) -> Result<(), Error> {
        if !self.is_valid(namespace) {
            return Err(Error::NamespaceInvalid(namespace.into()));
        }

        let mut namespace = namespace.to_owned();
        if !namespace.ends_with(self.separator) {
            namespace.push(self.separator);
        }

        if self.namespaces.contains(&namespace) {
            return Err(Error::NamespaceAlreadyRegistered(namespace));
        }

        self.namespaces.insert(namespace);
        Ok(())
    }

    /// Returns a copy of this registry that uses `separator`,
    /// with every registered namespace rewritten to it
    pub fn with_separator(&self, separator: char) -> Self {
        let namespaces = self.namespaces
            .iter()
            .map(|namespace| namespace
                .chars()
                .map(|c| if c == self.separator { separator } else { c })
                .collect())
            .collect();
        Self { separator, namespaces }
    }

    /// Iterates over the registered namespaces in registration order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.namespaces.iter().map(String::as_str)
    }

    /// Returns the number of registered namespaces
    #[inline]
    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    /// Returns `true` if no namespace is registered
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    fn is_valid(&self, namespace: &str) -> bool {
        let mut chars = namespace.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        first.is_ascii_alphabetic() && chars.all(|c| {
            c.is_ascii_alphanumeric() || c == '_' || c == self.separator
        })
    }
}

impl ServiceManager {
    /// Registers a namespace, so any type under it will be registered
    /// implicitly the first time it is requested.
    ///
    /// # Example
    /// ```
    /// use service_manager::{Catalog, ServiceManager};
    ///
    /// let mut catalog = Catalog::new();
    /// catalog.class("app.services.Logger").construct(|_| Ok(()));
    ///
    /// let mut manager = ServiceManager::new(catalog);
    /// manager.register_namespace("app.services").unwrap();
    ///
    /// assert!(manager.has("app.services.Logger").unwrap());
    /// ```
    pub fn register_namespace(&mut self, namespace: &str) -> Result<(), Error> {
        self.namespaces.register(namespace)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(namespace, "namespace registered");
        Ok(())
    }
}
