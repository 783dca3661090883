//! Service manager configuration and declarative manifests

use crate::{
    Parameters,
    ServiceManager,
    error::Error,
    namespace::DEFAULT_SEPARATOR
};
use indexmap::IndexMap;
use serde::Deserialize;

/// Represents a service manager configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Namespace segment separator
    ///
    /// Default: `.`
    separator: char,

    /// Specifies whether re-entering a service that is being instantiated fails
    /// with [`Error::CyclicDependency`]
    ///
    /// Default: `true`
    detect_cycles: bool
}

impl Default for ManagerConfig {
    #[inline]
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            detect_cycles: true
        }
    }
}

impl ManagerConfig {
    /// Creates a default configuration
    ///
    /// Defaults:
    /// - separator: `.`
    /// - detect_cycles: `true`
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the namespace segment separator
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Turns the cyclic dependency guard off
    pub fn without_cycle_detection(mut self) -> Self {
        self.detect_cycles = false;
        self
    }

    /// Returns the namespace segment separator
    #[inline]
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Returns `true` if cyclic dependencies are detected
    #[inline]
    pub fn detect_cycles(&self) -> bool {
        self.detect_cycles
    }
}

/// Declarative description of namespaces, services, providers and aliases
///
/// # Example
/// ```
/// use service_manager::Manifest;
///
/// let manifest = Manifest::from_json(r#"{
///     "namespaces": ["app.services"],
///     "services": { "app.Mailer": { "host": "smtp.local" } },
///     "aliases": { "app.Transport": "app.Mailer" }
/// }"#).unwrap();
///
/// assert_eq!(manifest.namespaces, ["app.services"]);
/// ```
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Manifest {
    /// Namespaces to register
    pub namespaces: Vec<String>,

    /// Services to register, with their constructor parameters
    pub services: IndexMap<String, Parameters>,

    /// Service providers to register, with their constructor parameters
    pub providers: IndexMap<String, Parameters>,

    /// Aliases mapped to their target services
    pub aliases: IndexMap<String, String>
}

impl Manifest {
    /// Parses a manifest from a JSON string
    #[inline]
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(Error::from)
    }
}

impl ServiceManager {
    /// Configures the service manager with specified configuration.
    ///
    /// Namespaces registered before the call are rewritten to the configured separator.
    pub fn with_config(mut self, config: ManagerConfig) -> Self {
        self.namespaces = self.namespaces.with_separator(config.separator);
        self.config = config;
        self
    }

    /// Returns the current configuration
    #[inline]
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Applies a [`Manifest`]: namespaces first, then services, providers and aliases.
    ///
    /// Stops at the first failure, leaving everything applied before it in place.
    pub fn load(&mut self, manifest: Manifest) -> Result<(), Error> {
        let Manifest { namespaces, services, providers, aliases } = manifest;

        for namespace in &namespaces {
            self.register_namespace(namespace)?;
        }

        for (service, params) in services {
            self.register(&service, params)?;
        }

        for (provider, params) in providers {
            self.register_provider(&provider, params)?;
        }

        for (alias, target) in &aliases {
            self.register_alias(alias, target)?;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            namespaces = namespaces.len(),
            aliases = aliases.len(),
            "manifest loaded");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ManagerConfig, Manifest};
    use crate::{error::Error, test_utils::{Mailer, fixture_manager}};

    #[test]
    fn it_creates_default_config() {
        let config = ManagerConfig::new();

        assert_eq!(config.separator(), '.');
        assert!(config.detect_cycles());
    }

    #[test]
    fn it_creates_config_with_builder() {
        let config = ManagerConfig::new()
            .with_separator('\\')
            .without_cycle_detection();

        assert_eq!(config.separator(), '\\');
        assert!(!config.detect_cycles());
    }

    #[test]
    fn it_deserializes_partial_config() {
        let config: ManagerConfig = serde_json::from_str(r#"{ "separator": ":" }"#).unwrap();

        assert_eq!(config.separator(), ':');
        assert!(config.detect_cycles());
    }

    #[test]
    fn it_applies_config_separator_to_namespaces() {
        let mut manager = fixture_manager().with_config(ManagerConfig::new().with_separator(':'));

        manager.register_namespace("app:services").unwrap();

        assert_eq!(manager.namespaces().separator(), ':');
        assert_eq!(manager.namespaces().iter().collect::<Vec<_>>(), ["app:services:"]);
    }

    #[test]
    fn it_keeps_namespaces_registered_before_config() {
        let mut manager = fixture_manager();
        manager.register_namespace("app.services").unwrap();

        let mut manager = manager.with_config(ManagerConfig::new().with_separator(':'));

        assert_eq!(manager.namespaces().iter().collect::<Vec<_>>(), ["app:services:"]);
        assert!(matches!(manager.register_namespace("app:services"), Err(Error::NamespaceAlreadyRegistered(_))));
    }

    #[test]
    fn it_parses_empty_manifest() {
        let manifest = Manifest::from_json("{}").unwrap();

        assert!(manifest.namespaces.is_empty());
        assert!(manifest.services.is_empty());
        assert!(manifest.providers.is_empty());
        assert!(manifest.aliases.is_empty());
    }

    #[test]
    fn it_rejects_malformed_manifest() {
        let unknown_field = Manifest::from_json(r#"{ "servces": {} }"#).unwrap_err();
        let not_json = Manifest::from_json("namespaces = []").unwrap_err();

        assert!(matches!(unknown_field, Error::InvalidManifest(_)));
        assert!(matches!(not_json, Error::InvalidManifest(_)));
    }

    #[test]
    fn it_loads_manifest() {
        let mut manager = fixture_manager();
        let manifest = Manifest::from_json(r#"{
            "namespaces": ["app.services"],
            "services": {
                "app.Mailer": { "host": "smtp.local" },
                "app.SmtpTransport": {}
            },
            "providers": { "app.GreetingProvider": {} },
            "aliases": { "app.Transport": "app.SmtpTransport" }
        }"#).unwrap();

        manager.load(manifest).unwrap();

        assert_eq!(manager.get_as::<Mailer>("app.Mailer").unwrap().host, "smtp.local");
        assert!(manager.has("app.services.Clock").unwrap());
        assert!(manager.has("app.Greeting").unwrap());
        assert_eq!(manager.get("app.Transport").unwrap().type_name(), "app.SmtpTransport");
    }

    #[test]
    fn it_stops_loading_at_first_failure() {
        let mut manager = fixture_manager();
        let manifest = Manifest::from_json(r#"{
            "services": { "app.Logger": {}, "app.Missing": {} },
            "aliases": { "app.Transport": "app.SmtpTransport" }
        }"#).unwrap();

        let err = manager.load(manifest).unwrap_err();

        assert!(matches!(err, Error::TypeUndefined(ref name) if name == "app.Missing"));
        assert!(manager.has("app.Logger").unwrap());
        assert!(manager.aliases().is_empty());
    }
}
