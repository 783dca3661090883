//! Describes service management errors

use std::{
    error::Error as StdError,
    fmt::{Display, Formatter}
};

/// A boxed error produced by an injector, a provider or a bootstrap hook
pub type BoxError = Box<
    dyn StdError
    + Send
    + Sync
>;

/// Service management error
#[derive(Debug)]
pub enum Error {
    /// The type identifier does not name an existing type
    TypeUndefined(String),
    /// The service is already a key of the service map
    AlreadyRegistered(String),
    /// The service has already been resolved or explicitly set
    AlreadySet(String),
    /// No resolution path exists for the service
    NotFound(String),
    /// An explicitly set instance is not related to the service type
    NotInstanceOf {
        instance: String,
        expected: String
    },
    /// Instantiation or implicit registration of the service failed
    ResolutionFailed {
        type_name: String,
        source: BoxError
    },
    /// The service depends on itself, directly or transitively
    CyclicDependency(Vec<String>),
    /// The resolved instance is not of the requested Rust type
    TypeMismatch {
        type_name: String,
        expected: &'static str
    },
    AliasAlreadyRegistered {
        alias: String,
        target: String,
        existing: String
    },
    AliasNotRegistered(String),
    AliasTypeUndefined(String),
    AliasNotDerived {
        alias: String,
        target: String
    },
    NamespaceInvalid(String),
    NamespaceAlreadyRegistered(String),
    ProviderTypeUndefined(String),
    ProviderAlreadyRegistered(String),
    ProviderMissingContract(String),
    ProviderNotRegistered(String),
    ProviderRegistrationFailed {
        provider: String,
        source: BoxError
    },
    NoProviderForService(String),
    /// The manifest could not be parsed
    InvalidManifest(serde_json::Error)
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::TypeUndefined(type_name) => write!(f, "Services Error: class or interface is not defined: {type_name}"),
            Error::AlreadyRegistered(type_name) => write!(f, "Services Error: service already registered: {type_name}"),
            Error::AlreadySet(type_name) => write!(f, "Services Error: service already set: {type_name}"),
            Error::NotFound(type_name) => write!(f, "Services Error: service not found: {type_name}"),
            Error::NotInstanceOf { instance, expected } => write!(f, "Services Error: {instance} is not an instance of {expected}"),
            Error::ResolutionFailed { type_name, source } => write!(f, "Services Error: unable to resolve the service: {type_name}: {source}"),
            Error::CyclicDependency(chain) => write!(f, "Services Error: cyclic dependency detected: {}", chain.join(" -> ")),
            Error::TypeMismatch { type_name, expected } => write!(f, "Services Error: service {type_name} cannot be resolved as {expected}"),
            Error::AliasAlreadyRegistered { alias, target, existing } => write!(f, "Services Error: unable to alias {alias} to {target}, it is already an alias of {existing}"),
            Error::AliasNotRegistered(alias) => write!(f, "Services Error: alias not registered: {alias}"),
            Error::AliasTypeUndefined(alias) => write!(f, "Services Error: alias class or interface is not defined: {alias}"),
            Error::AliasNotDerived { alias, target } => write!(f, "Services Error: alias {alias} and service {target} are not derived from one another"),
            Error::NamespaceInvalid(namespace) => write!(f, "Services Error: invalid namespace: {namespace}"),
            Error::NamespaceAlreadyRegistered(namespace) => write!(f, "Services Error: namespace already registered: {namespace}"),
            Error::ProviderTypeUndefined(provider) => write!(f, "Services Error: service provider class is not defined: {provider}"),
            Error::ProviderAlreadyRegistered(provider) => write!(f, "Services Error: service provider already registered: {provider}"),
            Error::ProviderMissingContract(provider) => write!(f, "Services Error: {provider} does not implement the service provider contract"),
            Error::ProviderNotRegistered(provider) => write!(f, "Services Error: service provider not registered: {provider}"),
            Error::ProviderRegistrationFailed { provider, source } => write!(f, "Services Error: unable to register the service provider: {provider}: {source}"),
            Error::NoProviderForService(type_name) => write!(f, "Services Error: no service provider supports: {type_name}"),
            Error::InvalidManifest(err) => write!(f, "Services Error: invalid manifest: {err}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::ResolutionFailed { source, .. } => Some(source.as_ref()),
            Error::ProviderRegistrationFailed { source, .. } => Some(source.as_ref()),
            Error::InvalidManifest(err) => Some(err),
            _ => None
        }
    }
}

impl From<serde_json::Error> for Error {
    #[inline]
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidManifest(err)
    }
}

impl Error {
    /// Wraps a failure surfaced while resolving `type_name`
    #[inline]
    pub fn resolution_failed(type_name: &str, err: impl Into<BoxError>) -> Self {
        Self::ResolutionFailed {
            type_name: type_name.into(),
            source: err.into()
        }
    }

    /// Wraps a failure surfaced while registering the `provider`
    #[inline]
    pub fn provider_registration_failed(provider: &str, err: impl Into<BoxError>) -> Self {
        Self::ProviderRegistrationFailed {
            provider: provider.into(),
            source: err.into()
        }
    }

    /// Walks the `source` chain down to the error that started it
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        let mut current: &(dyn StdError + 'static) = self;
        while let Some(next) = current.source() {
            current = next;
        }
        current
    }
}
