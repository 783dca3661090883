//! Dependency injector capability and its lookup hook

use crate::{
    Instance,
    Parameters,
    error::{BoxError, Error}
};
use std::fmt::{Display, Formatter};

/// A capability that constructs instances from their type name and named parameters.
///
/// Whenever a constructor parameter can not be satisfied from `params`,
/// the injector asks the `lookup` hook for a value of the parameter's declared type.
pub trait Injector: Send + Sync {
    /// Constructs a new instance of `type_name`
    fn instantiate(
        &self,
        type_name: &str,
        params: &Parameters,
        lookup: &mut dyn ValueLookup
    ) -> Result<Instance, BoxError>;
}

/// A hook an [`Injector`] calls back into to resolve constructor parameters by their type
pub trait ValueLookup {
    /// Returns an instance for the parameter `name` of type `type_name`,
    /// or `None` if there is nothing to offer.
    fn lookup(&mut self, name: &str, type_name: &str) -> Result<Option<Instance>, Error>;
}

/// Describes injector errors
#[derive(Debug)]
pub enum InjectError {
    /// The type is unknown to the injector
    TypeUndefined(String),
    /// The type has no constructor, e.g. an interface
    NotInstantiable(String),
    /// A constructor parameter could not be satisfied
    Unresolved {
        type_name: String,
        parameter: String
    },
    /// A constructor parameter has an unexpected shape
    InvalidArgument {
        parameter: String,
        reason: String
    },
    /// The lookup hook failed while resolving a constructor parameter
    Lookup {
        parameter: String,
        source: Error
    }
}

impl Display for InjectError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InjectError::TypeUndefined(type_name) => write!(f, "Injector Error: type is not defined: {type_name}"),
            InjectError::NotInstantiable(type_name) => write!(f, "Injector Error: type is not instantiable: {type_name}"),
            InjectError::Unresolved { type_name, parameter } => write!(f, "Injector Error: unable to resolve parameter `{parameter}` of {type_name}"),
            InjectError::InvalidArgument { parameter, reason } => write!(f, "Injector Error: invalid argument `{parameter}`: {reason}"),
            InjectError::Lookup { parameter, source } => write!(f, "Injector Error: lookup of `{parameter}` failed: {source}"),
        }
    }
}

impl std::error::Error for InjectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InjectError::Lookup { source, .. } => Some(source),
            _ => None
        }
    }
}
