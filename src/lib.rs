//! # Service Manager
//!
//! > A lazy service locator that constructs services on first request and hands out the same instance afterwards.
//!
//! ## Features
//! * Lazy, cached construction delegated to a pluggable injector
//! * Constructor dependencies resolved back through the manager
//! * Aliases, namespaces with implicit registration and service providers
//! * Bootstrap hooks for services and providers
//! * Cyclic dependency detection
//! * Declarative JSON manifests
//! * Runs on stable Rust 1.80+
//!
//! ## Example
//! ```toml
//! [dependencies]
//! service-manager = "0.3.0"
//! ```
//! ```
//! use service_manager::{Catalog, Parameters, ServiceManager};
//!
//! struct Transport;
//!
//! struct Mailer {
//!     host: String
//! }
//!
//! let mut catalog = Catalog::new();
//! catalog.class("app.Transport").construct(|_| Ok(Transport));
//! catalog.class("app.Mailer")
//!     .param("host")
//!     .dependency("transport", "app.Transport")
//!     .construct(|args| {
//!         let _transport = args.service::<Transport>("transport")?;
//!         Ok(Mailer { host: args.value("host")? })
//!     });
//!
//! let mut manager = ServiceManager::new(catalog);
//! manager.register_namespace("app").unwrap();
//! manager.register("app.Mailer", Parameters::new().with("host", "smtp.local")).unwrap();
//!
//! let mailer = manager.get_as::<Mailer>("app.Mailer").unwrap();
//! assert_eq!(mailer.host, "smtp.local");
//! ```

#![forbid(unsafe_code)]
#![deny(unreachable_pub)]

pub mod alias;
pub mod bootstrap;
pub mod catalog;
pub mod config;
pub mod container;
pub mod error;
pub mod injector;
pub mod instance;
pub mod manager;
pub mod namespace;
pub mod provider;
pub mod types;
#[cfg(feature = "tracing")]
pub mod tracing;
#[cfg(test)]
pub mod test_utils;

pub use crate::{
    bootstrap::Bootstrapper,
    catalog::{Arguments, Catalog, TypeDef},
    config::{ManagerConfig, Manifest},
    container::ServiceContainer,
    injector::{InjectError, Injector, ValueLookup},
    instance::{Instance, Parameter, Parameters},
    manager::ServiceManager,
    provider::{PROVIDER_CONTRACT, ServiceProvider},
    types::TypeRegistry,
};
