//! Common test utilities

#![allow(missing_docs)]
#![allow(unreachable_pub)]
#![allow(dead_code)]
#![allow(missing_debug_implementations)]

use service_manager::{
    Bootstrapper,
    Catalog,
    Instance,
    Parameters,
    ServiceManager,
    ServiceProvider,
    error::BoxError
};
use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};

pub struct Database {
    pub dsn: String
}

pub struct UserRepository {
    pub database: Arc<Database>
}

pub struct Message {
    pub subject: String
}

pub struct InMemoryCache;

/// Constructs every `app.mail.*` message through the injector, so each request yields a new one
pub struct MessageProvider;

impl ServiceProvider for MessageProvider {
    fn supports(&self, type_name: &str) -> bool {
        type_name.starts_with("app.mail.")
    }

    fn handle(&self, type_name: &str, params: &Parameters, manager: &mut ServiceManager) -> Result<Instance, BoxError> {
        Ok(manager.instantiate(type_name, params)?)
    }

    fn is_singleton_expected(&self, _: &str) -> bool {
        false
    }
}

/// Registers the storage services once loaded
#[derive(Default)]
pub struct StoragePlugin {
    pub boots: AtomicUsize
}

impl Bootstrapper for StoragePlugin {
    fn bootstrap(&self, manager: &mut ServiceManager) -> Result<(), BoxError> {
        self.boots.fetch_add(1, Ordering::SeqCst);
        manager.register_namespace("app.storage")?;
        manager.register("app.Database", Parameters::new().with("dsn", "sqlite::memory:"))?;
        Ok(())
    }
}

pub fn app_catalog() -> Catalog {
    let mut catalog = Catalog::new();

    catalog.interface("app.Cache");
    catalog.class("app.storage.InMemoryCache")
        .implements("app.Cache")
        .construct(|_| Ok(InMemoryCache));

    catalog.class("app.Database")
        .param("dsn")
        .construct(|args| Ok(Database { dsn: args.value("dsn")? }));
    catalog.class("app.storage.UserRepository")
        .dependency("database", "app.Database")
        .construct(|args| Ok(UserRepository { database: args.service("database")? }));

    catalog.class("app.mail.Welcome")
        .param_or("subject", "Welcome!")
        .construct(|args| Ok(Message { subject: args.value("subject")? }));

    catalog.class("app.MessageProvider").provider(|_| Ok(MessageProvider));
    catalog.class("app.StoragePlugin").bootstrapped(|_| Ok(StoragePlugin::default()));

    catalog
}

pub fn app_manager() -> ServiceManager {
    ServiceManager::new(app_catalog())
}
