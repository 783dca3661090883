use crate::{
    Bootstrapper,
    Catalog,
    Instance,
    Parameter,
    Parameters,
    ServiceManager,
    ServiceProvider,
    error::BoxError,
    injector::{Injector, ValueLookup}
};
use serde_json::Value;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, atomic::{AtomicUsize, Ordering}}
};

#[derive(Debug)]
pub struct Logger;

#[derive(Debug)]
pub struct Clock;

#[derive(Debug)]
pub struct Home;

#[derive(Debug)]
pub struct Router;

#[derive(Debug)]
pub struct SmtpTransport {
    pub host: String
}

#[derive(Debug)]
pub struct Mailer {
    pub host: String
}

#[derive(Debug)]
pub struct Newsletter {
    pub mailer: Arc<Mailer>
}

#[derive(Debug)]
pub struct Greeting(pub String);

/// Registers `app.Logger` when bootstrapped
#[derive(Debug, Default)]
pub struct Kernel {
    boots: AtomicUsize
}

impl Kernel {
    pub fn boots(&self) -> usize {
        self.boots.load(Ordering::SeqCst)
    }
}

impl Bootstrapper for Kernel {
    fn bootstrap(&self, manager: &mut ServiceManager) -> Result<(), BoxError> {
        self.boots.fetch_add(1, Ordering::SeqCst);
        manager.register("app.Logger", Parameters::new())?;
        Ok(())
    }
}

/// Hands out a fresh `app.Greeting` on every request
#[derive(Debug)]
pub struct GreetingProvider;

impl ServiceProvider for GreetingProvider {
    fn supports(&self, type_name: &str) -> bool {
        type_name == "app.Greeting"
    }

    fn handle(&self, type_name: &str, params: &Parameters, _: &mut ServiceManager) -> Result<Instance, BoxError> {
        let name = match params.get("name") {
            Some(Parameter::Value(Value::String(name))) => name.as_str(),
            _ => "stranger"
        };
        Ok(Instance::new(type_name, Greeting(format!("Hello, {name}"))))
    }

    fn is_singleton_expected(&self, _: &str) -> bool {
        false
    }
}

/// Competes with [`GreetingProvider`] for `app.Greeting`
#[derive(Debug)]
pub struct FormalGreetingProvider;

impl ServiceProvider for FormalGreetingProvider {
    fn supports(&self, type_name: &str) -> bool {
        type_name == "app.Greeting"
    }

    fn handle(&self, type_name: &str, _: &Parameters, _: &mut ServiceManager) -> Result<Instance, BoxError> {
        Ok(Instance::new(type_name, Greeting("Good day".into())))
    }
}

/// Builds every `app.made.*` type through the injector
#[derive(Debug)]
pub struct Factory;

impl ServiceProvider for Factory {
    fn supports(&self, type_name: &str) -> bool {
        type_name.starts_with("app.made.")
    }

    fn handle(&self, type_name: &str, params: &Parameters, manager: &mut ServiceManager) -> Result<Instance, BoxError> {
        Ok(manager.instantiate(type_name, params)?)
    }

    fn is_singleton_expected(&self, _: &str) -> bool {
        false
    }
}

/// Registers the `app.routes` namespace when bootstrapped
#[derive(Debug)]
pub struct RoutingProvider;

impl ServiceProvider for RoutingProvider {
    fn supports(&self, type_name: &str) -> bool {
        type_name == "app.Router"
    }

    fn handle(&self, type_name: &str, _: &Parameters, _: &mut ServiceManager) -> Result<Instance, BoxError> {
        Ok(Instance::new(type_name, Router))
    }
}

impl Bootstrapper for RoutingProvider {
    fn bootstrap(&self, manager: &mut ServiceManager) -> Result<(), BoxError> {
        manager.register_namespace("app.routes")?;
        Ok(())
    }
}

pub fn fixture_catalog() -> Catalog {
    let mut catalog = Catalog::new();

    catalog.interface("app.Transport");
    catalog.class("app.SmtpTransport")
        .implements("app.Transport")
        .param_or("host", "localhost")
        .construct(|args| Ok(SmtpTransport { host: args.value("host")? }));

    catalog.class("app.Logger").construct(|_| Ok(Logger));
    catalog.class("app.services.Clock").construct(|_| Ok(Clock));
    catalog.class("app.routes.Home").construct(|_| Ok(Home));
    catalog.class("app.Router").construct(|_| Ok(Router));
    catalog.class("app.Greeting").construct(|_| Ok(Greeting("Hello".into())));
    catalog.class("app.Kernel").bootstrapped(|_| Ok(Kernel::default()));

    catalog.class("app.Mailer")
        .param("host")
        .construct(|args| Ok(Mailer { host: args.value("host")? }));
    catalog.class("app.Newsletter")
        .dependency("mailer", "app.Mailer")
        .construct(|args| Ok(Newsletter { mailer: args.service("mailer")? }));

    catalog.class("app.GreetingProvider").provider(|_| Ok(GreetingProvider));
    catalog.class("app.FormalGreetingProvider").provider(|_| Ok(FormalGreetingProvider));
    catalog.class("app.Factory").provider(|_| Ok(Factory));
    catalog.class("app.made.Widget").construct(|_| Ok(Home));
    catalog.class("app.made.Node")
        .dependency("next", "app.made.Node")
        .construct(|_| Ok(Logger));
    catalog.class("app.RoutingProvider").bootstrapped_provider(|_| Ok(RoutingProvider));
    catalog.class("app.BrokenProvider")
        .provider(|_| Err::<GreetingProvider, BoxError>("provider is out of order".into()));

    catalog.class("app.cycle.Left")
        .dependency("right", "app.cycle.Right")
        .construct(|_| Ok(Logger));
    catalog.class("app.cycle.Right")
        .dependency("left", "app.cycle.Left")
        .construct(|_| Ok(Logger));
    catalog.class("app.cycle.Ouroboros")
        .dependency("tail", "app.cycle.Ouroboros")
        .construct(|_| Ok(Logger));

    catalog
}

pub fn fixture_manager() -> ServiceManager {
    ServiceManager::new(fixture_catalog())
}

/// Counts instantiation attempts per type before delegating to the fixture catalog
pub struct CountingInjector {
    catalog: Arc<Catalog>,
    calls: Mutex<HashMap<String, usize>>
}

impl CountingInjector {
    pub fn count(&self, type_name: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(type_name)
            .copied()
            .unwrap_or_default()
    }
}

impl Injector for CountingInjector {
    fn instantiate(
        &self,
        type_name: &str,
        params: &Parameters,
        lookup: &mut dyn ValueLookup
    ) -> Result<Instance, BoxError> {
        *self.calls
            .lock()
            .unwrap()
            .entry(type_name.into())
            .or_default() += 1;
        self.catalog.instantiate(type_name, params, lookup)
    }
}

pub fn counting_manager() -> (ServiceManager, Arc<CountingInjector>) {
    let catalog = Arc::new(fixture_catalog());
    let counter = Arc::new(CountingInjector {
        catalog: catalog.clone(),
        calls: Mutex::new(HashMap::new())
    });
    (ServiceManager::from_parts(catalog, counter.clone()), counter)
}
