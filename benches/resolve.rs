#![allow(missing_docs)]

use service_manager::{Catalog, Instance, Parameters, ServiceManager, ServiceProvider, error::BoxError};

use std::hint::black_box;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

struct Database;

struct Repository;

struct Counter;

impl ServiceProvider for Counter {
    fn supports(&self, type_name: &str) -> bool {
        type_name == "app.Tick"
    }

    fn handle(&self, type_name: &str, _: &Parameters, _: &mut ServiceManager) -> Result<Instance, BoxError> {
        Ok(Instance::new(type_name, ()))
    }
}

fn manager() -> ServiceManager {
    let mut catalog = Catalog::new();
    catalog.class("app.Database").construct(|_| Ok(Database));
    catalog.interface("app.Storage");
    catalog.class("app.Repository")
        .implements("app.Storage")
        .dependency("database", "app.Database")
        .construct(|args| {
            let _ = args.service::<Database>("database")?;
            Ok(Repository)
        });
    catalog.class("app.Counter").provider(|_| Ok(Counter));

    let mut manager = ServiceManager::new(catalog);
    manager.register_namespace("app").unwrap();
    manager.register_provider("app.Counter", Parameters::new()).unwrap();
    manager
}

fn benchmark(c: &mut Criterion) {
    c.bench_function("cached", |b| {
        let mut manager = manager();
        manager.get("app.Database").unwrap();
        b.iter(|| black_box(manager.get("app.Database").unwrap()));
    });
    c.bench_function("provider", |b| {
        let mut manager = manager();
        b.iter(|| black_box(manager.get("app.Tick").unwrap()));
    });
    c.bench_function("cold_with_dependency", |b| {
        b.iter_batched(
            manager,
            |mut manager| black_box(manager.get("app.Repository").unwrap()),
            BatchSize::SmallInput);
    });
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
