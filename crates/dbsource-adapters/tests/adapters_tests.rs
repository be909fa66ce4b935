//! Adapters wired into the core services.

use dbsource_adapters::{InMemoryTemplateSource, PgConnection};
use dbsource_core::prelude::*;

fn calls() -> LoaderCalls {
    LoaderCalls::new(
        "SELECT template_api.find_template($1)",
        "SELECT template_api.load_template($1)",
        None,
    )
    .unwrap()
}

#[test]
fn connection_factory_failure_surfaces_as_connection_error() {
    let result = DatabaseTemplateLoader::connect(calls(), || {
        PgConnection::connect("definitely not a connection string").map_err(Into::into)
    });

    let err = result.err().expect("connect must fail");
    assert!(matches!(err, LoaderError::Connection { .. }));
    assert_eq!(err.category(), ErrorCategory::Configuration);
}

#[test]
fn service_over_memory_source() {
    let source = InMemoryTemplateSource::with_templates([
        ("greet", "Hello, ${name}!"),
        ("bye", "Goodbye, ${name}."),
    ]);
    let service = TemplateSourceService::new(Box::new(source.clone()));

    let greet = service.fetch("greet").unwrap().found().unwrap();
    assert_eq!(greet.locator.as_str(), "mem:greet");
    assert_eq!(greet.body, "Hello, ${name}!");

    assert!(matches!(
        service.fetch("unknown").unwrap(),
        SourceLookup::NotFound
    ));
}

#[test]
fn memory_source_staleness_follows_touch() {
    let source = InMemoryTemplateSource::new();
    source.insert_at("page", "v1", Timestamp::from_millis(10));
    let service = TemplateSourceService::new(Box::new(source.clone()));

    let loaded = service.fetch("page").unwrap().found().unwrap();
    assert!(!service.is_stale(&loaded.locator, loaded.last_modified).unwrap());

    source.insert("page", "v2");
    assert!(service.is_stale(&loaded.locator, loaded.last_modified).unwrap());

    let reloaded = service.fetch("page").unwrap().found().unwrap();
    assert_eq!(reloaded.body, "v2");
}
