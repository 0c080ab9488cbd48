use std::sync::Arc;

use hds_registry::CounterProperty;
use hds_registry::NvPropertyContainer;
use hds_registry::Registry;
use hds_registry::RegistryConfig;

/// Property layout shared by the protocol tests
pub const FIXTURE: [(&str, i64); 5] = [
    ("dst.java.kafka", 1),
    ("dst.java.hdfs", 3),
    ("src.java.kafka", 2),
    ("src.java.jdbc", 4),
    ("src.network.tcp", 10),
];

pub fn enable_logger() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn new_registry() -> Registry {
    enable_logger();
    let registry = Registry::new(RegistryConfig::default());
    registry.init();
    registry
}

/// Registers `path` and stores a counter named `key` under it.
pub fn set_counter(
    registry: &Registry,
    path: &str,
    key: &str,
    value: i64,
) -> Arc<CounterProperty> {
    let handle = registry.register_handle(path).expect("register");
    let counter = Arc::new(CounterProperty::new(value));
    registry
        .acquire_property_container(handle, Some(NvPropertyContainer::constructor))
        .expect("acquire")
        .expect("container")
        .add(key, counter.clone());
    counter
}

pub fn fixture_registry() -> Registry {
    let registry = new_registry();
    for (path, value) in FIXTURE {
        set_counter(&registry, path, "1", value);
    }
    registry
}

pub fn sorted_lines(output: &str) -> Vec<String> {
    let mut lines: Vec<String> = output.lines().map(str::to_owned).collect();
    lines.sort();
    lines
}
