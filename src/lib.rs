//! Hierarchical registry of runtime properties.
//!
//! A long-running daemon registers dotted paths (`dst.java.kafka`), attaches
//! a [`PropertyContainer`] to each and keeps counters and status values in
//! it. Operators introspect the registry with a small text protocol:
//!
//! ```text
//! QUERY LIST dst.*
//! QUERY SUM dst.java
//! QUERY SUM_AGGREGATE *.java.*
//! ```
//!
//! ```
//! use std::sync::Arc;
//!
//! use hds_registry::*;
//!
//! let registry = Registry::new(RegistryConfig::default());
//! registry.init();
//!
//! let handle = registry.register_handle("dst.java.kafka").unwrap();
//! let container = registry
//!     .acquire_property_container(handle, Some(NvPropertyContainer::constructor))
//!     .unwrap()
//!     .unwrap();
//! let processed = Arc::new(CounterProperty::new(0));
//! container.add("1", processed.clone());
//! processed.add(3);
//!
//! let output = process_query_command(&registry, "QUERY SUM dst.java").unwrap();
//! assert_eq!(output, "dst.java.kafka.1: 3\n");
//! ```

mod config;
mod constants;
mod container;
mod errors;
mod property;
mod query;
mod registry;
mod tree;

pub use config::*;
pub use container::*;
pub use errors::*;
pub use property::*;
pub use query::*;
pub use registry::*;
pub use tree::*;
