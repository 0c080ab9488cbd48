//! Per-node property storage.
//!
//! Every registry node may own one [`PropertyContainer`]. A container has
//! its own lock, so producers updating properties never touch the registry
//! lock. Containers are pluggable: [`NvPropertyContainer`] is a dynamic
//! name/value map, [`StatsCounterContainer`] exposes a fixed set of
//! preallocated counters.

mod nv_container;
mod stats_container;

pub use nv_container::*;
pub use stats_container::*;

#[cfg(test)]
mod stats_container_test;

use std::any::Any;
use std::sync::Arc;

use crate::Handle;
use crate::Property;

/// Builds the container attached to a registry node on first acquisition.
/// The registry passes the handle of the node that will own the container.
pub type ContainerConstructor = fn(Handle) -> Arc<dyn PropertyContainer>;

/// Flat, independently locked map of property name to [`Property`].
///
/// No operation reports failure; a missing key is simply `None`.
///
/// `foreach` holds the container lock for the whole traversal. A visitor must
/// not call back into the same container, or it deadlocks.
pub trait PropertyContainer: Send + Sync + 'static {
    /// Handle of the node that owns this container
    fn owner(&self) -> Handle;

    /// Stores `property` under `key`, dropping whatever was there before.
    /// Static containers ignore it.
    fn add(
        &self,
        key: &str,
        property: Arc<dyn Property>,
    ) {
        let _ = (key, property);
    }

    /// Removes `key` if present. Static containers ignore it.
    fn remove(
        &self,
        key: &str,
    ) {
        let _ = key;
    }

    fn get(
        &self,
        key: &str,
    ) -> Option<Arc<dyn Property>>;

    fn foreach(
        &self,
        visitor: &mut dyn FnMut(&str, &Arc<dyn Property>),
    );

    /// Concrete container, for producers that need more than the trait,
    /// e.g. `downcast_ref::<StatsCounterContainer>()` to reach its counters.
    fn as_any(&self) -> &dyn Any;

    fn len(&self) -> usize {
        let mut count = 0;
        self.foreach(&mut |_, _| count += 1);
        count
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
