use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use super::PropertyContainer;
use crate::Handle;
use crate::Property;

/// Dynamic name/value container backed by a mutex-guarded map.
pub struct NvPropertyContainer {
    owner: Handle,
    properties: Mutex<HashMap<String, Arc<dyn Property>>>,
}

impl NvPropertyContainer {
    pub fn new(owner: Handle) -> Self {
        trace!(%owner, "name/value container created");
        Self {
            owner,
            properties: Mutex::new(HashMap::new()),
        }
    }

    /// [`ContainerConstructor`](super::ContainerConstructor) for registry nodes
    pub fn constructor(owner: Handle) -> Arc<dyn PropertyContainer> {
        Arc::new(Self::new(owner))
    }
}

impl PropertyContainer for NvPropertyContainer {
    fn owner(&self) -> Handle {
        self.owner
    }

    fn add(
        &self,
        key: &str,
        property: Arc<dyn Property>,
    ) {
        // the previous value is released outside the lock
        let previous = self.properties.lock().insert(key.to_owned(), property);
        drop(previous);
    }

    fn remove(
        &self,
        key: &str,
    ) {
        let removed = self.properties.lock().remove(key);
        drop(removed);
    }

    fn get(
        &self,
        key: &str,
    ) -> Option<Arc<dyn Property>> {
        self.properties.lock().get(key).cloned()
    }

    fn foreach(
        &self,
        visitor: &mut dyn FnMut(&str, &Arc<dyn Property>),
    ) {
        let properties = self.properties.lock();
        for (key, property) in properties.iter() {
            visitor(key, property);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn len(&self) -> usize {
        self.properties.lock().len()
    }
}

impl Drop for NvPropertyContainer {
    fn drop(&mut self) {
        trace!(owner = %self.owner, properties = self.properties.get_mut().len(), "name/value container released");
    }
}
