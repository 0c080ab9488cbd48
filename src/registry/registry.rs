use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::Mutex;
use tracing::debug;
use tracing::info;
use tracing::trace;
use tracing::warn;

use super::Handle;
use crate::ContainerConstructor;
use crate::NodeId;
use crate::NvPropertyContainer;
use crate::PathTree;
use crate::Property;
use crate::PropertyContainer;
use crate::QueryPattern;
use crate::RegistryConfig;
use crate::RegistryError;
use crate::Result;

lazy_static! {
    static ref GLOBAL_REGISTRY: Registry = Registry::new(RegistryConfig::default());
}

/// Source of tree epochs; every `init` of every registry draws a new one.
static NEXT_EPOCH: AtomicU64 = AtomicU64::new(1);

/// Process-wide hierarchical registry of runtime properties.
///
/// Two lock tiers:
/// - one coarse lock serializes `register`/`unregister`/`query` and every
///   other structural access to the tree;
/// - each container carries its own lock, so producers mutate properties
///   without touching the coarse lock.
///
/// There is no atomicity across the tiers: a query can observe a property
/// written while it is traversing.
///
/// The registry is usable between [`Registry::init`] and
/// [`Registry::destroy`]; any other call fails with
/// [`RegistryError::NotInitialized`].
pub struct Registry {
    config: RegistryConfig,
    state: Mutex<Option<RegistryState>>,
}

struct RegistryState {
    epoch: u64,
    tree: PathTree<Arc<dyn PropertyContainer>>,
    root: NodeId,
}

impl RegistryState {
    fn handle(
        &self,
        id: NodeId,
    ) -> Handle {
        Handle::new(self.epoch, id)
    }

    fn live_node(
        &self,
        handle: Handle,
    ) -> Result<NodeId> {
        let id = handle.node_id();
        let issued_here = handle.epoch() == self.epoch;
        if issued_here && self.tree.contains(id) && self.tree.top_root(id) == Some(self.root) {
            Ok(id)
        } else {
            Err(RegistryError::StaleHandle(handle).into())
        }
    }

    /// Name of `id` below the root: `dst.java` for `<root>.dst.java`, empty
    /// for the root itself.
    fn relative_name(
        &self,
        id: NodeId,
    ) -> String {
        let mut keys: Vec<&str> = self
            .tree
            .ancestors(id)
            .take_while(|ancestor| *ancestor != self.root)
            .filter_map(|ancestor| self.tree.key(ancestor))
            .collect();
        keys.reverse();
        keys.join(self.tree.delimiter())
    }

    /// Node where a traversal for `pattern` has to start
    fn query_start(
        &self,
        pattern: &QueryPattern,
    ) -> NodeId {
        pattern
            .literal_prefix()
            .and_then(|prefix| self.tree.find_longest_match(self.root, prefix).node)
            .unwrap_or(self.root)
    }
}

impl Registry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            state: Mutex::new(None),
        }
    }

    /// Shared instance for producers that have no registry reference.
    /// Uses the default configuration and still needs `init`.
    pub fn global() -> &'static Registry {
        &GLOBAL_REGISTRY
    }

    pub fn root_name(&self) -> &str {
        &self.config.root_name
    }

    pub fn delimiter(&self) -> &str {
        &self.config.delimiter
    }

    pub fn is_initialized(&self) -> bool {
        self.state.lock().is_some()
    }

    /// Creates the root node with a default name/value container attached.
    /// Calling it on an initialized registry does nothing.
    pub fn init(&self) {
        let mut state = self.state.lock();
        if state.is_some() {
            debug!("registry already initialized");
            return;
        }

        let epoch = NEXT_EPOCH.fetch_add(1, Ordering::Relaxed);
        let mut tree = PathTree::new(self.config.delimiter.as_str());
        let root = tree.create(&self.config.root_name);
        tree.set_value(root, NvPropertyContainer::constructor(Handle::new(epoch, root)));
        *state = Some(RegistryState { epoch, tree, root });

        info!(root = %self.config.root_name, epoch, "registry initialized");
    }

    /// Frees the whole tree, releasing every container. Handles obtained
    /// before become stale. Does nothing on an uninitialized registry.
    pub fn destroy(&self) {
        let Some(mut state) = self.state.lock().take() else {
            return;
        };

        let mut containers = Vec::new();
        let freed = state.tree.free(state.root, |container| containers.push(container));
        drop(containers);

        info!(freed, "registry destroyed");
    }

    fn with_state<R>(
        &self,
        f: impl FnOnce(&mut RegistryState) -> Result<R>,
    ) -> Result<R> {
        let mut guard = self.state.lock();
        let state = guard.as_mut().ok_or(RegistryError::NotInitialized)?;
        f(state)
    }

    fn validate_path(
        &self,
        path: &str,
    ) -> Result<()> {
        if path.is_empty() {
            return Err(RegistryError::InvalidPath {
                path: path.to_owned(),
                reason: "path cannot be empty",
            }
            .into());
        }
        if path.split(self.delimiter()).any(str::is_empty) {
            return Err(RegistryError::InvalidPath {
                path: path.to_owned(),
                reason: "path cannot contain empty segments",
            }
            .into());
        }
        Ok(())
    }

    pub fn root(&self) -> Result<Handle> {
        self.with_state(|state| Ok(state.handle(state.root)))
    }

    /// Number of nodes in the tree, root included
    pub fn node_count(&self) -> Result<usize> {
        self.with_state(|state| Ok(state.tree.size(state.root)))
    }

    /// Registers `path` (relative to the root) and returns its handle.
    /// Existing prefixes are reused; registering a path twice returns the
    /// same handle.
    pub fn register_handle(
        &self,
        path: &str,
    ) -> Result<Handle> {
        self.validate_path(path)?;
        self.with_state(|state| {
            let node = state
                .tree
                .insert(state.root, path)
                .ok_or(RegistryError::NotInitialized)?;
            let handle = state.handle(node);
            debug!(path, %handle, "handle registered");
            Ok(handle)
        })
    }

    /// Removes the node and its whole subtree, releasing every attached
    /// container.
    pub fn unregister_handle(
        &self,
        handle: Handle,
    ) -> Result<()> {
        let containers = self.with_state(|state| {
            let id = state.live_node(handle).inspect_err(|e| warn!(%e, "cannot unregister"))?;
            if id == state.root {
                return Err(RegistryError::RootHandle.into());
            }

            let mut containers = Vec::new();
            let freed = state.tree.free(id, |container| containers.push(container));
            debug!(%handle, freed, "handle unregistered");
            Ok(containers)
        })?;

        // containers are released outside the registry lock
        drop(containers);
        Ok(())
    }

    /// Exact lookup of a root-relative path
    pub fn get_handle(
        &self,
        path: &str,
    ) -> Result<Option<Handle>> {
        self.validate_path(path)?;
        self.with_state(|state| Ok(state.tree.find(state.root, path).map(|id| state.handle(id))))
    }

    /// Returns the container attached to `handle`. If there is none and a
    /// constructor is given, the constructor builds one (receiving `handle`
    /// as owner) and it gets attached. The first caller with a constructor
    /// wins; later calls get the same instance.
    ///
    /// The constructor runs under the registry lock and must not call back
    /// into the registry.
    pub fn acquire_property_container(
        &self,
        handle: Handle,
        constructor: Option<ContainerConstructor>,
    ) -> Result<Option<Arc<dyn PropertyContainer>>> {
        self.with_state(|state| {
            let id = state.live_node(handle)?;
            if let Some(container) = state.tree.value(id) {
                return Ok(Some(container.clone()));
            }

            let Some(constructor) = constructor else {
                return Ok(None);
            };
            let container = constructor(handle);
            state.tree.set_value(id, container.clone());
            trace!(%handle, "property container attached");
            Ok(Some(container))
        })
    }

    pub fn get_property_container(
        &self,
        handle: Handle,
    ) -> Result<Option<Arc<dyn PropertyContainer>>> {
        self.acquire_property_container(handle, None)
    }

    pub fn handle_fqdn(
        &self,
        handle: Handle,
    ) -> Result<String> {
        self.with_state(|state| {
            let id = state.live_node(handle)?;
            state.tree.fqdn(id).ok_or_else(|| RegistryError::StaleHandle(handle).into())
        })
    }

    /// Last segment of the handle's path
    pub fn handle_name(
        &self,
        handle: Handle,
    ) -> Result<String> {
        self.with_state(|state| {
            let id = state.live_node(handle)?;
            state
                .tree
                .key(id)
                .map(str::to_owned)
                .ok_or_else(|| RegistryError::StaleHandle(handle).into())
        })
    }

    /// String projection of the property addressed by `path`.
    ///
    /// The path resolves in two tiers: the longest registered prefix names a
    /// node, the rest is a property key inside that node's container. A path
    /// that resolves entirely to a node, the bare root name included,
    /// carries no value. Paths starting
    /// with the root segment are taken as fully qualified, anything else as
    /// relative to the root.
    pub fn get_value(
        &self,
        path: &str,
    ) -> Result<Option<String>> {
        let relative = path
            .strip_prefix(self.root_name())
            .and_then(|rest| rest.strip_prefix(self.delimiter()))
            .unwrap_or(path);

        let names_root = path == self.root_name();

        self.with_state(|state| {
            if names_root {
                return Ok(None);
            }
            let matched = state.tree.find_longest_match(state.root, relative);
            let Some(key) = matched.remainder else {
                return Ok(None);
            };
            let node = matched.node.unwrap_or(state.root);

            Ok(state
                .tree
                .value(node)
                .and_then(|container| container.get(&key))
                .and_then(|property| property.to_value_string()))
        })
    }

    /// Visits every property whose root-relative name matches `pattern`.
    ///
    /// The traversal starts at the node the pattern's literal prefix
    /// resolves to (the root when nothing resolves) and holds the registry
    /// lock throughout; each container is locked while its properties are
    /// visited. The visitor must not call back into the registry.
    pub fn query<F>(
        &self,
        pattern: &str,
        mut visitor: F,
    ) -> Result<()>
    where
        F: FnMut(&str, &Arc<dyn Property>),
    {
        let pattern = QueryPattern::new(pattern, self.delimiter())?;
        let delimiter = self.delimiter();

        self.with_state(|state| {
            let start = state.query_start(&pattern);
            trace!(pattern = pattern.as_str(), %start, "query started");

            state.tree.foreach(start, |id, node| {
                let Some(container) = node.value() else {
                    return;
                };
                let base = state.relative_name(id);

                container.foreach(&mut |key, property| {
                    let name = if base.is_empty() {
                        key.to_owned()
                    } else {
                        format!("{base}{delimiter}{key}")
                    };
                    if pattern.matches(&name) {
                        visitor(&name, property);
                    }
                });
            });
            Ok(())
        })
    }

    /// Root-relative names of the nodes matching `pattern`
    pub fn query_keys(
        &self,
        pattern: &str,
    ) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        self.query_nodes(pattern, |_, name| keys.push(name))?;
        Ok(keys)
    }

    /// Handles of the nodes matching `pattern`
    pub fn query_handles(
        &self,
        pattern: &str,
    ) -> Result<Vec<Handle>> {
        let mut handles = Vec::new();
        self.query_nodes(pattern, |handle, _| handles.push(handle))?;
        Ok(handles)
    }

    fn query_nodes<F>(
        &self,
        pattern: &str,
        mut on_match: F,
    ) -> Result<()>
    where
        F: FnMut(Handle, String),
    {
        let pattern = QueryPattern::new(pattern, self.delimiter())?;

        self.with_state(|state| {
            let start = state.query_start(&pattern);
            state.tree.foreach(start, |id, _| {
                if id == state.root {
                    return;
                }
                let name = state.relative_name(id);
                if pattern.matches(&name) {
                    on_match(state.handle(id), name);
                }
            });
            Ok(())
        })
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        self.destroy();
    }
}
