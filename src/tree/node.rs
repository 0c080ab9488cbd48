use std::collections::HashMap;
use std::fmt;

/// Generational index of a node inside a [`PathTree`](super::PathTree) arena.
///
/// An id stays valid while its node is alive, across `unlink` and `join`.
/// Once the node is freed the slot generation moves on, so a stale id never
/// resolves to whatever node reuses the slot later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(super) index: u32,
    pub(super) generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// One path segment of the tree.
///
/// `parent` is a non-owning back-reference into the same arena. A node is a
/// leaf iff it has no child map.
#[derive(Debug)]
pub struct PathNode<V> {
    pub(super) key: String,
    pub(super) parent: Option<NodeId>,
    pub(super) children: Option<HashMap<String, NodeId>>,
    pub(super) value: Option<V>,
}

impl<V> PathNode<V> {
    pub(super) fn new(
        key: &str,
        parent: Option<NodeId>,
    ) -> Self {
        Self {
            key: key.to_owned(),
            parent,
            children: None,
            value: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Immediate children, in unspecified order
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.iter().flat_map(|children| children.values().copied())
    }

    /// Number of immediate children
    pub fn fan_out(&self) -> usize {
        self.children.as_ref().map_or(0, HashMap::len)
    }

    pub(super) fn child(
        &self,
        key: &str,
    ) -> Option<NodeId> {
        self.children.as_ref()?.get(key).copied()
    }
}
