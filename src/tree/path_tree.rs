use std::collections::HashMap;

use tracing::trace;
use tracing::warn;

use super::NodeId;
use super::PathNode;

/// Result of [`PathTree::find_longest_match`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongestMatch {
    /// Deepest node resolved below the starting root, `None` if not even the
    /// first segment matched.
    pub node: Option<NodeId>,
    /// Unresolved trailing segments rejoined with the delimiter, `None` when
    /// the whole path was consumed.
    pub remainder: Option<String>,
}

struct Slot<V> {
    generation: u32,
    node: Option<PathNode<V>>,
}

/// Arena-backed forest of path nodes.
pub struct PathTree<V> {
    slots: Vec<Slot<V>>,
    free_slots: Vec<u32>,
    delimiter: String,
    live: usize,
}

impl<V> PathTree<V> {
    pub fn new(delimiter: impl Into<String>) -> Self {
        let delimiter = delimiter.into();
        debug_assert!(!delimiter.is_empty(), "path delimiter cannot be empty");
        Self {
            slots: Vec::new(),
            free_slots: Vec::new(),
            delimiter,
            live: 0,
        }
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Number of live nodes across every tree in the arena
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn contains(
        &self,
        id: NodeId,
    ) -> bool {
        self.node(id).is_some()
    }

    pub fn node(
        &self,
        id: NodeId,
    ) -> Option<&PathNode<V>> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn node_mut(
        &mut self,
        id: NodeId,
    ) -> Option<&mut PathNode<V>> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    fn alloc(
        &mut self,
        key: &str,
        parent: Option<NodeId>,
    ) -> NodeId {
        let node = PathNode::new(key, parent);
        self.live += 1;

        if let Some(index) = self.free_slots.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    fn release(
        &mut self,
        id: NodeId,
    ) -> Option<PathNode<V>> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_slots.push(id.index);
        self.live -= 1;
        Some(node)
    }

    fn split<'p>(
        &self,
        path: &'p str,
    ) -> Vec<&'p str> {
        path.split(self.delimiter.as_str()).collect()
    }

    /// Puts `child` into the child map of `parent`, allocating the map on the
    /// first child. Returns a same-keyed sibling that got displaced.
    fn link(
        &mut self,
        parent: NodeId,
        child: NodeId,
    ) -> Option<NodeId> {
        let key = {
            let node = self.node_mut(child)?;
            node.parent = Some(parent);
            node.key.clone()
        };

        let displaced = self
            .node_mut(parent)?
            .children
            .get_or_insert_with(HashMap::new)
            .insert(key, child)
            .filter(|displaced| *displaced != child);

        if let Some(displaced) = displaced {
            if let Some(node) = self.node_mut(displaced) {
                node.parent = None;
            }
        }
        displaced
    }

    fn create_chain(
        &mut self,
        mut parent: NodeId,
        keys: &[&str],
    ) -> NodeId {
        for key in keys {
            let child = self.alloc(key, Some(parent));
            self.link(parent, child);
            parent = child;
        }
        parent
    }

    /// Walks children segment by segment starting below `root`.
    /// Returns the deepest matched node and how many segments it consumed.
    fn resolve(
        &self,
        root: NodeId,
        keys: &[&str],
    ) -> (Option<NodeId>, usize) {
        let mut current = root;
        let mut matched = None;
        let mut consumed = 0;

        for key in keys {
            match self.node(current).and_then(|node| node.child(key)) {
                Some(child) => {
                    current = child;
                    matched = Some(child);
                    consumed += 1;
                }
                None => break,
            }
        }

        (matched, consumed)
    }

    /// Builds a detached top-to-bottom chain, one node per segment of
    /// `path`, and returns the deepest node. Use [`Self::top_root`] to get
    /// back to the top of the chain.
    pub fn create(
        &mut self,
        path: &str,
    ) -> NodeId {
        let mut keys = self.split(path).into_iter();
        let top = self.alloc(keys.next().unwrap_or_default(), None);
        let rest: Vec<&str> = keys.collect();
        self.create_chain(top, &rest)
    }

    /// Inserts `path` below `root`, reusing every existing prefix node and
    /// creating the missing tail under the deepest match. Returns the node
    /// for the last segment, whether it was created or already present.
    pub fn insert(
        &mut self,
        root: NodeId,
        path: &str,
    ) -> Option<NodeId> {
        if !self.contains(root) {
            return None;
        }

        let keys = self.split(path);
        let (matched, consumed) = self.resolve(root, &keys);
        let node = self.create_chain(matched.unwrap_or(root), &keys[consumed..]);

        trace!(?root, path, created = keys.len() - consumed, "path inserted");
        Some(node)
    }

    /// Exact lookup below `root`; `root` itself is never returned.
    pub fn find(
        &self,
        root: NodeId,
        path: &str,
    ) -> Option<NodeId> {
        match self.find_longest_match(root, path) {
            LongestMatch {
                node,
                remainder: None,
            } => node,
            _ => None,
        }
    }

    pub fn find_longest_match(
        &self,
        root: NodeId,
        path: &str,
    ) -> LongestMatch {
        if !self.contains(root) {
            return LongestMatch {
                node: None,
                remainder: Some(path.to_owned()),
            };
        }

        let keys = self.split(path);
        let (node, consumed) = self.resolve(root, &keys);
        let remainder = (consumed < keys.len()).then(|| keys[consumed..].join(self.delimiter.as_str()));

        LongestMatch { node, remainder }
    }

    /// Detaches the node at `path` from its parent. The subtree stays in the
    /// arena as a standalone root owned by the caller; it must be either
    /// joined somewhere or freed.
    pub fn unlink(
        &mut self,
        root: NodeId,
        path: &str,
    ) -> Option<NodeId> {
        let node = self.find(root, path)?;
        self.unlink_node(node)
    }

    /// Detaches `node` from its parent, if it has one.
    pub fn unlink_node(
        &mut self,
        node: NodeId,
    ) -> Option<NodeId> {
        let parent = self.node_mut(node)?.parent.take();

        if let Some(parent) = parent {
            let key = self.node(node)?.key.clone();
            if let Some(parent_node) = self.node_mut(parent) {
                if let Some(children) = parent_node.children.as_mut() {
                    children.remove(&key);
                    if children.is_empty() {
                        parent_node.children = None;
                    }
                }
            }
        }

        Some(node)
    }

    /// Grafts `subtree` under `root`, re-parenting it. A subtree that is
    /// still attached elsewhere is moved.
    ///
    /// No-op when either id is not alive or when `root` lies inside
    /// `subtree`. If `root` already had a child with the subtree's key, that
    /// child is detached and returned to the caller.
    pub fn join(
        &mut self,
        root: NodeId,
        subtree: NodeId,
    ) -> Option<NodeId> {
        if !self.contains(root) || !self.contains(subtree) {
            return None;
        }

        if self.ancestors(root).any(|ancestor| ancestor == subtree) {
            warn!(?root, ?subtree, "refusing to join a subtree under its own descendant");
            return None;
        }

        self.unlink_node(subtree);
        self.link(root, subtree)
    }

    /// Releases `node` and all of its descendants, post-order, handing every
    /// attached value to `on_value` before its node goes away. The node is
    /// detached from its parent first. Returns the number of freed nodes.
    pub fn free<F>(
        &mut self,
        node: NodeId,
        mut on_value: F,
    ) -> usize
    where
        F: FnMut(V),
    {
        if self.unlink_node(node).is_none() {
            return 0;
        }

        let mut freed = 0;
        let mut stack = vec![(node, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                if let Some(released) = self.release(id) {
                    if let Some(value) = released.value {
                        on_value(value);
                    }
                    freed += 1;
                }
                continue;
            }

            stack.push((id, true));
            if let Some(current) = self.node(id) {
                stack.extend(current.children().map(|child| (child, false)));
            }
        }

        trace!(?node, freed, "subtree freed");
        freed
    }

    /// Pre-order traversal: `node` first, then its descendants. Sibling
    /// order is unspecified.
    pub fn foreach<F>(
        &self,
        node: NodeId,
        mut visitor: F,
    ) where
        F: FnMut(NodeId, &PathNode<V>),
    {
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(current) = self.node(id) {
                visitor(id, current);
                stack.extend(current.children());
            }
        }
    }

    /// `node` and its ancestors up to its top root
    pub fn ancestors(
        &self,
        node: NodeId,
    ) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.node(node).map(|_| node), move |id| {
            self.node(*id).and_then(PathNode::parent)
        })
    }

    pub fn top_root(
        &self,
        node: NodeId,
    ) -> Option<NodeId> {
        self.ancestors(node).last()
    }

    pub fn parent(
        &self,
        node: NodeId,
    ) -> Option<NodeId> {
        self.node(node)?.parent
    }

    pub fn key(
        &self,
        node: NodeId,
    ) -> Option<&str> {
        self.node(node).map(PathNode::key)
    }

    pub fn children(
        &self,
        node: NodeId,
    ) -> Vec<NodeId> {
        self.node(node).map(|n| n.children().collect()).unwrap_or_default()
    }

    /// Fully qualified name from the top root down to `node`, recomputed on
    /// every call.
    pub fn fqdn(
        &self,
        node: NodeId,
    ) -> Option<String> {
        let mut keys: Vec<&str> = self
            .ancestors(node)
            .filter_map(|id| self.key(id))
            .collect();
        if keys.is_empty() {
            return None;
        }
        keys.reverse();
        Some(keys.join(self.delimiter.as_str()))
    }

    /// The node itself plus all of its descendants; 0 for a dead id.
    pub fn size(
        &self,
        node: NodeId,
    ) -> usize {
        let mut count = 0;
        self.foreach(node, |_, _| count += 1);
        count
    }

    /// Total number of descendants (`size - 1`), not the immediate fan-out.
    pub fn n_children(
        &self,
        node: NodeId,
    ) -> usize {
        self.size(node).saturating_sub(1)
    }

    /// 0 for a leaf, otherwise one more than the tallest child
    pub fn height(
        &self,
        node: NodeId,
    ) -> usize {
        let mut height = 0;
        let mut stack = vec![(node, 0)];
        while let Some((id, depth)) = stack.pop() {
            if let Some(current) = self.node(id) {
                height = height.max(depth);
                stack.extend(current.children().map(|child| (child, depth + 1)));
            }
        }
        height
    }

    pub fn size_at(
        &self,
        root: NodeId,
        path: &str,
    ) -> usize {
        self.find(root, path).map_or(0, |node| self.size(node))
    }

    pub fn n_children_at(
        &self,
        root: NodeId,
        path: &str,
    ) -> usize {
        self.size_at(root, path).saturating_sub(1)
    }

    pub fn height_at(
        &self,
        root: NodeId,
        path: &str,
    ) -> usize {
        self.find(root, path).map_or(0, |node| self.height(node))
    }

    pub fn value(
        &self,
        node: NodeId,
    ) -> Option<&V> {
        self.node(node)?.value.as_ref()
    }

    pub fn value_mut(
        &mut self,
        node: NodeId,
    ) -> Option<&mut V> {
        self.node_mut(node)?.value.as_mut()
    }

    /// Attaches `value` to `node` and returns the previous one. A dead id
    /// hands `value` straight back.
    pub fn set_value(
        &mut self,
        node: NodeId,
        value: V,
    ) -> Option<V> {
        match self.node_mut(node) {
            Some(current) => current.value.replace(value),
            None => Some(value),
        }
    }

    pub fn take_value(
        &mut self,
        node: NodeId,
    ) -> Option<V> {
        self.node_mut(node)?.value.take()
    }

    pub fn get_value(
        &self,
        root: NodeId,
        path: &str,
    ) -> Option<&V> {
        self.value(self.find(root, path)?)
    }

    /// Sets the value of the node at `path`; false if it does not resolve.
    pub fn set_value_at(
        &mut self,
        root: NodeId,
        path: &str,
        value: V,
    ) -> bool {
        match self.find(root, path) {
            Some(node) => {
                self.set_value(node, value);
                true
            }
            None => false,
        }
    }
}
