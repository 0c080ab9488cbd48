use std::fmt;

use crate::NodeId;

/// Opaque reference to a registered path.
///
/// Stays valid until the path (or one of its ancestors) is unregistered or
/// the registry is destroyed; afterwards registry calls taking it fail with
/// `StaleHandle`. The epoch names the registry tree that issued the handle,
/// so handles never resolve in another registry or after a re-init.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Handle {
    epoch: u64,
    node: NodeId,
}

impl Handle {
    pub(crate) fn new(
        epoch: u64,
        node: NodeId,
    ) -> Self {
        Self { epoch, node }
    }

    pub(crate) fn epoch(self) -> u64 {
        self.epoch
    }

    pub(crate) fn node_id(self) -> NodeId {
        self.node
    }
}

impl fmt::Display for Handle {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "handle{}@{}", self.node, self.epoch)
    }
}
