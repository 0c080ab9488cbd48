//! Path-indexed tree.
//!
//! [`PathTree`] is a trie over delimiter-separated path segments. All nodes
//! live in one arena, which may hold several disjoint trees at once: a
//! subtree detached with [`PathTree::unlink`] stays in the arena as its own
//! root until it is grafted back with [`PathTree::join`] or released with
//! [`PathTree::free`].
//!
//! Lookups come in two flavours:
//! - [`PathTree::find`] resolves a path exactly and never returns the root it
//!   started from.
//! - [`PathTree::find_longest_match`] resolves as deep as the tree allows and
//!   hands back the unresolved tail. The registry uses that tail as the key
//!   of a property inside the matched node's container.

mod node;
mod path_tree;

pub use node::*;
pub use path_tree::*;
