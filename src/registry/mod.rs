//! The registry: one path tree, one coarse lock, and the handle-based API
//! producers and the query interpreter work through.

mod handle;
#[allow(clippy::module_inception)]
mod registry;

pub use handle::*;
pub use registry::*;
