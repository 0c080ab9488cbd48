//! Polymorphic scalar values stored inside property containers.

mod counter;
mod status;

pub use counter::*;
pub use status::*;


use std::any::Any;
use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

/// A single stored value exposing a string projection.
///
/// Implementations are shared between the container that owns them and the
/// producer that mutates them, so every method takes `&self` and any
/// mutation goes through interior mutability.
#[cfg_attr(test, automock)]
pub trait Property: Send + Sync + 'static {
    /// String projection used by queries; `None` when the value is unset.
    fn to_value_string(&self) -> Option<String>;

    /// The underlying object, for producers that need more than the string.
    fn get_object(&self) -> Option<Arc<dyn Any + Send + Sync>> {
        None
    }
}
