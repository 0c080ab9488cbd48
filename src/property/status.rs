use std::any::Any;
use std::sync::Arc;

use arc_swap::ArcSwapOption;

use super::Property;

/// Free-form status text (state names, versions, peer addresses).
///
/// Writers swap the whole string atomically, so a concurrent query sees
/// either the old or the new status, never a torn one.
#[derive(Debug, Default)]
pub struct StatusProperty {
    status: ArcSwapOption<String>,
}

impl StatusProperty {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: ArcSwapOption::from_pointee(status.into()),
        }
    }

    pub fn get(&self) -> Option<Arc<String>> {
        self.status.load_full()
    }

    pub fn set(
        &self,
        status: impl Into<String>,
    ) {
        self.status.store(Some(Arc::new(status.into())));
    }

    /// Unsets the status; queries then skip this property's value
    pub fn clear(&self) {
        self.status.store(None);
    }
}

impl Property for StatusProperty {
    fn to_value_string(&self) -> Option<String> {
        self.get().map(|status| status.as_ref().clone())
    }

    fn get_object(&self) -> Option<Arc<dyn Any + Send + Sync>> {
        self.get().map(|status| status as Arc<dyn Any + Send + Sync>)
    }
}
