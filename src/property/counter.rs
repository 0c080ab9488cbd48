use std::any::Any;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use super::Property;

/// Atomic integer counter.
///
/// Producers keep an `Arc` to the counter and update it directly; neither the
/// registry lock nor the container lock is involved.
#[derive(Debug, Default)]
pub struct CounterProperty {
    value: Arc<AtomicI64>,
}

impl CounterProperty {
    pub fn new(initial: i64) -> Self {
        Self {
            value: Arc::new(AtomicI64::new(initial)),
        }
    }

    pub fn get(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }

    pub fn set(
        &self,
        value: i64,
    ) {
        self.value.store(value, Ordering::Relaxed);
    }

    pub fn inc(&self) -> i64 {
        self.add(1)
    }

    pub fn dec(&self) -> i64 {
        self.add(-1)
    }

    /// Adds `delta` and returns the new value
    pub fn add(
        &self,
        delta: i64,
    ) -> i64 {
        self.value.fetch_add(delta, Ordering::Relaxed).wrapping_add(delta)
    }
}

impl Property for CounterProperty {
    fn to_value_string(&self) -> Option<String> {
        Some(self.get().to_string())
    }

    fn get_object(&self) -> Option<Arc<dyn Any + Send + Sync>> {
        Some(self.value.clone())
    }
}
