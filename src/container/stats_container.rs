use std::any::Any;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;
use tracing::trace;

use super::PropertyContainer;
use crate::CounterProperty;
use crate::Handle;
use crate::Property;

/// Counters every statistics node carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterKind {
    Dropped,
    Processed,
    Stored,
    Suppressed,
    Stamp,
}

impl CounterKind {
    pub const ALL: [CounterKind; 5] = [
        CounterKind::Dropped,
        CounterKind::Processed,
        CounterKind::Stored,
        CounterKind::Suppressed,
        CounterKind::Stamp,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CounterKind::Dropped => "dropped",
            CounterKind::Processed => "processed",
            CounterKind::Stored => "stored",
            CounterKind::Suppressed => "suppressed",
            CounterKind::Stamp => "stamp",
        }
    }
}

impl fmt::Display for CounterKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CounterKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CounterKind::ALL.into_iter().find(|kind| kind.name() == s).ok_or(())
    }
}

/// Static container with one preallocated counter per [`CounterKind`].
///
/// The key set never changes, so `add` and `remove` are ignored and no lock
/// is needed around the key set; the counters themselves are atomic.
pub struct StatsCounterContainer {
    owner: Handle,
    counters: Vec<(CounterKind, Arc<CounterProperty>)>,
    properties: Vec<Arc<dyn Property>>,
}

impl StatsCounterContainer {
    pub fn new(owner: Handle) -> Self {
        let counters: Vec<_> = CounterKind::ALL
            .into_iter()
            .map(|kind| (kind, Arc::new(CounterProperty::default())))
            .collect();
        let properties = counters
            .iter()
            .map(|(_, counter)| counter.clone() as Arc<dyn Property>)
            .collect();

        trace!(%owner, "stats counter container created");
        Self {
            owner,
            counters,
            properties,
        }
    }

    /// [`ContainerConstructor`](super::ContainerConstructor) for registry nodes
    pub fn constructor(owner: Handle) -> Arc<dyn PropertyContainer> {
        Arc::new(Self::new(owner))
    }

    pub fn counter(
        &self,
        kind: CounterKind,
    ) -> &Arc<CounterProperty> {
        &self.counters[kind as usize].1
    }

    /// Zeroes every counter
    pub fn reset(&self) {
        for (_, counter) in &self.counters {
            counter.set(0);
        }
    }
}

impl PropertyContainer for StatsCounterContainer {
    fn owner(&self) -> Handle {
        self.owner
    }

    fn add(
        &self,
        key: &str,
        _property: Arc<dyn Property>,
    ) {
        debug!(owner = %self.owner, key, "stats counter container is static, add ignored");
    }

    fn remove(
        &self,
        key: &str,
    ) {
        debug!(owner = %self.owner, key, "stats counter container is static, remove ignored");
    }

    fn get(
        &self,
        key: &str,
    ) -> Option<Arc<dyn Property>> {
        let kind: CounterKind = key.parse().ok()?;
        Some(self.properties[kind as usize].clone())
    }

    fn foreach(
        &self,
        visitor: &mut dyn FnMut(&str, &Arc<dyn Property>),
    ) {
        for ((kind, _), property) in self.counters.iter().zip(&self.properties) {
            visitor(kind.name(), property);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn len(&self) -> usize {
        self.counters.len()
    }
}
