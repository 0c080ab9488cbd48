use std::collections::HashMap;
use std::sync::Arc;

use tracing_test::traced_test;

use super::*;
use crate::CounterProperty;
use crate::Handle;
use crate::PathTree;

fn stats_container() -> StatsCounterContainer {
    let mut tree: PathTree<()> = PathTree::new(".");
    StatsCounterContainer::new(Handle::new(0, tree.create("source.tcp.stats")))
}

#[test]
fn counter_kind_names_round_trip() {
    for kind in CounterKind::ALL {
        assert_eq!(kind.name().parse::<CounterKind>(), Ok(kind));
        assert_eq!(kind.to_string(), kind.name());
    }
    assert!("bogus".parse::<CounterKind>().is_err());
}

#[test]
fn every_counter_is_preallocated() {
    let container = stats_container();

    let mut seen = HashMap::new();
    container.foreach(&mut |key, property| {
        seen.insert(key.to_string(), property.to_value_string());
    });

    assert_eq!(container.len(), CounterKind::ALL.len());
    for kind in CounterKind::ALL {
        assert_eq!(seen.get(kind.name()), Some(&Some("0".to_string())));
    }
}

#[test]
fn get_returns_the_same_counter_the_producer_updates() {
    let container = stats_container();
    container.counter(CounterKind::Processed).add(12);

    let property = container.get("processed").unwrap();
    assert_eq!(property.to_value_string().as_deref(), Some("12"));
    assert!(container.get("unknown").is_none());
}

#[test]
#[traced_test]
fn add_and_remove_are_ignored() {
    let container = stats_container();

    container.add("extra", Arc::new(CounterProperty::new(1)));
    container.remove("dropped");

    assert!(container.get("extra").is_none());
    assert!(container.get("dropped").is_some());
    assert!(logs_contain("add ignored"));
    assert!(logs_contain("remove ignored"));
}

#[test]
fn reset_zeroes_every_counter() {
    let container = stats_container();
    for kind in CounterKind::ALL {
        container.counter(kind).set(5);
    }

    container.reset();

    for kind in CounterKind::ALL {
        assert_eq!(container.counter(kind).get(), 0);
    }
}
