use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;

use hds_registry::process_query_command;
use hds_registry::CounterKind;
use hds_registry::Registry;
use hds_registry::RegistryConfig;
use hds_registry::StatsCounterContainer;

use crate::common::new_registry;
use crate::common::set_counter;

const PRODUCERS: usize = 4;
const INCREMENTS: i64 = 2_000;

#[test]
fn producers_update_counters_while_queries_run() {
    let registry = Arc::new(new_registry());
    let done = Arc::new(AtomicBool::new(false));

    let counters: Vec<_> = (0..PRODUCERS)
        .map(|i| set_counter(&registry, &format!("src.worker.{i}"), "processed", 0))
        .collect();

    let reader = {
        let registry = registry.clone();
        let done = done.clone();
        thread::spawn(move || {
            let mut last = 0;
            while !done.load(Ordering::Acquire) {
                let output = process_query_command(&registry, "QUERY SUM_AGGREGATE src.worker").unwrap();
                let total: i64 = output.trim().parse().unwrap();
                assert!(total >= last, "counters only grow: {total} < {last}");
                last = total;
            }
        })
    };

    let producers: Vec<_> = counters
        .into_iter()
        .map(|counter| {
            thread::spawn(move || {
                for _ in 0..INCREMENTS {
                    counter.inc();
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }
    done.store(true, Ordering::Release);
    reader.join().unwrap();

    let total = process_query_command(&registry, "QUERY SUM_AGGREGATE src.worker").unwrap();
    assert_eq!(total, format!("{}\n", PRODUCERS as i64 * INCREMENTS));
}

#[test]
fn concurrent_registration_converges_on_one_node_per_path() {
    let registry = Arc::new(new_registry());

    let workers: Vec<_> = (0..PRODUCERS)
        .map(|_| {
            let registry = registry.clone();
            thread::spawn(move || {
                (0..50)
                    .map(|i| registry.register_handle(&format!("dst.shard.{i}")).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();
    let results: Vec<_> = workers.into_iter().map(|w| w.join().unwrap()).collect();

    for handles in &results[1..] {
        assert_eq!(handles, &results[0]);
    }
    // root, dst, shard and fifty leaves
    assert_eq!(registry.node_count().unwrap(), 53);
}

#[test]
fn racing_acquirers_share_one_container() {
    let registry = Arc::new(new_registry());
    let handle = registry.register_handle("src.network.tcp").unwrap();

    let acquirers: Vec<_> = (0..PRODUCERS)
        .map(|_| {
            let registry = registry.clone();
            thread::spawn(move || {
                let container = registry
                    .acquire_property_container(handle, Some(StatsCounterContainer::constructor))
                    .unwrap()
                    .unwrap();
                for _ in 0..100 {
                    let processed = container.get(CounterKind::Processed.name()).unwrap();
                    let counter = processed
                        .get_object()
                        .unwrap()
                        .downcast::<std::sync::atomic::AtomicI64>()
                        .unwrap();
                    counter.fetch_add(1, Ordering::Relaxed);
                }
                container
            })
        })
        .collect();
    let containers: Vec<_> = acquirers.into_iter().map(|a| a.join().unwrap()).collect();

    for container in &containers[1..] {
        assert!(Arc::ptr_eq(container, &containers[0]));
    }
    assert_eq!(
        registry.get_value("src.network.tcp.processed").unwrap().as_deref(),
        Some("400")
    );
}

#[test]
fn unregister_during_queries_is_safe() {
    let registry = Arc::new(Registry::new(RegistryConfig::default()));
    registry.init();
    for i in 0..20 {
        set_counter(&registry, &format!("dst.session.{i}"), "bytes", 1);
    }

    let reader = {
        let registry = registry.clone();
        thread::spawn(move || {
            for _ in 0..200 {
                let total: i64 = process_query_command(&registry, "QUERY SUM_AGGREGATE dst.session")
                    .unwrap()
                    .trim()
                    .parse()
                    .unwrap();
                assert!((0..=20).contains(&total));
            }
        })
    };

    for i in 0..20 {
        let handle = registry.get_handle(&format!("dst.session.{i}")).unwrap().unwrap();
        registry.unregister_handle(handle).unwrap();
    }
    reader.join().unwrap();

    assert_eq!(
        process_query_command(&registry, "QUERY LIST dst.session").unwrap(),
        ""
    );
}
