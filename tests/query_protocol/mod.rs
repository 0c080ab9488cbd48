use hds_registry::process_query_command;
use hds_registry::Error;
use hds_registry::HdsConfig;
use hds_registry::QueryInterpreter;
use hds_registry::Registry;

use crate::common::fixture_registry;
use crate::common::set_counter;
use crate::common::sorted_lines;

#[test]
fn list_sum_and_aggregate_agree() {
    let registry = fixture_registry();

    let listed = sorted_lines(&process_query_command(&registry, "QUERY LIST src.*").unwrap());
    let summed = sorted_lines(&process_query_command(&registry, "QUERY SUM src.*").unwrap());
    let total = process_query_command(&registry, "QUERY SUM_AGGREGATE src.*").unwrap();

    assert_eq!(listed, vec!["src.java.jdbc.1", "src.java.kafka.1", "src.network.tcp.1"]);
    assert_eq!(summed.len(), listed.len());
    for (sum_line, name) in summed.iter().zip(&listed) {
        assert!(sum_line.starts_with(&format!("{name}: ")));
    }

    let from_sum: i64 = summed
        .iter()
        .map(|line| line.rsplit(": ").next().unwrap().parse::<i64>().unwrap())
        .sum();
    assert_eq!(total, format!("{from_sum}\n"));
}

#[test]
fn unregistered_paths_drop_out_of_results() {
    let registry = fixture_registry();
    let java = registry.get_handle("src.java").unwrap().unwrap();

    registry.unregister_handle(java).unwrap();

    assert_eq!(
        process_query_command(&registry, "QUERY LIST src.*").unwrap(),
        "src.network.tcp.1\n"
    );
    assert_eq!(
        process_query_command(&registry, "QUERY SUM_AGGREGATE *").unwrap(),
        "14\n"
    );
}

#[test]
fn properties_registered_on_intermediate_nodes_are_visible() {
    let registry = fixture_registry();
    set_counter(&registry, "dst.java", "connections", 5);

    assert_eq!(
        sorted_lines(&process_query_command(&registry, "QUERY SUM dst.java").unwrap()),
        vec!["dst.java.connections: 5", "dst.java.hdfs.1: 3", "dst.java.kafka.1: 1"]
    );
    assert_eq!(
        process_query_command(&registry, "QUERY SUM_AGGREGATE dst.java.*").unwrap(),
        "9\n"
    );
}

#[test]
fn rejected_commands_leave_registry_usable() {
    let registry = fixture_registry();

    for line in ["", "QUERY", "QUERY FETCH *", "GET LIST *", "QUERY LIST [*"] {
        let err = process_query_command(&registry, line).unwrap_err();
        assert!(err.is_rejected_command(), "{line:?} gave {err}");
    }

    assert_eq!(process_query_command(&registry, "QUERY SUM_AGGREGATE *").unwrap(), "20\n");
}

#[test]
fn destroyed_registry_refuses_queries() {
    let registry = fixture_registry();
    registry.destroy();

    assert!(matches!(
        process_query_command(&registry, "QUERY LIST *"),
        Err(Error::Registry(_))
    ));
}

#[test]
fn interpreter_built_from_loaded_config() {
    let config = HdsConfig::default().validate().unwrap();
    let registry = Registry::new(config.registry.clone());
    registry.init();
    set_counter(&registry, "dst.java.kafka", "1", 1);

    let interpreter = QueryInterpreter::new(&registry, config.query.clone());

    assert_eq!(interpreter.process("QUERY SUM dst").unwrap(), "dst.java.kafka.1: 1\n");
}
