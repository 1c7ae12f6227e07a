//! Unit tests for core optoken types, configuration and error messages.
mod common;
use common::*;
use optoken::prelude::*;

#[test]
fn test_op_class_tokens() {
    assert_eq!("ac".parse::<OpClass>(), Ok(OpClass::Activation));
    assert_eq!(" Sync ".parse::<OpClass>(), Ok(OpClass::PoolSync));
    assert_eq!(
        "zz".parse::<OpClass>(),
        Ok(OpClass::Other("ZZ".to_string()))
    );
    assert!("".parse::<OpClass>().is_err());

    assert!(OpClass::PreStep.is_maintenance());
    assert!(OpClass::PostStep.is_maintenance());
    assert!(!OpClass::Stock.is_maintenance());
    assert_eq!(format!("{}", OpClass::Shipment), "SH");
}

#[test]
fn test_route_helpers() {
    let others: Vec<Route> = Route::Reduction.others().collect();
    assert_eq!(others, vec![Route::Activation, Route::Shipment]);
    assert_eq!(Route::Shipment.to_string(), "shipment");
    assert_eq!(
        serde_json::to_string(&Route::Activation).unwrap(),
        "\"activation\""
    );
}

#[test]
fn test_program_set_get_and_set() {
    let mut programs = ProgramSet::default();
    programs.set(Route::Reduction, "RD:10FD:P1:5".to_string());
    assert_eq!(programs.get(Route::Reduction), "RD:10FD:P1:5");
    assert_eq!(programs.get(Route::Activation), "");
}

#[test]
fn test_config_defaults_and_overrides() {
    let config = EditorConfig::default();
    assert_eq!(config.label_len, 8);
    assert_eq!(config.maintenance, MaintenancePolicy::PassThrough);
    assert!(!config.reject_invalid);

    let config = EditorConfig::from_json(r#"{ "maintenance": "drop", "label_len": 4 }"#)
        .expect("config should parse");
    assert_eq!(config.maintenance, MaintenancePolicy::Drop);
    assert_eq!(config.label_len, 4);
    assert!(!config.reject_invalid);

    assert!(matches!(
        EditorConfig::from_json("{ \"label_len\": \"wide\" }"),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        EditorConfig::from_file("does/not/exist.json"),
        Err(ConfigError::Read { .. })
    ));
}

#[test]
fn test_store_fixture_from_json() {
    let store = MemoryStore::from_json(
        r#"{
            "entities": [{ "id": "P1", "name": "Widget" }],
            "programs": { "P1": { "activation": "AC:290W:P1" } }
        }"#,
    )
    .expect("fixture should parse");

    let programs = tokio_test::block_on(store.fetch_product_programs("P1")).unwrap();
    assert_eq!(programs.activation, "AC:290W:P1");
    assert_eq!(programs.shipment, "");
    assert!(
        tokio_test::block_on(store.fetch_operation_registry())
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_descriptor_class_round_trips_through_json() {
    let descriptors = create_registry_descriptors();
    let json = serde_json::to_value(&descriptors[3]).unwrap();
    assert_eq!(json["class"], "RD");
    assert_eq!(json["postop"]["ratio_param"], 0);
}

#[test]
fn test_error_display() {
    let err = ParseWarning::MissingFields {
        entry: "AC:290W".to_string(),
        found: 2,
    };
    assert!(err.to_string().contains("AC:290W"));
    assert!(err.to_string().contains('2'));

    let err = EditError::MoveOutOfRange {
        node_id: NodeId(4),
        to_index: 9,
        len: 2,
    };
    assert!(err.to_string().contains("n4"));
    assert!(err.to_string().contains('9'));

    let err = EditorError::from(StoreError::Rejected("stale program".to_string()));
    assert!(err.to_string().contains("stale program"));

    let failure = CommitFailure::Invalid(vec![ValidationIssue::UnboundEntity {
        node_id: NodeId(0),
    }]);
    assert!(failure.to_string().contains("1 issue"));
}
