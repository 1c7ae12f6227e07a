//! Tests for parsing and encoding program strings.
use optoken::prelude::*;

fn tokens(program: &str) -> Vec<&str> {
    program.split_whitespace().collect()
}

#[test]
fn test_parse_maps_positional_fields() {
    let parsed = parse("ac:290W:P1 RD:10FD:P1:5:extra", "P0");

    assert!(parsed.warnings.is_empty());
    assert_eq!(parsed.instructions.len(), 2);

    let first = &parsed.instructions[0];
    assert_eq!(first.class, Some(OpClass::Activation));
    assert_eq!(first.function, "290W");
    assert_eq!(first.target_id, "P1");
    assert!(first.params.is_empty());

    let second = &parsed.instructions[1];
    assert_eq!(second.class, Some(OpClass::Reduction));
    assert_eq!(second.params, vec!["5".to_string(), "extra".to_string()]);
}

#[test]
fn test_parse_falls_back_to_caller_target() {
    let parsed = parse("AC:290W:", "P7");
    assert_eq!(parsed.instructions.len(), 1);
    assert_eq!(parsed.instructions[0].target_id, "P7");

    // Without a fallback the entry has no target and is dropped.
    let parsed = parse("AC:290W:", "");
    assert!(parsed.instructions.is_empty());
    assert_eq!(
        parsed.warnings,
        vec![ParseWarning::EmptyField {
            entry: "AC:290W:".to_string(),
            field: "target",
        }]
    );
}

#[test]
fn test_parse_drops_malformed_entries() {
    let parsed = parse("AC:290W  :10FD:P1 RD::P1 AC:300M:P2:4", "P1");

    assert_eq!(parsed.instructions.len(), 1);
    assert_eq!(parsed.instructions[0].function, "300M");
    assert_eq!(parsed.warnings.len(), 3);
    assert!(matches!(
        &parsed.warnings[0],
        ParseWarning::MissingFields { found: 2, .. }
    ));
    assert!(matches!(
        &parsed.warnings[1],
        ParseWarning::EmptyField { field: "class", .. }
    ));
    assert!(matches!(
        &parsed.warnings[2],
        ParseWarning::EmptyField {
            field: "function",
            ..
        }
    ));
}

#[test]
fn test_parse_keeps_interior_empty_params_positionally() {
    let parsed = parse("RD:20RT:P3::note", "P3");
    assert_eq!(
        parsed.instructions[0].params,
        vec![String::new(), "note".to_string()]
    );
}

#[test]
fn test_parse_separates_maintenance_entries() {
    let parsed = parse("pre:WARM:P1 AC:290W:P1 SYNC:POOL:P1:x POST:LOG:P1", "P1");

    assert_eq!(parsed.instructions.len(), 1);
    let raw: Vec<&str> = parsed.passthrough.iter().map(|e| e.raw.as_str()).collect();
    // Raw text is kept exactly as authored, including its casing.
    assert_eq!(raw, vec!["pre:WARM:P1", "SYNC:POOL:P1:x", "POST:LOG:P1"]);
    assert_eq!(parsed.passthrough[0].class, OpClass::PreStep);
}

#[test]
fn test_round_trip_is_token_equivalent() {
    let programs = [
        "AC:290W:P1 RD:10FD:P1:5",
        "AC:300M:P2:4 AC:290W:P2 RD:20RT:P3:0.5:note",
        "SH:5SH:P1:2:DHL",
        "",
    ];
    let config = EditorConfig::default();

    for program in programs {
        let tree = ProgramTree::from_program(program, "P", Route::Activation, &config);
        let encoded = encode(tree.nodes());
        assert_eq!(tokens(&encoded), tokens(program), "round trip of '{program}'");
    }
}

#[test]
fn test_encode_upper_cases_class_and_skips_empty_params() {
    let tree = ProgramTree::from_program(
        "rd:20RT:P3::note",
        "P3",
        Route::Reduction,
        &EditorConfig::default(),
    );
    assert_eq!(encode(tree.nodes()), "RD:20RT:P3:note");
}

#[test]
fn test_encode_skips_unbound_entities_and_drafts() {
    let mut tree = ProgramTree::from_program(
        "AC:290W:P1",
        "P1",
        Route::Activation,
        &EditorConfig::default(),
    );
    let p1 = tree.nodes()[0].id;
    tree.apply(EditCommand::AppendAction { parent_id: p1 }).unwrap();
    let unbound = tree.apply(EditCommand::AppendEntity).unwrap();
    tree.apply(EditCommand::AppendAction { parent_id: unbound }).unwrap();

    assert_eq!(encode(tree.nodes()), "AC:290W:P1");
}

#[test]
fn test_encode_program_passes_maintenance_entries_through() {
    let config = EditorConfig::default();
    let tree = ProgramTree::from_program(
        "SYNC:POOL:P1 AC:290W:P1 PRE:WARM:P1 RD:10FD:P1:5",
        "P1",
        Route::Activation,
        &config,
    );

    assert_eq!(
        encode_program(&tree, MaintenancePolicy::PassThrough),
        "PRE:WARM:P1 AC:290W:P1 RD:10FD:P1:5 SYNC:POOL:P1"
    );
    assert_eq!(
        encode_program(&tree, MaintenancePolicy::Drop),
        "AC:290W:P1 RD:10FD:P1:5"
    );
}

#[test]
fn test_encode_program_with_only_maintenance_entries() {
    let tree = ProgramTree::from_program(
        "POST:LOG:P1",
        "P1",
        Route::Shipment,
        &EditorConfig::default(),
    );
    assert!(tree.nodes().is_empty());
    assert_eq!(
        encode_program(&tree, MaintenancePolicy::PassThrough),
        "POST:LOG:P1"
    );
}

#[test]
fn test_instruction_token() {
    let instruction = Instruction::new(
        OpClass::Other("XX".to_string()),
        "F",
        "P1",
        vec!["1".to_string(), String::new(), "3".to_string()],
    );
    assert_eq!(instruction.to_token().as_deref(), Some("XX:F:P1:1:3"));
    assert_eq!(Instruction::draft("P1").to_token(), None);
}

#[test]
fn test_encode_program_moves_interleaved_maintenance_entries() {
    let mut tree = ProgramTree::from_program(
        "PRE:P:P1 AC:290W:P1 POST:X:P1 AC:300M:P2",
        "P1",
        Route::Activation,
        &EditorConfig::default(),
    );
    let action = tree.nodes()[1].actions[0].id;
    tree.apply(EditCommand::SetInstructionField {
        node_id: action,
        field: InstructionField::Param(0),
        value: "3".to_string(),
    })
    .unwrap();

    assert_eq!(
        encode_program(&tree, MaintenancePolicy::PassThrough),
        "PRE:P:P1 AC:290W:P1 AC:300M:P2:3 POST:X:P1"
    );
}
