//! Structural contract of the instruction catalog as seen by a dispatch loop

use std::collections::HashSet;

use ferrite_vm_bytecode::{
    BytecodeError, DISPATCH_TABLE_LEN, FIRST_BYTECODE_TOKEN, Icode, LAST_BYTECODE_TOKEN,
    MIN_ICODE, Opcode, Token, dispatch_index, is_valid_icode, is_valid_opcode,
    is_valid_token_code, opcode_name,
};
use proptest::prelude::*;

#[test]
fn test_ranges_are_disjoint() {
    let icodes: HashSet<i32> = Icode::ALL.iter().map(|i| i.raw()).collect();
    let tokens: HashSet<i32> = Token::ALL.iter().map(|t| t.raw()).collect();

    assert!(icodes.is_disjoint(&tokens));
    assert_eq!(icodes.len(), (1 - MIN_ICODE) as usize);
    assert_eq!(
        tokens.len(),
        (LAST_BYTECODE_TOKEN - FIRST_BYTECODE_TOKEN + 1) as usize
    );
    assert!(icodes.iter().all(|&raw| raw <= 0));
    assert!(tokens.iter().all(|&raw| raw > 0));
}

#[test]
fn test_icode_names_are_unique() {
    let names: HashSet<&str> = Icode::ALL.iter().map(|i| i.name()).collect();
    assert_eq!(names.len(), Icode::ALL.len());
}

#[test]
fn test_every_opcode_has_a_slot() {
    let slots: HashSet<usize> = Opcode::iter().map(Opcode::dispatch_index).collect();
    assert_eq!(slots.len(), Icode::ALL.len() + Token::ALL.len());
    assert!(slots.iter().all(|&slot| slot < DISPATCH_TABLE_LEN));
}

#[test]
fn test_generator_opcodes_are_catalogued() {
    let generator_ops: Vec<&str> = Opcode::iter()
        .filter(|op| op.is_generator_op())
        .map(Opcode::name)
        .collect();
    assert_eq!(
        generator_ops,
        vec![
            "YIELD_STAR",
            "GENERATOR_RETURN",
            "GENERATOR_END",
            "GENERATOR",
            "YIELD"
        ]
    );
}

#[test]
fn test_serde_uses_variant_names() {
    let json = serde_json::to_string(&Opcode::Icode(Icode::YieldStar)).unwrap();
    assert_eq!(json, r#"{"Icode":"YieldStar"}"#);
    let back: Opcode = serde_json::from_str(r#"{"Token":"Yield"}"#).unwrap();
    assert_eq!(back, Opcode::Token(Token::Yield));
}

#[test]
fn test_out_of_range_error_message() {
    let err = opcode_name(1).unwrap_err();
    assert_eq!(err, BytecodeError::InvalidOpcode(1));
    assert_eq!(err.to_string(), "Invalid opcode: 1");
}

proptest! {
    #[test]
    fn validity_is_range_membership(raw in any::<i32>()) {
        let in_range = (MIN_ICODE..=0).contains(&raw)
            || (FIRST_BYTECODE_TOKEN..=LAST_BYTECODE_TOKEN).contains(&raw);
        prop_assert_eq!(is_valid_opcode(raw), in_range);
        prop_assert_eq!(Opcode::from_raw(raw).is_ok(), in_range);
        prop_assert_eq!(dispatch_index(raw).is_ok(), in_range);
        prop_assert!(!(is_valid_icode(raw) && is_valid_token_code(raw)));
    }

    #[test]
    fn decode_preserves_raw(raw in MIN_ICODE..=LAST_BYTECODE_TOKEN) {
        if let Ok(op) = Opcode::from_raw(raw) {
            prop_assert_eq!(op.raw(), raw);
            prop_assert_eq!(dispatch_index(raw), Ok(op.dispatch_index()));
            prop_assert_eq!(opcode_name(raw), Ok(op.name()));
        } else {
            prop_assert_eq!(raw, 1);
        }
    }
}
