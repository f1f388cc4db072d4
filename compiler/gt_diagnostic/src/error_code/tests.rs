use super::*;

#[test]
fn test_error_code_display() {
    assert_eq!(ErrorCode::E1001.to_string(), "E1001");
    assert_eq!(ErrorCode::E2005.as_str(), "E2005");
}

#[test]
fn test_phase_ranges() {
    assert!(ErrorCode::E0002.is_lexer_error());
    assert!(ErrorCode::E1003.is_parser_error());
    assert!(ErrorCode::E2001.is_type_error());
    assert!(ErrorCode::E4003.is_runtime_error());

    assert!(!ErrorCode::E4003.is_parser_error());
    assert!(!ErrorCode::E3001.is_runtime_error());
}
