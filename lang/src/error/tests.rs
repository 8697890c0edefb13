use super::*;
use crate::parser::parse;

#[test]
fn display_lists_one_message_per_line() {
    let errors = SyntaxErrors::new(
        vec!["first".to_string(), "second".to_string()],
        vec!["a.mp:1".to_string(), "a.mp:2".to_string()],
    );
    assert_eq!(errors.to_string(), "first\nsecond");
    assert_eq!(errors.len(), 2);
    assert!(!errors.is_empty());
}

#[test]
fn parse_front_door_returns_ok_for_clean_source() {
    let program = parse("clean.mp", "let x = 5").unwrap();
    assert_eq!(program.statements.len(), 1);
}

#[test]
fn parse_front_door_collects_every_error() {
    let errors = parse("bad.mp", "let = 5\nif x y").unwrap_err();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors.messages().len(), errors.lines().len());
    assert_eq!(errors.lines()[0], "bad.mp:1");
    assert_eq!(errors.lines()[1], "bad.mp:2");
}

#[test]
fn syntax_errors_is_a_std_error() {
    let errors: Box<dyn std::error::Error> =
        Box::new(SyntaxErrors::new(vec!["oops".to_string()], vec!["m:1".to_string()]));
    assert_eq!(errors.to_string(), "oops");
}
