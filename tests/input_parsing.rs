use calclog::input::{Command, InputError};

#[test]
fn keywords_are_case_insensitive_and_trimmed() {
    assert_eq!(Command::parse("  HISTORY "), Ok(Command::History));
    assert_eq!(Command::parse("Stats"), Ok(Command::Stats));
    assert_eq!(Command::parse("save"), Ok(Command::Save));
    assert_eq!(Command::parse("load"), Ok(Command::Load));
    assert_eq!(Command::parse(""), Ok(Command::Empty));
    assert_eq!(Command::parse("\t"), Ok(Command::Empty));
}

#[test]
fn arithmetic_keeps_operation_token_for_later_resolution() {
    assert_eq!(
        Command::parse("Power 2 -0.5"),
        Ok(Command::Calculate {
            operation: "Power".to_string(),
            operand1: 2.0,
            operand2: -0.5,
        })
    );
    assert_eq!(
        Command::parse("foo 1e3 2"),
        Ok(Command::Calculate {
            operation: "foo".to_string(),
            operand1: 1000.0,
            operand2: 2.0,
        })
    );
}

#[test]
fn malformed_arithmetic_is_rejected() {
    assert_eq!(Command::parse("hello"), Err(InputError::WrongArity { found: 1 }));
    assert_eq!(Command::parse("add 1 2 3"), Err(InputError::WrongArity { found: 4 }));
    assert_eq!(
        Command::parse("add 1 two"),
        Err(InputError::InvalidNumber {
            first: "1".to_string(),
            second: "two".to_string(),
        })
    );
}
