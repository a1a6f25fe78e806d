#![allow(non_snake_case)]

use super::*;

#[test]
fn ErrorTranslator___register___maps_custom_kind() {
    let interpreter = Interpreter::new();
    let translator = ErrorTranslator::new(&interpreter);

    translator.register("MyException", "workloads.MyException");

    assert!(translator.is_registered("MyException"));
    assert_eq!(
        translator.host_kind(&TaskError::custom("MyException", "m")),
        HostErrorKind::Registered("workloads.MyException".to_string())
    );
}

#[test]
fn ErrorTranslator___register___same_kind_replaces_class() {
    let interpreter = Interpreter::new();
    let translator = ErrorTranslator::new(&interpreter);

    translator.register("TaskException", "first.TaskException");
    translator.register("TaskException", "second.TaskException");

    assert_eq!(
        translator.host_kind(&TaskError::custom("TaskException", "m")),
        HostErrorKind::Registered("second.TaskException".to_string())
    );
}

#[test]
fn ErrorTranslator___is_registered___false_for_unknown_kind() {
    let interpreter = Interpreter::new();
    let translator = ErrorTranslator::new(&interpreter);

    assert!(!translator.is_registered("MyException"));
}

#[test]
fn ErrorTranslator___translate___builds_host_error() {
    let interpreter = Interpreter::new();
    let translator = ErrorTranslator::new(&interpreter);
    translator.register("MyException", "MyException");
    let token = interpreter.acquire();

    let error = translator
        .translate(&TaskError::custom("MyException", "value 2"), &token)
        .unwrap();

    assert_eq!(error.kind().name(), "MyException");
    assert_eq!(error.to_string(), "MyException: value 2");
}

#[test]
fn ErrorTranslator___translate___foreign_token_is_translation_error() {
    let interpreter = Interpreter::new();
    let other = Interpreter::new();
    let translator = ErrorTranslator::new(&interpreter);
    let token = other.acquire();

    let result = translator.translate(&TaskError::Runtime("x".into()), &token);

    assert!(matches!(result, Err(BridgeError::Translation(_))));
}

#[test]
fn ErrorTranslator___translate___three_kinds_are_distinct() {
    let interpreter = Interpreter::new();
    let translator = ErrorTranslator::new(&interpreter);
    translator.register("MyException", "MyException");
    let token = interpreter.acquire();

    let kinds: Vec<_> = [
        TaskError::Runtime("0".into()),
        TaskError::InvalidArgument("1".into()),
        TaskError::custom("MyException", "2"),
    ]
    .iter()
    .map(|failure| translator.translate(failure, &token).unwrap().kind().clone())
    .collect();

    assert_ne!(kinds[0], kinds[1]);
    assert_ne!(kinds[1], kinds[2]);
    assert_ne!(kinds[0], kinds[2]);
}

#[test]
fn ErrorTranslator___debug___shows_registration_count() {
    let interpreter = Interpreter::new();
    let translator = ErrorTranslator::new(&interpreter);
    translator.register("A", "A");

    let debug = format!("{translator:?}");

    assert!(debug.contains("registered: 1"));
}
