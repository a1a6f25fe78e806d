#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

// ============================================================================
// Parameterized built-in kind mapping tests
// ============================================================================

#[test_case(TaskError::Runtime("boom".into()), HostErrorKind::RuntimeError ; "runtime")]
#[test_case(TaskError::InvalidArgument("arg".into()), HostErrorKind::ValueError ; "invalid argument")]
#[test_case(TaskError::Domain("dom".into()), HostErrorKind::ValueError ; "domain")]
#[test_case(TaskError::OutOfRange("idx".into()), HostErrorKind::IndexError ; "out of range")]
#[test_case(TaskError::Overflow("big".into()), HostErrorKind::OverflowError ; "overflow")]
#[test_case(
    TaskError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "missing")),
    HostErrorKind::OSError
    ; "io"
)]
#[test_case(TaskError::Timeout, HostErrorKind::TimeoutError ; "timeout")]
#[test_case(TaskError::Cancelled, HostErrorKind::CancelledError ; "cancelled")]
#[test_case(TaskError::Panicked("oops".into()), HostErrorKind::Exception ; "panicked")]
#[test_case(TaskError::Other("misc".into()), HostErrorKind::Exception ; "other")]
#[test_case(TaskError::custom("Unregistered", "x"), HostErrorKind::Exception ; "unregistered custom")]
fn ErrorTranslator___host_kind___maps_builtin_kinds(failure: TaskError, expected: HostErrorKind) {
    let interpreter = Interpreter::new();
    let translator = ErrorTranslator::new(&interpreter);

    assert_eq!(translator.host_kind(&failure), expected);
}

// ============================================================================
// Parameterized message preservation tests
// ============================================================================

#[test_case(TaskError::Runtime("runtime message".into()), "runtime message")]
#[test_case(TaskError::InvalidArgument("bad argument".into()), "bad argument")]
#[test_case(TaskError::custom("MyException", "custom message"), "custom message")]
#[test_case(TaskError::Panicked("index out of bounds".into()), "task panicked: index out of bounds")]
#[test_case(TaskError::Timeout, "task timed out")]
fn ErrorTranslator___translate___keeps_native_message(failure: TaskError, expected: &str) {
    let interpreter = Interpreter::new();
    let translator = ErrorTranslator::new(&interpreter);
    let token = interpreter.acquire();

    let error = translator.translate(&failure, &token).unwrap();

    assert_eq!(error.message(), expected);
}
