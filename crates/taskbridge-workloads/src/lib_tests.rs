#![allow(non_snake_case)]

use super::*;
use taskbridge_core::TaskError;
use taskbridge_loop::{HostErrorKind, Interpreter};

#[test]
fn register_errors___maps_both_custom_kinds() {
    let interpreter = Interpreter::new();
    let translator = ErrorTranslator::new(&interpreter);

    register_errors(&translator);

    assert_eq!(
        translator.host_kind(&TaskError::custom(MY_EXCEPTION, "m")),
        HostErrorKind::Registered("MyException".to_string())
    );
    assert_eq!(
        translator.host_kind(&TaskError::custom(TASK_EXCEPTION, "t")),
        HostErrorKind::Registered("TaskException".to_string())
    );
}
