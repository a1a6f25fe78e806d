#![allow(non_snake_case)]

use super::*;
use crate::Interpreter;

#[test]
fn IntoHostValue___unit___marshals_to_none() {
    let interpreter = Interpreter::new();
    let token = interpreter.acquire();

    let value = ().into_host_value(&token).unwrap();

    assert!(value.is_none());
}

#[test]
fn IntoHostValue___i32___marshals_to_int() {
    let interpreter = Interpreter::new();
    let token = interpreter.acquire();

    for input in [-1, 0, 1, i32::MAX] {
        let value = input.into_host_value(&token).unwrap();

        assert_eq!(value.as_int(), Some(i64::from(input)));
    }
}

#[test]
fn IntoHostValue___u64_above_i64_max___is_marshal_error() {
    let interpreter = Interpreter::new();
    let token = interpreter.acquire();

    let result = u64::MAX.into_host_value(&token);

    assert!(matches!(
        result,
        Err(BridgeError::Marshal {
            type_name: "u64",
            ..
        })
    ));
}

#[test]
fn IntoHostValue___string___keeps_unicode() {
    let interpreter = Interpreter::new();
    let token = interpreter.acquire();

    let value = "去吃饭吧".to_string().into_host_value(&token).unwrap();

    assert_eq!(value.as_str(), Some("去吃饭吧"));
}

#[test]
fn IntoHostValue___option_none___marshals_to_none() {
    let interpreter = Interpreter::new();
    let token = interpreter.acquire();

    let value = Option::<i32>::None.into_host_value(&token).unwrap();

    assert_eq!(value, HostValue::None);
}

#[test]
fn IntoHostValue___vec___fails_if_any_item_fails() {
    let interpreter = Interpreter::new();
    let token = interpreter.acquire();

    let result = vec![1u64, u64::MAX].into_host_value(&token);

    assert!(result.is_err());
}

#[test]
fn IntoHostValue___vec_of_strings___marshals_to_list() {
    let interpreter = Interpreter::new();
    let token = interpreter.acquire();

    let value = vec!["a", "b"].into_host_value(&token).unwrap();

    assert_eq!(
        value,
        HostValue::List(vec![HostValue::Str("a".into()), HostValue::Str("b".into())])
    );
}

#[test]
fn HostValue___display___renders_host_style() {
    let value = HostValue::List(vec![
        HostValue::None,
        HostValue::Bool(true),
        HostValue::Int(42),
        HostValue::Str("x".into()),
    ]);

    assert_eq!(value.to_string(), "[None, True, 42, x]");
}
