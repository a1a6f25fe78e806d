//! Host value representation and native-to-host marshalling

use crate::ExclusivityToken;
use taskbridge_core::BridgeError;

/// A value owned by the host runtime
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    /// The host's "no value"
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<HostValue>),
}

impl HostValue {
    pub fn is_none(&self) -> bool {
        matches!(self, HostValue::None)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            HostValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HostValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            HostValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl std::fmt::Display for HostValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostValue::None => write!(f, "None"),
            HostValue::Bool(true) => write!(f, "True"),
            HostValue::Bool(false) => write!(f, "False"),
            HostValue::Int(v) => write!(f, "{v}"),
            HostValue::Float(v) => write!(f, "{v}"),
            HostValue::Str(s) => write!(f, "{s}"),
            HostValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Conversion of a native result into a [`HostValue`]
///
/// Host values are host-owned objects, so conversion requires exclusivity.
/// A value with no host representation is a [`BridgeError::Marshal`].
pub trait IntoHostValue {
    fn into_host_value(self, token: &ExclusivityToken<'_>) -> Result<HostValue, BridgeError>;
}

impl IntoHostValue for HostValue {
    fn into_host_value(self, _token: &ExclusivityToken<'_>) -> Result<HostValue, BridgeError> {
        Ok(self)
    }
}

impl IntoHostValue for () {
    fn into_host_value(self, _token: &ExclusivityToken<'_>) -> Result<HostValue, BridgeError> {
        Ok(HostValue::None)
    }
}

impl IntoHostValue for bool {
    fn into_host_value(self, _token: &ExclusivityToken<'_>) -> Result<HostValue, BridgeError> {
        Ok(HostValue::Bool(self))
    }
}

macro_rules! lossless_int {
    ($($ty:ty),*) => {
        $(
            impl IntoHostValue for $ty {
                fn into_host_value(
                    self,
                    _token: &ExclusivityToken<'_>,
                ) -> Result<HostValue, BridgeError> {
                    Ok(HostValue::Int(i64::from(self)))
                }
            }
        )*
    };
}

macro_rules! checked_int {
    ($($ty:ty),*) => {
        $(
            impl IntoHostValue for $ty {
                fn into_host_value(
                    self,
                    _token: &ExclusivityToken<'_>,
                ) -> Result<HostValue, BridgeError> {
                    i64::try_from(self)
                        .map(HostValue::Int)
                        .map_err(|e| BridgeError::Marshal {
                            type_name: stringify!($ty),
                            reason: e.to_string(),
                        })
                }
            }
        )*
    };
}

lossless_int!(i8, i16, i32, i64, u8, u16, u32);
checked_int!(u64, usize, isize, i128, u128);

impl IntoHostValue for f32 {
    fn into_host_value(self, _token: &ExclusivityToken<'_>) -> Result<HostValue, BridgeError> {
        Ok(HostValue::Float(f64::from(self)))
    }
}

impl IntoHostValue for f64 {
    fn into_host_value(self, _token: &ExclusivityToken<'_>) -> Result<HostValue, BridgeError> {
        Ok(HostValue::Float(self))
    }
}

impl IntoHostValue for String {
    fn into_host_value(self, _token: &ExclusivityToken<'_>) -> Result<HostValue, BridgeError> {
        Ok(HostValue::Str(self))
    }
}

impl IntoHostValue for &'static str {
    fn into_host_value(self, _token: &ExclusivityToken<'_>) -> Result<HostValue, BridgeError> {
        Ok(HostValue::Str(self.to_string()))
    }
}

impl<T: IntoHostValue> IntoHostValue for Option<T> {
    fn into_host_value(self, token: &ExclusivityToken<'_>) -> Result<HostValue, BridgeError> {
        match self {
            Some(value) => value.into_host_value(token),
            None => Ok(HostValue::None),
        }
    }
}

impl<T: IntoHostValue> IntoHostValue for Vec<T> {
    fn into_host_value(self, token: &ExclusivityToken<'_>) -> Result<HostValue, BridgeError> {
        self.into_iter()
            .map(|item| item.into_host_value(token))
            .collect::<Result<Vec<_>, _>>()
            .map(HostValue::List)
    }
}

#[cfg(test)]
#[path = "value/value_tests.rs"]
mod value_tests;
