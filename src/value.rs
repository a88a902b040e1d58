//! Bindable value types.
//!
//! A [`Value`] is any field a flag can write into. Implementations exist for
//! the standard scalars, `String`, `PathBuf`, `Option<T>`, `Vec<T>` and
//! `[T; N]`. User types either implement [`Value`] directly (enums backed by
//! an integer ordinal) or expose a [`TextValue`] parser.

use crate::types::{Container, Kind, TypeInfo};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Conversion failure for a single raw string
#[derive(Debug, Error)]
pub enum ValueError {
    /// Text does not parse as the expected type
    #[error("expected {expected}: {reason}")]
    Malformed {
        /// Expected type name
        expected: &'static str,
        /// Parser message
        reason: String,
    },

    /// More elements than a fixed array holds
    #[error("at most {0} values accepted")]
    Capacity(usize),

    /// Several values given to a scalar field
    #[error("field does not accept multiple values")]
    NotSequence,

    /// Ordinal out of range for the target type
    #[error("ordinal {0} out of range")]
    Ordinal(i64),
}

impl ValueError {
    /// Malformed-text error for `expected`
    pub fn malformed(expected: &'static str, reason: impl fmt::Display) -> Self {
        Self::Malformed {
            expected,
            reason: reason.to_string(),
        }
    }
}

/// Capability: the value parses itself from text
pub trait TextValue {
    /// Replace the value with the parsed form of `text`
    fn unmarshal_text(&mut self, text: &str) -> anyhow::Result<()>;
}

/// A field that can receive flag values
pub trait Value: 'static {
    /// Static description used by the schema builder
    fn type_info() -> TypeInfo
    where
        Self: Sized;

    /// Scalar conversion of one raw string
    fn set_text(&mut self, raw: &str) -> Result<(), ValueError>;

    /// Assign an enum ordinal looked up from the registry
    fn set_ordinal(&mut self, ordinal: i64) -> Result<(), ValueError> {
        self.set_text(&ordinal.to_string())
    }

    /// Assign several raw strings (array assignment)
    fn set_elements(&mut self, raws: &[String]) -> Result<(), ValueError> {
        match raws {
            [single] => self.set_text(single),
            _ => Err(ValueError::NotSequence),
        }
    }

    /// The custom text-parsing capability, if the value has one
    fn as_text_value(&mut self) -> Option<&mut dyn TextValue> {
        None
    }
}

fn parse_bool(raw: &str) -> Result<bool, ValueError> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        other => Err(ValueError::malformed("bool", format!("invalid syntax {other:?}"))),
    }
}

impl Value for bool {
    fn type_info() -> TypeInfo {
        TypeInfo::builtin::<bool>(Kind::Bool)
    }

    fn set_text(&mut self, raw: &str) -> Result<(), ValueError> {
        *self = parse_bool(raw)?;
        Ok(())
    }
}

macro_rules! number_value {
    ($($t:ty => $kind:ident),* $(,)?) => {
        $(
            impl Value for $t {
                fn type_info() -> TypeInfo {
                    TypeInfo::builtin::<$t>(Kind::$kind)
                }

                fn set_text(&mut self, raw: &str) -> Result<(), ValueError> {
                    *self = raw
                        .parse::<$t>()
                        .map_err(|e| ValueError::malformed(stringify!($t), e))?;
                    Ok(())
                }
            }
        )*
    };
}

number_value! {
    i8 => Int, i16 => Int, i32 => Int, i64 => Int, isize => Int,
    u8 => Uint, u16 => Uint, u32 => Uint, u64 => Uint, usize => Uint,
    f32 => Float, f64 => Float,
}

impl Value for String {
    fn type_info() -> TypeInfo {
        TypeInfo::builtin::<String>(Kind::Str)
    }

    fn set_text(&mut self, raw: &str) -> Result<(), ValueError> {
        raw.clone_into(self);
        Ok(())
    }
}

impl Value for PathBuf {
    fn type_info() -> TypeInfo {
        TypeInfo::builtin::<PathBuf>(Kind::Str)
    }

    fn set_text(&mut self, raw: &str) -> Result<(), ValueError> {
        *self = PathBuf::from(raw);
        Ok(())
    }
}

// Option<T> plays the role of a pointer field: set on the first successful
// write, left as None when conversion fails.
impl<T: Value + Default> Value for Option<T> {
    fn type_info() -> TypeInfo {
        T::type_info().into_optional()
    }

    fn set_text(&mut self, raw: &str) -> Result<(), ValueError> {
        match self {
            Some(value) => value.set_text(raw),
            None => {
                *self = Some(parse_element(raw)?);
                Ok(())
            }
        }
    }

    fn set_ordinal(&mut self, ordinal: i64) -> Result<(), ValueError> {
        match self {
            Some(value) => value.set_ordinal(ordinal),
            None => {
                let mut value = T::default();
                value.set_ordinal(ordinal)?;
                *self = Some(value);
                Ok(())
            }
        }
    }

    fn set_elements(&mut self, raws: &[String]) -> Result<(), ValueError> {
        match self {
            Some(value) => value.set_elements(raws),
            None => {
                let mut value = T::default();
                value.set_elements(raws)?;
                *self = Some(value);
                Ok(())
            }
        }
    }

    // An unset option has no parser to offer; `set_text` builds the value.
    fn as_text_value(&mut self) -> Option<&mut dyn TextValue> {
        self.as_mut().and_then(Value::as_text_value)
    }
}

/// Parse one element, honouring a custom text parser on the element type
fn parse_element<T: Value + Default>(raw: &str) -> Result<T, ValueError> {
    let mut elem = T::default();
    if let Some(text) = elem.as_text_value() {
        text.unmarshal_text(raw)
            .map_err(|e| ValueError::malformed(std::any::type_name::<T>(), e))?;
        return Ok(elem);
    }
    elem.set_text(raw)?;
    Ok(elem)
}

impl<T: Value + Default> Value for Vec<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::sequence::<Vec<T>>(T::type_info(), Container::List)
    }

    fn set_text(&mut self, raw: &str) -> Result<(), ValueError> {
        self.push(parse_element(raw)?);
        Ok(())
    }

    fn set_elements(&mut self, raws: &[String]) -> Result<(), ValueError> {
        let parsed = raws
            .iter()
            .map(|raw| parse_element::<T>(raw))
            .collect::<Result<Vec<_>, _>>()?;
        self.extend(parsed);
        Ok(())
    }
}

impl<T: Value + Default, const N: usize> Value for [T; N] {
    fn type_info() -> TypeInfo {
        TypeInfo::sequence::<[T; N]>(T::type_info(), Container::Array(N))
    }

    fn set_text(&mut self, raw: &str) -> Result<(), ValueError> {
        self.set_elements(std::slice::from_ref(&raw.to_string()))
    }

    fn set_elements(&mut self, raws: &[String]) -> Result<(), ValueError> {
        if raws.len() > N {
            return Err(ValueError::Capacity(N));
        }
        for (slot, raw) in self.iter_mut().zip(raws) {
            *slot = parse_element(raw)?;
        }
        Ok(())
    }
}

/// Adapter binding any `FromStr` type as a custom text value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parsed<T>(pub T);

impl<T> TextValue for Parsed<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    fn unmarshal_text(&mut self, text: &str) -> anyhow::Result<()> {
        self.0 = text
            .parse()
            .map_err(|e: T::Err| anyhow::anyhow!("{e}"))?;
        Ok(())
    }
}

impl<T> Value for Parsed<T>
where
    T: FromStr + Default + 'static,
    T::Err: fmt::Display,
{
    fn type_info() -> TypeInfo {
        TypeInfo::custom::<Parsed<T>>(Kind::Text)
    }

    fn set_text(&mut self, raw: &str) -> Result<(), ValueError> {
        self.unmarshal_text(raw)
            .map_err(|e| ValueError::malformed(std::any::type_name::<T>(), e))
    }

    fn as_text_value(&mut self) -> Option<&mut dyn TextValue> {
        Some(self)
    }
}
