//! Value coercion: raw strings into bound fields.

use crate::command::Argument;
use crate::enums::EnumRegistry;
use crate::error::{ArgsError, ArgsResult};
use crate::record::{Record, Slot};
use crate::value::Value;

/// Follow the argument's path into `root` and assign `raws`
pub(crate) fn apply(
    root: &mut dyn Record,
    argument: &Argument,
    raws: &[String],
    enums: &EnumRegistry,
) -> ArgsResult<()> {
    match argument.path().slot(root)? {
        Slot::Value(value) => assign(value, argument, raws, enums),
        _ => Err(ArgsError::unbound(format!(
            "{} is bound to a record, not a value",
            argument.long()
        ))),
    }
}

/// Assign `raws` to `value`.
///
/// Order: several values are an array assignment; otherwise a custom text
/// parser wins, then the enum table, then plain scalar conversion.
pub(crate) fn assign(
    value: &mut dyn Value,
    argument: &Argument,
    raws: &[String],
    enums: &EnumRegistry,
) -> ArgsResult<()> {
    let flag = argument.long();

    if raws.len() > 1 {
        return value
            .set_elements(raws)
            .map_err(|e| ArgsError::from_value(flag, &raws.join(" "), e));
    }

    let raw = raws.first().map(String::as_str).unwrap_or_default();

    if let Some(text) = value.as_text_value() {
        return text.unmarshal_text(raw).map_err(|source| ArgsError::TextParse {
            flag: flag.to_string(),
            source,
        });
    }

    if argument.is_enum() {
        let table = enums
            .table(argument.value_type().id())
            .ok_or_else(|| ArgsError::unbound(format!("no enum table for {flag}")))?;
        let ordinal = table.get(raw).ok_or_else(|| ArgsError::InvalidEnumValue {
            flag: flag.to_string(),
            value: raw.to_string(),
            expected: table.labels().join(", "),
        })?;
        return value
            .set_ordinal(ordinal)
            .map_err(|e| ArgsError::from_value(flag, raw, e));
    }

    value
        .set_text(raw)
        .map_err(|e| ArgsError::from_value(flag, raw, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ArrayKind;
    use crate::path::Path;
    use crate::types::{Kind, TypeInfo};
    use crate::value::{Parsed, ValueError};

    #[derive(Debug, Default, Clone, Copy, PartialEq)]
    enum Color {
        #[default]
        Unset,
        Red,
        Green,
    }

    impl Value for Color {
        fn type_info() -> TypeInfo {
            TypeInfo::custom::<Color>(Kind::Uint)
        }

        fn set_text(&mut self, raw: &str) -> Result<(), ValueError> {
            let mut ordinal = 0u8;
            ordinal.set_text(raw)?;
            self.set_ordinal(ordinal.into())
        }

        fn set_ordinal(&mut self, ordinal: i64) -> Result<(), ValueError> {
            *self = match ordinal {
                0 => Color::Unset,
                1 => Color::Red,
                2 => Color::Green,
                other => return Err(ValueError::Ordinal(other)),
            };
            Ok(())
        }
    }

    fn argument<T: Value>(long: &str, enumerated: bool) -> Argument {
        let info = T::type_info();
        Argument {
            path: Path::root(0).subpath("field"),
            value_type: info,
            long: format!("--{long}"),
            short: None,
            env: String::new(),
            required: false,
            positional: false,
            global: false,
            separate: false,
            default: None,
            help: None,
            array: info.container().into(),
            enumerated,
        }
    }

    fn raws(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_scalar_conversion() {
        let mut port = 0u16;
        assign(&mut port, &argument::<u16>("port", false), &raws(&["8080"]), &EnumRegistry::new())
            .unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_type_mismatch_names_flag() {
        let mut port = 0u16;
        let err = assign(&mut port, &argument::<u16>("port", false), &raws(&["http"]), &EnumRegistry::new())
            .unwrap_err();
        match err {
            ArgsError::InvalidValue { flag, value, .. } => {
                assert_eq!(flag, "--port");
                assert_eq!(value, "http");
            }
            other => panic!("Expected invalid value, got {other:?}"),
        }
    }

    #[test]
    fn test_multiple_values_are_array_assignment() {
        let mut hosts: Vec<String> = Vec::new();
        let arg = argument::<Vec<String>>("hosts", false);
        assert_eq!(arg.array(), ArrayKind::List);
        assign(&mut hosts, &arg, &raws(&["a", "b"]), &EnumRegistry::new()).unwrap();
        assert_eq!(hosts, vec!["a", "b"]);
    }

    #[test]
    fn test_multiple_values_on_scalar_fail() {
        let mut port = 0u16;
        let err = assign(&mut port, &argument::<u16>("port", false), &raws(&["1", "2"]), &EnumRegistry::new())
            .unwrap_err();
        assert!(matches!(err, ArgsError::InvalidValue { .. }));
    }

    #[test]
    fn test_enum_is_case_insensitive() {
        let mut enums = EnumRegistry::new();
        enums.register::<Color, _, _>([("Red", 1), ("Green", 2)]);
        let arg = argument::<Color>("color", true);

        for label in ["red", "RED", "Red"] {
            let mut color = Color::Unset;
            assign(&mut color, &arg, &raws(&[label]), &enums).unwrap();
            assert_eq!(color, Color::Red);
        }
    }

    #[test]
    fn test_unregistered_label_fails() {
        let mut enums = EnumRegistry::new();
        enums.register::<Color, _, _>([("Red", 1), ("Green", 2)]);
        let mut color = Color::Unset;
        let err = assign(&mut color, &argument::<Color>("color", true), &raws(&["blue"]), &enums)
            .unwrap_err();
        match err {
            ArgsError::InvalidEnumValue { expected, .. } => assert_eq!(expected, "green, red"),
            other => panic!("Expected enum error, got {other:?}"),
        }
        assert_eq!(color, Color::Unset);
    }

    #[derive(Debug, Default, PartialEq)]
    struct Millis(u64);

    impl std::str::FromStr for Millis {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            s.strip_suffix("ms")
                .and_then(|n| n.parse().ok())
                .map(Millis)
                .ok_or_else(|| format!("{s} is not a duration in ms"))
        }
    }

    #[test]
    fn test_text_parser_takes_priority() {
        let mut timeout: Parsed<Millis> = Parsed::default();
        let arg = argument::<Parsed<Millis>>("timeout", false);
        assign(&mut timeout, &arg, &raws(&["250ms"]), &EnumRegistry::new()).unwrap();
        assert_eq!(timeout.0, Millis(250));

        let err = assign(&mut timeout, &arg, &raws(&["250"]), &EnumRegistry::new()).unwrap_err();
        assert!(matches!(err, ArgsError::TextParse { .. }));
    }
}
