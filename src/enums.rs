//! Enum registry: case-insensitive label tables for ordinal-backed types.

use crate::value::Value;
use std::any::TypeId;
use std::collections::HashMap;
use tracing::trace;

/// Label table of one registered type
#[derive(Debug, Clone)]
pub struct EnumTable {
    type_name: &'static str,
    labels: HashMap<String, i64>,
}

impl EnumTable {
    /// Name of the registered type
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Ordinal for `label`, compared case-insensitively
    pub fn get(&self, label: &str) -> Option<i64> {
        self.labels.get(&label.to_lowercase()).copied()
    }

    /// Known labels, sorted
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.labels.keys().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }
}

/// Registry mapping value types to their label tables
#[derive(Debug, Clone, Default)]
pub struct EnumRegistry {
    tables: HashMap<TypeId, EnumTable>,
}

impl EnumRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the labels of `T`.
    ///
    /// Keys are lowercased. Registering the same type again replaces its
    /// table.
    ///
    /// # Panics
    /// If `T` is a standard-library type or is not integer-backed.
    pub fn register<T, I, K>(&mut self, labels: I)
    where
        T: Value,
        I: IntoIterator<Item = (K, i64)>,
        K: AsRef<str>,
    {
        let info = T::type_info();
        if info.is_builtin() {
            panic!("enum type must be a custom type: {}", info.name());
        }
        if !(info.is_int() || info.is_uint()) {
            panic!("enum type must be int/uint: {}", info.name());
        }

        let labels: HashMap<String, i64> = labels
            .into_iter()
            .map(|(label, ordinal)| (label.as_ref().to_lowercase(), ordinal))
            .collect();
        trace!(enum_type = info.name(), count = labels.len(), "registered enum");

        self.tables.insert(
            info.id(),
            EnumTable {
                type_name: info.name(),
                labels,
            },
        );
    }

    /// Whether `id` has a label table
    pub fn contains(&self, id: TypeId) -> bool {
        self.tables.contains_key(&id)
    }

    /// Label table registered for the type `id`
    pub fn table(&self, id: TypeId) -> Option<&EnumTable> {
        self.tables.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Kind, TypeInfo};
    use crate::value::ValueError;

    #[derive(Debug, Default, Clone, Copy, PartialEq)]
    struct Color(u8);

    impl Value for Color {
        fn type_info() -> TypeInfo {
            TypeInfo::custom::<Color>(Kind::Uint)
        }

        fn set_text(&mut self, raw: &str) -> Result<(), ValueError> {
            self.0.set_text(raw)
        }
    }

    #[derive(Debug, Default)]
    struct Label(String);

    impl Value for Label {
        fn type_info() -> TypeInfo {
            TypeInfo::custom::<Label>(Kind::Str)
        }

        fn set_text(&mut self, raw: &str) -> Result<(), ValueError> {
            self.0.set_text(raw)
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut registry = EnumRegistry::new();
        registry.register::<Color, _, _>([("Red", 1), ("GREEN", 2)]);

        let table = registry.table(TypeId::of::<Color>()).unwrap();
        assert_eq!(table.get("red"), Some(1));
        assert_eq!(table.get("RED"), Some(1));
        assert_eq!(table.get("Green"), Some(2));
        assert_eq!(table.get("blue"), None);
        assert_eq!(table.labels(), vec!["green", "red"]);
    }

    #[test]
    fn test_reregistration_overwrites() {
        let mut registry = EnumRegistry::new();
        registry.register::<Color, _, _>([("red", 1)]);
        registry.register::<Color, _, _>([("blue", 3)]);

        let table = registry.table(TypeId::of::<Color>()).unwrap();
        assert_eq!(table.get("red"), None);
        assert_eq!(table.get("blue"), Some(3));
    }

    #[test]
    #[should_panic(expected = "custom type")]
    fn test_rejects_builtin() {
        EnumRegistry::new().register::<u8, _, _>([("one", 1)]);
    }

    #[test]
    #[should_panic(expected = "int/uint")]
    fn test_rejects_non_integer() {
        EnumRegistry::new().register::<Label, _, _>([("one", 1)]);
    }
}
