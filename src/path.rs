//! Binding paths from a root record to one of its (nested) fields.

use crate::error::{ArgsError, ArgsResult};
use crate::record::{Record, Slot};
use std::fmt;

/// Chain of field names leading from a registered root to a field.
///
/// A path never owns the record it points into; it is followed against the
/// live root each time a value is written or a hook invoked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    root: usize,
    fields: Vec<&'static str>,
}

impl Path {
    /// Path of the root record itself
    pub fn root(root: usize) -> Self {
        Self {
            root,
            fields: Vec::new(),
        }
    }

    /// Path of field `name` inside the record at `self`
    pub fn subpath(&self, name: &'static str) -> Self {
        let mut fields = self.fields.clone();
        fields.push(name);
        Self {
            root: self.root,
            fields,
        }
    }

    /// Index of the root this path starts from
    pub fn root_index(&self) -> usize {
        self.root
    }

    /// Field names from the root to the target
    pub fn fields(&self) -> &[&'static str] {
        &self.fields
    }

    /// Whether the path points at the root record itself
    pub fn is_root(&self) -> bool {
        self.fields.is_empty()
    }

    /// Follow the path to the bound field.
    ///
    /// Optional records crossed on the way are instantiated.
    pub(crate) fn slot<'a>(&self, root: &'a mut dyn Record) -> ArgsResult<Slot<'a>> {
        match self.fields.split_first() {
            Some((first, rest)) => walk(root, first, rest, self),
            None => Ok(Slot::Record(root)),
        }
    }

    /// Follow the path to a record, instantiating it if it is optional
    pub(crate) fn record<'a>(&self, root: &'a mut dyn Record) -> ArgsResult<&'a mut dyn Record> {
        match self.slot(root)? {
            Slot::Record(record) => Ok(record),
            Slot::Optional(optional) => Ok(optional.get_or_insert()),
            Slot::Value(_) => Err(ArgsError::unbound(format!("{self} is not a record"))),
        }
    }
}

fn walk<'a>(
    record: &'a mut dyn Record,
    name: &str,
    rest: &[&'static str],
    full: &Path,
) -> ArgsResult<Slot<'a>> {
    let slot = record
        .field_mut(name)
        .ok_or_else(|| ArgsError::unbound(format!("no field {name:?} on the way to {full}")))?;
    let Some((next, rest)) = rest.split_first() else {
        return Ok(slot);
    };
    match slot {
        Slot::Record(inner) => walk(inner, next, rest, full),
        Slot::Optional(optional) => walk(optional.get_or_insert(), next, rest, full),
        Slot::Value(_) => Err(ArgsError::unbound(format!(
            "field {name:?} is a value, cannot reach {full}"
        ))),
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.root)?;
        for field in &self.fields {
            write!(f, ".{field}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Field;

    #[derive(Default)]
    struct Db {
        url: String,
    }

    impl Record for Db {
        fn fields() -> Vec<Field> {
            vec![Field::arg::<String>("url")]
        }

        fn field_mut(&mut self, name: &str) -> Option<Slot<'_>> {
            match name {
                "url" => Some(Slot::Value(&mut self.url)),
                _ => None,
            }
        }
    }

    #[derive(Default)]
    struct App {
        db: Db,
        replica: Option<Db>,
    }

    impl Record for App {
        fn fields() -> Vec<Field> {
            vec![Field::record::<Db>("db"), Field::command::<Db>("replica")]
        }

        fn field_mut(&mut self, name: &str) -> Option<Slot<'_>> {
            match name {
                "db" => Some(Slot::Record(&mut self.db)),
                "replica" => Some(Slot::Optional(&mut self.replica)),
                _ => None,
            }
        }
    }

    fn write(path: &Path, app: &mut App, raw: &str) {
        match path.slot(app).unwrap() {
            Slot::Value(value) => value.set_text(raw).unwrap(),
            _ => panic!("Expected value slot at {path}"),
        }
    }

    #[test]
    fn test_write_nested_value() {
        let mut app = App::default();
        let path = Path::root(0).subpath("db").subpath("url");
        write(&path, &mut app, "postgres://localhost");
        assert_eq!(app.db.url, "postgres://localhost");
        assert_eq!(path.to_string(), "#0.db.url");
    }

    #[test]
    fn test_write_through_optional_instantiates() {
        let mut app = App::default();
        assert!(app.replica.is_none());
        write(&Path::root(0).subpath("replica").subpath("url"), &mut app, "r1");
        assert_eq!(app.replica.map(|db| db.url), Some("r1".to_string()));
    }

    #[test]
    fn test_record_of_root_and_subcommand() {
        let mut app = App::default();
        assert!(Path::root(0).record(&mut app).is_ok());
        assert!(Path::root(0).subpath("replica").record(&mut app).is_ok());
        assert!(app.replica.is_some());
    }

    #[test]
    fn test_unknown_field_is_unbound() {
        let mut app = App::default();
        let err = Path::root(0).subpath("missing").record(&mut app).err().unwrap();
        assert!(matches!(err, ArgsError::Unbound(_)));
    }
}
