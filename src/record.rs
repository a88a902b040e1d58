//! Record definitions: the declarative surface a command is derived from.
//!
//! A record is a plain struct implementing [`Record`]. Its static
//! [`Record::fields`] list carries the per-field metadata (flag names,
//! required, positional, ...), and [`Record::field_mut`] hands out typed
//! [`Slot`]s so the resolver can write into a live instance.
//!
//! ```ignore
//! #[derive(Default)]
//! struct Serve {
//!     port: u16,
//!     verbose: bool,
//! }
//!
//! impl Record for Serve {
//!     fn fields() -> Vec<Field> {
//!         vec![
//!             Field::arg::<u16>("port").required(),
//!             Field::arg::<bool>("verbose").short("v"),
//!         ]
//!     }
//!
//!     fn field_mut(&mut self, name: &str) -> Option<Slot<'_>> {
//!         match name {
//!             "port" => Some(Slot::Value(&mut self.port)),
//!             "verbose" => Some(Slot::Value(&mut self.verbose)),
//!             _ => None,
//!         }
//!     }
//! }
//! ```

use crate::executor::{PersistentPostRun, PersistentPreRun, PostRun, PreRun, Run};
use crate::types::TypeInfo;
use crate::value::Value;

/// A struct whose fields bind to command-line arguments
pub trait Record: 'static {
    /// Field definitions, in declaration order
    fn fields() -> Vec<Field>
    where
        Self: Sized;

    /// Access the named field of this instance
    fn field_mut(&mut self, name: &str) -> Option<Slot<'_>>;

    /// Persistent pre-run hook, if implemented
    fn as_persistent_pre_run(&mut self) -> Option<&mut dyn PersistentPreRun> {
        None
    }

    /// Pre-run hook, if implemented
    fn as_pre_run(&mut self) -> Option<&mut dyn PreRun> {
        None
    }

    /// Run hook, if implemented
    fn as_run(&mut self) -> Option<&mut dyn Run> {
        None
    }

    /// Post-run hook, if implemented
    fn as_post_run(&mut self) -> Option<&mut dyn PostRun> {
        None
    }

    /// Persistent post-run hook, if implemented
    fn as_persistent_post_run(&mut self) -> Option<&mut dyn PersistentPostRun> {
        None
    }
}

/// Mutable access to one field of a live record
pub enum Slot<'a> {
    /// Terminal value
    Value(&'a mut dyn Value),
    /// Nested record held by value
    Record(&'a mut dyn Record),
    /// Nested record that may be absent (`Option<T>`)
    Optional(&'a mut dyn OptionalRecord),
}

/// An optional nested record, instantiated on demand
pub trait OptionalRecord {
    /// The record, if present
    fn get_mut(&mut self) -> Option<&mut dyn Record>;

    /// The record, inserting a default instance when absent
    fn get_or_insert(&mut self) -> &mut dyn Record;
}

impl<T: Record + Default> OptionalRecord for Option<T> {
    fn get_mut(&mut self) -> Option<&mut dyn Record> {
        self.as_mut().map(|r| r as &mut dyn Record)
    }

    fn get_or_insert(&mut self) -> &mut dyn Record {
        self.get_or_insert_with(T::default)
    }
}

/// Static shape of a field
#[derive(Debug, Clone)]
pub(crate) enum Shape {
    Value(TypeInfo),
    Record {
        type_name: &'static str,
        fields: fn() -> Vec<Field>,
        optional: bool,
        embedded: bool,
    },
}

/// Definition of one record field and its command-line metadata
#[derive(Debug, Clone)]
pub struct Field {
    pub(crate) ident: &'static str,
    pub(crate) shape: Shape,
    pub(crate) ignore: bool,
    pub(crate) long: Option<String>,
    pub(crate) short: Option<String>,
    pub(crate) env: Option<String>,
    pub(crate) cmd: Option<String>,
    pub(crate) as_args: bool,
    pub(crate) required: bool,
    pub(crate) positional: bool,
    pub(crate) global: bool,
    pub(crate) separate: bool,
    pub(crate) default: Option<String>,
    pub(crate) help: Option<String>,
}

impl Field {
    fn with_shape(ident: &'static str, shape: Shape) -> Self {
        Self {
            ident,
            shape,
            ignore: false,
            long: None,
            short: None,
            env: None,
            cmd: None,
            as_args: false,
            required: false,
            positional: false,
            global: false,
            separate: false,
            default: None,
            help: None,
        }
    }

    /// A terminal field bound to a flag or positional
    pub fn arg<T: Value>(ident: &'static str) -> Self {
        Self::with_shape(ident, Shape::Value(T::type_info()))
    }

    /// A nested record held by value: its fields become arguments of the
    /// enclosing command, namespaced by this field's name
    pub fn record<T: Record>(ident: &'static str) -> Self {
        Self::nested::<T>(ident, false, false)
    }

    /// A nested `Option<T>` record: a subcommand, unless marked [`Field::as_args`]
    pub fn command<T: Record + Default>(ident: &'static str) -> Self {
        Self::nested::<T>(ident, true, false)
    }

    /// An anonymous nested record: its fields are hoisted without a prefix
    pub fn embedded<T: Record>(ident: &'static str) -> Self {
        Self::nested::<T>(ident, false, true)
    }

    fn nested<T: Record>(ident: &'static str, optional: bool, embedded: bool) -> Self {
        Self::with_shape(
            ident,
            Shape::Record {
                type_name: std::any::type_name::<T>(),
                fields: T::fields,
                optional,
                embedded,
            },
        )
    }

    /// Skip this field entirely
    pub fn ignore(mut self) -> Self {
        self.ignore = true;
        self
    }

    /// Explicit long flag name (without dashes)
    pub fn long(mut self, name: impl Into<String>) -> Self {
        self.long = Some(name.into());
        self
    }

    /// Short flag name; must be exactly one character
    pub fn short(mut self, name: impl Into<String>) -> Self {
        self.short = Some(name.into());
        self
    }

    /// Explicit environment variable name
    pub fn env(mut self, name: impl Into<String>) -> Self {
        self.env = Some(name.into());
        self
    }

    /// Explicit subcommand name
    pub fn cmd(mut self, name: impl Into<String>) -> Self {
        self.cmd = Some(name.into());
        self
    }

    /// Treat a nested optional record as arguments rather than a subcommand
    pub fn as_args(mut self) -> Self {
        self.as_args = true;
        self
    }

    /// Fail resolution when the argument is never supplied
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Bind positional tokens instead of a flag
    pub fn positional(mut self) -> Self {
        self.positional = true;
        self
    }

    /// Make the flag usable from every descendant subcommand
    pub fn global(mut self) -> Self {
        self.global = true;
        self
    }

    /// Array capture: one element per flag occurrence instead of greedy
    pub fn separate(mut self) -> Self {
        self.separate = true;
        self
    }

    /// Default literal, coerced when the flag is absent
    pub fn default_value(mut self, literal: impl Into<String>) -> Self {
        self.default = Some(literal.into());
        self
    }

    /// Help text
    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help = Some(text.into());
        self
    }

    /// Field identifier as declared
    pub fn ident(&self) -> &'static str {
        self.ident
    }
}
