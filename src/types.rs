//! Type classification for bindable values.
//!
//! Every [`Value`](crate::value::Value) describes itself with a [`TypeInfo`].
//! The schema builder only ever asks questions through the predicates here;
//! it never inspects concrete Rust types.

use std::any::{type_name, TypeId};

/// Scalar category of a value (for sequences, the element category)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// `true` / `false` switch
    Bool,
    /// Signed integer
    Int,
    /// Unsigned integer
    Uint,
    /// Floating point number
    Float,
    /// Plain text
    Str,
    /// Type that parses itself from text
    Text,
}

/// How many values a field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    /// Exactly one value
    Scalar,
    /// Fixed-length array
    Array(usize),
    /// Growable list
    List,
}

/// Description of a bindable value type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeInfo {
    id: TypeId,
    name: &'static str,
    kind: Kind,
    container: Container,
    builtin: bool,
    optional: bool,
}

impl TypeInfo {
    /// Describe a standard-library scalar type
    pub fn builtin<T: 'static>(kind: Kind) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            kind,
            container: Container::Scalar,
            builtin: true,
            optional: false,
        }
    }

    /// Describe a user-defined scalar type (eligible for enum registration)
    pub fn custom<T: 'static>(kind: Kind) -> Self {
        Self {
            builtin: false,
            ..Self::builtin::<T>(kind)
        }
    }

    /// Describe a sequence type `S` whose elements are described by `elem`
    pub fn sequence<S: 'static>(elem: TypeInfo, container: Container) -> Self {
        Self {
            id: TypeId::of::<S>(),
            name: type_name::<S>(),
            kind: elem.kind,
            container,
            builtin: true,
            optional: false,
        }
    }

    /// Same type, but the field may be left unset (`Option<T>`)
    pub fn into_optional(self) -> Self {
        Self {
            optional: true,
            ..self
        }
    }

    /// Identity used for enum registry lookups
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Rust type name, for diagnostics
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Scalar or element category
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Container shape
    pub fn container(&self) -> Container {
        self.container
    }

    /// Whether the type comes from the standard library
    pub fn is_builtin(&self) -> bool {
        self.builtin
    }

    /// Whether the field is an `Option`
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Scalar `bool`
    pub fn is_bool(&self) -> bool {
        self.container == Container::Scalar && self.kind == Kind::Bool
    }

    /// Signed integer scalar
    pub fn is_int(&self) -> bool {
        self.container == Container::Scalar && self.kind == Kind::Int
    }

    /// Unsigned integer scalar
    pub fn is_uint(&self) -> bool {
        self.container == Container::Scalar && self.kind == Kind::Uint
    }

    /// Floating point scalar
    pub fn is_float(&self) -> bool {
        self.container == Container::Scalar && self.kind == Kind::Float
    }

    /// Any numeric scalar
    pub fn is_number(&self) -> bool {
        self.is_int() || self.is_uint() || self.is_float()
    }

    /// `String` or path scalar
    pub fn is_string(&self) -> bool {
        self.container == Container::Scalar && self.kind == Kind::Str
    }

    /// Custom text-parseable type
    pub fn is_text(&self) -> bool {
        self.container == Container::Scalar && self.kind == Kind::Text
    }

    /// Boolean, numeric or string scalar
    pub fn is_scalar(&self) -> bool {
        self.is_bool() || self.is_number() || self.is_string()
    }

    /// Fixed-length array or growable list
    pub fn is_array(&self) -> bool {
        self.container != Container::Scalar
    }

    /// Declared length of a fixed array
    pub fn array_len(&self) -> Option<usize> {
        match self.container {
            Container::Array(len) => Some(len),
            _ => None,
        }
    }
}
