//! argbind - declarative command-line arguments bound to plain structs
//!
//! A command hierarchy is described by records: structs implementing
//! [`Record`] that list their fields with [`Field`] builders. The parser
//! derives flags, environment variable names and subcommands from those
//! definitions, resolves an argument vector into live record instances and
//! finally runs the lifecycle hooks of the resolved command chain.
//!
//! - **`record`** - Field definitions and typed slots
//! - **`builder`** - Command tree derivation with naming policies
//! - **`router`** - Tokenizer and resolver
//! - **`executor`** - Lifecycle hooks and error strategies
//! - **`config`** - TOML parser configuration and environment lookup
//!
//! # Example
//!
//! ```ignore
//! use argbind::prelude::*;
//!
//! #[derive(Default)]
//! struct Serve {
//!     port: u16,
//! }
//!
//! impl Record for Serve {
//!     fn fields() -> Vec<Field> {
//!         vec![Field::arg::<u16>("port").required()]
//!     }
//!
//!     fn field_mut(&mut self, name: &str) -> Option<Slot<'_>> {
//!         match name {
//!             "port" => Some(Slot::Value(&mut self.port)),
//!             _ => None,
//!         }
//!     }
//!
//!     fn as_run(&mut self) -> Option<&mut dyn Run> {
//!         Some(self)
//!     }
//! }
//!
//! impl Run for Serve {
//!     fn run(&mut self, _ctx: &mut Context) -> anyhow::Result<()> {
//!         println!("listening on {}", self.port);
//!         Ok(())
//!     }
//! }
//!
//! let mut serve = Serve::default();
//! let mut parser = Parser::new();
//! parser.add_root("serve", &mut serve);
//! parser.run(std::env::args(), &mut Context::new())?;
//! ```

#![warn(missing_docs)]

/// Field binding paths
pub mod path;

/// Type descriptors
pub mod types;

/// Scalar and sequence value conversion
pub mod value;

/// Record definitions
pub mod record;

/// Name case conversion and splicing
pub mod naming;

/// Enum label registry
pub mod enums;

/// Commands and arguments
pub mod command;

/// Command tree derivation
pub mod builder;

mod coerce;

/// Argument resolution
pub mod router;

/// Hook execution context
pub mod context;

/// Lifecycle hooks
pub mod executor;

/// Parser configuration
pub mod config;

/// Error types
pub mod error;

/// Parser facade
pub mod parser;

pub use command::{ArgId, Argument, ArrayKind, Command, CommandId, CommandTree};
pub use context::{Context, ContextError};
pub use error::{ArgsError, ArgsResult};
pub use executor::{
    HookError, OnErrorStrategy, PersistentPostRun, PersistentPreRun, PostRun, PreRun, Run, Stage,
};
pub use parser::Parser;
pub use record::{Field, OptionalRecord, Record, Slot};
pub use router::Resolution;
pub use value::{Parsed, TextValue, Value, ValueError};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{ConfigurationLoader, EnvironmentLoader, ParserConfig};
    pub use crate::context::Context;
    pub use crate::error::{ArgsError, ArgsResult};
    pub use crate::executor::{
        OnErrorStrategy, PersistentPostRun, PersistentPreRun, PostRun, PreRun, Run,
    };
    pub use crate::naming::{Case, Splicer};
    pub use crate::parser::Parser;
    pub use crate::record::{Field, Record, Slot};
    pub use crate::types::{Kind, TypeInfo};
    pub use crate::value::{Parsed, Value, ValueError};
}
