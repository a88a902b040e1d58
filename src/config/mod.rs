//! Parser configuration.
//!
//! Naming and execution policies load from TOML files, and flag fallbacks
//! read the process environment (optionally seeded from a `.env` file).
//!
//! # Example
//!
//! ```no_run
//! use argbind::config::{ConfigurationLoader, EnvironmentLoader};
//! use std::path::Path;
//!
//! let env = EnvironmentLoader::new(Some(Path::new(".env")));
//! let loader = ConfigurationLoader::new(Some(Path::new("config/argbind.toml"))).unwrap();
//! println!("strategy: {:?}", loader.config.strategy);
//! println!("HOME: {:?}", env.var("HOME"));
//! ```

/// Parser policies and the TOML loader
pub mod config;
/// Environment variable lookup and `.env` loading
pub mod environment;

pub use self::config::{ConfigurationLoader, ParserConfig};
pub use self::environment::EnvironmentLoader;
