//! Parser facade: roots, enum registration, resolution and execution.

use crate::builder::SchemaBuilder;
use crate::command::CommandTree;
use crate::config::{EnvironmentLoader, ParserConfig};
use crate::context::Context;
use crate::enums::EnumRegistry;
use crate::error::{ArgsError, ArgsResult};
use crate::executor;
use crate::record::Record;
use crate::router::{Resolution, Router};
use crate::value::Value;
use std::path::Path;
use tracing::debug;

struct Root<'r> {
    name: String,
    tree: CommandTree,
    record: &'r mut dyn Record,
}

/// Binds command-line arguments into registered root records and runs
/// their lifecycle hooks.
///
/// The parser borrows each root record mutably for its whole lifetime; read
/// the records back once the parser is dropped.
///
/// ```ignore
/// let mut app = App::default();
/// let mut parser = Parser::new();
/// parser.add_root("app", &mut app);
/// parser.run(std::env::args(), &mut Context::new())?;
/// drop(parser);
/// println!("{:?}", app);
/// ```
pub struct Parser<'r> {
    config: ParserConfig,
    enums: EnumRegistry,
    env: EnvironmentLoader,
    roots: Vec<Root<'r>>,
}

impl Default for Parser<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> Parser<'r> {
    /// Parser with default naming and execution policies
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    /// Parser using `config`
    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            enums: EnumRegistry::new(),
            env: EnvironmentLoader::default(),
            roots: Vec::new(),
        }
    }

    /// Source for environment fallbacks
    pub fn with_environment(mut self, env: EnvironmentLoader) -> Self {
        self.env = env;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Register the labels of an ordinal-backed type.
    ///
    /// Must happen before the roots using `T` are added: arguments are
    /// classified when their command tree is built.
    ///
    /// # Panics
    /// If `T` is a standard-library type or is not integer-backed.
    pub fn register_enum<T, I, K>(&mut self, labels: I)
    where
        T: Value,
        I: IntoIterator<Item = (K, i64)>,
        K: AsRef<str>,
    {
        self.enums.register::<T, I, K>(labels);
    }

    /// Register `record` as the root command `name`.
    ///
    /// # Panics
    /// On schema errors in `R` (see [`SchemaBuilder`]) or if a root with
    /// this name already exists.
    pub fn add_root<R: Record>(&mut self, name: impl Into<String>, record: &'r mut R) {
        let name = name.into();
        if self.roots.iter().any(|root| root.name == name) {
            panic!("duplicate root command: {name}");
        }
        let tree = SchemaBuilder::new(&self.config, &self.enums).build::<R>(&name, self.roots.len());
        debug!(root = %name, commands = tree.commands().count(), "root registered");
        self.roots.push(Root { name, tree, record });
    }

    /// Command tree of the root `name`
    pub fn command_tree(&self, name: &str) -> Option<&CommandTree> {
        self.roots.iter().find(|root| root.name == name).map(|root| &root.tree)
    }

    /// Resolve a full argument vector (program name first) into the roots
    pub fn eval<I, S>(&mut self, args: I) -> ArgsResult<Resolution>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = args.into_iter().map(|arg| arg.as_ref().to_string());
        let program = args.next().ok_or(ArgsError::MissingProgramName)?;
        let rest: Vec<String> = args.collect();

        let index = self.find_root(&program)?;
        let root = &mut self.roots[index];
        debug!(root = %root.name, args = rest.len(), "eval");

        Router {
            tree: &root.tree,
            config: &self.config,
            enums: &self.enums,
            env: &self.env,
        }
        .resolve(&mut *root.record, &rest)
    }

    /// Run the lifecycle hooks along a resolution's command chain
    pub fn execute(&mut self, resolution: &Resolution, ctx: &mut Context) -> ArgsResult<()> {
        let root = self
            .roots
            .get_mut(resolution.root_index())
            .ok_or_else(|| ArgsError::unbound(format!("no root #{}", resolution.root_index())))?;
        executor::execute(
            &mut *root.record,
            resolution.exec_path(),
            self.config.strategy,
            ctx,
        )
    }

    /// [`Parser::eval`] then [`Parser::execute`]
    pub fn run<I, S>(&mut self, args: I, ctx: &mut Context) -> ArgsResult<Resolution>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let resolution = self.eval(args)?;
        self.execute(&resolution, ctx)?;
        Ok(resolution)
    }

    /// `flag` (`--long` or `-s`) on the resolved chain was set explicitly
    pub fn is_set(&self, resolution: &Resolution, flag: &str) -> bool {
        let Some(root) = self.roots.get(resolution.root_index()) else {
            return false;
        };
        resolution
            .chain()
            .iter()
            .filter_map(|&id| root.tree.command(id).flag(flag))
            .any(|arg| resolution.is_set(arg))
    }

    fn find_root(&self, program: &str) -> ArgsResult<usize> {
        let by_name = |name: &str| self.roots.iter().position(|root| root.name == name);
        by_name(program)
            .or_else(|| {
                Path::new(program)
                    .file_name()
                    .and_then(|base| base.to_str())
                    .and_then(by_name)
            })
            .ok_or_else(|| ArgsError::CommandNotFound(program.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Field, Slot};

    #[derive(Debug, Default)]
    struct Tool {
        level: u8,
    }

    impl Record for Tool {
        fn fields() -> Vec<Field> {
            vec![Field::arg::<u8>("level").short("l")]
        }

        fn field_mut(&mut self, name: &str) -> Option<Slot<'_>> {
            match name {
                "level" => Some(Slot::Value(&mut self.level)),
                _ => None,
            }
        }
    }

    #[test]
    fn test_empty_args() {
        let mut tool = Tool::default();
        let mut parser = Parser::new();
        parser.add_root("tool", &mut tool);
        let err = parser.eval(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, ArgsError::MissingProgramName));
    }

    #[test]
    fn test_root_by_basename() {
        let mut tool = Tool::default();
        let mut parser = Parser::new();
        parser.add_root("tool", &mut tool);
        let resolution = parser.eval(["/usr/local/bin/tool", "-l", "3"]).unwrap();
        assert!(parser.is_set(&resolution, "--level"));
        assert!(parser.is_set(&resolution, "-l"));
        drop(parser);
        assert_eq!(tool.level, 3);
    }

    #[test]
    fn test_unknown_root() {
        let mut tool = Tool::default();
        let mut parser = Parser::new();
        parser.add_root("tool", &mut tool);
        let err = parser.eval(["other"]).unwrap_err();
        assert!(matches!(err, ArgsError::CommandNotFound(name) if name == "other"));
    }

    #[test]
    fn test_multiple_roots() {
        let mut first = Tool::default();
        let mut second = Tool::default();
        let mut parser = Parser::new();
        parser.add_root("first", &mut first);
        parser.add_root("second", &mut second);

        let resolution = parser.eval(["second", "--level=9"]).unwrap();
        assert_eq!(resolution.root_index(), 1);
        assert!(parser.command_tree("first").is_some());
        drop(parser);
        assert_eq!(first.level, 0);
        assert_eq!(second.level, 9);
    }

    #[test]
    fn test_repeated_eval_is_independent() {
        let mut tool = Tool::default();
        let mut parser = Parser::new();
        parser.add_root("tool", &mut tool);

        let first = parser.eval(["tool", "-l", "1"]).unwrap();
        let second = parser.eval(["tool"]).unwrap();
        assert!(parser.is_set(&first, "--level"));
        assert!(!parser.is_set(&second, "--level"));
    }

    #[test]
    #[should_panic(expected = "duplicate root command")]
    fn test_duplicate_root_panics() {
        let mut a = Tool::default();
        let mut b = Tool::default();
        let mut parser = Parser::new();
        parser.add_root("tool", &mut a);
        parser.add_root("tool", &mut b);
    }
}
