//! Command tree: commands, arguments and their bindings.

use crate::path::Path;
use crate::types::{Container, TypeInfo};
use std::collections::HashMap;

/// Index of a command inside its [`CommandTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(usize);

/// Index of an argument inside its [`CommandTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArgId(usize);

/// Array classification of an argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayKind {
    /// Single value
    None,
    /// Fixed-length array
    Fixed(usize),
    /// Growable list
    List,
}

impl From<Container> for ArrayKind {
    fn from(container: Container) -> Self {
        match container {
            Container::Scalar => ArrayKind::None,
            Container::Array(len) => ArrayKind::Fixed(len),
            Container::List => ArrayKind::List,
        }
    }
}

/// One bindable flag or positional
#[derive(Debug, Clone)]
pub struct Argument {
    pub(crate) path: Path,
    pub(crate) value_type: TypeInfo,
    pub(crate) long: String,
    pub(crate) short: Option<String>,
    pub(crate) env: String,
    pub(crate) required: bool,
    pub(crate) positional: bool,
    pub(crate) global: bool,
    pub(crate) separate: bool,
    pub(crate) default: Option<String>,
    pub(crate) help: Option<String>,
    pub(crate) array: ArrayKind,
    pub(crate) enumerated: bool,
}

impl Argument {
    /// Binding path of the field
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Declared type of the bound field
    pub fn value_type(&self) -> &TypeInfo {
        &self.value_type
    }

    /// Long flag, including the leading `--`
    pub fn long(&self) -> &str {
        &self.long
    }

    /// Short flag, including the leading `-`
    pub fn short(&self) -> Option<&str> {
        self.short.as_deref()
    }

    /// Environment variable consulted when the flag is absent
    pub fn env(&self) -> &str {
        &self.env
    }

    /// Must be supplied on the command line or through its environment variable
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Bound from positional tokens
    pub fn is_positional(&self) -> bool {
        self.positional
    }

    /// Visible to descendant commands when globals are enabled
    pub fn is_global(&self) -> bool {
        self.global
    }

    /// One element per occurrence instead of greedy capture
    pub fn is_separate(&self) -> bool {
        self.separate
    }

    /// Default literal applied by the fallback pass
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Help text
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Array classification
    pub fn array(&self) -> ArrayKind {
        self.array
    }

    /// The value type has a registered label table
    pub fn is_enum(&self) -> bool {
        self.enumerated
    }

    /// Boolean flag: takes no value
    pub fn is_bool(&self) -> bool {
        self.value_type.is_bool()
    }

    /// How many positional values this argument can absorb
    pub(crate) fn capacity(&self) -> Option<usize> {
        match self.array {
            ArrayKind::None => Some(1),
            ArrayKind::Fixed(len) => Some(len),
            ArrayKind::List => None,
        }
    }
}

/// A named command node
#[derive(Debug, Clone)]
pub struct Command {
    name: String,
    path: Path,
    parent: Option<CommandId>,
    subcommands: HashMap<String, CommandId>,
    args: Vec<ArgId>,
    flags: HashMap<String, ArgId>,
}

impl Command {
    /// Command name as typed on the command line
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Binding path of the record behind this command
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parent command, None for the root
    pub fn parent(&self) -> Option<CommandId> {
        self.parent
    }

    /// Arguments in declaration order
    pub fn arguments(&self) -> &[ArgId] {
        &self.args
    }

    /// Child command registered under `name`
    pub fn subcommand(&self, name: &str) -> Option<CommandId> {
        self.subcommands.get(name).copied()
    }

    /// Whether the command has children
    pub fn has_subcommands(&self) -> bool {
        !self.subcommands.is_empty()
    }

    /// Subcommand names, sorted
    pub fn subcommand_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.subcommands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Look up `--long` or `-s`
    pub fn flag(&self, name: &str) -> Option<ArgId> {
        self.flags.get(name).copied()
    }
}

/// All commands and arguments reachable from one root
#[derive(Debug, Clone, Default)]
pub struct CommandTree {
    commands: Vec<Command>,
    arguments: Vec<Argument>,
}

impl CommandTree {
    /// The root command (first one added)
    pub fn root(&self) -> CommandId {
        CommandId(0)
    }

    /// Command by id
    pub fn command(&self, id: CommandId) -> &Command {
        &self.commands[id.0]
    }

    /// Argument by id
    pub fn argument(&self, id: ArgId) -> &Argument {
        &self.arguments[id.0]
    }

    /// Every command with its id, in registration order
    pub fn commands(&self) -> impl Iterator<Item = (CommandId, &Command)> {
        self.commands.iter().enumerate().map(|(i, c)| (CommandId(i), c))
    }

    /// Find a command by its chain of names below the root
    pub fn find(&self, names: &[&str]) -> Option<CommandId> {
        names.iter().try_fold(self.root(), |current, name| {
            self.command(current).subcommand(name)
        })
    }

    /// `id` and its ancestors, root first
    pub fn lineage(&self, id: CommandId) -> Vec<CommandId> {
        let mut chain = vec![id];
        let mut current = id;
        while let Some(parent) = self.command(current).parent {
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }

    /// Positional arguments of a command, in declaration order
    pub fn positionals(&self, id: CommandId) -> Vec<ArgId> {
        self.command(id)
            .args
            .iter()
            .copied()
            .filter(|arg| self.argument(*arg).positional)
            .collect()
    }

    /// Add a command; children are registered under their parent.
    ///
    /// # Panics
    /// If the parent already has a subcommand with this name.
    pub(crate) fn add_command(
        &mut self,
        name: String,
        path: Path,
        parent: Option<CommandId>,
    ) -> CommandId {
        let id = CommandId(self.commands.len());
        if let Some(parent) = parent {
            let siblings = &mut self.commands[parent.0].subcommands;
            if siblings.contains_key(&name) {
                panic!("duplicate subcommand: {name}");
            }
            siblings.insert(name.clone(), id);
        }
        self.commands.push(Command {
            name,
            path,
            parent,
            subcommands: HashMap::new(),
            args: Vec::new(),
            flags: HashMap::new(),
        });
        id
    }

    /// Attach an argument to a command.
    ///
    /// # Panics
    /// If the long or short flag is already taken in that command.
    pub(crate) fn add_argument(&mut self, command: CommandId, argument: Argument) -> ArgId {
        let id = ArgId(self.arguments.len());
        let cmd = &mut self.commands[command.0];
        let names = std::iter::once(argument.long.clone()).chain(argument.short.clone());
        for name in names {
            if cmd.flags.contains_key(&name) {
                panic!("duplicate flag {name} in command {}", cmd.name);
            }
            cmd.flags.insert(name, id);
        }
        cmd.args.push(id);
        self.arguments.push(argument);
        id
    }
}
