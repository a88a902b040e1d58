//! Tokenizer and resolver: walks one command tree per invocation.

use crate::coerce;
use crate::command::{ArgId, ArrayKind, CommandId, CommandTree};
use crate::config::{EnvironmentLoader, ParserConfig};
use crate::enums::EnumRegistry;
use crate::error::{ArgsError, ArgsResult};
use crate::path::Path;
use crate::record::Record;
use std::collections::{BTreeMap, BTreeSet};
use std::mem;
use tracing::{debug, trace};

/// Outcome of resolving one argument vector.
///
/// Each call to `Parser::eval` returns a fresh resolution; nothing carries
/// over between calls.
#[derive(Debug, Clone)]
pub struct Resolution {
    root: usize,
    command: CommandId,
    chain: Vec<CommandId>,
    exec_path: Vec<(String, Path)>,
    set: BTreeSet<ArgId>,
    positionals: Vec<String>,
}

impl Resolution {
    /// Index of the root the invocation selected
    pub fn root_index(&self) -> usize {
        self.root
    }

    /// Final command of the chain
    pub fn command(&self) -> CommandId {
        self.command
    }

    /// Resolved commands, root first
    pub fn chain(&self) -> &[CommandId] {
        &self.chain
    }

    /// Names of the resolved commands, root first
    pub fn command_names(&self) -> Vec<&str> {
        self.exec_path.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Paths of the bound records hooks run on, root first
    pub fn execution_path(&self) -> impl Iterator<Item = &Path> {
        self.exec_path.iter().map(|(_, path)| path)
    }

    pub(crate) fn exec_path(&self) -> &[(String, Path)] {
        &self.exec_path
    }

    /// The argument was supplied on the command line or by its environment variable
    pub fn is_set(&self, id: ArgId) -> bool {
        self.set.contains(&id)
    }

    /// Positional values, in order of appearance.
    ///
    /// Tokens after `--` that no positional argument could take are kept
    /// here, after the bound ones.
    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }
}

/// `-x`, `--x`, `--x=1`; a lone `-` or `--` is not a flag
pub(crate) fn is_flag(token: &str) -> bool {
    token.starts_with('-') && !token.trim_start_matches('-').is_empty()
}

/// Split `--name=value` on the first `=`
fn split_inline(token: &str) -> (&str, Option<&str>) {
    match token.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (token, None),
    }
}

fn next_value(args: &[String], cursor: &mut usize, flag: &str) -> ArgsResult<String> {
    let value = args
        .get(*cursor)
        .cloned()
        .ok_or_else(|| ArgsError::MissingValue(flag.to_string()))?;
    *cursor += 1;
    Ok(value)
}

#[derive(Debug)]
struct State {
    current: CommandId,
    chain: Vec<CommandId>,
    exec_path: Vec<(String, Path)>,
    pending: BTreeMap<ArgId, Vec<String>>,
    waiting: Vec<String>,
    positionals: Vec<String>,
    unbound: Vec<String>,
    set: BTreeSet<ArgId>,
}

/// Resolves argument vectors against one command tree
pub(crate) struct Router<'a> {
    pub(crate) tree: &'a CommandTree,
    pub(crate) config: &'a ParserConfig,
    pub(crate) enums: &'a EnumRegistry,
    pub(crate) env: &'a EnvironmentLoader,
}

impl Router<'_> {
    /// Resolve `args` (program name excluded) into `record`
    pub(crate) fn resolve(&self, record: &mut dyn Record, args: &[String]) -> ArgsResult<Resolution> {
        let root = self.tree.root();
        let root_command = self.tree.command(root);
        let mut state = State {
            current: root,
            chain: vec![root],
            exec_path: vec![(root_command.name().to_string(), root_command.path().clone())],
            pending: BTreeMap::new(),
            waiting: Vec::new(),
            positionals: Vec::new(),
            unbound: Vec::new(),
            set: BTreeSet::new(),
        };

        let mut positional_only = false;
        let mut cursor = 0;
        while cursor < args.len() {
            let token = &args[cursor];
            cursor += 1;

            if positional_only {
                self.push_positional(&mut state, token, true)?;
                continue;
            }
            if token == "--" {
                positional_only = true;
                continue;
            }
            if !is_flag(token) {
                match self.tree.command(state.current).subcommand(token) {
                    Some(child) => {
                        self.commit(record, &mut state)?;
                        self.enter(record, &mut state, child)?;
                    }
                    None => self.push_positional(&mut state, token, false)?,
                }
                continue;
            }

            let (name, inline) = split_inline(token);
            let id = self.lookup(&state, name)?;
            let argument = self.tree.argument(id);
            trace!(flag = name, inline = inline.is_some(), "flag");

            match argument.array() {
                ArrayKind::None => {
                    let value = match inline {
                        Some(value) => value.to_string(),
                        None if argument.is_bool() => "true".to_string(),
                        None => next_value(args, &mut cursor, name)?,
                    };
                    state.pending.insert(id, vec![value]);
                }
                array => {
                    let limit = match array {
                        ArrayKind::Fixed(len) => Some(len),
                        _ => None,
                    };
                    let values = state.pending.entry(id).or_default();
                    if limit.is_some_and(|len| values.len() >= len) {
                        return Err(ArgsError::ArrayOverCapacity {
                            flag: argument.long().to_string(),
                            capacity: limit.unwrap_or_default(),
                        });
                    }

                    if argument.is_separate() {
                        let value = match inline {
                            Some(value) => value.to_string(),
                            None => next_value(args, &mut cursor, name)?,
                        };
                        values.push(value);
                        continue;
                    }

                    if let Some(value) = inline {
                        values.push(value.to_string());
                    }
                    while let Some(next) = args.get(cursor) {
                        let full = limit.is_some_and(|len| values.len() >= len);
                        if full || is_flag(next) || next == "--" {
                            break;
                        }
                        values.push(next.clone());
                        cursor += 1;
                    }
                    if values.is_empty() {
                        return Err(ArgsError::MissingValue(name.to_string()));
                    }
                }
            }
        }

        self.commit(record, &mut state)?;
        state.positionals.append(&mut state.unbound);
        self.fallback(record, &mut state)?;

        let command = self.tree.command(state.current);
        for &id in command.arguments() {
            let argument = self.tree.argument(id);
            if argument.is_required() && !state.set.contains(&id) {
                return Err(ArgsError::RequiredFlagMissing(argument.long().to_string()));
            }
        }

        Ok(Resolution {
            root: command.path().root_index(),
            command: state.current,
            chain: state.chain,
            exec_path: state.exec_path,
            set: state.set,
            positionals: state.positionals,
        })
    }

    /// Find a flag on the current command, then among inherited globals
    fn lookup(&self, state: &State, name: &str) -> ArgsResult<ArgId> {
        if let Some(id) = self.tree.command(state.current).flag(name) {
            return Ok(id);
        }
        if self.config.globals_enabled {
            for &ancestor in state.chain.iter().rev().skip(1) {
                if let Some(id) = self.tree.command(ancestor).flag(name) {
                    if self.tree.argument(id).is_global() {
                        return Ok(id);
                    }
                }
            }
        }
        Err(ArgsError::FlagNotFound(name.to_string()))
    }

    /// Positional values the current command can still take; None is unbounded
    fn positional_room(&self, state: &State) -> Option<usize> {
        let capacity = self
            .tree
            .positionals(state.current)
            .into_iter()
            .map(|id| self.tree.argument(id).capacity())
            .try_fold(0usize, |total, cap| cap.map(|cap| total + cap))?;
        Some(capacity.saturating_sub(state.waiting.len()))
    }

    fn push_positional(&self, state: &mut State, token: &str, terminated: bool) -> ArgsResult<()> {
        if self.positional_room(state).map_or(true, |room| room > 0) {
            state.waiting.push(token.to_string());
            return Ok(());
        }
        if terminated {
            trace!(token, "unbound positional");
            state.unbound.push(token.to_string());
            return Ok(());
        }
        if self.tree.command(state.current).has_subcommands() {
            Err(ArgsError::CommandNotFound(token.to_string()))
        } else {
            Err(ArgsError::UnexpectedArgument(token.to_string()))
        }
    }

    /// Hand waiting positionals to the current command's positional arguments
    fn distribute(&self, state: &mut State) -> ArgsResult<()> {
        let mut waiting = mem::take(&mut state.waiting).into_iter();
        for id in self.tree.positionals(state.current) {
            let taken: Vec<String> = match self.tree.argument(id).capacity() {
                Some(capacity) => waiting.by_ref().take(capacity).collect(),
                None => waiting.by_ref().collect(),
            };
            if taken.is_empty() {
                break;
            }
            state.positionals.extend(taken.iter().cloned());
            state.pending.entry(id).or_default().extend(taken);
        }
        match waiting.next() {
            Some(leftover) => Err(ArgsError::UnexpectedArgument(leftover)),
            None => Ok(()),
        }
    }

    /// Coerce everything accumulated since the last commit
    fn commit(&self, record: &mut dyn Record, state: &mut State) -> ArgsResult<()> {
        self.distribute(state)?;
        for (id, raws) in mem::take(&mut state.pending) {
            let argument = self.tree.argument(id);
            debug!(flag = argument.long(), values = raws.len(), "commit");
            coerce::apply(&mut *record, argument, &raws, self.enums)?;
            state.set.insert(id);
        }
        Ok(())
    }

    fn enter(&self, record: &mut dyn Record, state: &mut State, child: CommandId) -> ArgsResult<()> {
        let command = self.tree.command(child);
        command.path().record(&mut *record)?;
        debug!(command = command.name(), path = %command.path(), "subcommand");
        state.current = child;
        state.chain.push(child);
        state
            .exec_path
            .push((command.name().to_string(), command.path().clone()));
        Ok(())
    }

    /// Environment values, then defaults, for arguments still unset
    fn fallback(&self, record: &mut dyn Record, state: &mut State) -> ArgsResult<()> {
        for &command in &state.chain {
            for &id in self.tree.command(command).arguments() {
                if state.set.contains(&id) {
                    continue;
                }
                let argument = self.tree.argument(id);

                if self.config.env_fallback {
                    if let Some(raw) = self.env.var(argument.env()) {
                        debug!(flag = argument.long(), env = argument.env(), "environment fallback");
                        coerce::apply(&mut *record, argument, &[raw], self.enums)?;
                        state.set.insert(id);
                        continue;
                    }
                }

                if self.config.apply_defaults {
                    if let Some(default) = argument.default_value() {
                        trace!(flag = argument.long(), default, "default");
                        coerce::apply(&mut *record, argument, &[default.to_string()], self.enums)?;
                    }
                }
            }
        }
        Ok(())
    }
}
