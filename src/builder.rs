//! Schema builder - converts record definitions into a command tree

use crate::command::{ArgId, Argument, CommandId, CommandTree};
use crate::config::ParserConfig;
use crate::enums::EnumRegistry;
use crate::path::Path;
use crate::record::{Field, Record, Shape};
use crate::types::TypeInfo;
use std::collections::HashSet;
use tracing::trace;

/// Builds a [`CommandTree`] from a root record type
pub struct SchemaBuilder<'a> {
    config: &'a ParserConfig,
    enums: &'a EnumRegistry,
    tree: CommandTree,
}

/// Namespace in effect while walking a record
#[derive(Debug, Clone, Default)]
struct Scope {
    prefix: String,
    env_prefix: String,
    in_group: bool,
}

impl<'a> SchemaBuilder<'a> {
    /// Create a new builder using the naming policies of `config`
    pub fn new(config: &'a ParserConfig, enums: &'a EnumRegistry) -> Self {
        Self {
            config,
            enums,
            tree: CommandTree::default(),
        }
    }

    /// Build the tree of the root command `name`, bound to root number `root`.
    ///
    /// # Panics
    /// On schema-definition errors: a short name that is not one character,
    /// a global-name collision within one branch, a duplicate flag or
    /// subcommand name.
    pub fn build<R: Record>(self, name: &str, root: usize) -> CommandTree {
        self.build_from(name, root, R::fields)
    }

    pub(crate) fn build_from(
        mut self,
        name: &str,
        root: usize,
        fields: fn() -> Vec<Field>,
    ) -> CommandTree {
        let path = Path::root(root);
        let cmd = self.tree.add_command(name.to_string(), path.clone(), None);
        self.walk(cmd, fields(), &path, &Scope::default(), &mut HashSet::new());
        self.tree
    }

    fn walk(
        &mut self,
        cmd: CommandId,
        fields: Vec<Field>,
        path: &Path,
        scope: &Scope,
        globals: &mut HashSet<String>,
    ) {
        for field in fields {
            if field.ignore {
                continue;
            }

            let name = scope.prefixed(
                self.config.arg_splicer,
                field
                    .long
                    .clone()
                    .unwrap_or_else(|| self.config.arg_case.apply(field.ident)),
            );
            let env = scope.env_prefixed(
                self.config.env_splicer,
                field
                    .env
                    .clone()
                    .unwrap_or_else(|| self.config.env_case.apply(field.ident)),
            );
            let subpath = path.subpath(field.ident);

            match &field.shape {
                Shape::Record {
                    type_name,
                    fields,
                    optional,
                    embedded,
                } => {
                    // Embedded record: hoist into the current namespace
                    if *embedded {
                        self.walk(cmd, fields(), &subpath, scope, globals);
                        continue;
                    }
                    // Argument group: the field name becomes the prefix
                    if scope.in_group || field.as_args || !*optional {
                        let group = Scope {
                            prefix: name,
                            env_prefix: env,
                            in_group: true,
                        };
                        self.walk(cmd, fields(), &subpath, &group, globals);
                        continue;
                    }
                    let cname = field
                        .cmd
                        .clone()
                        .unwrap_or_else(|| self.config.cmd_case.apply(field.ident));
                    trace!(command = %cname, record = *type_name, "registering subcommand");
                    let sub = self.tree.add_command(cname, subpath.clone(), Some(cmd));
                    let mut branch = globals.clone();
                    self.walk(sub, fields(), &subpath, &Scope::default(), &mut branch);
                }
                Shape::Value(info) => {
                    self.add_argument(cmd, &field, *info, name, env, subpath, globals);
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn add_argument(
        &mut self,
        cmd: CommandId,
        field: &Field,
        info: TypeInfo,
        name: String,
        env: String,
        path: Path,
        globals: &mut HashSet<String>,
    ) -> ArgId {
        // Check for global args propagation collision
        if self.config.globals_enabled && field.global && !globals.insert(name.clone()) {
            panic!("global args propagation collision: {name}");
        }

        let short = field.short.as_ref().map(|short| {
            if short.chars().count() != 1 {
                panic!("wrong short name: {short:?}");
            }
            format!("-{short}")
        });

        let enumerated = (info.is_int() || info.is_uint()) && self.enums.contains(info.id());

        let argument = Argument {
            path,
            value_type: info,
            long: format!("--{name}"),
            short,
            env,
            required: field.required,
            positional: field.positional,
            global: field.global,
            separate: field.separate,
            default: field.default.clone(),
            help: field.help.clone(),
            array: info.container().into(),
            enumerated,
        };
        trace!(
            flag = %argument.long,
            env = %argument.env,
            path = %argument.path,
            "registering argument"
        );
        self.tree.add_argument(cmd, argument)
    }
}

impl Scope {
    fn prefixed(&self, splicer: crate::naming::Splicer, name: String) -> String {
        splicer.splice(&self.prefix, &name)
    }

    fn env_prefixed(&self, splicer: crate::naming::Splicer, name: String) -> String {
        splicer.splice(&self.env_prefix, &name)
    }
}
