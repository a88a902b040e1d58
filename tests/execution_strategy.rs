//! Lifecycle execution tests
//!
//! These tests verify hook ordering and each error strategy through the
//! public `Parser::run` entry point.

use argbind::prelude::*;
use argbind::{ArgsError, Stage};
use std::sync::{Arc, Mutex};

type Calls = Arc<Mutex<Vec<String>>>;

fn log(ctx: &Context, entry: &str) {
    if let Some(calls) = ctx.get::<Calls>("calls") {
        calls.lock().unwrap().push(entry.to_string());
    }
}

#[derive(Debug, Default)]
struct Migrate {
    fail: bool,
    dry_run: bool,
}

impl Record for Migrate {
    fn fields() -> Vec<Field> {
        vec![Field::arg::<bool>("fail"), Field::arg::<bool>("dry_run")]
    }

    fn field_mut(&mut self, name: &str) -> Option<Slot<'_>> {
        match name {
            "fail" => Some(Slot::Value(&mut self.fail)),
            "dry_run" => Some(Slot::Value(&mut self.dry_run)),
            _ => None,
        }
    }

    fn as_pre_run(&mut self) -> Option<&mut dyn PreRun> {
        Some(self)
    }

    fn as_run(&mut self) -> Option<&mut dyn Run> {
        Some(self)
    }

    fn as_persistent_post_run(&mut self) -> Option<&mut dyn PersistentPostRun> {
        Some(self)
    }
}

impl PreRun for Migrate {
    fn pre_run(&mut self, ctx: &mut Context) -> anyhow::Result<()> {
        log(ctx, "migrate:pre_run");
        Ok(())
    }
}

impl Run for Migrate {
    fn run(&mut self, ctx: &mut Context) -> anyhow::Result<()> {
        log(ctx, "migrate:run");
        ctx.check()?;
        if self.fail {
            anyhow::bail!("migration failed");
        }
        Ok(())
    }
}

impl PersistentPostRun for Migrate {
    fn persistent_post_run(&mut self, ctx: &mut Context) -> anyhow::Result<()> {
        log(ctx, "migrate:persistent_post_run");
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Db {
    connected: bool,
    migrate: Option<Migrate>,
}

impl Record for Db {
    fn fields() -> Vec<Field> {
        vec![
            Field::arg::<bool>("connected").ignore(),
            Field::command::<Migrate>("migrate"),
        ]
    }

    fn field_mut(&mut self, name: &str) -> Option<Slot<'_>> {
        match name {
            "migrate" => Some(Slot::Optional(&mut self.migrate)),
            _ => None,
        }
    }

    fn as_persistent_pre_run(&mut self) -> Option<&mut dyn PersistentPreRun> {
        Some(self)
    }

    fn as_persistent_post_run(&mut self) -> Option<&mut dyn PersistentPostRun> {
        Some(self)
    }
}

impl PersistentPreRun for Db {
    fn persistent_pre_run(&mut self, ctx: &mut Context) -> anyhow::Result<()> {
        log(ctx, "db:persistent_pre_run");
        self.connected = true;
        Ok(())
    }
}

impl PersistentPostRun for Db {
    fn persistent_post_run(&mut self, ctx: &mut Context) -> anyhow::Result<()> {
        log(ctx, "db:persistent_post_run");
        self.connected = false;
        Ok(())
    }
}

fn run(db: &mut Db, strategy: OnErrorStrategy, args: &[&str]) -> (Result<(), ArgsError>, Vec<String>, Context) {
    let calls: Calls = Arc::default();
    let mut ctx = Context::new();
    ctx.insert("calls", calls.clone());

    let mut parser = Parser::with_config(ParserConfig::default().with_on_error_strategy(strategy));
    parser.add_root("db", db);
    let result = parser.run(args.iter().copied(), &mut ctx).map(|_| ());

    let calls = calls.lock().unwrap().clone();
    (result, calls, ctx)
}

#[test]
fn test_successful_chain() {
    let mut db = Db::default();
    let (result, calls, ctx) = run(&mut db, OnErrorStrategy::Break, &["db", "migrate", "--dryRun"]);

    result.unwrap();
    assert_eq!(
        calls,
        vec![
            "db:persistent_pre_run",
            "migrate:pre_run",
            "migrate:run",
            "migrate:persistent_post_run",
            "db:persistent_post_run",
        ]
    );
    assert!(ctx.last_error().is_none());
    assert!(!db.connected);
    assert!(db.migrate.unwrap().dry_run);
}

#[test]
fn test_break_leaves_post_runners() {
    let mut db = Db::default();
    let (result, calls, _) = run(&mut db, OnErrorStrategy::Break, &["db", "migrate", "--fail"]);

    let err = result.unwrap_err();
    assert_eq!(err.as_hook().map(|e| e.stage), Some(Stage::Run));
    assert_eq!(err.to_string(), "run hook failed: migration failed");
    assert_eq!(calls.last().unwrap(), "migrate:run");
    assert!(db.connected);
}

#[test]
fn test_post_runners_release_resources() {
    let mut db = Db::default();
    let (result, calls, ctx) = run(&mut db, OnErrorStrategy::PostRunners, &["db", "migrate", "--fail"]);

    assert!(result.is_err());
    assert_eq!(calls.last().unwrap(), "db:persistent_post_run");
    assert_eq!(ctx.last_error().map(|e| e.command.as_str()), Some("migrate"));
    assert!(!db.connected);
}

#[test]
fn test_continue_records_last_error() {
    let mut db = Db::default();
    let (result, calls, ctx) = run(&mut db, OnErrorStrategy::Continue, &["db", "migrate", "--fail"]);

    assert!(matches!(result, Err(ArgsError::Hook(_))));
    assert_eq!(calls.len(), 5);
    assert_eq!(ctx.last_error().map(|e| e.stage), Some(Stage::Run));
}

#[test]
fn test_cancelled_context_fails_run() {
    let mut db = Db::default();
    let calls: Calls = Arc::default();
    let mut ctx = Context::new();
    ctx.insert("calls", calls.clone());
    ctx.cancel();

    let mut parser = Parser::new();
    parser.add_root("db", &mut db);
    let err = parser.run(["db", "migrate"], &mut ctx).unwrap_err();

    assert_eq!(err.to_string(), "run hook failed: context cancelled");
}

#[test]
fn test_root_only_invocation() {
    let mut db = Db::default();
    let (result, calls, _) = run(&mut db, OnErrorStrategy::Break, &["db"]);

    result.unwrap();
    assert_eq!(calls, vec!["db:persistent_pre_run", "db:persistent_post_run"]);
    assert!(db.migrate.is_none());
}
