//! # CLI Layer
//!
//! The CLI layer is the **only** place that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: Convert shell arguments into typed commands via clap
//! 2. **Context Setup**: Resolve the todo home, load configuration, open the store
//! 3. **Dispatch**: Route commands to handlers that call the API
//! 4. **Output Formatting**: Print listings, entries and messages
//!
//! With `remote_base_url` configured, every command except `serve` goes to
//! that REST server instead of the local entries directory.
//!
//! Commands that take a token resolve it to one entry first. A token that
//! matches nothing prints `No entry found matching <token>` and is not an
//! error.

use super::logging;
use super::print::{print_entries, print_full_entry, print_messages};
use super::setup::{Cli, Commands};
use anyhow::{anyhow, Context};
use chrono::{Local, Utc};
use clap::Parser;
use std::path::PathBuf;
use todoz::api::{TodoApi, TodoService};
use todoz::config::{self, TodoConfig};
use todoz::due::{parse_duration, parse_timer};
use todoz::remote::RemoteApi;
use todoz::server::{self, AppHandle};
use todoz::short_id::DisplayEntry;
use tokio_util::sync::CancellationToken;
use tracing::debug;

struct AppContext {
    api: Box<dyn TodoService>,
    config: TodoConfig,
    home: PathBuf,
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.debug);

    let ctx = init_context()?;

    match cli.command {
        Some(Commands::Add { words, details }) => handle_add(&ctx, words, details),
        Some(Commands::List { archived }) => handle_list(&ctx, archived),
        Some(Commands::Due) => handle_due(&ctx),
        Some(Commands::Show { token }) => handle_show(&ctx, token),
        Some(Commands::Del { token }) => handle_del(&ctx, &token),
        Some(Commands::Snooze { token, duration }) => handle_snooze(&ctx, &token, &duration),
        Some(Commands::Resolve { token }) => handle_resolve(&ctx, &token),
        Some(Commands::Edit {
            token,
            title,
            details,
        }) => handle_edit(&ctx, &token, title, details),
        Some(Commands::Serve { rest }) => handle_serve(ctx, rest),
        None => handle_list(&ctx, false),
    }
}

fn init_context() -> anyhow::Result<AppContext> {
    let home = config::home_dir()?;
    let config = TodoConfig::load_or_default(&home);
    let api: Box<dyn TodoService> = match config.remote_url() {
        Some(url) => {
            debug!(%url, "using remote todo server");
            let remote = RemoteApi::new(url, config.remote_timeout())
                .with_context(|| format!("Could not set up client for {}", url))?;
            Box::new(remote)
        }
        None => {
            debug!(home = %home.display(), "using todo home");
            Box::new(TodoApi::new(config.open_store(&home)))
        }
    };
    Ok(AppContext { api, config, home })
}

/// Resolves `token`, printing a notice instead of failing when nothing matches.
fn find_or_report(ctx: &AppContext, token: &str) -> anyhow::Result<Option<DisplayEntry>> {
    match ctx.api.find_by_token(token) {
        Ok(result) => Ok(result.affected_entries.into_iter().next()),
        Err(e) if e.is_not_found() => {
            println!("No entry found matching {}", token);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn handle_add(ctx: &AppContext, words: Vec<String>, details: Option<String>) -> anyhow::Result<()> {
    let (title, timer) = parse_timer(&words);
    let due = timer.map(|timer| timer.resolve(Utc::now(), &Local));
    let result = ctx
        .api
        .add(&title, details.unwrap_or_default(), due)
        .with_context(|| format!("Could not create {}", title))?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(ctx: &AppContext, archived: bool) -> anyhow::Result<()> {
    let result = if archived {
        ctx.api.list_archived()?
    } else {
        ctx.api.list_all()?
    };
    print_entries(&result.listed_entries, &ctx.config.time_format);
    print_messages(&result.messages);
    Ok(())
}

fn handle_due(ctx: &AppContext) -> anyhow::Result<()> {
    let result = ctx.api.list_due_before(Utc::now())?;
    print_entries(&result.listed_entries, &ctx.config.time_format);
    Ok(())
}

fn handle_show(ctx: &AppContext, token: Option<String>) -> anyhow::Result<()> {
    let found = match token {
        Some(token) => find_or_report(ctx, &token)?,
        None => {
            let first = ctx.api.first()?.affected_entries.into_iter().next();
            if first.is_none() {
                println!("No entries found.");
            }
            first
        }
    };
    if let Some(entry) = found {
        print_full_entry(&entry, &ctx.config.time_format);
    }
    Ok(())
}

fn handle_del(ctx: &AppContext, token: &str) -> anyhow::Result<()> {
    let Some(target) = find_or_report(ctx, token)? else {
        return Ok(());
    };
    let result = ctx.api.remove(&target.entry.id).context("Cannot delete")?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_snooze(ctx: &AppContext, token: &str, duration: &str) -> anyhow::Result<()> {
    let snooze_for =
        parse_duration(duration).map_err(|e| anyhow!("invalid parameter for snooze: {}", e))?;
    let Some(target) = find_or_report(ctx, token)? else {
        return Ok(());
    };
    let result = ctx
        .api
        .reschedule(&target.entry.id, Utc::now() + snooze_for)
        .context("Cannot snooze")?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_resolve(ctx: &AppContext, token: &str) -> anyhow::Result<()> {
    let Some(target) = find_or_report(ctx, token)? else {
        return Ok(());
    };
    let result = ctx.api.resolve(&target.entry.id).context("Cannot resolve")?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_edit(
    ctx: &AppContext,
    token: &str,
    title: Option<String>,
    details: Option<String>,
) -> anyhow::Result<()> {
    let Some(target) = find_or_report(ctx, token)? else {
        return Ok(());
    };
    let result = ctx
        .api
        .edit(&target.entry.id, title.as_deref(), details)
        .context("Cannot edit")?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_serve(ctx: AppContext, rest: bool) -> anyhow::Result<()> {
    let handle = AppHandle::new(ctx.home, ctx.config);
    let runtime = tokio::runtime::Runtime::new().context("Could not start async runtime")?;
    runtime.block_on(server::run(handle, rest, CancellationToken::new()))
}
