//! # CLI Behavior
//!
//! This is **one possible UI client** for todoz, next to the REST API. The
//! CLI is the only place that knows about terminal I/O, exit codes, and output
//! formatting.
//!
//! ## Addressing entries
//!
//! Every listing shows a short id in front of each entry. Commands that act on
//! one entry take a *token*, which may be that short id, any part of the full
//! id, or any part of the title:
//!
//! ```text
//! $ todoz list
//!   ab  Buy milk        2024-03-01 09:30 (in 2 hours)
//!   c   Water plants    2024-02-29 18:00 (3 hours ago)
//! $ todoz snooze plants 30m
//! ```
//!
//! Running `todoz` with no subcommand lists the active entries.
//!
//! ## Module Structure
//!
//! - `commands`: Context setup and per-command handlers that call the API
//! - `print`: Output formatting (listings, single entries, messages)
//! - `setup`: Argument parsing via clap
//! - `logging`: tracing subscriber on stderr

mod commands;
mod logging;
mod print;
pub mod setup;

pub use commands::run;
