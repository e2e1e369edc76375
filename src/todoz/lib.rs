//! # todoz Architecture
//!
//! todoz is a personal todo manager whose entries are plain files: one YAML
//! file per entry in a directory. It is a **library with several clients**:
//! the CLI, a REST API and a background notifier all go through the same
//! facade.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Clients                                                    │
//! │  - CLI (cli/, wired by main.rs): parsing, terminal output   │
//! │  - server/: notifier loop, REST API, reload on SIGHUP       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands (or remote.rs over REST)       │
//! │  - Returns structured Result<CmdResult> values              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Business logic: list, find, add, remove, notify, ...     │
//! │  - Short ids (short_id.rs) and token lookup (finder.rs)     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - EntryStore trait                                         │
//! │  - FileStore, InMemoryStore (testing), GuardedStore (lock)  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Short ids
//!
//! Entries are stored under UUIDs. Every listing also gives each entry the
//! shortest prefix of its id that no other entry shares, and users address
//! entries with those, or with any part of the id or title. See
//! [`short_id`] and [`finder`].
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes regular Rust arguments, returns regular
//! Rust types, and **never** writes to stdout/stderr or exits the process.
//! Failures are typed [`error::TodoError`] values; each client decides how to
//! present them (exit code, HTTP status, log line).
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each operation
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: The `Entry` record and its file format
//! - [`short_id`]: Shortest unique id prefixes
//! - [`finder`]: Token to entry resolution
//! - [`due`]: Due times typed on the command line
//! - [`config`]: Configuration management
//! - [`server`]: Long-running mode (notifier, REST, reload)
//! - [`remote`]: The same operations against a remote REST server
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod due;
pub mod error;
pub mod finder;
pub mod model;
pub mod remote;
pub mod server;
pub mod short_id;
pub mod store;
