use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "todoz", bin_name = "todoz", version)]
#[command(about = "File-backed todo manager with reminders", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add an entry; trailing words may set the due time
    ///
    /// Examples: `add call the bank in 2h`, `add pay rent tomorrow`,
    /// `add dentist at 2024-03-01 09:30`.
    #[command(alias = "a")]
    Add {
        /// Title words, optionally followed by a due time
        #[arg(required = true, num_args = 1..)]
        words: Vec<String>,

        /// Free text details
        #[arg(short, long)]
        details: Option<String>,
    },

    /// List entries
    #[command(alias = "ls")]
    List {
        /// Show resolved entries from the archive
        #[arg(long)]
        archived: bool,
    },

    /// List entries that are due now
    Due,

    /// Show one entry (the first one when no token is given)
    Show {
        /// Short id, part of the id, or part of the title
        token: Option<String>,
    },

    /// Delete an entry
    #[command(alias = "rm")]
    Del {
        /// Short id, part of the id, or part of the title
        token: String,
    },

    /// Push the due time out (default 1h)
    Snooze {
        /// Short id, part of the id, or part of the title
        token: String,

        /// Duration such as 30m, 2h or 1h30m
        #[arg(default_value = "1h")]
        duration: String,
    },

    /// Mark an entry resolved and archive it
    #[command(alias = "done")]
    Resolve {
        /// Short id, part of the id, or part of the title
        token: String,
    },

    /// Change title and/or details of an entry
    Edit {
        /// Short id, part of the id, or part of the title
        token: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New details
        #[arg(short, long)]
        details: Option<String>,
    },

    /// Run the notifier (and optionally the REST API) until interrupted
    Serve {
        /// Also serve the REST API
        #[arg(long)]
        rest: bool,
    },
}
