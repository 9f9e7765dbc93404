//! Command-line interface for tdo
//!
//! This module defines the CLI structure using clap derive macros.
//! Command implementations live in the `todo` submodule.

use clap::{Parser, Subcommand};

use crate::error::Result;

mod todo;

/// tdo - task lists with deadlines
///
/// A persistent todo store: add, edit, complete, delete, filter, and reorder
/// tasks; tasks with a passed deadline become overdue automatically.
#[derive(Parser, Debug)]
#[command(name = "tdo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory holding the state snapshot (defaults to the platform
    /// data dir)
    #[arg(long, global = true, env = "TDO_DATA_DIR")]
    pub data_dir: Option<std::path::PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a task
    Add {
        /// Task title
        #[arg(long)]
        title: String,

        /// Task description
        #[arg(long = "desc")]
        description: String,

        /// Deadline date (YYYY-MM-DD)
        #[arg(long)]
        deadline: String,

        /// Explicit task id (a UUID is generated when omitted)
        #[arg(long)]
        id: Option<String>,
    },

    /// List tasks under the current (or given) filter
    List {
        /// Filter to apply and remember: all, completed, incomplete, overdue
        #[arg(long)]
        filter: Option<String>,
    },

    /// Show one task in detail
    Show {
        /// Task id
        id: String,
    },

    /// Toggle a task between complete and incomplete
    Done {
        /// Task id
        id: String,
    },

    /// Edit fields of a task
    Edit {
        /// Task id
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(long = "desc")]
        description: Option<String>,

        /// New deadline date (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<String>,
    },

    /// Delete a task
    Rm {
        /// Task id
        id: String,
    },

    /// Move a task to a new position in the list
    Move {
        /// Task id
        id: String,

        /// Target position, 1-based (clamped to the list length)
        #[arg(long)]
        to: usize,
    },

    /// Set the remembered filter
    Filter {
        /// Filter value: all, completed, incomplete, overdue
        value: String,
    },

    /// Replace the task list from the remote endpoint
    Fetch {
        /// Endpoint URL (falls back to TDO_REMOTE_URL, then config.toml)
        #[arg(long)]
        url: Option<String>,
    },

    /// Open the interactive viewer
    View,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let context = todo::Context::resolve(self.data_dir, self.json, self.quiet)?;

        match self.command {
            Commands::Add {
                title,
                description,
                deadline,
                id,
            } => todo::run_add(
                context,
                todo::AddOptions {
                    title,
                    description,
                    deadline,
                    id,
                },
            ),
            Commands::List { filter } => todo::run_list(context, filter),
            Commands::Show { id } => todo::run_show(context, &id),
            Commands::Done { id } => todo::run_done(context, &id),
            Commands::Edit {
                id,
                title,
                description,
                deadline,
            } => todo::run_edit(
                context,
                todo::EditOptions {
                    id,
                    title,
                    description,
                    deadline,
                },
            ),
            Commands::Rm { id } => todo::run_rm(context, &id),
            Commands::Move { id, to } => todo::run_move(context, &id, to),
            Commands::Filter { value } => todo::run_filter(context, &value),
            Commands::Fetch { url } => todo::run_fetch(context, url.as_deref()),
            Commands::View => todo::run_view(context),
        }
    }
}
