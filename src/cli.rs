use crate::models::TodoData;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "todo_store", version, about = "In-memory todo list with tags")]
pub struct Cli {
    /// Path to the config file
    #[arg(long, global = true, env = "TODO_STORE_CONFIG")]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read todo commands from stdin against a fresh in-memory list
    ///
    /// Each line is split on whitespace: runs of spaces inside content
    /// collapse to one and empty tags cannot be entered.
    Session,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the value of a key
    Get { key: String },
    /// Set a key
    Set { key: String, value: String },
    /// Remove a key, restoring its default
    Unset { key: String },
    /// List every key with its effective value
    List,
}

/// One line of session input.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, name = "todo", disable_version_flag = true)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    /// Add a todo
    Add(TodoArgs),
    /// List all todos
    List,
    /// Show a single todo
    Show { id: u64 },
    /// Replace a todo; omitted fields reset to their defaults
    Update {
        id: u64,
        #[command(flatten)]
        todo: TodoArgs,
    },
    /// Rename one tag on a todo
    RenameTag { id: u64, before: String, after: String },
    /// Remove tags from a todo
    RemoveTags {
        id: u64,
        #[arg(required = true)]
        tags: Vec<String>,
    },
    /// Remove every tag from a todo
    ClearTags { id: u64 },
    /// Delete a todo
    Delete { id: u64 },
    /// Delete every todo
    DeleteAll,
    /// End the session
    #[command(alias = "exit")]
    Quit,
}

#[derive(Args, Debug, PartialEq, Eq)]
pub struct TodoArgs {
    /// Mark the todo as complete
    #[arg(long)]
    pub complete: bool,

    #[arg(short, long)]
    pub category: Option<String>,

    /// Tag to attach, may be repeated
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,

    /// Task description; words are joined with single spaces
    #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
    pub content: Vec<String>,
}

impl From<TodoArgs> for TodoData {
    fn from(args: TodoArgs) -> Self {
        TodoData {
            complete: args.complete.then_some(true),
            content: args.content.join(" "),
            category: args.category,
            tags: (!args.tags.is_empty()).then_some(args.tags),
        }
    }
}
