use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "treemv")]
#[command(about = "Rename and move entries of a repository tree", long_about = None)]
pub struct Cli {
    /// Log every store call
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the repository as an ASCII tree
    Tree(TreeArgs),
    /// Validate a new name without touching the repository
    Check(CheckArgs),
    /// Rename a file or directory in place
    Mv(RenameArgs),
    /// Move a file or directory into another directory
    Move(MoveArgs),
}

#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Repository root (defaults to current directory)
    pub root: Option<PathBuf>,

    /// Pipe-separated names or globs to hide, e.g. "node_modules|*.log"
    #[arg(short = 'I', long, env = "TREEMV_IGNORE")]
    pub ignore: Option<String>,

    /// List directories before files
    #[arg(long)]
    pub dirs_first: bool,

    /// Hide entries whose name starts with '.'
    #[arg(long)]
    pub hide_hidden: bool,

    /// Print the flattened tree as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Repository root
    pub root: PathBuf,
    /// Path of the entry to rename, relative to the root
    pub path: String,
    /// Proposed new name
    pub new_name: String,
}

#[derive(Args, Debug)]
pub struct RenameArgs {
    /// Repository root
    pub root: PathBuf,
    /// Path of the entry to rename, relative to the root
    pub path: String,
    /// New last path segment
    pub new_name: String,

    /// Print the planned file moves without applying them
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Repository root
    pub root: PathBuf,
    /// Path of the entry to move, relative to the root
    pub path: String,
    /// Destination directory, relative to the root ("." for the root itself)
    pub target_dir: String,

    /// Print the planned file moves without applying them
    #[arg(long)]
    pub dry_run: bool,
}
