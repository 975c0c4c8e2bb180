use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "tales")]
#[command(about = "Read and write stories in your hosted journal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Optional path to the JSON config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Store connection overrides; each one wins over env and config file
#[derive(Debug, Clone, Default, Args)]
pub struct ConnectionArgs {
    /// Base URL of the hosted project (https://...)
    #[arg(long, global = true, value_name = "URL")]
    pub supabase_url: Option<String>,

    /// Public anon key of the project
    #[arg(long, global = true, value_name = "KEY")]
    pub anon_key: Option<String>,

    /// Table holding the notes
    #[arg(long, global = true, value_name = "NAME")]
    pub table: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List stories, newest first
    List {
        /// Only show stories matching this text
        #[arg(short, long)]
        search: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one story in full
    Show {
        /// Story ID
        id: String,
    },
    /// Write a new story
    #[command(alias = "new")]
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: String,
        #[arg(long)]
        author: String,
    },
    /// Change fields of an existing story
    Edit {
        /// Story ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        body: Option<String>,
        #[arg(long)]
        author: Option<String>,
    },
    /// Delete a story
    Delete {
        /// Story ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Write the notes display as an HTML fragment
    Render {
        /// Only render stories matching this text
        #[arg(short, long)]
        search: Option<String>,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Browse interactively and follow live changes
    Watch {
        /// Do not subscribe to the realtime change channel
        #[arg(long)]
        no_realtime: bool,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}
