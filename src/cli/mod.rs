//! Command-line interface for `trk`.
//!
//! This module provides the CLI parsing and command routing using clap.

pub mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::config::{self, CliOverrides};
use crate::logging;

/// `trk` - project tracker with a persisted board.
#[derive(Parser, Debug)]
#[command(name = "trk")]
#[command(
    author,
    version,
    about = "Project tracker: issues, boards, links and notifications",
    long_about = None,
    after_help = "State lives in one JSON file under the data directory (default .tracker/)."
)]
pub struct Cli {
    /// Output format: text (default) or json
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Data directory (overrides TRACKER_DATA_DIR and config files)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Acting user id (default reporter and comment author)
    #[arg(long, global = true, value_name = "USER")]
    pub actor: Option<String>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a workspace with the demo data
    Init {
        /// Overwrite an existing saved state
        #[arg(long)]
        force: bool,
    },

    /// Create a new issue
    Create(CreateArgs),

    /// Update fields of an issue
    Update(UpdateArgs),

    /// Move an issue to a board column
    #[command(alias = "mv")]
    Move(MoveArgs),

    /// List issues
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show issue details
    Show {
        /// Issue ids or keys
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Show a project board
    Board {
        /// Project id or key
        project: String,

        /// Maximum line width (default: 100)
        #[arg(long, default_value_t = 100)]
        width: usize,
    },

    /// Recently created issues
    Recent,

    /// List projects
    Projects {
        /// Only starred projects
        #[arg(long)]
        starred: bool,
    },

    /// Star (or unstar) a project
    Star {
        /// Project id or key
        project: String,

        /// Remove the star instead
        #[arg(long)]
        off: bool,
    },

    /// Manage issue links
    Link(LinkCommand),

    /// Add a comment to an issue
    Comment {
        /// Issue id or key
        id: String,

        /// Comment text
        body: String,

        /// Author user id (default: configured actor)
        #[arg(long)]
        author: Option<String>,
    },

    /// Manage notifications
    Notify(NotifyCommand),

    /// Stats summary (alias: status)
    #[command(alias = "status")]
    Stats,

    /// Check the saved state for consistency problems
    Doctor,

    /// Inspect configuration
    Config(ConfigCommand),

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },

    /// Show version information
    Version {
        /// Print only the version number
        #[arg(long)]
        short: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct CreateArgs {
    /// Issue title
    pub title: String,

    /// Project id or key
    #[arg(short = 'P', long)]
    pub project: String,

    /// Issue type (task, bug, story, epic)
    #[arg(short = 't', long = "type")]
    pub type_: Option<String>,

    /// Priority (highest..lowest, or 0-4 / P0-P4)
    #[arg(short, long)]
    pub priority: Option<String>,

    /// Initial status (default: first column of the project)
    #[arg(short, long)]
    pub status: Option<String>,

    /// Description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Assignee user id
    #[arg(short, long)]
    pub assignee: Option<String>,

    /// Reporter user id (default: configured actor)
    #[arg(long)]
    pub reporter: Option<String>,

    /// Tag (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Story points
    #[arg(short, long)]
    pub estimate: Option<u32>,
}

#[derive(Args, Debug, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct UpdateArgs {
    /// Issue id or key
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(short, long)]
    pub description: Option<String>,

    /// Clear the description
    #[arg(long, conflicts_with = "description")]
    pub clear_description: bool,

    /// New status (moves the issue to the end of that column)
    #[arg(short, long)]
    pub status: Option<String>,

    #[arg(short, long)]
    pub priority: Option<String>,

    #[arg(short = 't', long = "type")]
    pub type_: Option<String>,

    #[arg(short, long)]
    pub assignee: Option<String>,

    /// Remove the assignee
    #[arg(long, conflicts_with = "assignee")]
    pub unassign: bool,

    /// Replace tags (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Remove all tags
    #[arg(long, conflicts_with = "tags")]
    pub clear_tags: bool,

    #[arg(short, long)]
    pub estimate: Option<u32>,

    /// Remove the estimate
    #[arg(long, conflicts_with = "estimate")]
    pub clear_estimate: bool,
}

#[derive(Args, Debug, Default)]
pub struct MoveArgs {
    /// Issue id or key
    pub id: String,

    /// Target status column
    pub status: String,

    /// Position in the column (0 = top; default: bottom)
    #[arg(short, long)]
    pub index: Option<usize>,
}

#[derive(Args, Debug, Default, Clone)]
pub struct ListArgs {
    /// Project id or key
    #[arg(short = 'P', long)]
    pub project: Option<String>,

    /// Filter by status (repeatable)
    #[arg(short, long)]
    pub status: Vec<String>,

    /// Filter by priority (repeatable; names, 0-4 or P0-P4)
    #[arg(short, long)]
    pub priority: Vec<String>,

    /// Filter by type (repeatable)
    #[arg(short = 't', long = "type")]
    pub type_: Vec<String>,

    /// Filter by assignee user id
    #[arg(short, long)]
    pub assignee: Option<String>,

    /// Only unassigned issues
    #[arg(long, conflicts_with = "assignee")]
    pub unassigned: bool,

    /// Require tag (repeatable, all must match)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Search key, title and description
    #[arg(long)]
    pub search: Option<String>,

    /// Maximum number of results
    #[arg(long)]
    pub limit: Option<usize>,

    /// Sort field (priority, created, updated, key, title)
    #[arg(long)]
    pub sort: Option<String>,

    /// Reverse sort order
    #[arg(short, long)]
    pub reverse: bool,
}

#[derive(Args, Debug)]
pub struct LinkCommand {
    #[command(subcommand)]
    pub command: LinkSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum LinkSubcommand {
    /// Link two issues (the reciprocal is added automatically)
    Add {
        /// Source issue id or key
        source: String,
        /// Target issue id or key
        target: String,
        /// Relation: blocks, is-blocked-by, relates-to, duplicates, is-duplicated-by
        #[arg(short = 't', long = "type", default_value = "relates to")]
        link_type: String,
        #[arg(long)]
        note: Option<String>,
    },

    /// Remove a link and its reciprocal
    Remove {
        /// Source issue id or key
        source: String,
        /// Link id on the source issue
        link_id: String,
    },

    /// List links of an issue
    List {
        /// Issue id or key
        id: String,
    },
}

#[derive(Args, Debug)]
pub struct NotifyCommand {
    #[command(subcommand)]
    pub command: NotifySubcommand,
}

#[derive(Subcommand, Debug)]
pub enum NotifySubcommand {
    /// Post a notification
    Add {
        title: String,
        #[arg(long)]
        body: Option<String>,
    },

    /// List notifications (unread only unless --all)
    List {
        #[arg(long)]
        all: bool,
    },

    /// Mark a notification read (or unread)
    Read {
        id: String,
        #[arg(long)]
        unread: bool,
    },
}

#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Print the effective configuration
    Show,

    /// Print the config file locations
    Path,
}

/// Run the CLI.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded or the command fails.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        data_dir: cli.data_dir.clone(),
        actor: cli.actor.clone(),
    };
    let config = config::load(&overrides);
    let log_format = config.as_ref().ok().map(|c| c.log_format);
    logging::init_logging(cli.verbose, cli.quiet, log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;
    let config = config?;

    let json = cli.json;
    let Some(command) = cli.command else {
        println!("trk - project tracker. Use --help for usage.");
        return Ok(());
    };
    tracing::debug!(command = command.name(), "dispatching");

    match command {
        Commands::Init { force } => commands::init::execute(&config, force, json)?,
        Commands::Create(args) => commands::create::execute(args, &config, json)?,
        Commands::Update(args) => commands::update::execute(args, &config, json)?,
        Commands::Move(args) => commands::move_issue::execute(&args, &config, json)?,
        Commands::List(args) => commands::list::execute(&args, &config, json)?,
        Commands::Show { ids } => commands::show::execute(&ids, &config, json)?,
        Commands::Board { project, width } => {
            commands::board::execute(&project, width, &config, json)?;
        }
        Commands::Recent => commands::projects::recent(&config, json)?,
        Commands::Projects { starred } => commands::projects::list(starred, &config, json)?,
        Commands::Star { project, off } => commands::projects::star(&project, !off, &config, json)?,
        Commands::Link(link) => commands::link::execute(link.command, &config, json)?,
        Commands::Comment { id, body, author } => {
            commands::comment::execute(&id, &body, author, &config, json)?;
        }
        Commands::Notify(notify) => commands::notify::execute(notify.command, &config, json)?,
        Commands::Stats => commands::stats::execute(&config, json)?,
        Commands::Doctor => commands::doctor::execute(&config, json)?,
        Commands::Config(cmd) => commands::config::execute(&cmd.command, &config, json)?,
        Commands::Completions { shell } => commands::completions::execute(shell),
        Commands::Version { short } => commands::version::execute(short, json)?,
    }

    Ok(())
}

impl Commands {
    const fn name(&self) -> &'static str {
        match self {
            Self::Init { .. } => "init",
            Self::Create(_) => "create",
            Self::Update(_) => "update",
            Self::Move(_) => "move",
            Self::List(_) => "list",
            Self::Show { .. } => "show",
            Self::Board { .. } => "board",
            Self::Recent => "recent",
            Self::Projects { .. } => "projects",
            Self::Star { .. } => "star",
            Self::Link(link) => match link.command {
                LinkSubcommand::Add { .. } => "link add",
                LinkSubcommand::Remove { .. } => "link remove",
                LinkSubcommand::List { .. } => "link list",
            },
            Self::Comment { .. } => "comment",
            Self::Notify(notify) => match notify.command {
                NotifySubcommand::Add { .. } => "notify add",
                NotifySubcommand::List { .. } => "notify list",
                NotifySubcommand::Read { .. } => "notify read",
            },
            Self::Stats => "stats",
            Self::Doctor => "doctor",
            Self::Config(config) => match config.command {
                ConfigSubcommand::Show => "config show",
                ConfigSubcommand::Path => "config path",
            },
            Self::Completions { .. } => "completions",
            Self::Version { .. } => "version",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_list_with_priority_prefix() {
        let cli = Cli::try_parse_from(["trk", "list", "-p", "P0", "--sort", "created", "-r"]).unwrap();
        let Some(Commands::List(args)) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(args.priority, ["P0"]);
        assert_eq!(args.sort.as_deref(), Some("created"));
        assert!(args.reverse);
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["trk", "recent", "--json", "--data-dir", "/tmp/x", "-vv"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
    }

    #[test]
    fn link_type_defaults_to_relates_to() {
        let cli = Cli::try_parse_from(["trk", "link", "add", "WEB-1", "WEB-3"]).unwrap();
        let Some(Commands::Link(LinkCommand {
            command: LinkSubcommand::Add { link_type, .. },
        })) = cli.command
        else {
            panic!("expected link add");
        };
        assert_eq!(link_type, "relates to");
    }
}
