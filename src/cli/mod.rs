pub mod commands;
pub mod report;

use crate::export::ExportFormat;
use crate::repository::FilterCriteria;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "repokeeper")]
#[command(
    about = "Bulk-manage your GitHub repositories: delete forks, toggle visibility, remove stars",
    long_about = None
)]
pub struct Cli {
    /// GitHub login the token belongs to
    #[arg(long, global = true, env = "GITHUB_USERNAME")]
    pub username: Option<String>,

    /// Personal access token (needs `repo`, and `delete_repo` for deleting forks)
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List your repositories grouped as public, private and fork
    List {
        #[command(flatten)]
        filters: FilterArgs,

        /// Also export the listed repositories to a dated file
        #[arg(long, value_enum)]
        export: Option<ExportFormat>,
    },

    /// Delete forks you own
    Forks {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Change repositories from public to private or back
    Visibility {
        /// Visibility to switch the selected repositories to
        #[arg(long, value_enum)]
        to: Visibility,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Manage starred repositories
    Stars {
        #[command(subcommand)]
        command: StarsCommand,
    },

    /// Show the current API rate limit
    Limits,
}

#[derive(Subcommand, Debug)]
pub enum StarsCommand {
    /// List starred repositories, newest star first
    List {
        #[command(flatten)]
        filters: StarFilterArgs,

        /// Show description and topics
        #[arg(long)]
        details: bool,

        /// Show the languages present in the starred list
        #[arg(long)]
        languages: bool,

        /// Also export the listed repositories to a dated file
        #[arg(long, value_enum)]
        export: Option<ExportFormat>,
    },

    /// Remove stars from repositories
    Unstar {
        #[command(flatten)]
        filters: StarFilterArgs,

        #[command(flatten)]
        target: TargetArgs,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Visibility {
    Private,
    Public,
}

/// Filters applied to an already fetched list
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only repositories written in this language (case-insensitive)
    #[arg(long)]
    pub language: Option<String>,

    /// Only repositories with at least this many stars
    #[arg(long)]
    pub min_stars: Option<u64>,

    /// Only repositories updated on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub updated_since: Option<String>,
}

impl From<&FilterArgs> for FilterCriteria {
    fn from(args: &FilterArgs) -> Self {
        FilterCriteria {
            language: args.language.clone(),
            min_stars: args.min_stars,
            updated_since: args.updated_since.clone(),
        }
    }
}

/// Starred-list filters; language and topic are applied while fetching
#[derive(Args, Debug, Clone, Default)]
pub struct StarFilterArgs {
    /// Only repositories written in this language (case-insensitive)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Only repositories tagged with this topic (one extra request per repository)
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Only repositories with at least this many stars
    #[arg(long)]
    pub min_stars: Option<u64>,

    /// Only repositories updated on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub updated_since: Option<String>,
}

/// Which repositories of the displayed list a mutating command acts on
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Numbers from the displayed list, e.g. "1 3 5-7" (prompted for when omitted)
    #[arg(long, conflicts_with = "all")]
    pub select: Option<String>,

    /// Act on every repository in the displayed list
    #[arg(long)]
    pub all: bool,

    /// Skip confirmation prompts
    #[arg(short, long)]
    pub yes: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forks_with_selection() {
        let cli = Cli::try_parse_from([
            "repokeeper",
            "--username",
            "octocat",
            "forks",
            "--select",
            "1 3 5-7",
            "--yes",
        ])
        .unwrap();

        assert_eq!(cli.username.as_deref(), Some("octocat"));
        match cli.command {
            Commands::Forks { target } => {
                assert_eq!(target.select.as_deref(), Some("1 3 5-7"));
                assert!(!target.all);
                assert!(target.yes);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_select_conflicts_with_all() {
        let result = Cli::try_parse_from([
            "repokeeper",
            "forks",
            "--select",
            "1",
            "--all",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_stars_list() {
        let cli = Cli::try_parse_from([
            "repokeeper",
            "stars",
            "list",
            "-l",
            "rust",
            "--topic",
            "cli",
            "--export",
            "markdown",
        ])
        .unwrap();

        match cli.command {
            Commands::Stars {
                command: StarsCommand::List {
                    filters, export, ..
                },
            } => {
                assert_eq!(filters.language.as_deref(), Some("rust"));
                assert_eq!(filters.topic.as_deref(), Some("cli"));
                assert_eq!(export, Some(ExportFormat::Markdown));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_visibility_requires_target() {
        assert!(Cli::try_parse_from(["repokeeper", "visibility"]).is_err());

        let cli =
            Cli::try_parse_from(["repokeeper", "visibility", "--to", "public", "--all"]).unwrap();
        match cli.command {
            Commands::Visibility { to, target } => {
                assert_eq!(to, Visibility::Public);
                assert!(target.all);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
