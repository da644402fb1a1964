use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI entry point for confix.
#[derive(Parser, Debug)]
#[command(
    name = "confix",
    about = "Track configuration files in a repository and symlink them into place",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Override the confix root directory (default: $XDG_CONFIG_HOME/confix)
    #[arg(long, visible_alias = "rootDir", global = true, value_name = "DIR")]
    pub root_dir: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Set the repository directory
    #[command(visible_alias = "setRepo")]
    SetRepo {
        /// Existing directory to use as the repository
        path: PathBuf,
    },
    /// Set the merge tool
    #[command(visible_alias = "setMergeTool")]
    SetMergeTool {
        /// Path to the merge tool, or a program name on PATH
        path: PathBuf,
    },
    /// Copy a file into the repository and link it
    Add(FileOpts),
    /// Link a file to its repository copy
    Link(FileOpts),
    /// Replace a link with a plain copy of the repository file
    Unlink {
        /// Linked file
        file: PathBuf,
    },
    /// Delete a file's repository copy
    Rm {
        /// Tracked file
        file: PathBuf,
    },
    /// Run the merge tool on a file and its repository copy
    Merge {
        /// Tracked file
        file: PathBuf,
    },
    /// List tracked files (`+` marks linked ones)
    List {
        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the configured locations
    Info,
    /// Print a shell completion script
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
    /// Print version information
    Version,
}

/// Options for `add` and `link`.
#[derive(Parser, Debug, Clone)]
pub struct FileOpts {
    /// Target file
    pub file: PathBuf,

    /// Overwrite what is in the way (a backup is made first)
    #[arg(short, long)]
    pub force: bool,
}

impl Command {
    /// Name used for the command's log file.
    #[must_use]
    pub const fn log_name(&self) -> &'static str {
        match self {
            Self::SetRepo { .. } => "set-repo",
            Self::SetMergeTool { .. } => "set-merge-tool",
            Self::Add(_) => "add",
            Self::Link(_) => "link",
            Self::Unlink { .. } => "unlink",
            Self::Rm { .. } => "rm",
            Self::Merge { .. } => "merge",
            Self::List { .. } => "list",
            Self::Info => "info",
            Self::Completions { .. } => "completions",
            Self::Version => "version",
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_add_with_force() {
        let cli = Cli::parse_from(["confix", "add", "--force", "/etc/hosts"]);
        assert!(
            matches!(&cli.command, Command::Add(_)),
            "Expected Add command"
        );
        if let Command::Add(opts) = cli.command {
            assert!(opts.force);
            assert_eq!(opts.file, PathBuf::from("/etc/hosts"));
        }
    }

    #[test]
    fn parse_link_force_short() {
        let cli = Cli::parse_from(["confix", "link", "-f", ".vimrc"]);
        assert!(matches!(cli.command, Command::Link(FileOpts { force: true, .. })));
    }

    #[test]
    fn parse_add_without_force() {
        let cli = Cli::parse_from(["confix", "add", ".vimrc"]);
        assert!(matches!(cli.command, Command::Add(FileOpts { force: false, .. })));
    }

    #[test]
    fn parse_set_repo_kebab_and_camel() {
        for name in ["set-repo", "setRepo"] {
            let cli = Cli::parse_from(["confix", name, "/srv/dots"]);
            assert!(
                matches!(&cli.command, Command::SetRepo { path } if path == &PathBuf::from("/srv/dots")),
                "{name} should parse as SetRepo"
            );
        }
    }

    #[test]
    fn parse_set_merge_tool_alias() {
        let cli = Cli::parse_from(["confix", "setMergeTool", "meld"]);
        assert!(matches!(cli.command, Command::SetMergeTool { .. }));
    }

    #[test]
    fn parse_root_dir_override() {
        let cli = Cli::parse_from(["confix", "--root-dir", "/tmp/confix", "list"]);
        assert_eq!(cli.global.root_dir, Some(PathBuf::from("/tmp/confix")));
    }

    #[test]
    fn parse_root_dir_camel_alias_after_subcommand() {
        let cli = Cli::parse_from(["confix", "info", "--rootDir", "/tmp/confix"]);
        assert_eq!(cli.global.root_dir, Some(PathBuf::from("/tmp/confix")));
    }

    #[test]
    fn parse_list_json() {
        let cli = Cli::parse_from(["confix", "list", "--json"]);
        assert!(matches!(cli.command, Command::List { json: true }));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::parse_from(["confix", "-v", "list"]);
        assert!(cli.verbose);
    }

    #[test]
    fn parse_completions() {
        let cli = Cli::parse_from(["confix", "completions", "bash"]);
        assert!(matches!(
            cli.command,
            Command::Completions {
                shell: clap_complete::Shell::Bash
            }
        ));
    }

    #[test]
    fn parse_version() {
        let cli = Cli::parse_from(["confix", "version"]);
        assert!(matches!(cli.command, Command::Version));
    }

    #[test]
    fn add_requires_file() {
        assert!(Cli::try_parse_from(["confix", "add"]).is_err());
    }

    #[test]
    fn log_name_matches_subcommand() {
        let cli = Cli::parse_from(["confix", "setMergeTool", "meld"]);
        assert_eq!(cli.command.log_name(), "set-merge-tool");
    }
}
