//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Skills taxonomy explorer: normalize, drill down and label skill trees
#[derive(Parser, Debug)]
#[command(name = "skillsweb")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug level, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Config file layered over the global one
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the normalized taxonomy as an orbit tree
    Tree {
        /// Taxonomy JSON document
        #[arg(value_hint = ValueHint::FilePath)]
        file: String,
        /// Show full names instead of wrapped labels
        #[arg(long)]
        raw: bool,
    },

    /// List the sunburst segments visible under a focus
    Sunburst {
        /// Taxonomy JSON document
        #[arg(value_hint = ValueHint::FilePath)]
        file: String,
        /// Focused node, names below the hub separated by '/'
        #[arg(short, long)]
        focus: Option<String>,
        /// Spin steps, negative turns left
        #[arg(short, long, default_value_t = 0, allow_hyphen_values = true)]
        rotate: i32,
    },

    /// Show focus window, breadcrumb and zoom-out target of a node
    Focus {
        /// Taxonomy JSON document
        #[arg(value_hint = ValueHint::FilePath)]
        file: String,
        /// Node path, names below the hub separated by '/'
        path: String,
    },

    /// Wrap a label to a character budget
    Wrap {
        text: String,
        /// Characters per line (default from config)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show a flip card record
    Card {
        /// Card JSON document
        #[arg(value_hint = ValueHint::FilePath)]
        file: String,
        /// Tick the PDF export option
        #[arg(long)]
        pdf: bool,
        /// Tick the graphic export option
        #[arg(long)]
        graphic: bool,
        /// Show the back side
        #[arg(long)]
        flip: bool,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,

    /// Create config template
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_repeated_debug_flag_when_parsing_then_counted() {
        let cli = Cli::parse_from(["skillsweb", "-ddd", "wrap", "Bridge Asset Management"]);

        assert_eq!(cli.debug, 3);
        assert!(matches!(cli.command, Some(Commands::Wrap { limit: None, .. })));
    }

    #[test]
    fn given_negative_rotation_when_parsing_then_accepted() {
        let cli = Cli::parse_from(["skillsweb", "sunburst", "skills.json", "--rotate", "-2"]);

        match cli.command {
            Some(Commands::Sunburst { rotate, focus, .. }) => {
                assert_eq!(rotate, -2);
                assert!(focus.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
