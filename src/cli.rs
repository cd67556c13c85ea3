use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::search::{DEFAULT_LIMIT, SearchFilters, SearchOptions};

#[derive(Debug, Parser)]
#[command(
    name = "docfind",
    about = "A full-text search CLI for markdown documentation sites"
)]
pub struct Cli {
    /// Directory holding the markdown documents
    #[arg(long, global = true)]
    pub content_dir: Option<PathBuf>,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search the documents
    Search(SearchArgs),
    /// List the documents visible to search
    List(ListArgs),
    /// Start MCP server for AI agent integration
    Mcp,
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

// -- Search --

#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// The search query
    pub query: String,

    /// Number of results to return (0 returns all)
    #[arg(short = 'n', long, default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,

    /// Number of ranked results to skip
    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    /// Only search documents of this type (page, heading, text)
    #[arg(short = 't', long = "type")]
    pub kind: Option<String>,

    /// Output results as JSON
    #[arg(long, conflicts_with = "files")]
    pub json: bool,

    /// Output only file paths (one per line)
    #[arg(long)]
    pub files: bool,
}

impl SearchArgs {
    pub fn options(&self) -> SearchOptions {
        SearchOptions {
            limit: self.limit,
            offset: self.offset,
            filters: SearchFilters {
                kind: self.kind.clone(),
            },
        }
    }
}

// -- List --

#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Glob pattern applied to document ids
    pub pattern: Option<String>,

    /// Output as JSON array
    #[arg(long)]
    pub json: bool,
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "docfind",
            &mut std::io::stdout(),
        );
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn parse_search_defaults() {
        let cli = Cli::parse_from(["docfind", "search", "hello world"]);
        match cli.command {
            Command::Search(args) => {
                assert_eq!(args.query, "hello world");
                assert_eq!(args.limit, 10);
                assert_eq!(args.offset, 0);
                assert!(args.kind.is_none());
                assert!(!args.json);
                assert!(!args.files);
                assert_eq!(args.options(), SearchOptions::default());
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn parse_search_window_and_filter() {
        let cli = Cli::parse_from([
            "docfind",
            "--content-dir",
            "/srv/docs",
            "search",
            "install",
            "-n",
            "5",
            "--offset",
            "20",
            "--type",
            "page",
        ]);
        assert_eq!(cli.content_dir, Some(PathBuf::from("/srv/docs")));
        match cli.command {
            Command::Search(args) => {
                let options = args.options();
                assert_eq!(options.limit, 5);
                assert_eq!(options.offset, 20);
                assert_eq!(options.filters.kind.as_deref(), Some("page"));
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn json_and_files_conflict() {
        let parsed =
            Cli::try_parse_from(["docfind", "search", "q", "--json", "--files"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn parse_list_pattern() {
        let cli = Cli::parse_from(["docfind", "list", "guides/*", "--json"]);
        match cli.command {
            Command::List(args) => {
                assert_eq!(args.pattern.as_deref(), Some("guides/*"));
                assert!(args.json);
            }
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
