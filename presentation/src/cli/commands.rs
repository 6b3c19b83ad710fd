//! CLI command definitions

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tripvote_domain::{BudgetTier, Stage};

/// Output format for results
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Ranked tables with colors
    Text,
    /// JSON output
    Json,
}

/// CLI arguments for tripvote
#[derive(Parser, Debug)]
#[command(name = "tripvote")]
#[command(author, version, about = "Group trip planning - like or pass until everyone agrees")]
#[command(long_about = r#"
tripvote lets a group decide a trip together.

Everyone votes like or pass on each option of a stage:
1. Destinations
2. Accommodations
3. Transportation
The trip moves to the next stage once every participant has voted on every item.

Configuration files are loaded from (in priority order):
1. TRIPVOTE_<SECTION>__<KEY>       Environment variables
2. --config <path>                 Explicit config file
3. ./tripvote.toml                 Project-level config
4. ~/.config/tripvote/config.toml  Global config

Example:
  tripvote create "Summer in Europe" --start 2026-07-01 --end 2026-07-10 --budget '$$' --creator Ana
  tripvote generate <trip> --destinations "beaches, good food"
  tripvote join https://tripvote.app/trip/<trip> --name Ben
  tripvote vote <trip> --as Ben
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Trip store file (overrides `[store] path`)
    #[arg(long, value_name = "PATH", global = true)]
    pub store: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a trip and join it as its first participant
    Create(CreateArgs),

    /// Generate the items to vote on from the group's preferences
    Generate(GenerateArgs),

    /// Join a trip from a share link or trip id
    Join(JoinArgs),

    /// Print the share link of a trip
    Share {
        /// Trip id or share link
        trip: String,
    },

    /// Vote like or pass on the current stage's items
    Vote(VoteArgs),

    /// Show the active stage: tallies and who is still voting
    Status {
        /// Trip id or share link
        trip: String,
    },

    /// Follow a trip live until every stage is decided
    Watch {
        /// Trip id or share link
        trip: String,
    },

    /// Show ranked results for every stage
    Results {
        /// Trip id or share link
        trip: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Show configuration file locations
    Config,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Trip name
    pub name: String,

    /// First day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub start: NaiveDate,

    /// Last day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub end: NaiveDate,

    /// Budget tier: $, $$ or $$$ (also budget, mid-range, luxury)
    #[arg(short, long, default_value = "$$")]
    pub budget: BudgetTier,

    /// Display name of the creator
    #[arg(long, value_name = "NAME")]
    pub creator: Option<String>,

    /// Account id of the creator
    #[arg(long, value_name = "ID")]
    pub account: Option<String>,

    /// Where the group departs from
    #[arg(long = "from", value_name = "PLACE")]
    pub departure: Option<String>,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Trip id or share link
    pub trip: String,

    /// Destination preferences
    #[arg(long, value_name = "TEXT", default_value = "")]
    pub destinations: String,

    /// Accommodation preferences
    #[arg(long, value_name = "TEXT", default_value = "")]
    pub accommodations: String,

    /// Transportation preferences
    #[arg(long, value_name = "TEXT", default_value = "")]
    pub transportation: String,

    /// Activities the group enjoys
    #[arg(long, value_name = "TEXT", default_value = "")]
    pub activities: String,

    /// Dietary requirements
    #[arg(long, value_name = "TEXT", default_value = "")]
    pub dietary: String,

    /// Accessibility requirements
    #[arg(long, value_name = "TEXT", default_value = "")]
    pub accessibility: String,

    /// Only generate these stages (can be specified multiple times)
    #[arg(long, value_name = "STAGE")]
    pub stage: Vec<Stage>,

    /// Use the built-in catalog instead of the configured generator
    #[arg(long)]
    pub builtin: bool,
}

#[derive(Args, Debug)]
pub struct JoinArgs {
    /// Share link or trip id
    pub link: String,

    /// Display name
    #[arg(short, long)]
    pub name: String,

    /// Account id (joins are deduplicated per account)
    #[arg(long, value_name = "ID")]
    pub account: Option<String>,
}

#[derive(Args, Debug)]
pub struct VoteArgs {
    /// Trip id or share link
    pub trip: String,

    /// Participant id or display name
    #[arg(long = "as", value_name = "PARTICIPANT")]
    pub participant: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create() {
        let cli = Cli::parse_from([
            "tripvote",
            "create",
            "Summer",
            "--start",
            "2026-07-01",
            "--end",
            "2026-07-08",
            "--budget",
            "$$$",
            "--creator",
            "Ana",
        ]);
        match cli.command {
            Command::Create(args) => {
                assert_eq!(args.budget, BudgetTier::Luxury);
                assert_eq!(args.creator.as_deref(), Some("Ana"));
                assert_eq!(args.start, NaiveDate::from_ymd_opt(2026, 7, 1).unwrap());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["tripvote", "status", "abc", "-vv", "--store", "/tmp/t.json"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/t.json")));
    }

    #[test]
    fn test_generate_stage_filter() {
        let cli = Cli::parse_from([
            "tripvote",
            "generate",
            "abc",
            "--destinations",
            "beaches",
            "--stage",
            "accommodations",
        ]);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.stage, vec![Stage::Accommodations]);
        assert!(!args.builtin);
    }

    #[test]
    fn test_vote_requires_participant() {
        assert!(Cli::try_parse_from(["tripvote", "vote", "abc"]).is_err());
    }
}
