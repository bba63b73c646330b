use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use eventdesk_settings::DeskSettings;

#[derive(Debug, Parser)]
#[command(name = "eventdesk", version, about = "Manage events on a remote REST collection")]
pub struct Cli {
    /// Settings file (default: ~/.eventdesk/settings.json).
    #[arg(long, global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Collection URL, e.g. http://localhost:8080/project/events.
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Log as JSON lines on stderr.
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Fetch and print events.
    List {
        /// Only show events whose name contains this text (any case).
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Fetch a single event by id.
    Show { id: String },
    /// Create an event.
    Add {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Change the name of an event.
    Rename {
        id: String,
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Delete an event by id.
    Delete { id: String },
    /// Interactive session.
    Shell,
    /// Create, list, show and rename a "Test Event" against the server.
    Demo,
}

impl Cli {
    /// Command-line flags take precedence over file and env settings.
    pub fn apply_to(&self, settings: &mut DeskSettings) {
        if let Some(url) = &self.base_url {
            settings.api.base_url = url.clone();
        }
        if self.json_logs {
            settings.logging.json = true;
        }
        match self.verbose {
            0 => {}
            1 => settings.logging.level = "info".into(),
            2 => settings.logging.level = "debug".into(),
            _ => settings.logging.level = "trace".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn multi_word_names_are_collected() {
        let cli = Cli::parse_from(["eventdesk", "add", "Rust", "Meetup"]);
        assert_eq!(
            cli.command,
            Command::Add {
                name: vec!["Rust".into(), "Meetup".into()]
            }
        );
    }

    #[test]
    fn rename_takes_id_then_name() {
        let cli = Cli::parse_from(["eventdesk", "rename", "3", "New", "name"]);
        assert_eq!(
            cli.command,
            Command::Rename {
                id: "3".into(),
                name: vec!["New".into(), "name".into()]
            }
        );
    }

    #[test]
    fn add_requires_a_name() {
        assert!(Cli::try_parse_from(["eventdesk", "add"]).is_err());
    }

    #[test]
    fn global_flags_override_settings() {
        let cli = Cli::parse_from([
            "eventdesk",
            "list",
            "--base-url",
            "http://events.test/api/events",
            "-vv",
            "--json-logs",
        ]);
        let mut settings = DeskSettings::default();
        cli.apply_to(&mut settings);
        assert_eq!(settings.api.base_url, "http://events.test/api/events");
        assert_eq!(settings.logging.level, "debug");
        assert!(settings.logging.json);
    }

    #[test]
    fn no_flags_leave_settings_alone() {
        let cli = Cli::parse_from(["eventdesk", "list", "--filter", "alp"]);
        let mut settings = DeskSettings::default();
        cli.apply_to(&mut settings);
        assert_eq!(settings, DeskSettings::default());
        assert_eq!(
            cli.command,
            Command::List {
                filter: Some("alp".into())
            }
        );
    }
}
