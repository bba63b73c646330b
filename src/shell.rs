use std::io::Write;

use eventdesk_store::EventStore;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::render::{render_event, render_state};

const HELP: &str = "\
commands:
  add <name>       create an event
  filter [text]    show only events whose name contains text (empty clears)
  edit <id>        start editing an event
  name <text>      change the name in the open edit
  save             send the edited event
  cancel           discard the open edit
  delete <id>      delete an event
  show <id>        fetch one event from the server
  refresh          reload the list
  help             this text
  quit             leave";

#[derive(Debug, PartialEq, Eq)]
pub enum ShellCommand {
    Add(String),
    Filter(String),
    Edit(String),
    Name(String),
    Save,
    Cancel,
    Delete(String),
    Show(String),
    Refresh,
    Help,
    Quit,
    Empty,
}

/// Parse one input line. The first word is the command, the rest its argument.
pub fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let required = |what: &str| {
        if rest.is_empty() {
            Err(format!("{word}: missing {what}"))
        } else {
            Ok(rest.to_string())
        }
    };

    match word.to_lowercase().as_str() {
        "" => Ok(ShellCommand::Empty),
        "add" => required("name").map(ShellCommand::Add),
        "filter" => Ok(ShellCommand::Filter(rest.to_string())),
        "edit" => required("id").map(ShellCommand::Edit),
        "name" => required("name").map(ShellCommand::Name),
        "save" => Ok(ShellCommand::Save),
        "cancel" => Ok(ShellCommand::Cancel),
        "delete" | "rm" => required("id").map(ShellCommand::Delete),
        "show" => required("id").map(ShellCommand::Show),
        "refresh" | "ls" => Ok(ShellCommand::Refresh),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" | "q" => Ok(ShellCommand::Quit),
        other => Err(format!("unknown command {other:?}, try `help`")),
    }
}

/// Run the interactive loop until `quit` or end of input.
pub async fn run(store: &EventStore) -> anyhow::Result<()> {
    println!("eventdesk: {} (type `help`)", store.endpoint());
    store.list().await;
    redraw(store)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match command {
            ShellCommand::Empty => continue,
            ShellCommand::Quit => break,
            ShellCommand::Help => {
                println!("{HELP}");
                continue;
            }
            ShellCommand::Add(name) => {
                store.set_draft_name(name);
                store.create().await;
            }
            ShellCommand::Filter(text) => store.set_filter(text),
            ShellCommand::Edit(raw) => match store.find_local(&raw) {
                Some(event) => store.begin_edit(event),
                None => println!("no listed event with id {raw}"),
            },
            ShellCommand::Name(name) => {
                if store.snapshot().edit.is_editing() {
                    store.set_edit_name(name);
                } else {
                    println!("nothing is being edited, use `edit <id>` first");
                }
            }
            ShellCommand::Save => {
                store.save_edit().await;
            }
            ShellCommand::Cancel => store.cancel_edit(),
            ShellCommand::Delete(raw) => {
                store.delete(&store.resolve_id(&raw)).await;
            }
            ShellCommand::Show(raw) => {
                let id = store.resolve_id(&raw);
                match store.fetch(&id).await {
                    Ok(event) => render_event(&mut std::io::stdout().lock(), &event)?,
                    Err(_) => println!("could not load event {id}"),
                }
                continue;
            }
            ShellCommand::Refresh => {
                store.list().await;
            }
        }
        redraw(store)?;
    }
    Ok(())
}

fn redraw(store: &EventStore) -> std::io::Result<()> {
    render_state(&mut std::io::stdout().lock(), &store.snapshot())
}
