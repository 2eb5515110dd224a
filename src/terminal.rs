//! Terminal front end
//!
//! Line-oriented driver for a [`Session`] backed by the JSON file store.
//! Dialogs are answered on stdin, the way a browser blocks on `confirm`.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::input::{Keyboard, Shortcut};
use crate::manager::{ModalTarget, Prompt, VersionManager, ViewState};
use crate::session::{Intent, Session};
use crate::store::{FileBackend, StoreClient};
use crate::version::{DocumentId, VersionId, time_since};

const HELP: &str = "\
commands:
  open <document-id>     switch to another document
  edit <text>            replace the editor content (\\n for newlines)
  append <text>          append to the editor content
  list                   show the versions of the open document
  select <version-id>    view another version
  add                    open the new-version dialog
  save                   press ctrl+s
  key <binding>          press any key chord, e.g. cmd+s
  subtitle <text>        type the new version's name
  submit | cancel        close the dialog
  backdrop               click outside the dialog
  collapse               close the comparator
  refresh                reload the version list
  show                   print the editor state
  quit";

/// Prompt that asks on stdin and prints notices to stdout
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        print!("{} [y/N] ", message);
        let _ = io::stdout().flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }

    fn notify(&mut self, message: &str) {
        println!("! {}", message);
    }
}

type TerminalSession = Session<FileBackend, TerminalPrompt, ViewState>;

/// Parsed terminal command
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Intent(Intent),
    Append(String),
    Key(Shortcut),
    List,
    Show,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let text = rest.replace("\\n", "\n");

    let command = match word {
        "open" => Command::Intent(Intent::OpenDocument(
            rest.parse::<DocumentId>()
                .with_context(|| format!("Invalid document id '{}'", rest))?,
        )),
        "edit" => Command::Intent(Intent::EditContent(text)),
        "append" => Command::Append(text),
        "list" => Command::List,
        "select" => Command::Intent(Intent::ClickVersion(
            rest.parse::<VersionId>()
                .with_context(|| format!("Invalid version id '{}'", rest))?,
        )),
        "add" => Command::Intent(Intent::AddVersion),
        "save" => Command::Key("ctrl+s".parse()?),
        "key" => Command::Key(rest.parse()?),
        "subtitle" => Command::Intent(Intent::SetSubtitle(rest.to_string())),
        "submit" => Command::Intent(Intent::Submit),
        "cancel" => Command::Intent(Intent::Cancel),
        "backdrop" => Command::Intent(Intent::ModalClick(ModalTarget::Backdrop)),
        "collapse" => Command::Intent(Intent::CollapseComparator),
        "refresh" => Command::Intent(Intent::Refresh),
        "show" => Command::Show,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => anyhow::bail!("Unknown command '{}', try 'help'", other),
    };
    Ok(Some(command))
}

/// Run the terminal front end until stdin closes or `quit`
pub fn serve() -> Result<()> {
    let config = Config::from_args_and_env()?;

    env_logger::Builder::new()
        .parse_filters(&config.log_level)
        .init();

    if let Some(path) = &config.project_config_path {
        log::info!("Loaded project configuration from {}", path.display());
    }

    // Current-thread runtime: dialogs block on stdin between events.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(run_terminal(config))
}

async fn run_terminal(config: Config) -> Result<()> {
    let backend = FileBackend::new(config.store_path.clone());
    let (watch_tx, watch_rx) = mpsc::unbounded_channel();
    let _watcher = match backend.watch(watch_tx) {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            log::warn!("Not watching {}: {}", backend.path().display(), e);
            None
        }
    };

    let keyboard = Keyboard::new();
    let (client, events) = StoreClient::new(backend);
    let manager = VersionManager::new(client, TerminalPrompt, ViewState::default())
        .with_messages(config.messages.clone())
        .with_save_shortcuts(config.save_shortcuts.clone());

    let mut session = Session::mount(manager, events, &keyboard);
    session.watch_changes(watch_rx);

    println!("docver: catalog {}", config.store_path.display());
    if let Some(document_id) = config.document {
        let _ = session.dispatch(Intent::OpenDocument(document_id));
        session.settle().await;
        print_state(&session);
    }

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("error: {:#}", e);
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => println!("{}", HELP),
            Command::List => print_listing(&session),
            Command::Show => print_state(&session),
            Command::Key(shortcut) => keyboard.press(shortcut.chord()),
            Command::Append(text) => {
                let mut content = session.manager().buffer().unwrap_or_default().to_string();
                content.push_str(&text);
                let _ = session.dispatch(Intent::EditContent(content));
            }
            Command::Intent(intent) => {
                if let Err(rejection) = session.dispatch(intent) {
                    println!("rejected: {}", rejection);
                }
            }
        }

        let writes_before = session.manager().observer().content_writes;
        session.settle().await;
        if session.manager().observer().content_writes != writes_before {
            print_state(&session);
        }
    }

    log::info!("docver shutting down");
    Ok(())
}

fn print_listing(session: &TerminalSession) {
    let manager = session.manager();
    let Some(document_id) = manager.document_id() else {
        println!("no document open");
        return;
    };
    let directory = manager.directory();
    if directory.is_empty() {
        println!("document {} has no versions", document_id);
        return;
    }

    let now = Utc::now();
    for entry in directory.entries(manager.selection().selected_version_id()) {
        let marker = if entry.is_selected { "*" } else { " " };
        println!(
            "{} {:>4}  {}  ({})",
            marker,
            entry.version.id,
            entry.version.subtitle,
            time_since(entry.version.created_at, now)
        );
    }
}

fn print_state(session: &TerminalSession) {
    let manager = session.manager();
    let view = manager.observer();
    let selection = manager.selection();

    let date = view
        .date
        .map(|date| date.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    println!(
        "[{}] {} {}{}{}",
        selection
            .selected_version_id()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string()),
        view.subtitle,
        date,
        if manager.is_dirty() { " (modified)" } else { "" },
        if selection.comparator_expanded() { " [comparing]" } else { "" },
    );
    if let Some(subtitle) = manager.draft_subtitle() {
        println!("new version dialog: '{}'", subtitle);
    }
    println!("{}", manager.buffer().unwrap_or_default());
}
