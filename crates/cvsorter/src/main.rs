//! `cvsorter` - keyboard-driven CV triage in the terminal.
//!
//! Reads one command per line from stdin, applies it to the organizer and
//! reprints the status line. The session is autosaved every 30 seconds and
//! on exit.

mod command;
mod view;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use cvsorter_core::{Config, Organizer, SessionStore, write_export};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use command::Command;

const AUTOSAVE_INTERVAL: Duration = Duration::from_secs(30);

/// Where configuration and session state live.
#[derive(Debug, Clone)]
struct AppPaths {
    config: PathBuf,
    session: PathBuf,
}

impl AppPaths {
    /// `CVSORTER_HOME` holds both files when set; otherwise the platform
    /// config and data directories are used.
    fn resolve() -> Self {
        if let Some(home) = std::env::var_os("CVSORTER_HOME") {
            let home = PathBuf::from(home);
            return Self {
                config: home.join("config.json"),
                session: home.join("session_state.json"),
            };
        }

        let app_dir = |base: Option<PathBuf>| {
            base.unwrap_or_else(|| PathBuf::from(".")).join("cvsorter")
        };
        Self {
            config: app_dir(dirs::config_dir()).join("config.json"),
            session: app_dir(dirs::data_dir()).join("session_state.json"),
        }
    }
}

type Input = Lines<BufReader<Stdin>>;

/// What the loop should do after a command.
enum Flow {
    Continue,
    Quit,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cvsorter=info,cvsorter_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let paths = AppPaths::resolve();
    info!("Starting cvsorter, config at {}", paths.config.display());

    let config = Config::load_or_create(&paths.config);
    let mut organizer = Organizer::new(config)
        .with_config_path(&paths.config)
        .with_session_store(SessionStore::open(&paths.session));

    if organizer.restore_session() {
        println!("Previous session state has been restored");
    } else {
        println!("Type 'open <folder>' to start, 'help' for the key reference.");
    }
    println!("{}", view::status(&organizer));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut autosave = tokio::time::interval(AUTOSAVE_INTERVAL);
    autosave.tick().await;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };
                match Command::parse(&line, &organizer.config().reason_map) {
                    Ok(command) => {
                        if matches!(handle(&mut organizer, command, &mut lines).await, Flow::Quit) {
                            break;
                        }
                    }
                    Err(e) => println!("{e}"),
                }
                println!("{}", view::status(&organizer));
            }
            _ = autosave.tick() => {
                if let Err(e) = organizer.save() {
                    warn!("Autosave failed: {e}");
                }
            }
        }
    }

    organizer.save().context("Failed to save session state")?;
    info!("Session saved, exiting");
    Ok(())
}

async fn handle(organizer: &mut Organizer, command: Command, lines: &mut Input) -> Flow {
    let result = match command {
        Command::Open(folder) => organizer.open_folder(&folder).map(|count| {
            println!("Loaded {count} CVs from {}", folder.display());
        }),
        Command::Reject(key) => organizer.move_current(key).map(|dest| {
            println!("Moved to {}", dest.display());
        }),
        Command::Hold => organizer.hold_current().map(|dest| {
            println!("Held in {}", dest.display());
        }),
        Command::Undo => {
            let overwrite = match organizer.undo_conflict().map(Path::to_path_buf) {
                Some(occupied) => confirm_overwrite(&occupied, lines).await,
                None => false,
            };
            organizer.undo(|_| overwrite).map(|restored| {
                println!("Restored {}", restored.display());
            })
        }
        Command::History => {
            println!("{}", view::history(&organizer.recent_history(view::HISTORY_LEN)));
            Ok(())
        }
        Command::Import(path) => {
            if let Err(e) = import(organizer, &path) {
                println!("Import failed: {e:#}");
            }
            Ok(())
        }
        Command::Export(path) => {
            if let Err(e) = export(organizer, path) {
                println!("Export failed: {e:#}");
            }
            Ok(())
        }
        Command::Zoom(zoom) => {
            organizer.set_zoom(zoom);
            println!("Zoom set to {:.1}", organizer.zoom());
            Ok(())
        }
        Command::Status => Ok(()),
        Command::Help => {
            println!("{}", view::help(&organizer.config().reason_map));
            Ok(())
        }
        Command::Quit => return Flow::Quit,
    };

    if let Err(e) = result {
        println!("{}: {e}", view::error_title(e.kind()));
    }
    Flow::Continue
}

async fn confirm_overwrite(occupied: &Path, lines: &mut Input) -> bool {
    println!(
        "{} already exists. Overwrite? [y/N]",
        occupied.display()
    );
    match lines.next_line().await {
        Ok(Some(answer)) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        _ => false,
    }
}

fn import(organizer: &mut Organizer, path: &Path) -> anyhow::Result<()> {
    let file = File::open(path).with_context(|| format!("Couldn't open {}", path.display()))?;
    let imported = organizer.import_emails_from(file)?;
    println!(
        "Imported {imported} emails ({} known in total)",
        organizer.emails().persistent().len()
    );
    Ok(())
}

fn export(organizer: &Organizer, path: PathBuf) -> anyhow::Result<()> {
    let rows = organizer.export_csv()?;
    if rows.is_empty() {
        println!("No rejected CVs to export.");
        return Ok(());
    }

    let path = command::export_path(path);
    let file = File::create(&path).with_context(|| format!("Couldn't create {}", path.display()))?;
    write_export(&rows, file)?;

    let with_email = rows.iter().filter(|row| !row.email.is_empty()).count();
    println!(
        "CSV exported with {} entries to {}\nEmails found: {with_email}/{}",
        rows.len(),
        path.display(),
        rows.len()
    );
    info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(())
}
