//! `haulplan` — interactive shell over the application state machine.
//!
//! Dev/demo driver: the media stack is simulated, and generation falls back
//! to the offline canned backend unless `HAULPLAN_GENERATION_URL` is set.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use haulplan_ai::{
    CannedGenerationBackend, GenerationBackend, GenerationClient, HttpGenerationBackend,
};
use haulplan_app::{App, AppEvent, AppView, CapturePhase};
use haulplan_media::{SimulatedMediaGateway, SimulatedVideoDescriber};
use haulplan_store::{InMemoryInventoryStore, InventoryStore, SqliteInventoryStore};

enum CliCommand {
    Event(AppEvent),
    Help,
    Quit,
    Empty,
    Unknown(String),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    haulplan_observability::init();

    let mut app = App::new(
        GenerationClient::new(generation_backend()),
        SimulatedVideoDescriber::new(),
        SimulatedMediaGateway::new(),
        open_store().await,
    );

    print_help();
    render(app.view());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;
    while let Some(line) = lines.next_line().await? {
        match parse(line.trim()) {
            CliCommand::Quit => break,
            CliCommand::Help => print_help(),
            CliCommand::Empty => {}
            CliCommand::Unknown(msg) => println!("{msg}"),
            CliCommand::Event(event) => {
                app.handle(event).await;
                render(app.view());
            }
        }
        prompt()?;
    }

    Ok(())
}

fn generation_backend() -> Box<dyn GenerationBackend> {
    match std::env::var("HAULPLAN_GENERATION_URL") {
        Ok(endpoint) => match std::env::var("HAULPLAN_API_KEY") {
            Ok(key) => Box::new(HttpGenerationBackend::with_api_key(endpoint, key)),
            Err(_) => Box::new(HttpGenerationBackend::new(endpoint)),
        },
        Err(_) => {
            tracing::warn!("HAULPLAN_GENERATION_URL not set; using the offline canned backend");
            Box::new(CannedGenerationBackend::new())
        }
    }
}

async fn open_store() -> Arc<dyn InventoryStore> {
    let path = match std::env::var("HAULPLAN_DATA_DIR") {
        Ok(dir) => Some(PathBuf::from(dir).join("store.db")),
        Err(_) => SqliteInventoryStore::default_path(),
    };

    if let Some(path) = path {
        match SqliteInventoryStore::open(&path).await {
            Ok(store) => {
                tracing::info!(path = %path.display(), "store opened");
                return Arc::new(store);
            }
            Err(err) => {
                tracing::warn!(error = %err, "opening the store failed; records will not persist")
            }
        }
    }

    Arc::new(InMemoryInventoryStore::new())
}

fn parse(line: &str) -> CliCommand {
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let event = match command {
        "" => return CliCommand::Empty,
        "quit" | "exit" => return CliCommand::Quit,
        "help" => return CliCommand::Help,
        "desc" => AppEvent::EditDescription(rest.to_string()),
        "submit" => AppEvent::SubmitDescription,
        "retry" => AppEvent::RetryGeneration,
        "capture" => AppEvent::StartCapture,
        "finish" => AppEvent::FinishCapture,
        "cancel" => AppEvent::CancelCapture,
        "recapture" => AppEvent::RetryCapture,
        "list" => AppEvent::ViewSaved,
        "save" => AppEvent::SaveInventory,
        "done" => AppEvent::Dismiss,
        "open" => match rest.parse() {
            Ok(id) => AppEvent::SelectRecord(id),
            Err(err) => return CliCommand::Unknown(format!("open: {err}")),
        },
        "delete" => match rest.parse() {
            Ok(id) => AppEvent::DeleteRecord(id),
            Err(err) => return CliCommand::Unknown(format!("delete: {err}")),
        },
        "new" => AppEvent::StartNew,
        other => return CliCommand::Unknown(format!("unknown command '{other}' (try 'help')")),
    };

    CliCommand::Event(event)
}

fn render(view: &AppView) {
    match view {
        AppView::Idle {
            description,
            notice,
        } => {
            println!("-- idle --");
            if !description.is_empty() {
                println!("draft: {description}");
            }
            if let Some(notice) = notice {
                println!("note:  {}", notice.message());
            }
        }
        AppView::CapturingVideo { phase } => match phase {
            CapturePhase::Recording(_) => {
                println!("-- recording -- ('finish' to analyze, 'cancel' to discard)")
            }
            CapturePhase::Failed(message) => {
                println!("-- capture failed: {message} ('recapture' to retry, 'cancel' to go back)")
            }
        },
        AppView::Processing { description } => {
            println!("-- processing '{description}' --")
        }
        AppView::Success { active, notice } => {
            println!("-- inventory --");
            for item in &active.data.inventory {
                println!(
                    "  {:>3}x {:<24} {} [{}]",
                    item.count,
                    item.name,
                    item.estimated_size,
                    item.tags.join(", ")
                );
            }
            println!("total: {}", active.data.total_estimated_size);
            println!("transcript: {}", active.data.transcript);
            if let Some(notice) = notice {
                println!("note:  {}", notice.message());
            }
        }
        AppView::Error { message, .. } => {
            println!("-- error: {message} ('retry' or 'new') --")
        }
        AppView::ListInventories { records } => {
            println!("-- saved inventories ({}) --", records.len());
            for record in records {
                println!(
                    "  {}  {}  {} item kinds, total {}",
                    record.id,
                    record.created_at.format("%Y-%m-%d %H:%M"),
                    record.data.inventory.len(),
                    record.data.total_estimated_size
                );
            }
        }
    }
}

fn print_help() {
    println!("commands:");
    println!("  desc <text>   set the description draft");
    println!("  submit        generate an inventory from the draft");
    println!("  retry         re-run a failed generation");
    println!("  capture       start a (simulated) video capture");
    println!("  finish        stop recording and derive a description");
    println!("  cancel        discard the capture");
    println!("  recapture     retry after a capture failure");
    println!("  save          persist the generated inventory");
    println!("  done          leave the inventory view");
    println!("  list          show saved inventories");
    println!("  open <id>     view a saved inventory");
    println!("  delete <id>   remove a saved inventory");
    println!("  new           start over");
    println!("  help | quit");
}

fn prompt() -> std::io::Result<()> {
    print!("> ");
    std::io::stdout().flush()
}
