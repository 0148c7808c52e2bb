use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use studio_sync::app::Workbench;
use studio_sync::kernel::persist::export_snapshot;
use studio_sync::kernel::services::adapters::{
    ensure_settings_file, ensure_store_dir, get_log_dir, get_settings_path, load_settings,
    FileBlobStore,
};
use studio_sync::kernel::services::ports::{Settings, SyncConfig};
use studio_sync::kernel::{Collection, DocumentId};

mod logging;

const USAGE: &str = "usage: studio-sync [--store <dir>] <command>

commands:
  list              print code files and canvases
  sessions          print the session archive
  export [<file>]   write a snapshot of the workspace (stdout if no file)
  import <file>     replace the workspace with a snapshot
  paths             print store, log and settings locations";

enum Command {
    List,
    Sessions,
    Export(Option<PathBuf>),
    Import(PathBuf),
    Paths,
}

struct Cli {
    store: Option<PathBuf>,
    command: Command,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Cli, String> {
    let mut store = None;
    let mut rest = Vec::new();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--store" {
            let dir = args.next().ok_or("--store needs a directory")?;
            store = Some(PathBuf::from(dir));
        } else if let Some(dir) = arg.strip_prefix("--store=") {
            store = Some(PathBuf::from(dir));
        } else if arg.starts_with("--") {
            return Err(format!("unknown option {arg}"));
        } else {
            rest.push(arg);
        }
    }

    let mut rest = rest.into_iter();
    let command = match rest.next().as_deref() {
        Some("list") => Command::List,
        Some("sessions") => Command::Sessions,
        Some("export") => Command::Export(rest.next().map(PathBuf::from)),
        Some("import") => Command::Import(PathBuf::from(
            rest.next().ok_or("import needs a snapshot file")?,
        )),
        Some("paths") => Command::Paths,
        Some(other) => return Err(format!("unknown command {other}")),
        None => return Err("missing command".to_string()),
    };
    if let Some(extra) = rest.next() {
        return Err(format!("unexpected argument {extra}"));
    }
    Ok(Cli { store, command })
}

fn main() -> ExitCode {
    let cli = match parse_args(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("studio-sync: {message}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    let _ = ensure_settings_file();
    let settings = load_settings().unwrap_or_default();
    let logging = logging::init(settings.log_filter.as_deref());
    let log_dir = logging.as_ref().map(|guard| guard.log_dir().to_path_buf());

    match run(cli, &settings, log_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            tracing::error!(error = %message, "command failed");
            eprintln!("studio-sync: {message}");
            ExitCode::from(1)
        }
    }
}

fn store_dir(cli: &Cli, settings: &Settings) -> Result<PathBuf, String> {
    if let Some(dir) = cli.store.clone().or_else(|| settings.store_dir.clone()) {
        std::fs::create_dir_all(&dir)
            .map_err(|e| format!("cannot create store dir {}: {e}", dir.display()))?;
        return Ok(dir);
    }
    ensure_store_dir().map_err(|e| format!("cannot resolve store dir: {e}"))
}

fn run(cli: Cli, settings: &Settings, log_dir: Option<PathBuf>) -> Result<(), String> {
    let root = store_dir(&cli, settings)?;
    if let Command::Paths = cli.command {
        print_paths(&root, log_dir.or_else(get_log_dir));
        return Ok(());
    }

    let config = SyncConfig::from_settings(settings);
    let blobs = FileBlobStore::new(&root);
    let mut workbench = Workbench::open(config, Box::new(blobs)).map_err(|e| e.to_string())?;

    match cli.command {
        Command::List => {
            let workspace = workbench.workspace();
            println!("code files:");
            print_collection(&workspace.code.files, |c| c.language.tag());
            println!("canvases:");
            print_collection(&workspace.canvas.files, |_| "canvas");
        }
        Command::Sessions => {
            let sessions = workbench.sessions().map_err(|e| e.to_string())?;
            for session in sessions {
                println!(
                    "{}  {}  {}",
                    session.id,
                    session.name,
                    format_millis(session.updated_at)
                );
            }
        }
        Command::Export(path) => {
            let document = export_snapshot(workbench.workspace()).map_err(|e| e.to_string())?;
            match path {
                Some(path) => std::fs::write(&path, document)
                    .map_err(|e| format!("cannot write {}: {e}", path.display()))?,
                None => println!("{document}"),
            }
        }
        Command::Import(path) => {
            let document = std::fs::read_to_string(&path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            let now = Instant::now();
            workbench.load(&document, now).map_err(|e| e.to_string())?;
            if let Some(e) = workbench.last_persist_error() {
                return Err(e.to_string());
            }
            workbench.save(now).map_err(|e| e.to_string())?;
            println!(
                "imported {} code files, {} canvases",
                workbench.workspace().code.files.len(),
                workbench.workspace().canvas.files.len()
            );
        }
        Command::Paths => {}
    }
    Ok(())
}

fn print_collection<C>(collection: &Collection<C>, describe: impl Fn(&C) -> &'static str) {
    let active: Option<DocumentId> = collection.active_id();
    for doc in collection.documents() {
        let marker = if Some(doc.id) == active { '*' } else { ' ' };
        println!(
            "{marker} {:>4}  {:<24} {}",
            doc.id.to_string(),
            doc.name,
            describe(&doc.content)
        );
    }
}

fn print_paths(store: &std::path::Path, log_dir: Option<PathBuf>) {
    println!("store     {}", store.display());
    if let Some(dir) = log_dir {
        println!("logs      {}", dir.display());
    }
    if let Some(path) = get_settings_path() {
        println!("settings  {}", path.display());
    }
}

fn format_millis(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|t| {
            t.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|| millis.to_string())
}
