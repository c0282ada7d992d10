use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
    sync::Mutex,
};
use taskform::{app::App, store::TaskStore, ui};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "taskform", version, about = "Create, edit and delete tasks from the terminal")]
struct Cli {
    /// JSON file holding the tasks.
    #[arg(long = "store", value_name = "PATH", default_value = "tasks.json")]
    store: PathBuf,
    #[arg(long = "log-file", value_name = "PATH", default_value = "taskform.log")]
    log_file: PathBuf,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_file, &args.log_level)?;
    info!(store = %args.store.display(), "starting taskform");

    let store = TaskStore::load(&args.store).context("load task store")?;
    let mut app = App::new(store);

    if let Err(err) = ui::run_in_terminal(&mut app) {
        error!(error = %err, "event loop failed");
        return Err(err).context("run event loop");
    }
    info!(tasks = app.store().tasks().len(), "taskform exiting");
    Ok(())
}

fn init_tracing(log_file: &Path, log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("open log file {}", log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}
