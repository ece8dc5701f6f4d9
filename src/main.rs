use anyhow::{Context, Result};
use std::path::Path;
use taskdeck::config::Config;
use taskdeck::source::fs::FsTaskSource;
use taskdeck::task;
use taskdeck::tui::{self, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let log_file = std::fs::File::create("taskdeck.log")?;
    tracing_subscriber::fmt()
        .with_env_filter("taskdeck=info")
        .with_writer(log_file)
        .init();

    let config = Config::load_or_default(Path::new("config.toml"))?;

    // `--tasks <dir>` overrides the configured discovery root.
    let mut args = std::env::args().skip(1);
    let mut root = config.discovery.root.clone();
    while let Some(arg) = args.next() {
        if arg == "--tasks" {
            root = args
                .next()
                .context("--tasks requires a directory argument")?;
        }
    }
    tracing::info!(root = %root, pattern = %config.discovery.pattern, "starting preview harness");

    let source = FsTaskSource::new(Path::new(&root), &config.discovery.pattern)?;
    let (tasks_tx, tasks_rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        let records = task::discover(&source).await;
        let _ = tasks_tx.send(records);
    });

    let state = AppState::new(config.ui.clone());
    tui::run(state, tasks_rx).await
}
