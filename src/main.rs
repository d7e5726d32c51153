use std::fs::OpenOptions;
use std::path::Path;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::Utc;
use clap::Parser;
use color_eyre::eyre::{eyre, Result, WrapErr};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ticket_desk::{
    app::{self, update, AppState},
    config::{Cli, CliCommand, Config},
    event::AppEvent,
    store::{seed::demo_document, write_document, JsonFileStore, TicketStore},
    view::render,
    watchdog::{SweepReport, Watchdog},
};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = Config::from_cli(&cli);

    match cli.command {
        Some(CliCommand::Seed { force }) => seed(&config, force),
        Some(CliCommand::Sweep) => sweep(&config),
        None => run_console(&config),
    }
}

/// Env filter from `RUST_LOG`, falling back to `ticket_desk=info,warn`.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ticket_desk=info,warn"))
}

/// Log to a file so the terminal UI stays intact.
fn init_file_tracing(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .wrap_err_with(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();
    Ok(())
}

fn init_stderr_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// `ticket-desk seed`: write the demo store document.
fn seed(config: &Config, force: bool) -> Result<()> {
    init_stderr_tracing();

    let path = &config.paths.store;
    if path.exists() && !force {
        return Err(eyre!(
            "{} already exists (pass --force to overwrite)",
            path.display()
        ));
    }

    let document = demo_document(Utc::now());
    write_document(path, &document)?;
    info!(path = %path.display(), tickets = document.tickets.len(), "demo store written");
    println!(
        "wrote {} tickets and {} admins to {}",
        document.tickets.len(),
        document.admins().len(),
        path.display()
    );
    Ok(())
}

/// `ticket-desk sweep`: one watchdog pass, printed to stdout.
fn sweep(config: &Config) -> Result<()> {
    init_stderr_tracing();

    let runtime = Runtime::new()?;
    let store: Arc<dyn TicketStore> = Arc::new(JsonFileStore::open(&config.paths.store)?);
    let mut watchdog =
        Watchdog::new(store, config.stale_after_days).with_persistence(&config.paths.notified);

    let report = runtime.block_on(watchdog.sweep(Utc::now()));
    print_report(&report);

    match report.error {
        Some(e) => Err(eyre!("sweep failed: {e}")),
        None => Ok(()),
    }
}

fn print_report(report: &SweepReport) {
    println!("pending tickets: {}", report.pending.len());
    for pending in &report.pending {
        println!(
            "  {:<34} {:>3}d  {:<6}  {}",
            pending.ticket_id,
            pending.days_pending,
            pending.priority.as_str(),
            pending.subject
        );
    }
    for stale in &report.warnings {
        println!("warning: {stale}");
    }
}

/// Default run: the terminal console.
fn run_console(config: &Config) -> Result<()> {
    init_file_tracing(&config.paths.log_file)?;

    let runtime = Runtime::new()?;
    let enter = runtime.enter();

    let store: Arc<dyn TicketStore> = Arc::new(
        JsonFileStore::open(&config.paths.store)
            .wrap_err_with(|| format!("failed to open store {}", config.paths.store.display()))?,
    );
    info!(store = store.name(), path = %config.paths.store.display(), "console starting");

    let (tx, rx) = std::sync::mpsc::channel::<AppEvent>();

    let subscription = {
        let tx = tx.clone();
        store.subscribe_tickets(Box::new(move |tickets| {
            // receiver gone means the console is shutting down
            let _ = tx.send(AppEvent::TicketsChanged(tickets));
        }))
    };

    let cancel = CancellationToken::new();
    let watchdog = {
        let tx = tx.clone();
        Watchdog::new(store.clone(), config.stale_after_days)
            .with_persistence(&config.paths.notified)
            .spawn(config.sweep_interval, cancel.clone(), move |report| {
                let _ = tx.send(AppEvent::SweepCompleted(report));
            })
    };

    let state = AppState::new(store);

    // Terminal initialization
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(
        &mut terminal,
        state,
        &rx,
        &tx,
        &runtime,
        Duration::from_millis(250),
    );

    // Terminal cleanup (always execute even if event loop errored)
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    cancel.cancel();
    subscription.unsubscribe();
    drop(enter);
    if let Err(e) = runtime.block_on(watchdog) {
        warn!(error = %e, "watchdog task ended abnormally");
    }
    info!("console stopped");

    result
}

/// Main event loop following Elm Architecture.
/// Store commands queued by `update` run on the runtime and report back
/// through `tx`.
fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    mut state: AppState,
    rx: &Receiver<AppEvent>,
    tx: &Sender<AppEvent>,
    runtime: &Runtime,
    tick_rate: Duration,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| render(&state, frame))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                state = update(state, AppEvent::Key(key));
            }
        }

        // Drain subscription, watchdog and command results
        while let Ok(event) = rx.try_recv() {
            state = update(state, event);
        }

        for command in state.take_commands() {
            let inbox = state.inbox.clone();
            let tx = tx.clone();
            runtime.spawn(async move {
                let event = app::execute(command, inbox).await;
                let _ = tx.send(event);
            });
        }

        if last_tick.elapsed() >= tick_rate {
            state = update(state, AppEvent::Tick(Utc::now()));
            last_tick = Instant::now();
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}
