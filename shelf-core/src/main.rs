//! src/main.rs
//! Movie collection terminal client

use std::{
    io::{self, Stdout},
    panic::PanicHookInfo,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossterm::{
    event::{Event as TerminalEvent, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Frame, Terminal, backend::CrosstermBackend};
use tokio::{
    signal,
    sync::{Notify, mpsc},
};
use tracing::{debug, error, info, warn};

use shelf_core::{
    Logger,
    api::{FileTokenStore, HttpBackend, MovieBackend},
    config::Config,
    controller::{
        AuthStore, MovieStore,
        action_dispatcher::{DispatcherStats, ModularActionDispatcher},
        actions::Action,
        event_loop::{EventLoop, MetricsSnap, TaskResult},
        key_handler::{KeyContext, map_key},
        state_coordinator::StateCoordinator,
    },
    model::{Session, ui_state::RedrawFlag},
    view::{theme, ui::UIRenderer},
};

type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> Result<()> {
    let (config, load_error) = match Config::load().await {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    let _log_guard = Logger::init_tracing(&config.logging).context("Failed to initialize logging")?;
    if let Some(e) = load_error {
        warn!("Failed to load config, using defaults: {e:#}");
    }

    setup_panic_handler();

    let app = App::new(Arc::new(config))
        .await
        .context("Failed to initialize application")?;
    app.run().await.context("Application runtime error")?;

    info!("Application exited cleanly");
    Ok(())
}

struct App {
    terminal: AppTerminal,
    event_loop: EventLoop,
    state_coordinator: Arc<StateCoordinator>,
    action_dispatcher: ModularActionDispatcher,
    ui_renderer: UIRenderer,
    shutdown: Arc<Notify>,
    performance_monitor: PerformanceMonitor,
}

#[derive(Debug)]
struct PerformanceMonitor {
    last_metrics_log: Instant,
    slow_frames: u32,
}

impl PerformanceMonitor {
    fn new() -> Self {
        Self {
            last_metrics_log: Instant::now(),
            slow_frames: 0,
        }
    }

    fn record_frame_time(&mut self, duration: Duration) {
        if duration.as_millis() > 16 {
            self.slow_frames += 1;
        }
    }

    fn should_log_metrics(&mut self) -> bool {
        let now = Instant::now();
        if now.duration_since(self.last_metrics_log).as_secs() >= 30 {
            self.last_metrics_log = now;
            true
        } else {
            false
        }
    }
}

impl App {
    async fn new(config: Arc<Config>) -> Result<Self> {
        info!(api_url = %config.api_url, "Starting movie shelf client");
        theme::init_theme();

        // Session + backend
        let token_store = FileTokenStore::new(config.token_path()?);
        let session = Session::new(Arc::new(token_store));
        let backend: Arc<dyn MovieBackend> = Arc::new(
            HttpBackend::new(&config.api_url, config.request_timeout, session.clone())
                .context("Failed to build HTTP client")?,
        );

        let movies = MovieStore::new(backend.clone(), session.clone(), config.initial_query());
        let auth = AuthStore::new(backend, session, movies.clone());

        // Create communication channels
        let (task_tx, task_rx) = mpsc::unbounded_channel::<TaskResult>();

        let state_coordinator = Arc::new(StateCoordinator::new(config, movies, auth));

        let action_dispatcher =
            ModularActionDispatcher::new(state_coordinator.clone(), task_tx.clone());
        let event_loop = EventLoop::new(task_rx, state_coordinator.clone());

        Self::restore_session(&state_coordinator, &task_tx);

        let terminal = setup_terminal().context("Failed to initialize terminal")?;

        info!("Application initialized successfully");

        Ok(Self {
            terminal,
            event_loop,
            state_coordinator,
            action_dispatcher,
            ui_renderer: UIRenderer::new(),
            shutdown: Arc::new(Notify::new()),
            performance_monitor: PerformanceMonitor::new(),
        })
    }

    /// Resume a saved session and fetch the first page right away.
    fn restore_session(state: &StateCoordinator, task_tx: &mpsc::UnboundedSender<TaskResult>) {
        if !state.auth.restore() {
            info!("No saved session; showing login");
            return;
        }

        let movies = state.movies.clone();
        state.spawn(task_tx, async move {
            TaskResult::MoviesLoaded(movies.refresh().await)
        });
        state.request_redraw(RedrawFlag::All);
    }

    async fn run(mut self) -> Result<()> {
        self.setup_shutdown_handler();
        info!("Starting event loop");

        let mut event_stream = EventStream::new();

        loop {
            self.render()?;

            if self.performance_monitor.should_log_metrics() {
                self.log_performance_metrics();
            }

            tokio::select! {
                _ = self.shutdown.notified() => {
                    info!("Shutdown signal received");
                    break;
                }

                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(terminal_event)) => {
                            if let Some(action) = self.process_terminal_event(terminal_event)
                                && !self.dispatch_action(action).await
                            {
                                info!("Quit requested");
                                break;
                            }
                        }
                        Some(Err(e)) => warn!("Terminal event error: {}", e),
                        None => {
                            info!("Terminal event stream closed");
                            break;
                        }
                    }
                }

                action = self.event_loop.next_action() => {
                    if !self.dispatch_action(action).await {
                        info!("Termination from event loop action");
                        break;
                    }
                }
            }
        }

        self.log_final_metrics();
        info!("Event loop terminated cleanly");
        Ok(())
    }

    fn process_terminal_event(&self, event: TerminalEvent) -> Option<Action> {
        match event {
            TerminalEvent::Key(key_event) => {
                let ctx = KeyContext::new(
                    self.state_coordinator.is_authenticated(),
                    &self.state_coordinator.ui_state(),
                );
                map_key(key_event, ctx)
            }
            TerminalEvent::Resize(width, height) => Some(Action::Resize(width, height)),
            _ => None,
        }
    }

    async fn dispatch_action(&mut self, action: Action) -> bool {
        if !action.is_background() {
            debug!("Dispatching action: {:?}", action);
        }
        self.action_dispatcher.handle(action).await
    }

    fn render(&mut self) -> Result<()> {
        if !self.state_coordinator.needs_redraw() {
            return Ok(());
        }

        let start = Instant::now();
        let renderer = &mut self.ui_renderer;
        let coordinator = &self.state_coordinator;
        self.terminal
            .draw(|frame: &mut Frame<'_>| renderer.render(frame, coordinator))
            .context("Failed to draw terminal")?;

        self.state_coordinator.clear_redraw();

        let duration = start.elapsed();
        self.performance_monitor.record_frame_time(duration);
        if duration.as_millis() > 16 {
            warn!("Slow render: {}ms (target: <16ms)", duration.as_millis());
        }
        Ok(())
    }

    fn log_performance_metrics(&self) {
        let dispatcher_stats: DispatcherStats = self.action_dispatcher.get_stats();
        let render_stats = self.ui_renderer.get_stats();

        info!(
            "Performance: Actions: {}, Handlers: {}, Failures: {}, FPS: {:.1}, Slow frames: {}",
            dispatcher_stats.total_actions,
            dispatcher_stats.total_handlers,
            dispatcher_stats.failures,
            render_stats.fps(),
            self.performance_monitor.slow_frames
        );
    }

    fn log_final_metrics(&self) {
        let event_loop_metrics: MetricsSnap = self.event_loop.snapshot_metrics();
        let dispatcher_stats = self.action_dispatcher.get_stats();

        info!("Final metrics:");
        info!("  Tasks processed: {}", event_loop_metrics.tasks);
        info!("  Ticks: {}", event_loop_metrics.ticks);
        info!("  Dispatched actions: {}", dispatcher_stats.total_actions);
        info!("  Unhandled actions: {}", dispatcher_stats.unhandled);
    }

    fn setup_shutdown_handler(&self) {
        let shutdown: Arc<Notify> = self.shutdown.clone();

        tokio::spawn(async move {
            #[cfg(unix)]
            {
                use tokio::signal::unix::{SignalKind, signal};

                let mut sigterm = match signal(SignalKind::terminate()) {
                    Ok(s) => s,
                    Err(e) => {
                        warn!("Failed to create SIGTERM handler: {}", e);
                        return;
                    }
                };

                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                    _ = signal::ctrl_c() => info!("Received Ctrl+C"),
                }
            }

            #[cfg(not(unix))]
            {
                if let Err(e) = signal::ctrl_c().await {
                    warn!("Failed to listen for Ctrl+C: {}", e);
                    return;
                }
                info!("Received Ctrl+C");
            }

            shutdown.notify_one();
        });
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Err(e) = cleanup_terminal(&mut self.terminal) {
            warn!("Failed to cleanup terminal: {}", e);
        }
    }
}

fn setup_terminal() -> Result<AppTerminal> {
    enable_raw_mode().context("Failed to enable raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    info!("Terminal setup complete");
    Ok(terminal)
}

fn cleanup_terminal(terminal: &mut AppTerminal) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    info!("Terminal cleanup complete");
    Ok(())
}

fn setup_panic_handler() {
    let original_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info: &PanicHookInfo<'_>| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);

        error!("Application panicked: {}", panic_info);
        original_hook(panic_info);
    }));
}
