//! src/controller/event_loop.rs
//! ============================================================================
//! # `EventLoop`: merges background results with timer ticks
//!
//! Terminal input is read by `main`; this loop owns the other sources. It
//! sleeps until the earliest pending deadline (search debounce) or the idle
//! tick, whichever comes first, so a settled search fires on time without
//! polling.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::time::{Instant as TokioInstant, sleep_until};
use tracing::{debug, trace};

use crate::controller::actions::Action;
use crate::controller::state_coordinator::StateCoordinator;
use crate::error::OpError;
use crate::import::catalog::CatalogFile;
use crate::model::movie::Movie;
use crate::model::movie_state::ImportSummary;

/// Wake-up interval when nothing is scheduled (toast expiry).
pub const IDLE_TICK: Duration = Duration::from_millis(250);

/// Outcome of a request spawned by a dispatcher.
#[derive(Debug, Clone)]
pub enum TaskResult {
    /// `Ok(false)`: superseded by a newer request and dropped.
    MoviesLoaded(Result<bool, OpError>),

    MovieLoaded(Result<bool, OpError>),

    MovieCreated(Result<Movie, OpError>),

    MovieUpdated(Result<Movie, OpError>),

    MovieDeleted {
        title: String,
        result: Result<(), OpError>,
    },

    /// Local read + parse of an import file.
    ImportPreviewed {
        path: PathBuf,
        result: Result<CatalogFile, String>,
    },

    Imported(Result<ImportSummary, OpError>),

    Authenticated {
        registered: bool,
        result: Result<(), OpError>,
    },
}

impl TaskResult {
    /// The operation error carried by this result, if any.
    pub const fn error(&self) -> Option<&OpError> {
        match self {
            Self::MoviesLoaded(Err(e))
            | Self::MovieLoaded(Err(e))
            | Self::MovieCreated(Err(e))
            | Self::MovieUpdated(Err(e))
            | Self::MovieDeleted { result: Err(e), .. }
            | Self::Imported(Err(e))
            | Self::Authenticated { result: Err(e), .. } => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnap {
    pub tasks: u64,
    pub ticks: u64,
}

pub struct EventLoop {
    task_rx: mpsc::UnboundedReceiver<TaskResult>,
    state: Arc<StateCoordinator>,
    idle_tick: Duration,
    metrics: MetricsSnap,
}

impl EventLoop {
    pub fn new(task_rx: mpsc::UnboundedReceiver<TaskResult>, state: Arc<StateCoordinator>) -> Self {
        Self {
            task_rx,
            state,
            idle_tick: IDLE_TICK,
            metrics: MetricsSnap::default(),
        }
    }

    fn next_deadline(&self, now: Instant) -> Instant {
        let idle = now + self.idle_tick;
        self.state
            .next_deadline()
            .map_or(idle, |deadline| deadline.min(idle))
    }

    /// Wait for the next thing to do.
    pub async fn next_action(&mut self) -> Action {
        let deadline = TokioInstant::from_std(self.next_deadline(Instant::now()));

        tokio::select! {
            Some(task_result) = self.task_rx.recv() => {
                debug!("Task result received: {:?}", task_result);
                self.metrics.tasks += 1;
                Action::TaskResult(task_result)
            }

            () = sleep_until(deadline) => {
                trace!("tick");
                self.metrics.ticks += 1;
                Action::Tick
            }
        }
    }

    pub const fn snapshot_metrics(&self) -> MetricsSnap {
        self.metrics
    }
}
