//! Background recompute task.
//!
//! Requests go through a single-slot `watch` channel, so a burst of requests
//! collapses into the newest one. The worker yields (or waits for the settle
//! delay) before picking a request up, computes the [`DerivedView`], and only
//! publishes it if no newer request arrived while it was working.
use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::{sync::watch, task::JoinHandle};

use crate::{DerivedView, EngineError, RecomputeTicket, ResultEngine, Snapshot};

/// Everything the worker needs to build one view, detached from the session.
#[derive(Clone, Debug)]
pub struct RecomputeRequest {
    pub ticket: RecomputeTicket,
    pub records: Snapshot,
    pub store_version: u64,
}

#[derive(Debug)]
pub struct RecomputeWorker {
    requests: watch::Sender<Option<RecomputeRequest>>,
    views: watch::Receiver<Option<Arc<DerivedView>>>,
    recomputations: Arc<AtomicU64>,
    task: JoinHandle<()>,
}

impl RecomputeWorker {
    /// Spawns the worker on the current tokio runtime.
    ///
    /// `settle` is how long the worker waits after being woken before it reads
    /// the newest request; zero means it only yields once.
    pub fn spawn(settle: Duration) -> Self {
        let (requests, requests_rx) = watch::channel(None);
        let (views_tx, views) = watch::channel(None);
        let recomputations = Arc::new(AtomicU64::new(0));
        let task = tokio::spawn(run(
            requests_rx,
            views_tx,
            settle,
            Arc::clone(&recomputations),
        ));

        Self {
            requests,
            views,
            recomputations,
            task,
        }
    }

    /// Replaces whatever request is waiting with `request`.
    pub fn request(&self, request: RecomputeRequest) -> ResultEngine<()> {
        self.requests
            .send(Some(request))
            .map_err(|_| EngineError::SchedulerClosed)
    }

    /// Waits for the next published view.
    pub async fn next_view(&mut self) -> ResultEngine<Arc<DerivedView>> {
        loop {
            self.views
                .changed()
                .await
                .map_err(|_| EngineError::SchedulerClosed)?;
            if let Some(view) = self.views.borrow_and_update().clone() {
                return Ok(view);
            }
        }
    }

    /// Views computed so far, including ones dropped as superseded.
    pub fn recomputations(&self) -> u64 {
        self.recomputations.load(Ordering::Relaxed)
    }

    pub fn shutdown(self) {
        self.task.abort();
    }
}

async fn run(
    mut requests: watch::Receiver<Option<RecomputeRequest>>,
    views: watch::Sender<Option<Arc<DerivedView>>>,
    settle: Duration,
    recomputations: Arc<AtomicU64>,
) {
    while requests.changed().await.is_ok() {
        if settle.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(settle).await;
        }

        let Some(request) = requests.borrow_and_update().clone() else {
            continue;
        };
        let generation = request.ticket.generation;
        let view = DerivedView::compute(
            &request.records,
            request.store_version,
            generation,
            &request.ticket.criteria,
        );
        recomputations.fetch_add(1, Ordering::Relaxed);

        if requests.has_changed().unwrap_or(true) {
            tracing::debug!(generation, "dropping view superseded during recompute");
            continue;
        }
        if views.send(Some(Arc::new(view))).is_err() {
            break;
        }
        tracing::trace!(generation, "view published");
    }
    tracing::debug!("recompute worker stopped");
}
