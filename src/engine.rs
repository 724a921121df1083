use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::{MonitorConfig, TargetConfig};
use crate::error::Result;
use crate::models::{ProbeResult, Status, Target, TargetState};
use crate::prober::{HttpProber, Prober};
use crate::store::{MonitorState, SharedState};

/// The monitoring core. Front ends hold an `Arc<Monitor>` and go through
/// its methods; the state table is never handed out directly.
pub struct Monitor {
    config: MonitorConfig,
    state: SharedState,
    prober: Arc<dyn Prober>,
    worker: Mutex<WorkerSlot>,
    cycles: watch::Sender<u64>,
}

struct Worker {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// `lagging` holds a cancelled loop that outlived the stop grace period.
#[derive(Default)]
struct WorkerSlot {
    active: Option<Worker>,
    lagging: Option<JoinHandle<()>>,
}

impl Monitor {
    pub fn new(config: MonitorConfig) -> Result<Self> {
        config.validate()?;
        let prober = HttpProber::new(config.probe_timeout(), &config.user_agent)?;
        Ok(Self::with_prober(config, Arc::new(prober)))
    }

    pub fn with_prober(config: MonitorConfig, prober: Arc<dyn Prober>) -> Self {
        let (cycles, _) = watch::channel(0);
        Self {
            config,
            state: MonitorState::shared(),
            prober,
            worker: Mutex::new(WorkerSlot::default()),
            cycles,
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub async fn seed(&self, targets: &[TargetConfig]) {
        for target in targets {
            self.add_target(target.url.clone(), target.name.clone()).await;
        }
    }

    pub async fn add_target(&self, url: impl Into<String>, name: Option<String>) -> Target {
        let target = self.state.write().await.add_target(url, name);
        info!("Registered target #{} {} ({})", target.id, target.display_name, target.url);
        target
    }

    /// No-op on an out-of-range id. Later targets are renumbered.
    pub async fn remove_target(&self, id: usize) -> Option<Target> {
        let removed = self.state.write().await.remove_target(id);
        if let Some(target) = &removed {
            info!("Removed target #{} {} ({})", id, target.display_name, target.url);
        }
        removed
    }

    pub async fn list_targets(&self) -> Vec<Target> {
        self.state.read().await.targets()
    }

    pub async fn get_state(&self, url: &str) -> Option<TargetState> {
        self.state.read().await.state(url)
    }

    pub async fn get_all_states(&self) -> HashMap<String, TargetState> {
        self.state.read().await.all_states()
    }

    /// History for a target id, or `None` when the id is out of range.
    pub async fn history(&self, id: usize) -> Option<Vec<ProbeResult>> {
        self.state.read().await.history(id)
    }

    pub async fn get_history(&self, id: usize) -> Vec<ProbeResult> {
        self.history(id).await.unwrap_or_default()
    }

    pub async fn is_running(&self) -> bool {
        self.state.read().await.is_running()
    }

    /// Receiver whose value is the number of completed cycles.
    pub fn subscribe_cycles(&self) -> watch::Receiver<u64> {
        self.cycles.subscribe()
    }

    /// Launches the background loop. Returns `false` without doing anything
    /// when already running or when no targets are registered.
    ///
    /// A loop left behind by a timed-out stop is awaited first, so at most
    /// one loop ever runs.
    pub async fn start_monitoring(self: &Arc<Self>) -> bool {
        let mut slot = self.worker.lock().await;
        {
            let mut state = self.state.write().await;
            if state.is_running() || !state.has_targets() {
                return false;
            }
            state.set_running(true);
        }

        if let Some(lagging) = slot.lagging.take() {
            info!("Waiting for the previous cycle to finish");
            if let Err(e) = lagging.await {
                error!("Scheduler task ended abnormally: {}", e);
            }
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(Arc::clone(self).run(cancel.clone()));
        slot.active = Some(Worker { cancel, handle });
        true
    }

    /// Signals the loop and waits up to the stop grace period for it to exit.
    /// An in-flight cycle is never interrupted; the monitor reports idle either way.
    pub async fn stop_monitoring(&self) {
        let mut slot = self.worker.lock().await;
        let Some(mut worker) = slot.active.take() else {
            return;
        };

        worker.cancel.cancel();
        let grace = self.config.stop_grace();
        match tokio::time::timeout(grace, &mut worker.handle).await {
            Ok(Ok(())) => info!("Monitoring stopped"),
            Ok(Err(e)) => error!("Scheduler task ended abnormally: {}", e),
            Err(_) => {
                warn!(
                    "Scheduler still busy after {:?}; it will exit once its current cycle finishes",
                    grace
                );
                slot.lagging = Some(worker.handle);
            }
        }
        self.state.write().await.set_running(false);
    }

    async fn run(self: Arc<Self>, cancel: CancellationToken) {
        info!(
            "Monitoring started: every {}s, up to {} concurrent probes",
            self.config.check_interval, self.config.max_concurrency
        );

        loop {
            let started = Instant::now();
            let probed = self.run_cycle().await;
            info!(
                "Cycle completed {} checks in {:.2}s",
                probed,
                started.elapsed().as_secs_f64()
            );

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.config.interval()) => {}
            }
        }
    }

    /// Probes every currently registered target once and folds the results
    /// into state in registry order. Returns the number of probes made.
    pub async fn run_cycle(&self) -> usize {
        let targets = self.list_targets().await;
        let total = targets.len();
        let limit = self.config.max_concurrency.max(1);

        let mut results = stream::iter(targets.into_iter().map(|target| async move {
            let result = self.prober.probe(&target.url).await;
            (target, result)
        }))
        .buffered(limit);

        while let Some((target, result)) = results.next().await {
            self.process_result(&target, result).await;
        }

        self.cycles.send_modify(|count| *count += 1);
        total
    }

    async fn process_result(&self, target: &Target, result: ProbeResult) {
        let new_status = result.status;
        let detail = result.error_message.clone();

        let previous = self.state.write().await.record(&target.url, result);
        let Some(previous) = previous else {
            return;
        };
        if previous == new_status {
            return;
        }

        let msg = format!(
            "[CHANGE] {} ({}) -> {}",
            target.display_name, target.url, new_status
        );
        match (previous, new_status) {
            (_, Status::Down) => error!("{}: {}", msg, detail.unwrap_or_default()),
            (Status::Unknown, Status::Up) => info!("{}", msg),
            _ => warn!("{}", msg),
        }
    }
}
