// ABOUTME: Fixed-cadence polling of the panic classifier while a call is active
// Each tick spawns an independent invocation so a slow classifier never delays the next one

use crate::classifier::{ClassifierClient, Scene};
use crate::models::Verdict;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Runs the classifier on a fixed cadence while a call is active
#[derive(Default)]
pub struct PollingScheduler {
    ticker: Option<JoinHandle<()>>,
}

impl PollingScheduler {
    /// Stopped scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify immediately, then once per `interval` until stopped.
    /// `on_verdict` receives the 1-based invocation sequence number with each result.
    pub fn start<F>(&mut self, interval: Duration, client: ClassifierClient, scene: Scene, on_verdict: F)
    where
        F: Fn(u64, Verdict) + Send + Sync + 'static,
    {
        self.stop();

        info!(
            "Starting panic analysis every {:?} using '{}' classifier",
            interval,
            client.backend_name()
        );

        let on_verdict = Arc::new(on_verdict);
        self.ticker = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut seq = 0u64;

            loop {
                ticker.tick().await;
                seq += 1;
                debug!("Dispatching panic analysis #{}", seq);

                let client = client.clone();
                let scene = scene.clone();
                let on_verdict = Arc::clone(&on_verdict);
                tokio::spawn(async move {
                    let verdict = client.analyze(&scene).await;
                    on_verdict(seq, verdict);
                });
            }
        }));
    }

    /// Cancel future ticks. In-flight invocations run to completion;
    /// their results are filtered by the receiver.
    pub fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
            info!("Panic analysis stopped");
        }
    }

    /// Whether ticks are still scheduled
    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }
}

impl Drop for PollingScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
