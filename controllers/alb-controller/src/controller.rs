//! Main controller implementation.
//!
//! This module contains the `Controller` struct that drives periodic
//! reconciliation passes for one cluster until shutdown is requested.

use crate::backoff::FibonacciBackoff;
use crate::config::Config;
use crate::error::ControllerError;
use crate::reconciler::Reconciler;
use elbv2_client::{Attributes, Elbv2ClientTrait};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Periodic reconciliation loop for one cluster.
pub struct Controller<C: ?Sized> {
    reconciler: Reconciler<C>,
    interval: Duration,
    backoff: FibonacciBackoff,
    passes: u64,
}

impl<C> Controller<C>
where
    C: Elbv2ClientTrait + ?Sized,
{
    /// Creates a new controller instance.
    pub fn new(client: Arc<C>, config: &Config, desired: Attributes) -> Self {
        info!("Initializing ALB Controller for cluster {}", config.cluster_name);
        if desired.is_empty() {
            warn!("No desired attributes configured; passes will only report cluster membership");
        }

        let reconciler = Reconciler::new(client, config.cluster_name.clone(), desired)
            .with_dry_run(config.dry_run)
            .with_concurrency(config.concurrency);

        Self {
            reconciler,
            interval: config.interval,
            backoff: FibonacciBackoff::new(config.backoff_min, config.backoff_max),
            passes: 0,
        }
    }

    /// Number of reconciliation passes started so far
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Runs until Ctrl-C is received.
    pub async fn run(&mut self) -> Result<(), ControllerError> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Runs passes until `shutdown` completes.
    ///
    /// The first pass starts immediately. After a clean pass the next one waits
    /// `interval`; after a failed or partially failed pass it waits the next
    /// backoff step instead.
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<(), ControllerError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            self.passes += 1;
            let delay = match self.reconciler.reconcile().await {
                Ok(summary) if summary.is_clean() => {
                    self.backoff.reset();
                    self.interval
                }
                Ok(summary) => {
                    let delay = self.backoff.next_backoff();
                    warn!(
                        "{} load balancers in cluster {} failed to reconcile, retrying in {:?}",
                        summary.failed,
                        self.reconciler.cluster_name(),
                        delay
                    );
                    delay
                }
                Err(e) if e.is_transient() => {
                    let delay = self.backoff.next_backoff();
                    warn!(
                        "Reconciliation pass for cluster {} hit a transient error: {}, retrying in {:?}",
                        self.reconciler.cluster_name(),
                        e,
                        delay
                    );
                    delay
                }
                Err(e) => {
                    let delay = self.backoff.next_backoff();
                    error!(
                        "Reconciliation pass for cluster {} failed: {}, retrying in {:?} (check ELBV2_ENDPOINT and the signing proxy credentials)",
                        self.reconciler.cluster_name(),
                        e,
                        delay
                    );
                    delay
                }
            };

            tokio::select! {
                () = &mut shutdown => {
                    info!("Shutdown requested after {} passes", self.passes);
                    return Ok(());
                }
                () = tokio::time::sleep(delay) => {}
            }
        }
    }
}
