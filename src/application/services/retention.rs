use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::application::ports::JobRepository;

/// Bounded retention for the in-memory job registry. Terminal records are
/// swept once they have been idle longer than the TTL; pending and
/// processing jobs are never touched. Uploaded files are left in place.
#[derive(Debug, Clone)]
pub struct RetentionConfig {
    pub ttl: Duration,
    pub sweep_interval: Duration,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(86_400),
            sweep_interval: Duration::from_secs(600),
        }
    }
}

pub struct RetentionSweeper {
    job_repository: Arc<dyn JobRepository>,
    config: RetentionConfig,
}

impl RetentionSweeper {
    pub fn new(job_repository: Arc<dyn JobRepository>, config: RetentionConfig) -> Self {
        Self {
            job_repository,
            config,
        }
    }

    pub async fn run(self) {
        tracing::info!(
            ttl_secs = self.config.ttl.as_secs(),
            interval_secs = self.config.sweep_interval.as_secs(),
            "Retention sweeper started"
        );
        let mut ticker = tokio::time::interval(self.config.sweep_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick fires immediately; skip it so a fresh process does
        // not sweep before anything could have aged out.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            self.sweep_once().await;
        }
    }

    /// One sweep pass; returns how many records were evicted.
    pub async fn sweep_once(&self) -> usize {
        let cutoff = Utc::now()
            - chrono::Duration::from_std(self.config.ttl)
                .unwrap_or_else(|_| chrono::Duration::seconds(0));

        match self.job_repository.remove_terminal_older_than(cutoff).await {
            Ok(removed) => {
                if !removed.is_empty() {
                    tracing::info!(count = removed.len(), "Swept expired job records");
                }
                removed.len()
            }
            Err(e) => {
                tracing::error!(error = %e, "Retention sweep failed");
                0
            }
        }
    }
}
