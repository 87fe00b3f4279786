use crate::core::fetcher::HttpFetcher;
use crate::core::formatter::{format_address, format_error};
use crate::core::{AddressFetcher, ConfigProvider, RaceOutcome, SourceDescriptor, SourceReport};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Races one fetch unit per source and reports whichever finishes first, or a timeout.
///
/// A failed fetch is a valid race result: its error line wins exactly like an address
/// would. Units that lose keep running to completion unless `cancel_losers` is set; their
/// late sends land on a closed channel and are discarded.
pub struct RaceCoordinator<F: AddressFetcher> {
    fetcher: Arc<F>,
    timeout: Duration,
    cancel_losers: bool,
}

impl<F: AddressFetcher> RaceCoordinator<F> {
    pub fn new(fetcher: F, timeout: Duration) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            timeout,
            cancel_losers: false,
        }
    }

    pub fn from_config<C: ConfigProvider>(fetcher: F, config: &C) -> Self {
        Self::new(fetcher, config.timeout()).with_cancel_losers(config.cancel_losers())
    }

    pub fn with_cancel_losers(mut self, cancel_losers: bool) -> Self {
        self.cancel_losers = cancel_losers;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn run(&self, sources: Vec<SourceDescriptor>) -> RaceOutcome {
        // Sized to the unit count so no sender ever blocks on an unread channel.
        let (tx, mut rx) = mpsc::channel(sources.len().max(1));
        let mut handles = Vec::with_capacity(sources.len());

        for source in sources {
            let fetcher = Arc::clone(&self.fetcher);
            let tx = tx.clone();
            handles.push(tokio::spawn(async move {
                let report = run_unit(&*fetcher, &source).await;
                if tx.send(report).await.is_err() {
                    tracing::debug!("{} finished after the race was decided", source.label);
                }
            }));
        }
        drop(tx);

        tracing::debug!(
            "Launched {} lookups, waiting up to {:?}",
            handles.len(),
            self.timeout
        );
        let deadline = Instant::now() + self.timeout;

        let outcome = tokio::select! {
            Some(report) = rx.recv() => RaceOutcome::Resolved(report),
            _ = tokio::time::sleep_until(deadline) => RaceOutcome::TimedOut { timeout: self.timeout },
        };

        match &outcome {
            RaceOutcome::Resolved(report) if report.succeeded => {
                tracing::info!("🏁 {} answered first", report.source);
            }
            RaceOutcome::Resolved(report) => {
                tracing::warn!("🏁 {} failed first", report.source);
            }
            RaceOutcome::TimedOut { timeout } => {
                tracing::warn!("⏱️ No source answered within {:?}", timeout);
            }
        }

        if self.cancel_losers {
            for handle in &handles {
                handle.abort();
            }
        }

        outcome
    }
}

/// Runs the configured providers against each other over HTTP.
pub async fn race_providers<C: ConfigProvider>(config: &C) -> RaceOutcome {
    tracing::info!(
        "🔎 Looking up {} on {} providers",
        config.postal_code(),
        config.sources().len()
    );
    RaceCoordinator::from_config(HttpFetcher::new(), config)
        .run(config.sources())
        .await
}

async fn run_unit<F: AddressFetcher>(fetcher: &F, source: &SourceDescriptor) -> SourceReport {
    match fetcher.fetch(source).await {
        Ok(address) => {
            tracing::debug!("{} returned cep {}", source.label, address.cep);
            SourceReport {
                source: source.label.clone(),
                line: format_address(&source.label, &address),
                succeeded: true,
            }
        }
        Err(e) => {
            tracing::debug!("{} failed ({:?}): {}", source.label, e.category(), e);
            SourceReport {
                source: source.label.clone(),
                line: format_error(&source.label, &e),
                succeeded: false,
            }
        }
    }
}
