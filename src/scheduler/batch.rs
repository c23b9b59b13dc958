use std::collections::VecDeque;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, warn};

use crate::lookup::ProductLookup;
use crate::models::BatchOutcome;

use super::progress::BatchProgress;

/// Runs lookups over an ordered list of queries with a bounded worker pool.
///
/// Workers pull `(index, query)` pairs from a shared queue and emit
/// `(index, outcome)` messages; a single aggregator writes result slots and
/// advances the progress counter, so no two tasks ever touch the same slot.
/// Completion order is unconstrained; slot order always matches input order.
pub struct BatchScheduler<L> {
    lookup: Arc<L>,
    max_workers: usize,
    progress: Arc<BatchProgress>,
}

impl<L> BatchScheduler<L>
where
    L: ProductLookup + 'static,
{
    /// `max_workers` defaults small (3) in config to bound load on the
    /// marketplace; it is clamped to at least one here.
    pub fn new(lookup: Arc<L>, max_workers: usize) -> Self {
        BatchScheduler {
            lookup,
            max_workers: max_workers.max(1),
            progress: Arc::new(BatchProgress::new()),
        }
    }

    /// Shared progress handle, pollable while a run is in flight.
    pub fn progress(&self) -> Arc<BatchProgress> {
        Arc::clone(&self.progress)
    }

    /// Process every query and return one outcome per input index. Always
    /// returns a fully populated vector: a query's failure becomes an error
    /// slot, never a missing one, and never aborts its siblings.
    pub async fn run(&self, queries: &[String]) -> Vec<BatchOutcome> {
        self.progress.reset(queries.len());

        if queries.is_empty() {
            return Vec::new();
        }

        let queue: Arc<Mutex<VecDeque<(usize, String)>>> = Arc::new(Mutex::new(
            queries.iter().cloned().enumerate().collect(),
        ));

        let (tx, mut rx) = mpsc::channel::<(usize, BatchOutcome)>(queries.len());

        let worker_count = self.max_workers.min(queries.len());
        let workers: Vec<_> = (0..worker_count)
            .map(|worker_id| {
                let queue = Arc::clone(&queue);
                let tx = tx.clone();
                let lookup = Arc::clone(&self.lookup);

                tokio::spawn(async move {
                    loop {
                        let item = queue.lock().await.pop_front();
                        let Some((index, query)) = item else {
                            debug!(worker_id, "queue drained, worker exiting");
                            break;
                        };

                        debug!(worker_id, index, %query, "worker picked up query");
                        let outcome = match lookup.lookup(&query).await {
                            Ok(report) => BatchOutcome::Report(report),
                            Err(e) => {
                                warn!(worker_id, index, "lookup failed for '{}': {:#}", query, e);
                                BatchOutcome::Error { message: format!("{e:#}") }
                            }
                        };

                        if tx.send((index, outcome)).await.is_err() {
                            break;
                        }
                    }
                })
            })
            .collect();

        // The workers hold the only remaining senders; the channel closes
        // once they have all terminated.
        drop(tx);

        let mut slots: Vec<Option<BatchOutcome>> = (0..queries.len()).map(|_| None).collect();
        while let Some((index, outcome)) = rx.recv().await {
            slots[index] = Some(outcome);
            self.progress.mark_completed();
        }

        join_all(workers).await;

        // A panicked worker drops its in-flight item without reporting it.
        // Backfill so every slot is filled and the counter lands on total.
        slots
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| {
                    self.progress.mark_completed();
                    BatchOutcome::Error {
                        message: "worker terminated before reporting a result".to_string(),
                    }
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompetitorEntry, ProductReport};
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Controllable fake: per-query delay so completion order can be forced
    /// out of input order, plus a failure trigger.
    struct FakeLookup {
        delays_ms: Vec<u64>,
        fail_on: Option<String>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl FakeLookup {
        fn new(delays_ms: Vec<u64>) -> Self {
            FakeLookup {
                delays_ms,
                fail_on: None,
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }

        fn report_for(query: &str) -> ProductReport {
            ProductReport {
                title: format!("report for {query}"),
                price: "999".to_string(),
                reviews_text: "10 ratings".to_string(),
                rating: "4.0 out of 5 stars".to_string(),
                product_link: format!("https://example.com/{query}"),
                competitors: Vec::<CompetitorEntry>::new(),
            }
        }
    }

    #[async_trait]
    impl ProductLookup for FakeLookup {
        async fn lookup(&self, query: &str) -> Result<ProductReport> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            let index: usize = query.trim_start_matches("item-").parse().unwrap_or(0);
            let delay = self.delays_ms.get(index).copied().unwrap_or(1);
            tokio::time::sleep(Duration::from_millis(delay)).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.fail_on.as_deref() == Some(query) {
                return Err(anyhow!("simulated lookup failure"));
            }
            Ok(Self::report_for(query))
        }
    }

    fn queries(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("item-{i}")).collect()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_results_land_at_their_input_index() {
        // Later items finish first: delays decrease with index
        let delays = (0..10u64).map(|i| 50 - i * 5).collect();
        let lookup = Arc::new(FakeLookup::new(delays));
        let scheduler = BatchScheduler::new(Arc::clone(&lookup), 3);

        let input = queries(10);
        let outcomes = scheduler.run(&input).await;

        assert_eq!(outcomes.len(), 10);
        for (i, outcome) in outcomes.iter().enumerate() {
            match outcome {
                BatchOutcome::Report(report) => {
                    assert_eq!(report.title, format!("report for item-{i}"));
                }
                BatchOutcome::Error { message } => panic!("slot {i} errored: {message}"),
            }
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_worker_pool_is_bounded() {
        let lookup = Arc::new(FakeLookup::new(vec![20; 10]));
        let scheduler = BatchScheduler::new(Arc::clone(&lookup), 3);

        scheduler.run(&queries(10)).await;
        assert!(lookup.max_in_flight.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_progress_reaches_total_and_never_exceeds_it() {
        let lookup = Arc::new(FakeLookup::new(vec![10; 10]));
        let scheduler = BatchScheduler::new(Arc::clone(&lookup), 3);
        let progress = scheduler.progress();

        let observer = {
            let progress = Arc::clone(&progress);
            tokio::spawn(async move {
                loop {
                    let state = progress.snapshot();
                    if state.total != 0 {
                        assert!(state.completed <= state.total);
                    }
                    assert!(state.completed <= 10);
                    if state.total == 10 && state.completed == 10 {
                        break;
                    }
                    tokio::time::sleep(Duration::from_millis(2)).await;
                }
            })
        };

        scheduler.run(&queries(10)).await;

        let state = progress.snapshot();
        assert_eq!(state.completed, 10);
        assert_eq!(state.total, 10);
        observer.await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_failed_query_fills_its_slot_and_counts() {
        let mut lookup = FakeLookup::new(vec![5; 5]);
        lookup.fail_on = Some("item-2".to_string());
        let scheduler = BatchScheduler::new(Arc::new(lookup), 3);
        let progress = scheduler.progress();

        let outcomes = scheduler.run(&queries(5)).await;

        assert_eq!(outcomes.len(), 5);
        assert!(outcomes[2].is_error());
        for (i, outcome) in outcomes.iter().enumerate() {
            if i != 2 {
                assert!(!outcome.is_error(), "sibling slot {i} should have succeeded");
            }
        }
        assert_eq!(progress.snapshot().completed, 5);
    }

    #[tokio::test]
    async fn test_empty_batch_returns_immediately() {
        let scheduler = BatchScheduler::new(Arc::new(FakeLookup::new(Vec::new())), 3);
        let outcomes = scheduler.run(&[]).await;
        assert!(outcomes.is_empty());
        assert_eq!(scheduler.progress().snapshot().total, 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_duplicate_queries_each_get_a_slot() {
        let lookup = Arc::new(FakeLookup::new(vec![5; 4]));
        let scheduler = BatchScheduler::new(lookup, 2);

        let input = vec![
            "item-0".to_string(),
            "item-0".to_string(),
            "item-0".to_string(),
        ];
        let outcomes = scheduler.run(&input).await;
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| !o.is_error()));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_progress_resets_between_runs() {
        let lookup = Arc::new(FakeLookup::new(vec![1; 10]));
        let scheduler = BatchScheduler::new(lookup, 3);

        scheduler.run(&queries(4)).await;
        assert_eq!(scheduler.progress().snapshot().completed, 4);

        scheduler.run(&queries(2)).await;
        let state = scheduler.progress().snapshot();
        assert_eq!(state.completed, 2);
        assert_eq!(state.total, 2);
    }
}
