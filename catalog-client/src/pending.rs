use crate::error::Error;
use chrono::{DateTime, Utc};
use dashmap::{mapref::entry::Entry, DashMap};
use futures::future::{BoxFuture, FutureExt, Shared};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// How long a settled request stays in the table by default.
pub const DEFAULT_RETENTION: Duration = Duration::from_millis(100);

/// Configuration for request coalescing
#[derive(Clone, Debug)]
pub struct PendingConfig {
    /// How long a settled entry keeps absorbing duplicate calls before removal
    pub retention: Duration,
    /// Whether coalescing is enabled
    pub enabled: bool,
}

impl Default for PendingConfig {
    fn default() -> Self {
        Self {
            retention: DEFAULT_RETENTION,
            enabled: true,
        }
    }
}

type SharedFetch<T> = Shared<BoxFuture<'static, Result<T, Error>>>;

struct PendingEntry<T> {
    id: u64,
    started_at: DateTime<Utc>,
    settled: Arc<AtomicBool>,
    handle: SharedFetch<T>,
}

/// Table of in-flight and recently settled requests.
///
/// The first caller for a key starts the request; every caller arriving while
/// the entry exists awaits the same handle. Entries go
/// absent -> in flight -> settled -> removed, the last step happening
/// `retention` after the request settles, whether it succeeded or not.
pub struct PendingRequests<K, T> {
    entries: Arc<DashMap<K, PendingEntry<T>>>,
    next_id: AtomicU64,
    config: PendingConfig,
}

impl<K, T> PendingRequests<K, T>
where
    K: Hash + Eq + Clone + Debug + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub fn new(config: PendingConfig) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            next_id: AtomicU64::new(0),
            config,
        }
    }

    pub fn config(&self) -> &PendingConfig {
        &self.config
    }

    /// Run `fetch_fn` for `key` unless an entry for `key` already exists, in
    /// which case the existing request's outcome is returned instead.
    ///
    /// Must be called from within a tokio runtime. The request runs as its
    /// own task, so it completes and gets cleaned up even if every caller
    /// stops waiting.
    pub async fn execute<F, Fut>(&self, key: K, fetch_fn: F) -> Result<T, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, Error>> + Send + 'static,
    {
        if !self.config.enabled {
            return fetch_fn().await;
        }

        self.handle_for(key, fetch_fn).await
    }

    fn handle_for<F, Fut>(&self, key: K, fetch_fn: F) -> SharedFetch<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, Error>> + Send + 'static,
    {
        // Lookup and insert happen under the same shard lock.
        match self.entries.entry(key) {
            Entry::Occupied(entry) => {
                log::debug!("Request already pending for key: {:?}", entry.key());
                entry.get().handle.clone()
            }
            Entry::Vacant(entry) => {
                let key = entry.key().clone();
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let settled = Arc::new(AtomicBool::new(false));
                log::debug!("Executing new request for key: {:?}", key);

                let task = tokio::spawn(Self::run(
                    fetch_fn(),
                    key.clone(),
                    id,
                    Arc::clone(&self.entries),
                    Arc::clone(&settled),
                    self.config.retention,
                ));

                let description = format!("{:?}", key);
                let handle = async move {
                    match task.await {
                        Ok(result) => result,
                        Err(err) => Err(Error::Abandoned {
                            key: description,
                            message: err.to_string(),
                        }),
                    }
                }
                .boxed()
                .shared();

                entry.insert(PendingEntry {
                    id,
                    started_at: Utc::now(),
                    settled,
                    handle: handle.clone(),
                });
                handle
            }
        }
    }

    async fn run<Fut>(
        fetch: Fut,
        key: K,
        id: u64,
        entries: Arc<DashMap<K, PendingEntry<T>>>,
        settled: Arc<AtomicBool>,
        retention: Duration,
    ) -> Result<T, Error>
    where
        Fut: Future<Output = Result<T, Error>> + Send + 'static,
    {
        // Schedules the removal however the fetch ends, panics included.
        let _release = ReleaseGuard {
            key: key.clone(),
            id,
            entries,
            settled,
            retention,
        };

        let result = fetch.await;
        if let Err(err) = &result {
            log::debug!("Request for key {:?} failed: {}", key, err);
        }
        result
    }

    /// Get statistics about the table
    pub fn stats(&self) -> PendingStats {
        // One pass, so entries released mid-count cannot skew the totals.
        self.entries
            .iter()
            .fold(PendingStats::default(), |mut stats, entry| {
                if entry.value().settled.load(Ordering::Acquire) {
                    stats.settled_requests += 1;
                } else {
                    stats.pending_requests += 1;
                }
                stats
            })
    }

    /// Drop every entry. Requests already in flight still finish.
    pub fn clear(&self) {
        self.entries.clear();
        log::info!("Pending request table cleared");
    }
}

/// Marks an entry settled and removes it `retention` later once dropped.
struct ReleaseGuard<K, T>
where
    K: Hash + Eq + Clone + Debug + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    key: K,
    id: u64,
    entries: Arc<DashMap<K, PendingEntry<T>>>,
    settled: Arc<AtomicBool>,
    retention: Duration,
}

impl<K, T> Drop for ReleaseGuard<K, T>
where
    K: Hash + Eq + Clone + Debug + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    fn drop(&mut self) {
        self.settled.store(true, Ordering::Release);

        let key = self.key.clone();
        let id = self.id;
        let entries = Arc::clone(&self.entries);

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                release(&entries, &key, id);
                return;
            }
        };

        let retention = self.retention;
        runtime.spawn(async move {
            tokio::time::sleep(retention).await;
            release(&entries, &key, id);
        });
    }
}

/// Only drop the entry this request created; `clear` may have made room for
/// a newer one under the same key.
fn release<K, T>(entries: &DashMap<K, PendingEntry<T>>, key: &K, id: u64)
where
    K: Hash + Eq + Debug,
{
    if let Some((_, entry)) = entries.remove_if(key, |_, entry| entry.id == id) {
        let held = Utc::now() - entry.started_at;
        log::debug!(
            "Released key {:?} after {} ms",
            key,
            held.num_milliseconds()
        );
    }
}

/// Statistics for the pending request table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingStats {
    /// Entries whose request has not settled yet
    pub pending_requests: usize,
    /// Settled entries still inside their retention window
    pub settled_requests: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn table(retention_ms: u64) -> Arc<PendingRequests<String, u32>> {
        Arc::new(PendingRequests::new(PendingConfig {
            retention: Duration::from_millis(retention_ms),
            enabled: true,
        }))
    }

    #[tokio::test]
    async fn test_identical_requests_share_one_execution() {
        let pending = table(100);
        let execution_count = Arc::new(AtomicUsize::new(0));

        let mut handles = vec![];
        for _ in 0..5 {
            let pending = Arc::clone(&pending);
            let execution_count = Arc::clone(&execution_count);

            handles.push(tokio::spawn(async move {
                pending
                    .execute("page=1".to_string(), move || async move {
                        execution_count.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok(42)
                    })
                    .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), 42);
        }

        assert_eq!(execution_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_different_keys_run_independently() {
        let pending = table(100);
        let execution_count = Arc::new(AtomicUsize::new(0));

        let count1 = Arc::clone(&execution_count);
        let count2 = Arc::clone(&execution_count);

        let (first, second) = tokio::join!(
            pending.execute("page=1".to_string(), move || async move {
                count1.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(30)).await;
                Ok(1)
            }),
            pending.execute("page=2".to_string(), move || async move {
                count2.fetch_add(1, Ordering::SeqCst);
                Ok(2)
            }),
        );

        assert_eq!(first.unwrap(), 1);
        assert_eq!(second.unwrap(), 2);
        assert_eq!(execution_count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_settled_entry_absorbs_calls_until_retention_elapses() {
        let pending = table(200);
        let execution_count = Arc::new(AtomicUsize::new(0));

        let run = |count: Arc<AtomicUsize>| {
            let pending = Arc::clone(&pending);
            async move {
                pending
                    .execute("page=3".to_string(), move || async move {
                        Ok(count.fetch_add(1, Ordering::SeqCst) as u32)
                    })
                    .await
                    .unwrap()
            }
        };

        assert_eq!(run(Arc::clone(&execution_count)).await, 0);
        // Still inside the retention window: same outcome, no new execution.
        assert_eq!(run(Arc::clone(&execution_count)).await, 0);
        assert_eq!(pending.stats().settled_requests, 1);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(pending.stats(), PendingStats::default());

        assert_eq!(run(Arc::clone(&execution_count)).await, 1);
        assert_eq!(execution_count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_request_is_shared_and_released() {
        let pending = table(20);
        let failure = || async {
            Err::<u32, _>(Error::Status {
                url: "https://example.test/character?page=1".to_string(),
                status: 500,
            })
        };

        let (first, second) = tokio::join!(
            pending.execute("page=1".to_string(), failure),
            pending.execute("page=1".to_string(), failure),
        );
        assert_eq!(first.unwrap_err().status(), Some(500));
        assert_eq!(second.unwrap_err().status(), Some(500));

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(pending.stats(), PendingStats::default());
    }

    #[tokio::test]
    async fn test_stats_track_in_flight_requests() {
        let pending = table(100);
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();

        let waiting = {
            let pending = Arc::clone(&pending);
            tokio::spawn(async move {
                pending
                    .execute("page=9".to_string(), move || async move {
                        let _ = release_rx.await;
                        Ok(9)
                    })
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(
            pending.stats(),
            PendingStats {
                pending_requests: 1,
                settled_requests: 0
            }
        );

        release_tx.send(()).unwrap();
        assert_eq!(waiting.await.unwrap().unwrap(), 9);
        assert_eq!(pending.stats().settled_requests, 1);
    }

    #[tokio::test]
    async fn test_disabled_table_never_coalesces() {
        let pending: PendingRequests<String, u32> = PendingRequests::new(PendingConfig {
            retention: DEFAULT_RETENTION,
            enabled: false,
        });
        let execution_count = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let count = Arc::clone(&execution_count);
            pending
                .execute("page=1".to_string(), move || async move {
                    count.fetch_add(1, Ordering::SeqCst);
                    Ok(1)
                })
                .await
                .unwrap();
        }

        assert_eq!(execution_count.load(Ordering::SeqCst), 3);
        assert_eq!(pending.stats(), PendingStats::default());
    }

    #[tokio::test]
    async fn test_clear_does_not_break_in_flight_callers() {
        let pending = table(50);
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();

        let waiting = {
            let pending = Arc::clone(&pending);
            tokio::spawn(async move {
                pending
                    .execute("page=4".to_string(), move || async move {
                        let _ = release_rx.await;
                        Ok(4)
                    })
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        pending.clear();
        assert_eq!(pending.stats(), PendingStats::default());

        release_tx.send(()).unwrap();
        assert_eq!(waiting.await.unwrap().unwrap(), 4);
    }

    #[tokio::test]
    async fn test_panicking_request_is_released_after_retention() {
        let pending = table(20);
        let execution_count = Arc::new(AtomicUsize::new(0));

        let count = Arc::clone(&execution_count);
        let first = pending
            .execute("page=1".to_string(), move || async move {
                count.fetch_add(1, Ordering::SeqCst);
                let missing: Option<u32> = None;
                Ok(missing.expect("catalog sent nothing"))
            })
            .await;
        assert!(matches!(first, Err(Error::Abandoned { .. })));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(pending.stats(), PendingStats::default());

        let count = Arc::clone(&execution_count);
        let second = pending
            .execute("page=1".to_string(), move || async move {
                count.fetch_add(1, Ordering::SeqCst);
                Ok(2)
            })
            .await;
        assert_eq!(second.unwrap(), 2);
        assert_eq!(execution_count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_stats_stay_consistent_while_entries_expire() {
        let pending = table(0);

        let mut workers = vec![];
        for worker in 0..3u32 {
            let pending = Arc::clone(&pending);
            workers.push(tokio::spawn(async move {
                for round in 0..200u32 {
                    let key = format!("page={}", (worker * 1000 + round) % 7);
                    let _ = pending
                        .execute(key, move || async move { Ok(round) })
                        .await;
                }
            }));
        }

        let observer = {
            let pending = Arc::clone(&pending);
            tokio::task::spawn_blocking(move || {
                for _ in 0..2000 {
                    let stats = pending.stats();
                    assert!(stats.pending_requests + stats.settled_requests <= 7);
                }
            })
        };

        for worker in workers {
            worker.await.unwrap();
        }
        observer.await.unwrap();
    }
}
