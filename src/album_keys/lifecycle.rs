use super::AlbumKeys;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

impl AlbumKeys {
    /// Warm the cache and keep it current in the background
    ///
    /// Runs one refresh before returning, then spawns a task that refreshes
    /// every `refresh_interval` until `shutdown` turns `true` (or its sender is
    /// dropped). Each tick runs its cycle as a separate task, so a slow cycle
    /// overlaps the next one instead of delaying it; cycles already running when
    /// shutdown arrives are left to finish.
    ///
    /// Returns `None` without doing anything when sync is disabled or refreshing
    /// was already started.
    pub async fn start_refreshing(
        self: &Arc<Self>,
        mut shutdown: watch::Receiver<bool>,
        refresh_interval: Duration,
        base_url: &str,
    ) -> Option<JoinHandle<()>> {
        if !self.sync_enabled {
            tracing::warn!("Albums sync is disabled, not starting refresh");
            return None;
        }

        if self
            .refreshing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("Albums refresh already started");
            return None;
        }

        tracing::info!("Starting albums refresh every {:?}", refresh_interval);
        self.refresh_all(base_url).await;

        let album_keys = Arc::clone(self);
        let base_url = base_url.to_string();

        Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + refresh_interval, refresh_interval);

            loop {
                if *shutdown.borrow_and_update() {
                    break;
                }

                tokio::select! {
                    biased;

                    changed = shutdown.changed() => {
                        if changed.is_err() {
                            // Sender gone: nobody can stop us later, so stop now
                            break;
                        }
                    }

                    _ = ticker.tick() => {
                        let album_keys = Arc::clone(&album_keys);
                        let base_url = base_url.clone();
                        tokio::spawn(async move {
                            album_keys.run_cycle(&base_url).await;
                        });
                    }
                }
            }

            tracing::info!("Albums refresh stopped");
        }))
    }

    /// One periodic refresh, warning when earlier cycles have not finished yet
    async fn run_cycle(&self, base_url: &str) {
        let running = self.cycles_in_flight.fetch_add(1, Ordering::AcqRel);
        if running > 0 {
            tracing::warn!(
                "Starting albums refresh while {} previous refresh(es) still running",
                running
            );
        }

        self.refresh_all(base_url).await;
        self.cycles_in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}
