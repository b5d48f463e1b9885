use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::mvu::entry::{Deps, EntryModel, Msg, restore_snapshot, update};
use crate::mvu::runtime::run_entry;
use crate::storage::{MatchStore, SessionCache};

/// How long an untouched session stays in memory. Its draft lives on in the session cache.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

#[derive(Default)]
struct SessionSlot {
    model: Mutex<Option<EntryModel>>,
    /// Millis since the registry's epoch.
    touched_ms: AtomicU64,
}

type Slot = Arc<SessionSlot>;

/// Open entry sessions, one per match.
///
/// Each match gets one slot. The first caller to lock a slot restores the cached sheet (or
/// starts a fresh one) while holding it, so start-up can't race a second initialiser.
/// A slot is dropped once its sheet is submitted, or once it has sat idle past the timeout
/// with nobody holding it.
#[derive(Clone)]
pub struct Sessions {
    store: Arc<dyn MatchStore>,
    cache: Arc<dyn SessionCache>,
    open: Arc<RwLock<HashMap<String, Slot>>>,
    epoch: Instant,
    idle_timeout: Duration,
}

impl Sessions {
    #[must_use]
    pub fn new(store: Arc<dyn MatchStore>, cache: Arc<dyn SessionCache>) -> Self {
        Self {
            store,
            cache,
            open: Arc::new(RwLock::new(HashMap::new())),
            epoch: Instant::now(),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    #[must_use]
    pub fn store(&self) -> &dyn MatchStore {
        self.store.as_ref()
    }

    /// Number of sessions held in memory.
    pub async fn open_count(&self) -> usize {
        self.open.read().await.len()
    }

    fn deps(&self) -> Deps<'_> {
        Deps {
            store: self.store.as_ref(),
            cache: self.cache.as_ref(),
        }
    }

    fn now_ms(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    async fn slot(&self, match_id: &str) -> Slot {
        if let Some(slot) = self.open.read().await.get(match_id) {
            return Arc::clone(slot);
        }
        let mut open = self.open.write().await;
        self.sweep_idle(&mut open);
        Arc::clone(open.entry(match_id.to_string()).or_default())
    }

    /// Drops idle slots nobody holds. Clones are only made under the registry lock, so a
    /// strong count of one means no dispatch is using or waiting on the slot.
    fn sweep_idle(&self, open: &mut HashMap<String, Slot>) {
        let now = self.now_ms();
        let idle_ms = u64::try_from(self.idle_timeout.as_millis()).unwrap_or(u64::MAX);
        let before = open.len();
        open.retain(|_, slot| {
            let idle = now.saturating_sub(slot.touched_ms.load(Ordering::Relaxed)) >= idle_ms;
            !(idle && Arc::strong_count(slot) == 1)
        });
        let evicted = before - open.len();
        if evicted > 0 {
            debug!(evicted, remaining = open.len(), "evicted idle entry sessions");
        }
    }

    /// Removes a submitted session unless another dispatch already holds its slot.
    async fn release(&self, match_id: &str, slot: Slot) {
        let mut open = self.open.write().await;
        let ours = open
            .get(match_id)
            .is_some_and(|current| Arc::ptr_eq(current, &slot));
        // the registry's reference plus ours
        if ours && Arc::strong_count(&slot) == 2 {
            open.remove(match_id);
            debug!(match_id, "closed submitted entry session");
        }
    }

    /// Applies `msg` to the match's session and returns the resulting model.
    pub async fn dispatch(&self, match_id: &str, msg: Msg) -> EntryModel {
        let slot = self.slot(match_id).await;
        let result = {
            let mut guard = slot.model.lock().await;
            slot.touched_ms.store(self.now_ms(), Ordering::Relaxed);
            let model = match guard.take() {
                Some(model) => model,
                None => {
                    let snapshot = restore_snapshot(self.cache.as_ref(), match_id).await;
                    info!(match_id, restored = snapshot.is_some(), "entry session started");
                    let mut model = EntryModel::new(match_id);
                    update(&mut model, Msg::SessionStarted(snapshot));
                    model
                }
            };
            let model = guard.insert(model);
            model.banner = None;
            model.closed = false;
            run_entry(model, msg, self.deps()).await;
            model.clone()
        };
        if result.closed {
            self.release(match_id, slot).await;
        }
        result
    }
}
