//! In-memory snapshot of a remote collection with local substring search.
//!
//! The collection is fetched in full on a background thread and kept as an
//! immutable `Arc<[T]>`. Only the fetch-completion path writes the snapshot,
//! and it does so by swapping the reference under a write lock, so a reader
//! sees either the old snapshot or the new one in full.
//!
//! Every `load()` is numbered when it is issued. A completion is installed
//! only if it is newer than the snapshot already in place, so when reloads
//! race the most recently issued one wins even if an older fetch finishes
//! after it. Nothing is cancelled: the losing fetch runs to completion and
//! its result is dropped.

use crate::error::FetchError;
use crate::search::{self, Searchable};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// The "list everything" call the cache is populated from.
pub trait RemoteCollection: Send + Sync + 'static {
    type Item: Searchable + Clone + Send + Sync + 'static;

    fn fetch_all(&self) -> Result<Vec<Self::Item>, FetchError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Empty,
    Loading,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Replaced { generation: u64, len: usize },
    Superseded { generation: u64 },
    Failed { generation: u64 },
}

/// Sent to the presentation side whenever a new snapshot is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotReplaced {
    pub generation: u64,
    pub len: usize,
}

type ErrorObserver = Arc<dyn Fn(&FetchError) + Send + Sync>;

struct Slot<T> {
    snapshot: Arc<[T]>,
    populated: bool,
    installed_generation: u64,
    issued_generation: u64,
    in_flight: usize,
}

impl<T> Slot<T> {
    fn empty() -> Self {
        Self {
            snapshot: Arc::from(Vec::new()),
            populated: false,
            installed_generation: 0,
            issued_generation: 0,
            in_flight: 0,
        }
    }

    fn state(&self) -> CacheState {
        if self.in_flight > 0 {
            CacheState::Loading
        } else if self.populated {
            CacheState::Ready
        } else {
            CacheState::Empty
        }
    }
}

fn read_slot<T>(slot: &RwLock<Slot<T>>) -> RwLockReadGuard<'_, Slot<T>> {
    slot.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_slot<T>(slot: &RwLock<Slot<T>>) -> RwLockWriteGuard<'_, Slot<T>> {
    slot.write().unwrap_or_else(PoisonError::into_inner)
}

/// Read-only view of a cache that can be handed to other threads.
pub struct CacheReader<T> {
    slot: Arc<RwLock<Slot<T>>>,
}

impl<T> Clone for CacheReader<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T: Searchable + Clone> CacheReader<T> {
    pub fn snapshot(&self) -> Arc<[T]> {
        Arc::clone(&read_slot(&self.slot).snapshot)
    }

    pub fn search(&self, query: &str) -> Vec<T> {
        let snapshot = self.snapshot();
        search::filter(&snapshot, query)
    }
}

pub struct LocalSearchCache<S: RemoteCollection> {
    source: Arc<S>,
    slot: Arc<RwLock<Slot<S::Item>>>,
    error_observer: Option<ErrorObserver>,
    event_tx: Sender<SnapshotReplaced>,
    event_rx: Receiver<SnapshotReplaced>,
}

impl<S: RemoteCollection> LocalSearchCache<S> {
    pub fn new(source: S) -> Self {
        Self::from_shared(Arc::new(source))
    }

    pub fn from_shared(source: Arc<S>) -> Self {
        let (event_tx, event_rx) = mpsc::channel();
        Self {
            source,
            slot: Arc::new(RwLock::new(Slot::empty())),
            error_observer: None,
            event_tx,
            event_rx,
        }
    }

    /// Called with every fetch failure, after it has been logged.
    pub fn with_error_observer(
        mut self,
        observer: impl Fn(&FetchError) + Send + Sync + 'static,
    ) -> Self {
        self.error_observer = Some(Arc::new(observer));
        self
    }

    /// Starts a full fetch on a background thread.
    ///
    /// Failures are logged and leave the current snapshot in place. Dropping
    /// the returned handle detaches the fetch.
    pub fn load(&self) -> LoadHandle {
        let generation = {
            let mut slot = write_slot(&self.slot);
            slot.issued_generation += 1;
            slot.in_flight += 1;
            slot.issued_generation
        };
        debug!(generation, "starting snapshot fetch");

        let mut pending = PendingLoad {
            slot: Arc::clone(&self.slot),
            settled: false,
        };
        let source = Arc::clone(&self.source);
        let observer = self.error_observer.clone();
        let event_tx = self.event_tx.clone();
        let dispatch = tracing::dispatcher::get_default(|current| current.clone());

        let join = thread::spawn(move || {
            tracing::dispatcher::with_default(&dispatch, || {
                let result = source.fetch_all();
                complete_load(&mut pending, generation, result, observer, &event_tx)
            })
        });

        LoadHandle { generation, join }
    }

    pub fn reload(&self) -> LoadHandle {
        debug!("snapshot reload requested");
        self.load()
    }

    /// Filters the current snapshot. Never touches the remote source.
    pub fn search(&self, query: &str) -> Vec<S::Item> {
        self.reader().search(query)
    }

    pub fn snapshot(&self) -> Arc<[S::Item]> {
        Arc::clone(&read_slot(&self.slot).snapshot)
    }

    pub fn state(&self) -> CacheState {
        read_slot(&self.slot).state()
    }

    pub fn reader(&self) -> CacheReader<S::Item> {
        CacheReader {
            slot: Arc::clone(&self.slot),
        }
    }

    pub fn try_recv_event(&self) -> Option<SnapshotReplaced> {
        self.event_rx.try_recv().ok()
    }
}

/// Marks one fetch as in flight until it is settled or its thread unwinds.
struct PendingLoad<T> {
    slot: Arc<RwLock<Slot<T>>>,
    settled: bool,
}

impl<T> PendingLoad<T> {
    fn settle(&mut self) -> RwLockWriteGuard<'_, Slot<T>> {
        self.settled = true;
        let mut slot = write_slot(&self.slot);
        slot.in_flight = slot.in_flight.saturating_sub(1);
        slot
    }
}

impl<T> Drop for PendingLoad<T> {
    fn drop(&mut self) {
        if !self.settled {
            let mut slot = write_slot(&self.slot);
            slot.in_flight = slot.in_flight.saturating_sub(1);
        }
    }
}

fn complete_load<T>(
    pending: &mut PendingLoad<T>,
    generation: u64,
    result: Result<Vec<T>, FetchError>,
    observer: Option<ErrorObserver>,
    event_tx: &Sender<SnapshotReplaced>,
) -> LoadOutcome {
    let items = match result {
        Ok(items) => items,
        Err(err) => {
            drop(pending.settle());
            warn!(generation, error = %err, "error loading snapshot");
            if let Some(observer) = observer {
                observer(&err);
            }
            return LoadOutcome::Failed { generation };
        }
    };

    let len = items.len();
    let snapshot: Arc<[T]> = Arc::from(items);
    let installed = {
        let mut slot = pending.settle();
        if generation > slot.installed_generation {
            slot.snapshot = snapshot;
            slot.installed_generation = generation;
            slot.populated = true;
            true
        } else {
            false
        }
    };

    if !installed {
        debug!(generation, "discarding superseded snapshot fetch");
        return LoadOutcome::Superseded { generation };
    }

    debug!(generation, len, "snapshot replaced");
    let _ = event_tx.send(SnapshotReplaced { generation, len });
    LoadOutcome::Replaced { generation, len }
}

#[derive(Debug)]
pub struct LoadHandle {
    generation: u64,
    join: JoinHandle<LoadOutcome>,
}

impl LoadHandle {
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Blocks until the fetch has been installed, discarded or has failed.
    pub fn join(self) -> LoadOutcome {
        let generation = self.generation;
        match self.join.join() {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(generation, "snapshot fetch thread panicked");
                LoadOutcome::Failed { generation }
            }
        }
    }
}
