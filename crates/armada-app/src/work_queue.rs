//! Bounded multi-producer / multi-consumer work queue.
//!
//! The queue itself sits behind one mutex; the item and waiter counts are
//! atomics outside it so the common "nobody is waiting" path of
//! `finish_item` never locks. Waiters re-check their condition under the
//! lock, so a finish racing a waiter registration is never lost.
//!
//! `wait_for_all_finished` and `wait_for_count_below` assume nothing is
//! being queued concurrently, and neither supports multiple waiters.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex};

pub struct WorkQueue<T> {
    items: Mutex<VecDeque<T>>,
    work_available: Condvar,
    finished: Condvar,
    num_queued: AtomicUsize,
    num_in_progress: AtomicUsize,
    total_finished: AtomicU64,
    finish_waiting: AtomicUsize,
    any_finish_waiting: AtomicUsize,
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> WorkQueue<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            work_available: Condvar::new(),
            finished: Condvar::new(),
            num_queued: AtomicUsize::new(0),
            num_in_progress: AtomicUsize::new(0),
            total_finished: AtomicU64::new(0),
            finish_waiting: AtomicUsize::new(0),
            any_finish_waiting: AtomicUsize::new(0),
        }
    }

    /// Items queued but not yet handed to a worker.
    pub fn num_queued(&self) -> usize {
        self.num_queued.load(Ordering::SeqCst)
    }

    /// Items handed to a worker but not yet finished.
    pub fn num_in_progress(&self) -> usize {
        self.num_in_progress.load(Ordering::SeqCst)
    }

    /// Queued plus in-progress items.
    pub fn count(&self) -> usize {
        self.num_queued() + self.num_in_progress()
    }

    pub fn is_idle(&self) -> bool {
        self.count() == 0
    }

    pub fn queue_item(&self, item: T) {
        let mut items = self.items.lock().unwrap();
        items.push_back(item);
        self.num_queued.fetch_add(1, Ordering::SeqCst);
        self.work_available.notify_one();
    }

    /// Block until an item is available and claim it. The caller must pair
    /// every claimed item with a later `finish_item`.
    pub fn wait_for_item(&self) -> T {
        let mut items = self.items.lock().unwrap();
        loop {
            if let Some(item) = items.pop_front() {
                self.num_queued.fetch_sub(1, Ordering::SeqCst);
                self.num_in_progress.fetch_add(1, Ordering::SeqCst);
                return item;
            }
            items = self.work_available.wait(items).unwrap();
        }
    }

    /// Mark one claimed item finished, waking waiters only when somebody
    /// actually waits.
    pub fn finish_item(&self) {
        let was = self.num_in_progress.fetch_sub(1, Ordering::SeqCst);
        assert!(was > 0, "finish_item without a claimed item");
        self.total_finished.fetch_add(1, Ordering::SeqCst);

        let now_idle = self.is_idle();
        if self.any_finish_waiting.load(Ordering::SeqCst) > 0
            || (now_idle && self.finish_waiting.load(Ordering::SeqCst) > 0)
        {
            let _items = self.items.lock().unwrap();
            self.finished.notify_all();
        }
    }

    /// Block until no items are queued or in progress.
    pub fn wait_for_all_finished(&self) {
        if self.is_idle() {
            return;
        }

        self.finish_waiting.fetch_add(1, Ordering::SeqCst);
        let mut items = self.items.lock().unwrap();
        while !self.is_idle() {
            items = self.finished.wait(items).unwrap();
        }
        drop(items);
        self.finish_waiting.fetch_sub(1, Ordering::SeqCst);
    }

    /// Block until at least one item finishes (or the queue goes idle).
    pub fn wait_for_any_finished(&self) {
        if self.is_idle() {
            return;
        }

        let baseline = self.total_finished.load(Ordering::SeqCst);
        self.any_finish_waiting.fetch_add(1, Ordering::SeqCst);
        let mut items = self.items.lock().unwrap();
        while self.total_finished.load(Ordering::SeqCst) == baseline && !self.is_idle() {
            items = self.finished.wait(items).unwrap();
        }
        drop(items);
        self.any_finish_waiting.fetch_sub(1, Ordering::SeqCst);
    }

    /// Block until fewer than `count` items are queued or in progress.
    pub fn wait_for_count_below(&self, count: usize) {
        if self.count() < count {
            return;
        }

        self.any_finish_waiting.fetch_add(1, Ordering::SeqCst);
        let mut items = self.items.lock().unwrap();
        while self.count() >= count {
            items = self.finished.wait(items).unwrap();
        }
        drop(items);
        self.any_finish_waiting.fetch_sub(1, Ordering::SeqCst);
    }

    /// Take every queued (never-claimed) item; used to collect results
    /// after all workers have exited.
    pub fn drain(&self) -> Vec<T> {
        let mut items = self.items.lock().unwrap();
        let drained: Vec<T> = items.drain(..).collect();
        self.num_queued.fetch_sub(drained.len(), Ordering::SeqCst);
        drained
    }
}
